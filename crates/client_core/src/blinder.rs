//! Batch blinding over the oblivious-evaluation primitive.
//!
//! The suite is a capability: anything that can blind an ordered batch and
//! later finalize the matching evaluation response is substitutable, which
//! keeps the orchestrator testable without real key material.

use rand::rngs::OsRng;
use shared::error::SessionError;
use voprf::{EvaluationElement, OprfClient, Ristretto255};

/// Serialized length of one ristretto255 group element.
const ELEMENT_LEN: usize = 32;
/// Finalized output length for the ristretto255/SHA-512 suite.
const OUTPUT_LEN: usize = 64;

/// One blinded submission: the serialized request for the wire and the
/// opaque state needed to finalize exactly that request's response. The
/// state is consumed by value, so it cannot be reused across attempts.
pub struct BlindedBatch<S> {
    pub state: S,
    pub request: Vec<u8>,
}

pub trait ObliviousSuite: Send + Sync {
    type FinalizeState: Send;

    /// Blinds the ordered batch without mutating or reordering it. Fails
    /// with `EmptyBatch` when `inputs` is empty.
    fn blind(&self, inputs: &[Vec<u8>])
        -> Result<BlindedBatch<Self::FinalizeState>, SessionError>;

    /// Unblinds the server's evaluation response into one fixed-width
    /// output per batch entry, order preserved. Fails with
    /// `MalformedResponse` when the response does not match the expected
    /// byte layout.
    fn finalize(
        &self,
        state: Self::FinalizeState,
        response: &[u8],
    ) -> Result<Vec<Vec<u8>>, SessionError>;

    /// Fixed byte width of each finalized output.
    fn output_width(&self) -> usize;
}

/// Base-mode OPRF over ristretto255. Wire format: the request is a
/// big-endian `u16` batch count followed by one 32-byte blinded element per
/// entry; the response is the same count of 32-byte evaluation elements
/// with no header.
pub struct Ristretto255Suite;

pub struct Ristretto255FinalizeState {
    clients: Vec<(Vec<u8>, OprfClient<Ristretto255>)>,
}

impl ObliviousSuite for Ristretto255Suite {
    type FinalizeState = Ristretto255FinalizeState;

    fn blind(
        &self,
        inputs: &[Vec<u8>],
    ) -> Result<BlindedBatch<Self::FinalizeState>, SessionError> {
        if inputs.is_empty() {
            return Err(SessionError::EmptyBatch);
        }
        if inputs.len() > u16::MAX as usize {
            return Err(SessionError::Blinding(format!(
                "batch of {} entries exceeds the wire header limit",
                inputs.len()
            )));
        }

        let mut rng = OsRng;
        let mut request = Vec::with_capacity(2 + inputs.len() * ELEMENT_LEN);
        request.extend_from_slice(&(inputs.len() as u16).to_be_bytes());

        let mut clients = Vec::with_capacity(inputs.len());
        for input in inputs {
            let blinded = OprfClient::<Ristretto255>::blind(input, &mut rng)
                .map_err(|err| SessionError::Blinding(format!("{err:?}")))?;
            request.extend_from_slice(AsRef::<[u8]>::as_ref(&blinded.message.serialize()));
            clients.push((input.clone(), blinded.state));
        }

        Ok(BlindedBatch {
            state: Ristretto255FinalizeState { clients },
            request,
        })
    }

    fn finalize(
        &self,
        state: Self::FinalizeState,
        response: &[u8],
    ) -> Result<Vec<Vec<u8>>, SessionError> {
        let expected = state.clients.len();
        if response.len() != expected * ELEMENT_LEN {
            return Err(SessionError::MalformedResponse(format!(
                "expected {} bytes for {expected} evaluation elements, got {}",
                expected * ELEMENT_LEN,
                response.len()
            )));
        }

        let mut outputs = Vec::with_capacity(expected);
        for (chunk, (input, client)) in response.chunks_exact(ELEMENT_LEN).zip(state.clients) {
            let element = EvaluationElement::<Ristretto255>::deserialize(chunk)
                .map_err(|err| SessionError::MalformedResponse(format!("{err:?}")))?;
            let output = client
                .finalize(&input, &element)
                .map_err(|err| SessionError::MalformedResponse(format!("{err:?}")))?;
            outputs.push(AsRef::<[u8]>::as_ref(&output).to_vec());
        }
        Ok(outputs)
    }

    fn output_width(&self) -> usize {
        OUTPUT_LEN
    }
}
