use rand::rngs::OsRng;
use shared::error::SessionError;
use voprf::{BlindedElement, OprfServer, Ristretto255};

use crate::blinder::{ObliviousSuite, Ristretto255Suite};

const ELEMENT_LEN: usize = 32;

/// Server-side half of the protocol, stood in for by the voprf crate's own
/// server: parse the request wire format, evaluate each element, return
/// the headerless response layout.
fn evaluate_request(server: &OprfServer<Ristretto255>, request: &[u8]) -> Vec<u8> {
    let count = u16::from_be_bytes([request[0], request[1]]) as usize;
    let elements = &request[2..];
    assert_eq!(elements.len(), count * ELEMENT_LEN);

    let mut response = Vec::with_capacity(count * ELEMENT_LEN);
    for chunk in elements.chunks_exact(ELEMENT_LEN) {
        let blinded = BlindedElement::<Ristretto255>::deserialize(chunk).expect("blinded element");
        let evaluated = server.blind_evaluate(&blinded);
        response.extend_from_slice(AsRef::<[u8]>::as_ref(&evaluated.serialize()));
    }
    response
}

#[test]
fn round_trip_produces_fixed_width_outputs_in_order() {
    let suite = Ristretto255Suite;
    let server = OprfServer::<Ristretto255>::new(&mut OsRng).expect("server");

    let inputs = vec![b"alice".to_vec(), b"bob".to_vec()];
    let batch = suite.blind(&inputs).expect("blind");
    assert_eq!(batch.request.len(), 2 + inputs.len() * ELEMENT_LEN);

    let response = evaluate_request(&server, &batch.request);
    let outputs = suite.finalize(batch.state, &response).expect("finalize");

    assert_eq!(outputs.len(), 2);
    for output in &outputs {
        assert_eq!(output.len(), suite.output_width());
    }
    assert_ne!(outputs[0], outputs[1]);
}

#[test]
fn same_key_and_input_finalize_identically_across_sessions() {
    let suite = Ristretto255Suite;
    let server = OprfServer::<Ristretto255>::new(&mut OsRng).expect("server");
    let inputs = vec![b"alice".to_vec()];

    let first = {
        let batch = suite.blind(&inputs).expect("blind");
        let response = evaluate_request(&server, &batch.request);
        suite.finalize(batch.state, &response).expect("finalize")
    };
    let second = {
        let batch = suite.blind(&inputs).expect("blind");
        let response = evaluate_request(&server, &batch.request);
        suite.finalize(batch.state, &response).expect("finalize")
    };

    // Fresh blinding factors each run, same unblinded output.
    assert_eq!(first, second);
}

#[test]
fn empty_batch_is_rejected() {
    let Err(err) = Ristretto255Suite.blind(&[]) else {
        panic!("empty batch must be rejected");
    };
    assert_eq!(err, SessionError::EmptyBatch);
}

#[test]
fn truncated_response_is_malformed() {
    let suite = Ristretto255Suite;
    let batch = suite.blind(&[b"alice".to_vec()]).expect("blind");

    let err = suite.finalize(batch.state, &[0u8; 16]).unwrap_err();
    assert!(matches!(err, SessionError::MalformedResponse(_)));
}

#[test]
fn undecodable_element_is_malformed() {
    let suite = Ristretto255Suite;
    let batch = suite.blind(&[b"alice".to_vec()]).expect("blind");

    // 0xff.. is not a canonical ristretto255 encoding.
    let err = suite.finalize(batch.state, &[0xffu8; ELEMENT_LEN]).unwrap_err();
    assert!(matches!(err, SessionError::MalformedResponse(_)));
}
