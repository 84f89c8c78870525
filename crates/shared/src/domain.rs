use crate::error::SessionError;

/// One surviving user entry, created when a submission starts and immutable
/// afterwards. `index` is the ordinal position among the surviving items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputItem {
    pub index: usize,
    pub text: String,
}

impl InputItem {
    /// Builds the ordered batch from raw form values. Entries that are empty
    /// after trimming are dropped before any protocol work begins; surviving
    /// items keep their submitted text verbatim.
    pub fn from_submission<S: AsRef<str>>(raw: &[S]) -> Vec<InputItem> {
        raw.iter()
            .filter(|text| !text.as_ref().trim().is_empty())
            .enumerate()
            .map(|(index, text)| InputItem {
                index,
                text: text.as_ref().to_string(),
            })
            .collect()
    }
}

/// Final per-item result of a completed session: the original plaintext
/// paired with its opaque evaluation output and glyph rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord {
    pub index: usize,
    pub original_text: String,
    pub raw_output: Vec<u8>,
    pub encoded_glyphs: String,
}

/// Session lifecycle owned by the orchestrator. Transitions only move
/// forward within one submission attempt; `Complete` and `Failed` are
/// terminal until an explicit reset back to `Idle`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Idle,
    Submitting,
    AwaitingServer,
    Finalizing,
    Complete,
    Failed(SessionError),
}
