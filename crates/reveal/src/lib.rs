//! Press-and-hold reveal interaction for encoded result rows.
//!
//! Each displayed item starts `Concealed`, showing its glyph encoding. A
//! sustained press runs a single-shot hold timer; when it elapses the row
//! shows the original plaintext until release. Items reveal independently:
//! state lives in a map keyed by item index, so pressing one row never
//! disturbs another.

use std::{collections::HashMap, sync::Arc, time::Duration};

use shared::domain::OutputRecord;
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealState {
    #[default]
    Concealed,
    Revealing,
    Revealed,
}

/// Ties a scheduled hold timer to the press that started it. A token from
/// a superseded press never transitions the item, so a stray callback
/// firing after release is harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressToken {
    index: usize,
    epoch: u64,
}

#[derive(Debug, Default)]
struct ItemReveal {
    state: RevealState,
    epoch: u64,
}

/// Pure transition core, independent of any clock. Callers schedule the
/// hold timer themselves and report expiry through [`RevealBoard::hold_elapsed`].
#[derive(Debug, Default)]
pub struct RevealBoard {
    items: HashMap<usize, ItemReveal>,
}

impl RevealBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, index: usize) -> RevealState {
        self.items
            .get(&index)
            .map(|item| item.state)
            .unwrap_or_default()
    }

    /// Press initiated: the item enters `Revealing` and any timer from an
    /// earlier press on this item is invalidated.
    pub fn press_start(&mut self, index: usize) -> PressToken {
        let entry = self.items.entry(index).or_default();
        entry.epoch += 1;
        entry.state = RevealState::Revealing;
        PressToken {
            index,
            epoch: entry.epoch,
        }
    }

    /// Hold timer fired. Returns true when the item actually transitioned
    /// to `Revealed`; stale tokens are ignored.
    pub fn hold_elapsed(&mut self, token: PressToken) -> bool {
        match self.items.get_mut(&token.index) {
            Some(entry)
                if entry.epoch == token.epoch && entry.state == RevealState::Revealing =>
            {
                entry.state = RevealState::Revealed;
                true
            }
            _ => false,
        }
    }

    /// Press released. Before the timer elapses this cancels the reveal;
    /// after a full reveal it returns the item to `Concealed` (the reveal
    /// is momentary, not sticky).
    pub fn press_end(&mut self, index: usize) {
        if let Some(entry) = self.items.get_mut(&index) {
            entry.epoch += 1;
            entry.state = RevealState::Concealed;
        }
    }

    /// Clears every item, called when the session resets or the display
    /// tears down.
    pub fn reset(&mut self) {
        self.items.clear();
    }
}

/// What a result row shows for the given reveal state.
pub fn display_text(record: &OutputRecord, state: RevealState) -> &str {
    match state {
        RevealState::Revealed => &record.original_text,
        RevealState::Concealed | RevealState::Revealing => &record.encoded_glyphs,
    }
}

#[derive(Debug, Clone)]
pub enum RevealEvent {
    Revealed { index: usize },
}

/// [`RevealBoard`] plus real timers: each press spawns a single-shot sleep
/// task whose handle is owned here and aborted on release or reset, so no
/// callback can fire after the user has let go.
pub struct TimedRevealBoard {
    hold: Duration,
    board: Mutex<RevealBoard>,
    timers: Mutex<HashMap<usize, JoinHandle<()>>>,
    events: broadcast::Sender<RevealEvent>,
}

impl TimedRevealBoard {
    pub fn new(hold: Duration) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            hold,
            board: Mutex::new(RevealBoard::new()),
            timers: Mutex::new(HashMap::new()),
            events,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RevealEvent> {
        self.events.subscribe()
    }

    pub async fn state(&self, index: usize) -> RevealState {
        self.board.lock().await.state(index)
    }

    pub async fn press_start(self: &Arc<Self>, index: usize) {
        let token = self.board.lock().await.press_start(index);

        let this = Arc::clone(self);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(this.hold).await;
            if this.board.lock().await.hold_elapsed(token) {
                let _ = this.events.send(RevealEvent::Revealed { index });
            }
        });
        if let Some(previous) = self.timers.lock().await.insert(index, handle) {
            previous.abort();
        }
    }

    pub async fn press_end(&self, index: usize) {
        if let Some(handle) = self.timers.lock().await.remove(&index) {
            handle.abort();
        }
        self.board.lock().await.press_end(index);
    }

    pub async fn reset(&self) {
        let mut timers = self.timers.lock().await;
        for (_, handle) in timers.drain() {
            handle.abort();
        }
        self.board.lock().await.reset();
    }
}
