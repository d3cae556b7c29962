//! Feedback delivery: the one capability a session reports cues to
//!
//! Delivery is fire-and-forget. Sinks never fail the session.

use tracing::info;

use crate::types::Cue;

/// Receives coaching cues (speech, UI text, logs)
pub trait FeedbackSink: Send {
    fn report(&mut self, cue: &Cue);
}

/// Logs every cue at info
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl FeedbackSink for TracingSink {
    fn report(&mut self, cue: &Cue) {
        info!(cue = ?cue, phrase = %cue.phrase(), "feedback");
    }
}

/// Keeps cues in order until drained
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    cues: Vec<Cue>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    /// Take all cues collected so far
    pub fn drain(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }
}

impl FeedbackSink for CollectingSink {
    fn report(&mut self, cue: &Cue) {
        self.cues.push(*cue);
    }
}

impl<F> FeedbackSink for F
where
    F: FnMut(&Cue) + Send,
{
    fn report(&mut self, cue: &Cue) {
        self(cue)
    }
}
