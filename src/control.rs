#[cfg(feature = "rtrb")]
use rtrb::Consumer;

use crate::coefficients::CoefficientExtras;

/// Per-voice control changes, applied at the next block boundary.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FilterMessage {
    SetCutoff { lane: usize, freq: f32 },
    SetResonance { lane: usize, resonance: f32 },
    SetExtras { lane: usize, extras: CoefficientExtras },
    SetActive { lane: usize, active: bool },
    ResetVoice { lane: usize },
    Freeze { lane: usize, frozen: bool },
}

impl FilterMessage {
    pub fn lane(&self) -> usize {
        match *self {
            FilterMessage::SetCutoff { lane, .. }
            | FilterMessage::SetResonance { lane, .. }
            | FilterMessage::SetExtras { lane, .. }
            | FilterMessage::SetActive { lane, .. }
            | FilterMessage::ResetVoice { lane }
            | FilterMessage::Freeze { lane, .. } => lane,
        }
    }
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<FilterMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<FilterMessage> {
    fn pop(&mut self) -> Option<FilterMessage> {
        Consumer::pop(self).ok()
    }
}

/// A pre-filled queue, mostly for hosts without a lock-free channel and for
/// tests.
impl MessageReceiver for std::collections::VecDeque<FilterMessage> {
    fn pop(&mut self) -> Option<FilterMessage> {
        self.pop_front()
    }
}
