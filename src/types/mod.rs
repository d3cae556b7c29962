//! Core types for GymBuddy

mod phase;
mod sample;
mod event;
mod thresholds;
mod landmarks;
mod output;
mod reason;
mod session;

pub use phase::Phase;
pub use sample::Sample;
pub use event::{RepEvent, Cue, PostureVerdict, DepthVerdict};
pub use thresholds::{Thresholds, Direction};
pub use landmarks::{Landmark, Joint, PoseFrame, FrameInput};
pub use output::{ObserveOutput, FrameOutput};
pub use reason::ReasonCode;
pub use session::{SessionRecord, SignalStrategyKind};
