//! Core modules for GymBuddy

pub mod rep_counter;
pub mod angle;
pub mod signal;
pub mod feedback;
pub mod coach;
pub mod history;
pub mod api;

pub use rep_counter::RepCounter;
pub use angle::{calculate_angle, classify_back, classify_knee};
pub use signal::SignalStrategy;
pub use feedback::{FeedbackSink, TracingSink, CollectingSink};
pub use coach::{Coach, PostureLimits};
pub use history::SessionStore;
pub use api::{create_router, run_server};
