//! Controller layer: workflow commands/events, reducer-like state transitions, and command orchestration.

pub mod events;
pub mod orchestration;
pub mod progress;
pub mod reducer;
pub mod state;
pub mod view;
