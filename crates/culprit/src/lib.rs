#![doc = include_str!("../README.md")]

pub mod engine;
mod session;
mod state;
mod types;

pub use engine::StepOutcome;
pub use session::{BisectSession, Selection};
pub use state::{BisectAction, BisectState, reduce, status_map};
pub use types::{BisectStatus, CommitRef};
