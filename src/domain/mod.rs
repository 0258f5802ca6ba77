//! Domain types for the review agent.
//! Defines the data structures shared by the linter runner, the AI reviewer
//! and the feedback publisher.

pub mod error;
pub mod issue;

pub use error::*;
pub use issue::*;
