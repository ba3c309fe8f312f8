pub mod curator;
pub mod parser;
pub mod prompts;
pub mod templates;

pub use curator::{Curator, FailureGate, Tier};
