//! Converts raw wave outcomes into classified [`crate::model::MatchCandidate`]s.

pub mod assembler;


pub use assembler::{AssembledWave, ResultAssembler};
