//! Tip Points Library
//!
//! Grows and shrinks a point set at the tip of a deforming beam on key
//! presses, keeping topology and both position layers consistent.

pub mod resources;
pub mod simulation;
