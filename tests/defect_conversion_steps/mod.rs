//! Step definitions for defect conversion scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
