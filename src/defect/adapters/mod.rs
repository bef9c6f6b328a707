//! Adapter implementations of the defect port.

pub mod memory;
pub mod postgres;
