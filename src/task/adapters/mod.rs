//! Adapter implementations of the task port.

pub mod memory;
pub mod postgres;
