//! Adapter implementations of the history port.

pub mod memory;
pub mod postgres;
