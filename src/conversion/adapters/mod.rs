//! Adapter implementations of the conversion port.

pub mod memory;
pub mod postgres;
