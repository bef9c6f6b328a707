//! Defect-to-task conversion.
//!
//! Conversion creates a task from a defect, links the two and records an
//! `assigned` entry in the defect's history. The task insert and the defect
//! update commit together through [`ports::ConversionRepository`], whose
//! defect update only succeeds while the defect is still unconverted. Two
//! concurrent conversions of one defect therefore produce exactly one task.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
