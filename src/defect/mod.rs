//! Defect lifecycle management.
//!
//! A defect is a problem reported against a project. It can be commented on,
//! carry file attachments, move through its status table and, once, be
//! converted into a task. Every mutation except creation is recorded in the
//! history ledger.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
