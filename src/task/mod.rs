//! Task lifecycle management.
//!
//! Tasks are assignable units of work. Most are born from a defect
//! conversion and keep a back-reference to that defect; status changes on
//! such tasks are mirrored into the defect's history. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
