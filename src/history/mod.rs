//! Append-only audit trail of actions taken against defects.
//!
//! Every mutation of a defect, and every status change of a task converted
//! from a defect, is recorded here as an immutable [`domain::HistoryEntry`].
//! The API deliberately offers no way to edit or remove an entry: the
//! repository port exposes `append` and `list_for` only.
//!
//! - Domain types in [`domain`]
//! - Port contract in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The ledger service in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
