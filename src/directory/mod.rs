//! Users and projects owned by the external directory.
//!
//! The tracker never creates or edits users and projects. It only resolves
//! them by identifier to validate references and render display names.
//!
//! - Domain types in [`domain`]
//! - Port contract in [`ports`]
//! - Adapter implementations in [`adapters`]

pub mod adapters;
pub mod domain;
pub mod ports;
