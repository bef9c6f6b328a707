//! Defectflow: defect tracking core.
//!
//! This crate tracks defects reported against projects, converts them into
//! assignable tasks, and keeps an append-only audit trail of every action
//! taken on a defect.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: In-memory and `PostgreSQL` implementations of ports
//! - **Services**: Orchestration over ports
//!
//! # Modules
//!
//! - [`directory`]: Users and projects owned by an external directory
//! - [`storage`]: Attachment blob storage
//! - [`history`]: Append-only defect history ledger
//! - [`defect`]: Defect reporting, comments, attachments and status
//! - [`task`]: Task creation and status changes
//! - [`conversion`]: Atomic defect-to-task conversion
//! - [`queries`]: Display read models
//! - [`config`], [`telemetry`], [`persistence`], [`error`]: process plumbing

pub mod config;
pub mod conversion;
pub mod defect;
pub mod directory;
pub mod error;
pub mod history;
pub mod persistence;
pub mod queries;
pub mod storage;
pub mod task;
pub mod telemetry;
