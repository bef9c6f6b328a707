//! Blob storage for defect attachments.
//!
//! Attachment bytes live outside the database. The tracker stores them
//! through the [`ports::BlobStorage`] port and keeps only the returned
//! storage path on the attachment record.

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod tests;
