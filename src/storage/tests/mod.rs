//! Unit tests for blob storage adapters.
