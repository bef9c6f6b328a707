//! Unit tests for the history ledger.
