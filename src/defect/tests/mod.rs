//! Unit tests for the defect lifecycle.

mod domain_tests;
