//! Unit tests for defect-to-task conversion.
