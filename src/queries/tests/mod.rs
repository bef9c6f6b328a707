//! Read-model query tests.
