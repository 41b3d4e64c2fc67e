//! Test suite for cabalgata
//!
//! Router-level tests run against the real router built from a test
//! configuration. Tests that need PostgreSQL read `DATABASE_URL` and return
//! early when it is unset.

pub mod common;
pub mod integration;
