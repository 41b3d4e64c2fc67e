//! Database-backed tests

mod cascade_test;
