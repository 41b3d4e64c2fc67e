//! Integration tests

mod database;
mod realtime;
