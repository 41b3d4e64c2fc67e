//! Real-time channel tests

mod broadcast_test;
mod socket_test;
