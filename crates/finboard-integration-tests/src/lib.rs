//! Integration test crate for the finance dashboard.
//!
//! This crate has no library code. Its tests drive the payout flow across
//! the revenue, payout and client crates against a mocked finance API.
//!
//! ```sh
//! cargo test -p finboard-integration-tests
//! ```
