//! IPC command handlers.
//!
//! Each submodule implements the commands for one IPC category.

pub mod diagnostics;
pub mod finance;
pub mod payout;
