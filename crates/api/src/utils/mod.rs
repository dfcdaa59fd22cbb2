//! Helpers shared by the console commands and the binary.

pub mod command_helpers;
pub mod health;
pub mod logging;
