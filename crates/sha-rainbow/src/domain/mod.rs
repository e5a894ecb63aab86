//! Domain layer - Pure computational logic
//!
//! This module contains pure functions and algorithms without I/O dependencies.

pub mod chain;
pub mod codec;
pub mod config;
pub mod digest;
pub mod partition;
pub mod password;
pub mod reduction;
