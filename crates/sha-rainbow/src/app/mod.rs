//! Application layer - Use case implementations
//!
//! This module coordinates domain and infrastructure layers to implement use cases.

pub mod attacker;
pub mod cancel;
pub mod generator;
pub mod registry;
