//! Shared utilities for Hiroba.

pub mod logger;
pub mod time;
