//! CLI Command handlers
//!
//! This module contains the implementation of CLI command handlers
//! kept out of main.rs so they stay testable as library code.

pub mod new;
