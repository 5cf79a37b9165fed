//! Core types and utilities for the predator-prey grid ecology.

pub mod types;
pub mod config;
pub mod error;
pub mod census;

pub use error::{Error, Result};
pub use types::*;
pub use config::*;
pub use census::*;
