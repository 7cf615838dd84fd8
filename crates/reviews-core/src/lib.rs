//! Core types and trait definitions for the reviews service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

pub mod category;
pub mod error;
pub mod page;
pub mod review;
pub mod stats;
pub mod store;

pub use error::{Error, Result};
