// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the configuration accessor.
//!
//! This module contains [`Config`], the implementation of the
//! [`Configuration`](crate::domain::Configuration) trait that callers use to look
//! values up.

pub mod config;

// Re-export commonly used types
pub use config::Config;
