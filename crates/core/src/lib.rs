//! Fastrac Core - Shared types library.
//!
//! This crate provides common types used across all Fastrac components:
//! - `storefront` - Catalog client, cart and auth state, checkout
//! - `cli` - Command-line storefront driver
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no storage access. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and money math

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
