//! Nullable infrastructure for deterministic testing.
//!
//! External dependencies are abstracted behind the `cord-store` traits;
//! this crate provides test-friendly implementations that are controlled
//! programmatically and never touch the filesystem.
//!
//! Usage: swap real implementations for nullables in tests.

pub mod store;

pub use store::NullStore;
