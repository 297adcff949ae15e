//! Integration test suite for larc
//!
//! End-to-end tests that drive providers through the public API: resolving
//! configuration against contexts, following redirects, sharing artifacts
//! through the cache, and surfacing failures.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! Tests are organized by functionality area:
//! - **determinism**: resolution idempotence and artifact reuse
//! - **errors**: failure surfaces and not-required downgrades
//! - **file_locations**: file-backed resolution with base directories
//! - **imports**: cross-provider imports and cycle detection
//! - **precedence**: override/import/context/variant/default ordering
//! - **redirects**: descriptor chains, metadata merging, hop bounds
//! - **sharing**: artifact identity across sharable providers
//! - **specs**: declarative TOML provider specs

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod file_locations;
mod imports;
mod sharing;
mod specs;
