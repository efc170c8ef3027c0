//! Integration tests for GrabTUI
//!
//! Tests are organized by component:
//! - api_test: backend client tests (auth, envelopes, search, details)
//! - download_test: download queue and history endpoint tests
//! - e2e_test: end-to-end flow tests (Search -> Resources -> Download)

// Note: Each test file is a separate integration test crate
// Tests are run individually by cargo, not via mod.rs
