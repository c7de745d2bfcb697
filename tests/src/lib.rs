//! # Portable Shulker Box Test Suite
//!
//! End-to-end tests driven through the runtime's event loop and in-memory
//! host.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── mod.rs          # Harness and item fixtures
//!     ├── scenarios.rs    # Open, title, edit, de-sync and nested container flows
//!     ├── properties.rs   # Session invariants under adversarial event streams
//!     └── replay.rs       # Journal and config files through the runtime
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p psb-tests
//! cargo test -p psb-tests integration::properties::
//! ```

pub mod integration;
