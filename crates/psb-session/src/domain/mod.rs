//! # Domain Layer - Portable Container Sessions
//!
//! Pure session logic with no host access.
//!
//! ## Components
//!
//! - `entities`: HolderId, SourceSlot, ItemStack, Contents, ActiveSession
//! - `registry`: SessionRegistry (one session per holder)
//! - `classification`: content-change and container-transfer rules
//! - `value_objects`: OpenOutcome, PersistOutcome, ShutdownReport
//! - `errors`: SessionError, IntegrityViolation

pub mod classification;
pub mod entities;
pub mod errors;
pub mod registry;
pub mod value_objects;

pub use classification::*;
pub use entities::*;
pub use errors::*;
pub use registry::*;
pub use value_objects::*;
