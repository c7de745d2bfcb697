//! # psb-session
//!
//! Portable container sessions: a holder opens a container item from their
//! hand, edits its contents through a live view, and the edits are written
//! back into the item they came from.
//!
//! ## Overview
//!
//! This crate provides:
//! - **Session Registry**: at most one open session per holder
//! - **Open Protocol**: precondition checks, view seeding and titling
//! - **Interaction Guard**: vetoes for every action that could move or
//!   duplicate the source item while its view is open
//! - **Persistence**: deferred and final write-back with integrity checks
//! - **Integrity Faults**: terminate the session, never write
//!
//! ## Architecture
//!
//! ```text
//! Host event dispatch ──HostEvent──→ PortableContainerService
//!                                         │
//!                                         ├── HolderGateway   (hand items, permissions)
//!                                         ├── ViewPresenter   (open / close / read views)
//!                                         ├── ItemTaxonomy    (is this a container item?)
//!                                         └── DeferredScheduler ──DeferredTask──→ back into the service
//! ```
//!
//! ## Session Lifecycle
//!
//! ```text
//! [NO SESSION] ──open──→ [OPEN] ──view closed──→ [NO SESSION]
//!                           │                          ↑
//!                           ├──integrity fault─────────┤
//!                           └──shutdown────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use psb_session::{PortableContainerService, SessionConfig};
//! use psb_session::ports::PortableContainerApi;
//!
//! let mut service = PortableContainerService::new(
//!     SessionConfig::default(),
//!     taxonomy,
//!     holders,
//!     presenter,
//!     scheduler,
//! );
//!
//! if service.handle_event(&event).is_veto() {
//!     return;
//! }
//! ```

pub mod config;
pub mod domain;
pub mod events;
pub mod ports;
pub mod service;


pub use config::SessionConfig;
pub use domain::{
    ActiveSession, Contents, HolderId, IntegrityViolation, ItemStack, OpenOutcome,
    PersistOutcome, SessionError, SessionId, SessionStatus, ShutdownReport, SourceSlot,
    ViewHandle,
};
pub use events::{DeferredTask, HostEvent, Verdict};
pub use ports::PortableContainerApi;
pub use service::PortableContainerService;
