//! # psb-runtime
//!
//! Runs the portable container session service on a single-threaded event
//! loop against an in-memory host.
//!
//! ## Modules
//!
//! - `event_loop`: the loop, its queue and the channel-backed scheduler
//! - `host`: in-memory host and shulker box taxonomy
//! - `journal`: recorded setups and event streams for replay
//! - `config`: TOML runtime configuration
//! - `telemetry`: tracing subscriber setup
//!
//! ## Example
//!
//! ```rust,ignore
//! use psb_runtime::{SessionEventLoop, RuntimeConfig};
//!
//! let config = RuntimeConfig::load("psb.toml")?;
//! let (mut event_loop, host) = SessionEventLoop::in_memory(config.session);
//! journal.install(&host);
//! for event in journal.events {
//!     event_loop.submit(event);
//! }
//! event_loop.run_until_idle();
//! let report = event_loop.shutdown();
//! ```

pub mod config;
pub mod event_loop;
pub mod host;
pub mod journal;
pub mod telemetry;

pub use config::{ConfigError, LoggingConfig, RuntimeConfig};
pub use event_loop::{
    loop_channel, ChannelScheduler, LoopMessage, LoopSender, LoopStats, SessionEventLoop,
};
pub use host::{HostWorld, InMemoryHost, ShulkerTaxonomy};
pub use journal::{HolderSetup, Journal};
pub use telemetry::{init_tracing, TelemetryError};
