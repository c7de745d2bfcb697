//! Ports layer for the session subsystem.
//!
//! - Inbound (Driving): `PortableContainerApi`, the event entry points
//! - Outbound (Driven): taxonomy, holder, presenter and scheduler services

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
