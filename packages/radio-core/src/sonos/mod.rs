//! Sonos speaker control and discovery.
//!
//! This module provides functionality for discovering and controlling Sonos speakers
//! on the local network using UPnP/SOAP protocols.
//!
//! # Module Structure
//!
//! - `types` - Domain types for zone groups, transport state and device handles
//! - `services` - UPnP service definitions (URNs, paths)
//! - `traits` - Trait abstractions for testability
//! - `client` - `SonosClientImpl` concrete trait implementation
//! - `zone_groups` - Zone group topology parsing and retrieval
//! - `device` - Device properties (room name)
//! - `playback` - TuneIn playback, stop and transport state
//! - `volume` - Per-speaker volume control
//! - `grouping` - Joining a speaker to a named group
//! - `discovery` - SSDP entry-point discovery
//! - `soap` - Low-level SOAP protocol implementation
//! - `utils` - Shared utility functions

pub mod client;
pub(crate) mod device;
pub mod discovery;
pub(crate) mod grouping;
pub(crate) mod playback;
pub mod services;
pub mod soap;
pub mod traits;
pub mod types;
pub mod utils;
pub(crate) mod volume;
pub mod zone_groups;

// Re-export domain types
pub use services::SonosService;

// Re-export trait abstractions
pub use traits::{SonosClient, SonosDiscovery, SonosPlayback, SonosSpeaker, SonosTopology};

// Re-export concrete implementation
pub use client::{create_http_client, SonosClientImpl};
