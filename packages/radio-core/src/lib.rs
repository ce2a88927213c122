//! Radio Core - shared library for Radio Switch.
//!
//! This crate turns every Sonos speaker on the local network into one logical
//! "radio" that can be switched on and off. Switching on merges all zone groups
//! into the first group, normalizes every speaker's volume, and starts a fixed
//! TuneIn station on the main coordinator. Switching off stops every group.
//!
//! # Architecture
//!
//! - [`sequencer`]: FIFO serialization of async tasks onto one timeline
//! - [`discovery_cache`]: Lazily discovered entry-point device with TTL
//! - [`topology`]: Pure helpers that flatten zone groups into speakers
//! - [`controller`]: `status` / `play` / `pause` orchestration
//! - [`accessory`]: On/off switch surface for a smart-home bridge
//! - [`sonos`]: Sonos speaker control and discovery (UPnP/SOAP)
//! - [`config`]: Core configuration
//! - [`error`]: Centralized error types
//!
//! # Abstraction Traits
//!
//! - [`TaskSpawner`](runtime::TaskSpawner): Spawning background tasks
//! - [`SonosClient`](sonos::SonosClient): Every network operation the controller needs
//!
//! The standalone binary wires [`SonosClientImpl`] and [`TokioSpawner`]; tests
//! substitute recording mocks.

#![warn(clippy::all)]

pub mod accessory;
pub mod config;
pub mod controller;
pub mod discovery_cache;
pub mod error;
pub mod protocol_constants;
pub mod runtime;
pub mod sequencer;
pub mod sonos;
pub mod topology;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types at the crate root
pub use accessory::RadioSwitch;
pub use config::{Config, VolumePolicy};
pub use controller::DeviceController;
pub use discovery_cache::DeviceCache;
pub use error::{
    DiscoveryResult, ErrorCode, RadioError, RadioResult, SequencerError, SoapResult,
};
pub use runtime::{TaskSpawner, TokioSpawner, TrackedSpawner};
pub use sequencer::Sequencer;
pub use topology::Speaker;

// Re-export Sonos types
pub use sonos::types::{DeviceHandle, TransportState, ZoneGroup, ZoneGroupMember};
pub use sonos::{SonosClient, SonosClientImpl};
