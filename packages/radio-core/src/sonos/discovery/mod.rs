//! Entry-point discovery for Sonos households.
//!
//! Any single player can answer topology queries for the whole household, so
//! discovery stops at the first responder.

mod ssdp;
mod types;

pub use ssdp::{discover_first, SsdpConfig};
pub use types::{DiscoveredSpeaker, DiscoveryError, DiscoveryResult};
