//! Flattening zone groups into addressable speakers.
//!
//! Pure functions: no I/O, no caching. The controller rebuilds these views
//! from a fresh topology on every operation.

use std::fmt;

use crate::error::{RadioError, RadioResult};
use crate::sonos::types::{ZoneGroup, ZoneGroupMember};

/// A reachable playback unit, identified by its bare host address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Speaker {
    host: String,
}

impl Speaker {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    /// Address used for every SOAP request to this speaker.
    pub fn host(&self) -> &str {
        &self.host
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.host)
    }
}

/// Extracts the bare host from an advertised location URL.
///
/// `http://192.168.1.10:1400/xml/device_description.xml` yields
/// `192.168.1.10`. Returns `None` when no host remains.
pub fn host_from_location(location: &str) -> Option<&str> {
    let rest = location
        .split_once("://")
        .map_or(location, |(_, rest)| rest);
    let authority = rest.split('/').next().unwrap_or(rest);
    let host = authority.split(':').next().unwrap_or(authority);

    (!host.is_empty()).then_some(host)
}

fn speaker_for(member: &ZoneGroupMember) -> RadioResult<Speaker> {
    host_from_location(&member.location)
        .map(Speaker::new)
        .ok_or_else(|| {
            RadioError::Topology(format!(
                "member {} has no host in location {:?}",
                member.uuid, member.location
            ))
        })
}

/// One speaker per member of `group`, in advertised order.
pub fn members_of(group: &ZoneGroup) -> RadioResult<Vec<Speaker>> {
    group.members.iter().map(speaker_for).collect()
}

/// The speaker that accepts playback commands for `group`.
pub fn coordinator_of(group: &ZoneGroup) -> RadioResult<Speaker> {
    let member = group.coordinator().ok_or_else(|| {
        RadioError::Topology(format!(
            "group {} has no member matching coordinator {}",
            group.id, group.coordinator_uuid
        ))
    })?;
    speaker_for(member)
}

/// Order-preserving concatenation.
pub fn flatten<T>(nested: Vec<Vec<T>>) -> Vec<T> {
    nested.into_iter().flatten().collect()
}
