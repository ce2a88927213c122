//! Centralized error types for the Radio Switch core library.
//!
//! Each layer defines its own `thiserror` enum close to the code that raises
//! it (`SoapError`, `DiscoveryError`, `SequencerError`). They all funnel into
//! [`RadioError`], which is what the controller returns and logs.

use thiserror::Error;

use crate::sequencer::SequencerError as QueueError;
use crate::sonos::discovery::DiscoveryError;
use crate::sonos::soap::SoapError;

/// Trait for error types that provide machine-readable error codes.
///
/// Codes are stable strings suitable for log filtering and for the host
/// binary's exit diagnostics.
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    fn code(&self) -> &'static str;
}

impl ErrorCode for DiscoveryError {
    fn code(&self) -> &'static str {
        match self {
            Self::SocketBind(_) => "socket_bind_failed",
            Self::NoInterfaces => "no_network_interfaces",
            Self::Receive(_) => "ssdp_receive_failed",
            Self::NoDevicesFound { .. } => "no_devices_found",
        }
    }
}

impl ErrorCode for SoapError {
    fn code(&self) -> &'static str {
        match self {
            Self::Http(_) => "http_request_failed",
            Self::HttpStatus(_, _) => "http_error_status",
            Self::Fault(_) => "soap_fault",
            Self::Parse(_) => "soap_parse_error",
            Self::UnknownGroup(_) => "unknown_group",
        }
    }
}

impl ErrorCode for QueueError {
    fn code(&self) -> &'static str {
        match self {
            Self::Closed => "sequencer_closed",
            Self::TaskAborted => "sequencer_task_aborted",
        }
    }
}

/// Application-wide error type for the radio controller.
#[derive(Debug, Error)]
pub enum RadioError {
    /// Entry-point discovery failed (SSDP/network issues).
    #[error("Discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    /// SOAP request to a Sonos speaker failed.
    #[error("SOAP request failed: {0}")]
    Soap(#[from] SoapError),

    /// The zone group topology could not be interpreted.
    #[error("Invalid topology: {0}")]
    Topology(String),

    /// The operation queue rejected or lost the task.
    #[error("Operation queue error: {0}")]
    Queue(#[from] QueueError),

    /// The operation did not settle within the configured timeout.
    #[error("Timed out after {0}s")]
    Timeout(u64),
}

impl RadioError {
    /// Returns a machine-readable error code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Discovery(e) => e.code(),
            Self::Soap(e) => e.code(),
            Self::Topology(_) => "invalid_topology",
            Self::Queue(e) => e.code(),
            Self::Timeout(_) => "timeout",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Result Type Aliases
// ─────────────────────────────────────────────────────────────────────────────

// Re-export Result type aliases from their defining modules
pub use crate::sequencer::SequencerError;
pub use crate::sonos::discovery::DiscoveryResult;
pub use crate::sonos::soap::SoapResult;

/// Convenient Result alias for controller operations.
pub type RadioResult<T> = Result<T, RadioError>;
