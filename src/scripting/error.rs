//! Host result codes

use thiserror::Error;

/// Raw result code from the host's descriptor suite.
///
/// Codes are passed back to the host exactly as received.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("host error {0}")]
pub struct HostError(pub i16);

impl HostError {
    /// A requested key was absent from the record
    pub const MISSING_PARAMETER: HostError = HostError(-1715);
    /// Malformed record or value of the wrong type
    pub const BAD_PARAMETER: HostError = HostError(-50);
    /// Allocation failure inside the host
    pub const OUT_OF_MEMORY: HostError = HostError(-108);

    pub fn code(self) -> i16 {
        self.0
    }

    pub fn is_missing_parameter(self) -> bool {
        self == Self::MISSING_PARAMETER
    }
}

impl From<std::io::Error> for HostError {
    fn from(_: std::io::Error) -> Self {
        HostError::BAD_PARAMETER
    }
}
