//! DirectBank format version handling
//!
//! This module handles format version parsing and matching.
//! DirectBank uses a `major.minor.patch` version format (e.g. "2.3.1").
//!
//! Unlike semver there is no compatibility window: the settings document
//! loaded at startup must advertise exactly the version this client speaks,
//! otherwise loading fails.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Major component of the protocol version this client speaks
pub const PROTOCOL_MAJOR_VERSION: u8 = 2;

/// Minor component of the protocol version this client speaks
pub const PROTOCOL_MINOR_VERSION: u8 = 3;

/// Patch component of the protocol version this client speaks
pub const PROTOCOL_PATCH_VERSION: u8 = 1;

/// Protocol version string constant, sent in the `APIVersion` header and
/// stamped on every envelope as `formatVersion`
pub const PROTOCOL_VERSION: &str = "2.3.1";

/// Errors that can occur during version operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("Empty version string")]
    Empty,

    #[error("Invalid version format: '{0}'. Expected 'major.minor.patch' (e.g. '2.3.1')")]
    InvalidFormat(String),

    #[error("Invalid version component: '{0}'. Must be a non-negative integer")]
    InvalidComponent(String),

    #[error("Settings document declares format version {got}, this client speaks {expected}")]
    Mismatch { got: String, expected: String },
}

/// DirectBank format version representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormatVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl FormatVersion {
    /// Create a new version
    pub fn new(major: u8, minor: u8, patch: u8) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Get the protocol version this client speaks
    pub fn current() -> Self {
        Self::new(
            PROTOCOL_MAJOR_VERSION,
            PROTOCOL_MINOR_VERSION,
            PROTOCOL_PATCH_VERSION,
        )
    }

    /// Parse a version string
    ///
    /// # Examples
    ///
    /// ```
    /// use directbank_core::FormatVersion;
    ///
    /// let v = FormatVersion::parse("2.3.1").unwrap();
    /// assert_eq!(v.major, 2);
    /// assert_eq!(v.minor, 3);
    /// assert_eq!(v.patch, 1);
    /// ```
    pub fn parse(s: &str) -> Result<Self, VersionError> {
        if s.is_empty() {
            return Err(VersionError::Empty);
        }

        let parts: Vec<&str> = s.split('.').collect();

        if parts.len() != 3 {
            return Err(VersionError::InvalidFormat(s.to_string()));
        }

        let mut components = [0u8; 3];
        for (slot, part) in components.iter_mut().zip(&parts) {
            *slot = part
                .parse::<u8>()
                .map_err(|_| VersionError::InvalidComponent(part.to_string()))?;
        }

        Ok(Self::new(components[0], components[1], components[2]))
    }

    /// Check if this version is the one this client speaks
    pub fn is_current(&self) -> bool {
        *self == Self::current()
    }

    /// Require an exact match with the client's protocol version
    ///
    /// The bank and the client negotiate nothing at runtime; a settings
    /// document for another format version is unusable.
    pub fn require_current(&self) -> Result<(), VersionError> {
        if self.is_current() {
            Ok(())
        } else {
            Err(VersionError::Mismatch {
                got: self.to_string(),
                expected: Self::current().to_string(),
            })
        }
    }
}

impl Display for FormatVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for FormatVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Default for FormatVersion {
    fn default() -> Self {
        Self::current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_versions() {
        assert_eq!(
            FormatVersion::parse("2.3.1").unwrap(),
            FormatVersion::new(2, 3, 1)
        );
        assert_eq!(
            FormatVersion::parse("2.2.2").unwrap(),
            FormatVersion::new(2, 2, 2)
        );
        assert_eq!(
            FormatVersion::parse("10.0.0").unwrap(),
            FormatVersion::new(10, 0, 0)
        );
    }

    #[test]
    fn test_parse_invalid_versions() {
        assert!(matches!(FormatVersion::parse(""), Err(VersionError::Empty)));
        assert!(matches!(
            FormatVersion::parse("2.3"),
            Err(VersionError::InvalidFormat(_))
        ));
        assert!(matches!(
            FormatVersion::parse("2.3.1.0"),
            Err(VersionError::InvalidFormat(_))
        ));
        assert!(matches!(
            FormatVersion::parse("abc"),
            Err(VersionError::InvalidFormat(_))
        ));
        assert!(matches!(
            FormatVersion::parse("2.x.1"),
            Err(VersionError::InvalidComponent(_))
        ));
        assert!(matches!(
            FormatVersion::parse("-2.3.1"),
            Err(VersionError::InvalidComponent(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(FormatVersion::new(2, 3, 1).to_string(), "2.3.1");
        assert_eq!(FormatVersion::new(2, 2, 2).to_string(), "2.2.2");
    }

    #[test]
    fn test_from_str() {
        let version: FormatVersion = "2.3.1".parse().unwrap();
        assert_eq!(version, FormatVersion::new(2, 3, 1));
    }

    #[test]
    fn test_current_version() {
        let current = FormatVersion::current();
        assert_eq!(current.to_string(), PROTOCOL_VERSION);
        assert!(current.is_current());
    }

    #[test]
    fn test_require_current() {
        assert!(FormatVersion::parse(PROTOCOL_VERSION)
            .unwrap()
            .require_current()
            .is_ok());

        let err = FormatVersion::new(2, 2, 2).require_current().unwrap_err();
        assert_eq!(
            err,
            VersionError::Mismatch {
                got: "2.2.2".to_string(),
                expected: "2.3.1".to_string(),
            }
        );
    }

    #[test]
    fn test_default() {
        assert_eq!(FormatVersion::default(), FormatVersion::current());
    }
}
