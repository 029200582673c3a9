//! Domain newtypes with validation
//!
//! This module provides strongly-typed wrappers for the identifiers the
//! camera device reports. Each newtype ensures data validity at
//! construction time, so the rest of the engine never sees an empty
//! folder id or a photo name carrying a path separator.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

// ============================================================================
// FolderId
// ============================================================================

/// Identifier of a device-side storage folder
///
/// Cameras name these `102_1026`, `100__07`, or similar. A folder id is
/// never empty and never contains a path separator or whitespace, so it
/// can safely appear inside a local file name when disambiguation across
/// folders is needed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FolderId(String);

impl FolderId {
    /// Create a new FolderId
    ///
    /// # Errors
    /// Returns `DomainError::InvalidFolderId` if the id is empty or
    /// contains `/`, `\` or whitespace
    pub fn new(id: String) -> Result<Self, DomainError> {
        if id.is_empty() {
            return Err(DomainError::InvalidFolderId(
                "folder id cannot be empty".to_string(),
            ));
        }
        if id.chars().any(|c| c == '/' || c == '\\' || c.is_whitespace()) {
            return Err(DomainError::InvalidFolderId(format!(
                "folder id contains invalid characters: {id}"
            )));
        }
        Ok(Self(id))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for FolderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FolderId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for FolderId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<FolderId> for String {
    fn from(id: FolderId) -> Self {
        id.0
    }
}

// ============================================================================
// PhotoName
// ============================================================================

/// Device-reported file name of a photo
///
/// Unique within a folder, NOT globally unique: cameras restart their
/// four-digit counters when they roll over to a new folder, so
/// `IMGP0001.JPG` can exist in `101_0412` and `102_0412` simultaneously.
/// Deduplication therefore always pairs a PhotoName with its [`FolderId`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhotoName(String);

impl PhotoName {
    /// Create a new PhotoName
    ///
    /// # Errors
    /// Returns `DomainError::InvalidPhotoName` if the name is empty or
    /// contains a path separator
    pub fn new(name: String) -> Result<Self, DomainError> {
        if name.is_empty() {
            return Err(DomainError::InvalidPhotoName(
                "photo name cannot be empty".to_string(),
            ));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(DomainError::InvalidPhotoName(format!(
                "photo name contains a path separator: {name}"
            )));
        }
        if name == "." || name == ".." {
            return Err(DomainError::InvalidPhotoName(format!(
                "photo name is a directory reference: {name}"
            )));
        }
        Ok(Self(name))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The file extension, lowercased, without the dot
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        self.0
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }
}

impl Display for PhotoName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PhotoName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for PhotoName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<PhotoName> for String {
    fn from(name: PhotoName) -> Self {
        name.0
    }
}

// ============================================================================
// RemoteRef
// ============================================================================

/// Opaque reference the device API needs to fetch a photo's bytes
///
/// Device-dependent: a full URL path for FluCard-class devices, a
/// `folder/name` content path for Ricoh-style REST APIs. The engine never
/// inspects it; only the camera adapter constructs and consumes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RemoteRef(String);

impl RemoteRef {
    /// Create a new RemoteRef
    ///
    /// # Errors
    /// Returns `DomainError::InvalidRemoteRef` if the reference is empty
    pub fn new(reference: String) -> Result<Self, DomainError> {
        if reference.is_empty() {
            return Err(DomainError::InvalidRemoteRef(
                "remote ref cannot be empty".to_string(),
            ));
        }
        Ok(Self(reference))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RemoteRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RemoteRef {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for RemoteRef {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RemoteRef> for String {
    fn from(reference: RemoteRef) -> Self {
        reference.0
    }
}

// ============================================================================
// Tests
// ============================================================================
