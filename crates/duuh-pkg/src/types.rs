//! Type definitions for upgrade reports

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PackageError;

/// Package manager family active inside an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistroFamily {
    /// apk (Alpine)
    Alpine,
    /// apt (Debian/Ubuntu)
    Debian,
    /// yum (CentOS/RHEL)
    Centos,
}

impl DistroFamily {
    /// Every supported family, in probe order
    pub const ALL: [DistroFamily; 3] = [
        DistroFamily::Alpine,
        DistroFamily::Debian,
        DistroFamily::Centos,
    ];

    /// Wire tag of the family
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DistroFamily::Alpine => "alpine",
            DistroFamily::Debian => "debian",
            DistroFamily::Centos => "centos",
        }
    }
}

impl fmt::Display for DistroFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistroFamily {
    type Err = PackageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DistroFamily::ALL
            .into_iter()
            .find(|family| family.as_str() == s)
            .ok_or_else(|| PackageError::UnhandledFamily(s.to_string()))
    }
}

/// Normalized result of one probe run
///
/// Serialized as `{"OsType": "<tag>", "Upgrades": [...]}`; this is the payload
/// exchanged between the in-container check and the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeReport {
    /// Family of the last package manager probed, `None` if none was found
    #[serde(rename = "OsType", with = "os_type")]
    pub distro_family: Option<DistroFamily>,
    /// Upgrade descriptors, verbatim tool output lines in detection order
    #[serde(rename = "Upgrades", default, deserialize_with = "null_as_empty")]
    pub upgrades: Vec<String>,
}

impl UpgradeReport {
    /// Create an empty report (no family detected)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any package manager ran
    #[must_use]
    pub fn is_detected(&self) -> bool {
        self.distro_family.is_some()
    }

    /// Whether there are pending upgrades
    #[must_use]
    pub fn has_upgrades(&self) -> bool {
        !self.upgrades.is_empty()
    }

    /// Record the output of one probed family
    ///
    /// The family tag is overwritten; upgrades accumulate.
    pub fn record(&mut self, family: DistroFamily, upgrades: impl IntoIterator<Item = String>) {
        self.distro_family = Some(family);
        self.upgrades.extend(upgrades);
    }

    /// Encode the report for the wire
    ///
    /// # Errors
    /// Returns `PackageError::Serialization` if encoding fails
    pub fn to_json(&self) -> Result<String, PackageError> {
        serde_json::to_string(self).map_err(|e| PackageError::Serialization(e.to_string()))
    }

    /// Decode a report from its wire form
    ///
    /// # Errors
    /// Returns the decoder error for malformed or incomplete payloads
    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }
}

/// `OsType` is an empty string when no family was detected
mod os_type {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DistroFamily;

    pub fn serialize<S: Serializer>(
        family: &Option<DistroFamily>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(family.map_or("", DistroFamily::as_str))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DistroFamily>, D::Error> {
        let tag = String::deserialize(deserializer)?;
        if tag.is_empty() {
            return Ok(None);
        }
        tag.parse().map(Some).map_err(D::Error::custom)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
