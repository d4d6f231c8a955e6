//! Project and version metadata

use serde::{Deserialize, Serialize};

/// Project metadata as returned by the record source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ProjectInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A project version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_released: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

impl VersionInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>, is_released: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            is_released,
            release_date: None,
        }
    }
}

/// Pick the version a document describes.
///
/// An explicit id wins when it exists. Otherwise the last released version
/// is chosen, falling back to the last version overall.
pub fn select_version<'a>(
    versions: &'a [VersionInfo],
    requested: Option<&str>,
) -> Option<&'a VersionInfo> {
    if let Some(id) = requested {
        return versions.iter().find(|v| v.id == id);
    }

    versions
        .iter()
        .rev()
        .find(|v| v.is_released)
        .or_else(|| versions.last())
}

/// Entry of the item listing used for type discovery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRef {
    #[serde(default)]
    pub id: Option<String>,
}

impl ItemRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: Some(id.into()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn versions() -> Vec<VersionInfo> {
        vec![
            VersionInfo::new("v1", "1.0", true),
            VersionInfo::new("v2", "1.1", true),
            VersionInfo::new("v3", "2.0", false),
        ]
    }

    #[test]
    fn test_select_last_released() {
        let versions = versions();
        assert_eq!(select_version(&versions, None).unwrap().id, "v2");
    }

    #[test]
    fn test_select_last_when_none_released() {
        let versions = vec![
            VersionInfo::new("v1", "1.0", false),
            VersionInfo::new("v2", "1.1", false),
        ];
        assert_eq!(select_version(&versions, None).unwrap().id, "v2");
    }

    #[test]
    fn test_select_requested() {
        let versions = versions();
        assert_eq!(select_version(&versions, Some("v3")).unwrap().name, "2.0");
        assert!(select_version(&versions, Some("missing")).is_none());
        assert!(select_version(&[], None).is_none());
    }

    #[test]
    fn test_version_deserialization_defaults() {
        let version: VersionInfo = serde_json::from_str(r#"{"id": "v1", "name": "1.0"}"#).unwrap();
        assert!(!version.is_released);
        assert!(version.release_date.is_none());
    }
}
