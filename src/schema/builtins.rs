//! Built-in template variables
//!
//! Fixed reference data shared by every generated document. Nothing here is
//! derived from records.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::inference::DataType;

/// One built-in variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuiltinVariable {
    #[serde(skip)]
    pub key: &'static str,
    pub description: &'static str,
    pub data_type: DataType,
    pub access: &'static str,
}

/// A named group of built-in variables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinGroup {
    pub name: &'static str,
    pub variables: &'static [BuiltinVariable],
}

impl Serialize for BuiltinGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.variables.iter().map(|v| (v.key, v)))
    }
}

const fn var(
    key: &'static str,
    description: &'static str,
    data_type: DataType,
) -> BuiltinVariable {
    BuiltinVariable {
        key,
        description,
        data_type,
        access: key,
    }
}

/// The built-in variable table: project, version and document groups
pub static BUILTIN_GROUPS: &[BuiltinGroup] = &[
    BuiltinGroup {
        name: "project",
        variables: &[
            var("project.name", "Project name", DataType::String),
            var("project.id", "Project identifier", DataType::String),
        ],
    },
    BuiltinGroup {
        name: "version",
        variables: &[
            var("version.name", "Version name/number", DataType::String),
            var("version.id", "Version identifier", DataType::String),
            var(
                "version.isReleased",
                "Whether version is released",
                DataType::Boolean,
            ),
            var(
                "version.releaseDate",
                "Release date (if released)",
                DataType::Datetime,
            ),
        ],
    },
    BuiltinGroup {
        name: "document",
        variables: &[
            var("document.title", "Document title", DataType::String),
            var("document.date", "Document generation date", DataType::Datetime),
            var("document.version", "Document version", DataType::String),
        ],
    },
];

/// Serializable view of the built-in variable table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinCatalog(&'static [BuiltinGroup]);

impl BuiltinCatalog {
    pub fn groups(&self) -> &'static [BuiltinGroup] {
        self.0
    }

    /// Look up a variable by its full key, e.g. `version.name`
    pub fn get(&self, key: &str) -> Option<&'static BuiltinVariable> {
        self.0
            .iter()
            .flat_map(|group| group.variables.iter())
            .find(|v| v.key == key)
    }
}

impl Default for BuiltinCatalog {
    fn default() -> Self {
        Self(BUILTIN_GROUPS)
    }
}

impl Serialize for BuiltinCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for group in self.0 {
            map.serialize_entry(group.name, group)?;
        }
        map.end()
    }
}
