//! Project references

use crate::diagnostics::{Diagnostic, messages};
use crate::paths::resolve_config_value;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// A dependency on another project, declared under `references`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectReference {
    /// Absolute path of the referenced config file or its directory
    #[schemars(description = "Resolved path of the referenced project")]
    pub path: PathBuf,

    /// `path` as written in the config
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prepend: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub circular: Option<bool>,
}

/// Config file a reference points at
///
/// A reference may name a directory, in which case its `tsconfig.json` is
/// meant.
pub fn resolve_project_reference_path(reference: &ProjectReference) -> PathBuf {
    if reference
        .path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    {
        reference.path.clone()
    } else {
        reference.path.join("tsconfig.json")
    }
}

/// Parse the `references` section, collecting soft errors for bad entries
pub(crate) fn parse_references(
    value: Option<&Value>,
    base_dir: &Path,
    errors: &mut Vec<Diagnostic>,
) -> Option<Vec<ProjectReference>> {
    let items = match value? {
        Value::Null => return None,
        Value::Array(items) => items,
        _ => {
            errors.push(messages::option_requires_type("references", "Array"));
            return None;
        }
    };

    let mut references = Vec::with_capacity(items.len());
    for item in items {
        let Some(entry) = item.as_object() else {
            errors.push(messages::option_requires_type("references", "object"));
            continue;
        };

        let Some(path) = entry.get("path").and_then(Value::as_str) else {
            errors.push(messages::option_requires_type("path", "string"));
            continue;
        };

        references.push(ProjectReference {
            path: resolve_config_value(base_dir, base_dir, path),
            original_path: Some(path.to_string()),
            prepend: entry.get("prepend").and_then(Value::as_bool),
            circular: entry.get("circular").and_then(Value::as_bool),
        });
    }

    Some(references)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::messages::OPTION_REQUIRES_TYPE;
    use serde_json::json;

    #[test]
    fn test_parse_references_resolves_paths() {
        let mut errors = Vec::new();
        let value = json!([{ "path": "../lib" }, { "path": "./tools/tsconfig.build.json", "prepend": true }]);

        let references = parse_references(Some(&value), Path::new("/repo/app"), &mut errors).unwrap();

        assert!(errors.is_empty());
        assert_eq!(references.len(), 2);
        assert_eq!(references[0].path, PathBuf::from("/repo/lib"));
        assert_eq!(references[0].original_path.as_deref(), Some("../lib"));
        assert_eq!(references[1].prepend, Some(true));
    }

    #[test]
    fn test_bad_entries_are_soft_errors() {
        let mut errors = Vec::new();
        let value = json!(["../lib", { "prepend": true }, { "path": "../ok" }]);

        let references = parse_references(Some(&value), Path::new("/repo/app"), &mut errors).unwrap();

        assert_eq!(references.len(), 1);
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.code == OPTION_REQUIRES_TYPE));
    }

    #[test]
    fn test_absent_references() {
        let mut errors = Vec::new();
        assert!(parse_references(None, Path::new("/repo"), &mut errors).is_none());
        assert!(parse_references(Some(&Value::Null), Path::new("/repo"), &mut errors).is_none());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_resolve_project_reference_path() {
        let reference = |path: &str| ProjectReference {
            path: PathBuf::from(path),
            original_path: None,
            prepend: None,
            circular: None,
        };

        assert_eq!(
            resolve_project_reference_path(&reference("/repo/lib")),
            PathBuf::from("/repo/lib/tsconfig.json")
        );
        assert_eq!(
            resolve_project_reference_path(&reference("/repo/lib/tsconfig.build.json")),
            PathBuf::from("/repo/lib/tsconfig.build.json")
        );
    }
}
