//! Reading a config file into its raw, unresolved form

use crate::diagnostics::{Diagnostic, Location, messages};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io;
use std::path::{Path, PathBuf};

/// A config file's JSON object exactly as written
///
/// No `extends` merging and no path resolution has been applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawConfig(pub Map<String, Value>);

impl RawConfig {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn compiler_options(&self) -> Option<&Map<String, Value>> {
        self.get("compilerOptions").and_then(Value::as_object)
    }

    pub fn extends(&self) -> Option<&Value> {
        self.get("extends")
    }

    pub fn files(&self) -> Option<Vec<&str>> {
        self.string_list("files")
    }

    pub fn include(&self) -> Option<Vec<&str>> {
        self.string_list("include")
    }

    pub fn exclude(&self) -> Option<Vec<&str>> {
        self.string_list("exclude")
    }

    pub fn references(&self) -> Option<&Value> {
        self.get("references")
    }

    fn string_list(&self, key: &str) -> Option<Vec<&str>> {
        self.get(key)
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
    }
}

/// The text a config was parsed from, kept for locating diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonSourceFile {
    pub path: PathBuf,
    pub text: String,
}

/// Outcome of reading a config file
#[derive(Debug, Clone)]
pub struct ReadConfigResult {
    /// Empty when `error` is set
    pub config: RawConfig,
    pub source: JsonSourceFile,
    pub error: Option<Diagnostic>,
}

/// Read and parse a config file through `read_file`.
///
/// A failing `read_file` is returned as is. Syntax problems are reported
/// through [`ReadConfigResult::error`].
pub fn read_config_file<F>(path: &Path, read_file: F) -> io::Result<ReadConfigResult>
where
    F: FnOnce(&Path) -> io::Result<String>,
{
    let text = read_file(path)?;
    Ok(parse_config_text(path, text))
}

/// Parse config text (JSON with comments and trailing commas)
pub fn parse_config_text(path: &Path, text: String) -> ReadConfigResult {
    let body = text.strip_prefix('\u{feff}').unwrap_or(&text);

    let parsed = if body.trim().is_empty() {
        Ok(Value::Object(Map::new()))
    } else {
        json5::from_str::<Value>(body).map_err(|e| syntax_diagnostic(path, body, e))
    };

    let (config, error) = match parsed {
        Ok(Value::Object(map)) => (RawConfig::new(map), None),
        Ok(_) => {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "tsconfig.json".to_string());
            let diagnostic = messages::root_not_object(&file_name)
                .with_file(path)
                .with_location(Location::from_offset(body, first_token_offset(body), 1));
            (RawConfig::default(), Some(diagnostic))
        }
        Err(diagnostic) => (RawConfig::default(), Some(diagnostic)),
    };

    ReadConfigResult {
        config,
        source: JsonSourceFile {
            path: path.to_path_buf(),
            text,
        },
        error,
    }
}

fn syntax_diagnostic(path: &Path, body: &str, error: json5::Error) -> Diagnostic {
    let json5::Error::Message { msg, location } = error;

    let diagnostic = messages::syntax_error(&describe_syntax_error(&msg)).with_file(path);
    match location {
        Some(loc) => diagnostic.with_location(Location::from_line_column(
            body,
            loc.line,
            loc.column,
            1,
        )),
        None => diagnostic,
    }
}

/// json5 hands back pest's multi-line report; keep only its summary line
fn describe_syntax_error(msg: &str) -> String {
    msg.lines()
        .rev()
        .find_map(|line| line.trim().strip_prefix("= "))
        .map(|summary| {
            let mut summary = summary.to_string();
            if let Some(first) = summary.get_mut(0..1) {
                first.make_ascii_uppercase();
            }
            if !summary.ends_with('.') {
                summary.push('.');
            }
            summary
        })
        .unwrap_or_else(|| msg.trim().to_string())
}

fn first_token_offset(body: &str) -> usize {
    body.len() - body.trim_start().len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::messages::{ROOT_NOT_OBJECT, SYNTAX_ERROR};

    fn parse(text: &str) -> ReadConfigResult {
        parse_config_text(Path::new("/p/tsconfig.json"), text.to_string())
    }

    #[test]
    fn test_parse_jsonc() {
        let result = parse(
            r#"{
                // comment
                "compilerOptions": {
                    "strict": true, /* block */
                },
                "include": ["src"],
            }"#,
        );

        assert!(result.error.is_none());
        assert_eq!(result.config.include(), Some(vec!["src"]));
        assert_eq!(
            result.config.compiler_options().unwrap()["strict"],
            Value::Bool(true)
        );
    }

    #[test]
    fn test_raw_config_preserves_key_order() {
        let result = parse(r#"{ "include": [], "compilerOptions": {}, "files": [] }"#);
        let keys: Vec<_> = result.config.as_map().keys().cloned().collect();
        assert_eq!(keys, vec!["include", "compilerOptions", "files"]);
    }

    #[test]
    fn test_syntax_error_has_location() {
        let result = parse("{\n  \"compilerOptions\": {\n    \"strict\": true,,\n  }\n}");

        let error = result.error.expect("syntax error expected");
        assert_eq!(error.code, SYNTAX_ERROR);
        assert_eq!(error.file.as_deref(), Some(Path::new("/p/tsconfig.json")));
        let location = error.location.expect("location expected");
        assert_eq!(location.line, 3);
        assert!(result.config.as_map().is_empty());
    }

    #[test]
    fn test_empty_file_is_empty_object() {
        let result = parse("  \n");
        assert!(result.error.is_none());
        assert!(result.config.as_map().is_empty());
    }

    #[test]
    fn test_bom_is_ignored() {
        let result = parse("\u{feff}{ \"files\": [\"a.ts\"] }");
        assert!(result.error.is_none());
        assert_eq!(result.config.files(), Some(vec!["a.ts"]));
    }

    #[test]
    fn test_root_must_be_object() {
        let result = parse("[1, 2]");
        let error = result.error.expect("root error expected");
        assert_eq!(error.code, ROOT_NOT_OBJECT);
        assert!(error.message.contains("'tsconfig.json'"));
    }

    #[test]
    fn test_read_config_file_propagates_io_errors() {
        let result = read_config_file(Path::new("/p/tsconfig.json"), |_| {
            Err(io::Error::new(io::ErrorKind::NotFound, "gone"))
        });
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_describe_syntax_error_takes_summary() {
        let msg = " --> 1:3\n  |\n1 | {,}\n  |  ^---\n  |\n  = expected identifier or string";
        assert_eq!(describe_syntax_error(msg), "Expected identifier or string.");
    }
}
