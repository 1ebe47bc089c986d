//! Turning a raw config object into resolved options and inputs

use super::declarations::convert_compiler_options;
use super::extends::resolve_extends_chain;
use super::matcher::{FileSpecs, PACKAGE_FOLDERS, match_files};
use super::options::CompilerOptions;
use super::reader::{JsonSourceFile, RawConfig};
use super::references::{ProjectReference, parse_references};
use crate::diagnostics::{Diagnostic, messages};
use crate::host::ConfigHost;
use crate::paths::{relative_to, to_slash};
use indexmap::IndexMap;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Why resolution stopped
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The config, or one it extends, could not be read or parsed
    #[error("{}", .0.message)]
    Diagnostic(Box<Diagnostic>),

    /// Resolution could not continue (bad glob, unreadable directory, ...)
    #[error("{message}")]
    Failure { message: String },
}

impl ResolveError {
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }
}

impl From<Diagnostic> for ResolveError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self::Diagnostic(Box::new(diagnostic))
    }
}

/// A fully resolved config
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedCommandLine {
    pub options: CompilerOptions,
    pub file_names: Vec<PathBuf>,
    pub project_references: Option<Vec<ProjectReference>>,
    /// Soft errors: reported, but the rest of the result is usable
    pub errors: Vec<Diagnostic>,
    /// Directories whose contents feed `file_names`, and whether nested
    /// directories count
    pub wildcard_directories: IndexMap<PathBuf, bool>,
    pub compile_on_save: bool,
    /// Base configs read through `extends`, in load order
    pub extended_config_paths: Vec<PathBuf>,
}

/// Resolve `raw` against `base_dir`.
///
/// `source` is the file `raw` was read from; it anchors diagnostics and
/// stops a config from extending itself. Problems with individual options
/// or specs end up in [`ParsedCommandLine::errors`].
pub fn parse_json_config_file_content(
    raw: &RawConfig,
    host: &dyn ConfigHost,
    base_dir: &Path,
    source: Option<&JsonSourceFile>,
) -> Result<ParsedCommandLine, ResolveError> {
    let config_file = source.map(|s| s.path.as_path());
    let chain = resolve_extends_chain(raw, source, host, base_dir, config_file)?;
    let merged = chain.merged;
    let mut errors = chain.errors;

    let converted =
        convert_compiler_options(&merged.compiler_options, base_dir, &merged.option_sources)
            .map_err(|e| ResolveError::failure(format!("Invalid compiler options: {e}")))?;
    let mut options = converted.options;
    errors.extend(converted.errors);

    if options.paths.is_some() {
        options.paths_base_path = merged.paths_base_path.clone();
    }
    options.config_file_path = config_file.map(Path::to_path_buf);

    check_option_conflicts(&options, &mut errors);

    let files = string_list("files", merged.files.as_ref(), &mut errors);
    let include = string_list("include", merged.include.as_ref(), &mut errors);
    let exclude = string_list("exclude", merged.exclude.as_ref(), &mut errors);

    let specs = FileSpecs {
        files: files.clone().unwrap_or_default(),
        include: match (&files, &include) {
            (None, None) => vec![to_slash(&base_dir.join("**/*"))],
            _ => include.clone().unwrap_or_default(),
        },
        exclude: exclude.unwrap_or_else(|| default_excludes(&options, base_dir)),
    };

    let matched = match_files(&specs, &options, host)?;
    errors.extend(matched.errors);

    let project_references = parse_references(raw.references(), base_dir, &mut errors);
    let config_file_name = config_file
        .map(Path::to_path_buf)
        .unwrap_or_else(|| base_dir.join("tsconfig.json"));

    if matched.file_names.is_empty() {
        let has_references = project_references.as_ref().is_some_and(|r| !r.is_empty());
        match (&files, &include) {
            (Some(files), None) if files.is_empty() => {
                if !has_references {
                    errors.push(messages::empty_files_list(&config_file_name));
                }
            }
            _ => {
                let relative = |specs: &[String]| -> Vec<String> {
                    specs
                        .iter()
                        .map(|spec| relative_to(Path::new(spec), base_dir))
                        .collect()
                };
                errors.push(messages::no_inputs_found(
                    &config_file_name,
                    &relative(&specs.include),
                    &relative(&specs.exclude),
                ));
            }
        }
    }

    debug!(
        "Resolved {} input files from {}",
        matched.file_names.len(),
        config_file_name.display()
    );

    Ok(ParsedCommandLine {
        options,
        file_names: matched.file_names,
        project_references,
        errors,
        wildcard_directories: matched.wildcard_directories,
        compile_on_save: merged
            .compile_on_save
            .as_ref()
            .and_then(Value::as_bool)
            .unwrap_or(false),
        extended_config_paths: chain.extended_files,
    })
}

/// Read a list-of-strings section, dropping entries of the wrong type
fn string_list(
    name: &str,
    value: Option<&Value>,
    errors: &mut Vec<Diagnostic>,
) -> Option<Vec<String>> {
    match value? {
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| match item.as_str() {
                    Some(s) => Some(s.to_string()),
                    None => {
                        errors.push(messages::option_requires_type(name, "string"));
                        None
                    }
                })
                .collect(),
        ),
        _ => {
            errors.push(messages::option_requires_type(name, "Array"));
            None
        }
    }
}

/// Package folders plus the emit directories
fn default_excludes(options: &CompilerOptions, base_dir: &Path) -> Vec<String> {
    PACKAGE_FOLDERS
        .iter()
        .map(|folder| to_slash(&base_dir.join(folder)))
        .chain(options.out_dir.iter().map(|dir| to_slash(dir)))
        .chain(options.declaration_dir.iter().map(|dir| to_slash(dir)))
        .collect()
}

fn check_option_conflicts(options: &CompilerOptions, errors: &mut Vec<Diagnostic>) {
    let declares = options.emits_declarations();

    if options.emit_declaration_only == Some(true) && !declares {
        errors.push(messages::option_requires_one_of(
            "emitDeclarationOnly",
            "declaration",
            "composite",
        ));
    }
    if options.declaration_dir.is_some() && !declares {
        errors.push(messages::option_requires_one_of(
            "declarationDir",
            "declaration",
            "composite",
        ));
    }

    if options.no_emit == Some(true) && options.emit_declaration_only == Some(true) {
        errors.push(messages::option_conflict("noEmit", "emitDeclarationOnly"));
    }
    if options.source_map == Some(true) && options.inline_source_map == Some(true) {
        errors.push(messages::option_conflict("sourceMap", "inlineSourceMap"));
    }

    if options.composite == Some(true) && options.declaration == Some(false) {
        errors.push(messages::composite_disables_declaration());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::messages::{
        COMPOSITE_DISABLES_DECLARATION, EMPTY_FILES_LIST, NO_INPUTS_FOUND, OPTION_CONFLICT,
        OPTION_REQUIRES_ONE_OF, OPTION_REQUIRES_TYPE, UNKNOWN_COMPILER_OPTION,
    };
    use crate::host::FsHost;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, rel: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn raw(value: Value) -> RawConfig {
        match value {
            Value::Object(map) => RawConfig::new(map),
            _ => panic!("config must be an object"),
        }
    }

    fn codes(parsed: &ParsedCommandLine) -> Vec<u32> {
        parsed.errors.iter().map(|e| e.code).collect()
    }

    #[test]
    fn test_default_include_and_excludes() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "src/a.ts");
        touch(root, "dist/a.d.ts");
        touch(root, "node_modules/x/index.ts");

        let config = raw(json!({ "compilerOptions": { "outDir": "dist" } }));
        let parsed = parse_json_config_file_content(&config, &FsHost, root, None).unwrap();

        assert_eq!(parsed.file_names, vec![root.join("src/a.ts")]);
        assert_eq!(parsed.options.out_dir, Some(root.join("dist")));
        assert!(parsed.errors.is_empty());
    }

    #[test]
    fn test_unknown_option_is_soft() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "a.ts");

        let config = raw(json!({ "compilerOptions": { "strict": true, "notAnOption": 1 } }));
        let parsed =
            parse_json_config_file_content(&config, &FsHost, temp_dir.path(), None).unwrap();

        assert_eq!(parsed.options.strict, Some(true));
        assert_eq!(codes(&parsed), vec![UNKNOWN_COMPILER_OPTION]);
    }

    #[test]
    fn test_option_conflicts() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "a.ts");

        let config = raw(json!({
            "compilerOptions": {
                "emitDeclarationOnly": true,
                "noEmit": true,
                "sourceMap": true,
                "inlineSourceMap": true,
            }
        }));
        let parsed =
            parse_json_config_file_content(&config, &FsHost, temp_dir.path(), None).unwrap();

        assert_eq!(
            codes(&parsed),
            vec![OPTION_REQUIRES_ONE_OF, OPTION_CONFLICT, OPTION_CONFLICT]
        );
    }

    #[test]
    fn test_composite_with_declaration_disabled() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "a.ts");

        let config = raw(json!({ "compilerOptions": { "composite": true, "declaration": false } }));
        let parsed =
            parse_json_config_file_content(&config, &FsHost, temp_dir.path(), None).unwrap();

        assert_eq!(codes(&parsed), vec![COMPOSITE_DISABLES_DECLARATION]);
    }

    #[test]
    fn test_no_inputs_found() {
        let temp_dir = TempDir::new().unwrap();

        let config = raw(json!({ "include": ["src"] }));
        let parsed =
            parse_json_config_file_content(&config, &FsHost, temp_dir.path(), None).unwrap();

        assert_eq!(codes(&parsed), vec![NO_INPUTS_FOUND]);
        assert!(parsed.errors[0].message.contains(r#"'["src"]'"#));
    }

    #[test]
    fn test_empty_files_list() {
        let temp_dir = TempDir::new().unwrap();

        let config = raw(json!({ "files": [] }));
        let parsed =
            parse_json_config_file_content(&config, &FsHost, temp_dir.path(), None).unwrap();
        assert_eq!(codes(&parsed), vec![EMPTY_FILES_LIST]);

        let with_references = raw(json!({ "files": [], "references": [{ "path": "../lib" }] }));
        let parsed =
            parse_json_config_file_content(&with_references, &FsHost, temp_dir.path(), None)
                .unwrap();
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.project_references.unwrap().len(), 1);
    }

    #[test]
    fn test_references_must_be_an_array() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "a.ts");

        let config = raw(json!({ "references": { "path": "../lib" } }));
        let parsed =
            parse_json_config_file_content(&config, &FsHost, temp_dir.path(), None).unwrap();

        assert!(parsed.project_references.is_none());
        assert_eq!(codes(&parsed), vec![OPTION_REQUIRES_TYPE]);
        assert!(parsed.errors[0].message.contains("references"));
    }

    #[test]
    fn test_paths_base_path_and_config_file_path() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "a.ts");

        let config = raw(json!({ "compilerOptions": { "paths": { "@/*": ["src/*"] } } }));
        let source = JsonSourceFile {
            path: root.join("tsconfig.json"),
            text: String::new(),
        };
        let parsed =
            parse_json_config_file_content(&config, &FsHost, root, Some(&source)).unwrap();

        assert_eq!(parsed.options.paths_base_path.as_deref(), Some(root));
        assert_eq!(
            parsed.options.config_file_path,
            Some(root.join("tsconfig.json"))
        );
    }

    #[test]
    fn test_compile_on_save() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "a.ts");

        let config = raw(json!({ "compileOnSave": true }));
        let parsed =
            parse_json_config_file_content(&config, &FsHost, temp_dir.path(), None).unwrap();

        assert!(parsed.compile_on_save);
    }

    #[test]
    fn test_invalid_glob_is_failure() {
        let temp_dir = TempDir::new().unwrap();

        let config = raw(json!({ "include": ["src/**/[x.ts"] }));
        let error = parse_json_config_file_content(&config, &FsHost, temp_dir.path(), None)
            .unwrap_err();

        assert!(matches!(error, ResolveError::Failure { .. }));
    }
}
