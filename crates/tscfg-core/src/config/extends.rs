//! `extends` chain resolution
//!
//! Base configs are loaded first and the extending config is laid over them,
//! so the child always wins. Paths in each file are rebased onto the
//! directory of the file that declared them before merging, which keeps a
//! base's `outDir` or `include` pointing where its author meant.
//!
//! Merge rules:
//! - `compilerOptions` merge key by key; `null` in a child clears the base value
//! - `files`, `include`, `exclude` and `compileOnSave` are taken whole from the
//!   nearest file that sets them
//! - `references` are never inherited

use super::declarations::find_option;
use super::reader::{JsonSourceFile, RawConfig, parse_config_text};
use crate::diagnostics::{Diagnostic, messages};
use crate::host::ConfigHost;
use crate::paths::{
    CONFIG_DIR_TEMPLATE, is_rooted_or_relative, normalize_path, resolve_config_value, to_slash,
};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config sections after the `extends` chain has been applied
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct MergedConfig {
    /// Path-valued options are already absolute. Known options are keyed
    /// by their declared spelling.
    pub compiler_options: Map<String, Value>,
    /// File that set each entry of `compiler_options`
    pub option_sources: HashMap<String, PathBuf>,
    /// Directory of the file whose `paths` option won
    pub paths_base_path: Option<PathBuf>,
    pub files: Option<Value>,
    pub include: Option<Value>,
    pub exclude: Option<Value>,
    pub compile_on_save: Option<Value>,
}

impl MergedConfig {
    /// Lay `child` over this config (child takes precedence)
    fn overlay(&mut self, child: MergedConfig) {
        for (key, value) in child.compiler_options {
            self.compiler_options.insert(key, value);
        }
        self.option_sources.extend(child.option_sources);

        if child.paths_base_path.is_some() {
            self.paths_base_path = child.paths_base_path;
        }

        // Whole-value inheritance: only filled in when the child is silent
        if child.files.is_some() {
            self.files = child.files;
        }
        if child.include.is_some() {
            self.include = child.include;
        }
        if child.exclude.is_some() {
            self.exclude = child.exclude;
        }
        if child.compile_on_save.is_some() {
            self.compile_on_save = child.compile_on_save;
        }
    }
}

/// Result of resolving an `extends` chain
#[derive(Debug, Clone, Default)]
pub(crate) struct ExtendsOutcome {
    pub merged: MergedConfig,
    /// Every base config read, in load order
    pub extended_files: Vec<PathBuf>,
    /// Problems that did not stop resolution
    pub errors: Vec<Diagnostic>,
}

/// Resolve the `extends` chain of `raw`.
///
/// `config_dir` is the directory of the config being loaded; it is the base
/// for the config's own relative paths and the expansion of `${configDir}`
/// everywhere in the chain. Missing, unreadable, unparsable or circular base
/// configs are fatal and returned as the error.
pub(crate) fn resolve_extends_chain(
    raw: &RawConfig,
    source: Option<&JsonSourceFile>,
    host: &dyn ConfigHost,
    config_dir: &Path,
    config_file: Option<&Path>,
) -> Result<ExtendsOutcome, Diagnostic> {
    let mut resolver = ExtendsResolver {
        host,
        config_dir,
        stack: config_file
            .map(|path| vec![normalize_path(path)])
            .unwrap_or_default(),
        extended_files: Vec::new(),
        errors: Vec::new(),
    };

    let merged = resolver.resolve(raw, config_dir, source)?;

    Ok(ExtendsOutcome {
        merged,
        extended_files: resolver.extended_files,
        errors: resolver.errors,
    })
}

struct ExtendsResolver<'a> {
    host: &'a dyn ConfigHost,
    config_dir: &'a Path,
    /// Files currently being resolved, outermost first
    stack: Vec<PathBuf>,
    extended_files: Vec<PathBuf>,
    errors: Vec<Diagnostic>,
}

impl ExtendsResolver<'_> {
    fn resolve(
        &mut self,
        raw: &RawConfig,
        own_dir: &Path,
        source: Option<&JsonSourceFile>,
    ) -> Result<MergedConfig, Diagnostic> {
        let mut merged = MergedConfig::default();

        let file = source.map(|s| s.path.as_path());

        for specifier in self.extends_specifiers(raw, file) {
            let path = self.locate(&specifier, own_dir, source)?;

            if self.stack.contains(&path) {
                let mut chain: Vec<String> =
                    self.stack.iter().map(|p| p.display().to_string()).collect();
                chain.push(path.display().to_string());
                return Err(point_at(messages::circular_extends(&chain), source, &specifier));
            }

            debug!("Extending {}", path.display());
            let base = self.load_base(&path)?;
            merged.overlay(base);
        }

        merged.overlay(self.fragment(raw, own_dir, file));
        Ok(merged)
    }

    fn load_base(&mut self, path: &Path) -> Result<MergedConfig, Diagnostic> {
        let text = self
            .host
            .read_file(path)
            .map_err(|_| messages::cannot_read_file(path))?;

        let read = parse_config_text(path, text);
        if let Some(error) = read.error {
            return Err(error);
        }

        let base_dir = path.parent().unwrap_or(Path::new("/")).to_path_buf();

        self.stack.push(path.to_path_buf());
        self.extended_files.push(path.to_path_buf());
        let merged = self.resolve(&read.config, &base_dir, Some(&read.source));
        self.stack.pop();

        merged
    }

    fn extends_specifiers(&mut self, raw: &RawConfig, file: Option<&Path>) -> Vec<String> {
        match raw.extends() {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::String(specifier)) => vec![specifier.clone()],
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item.as_str() {
                    Some(specifier) => Some(specifier.to_string()),
                    None => {
                        self.errors.push(declared_in(
                            messages::option_requires_type("extends", "string"),
                            file,
                        ));
                        None
                    }
                })
                .collect(),
            Some(_) => {
                self.errors.push(declared_in(
                    messages::option_requires_type("extends", "string or Array"),
                    file,
                ));
                Vec::new()
            }
        }
    }

    /// Find the file an `extends` specifier points at
    fn locate(
        &self,
        specifier: &str,
        own_dir: &Path,
        source: Option<&JsonSourceFile>,
    ) -> Result<PathBuf, Diagnostic> {
        if is_rooted_or_relative(specifier) || specifier.starts_with(CONFIG_DIR_TEMPLATE) {
            let candidate = resolve_config_value(own_dir, self.config_dir, specifier);
            if self.host.file_exists(&candidate) {
                return Ok(candidate);
            }

            if !specifier.ends_with(".json") {
                let with_extension = append_json_extension(&candidate);
                if self.host.file_exists(&with_extension) {
                    return Ok(with_extension);
                }
            }

            return Err(point_at(
                messages::cannot_read_file(&candidate),
                source,
                specifier,
            ));
        }

        self.locate_package(specifier, own_dir)
            .ok_or_else(|| point_at(messages::file_not_found(specifier), source, specifier))
    }

    /// Look for `specifier` in `node_modules` folders up the directory tree
    fn locate_package(&self, specifier: &str, own_dir: &Path) -> Option<PathBuf> {
        for dir in own_dir.ancestors() {
            let root = normalize_path(&dir.join("node_modules").join(specifier));

            if self.host.file_exists(&root) {
                return Some(root);
            }

            let with_extension = append_json_extension(&root);
            if self.host.file_exists(&with_extension) {
                return Some(with_extension);
            }

            if let Some(path) = self.package_tsconfig_field(&root) {
                return Some(path);
            }

            let default = root.join("tsconfig.json");
            if self.host.file_exists(&default) {
                return Some(default);
            }
        }

        None
    }

    /// The `tsconfig` entry of a package's `package.json`, if it exists
    fn package_tsconfig_field(&self, package_root: &Path) -> Option<PathBuf> {
        let manifest = package_root.join("package.json");
        if !self.host.file_exists(&manifest) {
            return None;
        }

        let text = self.host.read_file(&manifest).ok()?;
        let package: Value = serde_json::from_str(&text).ok()?;
        let field = package.get("tsconfig")?.as_str()?;

        let path = normalize_path(&package_root.join(field));
        self.host.file_exists(&path).then_some(path)
    }

    /// One file's own sections with its paths made absolute
    fn fragment(&mut self, raw: &RawConfig, own_dir: &Path, file: Option<&Path>) -> MergedConfig {
        let mut compiler_options = Map::new();
        let mut option_sources = HashMap::new();
        let mut paths_base_path = None;

        match raw.get("compilerOptions") {
            Some(Value::Object(options)) => {
                for (key, value) in options {
                    let decl = find_option(key);
                    let value = match decl {
                        Some(decl) if decl.is_path_like() => self.rebase(value, own_dir),
                        _ => value.clone(),
                    };
                    if decl.is_some_and(|d| d.name == "paths") {
                        paths_base_path = Some(own_dir.to_path_buf());
                    }
                    // `outdir` in a base and `outDir` in a child are one option
                    let key = decl.map_or_else(|| key.clone(), |d| d.name.to_string());
                    if let Some(file) = file {
                        option_sources.insert(key.clone(), file.to_path_buf());
                    }
                    compiler_options.insert(key, value);
                }
            }
            None | Some(Value::Null) => {}
            Some(_) => self.errors.push(declared_in(
                messages::option_requires_type("compilerOptions", "object"),
                file,
            )),
        }

        let section = |key: &str| raw.get(key).filter(|value| !value.is_null());

        MergedConfig {
            compiler_options,
            option_sources,
            paths_base_path,
            files: section("files").map(|v| self.rebase(v, own_dir)),
            include: section("include").map(|v| self.rebase(v, own_dir)),
            exclude: section("exclude").map(|v| self.rebase(v, own_dir)),
            compile_on_save: section("compileOnSave").cloned(),
        }
    }

    /// Make string values (or string array entries) absolute
    fn rebase(&self, value: &Value, own_dir: &Path) -> Value {
        let rebase_str =
            |s: &str| Value::String(to_slash(&resolve_config_value(own_dir, self.config_dir, s)));

        match value {
            Value::String(s) => rebase_str(s),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => rebase_str(s),
                        other => other.clone(),
                    })
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

fn append_json_extension(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_owned();
    os.push(".json");
    PathBuf::from(os)
}

fn declared_in(diagnostic: Diagnostic, file: Option<&Path>) -> Diagnostic {
    match file {
        Some(file) => diagnostic.with_file(file),
        None => diagnostic,
    }
}

/// Attach the referring file and, when found, the position of `specifier`
fn point_at(diagnostic: Diagnostic, source: Option<&JsonSourceFile>, specifier: &str) -> Diagnostic {
    match source {
        Some(source) => diagnostic
            .with_file(&source.path)
            .at_string_literal(&source.text, specifier),
        None => diagnostic,
    }
}
