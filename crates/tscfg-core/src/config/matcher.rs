//! Input file discovery from `files`, `include` and `exclude`
//!
//! Include and exclude specs arrive as absolute, `/`-separated strings. Each
//! one is split at its first wildcard component: the literal part becomes the
//! directory to walk (escaped before it is glued back onto the pattern) and
//! the rest is matched with [`glob::Pattern`].

use super::options::CompilerOptions;
use super::parse::ResolveError;
use crate::diagnostics::{Diagnostic, messages};
use crate::host::ConfigHost;
use crate::paths::{normalize_path, to_slash};
use glob::{MatchOptions, Pattern};
use indexmap::{IndexMap, IndexSet};
use std::path::{Path, PathBuf};
use tracing::debug;

const TS_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".mts", ".cts", ".d.ts", ".d.mts", ".d.cts"];
const JS_EXTENSIONS: &[&str] = &[".js", ".jsx", ".mjs", ".cjs"];

/// Folders wildcards never enter unless a pattern names them
pub(crate) const PACKAGE_FOLDERS: &[&str] = &["node_modules", "bower_components", "jspm_packages"];

/// Absolute file specs to match
#[derive(Debug, Clone, Default)]
pub(crate) struct FileSpecs {
    pub files: Vec<String>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct MatchedFiles {
    pub file_names: Vec<PathBuf>,
    /// Directory to watch → whether its subdirectories matter too
    pub wildcard_directories: IndexMap<PathBuf, bool>,
    pub errors: Vec<Diagnostic>,
}

/// An include spec split into the directory to walk and its pattern
#[derive(Debug)]
struct IncludeSpec {
    base: PathBuf,
    pattern: Pattern,
    /// Components after the base, used to allow hidden and package folders
    wildcard_components: Vec<String>,
    recursive: bool,
    /// No wildcard at all: the spec names a single file
    literal: bool,
    allows_json: bool,
}

pub(crate) fn match_files(
    specs: &FileSpecs,
    options: &CompilerOptions,
    host: &dyn ConfigHost,
) -> Result<MatchedFiles, ResolveError> {
    let case_sensitive = host.use_case_sensitive_file_names();
    let glob_options = MatchOptions {
        case_sensitive,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };
    let key = |path: &Path| {
        let slashed = to_slash(path);
        if case_sensitive {
            slashed
        } else {
            slashed.to_lowercase()
        }
    };

    let mut matched = MatchedFiles::default();
    let mut seen = IndexSet::new();

    // Literal files go first, existing or not
    let mut literal_files = Vec::new();
    for file in &specs.files {
        let path = normalize_path(Path::new(file));
        if seen.insert(key(&path)) {
            literal_files.push(path);
        }
    }

    let mut includes = Vec::new();
    for spec in &specs.include {
        let trimmed = spec.trim_end_matches('/');
        if trimmed.ends_with("/**") || trimmed == "**" {
            matched.errors.push(messages::recursive_wildcard_at_end(spec));
            continue;
        }
        includes.push(compile_include(spec)?);
    }

    let excludes = specs
        .exclude
        .iter()
        .map(|spec| compile_exclude(spec.as_str()))
        .collect::<Result<Vec<_>, _>>()?;
    let is_excluded = |path: &Path| {
        path.ancestors().any(|ancestor| {
            let candidate = to_slash(ancestor);
            excludes
                .iter()
                .any(|pattern| pattern.matches_with(&candidate, glob_options))
        })
    };

    let mut wildcard_files = Vec::new();
    for include in &includes {
        if include.literal {
            let path = include.base.clone();
            if host.file_exists(&path)
                && has_supported_extension(&path, options, include.allows_json)
                && !is_excluded(&path)
                && seen.insert(key(&path))
            {
                wildcard_files.push(path);
            }
            continue;
        }

        matched
            .wildcard_directories
            .entry(include.base.clone())
            .and_modify(|recursive| *recursive |= include.recursive)
            .or_insert(include.recursive);

        if !host.directory_exists(&include.base) {
            debug!("Include root {} does not exist", include.base.display());
            continue;
        }

        let descend = |dir: &Path| {
            include.recursive && enters_directory(dir, include) && !is_excluded(dir)
        };
        let entries = host.read_directory(&include.base, &descend).map_err(|e| {
            ResolveError::failure(format!(
                "Cannot read directory '{}': {}",
                include.base.display(),
                e
            ))
        })?;

        for path in entries {
            if !include
                .pattern
                .matches_with(&to_slash(&path), glob_options)
            {
                continue;
            }
            if !has_supported_extension(&path, options, include.allows_json) || is_excluded(&path) {
                continue;
            }
            if seen.insert(key(&path)) {
                wildcard_files.push(path);
            }
        }
    }

    let wildcard_files = drop_shadowed(&literal_files, wildcard_files, &key);
    debug!(
        "Matched {} literal and {} wildcard files",
        literal_files.len(),
        wildcard_files.len()
    );

    matched.file_names = literal_files;
    matched.file_names.extend(wildcard_files);
    matched.wildcard_directories = prune_nested(matched.wildcard_directories);

    Ok(matched)
}

fn compile_include(spec: &str) -> Result<IncludeSpec, ResolveError> {
    let last = spec.rsplit('/').next().unwrap_or(spec);
    let implicit_glob = !last.contains(['.', '*', '?']);
    let spec = if implicit_glob {
        format!("{}/**/*", spec.trim_end_matches('/'))
    } else {
        spec.to_string()
    };

    let (base, wildcard) = split_at_wildcard(&spec);
    let allows_json = last.ends_with(".json");

    let Some(wildcard) = wildcard else {
        return Ok(IncludeSpec {
            pattern: compile_pattern(&spec, &Pattern::escape(&spec))?,
            base: normalize_path(Path::new(&spec)),
            wildcard_components: Vec::new(),
            recursive: false,
            literal: true,
            allows_json,
        });
    };

    Ok(IncludeSpec {
        pattern: compile_pattern(&spec, &join_pattern(&base, &wildcard))?,
        wildcard_components: wildcard.split('/').map(str::to_string).collect(),
        recursive: wildcard.contains('/'),
        base: PathBuf::from(base),
        literal: false,
        allows_json,
    })
}

fn compile_exclude(spec: &str) -> Result<Pattern, ResolveError> {
    match split_at_wildcard(spec) {
        (base, Some(wildcard)) => compile_pattern(spec, &join_pattern(&base, &wildcard)),
        (_, None) => compile_pattern(spec, &Pattern::escape(spec.trim_end_matches('/'))),
    }
}

fn compile_pattern(spec: &str, pattern: &str) -> Result<Pattern, ResolveError> {
    Pattern::new(pattern)
        .map_err(|e| ResolveError::failure(format!("Invalid glob pattern '{spec}': {e}")))
}

/// Split before the first component holding `*` or `?`
fn split_at_wildcard(spec: &str) -> (String, Option<String>) {
    let components: Vec<&str> = spec.split('/').collect();
    match components.iter().position(|c| c.contains(['*', '?'])) {
        Some(index) => {
            let base = components[..index].join("/");
            let base = if base.is_empty() { "/".to_string() } else { base };
            (base, Some(components[index..].join("/")))
        }
        None => (spec.to_string(), None),
    }
}

fn join_pattern(base: &str, wildcard: &str) -> String {
    let escaped = Pattern::escape(base);
    if escaped.ends_with('/') {
        format!("{escaped}{wildcard}")
    } else {
        format!("{escaped}/{wildcard}")
    }
}

/// Hidden and package folders are only entered when the pattern names them
fn enters_directory(dir: &Path, include: &IncludeSpec) -> bool {
    let Some(name) = dir.file_name().map(|n| n.to_string_lossy()) else {
        return true;
    };
    let special = name.starts_with('.') || PACKAGE_FOLDERS.contains(&name.as_ref());
    !special || include.wildcard_components.iter().any(|c| *c == name)
}

fn has_supported_extension(path: &Path, options: &CompilerOptions, allows_json: bool) -> bool {
    let name = path.to_string_lossy();
    TS_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
        || (options.allows_js() && JS_EXTENSIONS.iter().any(|ext| name.ends_with(ext)))
        || (allows_json && options.resolve_json_module == Some(true) && name.ends_with(".json"))
}

/// Lower number wins when two files share a stem
fn extension_priority(name: &str) -> Option<(usize, u8)> {
    const ORDER: &[(&str, u8)] = &[
        (".d.ts", 1),
        (".d.mts", 1),
        (".d.cts", 1),
        (".ts", 0),
        (".tsx", 0),
        (".mts", 0),
        (".cts", 0),
        (".js", 2),
        (".jsx", 2),
        (".mjs", 2),
        (".cjs", 2),
    ];
    ORDER
        .iter()
        .find(|(ext, _)| name.ends_with(ext))
        .map(|(ext, priority)| (name.len() - ext.len(), *priority))
}

/// Remove wildcard matches shadowed by a same-stem file of higher priority
fn drop_shadowed(
    literal_files: &[PathBuf],
    wildcard_files: Vec<PathBuf>,
    key: &dyn Fn(&Path) -> String,
) -> Vec<PathBuf> {
    let mut best: IndexMap<String, u8> = IndexMap::new();
    for path in literal_files.iter().chain(wildcard_files.iter()) {
        let name = key(path);
        if let Some((stem_len, priority)) = extension_priority(&name) {
            let entry = best.entry(name[..stem_len].to_string()).or_insert(priority);
            *entry = (*entry).min(priority);
        }
    }

    wildcard_files
        .into_iter()
        .filter(|path| {
            let name = key(path);
            match extension_priority(&name) {
                Some((stem_len, priority)) => best
                    .get(&name[..stem_len])
                    .is_none_or(|best| *best == priority),
                None => true,
            }
        })
        .collect()
}

/// Drop directories already covered by a recursive ancestor
fn prune_nested(directories: IndexMap<PathBuf, bool>) -> IndexMap<PathBuf, bool> {
    let recursive: Vec<PathBuf> = directories
        .iter()
        .filter(|(_, recursive)| **recursive)
        .map(|(dir, _)| dir.clone())
        .collect();

    directories
        .into_iter()
        .filter(|(dir, _)| {
            !recursive
                .iter()
                .any(|parent| parent != dir && dir.starts_with(parent))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::messages::RECURSIVE_WILDCARD_AT_END;
    use crate::host::FsHost;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, rel: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn abs(root: &Path, rel: &str) -> String {
        to_slash(&root.join(rel))
    }

    fn relative(root: &Path, matched: &MatchedFiles) -> Vec<String> {
        matched
            .file_names
            .iter()
            .map(|p| to_slash(p.strip_prefix(root).unwrap()))
            .collect()
    }

    fn default_excludes(root: &Path) -> Vec<String> {
        PACKAGE_FOLDERS.iter().map(|f| abs(root, f)).collect()
    }

    #[test]
    fn test_default_include_matches_everything_typescript() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "src/index.ts");
        touch(root, "src/util/helpers.tsx");
        touch(root, "src/readme.md");
        touch(root, "main.ts");
        touch(root, "node_modules/dep/index.d.ts");
        touch(root, ".cache/gen.ts");

        let specs = FileSpecs {
            include: vec![abs(root, "**/*")],
            exclude: default_excludes(root),
            ..Default::default()
        };
        let matched = match_files(&specs, &CompilerOptions::default(), &FsHost).unwrap();

        assert_eq!(
            relative(root, &matched),
            vec!["main.ts", "src/index.ts", "src/util/helpers.tsx"]
        );
        assert_eq!(matched.wildcard_directories.get(root), Some(&true));
    }

    #[test]
    fn test_implicit_directory_glob() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "src/a.ts");
        touch(root, "src/deep/b.ts");
        touch(root, "other/c.ts");

        let specs = FileSpecs {
            include: vec![abs(root, "src")],
            ..Default::default()
        };
        let matched = match_files(&specs, &CompilerOptions::default(), &FsHost).unwrap();

        assert_eq!(relative(root, &matched), vec!["src/a.ts", "src/deep/b.ts"]);
        assert_eq!(matched.wildcard_directories.get(&root.join("src")), Some(&true));
    }

    #[test]
    fn test_exclude_matches_ancestors() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "src/a.ts");
        touch(root, "src/generated/b.ts");
        touch(root, "src/a.spec.ts");

        let specs = FileSpecs {
            include: vec![abs(root, "src/**/*")],
            exclude: vec![abs(root, "src/generated"), abs(root, "**/*.spec.ts")],
            ..Default::default()
        };
        let matched = match_files(&specs, &CompilerOptions::default(), &FsHost).unwrap();

        assert_eq!(relative(root, &matched), vec!["src/a.ts"]);
    }

    #[test]
    fn test_literal_files_come_first_and_ignore_exclude() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "src/a.ts");
        touch(root, "src/b.ts");

        let specs = FileSpecs {
            files: vec![abs(root, "src/b.ts"), abs(root, "missing.ts")],
            include: vec![abs(root, "src/*.ts")],
            exclude: vec![abs(root, "src/b.ts")],
        };
        let matched = match_files(&specs, &CompilerOptions::default(), &FsHost).unwrap();

        assert_eq!(
            relative(root, &matched),
            vec!["src/b.ts", "missing.ts", "src/a.ts"]
        );
        assert_eq!(matched.wildcard_directories.get(&root.join("src")), Some(&false));
    }

    #[test]
    fn test_declaration_shadowed_by_source() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "lib/a.ts");
        touch(root, "lib/a.d.ts");
        touch(root, "lib/b.d.ts");

        let specs = FileSpecs {
            include: vec![abs(root, "lib")],
            ..Default::default()
        };
        let matched = match_files(&specs, &CompilerOptions::default(), &FsHost).unwrap();

        assert_eq!(relative(root, &matched), vec!["lib/a.ts", "lib/b.d.ts"]);
    }

    #[test]
    fn test_allow_js_widens_extensions() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "a.js");
        touch(root, "b.ts");
        touch(root, "b.js");

        let specs = FileSpecs {
            include: vec![abs(root, "*")],
            ..Default::default()
        };

        let without = match_files(&specs, &CompilerOptions::default(), &FsHost).unwrap();
        assert_eq!(relative(root, &without), vec!["b.ts"]);

        let options = CompilerOptions {
            allow_js: Some(true),
            ..Default::default()
        };
        let with = match_files(&specs, &options, &FsHost).unwrap();
        assert_eq!(relative(root, &with), vec!["a.js", "b.ts"]);
    }

    #[test]
    fn test_json_needs_explicit_pattern() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "data/a.json");
        touch(root, "data/b.ts");

        let options = CompilerOptions {
            resolve_json_module: Some(true),
            ..Default::default()
        };
        let broad = FileSpecs {
            include: vec![abs(root, "data")],
            ..Default::default()
        };
        let explicit = FileSpecs {
            include: vec![abs(root, "data/*.json")],
            ..Default::default()
        };

        let broad = match_files(&broad, &options, &FsHost).unwrap();
        assert_eq!(relative(root, &broad), vec!["data/b.ts"]);
        let explicit = match_files(&explicit, &options, &FsHost).unwrap();
        assert_eq!(relative(root, &explicit), vec!["data/a.json"]);
    }

    #[test]
    fn test_trailing_recursive_wildcard_is_soft_error() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "src/a.ts");

        let specs = FileSpecs {
            include: vec![abs(root, "src/**"), format!("{}/", abs(root, "src/**"))],
            ..Default::default()
        };
        let matched = match_files(&specs, &CompilerOptions::default(), &FsHost).unwrap();

        assert!(matched.file_names.is_empty());
        assert_eq!(matched.errors.len(), 2);
        assert!(matched.errors.iter().all(|e| e.code == RECURSIVE_WILDCARD_AT_END));
    }

    #[test]
    fn test_invalid_glob_is_failure() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        let specs = FileSpecs {
            include: vec![abs(root, "src/**/[abc.ts")],
            ..Default::default()
        };
        let error = match_files(&specs, &CompilerOptions::default(), &FsHost).unwrap_err();

        assert!(matches!(error, ResolveError::Failure { .. }));
        assert!(error.to_string().contains("Invalid glob pattern"));
    }

    #[test]
    fn test_brackets_in_base_directory_are_literal() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "[app]/a.ts");

        let specs = FileSpecs {
            include: vec![abs(root, "[app]/*.ts")],
            ..Default::default()
        };
        let matched = match_files(&specs, &CompilerOptions::default(), &FsHost).unwrap();

        assert_eq!(relative(root, &matched), vec!["[app]/a.ts"]);
    }

    #[test]
    fn test_package_folder_entered_when_named() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(root, "node_modules/pkg/index.d.ts");

        let specs = FileSpecs {
            include: vec![abs(root, "node_modules/**/*")],
            ..Default::default()
        };
        let matched = match_files(&specs, &CompilerOptions::default(), &FsHost).unwrap();

        assert_eq!(relative(root, &matched), vec!["node_modules/pkg/index.d.ts"]);
    }

    #[test]
    fn test_missing_include_root_matches_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        let specs = FileSpecs {
            include: vec![abs(root, "tests/**/*")],
            ..Default::default()
        };
        let matched = match_files(&specs, &CompilerOptions::default(), &FsHost).unwrap();

        assert!(matched.file_names.is_empty());
    }

    #[test]
    fn test_prune_nested_wildcard_directories() {
        let mut directories = IndexMap::new();
        directories.insert(PathBuf::from("/p"), true);
        directories.insert(PathBuf::from("/p/src"), false);
        directories.insert(PathBuf::from("/q"), false);

        let pruned = prune_nested(directories);
        assert_eq!(pruned.len(), 2);
        assert!(pruned.contains_key(Path::new("/q")));
    }
}
