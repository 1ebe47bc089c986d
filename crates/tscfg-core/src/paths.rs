//! Path helpers shared by the config resolver
//!
//! All normalization here is lexical: `.` and `..` are folded without
//! touching the filesystem, so paths that do not exist yet (an `outDir`
//! for instance) still come out absolute and clean.

use std::path::{Component, Path, PathBuf};

/// Template that expands to the directory of the config file being loaded
pub const CONFIG_DIR_TEMPLATE: &str = "${configDir}";

/// Lexically normalize a path, folding `.` and `..` components
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is still `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }

    out
}

/// Resolve a config value against the directory it was declared in.
///
/// Values starting with `${configDir}` are resolved against `config_dir`
/// (the directory of the loaded config) instead of `declared_in`.
pub fn resolve_config_value(declared_in: &Path, config_dir: &Path, value: &str) -> PathBuf {
    match value.strip_prefix(CONFIG_DIR_TEMPLATE) {
        Some(rest) => {
            let rest = rest.trim_start_matches(['/', '\\']);
            normalize_path(&config_dir.join(rest))
        }
        None => normalize_path(&declared_in.join(value)),
    }
}

/// Render a path with forward slashes, as used for pattern matching
pub fn to_slash(path: &Path) -> String {
    let text = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '\\' {
        text.replace('\\', "/")
    } else {
        text.into_owned()
    }
}

/// Whether a module specifier is relative (`./x`, `../x`) or absolute
pub fn is_rooted_or_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
        || specifier.starts_with(".\\")
        || specifier.starts_with("..\\")
        || Path::new(specifier).is_absolute()
}

/// Render `path` relative to `directory` when it lies below it
pub fn relative_to(path: &Path, directory: &Path) -> String {
    // Relative to the filesystem root reads worse than the full path
    if directory.parent().is_none() {
        return to_slash(path);
    }

    match path.strip_prefix(directory) {
        Ok(rel) if !rel.as_os_str().is_empty() => to_slash(rel),
        _ => to_slash(path),
    }
}
