//! Diagnostic message catalogue
//!
//! Codes and wording follow the TypeScript compiler so that output is
//! familiar to anyone who has seen `tsc` complain about a tsconfig.

use super::Diagnostic;
use std::path::Path;

pub const SYNTAX_ERROR: u32 = 1005;
pub const UNKNOWN_COMPILER_OPTION: u32 = 5023;
pub const OPTION_REQUIRES_TYPE: u32 = 5024;
pub const RECURSIVE_WILDCARD_AT_END: u32 = 5010;
pub const OPTION_CONFLICT: u32 = 5053;
pub const SUBSTITUTIONS_NOT_ARRAY: u32 = 5063;
pub const OPTION_REQUIRES_ONE_OF: u32 = 5069;
pub const CANNOT_READ_FILE: u32 = 5083;
pub const ROOT_NOT_OBJECT: u32 = 5092;
pub const INVALID_ENUM_VALUE: u32 = 6046;
pub const FILE_NOT_FOUND: u32 = 6053;
pub const COMPOSITE_DISABLES_DECLARATION: u32 = 6304;
pub const CIRCULAR_EXTENDS: u32 = 18000;
pub const EMPTY_FILES_LIST: u32 = 18002;
pub const NO_INPUTS_FOUND: u32 = 18003;

pub fn syntax_error(description: &str) -> Diagnostic {
    Diagnostic::error(SYNTAX_ERROR, description)
}

pub fn unknown_compiler_option(name: &str) -> Diagnostic {
    Diagnostic::error(
        UNKNOWN_COMPILER_OPTION,
        format!("Unknown compiler option '{name}'."),
    )
}

pub fn option_requires_type(name: &str, type_name: &str) -> Diagnostic {
    Diagnostic::error(
        OPTION_REQUIRES_TYPE,
        format!("Compiler option '{name}' requires a value of type {type_name}."),
    )
}

pub fn recursive_wildcard_at_end(spec: &str) -> Diagnostic {
    Diagnostic::error(
        RECURSIVE_WILDCARD_AT_END,
        format!("File specification cannot end in a recursive directory wildcard ('**'): '{spec}'."),
    )
}

pub fn option_conflict(option: &str, other: &str) -> Diagnostic {
    Diagnostic::error(
        OPTION_CONFLICT,
        format!("Option '{option}' cannot be specified with option '{other}'."),
    )
}

pub fn substitutions_not_array(pattern: &str) -> Diagnostic {
    Diagnostic::error(
        SUBSTITUTIONS_NOT_ARRAY,
        format!("Substitutions for pattern '{pattern}' should be an array."),
    )
}

pub fn option_requires_one_of(option: &str, first: &str, second: &str) -> Diagnostic {
    Diagnostic::error(
        OPTION_REQUIRES_ONE_OF,
        format!(
            "Option '{option}' cannot be specified without specifying option '{first}' or option '{second}'."
        ),
    )
}

pub fn cannot_read_file(path: &Path) -> Diagnostic {
    Diagnostic::error(
        CANNOT_READ_FILE,
        format!("Cannot read file '{}'.", path.display()),
    )
}

pub fn root_not_object(file_name: &str) -> Diagnostic {
    Diagnostic::error(
        ROOT_NOT_OBJECT,
        format!("The root value of a '{file_name}' file must be an object."),
    )
}

pub fn invalid_enum_value(name: &str, allowed: &[&str]) -> Diagnostic {
    let allowed = allowed
        .iter()
        .map(|v| format!("'{v}'"))
        .collect::<Vec<_>>()
        .join(", ");
    Diagnostic::error(
        INVALID_ENUM_VALUE,
        format!("Argument for '--{name}' option must be: {allowed}."),
    )
}

pub fn file_not_found(specifier: &str) -> Diagnostic {
    Diagnostic::error(FILE_NOT_FOUND, format!("File '{specifier}' not found."))
}

pub fn composite_disables_declaration() -> Diagnostic {
    Diagnostic::error(
        COMPOSITE_DISABLES_DECLARATION,
        "Composite projects may not disable declaration emit.",
    )
}

pub fn circular_extends(chain: &[String]) -> Diagnostic {
    Diagnostic::error(
        CIRCULAR_EXTENDS,
        format!(
            "Circularity detected while resolving configuration: {}",
            chain.join(" -> ")
        ),
    )
}

pub fn empty_files_list(config_file: &Path) -> Diagnostic {
    Diagnostic::error(
        EMPTY_FILES_LIST,
        format!(
            "The 'files' list in config file '{}' is empty.",
            config_file.display()
        ),
    )
}

pub fn no_inputs_found(config_file: &Path, include: &[String], exclude: &[String]) -> Diagnostic {
    let render = |specs: &[String]| {
        serde_json::to_string(specs).unwrap_or_else(|_| format!("{specs:?}"))
    };
    Diagnostic::error(
        NO_INPUTS_FOUND,
        format!(
            "No inputs were found in config file '{}'. Specified 'include' paths were '{}' and 'exclude' paths were '{}'.",
            config_file.display(),
            render(include),
            render(exclude)
        ),
    )
}
