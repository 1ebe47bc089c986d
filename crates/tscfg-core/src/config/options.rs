//! Typed compiler options
//!
//! This is the resolved form of the `compilerOptions` section: enum values are
//! parsed, path values are absolute and `lib` entries are library file names.
//! Every field is optional; an unset field means the compiler default applies.

use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Resolved compiler options
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    // --- Language and environment ---
    #[schemars(description = "ECMAScript version of the emitted JavaScript")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<ScriptTarget>,

    /// Library files included in compilation, as file names (`lib.dom.d.ts`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lib: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsx: Option<JsxEmit>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsx_factory: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsx_fragment_factory: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsx_import_source: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub experimental_decorators: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub emit_decorator_metadata: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_lib: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_define_for_class_fields: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_detection: Option<ModuleDetection>,

    // --- Modules ---
    #[schemars(description = "Module code generation")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<ModuleKind>,

    #[schemars(description = "Strategy used to look up imported modules")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_resolution: Option<ModuleResolution>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<PathBuf>,

    /// Import specifier remapping, kept verbatim; relative to `paths_base_path`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<IndexMap<String, Vec<String>>>,

    /// Directory of the config file that declared `paths`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths_base_path: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_dirs: Option<Vec<PathBuf>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_roots: Option<Vec<PathBuf>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_conditions: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolve_json_module: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_arbitrary_extensions: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_importing_ts_extensions: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_umd_global_access: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_resolve: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_node_module_js_depth: Option<u32>,

    // --- JavaScript support ---
    #[schemars(description = "Allow JavaScript files to be part of the program")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_js: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_js: Option<bool>,

    // --- Emit ---
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declaration: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub declaration_map: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub declaration_dir: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub emit_declaration_only: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_map: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_source_map: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_sources: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_root: Option<String>,

    #[schemars(description = "Output directory for emitted files")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_file: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_dir: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_emit: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_emit_on_error: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_comments: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_helpers: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub downlevel_iteration: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub preserve_const_enums: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub strip_internal: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_line: Option<NewLineKind>,

    // --- Interop ---
    #[serde(skip_serializing_if = "Option::is_none")]
    pub es_module_interop: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_synthetic_default_imports: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub isolated_modules: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbatim_module_syntax: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_consistent_casing_in_file_names: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub preserve_symlinks: Option<bool>,

    // --- Type checking ---
    #[schemars(description = "Enable all strict type-checking options")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_implicit_any: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict_null_checks: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict_function_types: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict_bind_call_apply: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict_property_initialization: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_implicit_this: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_implicit_returns: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_implicit_override: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_fallthrough_cases_in_switch: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_unused_locals: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_unused_parameters: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_unchecked_indexed_access: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_property_access_from_index_signature: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact_optional_property_types: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_unreachable_code: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_unused_labels: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_lib_check: Option<bool>,

    // --- Projects ---
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composite: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub incremental: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts_build_info_file: Option<PathBuf>,

    // --- Diagnostics output ---
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_resolution: Option<bool>,

    /// The config file these options were read from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file_path: Option<PathBuf>,
}

impl CompilerOptions {
    /// `allowJs`, defaulting to false
    pub fn allows_js(&self) -> bool {
        self.allow_js.unwrap_or(false)
    }

    /// Whether declaration files are emitted, directly or through `composite`
    pub fn emits_declarations(&self) -> bool {
        self.declaration.unwrap_or(false) || self.composite.unwrap_or(false)
    }
}

/// ECMAScript target version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScriptTarget {
    Es3,
    Es5,
    Es2015,
    Es2016,
    Es2017,
    Es2018,
    Es2019,
    Es2020,
    Es2021,
    Es2022,
    Es2023,
    Es2024,
    EsNext,
}

/// Module code generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    None,
    CommonJs,
    Amd,
    Umd,
    System,
    Es2015,
    Es2020,
    Es2022,
    EsNext,
    Node16,
    Node18,
    NodeNext,
    Preserve,
}

/// Module resolution strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ModuleResolution {
    Classic,
    /// Also written as `node`
    Node10,
    Node16,
    NodeNext,
    Bundler,
}

/// JSX emit mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum JsxEmit {
    #[serde(rename = "preserve")]
    Preserve,
    #[serde(rename = "react")]
    React,
    #[serde(rename = "react-native")]
    ReactNative,
    #[serde(rename = "react-jsx")]
    ReactJsx,
    #[serde(rename = "react-jsxdev")]
    ReactJsxDev,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum NewLineKind {
    Crlf,
    Lf,
}

/// How files are recognised as modules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ModuleDetection {
    Auto,
    Legacy,
    Force,
}
