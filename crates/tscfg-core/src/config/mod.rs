//! tsconfig loading
//!
//! A config goes through three stages:
//! - [`reader`] parses the file as JSON with comments into a [`RawConfig`]
//! - `extends` chains are resolved and merged, child over base, with every
//!   path rebased onto the file that declared it
//! - the merged object is converted into typed [`CompilerOptions`], input
//!   files are matched and project references collected
//!
//! ## Example
//!
//! ```jsonc
//! {
//!   "extends": "./tsconfig.base.json",
//!   "compilerOptions": {
//!     "outDir": "${configDir}/dist",
//!     "strict": true
//!   },
//!   "include": ["src"],
//!   "references": [{ "path": "../shared" }]
//! }
//! ```
//!
//! Problems with single options or specs are soft: they are collected and
//! logged while the rest of the config is still used. Unreadable or
//! unparsable files in the chain and broken glob patterns fail the load.

mod declarations;
mod extends;
mod matcher;

pub mod loader;
pub mod options;
pub mod parse;
pub mod reader;
pub mod references;

pub use loader::{ConfigLoader, ParseResult, compiler_options_schema, load_config};
pub use options::{
    CompilerOptions, JsxEmit, ModuleDetection, ModuleKind, ModuleResolution, NewLineKind,
    ScriptTarget,
};
pub use parse::{ParsedCommandLine, ResolveError, parse_json_config_file_content};
pub use reader::{JsonSourceFile, RawConfig, ReadConfigResult, parse_config_text, read_config_file};
pub use references::{ProjectReference, resolve_project_reference_path};
