//! tscfg core
//!
//! Loads `tsconfig.json` project files the way the TypeScript compiler reads
//! them: JSON with comments, `extends` chains, typed compiler options, input
//! file matching and project references.
//!
//! ```no_run
//! let result = tscfg_core::load_config("tsconfig.json")?;
//! for file in &result.file_names {
//!     println!("{}", file.display());
//! }
//! # Ok::<(), tscfg_core::TsConfigError>(())
//! ```

pub mod config;
pub mod console; // Terminal colouring for diagnostics
pub mod diagnostics;
pub mod error;
pub mod host;
pub mod paths;
pub mod result;

// Re-export commonly used types
pub use config::{
    CompilerOptions, ConfigLoader, ParseResult, ParsedCommandLine, ProjectReference, RawConfig,
    ResolveError, compiler_options_schema, load_config, parse_json_config_file_content,
    read_config_file, resolve_project_reference_path,
};
pub use console::{Color, Console};
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticFormatter, FormatDiagnosticsHost, Location,
    PlainFormatHost, format_diagnostics, format_diagnostics_with_color_and_context,
};
pub use error::{ErrorKind, RESOLUTION_ERROR_PREFIX, TsConfigError};
pub use host::{ConfigHost, FsHost};
pub use result::Result;

/// Initialize tracing for logging
///
/// Honors `RUST_LOG`, falling back to `tscfg=info`.
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tscfg=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
