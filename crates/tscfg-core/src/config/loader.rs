//! Loading a tsconfig file into resolved options

use super::options::CompilerOptions;
use super::parse::{ResolveError, parse_json_config_file_content};
use super::reader::{RawConfig, read_config_file};
use super::references::ProjectReference;
use crate::diagnostics::{Diagnostic, DiagnosticFormatter, FormatDiagnosticsHost, PlainFormatHost};
use crate::error::TsConfigError;
use crate::host::{ConfigHost, FsHost};
use crate::paths::normalize_path;
use crate::result::Result;
use schemars::{Schema, schema_for};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Everything a load produces
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    /// Options after `extends` merging and path resolution
    pub compiler_options: CompilerOptions,

    /// The config file's own object, unmerged and with paths as written
    pub raw_parsing: RawConfig,

    /// Absolute paths of the input files
    pub file_names: Vec<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_references: Option<Vec<ProjectReference>>,
}

/// Loads tsconfig files through a [`ConfigHost`]
pub struct ConfigLoader<H: ConfigHost = FsHost> {
    host: H,
    format_host: Box<dyn FormatDiagnosticsHost>,
}

impl ConfigLoader {
    /// Loader backed by the local filesystem
    pub fn new() -> Self {
        Self::with_host(FsHost)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: ConfigHost> ConfigLoader<H> {
    pub fn with_host(host: H) -> Self {
        Self {
            host,
            format_host: Box::new(PlainFormatHost),
        }
    }

    /// Use `format_host` when rendering fatal diagnostics into error messages
    pub fn with_format_host(mut self, format_host: impl FormatDiagnosticsHost + 'static) -> Self {
        self.format_host = Box::new(format_host);
        self
    }

    /// Load and resolve the config at `path`.
    ///
    /// Soft errors (unknown options, bad values, no inputs) are logged and
    /// do not fail the load.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<ParseResult> {
        self.load_with_errors(path).map(|(result, _)| result)
    }

    /// Like [`load`](Self::load), also returning the soft errors
    pub fn load_with_errors(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<(ParseResult, Vec<Diagnostic>)> {
        let path = path.as_ref();
        let config_path = std::path::absolute(path)
            .map(|p| normalize_path(&p))
            .map_err(|e| TsConfigError::io_error(path, e))?;

        debug!("Loading config from {}", config_path.display());

        let read = read_config_file(&config_path, |p| self.host.read_file(p))
            .map_err(|e| TsConfigError::io_error(&config_path, e))?;

        if let Some(diagnostic) = read.error {
            return Err(self.diagnostic_error(diagnostic));
        }

        let base_dir = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));

        let parsed = parse_json_config_file_content(
            &read.config,
            &self.host,
            &base_dir,
            Some(&read.source),
        )
        .map_err(|e| match e {
            ResolveError::Diagnostic(diagnostic) => self.diagnostic_error(*diagnostic),
            ResolveError::Failure { message } => TsConfigError::resolution_error(message),
        })?;

        let errors: Vec<Diagnostic> = parsed
            .errors
            .into_iter()
            .map(|error| match error.file {
                Some(_) => error,
                None => error.with_file(&config_path),
            })
            .collect();

        if !errors.is_empty() {
            match serde_json::to_string(&errors) {
                Ok(json) => warn!(
                    "Problems in {}, continuing with the remaining options: {}",
                    config_path.display(),
                    json
                ),
                Err(_) => warn!(
                    "{} problems in {}, continuing with the remaining options",
                    errors.len(),
                    config_path.display()
                ),
            }
        }

        info!(
            "Loaded {} ({} input files)",
            config_path.display(),
            parsed.file_names.len()
        );

        let result = ParseResult {
            compiler_options: parsed.options,
            raw_parsing: read.config,
            file_names: parsed.file_names,
            project_references: parsed.project_references,
        };

        Ok((result, errors))
    }

    fn diagnostic_error(&self, diagnostic: Diagnostic) -> TsConfigError {
        let formatted = DiagnosticFormatter::plain()
            .format_with_context(std::slice::from_ref(&diagnostic), self.format_host.as_ref());
        TsConfigError::diagnostic_error(formatted.trim_end(), diagnostic)
    }
}

/// Load the config at `path` from the local filesystem
pub fn load_config(path: impl AsRef<Path>) -> Result<ParseResult> {
    ConfigLoader::new().load(path)
}

/// JSON Schema describing `compilerOptions`
pub fn compiler_options_schema() -> Schema {
    schema_for!(CompilerOptions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::messages::{OPTION_REQUIRES_TYPE, UNKNOWN_COMPILER_OPTION};
    use crate::error::{ErrorKind, RESOLUTION_ERROR_PREFIX};
    use std::fs;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Log sink shared between the subscriber and the test
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn create_temp_config(dir: &Path, filename: &str, content: &str) -> PathBuf {
        let path = dir.join(filename);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_basic_config() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_temp_config(root, "src/index.ts", "");
        let config = create_temp_config(
            root,
            "tsconfig.json",
            r#"{
                // project settings
                "compilerOptions": { "strict": true, "outDir": "./dist" },
                "include": ["src"],
            }"#,
        );

        let result = load_config(&config).unwrap();

        assert_eq!(result.compiler_options.strict, Some(true));
        assert_eq!(result.compiler_options.out_dir, Some(root.join("dist")));
        assert_eq!(result.file_names, vec![root.join("src/index.ts")]);
        assert!(result.project_references.is_none());
        assert_eq!(
            result.raw_parsing.compiler_options().unwrap()["outDir"],
            serde_json::json!("./dist")
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let error = load_config(temp_dir.path().join("tsconfig.json")).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_syntax_error_message() {
        let temp_dir = TempDir::new().unwrap();
        let config = create_temp_config(
            temp_dir.path(),
            "tsconfig.json",
            "{\n  \"compilerOptions\": { \"strict\": true,, }\n}",
        );

        let error = load_config(&config).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Diagnostic);
        let message = error.to_string();
        assert!(message.contains(&config.display().to_string()));
        assert!(message.contains(":2:"));
        assert!(!message.ends_with('\n'));
    }

    #[test]
    fn test_resolution_failure_has_prefix() {
        let temp_dir = TempDir::new().unwrap();
        let config = create_temp_config(
            temp_dir.path(),
            "tsconfig.json",
            r#"{ "include": ["src/**/[broken.ts"] }"#,
        );

        let error = load_config(&config).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Resolution);
        assert!(error.to_string().starts_with(RESOLUTION_ERROR_PREFIX));
    }

    #[test]
    fn test_soft_errors_are_returned_with_file() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_temp_config(root, "a.ts", "");
        let config = create_temp_config(
            root,
            "tsconfig.json",
            r#"{ "compilerOptions": { "strict": "yes", "fancyMode": true, "target": "es2019" } }"#,
        );

        let (result, errors) = ConfigLoader::new().load_with_errors(&config).unwrap();

        assert_eq!(
            result.compiler_options.target,
            Some(crate::config::ScriptTarget::Es2019)
        );
        let codes: Vec<u32> = errors.iter().map(|e| e.code).collect();
        assert_eq!(codes, vec![OPTION_REQUIRES_TYPE, UNKNOWN_COMPILER_OPTION]);
        assert!(errors.iter().all(|e| e.file.as_deref() == Some(config.as_path())));
    }

    #[test]
    fn test_soft_errors_from_base_name_the_base() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_temp_config(root, "a.ts", "");
        let base = create_temp_config(
            root,
            "base.json",
            r#"{ "compilerOptions": { "bogusOpt": true } }"#,
        );
        let config = create_temp_config(
            root,
            "tsconfig.json",
            r#"{ "extends": "./base.json", "compilerOptions": { "otherBogus": 1 } }"#,
        );

        let (_, errors) = ConfigLoader::new().load_with_errors(&config).unwrap();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].file.as_deref(), Some(base.as_path()));
        assert!(errors[0].message.contains("bogusOpt"));
        assert_eq!(errors[1].file.as_deref(), Some(config.as_path()));
    }

    #[test]
    fn test_soft_errors_are_logged() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_temp_config(root, "a.ts", "");
        let config = create_temp_config(
            root,
            "tsconfig.json",
            r#"{ "compilerOptions": { "strict": true, "fancyMode": true } }"#,
        );

        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer({
                let logs = logs.clone();
                move || logs.clone()
            })
            .with_ansi(false)
            .finish();

        let result = tracing::subscriber::with_default(subscriber, || load_config(&config));

        assert_eq!(result.unwrap().compiler_options.strict, Some(true));
        let output = logs.contents();
        assert!(output.contains("WARN"));
        assert!(output.contains("fancyMode"));
        assert!(output.contains(&config.display().to_string()));
    }

    #[test]
    fn test_repeat_loads_are_identical() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_temp_config(root, "src/a.ts", "");
        create_temp_config(root, "src/b.ts", "");
        let config = create_temp_config(root, "tsconfig.json", r#"{ "compilerOptions": { "module": "nodenext" } }"#);

        let loader = ConfigLoader::new();
        assert_eq!(loader.load(&config).unwrap(), loader.load(&config).unwrap());
    }

    #[test]
    fn test_compiler_options_schema() {
        let schema = serde_json::to_value(compiler_options_schema()).unwrap();
        assert!(schema["properties"]["strict"].is_object());
        assert!(schema["properties"]["outDir"].is_object());
    }
}
