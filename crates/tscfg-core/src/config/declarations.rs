//! Compiler option declarations and raw → typed conversion
//!
//! Every known option is listed once with the kind of value it takes. The
//! converter walks a raw `compilerOptions` object, validates each entry
//! against its declaration, and builds a normalized JSON object that
//! deserializes directly into [`CompilerOptions`]. Invalid entries are
//! reported as soft diagnostics and left out.

use super::options::CompilerOptions;
use crate::diagnostics::{Diagnostic, messages};
use crate::paths::resolve_config_value;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Value accepted by an option
#[derive(Debug, Clone, Copy)]
pub(crate) enum OptionKind {
    Boolean,
    String,
    Number,
    /// A path resolved against the declaring config's directory
    Path,
    /// Case-insensitive choice; pairs of (accepted spelling, canonical value)
    Enum(&'static [(&'static str, &'static str)]),
    List(ListElement),
    /// The `paths` object: pattern → list of substitutions
    PathMappings,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum ListElement {
    String,
    Path,
    Lib,
}

#[derive(Debug)]
pub(crate) struct OptionDeclaration {
    pub name: &'static str,
    pub kind: OptionKind,
}

impl OptionDeclaration {
    const fn new(name: &'static str, kind: OptionKind) -> Self {
        Self { name, kind }
    }

    /// Whether values of this option are rebased onto the declaring config
    pub fn is_path_like(&self) -> bool {
        matches!(
            self.kind,
            OptionKind::Path | OptionKind::List(ListElement::Path)
        )
    }

    fn type_name(&self) -> &'static str {
        match self.kind {
            OptionKind::Boolean => "boolean",
            OptionKind::String | OptionKind::Path | OptionKind::Enum(_) => "string",
            OptionKind::Number => "number",
            OptionKind::List(_) => "Array",
            OptionKind::PathMappings => "object",
        }
    }
}

const TARGETS: &[(&str, &str)] = &[
    ("es3", "es3"),
    ("es5", "es5"),
    ("es6", "es2015"),
    ("es2015", "es2015"),
    ("es2016", "es2016"),
    ("es2017", "es2017"),
    ("es2018", "es2018"),
    ("es2019", "es2019"),
    ("es2020", "es2020"),
    ("es2021", "es2021"),
    ("es2022", "es2022"),
    ("es2023", "es2023"),
    ("es2024", "es2024"),
    ("esnext", "esnext"),
];

const MODULES: &[(&str, &str)] = &[
    ("none", "none"),
    ("commonjs", "commonjs"),
    ("amd", "amd"),
    ("umd", "umd"),
    ("system", "system"),
    ("es6", "es2015"),
    ("es2015", "es2015"),
    ("es2020", "es2020"),
    ("es2022", "es2022"),
    ("esnext", "esnext"),
    ("node16", "node16"),
    ("node18", "node18"),
    ("nodenext", "nodenext"),
    ("preserve", "preserve"),
];

const MODULE_RESOLUTIONS: &[(&str, &str)] = &[
    ("classic", "classic"),
    ("node", "node10"),
    ("node10", "node10"),
    ("node16", "node16"),
    ("nodenext", "nodenext"),
    ("bundler", "bundler"),
];

const JSX: &[(&str, &str)] = &[
    ("preserve", "preserve"),
    ("react", "react"),
    ("react-native", "react-native"),
    ("react-jsx", "react-jsx"),
    ("react-jsxdev", "react-jsxdev"),
];

const NEW_LINES: &[(&str, &str)] = &[("crlf", "crlf"), ("lf", "lf")];

const MODULE_DETECTIONS: &[(&str, &str)] =
    &[("auto", "auto"), ("legacy", "legacy"), ("force", "force")];

/// Library names accepted by `lib`, with the file each maps to
const LIBS: &[(&str, &str)] = &[
    ("es5", "lib.es5.d.ts"),
    ("es6", "lib.es2015.d.ts"),
    ("es2015", "lib.es2015.d.ts"),
    ("es7", "lib.es2016.d.ts"),
    ("es2016", "lib.es2016.d.ts"),
    ("es2017", "lib.es2017.d.ts"),
    ("es2018", "lib.es2018.d.ts"),
    ("es2019", "lib.es2019.d.ts"),
    ("es2020", "lib.es2020.d.ts"),
    ("es2021", "lib.es2021.d.ts"),
    ("es2022", "lib.es2022.d.ts"),
    ("es2023", "lib.es2023.d.ts"),
    ("es2024", "lib.es2024.d.ts"),
    ("esnext", "lib.esnext.d.ts"),
    ("dom", "lib.dom.d.ts"),
    ("dom.iterable", "lib.dom.iterable.d.ts"),
    ("dom.asynciterable", "lib.dom.asynciterable.d.ts"),
    ("webworker", "lib.webworker.d.ts"),
    ("webworker.importscripts", "lib.webworker.importscripts.d.ts"),
    ("webworker.iterable", "lib.webworker.iterable.d.ts"),
    ("scripthost", "lib.scripthost.d.ts"),
    ("es2015.core", "lib.es2015.core.d.ts"),
    ("es2015.collection", "lib.es2015.collection.d.ts"),
    ("es2015.generator", "lib.es2015.generator.d.ts"),
    ("es2015.iterable", "lib.es2015.iterable.d.ts"),
    ("es2015.promise", "lib.es2015.promise.d.ts"),
    ("es2015.proxy", "lib.es2015.proxy.d.ts"),
    ("es2015.reflect", "lib.es2015.reflect.d.ts"),
    ("es2015.symbol", "lib.es2015.symbol.d.ts"),
    ("es2015.symbol.wellknown", "lib.es2015.symbol.wellknown.d.ts"),
    ("es2016.array.include", "lib.es2016.array.include.d.ts"),
    ("es2017.object", "lib.es2017.object.d.ts"),
    ("es2017.string", "lib.es2017.string.d.ts"),
    ("es2017.intl", "lib.es2017.intl.d.ts"),
    ("es2017.typedarrays", "lib.es2017.typedarrays.d.ts"),
    ("es2018.asyncgenerator", "lib.es2018.asyncgenerator.d.ts"),
    ("es2018.asynciterable", "lib.es2018.asynciterable.d.ts"),
    ("es2018.intl", "lib.es2018.intl.d.ts"),
    ("es2018.promise", "lib.es2018.promise.d.ts"),
    ("es2018.regexp", "lib.es2018.regexp.d.ts"),
    ("es2019.array", "lib.es2019.array.d.ts"),
    ("es2019.object", "lib.es2019.object.d.ts"),
    ("es2019.string", "lib.es2019.string.d.ts"),
    ("es2019.symbol", "lib.es2019.symbol.d.ts"),
    ("es2020.bigint", "lib.es2020.bigint.d.ts"),
    ("es2020.intl", "lib.es2020.intl.d.ts"),
    ("es2020.promise", "lib.es2020.promise.d.ts"),
    ("es2020.string", "lib.es2020.string.d.ts"),
    ("es2020.symbol.wellknown", "lib.es2020.symbol.wellknown.d.ts"),
    ("es2021.promise", "lib.es2021.promise.d.ts"),
    ("es2021.string", "lib.es2021.string.d.ts"),
    ("es2021.weakref", "lib.es2021.weakref.d.ts"),
    ("es2022.array", "lib.es2022.array.d.ts"),
    ("es2022.error", "lib.es2022.error.d.ts"),
    ("es2022.object", "lib.es2022.object.d.ts"),
    ("es2022.regexp", "lib.es2022.regexp.d.ts"),
    ("es2022.string", "lib.es2022.string.d.ts"),
    ("es2023.array", "lib.es2023.array.d.ts"),
    ("esnext.array", "lib.esnext.array.d.ts"),
    ("esnext.asynciterable", "lib.esnext.asynciterable.d.ts"),
    ("esnext.bigint", "lib.esnext.bigint.d.ts"),
    ("esnext.intl", "lib.esnext.intl.d.ts"),
    ("esnext.promise", "lib.esnext.promise.d.ts"),
    ("esnext.string", "lib.esnext.string.d.ts"),
    ("esnext.symbol", "lib.esnext.symbol.d.ts"),
    ("esnext.weakref", "lib.esnext.weakref.d.ts"),
    ("decorators", "lib.decorators.d.ts"),
    ("decorators.legacy", "lib.decorators.legacy.d.ts"),
];

use ListElement as L;
use OptionKind as K;

pub(crate) static OPTION_DECLARATIONS: &[OptionDeclaration] = &[
    OptionDeclaration::new("target", K::Enum(TARGETS)),
    OptionDeclaration::new("lib", K::List(L::Lib)),
    OptionDeclaration::new("jsx", K::Enum(JSX)),
    OptionDeclaration::new("jsxFactory", K::String),
    OptionDeclaration::new("jsxFragmentFactory", K::String),
    OptionDeclaration::new("jsxImportSource", K::String),
    OptionDeclaration::new("experimentalDecorators", K::Boolean),
    OptionDeclaration::new("emitDecoratorMetadata", K::Boolean),
    OptionDeclaration::new("noLib", K::Boolean),
    OptionDeclaration::new("useDefineForClassFields", K::Boolean),
    OptionDeclaration::new("moduleDetection", K::Enum(MODULE_DETECTIONS)),
    OptionDeclaration::new("module", K::Enum(MODULES)),
    OptionDeclaration::new("moduleResolution", K::Enum(MODULE_RESOLUTIONS)),
    OptionDeclaration::new("baseUrl", K::Path),
    OptionDeclaration::new("paths", K::PathMappings),
    OptionDeclaration::new("rootDirs", K::List(L::Path)),
    OptionDeclaration::new("typeRoots", K::List(L::Path)),
    OptionDeclaration::new("types", K::List(L::String)),
    OptionDeclaration::new("customConditions", K::List(L::String)),
    OptionDeclaration::new("resolveJsonModule", K::Boolean),
    OptionDeclaration::new("allowArbitraryExtensions", K::Boolean),
    OptionDeclaration::new("allowImportingTsExtensions", K::Boolean),
    OptionDeclaration::new("allowUmdGlobalAccess", K::Boolean),
    OptionDeclaration::new("noResolve", K::Boolean),
    OptionDeclaration::new("maxNodeModuleJsDepth", K::Number),
    OptionDeclaration::new("allowJs", K::Boolean),
    OptionDeclaration::new("checkJs", K::Boolean),
    OptionDeclaration::new("declaration", K::Boolean),
    OptionDeclaration::new("declarationMap", K::Boolean),
    OptionDeclaration::new("declarationDir", K::Path),
    OptionDeclaration::new("emitDeclarationOnly", K::Boolean),
    OptionDeclaration::new("sourceMap", K::Boolean),
    OptionDeclaration::new("inlineSourceMap", K::Boolean),
    OptionDeclaration::new("inlineSources", K::Boolean),
    OptionDeclaration::new("sourceRoot", K::String),
    OptionDeclaration::new("mapRoot", K::String),
    OptionDeclaration::new("outDir", K::Path),
    OptionDeclaration::new("outFile", K::Path),
    OptionDeclaration::new("rootDir", K::Path),
    OptionDeclaration::new("noEmit", K::Boolean),
    OptionDeclaration::new("noEmitOnError", K::Boolean),
    OptionDeclaration::new("removeComments", K::Boolean),
    OptionDeclaration::new("importHelpers", K::Boolean),
    OptionDeclaration::new("downlevelIteration", K::Boolean),
    OptionDeclaration::new("preserveConstEnums", K::Boolean),
    OptionDeclaration::new("stripInternal", K::Boolean),
    OptionDeclaration::new("newLine", K::Enum(NEW_LINES)),
    OptionDeclaration::new("esModuleInterop", K::Boolean),
    OptionDeclaration::new("allowSyntheticDefaultImports", K::Boolean),
    OptionDeclaration::new("isolatedModules", K::Boolean),
    OptionDeclaration::new("verbatimModuleSyntax", K::Boolean),
    OptionDeclaration::new("forceConsistentCasingInFileNames", K::Boolean),
    OptionDeclaration::new("preserveSymlinks", K::Boolean),
    OptionDeclaration::new("strict", K::Boolean),
    OptionDeclaration::new("noImplicitAny", K::Boolean),
    OptionDeclaration::new("strictNullChecks", K::Boolean),
    OptionDeclaration::new("strictFunctionTypes", K::Boolean),
    OptionDeclaration::new("strictBindCallApply", K::Boolean),
    OptionDeclaration::new("strictPropertyInitialization", K::Boolean),
    OptionDeclaration::new("noImplicitThis", K::Boolean),
    OptionDeclaration::new("noImplicitReturns", K::Boolean),
    OptionDeclaration::new("noImplicitOverride", K::Boolean),
    OptionDeclaration::new("noFallthroughCasesInSwitch", K::Boolean),
    OptionDeclaration::new("noUnusedLocals", K::Boolean),
    OptionDeclaration::new("noUnusedParameters", K::Boolean),
    OptionDeclaration::new("noUncheckedIndexedAccess", K::Boolean),
    OptionDeclaration::new("noPropertyAccessFromIndexSignature", K::Boolean),
    OptionDeclaration::new("exactOptionalPropertyTypes", K::Boolean),
    OptionDeclaration::new("allowUnreachableCode", K::Boolean),
    OptionDeclaration::new("allowUnusedLabels", K::Boolean),
    OptionDeclaration::new("skipLibCheck", K::Boolean),
    OptionDeclaration::new("composite", K::Boolean),
    OptionDeclaration::new("incremental", K::Boolean),
    OptionDeclaration::new("tsBuildInfoFile", K::Path),
    OptionDeclaration::new("pretty", K::Boolean),
    OptionDeclaration::new("traceResolution", K::Boolean),
];

/// Look up an option by name, ignoring case
pub(crate) fn find_option(name: &str) -> Option<&'static OptionDeclaration> {
    OPTION_DECLARATIONS
        .iter()
        .find(|decl| decl.name.eq_ignore_ascii_case(name))
}

/// Options converted from a raw object, with the problems found on the way
#[derive(Debug, Default)]
pub(crate) struct ConvertedOptions {
    pub options: CompilerOptions,
    pub errors: Vec<Diagnostic>,
}

/// Convert a raw `compilerOptions` object.
///
/// Relative path values are resolved against `base_dir`. Problems with an
/// entry listed in `sources` are attributed to that file. The only error is
/// a failure to build the typed options from the normalized object, which
/// means the declaration table and [`CompilerOptions`] disagree.
pub(crate) fn convert_compiler_options(
    raw: &Map<String, Value>,
    base_dir: &Path,
    sources: &HashMap<String, PathBuf>,
) -> Result<ConvertedOptions, serde_json::Error> {
    let mut normalized = Map::new();
    let mut errors = Vec::new();

    for (key, value) in raw {
        let first_new = errors.len();
        convert_entry(key, value, base_dir, &mut normalized, &mut errors);

        if let Some(file) = sources.get(key) {
            for error in &mut errors[first_new..] {
                error.file.get_or_insert_with(|| file.clone());
            }
        }
    }

    let options = serde_json::from_value(Value::Object(normalized))?;
    Ok(ConvertedOptions { options, errors })
}

fn convert_entry(
    key: &str,
    value: &Value,
    base_dir: &Path,
    normalized: &mut Map<String, Value>,
    errors: &mut Vec<Diagnostic>,
) {
    let Some(decl) = find_option(key) else {
        errors.push(messages::unknown_compiler_option(key));
        return;
    };

    // `null` resets an option inherited through `extends`
    if value.is_null() {
        normalized.remove(decl.name);
        return;
    }

    match convert_value(decl, value, base_dir, errors) {
        Some(converted) => {
            normalized.insert(decl.name.to_string(), converted);
        }
        None => {
            normalized.remove(decl.name);
        }
    }
}

fn convert_value(
    decl: &OptionDeclaration,
    value: &Value,
    base_dir: &Path,
    errors: &mut Vec<Diagnostic>,
) -> Option<Value> {
    let type_error = || messages::option_requires_type(decl.name, decl.type_name());

    match decl.kind {
        OptionKind::Boolean => match value {
            Value::Bool(_) => Some(value.clone()),
            _ => {
                errors.push(type_error());
                None
            }
        },
        OptionKind::String => match value {
            Value::String(_) => Some(value.clone()),
            _ => {
                errors.push(type_error());
                None
            }
        },
        OptionKind::Number => match as_unsigned(value) {
            Some(n) => Some(Value::from(n)),
            None => {
                errors.push(type_error());
                None
            }
        },
        OptionKind::Path => match value {
            Value::String(s) => Some(path_value(base_dir, s)),
            _ => {
                errors.push(type_error());
                None
            }
        },
        OptionKind::Enum(choices) => match value {
            Value::String(s) => {
                let lowered = s.to_ascii_lowercase();
                match choices.iter().find(|(accepted, _)| *accepted == lowered) {
                    Some((_, canonical)) => Some(Value::String(canonical.to_string())),
                    None => {
                        let names: Vec<&str> = choices.iter().map(|(name, _)| *name).collect();
                        errors.push(messages::invalid_enum_value(decl.name, &names));
                        None
                    }
                }
            }
            _ => {
                errors.push(type_error());
                None
            }
        },
        OptionKind::List(element) => match value {
            Value::Array(items) => Some(Value::Array(
                items
                    .iter()
                    .filter_map(|item| convert_list_element(decl, element, item, base_dir, errors))
                    .collect(),
            )),
            _ => {
                errors.push(type_error());
                None
            }
        },
        OptionKind::PathMappings => match value {
            Value::Object(mappings) => {
                let mut out = Map::new();
                for (pattern, substitutions) in mappings {
                    match substitutions.as_array() {
                        Some(items) => {
                            let strings: Vec<Value> = items
                                .iter()
                                .filter(|item| item.is_string())
                                .cloned()
                                .collect();
                            out.insert(pattern.clone(), Value::Array(strings));
                        }
                        None => errors.push(messages::substitutions_not_array(pattern)),
                    }
                }
                Some(Value::Object(out))
            }
            _ => {
                errors.push(type_error());
                None
            }
        },
    }
}

fn convert_list_element(
    decl: &OptionDeclaration,
    element: ListElement,
    item: &Value,
    base_dir: &Path,
    errors: &mut Vec<Diagnostic>,
) -> Option<Value> {
    let Some(s) = item.as_str() else {
        errors.push(messages::option_requires_type(decl.name, "string"));
        return None;
    };

    match element {
        ListElement::String => Some(Value::String(s.to_string())),
        ListElement::Path => Some(path_value(base_dir, s)),
        ListElement::Lib => {
            let lowered = s.to_ascii_lowercase();
            match LIBS.iter().find(|(name, _)| *name == lowered) {
                Some((_, file)) => Some(Value::String(file.to_string())),
                None => {
                    let names: Vec<&str> = LIBS.iter().map(|(name, _)| *name).collect();
                    errors.push(messages::invalid_enum_value(decl.name, &names));
                    None
                }
            }
        }
    }
}

fn path_value(base_dir: &Path, value: &str) -> Value {
    let resolved = resolve_config_value(base_dir, base_dir, value);
    Value::String(resolved.to_string_lossy().into_owned())
}

/// Integral, non-negative JSON numbers (json5 may hand back floats)
fn as_unsigned(value: &Value) -> Option<u32> {
    match value.as_u64() {
        Some(n) => u32::try_from(n).ok(),
        None => value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= f64::from(u32::MAX))
            .map(|f| f as u32),
    }
}
