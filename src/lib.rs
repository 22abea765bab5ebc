//! GObject-Introspection Compiler
//!
//! Reads GIR interface descriptions of GNOME libraries and decides, for every
//! type and callable, how Java bindings expose and call it.
//!
//! # Basic Usage
//!
//! ```no_run
//! use girc::{compile_to_directory, discover_sources, CompilerOptions, Platform, Result};
//!
//! fn main() -> Result<()> {
//!     let mut sources = discover_sources("gir/linux", Platform::LINUX)?;
//!     sources.extend(discover_sources("gir/windows", Platform::WINDOWS)?);
//!     compile_to_directory(&sources, "build/decisions", &CompilerOptions::default())?;
//!     Ok(())
//! }
//! ```
//!
//! # Compilation Pipeline
//!
//! 1. **Phase 1**: Lexer & Parser - Build one node tree per GIR document
//! 2. **Phase 2**: Merge - Fold platform variants of each namespace together
//! 3. **Phase 3**: Patches - Drop or rename declarations the bindings cannot represent
//! 4. **Phase 4**: Symbol Table - Index every namespace, then freeze
//! 5. **Phase 5**: Ownership - Classify floating classes
//! 6. **Phase 6**: Decisions - Descriptors, binding forms, names and Javadoc

pub mod types;
pub mod error;
pub mod lexer;
pub mod utils;

pub mod ast;
pub mod model;
pub mod parser;
pub mod merge;
pub mod patches;
pub mod resolver;
pub mod ownership;
pub mod docs;
pub mod codegen;
pub mod output;
pub mod cli;

use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Instant;
use walkdir::WalkDir;

// Re-export commonly used types and functions
pub use error::{CompilerError, Result};
pub use types::*;
pub use ast::{Node, NodeKind};
pub use model::{Callable, Namespace, Parameter, RegisteredType, Repository, TypeRef};
pub use parser::parse_repository;
pub use merge::merge_all;
pub use patches::{Patch, PatchRegistry};
pub use resolver::{ResolvedType, SymbolTable};
pub use ownership::OwnershipTable;
pub use docs::{ConvertedDoc, DocTransformer};
pub use codegen::{BindingForm, CodeGenerator, Descriptor, MarshalRule, Suppression};
pub use output::{MemberDecision, NamespaceDecision, TypeDecision};

/// Compiler version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Compilation options and settings
#[derive(Debug, Clone)]
pub struct CompilerOptions {
    /// Enable debug mode with extra logging
    pub debug_mode: bool,

    /// Prefix of generated packages ("org.gnome" -> "org.gnome.gtk")
    pub package_prefix: String,

    /// Namespace -> package overrides
    pub packages: HashMap<String, String>,

    /// Apply the built-in patch list
    pub default_patches: bool,

    /// Patches applied after the built-in list
    pub patches: Vec<Patch>,

    /// Pretty-print the JSON decision files
    pub pretty_json: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            debug_mode: false,
            package_prefix: DEFAULT_PACKAGE_PREFIX.to_string(),
            packages: HashMap::new(),
            default_patches: true,
            patches: Vec::new(),
            pretty_json: false,
        }
    }
}

/// Compilation statistics and metrics
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompilationStats {
    /// Total size of all GIR documents in bytes
    pub source_size: u64,

    /// Number of GIR documents read
    pub document_count: usize,

    /// Number of namespaces after merging
    pub namespace_count: usize,

    /// Number of registered types with a decision record
    pub type_count: usize,

    /// Number of callables with a decision record, suppressed ones included
    pub callable_count: usize,

    /// Callables that get no binding (shadowed, moved, not introspectable)
    pub suppressed_count: usize,

    /// Declarations left out because they failed to resolve
    pub skipped_count: usize,

    /// Classes whose instances start with a floating reference
    pub floating_count: usize,

    /// Patches that took effect
    pub patches_applied: usize,

    /// Documentation references rendered as code
    pub doc_misses: usize,

    /// Compilation time in milliseconds
    pub compile_time_ms: u64,
}

/// One GIR document and the platform it describes
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub filename: String,
    pub contents: String,
    pub platform: Platform,
}

impl SourceDocument {
    pub fn new(filename: impl Into<String>, contents: impl Into<String>, platform: Platform) -> Self {
        Self {
            filename: filename.into(),
            contents: contents.into(),
            platform,
        }
    }

    pub fn from_file(path: &Path, platform: Platform) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| CompilerError::FileNotFound {
            path: format!("{}: {}", path.display(), e),
        })?;
        Ok(Self::new(path.display().to_string(), contents, platform))
    }
}

/// Find all `*.gir` files below a directory, in a stable order
pub fn discover_sources(dir: impl AsRef<Path>, platform: Platform) -> Result<Vec<SourceDocument>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(CompilerError::FileNotFound {
            path: dir.display().to_string(),
        });
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| CompilerError::InvalidFormat {
            message: format!("Cannot read {}: {}", dir.display(), e),
        })?;
        if entry.file_type().is_file() && entry.path().extension().map(|e| e == "gir").unwrap_or(false) {
            paths.push(entry.into_path());
        }
    }

    log::debug!("Found {} GIR files for [{}] in {}", paths.len(), platform, dir.display());

    paths
        .iter()
        .map(|path| SourceDocument::from_file(path, platform))
        .collect()
}

/// Parse, merge and patch GIR documents into one repository per namespace
pub fn build_repositories(
    sources: &[SourceDocument],
    options: &CompilerOptions,
    stats: &mut CompilationStats,
) -> Result<Vec<Repository>> {
    // Phase 1: Lexer & Parser
    if options.debug_mode {
        log::debug!("Phase 1: Parsing {} documents...", sources.len());
    }

    let mut parsed = Vec::with_capacity(sources.len());
    for source in sources {
        stats.source_size += source.contents.len() as u64;
        parsed.push(parse_repository(&source.contents, &source.filename, source.platform)?);
    }
    stats.document_count = parsed.len();

    // Phase 2: Merge platform variants
    if options.debug_mode {
        log::debug!("Phase 2: Merging platform variants...");
    }

    let mut repositories = merge_all(parsed)?;

    // Phase 3: Patches
    let mut registry = if options.default_patches {
        PatchRegistry::with_defaults()
    } else {
        PatchRegistry::new()
    };
    registry.extend(options.patches.iter().cloned());

    if options.debug_mode {
        log::debug!("Phase 3: Applying {} patches...", registry.len());
    }

    stats.patches_applied = registry.apply(&mut repositories);

    Ok(repositories)
}

/// Decide bindings for already merged repositories
pub fn compile_repositories(
    repositories: &[Repository],
    options: &CompilerOptions,
    stats: &mut CompilationStats,
) -> Result<Vec<NamespaceDecision>> {
    // Phase 4: Symbol table
    if options.debug_mode {
        log::debug!("Phase 4: Indexing {} namespaces...", repositories.len());
    }

    let table = SymbolTable::build(repositories, &options.package_prefix, &options.packages);

    // Phase 5: Ownership
    let ownership = OwnershipTable::build(&table);

    if options.debug_mode {
        log::debug!("Phase 5 complete. Floating classes: {}", ownership.floating_count());
    }

    // Phase 6: Decisions
    let transformer = DocTransformer::new();
    let generator = CodeGenerator::new(&table, &ownership, &transformer);
    let decisions = generator.generate_all()?;

    stats.namespace_count = decisions.len();
    stats.floating_count = ownership.floating_count();
    for ns in &decisions {
        stats.type_count += ns.types.len();
        stats.skipped_count += ns.skipped.len();
        stats.doc_misses += ns.doc_misses;
        for member in ns.callables() {
            stats.callable_count += 1;
            if member.is_suppressed() {
                stats.suppressed_count += 1;
            }
        }
    }

    if options.debug_mode {
        log::debug!(
            "Phase 6 complete. Types: {}, callables: {}, skipped: {}",
            stats.type_count,
            stats.callable_count,
            stats.skipped_count
        );
    }

    Ok(decisions)
}

/// Run the whole pipeline over a set of GIR documents
pub fn compile_sources(
    sources: &[SourceDocument],
    options: &CompilerOptions,
) -> Result<(Vec<NamespaceDecision>, CompilationStats)> {
    let start_time = Instant::now();
    let mut stats = CompilationStats::default();

    if options.debug_mode {
        log::info!("{} v{}", NAME, VERSION);
        log::debug!("Compiler options: {:?}", options);
    }

    let repositories = build_repositories(sources, options, &mut stats)?;
    let decisions = compile_repositories(&repositories, options, &mut stats)?;

    stats.compile_time_ms = start_time.elapsed().as_millis() as u64;
    Ok((decisions, stats))
}

/// Serialize one namespace's decisions
pub fn to_json(decision: &NamespaceDecision, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(decision)?
    } else {
        serde_json::to_string(decision)?
    };
    Ok(json)
}

/// Compile and write one `<namespace>.json` file per namespace
pub fn compile_to_directory(
    sources: &[SourceDocument],
    output_dir: impl AsRef<Path>,
    options: &CompilerOptions,
) -> Result<CompilationStats> {
    let output_dir = output_dir.as_ref();
    let (decisions, stats) = compile_sources(sources, options)?;

    fs::create_dir_all(output_dir)?;
    for decision in &decisions {
        let path = output_dir.join(format!("{}.json", decision.name));
        fs::write(&path, to_json(decision, options.pretty_json)?)?;
        log::debug!("Wrote {}", path.display());
    }

    if options.debug_mode {
        log::info!("Compilation successful!");
        log::info!("Namespaces: {}", stats.namespace_count);
        log::info!("Compile time: {}ms", stats.compile_time_ms);
        log::debug!("Full stats: {:?}", stats);
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FROB_LINUX: &str = r#"<?xml version="1.0"?>
<repository version="1.2">
  <namespace name="Frob" version="1.0" shared-library="libfrob.so.1">
    <record name="Frob" c:type="Frob">
      <field name="a"><type name="gint" c:type="int"/></field>
      <field name="b"><type name="gint" c:type="int"/></field>
      <constructor name="new" c:identifier="frob_new" throws="1">
        <return-value transfer-ownership="full"><type name="Frob" c:type="Frob*"/></return-value>
      </constructor>
    </record>
  </namespace>
</repository>"#;

    const FROB_WINDOWS: &str = r#"<?xml version="1.0"?>
<repository version="1.2">
  <namespace name="Frob" version="1.0" shared-library="libfrob-1.dll">
    <record name="Frob" c:type="Frob">
      <field name="a"><type name="gint" c:type="int"/></field>
      <constructor name="new" c:identifier="frob_new" throws="1">
        <return-value transfer-ownership="full"><type name="Frob" c:type="Frob*"/></return-value>
      </constructor>
    </record>
  </namespace>
</repository>"#;

    fn frob_sources() -> Vec<SourceDocument> {
        vec![
            SourceDocument::new("linux/Frob-1.0.gir", FROB_LINUX, Platform::LINUX),
            SourceDocument::new("windows/Frob-1.0.gir", FROB_WINDOWS, Platform::WINDOWS),
        ]
    }

    #[test]
    fn test_platform_variants_end_to_end() {
        let options = CompilerOptions::default();
        let mut stats = CompilationStats::default();
        let repositories = build_repositories(&frob_sources(), &options, &mut stats).unwrap();
        assert_eq!(repositories.len(), 1);

        let frob = repositories[0].namespace.get_type("Frob").unwrap();
        assert_eq!(frob.fields().count(), 0);
        assert_eq!(frob.platforms(), Platform::LINUX | Platform::WINDOWS);

        let decisions = compile_repositories(&repositories, &options, &mut stats).unwrap();
        let ctor = decisions[0].get_type("Frob").unwrap().member("new").unwrap();
        assert_eq!(ctor.binding, BindingForm::Constructor);
        assert_eq!(
            ctor.descriptor.as_ref().unwrap().last_rule(),
            Some(MarshalRule::ErrorSlot)
        );
        assert_eq!(ctor.constructor.as_ref().unwrap().name, "constructNew");
        assert!(ctor.platform_guard);
    }

    #[test]
    fn test_compile_to_directory() {
        let out = TempDir::new().unwrap();
        let options = CompilerOptions {
            pretty_json: true,
            ..Default::default()
        };
        let stats = compile_to_directory(&frob_sources(), out.path(), &options).unwrap();

        assert_eq!(stats.document_count, 2);
        assert_eq!(stats.namespace_count, 1);
        assert_eq!(stats.type_count, 1);
        assert_eq!(stats.callable_count, 1);
        assert_eq!(stats.skipped_count, 0);

        let json = fs::read_to_string(out.path().join("Frob.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["package"], "org.gnome.frob");
        assert_eq!(value["types"][0]["record"]["opaque"], true);
        assert_eq!(value["types"][0]["members"][0]["binding"], "constructor");
        assert_eq!(
            value["types"][0]["members"][0]["descriptor"]["parameters"][0],
            "error-slot"
        );
    }

    #[test]
    fn test_discover_sources() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/Frob-1.0.gir"), FROB_LINUX).unwrap();
        fs::write(dir.path().join("README.txt"), "not a gir file").unwrap();

        let sources = discover_sources(dir.path(), Platform::MACOS).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].platform, Platform::MACOS);
        assert!(sources[0].filename.ends_with("Frob-1.0.gir"));

        assert!(discover_sources(dir.path().join("missing"), Platform::LINUX).is_err());
    }

    #[test]
    fn test_user_patches() {
        let options = CompilerOptions {
            default_patches: false,
            patches: vec![Patch::remove_type("Frob", "Frob")],
            ..Default::default()
        };
        let (decisions, stats) = compile_sources(&frob_sources(), &options).unwrap();
        assert_eq!(stats.patches_applied, 1);
        assert!(decisions[0].types.is_empty());
    }

    #[test]
    fn test_schema_errors_abort() {
        let broken = SourceDocument::new("Broken.gir", "<repository><frobnicate/></repository>", Platform::ALL);
        let err = compile_sources(&[broken], &CompilerOptions::default()).unwrap_err();
        assert!(err.is_fatal_for_run());
    }
}
