//! Barrel module generation pipeline.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::app::identifier::to_identifier;
use crate::app::render::{ModuleFormat, RenderOptions, Renderer};
use crate::app::scan::{ScanOptions, Scanner};
use crate::app::sort::{SortFunction, default_sort};
use crate::domain::errors::GenerateError;
use crate::domain::model::FileEntry;
use crate::infra::config::Config;

/// Runtime options controlling a generation run.
#[derive(Clone)]
pub struct GenerateOptions {
    pub format: ModuleFormat,
    pub sort: SortFunction,
    pub path_prefix: String,
    pub export_with_path: bool,
    pub patterns: Vec<String>,
    pub output_path: Option<PathBuf>,
}

impl GenerateOptions {
    /// Defaults: cjs output, depth-then-alphabetic order, `./` prefix, bare
    /// references, no output file.
    pub fn new(patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            format: ModuleFormat::Cjs,
            sort: default_sort(),
            path_prefix: "./".to_owned(),
            export_with_path: false,
            patterns: patterns.into_iter().map(Into::into).collect(),
            output_path: None,
        }
    }

    /// Build options from configuration defaults. Fails on an unknown
    /// format value so bad configuration is rejected before any matching.
    pub fn from_config(
        patterns: impl IntoIterator<Item = impl Into<String>>,
        config: &Config,
    ) -> Result<Self> {
        let format: ModuleFormat = config.defaults.format.parse()?;
        Ok(Self {
            format,
            path_prefix: config.defaults.path_prefix.clone(),
            export_with_path: config.emit.export_with_path(),
            ..Self::new(patterns)
        })
    }

    pub fn with_format(mut self, format: ModuleFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_sort(mut self, sort: SortFunction) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_path_prefix(mut self, path_prefix: impl Into<String>) -> Self {
        self.path_prefix = path_prefix.into();
        self
    }

    pub fn with_export_with_path(mut self, export_with_path: bool) -> Self {
        self.export_with_path = export_with_path;
        self
    }

    pub fn with_output_path(mut self, output_path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(output_path.into());
        self
    }
}

impl fmt::Debug for GenerateOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerateOptions")
            .field("format", &self.format)
            .field("sort", &"<comparator>")
            .field("path_prefix", &self.path_prefix)
            .field("export_with_path", &self.export_with_path)
            .field("patterns", &self.patterns)
            .field("output_path", &self.output_path)
            .finish()
    }
}

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerateResult {
    /// The rendered module text, also written to `output_path` when set.
    pub rendered: String,
    pub output_path: Option<PathBuf>,
    pub entries: Vec<FileEntry>,
}

/// Composes scanning, ordering, identifier derivation, and rendering.
pub struct Generator {
    scanner: Scanner,
    renderer: Renderer,
}

impl Generator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            scanner: Scanner::new(),
            renderer: Renderer::new()?,
        })
    }

    /// Run the full pipeline and return the rendered module, persisting it
    /// first when an output path is configured.
    pub fn generate(
        &self,
        options: &GenerateOptions,
        scan_options: &ScanOptions,
    ) -> Result<GenerateResult> {
        if options.patterns.is_empty() {
            return Err(GenerateError::NoPatterns.into());
        }

        let mut paths = self
            .scanner
            .matching_paths(&options.patterns, scan_options)?;
        // Deduplicate before the configured order is applied; the stable
        // sort then preserves lexicographic order between ties.
        paths.sort_unstable();
        paths.dedup();
        paths.sort_by(|a, b| (options.sort)(a, b));

        let entries = derive_entries(paths)?;
        let render_options = RenderOptions {
            path_prefix: options.path_prefix.clone(),
            export_with_path: options.export_with_path,
        };
        let rendered = self
            .renderer
            .render(options.format, &entries, &render_options)?;

        if let Some(path) = &options.output_path {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create output directory: {}", parent.display())
                })?;
            }
            fs::write(path, &rendered)
                .with_context(|| format!("failed to write module to {}", path.display()))?;
        }

        tracing::debug!(
            files = entries.len(),
            format = options.format.as_str(),
            "generated barrel module"
        );

        Ok(GenerateResult {
            rendered,
            output_path: options.output_path.clone(),
            entries,
        })
    }
}

/// Pair every path with its identifier, rejecting collisions so each entry
/// stays independently addressable in the generated module.
fn derive_entries(paths: Vec<String>) -> Result<Vec<FileEntry>, GenerateError> {
    let mut seen: HashMap<String, String> = HashMap::new();
    let mut entries = Vec::with_capacity(paths.len());
    for path in paths {
        let identifier = to_identifier(&path);
        if let Some(first) = seen.insert(identifier.clone(), path.clone()) {
            return Err(GenerateError::DuplicateIdentifier {
                identifier,
                first,
                second: path,
            });
        }
        entries.push(FileEntry { path, identifier });
    }
    Ok(entries)
}
