//! Glob expansion against a working directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

/// Options controlling how patterns are expanded.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Directory the patterns are resolved against.
    pub cwd: PathBuf,
    /// Match hidden files and directories.
    pub include_hidden: bool,
    /// Follow symbolic links while walking.
    pub follow_links: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            cwd: PathBuf::from("."),
            include_hidden: false,
            follow_links: false,
        }
    }
}

impl ScanOptions {
    /// Resolve patterns against the given directory.
    pub fn in_dir(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            ..Self::default()
        }
    }
}

/// Expands glob patterns into the relative paths of matching files.
#[derive(Debug, Default)]
pub struct Scanner;

impl Scanner {
    pub fn new() -> Self {
        Self
    }

    /// Return the relative slash-separated paths of all regular files under
    /// the working directory matching any of the patterns. Every file is
    /// tested once against the whole set, so overlapping patterns cannot
    /// produce duplicates. Order is unspecified.
    pub fn matching_paths(
        &self,
        patterns: &[String],
        options: &ScanOptions,
    ) -> Result<Vec<String>> {
        let set = build_glob_set(patterns)?;

        let mut builder = WalkBuilder::new(&options.cwd);
        builder
            .hidden(!options.include_hidden)
            .follow_links(options.follow_links)
            .ignore(false)
            .parents(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false);

        let mut matched = Vec::new();
        for entry in builder.build() {
            let entry = entry.context("failed to walk directory while matching patterns")?;
            if !entry.file_type().is_some_and(|kind| kind.is_file()) {
                continue;
            }
            let relative = to_relative(&options.cwd, entry.path());
            if set.is_match(&relative) {
                matched.push(relative);
            }
        }

        Ok(matched)
    }
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob =
            Glob::new(pattern).with_context(|| format!("invalid glob pattern '{pattern}'"))?;
        builder.add(glob);
    }
    builder.build().context("failed to build glob matcher")
}

fn to_relative(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let segments: Vec<_> = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect();
    segments.join("/")
}
