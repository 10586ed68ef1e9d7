//! Sample discovery and copying
//!
//! The index is built once per batch from a full walk of the samples root and
//! then shared read-only by every conversion.

use std::fs;
use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use crate::error::{ConvertError, Result};

/// File name to path lookup over a directory tree
///
/// The first path found for a name wins; later duplicates are logged and
/// ignored. Directory entries are visited in file-name order so "first" is
/// stable across runs.
#[derive(Debug, Default, Clone)]
pub struct SampleIndex {
    by_name: HashMap<String, PathBuf>,
}

impl SampleIndex {
    /// Walk `root` and index every regular file by its file name
    pub fn build(root: &Path) -> Result<Self> {
        let mut by_name: HashMap<String, PathBuf> = HashMap::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            match by_name.get(&name) {
                Some(existing) => warn!(
                    "Duplicate sample {} (keeping {}, ignoring {})",
                    name,
                    existing.display(),
                    entry.path().display()
                ),
                None => {
                    by_name.insert(name, entry.into_path());
                }
            }
        }

        debug!("Indexed {} sample files under {}", by_name.len(), root.display());
        Ok(Self { by_name })
    }

    /// Path recorded for a file name
    pub fn lookup(&self, file_name: &str) -> Option<&Path> {
        self.by_name.get(file_name).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Resolve a sample reference to a planned copy
    pub fn resolve(&self, file_name: &str) -> Result<SampleCopy> {
        let source = self
            .lookup(file_name)
            .ok_or_else(|| ConvertError::SampleNotFound(file_name.to_string()))?;
        Ok(SampleCopy::new(source))
    }
}

/// A sample file to place next to the program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleCopy {
    /// Where the sample was found
    pub source: PathBuf,
    /// File name in the output directory, extension upper-cased
    pub file_name: String,
}

impl SampleCopy {
    pub fn new(source: &Path) -> Self {
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            source: source.to_path_buf(),
            file_name: upper_extension(&name),
        }
    }

    /// Copy into `dest_dir`, returning the destination path
    pub fn copy_into(&self, dest_dir: &Path) -> Result<PathBuf> {
        let dest = dest_dir.join(&self.file_name);
        trace!("Copying {} -> {}", self.source.display(), dest.display());
        fs::copy(&self.source, &dest).map_err(ConvertError::io(&self.source))?;
        Ok(dest)
    }
}

/// `kick.wav` -> `kick.WAV`
pub fn upper_extension(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(dot) if dot > 0 => {
            let (stem, ext) = file_name.split_at(dot);
            format!("{stem}{}", ext.to_ascii_uppercase())
        }
        _ => file_name.to_string(),
    }
}

/// `kick.wav` -> `kick`
pub fn sample_stem(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(dot) if dot > 0 => &file_name[..dot],
        _ => file_name,
    }
}
