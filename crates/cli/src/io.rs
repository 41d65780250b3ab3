//! Shared file I/O utilities.

use std::{
    fs::{create_dir_all, read, read_to_string, write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use glob::glob;

/// A file handle for I/O operations.
#[derive(Debug, Clone)]
pub struct FontFile {
    path: PathBuf,
}

impl FontFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read font data from the file.
    pub fn read(&self) -> Result<Vec<u8>> {
        read(&self.path).with_context(|| format!("Failed to read font: {}", self.path.display()))
    }

    /// Read a manifest or other text file.
    pub fn read_text(&self) -> Result<String> {
        read_to_string(&self.path)
            .with_context(|| format!("Failed to read file: {}", self.path.display()))
    }

    /// Write data to the file, creating its parent directory first.
    pub fn write(&self, data: impl AsRef<[u8]>) -> Result<()> {
        self.ensure_parent_dir()?;
        write(&self.path, data)
            .with_context(|| format!("Failed to write file: {}", self.path.display()))
    }

    /// Create parent directory if it doesn't exist.
    pub fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }
        Ok(())
    }
}

impl AsRef<Path> for FontFile {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// Expand glob patterns among `inputs`; plain paths are kept as given.
///
/// A pattern that matches nothing is an error.
pub fn expand_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        let pattern = input.to_str().context("Invalid pattern path")?;
        if !pattern.contains(['*', '?', '[']) {
            paths.push(input.clone());
            continue;
        }
        let matched: Vec<PathBuf> = glob(pattern)
            .with_context(|| format!("Failed to glob pattern: {pattern}"))?
            .filter_map(Result::ok)
            .collect();
        if matched.is_empty() {
            bail!("No files match {pattern}");
        }
        paths.extend(matched);
    }
    Ok(paths)
}
