//! Asset emission.

use std::{
    fs, io,
    path::{Component, Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use indexmap::IndexMap;
use log::debug;

/// Stores converted fonts under their generated names.
pub trait AssetEmitter: Send + Sync {
    fn emit(&self, name: &str, data: &[u8]) -> io::Result<()>;
}

impl<T: AssetEmitter + ?Sized> AssetEmitter for Arc<T> {
    fn emit(&self, name: &str, data: &[u8]) -> io::Result<()> {
        (**self).emit(name, data)
    }
}

/// Writes assets below an output directory.
#[derive(Debug, Clone)]
pub struct DirEmitter {
    out_dir: PathBuf,
}

impl DirEmitter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self { out_dir: out_dir.into() }
    }
}

/// Asset names are relative paths that stay below the output directory.
fn check_name(name: &str) -> io::Result<&Path> {
    let path = Path::new(name);
    let escapes = path.components().any(|component| {
        matches!(component, Component::ParentDir | Component::RootDir | Component::Prefix(_))
    });
    if escapes || name.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("asset name '{name}' leaves the output directory"),
        ));
    }
    Ok(path)
}

impl AssetEmitter for DirEmitter {
    fn emit(&self, name: &str, data: &[u8]) -> io::Result<()> {
        let path = self.out_dir.join(check_name(name)?);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        debug!("writing {} ({} bytes)", path.display(), data.len());
        fs::write(path, data)
    }
}

/// Keeps assets in memory, in the order they were emitted.
///
/// Emitting a name twice replaces the data but keeps the original position.
#[derive(Debug, Default)]
pub struct MemoryEmitter {
    assets: Mutex<IndexMap<String, Vec<u8>>>,
}

impl MemoryEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, IndexMap<String, Vec<u8>>> {
        self.assets.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of every emitted asset.
    pub fn assets(&self) -> IndexMap<String, Vec<u8>> {
        self.lock().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.lock().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl AssetEmitter for MemoryEmitter {
    fn emit(&self, name: &str, data: &[u8]) -> io::Result<()> {
        self.lock().insert(name.to_string(), data.to_vec());
        Ok(())
    }
}
