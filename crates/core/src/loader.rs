//! Single-flight loading of source font bytes.

use std::{
    future::Future,
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::debug;
use tokio::sync::OnceCell;

use crate::{
    error::{Error, Result},
    model::SourceFontFile,
};

/// Reads the raw bytes of a source file.
pub trait SourceReader: Send + Sync + 'static {
    fn read(&self, path: &Path) -> impl Future<Output = io::Result<Vec<u8>>> + Send;
}

/// Reads sources from the file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl SourceReader for FsReader {
    fn read(&self, path: &Path) -> impl Future<Output = io::Result<Vec<u8>>> + Send {
        tokio::fs::read(path.to_path_buf())
    }
}

/// Outcome of one source read, shared by every requester.
type ReadOutcome = std::result::Result<Arc<[u8]>, Arc<io::Error>>;

/// Memoized source data for one resolution pass.
///
/// Each source is read at most once; concurrent requests for the same
/// source wait on the first read and share its outcome, failures included.
pub struct DataLoader<R> {
    reader: Arc<R>,
    paths: Vec<PathBuf>,
    cells: Vec<OnceCell<ReadOutcome>>,
}

impl<R: SourceReader> DataLoader<R> {
    pub fn new(reader: Arc<R>, files: &[SourceFontFile]) -> Self {
        Self {
            reader,
            paths: files.iter().map(|file| file.path.clone()).collect(),
            cells: files.iter().map(|_| OnceCell::new()).collect(),
        }
    }

    /// Bytes of the source at `index` in manifest order.
    pub async fn load(&self, index: usize) -> Result<Arc<[u8]>> {
        let path = &self.paths[index];
        let outcome = self.cells[index]
            .get_or_init(|| async {
                debug!("reading {}", path.display());
                self.reader.read(path).await.map(Arc::from).map_err(Arc::new)
            })
            .await;
        match outcome {
            Ok(data) => Ok(Arc::clone(data)),
            Err(source) => Err(Error::Read {
                path: path.clone(),
                source: Arc::clone(source),
            }),
        }
    }

    /// Whether the source at `index` has already been read.
    pub fn is_loaded(&self, index: usize) -> bool {
        self.cells[index].initialized()
    }
}
