//! The `build` command: resolve manifests and write assets plus stylesheets.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Instant,
};

use anyhow::{Context, Result, bail};
use facepack_core::{DirEmitter, FontLoader, FsReader, LoaderOptions, LoaderOutput, QueryOptions};
use log::debug;

use crate::{
    io::{FontFile, expand_inputs},
    parallel::{BatchResult, process_parallel_iter},
};

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub out_dir: PathBuf,
    pub query: QueryOptions,
    pub public_path: Option<String>,
    /// Stylesheet path when building a single manifest.
    pub css: Option<PathBuf>,
}

/// Build every manifest in parallel, each in its own resolution pass.
pub fn build(manifests: &[PathBuf], options: &BuildOptions) -> Result<BatchResult> {
    let manifests = expand_inputs(manifests)?;
    if options.css.is_some() && manifests.len() > 1 {
        bail!("--css can only be used with a single manifest");
    }

    let start = Instant::now();
    let result = process_parallel_iter("Build", &manifests, |manifest| {
        build_manifest(manifest, options)
            .with_context(|| format!("Failed to build {}", manifest.display()))
    });
    println!("  ✓ {} manifests ({:.2}s)", result.total(), start.elapsed().as_secs_f64());
    Ok(result)
}

/// Resolve one manifest and write its stylesheet. Returns the stylesheet path.
pub fn build_manifest(manifest: &Path, options: &BuildOptions) -> Result<PathBuf> {
    let input = FontFile::new(manifest).read_text()?;
    let loader_options = LoaderOptions {
        query: options.query.clone(),
        resource_query: QueryOptions::new(),
        root_context: std::env::current_dir().context("Failed to get current directory")?,
        public_path: options.public_path.clone(),
    };
    let loader = FontLoader::new(Arc::new(FsReader), Arc::new(DirEmitter::new(&options.out_dir)));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let output = runtime.block_on(loader.process(manifest, &input, &loader_options))?;

    let css = options.css.clone().unwrap_or_else(|| stylesheet_path(&options.out_dir, manifest));
    FontFile::new(&css).write(&output.content)?;
    report(manifest, &css, &output);
    Ok(css)
}

/// `<out_dir>/<manifest stem>.css`
fn stylesheet_path(out_dir: &Path, manifest: &Path) -> PathBuf {
    let stem = manifest.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    out_dir.join(format!("{stem}.css"))
}

fn report(manifest: &Path, css: &Path, output: &LoaderOutput) {
    let files: usize = output.faces.iter().map(|face| face.files.len()).sum();
    println!(
        "{}: {} faces, {} files -> {}",
        manifest.display(),
        output.faces.len(),
        files,
        css.display()
    );
    for face in &output.faces {
        for file in &face.files {
            debug!("  {} {} {}: {}", face.weight, face.style, face.stretch, file.file);
        }
    }
}
