//! Resource-level entry point: manifest text in, stylesheet out.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use log::debug;

use crate::{
    config::{DEFAULT_PUBLIC_PATH, STYLESHEET_EXTENSIONS},
    emit::AssetEmitter,
    error::Result,
    loader::SourceReader,
    model::{FontFace, FontFamilyManifest},
    query::{QueryOptions, VariantQuery},
    resolve::{NamingOptions, ResolutionPass},
    template::render_stylesheet,
};

/// Host options for one resource.
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Options configured for the loader as a whole.
    pub query: QueryOptions,
    /// Options attached to this resource; these win over `query`.
    pub resource_query: QueryOptions,
    /// The host's project root, used for naming when `context` is not set.
    pub root_context: PathBuf,
    /// The host's output public path, if configured.
    pub public_path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoaderOutput {
    pub content: String,
    pub faces: Vec<FontFace>,
    /// Source files the output was built from.
    pub dependencies: Vec<PathBuf>,
}

/// Turns font manifests into stylesheets, emitting converted fonts.
pub struct FontLoader<R> {
    reader: Arc<R>,
    emitter: Arc<dyn AssetEmitter>,
}

impl<R: SourceReader> FontLoader<R> {
    pub fn new(reader: Arc<R>, emitter: Arc<dyn AssetEmitter>) -> Self {
        Self { reader, emitter }
    }

    /// Process the resource at `resource_path` whose text is `input`.
    ///
    /// Stylesheets are returned unchanged. Anything else is read as a
    /// manifest whose file paths are relative to the resource's directory.
    pub async fn process(
        &self,
        resource_path: &Path,
        input: &str,
        options: &LoaderOptions,
    ) -> Result<LoaderOutput> {
        if is_stylesheet(resource_path) {
            debug!("passing through stylesheet {}", resource_path.display());
            return Ok(LoaderOutput {
                content: input.to_string(),
                faces: Vec::new(),
                dependencies: Vec::new(),
            });
        }

        let base_dir = resource_path.parent().unwrap_or(Path::new(""));
        let manifest = FontFamilyManifest::from_json(input, base_dir)?;
        let dependencies = manifest.dependencies();

        let query = options.query.merged(&options.resource_query);
        let variant_query = VariantQuery::from_options(&query)?;

        let naming = NamingOptions {
            context: options
                .query
                .get_str("context")
                .map(PathBuf::from)
                .unwrap_or_else(|| options.root_context.clone()),
            resource_path: resource_path.to_path_buf(),
            reg_exp: options.query.get_str("regExp").map(str::to_string),
        };

        let faces = ResolutionPass::new(
            manifest,
            variant_query,
            Arc::clone(&self.reader),
            Arc::clone(&self.emitter),
        )
        .with_naming(naming)
        .run()
        .await?;

        let public_path = public_path(options.public_path.as_deref(), &query);
        Ok(LoaderOutput {
            content: render_stylesheet(&faces, &public_path),
            faces,
            dependencies,
        })
    }
}

/// Host public path, else the `basePath` option, else `/`.
pub fn public_path(host: Option<&str>, query: &QueryOptions) -> String {
    host.filter(|path| !path.is_empty())
        .or_else(|| query.get_str("basePath").filter(|path| !path.is_empty()))
        .unwrap_or(DEFAULT_PUBLIC_PATH)
        .to_string()
}

/// Whether `path` names a stylesheet rather than a manifest.
pub fn is_stylesheet(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            STYLESHEET_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known))
        })
}
