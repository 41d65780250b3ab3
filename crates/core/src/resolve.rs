//! The resolution pass: expand, match, load, convert, emit and group.

use std::{path::PathBuf, sync::Arc};

use log::{debug, info, warn};
use tokio::task::JoinSet;

use crate::{
    axis::AxisDomains,
    convert::Conversion,
    emit::AssetEmitter,
    error::{Error, Result},
    expand::expand,
    group::group_faces,
    loader::{DataLoader, SourceReader},
    matcher::find_source,
    model::{ConvertedFont, FontFace, FontFamilyManifest, TargetCombination},
    naming::{NameContext, asset_pattern, interpolate_name},
    query::VariantQuery,
};

/// Inputs to asset name interpolation that come from the host.
#[derive(Debug, Clone, Default)]
pub struct NamingOptions {
    pub context: PathBuf,
    pub resource_path: PathBuf,
    pub reg_exp: Option<String>,
}

/// A target combination and the index of the source that provides it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedTarget {
    pub target: TargetCombination,
    pub source: Option<usize>,
}

/// One resolution of a manifest against a query.
pub struct ResolutionPass<R> {
    manifest: Arc<FontFamilyManifest>,
    query: VariantQuery,
    loader: Arc<DataLoader<R>>,
    emitter: Arc<dyn AssetEmitter>,
    naming: Arc<NamingOptions>,
}

impl<R: SourceReader> ResolutionPass<R> {
    pub fn new(
        manifest: FontFamilyManifest,
        query: VariantQuery,
        reader: Arc<R>,
        emitter: Arc<dyn AssetEmitter>,
    ) -> Self {
        let loader = Arc::new(DataLoader::new(reader, &manifest.files));
        Self {
            manifest: Arc::new(manifest),
            query,
            loader,
            emitter,
            naming: Arc::new(NamingOptions::default()),
        }
    }

    pub fn with_naming(mut self, naming: NamingOptions) -> Self {
        self.naming = Arc::new(naming);
        self
    }

    pub fn manifest(&self) -> &FontFamilyManifest {
        &self.manifest
    }

    pub fn loader(&self) -> &DataLoader<R> {
        &self.loader
    }

    /// Every target combination with its matched source, in expansion order.
    ///
    /// Sources whose format is unknown are left out of the inferred format
    /// domain. Such a source only fails the pass when it is the first match
    /// for some combination; listed after a known source with the same
    /// weight, style and stretch, it is never used.
    pub fn plan(&self) -> Vec<PlannedTarget> {
        let domains = AxisDomains::resolve(&self.query, &self.manifest);
        expand(&domains)
            .into_iter()
            .map(|target| {
                let source = find_source(&target, &self.manifest.files).map(|(index, _)| index);
                PlannedTarget { target, source }
            })
            .collect()
    }

    /// Convert and emit every matched combination, then group the results.
    ///
    /// Combinations without a source are skipped. Any other failure aborts
    /// the pass and cancels the remaining work. Conversions already running
    /// on the blocking pool cannot be cancelled and may still emit their
    /// assets after the pass has returned the error.
    pub async fn run(&self) -> Result<Vec<FontFace>> {
        let planned = self.plan();
        debug!("resolving {} combinations for '{}'", planned.len(), self.manifest.name);

        let mut tasks = JoinSet::new();
        for (index, PlannedTarget { target, source }) in planned.into_iter().enumerate() {
            let Some(source) = source else {
                warn!("No font for combination {target}");
                continue;
            };
            let job = TargetJob {
                manifest: Arc::clone(&self.manifest),
                loader: Arc::clone(&self.loader),
                emitter: Arc::clone(&self.emitter),
                naming: Arc::clone(&self.naming),
                source,
                target,
            };
            tasks.spawn(async move { job.run().await.map(|font| (index, font)) });
        }

        let mut fonts = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            fonts.push(joined??);
        }
        fonts.sort_by_key(|(index, _)| *index);

        Ok(group_faces(
            &self.manifest.name,
            fonts.into_iter().map(|(_, font)| font).collect(),
        ))
    }
}

struct TargetJob<R> {
    manifest: Arc<FontFamilyManifest>,
    loader: Arc<DataLoader<R>>,
    emitter: Arc<dyn AssetEmitter>,
    naming: Arc<NamingOptions>,
    source: usize,
    target: TargetCombination,
}

impl<R: SourceReader> TargetJob<R> {
    async fn run(self) -> Result<ConvertedFont> {
        let file = &self.manifest.files[self.source];
        let conversion = Conversion::plan(file.format, self.target.format)?;
        let copy = if conversion.is_identity() { " (copy)" } else { "" };
        debug!("{} -> {}{copy}", file.path.display(), self.target);

        let data = self.loader.load(self.source).await?;
        let path = file.path.clone();
        let family = self.manifest.name.clone();
        let Self { emitter, naming, target, .. } = self;

        tokio::task::spawn_blocking(move || -> Result<ConvertedFont> {
            let data = conversion.apply(&path, data)?;
            let name = interpolate_name(
                &asset_pattern(&family, &target),
                &NameContext {
                    context: &naming.context,
                    resource_path: &naming.resource_path,
                    content: &data,
                    reg_exp: naming.reg_exp.as_deref(),
                },
            );
            emitter
                .emit(&name, &data)
                .map_err(|source| Error::Emit { name: name.clone(), source })?;
            info!("Emitted {name} ({target})");
            Ok(ConvertedFont { target, data, file: name })
        })
        .await?
    }
}
