//! The `plan` command: show how each combination resolves.

use std::{path::Path, sync::Arc};

use anyhow::Result;
use facepack_core::{
    FontFamilyManifest, FsReader, MemoryEmitter, QueryOptions, ResolutionPass, VariantQuery,
};

use crate::io::FontFile;

/// One line per target combination: the combination and its source.
pub fn plan_lines(manifest_path: &Path, options: &QueryOptions) -> Result<Vec<String>> {
    let text = FontFile::new(manifest_path).read_text()?;
    let base_dir = manifest_path.parent().unwrap_or(Path::new(""));
    let manifest = FontFamilyManifest::from_json(&text, base_dir)?;
    let query = VariantQuery::from_options(options)?;

    let pass =
        ResolutionPass::new(manifest, query, Arc::new(FsReader), Arc::new(MemoryEmitter::new()));
    let files = &pass.manifest().files;
    Ok(pass
        .plan()
        .iter()
        .map(|planned| match planned.source {
            Some(index) => format!("{} <- {}", planned.target, files[index].path.display()),
            None => format!("{} (no match)", planned.target),
        })
        .collect())
}

pub fn print_plan(manifest_path: &Path, options: &QueryOptions) -> Result<()> {
    let lines = plan_lines(manifest_path, options)?;
    let matched = lines.iter().filter(|line| !line.ends_with("(no match)")).count();
    for line in &lines {
        println!("{line}");
    }
    println!("{} combinations, {matched} matched", lines.len());
    Ok(())
}
