//! CLI definitions and command dispatch.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use facepack_core::{FontFormat, QueryOptions, QueryValue};

use crate::commands::{
    build::{BuildOptions, build},
    convert::convert_file,
    plan::print_plan,
};

#[derive(Parser)]
#[command(name = "facepack")]
#[command(about = "Resolve font manifests into web fonts and @font-face stylesheets")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Variant selection, either as a query string or as individual flags.
///
/// Flags override keys of the same name in `--query`.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct QueryArgs {
    /// Loader query, e.g. `weight=400&weight=700&format[]=woff2`
    #[arg(short, long)]
    pub query: Option<String>,
    #[arg(short, long)]
    pub weight: Vec<u16>,
    #[arg(long)]
    pub style: Vec<String>,
    #[arg(long)]
    pub stretch: Vec<String>,
    #[arg(short, long)]
    pub format: Vec<FontFormat>,
    /// Prefix for font URLs in the stylesheet
    #[arg(long)]
    pub base_path: Option<String>,
}

impl QueryArgs {
    pub fn to_options(&self) -> Result<QueryOptions> {
        let mut options = match &self.query {
            Some(query) => QueryOptions::parse(query)?,
            None => QueryOptions::new(),
        };
        if !self.weight.is_empty() {
            options.insert("weight", many(self.weight.iter().map(u16::to_string)));
        }
        if !self.style.is_empty() {
            options.insert("style", many(self.style.iter().cloned()));
        }
        if !self.stretch.is_empty() {
            options.insert("stretch", many(self.stretch.iter().cloned()));
        }
        if !self.format.is_empty() {
            options.insert("format", many(self.format.iter().map(|f| f.name().to_string())));
        }
        if let Some(base_path) = &self.base_path {
            options.insert("basePath", base_path.as_str());
        }
        Ok(options)
    }
}

fn many(values: impl Iterator<Item = String>) -> QueryValue {
    QueryValue::Many(values.collect())
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert every variant of one or more manifests and write a stylesheet for each
    Build {
        /// Manifest files or glob patterns
        #[arg(required = true)]
        manifests: Vec<PathBuf>,
        #[arg(short, long, default_value = "dist")]
        out_dir: PathBuf,
        #[command(flatten)]
        query: QueryArgs,
        /// Host public path; takes precedence over --base-path
        #[arg(long)]
        public_path: Option<String>,
        /// Stylesheet output path (single manifest only)
        #[arg(long)]
        css: Option<PathBuf>,
    },
    /// Convert a single font along one edge of the conversion graph
    Convert {
        input: PathBuf,
        #[arg(long)]
        to: FontFormat,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Source format; inferred from the extension by default
        #[arg(long)]
        from: Option<FontFormat>,
    },
    /// Show which source each variant resolves to, without converting
    Plan {
        manifest: PathBuf,
        #[command(flatten)]
        query: QueryArgs,
    },
}

impl Commands {
    pub fn run(self) -> Result<()> {
        match self {
            Commands::Build { manifests, out_dir, query, public_path, css } => {
                let options = BuildOptions {
                    out_dir,
                    query: query.to_options()?,
                    public_path,
                    css,
                };
                build(&manifests, &options)?.ok_or_bail("Build")?;
            }
            Commands::Convert { input, to, output, from } => {
                let output = convert_file(&input, output.as_deref(), from, to)?;
                println!("Converted {} -> {}", input.display(), output.display());
            }
            Commands::Plan { manifest, query } => {
                print_plan(&manifest, &query.to_options()?)?;
            }
        }
        Ok(())
    }
}
