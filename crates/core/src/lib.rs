//! Facepack Core - font variant resolution and conversion.
//!
//! A manifest lists the source files of one font family. A query selects
//! weights, styles, stretches and formats; any axis it leaves out is taken
//! from the sources. Every combination is matched to a source, converted
//! along the conversion graph, emitted under a content-hashed name, and the
//! results are grouped into `@font-face` rules.

pub mod axis;
pub mod config;
pub mod convert;
pub mod emit;
pub mod error;
pub mod expand;
pub mod format;
pub mod group;
pub mod loader;
pub mod manifest;
pub mod matcher;
pub mod model;
pub mod naming;
pub mod query;
pub mod resolve;
pub mod resource;
pub mod template;

pub use axis::AxisDomains;
pub use convert::{Conversion, convert};
pub use emit::{AssetEmitter, DirEmitter, MemoryEmitter};
pub use error::{Error, Result};
pub use expand::expand;
pub use format::FontFormat;
pub use group::group_faces;
pub use loader::{DataLoader, FsReader, SourceReader};
pub use matcher::find_source;
pub use model::{
    ConvertedFont, FaceKey, FontFace, FontFamilyManifest, SourceFontFile, TargetCombination,
};
pub use naming::{NameContext, asset_pattern, interpolate_name, kebab_case};
pub use query::{QueryOptions, QueryValue, VariantQuery};
pub use resolve::{NamingOptions, PlannedTarget, ResolutionPass};
pub use resource::{FontLoader, LoaderOptions, LoaderOutput, is_stylesheet, public_path};
pub use template::render_stylesheet;
