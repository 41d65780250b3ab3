//! Data model shared by the resolution stages.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    config::{DEFAULT_STRETCH, DEFAULT_STYLE, DEFAULT_WEIGHT},
    format::FontFormat,
};

/// A candidate source file from the manifest, with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFontFile {
    pub path: PathBuf,
    pub weight: u16,
    pub style: String,
    pub stretch: String,
    /// `None` when the extension is not a known container format.
    pub format: Option<FontFormat>,
}

impl SourceFontFile {
    /// A source at `path` with default axes and the format inferred from its extension.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = FontFormat::from_path(&path);
        Self {
            path,
            weight: DEFAULT_WEIGHT,
            style: DEFAULT_STYLE.to_string(),
            stretch: DEFAULT_STRETCH.to_string(),
            format,
        }
    }

    pub fn with_weight(mut self, weight: u16) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = style.into();
        self
    }

    pub fn with_stretch(mut self, stretch: impl Into<String>) -> Self {
        self.stretch = stretch.into();
        self
    }

    pub fn with_format(mut self, format: FontFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this source provides the face a target asks for. Format is not compared.
    pub fn provides(&self, target: &TargetCombination) -> bool {
        self.weight == target.weight && self.style == target.style && self.stretch == target.stretch
    }
}

/// A font family and its candidate source files, in manifest order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFamilyManifest {
    pub name: String,
    pub files: Vec<SourceFontFile>,
}

impl FontFamilyManifest {
    pub fn new(name: impl Into<String>, files: Vec<SourceFontFile>) -> Self {
        Self { name: name.into(), files }
    }

    /// Paths of every source file, which the host may watch for changes.
    pub fn dependencies(&self) -> Vec<PathBuf> {
        self.files.iter().map(|file| file.path.clone()).collect()
    }
}

/// The (weight, style, stretch) triple identifying a face.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FaceKey {
    pub weight: u16,
    pub style: String,
    pub stretch: String,
}

/// One concrete point in the weight × style × stretch × format space.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetCombination {
    pub weight: u16,
    pub style: String,
    pub stretch: String,
    pub format: FontFormat,
}

impl TargetCombination {
    pub fn new(
        weight: u16,
        style: impl Into<String>,
        stretch: impl Into<String>,
        format: FontFormat,
    ) -> Self {
        Self {
            weight,
            style: style.into(),
            stretch: stretch.into(),
            format,
        }
    }

    pub fn face_key(&self) -> FaceKey {
        FaceKey {
            weight: self.weight,
            style: self.style.clone(),
            stretch: self.stretch.clone(),
        }
    }
}

impl fmt::Display for TargetCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.weight, self.style, self.stretch, self.format)
    }
}

/// A target combination after conversion and emission.
#[derive(Debug, Clone)]
pub struct ConvertedFont {
    pub target: TargetCombination,
    pub data: Arc<[u8]>,
    /// Name the asset was emitted under.
    pub file: String,
}

impl ConvertedFont {
    pub fn format(&self) -> FontFormat {
        self.target.format
    }
}

/// Converted files sharing one (weight, style, stretch) triple.
#[derive(Debug, Clone)]
pub struct FontFace {
    pub name: String,
    pub weight: u16,
    pub style: String,
    pub stretch: String,
    pub files: Vec<ConvertedFont>,
}
