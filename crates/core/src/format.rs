//! Font container formats.

use std::{fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

/// Binary packaging of font outline data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFormat {
    Truetype,
    Opentype,
    Woff,
    Woff2,
    EmbeddedOpentype,
    Svg,
}

impl FontFormat {
    pub const ALL: [FontFormat; 6] = [
        FontFormat::Truetype,
        FontFormat::Opentype,
        FontFormat::Woff,
        FontFormat::Woff2,
        FontFormat::EmbeddedOpentype,
        FontFormat::Svg,
    ];

    /// Name used in manifests, queries and CSS `format()` hints.
    pub const fn name(self) -> &'static str {
        match self {
            FontFormat::Truetype => "truetype",
            FontFormat::Opentype => "opentype",
            FontFormat::Woff => "woff",
            FontFormat::Woff2 => "woff2",
            FontFormat::EmbeddedOpentype => "embedded-opentype",
            FontFormat::Svg => "svg",
        }
    }

    /// File extension including the leading dot.
    pub const fn extension(self) -> &'static str {
        match self {
            FontFormat::Truetype => ".ttf",
            FontFormat::Opentype => ".otf",
            FontFormat::Woff => ".woff",
            FontFormat::Woff2 => ".woff2",
            FontFormat::EmbeddedOpentype => ".eot",
            FontFormat::Svg => ".svg",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|format| format.name() == name)
    }

    /// Look up a format by extension, with or without the leading dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        Self::ALL
            .into_iter()
            .find(|format| format.extension()[1..].eq_ignore_ascii_case(ext))
    }

    /// Infer the format from a file path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for FontFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FontFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown font format '{s}'"))
    }
}
