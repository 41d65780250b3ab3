//! Font family manifest loading.

use std::path::Path;

use serde::Deserialize;

use crate::{
    error::{Error, Result},
    format::FontFormat,
    model::{FontFamilyManifest, SourceFontFile},
};

#[derive(Debug, Deserialize)]
struct RawManifest {
    name: String,
    #[serde(default)]
    files: Vec<RawSourceFile>,
}

#[derive(Debug, Deserialize)]
struct RawSourceFile {
    file: String,
    weight: Option<u16>,
    style: Option<String>,
    stretch: Option<String>,
    format: Option<String>,
}

impl FontFamilyManifest {
    /// Parse a JSON manifest, resolving file paths against `base_dir`.
    ///
    /// Missing axes are filled with their defaults and a missing format is
    /// inferred from the file extension.
    pub fn from_json(text: &str, base_dir: &Path) -> Result<Self> {
        let raw: RawManifest =
            serde_json::from_str(text).map_err(|e| Error::Manifest(e.to_string()))?;

        let files = raw
            .files
            .into_iter()
            .map(|raw| {
                let mut file = SourceFontFile::new(base_dir.join(&raw.file));
                if let Some(weight) = raw.weight {
                    file.weight = weight;
                }
                if let Some(style) = raw.style {
                    file.style = style;
                }
                if let Some(stretch) = raw.stretch {
                    file.stretch = stretch;
                }
                if let Some(format) = raw.format {
                    let format = FontFormat::from_name(&format).ok_or_else(|| {
                        Error::Manifest(format!("unknown format '{format}' for '{}'", raw.file))
                    })?;
                    file.format = Some(format);
                }
                Ok(file)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { name: raw.name, files })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn applies_defaults_and_base_dir() {
        let manifest = FontFamilyManifest::from_json(
            r#"{
                "name": "Open Sans",
                "files": [
                    { "file": "OpenSans-Regular.ttf", "weight": 400 },
                    { "file": "sub/OpenSans-BoldItalic.otf", "weight": 700, "style": "italic", "stretch": "condensed" },
                    { "file": "legacy.font", "format": "woff" }
                ]
            }"#,
            Path::new("/fonts"),
        )
        .unwrap();

        assert_eq!(manifest.name, "Open Sans");
        let [regular, bold, legacy] = manifest.files.as_slice() else {
            panic!("expected three files");
        };
        assert_eq!(regular.path, PathBuf::from("/fonts/OpenSans-Regular.ttf"));
        assert_eq!(regular.weight, 400);
        assert_eq!(regular.style, "regular");
        assert_eq!(regular.stretch, "normal");
        assert_eq!(regular.format, Some(FontFormat::Truetype));

        assert_eq!(bold.style, "italic");
        assert_eq!(bold.stretch, "condensed");
        assert_eq!(bold.format, Some(FontFormat::Opentype));

        assert_eq!(legacy.weight, 500);
        assert_eq!(legacy.format, Some(FontFormat::Woff));
        assert_eq!(manifest.dependencies().len(), 3);
    }

    #[test]
    fn unknown_extension_leaves_format_unset() {
        let manifest = FontFamilyManifest::from_json(
            r#"{ "name": "X", "files": [{ "file": "x.pfb" }] }"#,
            Path::new("."),
        )
        .unwrap();
        assert_eq!(manifest.files[0].format, None);
    }

    #[test]
    fn malformed_input_is_a_manifest_error() {
        for text in [
            "not json",
            r#"{ "files": [] }"#,
            r#"{ "name": "X", "files": [{ "weight": 400 }] }"#,
            r#"{ "name": "X", "files": [{ "file": "a.ttf", "weight": "bold" }] }"#,
            r#"{ "name": "X", "files": [{ "file": "a.ttf", "format": "pfb" }] }"#,
        ] {
            let err = FontFamilyManifest::from_json(text, Path::new(".")).unwrap_err();
            assert!(matches!(err, Error::Manifest(_)), "{text}: {err}");
        }
    }
}
