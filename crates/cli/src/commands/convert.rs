//! The `convert` command: one edge of the conversion graph.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use facepack_core::{FontFormat, convert};

use crate::io::FontFile;

/// Convert `input` to `to` and write the result.
///
/// The source format defaults to the one named by the input's extension and
/// the output path to the input path with the target extension.
pub fn convert_file(
    input: &Path,
    output: Option<&Path>,
    from: Option<FontFormat>,
    to: FontFormat,
) -> Result<PathBuf> {
    let from = from.or_else(|| FontFormat::from_path(input));
    let data = FontFile::new(input).read()?;
    let converted = convert(input, from, to, &data)
        .with_context(|| format!("Failed to convert {}", input.display()))?;

    let output = output.map(Path::to_path_buf).unwrap_or_else(|| {
        input.with_extension(to.extension().trim_start_matches('.'))
    });
    FontFile::new(&output).write(converted)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(convert_file(&dir.path().join("none.ttf"), None, None, FontFormat::Woff).is_err());
    }

    #[test]
    fn unsupported_edge_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("font.woff");
        std::fs::write(&input, b"wOFF").unwrap();
        assert!(convert_file(&input, None, None, FontFormat::Truetype).is_err());
        assert!(!dir.path().join("font.ttf").exists());
    }
}
