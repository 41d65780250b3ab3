//! Stylesheet rendering for resolved faces.

use std::fmt::{self, Write};

use crate::{format::FontFormat, model::FontFace};

/// Render one `@font-face` rule per face.
///
/// File URLs are `public_path` followed by the emitted name. Embedded
/// OpenType files get a leading `src` line for legacy user agents and the
/// `?#iefix` suffix in the format list.
pub fn render_stylesheet(faces: &[FontFace], public_path: &str) -> String {
    let mut css = String::new();
    // Writing into a String cannot fail.
    let _ = write_stylesheet(&mut css, faces, public_path);
    css
}

fn write_stylesheet(css: &mut String, faces: &[FontFace], public_path: &str) -> fmt::Result {
    for (i, face) in faces.iter().enumerate() {
        if i > 0 {
            writeln!(css)?;
        }
        write_face(css, face, public_path)?;
    }
    Ok(())
}

fn write_face(css: &mut String, face: &FontFace, public_path: &str) -> fmt::Result {
    writeln!(css, "@font-face {{")?;
    writeln!(css, "  font-family: \"{}\";", escape(&face.name))?;

    let eot = face.files.iter().find(|file| file.format() == FontFormat::EmbeddedOpentype);
    if let Some(eot) = eot {
        writeln!(css, "  src: url(\"{}\");", url(public_path, &eot.file))?;
    }

    for (i, file) in face.files.iter().enumerate() {
        let suffix = if file.format() == FontFormat::EmbeddedOpentype { "?#iefix" } else { "" };
        let lead = if i == 0 { "  src: " } else { ",\n       " };
        write!(
            css,
            "{lead}url(\"{}{suffix}\") format(\"{}\")",
            url(public_path, &file.file),
            file.format().name()
        )?;
    }
    if !face.files.is_empty() {
        writeln!(css, ";")?;
    }

    writeln!(css, "  font-weight: {};", face.weight)?;
    writeln!(css, "  font-style: {};", css_style(&face.style))?;
    writeln!(css, "  font-stretch: {};", face.stretch)?;
    writeln!(css, "}}")
}

fn css_style(style: &str) -> &str {
    match style {
        "regular" => "normal",
        other => other,
    }
}

fn url(public_path: &str, file: &str) -> String {
    escape(&format!("{public_path}{file}"))
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
