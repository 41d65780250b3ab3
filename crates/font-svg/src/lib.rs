//! SVG font to TrueType conversion.
//!
//! Reads the glyphs of an SVG `<font>` element and assembles a minimal
//! TrueType font from them: quadratic outlines, horizontal metrics, a
//! format 12 cmap and the basic naming records. Multi-character glyphs
//! (ligatures) are dropped since they need layout tables to be reachable.

mod glyph;
mod parse;
mod tables;

use anyhow::{Context, Result};
use log::debug;

use parse::SvgFont;

/// Convert an SVG font document to TrueType bytes.
pub fn svg_to_ttf(data: &[u8]) -> Result<Vec<u8>> {
    let text = std::str::from_utf8(data).context("SVG font is not valid UTF-8")?;
    let font = SvgFont::parse(text)?;
    debug!(
        "building '{}' from {} SVG glyphs ({} units per em)",
        font.family,
        font.glyphs.len(),
        font.units_per_em
    );
    tables::build_font(&font)
}

#[cfg(test)]
mod tests {
    use read_fonts::{FontRef, TableProvider};

    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" standalone="no"?>
<svg xmlns="http://www.w3.org/2000/svg">
  <defs>
    <font id="Sample" horiz-adv-x="600">
      <font-face font-family="Sample Sans" units-per-em="1000" ascent="800" descent="-200"/>
      <missing-glyph d="M50 0L550 0L550 700L50 700Z"/>
      <glyph glyph-name="A" unicode="A" d="M0 0L300 700L600 0Z"/>
      <glyph glyph-name="O" unicode="O" horiz-adv-x="700" d="M350 0C150 0 50 150 50 350C50 550 150 700 350 700C550 700 650 550 650 350C650 150 550 0 350 0Z"/>
      <glyph glyph-name="space" unicode=" " horiz-adv-x="250"/>
      <glyph glyph-name="f_i" unicode="fi" d="M0 0L10 10Z"/>
    </font>
  </defs>
</svg>"#;

    #[test]
    fn converts_sample_font() {
        let data = svg_to_ttf(SAMPLE.as_bytes()).unwrap();
        let font = FontRef::new(&data).unwrap();

        assert_eq!(font.maxp().unwrap().num_glyphs(), 4);
        assert_eq!(font.head().unwrap().units_per_em(), 1000);

        let cmap = font.cmap().unwrap();
        assert_eq!(cmap.map_codepoint('A').map(|gid| gid.to_u32()), Some(1));
        assert_eq!(cmap.map_codepoint('O').map(|gid| gid.to_u32()), Some(2));
        assert_eq!(cmap.map_codepoint(' ').map(|gid| gid.to_u32()), Some(3));
        assert_eq!(cmap.map_codepoint('f'), None);

        let hmtx = font.hmtx().unwrap();
        let advances: Vec<u16> = hmtx.h_metrics().iter().map(|m| m.advance()).collect();
        assert_eq!(advances, vec![600, 600, 700, 250]);
    }

    #[test]
    fn names_come_from_font_face() {
        let data = svg_to_ttf(SAMPLE.as_bytes()).unwrap();
        let family = name_string(&data, 1);
        assert_eq!(family.as_deref(), Some("Sample Sans"));
        let postscript = name_string(&data, 6);
        assert_eq!(postscript.as_deref(), Some("SampleSans-Regular"));
    }

    #[test]
    fn rejects_non_utf8() {
        let err = svg_to_ttf(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(err.to_string().contains("UTF-8"));
    }

    fn name_string(data: &[u8], name_id: u16) -> Option<String> {
        let font = FontRef::new(data).ok()?;
        let name = font.name().ok()?;
        name.name_record()
            .iter()
            .find(|record| record.name_id().to_u16() == name_id)
            .and_then(|record| record.string(name.string_data()).ok())
            .map(|string| string.chars().collect())
    }
}
