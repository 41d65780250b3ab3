//! SVG font document model.

use anyhow::{Context, Result, anyhow};
use kurbo::BezPath;
use log::debug;
use roxmltree::{Document, Node};

const DEFAULT_UNITS_PER_EM: f64 = 1000.0;
const DEFAULT_FAMILY: &str = "SVGFont";

/// The parts of an SVG `<font>` element needed to build a TrueType font.
#[derive(Debug)]
pub(crate) struct SvgFont {
    pub family: String,
    pub units_per_em: u16,
    pub ascent: i16,
    pub descent: i16,
    /// Glyph 0 is always the missing glyph (`.notdef`).
    pub glyphs: Vec<SvgGlyph>,
}

#[derive(Debug)]
pub(crate) struct SvgGlyph {
    pub name: String,
    pub codepoint: Option<char>,
    pub advance: u16,
    pub path: BezPath,
}

impl SvgFont {
    pub(crate) fn parse(text: &str) -> Result<Self> {
        let doc = Document::parse(text).context("Failed to parse SVG document")?;
        let font = doc
            .descendants()
            .find(|node| is_element(node, "font"))
            .context("SVG document has no <font> element")?;
        let face = font.children().find(|node| is_element(node, "font-face"));

        let units_per_em = face
            .and_then(|face| number_attr(face, "units-per-em"))
            .filter(|upm| *upm > 0.0)
            .unwrap_or(DEFAULT_UNITS_PER_EM);
        let ascent = face
            .and_then(|face| number_attr(face, "ascent"))
            .unwrap_or(units_per_em * 0.8);
        let descent = face
            .and_then(|face| number_attr(face, "descent"))
            .unwrap_or(-units_per_em * 0.2);
        let family = face
            .and_then(|face| face.attribute("font-family"))
            .or_else(|| font.attribute("id"))
            .map(|family| family.trim().to_string())
            .filter(|family| !family.is_empty())
            .unwrap_or_else(|| DEFAULT_FAMILY.to_string());
        let default_advance = number_attr(font, "horiz-adv-x").unwrap_or(units_per_em);

        let mut glyphs = Vec::new();
        let missing = font.children().find(|node| is_element(node, "missing-glyph"));
        glyphs.push(match missing {
            Some(node) => SvgGlyph::from_node(node, ".notdef".to_string(), None, default_advance)?,
            None => SvgGlyph {
                name: ".notdef".to_string(),
                codepoint: None,
                advance: to_u16(default_advance),
                path: BezPath::new(),
            },
        });

        for node in font.children().filter(|node| is_element(node, "glyph")) {
            let codepoint = match node.attribute("unicode") {
                Some(unicode) => {
                    let mut chars = unicode.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => Some(c),
                        (Some(_), Some(_)) => {
                            debug!("skipping ligature glyph for {unicode:?}");
                            continue;
                        }
                        _ => None,
                    }
                }
                None => None,
            };
            let name = match (node.attribute("glyph-name"), codepoint) {
                (Some(name), _) if !name.is_empty() => name.to_string(),
                (_, Some(c)) => format!("uni{:04X}", u32::from(c)),
                _ => format!("glyph{}", glyphs.len()),
            };
            glyphs.push(SvgGlyph::from_node(node, name, codepoint, default_advance)?);
        }

        Ok(Self {
            family,
            units_per_em: to_u16(units_per_em),
            ascent: to_i16(ascent),
            descent: to_i16(descent),
            glyphs,
        })
    }
}

impl SvgGlyph {
    fn from_node(
        node: Node<'_, '_>,
        name: String,
        codepoint: Option<char>,
        default_advance: f64,
    ) -> Result<Self> {
        let advance = number_attr(node, "horiz-adv-x").unwrap_or(default_advance);
        let path = match node.attribute("d").map(str::trim) {
            Some(d) if !d.is_empty() => BezPath::from_svg(d)
                .map_err(|e| anyhow!("Invalid path data for glyph '{name}': {e}"))?,
            _ => BezPath::new(),
        };
        Ok(Self { name, codepoint, advance: to_u16(advance), path })
    }
}

fn is_element(node: &Node<'_, '_>, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name
}

fn number_attr(node: Node<'_, '_>, name: &str) -> Option<f64> {
    node.attribute(name)?.trim().parse().ok()
}

pub(crate) fn to_i16(value: f64) -> i16 {
    value.round().clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16
}

pub(crate) fn to_u16(value: f64) -> u16 {
    value.round().clamp(0.0, f64::from(u16::MAX)) as u16
}
