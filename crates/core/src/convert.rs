//! The conversion graph and format conversion.
//!
//! Conversions are single edges looked up in a fixed table; there is no
//! multi-hop search. Same-format requests are served unchanged.

use std::{path::Path, sync::Arc};

use crate::{
    error::{Error, Result},
    format::FontFormat,
};

/// A pure `bytes → bytes` encoder.
pub type Encoder = fn(&[u8]) -> anyhow::Result<Vec<u8>>;

#[derive(Debug, Clone, Copy)]
enum Edge {
    /// Same outlines under a different container name.
    PassThrough,
    Encode(Encoder),
}

use FontFormat::{EmbeddedOpentype, Opentype, Svg, Truetype, Woff, Woff2};

const CONVERSION_GRAPH: &[(FontFormat, FontFormat, Edge)] = &[
    (Svg, Truetype, Edge::Encode(facepack_font_svg::svg_to_ttf)),
    (Truetype, Woff2, Edge::Encode(facepack_font_woff2::convert_to_woff2)),
    (Truetype, Woff, Edge::Encode(facepack_font_woff::convert_to_woff)),
    (Truetype, EmbeddedOpentype, Edge::Encode(facepack_font_eot::convert_to_eot)),
    (Truetype, Opentype, Edge::PassThrough),
    (Opentype, Woff2, Edge::Encode(facepack_font_woff2::convert_to_woff2)),
    (Opentype, Woff, Edge::Encode(facepack_font_woff::convert_to_woff)),
    (Opentype, EmbeddedOpentype, Edge::Encode(facepack_font_eot::convert_to_eot)),
    (Opentype, Truetype, Edge::PassThrough),
];

/// How a source's bytes become a target's bytes.
#[derive(Debug, Clone, Copy)]
pub struct Conversion {
    from: FontFormat,
    to: FontFormat,
    edge: Option<Edge>,
}

impl Conversion {
    /// Look up the conversion from `from` to `to`.
    ///
    /// Fails with [`Error::UnsupportedConversion`] when the formats differ
    /// and the graph has no edge between them, including when the source
    /// format is unknown.
    pub fn plan(from: Option<FontFormat>, to: FontFormat) -> Result<Self> {
        let Some(from) = from else {
            return Err(Error::UnsupportedConversion { from: None, to });
        };
        if from == to {
            return Ok(Self { from, to, edge: None });
        }
        CONVERSION_GRAPH
            .iter()
            .find(|(source, target, _)| *source == from && *target == to)
            .map(|&(_, _, edge)| Self { from, to, edge: Some(edge) })
            .ok_or(Error::UnsupportedConversion { from: Some(from), to })
    }

    /// Whether the output is the input, byte for byte.
    pub fn is_identity(&self) -> bool {
        !matches!(self.edge, Some(Edge::Encode(_)))
    }

    /// Run the conversion. `path` only labels errors.
    pub fn apply(&self, path: &Path, data: Arc<[u8]>) -> Result<Arc<[u8]>> {
        match self.edge {
            None | Some(Edge::PassThrough) => Ok(data),
            Some(Edge::Encode(encode)) => {
                encode(&data).map(Arc::from).map_err(|cause| Error::ConversionFailed {
                    path: path.to_path_buf(),
                    from: self.from,
                    to: self.to,
                    cause,
                })
            }
        }
    }
}

/// Convert `data` from one format to another in a single step.
pub fn convert(
    path: &Path,
    from: Option<FontFormat>,
    to: FontFormat,
    data: &[u8],
) -> Result<Vec<u8>> {
    let conversion = Conversion::plan(from, to)?;
    conversion.apply(path, Arc::from(data)).map(|data| data.to_vec())
}

/// Every non-identity edge of the conversion graph.
pub fn edges() -> impl Iterator<Item = (FontFormat, FontFormat)> {
    CONVERSION_GRAPH.iter().map(|&(from, to, _)| (from, to))
}
