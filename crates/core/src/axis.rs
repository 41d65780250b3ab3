//! Per-axis target domains.

use std::hash::Hash;

use indexmap::IndexSet;

use crate::{
    format::FontFormat,
    model::{FontFamilyManifest, SourceFontFile},
    query::VariantQuery,
};

/// The values targeted on each axis, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AxisDomains {
    pub weight: Vec<u16>,
    pub style: Vec<String>,
    pub stretch: Vec<String>,
    pub format: Vec<FontFormat>,
}

impl AxisDomains {
    /// Resolve each axis independently: the query's values when given,
    /// otherwise the distinct values seen in the manifest, first-seen first.
    ///
    /// Sources with an unknown format do not contribute to the format axis.
    pub fn resolve(query: &VariantQuery, manifest: &FontFamilyManifest) -> Self {
        let files = &manifest.files;
        Self {
            weight: query
                .weight
                .clone()
                .unwrap_or_else(|| distinct(files, |file| Some(file.weight))),
            style: query
                .style
                .clone()
                .unwrap_or_else(|| distinct(files, |file| Some(file.style.clone()))),
            stretch: query
                .stretch
                .clone()
                .unwrap_or_else(|| distinct(files, |file| Some(file.stretch.clone()))),
            format: query
                .format
                .clone()
                .unwrap_or_else(|| distinct(files, |file| file.format)),
        }
    }

    /// Number of target combinations these domains expand to.
    pub fn combination_count(&self) -> usize {
        self.weight.len() * self.style.len() * self.stretch.len() * self.format.len()
    }
}

fn distinct<T: Hash + Eq>(
    files: &[SourceFontFile],
    value: impl Fn(&SourceFontFile) -> Option<T>,
) -> Vec<T> {
    files
        .iter()
        .filter_map(value)
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> FontFamilyManifest {
        FontFamilyManifest::new(
            "Test",
            vec![
                SourceFontFile::new("b.ttf").with_weight(700),
                SourceFontFile::new("a.ttf").with_weight(400),
                SourceFontFile::new("c.woff").with_weight(700).with_style("italic"),
                SourceFontFile::new("d.pfb").with_weight(400),
            ],
        )
    }

    #[test]
    fn infers_domains_in_first_seen_order() {
        let domains = AxisDomains::resolve(&VariantQuery::default(), &manifest());
        assert_eq!(domains.weight, vec![700, 400]);
        assert_eq!(domains.style, vec!["regular", "italic"]);
        assert_eq!(domains.stretch, vec!["normal"]);
        assert_eq!(domains.format, vec![FontFormat::Truetype, FontFormat::Woff]);
        assert_eq!(domains.combination_count(), 8);
    }

    #[test]
    fn explicit_axes_are_used_verbatim() {
        let query = VariantQuery::default()
            .with_weight([300])
            .with_format([FontFormat::Woff2, FontFormat::Woff]);
        let domains = AxisDomains::resolve(&query, &manifest());
        assert_eq!(domains.weight, vec![300]);
        assert_eq!(domains.style, vec!["regular", "italic"]);
        assert_eq!(domains.format, vec![FontFormat::Woff2, FontFormat::Woff]);
    }

    #[test]
    fn empty_manifest_has_empty_domains() {
        let manifest = FontFamilyManifest::new("Empty", vec![]);
        let domains = AxisDomains::resolve(&VariantQuery::default(), &manifest);
        assert_eq!(domains.combination_count(), 0);
    }
}
