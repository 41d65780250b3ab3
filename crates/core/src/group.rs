//! Regrouping converted fonts into faces.

use indexmap::IndexMap;

use crate::model::{ConvertedFont, FaceKey, FontFace};

/// One face per distinct (weight, style, stretch) triple among `fonts`.
///
/// Faces appear in the order their first file does, and files keep their
/// order within each face.
pub fn group_faces(family: &str, fonts: Vec<ConvertedFont>) -> Vec<FontFace> {
    let mut groups: IndexMap<FaceKey, Vec<ConvertedFont>> = IndexMap::new();
    for font in fonts {
        groups.entry(font.target.face_key()).or_default().push(font);
    }
    groups
        .into_iter()
        .map(|(key, files)| FontFace {
            name: family.to_string(),
            weight: key.weight,
            style: key.style,
            stretch: key.stretch,
            files,
        })
        .collect()
}
