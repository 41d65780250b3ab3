//! Source matching for target combinations.

use crate::model::{SourceFontFile, TargetCombination};

/// The first source, in manifest order, with the target's weight, style and stretch.
///
/// Returns the source's index so callers can share per-source state.
pub fn find_source<'a>(
    target: &TargetCombination,
    files: &'a [SourceFontFile],
) -> Option<(usize, &'a SourceFontFile)> {
    files.iter().enumerate().find(|(_, file)| file.provides(target))
}
