//! Cartesian expansion of axis domains.

use crate::{axis::AxisDomains, model::TargetCombination};

/// Every combination of one value per axis: weight outermost, format innermost.
pub fn expand(domains: &AxisDomains) -> Vec<TargetCombination> {
    let mut targets = Vec::with_capacity(domains.combination_count());
    for &weight in &domains.weight {
        for style in &domains.style {
            for stretch in &domains.stretch {
                for &format in &domains.format {
                    targets.push(TargetCombination::new(
                        weight,
                        style.as_str(),
                        stretch.as_str(),
                        format,
                    ));
                }
            }
        }
    }
    targets
}
