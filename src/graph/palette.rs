//! Ring colour assignment

use std::collections::BTreeMap;

/// Default ring palette: rose, orange, yellow, lime, cyan, violet, fuchsia, pink
pub const DEFAULT_RING_PALETTE: [&str; 8] = [
    "#e11d48", "#f97316", "#eab308", "#84cc16", "#06b6d4", "#8b5cf6", "#d946ef", "#ec4899",
];

/// Assign each distinct ring id a palette colour.
///
/// Ids are sorted before assignment, so the result does not depend on the
/// order rings were encountered. The palette is reused cyclically; an empty
/// palette yields an empty map.
pub fn assign_ring_colors<'a, I>(ring_ids: I, palette: &[String]) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = &'a str>,
{
    if palette.is_empty() {
        return BTreeMap::new();
    }

    let mut ids: Vec<&str> = ring_ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();

    ids.into_iter()
        .enumerate()
        .map(|(i, id)| (id.to_string(), palette[i % palette.len()].clone()))
        .collect()
}

pub fn default_palette() -> Vec<String> {
    DEFAULT_RING_PALETTE.iter().map(|c| c.to_string()).collect()
}
