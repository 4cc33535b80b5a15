use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

const LABEL_DISPLAY_LIMIT: usize = 24;

/// Shortens a label for drawing next to a node, keeping the first characters.
pub fn short_label(label: &str) -> String {
    if label.chars().count() <= LABEL_DISPLAY_LIMIT {
        return label.to_owned();
    }

    let mut short = label
        .chars()
        .take(LABEL_DISPLAY_LIMIT - 1)
        .collect::<String>();
    short.push('…');
    short
}

/// Two values in `[-1, 1]` derived from a hash of `id`, stable across runs.
pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}

/// Hue in `[0, 1)` for a label, so equal labels always share a colour.
pub fn stable_hue(label: &str) -> f32 {
    let (x, _) = stable_pair(label);
    ((x + 1.0) * 0.5).fract()
}
