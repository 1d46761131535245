//! Promo-variant SKU name normalization.
//!
//! Promotional SKUs share hardware with their standard family
//! (`Standard_D2s_v3_Promo` is a `Standard_D2s_v3`). Every resolver goes
//! through [`strip_promo`] so static and dynamic lookups agree on what the
//! standard name is.

use std::borrow::Cow;

/// Marker matched case-insensitively anywhere in a SKU name.
const PROMO_MARKER: &str = "_promo";

/// Whether `name` contains the promo marker in any casing.
pub fn is_promo(name: &str) -> bool {
    name.to_ascii_lowercase().contains(PROMO_MARKER)
}

/// Remove every occurrence of the promo marker, in any casing.
///
/// Occurrences are matched left to right without overlap in a single pass,
/// so `"A_PROMO_promo"` becomes `"A"` but removing a marker never creates a
/// new one that gets removed in turn. Names without the marker are returned
/// borrowed.
pub fn strip_promo(name: &str) -> Cow<'_, str> {
    // ASCII lowering keeps byte offsets identical, so indices found in
    // `lowered` are valid char boundaries in `name`.
    let lowered = name.to_ascii_lowercase();
    if !lowered.contains(PROMO_MARKER) {
        return Cow::Borrowed(name);
    }

    let mut stripped = String::with_capacity(name.len());
    let mut cursor = 0;
    for (idx, _) in lowered.match_indices(PROMO_MARKER) {
        stripped.push_str(&name[cursor..idx]);
        cursor = idx + PROMO_MARKER.len();
    }
    stripped.push_str(&name[cursor..]);
    Cow::Owned(stripped)
}
