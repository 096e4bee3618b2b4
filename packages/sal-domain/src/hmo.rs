//! Fixed HMO (kupa) and plan-tier (maslul) vocabularies.
//!
//! Benefit tables, user profiles, and vector-store namespaces all share these
//! three-element sets; the exact strings are part of the data contract.

/// The three Israeli HMOs, in benefit-table column order.
pub const HMOS: [&str; 3] = ["מכבי", "מאוחדת", "כללית"];

/// The three membership tiers recognized in benefit cells.
pub const TIERS: [&str; 3] = ["זהב", "כסף", "ארד"];

/// Namespace used when an HMO name is missing or unrecognized.
pub const FALLBACK_NAMESPACE: &str = "general";

/// Maps a Hebrew HMO name to its ASCII-safe vector-store namespace.
///
/// Total over all inputs: unknown values fall back to [`FALLBACK_NAMESPACE`].
pub fn namespace_for(kupa: &str) -> &'static str {
	match kupa {
		"מכבי" => "maccabi",
		"מאוחדת" => "meuhedet",
		"כללית" => "clalit",
		_ => FALLBACK_NAMESPACE,
	}
}
