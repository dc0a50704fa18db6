//! Strict parsing of boolean switches supplied as text.

/// Values accepted as `true`.
pub const TRUTHY: &[&str] = &["true", "1", "yes", "y"];
/// Values accepted as `false`.
pub const FALSY: &[&str] = &["false", "0", "no", "n"];

/// Parses a boolean switch, ignoring case and surrounding whitespace.
///
/// Returns `None` for anything outside [`TRUTHY`] and [`FALSY`].
pub fn parse_flag(value: &str) -> Option<bool> {
	let normalized = value.trim().to_ascii_lowercase();
	if TRUTHY.contains(&normalized.as_str()) {
		Some(true)
	} else if FALSY.contains(&normalized.as_str()) {
		Some(false)
	} else {
		None
	}
}
