//! Hex string helpers.
//!
//! Prefix management for the `0x`-prefixed lowercase hex form used in
//! canonical messages and log output.

/// Adds a `0x` prefix to a hex string if it doesn't already have one.
pub fn with_0x_prefix(hex_str: &str) -> String {
	if hex_str.to_lowercase().starts_with("0x") {
		hex_str.to_string()
	} else {
		format!("0x{}", hex_str)
	}
}

/// Removes a `0x` or `0X` prefix from a hex string if present.
pub fn without_0x_prefix(hex_str: &str) -> &str {
	hex_str
		.strip_prefix("0x")
		.or_else(|| hex_str.strip_prefix("0X"))
		.unwrap_or(hex_str)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_with_0x_prefix() {
		assert_eq!(with_0x_prefix("abc123"), "0xabc123");
		assert_eq!(with_0x_prefix("0xabc123"), "0xabc123");
	}

	#[test]
	fn test_without_0x_prefix() {
		assert_eq!(without_0x_prefix("0xabc123"), "abc123");
		assert_eq!(without_0x_prefix("0Xabc123"), "abc123");
		assert_eq!(without_0x_prefix("abc123"), "abc123");
	}
}
