//! OAuth scope header parsing.

/// Response header listing the scopes granted to the calling token.
pub const OAUTH_SCOPES_HEADER: &str = "x-oauth-scopes";

/// Splits an `X-OAuth-Scopes` header value into scope names.
///
/// GitHub separates scopes with `", "`. A missing or empty header yields an empty list.
pub fn parse_scopes(header: Option<&str>) -> Vec<String> {
	match header {
		Some(value) if !value.is_empty() => value.split(", ").map(str::to_owned).collect(),
		_ => Vec::new(),
	}
}
