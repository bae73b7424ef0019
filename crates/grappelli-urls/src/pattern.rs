//! Path pattern compilation.
//!
//! A route pattern is literal text interspersed with `<kind:name>` parameter
//! tokens, e.g. `/users/<int:id>/posts/<str:slug>`. Compilation turns the
//! pattern into an anchored regex with one named capture group per
//! parameter, plus the ordered converter list applied at match time. This is
//! a pure transformation executed once per route at registration.

use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

use grappelli_http::{Error, ParamValue, Result};

use crate::converters::ConverterKind;

/// Maximum accepted pattern length in bytes, as a ReDoS guard.
const MAX_PATTERN_LENGTH: usize = 1024;

/// One `<kind:name>` token of a compiled pattern.
#[derive(Debug, Clone)]
pub(crate) struct PatternParam {
	/// Parameter name, unique within the pattern.
	pub name: String,
	/// The literal token text, kept for reverse URL substitution.
	pub token: String,
	pub kind: ConverterKind,
}

/// A compiled dynamic route pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
	pattern: String,
	regex: Regex,
	params: Vec<PatternParam>,
}

fn token_regex() -> &'static Regex {
	static TOKEN: OnceLock<Regex> = OnceLock::new();
	TOKEN.get_or_init(|| Regex::new(r"<(\w+):(\w+)>").expect("token regex is valid"))
}

impl PathPattern {
	/// Compile a pattern string.
	///
	/// The compiled matcher is anchored at both ends: a path that merely has
	/// the pattern as a prefix does not match.
	///
	/// # Errors
	///
	/// Fails with [`Error::Configuration`] when a parameter name repeats
	/// within the pattern or the pattern cannot be compiled.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_urls::PathPattern;
	///
	/// let pattern = PathPattern::new("/users/<int:id>").unwrap();
	/// assert!(pattern.matches("/users/42").is_some());
	/// assert!(pattern.matches("/users/42/extra").is_none());
	/// ```
	pub fn new(pattern: &str) -> Result<Self> {
		if pattern.len() > MAX_PATTERN_LENGTH {
			return Err(Error::Configuration(format!(
				"pattern {:?} exceeds the maximum length of {} bytes",
				pattern, MAX_PATTERN_LENGTH
			)));
		}

		let mut regex_str = String::from("^");
		let mut params: Vec<PatternParam> = Vec::new();
		let mut last_end = 0;

		for captures in token_regex().captures_iter(pattern) {
			let token = captures.get(0).expect("group 0 always present");
			let kind_name = &captures[1];
			let name = &captures[2];

			if params.iter().any(|p| p.name == name) {
				return Err(Error::Configuration(format!(
					"duplicate parameter {:?} in pattern {:?}",
					name, pattern
				)));
			}

			let kind = ConverterKind::from_name(kind_name);
			regex_str.push_str(&regex::escape(&pattern[last_end..token.start()]));
			regex_str.push_str(&format!("(?P<{}>{})", name, kind.regex_fragment()));
			last_end = token.end();

			params.push(PatternParam {
				name: name.to_string(),
				token: token.as_str().to_string(),
				kind,
			});
		}
		regex_str.push_str(&regex::escape(&pattern[last_end..]));
		regex_str.push('$');

		let regex = Regex::new(&regex_str)
			.map_err(|e| Error::Configuration(format!("invalid pattern {:?}: {}", pattern, e)))?;

		Ok(Self {
			pattern: pattern.to_string(),
			regex,
			params,
		})
	}

	/// The original pattern string.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Parameter names in left-to-right pattern order.
	pub fn param_names(&self) -> Vec<&str> {
		self.params.iter().map(|p| p.name.as_str()).collect()
	}

	pub(crate) fn params(&self) -> &[PatternParam] {
		&self.params
	}

	/// Match a candidate path and convert every captured parameter.
	///
	/// Returns `None` either when the path does not match structurally or
	/// when any converter rejects its capture; both cases mean "this route
	/// does not match" and resolution continues with later routes.
	pub fn matches(&self, path: &str) -> Option<HashMap<String, ParamValue>> {
		let captures = self.regex.captures(path)?;

		let mut values = HashMap::with_capacity(self.params.len());
		for param in &self.params {
			let raw = captures.name(&param.name)?.as_str();
			let value = param.kind.convert(raw)?;
			values.insert(param.name.clone(), value);
		}
		Some(values)
	}

	/// Whether the path matches structurally, ignoring converter outcomes.
	///
	/// Used to distinguish "wrong method" from "no such path" during
	/// resolution.
	pub fn matches_shape(&self, path: &str) -> bool {
		self.regex.is_match(path)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_single_int_param() {
		let pattern = PathPattern::new("/users/<int:id>").unwrap();
		let params = pattern.matches("/users/42").unwrap();
		assert_eq!(params["id"], ParamValue::Int(42));
	}

	#[test]
	fn test_negative_int_param() {
		let pattern = PathPattern::new("/delta/<int:offset>").unwrap();
		let params = pattern.matches("/delta/-12").unwrap();
		assert_eq!(params["offset"], ParamValue::Int(-12));
	}

	#[test]
	fn test_int_rejects_non_digits() {
		let pattern = PathPattern::new("/users/<int:id>").unwrap();
		assert!(pattern.matches("/users/abc").is_none());
		assert!(pattern.matches("/users/4a2").is_none());
	}

	#[test]
	fn test_multiple_params_in_order() {
		let pattern = PathPattern::new("/users/<int:id>/posts/<str:slug>").unwrap();
		assert_eq!(pattern.param_names(), vec!["id", "slug"]);

		let params = pattern.matches("/users/7/posts/hello-world").unwrap();
		assert_eq!(params["id"], ParamValue::Int(7));
		assert_eq!(params["slug"], ParamValue::Str("hello-world".into()));
	}

	#[test]
	fn test_str_does_not_cross_slash() {
		let pattern = PathPattern::new("/files/<str:name>").unwrap();
		assert!(pattern.matches("/files/a/b").is_none());
	}

	#[test]
	fn test_path_crosses_slashes() {
		let pattern = PathPattern::new("/files/<path:subpath>").unwrap();
		let params = pattern.matches("/files/docs/2024/report.pdf").unwrap();
		assert_eq!(
			params["subpath"],
			ParamValue::Str("docs/2024/report.pdf".into())
		);
	}

	#[test]
	fn test_anchored_full_match() {
		let pattern = PathPattern::new("/users/<int:id>").unwrap();
		assert!(pattern.matches("/users/42/posts").is_none());
		assert!(pattern.matches("/prefix/users/42").is_none());
	}

	#[test]
	fn test_unknown_kind_falls_back_to_str() {
		let pattern = PathPattern::new("/items/<uuid:key>").unwrap();
		let params = pattern.matches("/items/ab-12").unwrap();
		assert_eq!(params["key"], ParamValue::Str("ab-12".into()));
	}

	#[test]
	fn test_duplicate_param_name_rejected() {
		let result = PathPattern::new("/pair/<int:x>/<int:x>");
		assert!(matches!(result, Err(Error::Configuration(_))));
	}

	#[test]
	fn test_literal_text_is_escaped() {
		// A '.' in the literal part must not act as a regex wildcard.
		let pattern = PathPattern::new("/feed.rss/<int:page>").unwrap();
		assert!(pattern.matches("/feed.rss/1").is_some());
		assert!(pattern.matches("/feedXrss/1").is_none());
	}

	#[test]
	fn test_shape_match_ignores_converters() {
		let pattern = PathPattern::new("/users/<int:id>").unwrap();
		assert!(pattern.matches_shape("/users/42"));
		assert!(!pattern.matches_shape("/users/abc"));
	}

	#[test]
	fn test_oversized_pattern_rejected() {
		let long = format!("/{}", "a".repeat(2048));
		assert!(PathPattern::new(&long).is_err());
	}
}
