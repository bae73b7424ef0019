//! Typed path-segment converters.
//!
//! A converter both constrains what text a parameter segment may contain
//! (via the regex fragment it contributes at compile time) and transforms
//! the captured text into a typed [`ParamValue`] at match time.

use grappelli_http::ParamValue;

/// The built-in converter kinds.
///
/// Unknown kind names fall back to [`ConverterKind::Str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConverterKind {
	/// One or more non-`/` characters, returned as a string.
	Str,
	/// An optionally-signed digit string, parsed to an integer.
	Int,
	/// One or more characters including `/` (non-greedy), returned as a
	/// string.
	Path,
}

impl ConverterKind {
	/// Look up a converter by the kind name used in route patterns.
	///
	/// # Examples
	///
	/// ```
	/// use grappelli_urls::ConverterKind;
	///
	/// assert_eq!(ConverterKind::from_name("int"), ConverterKind::Int);
	/// // Unrecognized kinds degrade to `str`.
	/// assert_eq!(ConverterKind::from_name("uuid"), ConverterKind::Str);
	/// ```
	pub fn from_name(name: &str) -> Self {
		match name {
			"int" => ConverterKind::Int,
			"path" => ConverterKind::Path,
			_ => ConverterKind::Str,
		}
	}

	/// The regex fragment this converter contributes to a compiled pattern.
	pub fn regex_fragment(&self) -> &'static str {
		match self {
			ConverterKind::Str => "[^/]+",
			ConverterKind::Int => r"-?\d+",
			ConverterKind::Path => ".+?",
		}
	}

	/// Convert a captured segment into a typed value.
	///
	/// Returns `None` when the text does not convert; the caller treats
	/// that as "this route does not match" rather than as an error, so an
	/// `int` route falls through to later, more permissive routes.
	pub fn convert(&self, raw: &str) -> Option<ParamValue> {
		match self {
			ConverterKind::Str | ConverterKind::Path => Some(ParamValue::Str(raw.to_string())),
			// The pattern already restricts captures to `-?\d+`; parsing
			// still rejects out-of-range values, which then fall through.
			ConverterKind::Int => raw.parse::<i64>().ok().map(ParamValue::Int),
		}
	}
}
