//! Typographic normalization of raw content.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex_lite::Regex;

/// An en or em dash with any surrounding whitespace, hair spaces included so
/// the rewrite is idempotent.
static DASH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("[\\s\u{200A}]*([\u{2013}\u{2014}])[\\s\u{200A}]*").unwrap()
});

/// Replace the whitespace around every en (`–`) and em (`—`) dash with a
/// single hair space on each side.
///
/// Works on raw text and knows nothing about markup, so a dash inside an
/// attribute value is rewritten too.
///
/// ```
/// use content2html::use_hair_spaces;
///
/// assert_eq!(use_hair_spaces("1990 – 1995"), "1990\u{200A}–\u{200A}1995");
/// ```
pub fn use_hair_spaces(content: &str) -> Cow<'_, str> {
    DASH_RE.replace_all(content, "\u{200A}${1}\u{200A}")
}
