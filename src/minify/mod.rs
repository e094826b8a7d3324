//! Media-type keyed minifier registry.
//!
//! A [`Minifier`] maps media types to minify functions, either by exact name
//! or by pattern. It is built once, never mutated while in use, and shared by
//! reference (`Arc<Minifier>`) across every document a pipeline produces.
//!
//! ```
//! use content2html::Minifier;
//!
//! let minifier = Minifier::default();
//! let css = minifier.minify("text/css", b"a {  color: red ;  }").unwrap();
//! assert_eq!(css, b"a{color:red;}");
//! ```

mod css;
mod html;
mod json;
mod xml;

use std::collections::HashMap;
use std::io::{Read, Write};
use std::sync::{Arc, LazyLock};

use regex_lite::Regex;

use crate::error::{Error, Result};

pub use css::minify_css;
pub use html::{minify_html, minify_js};
pub use json::minify_json;
pub use xml::minify_xml;

/// Media type of generated documents.
pub const HTML_MEDIA_TYPE: &str = "text/html";

/// A minify function: receives the matched media type and the input, returns
/// the compacted output.
pub type MinifyFn = Arc<dyn Fn(&str, &[u8]) -> Result<Vec<u8>> + Send + Sync>;

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(application|text)/(x-)?(java|ecma)script$").unwrap());
static JSON_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[/+]json$").unwrap());
static XML_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[/+]xml$").unwrap());

/// Registry of minify functions keyed by media type.
///
/// Exact registrations are consulted first; patterns are tried in the order
/// they were added.
#[derive(Clone)]
pub struct Minifier {
    exact: HashMap<String, MinifyFn>,
    patterns: Vec<(Regex, MinifyFn)>,
}

impl Minifier {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            exact: HashMap::new(),
            patterns: Vec::new(),
        }
    }

    /// The standard table: HTML, CSS, SVG, JSON and XML.
    ///
    /// Scripts are not included; see [`add_lossy_scripts`](Self::add_lossy_scripts).
    pub fn standard() -> Self {
        let mut minifier = Self::new();
        minifier.add_func("text/css", |_, input| minify_css(input));
        minifier.add_func(HTML_MEDIA_TYPE, |_, input| Ok(minify_html(input)));
        minifier.add_func("image/svg+xml", minify_xml);
        minifier.add_func_regex(JSON_RE.clone(), minify_json);
        minifier.add_func_regex(XML_RE.clone(), minify_xml);
        minifier
    }

    /// Register [`minify_js`] for JavaScript media types.
    ///
    /// The script minifier does not preserve semantics for every program
    /// (function declarations lose hoisting and their own `this`), so it has
    /// to be asked for explicitly.
    pub fn add_lossy_scripts(&mut self) -> &mut Self {
        self.add_func_regex(SCRIPT_RE.clone(), |_, input| minify_js(input))
    }

    /// Register `func` for exactly `media_type`.
    pub fn add_func<F>(&mut self, media_type: &str, func: F) -> &mut Self
    where
        F: Fn(&str, &[u8]) -> Result<Vec<u8>> + Send + Sync + 'static,
    {
        self.exact.insert(essence(media_type), Arc::new(func));
        self
    }

    /// Register `func` for every media type matching `pattern`.
    pub fn add_func_regex<F>(&mut self, pattern: Regex, func: F) -> &mut Self
    where
        F: Fn(&str, &[u8]) -> Result<Vec<u8>> + Send + Sync + 'static,
    {
        self.patterns.push((pattern, Arc::new(func)));
        self
    }

    /// Find the function registered for `media_type`.
    pub fn lookup(&self, media_type: &str) -> Option<&MinifyFn> {
        let media_type = essence(media_type);
        self.exact.get(&media_type).or_else(|| {
            self.patterns
                .iter()
                .find(|(pattern, _)| pattern.is_match(&media_type))
                .map(|(_, func)| func)
        })
    }

    /// Minify `input` as `media_type`.
    pub fn minify(&self, media_type: &str, input: &[u8]) -> Result<Vec<u8>> {
        let func = self
            .lookup(media_type)
            .ok_or_else(|| Error::UnsupportedMediaType(media_type.to_string()))?;
        func(&essence(media_type), input)
    }

    /// Read all of `reader`, minify it as `media_type`, and write the result to
    /// `writer`.
    pub fn minify_to<W: Write, R: Read>(&self, media_type: &str, mut writer: W, mut reader: R) -> Result<()> {
        let mut input = Vec::new();
        reader.read_to_end(&mut input)?;
        let output = self.minify(media_type, &input)?;
        writer.write_all(&output)?;
        Ok(())
    }
}

impl Default for Minifier {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for Minifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut exact: Vec<_> = self.exact.keys().collect();
        exact.sort();
        f.debug_struct("Minifier")
            .field("exact", &exact)
            .field("patterns", &self.patterns.iter().map(|(p, _)| p.as_str()).collect::<Vec<_>>())
            .finish()
    }
}

/// Media type without parameters, lowercased: `Text/HTML; charset=utf-8` is
/// `text/html`.
fn essence(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
