//! Document title discovery.

use std::borrow::Cow;

use crate::dom::{Dom, Selector};
use crate::error::{Error, Result};

/// Selector used when none is configured.
pub const DEFAULT_TITLE_SELECTOR: &str = "h1";

/// Finds a document's title: the text of the first element matching a
/// selector, in document order.
#[derive(Debug)]
pub struct TitleExtractor {
    selector: Selector,
}

impl TitleExtractor {
    pub fn new(selector: &str) -> Result<Self> {
        Ok(Self {
            selector: Selector::parse(selector)?,
        })
    }

    pub fn selector(&self) -> &str {
        self.selector.as_str()
    }

    /// Extract the title from `content`.
    ///
    /// The title is the concatenation of every text node below the first
    /// match, untrimmed. Fails with [`Error::MissingHeading`] if nothing
    /// matches and [`Error::EmptyTitle`] if the match holds only
    /// whitespace.
    pub fn extract(&self, content: &str) -> Result<String> {
        let dom = Dom::parse(content);
        let heading = dom
            .select_first(&self.selector)
            .ok_or(Error::MissingHeading)?;

        let title = dom.inner_text(heading);
        if title.trim().is_empty() {
            return Err(Error::EmptyTitle);
        }
        Ok(title)
    }
}

impl Default for TitleExtractor {
    fn default() -> Self {
        Self {
            selector: Selector::parse(DEFAULT_TITLE_SELECTOR)
                .expect("default title selector is valid"),
        }
    }
}

/// Extract the text of the first `<h1>` in `content`.
///
/// ```
/// use content2html::extract_title;
///
/// let title = extract_title("<p>intro</p><h1>Getting <b>started</b></h1>").unwrap();
/// assert_eq!(title, "Getting started");
/// ```
pub fn extract_title(content: &str) -> Result<String> {
    TitleExtractor::default().extract(content)
}

/// Decode raw file content as UTF-8, dropping a leading byte order mark.
///
/// Content is embedded verbatim into UTF-8 output, so anything else is a
/// [`Error::Parse`] rather than being silently replaced.
pub fn decode_content(bytes: &[u8]) -> Result<Cow<'_, str>> {
    let (text, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(bytes);
    if had_errors {
        return Err(Error::Parse("content is not valid UTF-8".to_string()));
    }
    Ok(text)
}
