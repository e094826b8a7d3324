//! Markup tree and selector queries.
//!
//! Content is parsed with html5ever into an arena-backed [`Dom`], which can
//! then be searched with CSS selectors:
//!
//! ```
//! use content2html::dom::{Dom, Selector};
//!
//! let dom = Dom::parse("<article><h1>Hello <em>there</em></h1></article>");
//! let h1 = dom.select_first(&Selector::parse("h1").unwrap()).unwrap();
//! assert_eq!(dom.inner_text(h1), "Hello there");
//! ```

mod arena;
mod select;
mod tree_sink;

pub use arena::{Attribute, Children, Descendants, Dom, Node, NodeData, NodeId};
pub use select::{ElementRef, MarkupSelectors, Selector};
pub use tree_sink::DomSink;

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

impl Dom {
    /// Parse a document or fragment. Malformed markup is recovered the way a
    /// browser would recover it.
    pub fn parse(html: &str) -> Dom {
        let sink = parse_document(DomSink::new(), ParseOpts::default())
            .from_utf8()
            .one(html.as_bytes());

        for error in sink.errors() {
            log::trace!("recovered parse error: {error}");
        }
        sink.into_dom()
    }
}
