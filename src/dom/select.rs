//! CSS selector queries over a [`Dom`], backed by the `selectors` crate.

use std::fmt;

use html5ever::{LocalName, Namespace};
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::context::{MatchingContext, SelectorCaches};
use selectors::matching::ElementSelectorFlags;
use selectors::parser::{ParseRelative, SelectorList, SelectorParseErrorKind};
use selectors::{OpaqueElement, SelectorImpl};

use super::arena::{Dom, NodeData, NodeId};
use crate::error::{Error, Result};

/// Selector implementation for markup documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupSelectors;

/// Identifier, class name or attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct Ident(pub String);

impl precomputed_hash::PrecomputedHash for Ident {
    fn precomputed_hash(&self) -> u32 {
        // FNV-1a
        self.0.bytes().fold(0x811c_9dc5_u32, |h, b| {
            (h ^ u32::from(b)).wrapping_mul(0x0100_0193)
        })
    }
}

impl cssparser::ToCss for Ident {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        cssparser::serialize_identifier(&self.0, dest)
    }
}

impl AsRef<str> for Ident {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Ident {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl<'a> From<&'a str> for Ident {
    fn from(s: &'a str) -> Self {
        Self(s.to_string())
    }
}

/// Tag name atom usable as a selector local name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagName(pub LocalName);

impl precomputed_hash::PrecomputedHash for TagName {
    fn precomputed_hash(&self) -> u32 {
        self.0.precomputed_hash()
    }
}

impl cssparser::ToCss for TagName {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str(self.0.as_ref())
    }
}

impl From<String> for TagName {
    fn from(s: String) -> Self {
        Self(LocalName::from(s))
    }
}

impl<'a> From<&'a str> for TagName {
    fn from(s: &'a str) -> Self {
        Self(LocalName::from(s))
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

/// Namespace atom usable in selectors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NamespaceUrl(pub Namespace);

impl precomputed_hash::PrecomputedHash for NamespaceUrl {
    fn precomputed_hash(&self) -> u32 {
        self.0.precomputed_hash()
    }
}

impl cssparser::ToCss for NamespaceUrl {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str(self.0.as_ref())
    }
}

impl From<String> for NamespaceUrl {
    fn from(s: String) -> Self {
        Self(Namespace::from(s))
    }
}

impl<'a> From<&'a str> for NamespaceUrl {
    fn from(s: &'a str) -> Self {
        Self(Namespace::from(s))
    }
}

/// Static documents have no pseudo-elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PseudoElement {}

impl cssparser::ToCss for PseudoElement {
    fn to_css<W: fmt::Write>(&self, _dest: &mut W) -> fmt::Result {
        match *self {}
    }
}

impl selectors::parser::PseudoElement for PseudoElement {
    type Impl = MarkupSelectors;

    fn accepts_state_pseudo_classes(&self) -> bool {
        match *self {}
    }

    fn valid_after_slotted(&self) -> bool {
        match *self {}
    }
}

/// Static documents have no user-action or link state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NonTSPseudoClass {}

impl selectors::parser::NonTSPseudoClass for NonTSPseudoClass {
    type Impl = MarkupSelectors;

    fn is_active_or_hover(&self) -> bool {
        match *self {}
    }

    fn is_user_action_state(&self) -> bool {
        match *self {}
    }
}

impl cssparser::ToCss for NonTSPseudoClass {
    fn to_css<W: fmt::Write>(&self, _dest: &mut W) -> fmt::Result {
        match *self {}
    }
}

impl<'i> selectors::parser::Parser<'i> for MarkupSelectors {
    type Impl = MarkupSelectors;
    type Error = SelectorParseErrorKind<'i>;
}

impl SelectorImpl for MarkupSelectors {
    type ExtraMatchingData<'a> = ();
    type AttrValue = Ident;
    type Identifier = Ident;
    type LocalName = TagName;
    type NamespaceUrl = NamespaceUrl;
    type NamespacePrefix = Ident;
    type BorrowedLocalName = TagName;
    type BorrowedNamespaceUrl = NamespaceUrl;
    type NonTSPseudoClass = NonTSPseudoClass;
    type PseudoElement = PseudoElement;
}

/// A parsed, comma-separated selector list.
pub struct Selector {
    source: String,
    list: SelectorList<MarkupSelectors>,
}

impl Selector {
    /// Parse a selector list such as `h1` or `main > h1, article h1`.
    pub fn parse(source: &str) -> Result<Self> {
        let mut input = cssparser::ParserInput::new(source);
        let mut parser = cssparser::Parser::new(&mut input);
        let list = SelectorList::parse(&MarkupSelectors, &mut parser, ParseRelative::No)
            .map_err(|e| Error::Parse(format!("invalid selector {source:?}: {:?}", e.kind)))?;
        Ok(Self {
            source: source.to_string(),
            list,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the element `id` matches any selector in the list.
    pub fn matches(&self, dom: &Dom, id: NodeId, caches: &mut SelectorCaches) -> bool {
        if !dom.is_element(id) {
            return false;
        }
        let element = ElementRef::new(dom, id);
        let mut context = MatchingContext::new(
            selectors::matching::MatchingMode::Normal,
            None,
            caches,
            selectors::context::QuirksMode::NoQuirks,
            selectors::matching::NeedsSelectorFlags::No,
            selectors::matching::MatchingForInvalidation::No,
        );
        self.list.slice().iter().any(|selector| {
            selectors::matching::matches_selector(selector, 0, None, &element, &mut context)
        })
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Selector").field(&self.source).finish()
    }
}

impl Dom {
    /// First element in document order matching `selector`.
    pub fn select_first(&self, selector: &Selector) -> Option<NodeId> {
        let mut caches = SelectorCaches::default();
        self.descendants(self.document())
            .find(|&id| selector.matches(self, id, &mut caches))
    }
}

/// Element handle handed to the selector matcher.
#[derive(Clone, Copy)]
pub struct ElementRef<'a> {
    pub dom: &'a Dom,
    pub id: NodeId,
}

impl<'a> ElementRef<'a> {
    pub fn new(dom: &'a Dom, id: NodeId) -> Self {
        Self { dom, id }
    }

    fn sibling_element(&self, step: impl Fn(NodeId) -> NodeId) -> Option<Self> {
        let mut current = step(self.id);
        while current.is_some() {
            if self.dom.is_element(current) {
                return Some(Self::new(self.dom, current));
            }
            current = step(current);
        }
        None
    }
}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRef")
            .field("id", &self.id)
            .field("name", &self.dom.element_name(self.id))
            .finish()
    }
}

impl selectors::Element for ElementRef<'_> {
    type Impl = MarkupSelectors;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self)
    }

    fn parent_element(&self) -> Option<Self> {
        let parent = self.dom.get(self.id)?.parent;
        self.dom
            .is_element(parent)
            .then(|| Self::new(self.dom, parent))
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        let dom = self.dom;
        self.sibling_element(|id| dom.get(id).map_or(NodeId::NONE, |n| n.prev_sibling))
    }

    fn next_sibling_element(&self) -> Option<Self> {
        let dom = self.dom;
        self.sibling_element(|id| dom.get(id).map_or(NodeId::NONE, |n| n.next_sibling))
    }

    fn first_element_child(&self) -> Option<Self> {
        self.dom
            .children(self.id)
            .find(|&child| self.dom.is_element(child))
            .map(|child| Self::new(self.dom, child))
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, name: &TagName) -> bool {
        self.dom
            .element_name(self.id)
            .is_some_and(|n| n == &name.0)
    }

    fn has_namespace(&self, ns: &NamespaceUrl) -> bool {
        self.dom
            .element_namespace(self.id)
            .is_some_and(|n| n == &ns.0)
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.dom.element_name(self.id) == other.dom.element_name(other.id)
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&NamespaceUrl>,
        local_name: &TagName,
        operation: &AttrSelectorOperation<&Ident>,
    ) -> bool {
        self.dom
            .attrs(self.id)
            .iter()
            .filter(|attr| match ns {
                NamespaceConstraint::Any => true,
                NamespaceConstraint::Specific(ns) => attr.name.ns == ns.0,
            })
            .find(|attr| attr.name.local == local_name.0)
            .is_some_and(|attr| operation.eval_str(&attr.value))
    }

    fn match_non_ts_pseudo_class(
        &self,
        pc: &NonTSPseudoClass,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        match *pc {}
    }

    fn match_pseudo_element(
        &self,
        pe: &PseudoElement,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        match *pe {}
    }

    fn is_link(&self) -> bool {
        self.dom
            .element_name(self.id)
            .is_some_and(|n| n.as_ref() == "a")
            && self.dom.get_attr(self.id, "href").is_some()
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn has_id(&self, id: &Ident, case_sensitivity: CaseSensitivity) -> bool {
        self.dom
            .get_attr(self.id, "id")
            .is_some_and(|value| case_sensitivity.eq(value.as_bytes(), id.0.as_bytes()))
    }

    fn has_class(&self, name: &Ident, case_sensitivity: CaseSensitivity) -> bool {
        self.dom
            .element_classes(self.id)
            .iter()
            .any(|c| case_sensitivity.eq(c.as_bytes(), name.0.as_bytes()))
    }

    fn imported_part(&self, _name: &Ident) -> Option<Ident> {
        None
    }

    fn is_part(&self, _name: &Ident) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.dom.children(self.id).all(|child| {
            match self.dom.get(child).map(|n| &n.data) {
                Some(NodeData::Element { .. }) => false,
                Some(NodeData::Text(t)) => t.is_empty(),
                _ => true,
            }
        })
    }

    fn is_root(&self) -> bool {
        self.dom
            .get(self.id)
            .and_then(|n| self.dom.get(n.parent))
            .is_some_and(|parent| matches!(parent.data, NodeData::Document))
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn add_element_unique_hashes(&self, _filter: &mut selectors::bloom::BloomFilter) -> bool {
        false
    }

    fn has_custom_state(&self, _name: &Ident) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(html: &str, selector: &str) -> Option<String> {
        let dom = Dom::parse(html);
        let selector = Selector::parse(selector).unwrap();
        dom.select_first(&selector).map(|id| dom.inner_text(id))
    }

    #[test]
    fn test_first_match_in_document_order() {
        let html = "<div><section><h1>Deep</h1></section></div><h1>Later</h1>";
        assert_eq!(first(html, "h1").as_deref(), Some("Deep"));
    }

    #[test]
    fn test_class_and_id_selectors() {
        let html = r#"<p class="intro lead">A</p><p id="main">B</p>"#;
        assert_eq!(first(html, ".lead").as_deref(), Some("A"));
        assert_eq!(first(html, "p#main").as_deref(), Some("B"));
        assert_eq!(first(html, ".missing"), None);
    }

    #[test]
    fn test_combinators() {
        let html = "<div><span><p>Nested</p></span></div><div><p>Direct</p></div>";
        assert_eq!(first(html, "div > p").as_deref(), Some("Direct"));
        assert_eq!(first(html, "span p").as_deref(), Some("Nested"));
        assert_eq!(first(html, "div + div p").as_deref(), Some("Direct"));
    }

    #[test]
    fn test_attribute_selector() {
        let html = r#"<a href="/x">plain</a><a href="https://example.com">ext</a>"#;
        assert_eq!(first(html, r#"a[href^="https"]"#).as_deref(), Some("ext"));
    }

    #[test]
    fn test_selector_list_takes_earliest_element() {
        let html = "<h2>Sub</h2><h1>Top</h1>";
        assert_eq!(first(html, "h1, h2").as_deref(), Some("Sub"));
    }

    #[test]
    fn test_invalid_selector() {
        assert!(matches!(Selector::parse("h1[").unwrap_err(), Error::Parse(_)));
        assert!(matches!(Selector::parse(":hover").unwrap_err(), Error::Parse(_)));
    }

    #[test]
    fn test_structural_pseudo_classes() {
        let html = "<ul><li>one</li><li>two</li></ul>";
        assert_eq!(first(html, "li:last-child").as_deref(), Some("two"));
        assert_eq!(first(html, "li:first-child").as_deref(), Some("one"));
    }
}
