//! Arena-allocated markup tree.
//!
//! html5ever parses into this tree through [`DomSink`](super::DomSink). Nodes
//! live in one vector and link to each other by index, which keeps document
//! order traversal a simple stack walk.

use html5ever::{LocalName, Namespace, QualName};

/// Index of a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel for a missing link.
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// Node payload.
#[derive(Debug, Clone)]
pub enum NodeData {
    Document,
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
        /// Whitespace-separated `class` tokens, split once at creation.
        classes: Vec<String>,
    },
    Text(String),
    Comment(String),
    Doctype(String),
}

/// Element attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}

/// Parsed markup tree rooted at a document node.
pub struct Dom {
    nodes: Vec<Node>,
    document: NodeId,
}

impl Dom {
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            document: NodeId::NONE,
        };
        dom.document = dom.alloc(Node::new(NodeData::Document));
        dom
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn document(&self) -> NodeId {
        self.document
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> NodeId {
        let classes = attrs
            .iter()
            .find(|a| a.name.local.as_ref() == "class")
            .map(|a| a.value.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        self.alloc(Node::new(NodeData::Element {
            name,
            attrs,
            classes,
        }))
    }

    pub fn create_text(&mut self, text: String) -> NodeId {
        self.alloc(Node::new(NodeData::Text(text)))
    }

    pub fn create_comment(&mut self, text: String) -> NodeId {
        self.alloc(Node::new(NodeData::Comment(text)))
    }

    pub fn create_doctype(&mut self, name: String) -> NodeId {
        self.alloc(Node::new(NodeData::Doctype(name)))
    }

    /// Append `child` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(NodeId::NONE);

        if let Some(node) = self.get_mut(child) {
            node.parent = parent;
            node.prev_sibling = last_child;
            node.next_sibling = NodeId::NONE;
        }

        if let Some(last) = self.get_mut(last_child) {
            last.next_sibling = child;
        }

        if let Some(node) = self.get_mut(parent) {
            if node.first_child.is_none() {
                node.first_child = child;
            }
            node.last_child = child;
        }
    }

    /// Insert `new_node` immediately before `sibling`.
    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) {
        let (parent, prev) = match self.get(sibling) {
            Some(n) => (n.parent, n.prev_sibling),
            None => return,
        };

        if let Some(node) = self.get_mut(new_node) {
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = sibling;
        }

        if let Some(node) = self.get_mut(sibling) {
            node.prev_sibling = new_node;
        }

        if prev.is_some() {
            if let Some(node) = self.get_mut(prev) {
                node.next_sibling = new_node;
            }
        } else if let Some(node) = self.get_mut(parent) {
            node.first_child = new_node;
        }
    }

    /// Append text to `parent`, merging into a trailing text node if present.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(NodeId::NONE);

        if let Some(last) = self.get_mut(last_child)
            && let NodeData::Text(existing) = &mut last.data
        {
            existing.push_str(text);
            return;
        }

        let node = self.create_text(text.to_string());
        self.append(parent, node);
    }

    /// Unlink `target` from its parent and siblings.
    pub fn detach(&mut self, target: NodeId) {
        let (parent, prev, next) = match self.get(target) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };

        if prev.is_some() {
            if let Some(node) = self.get_mut(prev) {
                node.next_sibling = next;
            }
        } else if let Some(node) = self.get_mut(parent) {
            node.first_child = next;
        }

        if next.is_some() {
            if let Some(node) = self.get_mut(next) {
                node.prev_sibling = prev;
            }
        } else if let Some(node) = self.get_mut(parent) {
            node.last_child = prev;
        }

        if let Some(node) = self.get_mut(target) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
    }

    pub fn children(&self, parent: NodeId) -> Children<'_> {
        let first = self
            .get(parent)
            .map(|n| n.first_child)
            .unwrap_or(NodeId::NONE);
        Children {
            dom: self,
            current: first,
        }
    }

    /// Nodes below `root` in document order (pre-order), excluding `root`.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(root).collect();
        stack.reverse();
        Descendants { dom: self, stack }
    }

    /// Concatenation of every text node under `id`.
    pub fn inner_text(&self, id: NodeId) -> String {
        if let Some(text) = self.text_content(id) {
            return text.to_string();
        }
        self.descendants(id)
            .filter_map(|d| self.text_content(d))
            .collect()
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Children<'a> {
    dom: &'a Dom,
    current: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .dom
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(NodeId::NONE);
        Some(id)
    }
}

pub struct Descendants<'a> {
    dom: &'a Dom,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let start = self.stack.len();
        self.stack.extend(self.dom.children(id));
        self.stack[start..].reverse();
        Some(id)
    }
}

/// Element accessors.
impl Dom {
    pub fn element_name(&self, id: NodeId) -> Option<&LocalName> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { name, .. } => Some(&name.local),
            _ => None,
        })
    }

    pub fn element_namespace(&self, id: NodeId) -> Option<&Namespace> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { name, .. } => Some(&name.ns),
            _ => None,
        })
    }

    pub fn attrs(&self, id: NodeId) -> &[Attribute] {
        self.get(id)
            .and_then(|n| match &n.data {
                NodeData::Element { attrs, .. } => Some(attrs.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn get_attr(&self, id: NodeId, attr_name: &str) -> Option<&str> {
        self.attrs(id)
            .iter()
            .find(|a| a.name.local.as_ref() == attr_name)
            .map(|a| a.value.as_str())
    }

    pub fn element_classes(&self, id: NodeId) -> &[String] {
        self.get(id)
            .and_then(|n| match &n.data {
                NodeData::Element { classes, .. } => Some(classes.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, NodeData::Element { .. }))
    }

    pub fn text_content(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use html5ever::ns;

    use super::*;

    fn qname(local: &str) -> QualName {
        QualName::new(None, ns!(html), LocalName::from(local))
    }

    #[test]
    fn test_append_links_siblings() {
        let mut dom = Dom::new();
        let div = dom.create_element(qname("div"), vec![]);
        let a = dom.create_element(qname("p"), vec![]);
        let b = dom.create_element(qname("p"), vec![]);

        dom.append(dom.document(), div);
        dom.append(div, a);
        dom.append(div, b);

        assert_eq!(dom.children(div).collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(dom.get(b).unwrap().prev_sibling, a);
        assert_eq!(dom.get(a).unwrap().parent, div);
    }

    #[test]
    fn test_descendants_in_document_order() {
        let mut dom = Dom::new();
        let root = dom.document();
        let section = dom.create_element(qname("section"), vec![]);
        let h1 = dom.create_element(qname("h1"), vec![]);
        let p = dom.create_element(qname("p"), vec![]);
        let aside = dom.create_element(qname("aside"), vec![]);

        dom.append(root, section);
        dom.append(section, h1);
        dom.append(section, p);
        dom.append(root, aside);

        let order: Vec<_> = dom.descendants(root).collect();
        assert_eq!(order, vec![section, h1, p, aside]);
    }

    #[test]
    fn test_inner_text_skips_comments() {
        let mut dom = Dom::new();
        let h1 = dom.create_element(qname("h1"), vec![]);
        let em = dom.create_element(qname("em"), vec![]);
        let comment = dom.create_comment("hidden".to_string());

        dom.append(dom.document(), h1);
        dom.append_text(h1, "Hello, ");
        dom.append(h1, em);
        dom.append_text(em, "World");
        dom.append(h1, comment);

        assert_eq!(dom.inner_text(h1), "Hello, World");
    }

    #[test]
    fn test_detach_and_insert_before() {
        let mut dom = Dom::new();
        let ul = dom.create_element(qname("ul"), vec![]);
        let first = dom.create_element(qname("li"), vec![]);
        let second = dom.create_element(qname("li"), vec![]);

        dom.append(dom.document(), ul);
        dom.append(ul, second);
        dom.insert_before(second, first);
        assert_eq!(dom.children(ul).collect::<Vec<_>>(), vec![first, second]);

        dom.detach(first);
        assert_eq!(dom.children(ul).collect::<Vec<_>>(), vec![second]);
        assert!(dom.get(first).unwrap().parent.is_none());
    }

    #[test]
    fn test_class_tokens() {
        let mut dom = Dom::new();
        let div = dom.create_element(
            qname("div"),
            vec![Attribute {
                name: qname("class"),
                value: " lead  title ".to_string(),
            }],
        );
        assert_eq!(dom.element_classes(div), ["lead", "title"]);
        assert_eq!(dom.get_attr(div, "class"), Some(" lead  title "));
    }
}
