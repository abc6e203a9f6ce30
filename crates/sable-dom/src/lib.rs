//! A minimal arena-based element tree for driving the selector engine.
//!
//! This is not a full DOM; it models exactly what selector matching needs
//! from one, following the [DOM Living Standard](https://dom.spec.whatwg.org/)
//! where it models anything at all.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all
//! relationships, providing O(1) access and traversal without borrow
//! checker issues. [`ElementRef`] pairs a `NodeId` with its tree and
//! implements [`Element`], so matching walks the arena through plain
//! copies.

use std::collections::HashMap;

use sable_selectors::{Element, NamespaceUrl, NonTSPseudoClass, PseudoElement};

/// A type-safe index into the element tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "Each node has an associated node document..."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root element is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// One node in the arena.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// Stores indices for parent/child/sibling relationships, enabling O(1)
/// traversal in any direction.
#[derive(Debug, Clone)]
pub struct Node {
    /// The element payload.
    pub data: ElementData,
    /// "An object that participates in a tree has a parent, which is
    /// either null or an object."
    pub parent: Option<NodeId>,
    /// "A node has an associated list of children."
    pub children: Vec<NodeId>,
    /// "An object A's next sibling is the object immediately following A
    /// in the children of A's parent."
    pub next_sibling: Option<NodeId>,
    /// "An object A's previous sibling is the object immediately preceding
    /// A in the children of A's parent."
    pub prev_sibling: Option<NodeId>,
}

/// Element-specific data: everything the matching engine can ask about.
///
/// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
/// "Elements have an associated namespace, namespace prefix, local name..."
#[derive(Debug, Clone)]
pub struct ElementData {
    /// "When an element is created, its local name is always given."
    pub local_name: String,
    /// The element's namespace, if any.
    pub namespace: Option<NamespaceUrl>,
    /// "An element has an associated attribute list."
    pub attributes: HashMap<String, String>,
    /// When set, this node stands for a pseudo-element of its parent
    /// rather than a real element.
    pub pseudo_element: Option<PseudoElement>,
    /// The element states (`:hover`, `:focus`, ...) currently active.
    pub pseudo_classes: Vec<NonTSPseudoClass>,
    /// Whether the element has text content, which disqualifies it from
    /// `:empty` even when it has no child elements.
    pub has_text: bool,
}

impl ElementData {
    /// A plain element with the given local name.
    #[must_use]
    pub fn new(local_name: &str) -> Self {
        Self {
            local_name: local_name.to_owned(),
            namespace: None,
            attributes: HashMap::new(),
            pseudo_element: None,
            pseudo_classes: Vec::new(),
            has_text: false,
        }
    }

    /// Set the `id` attribute.
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        let _ = self.attributes.insert("id".to_owned(), id.to_owned());
        self
    }

    /// Append a class to the `class` attribute.
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        let classes = self.attributes.entry("class".to_owned()).or_default();
        if !classes.is_empty() {
            classes.push(' ');
        }
        classes.push_str(class);
        self
    }

    /// Set an arbitrary attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        let _ = self
            .attributes
            .insert(name.to_owned(), value.to_owned());
        self
    }

    /// Set the element's namespace.
    #[must_use]
    pub fn with_namespace(mut self, url: &str) -> Self {
        self.namespace = Some(NamespaceUrl(url.to_owned()));
        self
    }

    /// Mark an active element state.
    #[must_use]
    pub fn with_pseudo_class(mut self, pseudo_class: NonTSPseudoClass) -> Self {
        self.pseudo_classes.push(pseudo_class);
        self
    }

    /// Turn this node into a pseudo-element of its parent.
    #[must_use]
    pub const fn with_pseudo_element(mut self, pseudo_element: PseudoElement) -> Self {
        self.pseudo_element = Some(pseudo_element);
        self
    }

    /// Mark the element as having text content.
    #[must_use]
    pub const fn with_text(mut self) -> Self {
        self.has_text = true;
        self
    }

    /// "The id attribute specifies its element's unique identifier (ID)."
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attributes.get("id").map(String::as_str)
    }

    /// The space-separated tokens of the `class` attribute.
    pub fn each_class<F: FnMut(&str)>(&self, mut callback: F) {
        if let Some(class_list) = self.attributes.get("class") {
            for class in class_list.split_ascii_whitespace() {
                callback(class);
            }
        }
    }
}

/// Arena-based element tree with O(1) node access and traversal.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
/// "The DOM represents a document as a tree."
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// A tree holding only the root element.
    #[must_use]
    pub fn new(root: ElementData) -> Self {
        Self {
            nodes: vec![Node {
                data: root,
                parent: None,
                children: Vec::new(),
                next_sibling: None,
                prev_sibling: None,
            }],
        }
    }

    /// The root element.
    #[must_use]
    pub const fn root(&self) -> ElementRef<'_> {
        ElementRef {
            tree: self,
            id: NodeId::ROOT,
        }
    }

    /// The number of nodes in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes. Never true for a constructed tree,
    /// which always has its root.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// Allocate a node for `data` and append it as the last child of
    /// `parent`, wiring the sibling links.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not a node of this tree.
    pub fn append_child(&mut self, parent: NodeId, data: ElementData) -> NodeId {
        assert!(parent.0 < self.nodes.len(), "parent is not in this tree");

        let id = NodeId(self.nodes.len());
        let prev_sibling = self.nodes[parent.0].children.last().copied();
        self.nodes.push(Node {
            data,
            parent: Some(parent),
            children: Vec::new(),
            next_sibling: None,
            prev_sibling,
        });
        if let Some(prev) = prev_sibling {
            self.nodes[prev.0].next_sibling = Some(id);
        }
        self.nodes[parent.0].children.push(id);
        id
    }

    /// The element handle for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a node of this tree.
    #[must_use]
    pub fn element(&self, id: NodeId) -> ElementRef<'_> {
        assert!(id.0 < self.nodes.len(), "id is not in this tree");
        ElementRef { tree: self, id }
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

/// A cheap element handle: the tree plus an index into it.
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    tree: &'a Tree,
    id: NodeId,
}

impl PartialEq for ElementRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for ElementRef<'_> {}

impl ElementRef<'_> {
    /// The handle's index.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    fn node(&self) -> &Node {
        self.tree.node(self.id)
    }

    fn wrap(&self, id: Option<NodeId>) -> Option<Self> {
        id.map(|id| Self {
            tree: self.tree,
            id,
        })
    }

    /// The previous sibling that is a real element, skipping pseudo-element
    /// placeholder nodes.
    fn previous_real_sibling(&self) -> Option<Self> {
        let mut current = self.wrap(self.node().prev_sibling)?;
        loop {
            if current.node().data.pseudo_element.is_none() {
                return Some(current);
            }
            current = current.wrap(current.node().prev_sibling)?;
        }
    }

    fn next_real_sibling(&self) -> Option<Self> {
        let mut current = self.wrap(self.node().next_sibling)?;
        loop {
            if current.node().data.pseudo_element.is_none() {
                return Some(current);
            }
            current = current.wrap(current.node().next_sibling)?;
        }
    }
}

impl Element for ElementRef<'_> {
    fn parent(&self) -> Option<Self> {
        self.wrap(self.node().parent)
    }

    fn previous_sibling(&self) -> Option<Self> {
        self.previous_real_sibling()
    }

    fn next_sibling(&self) -> Option<Self> {
        self.next_real_sibling()
    }

    fn owner(&self) -> Option<Self> {
        // pseudo-element nodes hang off their originating element
        self.wrap(self.node().parent)
    }

    fn local_name(&self) -> &str {
        &self.node().data.local_name
    }

    fn namespace(&self) -> Option<&NamespaceUrl> {
        self.node().data.namespace.as_ref()
    }

    fn id(&self) -> Option<&str> {
        self.node().data.id()
    }

    fn has_class(&self, class: &str, case_sensitive: bool) -> bool {
        let mut found = false;
        self.node().data.each_class(|own| {
            if case_sensitive {
                found = found || own == class;
            } else {
                found = found || own.eq_ignore_ascii_case(class);
            }
        });
        found
    }

    fn each_class<F: FnMut(&str)>(&self, callback: F) {
        self.node().data.each_class(callback);
    }

    fn attribute(&self, local_name: &str) -> Option<&str> {
        self.node().data.attributes.get(local_name).map(String::as_str)
    }

    fn is_root(&self) -> bool {
        self.node().parent.is_none()
    }

    fn is_empty(&self) -> bool {
        let node = self.node();
        !node.data.has_text
            && node
                .children
                .iter()
                .all(|child| self.tree.node(*child).data.pseudo_element.is_some())
    }

    fn match_pseudo_element(&self, pseudo_element: &PseudoElement) -> bool {
        self.node().data.pseudo_element.as_ref() == Some(pseudo_element)
    }

    fn match_non_ts_pseudo_class(&self, pseudo_class: &NonTSPseudoClass) -> bool {
        self.node().data.pseudo_classes.contains(pseudo_class)
    }
}

#[cfg(test)]
mod tests {
    use super::{ElementData, NodeId, Tree};
    use sable_selectors::Element;

    fn sample_tree() -> Tree {
        let mut tree = Tree::new(ElementData::new("html"));
        let body = tree.append_child(NodeId::ROOT, ElementData::new("body"));
        let _ = tree.append_child(body, ElementData::new("p").with_id("intro"));
        let _ = tree.append_child(body, ElementData::new("p").with_class("note"));
        tree
    }

    #[test]
    fn test_sibling_links() {
        let tree = sample_tree();
        let first = tree.element(NodeId(2));
        let second = tree.element(NodeId(3));
        assert_eq!(first.next_sibling(), Some(second));
        assert_eq!(second.previous_sibling(), Some(first));
        assert_eq!(first.previous_sibling(), None);
    }

    #[test]
    fn test_root_and_parent() {
        let tree = sample_tree();
        assert!(tree.root().is_root());
        let paragraph = tree.element(NodeId(2));
        assert_eq!(paragraph.parent(), Some(tree.element(NodeId(1))));
    }

    #[test]
    fn test_classes_and_ids() {
        let tree = sample_tree();
        let intro = tree.element(NodeId(2));
        assert!(intro.has_id("intro", true));
        assert!(!intro.has_id("INTRO", true));
        assert!(intro.has_id("INTRO", false));
        let note = tree.element(NodeId(3));
        assert!(note.has_class("note", true));
        assert!(!note.has_class("other", true));
    }

    #[test]
    fn test_repeated_classes_accumulate() {
        let data = ElementData::new("div").with_class("a").with_class("b");
        let mut tree = Tree::new(ElementData::new("html"));
        let id = tree.append_child(NodeId::ROOT, data);
        let element = tree.element(id);
        assert!(element.has_class("a", true));
        assert!(element.has_class("b", true));
        assert_eq!(element.attribute("class"), Some("a b"));
    }

    #[test]
    fn test_empty() {
        let tree = sample_tree();
        assert!(tree.element(NodeId(2)).is_empty());
        assert!(!tree.root().is_empty());
    }
}
