//! The abstraction the matching engine walks over.
//!
//! The engine never sees a concrete document tree; everything it needs from
//! one is expressed here, so any tree representation that can answer these
//! questions can be styled.

use crate::selector::{NamespaceUrl, NonTSPseudoClass, PseudoElement};

/// One element in a document tree, as seen by the matching engine.
///
/// Implementations are expected to be cheap handles (an arena reference, an
/// `Rc`, a pointer wrapper) since the engine clones them freely while
/// walking combinators.
pub trait Element: Sized + Clone {
    /// The parent element, if any.
    fn parent(&self) -> Option<Self>;

    /// The element immediately before this one among its parent's children.
    fn previous_sibling(&self) -> Option<Self>;

    /// The element immediately after this one among its parent's children.
    fn next_sibling(&self) -> Option<Self>;

    /// For a pseudo-element, the originating element it decorates.
    fn owner(&self) -> Option<Self>;

    /// The element's local name, exactly as written in the document.
    fn local_name(&self) -> &str;

    /// The element's namespace, if it has one.
    fn namespace(&self) -> Option<&NamespaceUrl>;

    /// The value of the `id` attribute, if present.
    fn id(&self) -> Option<&str>;

    /// Whether the element's id equals `id`, under the given case rule.
    fn has_id(&self, id: &str, case_sensitive: bool) -> bool {
        self.id().is_some_and(|own| {
            if case_sensitive {
                own == id
            } else {
                own.eq_ignore_ascii_case(id)
            }
        })
    }

    /// Whether `class` appears in the element's class list, under the given
    /// case rule.
    fn has_class(&self, class: &str, case_sensitive: bool) -> bool;

    /// Visit every class in the element's class list.
    fn each_class<F: FnMut(&str)>(&self, callback: F);

    /// The value of the attribute named `local_name` (no namespace), if
    /// present.
    fn attribute(&self, local_name: &str) -> Option<&str>;

    /// Whether this is the root element of the document.
    fn is_root(&self) -> bool;

    /// Whether the element has no child elements and no text content.
    fn is_empty(&self) -> bool;

    /// Whether this element represents the given pseudo-element.
    fn match_pseudo_element(&self, pseudo_element: &PseudoElement) -> bool;

    /// Whether the given non-tree-structural pseudo-class holds, judged by
    /// whatever element state the implementation carries.
    fn match_non_ts_pseudo_class(&self, pseudo_class: &NonTSPseudoClass) -> bool;
}
