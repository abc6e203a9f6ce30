//! Assembles a [`Selector`] from source-order parse events.
//!
//! The grammar parser pushes simple selectors and combinators in the order
//! they appear in the source; `build` then emits the component list in
//! matching order (rightmost compound selector first, combinators reversed)
//! and computes the packed specificity in the same pass over the simple
//! selectors.

use serde::Serialize;

use crate::selector::{Combinator, Component, Selector};

/// Each specificity count lives in a 10-bit field of the packed word.
const MAX_10BIT: u32 = (1 << 10) - 1;

/// High bit of the packed word: the selector ends in a pseudo-element.
pub(crate) const HAS_PSEUDO_ELEMENT: u32 = 1 << 31;

/// [§ 9. Calculating a selector's specificity](https://www.w3.org/TR/selectors-3/#specificity)
///
/// "Concatenating the three numbers a-b-c (in a number system with a large
/// base) gives the specificity."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Specificity {
    /// Count of ID selectors.
    pub id_selectors: u32,
    /// Count of class selectors, attribute selectors, and pseudo-classes.
    pub class_like_selectors: u32,
    /// Count of type selectors and pseudo-elements.
    pub element_selectors: u32,
}

impl Specificity {
    /// Pack into a single word, saturating each count at its 10-bit field.
    #[must_use]
    pub const fn packed(self) -> u32 {
        let id = if self.id_selectors > MAX_10BIT {
            MAX_10BIT
        } else {
            self.id_selectors
        };
        let class = if self.class_like_selectors > MAX_10BIT {
            MAX_10BIT
        } else {
            self.class_like_selectors
        };
        let element = if self.element_selectors > MAX_10BIT {
            MAX_10BIT
        } else {
            self.element_selectors
        };
        (id << 20) | (class << 10) | element
    }

    /// Unpack from the packed word.
    #[must_use]
    pub const fn from_packed(packed: u32) -> Self {
        Self {
            id_selectors: (packed >> 20) & MAX_10BIT,
            class_like_selectors: (packed >> 10) & MAX_10BIT,
            element_selectors: packed & MAX_10BIT,
        }
    }
}

/// Accumulates one selector's worth of parse events.
#[derive(Default)]
pub struct SelectorBuilder {
    /// Every simple selector seen so far, in source order, compounds
    /// concatenated.
    simple_selectors: Vec<Component>,
    /// Each combinator seen, paired with the length of the compound
    /// selector that preceded it.
    combinators: Vec<(Combinator, usize)>,
    /// Length of the compound selector currently being accumulated.
    current_len: usize,
}

impl SelectorBuilder {
    /// An empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a simple selector to the current compound selector.
    pub fn push_simple_selector(&mut self, component: Component) {
        debug_assert!(component.as_combinator().is_none());
        self.simple_selectors.push(component);
        self.current_len += 1;
    }

    /// Close the current compound selector with a combinator.
    pub fn push_combinator(&mut self, combinator: Combinator) {
        self.combinators.push((combinator, self.current_len));
        self.current_len = 0;
    }

    /// Whether nothing has been pushed since the last combinator (or at
    /// all).
    #[must_use]
    pub const fn is_empty_compound(&self) -> bool {
        self.current_len == 0
    }

    /// Whether any combinator has been pushed.
    #[must_use]
    pub fn has_combinators(&self) -> bool {
        !self.combinators.is_empty()
    }

    /// Consume the builder, producing the selector in matching order.
    #[must_use]
    pub fn build(mut self, parsed_pseudo_element: bool) -> Selector {
        let mut flags = specificity(self.simple_selectors.iter()).packed();
        if parsed_pseudo_element {
            flags |= HAS_PSEUDO_ELEMENT;
        }

        // Emit the compound selectors back-to-front. The slice window
        // [lower, upper) walks leftward over the source-order buffer; each
        // compound's internals keep their source order.
        let mut components =
            Vec::with_capacity(self.simple_selectors.len() + self.combinators.len());
        let mut upper = self.simple_selectors.len();
        let mut lower = upper - self.current_len;
        loop {
            components.extend_from_slice(&self.simple_selectors[lower..upper]);
            match self.combinators.pop() {
                Some((combinator, len)) => {
                    components.push(Component::Combinator(combinator));
                    upper = lower;
                    lower -= len;
                }
                None => break,
            }
        }

        Selector::new(components, flags)
    }
}

/// Sum the specificity contribution of every simple selector.
fn specificity<'a>(components: impl Iterator<Item = &'a Component>) -> Specificity {
    let mut result = Specificity::default();
    for component in components {
        add_component(&mut result, component);
    }
    result
}

fn add_component(specificity: &mut Specificity, component: &Component) {
    match component {
        Component::ID(_) => specificity.id_selectors += 1,

        Component::Class(_)
        | Component::NonTSPseudoClass(_)
        | Component::FirstChild
        | Component::LastChild
        | Component::OnlyChild
        | Component::FirstOfType
        | Component::LastOfType
        | Component::OnlyOfType
        | Component::Root
        | Component::Empty
        | Component::Scope
        | Component::Host
        | Component::NthChild(_)
        | Component::NthOfType(_)
        | Component::NthLastChild(_)
        | Component::NthLastOfType(_)
        | Component::AttributeInNoNamespaceExists { .. }
        | Component::AttributeInNoNamespace { .. }
        | Component::AttributeOther(_) => specificity.class_like_selectors += 1,

        Component::LocalName(_) | Component::PseudoElement(_) => {
            specificity.element_selectors += 1;
        }

        // "The specificity of :not() is the specificity of its argument."
        Component::Negation(inner) => {
            for component in inner {
                add_component(specificity, component);
            }
        }

        Component::Combinator(_)
        | Component::ExplicitUniversalType
        | Component::DefaultNamespace(_)
        | Component::ExplicitNoNamespace
        | Component::ExplicitAnyNamespace
        | Component::Namespace(..) => {}
    }
}
