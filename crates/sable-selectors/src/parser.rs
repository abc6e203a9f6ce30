//! The selector grammar, built entirely from the core parser combinators.
//!
//! [Selectors Level 3 § 4. Selector syntax](https://www.w3.org/TR/selectors-3/#selector-syntax)

use std::str::FromStr;

use sable_css::nth::parse_nth;
use sable_css::parser::Parser;
use sable_css::token::Token;

use crate::builder::SelectorBuilder;
use crate::error::{SelectorParseError, SelectorParseErrorKind};
use crate::selector::{
    AttrSelectorOperation, AttrSelectorOperator, AttrSelectorWithNamespace, Combinator, Component,
    LocalName, NamespaceConstraint, NamespacePrefix, NamespaceUrl, NonTSPseudoClass, PseudoElement,
    Selector, SelectorList,
};

/// The host-provided context the selector grammar consults for namespace
/// resolution and pseudo-element spelling rules. The grammar has no other
/// external dependency.
pub trait SelectorParserContext {
    /// Whether `name` is a pseudo-element that accepts the CSS2 one-colon
    /// spelling.
    fn pseudo_element_allows_single_colon(&self, name: &str) -> bool {
        PseudoElement::from_str(&name.to_ascii_lowercase())
            .is_ok_and(PseudoElement::allows_single_colon)
    }

    /// The default namespace declared for the stylesheet, if any.
    fn default_namespace(&self) -> Option<NamespaceUrl>;

    /// Intern a written prefix.
    fn namespace_prefix(&self, prefix: &str) -> NamespacePrefix {
        NamespacePrefix(prefix.to_owned())
    }

    /// Resolve a prefix to its declared namespace URL.
    fn namespace_for_prefix(&self, prefix: &NamespacePrefix) -> Option<NamespaceUrl>;
}

/// A context with no namespace declarations, suitable for plain HTML
/// styling and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSelectorContext;

impl SelectorParserContext for DefaultSelectorContext {
    fn default_namespace(&self) -> Option<NamespaceUrl> {
        None
    }

    fn namespace_for_prefix(&self, _prefix: &NamespacePrefix) -> Option<NamespaceUrl> {
        None
    }
}

impl SelectorList {
    /// Parse a comma-separated selector list, the top-level grammar entry.
    ///
    /// # Errors
    ///
    /// Fails if any selector in the list fails; one malformed selector
    /// poisons the whole list, which is the granularity at which a
    /// stylesheet layer drops rules.
    pub fn parse<C: SelectorParserContext>(
        context: &C,
        parser: &mut Parser,
    ) -> Result<Self, SelectorParseError> {
        let selectors = parser.parse_comma_separated(|parser| parse_selector(context, parser))?;
        Ok(Self { selectors })
    }
}

/// Parse one complex selector: compound selectors chained by combinators.
///
/// # Errors
///
/// `UnknownSelector` when nothing selector-like is found at the start,
/// `DanglingCombinator` when a combinator has nothing after it, plus
/// whatever the compound grammar reports.
pub fn parse_selector<C: SelectorParserContext>(
    context: &C,
    parser: &mut Parser,
) -> Result<Selector, SelectorParseError> {
    let mut builder = SelectorBuilder::new();
    let mut has_pseudo_element = false;

    'selector: loop {
        let compound = parse_compound_selector(context, parser, &mut builder)?;
        let Some(compound) = compound else {
            let kind = if builder.has_combinators() {
                SelectorParseErrorKind::DanglingCombinator
            } else {
                SelectorParseErrorKind::UnknownSelector
            };
            return Err(SelectorParseError::new(kind, parser.location()));
        };

        // a pseudo-element terminates the selector
        if compound.has_pseudo_element {
            has_pseudo_element = true;
            break 'selector;
        }

        // Combinator lookup: an explicit `>` / `+` / `~` always wins; any
        // other token ends the selector when no whitespace intervened and
        // means a descendant combinator otherwise.
        let mut any_whitespace = false;
        let combinator = loop {
            let state = parser.state();
            match parser.next_including_whitespace() {
                Err(_) => break 'selector,
                Ok(Token::Whitespace) => any_whitespace = true,
                Ok(Token::Gt) => break Combinator::Child,
                Ok(Token::Plus) => break Combinator::NextSibling,
                Ok(Token::Tilde) => break Combinator::LaterSibling,
                Ok(_) => {
                    parser.reset(&state);
                    if any_whitespace {
                        break Combinator::Descendant;
                    }
                    break 'selector;
                }
            }
        };
        builder.push_combinator(combinator);
    }

    Ok(builder.build(has_pseudo_element))
}

/// The outcome of one compound-selector parse.
struct CompoundInfo {
    has_pseudo_element: bool,
}

/// Parse one compound selector into the builder. `Ok(None)` means nothing
/// selector-like was found where one was optional.
fn parse_compound_selector<C: SelectorParserContext>(
    context: &C,
    parser: &mut Parser,
    builder: &mut SelectorBuilder,
) -> Result<Option<CompoundInfo>, SelectorParseError> {
    parser.skip_whitespace();

    let mut empty = true;
    let mut has_pseudo_element = false;

    if parse_type_selector(context, parser, &mut |component| {
        builder.push_simple_selector(component);
    })? {
        empty = false;
    } else if let Some(url) = context.default_namespace() {
        // no explicit type selector, but the contextual default namespace
        // still constrains the match
        builder.push_simple_selector(Component::DefaultNamespace(url));
    }

    loop {
        match parse_one_simple_selector(context, parser, false)? {
            None => break,
            Some(SimpleSelectorParseResult::Simple(component)) => {
                builder.push_simple_selector(component);
                empty = false;
            }
            Some(SimpleSelectorParseResult::PseudoElement(pseudo)) => {
                // trailing `:state` pseudo-classes chained directly after
                // the pseudo-element, e.g. `::before:hover`
                let mut state_selectors = Vec::new();
                loop {
                    let state = parser.state();
                    match parser.next_including_whitespace() {
                        Ok(Token::Colon) => {
                            let location = parser.location();
                            let name = match parser.next_including_whitespace() {
                                Ok(Token::Identifier(name)) => name,
                                Ok(_) | Err(_) => {
                                    return Err(SelectorParseError::new(
                                        SelectorParseErrorKind::PseudoNeedsIdentifier,
                                        location,
                                    ));
                                }
                            };
                            state_selectors.push(parse_non_ts_pseudo_class(&name, parser)?);
                        }
                        Ok(_) | Err(_) => {
                            parser.reset(&state);
                            break;
                        }
                    }
                }

                if !empty {
                    builder.push_combinator(Combinator::PseudoElement);
                }
                builder.push_simple_selector(Component::PseudoElement(pseudo));
                for component in state_selectors {
                    builder.push_simple_selector(component);
                }
                empty = false;
                has_pseudo_element = true;
                break;
            }
        }
    }

    if empty {
        Ok(None)
    } else {
        Ok(Some(CompoundInfo { has_pseudo_element }))
    }
}

/// How a qualified name resolved its namespace part.
enum QualifiedNamePrefix {
    /// Attribute context with no prefix written: no namespace.
    ImplicitNoNamespace,
    /// Type context with no prefix and no default namespace: any.
    ImplicitAnyNamespace,
    /// Type context with no prefix under a declared default namespace.
    ImplicitDefaultNamespace(NamespaceUrl),
    /// Leading `|`.
    ExplicitNoNamespace,
    /// `*|`.
    ExplicitAnyNamespace,
    /// `prefix|`.
    ExplicitNamespace(NamespacePrefix, NamespaceUrl),
}

/// A resolved qualified name: namespace part plus local name, where `None`
/// local name means the universal `*`.
type QualifiedName = (QualifiedNamePrefix, Option<String>);

/// Parse a type (or universal) selector with its optional namespace prefix
/// into `sink`. Returns whether anything was parsed.
fn parse_type_selector<C: SelectorParserContext>(
    context: &C,
    parser: &mut Parser,
    sink: &mut impl FnMut(Component),
) -> Result<bool, SelectorParseError> {
    let Some((prefix, local_name)) = parse_qualified_name(context, parser, false)? else {
        return Ok(false);
    };

    match prefix {
        QualifiedNamePrefix::ImplicitAnyNamespace => {}
        QualifiedNamePrefix::ImplicitDefaultNamespace(url) => {
            sink(Component::DefaultNamespace(url));
        }
        QualifiedNamePrefix::ExplicitNoNamespace => sink(Component::ExplicitNoNamespace),
        QualifiedNamePrefix::ExplicitAnyNamespace => sink(Component::ExplicitAnyNamespace),
        QualifiedNamePrefix::ExplicitNamespace(prefix, url) => {
            sink(Component::Namespace(prefix, url));
        }
        // only produced with in_attr_selector
        QualifiedNamePrefix::ImplicitNoNamespace => unreachable!(),
    }

    match local_name {
        Some(name) => sink(Component::LocalName(LocalName::new(name))),
        None => sink(Component::ExplicitUniversalType),
    }

    Ok(true)
}

/// [§ 6.1 Type selector](https://www.w3.org/TR/selectors-3/#type-selectors)
///
/// Resolve the optional `prefix|` namespace syntax shared by type selectors
/// and attribute selectors. `Ok(None)` means the lookahead token does not
/// start a qualified name at all.
fn parse_qualified_name<C: SelectorParserContext>(
    context: &C,
    parser: &mut Parser,
    in_attr_selector: bool,
) -> Result<Option<QualifiedName>, SelectorParseError> {
    let start = parser.state();

    match parser.next_including_whitespace() {
        Ok(Token::Identifier(value)) => {
            let after_identifier = parser.state();
            match parser.next_including_whitespace() {
                Ok(Token::Pipe) => {
                    // `value` is a namespace prefix
                    let prefix = context.namespace_prefix(&value);
                    let Some(url) = context.namespace_for_prefix(&prefix) else {
                        return Err(SelectorParseError::new(
                            SelectorParseErrorKind::ExpectedNamespace,
                            parser.location(),
                        ));
                    };
                    explicit_namespace(
                        parser,
                        QualifiedNamePrefix::ExplicitNamespace(prefix, url),
                        in_attr_selector,
                    )
                }
                Ok(_) | Err(_) => {
                    parser.reset(&after_identifier);
                    if in_attr_selector {
                        Ok(Some((QualifiedNamePrefix::ImplicitNoNamespace, Some(value))))
                    } else {
                        Ok(Some((default_namespace(context), Some(value))))
                    }
                }
            }
        }
        Ok(Token::Asterisk) => {
            let after_asterisk = parser.state();
            match parser.next_including_whitespace() {
                Ok(Token::Pipe) => explicit_namespace(
                    parser,
                    QualifiedNamePrefix::ExplicitAnyNamespace,
                    in_attr_selector,
                ),
                Ok(_) | Err(_) => {
                    parser.reset(&after_asterisk);
                    if in_attr_selector {
                        // a bare `*` in an attribute selector only makes
                        // sense as the `*|` any-namespace prefix
                        Err(SelectorParseError::new(
                            SelectorParseErrorKind::ExpectedBarAttributeSelector,
                            parser.location(),
                        ))
                    } else {
                        Ok(Some((default_namespace(context), None)))
                    }
                }
            }
        }
        // leading `|`: explicitly no namespace
        Ok(Token::Pipe) => explicit_namespace(
            parser,
            QualifiedNamePrefix::ExplicitNoNamespace,
            in_attr_selector,
        ),
        Ok(_) | Err(_) => {
            parser.reset(&start);
            Ok(None)
        }
    }
}

/// Parse the local-name part after an explicit `|`.
fn explicit_namespace(
    parser: &mut Parser,
    prefix: QualifiedNamePrefix,
    in_attr_selector: bool,
) -> Result<Option<QualifiedName>, SelectorParseError> {
    let location = parser.location();
    match parser.next_including_whitespace() {
        Ok(Token::Identifier(name)) => Ok(Some((prefix, Some(name)))),
        Ok(Token::Asterisk) if !in_attr_selector => Ok(Some((prefix, None))),
        Ok(token) => {
            let kind = if in_attr_selector {
                SelectorParseErrorKind::InvalidQualifiedNameInAttributeSelector
            } else {
                SelectorParseErrorKind::ExplicitNamespaceUnexpectedToken(token)
            };
            Err(SelectorParseError::new(kind, location))
        }
        Err(error) => Err(error.into()),
    }
}

fn default_namespace<C: SelectorParserContext>(context: &C) -> QualifiedNamePrefix {
    match context.default_namespace() {
        Some(url) => QualifiedNamePrefix::ImplicitDefaultNamespace(url),
        None => QualifiedNamePrefix::ImplicitAnyNamespace,
    }
}

/// One simple selector, or a selector-terminating pseudo-element.
enum SimpleSelectorParseResult {
    Simple(Component),
    PseudoElement(PseudoElement),
}

/// Parse one simple selector: `#id`, `.class`, `[attr...]`, or `:pseudo`.
/// `Ok(None)` means the lookahead token does not start a simple selector.
fn parse_one_simple_selector<C: SelectorParserContext>(
    context: &C,
    parser: &mut Parser,
    inside_negation: bool,
) -> Result<Option<SimpleSelectorParseResult>, SelectorParseError> {
    let start = parser.state();

    match parser.next_including_whitespace() {
        Ok(Token::IdHash(id)) => Ok(Some(SimpleSelectorParseResult::Simple(Component::ID(id)))),
        Ok(Token::Dot) => {
            let location = parser.location();
            match parser.next_including_whitespace() {
                Ok(Token::Identifier(name)) => {
                    Ok(Some(SimpleSelectorParseResult::Simple(Component::Class(name))))
                }
                Ok(_) | Err(_) => Err(SelectorParseError::new(
                    SelectorParseErrorKind::ClassNeedsIdentifier,
                    location,
                )),
            }
        }
        Ok(Token::LBracket) => {
            let attr =
                parser.parse_nested_block(|parser| parse_attribute_selector(context, parser))?;
            Ok(Some(SimpleSelectorParseResult::Simple(attr)))
        }
        Ok(Token::Colon) => {
            let (double_colon, next) = match parser.next_including_whitespace() {
                Ok(Token::Colon) => (true, parser.next_including_whitespace()),
                other => (false, other),
            };
            let location = parser.location();
            let (name, functional) = match next {
                Ok(Token::Identifier(name)) => (name, false),
                Ok(Token::Function(name)) => (name, true),
                Ok(token) if double_colon => {
                    return Err(SelectorParseError::new(
                        SelectorParseErrorKind::NoIdentifierForPseudo(token),
                        location,
                    ));
                }
                Ok(_) | Err(_) => {
                    return Err(SelectorParseError::new(
                        SelectorParseErrorKind::PseudoNeedsIdentifier,
                        location,
                    ));
                }
            };

            if double_colon || context.pseudo_element_allows_single_colon(&name) {
                if functional {
                    // functional pseudo-elements are not supported
                    return Err(SelectorParseError::new(
                        SelectorParseErrorKind::Parse(
                            sable_css::ParseErrorKind::UnsupportedFeature,
                        ),
                        location,
                    ));
                }
                let Ok(pseudo) = PseudoElement::from_str(&name.to_ascii_lowercase()) else {
                    return Err(SelectorParseError::new(
                        SelectorParseErrorKind::Parse(
                            sable_css::ParseErrorKind::UnexpectedToken(Token::Identifier(name)),
                        ),
                        location,
                    ));
                };
                Ok(Some(SimpleSelectorParseResult::PseudoElement(pseudo)))
            } else if functional {
                let component = parser.parse_nested_block(|parser| {
                    parse_functional_pseudo_class(context, parser, &name, inside_negation)
                })?;
                Ok(Some(SimpleSelectorParseResult::Simple(component)))
            } else {
                Ok(Some(SimpleSelectorParseResult::Simple(parse_pseudo_class(
                    &name, parser,
                )?)))
            }
        }
        Ok(_) | Err(_) => {
            parser.reset(&start);
            Ok(None)
        }
    }
}

/// [§ 6.6.1 Dynamic pseudo-classes](https://www.w3.org/TR/selectors-3/#dynamic-pseudos)
/// and [§ 6.6.5 Structural pseudo-classes](https://www.w3.org/TR/selectors-3/#structural-pseudos)
///
/// Resolve a non-functional pseudo-class name, tree-structural first.
fn parse_pseudo_class(name: &str, parser: &Parser) -> Result<Component, SelectorParseError> {
    let component = match name.to_ascii_lowercase().as_str() {
        "first-child" => Component::FirstChild,
        "last-child" => Component::LastChild,
        "only-child" => Component::OnlyChild,
        "first-of-type" => Component::FirstOfType,
        "last-of-type" => Component::LastOfType,
        // both spellings resolve to the same structural test
        "only-of-type" | "only-type" => Component::OnlyOfType,
        "root" => Component::Root,
        "empty" => Component::Empty,
        "scope" => Component::Scope,
        "host" => Component::Host,
        lower => {
            return parse_non_ts_pseudo_class_name(lower, name, parser);
        }
    };
    Ok(component)
}

/// Resolve a non-tree-structural pseudo-class via its fixed name table.
fn parse_non_ts_pseudo_class(
    name: &str,
    parser: &Parser,
) -> Result<Component, SelectorParseError> {
    parse_non_ts_pseudo_class_name(&name.to_ascii_lowercase(), name, parser)
}

fn parse_non_ts_pseudo_class_name(
    lower: &str,
    original: &str,
    parser: &Parser,
) -> Result<Component, SelectorParseError> {
    NonTSPseudoClass::from_str(lower)
        .map(Component::NonTSPseudoClass)
        .map_err(|_| SelectorParseError::new(
            SelectorParseErrorKind::Parse(sable_css::ParseErrorKind::UnexpectedToken(
                Token::Identifier(original.to_owned()),
            )),
            parser.location(),
        ))
}

/// Dispatch a functional pseudo-class by name, inside its `(...)` block.
fn parse_functional_pseudo_class<C: SelectorParserContext>(
    context: &C,
    parser: &mut Parser,
    name: &str,
    inside_negation: bool,
) -> Result<Component, SelectorParseError> {
    match name.to_ascii_lowercase().as_str() {
        "nth-child" => Ok(Component::NthChild(parse_nth(parser)?)),
        "nth-of-type" => Ok(Component::NthOfType(parse_nth(parser)?)),
        "nth-last-child" => Ok(Component::NthLastChild(parse_nth(parser)?)),
        "nth-last-of-type" => Ok(Component::NthLastOfType(parse_nth(parser)?)),
        "not" => {
            if inside_negation {
                return Err(SelectorParseError::new(
                    SelectorParseErrorKind::NonSimpleSelectorInNegation,
                    parser.location(),
                ));
            }
            parse_negation(context, parser)
        }
        "lang" => Ok(Component::NonTSPseudoClass(NonTSPseudoClass::Lang(
            parser.expect_identifier()?,
        ))),
        _ => Err(SelectorParseError::new(
            SelectorParseErrorKind::Parse(sable_css::ParseErrorKind::UnexpectedToken(
                Token::Function(name.to_owned()),
            )),
            parser.location(),
        )),
    }
}

/// [§ 6.6.7 The negation pseudo-class](https://www.w3.org/TR/selectors-3/#negation)
///
/// "The negation pseudo-class, `:not(X)`, is a functional notation taking a
/// simple selector (excluding the negation pseudo-class itself) as an
/// argument."
///
/// Accepts a type selector optionally followed by one more simple selector;
/// never a combinator chain.
fn parse_negation<C: SelectorParserContext>(
    context: &C,
    parser: &mut Parser,
) -> Result<Component, SelectorParseError> {
    let mut simple_selectors = Vec::new();

    parser.skip_whitespace();
    let _ = parse_type_selector(context, parser, &mut |component| {
        simple_selectors.push(component);
    })?;

    match parse_one_simple_selector(context, parser, true)? {
        None => {}
        Some(SimpleSelectorParseResult::Simple(component)) => simple_selectors.push(component),
        Some(SimpleSelectorParseResult::PseudoElement(_)) => {
            return Err(SelectorParseError::new(
                SelectorParseErrorKind::NonSimpleSelectorInNegation,
                parser.location(),
            ));
        }
    }

    if simple_selectors.is_empty() {
        return Err(SelectorParseError::new(
            SelectorParseErrorKind::EmptyNegation,
            parser.location(),
        ));
    }

    Ok(Component::Negation(simple_selectors))
}

/// [§ 6.3 Attribute selectors](https://www.w3.org/TR/selectors-3/#attribute-selectors)
///
/// Runs inside the `[...]` nested block.
fn parse_attribute_selector<C: SelectorParserContext>(
    context: &C,
    parser: &mut Parser,
) -> Result<Component, SelectorParseError> {
    let location = parser.location();
    let Some((prefix, local_name)) = parse_qualified_name(context, parser, true)? else {
        return Err(SelectorParseError::new(
            SelectorParseErrorKind::NoQualifiedNameInAttributeSelector,
            location,
        ));
    };
    let Some(local_name) = local_name else {
        return Err(SelectorParseError::new(
            SelectorParseErrorKind::InvalidQualifiedNameInAttributeSelector,
            location,
        ));
    };
    let local_name_lower = local_name.to_ascii_lowercase();

    let namespace = match prefix {
        QualifiedNamePrefix::ImplicitNoNamespace | QualifiedNamePrefix::ExplicitNoNamespace => {
            None
        }
        QualifiedNamePrefix::ExplicitAnyNamespace => Some(NamespaceConstraint::Any),
        QualifiedNamePrefix::ExplicitNamespace(prefix, url) => {
            Some(NamespaceConstraint::Specific(prefix, url))
        }
        // attribute-mode qualified names never resolve implicitly
        QualifiedNamePrefix::ImplicitAnyNamespace
        | QualifiedNamePrefix::ImplicitDefaultNamespace(_) => unreachable!(),
    };

    // no operator at all (end of block) means a bare existence test
    let operator = match parser.next() {
        Err(_) => {
            return Ok(match namespace {
                Some(namespace) => Component::AttributeOther(Box::new(AttrSelectorWithNamespace {
                    namespace,
                    local_name,
                    local_name_lower,
                    operation: AttrSelectorOperation::Exists,
                    never_matches: false,
                })),
                None => Component::AttributeInNoNamespaceExists {
                    local_name,
                    local_name_lower,
                },
            });
        }
        Ok(Token::Equal) => AttrSelectorOperator::Equal,
        Ok(Token::IncludeMatch) => AttrSelectorOperator::Includes,
        Ok(Token::DashMatch) => AttrSelectorOperator::DashMatch,
        Ok(Token::PrefixMatch) => AttrSelectorOperator::Prefix,
        Ok(Token::SubstringMatch) => AttrSelectorOperator::Substring,
        Ok(Token::SuffixMatch) => AttrSelectorOperator::Suffix,
        Ok(token) => {
            return Err(SelectorParseError::new(
                SelectorParseErrorKind::UnexpectedTokenInAttributeSelector(token),
                parser.location(),
            ));
        }
    };

    let value = match parser.next() {
        Ok(Token::Identifier(value) | Token::String(value)) => value,
        Ok(token) => {
            return Err(SelectorParseError::new(
                SelectorParseErrorKind::UnexpectedTokenInAttributeSelector(token),
                parser.location(),
            ));
        }
        Err(error) => return Err(error.into()),
    };

    // optional trailing case-sensitivity flag
    let case_sensitive = match parser.next() {
        Err(_) => true,
        Ok(Token::Identifier(flag)) if flag.eq_ignore_ascii_case("i") => false,
        Ok(token) => {
            return Err(SelectorParseError::new(
                SelectorParseErrorKind::UnexpectedTokenInAttributeSelector(token),
                parser.location(),
            ));
        }
    };

    let never_matches = match operator {
        AttrSelectorOperator::Includes => value.is_empty() || value.contains(' '),
        AttrSelectorOperator::Prefix
        | AttrSelectorOperator::Substring
        | AttrSelectorOperator::Suffix => value.is_empty(),
        AttrSelectorOperator::Equal | AttrSelectorOperator::DashMatch => false,
    };

    Ok(match namespace {
        Some(namespace) => Component::AttributeOther(Box::new(AttrSelectorWithNamespace {
            namespace,
            local_name,
            local_name_lower,
            operation: AttrSelectorOperation::WithValue {
                operator,
                case_sensitive,
                expected_value: value,
            },
            never_matches,
        })),
        None => Component::AttributeInNoNamespace {
            local_name,
            local_name_lower,
            operator,
            value,
            case_sensitive,
            never_matches,
        },
    })
}
