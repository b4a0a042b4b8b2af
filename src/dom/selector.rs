// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! CSS Selector parsing and matching
//!
//! Supports selector lists, the four combinators, attribute selectors and the
//! structural/logical pseudo-classes. Matching runs right-to-left against the
//! whole document, so combinators may reach above the element a query was
//! started from.

use std::fmt;

use crate::error::{Error, Result};

use super::node::Node;

/// A parsed CSS selector list (`a, b > c`)
#[derive(Debug, Clone)]
pub struct Selector {
    source: String,
    alternatives: Vec<ComplexSelector>,
}

/// Compound selectors joined by combinators
#[derive(Debug, Clone)]
pub struct ComplexSelector {
    compounds: Vec<CompoundSelector>,
    /// `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`
    combinators: Vec<Combinator>,
}

/// Simple selectors that all apply to one element (`div.a#b[c]`)
#[derive(Debug, Clone, Default)]
pub struct CompoundSelector {
    parts: Vec<SelectorPart>,
}

/// Combinator between compound selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Descendant (space)
    Descendant,
    /// Child (>)
    Child,
    /// Adjacent sibling (+)
    AdjacentSibling,
    /// General sibling (~)
    GeneralSibling,
}

/// A part of a selector
#[derive(Debug, Clone)]
pub enum SelectorPart {
    /// Universal selector (*)
    Universal,
    /// Tag name
    Tag(String),
    /// ID selector (#id)
    Id(String),
    /// Class selector (.class)
    Class(String),
    /// Attribute selector ([attr], [attr=value], etc.)
    Attribute(AttributeSelector),
    /// Pseudo-class (:first-child, etc.)
    PseudoClass(PseudoClass),
}

/// Attribute selector
#[derive(Debug, Clone)]
pub struct AttributeSelector {
    pub name: String,
    pub operator: Option<AttributeOperator>,
    pub value: Option<String>,
    pub case_insensitive: bool,
}

/// Attribute selector operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOperator {
    /// [attr=value] - exact match
    Equals,
    /// [attr~=value] - word in space-separated list
    Includes,
    /// [attr|=value] - exact or prefix with hyphen
    DashMatch,
    /// [attr^=value] - starts with
    Prefix,
    /// [attr$=value] - ends with
    Suffix,
    /// [attr*=value] - contains substring
    Substring,
}

/// Pseudo-class selectors
#[derive(Debug, Clone)]
pub enum PseudoClass {
    FirstChild,
    LastChild,
    OnlyChild,
    NthChild(NthExpr),
    NthLastChild(NthExpr),
    FirstOfType,
    LastOfType,
    OnlyOfType,
    NthOfType(NthExpr),
    NthLastOfType(NthExpr),
    Empty,
    Root,
    Scope,
    Link,
    Checked,
    Disabled,
    Enabled,
    Required,
    Optional,
    Not(Vec<ComplexSelector>),
    Is(Vec<ComplexSelector>),
    Where(Vec<ComplexSelector>),
    Has(Vec<RelativeSelector>),
}

/// Argument of `:has()`: a selector anchored to the subject by a combinator
#[derive(Debug, Clone)]
pub struct RelativeSelector {
    pub combinator: Combinator,
    pub selector: ComplexSelector,
}

/// An+B expression for :nth-* selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NthExpr {
    pub a: i32,
    pub b: i32,
}

/// State shared by one matching run
#[derive(Debug, Clone, Copy, Default)]
struct MatchContext<'a> {
    scope: Option<&'a Node>,
}

/// Elements that can be disabled
const FORM_CONTROLS: &[&str] = &[
    "button", "input", "select", "textarea", "optgroup", "option", "fieldset",
];

impl Selector {
    /// Parse a CSS selector string
    pub fn parse(selector: &str) -> Result<Self> {
        let source = selector.trim();
        if source.is_empty() {
            return Err(Error::selector(selector, "empty selector"));
        }

        let mut parser = SelectorParser::new(source);
        let alternatives = parser.parse_list(None)?;
        Ok(Self {
            source: source.to_string(),
            alternatives,
        })
    }

    /// The selector text this was parsed from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Check if a node matches this selector
    pub fn matches(&self, node: &Node) -> bool {
        self.matches_in(node, MatchContext::default())
    }

    /// Check if a node matches, with `:scope` bound to `scope`
    pub fn matches_with_scope(&self, node: &Node, scope: &Node) -> bool {
        self.matches_in(node, MatchContext { scope: Some(scope) })
    }

    fn matches_in(&self, node: &Node, ctx: MatchContext<'_>) -> bool {
        node.is_element() && self.alternatives.iter().any(|c| c.matches(node, ctx))
    }

    /// Matching descendants of `scope` in document order
    ///
    /// `scope` itself is never part of the result.
    pub fn select(&self, scope: &Node, limit: Option<usize>) -> Vec<Node> {
        let ctx = MatchContext { scope: Some(scope) };
        let mut results = Vec::new();
        if limit == Some(0) {
            return results;
        }

        for candidate in scope.descendant_elements() {
            if self.alternatives.iter().any(|c| c.matches(&candidate, ctx)) {
                results.push(candidate);
                if limit.is_some_and(|l| results.len() >= l) {
                    break;
                }
            }
        }

        results
    }

    /// First matching descendant of `scope`
    pub fn select_first(&self, scope: &Node) -> Option<Node> {
        self.select(scope, Some(1)).into_iter().next()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for Selector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Selector::parse(s)
    }
}

impl ComplexSelector {
    fn matches(&self, node: &Node, ctx: MatchContext<'_>) -> bool {
        if self.compounds.is_empty() {
            return false;
        }
        self.matches_from(self.compounds.len() - 1, node, ctx, None)
    }

    /// Right-to-left match of `compounds[..=idx]` ending at `node`
    ///
    /// With an anchor, the leftmost compound must also relate to the anchor
    /// through the given combinator.
    fn matches_from(
        &self,
        idx: usize,
        node: &Node,
        ctx: MatchContext<'_>,
        anchor: Option<(Combinator, &Node)>,
    ) -> bool {
        if !self.compounds[idx].matches(node, ctx) {
            return false;
        }

        if idx == 0 {
            return match anchor {
                Some((combinator, anchor)) => related(combinator, anchor, node),
                None => true,
            };
        }

        let prev = idx - 1;
        match self.combinators[prev] {
            Combinator::Descendant => {
                let mut current = node.parent_element();
                while let Some(parent) = current {
                    if self.matches_from(prev, &parent, ctx, anchor) {
                        return true;
                    }
                    current = parent.parent_element();
                }
                false
            }
            Combinator::Child => node
                .parent_element()
                .is_some_and(|p| self.matches_from(prev, &p, ctx, anchor)),
            Combinator::AdjacentSibling => node
                .prev_element_sibling()
                .is_some_and(|s| self.matches_from(prev, &s, ctx, anchor)),
            Combinator::GeneralSibling => {
                let mut current = node.prev_element_sibling();
                while let Some(sibling) = current {
                    if self.matches_from(prev, &sibling, ctx, anchor) {
                        return true;
                    }
                    current = sibling.prev_element_sibling();
                }
                false
            }
        }
    }
}

/// Whether `node` stands in `combinator` relation to `anchor` (`anchor <comb> node`)
fn related(combinator: Combinator, anchor: &Node, node: &Node) -> bool {
    match combinator {
        Combinator::Descendant => anchor.contains(node),
        Combinator::Child => node.parent().is_some_and(|p| p == *anchor),
        Combinator::AdjacentSibling => node.prev_element_sibling().is_some_and(|s| s == *anchor),
        Combinator::GeneralSibling => {
            let mut current = node.prev_element_sibling();
            while let Some(sibling) = current {
                if sibling == *anchor {
                    return true;
                }
                current = sibling.prev_element_sibling();
            }
            false
        }
    }
}

impl RelativeSelector {
    fn matches_anchor(&self, anchor: &Node, ctx: MatchContext<'_>) -> bool {
        let search_root = match self.combinator {
            Combinator::Descendant | Combinator::Child => Some(anchor.clone()),
            Combinator::AdjacentSibling | Combinator::GeneralSibling => anchor.parent(),
        };
        let Some(search_root) = search_root else {
            return false;
        };
        let last = self.selector.compounds.len() - 1;

        search_root.descendant_elements().iter().any(|candidate| {
            self.selector
                .matches_from(last, candidate, ctx, Some((self.combinator, anchor)))
        })
    }
}

impl CompoundSelector {
    fn matches(&self, node: &Node, ctx: MatchContext<'_>) -> bool {
        self.parts.iter().all(|part| part_matches(part, node, ctx))
    }
}

/// Check if a selector part matches
fn part_matches(part: &SelectorPart, node: &Node, ctx: MatchContext<'_>) -> bool {
    match part {
        SelectorPart::Universal => true,
        SelectorPart::Tag(tag) => node
            .name()
            .is_some_and(|n| n.eq_ignore_ascii_case(tag)),
        SelectorPart::Id(id) => node.get_attribute("id").is_some_and(|n| n == *id),
        SelectorPart::Class(class) => node
            .get_attribute("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class)),
        SelectorPart::Attribute(attr) => attribute_matches(attr, node),
        SelectorPart::PseudoClass(pseudo) => pseudo_matches(pseudo, node, ctx),
    }
}

/// Check if attribute selector matches
fn attribute_matches(attr: &AttributeSelector, node: &Node) -> bool {
    let Some(value) = node.get_attribute(&attr.name) else {
        return false;
    };

    let (Some(op), Some(target)) = (&attr.operator, &attr.value) else {
        return true; // Just checking existence
    };

    let (value, target) = if attr.case_insensitive {
        (value.to_lowercase(), target.to_lowercase())
    } else {
        (value, target.clone())
    };

    // An empty needle never matches the substring operators
    if target.is_empty() && *op != AttributeOperator::Equals && *op != AttributeOperator::DashMatch {
        return false;
    }

    match op {
        AttributeOperator::Equals => value == target,
        AttributeOperator::Includes => value.split_whitespace().any(|w| w == target),
        AttributeOperator::DashMatch => {
            value == target || value.starts_with(&format!("{target}-"))
        }
        AttributeOperator::Prefix => value.starts_with(&target),
        AttributeOperator::Suffix => value.ends_with(&target),
        AttributeOperator::Substring => value.contains(&target),
    }
}

/// 1-based position among element siblings, counted from the start or end
fn element_index(node: &Node, from_end: bool, same_type: bool) -> i32 {
    let name = node.name();
    let step = |n: &Node| {
        if from_end {
            n.next_element_sibling()
        } else {
            n.prev_element_sibling()
        }
    };

    let mut index = 1;
    let mut sibling = step(node);
    while let Some(s) = sibling {
        if !same_type || s.name() == name {
            index += 1;
        }
        sibling = step(&s);
    }
    index
}

fn is_root(node: &Node) -> bool {
    node.parent().is_some_and(|p| p.is_document())
}

fn name_in(node: &Node, names: &[&str]) -> bool {
    node.name().is_some_and(|n| names.contains(&n.as_str()))
}

/// Check if pseudo-class matches
fn pseudo_matches(pseudo: &PseudoClass, node: &Node, ctx: MatchContext<'_>) -> bool {
    match pseudo {
        PseudoClass::FirstChild => node.prev_element_sibling().is_none(),
        PseudoClass::LastChild => node.next_element_sibling().is_none(),
        PseudoClass::OnlyChild => {
            node.prev_element_sibling().is_none() && node.next_element_sibling().is_none()
        }
        PseudoClass::NthChild(expr) => expr.matches(element_index(node, false, false)),
        PseudoClass::NthLastChild(expr) => expr.matches(element_index(node, true, false)),
        PseudoClass::FirstOfType => element_index(node, false, true) == 1,
        PseudoClass::LastOfType => element_index(node, true, true) == 1,
        PseudoClass::OnlyOfType => {
            element_index(node, false, true) == 1 && element_index(node, true, true) == 1
        }
        PseudoClass::NthOfType(expr) => expr.matches(element_index(node, false, true)),
        PseudoClass::NthLastOfType(expr) => expr.matches(element_index(node, true, true)),
        PseudoClass::Empty => node.children().iter().all(|child| {
            if child.is_element() {
                false
            } else if child.is_text() {
                child.text().unwrap_or_default().is_empty()
            } else {
                true
            }
        }),
        PseudoClass::Root => is_root(node),
        PseudoClass::Scope => match ctx.scope {
            Some(scope) if scope.is_document() => is_root(node),
            Some(scope) => node == scope,
            None => is_root(node),
        },
        PseudoClass::Link => {
            name_in(node, &["a", "area", "link"]) && node.has_attribute("href")
        }
        PseudoClass::Checked => {
            (name_in(node, &["input"]) && node.has_attribute("checked"))
                || (name_in(node, &["option"]) && node.has_attribute("selected"))
        }
        PseudoClass::Disabled => name_in(node, FORM_CONTROLS) && node.has_attribute("disabled"),
        PseudoClass::Enabled => name_in(node, FORM_CONTROLS) && !node.has_attribute("disabled"),
        PseudoClass::Required => {
            name_in(node, &["input", "select", "textarea"]) && node.has_attribute("required")
        }
        PseudoClass::Optional => {
            name_in(node, &["input", "select", "textarea"]) && !node.has_attribute("required")
        }
        PseudoClass::Not(selectors) => !selectors.iter().any(|sel| sel.matches(node, ctx)),
        PseudoClass::Is(selectors) | PseudoClass::Where(selectors) => {
            selectors.iter().any(|sel| sel.matches(node, ctx))
        }
        PseudoClass::Has(relatives) => relatives.iter().any(|rel| rel.matches_anchor(node, ctx)),
    }
}

impl NthExpr {
    /// Check if an index matches this expression
    pub fn matches(&self, index: i32) -> bool {
        if self.a == 0 {
            return index == self.b;
        }

        let diff = i64::from(index) - i64::from(self.b);
        let a = i64::from(self.a);
        if a > 0 {
            diff >= 0 && diff % a == 0
        } else {
            diff <= 0 && diff % a == 0
        }
    }

    /// Parse an An+B expression
    pub fn parse(expr: &str) -> Option<Self> {
        let expr: String = expr
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        match expr.as_str() {
            "odd" => return Some(Self { a: 2, b: 1 }),
            "even" => return Some(Self { a: 2, b: 0 }),
            _ => {}
        }

        // Try parsing as number
        if let Ok(n) = expr.parse::<i32>() {
            return Some(Self { a: 0, b: n });
        }

        // Parse An+B format
        if let Some((a_part, b_part)) = expr.split_once('n') {
            let a = match a_part {
                "" | "+" => 1,
                "-" => -1,
                s => s.parse().ok()?,
            };
            let b = if b_part.is_empty() {
                0
            } else if b_part.starts_with('+') || b_part.starts_with('-') {
                b_part.parse().ok()?
            } else {
                return None;
            };
            return Some(Self { a, b });
        }

        None
    }
}

/// Recursive-descent selector parser
struct SelectorParser {
    source: String,
    input: Vec<char>,
    pos: usize,
}

impl SelectorParser {
    fn new(input: &str) -> Self {
        Self {
            source: input.to_string(),
            input: input.chars().collect(),
            pos: 0,
        }
    }

    fn error(&self, reason: impl Into<String>) -> Error {
        Error::selector(self.source.clone(), reason)
    }

    /// Parse `complex (',' complex)*` up to end of input or `terminator`
    fn parse_list(&mut self, terminator: Option<char>) -> Result<Vec<ComplexSelector>> {
        let mut list = Vec::new();
        loop {
            self.skip_whitespace();
            list.push(self.parse_complex()?);
            self.skip_whitespace();

            match self.peek() {
                Some(',') => {
                    self.advance();
                }
                None if terminator.is_none() => break,
                Some(c) if Some(c) == terminator => break,
                Some(c) => return Err(self.error(format!("unexpected '{c}'"))),
                None => return Err(self.error("unexpected end of selector")),
            }
        }
        Ok(list)
    }

    /// Parse a `:has()` argument list
    fn parse_relative_list(&mut self) -> Result<Vec<RelativeSelector>> {
        let mut list = Vec::new();
        loop {
            self.skip_whitespace();
            let combinator = self.parse_explicit_combinator().unwrap_or(Combinator::Descendant);
            self.skip_whitespace();
            let selector = self.parse_complex()?;
            list.push(RelativeSelector {
                combinator,
                selector,
            });
            self.skip_whitespace();

            match self.peek() {
                Some(',') => {
                    self.advance();
                }
                Some(')') => break,
                Some(c) => return Err(self.error(format!("unexpected '{c}'"))),
                None => return Err(self.error("unterminated :has()")),
            }
        }
        Ok(list)
    }

    fn parse_explicit_combinator(&mut self) -> Option<Combinator> {
        let combinator = match self.peek()? {
            '>' => Combinator::Child,
            '+' => Combinator::AdjacentSibling,
            '~' => Combinator::GeneralSibling,
            _ => return None,
        };
        self.advance();
        Some(combinator)
    }

    fn parse_complex(&mut self) -> Result<ComplexSelector> {
        let mut compounds = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_space = self.skip_whitespace();
            let combinator = match self.parse_explicit_combinator() {
                Some(c) => {
                    self.skip_whitespace();
                    c
                }
                None if had_space && self.at_compound_start() => Combinator::Descendant,
                None => break,
            };
            combinators.push(combinator);
            compounds.push(self.parse_compound()?);
        }

        Ok(ComplexSelector {
            compounds,
            combinators,
        })
    }

    fn at_compound_start(&self) -> bool {
        match self.peek() {
            Some('#' | '.' | '[' | ':' | '*' | '\\') => true,
            Some(c) => is_ident_start(c),
            None => false,
        }
    }

    fn parse_compound(&mut self) -> Result<CompoundSelector> {
        let mut parts = Vec::new();

        loop {
            match self.peek() {
                Some('#') => {
                    self.advance();
                    let id = self.read_identifier()?;
                    parts.push(SelectorPart::Id(id));
                }
                Some('.') => {
                    self.advance();
                    let class = self.read_identifier()?;
                    parts.push(SelectorPart::Class(class));
                }
                Some('[') => {
                    parts.push(SelectorPart::Attribute(self.parse_attribute()?));
                }
                Some(':') => {
                    parts.push(SelectorPart::PseudoClass(self.parse_pseudo()?));
                }
                Some('*') if parts.is_empty() => {
                    self.advance();
                    parts.push(SelectorPart::Universal);
                }
                Some(c) if parts.is_empty() && (is_ident_start(c) || c == '\\') => {
                    let tag = self.read_identifier()?;
                    if self.peek() == Some('|') {
                        return Err(self.error("namespace prefixes are not supported"));
                    }
                    parts.push(SelectorPart::Tag(tag.to_lowercase()));
                }
                _ => break,
            }
        }

        if parts.is_empty() {
            return Err(match self.peek() {
                Some(c) => self.error(format!("expected selector, got '{c}'")),
                None => self.error("expected selector, got end of input"),
            });
        }

        Ok(CompoundSelector { parts })
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        self.pos += 1;
        c
    }

    /// Skip whitespace, reporting whether any was skipped
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.advance();
        }
        self.pos > start
    }

    fn read_identifier(&mut self) -> Result<String> {
        let mut result = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.advance();
                match self.advance() {
                    Some(escaped) => result.push(escaped),
                    None => return Err(self.error("dangling escape")),
                }
            } else if c.is_alphanumeric() || c == '_' || c == '-' || !c.is_ascii() {
                result.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if result.is_empty() {
            return Err(self.error("expected identifier"));
        }
        Ok(result)
    }

    fn parse_attribute(&mut self) -> Result<AttributeSelector> {
        self.advance(); // consume '['

        self.skip_whitespace();
        let name = self.read_identifier()?.to_lowercase();
        self.skip_whitespace();

        let mut operator = None;
        let mut value = None;
        let mut case_insensitive = false;

        match self.peek() {
            Some(']') => {}
            Some(c) => {
                let op = match c {
                    '=' => AttributeOperator::Equals,
                    '~' => AttributeOperator::Includes,
                    '|' => AttributeOperator::DashMatch,
                    '^' => AttributeOperator::Prefix,
                    '$' => AttributeOperator::Suffix,
                    '*' => AttributeOperator::Substring,
                    _ => return Err(self.error(format!("unknown attribute operator '{c}'"))),
                };
                self.advance();
                if op != AttributeOperator::Equals {
                    self.expect('=')?;
                }
                operator = Some(op);

                self.skip_whitespace();
                value = Some(self.read_string_or_ident()?);
                self.skip_whitespace();

                match self.peek() {
                    Some('i' | 'I') => {
                        case_insensitive = true;
                        self.advance();
                        self.skip_whitespace();
                    }
                    Some('s' | 'S') => {
                        self.advance();
                        self.skip_whitespace();
                    }
                    _ => {}
                }
            }
            None => return Err(self.error("unterminated attribute selector")),
        }

        self.expect(']')?;

        Ok(AttributeSelector {
            name,
            operator,
            value,
            case_insensitive,
        })
    }

    fn parse_pseudo(&mut self) -> Result<PseudoClass> {
        self.advance(); // consume ':'

        if self.peek() == Some(':') {
            return Err(self.error("pseudo-elements are not supported"));
        }

        let name = self.read_identifier()?.to_lowercase();

        let pseudo = match name.as_str() {
            "first-child" => PseudoClass::FirstChild,
            "last-child" => PseudoClass::LastChild,
            "only-child" => PseudoClass::OnlyChild,
            "first-of-type" => PseudoClass::FirstOfType,
            "last-of-type" => PseudoClass::LastOfType,
            "only-of-type" => PseudoClass::OnlyOfType,
            "empty" => PseudoClass::Empty,
            "root" => PseudoClass::Root,
            "scope" => PseudoClass::Scope,
            "link" | "any-link" => PseudoClass::Link,
            "checked" => PseudoClass::Checked,
            "disabled" => PseudoClass::Disabled,
            "enabled" => PseudoClass::Enabled,
            "required" => PseudoClass::Required,
            "optional" => PseudoClass::Optional,
            "nth-child" => PseudoClass::NthChild(self.parse_nth()?),
            "nth-last-child" => PseudoClass::NthLastChild(self.parse_nth()?),
            "nth-of-type" => PseudoClass::NthOfType(self.parse_nth()?),
            "nth-last-of-type" => PseudoClass::NthLastOfType(self.parse_nth()?),
            "not" => PseudoClass::Not(self.parse_nested_list()?),
            "is" | "matches" => PseudoClass::Is(self.parse_nested_list()?),
            "where" => PseudoClass::Where(self.parse_nested_list()?),
            "has" => {
                self.expect('(')?;
                let list = self.parse_relative_list()?;
                self.expect(')')?;
                PseudoClass::Has(list)
            }
            other => return Err(self.error(format!("unsupported pseudo-class ':{other}'"))),
        };

        Ok(pseudo)
    }

    fn parse_nested_list(&mut self) -> Result<Vec<ComplexSelector>> {
        self.expect('(')?;
        let list = self.parse_list(Some(')'))?;
        self.expect(')')?;
        Ok(list)
    }

    fn parse_nth(&mut self) -> Result<NthExpr> {
        let expr = self.parse_function_arg()?;
        NthExpr::parse(&expr).ok_or_else(|| self.error(format!("invalid nth expression '{expr}'")))
    }

    fn parse_function_arg(&mut self) -> Result<String> {
        self.expect('(')?;
        let mut result = String::new();

        loop {
            match self.advance() {
                Some(')') => break,
                Some(c) => result.push(c),
                None => return Err(self.error("unterminated function argument")),
            }
        }

        Ok(result.trim().to_string())
    }

    fn read_string_or_ident(&mut self) -> Result<String> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.advance();
                let mut result = String::new();
                loop {
                    match self.advance() {
                        Some(c) if c == quote => break,
                        Some('\\') => {
                            if let Some(escaped) = self.advance() {
                                result.push(escaped);
                            }
                        }
                        Some(c) => result.push(c),
                        None => return Err(self.error("unterminated string")),
                    }
                }
                Ok(result)
            }
            _ => self.read_identifier(),
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.advance() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(self.error(format!("expected '{expected}', got '{c}'"))),
            None => Err(self.error(format!("expected '{expected}', got end of input"))),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '-' || !c.is_ascii()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;
    use crate::dom::{parse_html, parse_html_with_config, Document};

    fn fragment(html: &str) -> Document {
        parse_html_with_config(html.as_bytes(), &ParserConfig::fragment().keep_whitespace(false))
            .unwrap()
    }

    fn select(doc: &Document, selector: &str) -> Vec<String> {
        Selector::parse(selector)
            .unwrap()
            .select(&doc.root(), None)
            .iter()
            .map(Node::outer_html)
            .collect()
    }

    #[test]
    fn test_selector_parsing() {
        assert!(Selector::parse("div").is_ok());
        assert!(Selector::parse(".class").is_ok());
        assert!(Selector::parse("#id").is_ok());
        assert!(Selector::parse("[attr]").is_ok());
        assert!(Selector::parse("[attr=value]").is_ok());
        assert!(Selector::parse("div.class#id").is_ok());
        assert!(Selector::parse("ul > li + li ~ li a").is_ok());
        assert!(Selector::parse("a, b ,c").is_ok());
        assert!(Selector::parse("li:not(.x, #y):nth-child(2n+1)").is_ok());
        assert!(Selector::parse("div:has(> p)").is_ok());
    }

    #[test]
    fn test_selector_errors() {
        for bad in [
            "", "   ", "div >", "a,", "[attr", "[a!=b]", "::before", ":hover", "svg|rect",
            "div:nth-child(x)", "p:not(", ".", "#",
        ] {
            let err = Selector::parse(bad).unwrap_err();
            assert!(err.is_selector(), "{bad:?} gave {err}");
        }
    }

    #[test]
    fn test_nth_expr() {
        let odd = NthExpr::parse("odd").unwrap();
        assert!(odd.matches(1));
        assert!(!odd.matches(2));
        assert!(odd.matches(3));

        let even = NthExpr::parse("even").unwrap();
        assert!(!even.matches(1));
        assert!(even.matches(2));

        let expr = NthExpr::parse("2n + 1").unwrap();
        assert!(expr.matches(1));
        assert!(!expr.matches(2));
        assert!(expr.matches(3));

        let first_three = NthExpr::parse("-n+3").unwrap();
        assert!(first_three.matches(3));
        assert!(!first_three.matches(4));

        assert_eq!(NthExpr::parse("4"), Some(NthExpr { a: 0, b: 4 }));
        assert!(NthExpr::parse("2n1").is_none());
    }

    #[test]
    fn test_nth_expr_extreme_offsets() {
        let min = NthExpr::parse("n-2147483648").unwrap();
        assert_eq!(min, NthExpr { a: 1, b: i32::MIN });
        assert!(min.matches(1));
        assert!(!NthExpr::parse("-n-2147483648").unwrap().matches(1));
        assert!(NthExpr::parse("-2147483648n+2147483647").unwrap().matches(1));

        let doc = fragment("<ul><li>1</li><li>2</li></ul>");
        assert_eq!(select(&doc, "li:nth-child(n-2147483648)").len(), 2);
        assert!(select(&doc, "li:nth-last-child(-n-2147483648)").is_empty());
    }

    #[test]
    fn test_combinators() {
        let doc = fragment(
            "<div id=a><p>1</p><span><p>2</p></span></div><p>3</p><p>4</p>",
        );
        assert_eq!(select(&doc, "div p").len(), 2);
        assert_eq!(select(&doc, "div > p"), vec!["<p>1</p>"]);
        assert_eq!(select(&doc, "div + p"), vec!["<p>3</p>"]);
        assert_eq!(select(&doc, "div ~ p"), vec!["<p>3</p>", "<p>4</p>"]);
        assert_eq!(select(&doc, "#a>span>p"), vec!["<p>2</p>"]);
    }

    #[test]
    fn test_selector_list_in_document_order() {
        let doc = fragment("<b>1</b><i>2</i><b>3</b>");
        assert_eq!(
            select(&doc, "i, b"),
            vec!["<b>1</b>", "<i>2</i>", "<b>3</b>"]
        );
    }

    #[test]
    fn test_attribute_operators() {
        let doc = fragment(
            r#"<a href="https://x.org/a.pdf" lang="en-US" class="btn big" data-x="">l</a>"#,
        );
        for sel in [
            "[href]",
            "[href^=https]",
            "[href$='.pdf']",
            "[href*=\"x.org\"]",
            "[lang|=en]",
            "[class~=big]",
            "[lang=EN-us i]",
            "[data-x='']",
        ] {
            assert_eq!(select(&doc, sel).len(), 1, "{sel}");
        }
        for sel in ["[lang=EN-us]", "[href^='']", "[class~=bi]", "[title]"] {
            assert!(select(&doc, sel).is_empty(), "{sel}");
        }
    }

    #[test]
    fn test_structural_pseudo_classes() {
        let doc = fragment(
            "<ul><li>1</li><!-- c --><li class=x>2</li><li>3</li><li>4</li></ul><p></p><p>t</p>",
        );
        assert_eq!(select(&doc, "li:first-child"), vec!["<li>1</li>"]);
        assert_eq!(select(&doc, "li:last-child"), vec!["<li>4</li>"]);
        assert_eq!(select(&doc, "li:nth-child(even)").len(), 2);
        assert_eq!(select(&doc, "li:nth-last-child(1)"), vec!["<li>4</li>"]);
        assert_eq!(select(&doc, "p:first-of-type").len(), 1);
        assert_eq!(select(&doc, "li:not(.x):nth-of-type(-n+2)"), vec!["<li>1</li>"]);
        assert_eq!(select(&doc, "p:empty"), vec!["<p></p>"]);
        assert_eq!(select(&doc, ":root").len(), 3);
        assert_eq!(select(&doc, "ul :only-child").len(), 0);
        assert_eq!(select(&doc, "li:is(.x, :last-child)").len(), 2);
        assert_eq!(select(&doc, "li:where(.x)").len(), 1);
    }

    #[test]
    fn test_has() {
        let doc = fragment("<div><p>a</p></div><div><span><p>b</p></span></div><h1></h1><h2></h2>");
        assert_eq!(select(&doc, "div:has(p)").len(), 2);
        assert_eq!(select(&doc, "div:has(> p)").len(), 1);
        assert_eq!(select(&doc, "div:has(span p)").len(), 1);
        assert_eq!(select(&doc, "h1:has(+ h2)"), vec!["<h1></h1>"]);
        assert!(select(&doc, "h2:has(~ h1)").is_empty());
    }

    #[test]
    fn test_form_pseudo_classes() {
        let doc = fragment(
            r#"<input type=checkbox checked><input disabled required><option selected>o</option><a href=x>l</a><a>n</a>"#,
        );
        assert_eq!(select(&doc, ":checked").len(), 2);
        assert_eq!(select(&doc, "input:disabled").len(), 1);
        assert_eq!(select(&doc, "input:enabled").len(), 1);
        assert_eq!(select(&doc, ":required").len(), 1);
        assert_eq!(select(&doc, "input:optional").len(), 1);
        assert_eq!(select(&doc, ":link"), vec![r#"<a href="x">l</a>"#]);
    }

    #[test]
    fn test_scope_and_context() {
        let doc = parse_html("<div id=outer><section><p>x</p></section></div>").unwrap();
        let section = Selector::parse("section").unwrap().select_first(&doc.root()).unwrap();

        // Ancestors above the scope still satisfy combinators
        let sel = Selector::parse("#outer p").unwrap();
        assert_eq!(sel.select(&section, None).len(), 1);

        // The scope itself is never returned
        let sel = Selector::parse("section").unwrap();
        assert!(sel.select(&section, None).is_empty());

        let sel = Selector::parse(":scope > p").unwrap();
        assert_eq!(sel.select(&section, None).len(), 1);
        assert!(sel.matches_with_scope(&section.element_children()[0], &section));

        let from_root = Selector::parse(":scope > body").unwrap();
        assert_eq!(from_root.select(&doc.root(), None).len(), 1);
    }

    #[test]
    fn test_limit() {
        let doc = fragment("<i>1</i><i>2</i><i>3</i>");
        let sel = Selector::parse("i").unwrap();
        assert_eq!(sel.select(&doc.root(), Some(2)).len(), 2);
        assert!(sel.select(&doc.root(), Some(0)).is_empty());
    }

    #[test]
    fn test_case_and_escapes() {
        let doc = fragment(r#"<DIV class="a:b">x</DIV>"#);
        assert_eq!(select(&doc, "div").len(), 1);
        assert_eq!(select(&doc, "DIV").len(), 1);
        assert_eq!(select(&doc, r".a\:b").len(), 1);
    }
}
