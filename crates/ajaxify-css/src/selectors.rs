//! CSS Selectors Module
//!
//! Selector data model and right-to-left matching against a [`DomTree`].

use std::fmt;
use std::str::FromStr;

use ajaxify_dom::{DomTree, ElementMatcher, NodeId};

use crate::SelectorError;

/// Comma-separated list of complex selectors
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
    source: String,
}

impl SelectorList {
    pub(crate) fn new(selectors: Vec<ComplexSelector>, source: &str) -> Self {
        Self {
            selectors,
            source: source.trim().to_string(),
        }
    }

    /// Selector text as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Check if an element matches any selector in the list
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        tree.element(node).is_some() && self.selectors.iter().any(|s| s.matches(tree, node))
    }

    /// All matching descendants of `root`, in tree order
    pub fn query_all(&self, tree: &DomTree, root: NodeId) -> Vec<NodeId> {
        tree.descendants(root)
            .into_iter()
            .filter(|&n| self.matches(tree, n))
            .collect()
    }

    /// First matching descendant of `root`
    pub fn query(&self, tree: &DomTree, root: NodeId) -> Option<NodeId> {
        tree.descendants(root).into_iter().find(|&n| self.matches(tree, n))
    }

    /// Nearest inclusive ancestor matching the list
    pub fn closest(&self, tree: &DomTree, node: NodeId) -> Option<NodeId> {
        std::iter::once(node)
            .chain(tree.ancestors(node))
            .find(|&n| self.matches(tree, n))
    }
}

impl FromStr for SelectorList {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse_selector_list(s)
    }
}

impl fmt::Display for SelectorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl ElementMatcher for SelectorList {
    fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        SelectorList::matches(self, tree, node)
    }
}

/// Relationship between two compound selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `a b`
    Descendant,
    /// `a > b`
    Child,
    /// `a + b`
    NextSibling,
    /// `a ~ b`
    SubsequentSibling,
}

/// Compound selectors joined by combinators, left to right.
/// `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSelector {
    pub compounds: Vec<CompoundSelector>,
    pub combinators: Vec<Combinator>,
}

impl ComplexSelector {
    /// Check if an element is the subject of this selector
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        match self.compounds.len() {
            0 => false,
            n => self.matches_at(tree, n - 1, node),
        }
    }

    fn matches_at(&self, tree: &DomTree, index: usize, node: NodeId) -> bool {
        if !self.compounds[index].matches(tree, node) {
            return false;
        }
        if index == 0 {
            return true;
        }

        let next = index - 1;
        match self.combinators[next] {
            Combinator::Child => parent_element(tree, node)
                .is_some_and(|p| self.matches_at(tree, next, p)),
            Combinator::Descendant => tree
                .ancestors(node)
                .filter(|&a| tree.element(a).is_some())
                .any(|a| self.matches_at(tree, next, a)),
            Combinator::NextSibling => previous_element_sibling(tree, node)
                .is_some_and(|s| self.matches_at(tree, next, s)),
            Combinator::SubsequentSibling => {
                let mut current = previous_element_sibling(tree, node);
                while let Some(sibling) = current {
                    if self.matches_at(tree, next, sibling) {
                        return true;
                    }
                    current = previous_element_sibling(tree, sibling);
                }
                false
            }
        }
    }
}

/// Sequence of simple selectors applying to one element (`a.btn[data-ajax]`)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundSelector {
    pub components: Vec<SelectorComponent>,
}

impl CompoundSelector {
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        tree.element(node).is_some() && self.components.iter().all(|c| match_component(c, tree, node))
    }
}

/// A component of a selector
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorComponent {
    /// Universal selector *
    Universal,
    /// Type selector (tag name)
    Type(String),
    /// ID selector #id
    Id(String),
    /// Class selector .class
    Class(String),
    /// Attribute selector [attr], [attr=value], etc.
    Attribute(AttributeSelector),
    /// Pseudo-class :not(), :first-child, etc.
    PseudoClass(PseudoClass),
}

/// Attribute selector
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
    pub name: String,
    pub matcher: Option<AttributeMatcher>,
    pub case_insensitive: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeMatcher {
    /// [attr=value] - exact match
    Exact(String),
    /// [attr~=value] - whitespace-separated list contains
    Contains(String),
    /// [attr|=value] - exact or prefix with hyphen
    DashMatch(String),
    /// [attr^=value] - starts with
    Prefix(String),
    /// [attr$=value] - ends with
    Suffix(String),
    /// [attr*=value] - contains substring
    Substring(String),
}

impl AttributeSelector {
    /// Check if an attribute value matches
    pub fn matches(&self, value: Option<&str>) -> bool {
        let (matcher, value) = match (&self.matcher, value) {
            (_, None) => return false,
            (None, Some(_)) => return true,
            (Some(m), Some(v)) => (m, v),
        };

        let fold = |s: &str| {
            if self.case_insensitive {
                s.to_lowercase()
            } else {
                s.to_string()
            }
        };
        let val = fold(value);

        match matcher {
            AttributeMatcher::Exact(expected) => val == fold(expected),
            AttributeMatcher::Contains(expected) => {
                let expected = fold(expected);
                !expected.is_empty() && val.split_ascii_whitespace().any(|w| w == expected)
            }
            AttributeMatcher::DashMatch(expected) => {
                let expected = fold(expected);
                val == expected || val.starts_with(&format!("{}-", expected))
            }
            AttributeMatcher::Prefix(expected) => {
                !expected.is_empty() && val.starts_with(&fold(expected))
            }
            AttributeMatcher::Suffix(expected) => {
                !expected.is_empty() && val.ends_with(&fold(expected))
            }
            AttributeMatcher::Substring(expected) => {
                !expected.is_empty() && val.contains(&fold(expected))
            }
        }
    }
}

/// Pseudo-class type
#[derive(Debug, Clone, PartialEq)]
pub enum PseudoClass {
    // Link and input state, read from attributes
    Link,
    Checked,
    Disabled,
    Enabled,

    // Tree-structural pseudo-classes
    Root,
    Empty,
    FirstChild,
    LastChild,
    OnlyChild,
    NthChild(NthExpression),
    NthLastChild(NthExpression),

    // Logical pseudo-classes
    Not(Box<SelectorList>),
    Is(Box<SelectorList>),
}

/// An+B expression for :nth-* selectors
#[derive(Debug, Clone, PartialEq)]
pub struct NthExpression {
    /// Coefficient (A in An+B)
    pub a: i32,
    /// Offset (B in An+B)
    pub b: i32,
}

impl NthExpression {
    /// Create "odd" expression (2n+1)
    pub fn odd() -> Self {
        Self { a: 2, b: 1 }
    }

    /// Create "even" expression (2n)
    pub fn even() -> Self {
        Self { a: 2, b: 0 }
    }

    /// Create a simple index (0n+b)
    pub fn index(n: i32) -> Self {
        Self { a: 0, b: n }
    }

    /// Create An+B expression
    pub fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// Parse from string like "2n+1", "odd", "even", "3"
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();

        match s.as_str() {
            "odd" => return Some(Self::odd()),
            "even" => return Some(Self::even()),
            _ => {}
        }

        if let Ok(n) = s.parse::<i32>() {
            return Some(Self::index(n));
        }

        let s = s.replace(' ', "");
        let n_pos = s.find('n')?;
        let a = match &s[..n_pos] {
            "" | "+" => 1,
            "-" => -1,
            a => a.parse().ok()?,
        };
        let rest = &s[n_pos + 1..];
        let b = if rest.is_empty() { 0 } else { rest.parse().ok()? };

        Some(Self::new(a, b))
    }

    /// Check if index n (1-based) matches this expression
    pub fn matches(&self, n: i32) -> bool {
        if self.a == 0 {
            return n == self.b;
        }

        let diff = n - self.b;
        if self.a > 0 {
            diff >= 0 && diff % self.a == 0
        } else {
            diff <= 0 && diff % self.a == 0
        }
    }
}

/// Match a selector component against an element
pub fn match_component(component: &SelectorComponent, tree: &DomTree, node: NodeId) -> bool {
    let Some(element) = tree.element(node) else {
        return false;
    };
    match component {
        SelectorComponent::Universal => true,
        SelectorComponent::Type(tag) => element.is(tag),
        SelectorComponent::Id(id) => element.id() == Some(id.as_str()),
        SelectorComponent::Class(class) => element.classes().any(|c| c == class),
        SelectorComponent::Attribute(attr) => attr.matches(element.get_attr(&attr.name)),
        SelectorComponent::PseudoClass(pseudo) => match_pseudo_class(pseudo, tree, node),
    }
}

/// Match a pseudo-class against an element
pub fn match_pseudo_class(pseudo: &PseudoClass, tree: &DomTree, node: NodeId) -> bool {
    let Some(element) = tree.element(node) else {
        return false;
    };
    match pseudo {
        PseudoClass::Link => {
            (element.is("a") || element.is("area")) && element.has_attr("href")
        }
        PseudoClass::Checked => {
            (element.is("input") && element.has_attr("checked"))
                || (element.is("option") && element.has_attr("selected"))
        }
        PseudoClass::Disabled => is_form_control(element.tag.as_str()) && element.has_attr("disabled"),
        PseudoClass::Enabled => is_form_control(element.tag.as_str()) && !element.has_attr("disabled"),

        PseudoClass::Root => parent_element(tree, node).is_none(),
        PseudoClass::Empty => tree
            .children(node)
            .all(|(_, child)| !child.is_element() && child.as_text().is_none_or(str::is_empty)),
        PseudoClass::FirstChild => previous_element_sibling(tree, node).is_none(),
        PseudoClass::LastChild => next_element_sibling(tree, node).is_none(),
        PseudoClass::OnlyChild => {
            previous_element_sibling(tree, node).is_none() && next_element_sibling(tree, node).is_none()
        }
        PseudoClass::NthChild(expr) => {
            let (index, _) = sibling_position(tree, node);
            expr.matches(index as i32)
        }
        PseudoClass::NthLastChild(expr) => {
            let (index, count) = sibling_position(tree, node);
            expr.matches((count - index + 1) as i32)
        }

        PseudoClass::Not(list) => !list.matches(tree, node),
        PseudoClass::Is(list) => list.matches(tree, node),
    }
}

fn is_form_control(tag: &str) -> bool {
    matches!(tag, "input" | "button" | "select" | "textarea" | "option" | "optgroup" | "fieldset")
}

fn parent_element(tree: &DomTree, node: NodeId) -> Option<NodeId> {
    tree.parent(node).filter(|&p| tree.element(p).is_some())
}

fn previous_element_sibling(tree: &DomTree, node: NodeId) -> Option<NodeId> {
    let mut current = tree.get(node)?.prev_sibling;
    while current.is_valid() {
        let sibling = tree.get(current)?;
        if sibling.is_element() {
            return Some(current);
        }
        current = sibling.prev_sibling;
    }
    None
}

fn next_element_sibling(tree: &DomTree, node: NodeId) -> Option<NodeId> {
    let mut current = tree.get(node)?.next_sibling;
    while current.is_valid() {
        let sibling = tree.get(current)?;
        if sibling.is_element() {
            return Some(current);
        }
        current = sibling.next_sibling;
    }
    None
}

/// 1-based index among element siblings, and the sibling count
fn sibling_position(tree: &DomTree, node: NodeId) -> (usize, usize) {
    let Some(parent) = tree.parent(node) else {
        return (1, 1);
    };
    let mut index = 1;
    let mut count = 0;
    for (id, child) in tree.children(parent) {
        if !child.is_element() {
            continue;
        }
        count += 1;
        if id == node {
            index = count;
        }
    }
    (index, count)
}
