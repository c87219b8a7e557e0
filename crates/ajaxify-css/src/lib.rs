//! Ajaxify CSS - Selectors
//!
//! Parses selector text (`#c1 [data-ajax]:not(form)`) and matches it against
//! the live DOM. A parsed [`SelectorList`] is the element matcher handed to
//! delegated event listeners.

mod parser;
pub mod selectors;

pub use parser::parse_selector_list;
pub use selectors::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, CompoundSelector,
    NthExpression, PseudoClass, SelectorComponent, SelectorList,
};

/// Selector error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("Empty selector")]
    Empty,

    #[error("Unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("Unexpected end of selector")]
    UnexpectedEnd,

    #[error("Unsupported pseudo-class: {0}")]
    UnsupportedPseudo(String),

    #[error("Invalid An+B expression: {0}")]
    InvalidNth(String),
}
