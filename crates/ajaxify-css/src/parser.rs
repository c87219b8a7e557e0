//! Selector Parser
//!
//! Hand-written parser for the selector subset the matcher supports.

use crate::selectors::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, CompoundSelector,
    NthExpression, PseudoClass, SelectorComponent, SelectorList,
};
use crate::SelectorError;

/// Parse a comma-separated selector list
pub fn parse_selector_list(input: &str) -> Result<SelectorList, SelectorError> {
    let mut parser = Parser::new(input);
    let selectors = parser
        .list(None)
        .inspect_err(|e| tracing::debug!("Selector parse failed for {:?}: {}", input, e))?;
    tracing::trace!("Parsed {} selector(s) from {:?}", selectors.len(), input);
    Ok(SelectorList::new(selectors, input))
}

struct Parser<'a> {
    chars: Vec<(usize, char)>,
    pos: usize,
    input: &'a str,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.char_indices().collect(),
            pos: 0,
            input,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).map(|&(_, c)| c)
    }

    fn offset(&self) -> usize {
        self.chars.get(self.pos).map(|&(o, _)| o).unwrap_or(self.input.len())
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn unexpected(&self) -> SelectorError {
        match self.peek() {
            Some(ch) => SelectorError::UnexpectedChar { ch, offset: self.offset() },
            None => SelectorError::UnexpectedEnd,
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), SelectorError> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    /// Parse selectors until end of input or `close`
    fn list(&mut self, close: Option<char>) -> Result<Vec<ComplexSelector>, SelectorError> {
        let mut selectors = Vec::new();
        loop {
            self.skip_whitespace();
            selectors.push(self.complex(close)?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                }
                c if c == close => return Ok(selectors),
                _ => return Err(self.unexpected()),
            }
        }
    }

    fn complex(&mut self, close: Option<char>) -> Result<ComplexSelector, SelectorError> {
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_space = self.skip_whitespace();
            let combinator = match self.peek() {
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(',') => break,
                c if c == close => break,
                _ if had_space => Combinator::Descendant,
                _ => return Err(self.unexpected()),
            };
            if combinator != Combinator::Descendant {
                self.pos += 1;
                self.skip_whitespace();
            }
            combinators.push(combinator);
            compounds.push(self.compound()?);
        }

        Ok(ComplexSelector { compounds, combinators })
    }

    fn compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut components = Vec::new();
        loop {
            match self.peek() {
                Some('*') => {
                    self.pos += 1;
                    components.push(SelectorComponent::Universal);
                }
                Some('#') => {
                    self.pos += 1;
                    components.push(SelectorComponent::Id(self.ident()?));
                }
                Some('.') => {
                    self.pos += 1;
                    components.push(SelectorComponent::Class(self.ident()?));
                }
                Some('[') => {
                    self.pos += 1;
                    components.push(SelectorComponent::Attribute(self.attribute()?));
                }
                Some(':') => {
                    self.pos += 1;
                    components.push(SelectorComponent::PseudoClass(self.pseudo_class()?));
                }
                Some(c) if components.is_empty() && is_ident_char(c) => {
                    components.push(SelectorComponent::Type(self.ident()?.to_ascii_lowercase()));
                }
                _ => break,
            }
        }

        if components.is_empty() {
            return Err(match self.peek() {
                None => SelectorError::Empty,
                Some(_) => self.unexpected(),
            });
        }
        Ok(CompoundSelector { components })
    }

    fn ident(&mut self) -> Result<String, SelectorError> {
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                self.pos += 1;
                ident.push(self.bump().ok_or(SelectorError::UnexpectedEnd)?);
            } else if is_ident_char(c) {
                self.pos += 1;
                ident.push(c);
            } else {
                break;
            }
        }
        if ident.is_empty() {
            return Err(self.unexpected());
        }
        Ok(ident)
    }

    fn attribute(&mut self) -> Result<AttributeSelector, SelectorError> {
        self.skip_whitespace();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_whitespace();

        if self.peek() == Some(']') {
            self.pos += 1;
            return Ok(AttributeSelector { name, matcher: None, case_insensitive: false });
        }

        let op = match self.bump() {
            Some('=') => None,
            Some(c @ ('~' | '|' | '^' | '$' | '*')) => {
                self.expect('=')?;
                Some(c)
            }
            None => return Err(SelectorError::UnexpectedEnd),
            Some(_) => {
                self.pos -= 1;
                return Err(self.unexpected());
            }
        };
        self.skip_whitespace();
        let value = match self.peek() {
            Some(q @ ('"' | '\'')) => {
                self.pos += 1;
                self.quoted(q)?
            }
            _ => self.ident()?,
        };
        self.skip_whitespace();

        let mut case_insensitive = false;
        if let Some('i' | 'I') = self.peek() {
            self.pos += 1;
            case_insensitive = true;
            self.skip_whitespace();
        }
        self.expect(']')?;

        let matcher = match op {
            None => AttributeMatcher::Exact(value),
            Some('~') => AttributeMatcher::Contains(value),
            Some('|') => AttributeMatcher::DashMatch(value),
            Some('^') => AttributeMatcher::Prefix(value),
            Some('$') => AttributeMatcher::Suffix(value),
            _ => AttributeMatcher::Substring(value),
        };
        Ok(AttributeSelector { name, matcher: Some(matcher), case_insensitive })
    }

    fn quoted(&mut self, quote: char) -> Result<String, SelectorError> {
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(SelectorError::UnexpectedEnd),
                Some('\\') => value.push(self.bump().ok_or(SelectorError::UnexpectedEnd)?),
                Some(c) if c == quote => return Ok(value),
                Some(c) => value.push(c),
            }
        }
    }

    fn pseudo_class(&mut self) -> Result<PseudoClass, SelectorError> {
        if self.peek() == Some(':') {
            return Err(SelectorError::UnsupportedPseudo(format!(":{}", self.rest())));
        }
        let name = self.ident()?.to_ascii_lowercase();

        if self.peek() != Some('(') {
            return match name.as_str() {
                "link" | "any-link" => Ok(PseudoClass::Link),
                "checked" => Ok(PseudoClass::Checked),
                "disabled" => Ok(PseudoClass::Disabled),
                "enabled" => Ok(PseudoClass::Enabled),
                "root" => Ok(PseudoClass::Root),
                "empty" => Ok(PseudoClass::Empty),
                "first-child" => Ok(PseudoClass::FirstChild),
                "last-child" => Ok(PseudoClass::LastChild),
                "only-child" => Ok(PseudoClass::OnlyChild),
                _ => Err(SelectorError::UnsupportedPseudo(name)),
            };
        }
        self.pos += 1;

        let pseudo = match name.as_str() {
            "not" | "is" | "where" => {
                let inner = self.list(Some(')'))?;
                let list = Box::new(SelectorList::new(inner, ""));
                if name == "not" { PseudoClass::Not(list) } else { PseudoClass::Is(list) }
            }
            "nth-child" | "nth-last-child" => {
                let arg = self.until(')');
                let expr = NthExpression::parse(&arg).ok_or(SelectorError::InvalidNth(arg))?;
                if name == "nth-child" { PseudoClass::NthChild(expr) } else { PseudoClass::NthLastChild(expr) }
            }
            _ => return Err(SelectorError::UnsupportedPseudo(name)),
        };
        self.expect(')')?;
        Ok(pseudo)
    }

    fn until(&mut self, end: char) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek() {
            if c == end {
                break;
            }
            out.push(c);
            self.pos += 1;
        }
        out
    }

    fn rest(&self) -> &str {
        &self.input[self.offset()..]
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}
