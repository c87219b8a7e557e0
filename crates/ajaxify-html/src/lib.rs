//! Ajaxify HTML Parser
//!
//! Turns server-rendered markup into an [`ajaxify_dom::Document`].

mod parser;

pub use parser::HtmlParser;

use ajaxify_dom::Document;

/// Parse an HTML string into a document at `about:blank`
pub fn parse(html: &str) -> Document {
    HtmlParser::new().parse(html)
}
