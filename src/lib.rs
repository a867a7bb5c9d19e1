//! BBCode to HTML rendering by repeated tag substitution.
//!
//! Text is rewritten one tag span at a time until a full pass over every registered tag name
//! changes nothing. Built-in tags cover the usual forum markup; hosts add their own with
//! [`Parser::extend`] or [`Parser::extend_with`].
//!
//! ```
//! use bbrender::{Parser, RenderContext};
//!
//! let parser = Parser::new(RenderContext::new().with_url("thread_url", "http://x/thread/{id}"));
//! assert_eq!(parser.parse("[b]x[/b]").unwrap(), "<strong>x</strong>");
//! ```

pub mod context;
mod error;
pub mod html;
mod parser;

pub use context::RenderContext;
pub use error::{Error, Result};
pub use html::registry::{Handler, NamedTag, TagFlags, TagHandler, TagRegistry};
pub use html::{render, Parser, ParserConfig, ParserFeature};
pub use parser::attributes::AttributeMap;
pub use parser::{closed_tag_names, find_tag, find_tag_from, TagSpan};
