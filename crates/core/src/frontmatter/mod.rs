//! Frontmatter parsing.
//!
//! Splits a leading `---` delimited YAML block from a markdown document and
//! flattens its mapping into string lists for indexing.

pub mod parser;
pub mod types;

pub use parser::{FrontmatterParseError, parse};
pub use types::{Frontmatter, ParsedDocument, flatten_value};
