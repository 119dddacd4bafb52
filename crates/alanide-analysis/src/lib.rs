//! Fallback language intelligence for Alan documents
//!
//! When no language server is available for a project, these heuristics take
//! over: an indentation-based outline parser, a fuzzy workspace-wide
//! definition search keyed on the language's quoted-identifier convention,
//! and a completion source drawn from the live outline.
//!
//! None of this is a real parser. Malformed input degrades output quality;
//! it never produces an error.

pub mod completion;
pub mod providers;
pub mod search;
pub mod symbols;

pub use completion::completions;
pub use providers::{
    FallbackCompletionProvider, FallbackDefinitionProvider, FallbackSymbolProvider,
};
pub use search::{
    dedup, fuzzy_definition_search, show_definitions, word_range_at, MAX_IDENTIFIER_LEN,
    SEARCH_TIMEOUT,
};
pub use symbols::parse;
