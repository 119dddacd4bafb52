//! Indentation-based outline parser
//!
//! Alan blocks nest by significant whitespace, so a line's indentation run
//! is enough to rebuild the outline without a grammar. Each matching line
//! opens a symbol; a line at the same or shallower indentation closes every
//! symbol opened deeper. The parser is single-pass and never fails.

use lazy_static::lazy_static;
use regex::Regex;

use alanide_core::{DocumentSymbol, Position, Range, SymbolKind};

lazy_static! {
    // indentation run, then a quoted literal or a lowercase identifier run,
    // then whatever trails it
    static ref RE_LINE: Regex =
        Regex::new(r"^(\s*)((?:'[^']*')|(?:[a-z]+[a-z\-\_\s]+))(.*)").unwrap();
    static ref RE_DETAIL: Regex = Regex::new(
        r"^\s*(?::|->|:=)?\s+(command|with|collection|stategroup|group|text|integer|natural|file|reference-set|number|reference|matrix|densematrix|sparsematrix)"
    )
    .unwrap();
}

/// Map a recognized type keyword to a symbol kind
///
/// Keywords the outline has no dedicated kind for keep the quoted default.
fn kind_for_keyword(keyword: &str) -> SymbolKind {
    match keyword {
        "command" => SymbolKind::Method,
        "collection" => SymbolKind::Array,
        "stategroup" => SymbolKind::Enum,
        "group" => SymbolKind::Namespace,
        "text" => SymbolKind::String,
        "integer" | "natural" => SymbolKind::Number,
        "file" => SymbolKind::File,
        "reference-set" => SymbolKind::TypeParameter,
        "with" => SymbolKind::Event,
        _ => SymbolKind::Module,
    }
}

struct OpenSymbol {
    symbol: DocumentSymbol,
    level: i64,
}

fn close(stack: &mut Vec<OpenSymbol>, end: Position) {
    let mut closed = stack.pop().expect("synthetic root never pops");
    closed.symbol.range.end = end;
    stack
        .last_mut()
        .expect("synthetic root never pops")
        .symbol
        .children
        .push(closed.symbol);
}

/// Parse a document into its outline forest
pub fn parse(text: &str) -> Vec<DocumentSymbol> {
    let mut stack = vec![OpenSymbol {
        symbol: DocumentSymbol {
            name: String::new(),
            detail: String::new(),
            kind: SymbolKind::Struct,
            range: Range::zero(),
            selection_range: Range::zero(),
            children: Vec::new(),
        },
        level: -1,
    }];

    let mut last_line = 0u32;
    let mut last_line_len = 0u32;

    for (line_idx, line) in text.split('\n').enumerate() {
        let line_idx = line_idx as u32;
        last_line = line_idx;
        last_line_len = line.chars().count() as u32;

        let Some(caps) = RE_LINE.captures(line) else {
            continue;
        };
        let token = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        if token.is_empty() {
            continue;
        }
        let level = caps[1].chars().count() as i64;

        // close every open symbol whose block ends here
        while stack.last().map(|top| top.level).unwrap_or(-1) >= level {
            close(&mut stack, Position::new(line_idx, 0));
        }

        let trailing = caps.get(3).map(|m| m.as_str()).unwrap_or("");
        let (name, detail, kind) = if token.chars().count() > 2 && token.starts_with('\'') {
            let name = token[1..token.len() - 1].to_string();
            if trailing.is_empty() {
                (name, String::new(), SymbolKind::Module)
            } else if let Some(detail_caps) = RE_DETAIL.captures(trailing) {
                let keyword = detail_caps[1].to_string();
                let kind = kind_for_keyword(&keyword);
                (name, keyword, kind)
            } else {
                (name, String::new(), SymbolKind::EnumMember)
            }
        } else {
            (token.trim().to_string(), String::new(), SymbolKind::Struct)
        };

        let offset = level as u32;
        let name_len = name.chars().count() as u32;
        let symbol = DocumentSymbol {
            name,
            detail,
            kind,
            range: Range::new(line_idx, 0, line_idx, last_line_len),
            selection_range: Range::new(line_idx, offset, line_idx, offset + name_len),
            children: Vec::new(),
        };
        stack.push(OpenSymbol { symbol, level });
    }

    // anything still open ends at the last line
    while stack.len() > 1 {
        close(&mut stack, Position::new(last_line, last_line_len));
    }

    stack
        .pop()
        .map(|root| root.symbol.children)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indentation_monotonicity() {
        // levels [0, 2, 4, 2, 0] must produce root -> [A[B[C]], D]
        let text = "'A'\n  'B'\n    'C'\n  'D'\n'E'";
        let symbols = parse(text);
        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols[0].name, "A");
        assert_eq!(symbols[0].children.len(), 2);
        assert_eq!(symbols[0].children[0].name, "B");
        assert_eq!(symbols[0].children[0].children[0].name, "C");
        assert_eq!(symbols[0].children[1].name, "D");
        assert_eq!(symbols[1].name, "E");
    }

    #[test]
    fn test_ranges_cover_nested_block() {
        let text = "'A'\n  'B'\n'C'";
        let symbols = parse(text);
        // A spans from its own line to the start of C's line
        assert_eq!(symbols[0].range.start.line, 0);
        assert_eq!(symbols[0].range.end, Position::new(2, 0));
        // C stays open until end of document
        assert_eq!(symbols[1].range.end, Position::new(2, 3));
    }

    #[test]
    fn test_end_line_never_before_start_line() {
        let text = "'A'\n  'B': text\n    'C'\nusers\n\t'D'\n";
        for symbol in flatten(parse(text)) {
            assert!(symbol.range.end.line >= symbol.range.start.line);
        }
    }

    fn flatten(symbols: Vec<DocumentSymbol>) -> Vec<DocumentSymbol> {
        let mut out = Vec::new();
        for mut s in symbols {
            let children = std::mem::take(&mut s.children);
            out.push(s);
            out.extend(flatten(children));
        }
        out
    }

    #[test]
    fn test_keyword_classification() {
        let text = "'a': collection\n'b': stategroup\n'c': text\n'd': integer\n'e': natural\n'f': command\n'g' with\n'h': file\n'i': reference-set\n'j': group";
        let kinds: Vec<SymbolKind> = parse(text).into_iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SymbolKind::Array,
                SymbolKind::Enum,
                SymbolKind::String,
                SymbolKind::Number,
                SymbolKind::Number,
                SymbolKind::Method,
                SymbolKind::Event,
                SymbolKind::File,
                SymbolKind::TypeParameter,
                SymbolKind::Namespace,
            ]
        );
    }

    #[test]
    fn test_detail_records_keyword() {
        let symbols = parse("'orders': collection ['id']");
        assert_eq!(symbols[0].detail, "collection");
        assert_eq!(symbols[0].kind, SymbolKind::Array);
    }

    #[test]
    fn test_quoted_without_keyword_trailing_text() {
        let symbols = parse("'state': something-unrecognized");
        assert_eq!(symbols[0].kind, SymbolKind::EnumMember);
        assert_eq!(symbols[0].detail, "");
    }

    #[test]
    fn test_bare_quoted_token_is_module() {
        let symbols = parse("'root'");
        assert_eq!(symbols[0].kind, SymbolKind::Module);
        assert_eq!(symbols[0].name, "root");
    }

    #[test]
    fn test_unquoted_identifier_is_struct() {
        let symbols = parse("users and groups");
        assert_eq!(symbols[0].kind, SymbolKind::Struct);
        assert_eq!(symbols[0].name, "users and groups");
    }

    #[test]
    fn test_selection_range_covers_token() {
        let symbols = parse("  'abc': text");
        assert_eq!(symbols[0].selection_range, Range::new(0, 2, 0, 5));
    }

    #[test]
    fn test_unmatched_lines_do_not_nest() {
        let text = "'A'\n  = 17\n  'B'";
        let symbols = parse(text);
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].children.len(), 1);
        assert_eq!(symbols[0].children[0].name, "B");
    }

    #[test]
    fn test_empty_and_garbage_input() {
        assert!(parse("").is_empty());
        assert!(parse("   \n\t\n!!!").is_empty());
    }

    #[test]
    fn test_mixed_tabs_and_spaces_degrade_gracefully() {
        // tab counts as one level; the outline may flatten but must not fail
        let text = "'A'\n\t'B'\n  'C'\n";
        let symbols = parse(text);
        assert!(!symbols.is_empty());
    }
}
