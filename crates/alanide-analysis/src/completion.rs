//! Quote-aware completion from the live outline
//!
//! Proposals are the symbols of the current document. Quoted entities insert
//! their quotes unless the cursor already sits inside a quoted token.

use alanide_core::{CompletionItem, Document, DocumentSymbol, Position, SymbolKind};

fn collect(symbols: &[DocumentSymbol], items: &mut Vec<CompletionItem>, in_quote: bool) {
    for symbol in symbols {
        let quoted = symbol.kind != SymbolKind::Struct;
        let insert_text = if quoted && !in_quote {
            format!("'{}'", symbol.name)
        } else {
            symbol.name.clone()
        };
        items.push(CompletionItem {
            label: symbol.name.clone(),
            detail: symbol.detail.clone(),
            kind: symbol.kind,
            insert_text,
        });
        collect(&symbol.children, items, in_quote);
    }
}

/// Whether the position sits inside a quoted token on its line
fn inside_quote(document: &Document, pos: Position) -> bool {
    let Some(line) = document.line(pos.line) else {
        return false;
    };
    let prefix: String = line.chars().take(pos.character as usize).collect();
    prefix.matches('\'').count() % 2 == 1
}

/// Completion proposals for a position, drawn from the document outline
///
/// Never fails; an unparsable document yields no proposals.
pub fn completions(document: &Document, pos: Position) -> Vec<CompletionItem> {
    let symbols = crate::symbols::parse(&document.text);
    let in_quote = inside_quote(document, pos);

    let mut items = Vec::new();
    collect(&symbols, &mut items, in_quote);

    // one proposal per label, first occurrence wins
    let mut seen = std::collections::HashSet::new();
    items.retain(|item| seen.insert(item.label.clone()));
    items
}
