//! Fuzzy workspace-wide definition search
//!
//! Alan identifiers are single-quoted, and a definition site is a line where
//! the identifier directly follows a tab. Two searches run concurrently: the
//! host's workspace symbol index, and a raw text scan over every file in the
//! workspace sharing the document's extension. Results are unioned and
//! deduplicated.

use std::path::Path;
use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use walkdir::WalkDir;

use alanide_core::{Document, Location, Position, Range, UserInterface, WorkspaceSymbolSource};

lazy_static! {
    static ref RE_WORD: Regex = Regex::new(r"'[^']+'").unwrap();
}

/// Identifiers longer than this (quotes included) are never searched for
pub const MAX_IDENTIFIER_LEN: usize = 300;

/// Hard wall-clock bound on one definition search
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(60);

/// The quoted token covering a position, with its range on that line
///
/// Returns `None` when the cursor is not inside a quoted identifier.
pub fn word_range_at(document: &Document, pos: Position) -> Option<(Range, String)> {
    let line = document.line(pos.line)?;
    for m in RE_WORD.find_iter(line) {
        let start = line[..m.start()].chars().count() as u32;
        let end = start + m.as_str().chars().count() as u32;
        if start <= pos.character && pos.character <= end {
            return Some((
                Range::new(pos.line, start, pos.line, end),
                m.as_str().to_string(),
            ));
        }
    }
    None
}

async fn delegating_search(
    document: &Document,
    word: &str,
    symbols: &dyn WorkspaceSymbolSource,
) -> Vec<Location> {
    let extension = document.extension();
    symbols
        .query(word)
        .await
        .into_iter()
        .filter(|loc| {
            Path::new(&loc.path)
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default()
                == extension
        })
        .collect()
}

/// Scan every workspace file with the given extension for tab-prefixed
/// occurrences of `word`
///
/// Per-file IO errors are skipped silently; unreadable files simply do not
/// contribute candidates.
fn scan_workspace(
    workspace_root: &Path,
    extension: &str,
    word: &str,
    origin_path: &Path,
    origin_pos: Position,
) -> Vec<Location> {
    let pattern = format!("\t{word}");
    let word_len = word.chars().count() as u32;
    let mut result = Vec::new();

    for entry in WalkDir::new(workspace_root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let path = entry.path();
        if path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default()
            != extension
        {
            continue;
        }
        let Ok(text) = std::fs::read_to_string(path) else {
            continue;
        };
        for (line_idx, line) in text.split('\n').enumerate() {
            let Some(byte_idx) = line.find(&pattern) else {
                continue;
            };
            let character = line[..byte_idx].chars().count() as u32;
            let range = Range::new(
                line_idx as u32,
                character + 1,
                line_idx as u32,
                character + word_len + 1,
            );
            // the occurrence under the cursor is not its own definition
            if path == origin_path && range.contains(origin_pos) {
                continue;
            }
            result.push(Location::new(path, range));
        }
    }

    result
}

/// Sort candidates and collapse overlapping ranges within the same file
///
/// Idempotent: running it twice over an already-deduplicated list yields the
/// same list.
pub fn dedup(locations: &mut Vec<Location>) {
    locations.sort_by(|a, b| {
        a.path
            .cmp(&b.path)
            .then(a.range.start.cmp(&b.range.start))
    });
    let mut i = 1;
    while i < locations.len() {
        let (before, after) = locations.split_at(i);
        let last = &before[before.len() - 1];
        let current = &after[0];
        if current.path == last.path && current.range.intersects(&last.range) {
            locations.remove(i);
        } else {
            i += 1;
        }
    }
}

/// Run both searches for the quoted identifier under the cursor
///
/// Returns an empty list when the cursor is not on a quoted token, the token
/// exceeds [`MAX_IDENTIFIER_LEN`], or the search is cancelled.
pub async fn fuzzy_definition_search(
    document: &Document,
    pos: Position,
    workspace_root: &Path,
    symbols: &dyn WorkspaceSymbolSource,
    cancel: &CancellationToken,
) -> Vec<Location> {
    let Some((_, word)) = word_range_at(document, pos) else {
        return Vec::new();
    };
    if word.chars().count() > MAX_IDENTIFIER_LEN {
        debug!(len = word.chars().count(), "Identifier too long, skipping search");
        return Vec::new();
    }
    if cancel.is_cancelled() {
        return Vec::new();
    }

    let scan_root = workspace_root.to_path_buf();
    let scan_ext = document.extension();
    let scan_word = word.clone();
    let scan_origin = document.path.clone();
    let scan_task = tokio::task::spawn_blocking(move || {
        scan_workspace(&scan_root, &scan_ext, &scan_word, &scan_origin, pos)
    });

    let (delegated, scanned) = tokio::join!(delegating_search(document, &word, symbols), scan_task);

    let mut all = delegated;
    match scanned {
        Ok(locations) => all.extend(locations),
        Err(e) => warn!(error = %e, "Workspace scan task failed"),
    }
    if cancel.is_cancelled() {
        return Vec::new();
    }
    dedup(&mut all);
    debug!(word = %word, candidates = all.len(), "Definition search finished");
    all
}

/// Resolve and present definitions for the cursor position
///
/// Applies the wall-clock timeout, reports "unable to find" quietly, opens a
/// single result directly and asks the user to disambiguate several.
pub async fn show_definitions(
    document: &Document,
    pos: Position,
    workspace_root: &Path,
    symbols: &dyn WorkspaceSymbolSource,
    ui: &dyn UserInterface,
) -> Option<Location> {
    let cancel = CancellationToken::new();
    let locations = match tokio::time::timeout(
        SEARCH_TIMEOUT,
        fuzzy_definition_search(document, pos, workspace_root, symbols, &cancel),
    )
    .await
    {
        Ok(locations) => locations,
        Err(_) => {
            cancel.cancel();
            Vec::new()
        }
    };

    if locations.is_empty() {
        let message = match word_range_at(document, pos) {
            Some((_, word)) => format!("unable to find {word}"),
            None => "unable to find".to_string(),
        };
        ui.status_message(&message);
        return None;
    }
    if locations.len() == 1 {
        return locations.into_iter().next();
    }

    let labels: Vec<String> = locations
        .iter()
        .map(|l| {
            let relative = l
                .path
                .strip_prefix(workspace_root)
                .unwrap_or(&l.path)
                .to_string_lossy()
                .into_owned();
            format!("{}:{}", relative, l.range.start.line + 1)
        })
        .collect();
    let picked = ui.pick(&labels, "definition").await?;
    locations.into_iter().nth(picked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Mutex;

    struct EmptySymbols;

    #[async_trait]
    impl WorkspaceSymbolSource for EmptySymbols {
        async fn query(&self, _name: &str) -> Vec<Location> {
            Vec::new()
        }
    }

    struct FixedSymbols(Vec<Location>);

    #[async_trait]
    impl WorkspaceSymbolSource for FixedSymbols {
        async fn query(&self, _name: &str) -> Vec<Location> {
            self.0.clone()
        }
    }

    #[test]
    fn test_word_range_at_inside_token() {
        let doc = Document::new("/w/a.alan", "x = 'foo' + 'bar'");
        let (range, word) = word_range_at(&doc, Position::new(0, 6)).unwrap();
        assert_eq!(word, "'foo'");
        assert_eq!(range, Range::new(0, 4, 0, 9));
    }

    #[test]
    fn test_word_range_at_outside_token() {
        let doc = Document::new("/w/a.alan", "x = 'foo' + 'bar'");
        assert!(word_range_at(&doc, Position::new(0, 10)).is_none());
    }

    #[test]
    fn test_dedup_collapses_overlaps() {
        let mut locations = vec![
            Location::new("/w/b.alan", Range::new(1, 1, 1, 5)),
            Location::new("/w/a.alan", Range::new(0, 1, 0, 5)),
            Location::new("/w/b.alan", Range::new(1, 3, 1, 8)),
            Location::new("/w/b.alan", Range::new(4, 0, 4, 4)),
        ];
        dedup(&mut locations);
        assert_eq!(locations.len(), 3);
        assert_eq!(locations[0].path, PathBuf::from("/w/a.alan"));
        assert_eq!(locations[1].range, Range::new(1, 1, 1, 5));
        assert_eq!(locations[2].range, Range::new(4, 0, 4, 4));
    }

    #[test]
    fn test_dedup_idempotent() {
        let mut locations = vec![
            Location::new("/w/a.alan", Range::new(0, 1, 0, 5)),
            Location::new("/w/b.alan", Range::new(1, 1, 1, 5)),
            Location::new("/w/b.alan", Range::new(1, 3, 1, 8)),
        ];
        dedup(&mut locations);
        let once = locations.clone();
        dedup(&mut locations);
        assert_eq!(locations, once);
    }

    #[tokio::test]
    async fn test_definition_found_in_other_file() {
        let dir = tempfile::tempdir().unwrap();
        let file_a = dir.path().join("a.alan");
        let file_b = dir.path().join("b.alan");
        fs::write(&file_a, "uses 'foo' here").unwrap();
        fs::write(&file_b, "block\n\t'foo': collection").unwrap();

        let doc = Document::new(&file_a, "uses 'foo' here");
        let cancel = CancellationToken::new();
        let locations =
            fuzzy_definition_search(&doc, Position::new(0, 7), dir.path(), &EmptySymbols, &cancel)
                .await;

        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].path, file_b);
        assert_eq!(locations[0].range, Range::new(1, 1, 1, 6));
    }

    #[tokio::test]
    async fn test_own_occurrence_excluded() {
        let dir = tempfile::tempdir().unwrap();
        let file_a = dir.path().join("a.alan");
        let text = "block\n\t'foo': collection";
        fs::write(&file_a, text).unwrap();

        // cursor on the only (tab-prefixed) occurrence itself
        let doc = Document::new(&file_a, text);
        let cancel = CancellationToken::new();
        let locations =
            fuzzy_definition_search(&doc, Position::new(1, 3), dir.path(), &EmptySymbols, &cancel)
                .await;
        assert!(locations.is_empty());
    }

    #[tokio::test]
    async fn test_identifier_too_long_rejected_without_scan() {
        // a directory that does not exist: reaching the scan would error,
        // rejection must come first
        let word = format!("'{}'", "x".repeat(299)); // 301 chars with quotes
        let text = format!("a {word} b");
        let doc = Document::new("/nonexistent/a.alan", text);
        let cancel = CancellationToken::new();
        let locations = fuzzy_definition_search(
            &doc,
            Position::new(0, 3),
            Path::new("/nonexistent"),
            &EmptySymbols,
            &cancel,
        )
        .await;
        assert!(locations.is_empty());
    }

    #[tokio::test]
    async fn test_max_length_boundary_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let word = format!("'{}'", "x".repeat(298)); // exactly 300 with quotes
        let file = dir.path().join("a.alan");
        fs::write(&file, format!("use {word}\n\t{word}\n")).unwrap();
        let doc = Document::new(&file, format!("use {word}\n\t{word}\n"));
        let cancel = CancellationToken::new();
        let locations =
            fuzzy_definition_search(&doc, Position::new(0, 6), dir.path(), &EmptySymbols, &cancel)
                .await;
        assert_eq!(locations.len(), 1);
    }

    #[tokio::test]
    async fn test_delegated_results_filtered_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let file_a = dir.path().join("a.alan");
        fs::write(&file_a, "uses 'foo'").unwrap();
        let doc = Document::new(&file_a, "uses 'foo'");

        let symbols = FixedSymbols(vec![
            Location::new(dir.path().join("match.alan"), Range::new(3, 0, 3, 5)),
            Location::new(dir.path().join("other.link"), Range::new(9, 0, 9, 5)),
        ]);
        let cancel = CancellationToken::new();
        let locations =
            fuzzy_definition_search(&doc, Position::new(0, 7), dir.path(), &symbols, &cancel)
                .await;
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].path, dir.path().join("match.alan"));
    }

    #[tokio::test]
    async fn test_cursor_not_on_identifier() {
        let doc = Document::new("/w/a.alan", "no identifiers here");
        let cancel = CancellationToken::new();
        let locations = fuzzy_definition_search(
            &doc,
            Position::new(0, 3),
            Path::new("/w"),
            &EmptySymbols,
            &cancel,
        )
        .await;
        assert!(locations.is_empty());
    }

    struct RecordingUi {
        messages: Mutex<Vec<String>>,
        pick_answer: Option<usize>,
    }

    #[async_trait]
    impl UserInterface for RecordingUi {
        async fn pick(&self, _items: &[String], _placeholder: &str) -> Option<usize> {
            self.pick_answer
        }
        async fn input(&self, _prompt: &str, _default: &str) -> Option<String> {
            None
        }
        fn status_message(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
        fn error_message(&self, _message: &str) {}
    }

    #[tokio::test]
    async fn test_show_definitions_reports_no_match_quietly() {
        let dir = tempfile::tempdir().unwrap();
        let file_a = dir.path().join("a.alan");
        fs::write(&file_a, "uses 'ghost'").unwrap();
        let doc = Document::new(&file_a, "uses 'ghost'");
        let ui = RecordingUi {
            messages: Mutex::new(Vec::new()),
            pick_answer: None,
        };

        let result =
            show_definitions(&doc, Position::new(0, 7), dir.path(), &EmptySymbols, &ui).await;
        assert!(result.is_none());
        let messages = ui.messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("unable to find"));
    }

    #[tokio::test]
    async fn test_show_definitions_disambiguates() {
        let dir = tempfile::tempdir().unwrap();
        let file_a = dir.path().join("a.alan");
        let file_b = dir.path().join("b.alan");
        let file_c = dir.path().join("c.alan");
        fs::write(&file_a, "uses 'dup'").unwrap();
        fs::write(&file_b, "\t'dup'").unwrap();
        fs::write(&file_c, "\t'dup'").unwrap();
        let doc = Document::new(&file_a, "uses 'dup'");
        let ui = RecordingUi {
            messages: Mutex::new(Vec::new()),
            pick_answer: Some(1),
        };

        let result = show_definitions(&doc, Position::new(0, 7), dir.path(), &EmptySymbols, &ui)
            .await
            .unwrap();
        assert_eq!(result.path, file_c);
    }
}
