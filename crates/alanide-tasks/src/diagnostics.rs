//! Tool output parsing
//!
//! The Alan compiler family prints diagnostics as plain lines in a small
//! fixed grammar. Four alternatives are tried per line, most specific first;
//! tab-prefixed lines directly after a recognized diagnostic extend its
//! message.
//!
//! Line/column values in tool output are 1-based; stored ranges are 0-based.

use std::path::PathBuf;

use lazy_static::lazy_static;
use regex::Regex;

use alanide_core::{Diagnostic, FileDiagnostics, Range, Severity};

lazy_static! {
    static ref RE_RANGE: Regex = Regex::new(
        r"^((?:/|[a-zA-Z]:).*\.alan) from ([0-9]+):([0-9]+) to ([0-9]+):([0-9]+) (error|warning): (.*)"
    )
    .unwrap();
    static ref RE_POINT: Regex = Regex::new(
        r"^((?:/|[a-zA-Z]:).*\.alan) at ([0-9]+):([0-9]+) (error|warning): (.*)"
    )
    .unwrap();
    static ref RE_LINK: Regex =
        Regex::new(r"^((?:/|[a-zA-Z]:).*\.link) (error|warning): (.*)").unwrap();
    static ref RE_OTHER: Regex =
        Regex::new(r"^((?:/|[a-zA-Z]:).*\.alan) (error|warning): (.*)").unwrap();
}

fn one_based(field: &str) -> u32 {
    field.parse::<u32>().unwrap_or(1).saturating_sub(1)
}

fn parse_line(line: &str) -> Option<(PathBuf, Diagnostic)> {
    if let Some(caps) = RE_RANGE.captures(line) {
        let range = Range::new(
            one_based(&caps[2]),
            one_based(&caps[3]),
            one_based(&caps[4]),
            one_based(&caps[5]),
        );
        return Some((
            PathBuf::from(&caps[1]),
            Diagnostic {
                range,
                severity: Severity::from_marker(&caps[6]),
                message: caps[7].to_string(),
            },
        ));
    }

    if let Some(caps) = RE_POINT.captures(line) {
        let line_idx = one_based(&caps[2]);
        let col_idx = one_based(&caps[3]);
        let range = Range::new(line_idx, col_idx, line_idx, col_idx);
        return Some((
            PathBuf::from(&caps[1]),
            Diagnostic {
                range,
                severity: Severity::from_marker(&caps[4]),
                message: caps[5].to_string(),
            },
        ));
    }

    for re in [&*RE_LINK, &*RE_OTHER] {
        if let Some(caps) = re.captures(line) {
            return Some((
                PathBuf::from(&caps[1]),
                Diagnostic {
                    range: Range::zero(),
                    severity: Severity::from_marker(&caps[2]),
                    message: caps[3].to_string(),
                },
            ));
        }
    }

    None
}

/// Parse accumulated command output into per-file diagnostics
///
/// Diagnostics are grouped by file in first-seen order. A tab-prefixed line
/// with no open diagnostic is dropped.
pub fn parse_output(output: &str) -> Vec<FileDiagnostics> {
    let mut files: Vec<FileDiagnostics> = Vec::new();
    // index of the diagnostic that continuation lines attach to
    let mut open: Option<(usize, usize)> = None;

    for line in output.split('\n') {
        if let Some((path, diagnostic)) = parse_line(line) {
            let file_idx = match files.iter().position(|f| f.path == path) {
                Some(idx) => idx,
                None => {
                    files.push(FileDiagnostics {
                        path,
                        diagnostics: Vec::new(),
                    });
                    files.len() - 1
                }
            };
            files[file_idx].diagnostics.push(diagnostic);
            open = Some((file_idx, files[file_idx].diagnostics.len() - 1));
        } else if line.starts_with('\t') {
            if let Some((file_idx, diag_idx)) = open {
                let message = &mut files[file_idx].diagnostics[diag_idx].message;
                message.push('\n');
                message.push_str(line);
            }
        } else {
            open = None;
        }
    }

    files
}
