//! Marker-file discovery
//!
//! A depth-first walk over each workspace folder, classifying directories by
//! the marker files they contain. Unreadable directories are skipped.

use std::path::Path;

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::registry::{Project, ProjectKind, ProjectRegistry};

/// A marker filename and the project kind it signals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerKind {
    pub filename: &'static str,
    pub kind: ProjectKind,
}

/// The marker files recognized during discovery (exact, case-sensitive)
pub const MARKERS: [MarkerKind; 3] = [
    MarkerKind {
        filename: "alan",
        kind: ProjectKind::LanguageRoot,
    },
    MarkerKind {
        filename: "project.json",
        kind: ProjectKind::BuildRoot,
    },
    MarkerKind {
        filename: "versions.json",
        kind: ProjectKind::FetchRoot,
    },
];

/// Discover projects under a single workspace folder into `registry`
pub fn discover_folder(registry: &mut ProjectRegistry, folder: &Path) {
    for entry in WalkDir::new(folder)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
    {
        let dir = entry.path();
        for marker in MARKERS {
            if dir.join(marker.filename).is_file() {
                debug!(
                    root = %dir.display(),
                    marker = marker.filename,
                    "Discovered project root"
                );
                registry.insert(Project::new(dir, folder, marker.kind));
            }
        }
    }
}

/// Discover projects under every workspace folder
pub fn discover(folders: &[impl AsRef<Path>]) -> ProjectRegistry {
    let mut registry = ProjectRegistry::new();
    for folder in folders {
        discover_folder(&mut registry, folder.as_ref());
    }
    info!(projects = registry.len(), "Workspace discovery finished");
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_classifies_by_marker() {
        let dir = tempfile::tempdir().unwrap();
        let lang = dir.path().join("app");
        let dev = dir.path().join("tooling");
        let fetch = dir.path().join("deps");
        for d in [&lang, &dev, &fetch] {
            fs::create_dir_all(d).unwrap();
        }
        fs::write(lang.join("alan"), "").unwrap();
        fs::write(dev.join("project.json"), "{}").unwrap();
        fs::write(fetch.join("versions.json"), "{}").unwrap();

        let registry = discover(&[dir.path()]);
        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry
                .of_kind(ProjectKind::LanguageRoot)
                .next()
                .unwrap()
                .root,
            lang
        );
        assert_eq!(
            registry.of_kind(ProjectKind::BuildRoot).next().unwrap().root,
            dev
        );
        assert_eq!(
            registry.of_kind(ProjectKind::FetchRoot).next().unwrap().root,
            fetch
        );
    }

    #[test]
    fn test_nested_roots_all_found() {
        let dir = tempfile::tempdir().unwrap();
        let outer = dir.path().join("outer");
        let inner = outer.join("libs").join("inner");
        fs::create_dir_all(&inner).unwrap();
        fs::write(outer.join("alan"), "").unwrap();
        fs::write(inner.join("alan"), "").unwrap();

        let registry = discover(&[dir.path()]);
        let roots: Vec<_> = registry
            .of_kind(ProjectKind::LanguageRoot)
            .map(|p| p.root.clone())
            .collect();
        assert_eq!(roots, vec![outer, inner]);
    }

    #[test]
    fn test_mixed_mode_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("alan"), "").unwrap();
        fs::write(dir.path().join("versions.json"), "{}").unwrap();

        let registry = discover(&[dir.path()]);
        assert_eq!(registry.of_kind(ProjectKind::LanguageRoot).count(), 1);
        assert_eq!(registry.of_kind(ProjectKind::FetchRoot).count(), 1);
    }

    #[test]
    fn test_marker_directory_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("alan")).unwrap();
        let registry = discover(&[dir.path()]);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_rediscovery_updates_in_place() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("alan"), "").unwrap();
        let mut registry = discover(&[dir.path()]);
        discover_folder(&mut registry, dir.path());
        assert_eq!(registry.of_kind(ProjectKind::LanguageRoot).count(), 1);
    }

    #[test]
    fn test_missing_folder_yields_nothing() {
        let registry = discover(&[Path::new("/nonexistent/workspace")]);
        assert!(registry.is_empty());
    }
}
