//! Project descriptors and the registry keyed by root directory

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use alanide_core::Subscription;

/// The kind of project a marker file signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectKind {
    /// An `alan` script marks a full language project
    LanguageRoot,
    /// A `project.json` marks a development build root
    BuildRoot,
    /// A `versions.json` marks a dependency-manifest (fetch) root
    FetchRoot,
}

/// One discovered project
///
/// `subscriptions` holds whatever disposable resources are currently
/// registered on this project's behalf; replacing its language support
/// disposes and rebuilds them.
#[derive(Debug)]
pub struct Project {
    pub root: PathBuf,
    pub workspace_folder: PathBuf,
    pub kind: ProjectKind,
    pub subscriptions: Vec<Subscription>,
}

impl Project {
    /// Create a project with no active subscriptions
    pub fn new(
        root: impl Into<PathBuf>,
        workspace_folder: impl Into<PathBuf>,
        kind: ProjectKind,
    ) -> Self {
        Self {
            root: root.into(),
            workspace_folder: workspace_folder.into(),
            kind,
            subscriptions: Vec::new(),
        }
    }

    /// Dispose every subscription held for this project
    pub fn dispose_subscriptions(&mut self) {
        let count = self.subscriptions.len();
        for subscription in self.subscriptions.drain(..) {
            subscription.dispose();
        }
        if count > 0 {
            debug!(root = %self.root.display(), count, "Disposed project subscriptions");
        }
    }
}

/// All discovered projects, one map per kind, keyed by absolute root
///
/// The maps are independent: a directory carrying more than one marker may
/// appear in more than one map (mixed mode).
#[derive(Debug, Default)]
pub struct ProjectRegistry {
    language_roots: BTreeMap<PathBuf, Project>,
    build_roots: BTreeMap<PathBuf, Project>,
    fetch_roots: BTreeMap<PathBuf, Project>,
}

impl ProjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn map_mut(&mut self, kind: ProjectKind) -> &mut BTreeMap<PathBuf, Project> {
        match kind {
            ProjectKind::LanguageRoot => &mut self.language_roots,
            ProjectKind::BuildRoot => &mut self.build_roots,
            ProjectKind::FetchRoot => &mut self.fetch_roots,
        }
    }

    fn map(&self, kind: ProjectKind) -> &BTreeMap<PathBuf, Project> {
        match kind {
            ProjectKind::LanguageRoot => &self.language_roots,
            ProjectKind::BuildRoot => &self.build_roots,
            ProjectKind::FetchRoot => &self.fetch_roots,
        }
    }

    /// Insert or update a project; re-discovery of the same root updates the
    /// existing entry instead of duplicating it
    pub fn insert(&mut self, project: Project) {
        let map = self.map_mut(project.kind);
        if let Some(existing) = map.get_mut(&project.root) {
            existing.workspace_folder = project.workspace_folder;
        } else {
            map.insert(project.root.clone(), project);
        }
    }

    /// All projects of one kind, in path order
    pub fn of_kind(&self, kind: ProjectKind) -> impl Iterator<Item = &Project> {
        self.map(kind).values()
    }

    /// Mutable access to one project
    pub fn get_mut(&mut self, kind: ProjectKind, root: &Path) -> Option<&mut Project> {
        self.map_mut(kind).get_mut(root)
    }

    /// Remove every project owned by a closed workspace folder, disposing
    /// their subscriptions
    pub fn remove_workspace_folder(&mut self, folder: &Path) {
        for kind in [
            ProjectKind::LanguageRoot,
            ProjectKind::BuildRoot,
            ProjectKind::FetchRoot,
        ] {
            let map = self.map_mut(kind);
            let removed: Vec<PathBuf> = map
                .iter()
                .filter(|(_, p)| p.workspace_folder == folder)
                .map(|(root, _)| root.clone())
                .collect();
            for root in removed {
                if let Some(mut project) = map.remove(&root) {
                    project.dispose_subscriptions();
                }
            }
        }
    }

    /// Total number of registered projects across all kinds
    pub fn len(&self) -> usize {
        self.language_roots.len() + self.build_roots.len() + self.fetch_roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
