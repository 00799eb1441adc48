//! Hot-reload of a rule snapshot via `notify`.

use std::path::{Path, PathBuf};

use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{info, warn};

use super::read_rules_file;
use crate::error::Result;
use crate::store::RuleStore;

/// Keeps a [`RuleStore`] in sync with a snapshot file.
///
/// Reloads are all-or-nothing: a file that fails to parse or convert leaves
/// the previous rules in place.
pub struct SnapshotWatcher {
    path: PathBuf,
    /// Held to keep the watcher alive.
    _watcher: RecommendedWatcher,
}

impl SnapshotWatcher {
    pub fn spawn(store: RuleStore, path: &Path) -> Result<Self> {
        Self::spawn_with(store, path, |_| {})
    }

    /// Like [`SnapshotWatcher::spawn`], calling `on_reload` with the new rule
    /// count after every successful reload.
    pub fn spawn_with<F>(store: RuleStore, path: &Path, on_reload: F) -> Result<Self>
    where
        F: Fn(usize) + Send + 'static,
    {
        let watcher = watch_file(path, move |target| match reload_from(&store, target) {
            Ok(count) => {
                info!(path = %target.display(), rules = count, "hot-reloaded rule snapshot");
                on_reload(count);
            }
            Err(e) => warn!(
                path = %target.display(),
                error = %e,
                "failed to reload rule snapshot, keeping previous rules"
            ),
        })?;

        info!(path = %path.display(), "watching rule snapshot for changes");
        Ok(Self {
            path: path.to_path_buf(),
            _watcher: watcher,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Re-read `path` and replace the store's contents with it.
pub fn reload_from(store: &RuleStore, path: &Path) -> Result<usize> {
    let records = read_rules_file(path)?;
    store.reload(&records)
}

/// Call `on_change` whenever `path` is created or rewritten.
///
/// The parent directory is watched rather than the file itself, since
/// editors and atomic writers replace files by rename. The returned watcher
/// stops when dropped.
pub fn watch_file<F>(path: &Path, on_change: F) -> Result<RecommendedWatcher>
where
    F: Fn(&Path) + Send + 'static,
{
    let target = path.to_path_buf();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut watcher = notify::recommended_watcher(
        move |res: std::result::Result<Event, notify::Error>| match res {
            Ok(event) if is_change_to(&event, &target) => on_change(&target),
            Ok(_) => {}
            Err(e) => warn!(path = %target.display(), error = %e, "file watcher error"),
        },
    )?;
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

/// True when `event` creates or rewrites the file named like `target`.
pub(super) fn is_change_to(event: &Event, target: &Path) -> bool {
    let touches_target = event
        .paths
        .iter()
        .any(|p| p.file_name().is_some() && p.file_name() == target.file_name());

    touches_target
        && matches!(
            event.kind,
            EventKind::Create(_)
                | EventKind::Modify(ModifyKind::Data(_))
                | EventKind::Modify(ModifyKind::Name(_))
                | EventKind::Modify(ModifyKind::Any)
        )
}
