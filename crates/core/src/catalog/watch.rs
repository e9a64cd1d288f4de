use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::loader::CatalogEvent;

/// Watch a catalog file and emit [`CatalogEvent::SourceChanged`] when it is rewritten.
///
/// The parent directory is watched so editors that replace the file by
/// renaming are still noticed. Dropping the returned watcher stops it.
pub fn watch_catalog(
    path: impl AsRef<Path>,
    sender: mpsc::Sender<CatalogEvent>,
) -> Result<RecommendedWatcher> {
    let path = path.as_ref();
    let target = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let directory = target
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let watched = target.clone();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
        Ok(event) if touches(&event, &watched) => {
            debug!(path = %watched.display(), kind = ?event.kind, "Catalog file changed");
            if sender
                .try_send(CatalogEvent::SourceChanged(watched.clone()))
                .is_err()
            {
                debug!("Catalog change dropped; a reload is already pending");
            }
        }
        Ok(_) => {}
        Err(err) => warn!(%err, "Catalog watcher error"),
    })
    .context("failed to create catalog watcher")?;

    watcher
        .watch(&directory, RecursiveMode::NonRecursive)
        .with_context(|| format!("failed to watch {}", directory.display()))?;
    Ok(watcher)
}

fn touches(event: &Event, target: &Path) -> bool {
    (event.kind.is_modify() || event.kind.is_create())
        && event.paths.iter().any(|path| path == target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, EventKind, ModifyKind};

    #[test]
    fn only_writes_to_the_target_count() {
        let target = PathBuf::from("/tmp/catalog/games.json");
        let modify = Event::new(EventKind::Modify(ModifyKind::Any)).add_path(target.clone());
        let create = Event::new(EventKind::Create(CreateKind::File)).add_path(target.clone());
        let other = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/tmp/catalog/other.json"));
        let access = Event::new(EventKind::Access(notify::event::AccessKind::Any))
            .add_path(target.clone());

        assert!(touches(&modify, &target));
        assert!(touches(&create, &target));
        assert!(!touches(&other, &target));
        assert!(!touches(&access, &target));
    }
}
