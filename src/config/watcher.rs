//! Profile document watcher.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, PollWatcher, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::profile::{load_document, ConfigDocument};

/// Monitors a profile document file and emits each successfully parsed revision.
pub struct DocumentWatcher {
    path: PathBuf,
    poll_interval: Option<Duration>,
    update_tx: mpsc::UnboundedSender<ConfigDocument>,
}

impl DocumentWatcher {
    /// Returns the watcher and a receiver for reloaded documents.
    ///
    /// With a `poll_interval` the file is scanned on that timer and its
    /// contents compared; without one the platform's change events are used.
    pub fn new(
        path: &Path,
        poll_interval: Option<Duration>,
    ) -> (Self, mpsc::UnboundedReceiver<ConfigDocument>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                poll_interval,
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching. Dropping the returned watcher stops it.
    pub fn run(self) -> Result<Box<dyn Watcher + Send>, notify::Error> {
        let handler = reload_handler(self.path.clone(), self.update_tx.clone());

        let mut watcher: Box<dyn Watcher + Send> = match self.poll_interval {
            Some(interval) => Box::new(PollWatcher::new(
                handler,
                Config::default()
                    .with_poll_interval(interval)
                    .with_compare_contents(true),
            )?),
            None => Box::new(RecommendedWatcher::new(handler, Config::default())?),
        };

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(
            path = ?self.path,
            poll_interval = ?self.poll_interval,
            "Document watcher started"
        );
        Ok(watcher)
    }
}

fn reload_handler(
    path: PathBuf,
    tx: mpsc::UnboundedSender<ConfigDocument>,
) -> impl Fn(notify::Result<Event>) + Send + 'static {
    move |res: notify::Result<Event>| match res {
        Ok(event) => {
            if event.kind.is_modify() || event.kind.is_create() {
                tracing::info!(path = %path.display(), "Profile document changed, reloading");
                match load_document(&path) {
                    Ok(document) => {
                        let _ = tx.send(document);
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to reload document; keeping current one");
                    }
                }
            }
        }
        Err(e) => tracing::error!(error = ?e, "Watch error"),
    }
}
