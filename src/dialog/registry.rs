//! Dialog Registry
//!
//! Loads dialog definitions from TOML/JSON files and serves lookups by id
//! or trigger name. A reload builds a complete new catalog and swaps it in,
//! so readers only ever see a whole catalog.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::definition::{Dialog, DialogId, RawDialogFile};
use crate::error::{StorytellerError, StorytellerResult};
use crate::player::Player;
use crate::services::DialogLookup;

/// Immutable set of dialogs in load order
#[derive(Debug, Default)]
pub struct DialogCatalog {
    dialogs: Vec<Arc<Dialog>>,
    index: HashMap<DialogId, usize>,
}

impl DialogCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dialog; a dialog with the same id is replaced in place.
    /// Returns true when an earlier definition was replaced.
    pub fn insert(&mut self, dialog: Dialog) -> bool {
        match self.index.get(&dialog.id) {
            Some(&slot) => {
                self.dialogs[slot] = Arc::new(dialog);
                true
            }
            None => {
                self.index.insert(dialog.id.clone(), self.dialogs.len());
                self.dialogs.push(Arc::new(dialog));
                false
            }
        }
    }

    pub fn get(&self, id: &DialogId) -> Option<Arc<Dialog>> {
        self.index.get(id).map(|&slot| Arc::clone(&self.dialogs[slot]))
    }

    /// First dialog in load order that lists `name` as a trigger
    pub fn by_trigger(&self, name: &str) -> Option<Arc<Dialog>> {
        self.dialogs.iter().find(|d| d.has_trigger(name)).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Dialog>> {
        self.dialogs.iter()
    }

    pub fn contains(&self, id: &DialogId) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.dialogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialogs.is_empty()
    }

    /// Warn about OPEN_DIALOG buttons pointing at ids that are not loaded
    fn validate_links(&self) -> usize {
        let mut dangling = 0;
        for dialog in &self.dialogs {
            for target in dialog.linked_dialogs() {
                if !self.contains(&target) {
                    warn!(
                        "Dialog '{}' opens non-existent dialog '{}'",
                        dialog.id, target
                    );
                    dangling += 1;
                }
            }
        }
        dangling
    }
}

impl FromIterator<Dialog> for DialogCatalog {
    fn from_iter<I: IntoIterator<Item = Dialog>>(iter: I) -> Self {
        let mut catalog = DialogCatalog::new();
        for dialog in iter {
            catalog.insert(dialog);
        }
        catalog
    }
}

/// Events from the hot-reload watcher
#[derive(Debug, Clone)]
pub enum HotReloadEvent {
    /// The catalog was rebuilt after a change to `path`
    Reloaded { path: PathBuf, dialogs: usize },
    /// Rebuilding the catalog failed; the previous catalog stays active
    Error(String),
}

/// Registry for all dialog definitions
pub struct DialogRegistry {
    catalog: RwLock<Arc<DialogCatalog>>,
    /// Directory scanned for dialog files
    dialogs_dir: PathBuf,
}

impl DialogRegistry {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            catalog: RwLock::new(Arc::new(DialogCatalog::new())),
            dialogs_dir: data_dir.join("dialogs"),
        }
    }

    /// Registry serving a fixed set of dialogs, without any directory
    pub fn with_dialogs(dialogs: impl IntoIterator<Item = Dialog>) -> Self {
        Self {
            catalog: RwLock::new(Arc::new(dialogs.into_iter().collect())),
            dialogs_dir: PathBuf::new(),
        }
    }

    pub fn dialogs_dir(&self) -> &Path {
        &self.dialogs_dir
    }

    /// Load every dialog file and replace the current catalog.
    ///
    /// Unreadable or malformed files are skipped with a warning; only a
    /// failure to list the directory is an error.
    pub fn load_all(&self) -> StorytellerResult<usize> {
        info!("Loading dialogs from {:?}", self.dialogs_dir);

        if !self.dialogs_dir.exists() {
            warn!("Dialog directory does not exist: {:?}", self.dialogs_dir);
            return Ok(0);
        }

        let mut paths = Vec::new();
        collect_dialog_files(&self.dialogs_dir, &mut paths)?;
        paths.sort();

        let mut catalog = DialogCatalog::new();
        for path in &paths {
            match load_dialog_file(path) {
                Ok(raw) => {
                    for raw_dialog in &raw.dialogs {
                        match Dialog::from_raw(raw_dialog) {
                            Ok(dialog) => {
                                debug!("Loaded dialog '{}' from {:?}", dialog.id, path);
                                let id = dialog.id.clone();
                                if catalog.insert(dialog) {
                                    warn!("Duplicate dialog ID '{}' in {:?}, overwriting", id, path);
                                }
                            }
                            Err(e) => warn!("Skipping dialog in {:?}: {}", path, e),
                        }
                    }
                }
                Err(e) => warn!("Failed to load dialog file {:?}: {}", path, e),
            }
        }

        catalog.validate_links();
        let count = catalog.len();
        info!("Loaded {} dialog definitions from {} files", count, paths.len());

        *self.catalog.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(catalog);
        Ok(count)
    }

    /// Current catalog; stays valid even if a reload happens meanwhile
    pub fn snapshot(&self) -> Arc<DialogCatalog> {
        Arc::clone(&self.catalog.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn get(&self, id: &DialogId) -> Option<Arc<Dialog>> {
        self.snapshot().get(id)
    }

    pub fn get_by_trigger(&self, name: &str) -> Option<Arc<Dialog>> {
        self.snapshot().by_trigger(name)
    }

    pub fn count(&self) -> usize {
        self.snapshot().len()
    }

    /// Start file watcher for hot-reload.
    /// Returns a channel receiver that signals when reloads occur.
    pub fn start_file_watcher(
        self: &Arc<Self>,
    ) -> StorytellerResult<mpsc::Receiver<HotReloadEvent>> {
        use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
        use std::time::Duration;

        let (tx, rx) = mpsc::channel(32);
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<notify::Event, notify::Error>| {
                if let Ok(event) = res {
                    let _ = notify_tx.send(event);
                }
            },
            Config::default().with_poll_interval(Duration::from_secs(1)),
        )?;
        watcher.watch(&self.dialogs_dir, RecursiveMode::Recursive)?;
        info!("Dialog hot-reload watcher started for {:?}", self.dialogs_dir);

        let registry = Arc::clone(self);
        std::thread::spawn(move || {
            // Dropping the watcher stops the notifications
            let _watcher = watcher;

            while let Ok(event) = notify_rx.recv() {
                if !matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                ) {
                    continue;
                }
                let Some(path) = event.paths.iter().find(|p| is_dialog_file(p)).cloned() else {
                    continue;
                };

                info!("Detected change in {:?}, reloading dialogs", path);
                let outcome = match registry.load_all() {
                    Ok(dialogs) => HotReloadEvent::Reloaded { path, dialogs },
                    Err(e) => {
                        error!("Dialog hot-reload failed: {}", e);
                        HotReloadEvent::Error(e.to_string())
                    }
                };
                if tx.blocking_send(outcome).is_err() {
                    break;
                }
            }
        });

        Ok(rx)
    }
}

impl DialogLookup for DialogRegistry {
    fn by_id(&self, id: &DialogId) -> Option<Arc<Dialog>> {
        self.get(id)
    }

    fn by_trigger(&self, name: &str, _player: &Player) -> Option<Arc<Dialog>> {
        self.get_by_trigger(name)
    }
}

fn is_dialog_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("toml") | Some("json")
    )
}

/// Recursively collect dialog files below `dir`
fn collect_dialog_files(dir: &Path, paths: &mut Vec<PathBuf>) -> StorytellerResult<()> {
    let entries = std::fs::read_dir(dir).map_err(|source| StorytellerError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| StorytellerError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if path.is_dir() {
            collect_dialog_files(&path, paths)?;
        } else if is_dialog_file(&path) {
            paths.push(path);
        }
    }

    Ok(())
}

fn load_dialog_file(path: &Path) -> StorytellerResult<RawDialogFile> {
    let content = std::fs::read_to_string(path).map_err(|source| StorytellerError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if path.extension().and_then(|e| e.to_str()) == Some("json") {
        serde_json::from_str(&content).map_err(|source| StorytellerError::Json {
            path: path.to_path_buf(),
            source,
        })
    } else {
        toml::from_str(&content).map_err(|source| StorytellerError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::definition::RawDialogId;
    use tempfile::TempDir;

    fn write_dialog(dir: &Path, name: &str, content: &str) {
        let dialogs_dir = dir.join("dialogs");
        std::fs::create_dir_all(&dialogs_dir).unwrap();
        std::fs::write(dialogs_dir.join(name), content).unwrap();
    }

    const GREETINGS: &str = r#"
[[dialogs]]
id = 1
triggers = ["Maren"]

[[dialogs.pages]]
message = "Hello"

[[dialogs.pages.buttons]]
text = "More"
actions = [{ name = "OPEN_DIALOG", arg = "2" }]

[[dialogs]]
id = 2
triggers = ["Maren", "Guard"]

[[dialogs.pages]]
message = "More words"
"#;

    #[test]
    fn test_load_dialogs() {
        let temp_dir = TempDir::new().unwrap();
        write_dialog(temp_dir.path(), "greetings.toml", GREETINGS);

        let registry = DialogRegistry::new(temp_dir.path());
        assert_eq!(registry.load_all().unwrap(), 2);

        let dialog = registry.get(&DialogId::new("1")).unwrap();
        assert_eq!(dialog.pages.len(), 1);
        assert_eq!(dialog.pages[0].buttons.len(), 1);
        assert!(registry.get(&DialogId::new("3")).is_none());
    }

    #[test]
    fn test_trigger_resolution_picks_first_in_load_order() {
        let temp_dir = TempDir::new().unwrap();
        write_dialog(temp_dir.path(), "greetings.toml", GREETINGS);

        let registry = DialogRegistry::new(temp_dir.path());
        registry.load_all().unwrap();

        assert_eq!(registry.get_by_trigger("Maren").unwrap().id.as_str(), "1");
        assert_eq!(registry.get_by_trigger("Guard").unwrap().id.as_str(), "2");
        assert!(registry.get_by_trigger("Nobody").is_none());
    }

    #[test]
    fn test_json_files_and_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("dialogs").join("village");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            nested.join("smith.json"),
            r#"{ "dialogs": [ { "id": "smith", "triggers": ["Smith"], "pages": [ { "message": "Need a blade?" } ] } ] }"#,
        )
        .unwrap();

        let registry = DialogRegistry::new(temp_dir.path());
        assert_eq!(registry.load_all().unwrap(), 1);
        assert!(registry.get_by_trigger("Smith").is_some());
    }

    #[test]
    fn test_malformed_file_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        write_dialog(temp_dir.path(), "a_broken.toml", "[[dialogs]\nid = ");
        write_dialog(temp_dir.path(), "b_good.toml", GREETINGS);

        let registry = DialogRegistry::new(temp_dir.path());
        assert_eq!(registry.load_all().unwrap(), 2);
    }

    #[test]
    fn test_duplicate_id_keeps_later_definition() {
        let temp_dir = TempDir::new().unwrap();
        write_dialog(temp_dir.path(), "a.toml", GREETINGS);
        write_dialog(
            temp_dir.path(),
            "b.toml",
            "[[dialogs]]\nid = 2\n[[dialogs.pages]]\nmessage = \"Replaced\"\n",
        );

        let registry = DialogRegistry::new(temp_dir.path());
        assert_eq!(registry.load_all().unwrap(), 2);
        let dialog = registry.get(&DialogId::new("2")).unwrap();
        assert_eq!(dialog.pages[0].message, "Replaced");
    }

    #[test]
    fn test_reload_swaps_whole_catalog() {
        let temp_dir = TempDir::new().unwrap();
        write_dialog(temp_dir.path(), "greetings.toml", GREETINGS);

        let registry = DialogRegistry::new(temp_dir.path());
        registry.load_all().unwrap();
        let before = registry.snapshot();

        write_dialog(
            temp_dir.path(),
            "greetings.toml",
            "[[dialogs]]\nid = 9\ntriggers = [\"Maren\"]\n",
        );
        assert_eq!(registry.load_all().unwrap(), 1);

        // Old snapshot is untouched, new lookups see the new catalog
        assert_eq!(before.len(), 2);
        assert_eq!(registry.get_by_trigger("Maren").unwrap().id.as_str(), "9");
        assert!(registry.get(&DialogId::new("1")).is_none());
    }

    #[test]
    fn test_missing_directory_is_not_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let registry = DialogRegistry::new(temp_dir.path());
        assert_eq!(registry.load_all().unwrap(), 0);
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_dangling_links_are_counted() {
        let catalog: DialogCatalog = toml::from_str::<RawDialogFile>(GREETINGS)
            .unwrap()
            .dialogs
            .iter()
            .filter(|d| matches!(d.id, RawDialogId::Number(1)))
            .map(|d| Dialog::from_raw(d).unwrap())
            .collect();

        assert_eq!(catalog.validate_links(), 1);
    }
}
