use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

/// Which records view is active. Chart and timeline are mutually exclusive
/// in the UI, so the preference is a single enum rather than two flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordView {
    List,
    Chart,
    Timeline,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayPreferences {
    pub show_in_days: bool,
    pub hours_per_day: u8,
    pub show_total_stats: bool,
}

impl Default for DisplayPreferences {
    fn default() -> Self {
        Self {
            show_in_days: false,
            hours_per_day: 7,
            show_total_stats: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserPreferences {
    language: String,
    active_view: RecordView,
    display: DisplayPreferences,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            language: "zh-CN".into(),
            active_view: RecordView::List,
            display: DisplayPreferences::default(),
        }
    }
}

/// Persisted display preferences, one JSON file. An unreadable file falls
/// back to defaults instead of failing startup.
pub struct PreferencesStore {
    path: PathBuf,
    data: RwLock<UserPreferences>,
}

impl PreferencesStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read preferences from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            UserPreferences::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn language(&self) -> String {
        self.data.read().unwrap().language.clone()
    }

    pub fn active_view(&self) -> RecordView {
        self.data.read().unwrap().active_view
    }

    pub fn display(&self) -> DisplayPreferences {
        self.data.read().unwrap().display.clone()
    }

    pub fn set_language(&self, language: impl Into<String>) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.language = language.into();
        self.persist(&guard)
    }

    pub fn set_active_view(&self, view: RecordView) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.active_view = view;
        self.persist(&guard)
    }

    pub fn update_display(&self, display: DisplayPreferences) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.display = display;
        self.persist(&guard)
    }

    fn persist(&self, data: &UserPreferences) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write preferences to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let store = PreferencesStore::new(dir.path().join("settings.json")).unwrap();

        assert_eq!(store.language(), "zh-CN");
        assert_eq!(store.active_view(), RecordView::List);
        let display = store.display();
        assert!(!display.show_in_days);
        assert_eq!(display.hours_per_day, 7);
        assert!(display.show_total_stats);
    }

    #[test]
    fn unreadable_contents_fall_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json at all").unwrap();

        let store = PreferencesStore::new(path).unwrap();
        assert_eq!(store.display().hours_per_day, 7);
    }

    #[test]
    fn updates_survive_a_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");

        {
            let store = PreferencesStore::new(path.clone()).unwrap();
            store.set_active_view(RecordView::Chart).unwrap();
            store
                .update_display(DisplayPreferences {
                    show_in_days: true,
                    hours_per_day: 8,
                    show_total_stats: false,
                })
                .unwrap();
            store.set_language("en").unwrap();
        }

        let store = PreferencesStore::new(path).unwrap();
        assert_eq!(store.active_view(), RecordView::Chart);
        assert_eq!(store.language(), "en");
        let display = store.display();
        assert!(display.show_in_days);
        assert_eq!(display.hours_per_day, 8);
        assert!(!display.show_total_stats);
    }
}
