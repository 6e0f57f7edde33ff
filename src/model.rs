use crate::sources::Source;
use crate::sources::desktop::DesktopSource;
use log::{info, warn};
use serde::Serialize;
use std::path::Path;

/// Icon name used when an entry has none, or when its icon cannot be found.
pub const FALLBACK_ICON: &str = "application-x-executable";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Desktop,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub id: String,            // Source path, or "custom:<name>"
    pub name: String,          // Display name
    pub description: String,   // Comment line, may be empty
    pub command: String,       // Shell command, placeholders removed
    pub icon: Option<String>,  // Icon name/path as written in the source
    pub entry_type: EntryType,
}

impl Entry {
    pub fn new(id: String, name: String, command: String, entry_type: EntryType) -> Self {
        Self {
            id,
            name,
            description: String::new(),
            command,
            icon: None,
            entry_type,
        }
    }

    /// The icon to ask the resolver for.
    pub fn icon_ref(&self) -> &str {
        match self.icon.as_deref() {
            Some(icon) if !icon.is_empty() => icon,
            _ => FALLBACK_ICON,
        }
    }
}

/// Every visible application, in the order the sources produced them.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<Entry>,
}

impl Catalog {
    #[allow(dead_code)]
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// Scans a single applications directory. A missing directory gives an
    /// empty catalog.
    pub fn build(dir: &Path) -> Self {
        Self::from_sources(&[&DesktopSource::new(vec![dir.to_path_buf()])])
    }

    pub fn from_sources(sources: &[&dyn Source]) -> Self {
        let mut entries = Vec::new();
        for source in sources {
            match source.scan() {
                Ok(mut e) => entries.append(&mut e),
                Err(e) => warn!("Catalog: source failed, skipping: {e:#}"),
            }
        }
        info!("Catalog: {} entries", entries.len());
        Self { entries }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use std::fs;

    struct Fixed(Vec<Entry>);

    impl Source for Fixed {
        fn scan(&self) -> Result<Vec<Entry>> {
            Ok(self.0.clone())
        }
    }

    struct Broken;

    impl Source for Broken {
        fn scan(&self) -> Result<Vec<Entry>> {
            Err(anyhow!("boom"))
        }
    }

    fn custom(name: &str) -> Entry {
        Entry::new(format!("custom:{name}"), name.to_string(), name.to_lowercase(), EntryType::Custom)
    }

    #[test]
    fn icon_ref_falls_back_when_absent_or_empty() {
        let mut entry = custom("Foo");
        assert_eq!(entry.icon_ref(), FALLBACK_ICON);
        entry.icon = Some(String::new());
        assert_eq!(entry.icon_ref(), FALLBACK_ICON);
        entry.icon = Some("foo".into());
        assert_eq!(entry.icon_ref(), "foo");
    }

    #[test]
    fn sources_are_concatenated_in_order_and_failures_skipped() {
        let first = Fixed(vec![custom("A"), custom("B")]);
        let second = Fixed(vec![custom("C")]);
        let catalog = Catalog::from_sources(&[&first, &Broken, &second]);

        let names: Vec<_> = catalog.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[test]
    fn build_on_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::build(&dir.path().join("nope"));
        assert!(catalog.is_empty());
    }

    #[test]
    fn build_single_firefox_entry() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("firefox.desktop"),
            "Name=Firefox\nExec=firefox %u\nIcon=firefox\n",
        )
        .unwrap();

        let catalog = Catalog::build(dir.path());
        assert_eq!(catalog.len(), 1);
        let entry = &catalog.entries()[0];
        assert_eq!(entry.name, "Firefox");
        assert_eq!(entry.command, "firefox");
        assert_eq!(entry.icon_ref(), "firefox");
    }

    #[test]
    fn build_skips_no_display_entry() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("hidden.desktop"),
            "NoDisplay=true\nName=Hidden App\nExec=hiddenapp\n",
        )
        .unwrap();

        assert!(Catalog::build(dir.path()).is_empty());
    }
}
