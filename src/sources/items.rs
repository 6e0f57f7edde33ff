use crate::config::StaticEntry;
use crate::model::{Entry, EntryType};
use crate::sources::Source;
use anyhow::Result;
use log::info;

/// Entries declared by hand in the config file.
pub struct StaticSource {
    items: Vec<StaticEntry>,
}

impl StaticSource {
    pub fn new(items: Vec<StaticEntry>) -> Self {
        Self { items }
    }
}

impl Source for StaticSource {
    fn scan(&self) -> Result<Vec<Entry>> {
        let entries: Vec<Entry> = self
            .items
            .iter()
            .filter(|item| !item.name.trim().is_empty() && !item.command.trim().is_empty())
            .map(|item| {
                let mut entry = Entry::new(
                    format!("custom:{}", item.name),
                    item.name.clone(),
                    item.command.trim().to_string(),
                    EntryType::Custom,
                );
                entry.description = item.description.clone().unwrap_or_default();
                entry.icon = item.icon.clone();
                entry
            })
            .collect();

        info!("StaticSource: found {} entries", entries.len());
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, command: &str) -> StaticEntry {
        StaticEntry {
            name: name.to_string(),
            command: command.to_string(),
            icon: None,
            description: None,
        }
    }

    #[test]
    fn incomplete_items_are_dropped() {
        let mut terminal = item("Terminal", " foot ");
        terminal.description = Some("Wayland terminal".into());
        terminal.icon = Some("foot".into());

        let source = StaticSource::new(vec![terminal, item("", "true"), item("Nothing", "  ")]);
        let entries = source.scan().unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "custom:Terminal");
        assert_eq!(entries[0].command, "foot");
        assert_eq!(entries[0].description, "Wayland terminal");
        assert_eq!(entries[0].icon_ref(), "foot");
        assert_eq!(entries[0].entry_type, EntryType::Custom);
    }
}
