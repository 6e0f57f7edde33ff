use crate::model::{Entry, EntryType};
use crate::sources::Source;
use anyhow::Result;
use log::{debug, info, warn};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const DESKTOP_EXTENSION: &str = "desktop";
const MAIN_GROUP: &str = "[Desktop Entry]";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("%[a-zA-Z]").expect("placeholder pattern is valid"));

/// Reads `.desktop` files from a list of directories, in order.
pub struct DesktopSource {
    dirs: Vec<PathBuf>,
}

impl DesktopSource {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }
}

impl Source for DesktopSource {
    fn scan(&self) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();

        for dir in &self.dirs {
            let read_dir = match fs::read_dir(dir) {
                Ok(read_dir) => read_dir,
                Err(e) => {
                    warn!("DesktopSource: cannot read {:?}: {}", dir, e);
                    continue;
                }
            };

            debug!("Scanning desktop files in {:?}", dir);
            for dir_entry in read_dir.flatten() {
                let path = dir_entry.path();
                if path.extension().and_then(|s| s.to_str()) != Some(DESKTOP_EXTENSION) {
                    continue;
                }
                if let Some(entry) = parse_desktop_file(&path) {
                    entries.push(entry);
                }
            }
        }

        info!("DesktopSource: found {} entries", entries.len());
        Ok(entries)
    }
}

/// Parses one desktop entry file. Unreadable or unusable files yield `None`.
pub fn parse_desktop_file(path: &Path) -> Option<Entry> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            debug!("Skipping {:?}: {}", path, e);
            return None;
        }
    };

    let entry = parse_desktop_entry(&path.to_string_lossy(), &content);
    if entry.is_none() {
        debug!("Skipping {:?}: hidden or incomplete", path);
    }
    entry
}

/// Extracts an entry from desktop file text.
///
/// Keys are read from lines before the first group header and from the
/// `[Desktop Entry]` group; other groups (desktop actions) are ignored. The
/// first occurrence of each key wins. `Hidden=true` or `NoDisplay=true` ends
/// parsing with `None`.
pub fn parse_desktop_entry(id: &str, content: &str) -> Option<Entry> {
    let mut name: Option<&str> = None;
    let mut exec: Option<&str> = None;
    let mut icon: Option<&str> = None;
    let mut comment: Option<&str> = None;
    let mut hidden_seen = false;
    let mut no_display_seen = false;
    let mut in_main_group = true;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            in_main_group = line == MAIN_GROUP;
            continue;
        }

        if !in_main_group {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim();

        match key.trim() {
            "Name" if name.is_none() => name = Some(value),
            "Exec" if exec.is_none() => exec = Some(value),
            "Icon" if icon.is_none() => icon = Some(value),
            "Comment" if comment.is_none() => comment = Some(value),
            "Hidden" if !hidden_seen => {
                hidden_seen = true;
                if value == "true" {
                    return None;
                }
            }
            "NoDisplay" if !no_display_seen => {
                no_display_seen = true;
                if value == "true" {
                    return None;
                }
            }
            _ => {}
        }
    }

    let name = name.filter(|n| !n.is_empty())?;
    let command = clean_exec(exec?);
    if command.is_empty() {
        return None;
    }

    let mut entry = Entry::new(id.to_string(), name.to_string(), command, EntryType::Desktop);
    entry.description = comment.unwrap_or_default().to_string();
    entry.icon = icon.filter(|i| !i.is_empty()).map(str::to_string);
    Some(entry)
}

/// Blanks out `%<letter>` field codes in place and drops trailing whitespace.
pub fn clean_exec(raw: &str) -> String {
    PLACEHOLDER.replace_all(raw, "  ").trim_end().to_string()
}
