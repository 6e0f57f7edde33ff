//! Launcher state driven by discrete UI events.
//!
//! The command line only produces query, activation, Enter and logout events;
//! the remaining keys, focus loss and window close come from a GUI host.

use crate::matcher::QueryMatcher;
use crate::model::{Catalog, Entry};

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Enter,
    Up,
    Down,
}

#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    QueryChanged(String),
    /// Index into the currently visible entries.
    EntryActivated(usize),
    KeyPressed(Key),
    FocusLost,
    /// The window was closed by the user or the window manager.
    Closed,
    LogoutRequested,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// Close the launcher, dispatching the command first if there is one.
    Exit(Option<String>),
}

/// Picks the command to run.
///
/// A `target` wins outright. Otherwise the first visible entry is used, and
/// when nothing is visible the typed query itself becomes the command.
pub fn select(view: &[&Entry], target: Option<usize>, query: &str) -> Option<String> {
    if let Some(index) = target {
        return view.get(index).map(|e| e.command.clone());
    }

    match view.first() {
        Some(entry) => Some(entry.command.clone()),
        None => {
            let query = query.trim();
            (!query.is_empty()).then(|| query.to_string())
        }
    }
}

pub struct AppState {
    pub catalog: Catalog,
    pub filtered_indices: Vec<usize>,
    /// Entry picked with the arrow keys, as a position in `filtered_indices`.
    pub selected_index: Option<usize>,
    pub query: String,
    pub logout_command: String,
}

impl AppState {
    pub fn new(catalog: Catalog, logout_command: String) -> Self {
        let filtered_indices = (0..catalog.len()).collect();
        Self {
            catalog,
            filtered_indices,
            selected_index: None,
            query: String::new(),
            logout_command,
        }
    }

    pub fn handle(&mut self, event: Event) -> Outcome {
        match event {
            Event::QueryChanged(query) => {
                self.update_query(&query);
                Outcome::Continue
            }
            Event::EntryActivated(index) => Outcome::Exit(self.launch(Some(index))),
            Event::KeyPressed(Key::Enter) => Outcome::Exit(self.launch(self.selected_index)),
            Event::KeyPressed(Key::Escape) | Event::FocusLost | Event::Closed => Outcome::Exit(None),
            Event::KeyPressed(Key::Up) => {
                self.move_selection(-1);
                Outcome::Continue
            }
            Event::KeyPressed(Key::Down) => {
                self.move_selection(1);
                Outcome::Continue
            }
            Event::LogoutRequested => {
                let command = self.logout_command.trim();
                Outcome::Exit((!command.is_empty()).then(|| command.to_string()))
            }
        }
    }

    pub fn update_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.filtered_indices = QueryMatcher::new(&self.query).match_indices(self.catalog.entries());
        self.selected_index = None;
        log::debug!("AppState: query='{}', filtered_count={}", self.query, self.filtered_indices.len());
    }

    /// Entries currently visible, in catalog order.
    pub fn visible(&self) -> Vec<&Entry> {
        let entries = self.catalog.entries();
        self.filtered_indices.iter().map(|&idx| &entries[idx]).collect()
    }

    pub fn move_selection(&mut self, delta: i32) {
        if self.filtered_indices.is_empty() {
            self.selected_index = None;
            return;
        }

        let len = self.filtered_indices.len() as i32;
        let new_index = match self.selected_index {
            Some(current) => (current as i32 + delta).rem_euclid(len),
            None if delta >= 0 => 0,
            None => len - 1,
        };
        self.selected_index = Some(new_index as usize);
    }

    pub fn get_selected(&self) -> Option<&Entry> {
        self.selected_index
            .and_then(|pos| self.filtered_indices.get(pos))
            .map(|&idx| &self.catalog.entries()[idx])
    }

    fn launch(&self, target: Option<usize>) -> Option<String> {
        let command = select(&self.visible(), target, &self.query);
        match &command {
            Some(cmd) => log::info!("AppState: launching '{}'", cmd),
            None => log::info!("AppState: nothing to launch"),
        }
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntryType;

    fn entry(name: &str, command: &str) -> Entry {
        Entry::new(name.to_string(), name.to_string(), command.to_string(), EntryType::Desktop)
    }

    fn state() -> AppState {
        let catalog = Catalog::new(vec![
            entry("Firefox", "firefox"),
            entry("Files", "nautilus --new-window"),
            entry("Calculator", "gnome-calculator"),
        ]);
        AppState::new(catalog, "wmlogout".into())
    }

    #[test]
    fn select_prefers_explicit_target() {
        let (a, b) = (entry("A", "a"), entry("B", "b"));
        let view = vec![&a, &b];
        assert_eq!(select(&view, Some(1), "x"), Some("b".into()));
        assert_eq!(select(&view, Some(5), "x"), None);
    }

    #[test]
    fn select_uses_top_hit_then_query() {
        let a = entry("A", "a");
        assert_eq!(select(&[&a], None, "whatever"), Some("a".into()));
        assert_eq!(select(&[], None, "htop"), Some("htop".into()));
        assert_eq!(select(&[], None, "  htop -d 5 "), Some("htop -d 5".into()));
        assert_eq!(select(&[], None, ""), None);
        assert_eq!(select(&[], None, "   "), None);
    }

    #[test]
    fn empty_catalog_runs_typed_command() {
        let mut state = AppState::new(Catalog::default(), String::new());
        assert_eq!(state.handle(Event::QueryChanged("htop".into())), Outcome::Continue);
        assert_eq!(state.handle(Event::KeyPressed(Key::Enter)), Outcome::Exit(Some("htop".into())));
    }

    #[test]
    fn typing_refilters_without_touching_catalog() {
        let mut state = state();
        state.handle(Event::QueryChanged("fi".into()));
        let names: Vec<_> = state.visible().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Firefox", "Files"]);
        assert_eq!(state.catalog.len(), 3);

        state.handle(Event::QueryChanged(String::new()));
        assert_eq!(state.visible().len(), 3);
    }

    #[test]
    fn enter_without_selection_launches_top_hit() {
        let mut state = state();
        state.handle(Event::QueryChanged("calc".into()));
        assert_eq!(
            state.handle(Event::KeyPressed(Key::Enter)),
            Outcome::Exit(Some("gnome-calculator".into()))
        );
    }

    #[test]
    fn enter_with_no_match_runs_query() {
        let mut state = state();
        state.handle(Event::QueryChanged("xterm -e top".into()));
        assert_eq!(
            state.handle(Event::KeyPressed(Key::Enter)),
            Outcome::Exit(Some("xterm -e top".into()))
        );
    }

    #[test]
    fn enter_on_empty_query_and_empty_catalog_exits_without_command() {
        let mut state = AppState::new(Catalog::default(), String::new());
        assert_eq!(state.handle(Event::KeyPressed(Key::Enter)), Outcome::Exit(None));
    }

    #[test]
    fn activation_indexes_the_visible_view() {
        let mut state = state();
        state.handle(Event::QueryChanged("fi".into()));
        assert_eq!(
            state.handle(Event::EntryActivated(1)),
            Outcome::Exit(Some("nautilus --new-window".into()))
        );
        assert_eq!(state.handle(Event::EntryActivated(2)), Outcome::Exit(None));
    }

    #[test]
    fn arrow_keys_pick_an_explicit_entry() {
        let mut state = state();
        assert!(state.get_selected().is_none());

        state.handle(Event::KeyPressed(Key::Down));
        state.handle(Event::KeyPressed(Key::Down));
        assert_eq!(state.get_selected().map(|e| e.name.as_str()), Some("Files"));

        state.handle(Event::KeyPressed(Key::Up));
        state.handle(Event::KeyPressed(Key::Up));
        assert_eq!(state.get_selected().map(|e| e.name.as_str()), Some("Calculator"));

        assert_eq!(
            state.handle(Event::KeyPressed(Key::Enter)),
            Outcome::Exit(Some("gnome-calculator".into()))
        );
    }

    #[test]
    fn typing_clears_selection() {
        let mut state = state();
        state.handle(Event::KeyPressed(Key::Up));
        assert!(state.get_selected().is_some());
        state.handle(Event::QueryChanged("f".into()));
        assert!(state.get_selected().is_none());

        state.handle(Event::QueryChanged("nomatch".into()));
        state.handle(Event::KeyPressed(Key::Down));
        assert!(state.get_selected().is_none());
    }

    #[test]
    fn dismissal_and_logout() {
        let mut state = state();
        assert_eq!(state.handle(Event::KeyPressed(Key::Escape)), Outcome::Exit(None));
        assert_eq!(state.handle(Event::FocusLost), Outcome::Exit(None));
        assert_eq!(state.handle(Event::Closed), Outcome::Exit(None));
        assert_eq!(state.handle(Event::LogoutRequested), Outcome::Exit(Some("wmlogout".into())));

        let mut no_logout = AppState::new(Catalog::default(), " ".into());
        assert_eq!(no_logout.handle(Event::LogoutRequested), Outcome::Exit(None));
    }
}
