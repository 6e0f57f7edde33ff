use crate::model::Entry;

/// Case-insensitive substring match on name, then description.
pub struct QueryMatcher {
    needle: String,
}

impl QueryMatcher {
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.to_lowercase(),
        }
    }

    pub fn is_match(&self, entry: &Entry) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        entry.name.to_lowercase().contains(&self.needle)
            || entry.description.to_lowercase().contains(&self.needle)
    }

    /// Positions of matching entries, in catalog order.
    pub fn match_indices(&self, entries: &[Entry]) -> Vec<usize> {
        entries
            .iter()
            .enumerate()
            .filter(|(_, e)| self.is_match(e))
            .map(|(i, _)| i)
            .collect()
    }
}

pub fn filter<'a>(entries: &'a [Entry], query: &str) -> Vec<&'a Entry> {
    let matcher = QueryMatcher::new(query);
    entries.iter().filter(|e| matcher.is_match(e)).collect()
}
