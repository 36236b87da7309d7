//! Search and category filtering over an (already expanded) event list.

use std::collections::HashSet;

use crate::model::Event;

/// Sidebar filter state: a free-text search term and the selected categories.
///
/// An empty search term matches every event, and so does an empty category
/// selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventFilter {
    search: String,
    categories: HashSet<String>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl AsRef<str>) -> Self {
        self.search = term.as_ref().to_lowercase();
        self
    }

    pub fn with_categories<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Toggle one category in or out of the selection.
    pub fn toggle_category(&mut self, id: &str) {
        if !self.categories.remove(id) {
            self.categories.insert(id.to_string());
        }
    }

    pub fn is_category_selected(&self, id: &str) -> bool {
        self.categories.contains(id)
    }

    /// Case-insensitive substring match on the title or description, combined
    /// with category membership.
    pub fn matches(&self, event: &Event) -> bool {
        self.matches_search(event) && self.matches_category(event)
    }

    /// The matching events, in input order.
    pub fn apply<'a>(&self, events: &'a [Event]) -> Vec<&'a Event> {
        events.iter().filter(|e| self.matches(e)).collect()
    }

    fn matches_search(&self, event: &Event) -> bool {
        if self.search.is_empty() {
            return true;
        }
        event.title.to_lowercase().contains(&self.search)
            || event
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&self.search))
    }

    fn matches_category(&self, event: &Event) -> bool {
        self.categories.is_empty() || self.categories.contains(&event.category_id)
    }
}
