//! Advisory text shown for each tenchusatsu group.

use std::collections::HashMap;

use crate::tenchusatsu::Tenchusatsu;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageCatalog {
    lines: HashMap<Tenchusatsu, Vec<String>>,
}

impl MessageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the lines for a group, returning the ones they replaced.
    pub fn insert(&mut self, group: Tenchusatsu, lines: Vec<String>) -> Option<Vec<String>> {
        self.lines.insert(group, lines)
    }

    /// Lines for `group` in display order; empty when none are registered.
    pub fn get(&self, group: Tenchusatsu) -> &[String] {
        self.lines.get(&group).map(Vec::as_slice).unwrap_or_default()
    }

    /// Lines for an optional group; nothing is shown without one.
    pub fn lines_for(&self, group: Option<Tenchusatsu>) -> &[String] {
        group.map(|group| self.get(group)).unwrap_or_default()
    }

    /// Groups with no registered lines, in band order.
    pub fn missing_groups(&self) -> Vec<Tenchusatsu> {
        Tenchusatsu::ALL
            .into_iter()
            .filter(|group| self.get(*group).is_empty())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl FromIterator<(Tenchusatsu, Vec<String>)> for MessageCatalog {
    fn from_iter<I: IntoIterator<Item = (Tenchusatsu, Vec<String>)>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().collect(),
        }
    }
}
