//! Grouping in order of first appearance

use std::collections::HashMap;

/// String-keyed groups that iterate in the order keys were first seen
#[derive(Debug, Clone)]
pub(crate) struct OrderedGroups<V> {
    index: HashMap<String, usize>,
    entries: Vec<(String, V)>,
}

impl<V> Default for OrderedGroups<V> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<V> OrderedGroups<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group for `key`, created with `init` on first sight
    pub fn entry_or_insert_with(&mut self, key: &str, init: impl FnOnce() -> V) -> &mut V {
        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                self.entries.push((key.to_string(), init()));
                self.index.insert(key.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    pub fn into_values(self) -> impl Iterator<Item = V> {
        self.entries.into_iter().map(|(_, v)| v)
    }

    /// Keys paired with their groups
    pub fn into_entries(self) -> impl Iterator<Item = (String, V)> {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_appearance_order() {
        let mut groups: OrderedGroups<Vec<u32>> = OrderedGroups::new();
        for (key, value) in [("b", 1), ("a", 2), ("b", 3), ("c", 4)] {
            groups.entry_or_insert_with(key, Vec::new).push(value);
        }
        let values: Vec<Vec<u32>> = groups.into_values().collect();
        assert_eq!(values, vec![vec![1, 3], vec![2], vec![4]]);
    }

    #[test]
    fn test_entries_carry_their_keys() {
        let mut groups: OrderedGroups<u32> = OrderedGroups::new();
        for key in ["Email", "Name", "Email"] {
            *groups.entry_or_insert_with(key, || 0) += 1;
        }
        let entries: Vec<(String, u32)> = groups.into_entries().collect();
        assert_eq!(entries, vec![("Email".to_string(), 2), ("Name".to_string(), 1)]);
    }
}
