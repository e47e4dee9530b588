use crate::domain::phone::normalize_phone;

/// Normalized phones still being looked for, in the order the caller gave them.
///
/// Only ever shrinks: a target leaves the set the moment it is matched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSet {
    items: Vec<String>,
}

impl TargetSet {
    /// Normalizes raw inputs, dropping unusable values and duplicates.
    pub fn from_raw<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut items: Vec<String> = Vec::new();
        for value in raw {
            let Some(normalized) = normalize_phone(value.as_ref()) else {
                continue;
            };
            if !items.contains(&normalized) {
                items.push(normalized);
            }
        }
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn contains(&self, target: &str) -> bool {
        self.items.iter().any(|item| item == target)
    }

    /// Removes `target` and hands it back, or `None` if it was not pending.
    pub fn take(&mut self, target: &str) -> Option<String> {
        let idx = self.items.iter().position(|item| item == target)?;
        Some(self.items.remove(idx))
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}
