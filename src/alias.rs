use std::collections::HashMap;

#[derive(Debug, Clone)]
struct AliasEntry {
    expansion: String,
    seq: u64,
}

/// Name-keyed store of user-defined command shortcuts.
///
/// Names are unique: adding an existing name replaces its expansion and
/// makes it the most recently added entry.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: HashMap<String, AliasEntry>,
    next_seq: u64,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `command` under `name`, overwriting any previous expansion.
    pub fn add(&mut self, name: impl Into<String>, command: impl Into<String>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(
            name.into(),
            AliasEntry {
                expansion: command.into(),
                seq,
            },
        );
    }

    /// Remove `name`. Returns whether an entry was present.
    pub fn remove(&mut self, name: &str) -> bool {
        self.entries.remove(name).is_some()
    }

    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|e| e.expansion.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, most recently added first.
    pub fn iter_recent_first(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut all: Vec<_> = self.entries.iter().collect();
        all.sort_by(|a, b| b.1.seq.cmp(&a.1.seq));
        all.into_iter()
            .map(|(name, e)| (name.as_str(), e.expansion.as_str()))
    }
}
