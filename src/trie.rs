//! Word-list trie construction.
//!
//! Word lists are tab-separated `word<TAB>count` lines. The result is a JSON
//! literal that the generated script hands straight to the runtime trie model.
use crate::source::SourceFile;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Child key used for entries whose search key ends at a split point.
pub const END_OF_KEY: char = '\u{FDD0}';
/// Leaves holding more entries than this are split by the next key character.
pub const DEFAULT_MAX_LEAF_ENTRIES: usize = 12;

pub trait TrieBuilder {
    /// Build the serialized lookup structure for the given word lists.
    fn build(&self, word_lists: &[SourceFile]) -> Result<String>;
}

#[derive(Debug, Clone, Copy)]
pub struct WordListTrieBuilder {
    max_leaf_entries: usize,
}

impl Default for WordListTrieBuilder {
    fn default() -> Self {
        Self {
            max_leaf_entries: DEFAULT_MAX_LEAF_ENTRIES,
        }
    }
}

impl WordListTrieBuilder {
    pub fn with_max_leaf_entries(max_leaf_entries: usize) -> Self {
        Self {
            max_leaf_entries: max_leaf_entries.max(1),
        }
    }
}

impl TrieBuilder for WordListTrieBuilder {
    fn build(&self, word_lists: &[SourceFile]) -> Result<String> {
        let mut counts = WordCounts::default();
        for list in word_lists {
            counts
                .add_word_list(&list.text)
                .with_context(|| format!("parse word list {}", list.path.display()))?;
        }
        let entries = counts.into_entries();
        let total_weight: u64 = entries.iter().map(|entry| entry.weight).sum();
        tracing::debug!(words = entries.len(), total_weight, "building trie");
        let trie = Trie {
            total_weight,
            root: build_node(entries, 0, self.max_leaf_entries),
        };
        serde_json::to_string(&trie).context("serialize trie")
    }
}

/// Word frequencies in first-seen order.
#[derive(Debug, Default)]
struct WordCounts {
    order: Vec<String>,
    counts: HashMap<String, u64>,
}

impl WordCounts {
    fn add_word_list(&mut self, text: &str) -> Result<()> {
        let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
        for (index, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let mut columns = line.split('\t');
            let word = columns.next().unwrap_or_default().trim();
            if word.is_empty() {
                continue;
            }
            let count = match columns.next().map(str::trim) {
                None | Some("") => 1,
                Some(raw) => raw.parse::<u64>().map_err(|_| {
                    anyhow!("line {}: invalid count '{raw}' for '{word}'", index + 1)
                })?,
            };
            self.add(word, count);
        }
        Ok(())
    }

    fn add(&mut self, word: &str, count: u64) {
        match self.counts.get_mut(word) {
            Some(existing) => *existing += count,
            None => {
                self.order.push(word.to_string());
                self.counts.insert(word.to_string(), count);
            }
        }
    }

    fn into_entries(self) -> Vec<Entry> {
        let WordCounts { order, counts } = self;
        order
            .into_iter()
            .map(|word| Entry {
                key: search_key(&word),
                weight: counts.get(&word).copied().unwrap_or_default(),
                content: word,
            })
            .collect()
    }
}

fn search_key(word: &str) -> String {
    word.to_lowercase()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Trie {
    total_weight: u64,
    root: Node,
}

#[derive(Debug, Clone, Serialize)]
struct Entry {
    key: String,
    weight: u64,
    content: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Node {
    Leaf {
        weight: u64,
        entries: Vec<Entry>,
    },
    Internal {
        weight: u64,
        values: Vec<String>,
        children: BTreeMap<String, Node>,
    },
}

impl Node {
    fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }
}

fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(|a, b| b.weight.cmp(&a.weight).then_with(|| a.key.cmp(&b.key)));
}

fn leaf(mut entries: Vec<Entry>) -> Node {
    sort_entries(&mut entries);
    let weight = entries.first().map(|entry| entry.weight).unwrap_or_default();
    Node::Leaf { weight, entries }
}

fn build_node(entries: Vec<Entry>, depth: usize, max_leaf_entries: usize) -> Node {
    if entries.len() <= max_leaf_entries {
        return leaf(entries);
    }

    let mut groups: BTreeMap<String, Vec<Entry>> = BTreeMap::new();
    for entry in entries {
        let next = entry.key.chars().nth(depth).unwrap_or(END_OF_KEY);
        groups.entry(next.to_string()).or_default().push(entry);
    }

    let end_key = END_OF_KEY.to_string();
    let children: BTreeMap<String, Node> = groups
        .into_iter()
        .map(|(key, group)| {
            let child = if key == end_key {
                leaf(group)
            } else {
                build_node(group, depth + 1, max_leaf_entries)
            };
            (key, child)
        })
        .collect();

    let mut values: Vec<(&String, u64)> = children
        .iter()
        .map(|(key, child)| (key, child.weight()))
        .collect();
    values.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    let weight = values.first().map(|(_, weight)| *weight).unwrap_or_default();
    let values = values.into_iter().map(|(key, _)| key.clone()).collect();

    Node::Internal {
        weight,
        values,
        children,
    }
}
