//! Interest-based section suggestions.

use std::sync::RwLock;

/// Sections of `known_sections` whose id contains at least one interest,
/// compared case-insensitively, in catalog order.
pub fn suggest(known_sections: &[String], interests: &[String]) -> Vec<String> {
    if known_sections.is_empty() || interests.is_empty() {
        return Vec::new();
    }

    let interests: Vec<String> = interests
        .iter()
        .map(|i| i.to_lowercase())
        .filter(|i| !i.is_empty())
        .collect();

    known_sections
        .iter()
        .filter(|section| {
            let section = section.to_lowercase();
            interests.iter().any(|interest| section.contains(interest.as_str()))
        })
        .cloned()
        .collect()
}

/// The section ids suggestions are drawn from.
#[derive(Default)]
pub struct SectionCatalog {
    sections: RwLock<Vec<String>>,
}

impl SectionCatalog {
    /// Append sections not already present, keeping first-seen order.
    pub fn register<I, S>(&self, sections: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut known = self.sections.write().unwrap_or_else(|e| e.into_inner());
        for section in sections {
            let section = section.into();
            if !known.contains(&section) {
                known.push(section);
            }
        }
    }

    pub fn snapshot(&self) -> Vec<String> {
        self.sections.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn suggest_for(&self, interests: &[String]) -> Vec<String> {
        let known = self.sections.read().unwrap_or_else(|e| e.into_inner());
        suggest(&known, interests)
    }

    pub fn len(&self) -> usize {
        self.sections.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.sections.write().unwrap_or_else(|e| e.into_inner()).clear();
    }
}
