/*!
 * Idiom substitution applied before translation.
 *
 * Idiomatic English phrases rarely survive literal machine translation, so
 * known phrases are rewritten into their target-language equivalent first.
 * Matching is case-insensitive and literal.
 */

use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use regex::{NoExpand, Regex, RegexBuilder};
use serde_json::{Map, Value};
use std::path::Path;

/// A phrase and its precompiled matcher
#[derive(Debug, Clone)]
struct IdiomEntry {
    phrase: String,
    replacement: String,
    pattern: Regex,
}

/// Immutable phrase -> replacement dictionary
///
/// Replacements run in insertion order over the progressively rewritten
/// text, so an earlier entry can create or destroy a later match. Overlapping
/// phrases are not resolved by length; list the longer phrase first if it
/// must win.
#[derive(Debug, Clone, Default)]
pub struct IdiomMap {
    entries: Vec<IdiomEntry>,
}

impl IdiomMap {
    /// Empty dictionary, substitution is a no-op
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a dictionary from ordered (phrase, replacement) pairs
    pub fn from_pairs<I, P, R>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, R)>,
        P: Into<String>,
        R: Into<String>,
    {
        let mut entries = Vec::new();

        for (phrase, replacement) in pairs {
            let phrase = phrase.into();
            if phrase.trim().is_empty() {
                return Err(anyhow!("Idiom phrases cannot be empty"));
            }

            let pattern = RegexBuilder::new(&regex::escape(&phrase))
                .case_insensitive(true)
                .build()
                .with_context(|| format!("Failed to compile idiom pattern for '{}'", phrase))?;

            entries.push(IdiomEntry {
                phrase,
                replacement: replacement.into(),
                pattern,
            });
        }

        Ok(Self { entries })
    }

    /// Parse a JSON object of `"phrase": "replacement"` pairs, keeping file order
    pub fn from_json_str(json: &str) -> Result<Self> {
        let map: Map<String, Value> = serde_json::from_str(json)
            .context("Idiom dictionary must be a JSON object of phrase/replacement pairs")?;

        let mut pairs = Vec::with_capacity(map.len());
        for (phrase, value) in map {
            let replacement = match value {
                Value::String(s) => s,
                other => return Err(anyhow!("Replacement for '{}' must be a string, got {}", phrase, other)),
            };
            pairs.push((phrase, replacement));
        }

        Self::from_pairs(pairs)
    }

    /// Load the dictionary from a JSON file
    ///
    /// A missing file is not an error: substitution is optional, so the
    /// pipeline runs with an empty dictionary and a warning.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("Idiom dictionary not found at {:?}, idiom substitution disabled", path);
            return Ok(Self::empty());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read idiom dictionary: {:?}", path))?;
        let map = Self::from_json_str(&content)
            .with_context(|| format!("Failed to parse idiom dictionary: {:?}", path))?;

        debug!("Loaded {} idioms from {:?}", map.len(), path);
        Ok(map)
    }

    /// Rewrite every known phrase in `text`
    pub fn apply(&self, text: &str) -> String {
        let mut result = text.to_string();

        for entry in &self.entries {
            if entry.pattern.is_match(&result) {
                result = entry
                    .pattern
                    .replace_all(&result, NoExpand(entry.replacement.as_str()))
                    .into_owned();
            }
        }

        result
    }

    /// Phrases in replacement order
    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.phrase.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
