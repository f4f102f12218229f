//! Placeholder checks between the base language and its translations

use super::ResourceSet;
use crate::parser::xml::EntryType;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Marker left behind by tools that translate from iOS string files
pub const GENERIC_MARKER: &str = "%@";

fn typed_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"%[sdfe]").expect("typed placeholder pattern is valid"))
}

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"%[\d$]*[sdfeEgG]").expect("format token pattern is valid")
    })
}

/// `%s`, `%d`, `%f`, `%e` in order of appearance
pub fn typed_placeholders(text: &str) -> Vec<String> {
    typed_pattern()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Format tokens with optional positional index, e.g. `%1$s`, `%d`
pub fn format_tokens(text: &str) -> Vec<String> {
    token_pattern()
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Replace each generic marker with the typed placeholder at the same
/// position. Markers without a counterpart stay as they are.
pub fn substitute_generic(value: &str, typed: &[String]) -> (String, Vec<String>) {
    let mut parts = value.split(GENERIC_MARKER);
    let mut rebuilt = parts.next().unwrap_or_default().to_string();
    let mut applied = Vec::new();

    for (i, part) in parts.enumerate() {
        match typed.get(i) {
            Some(placeholder) => {
                rebuilt.push_str(placeholder);
                applied.push(placeholder.clone());
            }
            None => rebuilt.push_str(GENERIC_MARKER),
        }
        rebuilt.push_str(part);
    }

    (rebuilt, applied)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Substitution {
    pub language: String,
    pub key: String,
    pub placeholder: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    pub language: String,
    pub key: String,
    pub base: Vec<String>,
    pub translated: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopiedString {
    pub language: String,
    pub key: String,
    pub value: String,
}

/// Result of the generic-marker fix
#[derive(Debug, Default)]
pub struct PlaceholderFix {
    pub substitutions: Vec<Substitution>,
    /// Indices into `ResourceSet::translations` whose tables changed
    pub changed: Vec<usize>,
}

fn base_strings(set: &ResourceSet) -> HashMap<&str, String> {
    set.base
        .resources
        .entries
        .iter()
        .filter(|e| e.entry_type == EntryType::String)
        .map(|e| (e.key.as_str(), e.text()))
        .collect()
}

/// Rewrite `%@` markers in every translation, in memory
pub fn fix_generic_placeholders(set: &mut ResourceSet) -> PlaceholderFix {
    let base: HashMap<String, Vec<String>> = base_strings(set)
        .into_iter()
        .map(|(key, text)| (key.to_string(), typed_placeholders(&text)))
        .collect();
    let mut fix = PlaceholderFix::default();

    for (index, table) in set.translations.iter_mut().enumerate() {
        let mut changed = false;

        for entry in table.resources.entries.iter_mut() {
            if entry.entry_type != EntryType::String || !entry.raw.contains(GENERIC_MARKER) {
                continue;
            }
            let Some(typed) = base.get(&entry.key) else {
                continue;
            };

            let (rebuilt, applied) = substitute_generic(&entry.raw, typed);
            if applied.is_empty() {
                continue;
            }

            entry.raw = rebuilt;
            changed = true;
            fix.substitutions.extend(applied.into_iter().map(|placeholder| Substitution {
                language: table.language.clone(),
                key: entry.key.clone(),
                placeholder,
            }));
        }

        if changed {
            fix.changed.push(index);
        }
    }

    fix
}

/// Keys whose placeholder sequence differs from the base language
pub fn find_mismatches(set: &ResourceSet) -> Vec<Mismatch> {
    let base = base_strings(set);
    let mut mismatches = Vec::new();

    for table in &set.translations {
        for entry in &table.resources.entries {
            if entry.entry_type != EntryType::String {
                continue;
            }
            let Some(base_text) = base.get(entry.key.as_str()) else {
                continue;
            };

            let base_tokens = format_tokens(base_text);
            let translated_tokens = format_tokens(&entry.text());
            if base_tokens != translated_tokens {
                mismatches.push(Mismatch {
                    language: table.language.clone(),
                    key: entry.key.clone(),
                    base: base_tokens,
                    translated: translated_tokens,
                });
            }
        }
    }

    mismatches
}

/// Keys whose translation is a verbatim copy of the base value
pub fn find_untranslated(set: &ResourceSet) -> Vec<CopiedString> {
    let base = base_strings(set);
    let mut copies = Vec::new();

    for table in &set.translations {
        for entry in &table.resources.entries {
            if entry.entry_type != EntryType::String {
                continue;
            }
            let Some(base_text) = base.get(entry.key.as_str()) else {
                continue;
            };

            let translated = entry.text();
            if translated.trim() == base_text.trim() {
                copies.push(CopiedString {
                    language: table.language.clone(),
                    key: entry.key.clone(),
                    value: translated,
                });
            }
        }
    }

    copies
}
