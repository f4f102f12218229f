use crate::error::{Result, SweepError};
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, warn};

/// Kind of string resource element
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryType {
    String,
    Plurals,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::String => "STRING",
            EntryType::Plurals => "PLURALS",
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One `<item quantity="...">` of a `<plurals>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralItem {
    pub quantity: String,
    /// Inner markup, still escaped
    pub raw: String,
}

/// A `<string>` or `<plurals>` entry of a string table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringEntry {
    pub key: String,
    pub entry_type: EntryType,
    /// Attributes other than `name`, values still escaped, in document order
    pub attributes: Vec<(String, String)>,
    /// Inner markup of a `<string>`, still escaped
    pub raw: String,
    pub items: Vec<PluralItem>,
}

impl StringEntry {
    pub fn string(key: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            entry_type: EntryType::String,
            attributes: Vec::new(),
            raw: raw.into(),
            items: Vec::new(),
        }
    }

    pub fn plurals(key: impl Into<String>, items: Vec<PluralItem>) -> Self {
        Self {
            key: key.into(),
            entry_type: EntryType::Plurals,
            attributes: Vec::new(),
            raw: String::new(),
            items,
        }
    }

    /// Text content with markup stripped and entities resolved
    pub fn text(&self) -> String {
        match self.entry_type {
            EntryType::String => text_content(&self.raw),
            EntryType::Plurals => self
                .items
                .iter()
                .map(|item| text_content(&item.raw))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Parsed content of a `strings.xml` file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringResources {
    /// Attributes of the `<resources>` root (namespace declarations and such)
    pub root_attributes: Vec<(String, String)>,
    pub entries: Vec<StringEntry>,
    /// Top-level content a rebuild does not carry over (element names, `comment`)
    pub dropped: Vec<String>,
}

impl StringResources {
    pub fn get(&self, key: &str) -> Option<&StringEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// Parse the top-level `<string>` and `<plurals>` children of `<resources>`
    pub fn parse(path: &Path, contents: &str) -> Result<Self> {
        let mut reader = Reader::from_str(contents);
        let mut resources = StringResources::default();
        let mut depth = 0usize;

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    if depth == 0 {
                        resources.root_attributes = raw_attributes(path, &e)?;
                    } else if depth == 1 {
                        match e.name().as_ref() {
                            b"string" => {
                                let entry = start_entry(path, &e, EntryType::String)?;
                                let raw = reader
                                    .read_text(e.name())
                                    .map_err(|err| SweepError::xml(path, err))?;
                                if let Some(mut entry) = entry {
                                    entry.raw = raw.into_owned();
                                    resources.entries.push(entry);
                                }
                                continue;
                            }
                            b"plurals" => {
                                let entry = start_entry(path, &e, EntryType::Plurals)?;
                                let items = read_plural_items(path, &mut reader)?;
                                if let Some(mut entry) = entry {
                                    entry.items = items;
                                    resources.entries.push(entry);
                                }
                                continue;
                            }
                            other => resources
                                .dropped
                                .push(String::from_utf8_lossy(other).into_owned()),
                        }
                    }
                    depth += 1;
                }
                Ok(Event::Empty(e)) if depth == 1 => {
                    let entry_type = match e.name().as_ref() {
                        b"string" => EntryType::String,
                        b"plurals" => EntryType::Plurals,
                        other => {
                            resources
                                .dropped
                                .push(String::from_utf8_lossy(other).into_owned());
                            continue;
                        }
                    };
                    if let Some(entry) = start_entry(path, &e, entry_type)? {
                        resources.entries.push(entry);
                    }
                }
                Ok(Event::Comment(_)) if depth == 1 => resources.dropped.push("comment".to_string()),
                Ok(Event::End(_)) => depth = depth.saturating_sub(1),
                Ok(Event::Eof) => break,
                Err(err) => {
                    return Err(SweepError::xml(
                        path,
                        format!("at position {}: {}", reader.buffer_position(), err),
                    ))
                }
                _ => {}
            }
        }

        Ok(resources)
    }

    /// Rebuild a `strings.xml` document from the entries
    pub fn render(&self) -> String {
        if !self.dropped.is_empty() {
            warn!(
                "Rebuilt strings table drops {} unsupported item(s): {}",
                self.dropped.len(),
                self.dropped.join(", ")
            );
        }

        let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<resources");
        push_attributes(&mut out, &self.root_attributes);
        out.push_str(">\n");

        for entry in &self.entries {
            match entry.entry_type {
                EntryType::String => {
                    out.push_str("    <string name=\"");
                    out.push_str(&escape(entry.key.as_str()));
                    out.push('"');
                    push_attributes(&mut out, &entry.attributes);
                    out.push('>');
                    out.push_str(&entry.raw);
                    out.push_str("</string>\n");
                }
                EntryType::Plurals => {
                    out.push_str("    <plurals name=\"");
                    out.push_str(&escape(entry.key.as_str()));
                    out.push('"');
                    push_attributes(&mut out, &entry.attributes);
                    out.push_str(">\n");
                    for item in &entry.items {
                        out.push_str("        <item quantity=\"");
                        out.push_str(&escape(item.quantity.as_str()));
                        out.push_str("\">");
                        out.push_str(&item.raw);
                        out.push_str("</item>\n");
                    }
                    out.push_str("    </plurals>\n");
                }
            }
        }

        out.push_str("</resources>\n");
        out
    }
}

fn push_attributes(out: &mut String, attributes: &[(String, String)]) {
    for (key, value) in attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&value.replace('"', "&quot;"));
        out.push('"');
    }
}

fn raw_attributes(path: &Path, e: &BytesStart) -> Result<Vec<(String, String)>> {
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| SweepError::xml(path, err))?;
        attributes.push((
            String::from_utf8_lossy(attr.key.as_ref()).to_string(),
            String::from_utf8_lossy(&attr.value).to_string(),
        ));
    }
    Ok(attributes)
}

/// Entry shell for an element; `None` when it has no usable `name`
fn start_entry(path: &Path, e: &BytesStart, entry_type: EntryType) -> Result<Option<StringEntry>> {
    let mut key = None;
    let mut attributes = Vec::new();

    for attr in e.attributes() {
        let attr = attr.map_err(|err| SweepError::xml(path, err))?;
        if attr.key.as_ref() == b"name" {
            let value = attr
                .unescape_value()
                .map_err(|err| SweepError::xml(path, err))?;
            key = Some(value.into_owned());
        } else {
            attributes.push((
                String::from_utf8_lossy(attr.key.as_ref()).to_string(),
                String::from_utf8_lossy(&attr.value).to_string(),
            ));
        }
    }

    match key {
        Some(key) if !key.is_empty() => Ok(Some(StringEntry {
            key,
            entry_type,
            attributes,
            raw: String::new(),
            items: Vec::new(),
        })),
        _ => {
            debug!("Skipping {} without a name in {}", entry_type, path.display());
            Ok(None)
        }
    }
}

fn read_plural_items(path: &Path, reader: &mut Reader<&[u8]>) -> Result<Vec<PluralItem>> {
    let mut items = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"item" => {
                let quantity = quantity_of(path, &e)?;
                let raw = reader
                    .read_text(e.name())
                    .map_err(|err| SweepError::xml(path, err))?;
                items.push(PluralItem {
                    quantity,
                    raw: raw.into_owned(),
                });
            }
            Ok(Event::Start(e)) => {
                reader
                    .read_to_end(e.name())
                    .map_err(|err| SweepError::xml(path, err))?;
            }
            Ok(Event::Empty(e)) if e.name().as_ref() == b"item" => {
                items.push(PluralItem {
                    quantity: quantity_of(path, &e)?,
                    raw: String::new(),
                });
            }
            Ok(Event::End(_)) => return Ok(items),
            Ok(Event::Eof) => return Err(SweepError::xml(path, "unclosed <plurals> element")),
            Err(err) => return Err(SweepError::xml(path, err)),
            _ => {}
        }
    }
}

fn quantity_of(path: &Path, e: &BytesStart) -> Result<String> {
    let attr = e
        .try_get_attribute("quantity")
        .map_err(|err| SweepError::xml(path, err))?;
    Ok(attr
        .map(|a| String::from_utf8_lossy(&a.value).to_string())
        .unwrap_or_default())
}

/// Text of an XML fragment with tags dropped and entities resolved
pub fn text_content(raw: &str) -> String {
    let mut reader = Reader::from_str(raw);
    let mut out = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Text(t)) => match t.unescape() {
                Ok(text) => out.push_str(&text),
                Err(_) => out.push_str(&String::from_utf8_lossy(&t)),
            },
            Ok(Event::CData(c)) => out.push_str(&String::from_utf8_lossy(&c)),
            Ok(Event::Eof) => break,
            Err(_) => return raw.to_string(),
            _ => {}
        }
    }

    out
}
