#![forbid(unsafe_code)]
#![deny(unused_must_use)]
#![warn(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]

//! Data model for sectioned `key=value` profile documents.
//!
//! A `Document` owns an ordered list of `Section`s; each section owns an
//! ordered list of `Entry`s. Order is significant: it is the on-disk order,
//! and enumeration must reproduce it. Name uniqueness (per the configured
//! `NameMatch`) is an invariant the parser and the store both maintain.

use serde::Serialize;

/// How section and key names are compared.
///
/// The legacy profile API is case-preserving on write and case-insensitive
/// on lookup, so `IgnoreAsciiCase` is the default. The rule is configured
/// once per store and passed into every model operation, so lookups, upserts
/// and removals can never disagree on what "the same name" means.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NameMatch {
    /// Byte-for-byte equality.
    Exact,
    /// Case-preserving storage, ASCII case-insensitive lookup.
    #[default]
    IgnoreAsciiCase,
}

impl NameMatch {
    pub fn matches(self, a: &str, b: &str) -> bool {
        match self {
            NameMatch::Exact => a == b,
            NameMatch::IgnoreAsciiCase => a.eq_ignore_ascii_case(b),
        }
    }
}

/// One `key=value` pair within a section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub key: String,
    /// `None` models the legacy "line with no `=`" case (a valueless entry,
    /// rendered as the bare key); `Some(String::new())` models `key=`.
    pub value: Option<String>,
}

impl Entry {
    /// The raw on-disk form of this entry: `key=value`, `key=`, or `key`.
    ///
    /// Consumers distinguish empty-valued from valueless entries by the
    /// presence of the `=` separator in this string.
    pub fn render(&self) -> String {
        match &self.value {
            Some(v) => format!("{}={}", self.key, v),
            None => self.key.clone(),
        }
    }
}

/// A named, ordered collection of entries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Section {
    pub name: String,
    pub entries: Vec<Entry>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn entry(&self, key: &str, rule: NameMatch) -> Option<&Entry> {
        self.entries.iter().find(|e| rule.matches(&e.key, key))
    }

    /// Insert or update an entry, preserving position on update and
    /// appending on insert. The stored key keeps its original spelling
    /// when an existing entry is updated.
    pub fn upsert(&mut self, key: &str, value: Option<&str>, rule: NameMatch) {
        match self.entries.iter_mut().find(|e| rule.matches(&e.key, key)) {
            Some(existing) => existing.value = value.map(str::to_owned),
            None => self.entries.push(Entry {
                key: key.to_owned(),
                value: value.map(str::to_owned),
            }),
        }
    }

    /// Remove one entry. Returns whether anything was removed. The section
    /// itself stays alive even when this leaves it empty.
    pub fn remove(&mut self, key: &str, rule: NameMatch) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| !rule.matches(&e.key, key));
        self.entries.len() != before
    }
}

/// Check a proposed section name against the model invariants: non-empty,
/// no surrounding whitespace (header names parse trimmed), no `]`, no line
/// break. Returns the reason on rejection. The format has no escaping, so a
/// name that fails here would serialize into text that reparses as
/// something else.
pub fn check_section_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("empty");
    }
    if name.trim() != name {
        return Err("surrounding whitespace");
    }
    if name.contains(']') {
        return Err("contains ']'");
    }
    if name.contains(['\n', '\r']) {
        return Err("contains a line break");
    }
    Ok(())
}

/// Check a proposed key: non-empty, no surrounding whitespace (keys parse
/// trimmed), no `=` (the line splits at the first one), no line break.
pub fn check_key(key: &str) -> Result<(), &'static str> {
    if key.is_empty() {
        return Err("empty");
    }
    if key.trim() != key {
        return Err("surrounding whitespace");
    }
    if key.contains('=') {
        return Err("contains '='");
    }
    if key.contains(['\n', '\r']) {
        return Err("contains a line break");
    }
    Ok(())
}

/// Check a proposed value. Values may be empty, but a line break or NUL
/// cannot be represented on disk and is rejected rather than written.
pub fn check_value(value: &str) -> Result<(), &'static str> {
    if value.contains(['\n', '\r']) {
        return Err("contains a line break");
    }
    if value.contains('\0') {
        return Err("contains NUL");
    }
    Ok(())
}

/// An ordered collection of sections — the in-memory form of one file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    pub sections: Vec<Section>,
}

impl Document {
    pub fn section(&self, name: &str, rule: NameMatch) -> Option<&Section> {
        self.sections.iter().find(|s| rule.matches(&s.name, name))
    }

    pub fn section_mut(&mut self, name: &str, rule: NameMatch) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| rule.matches(&s.name, name))
    }

    /// Get-or-create a section, appending new sections at the end so file
    /// order reflects first-write order.
    pub fn section_entry(&mut self, name: &str, rule: NameMatch) -> &mut Section {
        if let Some(i) = self
            .sections
            .iter()
            .position(|s| rule.matches(&s.name, name))
        {
            &mut self.sections[i]
        } else {
            self.sections.push(Section::new(name));
            self.sections.last_mut().unwrap()
        }
    }

    /// Remove a whole section and everything in it. Returns whether anything
    /// was removed.
    pub fn remove_section(&mut self, name: &str, rule: NameMatch) -> bool {
        let before = self.sections.len();
        self.sections.retain(|s| !rule.matches(&s.name, name));
        self.sections.len() != before
    }

    /// Stored value for `section`/`key`, if the entry exists and has one.
    /// A valueless entry reads as `None` here, same as an absent one.
    pub fn value(&self, section: &str, key: &str, rule: NameMatch) -> Option<&str> {
        self.section(section, rule)?
            .entry(key, rule)?
            .value
            .as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive_but_preserving() {
        let mut doc = Document::default();
        doc.section_entry("Window", NameMatch::IgnoreAsciiCase)
            .upsert("Width", Some("800"), NameMatch::IgnoreAsciiCase);

        assert_eq!(
            doc.value("window", "WIDTH", NameMatch::IgnoreAsciiCase),
            Some("800")
        );
        assert_eq!(doc.sections[0].name, "Window");
        assert_eq!(doc.sections[0].entries[0].key, "Width");

        // Exact matching sees a different name.
        assert_eq!(doc.value("window", "Width", NameMatch::Exact), None);
    }

    #[test]
    fn upsert_preserves_position_and_spelling() {
        let rule = NameMatch::IgnoreAsciiCase;
        let mut sec = Section::new("UI");
        sec.upsert("First", Some("1"), rule);
        sec.upsert("Second", Some("2"), rule);
        sec.upsert("FIRST", Some("updated"), rule);

        assert_eq!(sec.entries.len(), 2);
        assert_eq!(sec.entries[0].key, "First");
        assert_eq!(sec.entries[0].value.as_deref(), Some("updated"));
        assert_eq!(sec.entries[1].key, "Second");
    }

    #[test]
    fn entry_render_distinguishes_empty_from_valueless() {
        let with_empty = Entry {
            key: "Flag".into(),
            value: Some(String::new()),
        };
        let valueless = Entry {
            key: "Flag".into(),
            value: None,
        };
        assert_eq!(with_empty.render(), "Flag=");
        assert_eq!(valueless.render(), "Flag");
    }

    #[test]
    fn name_checks_reject_unrepresentable_input() {
        assert!(check_section_name("UI").is_ok());
        assert!(check_section_name("with space inside").is_ok());
        assert_eq!(check_section_name(""), Err("empty"));
        assert_eq!(check_section_name(" padded "), Err("surrounding whitespace"));
        assert_eq!(check_section_name("a]b"), Err("contains ']'"));
        assert_eq!(check_section_name("a\nb"), Err("contains a line break"));

        assert!(check_key("MainFormSize").is_ok());
        assert_eq!(check_key(""), Err("empty"));
        assert_eq!(check_key("a=b"), Err("contains '='"));
        assert_eq!(check_key(" k"), Err("surrounding whitespace"));

        assert!(check_value("").is_ok());
        assert!(check_value("a=b, [brackets] fine").is_ok());
        assert_eq!(check_value("a\nb"), Err("contains a line break"));
        assert_eq!(check_value("a\0b"), Err("contains NUL"));
    }

    #[test]
    fn removing_last_entry_keeps_the_section() {
        let rule = NameMatch::default();
        let mut doc = Document::default();
        doc.section_entry("Colors", rule).upsert("Bg", Some("x"), rule);

        let sec = doc.section_mut("Colors", rule).unwrap();
        assert!(sec.remove("Bg", rule));
        assert!(sec.entries.is_empty());
        assert!(doc.section("Colors", rule).is_some());

        assert!(doc.remove_section("colors", rule));
        assert!(doc.section("Colors", rule).is_none());
    }
}
