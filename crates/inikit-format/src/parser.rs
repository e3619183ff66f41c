use inikit_model::{Document, Entry, NameMatch, Section};

/// Parse profile text with the default name-comparison rule.
pub fn parse_str(src: &str) -> Document {
    parse_with(src, NameMatch::default())
}

/// Parse profile text into a `Document`.
///
/// Never fails. Rules, in order:
/// - `[name]` starts a section; the name is everything up to the first `]`,
///   trimmed. A `[`-led line with no closing `]` is an ordinary entry line.
/// - an entry line splits at the FIRST `=`; the key is trimmed, the value is
///   kept as written. A non-blank line without `=` is a valueless entry.
/// - blank lines and lines before the first section header are skipped.
/// - duplicate sections merge into the first occurrence; duplicate keys
///   within a section keep the first occurrence. Parsing normalizes toward
///   the model invariants, so serialize-parse-serialize is a fixed point.
pub fn parse_with(src: &str, rule: NameMatch) -> Document {
    let mut doc = Document::default();
    let mut current: Option<usize> = None;

    for raw in src.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(name) = header_name(line) {
            if name.is_empty() {
                tracing::debug!(line = raw, "skipping section header with empty name");
                continue;
            }
            let idx = match doc.sections.iter().position(|s| rule.matches(&s.name, name)) {
                Some(i) => i,
                None => {
                    doc.sections.push(Section::new(name));
                    doc.sections.len() - 1
                }
            };
            current = Some(idx);
            continue;
        }

        let Some(idx) = current else {
            tracing::debug!(line = raw, "skipping entry before first section header");
            continue;
        };

        let (key, value) = split_entry(line);
        if key.is_empty() {
            tracing::debug!(line = raw, "skipping entry with empty key");
            continue;
        }
        let section = &mut doc.sections[idx];
        if section.entry(key, rule).is_none() {
            section.entries.push(Entry {
                key: key.to_owned(),
                value: value.map(str::to_owned),
            });
        }
    }

    doc
}

/// `[name]` with the name running up to the first `]`. Returns `None` when
/// the line is not a well-formed header.
fn header_name(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('[')?;
    let end = rest.find(']')?;
    Some(rest[..end].trim())
}

/// Split an entry line at the first `=`. `None` value means the line had no
/// separator at all (the legacy valueless-entry case).
fn split_entry(line: &str) -> (&str, Option<&str>) {
    match line.split_once('=') {
        Some((key, value)) => (key.trim(), Some(value)),
        None => (line, None),
    }
}
