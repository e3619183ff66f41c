use inikit_model::Document;

/// Serialize a document to its canonical on-disk text.
///
/// One `[name]` header per section with a blank line before every header
/// except the first, then one line per entry in insertion order. Empty
/// sections keep their header — removing the last entry of a section must
/// not remove the section from disk.
pub fn render(doc: &Document) -> String {
    let mut out = String::new();
    for (i, section) in doc.sections.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push('[');
        out.push_str(&section.name);
        out.push_str("]\n");
        for entry in &section.entries {
            out.push_str(&entry.render());
            out.push('\n');
        }
    }
    out
}
