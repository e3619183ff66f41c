use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use inikit_format::{ProfileError, ProfileFile};
use inikit_model::{Document, Entry, NameMatch};

use crate::codec::{Color, Point, Size};
use crate::lock::path_lock;

/// Persistent key-value store over one profile file.
///
/// Every operation runs a full load → (mutate → save) sequence under the
/// per-path lock, so each call observes the current file and every mutation
/// is persisted before the call returns. There is no separate save step and
/// no write buffering across calls.
pub struct ProfileStore {
    path: PathBuf,
    rule: NameMatch,
    lock: Arc<Mutex<()>>,
}

impl ProfileStore {
    /// Open a store over `path`. A missing file is an empty store; an
    /// existing file that cannot be read is an error up front.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ProfileError> {
        let path = path.into();
        ProfileFile::load(&path)?;
        Ok(Self {
            lock: path_lock(&path),
            path,
            rule: NameMatch::default(),
        })
    }

    /// Open a store over the conventional path: the running executable's
    /// directory and base name, with an `.ini` extension.
    pub fn open_default() -> Result<Self, ProfileError> {
        let exe = std::env::current_exe().map_err(|source| ProfileError::Resolve { source })?;
        Self::open(exe.with_extension("ini"))
    }

    /// Override the name-comparison rule (default: case-insensitive).
    pub fn with_name_match(mut self, rule: NameMatch) -> Self {
        self.rule = rule;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        // A panic while holding the lock must not wedge the path forever.
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn load(&self) -> Result<ProfileFile, ProfileError> {
        ProfileFile::load_with(&self.path, self.rule)
    }

    // ======= strict tier =======

    /// Stored value, or `None` when the entry is absent OR its value is
    /// empty/all-whitespace. The legacy format cannot distinguish "absent"
    /// from "stored blank", so both read as absent. Never mutates.
    pub fn try_get(&self, section: &str, key: &str) -> Result<Option<String>, ProfileError> {
        let _guard = self.guard();
        let file = self.load()?;
        Ok(non_blank(file.doc.value(section, key, self.rule)).map(str::to_owned))
    }

    /// `try_get`, but a miss writes `default` back to the file and returns
    /// it. The write-back is the point: config self-initializes on first
    /// read, and the next reader sees the value on disk. Because of the
    /// potential write, names and default are validated like in `try_set`.
    pub fn try_get_or_default(
        &self,
        section: &str,
        key: &str,
        default: &str,
    ) -> Result<String, ProfileError> {
        validate(section, key, default)?;
        let _guard = self.guard();
        let mut file = self.load()?;
        match non_blank(file.doc.value(section, key, self.rule)) {
            Some(value) => Ok(value.to_owned()),
            None => {
                file.doc
                    .section_entry(section, self.rule)
                    .upsert(key, Some(default), self.rule);
                file.save()?;
                Ok(default.to_owned())
            }
        }
    }

    /// Upsert one entry, creating the section on demand. The value may be
    /// empty. Persists before returning.
    ///
    /// Input the format cannot round-trip is rejected before anything
    /// touches the disk: an empty or whitespace-edged section/key, `]` in a
    /// section name, `=` in a key, a line break anywhere. Writing such text
    /// would reparse as different entries on the next load.
    pub fn try_set(&self, section: &str, key: &str, value: &str) -> Result<(), ProfileError> {
        validate(section, key, value)?;
        let _guard = self.guard();
        let mut file = self.load()?;
        file.doc
            .section_entry(section, self.rule)
            .upsert(key, Some(value), self.rule);
        file.save()
    }

    /// Remove one entry. No-op if absent. The section stays, even when this
    /// leaves it empty — only `try_remove_section` deletes a header.
    pub fn try_remove_entry(&self, section: &str, key: &str) -> Result<(), ProfileError> {
        let _guard = self.guard();
        let mut file = self.load()?;
        let removed = file
            .doc
            .section_mut(section, self.rule)
            .map(|s| s.remove(key, self.rule))
            .unwrap_or(false);
        if removed {
            file.save()?;
        }
        Ok(())
    }

    /// Remove a whole section and all its entries. No-op if absent.
    pub fn try_remove_section(&self, section: &str) -> Result<(), ProfileError> {
        let _guard = self.guard();
        let mut file = self.load()?;
        if file.doc.remove_section(section, self.rule) {
            file.save()?;
        }
        Ok(())
    }

    /// Whether `try_get` would return a value.
    pub fn try_exists(&self, section: &str, key: &str) -> Result<bool, ProfileError> {
        Ok(self.try_get(section, key)?.is_some())
    }

    /// Section names in file order. Empty store yields an empty vec.
    pub fn try_sections(&self) -> Result<Vec<String>, ProfileError> {
        let _guard = self.guard();
        let file = self.load()?;
        Ok(file.doc.sections.iter().map(|s| s.name.clone()).collect())
    }

    /// Raw entry lines of one section, in insertion order: `key=value`,
    /// `key=`, or bare `key`. The caller can tell an empty-valued entry from
    /// a valueless (disabled) one by the presence of `=`. Unknown section
    /// yields an empty vec.
    pub fn try_entries(&self, section: &str) -> Result<Vec<String>, ProfileError> {
        let _guard = self.guard();
        let file = self.load()?;
        Ok(file
            .doc
            .section(section, self.rule)
            .map(|s| s.entries.iter().map(Entry::render).collect())
            .unwrap_or_default())
    }

    /// Snapshot of the whole document, for enumeration-style consumers.
    pub fn try_document(&self) -> Result<Document, ProfileError> {
        let _guard = self.guard();
        Ok(self.load()?.doc)
    }

    // ======= convenience tier (legacy contract: log and degrade) =======

    pub fn get(&self, section: &str, key: &str) -> Option<String> {
        self.try_get(section, key).unwrap_or_else(|err| {
            tracing::warn!(%err, section, key, "profile read failed, treating as absent");
            None
        })
    }

    pub fn get_or_default(&self, section: &str, key: &str, default: &str) -> String {
        self.try_get_or_default(section, key, default)
            .unwrap_or_else(|err| {
                tracing::warn!(%err, section, key, "profile read failed, using default");
                default.to_owned()
            })
    }

    pub fn set(&self, section: &str, key: &str, value: &str) {
        if let Err(err) = self.try_set(section, key, value) {
            tracing::warn!(%err, section, key, "profile write failed, value dropped");
        }
    }

    pub fn remove_entry(&self, section: &str, key: &str) {
        if let Err(err) = self.try_remove_entry(section, key) {
            tracing::warn!(%err, section, key, "profile write failed, entry not removed");
        }
    }

    pub fn remove_section(&self, section: &str) {
        if let Err(err) = self.try_remove_section(section) {
            tracing::warn!(%err, section, "profile write failed, section not removed");
        }
    }

    pub fn exists(&self, section: &str, key: &str) -> bool {
        self.get(section, key).is_some()
    }

    pub fn sections(&self) -> Vec<String> {
        self.try_sections().unwrap_or_else(|err| {
            tracing::warn!(%err, "profile read failed, no sections");
            Vec::new()
        })
    }

    pub fn entries(&self, section: &str) -> Vec<String> {
        self.try_entries(section).unwrap_or_else(|err| {
            tracing::warn!(%err, section, "profile read failed, no entries");
            Vec::new()
        })
    }

    // ======= typed helpers =======

    /// Decode a stored point, falling back per component; an absent or blank
    /// entry yields the fallback unchanged.
    pub fn get_point(&self, section: &str, key: &str, fallback: Point) -> Point {
        match self.get(section, key) {
            Some(text) => Point::decode(&text, fallback),
            None => fallback,
        }
    }

    pub fn set_point(&self, section: &str, key: &str, point: Point) {
        self.set(section, key, &point.to_string());
    }

    pub fn get_size(&self, section: &str, key: &str, fallback: Size) -> Size {
        match self.get(section, key) {
            Some(text) => Size::decode(&text, fallback),
            None => fallback,
        }
    }

    pub fn set_size(&self, section: &str, key: &str, size: Size) {
        self.set(section, key, &size.to_string());
    }

    /// Decode a stored color. `None` only when the entry is absent/blank;
    /// a malformed stored value still decodes (with zeroed channels).
    pub fn get_color(&self, section: &str, key: &str) -> Option<Color> {
        self.get(section, key).map(|text| Color::decode(&text))
    }

    pub fn set_color(&self, section: &str, key: &str, color: Color) {
        self.set(section, key, &color.to_string());
    }

    /// Color twin of `get_or_default`: a miss writes the encoded default
    /// back and returns it. A present-but-malformed value decodes with the
    /// per-channel-zero rule — it does NOT fall back to `default`.
    pub fn get_color_or_default(&self, section: &str, key: &str, default: Color) -> Color {
        Color::decode(&self.get_or_default(section, key, &default.to_string()))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Guard for the mutating operations. Lookups need no check: an invalid
/// name can never exist on disk, so a get or remove with one is a plain
/// miss.
fn validate(section: &str, key: &str, value: &str) -> Result<(), ProfileError> {
    inikit_model::check_section_name(section).map_err(|reason| ProfileError::InvalidSection {
        name: section.to_owned(),
        reason,
    })?;
    inikit_model::check_key(key).map_err(|reason| ProfileError::InvalidKey {
        key: key.to_owned(),
        reason,
    })?;
    inikit_model::check_value(value).map_err(|reason| ProfileError::InvalidValue {
        value: value.to_owned(),
        reason,
    })?;
    Ok(())
}
