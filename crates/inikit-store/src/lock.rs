use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

static REGISTRY: OnceLock<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> = OnceLock::new();

/// One lock per distinct file path, shared by every store handle in the
/// process. Each store operation holds it across its whole load-mutate-save
/// sequence, so two handles on the same file cannot interleave and lose an
/// update.
pub(crate) fn path_lock(path: &Path) -> Arc<Mutex<()>> {
    let mut registry = REGISTRY
        .get_or_init(Mutex::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    registry.entry(lock_key(path)).or_default().clone()
}

/// Registry key for a path. The file itself may not exist yet (a fresh store
/// is created on first write), so the key canonicalizes the parent directory
/// and re-attaches the file name — stable across the file appearing later.
fn lock_key(path: &Path) -> PathBuf {
    if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
        if let Ok(dir) = parent.canonicalize() {
            return dir.join(name);
        }
    }
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
