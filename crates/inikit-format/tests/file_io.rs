//! ProfileFile load/save against the real filesystem.

use inikit_format::{ProfileError, ProfileFile};
use inikit_model::NameMatch;

#[test]
fn missing_file_loads_as_empty_document() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let path = dir.path().join("absent.ini");

    let file = ProfileFile::load(&path).expect("missing file is not an error");
    assert!(file.doc.sections.is_empty());
}

#[test]
fn unreadable_existing_path_is_a_read_error() {
    // A directory exists at the path but cannot be read as a file.
    let dir = tempfile::tempdir().expect("create tempdir");
    let err = ProfileFile::load(dir.path()).expect_err("directory should not load");
    assert!(matches!(err, ProfileError::Read { .. }), "got: {err}");
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let path = dir.path().join("settings.ini");
    let rule = NameMatch::default();

    let mut file = ProfileFile::load(&path).expect("load");
    file.doc
        .section_entry("Window", rule)
        .upsert("Width", Some("800"), rule);
    file.save().expect("save");

    let reloaded = ProfileFile::load(&path).expect("reload");
    assert_eq!(reloaded.doc.value("Window", "Width", rule), Some("800"));
}

#[test]
fn save_into_missing_directory_is_a_write_error() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let path = dir.path().join("no_such_dir").join("settings.ini");

    let mut file = ProfileFile::load(&path).expect("load");
    file.doc.section_entry("S", NameMatch::default());
    let err = file.save().expect_err("save should fail");
    assert!(matches!(err, ProfileError::Write { .. }), "got: {err}");
}

#[cfg(unix)]
#[test]
fn failed_save_leaves_previous_content_intact() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().expect("create tempdir");
    let path = dir.path().join("settings.ini");
    std::fs::write(&path, "[Keep]\nk=v\n").expect("seed file");

    let rule = NameMatch::default();
    let mut file = ProfileFile::load(&path).expect("load");
    file.doc.section_entry("New", rule).upsert("x", Some("1"), rule);

    // A read-only directory makes the sibling temp file uncreatable, so the
    // save fails before the target is ever touched.
    std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(0o555))
        .expect("make dir read-only");
    if std::fs::write(dir.path().join("canary"), b"x").is_ok() {
        // Running with privileges that bypass permission bits (root);
        // the failure cannot be provoked this way, nothing to assert.
        std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(0o755))
            .expect("restore permissions");
        return;
    }

    let err = file.save().expect_err("save into read-only dir should fail");
    assert!(matches!(err, ProfileError::Write { .. }), "got: {err}");

    std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(0o755))
        .expect("restore permissions");
    assert_eq!(
        std::fs::read_to_string(&path).expect("read back"),
        "[Keep]\nk=v\n",
        "a failed save must not corrupt the previous file"
    );
}

#[test]
fn save_replaces_previous_content_entirely() {
    let dir = tempfile::tempdir().expect("create tempdir");
    let path = dir.path().join("settings.ini");
    std::fs::write(&path, "[Old]\nstale=1\n").expect("seed file");

    let rule = NameMatch::default();
    let mut file = ProfileFile::load(&path).expect("load");
    file.doc.remove_section("Old", rule);
    file.doc.section_entry("New", rule).upsert("k", Some("v"), rule);
    file.save().expect("save");

    let text = std::fs::read_to_string(&path).expect("read back");
    assert_eq!(text, "[New]\nk=v\n");
}
