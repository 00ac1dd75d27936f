// tests/icon_resolver.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use apprelay::fs::mock::MockFileSystem;
use apprelay::icon::resolver::is_icon_file;
use apprelay::icon::{Icon, IconOrigin, IconResolver};
use apprelay_test_utils::fakes::RecordingIconBackend;

const ICO_BYTES: &[u8] = &[0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x10, 0x10];
const PROGRAM: &str = "/opt/apprelay/bin/apprelay";

fn setup() -> (MockFileSystem, RecordingIconBackend) {
    let fs = MockFileSystem::new();
    let backend = RecordingIconBackend::new(Arc::new(fs.clone()));
    (fs, backend)
}

fn resolve(
    fs: &MockFileSystem,
    backend: &RecordingIconBackend,
    icon: Option<&str>,
    primary: &str,
) -> Icon {
    IconResolver::new(backend, fs).resolve(icon.map(Path::new), primary)
}

#[test]
fn configured_ico_file_is_loaded_directly() {
    let (fs, backend) = setup();
    fs.add_file("/icons/app.ico", ICO_BYTES);
    fs.add_file("/apps/tool", b"binary".to_vec());

    let icon = resolve(&fs, &backend, Some("/icons/app.ico"), "/apps/tool --x");
    assert_eq!(
        icon.origin(),
        Some(&IconOrigin::IconFile(PathBuf::from("/icons/app.ico")))
    );
}

#[test]
fn icon_extension_match_is_case_insensitive() {
    assert!(is_icon_file(Path::new("C:/icons/APP.ICO")));
    assert!(is_icon_file(Path::new("app.Ico")));
    assert!(!is_icon_file(Path::new("app.exe")));
    assert!(!is_icon_file(Path::new("ico")));
}

#[test]
fn configured_non_icon_file_uses_its_associated_icon() {
    let (fs, backend) = setup();
    fs.add_file("/links/Game.lnk", b"shortcut".to_vec());

    let icon = resolve(&fs, &backend, Some("/links/Game.lnk"), "/apps/tool");
    assert_eq!(
        icon.origin(),
        Some(&IconOrigin::Associated(PathBuf::from("/links/Game.lnk")))
    );
}

#[test]
fn corrupt_icon_falls_through_to_primary_executable() {
    let (fs, backend) = setup();
    fs.add_file("/icons/broken.ico", b"not an icon".to_vec());
    fs.add_file("/apps/My Tool/run", b"binary".to_vec());

    let icon = resolve(
        &fs,
        &backend,
        Some("/icons/broken.ico"),
        r#""/apps/My Tool/run" --fast"#,
    );
    assert_eq!(
        icon.origin(),
        Some(&IconOrigin::Associated(PathBuf::from("/apps/My Tool/run")))
    );
}

#[test]
fn missing_icon_path_falls_through_to_primary_executable() {
    let (fs, backend) = setup();
    fs.add_file("/apps/tool", b"binary".to_vec());

    let icon = resolve(&fs, &backend, Some("/icons/none.ico"), "/apps/tool -v");
    assert_eq!(
        icon.origin(),
        Some(&IconOrigin::Associated(PathBuf::from("/apps/tool")))
    );
}

#[test]
fn missing_primary_falls_back_to_program_icon() {
    let (fs, backend) = setup();
    fs.add_file(PROGRAM, b"binary".to_vec());
    fs.set_current_exe(PROGRAM);

    let icon = resolve(&fs, &backend, None, r"C:\nowhere\a.exe --flag");
    assert_eq!(
        icon.origin(),
        Some(&IconOrigin::Associated(PathBuf::from(PROGRAM)))
    );
}

#[test]
fn everything_missing_resolves_to_builtin() {
    let (fs, backend) = setup();

    let icon = resolve(&fs, &backend, Some("/icons/none.ico"), "/nowhere/a");
    assert_eq!(icon, Icon::Builtin);
    assert!(!icon.is_owned());

    // Program path known but the file is gone: still builtin.
    fs.set_current_exe(PROGRAM);
    let icon = resolve(&fs, &backend, None, "");
    assert_eq!(icon, Icon::Builtin);
}

#[test]
fn only_owned_icons_are_released() {
    let (fs, backend) = setup();
    fs.add_file("/icons/app.ico", ICO_BYTES);

    resolve(&fs, &backend, None, "/nowhere/a").release(&backend);
    assert!(backend.released().is_empty());

    resolve(&fs, &backend, Some("/icons/app.ico"), "/nowhere/a").release(&backend);
    assert_eq!(
        backend.released(),
        vec![IconOrigin::IconFile(PathBuf::from("/icons/app.ico"))]
    );
}
