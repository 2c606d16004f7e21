//! Shared test helpers and fixtures

use std::fs;
use std::path::{Path, PathBuf};

/// Create an empty file, creating parent directories as needed.
#[allow(dead_code)]
pub(crate) fn write_file(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directories");
    }
    fs::write(path, "").expect("Failed to write file");
}

/// Create a conventional dependency install tree under `base`:
///
/// ```text
/// base/<root>/bin/<name>.dll
/// base/<root>/include/<name>.h
/// base/<root>/lib/<arch>/<name>.lib
/// ```
///
/// Returns the install root. The `bin` directory is what lands on the
/// search path.
#[allow(dead_code)]
pub(crate) fn create_install_tree(base: &Path, root: &str, name: &str, arch: &str) -> PathBuf {
    let root_dir = base.join(root);
    write_file(&root_dir.join("bin").join(format!("{name}.dll")));
    write_file(&root_dir.join("include").join(format!("{name}.h")));
    write_file(&root_dir.join("lib").join(arch).join(format!("{name}.lib")));
    root_dir
}

/// Write an executable shell script standing in for an external tool.
#[cfg(unix)]
#[allow(dead_code)]
pub(crate) fn stub_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write stub tool");

    let mut perms = fs::metadata(&path).expect("Failed to stat stub tool").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("Failed to chmod stub tool");

    path
}
