//! Metadata-tool dependency resolution against stub pkg-config scripts.

#![cfg(unix)]

mod common;

use common::stub_tool;
use extforge::{ExtensionDescriptor, PosixDependencyResolver};
use std::path::PathBuf;
use tempfile::TempDir;

fn descriptor() -> ExtensionDescriptor {
    ExtensionDescriptor::new("pkg._native", ".")
}

#[test]
fn parses_tool_output_into_descriptor_fields() {
    let temp = TempDir::new().unwrap();
    let tool = stub_tool(
        temp.path(),
        "pkg-config",
        r#"echo "-I/usr/include/foo -L/usr/lib -lfoo""#,
    );

    let resolver = PosixDependencyResolver::with_tool(tool.to_string_lossy());
    let mut desc = descriptor();
    resolver.resolve("foo", &mut desc).unwrap();

    assert_eq!(desc.include_dirs(), [PathBuf::from("/usr/include/foo")]);
    assert_eq!(desc.library_dirs(), [PathBuf::from("/usr/lib")]);
    assert_eq!(desc.libraries(), ["foo"]);
}

#[test]
fn unrecognized_flags_are_ignored() {
    let temp = TempDir::new().unwrap();
    let tool = stub_tool(
        temp.path(),
        "pkg-config",
        r#"echo "-pthread -I/usr/include/turbojpeg -lturbojpeg -Wl,-rpath""#,
    );

    let resolver = PosixDependencyResolver::with_tool(tool.to_string_lossy());
    let mut desc = descriptor();
    resolver.resolve("libturbojpeg", &mut desc).unwrap();

    assert_eq!(desc.include_dirs(), [PathBuf::from("/usr/include/turbojpeg")]);
    assert!(desc.library_dirs().is_empty());
    assert_eq!(desc.libraries(), ["turbojpeg"]);
}

#[test]
fn not_found_marker_is_dependency_not_found() {
    let temp = TempDir::new().unwrap();
    let tool = stub_tool(
        temp.path(),
        "pkg-config",
        r#"echo "Package nope was not found in the pkg-config search path." >&2"#,
    );

    let resolver = PosixDependencyResolver::with_tool(tool.to_string_lossy());
    let mut desc = descriptor();
    let err = resolver.resolve("nope", &mut desc).unwrap_err();

    assert!(err.to_string().contains("nope"));
    assert!(desc.include_dirs().is_empty());
}

#[test]
fn unrunnable_tool_is_dependency_not_found() {
    let resolver = PosixDependencyResolver::with_tool("/nonexistent/pkg-config");
    let mut desc = descriptor();

    let err = resolver.resolve("opencv4", &mut desc).unwrap_err();
    assert!(err.to_string().contains("opencv4"));
}

#[test]
fn fallback_alternative_is_tried_after_primary_fails() {
    let temp = TempDir::new().unwrap();
    // Knows opencv but not opencv4, like a host with only the older name.
    let tool = stub_tool(
        temp.path(),
        "pkg-config",
        r#"case "$3" in
  opencv) echo "-I/usr/include/opencv -lopencv_core" ;;
  *) echo "Package $3 was not found in the pkg-config search path." >&2 ;;
esac"#,
    );

    let resolver = PosixDependencyResolver::with_tool(tool.to_string_lossy());

    let mut desc = descriptor();
    assert!(resolver.resolve("opencv4", &mut desc).is_err());

    let mut desc = descriptor();
    resolver.resolve("opencv", &mut desc).unwrap();
    assert_eq!(desc.include_dirs(), [PathBuf::from("/usr/include/opencv")]);
    assert_eq!(desc.libraries(), ["opencv_core"]);
}
