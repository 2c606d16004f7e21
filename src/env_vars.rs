//! Build tool environment variable handling.

use std::env;

/// Get the build generator executable override (`CMAKE`).
pub fn cmake() -> Option<String> {
    env::var("CMAKE").ok()
}

/// Get the metadata tool executable override (`PKG_CONFIG`).
pub fn pkg_config() -> Option<String> {
    env::var("PKG_CONFIG").ok()
}

/// Get the C compiler override (`CC`).
pub fn cc() -> Option<String> {
    env::var("CC").ok()
}

/// Get the C++ compiler override (`CXX`).
pub fn cxx() -> Option<String> {
    env::var("CXX").ok()
}

/// Get extra C compiler flags (`CFLAGS`).
pub fn cflags() -> Option<String> {
    env::var("CFLAGS").ok()
}

/// Get extra C++ compiler flags (`CXXFLAGS`).
pub fn cxxflags() -> Option<String> {
    env::var("CXXFLAGS").ok()
}

/// Get extra linker flags (`LDFLAGS`).
pub fn ldflags() -> Option<String> {
    env::var("LDFLAGS").ok()
}
