//! Shared test utilities for E2E tests.
//!
//! This module provides common fixtures and helper functions to reduce
//! duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_file("a.h", "int a;\n");
//!     fixture.command().arg("a.h").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::sources;
    pub use super::TestFixture;
}

/// Small C++ sources used across tests.
#[allow(dead_code)]
pub mod sources {
    /// Includes `util.h` and a system header.
    pub const MAIN_CPP: &str = "#include \"util.h\"\n#include <vector>\n\nint main() { return util(); }\n";

    /// A header with a compile-once marker.
    pub const UTIL_H: &str = "#pragma once\n#include <vector>\n\nint util();\n";

    /// Merged output of `MAIN_CPP` and `UTIL_H`.
    pub const MERGED: &str =
        "#pragma once\n#include <vector>\n\nint util();\n\nint main() { return util(); }\n";
}

/// A test fixture that provides a temporary directory of source files.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_file("src/main.cpp", sources::MAIN_CPP)
///     .with_file("src/util.h", sources::UTIL_H);
///
/// fixture
///     .command()
///     .args(["src/main.cpp", "src/util.h"])
///     .assert()
///     .success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a `.amalgamate.yaml` project file with the given content.
    #[allow(dead_code)]
    pub fn with_project(self, content: &str) -> Self {
        self.with_file(".amalgamate.yaml", content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Add a binary file with the given path and content.
    #[allow(dead_code)]
    pub fn with_binary_file(self, path: &str, content: &[u8]) -> Self {
        self.temp_dir
            .child(path)
            .write_binary(content)
            .expect("Failed to write binary file");
        self
    }

    /// The standard two-file program from [`sources`].
    #[allow(dead_code)]
    pub fn with_program(self) -> Self {
        self.with_file("main.cpp", sources::MAIN_CPP)
            .with_file("util.h", sources::UTIL_H)
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Read a file from the temp directory.
    #[allow(dead_code)]
    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.path().join(path)).expect("Failed to read file")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixture {
    /// Create a command configured to run in this fixture's directory.
    ///
    /// `AMALGAMATE_CONFIG` and `RUST_LOG` are cleared so the developer's
    /// environment cannot leak into the run.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("amalgamate");
        cmd.current_dir(self.path())
            .env_remove("AMALGAMATE_CONFIG")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_nested_file() {
        let fixture = TestFixture::new().with_file("src/detail/a.h", "int a;\n");
        assert_eq!(fixture.read("src/detail/a.h"), "int a;\n");
    }
}
