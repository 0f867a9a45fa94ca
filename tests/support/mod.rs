//! Test support utilities for ambari-config integration tests.
//!
//! Provides an isolated configuration directory per test and helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test environment with an isolated configuration directory.
///
/// Child processes get the directory through `AMBARI_CONF_DIR`, so tests
/// never touch `/etc/ambari-server` and can run in parallel.
pub struct Test {
    /// Stands in for `/etc/ambari-server/conf`
    pub dir: TempDir,
}

impl Test {
    /// Create an environment without `ambari.properties`.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        Self { dir }
    }

    /// Create an environment with `ambari.properties` holding `contents`.
    pub fn with_properties(contents: &str) -> Self {
        let t = Self::new();
        t.write_properties(contents);
        t
    }

    pub fn properties_path(&self) -> PathBuf {
        self.dir.path().join("ambari.properties")
    }

    pub fn write_properties(&self, contents: &str) {
        fs::write(self.properties_path(), contents).expect("failed to write ambari.properties");
    }

    pub fn read_properties(&self) -> String {
        fs::read_to_string(self.properties_path()).expect("failed to read ambari.properties")
    }

    /// Install a fake JDK whose `java` emulates the credential provider,
    /// and point `java.home` at it. Returns the JDK home.
    #[cfg(unix)]
    pub fn install_fake_java(&self) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let home = self.dir.path().join("jdk");
        let bin = home.join("bin");
        fs::create_dir_all(&bin).expect("failed to create fake jdk");
        let java = bin.join("java");
        fs::write(&java, FAKE_CREDENTIAL_PROVIDER).expect("failed to write fake java");
        fs::set_permissions(&java, fs::Permissions::from_mode(0o755))
            .expect("failed to chmod fake java");

        let output = self.set("java.home", &home.to_string_lossy());
        assert_success(&output);
        home
    }
}
