//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create an ambari-config command bound to this test's conf dir.
    ///
    /// Colors are disabled and any ambient log filter or lib dir override
    /// is cleared.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd =
            Command::cargo_bin("ambari-config").expect("failed to find ambari-config binary");
        cmd.env("AMBARI_CONF_DIR", self.dir.path());
        cmd.env("AMBARI_SERVER_LIB", self.dir.path().join("lib"));
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("AMBARI_CONFIG_LOG");
        cmd.current_dir(self.dir.path());
        cmd
    }

    pub fn get(&self, key: &str) -> Output {
        self.cmd()
            .args(["get", key])
            .output()
            .expect("failed to run ambari-config get")
    }

    pub fn set(&self, key: &str, value: &str) -> Output {
        self.cmd()
            .args(["set", key, value])
            .output()
            .expect("failed to run ambari-config set")
    }

    pub fn unset(&self, key: &str) -> Output {
        self.cmd()
            .args(["unset", key])
            .output()
            .expect("failed to run ambari-config unset")
    }

    pub fn show(&self) -> Output {
        self.cmd()
            .arg("show")
            .output()
            .expect("failed to run ambari-config show")
    }

    pub fn show_json(&self) -> Output {
        self.cmd()
            .args(["show", "--json"])
            .output()
            .expect("failed to run ambari-config show --json")
    }

    pub fn db_type_json(&self) -> Output {
        self.cmd()
            .args(["db-type", "--json"])
            .output()
            .expect("failed to run ambari-config db-type --json")
    }

    /// `ambari-config encrypt-password` with `stdin` piped in.
    pub fn encrypt_password(&self, alias: &str, property: &str, stdin: &str) -> Output {
        self.cmd()
            .args(["encrypt-password", alias, "--property", property])
            .write_stdin(stdin)
            .output()
            .expect("failed to run ambari-config encrypt-password")
    }

    /// `ambari-config decrypt-password` with `stdin` piped in.
    pub fn decrypt_password(&self, property: &str, stdin: &str) -> Output {
        self.cmd()
            .args(["decrypt-password", property])
            .write_stdin(stdin)
            .output()
            .expect("failed to run ambari-config decrypt-password")
    }
}
