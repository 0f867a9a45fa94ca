//! Tests for `ambari-config encryption/encrypt-password/decrypt-password`.
//!
//! The credential provider is replaced by a shell script, so the
//! encryption round trips only run on Unix.

use crate::support::*;
use predicates::prelude::*;

const ENCRYPTION_ON: &str = "security.passwords.encryption.enabled=true\n";

#[test]
fn test_encryption_status_disabled() {
    let t = Test::with_properties("server.jdbc.user.passwd=/etc/ambari-server/conf/password.dat\n");

    t.cmd()
        .arg("encryption")
        .assert()
        .success()
        .stdout(predicate::str::contains("enabled  false"))
        .stdout(predicate::str::contains("not persisted"))
        .stdout(predicate::str::contains("server.jdbc.user.passwd  plain"))
        .stdout(predicate::str::contains("ssl.trustStore.password  unset"));
}

#[test]
fn test_encryption_status_persisted_key() {
    let t = Test::with_properties(ENCRYPTION_ON);
    let keys = t.dir.path().join("keys");
    std::fs::create_dir_all(&keys).unwrap();
    std::fs::write(keys.join("master"), "key").unwrap();
    assert_success(&t.set("security.server.keys_dir", &keys.to_string_lossy()));

    t.cmd()
        .arg("encryption")
        .assert()
        .success()
        .stdout(predicate::str::contains("enabled  true"))
        .stdout(predicate::str::contains(keys.join("master").to_string_lossy()))
        .stdout(predicate::str::contains(
            keys.join("credentials.jceks").to_string_lossy(),
        ));
}

#[test]
fn test_decrypt_disabled_returns_value() {
    let t = Test::with_properties("ssl.trustStore.password=${alias=ambari.ssl.trustStore.password}\n");

    let output = t.decrypt_password("ssl.trustStore.password", "");
    assert_success(&output);
    assert_eq!(stdout(&output), "${alias=ambari.ssl.trustStore.password}\n");
}

#[test]
fn test_decrypt_reads_password_file() {
    let t = Test::with_properties("");
    let file = t.dir.path().join("password.dat");
    std::fs::write(&file, "bigdata").unwrap();
    assert_success(&t.set("server.jdbc.user.passwd", &file.to_string_lossy()));

    let output = t.decrypt_password("server.jdbc.user.passwd", "");
    assert_success(&output);
    assert_eq!(stdout(&output), "bigdata\n");
}

#[test]
fn test_encrypt_disabled_writes_password_file() {
    let t = Test::with_properties("");

    let output = t.encrypt_password("ambari.db.password", "server.jdbc.user.passwd", "bigdata\n");
    assert_success(&output);
    assert_stderr_contains(&output, "not enabled");

    let file = t.dir.path().join("password.dat");
    assert_eq!(std::fs::read_to_string(&file).unwrap(), "bigdata");
    assert_stdout_contains(&t.get("server.jdbc.user.passwd"), &file.to_string_lossy());

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&file).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o660);
    }
}

#[test]
fn test_encrypt_enabled_without_jdk_fails() {
    let t = Test::with_properties(ENCRYPTION_ON);

    t.cmd()
        .args(["encrypt-password", "ambari.db.password"])
        .env("PATH", "")
        .write_stdin("bigdata\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no JDK found"))
        .stderr(predicate::str::contains("java.home"));
}

#[cfg(unix)]
mod with_provider {
    use super::*;

    #[test]
    fn test_encrypt_then_decrypt_with_typed_key() {
        let t = Test::with_properties(ENCRYPTION_ON);
        t.install_fake_java();

        // password, then master key
        let output = t.encrypt_password(
            "ambari.db.password",
            "server.jdbc.user.passwd",
            "bigdata\nmaster-key\n",
        );
        assert_success(&output);
        assert_stdout_contains(&output, "stored ambari.db.password");

        let output = t.get("server.jdbc.user.passwd");
        assert_eq!(stdout(&output), "${alias=ambari.db.password}\n");
        assert!(!t.dir.path().join("password.dat").exists());

        let output = t.decrypt_password("server.jdbc.user.passwd", "master-key\n");
        assert_success(&output);
        assert_eq!(stdout(&output), "bigdata\n");
    }

    #[test]
    fn test_decrypt_reprompts_on_wrong_key() {
        let t = Test::with_properties(ENCRYPTION_ON);
        t.install_fake_java();
        assert_success(&t.encrypt_password(
            "ambari.db.password",
            "server.jdbc.user.passwd",
            "bigdata\nright\n",
        ));

        let output = t.decrypt_password("server.jdbc.user.passwd", "wrong\nright\n");
        assert_success(&output);
        assert_stderr_contains(&output, "Master key does not match");
        assert_eq!(stdout(&output), "bigdata\n");
    }

    #[test]
    fn test_decrypt_interrupted_when_input_ends() {
        let t = Test::with_properties(ENCRYPTION_ON);
        t.install_fake_java();
        assert_success(&t.encrypt_password(
            "ambari.db.password",
            "server.jdbc.user.passwd",
            "bigdata\nright\n",
        ));

        // Every key is wrong; the prompt keeps asking until stdin is empty
        let output = t.decrypt_password("server.jdbc.user.passwd", "wrong\n");
        assert_failure(&output);
    }

    #[test]
    fn test_persisted_key_skips_prompt() {
        let t = Test::with_properties(ENCRYPTION_ON);
        t.install_fake_java();
        let keys = t.dir.path().join("keys");
        std::fs::create_dir_all(&keys).unwrap();
        std::fs::write(keys.join("master"), "persisted").unwrap();
        assert_success(&t.set("security.master.key.location", &keys.to_string_lossy()));

        // Only the password is read; the provider receives "None"
        assert_success(&t.encrypt_password(
            "ambari.ssl.trustStore.password",
            "ssl.trustStore.password",
            "changeit\n",
        ));
        assert_eq!(
            stdout(&t.get("ssl.trustStore.password")),
            "${alias=ambari.ssl.trustStore.password}\n"
        );

        let output = t.decrypt_password("ssl.trustStore.password", "");
        assert_success(&output);
        assert_eq!(stdout(&output), "changeit\n");
    }

    #[test]
    fn test_decrypt_unknown_alias_fails() {
        let t = Test::with_properties(ENCRYPTION_ON);
        t.install_fake_java();
        assert_success(&t.set("ssl.trustStore.password", "${alias=never.stored}"));

        let output = t.decrypt_password("ssl.trustStore.password", "\n");
        assert_failure(&output);
        assert_stderr_contains(&output, "unable to read password from store");
    }

    #[test]
    fn test_encrypt_store_failure_keeps_literal() {
        let t = Test::with_properties(ENCRYPTION_ON);
        t.install_fake_java();
        // A plain file where the provider expects its store directory
        std::fs::write(t.dir.path().join("jdk").join("store"), "").unwrap();

        let output = t.encrypt_password(
            "ambari.ssl.trustStore.password",
            "ssl.trustStore.password",
            "changeit\nmaster-key\n",
        );
        assert_success(&output);
        assert_eq!(stderr(&output).matches("failed to save secure password").count(), 1);
        assert_stdout_excludes(&output, "stored");
        assert_eq!(stdout(&t.get("ssl.trustStore.password")), "changeit\n");
    }
}
