//! Tests for `ambari-config show/get/set/unset`.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_set_and_get_roundtrip() {
    let t = Test::with_properties("a=1\n");

    let output = t.set("server.jdbc.port", "5432");
    assert_success(&output);
    assert_stdout_contains(&output, "server.jdbc.port");

    let output = t.get("server.jdbc.port");
    assert_success(&output);
    assert_eq!(stdout(&output), "5432\n");
}

#[test]
fn test_set_keeps_order_and_unrelated_keys() {
    let t = Test::with_properties("a=1\nb=2\nc=3\n");

    assert_success(&t.set("b", "20"));
    assert_success(&t.set("d", "4"));

    assert_eq!(t.read_properties(), "a=1\nb=20\nc=3\nd=4\n");
}

#[test]
fn test_set_value_with_line_break_stays_one_entry() {
    let t = Test::with_properties("a=1\n");

    assert_success(&t.set("a", "x\nsecurity.passwords.encryption.enabled=true"));
    assert_success(&t.set("t", " lead"));

    assert_eq!(
        t.read_properties(),
        "a=x\\nsecurity.passwords.encryption.enabled=true\nt=\\ lead\n"
    );
    assert_failure(&t.get("security.passwords.encryption.enabled"));
    assert_eq!(stdout(&t.get("t")), " lead\n");
}

#[test]
fn test_get_missing_key_fails() {
    let t = Test::with_properties("a=1\n");

    let output = t.get("nope");
    assert_failure(&output);
    assert_stderr_contains(&output, "property not set: nope");
}

#[test]
fn test_unset() {
    let t = Test::with_properties("a=1\nb=2\n");

    assert_success(&t.unset("a"));
    assert_eq!(t.read_properties(), "b=2\n");

    assert_failure(&t.unset("a"));
}

#[test]
fn test_show_lists_properties_in_order() {
    let t = Test::with_properties("# comment\nz=26\na=1\n");

    let output = t.show();
    assert_success(&output);
    assert_eq!(stdout(&output), "z=26\na=1\n");
}

#[test]
fn test_show_masks_literal_passwords() {
    let t = Test::with_properties(
        "ssl.trustStore.password=changeit\n\
         authentication.ldap.managerPassword=${alias=ambari.ldap.manager.password}\n",
    );

    let output = t.show();
    assert_success(&output);
    assert_stdout_excludes(&output, "changeit");
    assert_stdout_contains(&output, "ssl.trustStore.password=*****");
    assert_stdout_contains(&output, "${alias=ambari.ldap.manager.password}");

    // get prints the raw value
    let output = t.get("ssl.trustStore.password");
    assert_stdout_contains(&output, "changeit");
}

#[test]
fn test_show_json() {
    let t = Test::with_properties("a=1\nb=two\n");

    let output = t.show_json();
    assert_success(&output);
    let json = stdout_json(&output);
    assert_eq!(json["a"], "1");
    assert_eq!(json["b"], "two");
}

#[test]
fn test_show_empty() {
    let t = Test::with_properties("");

    t.cmd()
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("no properties set"));
}

#[test]
fn test_missing_properties_file() {
    let t = Test::new();

    t.cmd()
        .arg("show")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ambari.properties not found"))
        .stderr(predicate::str::contains("AMBARI_CONF_DIR"));
}

#[test]
fn test_conf_dir_flag_overrides_env() {
    let t = Test::new();
    let other = Test::with_properties("from=flag\n");

    t.cmd()
        .args(["get", "from", "--conf-dir"])
        .arg(other.dir.path())
        .assert()
        .success()
        .stdout("flag\n");
}

#[test]
fn test_write_backs_up_previous_file() {
    let t = Test::with_properties("a=1\n");
    let backups = tempfile::TempDir::new().unwrap();

    t.cmd()
        .args(["set", "a", "2"])
        .env("TMPDIR", backups.path())
        .assert()
        .success();

    let backup = backups.path().join("ambari.properties.1");
    assert_eq!(std::fs::read_to_string(backup).unwrap(), "a=1\n");
}
