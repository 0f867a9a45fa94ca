//! Tests for `ambari-config jdk`, `defaults` and `completions`.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_defaults_without_properties_file() {
    let t = Test::new();

    let output = t.cmd().args(["defaults", "--json"]).output().unwrap();
    assert_success(&output);
    let json = stdout_json(&output);
    assert_eq!(
        json["conf_dir"].as_str().unwrap(),
        t.dir.path().to_string_lossy()
    );
    assert!(json["defaults"]["resources_dir"].is_string());
    assert!(json["platform"]["family"].is_string());
}

#[test]
fn test_defaults_human_output() {
    let t = Test::new();

    t.cmd()
        .arg("defaults")
        .assert()
        .success()
        .stdout(predicate::str::contains("Platform"))
        .stdout(predicate::str::contains("Ownership"));
}

#[test]
fn test_jdk_releases() {
    let t = Test::with_properties(
        "java.releases=jdk1.8\n\
         jdk1.8.desc=Oracle JDK 1.8\n\
         jdk1.8.url=http://example.com/jdk-8.tar.gz\n\
         jdk1.8.re=(jdk.*)/jre\n",
    );

    let output = t.cmd().args(["jdk", "--json"]).output().unwrap();
    assert_success(&output);
    let json = stdout_json(&output);
    assert_eq!(json["releases"][0]["name"], "jdk1.8");
    assert_eq!(json["releases"][0]["dest_file"], "jdk1.8.exe");
}

#[test]
fn test_jdk_invalid_release_fails() {
    let t = Test::with_properties("java.releases=jdk1.8\njdk1.8.re=(jdk.*)/jre\n");

    t.cmd()
        .arg("jdk")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid JDK release 'jdk1.8'"));
}

#[cfg(unix)]
#[test]
fn test_jdk_uses_java_home() {
    let t = Test::with_properties("");
    let home = t.install_fake_java();

    t.cmd()
        .arg("jdk")
        .assert()
        .success()
        .stdout(predicate::str::contains(home.join("bin/java").to_string_lossy()));
}

#[test]
fn test_completions() {
    let t = Test::new();

    t.cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ambari-config"));
}

#[test]
fn test_verbose_logs_to_stderr() {
    let t = Test::with_properties("a=1\n");

    t.cmd()
        .args(["--verbose", "get", "a"])
        .assert()
        .success()
        .stdout("1\n")
        .stderr(predicate::str::contains("loading properties from"));
}
