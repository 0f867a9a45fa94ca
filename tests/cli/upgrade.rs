//! Tests for `ambari-config upgrade`.

use crate::support::*;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_upgrade_sets_default_db_name() {
    let t = Test::with_properties("server.jdbc.database=postgres\n");

    t.cmd()
        .arg("upgrade")
        .assert()
        .success()
        .stdout(predicate::str::contains("server.jdbc.database_name updated"));

    assert_eq!(stdout(&t.get("server.jdbc.database_name")), "ambari\n");
}

#[test]
fn test_upgrade_skip_db_name_reports_missing() {
    let t = Test::with_properties("server.jdbc.database=postgres\n");

    t.cmd()
        .args(["upgrade", "--skip-db-name"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DB Name property not set"))
        .stderr(predicate::str::contains("ambari-config upgrade"));
}

#[test]
fn test_upgrade_migrates_legacy_remote_properties() {
    let t = Test::with_properties(LEGACY_REMOTE_ORACLE);

    t.cmd().arg("upgrade").assert().success();

    assert_eq!(stdout(&t.get("server.jdbc.database_name")), "ambaridb\n");
    assert_eq!(stdout(&t.get("server.jdbc.database")), "oracle\n");
}

#[test]
fn test_upgrade_merges_rpmsave() {
    let t = Test::with_properties("server.jdbc.database=postgres\nserver.jdbc.database_name=ambari\n");
    fs::write(
        t.dir.path().join("ambari.properties.rpmsave"),
        "agent.fqdn.service.url=http://fqdn.example.com\ncustom.key=kept\n",
    )
    .unwrap();

    t.cmd()
        .arg("upgrade")
        .assert()
        .success()
        .stdout(predicate::str::contains("ambari.properties updated"));

    assert_eq!(stdout(&t.get("custom.key")), "kept\n");
    assert_eq!(stdout(&t.get("server.fqdn.service.url")), "http://fqdn.example.com\n");
    assert_eq!(stdout(&t.get("ambari-server.user")), "root\n");
    assert!(!t.dir.path().join("ambari.properties.rpmsave").exists());

    // Second run has nothing left to merge
    t.cmd()
        .arg("upgrade")
        .assert()
        .success()
        .stdout(predicate::str::contains("ambari.properties unchanged"));
}
