//! Tests for `ambari-config db-type` and `ambari-config connection`.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_local_persistence_is_embedded_postgres() {
    let t = Test::with_properties("server.persistence.type=local\n");

    let output = t.db_type_json();
    assert_success(&output);
    let json = stdout_json(&output);
    assert_eq!(json["database"]["name"], "postgres");
    assert_eq!(json["database"]["kind"], "internal");
}

#[test]
fn test_explicit_remote_mysql() {
    let t = Test::with_properties(REMOTE_MYSQL);

    let json = stdout_json(&t.db_type_json());
    assert_eq!(json["database"]["name"], "mysql");
    assert_eq!(json["database"]["kind"], "remote");
}

#[test]
fn test_type_from_jdbc_url() {
    let t = Test::with_properties(
        "server.persistence.type=remote\n\
         server.jdbc.url=jdbc:MySQL://host/postgres_db\n",
    );

    // postgres is probed before mysql
    let json = stdout_json(&t.db_type_json());
    assert_eq!(json["database"]["name"], "postgres");
}

#[test]
fn test_unknown_database() {
    let t = Test::with_properties("server.persistence.type=remote\n");

    let json = stdout_json(&t.db_type_json());
    assert!(json["database"].is_null());

    t.cmd()
        .arg("db-type")
        .assert()
        .success()
        .stderr(predicate::str::contains("could not be determined"));
}

#[test]
fn test_db_type_human_output() {
    let t = Test::with_properties(LOCAL_POSTGRES);

    t.cmd()
        .arg("db-type")
        .assert()
        .success()
        .stdout(predicate::str::contains("Embedded Postgres"))
        .stdout(predicate::str::contains("internal"));
}

#[test]
fn test_connection_remote() {
    let t = Test::with_properties(REMOTE_MYSQL);

    let output = t
        .cmd()
        .args(["connection", "--json"])
        .output()
        .unwrap();
    assert_success(&output);
    let json = stdout_json(&output);
    assert_eq!(json["persistence_type"], "remote");
    assert_eq!(json["host"], "db.example.com");
    assert_eq!(json["port"], "3306");
    assert_eq!(json["database_name"], "ambari");
    assert!(json.get("password").is_none());
}

#[test]
fn test_connection_password_file_hidden() {
    let t = Test::with_properties(LOCAL_POSTGRES);
    let password = t.dir.path().join("password.dat");
    std::fs::write(&password, "bigdata").unwrap();
    assert_success(&t.set("server.jdbc.user.passwd", &password.to_string_lossy()));

    t.cmd()
        .arg("connection")
        .assert()
        .success()
        .stdout(predicate::str::contains("*****"))
        .stdout(predicate::str::contains("bigdata").not())
        .stdout(predicate::str::contains("host").not());
}

#[test]
fn test_connection_missing_password_file_fails() {
    let t = Test::with_properties("server.jdbc.user.passwd=/nonexistent/password.dat\n");

    t.cmd()
        .arg("connection")
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/password.dat"));
}
