//! Test fixtures and constants.

/// Properties of an embedded-Postgres install.
pub const LOCAL_POSTGRES: &str = "\
server.persistence.type=local
server.jdbc.database=postgres
server.jdbc.database_name=ambari
server.jdbc.user.name=ambari
server.jdbc.postgres.schema=ambari
";

/// Properties of a remote MySQL install.
pub const REMOTE_MYSQL: &str = "\
server.persistence.type=remote
server.jdbc.database=mysql
server.jdbc.database_name=ambari
server.jdbc.hostname=db.example.com
server.jdbc.port=3306
server.jdbc.user.name=ambari
server.jdbc.url=jdbc:mysql://db.example.com:3306/ambari
";

/// Properties written by a 1.6 release with a remote Oracle database.
pub const LEGACY_REMOTE_ORACLE: &str = "\
server.persistence.type=remote
server.jdbc.schema=ambaridb
server.jdbc.url=jdbc:oracle:thin:@db.example.com:1521/ambari
";

/// Stand-in for `java` running the credential provider.
///
/// Arguments are `-cp CP CLASS ACTION ALIAS PAYLOAD KEY`. Secrets live in a
/// `store` directory next to the JDK; each remembers the key it was stored
/// with, and GET fails for any other key except `None`.
pub const FAKE_CREDENTIAL_PROVIDER: &str = r#"#!/bin/sh
store="$(dirname "$0")/../store"
mkdir -p "$store"
action="$4"; alias="$5"; payload="$6"; key="$7"
case "$action" in
  PUT)
    printf '%s' "$payload" > "$store/$alias" || exit 1
    printf '%s' "$key" > "$store/$alias.key" || exit 1
    ;;
  GET)
    [ -f "$store/$alias" ] || exit 1
    if [ "$key" != "None" ] && [ "$key" != "$(cat "$store/$alias.key")" ]; then
      exit 1
    fi
    cat "$store/$alias" > "$payload"
    ;;
  *)
    exit 2
    ;;
esac
exit 0
"#;
