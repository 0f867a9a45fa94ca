//! Database commands.

use crate::cli::output;
use crate::core::alias::SecretValue;
use crate::core::config::ServerConfig;
use crate::core::connection::DbConnection;
use crate::core::constants::BLIND_PASSWORD;
use crate::core::database;
use crate::error::Result;

/// Show which database the server is configured for.
pub fn db_type(config: &ServerConfig, json: bool) -> Result<()> {
    let properties = config.load_properties()?;
    let db = database::resolve(&properties);

    if json {
        let output = serde_json::json!({ "database": db });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match db {
        Some(db) => {
            output::kv("name", db.name);
            output::kv("title", db.title);
            output::kv("kind", if db.is_internal() { "internal" } else { "remote" });
        }
        None => output::warn("database type could not be determined"),
    }
    Ok(())
}

/// Show the connection settings, with the password hidden.
pub fn connection(config: &ServerConfig, json: bool) -> Result<()> {
    let properties = config.load_properties()?;
    let conn = DbConnection::from_properties(&properties)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&conn)?);
        return Ok(());
    }

    let unset = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

    output::header("Database connection");
    output::rule();
    output::kv("persistence", conn.persistence_type);
    output::kv("dbms", unset(&conn.dbms));
    output::kv("url", unset(&conn.jdbc_url));
    if !conn.is_local() {
        output::kv("host", unset(&conn.host));
        output::kv("port", unset(&conn.port));
    }
    output::kv("database", unset(&conn.database_name));
    output::kv("user", unset(&conn.user_name));
    if let Some(schema) = &conn.postgres_schema {
        output::kv("schema", schema);
    }
    let password = match &conn.password {
        Some(alias @ SecretValue::AliasRef(_)) => alias.to_string(),
        Some(SecretValue::Literal(_)) => BLIND_PASSWORD.to_string(),
        None => "-".to_string(),
    };
    output::kv("password", password);
    Ok(())
}
