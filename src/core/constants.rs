//! Constants used throughout ambari-config.
//!
//! Property keys, file names and environment variables shared with the
//! Ambari server itself. Changing any of these breaks compatibility with
//! existing `ambari.properties` files.

// Files

/// Server properties file name.
pub const PROPERTIES_FILE: &str = "ambari.properties";

/// Server environment script.
pub const ENV_FILE: &str = "ambari-env.sh";

/// Kerberos JAAS login configuration.
pub const KRB_JAAS_LOGIN_FILE: &str = "krb5JAASLogin.conf";

/// Database password file.
pub const JDBC_PASSWORD_FILENAME: &str = "password.dat";

/// RCA database password file.
pub const JDBC_RCA_PASSWORD_FILENAME: &str = "rca_password.dat";

/// LDAP manager password file.
pub const LDAP_MGR_PASSWORD_FILENAME: &str = "ldap-password.dat";

/// Persisted master key file name.
pub const MASTER_KEY_FILENAME: &str = "master";

/// Credential store file name.
pub const CREDENTIAL_STORE_FILENAME: &str = "credentials.jceks";

/// Temp file prefix for credential provider hand-off.
pub const PASSWORD_TEMP_PREFIX: &str = "ambari.passwd";

// Environment variables

/// Configuration directory override.
pub const CONF_DIR_VAR: &str = "AMBARI_CONF_DIR";

/// Server library directory override.
pub const SERVER_LIB_VAR: &str = "AMBARI_SERVER_LIB";

/// Log filter for this tool.
pub const LOG_VAR: &str = "AMBARI_CONFIG_LOG";

// General properties

pub const NR_USER_PROPERTY: &str = "ambari-server.user";
pub const OS_FAMILY_PROPERTY: &str = "server.os_family";
pub const OS_TYPE_PROPERTY: &str = "server.os_type";
pub const GET_FQDN_SERVICE_URL: &str = "server.fqdn.service.url";
pub const LEGACY_FQDN_SERVICE_URL: &str = "agent.fqdn.service.url";
pub const SERVER_VERSION_FILE_PATH: &str = "server.version.file";
pub const DEBUG_MODE_KEY: &str = "ambari.server.debug";
pub const SUSPEND_START_MODE_KEY: &str = "ambari.server.debug.suspend.start";
pub const RESOURCES_DIR_PROPERTY: &str = "resources.dir";
pub const STACK_LOCATION_KEY: &str = "metadata.path";
pub const VIEWS_DIR_PROPERTY: &str = "views.dir";

// JDK

pub const JAVA_HOME_PROPERTY: &str = "java.home";
pub const JDK_RELEASES: &str = "java.releases";

/// Default JCE policy download location for JDK releases that don't set one.
pub const DEFAULT_JCPOL_URL: &str =
    "http://public-repo-1.hortonworks.com/ARTIFACTS/UnlimitedJCEPolicyJDK7.zip";

// JDBC

pub const PERSISTENCE_TYPE_PROPERTY: &str = "server.persistence.type";
pub const JDBC_DATABASE_PROPERTY: &str = "server.jdbc.database";
pub const JDBC_DATABASE_NAME_PROPERTY: &str = "server.jdbc.database_name";
pub const JDBC_HOSTNAME_PROPERTY: &str = "server.jdbc.hostname";
pub const JDBC_PORT_PROPERTY: &str = "server.jdbc.port";
pub const JDBC_POSTGRES_SCHEMA_PROPERTY: &str = "server.jdbc.postgres.schema";
pub const JDBC_USER_NAME_PROPERTY: &str = "server.jdbc.user.name";
pub const JDBC_PASSWORD_PROPERTY: &str = "server.jdbc.user.passwd";
pub const JDBC_URL_PROPERTY: &str = "server.jdbc.url";
pub const JDBC_DRIVER_PATH_PROPERTY: &str = "server.jdbc.driver.path";

/// Pre-1.7 schema property, read only during upgrades.
pub const JDBC_RCA_SCHEMA_PROPERTY: &str = "server.jdbc.schema";

pub const JDBC_RCA_PASSWORD_ALIAS: &str = "ambari.db.password";

// LDAP

pub const LDAP_MGR_PASSWORD_ALIAS: &str = "ambari.ldap.manager.password";
pub const LDAP_MGR_PASSWORD_PROPERTY: &str = "authentication.ldap.managerPassword";

// SSL trust store

pub const SSL_TRUSTSTORE_PASSWORD_ALIAS: &str = "ambari.ssl.trustStore.password";
pub const SSL_TRUSTSTORE_PASSWORD_PROPERTY: &str = "ssl.trustStore.password";

// Security

pub const SECURITY_KEYS_DIR: &str = "security.server.keys_dir";
pub const SECURITY_MASTER_KEY_LOCATION: &str = "security.master.key.location";
pub const SECURITY_IS_ENCRYPTION_ENABLED: &str = "security.passwords.encryption.enabled";

/// Fallback location of the credential store when no keys dir is configured.
pub const DEFAULT_CREDENTIAL_STORE: &str = "/var/lib/ambari-server/keys/credentials.jceks";

/// Java class implementing the credential provider protocol.
pub const CREDENTIAL_PROVIDER_CLASS: &str =
    "org.apache.ambari.server.security.encryption.CredentialProvider";

/// Master key argument meaning "no key supplied".
pub const NO_MASTER_KEY: &str = "None";

/// Placeholder printed in place of secrets.
pub const BLIND_PASSWORD: &str = "*****";

/// Database name used when none is configured.
pub const DEFAULT_DB_NAME: &str = "ambari";
