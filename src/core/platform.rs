//! Platform detection and per-OS filesystem defaults.
//!
//! [`PlatformInfo`] is detected once at startup and handed to everything
//! that needs it. [`ServerDefaults`] holds the layout the server packages
//! install to on each OS family.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Redhat,
    Suse,
    Ubuntu,
    Debian,
    Windows,
    /// Any other Unix-like system.
    Other,
}

impl OsFamily {
    fn from_os_release_id(id: &str) -> Option<Self> {
        match id {
            "rhel" | "centos" | "fedora" | "redhat" | "rocky" | "almalinux" | "ol" | "amzn" => {
                Some(Self::Redhat)
            }
            "suse" | "sles" | "opensuse" | "opensuse-leap" => Some(Self::Suse),
            "ubuntu" => Some(Self::Ubuntu),
            "debian" => Some(Self::Debian),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Redhat => "redhat",
            Self::Suse => "suse",
            Self::Ubuntu => "ubuntu",
            Self::Debian => "debian",
            Self::Windows => "winsrv",
            Self::Other => "linux",
        }
    }

    pub fn is_windows(&self) -> bool {
        *self == Self::Windows
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host operating system, detected once per process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformInfo {
    pub family: OsFamily,
    /// Major OS version, empty when unknown.
    pub major_version: String,
}

impl PlatformInfo {
    pub fn new(family: OsFamily, major_version: impl Into<String>) -> Self {
        Self {
            family,
            major_version: major_version.into(),
        }
    }

    /// Detect the running platform.
    pub fn detect() -> Self {
        if cfg!(windows) {
            return Self::new(OsFamily::Windows, "");
        }

        let info = std::fs::read_to_string("/etc/os-release")
            .map(|contents| Self::from_os_release(&contents))
            .unwrap_or_else(|_| Self::new(OsFamily::Other, ""));
        debug!(family = %info.family, version = %info.major_version, "detected platform");
        info
    }

    /// Parse the contents of `/etc/os-release`.
    pub fn from_os_release(contents: &str) -> Self {
        let mut id = "";
        let mut id_like = "";
        let mut version = "";

        for line in contents.lines() {
            if let Some((key, value)) = line.split_once('=') {
                let value = value.trim().trim_matches('"');
                match key.trim() {
                    "ID" => id = value,
                    "ID_LIKE" => id_like = value,
                    "VERSION_ID" => version = value,
                    _ => {}
                }
            }
        }

        let family = OsFamily::from_os_release_id(id)
            .or_else(|| {
                id_like
                    .split_whitespace()
                    .find_map(OsFamily::from_os_release_id)
            })
            .unwrap_or(OsFamily::Other);
        let major = version.split('.').next().unwrap_or_default();

        Self::new(family, major)
    }

    /// Family and version as written to `server.os_type`, e.g. `redhat7`.
    pub fn os_type(&self) -> String {
        format!("{}{}", self.family, self.major_version)
    }
}

/// Permission adjustment applied to a path for the server user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnershipRule {
    pub path: &'static str,
    pub mode: &'static str,
    /// User placeholder; `{0}` is replaced by the server user.
    pub user: &'static str,
    pub recursive: bool,
}

impl OwnershipRule {
    const fn new(path: &'static str, mode: &'static str, recursive: bool) -> Self {
        Self {
            path,
            mode,
            user: "{0}",
            recursive,
        }
    }

    /// The user this rule applies to once `{0}` is substituted.
    pub fn user_for(&self, server_user: &str) -> String {
        self.user.replace("{0}", server_user)
    }
}

/// Ownership change applied to a directory tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChownRule {
    pub path: &'static str,
    pub user: &'static str,
    pub recursive: bool,
}

const LINUX_ADJUST_OWNERSHIP: &[OwnershipRule] = &[
    OwnershipRule::new("/var/log/ambari-server/", "644", true),
    OwnershipRule::new("/var/log/ambari-server/", "755", false),
    OwnershipRule::new("/var/run/ambari-server/", "644", true),
    OwnershipRule::new("/var/run/ambari-server/", "755", false),
    OwnershipRule::new("/var/run/ambari-server/bootstrap", "755", false),
    OwnershipRule::new("/var/lib/ambari-server/ambari-env.sh", "700", false),
    OwnershipRule::new("/var/lib/ambari-server/ambari-sudo.sh", "700", false),
    OwnershipRule::new("/var/lib/ambari-server/keys/", "600", true),
    OwnershipRule::new("/var/lib/ambari-server/keys/", "700", false),
    OwnershipRule::new("/var/lib/ambari-server/keys/db/", "700", false),
    OwnershipRule::new("/var/lib/ambari-server/keys/db/newcerts/", "700", false),
    OwnershipRule::new("/var/lib/ambari-server/keys/.ssh", "700", false),
    OwnershipRule::new("/var/lib/ambari-server/resources/common-services/", "755", true),
    OwnershipRule::new("/var/lib/ambari-server/resources/stacks/", "755", true),
    OwnershipRule::new("/var/lib/ambari-server/resources/custom_actions/", "755", true),
    OwnershipRule::new("/var/lib/ambari-server/resources/host_scripts/", "755", true),
    OwnershipRule::new("/var/lib/ambari-server/resources/views/", "644", true),
    OwnershipRule::new("/var/lib/ambari-server/resources/views/", "755", false),
    OwnershipRule::new("/var/lib/ambari-server/resources/views/work/", "755", true),
    OwnershipRule::new("/etc/ambari-server/conf/", "644", true),
    OwnershipRule::new("/etc/ambari-server/conf/", "755", false),
    OwnershipRule::new("/etc/ambari-server/conf/password.dat", "640", false),
    OwnershipRule::new("/var/lib/ambari-server/keys/pass.txt", "600", false),
    OwnershipRule::new("/etc/ambari-server/conf/ldap-password.dat", "640", false),
    OwnershipRule::new("/var/run/ambari-server/stack-recommendations/", "744", true),
    OwnershipRule::new("/var/run/ambari-server/stack-recommendations/", "755", false),
    OwnershipRule::new("/var/lib/ambari-server/resources/data/", "644", false),
    OwnershipRule::new("/var/lib/ambari-server/resources/data/", "755", false),
    OwnershipRule::new("/var/lib/ambari-server/data/tmp/", "644", true),
    OwnershipRule::new("/var/lib/ambari-server/data/tmp/", "755", false),
    OwnershipRule::new("/var/lib/ambari-server/data/cache/", "600", true),
    OwnershipRule::new("/var/lib/ambari-server/data/cache/", "700", false),
];

const LINUX_CHANGE_OWNERSHIP: &[ChownRule] = &[
    ChownRule { path: "/var/lib/ambari-server", user: "{0}", recursive: true },
    ChownRule { path: "/usr/lib/ambari-server", user: "{0}", recursive: true },
    ChownRule { path: "/var/log/ambari-server", user: "{0}", recursive: true },
    ChownRule { path: "/var/run/ambari-server", user: "{0}", recursive: true },
    ChownRule { path: "/etc/ambari-server", user: "{0}", recursive: true },
];

// Modes on Windows are icacls rights, M = modify, F = full.
const WINDOWS_ADJUST_OWNERSHIP: &[OwnershipRule] = &[
    OwnershipRule::new("\\var\\log\\ambari-server", "M", true),
    OwnershipRule::new("\\var\\log\\ambari-server", "F", false),
    OwnershipRule::new("\\var\\run\\ambari-server", "M", true),
    OwnershipRule::new("\\var\\run\\ambari-server", "F", false),
    OwnershipRule::new("bootstrap", "F", false),
    OwnershipRule::new("ambari-env.cmd", "F", false),
    OwnershipRule::new("keystore", "M", true),
    OwnershipRule::new("keystore", "F", false),
    OwnershipRule::new("keystore\\db", "700", false),
    OwnershipRule::new("keystore\\db\\newcerts", "700", false),
    OwnershipRule::new("resources\\stacks", "755", true),
    OwnershipRule::new("resources\\custom_actions", "755", true),
    OwnershipRule::new("conf", "644", true),
    OwnershipRule::new("conf", "755", false),
    OwnershipRule::new("conf\\password.dat", "640", false),
];

/// Filesystem layout and messages for one OS family.
#[derive(Debug, Clone, Serialize)]
pub struct ServerDefaults {
    pub java_share_path: PathBuf,
    pub out_dir: PathBuf,
    pub server_out_file: PathBuf,
    pub server_log_file: PathBuf,
    pub pid_dir: PathBuf,

    pub jdk_install_dir: PathBuf,
    pub jdk_search_pattern: &'static str,
    pub java_exe_subpath: PathBuf,
    pub jdk_security_dir: PathBuf,
    pub keytool_bin_subpath: PathBuf,

    pub conf_dir: PathBuf,
    pub libs_dir: PathBuf,
    /// Variable data dir; empty on Windows.
    pub vlibs_dir: PathBuf,
    pub resources_dir: PathBuf,
    pub stack_location: PathBuf,
    pub views_dir: PathBuf,

    pub properties_backup_file: &'static str,
    pub env_backup_file: &'static str,
    pub krb_jaas_login_backup_file: &'static str,

    pub master_key_file_permissions: &'static str,
    pub credentials_store_file_permissions: &'static str,
    pub trust_store_location_permissions: &'static str,

    pub adjust_ownership: &'static [OwnershipRule],
    pub change_ownership: &'static [ChownRule],
    pub useradd_cmd: String,

    pub message_running_as_root: &'static str,
    pub message_setup_not_root: &'static str,
    pub message_reset_not_root: &'static str,
    pub message_upgrade_not_root: &'static str,
}

impl ServerDefaults {
    /// Defaults for the given platform.
    pub fn for_platform(platform: &PlatformInfo) -> Self {
        if platform.family.is_windows() {
            Self::windows()
        } else {
            Self::linux()
        }
    }

    fn linux() -> Self {
        let out_dir = PathBuf::from("/var/log/ambari-server");
        let nologin = ["/sbin/nologin", "/usr/sbin/nologin"]
            .into_iter()
            .find(|p| Path::new(p).exists())
            .unwrap_or("/sbin/nologin");

        Self {
            java_share_path: "/usr/share/java".into(),
            server_out_file: out_dir.join("ambari-server.out"),
            server_log_file: out_dir.join("ambari-server.log"),
            out_dir,
            pid_dir: "/var/run/ambari-server".into(),

            jdk_install_dir: "/usr/jdk64".into(),
            jdk_search_pattern: "jdk*",
            java_exe_subpath: "bin/java".into(),
            jdk_security_dir: "jre/lib/security".into(),
            keytool_bin_subpath: "bin/keytool".into(),

            conf_dir: "/etc/ambari-server/conf".into(),
            libs_dir: "/usr/lib/ambari-server".into(),
            vlibs_dir: "/var/lib/ambari-server".into(),
            resources_dir: "/var/lib/ambari-server/resources".into(),
            stack_location: "/var/lib/ambari-server/resources/stacks".into(),
            views_dir: "/var/lib/ambari-server/resources/views".into(),

            properties_backup_file: "ambari.properties.rpmsave",
            env_backup_file: "ambari-env.sh.rpmsave",
            krb_jaas_login_backup_file: "krb5JAASLogin.conf.rpmsave",

            master_key_file_permissions: "640",
            credentials_store_file_permissions: "640",
            trust_store_location_permissions: "640",

            adjust_ownership: LINUX_ADJUST_OWNERSHIP,
            change_ownership: LINUX_CHANGE_OWNERSHIP,
            useradd_cmd: format!(
                "useradd -M --comment \"{{1}}\" --shell {} -d /var/lib/ambari-server/keys/ {{0}}",
                nologin
            ),

            message_running_as_root: "Ambari Server running with administrator privileges.",
            message_setup_not_root: "Ambari-server setup should be run with root-level privileges",
            message_reset_not_root: "Ambari-server reset should be run with root-level privileges",
            message_upgrade_not_root:
                "Ambari-server upgrade must be run with root-level privileges",
        }
    }

    fn windows() -> Self {
        let out_dir = PathBuf::from("\\var\\log\\ambari-server");

        Self {
            java_share_path: "/usr/share/java".into(),
            server_out_file: out_dir.join("ambari-server.out"),
            server_log_file: out_dir.join("ambari-server.log"),
            out_dir,
            pid_dir: "\\var\\run\\ambari-server".into(),

            jdk_install_dir: "C:\\".into(),
            jdk_search_pattern: "j[2se|dk|re]*",
            java_exe_subpath: "bin\\java.exe".into(),
            jdk_security_dir: "jre\\lib\\security".into(),
            keytool_bin_subpath: "bin\\keytool.exe".into(),

            conf_dir: "conf".into(),
            libs_dir: "lib".into(),
            vlibs_dir: PathBuf::new(),
            resources_dir: "resources".into(),
            stack_location: "resources\\stacks".into(),
            views_dir: "resources\\views".into(),

            properties_backup_file: "ambari.properties.backup",
            env_backup_file: "",
            krb_jaas_login_backup_file: "",

            master_key_file_permissions: "640",
            credentials_store_file_permissions: "640",
            trust_store_location_permissions: "640",

            adjust_ownership: WINDOWS_ADJUST_OWNERSHIP,
            change_ownership: &[],
            useradd_cmd: "cmd /C net user {0} {1} /ADD".to_string(),

            message_running_as_root: "Ambari Server running with 'root' privileges.",
            message_setup_not_root:
                "Ambari-server setup must be run with administrator-level privileges",
            message_reset_not_root:
                "Ambari-server reset must be run with administrator-level privileges",
            message_upgrade_not_root:
                "Ambari-server upgrade must be run with administrator-level privileges",
        }
    }

    /// Whether a directory entry name matches the JDK search pattern.
    ///
    /// `jdk*` on Linux; `j[2se|dk|re]*` on Windows, i.e. `j` followed by one
    /// of the bracketed characters.
    pub fn matches_jdk_dir(&self, name: &str) -> bool {
        match self.jdk_search_pattern.split_once('[') {
            Some((prefix, rest)) => {
                let class = rest.split(']').next().unwrap_or_default();
                name.strip_prefix(prefix)
                    .and_then(|tail| tail.chars().next())
                    .map_or(false, |c| class.contains(c))
            }
            None => name.starts_with(self.jdk_search_pattern.trim_end_matches('*')),
        }
    }
}
