// src/recipe/format.rs

//! Small formatting helpers shared by recipe sections

use crate::packages::PayloadEntry;

/// First OS major version that manages services with systemctl
pub const SYSTEMD_VERSION: u32 = 7;

/// Default permissions a config check does not need to assert
const DEFAULT_DIR_MODE: u32 = 0o755;
const DEFAULT_FILE_MODE: u32 = 0o644;

/// OS major version for a distribution tag (`el6`, `el7`, `el8`)
pub fn os_version(dist: &str) -> Option<u32> {
    [("el6", 6), ("el7", 7), ("el8", 8)]
        .into_iter()
        .find(|(prefix, _)| dist.starts_with(prefix))
        .map(|(_, version)| version)
}

/// `command "<cmd>" "<description>"` opening line
pub fn command(cmd: &str, description: &str) -> String {
    format!("command \"{}\" \"{}\"\n", cmd, description)
}

/// Opening line of a check block that runs no command
pub fn check(description: &str) -> String {
    command("-", description)
}

/// Indented assertion line
pub fn action(text: impl AsRef<str>) -> String {
    format!("  {}\n", text.as_ref())
}

/// Assertions for a config file or directory
///
/// Mode is only asserted when it differs from 0755 (dirs) / 0644 (files);
/// ownership only when the owner is known and not root.
pub fn config_check(config: &PayloadEntry) -> String {
    let (mut data, default_mode) = if config.is_dir {
        (action(format!("dir {}", config.path)), DEFAULT_DIR_MODE)
    } else {
        (action(format!("exist {}", config.path)), DEFAULT_FILE_MODE)
    };

    if config.mode != default_mode {
        data.push_str(&action(format!("mode {} {:o}", config.path, config.mode)));
    }

    if !config.user.is_empty() && config.user != "root" {
        data.push_str(&action(format!(
            "owner {} {}:{}",
            config.path, config.user, config.group
        )));
    }

    data
}
