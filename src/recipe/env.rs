// src/recipe/env.rs

//! Environment checks: apps, config files, users/groups, service presence

use super::format::{action, check, config_check};
use crate::classifier::{AggregateInfo, GroupRecord, UserRecord};

/// Limits under which a package gets a single combined environment block
const SIMPLE_MAX_APPS: usize = 3;
const SIMPLE_MAX_CONFIGS: usize = 3;
const SIMPLE_MAX_SERVICES: usize = 1;
const SIMPLE_MAX_USERS: usize = 1;
const SIMPLE_MAX_GROUPS: usize = 1;

/// Environment section: condensed for small packages, split otherwise
pub fn env_checks(info: &AggregateInfo) -> String {
    if is_simple(info) {
        return basic_env_check(info);
    }

    let mut data = apps_check(info);
    data.push_str(&configs_check(info));
    data.push_str(&users_and_groups_check(info));
    data.push_str(&services_presence_check(info));
    data
}

fn is_simple(info: &AggregateInfo) -> bool {
    info.apps.len() <= SIMPLE_MAX_APPS
        && info.configs.len() <= SIMPLE_MAX_CONFIGS
        && info.services.len() <= SIMPLE_MAX_SERVICES
        && info.users.len() <= SIMPLE_MAX_USERS
        && info.groups.len() <= SIMPLE_MAX_GROUPS
}

/// One block with apps, service presence and configs
fn basic_env_check(info: &AggregateInfo) -> String {
    if info.apps.is_empty() && info.services.is_empty() && info.configs.is_empty() {
        return String::new();
    }

    let mut data = check("Check environment");

    if !info.apps.is_empty() {
        for app in &info.apps {
            data.push_str(&action(format!("app {}", app)));
        }
        data.push('\n');
    }

    if !info.services.is_empty() {
        for service in &info.services {
            data.push_str(&action(format!("service-present {}", service)));
        }
        data.push('\n');
    }

    if !info.configs.is_empty() {
        for config in &info.configs {
            data.push_str(&config_check(config));
            data.push('\n');
        }
        data.push('\n');
    }

    data
}

fn apps_check(info: &AggregateInfo) -> String {
    if info.apps.is_empty() {
        return String::new();
    }

    let mut data = check("Check apps");
    for app in &info.apps {
        data.push_str(&action(format!("app {}", app)));
    }
    data.push('\n');
    data
}

fn configs_check(info: &AggregateInfo) -> String {
    if info.configs.is_empty() {
        return String::new();
    }

    let mut data = check("Check configuration files and directories");
    for config in &info.configs {
        data.push_str(&config_check(config));
        data.push('\n');
    }
    data
}

fn users_and_groups_check(info: &AggregateInfo) -> String {
    if info.users.is_empty() && info.groups.is_empty() {
        return String::new();
    }

    let mut data = check("Check users and groups");

    if !info.users.is_empty() {
        for user in info.users.values() {
            data.push_str(&user_check(user));
        }
        data.push('\n');
    }

    if !info.groups.is_empty() {
        for group in info.groups.values() {
            data.push_str(&group_check(group));
        }
        data.push('\n');
    }

    data
}

fn services_presence_check(info: &AggregateInfo) -> String {
    if info.services.is_empty() {
        return String::new();
    }

    let mut data = check("Check services presence");
    for service in &info.services {
        data.push_str(&action(format!("service-present {}", service)));
    }
    data.push('\n');
    data
}

/// Existence plus uid/gid; groups, home and shell are not asserted
pub fn user_check(user: &UserRecord) -> String {
    let mut data = action(format!("user-exist {}", user.name));

    if let Some(uid) = &user.uid {
        data.push_str(&action(format!("user-id {} {}", user.name, uid)));
    }

    if let Some(gid) = &user.gid {
        data.push_str(&action(format!("user-gid {} {}", user.name, gid)));
    }

    data
}

pub fn group_check(group: &GroupRecord) -> String {
    let mut data = action(format!("group-exist {}", group.name));

    if let Some(gid) = &group.gid {
        data.push_str(&action(format!("group-id {} {}", group.name, gid)));
    }

    data
}
