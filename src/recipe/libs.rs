// src/recipe/libs.rs

//! Library, header, pkg-config and Python checks

use super::format::{action, check};
use crate::classifier::AggregateInfo;
use crate::classifier::python::substitute_site_packages;

pub fn shared_libs_check(info: &AggregateInfo) -> String {
    if info.shared_libs.is_empty() {
        return String::new();
    }

    let mut data = check("Check shared libs");
    for lib in &info.shared_libs {
        data.push_str(&action(format!("lib-loaded {}", lib)));
    }
    data.push('\n');
    data
}

pub fn static_libs_check(info: &AggregateInfo) -> String {
    if info.static_libs.is_empty() {
        return String::new();
    }

    let mut data = check("Check static libs");
    for lib in &info.static_libs {
        data.push_str(&action(format!("exist {}", lib.path)));
        data.push_str(&action(format!("mode {} {:o}", lib.path, lib.mode)));
        data.push('\n');
    }
    data
}

pub fn headers_check(info: &AggregateInfo) -> String {
    if info.headers.is_empty() {
        return String::new();
    }

    let mut data = check("Check headers");
    for header in &info.headers {
        data.push_str(&action(format!("lib-header {}", header)));
    }
    data.push('\n');
    data
}

pub fn pkg_config_check(info: &AggregateInfo) -> String {
    if info.pkg_configs.is_empty() {
        return String::new();
    }

    let mut data = check("Check pkg-config");
    for cfg in &info.pkg_configs {
        data.push_str(&action(format!("lib-config {}", cfg)));
    }
    data.push('\n');
    data
}

/// Module directories, init files and import checks for one interpreter
pub fn python_check(info: &AggregateInfo, version: u8) -> String {
    let python = info.python(version);

    if python.modules.is_empty() {
        return String::new();
    }

    let mut data = check(&format!("Check Python {} installation", version));

    for dir in &python.dirs {
        let path = substitute_site_packages(&dir.path);
        data.push_str(&action(format!("exist {}", path)));
        data.push_str(&action(format!("dir {}", path)));
        data.push('\n');
    }

    if !python.init_files.is_empty() {
        for file in &python.init_files {
            data.push_str(&action(format!("exist {}", substitute_site_packages(&file.path))));
        }
        data.push('\n');
    }

    let keyword = if version == 2 { "python-module" } else { "python3-module" };
    for module in &python.modules {
        data.push_str(&action(format!("{} {}", keyword, module)));
    }
    data.push('\n');

    data
}

pub fn wheels_check(info: &AggregateInfo) -> String {
    if info.wheels.is_empty() {
        return String::new();
    }

    let mut data = check("Check Python wheels");
    for wheel in &info.wheels {
        data.push_str(&action(format!("exist {}", wheel.path)));
        data.push_str(&action(format!("perms {} {:o}", wheel.path, wheel.mode)));
        data.push('\n');
    }
    data
}
