// src/recipe/mod.rs

//! Bibop recipe generation
//!
//! Renders an `AggregateInfo` into a bibop recipe: a line-oriented test plan
//! with top-level directives (`pkg`, `require-root`, `var`, `command`) and
//! indented assertions. The recipe is assembled from independent sections
//! in a fixed order; a section with nothing to check renders as empty text
//! and does not affect the others.
//!
//! Generation is a pure function of its inputs: no I/O, no logging.
//!
//! # Example
//!
//! ```text
//! # Bibop recipe for demo
//! # See more: https://kaos.sh/bibop
//!
//! pkg demo
//!
//! fast-finish yes
//!
//! command "-" "Check environment"
//!   app demo
//! ```

pub mod env;
pub mod format;
pub mod libs;
pub mod services;

use crate::classifier::AggregateInfo;
use format::os_version;

/// A rendered recipe and the file name it should be saved under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedRecipe {
    pub file_name: String,
    pub content: String,
}

/// Render the recipe for `info`
///
/// `service_filter` limits lifecycle checks to the named services; an empty
/// filter checks every service the packages install.
pub fn generate(name: &str, service_filter: &[String], info: &AggregateInfo) -> GeneratedRecipe {
    let os = os_version(&info.dist);

    let sections = [
        header(name, info),
        dependencies(info),
        options(info),
        variables(info, service_filter),
        env::env_checks(info),
        services::services_check(info, service_filter, os),
        libs::shared_libs_check(info),
        libs::static_libs_check(info),
        libs::headers_check(info),
        libs::pkg_config_check(info),
        libs::python_check(info, 2),
        libs::python_check(info, 3),
        libs::wheels_check(info),
    ];

    GeneratedRecipe {
        file_name: output_name(name, info),
        content: sections.concat(),
    }
}

/// `<name>-c<ver>.bibop` for OS-specific recipes, `<name>.recipe` otherwise
///
/// A recipe is OS-specific when the OS version is known and it checks
/// services or Python modules.
pub fn output_name(name: &str, info: &AggregateInfo) -> String {
    match os_version(&info.dist) {
        Some(version) if !info.services.is_empty() || info.has_python_modules() => {
            format!("{}-c{}.bibop", name, version)
        }
        _ => format!("{}.recipe", name),
    }
}

fn header(name: &str, info: &AggregateInfo) -> String {
    let mut data = match os_version(&info.dist) {
        Some(version) if !info.services.is_empty() => {
            format!("# Bibop recipe for {} for CentOS {}\n", name, version)
        }
        _ => format!("# Bibop recipe for {}\n", name),
    };

    data.push_str("# See more: https://kaos.sh/bibop\n\n");
    data
}

fn dependencies(info: &AggregateInfo) -> String {
    format!("pkg {}\n\n", info.packages.join(" "))
}

fn options(info: &AggregateInfo) -> String {
    if info.services.is_empty() {
        "fast-finish yes\n\n".to_string()
    } else {
        "require-root yes\n\n".to_string()
    }
}

/// `var delay 3` when systemd lifecycle checks will wait on it
fn variables(info: &AggregateInfo, service_filter: &[String]) -> String {
    if os_version(&info.dist) == Some(6) {
        return String::new();
    }

    let needed = if service_filter.is_empty() {
        !info.services.is_empty()
    } else {
        info.services.iter().any(|s| service_filter.contains(s))
    };

    if needed {
        "var delay 3\n\n".to_string()
    } else {
        String::new()
    }
}
