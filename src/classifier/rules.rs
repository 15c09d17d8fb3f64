// src/classifier/rules.rs

//! Per-entry classification rules
//!
//! Every payload entry is offered to every rule. Rules are independent: an
//! entry may be recorded by several of them (a config file under
//! `/etc/rc.d/init.d/` is both a config and a service, for example).

use crate::classifier::python::SiteRoot;
use crate::packages::PayloadEntry;
use crate::packages::traits::basename;
use glob::{MatchOptions, Pattern};
use std::collections::BTreeSet;
use std::sync::LazyLock;

const APP_DIRS: &[&str] = &["/usr/bin/", "/usr/sbin/", "/bin/", "/sbin/"];

const COMPLETION_DIRS: &[&str] = &[
    "/usr/share/bash-completion/completions",
    "/usr/share/fish/vendor_completions.d",
    "/usr/share/zsh/site-functions",
];

const INCLUDE_DIR: &str = "/usr/include/";

const INIT_SCRIPTS_DIR: &str = "/etc/rc.d/init.d/";

static SHARED_LIB_GLOBS: LazyLock<Vec<Pattern>> =
    LazyLock::new(|| compile(&["/usr/lib/*.so.*", "/usr/lib64/*.so.*"]));

static STATIC_LIB_GLOBS: LazyLock<Vec<Pattern>> =
    LazyLock::new(|| compile(&["/usr/lib/*.a", "/usr/lib64/*.a"]));

static PKG_CONFIG_GLOBS: LazyLock<Vec<Pattern>> =
    LazyLock::new(|| compile(&["/usr/lib/pkgconfig/*.pc", "/usr/lib64/pkgconfig/*.pc"]));

static SYSTEMD_UNIT_GLOBS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    compile(&[
        "/usr/lib/systemd/system/*.service",
        "/usr/lib/systemd/user/*.service",
    ])
});

fn compile(patterns: &[&str]) -> Vec<Pattern> {
    patterns
        .iter()
        .filter_map(|p| Pattern::new(p).ok())
        .collect()
}

/// Glob match where `*` never crosses a path separator
fn matches_any(path: &str, patterns: &[Pattern]) -> bool {
    let options = MatchOptions {
        require_literal_separator: true,
        ..MatchOptions::new()
    };

    patterns.iter().any(|p| p.matches_with(path, options))
}

/// Findings for a single package, merged into the aggregate afterwards
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageFindings {
    pub apps: Vec<String>,
    pub configs: Vec<PayloadEntry>,
    pub completions: Vec<String>,
    pub shared_libs: Vec<String>,
    pub static_libs: Vec<PayloadEntry>,
    /// Header directories, unique within the package
    pub headers: BTreeSet<String>,
    pub pkg_configs: Vec<String>,
    pub services: Vec<String>,
    pub owners: BTreeSet<String>,
    pub owner_groups: BTreeSet<String>,
    pub python2: PythonFindings,
    pub python3: PythonFindings,
    pub wheels: Vec<PayloadEntry>,
}

impl PackageFindings {
    fn python_mut(&mut self, version: u8) -> &mut PythonFindings {
        if version == 2 {
            &mut self.python2
        } else {
            &mut self.python3
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PythonFindings {
    pub dirs: Vec<PayloadEntry>,
    pub init_files: Vec<PayloadEntry>,
    pub modules: BTreeSet<String>,
}

/// An independent (predicate, accumulator) pair applied to payload entries
pub trait PayloadRule: Send + Sync {
    /// Rule name for diagnostics
    fn name(&self) -> &'static str;

    /// Does this rule care about the entry?
    fn matches(&self, entry: &PayloadEntry) -> bool;

    /// Record a matching entry
    fn record(&self, entry: &PayloadEntry, findings: &mut PackageFindings);

    fn apply(&self, entry: &PayloadEntry, findings: &mut PackageFindings) {
        if self.matches(entry) {
            self.record(entry, findings);
        }
    }
}

/// Executables in the standard binary directories
pub struct AppRule;

impl PayloadRule for AppRule {
    fn name(&self) -> &'static str {
        "app"
    }

    fn matches(&self, entry: &PayloadEntry) -> bool {
        !entry.is_dir
            && entry.is_executable()
            && APP_DIRS.iter().any(|dir| entry.path.starts_with(dir))
    }

    fn record(&self, entry: &PayloadEntry, findings: &mut PackageFindings) {
        findings.apps.push(entry.basename().to_string());
    }
}

/// Entries flagged %config
pub struct ConfigRule;

impl PayloadRule for ConfigRule {
    fn name(&self) -> &'static str {
        "config"
    }

    fn matches(&self, entry: &PayloadEntry) -> bool {
        entry.is_config
    }

    fn record(&self, entry: &PayloadEntry, findings: &mut PackageFindings) {
        findings.configs.push(entry.clone());
    }
}

/// bash, fish and zsh completion files
pub struct CompletionRule;

impl PayloadRule for CompletionRule {
    fn name(&self) -> &'static str {
        "completion"
    }

    fn matches(&self, entry: &PayloadEntry) -> bool {
        COMPLETION_DIRS.iter().any(|dir| entry.path.starts_with(dir))
    }

    fn record(&self, entry: &PayloadEntry, findings: &mut PackageFindings) {
        findings.completions.push(entry.path.clone());
    }
}

/// Versioned shared objects, recorded as `libname.so.*`
pub struct SharedLibRule;

impl PayloadRule for SharedLibRule {
    fn name(&self) -> &'static str {
        "shared-lib"
    }

    fn matches(&self, entry: &PayloadEntry) -> bool {
        !entry.is_link && matches_any(&entry.path, &SHARED_LIB_GLOBS)
    }

    fn record(&self, entry: &PayloadEntry, findings: &mut PackageFindings) {
        findings.shared_libs.push(shared_lib_glob(&entry.path));
    }
}

/// Static archives
pub struct StaticLibRule;

impl PayloadRule for StaticLibRule {
    fn name(&self) -> &'static str {
        "static-lib"
    }

    fn matches(&self, entry: &PayloadEntry) -> bool {
        !entry.is_link && matches_any(&entry.path, &STATIC_LIB_GLOBS)
    }

    fn record(&self, entry: &PayloadEntry, findings: &mut PackageFindings) {
        findings.static_libs.push(entry.clone());
    }
}

/// Top-level entries below /usr/include
pub struct HeaderRule;

impl PayloadRule for HeaderRule {
    fn name(&self) -> &'static str {
        "header"
    }

    fn matches(&self, entry: &PayloadEntry) -> bool {
        entry
            .path
            .strip_prefix(INCLUDE_DIR)
            .is_some_and(|rest| !rest.is_empty())
    }

    fn record(&self, entry: &PayloadEntry, findings: &mut PackageFindings) {
        if let Some(rest) = entry.path.strip_prefix(INCLUDE_DIR)
            && let Some(first) = rest.split('/').next()
        {
            findings.headers.insert(first.to_string());
        }
    }
}

/// pkg-config descriptors
pub struct PkgConfigRule;

impl PayloadRule for PkgConfigRule {
    fn name(&self) -> &'static str {
        "pkg-config"
    }

    fn matches(&self, entry: &PayloadEntry) -> bool {
        matches_any(&entry.path, &PKG_CONFIG_GLOBS)
    }

    fn record(&self, entry: &PayloadEntry, findings: &mut PackageFindings) {
        let name = entry.basename();
        findings
            .pkg_configs
            .push(name.strip_suffix(".pc").unwrap_or(name).to_string());
    }
}

/// systemd units and SysV init scripts
pub struct ServiceRule;

impl ServiceRule {
    fn is_unit(path: &str) -> bool {
        matches_any(path, &SYSTEMD_UNIT_GLOBS)
    }

    fn is_init_script(path: &str) -> bool {
        path.strip_prefix(INIT_SCRIPTS_DIR)
            .is_some_and(|rest| !rest.is_empty())
    }
}

impl PayloadRule for ServiceRule {
    fn name(&self) -> &'static str {
        "service"
    }

    fn matches(&self, entry: &PayloadEntry) -> bool {
        Self::is_unit(&entry.path) || Self::is_init_script(&entry.path)
    }

    fn record(&self, entry: &PayloadEntry, findings: &mut PackageFindings) {
        let name = entry.basename();

        if Self::is_unit(&entry.path) {
            findings
                .services
                .push(name.strip_suffix(".service").unwrap_or(name).to_string());
        }

        if Self::is_init_script(&entry.path) {
            findings.services.push(name.to_string());
        }
    }
}

/// Non-root file owners and groups
pub struct OwnerRule;

impl PayloadRule for OwnerRule {
    fn name(&self) -> &'static str {
        "owner"
    }

    fn matches(&self, entry: &PayloadEntry) -> bool {
        is_non_root(&entry.user) || is_non_root(&entry.group)
    }

    fn record(&self, entry: &PayloadEntry, findings: &mut PackageFindings) {
        if is_non_root(&entry.user) {
            findings.owners.insert(entry.user.clone());
        }

        if is_non_root(&entry.group) {
            findings.owner_groups.insert(entry.group.clone());
        }
    }
}

fn is_non_root(name: &str) -> bool {
    !name.is_empty() && name != "root"
}

/// Module directories and package init files below site-packages
pub struct PythonRule {
    version: u8,
}

impl PythonRule {
    pub fn new(version: u8) -> Self {
        Self { version }
    }
}

impl PayloadRule for PythonRule {
    fn name(&self) -> &'static str {
        if self.version == 2 { "python2" } else { "python3" }
    }

    fn matches(&self, entry: &PayloadEntry) -> bool {
        !entry.path.ends_with(".egg-info")
            && SiteRoot::detect(&entry.path, self.version)
                .is_some_and(|root| root.relative(&entry.path).is_some())
    }

    fn record(&self, entry: &PayloadEntry, findings: &mut PackageFindings) {
        let Some(root) = SiteRoot::detect(&entry.path, self.version) else {
            return;
        };
        let python = findings.python_mut(self.version);

        if entry.is_dir {
            if !entry.basename().starts_with("__")
                && let Some(module) = root.module_name(&entry.path)
            {
                python.modules.insert(module.to_string());
                python.dirs.push(entry.clone());
            }
            return;
        }

        if entry.path.ends_with("__init__.py") {
            python.init_files.push(entry.clone());
        }
    }
}

/// Python wheel archives
pub struct WheelRule;

impl PayloadRule for WheelRule {
    fn name(&self) -> &'static str {
        "wheel"
    }

    fn matches(&self, entry: &PayloadEntry) -> bool {
        entry.path.ends_with(".whl")
    }

    fn record(&self, entry: &PayloadEntry, findings: &mut PackageFindings) {
        findings.wheels.push(entry.clone());
    }
}

/// The full rule set in registration order
pub fn default_rules() -> Vec<Box<dyn PayloadRule>> {
    vec![
        Box::new(AppRule),
        Box::new(ConfigRule),
        Box::new(CompletionRule),
        Box::new(SharedLibRule),
        Box::new(StaticLibRule),
        Box::new(HeaderRule),
        Box::new(PkgConfigRule),
        Box::new(ServiceRule),
        Box::new(OwnerRule),
        Box::new(PythonRule::new(2)),
        Box::new(PythonRule::new(3)),
        Box::new(WheelRule),
    ]
}

/// Version-erasing glob for a shared object: `libfoo.so.1.2` -> `libfoo.so.*`
pub fn shared_lib_glob(path: &str) -> String {
    let name = basename(path);
    let stem = match name.find(".so.") {
        Some(idx) => &name[..idx],
        None => name.strip_suffix(".so").unwrap_or(name),
    };

    format!("{}.so.*", stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(rule: &dyn PayloadRule, entry: &PayloadEntry) -> PackageFindings {
        let mut findings = PackageFindings::default();
        rule.apply(entry, &mut findings);
        findings
    }

    fn dir(path: &str) -> PayloadEntry {
        PayloadEntry {
            is_dir: true,
            ..PayloadEntry::new(path, 0o755)
        }
    }

    fn link(path: &str) -> PayloadEntry {
        PayloadEntry {
            is_link: true,
            ..PayloadEntry::new(path, 0o777)
        }
    }

    #[test]
    fn test_app_rule() {
        let rule = AppRule;
        assert!(rule.matches(&PayloadEntry::new("/usr/bin/demo", 0o755)));
        assert!(rule.matches(&PayloadEntry::new("/sbin/demod", 0o700)));
        assert!(!rule.matches(&PayloadEntry::new("/usr/bin/demo.txt", 0o644)));
        assert!(!rule.matches(&dir("/usr/bin/demo.d")));
        assert!(!rule.matches(&PayloadEntry::new("/usr/libexec/demo", 0o755)));

        let findings = apply(&rule, &PayloadEntry::new("/usr/sbin/demod", 0o755));
        assert_eq!(findings.apps, vec!["demod"]);
    }

    #[test]
    fn test_config_rule() {
        let mut entry = PayloadEntry::new("/etc/demo.conf", 0o644);
        assert!(!ConfigRule.matches(&entry));

        entry.is_config = true;
        let findings = apply(&ConfigRule, &entry);
        assert_eq!(findings.configs, vec![entry]);
    }

    #[test]
    fn test_completion_rule() {
        for path in [
            "/usr/share/bash-completion/completions/demo",
            "/usr/share/fish/vendor_completions.d/demo.fish",
            "/usr/share/zsh/site-functions/_demo",
        ] {
            let findings = apply(&CompletionRule, &PayloadEntry::new(path, 0o644));
            assert_eq!(findings.completions, vec![path]);
        }
    }

    #[test]
    fn test_shared_lib_glob_is_version_erasing() {
        assert_eq!(shared_lib_glob("/usr/lib64/libfoo.so.1.2.3"), "libfoo.so.*");
        assert_eq!(shared_lib_glob("/usr/lib64/libfoo.so.9.0.0"), "libfoo.so.*");
        assert_eq!(shared_lib_glob("libfoo.so.*"), "libfoo.so.*");
    }

    #[test]
    fn test_shared_lib_rule() {
        let rule = SharedLibRule;
        assert!(rule.matches(&PayloadEntry::new("/usr/lib64/libfoo.so.1.2.3", 0o755)));
        assert!(rule.matches(&PayloadEntry::new("/usr/lib/libfoo.so.1", 0o755)));
        assert!(!rule.matches(&link("/usr/lib64/libfoo.so.1")));
        assert!(!rule.matches(&PayloadEntry::new("/usr/lib64/libfoo.so", 0o755)));
        // Subdirectories are not library roots
        assert!(!rule.matches(&PayloadEntry::new("/usr/lib64/demo/plugin.so.1", 0o755)));
    }

    #[test]
    fn test_static_lib_rule() {
        let entry = PayloadEntry::new("/usr/lib64/libfoo.a", 0o644);
        let findings = apply(&StaticLibRule, &entry);
        assert_eq!(findings.static_libs, vec![entry]);

        assert!(!StaticLibRule.matches(&link("/usr/lib/libfoo.a")));
        assert!(!StaticLibRule.matches(&PayloadEntry::new("/usr/share/libfoo.a", 0o644)));
    }

    #[test]
    fn test_header_rule_unique_within_package() {
        let mut findings = PackageFindings::default();
        for path in [
            "/usr/include/openssl/ssl.h",
            "/usr/include/openssl/err.h",
            "/usr/include/zlib.h",
            "/usr/include",
        ] {
            HeaderRule.apply(&PayloadEntry::new(path, 0o644), &mut findings);
        }

        let headers: Vec<_> = findings.headers.into_iter().collect();
        assert_eq!(headers, vec!["openssl", "zlib.h"]);
    }

    #[test]
    fn test_pkg_config_rule() {
        let findings = apply(&PkgConfigRule, &PayloadEntry::new("/usr/lib64/pkgconfig/libfoo.pc", 0o644));
        assert_eq!(findings.pkg_configs, vec!["libfoo"]);
        assert!(!PkgConfigRule.matches(&PayloadEntry::new("/usr/share/pkgconfig/foo.pc", 0o644)));
    }

    #[test]
    fn test_service_rule() {
        let findings = apply(&ServiceRule, &PayloadEntry::new("/usr/lib/systemd/system/demo.service", 0o644));
        assert_eq!(findings.services, vec!["demo"]);

        let findings = apply(&ServiceRule, &PayloadEntry::new("/usr/lib/systemd/user/demo-agent.service", 0o644));
        assert_eq!(findings.services, vec!["demo-agent"]);

        let findings = apply(&ServiceRule, &PayloadEntry::new("/etc/rc.d/init.d/demod", 0o755));
        assert_eq!(findings.services, vec!["demod"]);

        assert!(!ServiceRule.matches(&PayloadEntry::new("/usr/lib/systemd/system/demo.socket", 0o644)));
        assert!(!ServiceRule.matches(&dir("/etc/rc.d/init.d/")));
    }

    #[test]
    fn test_owner_rule() {
        let mut entry = PayloadEntry::new("/var/lib/demo", 0o750);
        assert!(!OwnerRule.matches(&entry));

        entry.user = "demo".to_string();
        entry.group = "daemon".to_string();
        let findings = apply(&OwnerRule, &entry);

        assert!(findings.owners.contains("demo"));
        assert!(findings.owner_groups.contains("daemon"));
    }

    #[test]
    fn test_python_rule_dirs_and_init_files() {
        let rule = PythonRule::new(3);
        let mut findings = PackageFindings::default();

        for entry in [
            dir("/usr/lib/python3.6/site-packages/demo"),
            dir("/usr/lib/python3.6/site-packages/demo/__pycache__"),
            dir("/usr/lib/python3.6/site-packages/demo/sub"),
            PayloadEntry::new("/usr/lib/python3.6/site-packages/demo/__init__.py", 0o644),
            PayloadEntry::new("/usr/lib/python3.6/site-packages/demo/core.py", 0o644),
            dir("/usr/lib/python3.6/site-packages/demo-1.0-py3.6.egg-info"),
            dir("/usr/lib/python2.7/site-packages/legacy"),
        ] {
            rule.apply(&entry, &mut findings);
        }

        let modules: Vec<_> = findings.python3.modules.iter().cloned().collect();
        assert_eq!(modules, vec!["demo"]);
        assert_eq!(findings.python3.dirs.len(), 2);
        assert_eq!(findings.python3.init_files.len(), 1);
        assert!(findings.python2.modules.is_empty());
    }

    #[test]
    fn test_python_rule_local_root() {
        let findings = apply(&PythonRule::new(2), &dir("/usr/local/lib64/python2.7/site-packages/fast"));
        assert!(findings.python2.modules.contains("fast"));
    }

    #[test]
    fn test_wheel_rule() {
        let entry = PayloadEntry::new("/usr/share/python-wheels/pip-9.0.3-py2.py3-none-any.whl", 0o644);
        let findings = apply(&WheelRule, &entry);
        assert_eq!(findings.wheels, vec![entry]);
    }

    #[test]
    fn test_rules_are_independent() {
        let mut entry = PayloadEntry::new("/etc/rc.d/init.d/demod", 0o755);
        entry.is_config = true;

        let mut findings = PackageFindings::default();
        for rule in default_rules() {
            rule.apply(&entry, &mut findings);
        }

        assert_eq!(findings.configs.len(), 1);
        assert_eq!(findings.services, vec!["demod"]);
    }
}
