// src/classifier/python.rs

//! Python interpreter roots and site-packages layout
//!
//! Modules live under one of four interpreter roots per major version:
//! `/usr/lib/pythonX.Y`, `/usr/lib64/pythonX.Y` and their `/usr/local`
//! counterparts. The root is three path segments deep for system roots and
//! four for local roots; modules sit in `<root>/site-packages`.

/// Location of an interpreter root that owns a payload path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRoot {
    /// Interpreter major version (2 or 3)
    pub version: u8,
    /// Under `/usr/local`
    pub local: bool,
    /// Under a `lib64` directory (arch-specific site)
    pub arch: bool,
    /// Interpreter root, e.g. `/usr/lib64/python3.6`
    pub root: String,
}

impl SiteRoot {
    /// Find the interpreter root of `path` for the given major version
    pub fn detect(path: &str, version: u8) -> Option<Self> {
        let candidates = [
            ("/usr/lib64/python", false, true),
            ("/usr/lib/python", false, false),
            ("/usr/local/lib64/python", true, true),
            ("/usr/local/lib/python", true, false),
        ];

        for (prefix, local, arch) in candidates {
            let versioned = format!("{}{}", prefix, version);
            if !path.starts_with(&versioned) {
                continue;
            }

            let depth = if local { 4 } else { 3 };
            return Some(Self {
                version,
                local,
                arch,
                root: leading_segments(path, depth).to_string(),
            });
        }

        None
    }

    /// `<root>/site-packages`
    pub fn site_packages(&self) -> String {
        format!("{}/site-packages", self.root)
    }

    /// Path relative to site-packages, if `path` is below it
    pub fn relative<'a>(&self, path: &'a str) -> Option<&'a str> {
        path.strip_prefix(&self.site_packages())?
            .strip_prefix('/')
            .filter(|rest| !rest.is_empty())
    }

    /// Top-level module name of a path below site-packages
    pub fn module_name<'a>(&self, path: &'a str) -> Option<&'a str> {
        self.relative(path)?.split('/').next()
    }

    /// Recipe variable standing for this root's site-packages directory
    pub fn placeholder(&self) -> String {
        format!(
            "{{PYTHON{}_{}{}}}",
            self.version,
            if self.arch { "SITEARCH" } else { "SITELIB" },
            if self.local { "_LOCAL" } else { "" }
        )
    }
}

/// The first `n` segments of an absolute path (whole path if shorter)
fn leading_segments(path: &str, n: usize) -> &str {
    let mut seen = 0;

    for (idx, ch) in path.char_indices().skip(1) {
        if ch == '/' {
            seen += 1;
            if seen == n {
                return &path[..idx];
            }
        }
    }

    path
}

/// Replace a site-packages prefix with its recipe variable
///
/// Paths outside any interpreter root are returned unchanged.
pub fn substitute_site_packages(path: &str) -> String {
    for version in [2, 3] {
        if let Some(root) = SiteRoot::detect(path, version)
            && let Some(rest) = path.strip_prefix(&root.site_packages())
        {
            return format!("{}{}", root.placeholder(), rest);
        }
    }

    path.to_string()
}
