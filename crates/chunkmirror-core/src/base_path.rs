//! Public/base path detection.
//!
//! Bundler runtimes assign the asset prefix once, e.g. `r.p="/wap/"`.
//! Absence of that assignment is normal and resolves to `/`.

use regex::Regex;
use std::sync::LazyLock;

/// Base path used when the runtime declares none.
pub const DEFAULT_BASE_PATH: &str = "/";

static PUBLIC_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|[^\w$.])[A-Za-z_$][\w$]*\.p\s*=\s*["']([^"']+)["']"#)
        .expect("public path pattern is valid")
});

/// Returns the raw base path declared in `runtime`, if any.
pub fn detect_base_path(runtime: &str) -> Option<&str> {
    PUBLIC_PATH
        .captures(runtime)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Ensures a leading and trailing `/`. Idempotent.
pub fn normalize_base_path(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    if !raw.starts_with('/') {
        out.push('/');
    }
    out.push_str(raw);
    if !out.ends_with('/') {
        out.push('/');
    }
    out
}

/// Resolve the effective base path: a non-blank override wins, then the
/// detected declaration, then `/`.
pub fn resolve_base_path(runtime: &str, override_path: Option<&str>) -> String {
    let raw = override_path
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .or_else(|| detect_base_path(runtime))
        .unwrap_or(DEFAULT_BASE_PATH);
    normalize_base_path(raw)
}
