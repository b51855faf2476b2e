//! Anchored locators for the chunk tables, tried in order.
//!
//! Each capture group 1 is the body of the object literal. Anchors are the
//! directory segment and extension literals, which survive minifier changes
//! better than the surrounding expression shape.

use regex::Regex;
use std::sync::LazyLock;

/// Identifier or member expression (`e`, `chunkId`, `r.p`, `__webpack_require__.p`).
const IDENT: &str = r"[A-Za-z_$][\w$]*";

fn compile(pattern: &str) -> Regex {
    let pattern = pattern.replace("{ID}", IDENT);
    Regex::new(&pattern).expect("chunk table pattern is valid")
}

/// `r.p+"static/js/"+e+"."+{...}[e]+".js"`, then the same without the base-path prefix.
pub(super) static JS_HASH: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        compile(
            r#"(?s){ID}\.p\s*\+\s*["']static/js/["']\s*\+\s*{ID}\s*\+\s*["']\.["']\s*\+\s*\{(.*?)\}\[{ID}\]\s*\+\s*["']\.\s*js["']"#,
        ),
        compile(
            r#"(?s)["']static/js/["']\s*\+\s*{ID}\s*\+\s*["']\.["']\s*\+\s*\{(.*?)\}\[{ID}\]\s*\+\s*["']\.\s*js["']"#,
        ),
    ]
});

/// `"static/css/"+({10:"Vote"}[e]||e)+"."+{...}[e]+".css"`, then any
/// name expression between the directory and the hash lookup.
pub(super) static CSS_HASH: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        compile(
            r#"(?s)["']static/css/["']\s*\+\s*\(\{.*?\}\[{ID}\]\s*\|\|\s*{ID}\)\s*\+\s*["']\.["']\s*\+\s*\{(.*?)\}\[{ID}\]\s*\+\s*["']\.\s*css["']"#,
        ),
        compile(
            r#"(?s)["']static/css/["']\s*\+.*?\+\s*["']\.["']\s*\+\s*\{(.*?)\}\[{ID}\]\s*\+\s*["']\.\s*css["']"#,
        ),
    ]
});

/// `({10:"Vote"}[e]||e)` next to the CSS directory, then anywhere in the script.
pub(super) static CSS_NAMES: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        compile(r#"(?s)["']static/css/["']\s*\+\s*\(\{(.*?)\}\[{ID}\]\s*\|\|\s*{ID}\)"#),
        compile(r#"(?s)\(\{(.*?)\}\[{ID}\]\s*\|\|\s*{ID}\)"#),
    ]
});
