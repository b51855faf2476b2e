//! Asset target construction: base path + origin + chunk tables → URLs.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;
use url::Url;

use crate::extract::ChunkTables;
use crate::storage;

/// Kind of chunk a target was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AssetKind {
    Js,
    Css,
}

/// One URL to mirror and the path it lands at, relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetTarget {
    pub kind: AssetKind,
    pub url: Url,
    pub rel_path: PathBuf,
}

/// `scheme://host[:port]` of `url`, used as the default origin for chunk URLs.
pub fn origin_of(url: &Url) -> Result<Url> {
    let origin = url.origin();
    if !origin.is_tuple() {
        anyhow::bail!("URL has no usable origin: {}", url);
    }
    Url::parse(&origin.ascii_serialization()).context("invalid origin")
}

/// Resolve the origin: a non-blank override wins, otherwise the runtime URL's origin.
pub fn resolve_origin(runtime_url: &Url, override_origin: Option<&str>) -> Result<Url> {
    match override_origin.map(str::trim).filter(|o| !o.is_empty()) {
        Some(o) => Url::parse(o).with_context(|| format!("invalid origin override: {}", o)),
        None => origin_of(runtime_url),
    }
}

/// Path (relative to the origin) of a JS chunk.
pub fn js_chunk_path(base_path: &str, id: u32, hash: &str) -> String {
    format!("{}static/js/{}.{}.js", base_path, id, hash)
}

/// Path (relative to the origin) of a CSS chunk named `name`.
pub fn css_chunk_path(base_path: &str, name: &str, hash: &str) -> String {
    format!("{}static/css/{}.{}.css", base_path, name, hash)
}

/// Build the deduplicated, URL-sorted list of chunk targets.
///
/// CSS chunks use their name override when present, otherwise the decimal id.
/// Entries whose URL cannot be built or whose path is unsafe to mirror are
/// logged and dropped. Never touches the network.
pub fn build_targets(base_path: &str, origin: &Url, tables: &ChunkTables) -> Vec<AssetTarget> {
    let js = tables
        .js
        .iter()
        .map(|(id, hash)| (AssetKind::Js, js_chunk_path(base_path, *id, hash)));
    let css = tables.css.iter().map(|(id, hash)| {
        let name = tables
            .css_names
            .get(id)
            .cloned()
            .unwrap_or_else(|| id.to_string());
        (AssetKind::Css, css_chunk_path(base_path, &name, hash))
    });

    let mut by_url: BTreeMap<String, AssetTarget> = BTreeMap::new();
    for (kind, path) in js.chain(css) {
        let url = match origin.join(&path) {
            Ok(u) => u,
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "skipping chunk with unjoinable path");
                continue;
            }
        };
        let rel_path = match storage::relative_mirror_path(url.path()) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "skipping chunk with unsafe path");
                continue;
            }
        };
        by_url
            .entry(url.as_str().to_string())
            .or_insert(AssetTarget { kind, url, rel_path });
    }
    by_url.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ChunkTable;

    fn table(entries: &[(u32, &str)]) -> ChunkTable {
        entries.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    fn origin() -> Url {
        Url::parse("https://mt.example.com").unwrap()
    }

    fn urls(targets: &[AssetTarget]) -> Vec<String> {
        targets.iter().map(|t| t.url.to_string()).collect()
    }

    #[test]
    fn js_targets_under_base_path() {
        let tables = ChunkTables {
            js: table(&[(0, "aaaa1111"), (1, "bbbb2222")]),
            ..Default::default()
        };
        let targets = build_targets("/wap/", &origin(), &tables);
        assert_eq!(
            urls(&targets),
            vec![
                "https://mt.example.com/wap/static/js/0.aaaa1111.js",
                "https://mt.example.com/wap/static/js/1.bbbb2222.js",
            ]
        );
        assert_eq!(
            targets[0].rel_path,
            PathBuf::from("wap/static/js/0.aaaa1111.js")
        );
        assert!(targets.iter().all(|t| t.kind == AssetKind::Js));
    }

    #[test]
    fn css_target_uses_name_override() {
        let tables = ChunkTables {
            css: table(&[(10, "cccc3333")]),
            css_names: table(&[(10, "Vote")]),
            ..Default::default()
        };
        let targets = build_targets("/wap/", &origin(), &tables);
        assert_eq!(
            urls(&targets),
            vec!["https://mt.example.com/wap/static/css/Vote.cccc3333.css"]
        );
        assert_eq!(targets[0].kind, AssetKind::Css);
    }

    #[test]
    fn css_name_with_spaces_and_cjk_keeps_real_file_name() {
        let tables = ChunkTables {
            css: table(&[(10, "cccc3333")]),
            css_names: table(&[(10, "投票 页")]),
            ..Default::default()
        };
        let targets = build_targets("/wap/", &origin(), &tables);
        assert_eq!(
            targets[0].url.as_str(),
            "https://mt.example.com/wap/static/css/%E6%8A%95%E7%A5%A8%20%E9%A1%B5.cccc3333.css"
        );
        assert_eq!(
            targets[0].rel_path,
            PathBuf::from("wap/static/css/投票 页.cccc3333.css")
        );
    }

    #[test]
    fn css_target_without_override_uses_id() {
        let tables = ChunkTables {
            css: table(&[(5, "dddd4444"), (7, "eeee5555")]),
            css_names: table(&[(5, "Home")]),
            ..Default::default()
        };
        let targets = build_targets("/", &origin(), &tables);
        assert_eq!(
            urls(&targets),
            vec![
                "https://mt.example.com/static/css/7.eeee5555.css",
                "https://mt.example.com/static/css/Home.dddd4444.css",
            ]
        );
    }

    #[test]
    fn output_is_sorted_and_deduplicated() {
        // Two names mapping to the same URL must collapse to one target.
        let tables = ChunkTables {
            js: table(&[(2, "22222222"), (10, "aaaaaaaa"), (1, "11111111")]),
            css: table(&[(3, "abcdef01"), (4, "abcdef01")]),
            css_names: table(&[(3, "Same"), (4, "Same")]),
        };
        let targets = build_targets("/wap/", &origin(), &tables);
        let got = urls(&targets);
        let mut sorted = got.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(got, sorted);
        assert_eq!(got.len(), 4);
    }

    #[test]
    fn build_is_pure() {
        let tables = ChunkTables {
            js: table(&[(0, "aaaa1111")]),
            css: table(&[(7, "cccc3333")]),
            css_names: ChunkTable::new(),
        };
        let before = tables.clone();
        let a = build_targets("/wap/", &origin(), &tables);
        let b = build_targets("/wap/", &origin(), &tables);
        assert_eq!(a, b);
        assert_eq!(tables, before);
        assert!(urls(&a).contains(&"https://mt.example.com/wap/static/css/7.cccc3333.css".to_string()));
    }

    #[test]
    fn origin_keeps_port_and_drops_path() {
        let u = Url::parse("http://127.0.0.1:8080/wap/static/js/runtime.abc.js").unwrap();
        assert_eq!(origin_of(&u).unwrap().as_str(), "http://127.0.0.1:8080/");
    }

    #[test]
    fn origin_override_wins() {
        let u = Url::parse("https://cdn.example.com/runtime.js").unwrap();
        let o = resolve_origin(&u, Some(" https://www.example.com ")).unwrap();
        assert_eq!(o.as_str(), "https://www.example.com/");
        let o = resolve_origin(&u, Some("")).unwrap();
        assert_eq!(o.as_str(), "https://cdn.example.com/");
        assert!(resolve_origin(&u, Some("not a url")).is_err());
    }
}
