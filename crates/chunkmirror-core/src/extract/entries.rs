//! Flat `key:"value"` scanning over an isolated object-literal body.

use regex::Regex;
use std::sync::LazyLock;

use super::{ChunkId, ChunkTable};

static HASH_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b([0-9]+)\s*:\s*(?:"([0-9a-f]{8,})"|'([0-9a-f]{8,})')"#)
        .expect("hash entry pattern is valid")
});

static NAME_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b([0-9]+)\s*:\s*(?:"([^"]+)"|'([^']+)')"#).expect("name entry pattern is valid")
});

/// Collect `id:"hexhash"` pairs (hash: lowercase hex, at least 8 chars).
/// Later duplicates overwrite earlier ones.
pub fn scan_hash_entries(body: &str) -> ChunkTable {
    scan(&HASH_ENTRY, body)
}

/// Collect `id:"any name"` pairs. Later duplicates overwrite earlier ones.
pub fn scan_name_entries(body: &str) -> ChunkTable {
    scan(&NAME_ENTRY, body)
}

fn scan(re: &Regex, body: &str) -> ChunkTable {
    let mut table = ChunkTable::new();
    for caps in re.captures_iter(body) {
        let Ok(id) = caps[1].parse::<ChunkId>() else {
            tracing::debug!(key = &caps[1], "skipping chunk id out of range");
            continue;
        };
        let Some(value) = caps.get(2).or_else(|| caps.get(3)) else {
            continue;
        };
        table.insert(id, value.as_str().to_string());
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_entries_exact_keys_and_values() {
        let t = scan_hash_entries(r#"0:"963a5d1c64ba2d597ebf",1:"0ff1ce00",25:"deadbeef""#);
        assert_eq!(t.len(), 3);
        assert_eq!(t[&0], "963a5d1c64ba2d597ebf");
        assert_eq!(t[&1], "0ff1ce00");
        assert_eq!(t[&25], "deadbeef");
    }

    #[test]
    fn hash_entries_reject_short_upper_and_non_hex() {
        let t = scan_hash_entries(r#"0:"abc",1:"ABCDEF12",2:"zzzzzzzz",3:"abcdef12""#);
        assert_eq!(t.into_iter().collect::<Vec<_>>(), vec![(3, "abcdef12".to_string())]);
    }

    #[test]
    fn hash_entries_ignore_keys_glued_to_identifiers() {
        let t = scan_hash_entries(r#"a1:"abcdef12",2:"12345678""#);
        assert_eq!(t.keys().copied().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn duplicate_keys_last_write_wins() {
        let t = scan_hash_entries(r#"4:"11111111",4:"22222222""#);
        assert_eq!(t[&4], "22222222");
    }

    #[test]
    fn oversized_key_is_skipped() {
        let t = scan_hash_entries(r#"99999999999:"abcdef12",1:"abcdef12""#);
        assert_eq!(t.keys().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn name_entries_accept_any_quoted_string() {
        let t = scan_name_entries(r#"10:"Vote",11:'user-center',12:"a b""#);
        assert_eq!(t[&10], "Vote");
        assert_eq!(t[&11], "user-center");
        assert_eq!(t[&12], "a b");
    }

    #[test]
    fn empty_body_yields_empty_table() {
        assert!(scan_hash_entries("").is_empty());
        assert!(scan_name_entries("").is_empty());
    }
}
