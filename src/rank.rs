//! The rank table: an immutable `bytes -> id` map plus its on-the-wire format.

use rustc_hash::FxHashMap as HashMap;
use std::collections::HashSet;

use base64::{engine::general_purpose, Engine as _};

use crate::error::{Result, TokenizerError};

pub type RankMap = HashMap<Vec<u8>, usize>;

/// Parses the `.tiktoken` file format: one `base64(bytes) SPACE rank` entry
/// per line. Lines that don't parse are silently skipped; duplicate keys
/// resolve last-wins, matching the reference loader's behavior.
pub fn parse_tiktoken_bpe(contents: &str) -> RankMap {
    let mut ranks = HashMap::default();
    for line in contents.lines() {
        if line.is_empty() {
            continue;
        }
        let mut parts = line.splitn(2, ' ');
        let (token_b64, rank_str) = match (parts.next(), parts.next()) {
            (Some(a), Some(b)) => (a, b),
            _ => continue,
        };
        let token = match general_purpose::STANDARD.decode(token_b64) {
            Ok(bytes) => bytes,
            Err(_) => continue,
        };
        let rank: usize = match rank_str.trim_end().parse() {
            Ok(r) => r,
            Err(_) => continue,
        };
        ranks.insert(token, rank);
    }
    ranks
}

/// Checks the invariants a rank table must hold before it can back a
/// [`crate::Encoding`]: no empty keys, unique ids, and an entry for every
/// single byte so the BPE engine is guaranteed to terminate on any input.
pub fn validate_ranks(ranks: &RankMap) -> Result<()> {
    if ranks.keys().any(|k| k.is_empty()) {
        return Err(TokenizerError::InvalidMergeableRanks(
            "rank table contains an empty byte string key".to_string(),
        ));
    }

    let mut seen_ids = HashSet::with_capacity(ranks.len());
    for &id in ranks.values() {
        if !seen_ids.insert(id) {
            return Err(TokenizerError::InvalidMergeableRanks(format!(
                "duplicate rank id {id}"
            )));
        }
    }

    for byte in 0u16..=255 {
        let key = [byte as u8];
        if !ranks.contains_key(key.as_slice()) {
            return Err(TokenizerError::InvalidMergeableRanks(format!(
                "missing single-byte entry for 0x{byte:02x}"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_base64_rank_pairs() {
        let data = "YQ== 0\nYg== 1\n";
        let ranks = parse_tiktoken_bpe(data);
        assert_eq!(ranks.get(b"a".as_slice()), Some(&0));
        assert_eq!(ranks.get(b"b".as_slice()), Some(&1));
    }

    #[test]
    fn skips_unparseable_lines() {
        let data = "YQ== 0\nnot-a-valid-line\nYg== notanumber\nYw== 2\n";
        let ranks = parse_tiktoken_bpe(data);
        assert_eq!(ranks.len(), 2);
        assert_eq!(ranks.get(b"c".as_slice()), Some(&2));
    }

    #[test]
    fn duplicate_keys_are_last_wins() {
        let data = "YQ== 0\nYQ== 5\n";
        let ranks = parse_tiktoken_bpe(data);
        assert_eq!(ranks.get(b"a".as_slice()), Some(&5));
    }

    #[test]
    fn validate_rejects_missing_single_bytes() {
        let mut ranks = HashMap::default();
        ranks.insert(b"a".to_vec(), 0);
        assert!(validate_ranks(&ranks).is_err());
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let mut ranks: RankMap = (0u16..=255).map(|b| (vec![b as u8], 0usize)).collect();
        ranks.insert(vec![0, 1], 0);
        assert!(validate_ranks(&ranks).is_err());
    }

    #[test]
    fn validate_accepts_full_byte_table() {
        let ranks: RankMap = (0u16..=255).map(|b| (vec![b as u8], b as usize)).collect();
        assert!(validate_ranks(&ranks).is_ok());
    }
}
