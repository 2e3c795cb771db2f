//! Rank-table acquisition: HTTP download of `.tiktoken` files and on-disk
//! caching. The core never calls into this module directly; it consumes a
//! fully built rank map however one was obtained.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::{Result, TokenizerError};
use crate::rank::{parse_tiktoken_bpe, validate_ranks, RankMap};

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("tiktoken-core")
}

fn cache_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Returns the bytes of `url`, reading from `cache_dir` (or the platform
/// cache directory if unset) when present, otherwise blocking-fetching and
/// writing the response back to the cache before returning it.
fn fetch_cached(url: &str, cache_dir: Option<&Path>) -> Result<String> {
    let dir = cache_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(default_cache_dir);
    let path = dir.join(cache_key(url));

    if let Ok(cached) = fs::read_to_string(&path) {
        return Ok(cached);
    }

    let response = reqwest::blocking::get(url)
        .map_err(|e| TokenizerError::Loader(format!("fetching {url}: {e}")))?;
    let text = response
        .text()
        .map_err(|e| TokenizerError::Loader(format!("reading response from {url}: {e}")))?;

    if fs::create_dir_all(&dir).is_ok() {
        // Best-effort: a cache write failure shouldn't fail the load.
        let _ = fs::write(&path, &text);
    }

    Ok(text)
}

/// Loads and validates a `.tiktoken` rank file, using `cache_dir` (or the
/// platform default) as an on-disk cache keyed by the source URL.
pub fn load_tiktoken_bpe(url: &str, cache_dir: Option<&Path>) -> Result<RankMap> {
    let contents = fetch_cached(url, cache_dir)?;
    let ranks = parse_tiktoken_bpe(&contents);
    validate_ranks(&ranks)?;
    Ok(ranks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_from_an_existing_cache_file_without_touching_the_network() {
        let dir = tempfile::tempdir().unwrap();
        let url = "https://example.invalid/does-not-matter.tiktoken";
        let path = dir.path().join(cache_key(url));

        let mut contents = String::new();
        for b in 0u16..=255 {
            use base64::{engine::general_purpose, Engine as _};
            contents.push_str(&general_purpose::STANDARD.encode([b as u8]));
            contents.push(' ');
            contents.push_str(&b.to_string());
            contents.push('\n');
        }
        fs::write(&path, &contents).unwrap();

        let ranks = load_tiktoken_bpe(url, Some(dir.path())).unwrap();
        assert_eq!(ranks.len(), 256);
    }
}
