//! The encoder façade: orchestrates special-split -> piece-split -> BPE ->
//! concatenation, and inverts the ranks/specials maps for decoding.

use std::collections::HashSet;

use fancy_regex::Regex;
use rustc_hash::FxHashMap as HashMap;

use crate::bpe::byte_pair_encode;
use crate::error::{Result, TokenizerError};
use crate::rank::{validate_ranks, RankMap};
use crate::special::{build_special_regex, split_specials, Segment, SpecialTokenMatching};

/// A constructed, immutable tokenizer for one encoding.
///
/// Once built an `Encoding` never mutates; its maps and compiled regexes may
/// be shared freely across threads without synchronization.
pub struct Encoding {
    name: String,
    pat_str: String,
    ranks: RankMap,
    decoder: HashMap<usize, Vec<u8>>,
    specials: HashMap<String, usize>,
    specials_by_id: HashMap<usize, String>,
    special_matching: SpecialTokenMatching,
    regex: Regex,
    special_regex: Option<Regex>,
    max_token_value: usize,
}

impl std::fmt::Debug for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Encoding({})", self.name)
    }
}

impl Encoding {
    /// Compiles both regexes, validates the rank and special-token maps,
    /// and inverts them for decoding. Fails with a taxonomized error if any
    /// validation fails; a partially-built encoder never escapes this
    /// function.
    pub fn new(
        name: impl Into<String>,
        pat_str: impl Into<String>,
        ranks: RankMap,
        specials: Vec<(String, usize)>,
        special_matching: SpecialTokenMatching,
    ) -> Result<Self> {
        let pat_str = pat_str.into();
        validate_ranks(&ranks)?;

        let mut seen_special_ids = HashSet::with_capacity(specials.len());
        for (trigger, id) in &specials {
            if trigger.is_empty() {
                return Err(TokenizerError::InvalidSpecialTokens(
                    "special token trigger must not be empty".to_string(),
                ));
            }
            if !seen_special_ids.insert(*id) {
                return Err(TokenizerError::InvalidSpecialTokens(format!(
                    "duplicate special token id {id}"
                )));
            }
        }

        let regex = Regex::new(&pat_str).map_err(|e| TokenizerError::InvalidPatStr(e.to_string()))?;
        let special_regex = build_special_regex(&specials, special_matching)?;

        let max_token_value = ranks
            .values()
            .copied()
            .max()
            .into_iter()
            .chain(specials.iter().map(|(_, id)| *id))
            .max()
            .unwrap_or(0);

        let decoder = ranks.iter().map(|(bytes, &id)| (id, bytes.clone())).collect();
        let specials_by_id = specials.iter().map(|(name, &id)| (id, name.clone())).collect();
        let specials_map: HashMap<String, usize> = specials.into_iter().collect();

        Ok(Encoding {
            name: name.into(),
            pat_str,
            ranks,
            decoder,
            specials: specials_map,
            specials_by_id,
            special_matching,
            regex,
            special_regex,
            max_token_value,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pat_str(&self) -> &str {
        &self.pat_str
    }

    pub fn special_matching(&self) -> SpecialTokenMatching {
        self.special_matching
    }

    /// One past the highest token id this encoder can produce or decode.
    pub fn n_vocab(&self) -> usize {
        self.max_token_value + 1
    }

    pub fn eot_token(&self) -> Option<usize> {
        self.specials.get("<|endoftext|>").copied()
    }

    fn encode_piece(&self, piece: &[u8], out: &mut Vec<usize>) -> Result<()> {
        if let Some(&token) = self.ranks.get(piece) {
            out.push(token);
            return Ok(());
        }
        out.extend(byte_pair_encode(piece, &self.ranks)?);
        Ok(())
    }

    fn encode_text_segment(&self, segment: &str, out: &mut Vec<usize>) -> Result<()> {
        for found in self.regex.find_iter(segment) {
            let m = found.map_err(|e| TokenizerError::InvalidPatStr(e.to_string()))?;
            self.encode_piece(m.as_str().as_bytes(), out)?;
        }
        Ok(())
    }

    /// Encodes `text`, splitting out special-token triggers first unless
    /// `allow_special` is false, in which case trigger bytes are tokenized
    /// like any other text.
    pub fn encode(&self, text: &str, allow_special: bool) -> Result<Vec<usize>> {
        let special_regex = allow_special.then_some(self.special_regex.as_ref()).flatten();
        let segments = split_specials(text, special_regex)?;

        let mut ids = Vec::new();
        for segment in segments {
            match segment {
                Segment::Text(t) => self.encode_text_segment(t, &mut ids)?,
                Segment::Special(trigger) => {
                    let id = self
                        .specials
                        .get(trigger)
                        .copied()
                        .ok_or_else(|| TokenizerError::UnknownSpecialToken(trigger.to_string()))?;
                    ids.push(id);
                }
            }
        }
        Ok(ids)
    }

    /// Equivalent to `encode(text, false)` but never has to consider special
    /// tokens at all.
    pub fn encode_ordinary(&self, text: &str) -> Result<Vec<usize>> {
        let mut ids = Vec::new();
        self.encode_text_segment(text, &mut ids)?;
        Ok(ids)
    }

    /// Encodes text that is already known to be a single piece (no regex
    /// re-split), useful for tokenizing individual words.
    pub fn encode_single_piece(&self, piece: &[u8]) -> Result<Vec<usize>> {
        let mut ids = Vec::new();
        self.encode_piece(piece, &mut ids)?;
        Ok(ids)
    }

    /// Encodes a byte string known to correspond to exactly one token
    /// (ordinary or special).
    pub fn encode_single_token(&self, piece: &[u8]) -> Result<usize> {
        if let Some(&token) = self.ranks.get(piece) {
            return Ok(token);
        }
        if let Ok(s) = std::str::from_utf8(piece) {
            if let Some(&token) = self.specials.get(s) {
                return Ok(token);
            }
        }
        Err(TokenizerError::MissingRank(piece.to_vec()))
    }

    pub fn decode_bytes(&self, ids: &[usize]) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(ids.len() * 2);
        for &id in ids {
            if let Some(trigger) = self.specials_by_id.get(&id) {
                bytes.extend_from_slice(trigger.as_bytes());
            } else if let Some(token_bytes) = self.decoder.get(&id) {
                bytes.extend_from_slice(token_bytes);
            } else {
                return Err(TokenizerError::UnknownTokenId(id));
            }
        }
        Ok(bytes)
    }

    /// Decodes a token id sequence into a `String`, replacing any maximal
    /// invalid UTF-8 byte run with a single U+FFFD. Lossy by design when
    /// inputs cross token boundaries mid-codepoint.
    pub fn decode(&self, ids: &[usize]) -> Result<String> {
        let bytes = self.decode_bytes(ids)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn decode_single_token_bytes(&self, id: usize) -> Result<Vec<u8>> {
        if let Some(bytes) = self.decoder.get(&id) {
            return Ok(bytes.clone());
        }
        if let Some(trigger) = self.specials_by_id.get(&id) {
            return Ok(trigger.as_bytes().to_vec());
        }
        Err(TokenizerError::UnknownTokenId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_ranks() -> RankMap {
        let mut ranks: RankMap = (0u16..=255).map(|b| (vec![b as u8], b as usize)).collect();
        ranks.insert(b"He".to_vec(), 1000);
        ranks.insert(b"ll".to_vec(), 1001);
        ranks.insert(b"llo".to_vec(), 1002);
        ranks
    }

    fn toy_encoding() -> Encoding {
        Encoding::new(
            "toy",
            r"\w+| ?[^\w\s]+|\s+",
            toy_ranks(),
            vec![("<|endoftext|>".to_string(), 90000)],
            SpecialTokenMatching::Parity,
        )
        .unwrap()
    }

    #[test]
    fn empty_text_encodes_to_empty_ids() {
        let enc = toy_encoding();
        assert_eq!(enc.encode("", true).unwrap(), Vec::<usize>::new());
    }

    #[test]
    fn round_trips_ascii_text() {
        let enc = toy_encoding();
        let text = "Hello, world!";
        let ids = enc.encode(text, true).unwrap();
        assert_eq!(enc.decode(&ids).unwrap(), text);
    }

    #[test]
    fn special_token_is_a_single_id_by_default() {
        let enc = toy_encoding();
        let ids = enc.encode("<|endoftext|>", true).unwrap();
        assert_eq!(ids, vec![90000]);
    }

    #[test]
    fn disallowing_special_tokens_falls_back_to_ordinary_bytes() {
        let enc = toy_encoding();
        let ids = enc.encode("<|endoftext|>", false).unwrap();
        assert_ne!(ids, vec![90000]);
        assert_eq!(enc.decode(&ids).unwrap(), "<|endoftext|>");
    }

    #[test]
    fn decode_of_unknown_id_fails_with_no_partial_output() {
        let enc = toy_encoding();
        let err = enc.decode(&[999_999]).unwrap_err();
        assert!(matches!(err, TokenizerError::UnknownTokenId(999_999)));
    }

    #[test]
    fn single_byte_piece_matching_a_rank_key_emits_that_id() {
        let enc = toy_encoding();
        assert_eq!(enc.encode_single_piece(b"a").unwrap(), vec![b'a' as usize]);
    }
}
