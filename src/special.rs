//! The special-token splitter: carves literal trigger strings like
//! `<|endoftext|>` out of raw text without disturbing the surrounding bytes.

use fancy_regex::Regex;

use crate::error::{Result, TokenizerError};

/// How to resolve overlapping special-token triggers at the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecialTokenMatching {
    /// Triggers are compiled in caller-supplied order with no length
    /// sorting; the regex engine's first-alternative-wins rule decides.
    /// Mirrors the reference implementation; nondeterministic under
    /// trigger-prefix overlaps.
    #[default]
    Parity,
    /// Longest trigger wins, ties broken lexicographically. Implemented by
    /// sorting triggers by descending byte length before compiling.
    Longest,
}

impl std::str::FromStr for SpecialTokenMatching {
    type Err = TokenizerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "parity" => Ok(Self::Parity),
            "longest" => Ok(Self::Longest),
            other => Err(TokenizerError::InvalidSpecialTokenMatching(other.to_string())),
        }
    }
}

/// A segment of text tagged by whether it is a literal special-token
/// trigger or ordinary text to be piece-split and BPE'd.
#[derive(Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Special(&'a str),
}

/// Compiles the alternation over `specials`' keys, honoring `mode`'s
/// ordering policy. Returns `None` when there are no special tokens at all,
/// so callers can skip the splitter entirely.
pub fn build_special_regex(
    specials: &[(String, usize)],
    mode: SpecialTokenMatching,
) -> Result<Option<Regex>> {
    if specials.is_empty() {
        return Ok(None);
    }

    let mut names: Vec<&str> = specials.iter().map(|(k, _)| k.as_str()).collect();
    if mode == SpecialTokenMatching::Longest {
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    }

    let pattern = names
        .iter()
        .map(|s| regex::escape(s))
        .collect::<Vec<_>>()
        .join("|");

    Regex::new(&pattern).map(Some).map_err(|e| TokenizerError::InvalidSpecialRegex(e.to_string()))
}

/// Splits `text` into an ordered interleaving of text and special segments.
/// With `special_regex = None` the whole input is a single text segment.
pub fn split_specials<'a>(text: &'a str, special_regex: Option<&Regex>) -> Result<Vec<Segment<'a>>> {
    let re = match special_regex {
        None => return Ok(vec![Segment::Text(text)]),
        Some(re) => re,
    };

    let mut segments = Vec::new();
    let mut cursor = 0;
    for found in re.find_iter(text) {
        let m = found.map_err(|e| TokenizerError::InvalidSpecialRegex(e.to_string()))?;
        if m.start() > cursor {
            segments.push(Segment::Text(&text[cursor..m.start()]));
        }
        segments.push(Segment::Special(m.as_str()));
        cursor = m.end();
    }
    if cursor < text.len() {
        segments.push(Segment::Text(&text[cursor..]));
    }
    if segments.is_empty() {
        segments.push(Segment::Text(""));
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specials() -> Vec<(String, usize)> {
        vec![
            ("<|endoftext|>".to_string(), 100257),
            ("<|fim_prefix|>".to_string(), 100258),
        ]
    }

    #[test]
    fn empty_specials_bypasses_the_splitter() {
        let re = build_special_regex(&[], SpecialTokenMatching::Parity).unwrap();
        assert!(re.is_none());
        let segments = split_specials("hello world", re.as_ref()).unwrap();
        assert_eq!(segments, vec![Segment::Text("hello world")]);
    }

    #[test]
    fn splits_around_a_trigger() {
        let re = build_special_regex(&specials(), SpecialTokenMatching::Parity).unwrap();
        let segments = split_specials("Hello <|endoftext|> world", re.as_ref()).unwrap();
        assert_eq!(
            segments,
            vec![
                Segment::Text("Hello "),
                Segment::Special("<|endoftext|>"),
                Segment::Text(" world"),
            ]
        );
    }

    #[test]
    fn trigger_at_the_very_start_has_no_leading_text_segment() {
        let re = build_special_regex(&specials(), SpecialTokenMatching::Parity).unwrap();
        let segments = split_specials("<|endoftext|>tail", re.as_ref()).unwrap();
        assert_eq!(
            segments,
            vec![Segment::Special("<|endoftext|>"), Segment::Text("tail")]
        );
    }

    #[test]
    fn longest_mode_prefers_the_longer_overlapping_trigger() {
        let overlapping = vec![("<|a|>".to_string(), 1), ("<|a|><|b|>".to_string(), 2)];
        let re = build_special_regex(&overlapping, SpecialTokenMatching::Longest).unwrap();
        let segments = split_specials("<|a|><|b|>", re.as_ref()).unwrap();
        assert_eq!(segments, vec![Segment::Special("<|a|><|b|>")]);
    }
}
