//! A byte-pair-encoding tokenizer behaviorally compatible with OpenAI's
//! reference `tiktoken`.
//!
//! The core is a two-stage pipeline: a Unicode-aware regex splits input
//! into pieces ([`encoding::Encoding`]'s `pat_str`), then byte-pair merging
//! ([`bpe`]) turns each piece into token ids using a rank table. A secondary
//! special-token splitter ([`special`]) carves out literal trigger strings
//! like `<|endoftext|>` before the regex ever sees them.
//!
//! Rank-table acquisition ([`loader`]), model-name resolution ([`model`]),
//! and the optional encoder cache ([`cache`]) are collaborators around that
//! core; none of them are on the hot path of `encode`/`decode`.

mod bpe;
mod cache;
mod encoding;
mod encodings;
mod error;
mod loader;
mod model;
mod rank;
mod registry;
mod special;

pub use cache::get_encoding_cached;
pub use encoding::Encoding;
pub use encodings::encoding_names;
pub use error::{Result, TokenizerError};
pub use model::encoding_name_for_model;
pub use rank::{parse_tiktoken_bpe, validate_ranks, RankMap};
pub use registry::{encoding_for_model, get_encoding};
pub use special::SpecialTokenMatching;

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_ranks() -> RankMap {
        (0u16..=255).map(|b| (vec![b as u8], b as usize)).collect()
    }

    #[test]
    fn encoding_names_lists_the_four_known_encodings() {
        let mut names = encoding_names();
        names.sort_unstable();
        assert_eq!(names, vec!["cl100k_base", "o200k_base", "p50k_base", "r50k_base"]);
    }

    #[test]
    fn an_encoder_built_from_only_single_byte_ranks_round_trips_any_byte_string() {
        let enc = Encoding::new(
            "byte-only",
            r"(?s).",
            toy_ranks(),
            vec![],
            SpecialTokenMatching::Parity,
        )
        .unwrap();

        let text = "hello \u{1F980} world";
        let ids = enc.encode(text, true).unwrap();
        assert_eq!(enc.decode(&ids).unwrap(), text);
    }
}
