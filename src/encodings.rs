//! Static definitions of the four encodings this crate knows how to build:
//! their `pat_str`, special-token tables, and rank-file source URLs.

use crate::error::{Result, TokenizerError};

pub(crate) struct EncodingSpec {
    pub name: &'static str,
    pub url: &'static str,
    pub pat_str: &'static str,
    pub specials: &'static [(&'static str, usize)],
}

const CL100K_PAT: &str = r"(?i:'s|'t|'re|'ve|'m|'ll|'d)|[^\r\n\p{L}\p{N}]?\p{L}+|\p{N}{1,3}| ?[^\s\p{L}\p{N}]+[\r\n]*|\s*[\r\n]+|\s+(?!\S)|\s+";

const P50K_R50K_PAT: &str = r"'s|'t|'re|'ve|'m|'ll|'d| ?\p{L}+| ?\p{N}+| ?[^\s\p{L}\p{N}]+|\s+(?!\S)|\s+";

const O200K_PAT: &str = concat!(
    r"[^\r\n\p{L}\p{N}]?[\p{Lu}\p{Lt}\p{Lm}\p{Lo}\p{M}]*[\p{Ll}\p{Lm}\p{Lo}\p{M}]+",
    r"('s|'S|'t|'T|'re|'rE|'Re|'RE|'ve|'vE|'Ve|'VE|'m|'M|'ll|'lL|'Ll|'LL|'d|'D)?",
    r"|[^\r\n\p{L}\p{N}]?[\p{Lu}\p{Lt}\p{Lm}\p{Lo}\p{M}]+[\p{Ll}\p{Lm}\p{Lo}\p{M}]*",
    r"('s|'S|'t|'T|'re|'rE|'Re|'RE|'ve|'vE|'Ve|'VE|'m|'M|'ll|'lL|'Ll|'LL|'d|'D)?",
    r"|\p{N}{1,3}",
    r"| ?[^\s\p{L}\p{N}]+[\r\n/]*",
    r"|\s*[\r\n]+",
    r"|\s+(?!\S)",
    r"|\s+",
);

const CL100K_SPECIALS: &[(&str, usize)] = &[
    ("<|endoftext|>", 100257),
    ("<|fim_prefix|>", 100258),
    ("<|fim_middle|>", 100259),
    ("<|fim_suffix|>", 100260),
    ("<|endofprompt|>", 100276),
];

const P50K_R50K_SPECIALS: &[(&str, usize)] = &[("<|endoftext|>", 50256)];

const O200K_SPECIALS: &[(&str, usize)] = &[
    ("<|endoftext|>", 199999),
    ("<|endofprompt|>", 200018),
];

const ENCODINGS: &[EncodingSpec] = &[
    EncodingSpec {
        name: "cl100k_base",
        url: "https://openaipublic.blob.core.windows.net/encodings/cl100k_base.tiktoken",
        pat_str: CL100K_PAT,
        specials: CL100K_SPECIALS,
    },
    EncodingSpec {
        name: "p50k_base",
        url: "https://openaipublic.blob.core.windows.net/encodings/p50k_base.tiktoken",
        pat_str: P50K_R50K_PAT,
        specials: P50K_R50K_SPECIALS,
    },
    EncodingSpec {
        name: "r50k_base",
        url: "https://openaipublic.blob.core.windows.net/encodings/r50k_base.tiktoken",
        pat_str: P50K_R50K_PAT,
        specials: P50K_R50K_SPECIALS,
    },
    EncodingSpec {
        name: "o200k_base",
        url: "https://openaipublic.blob.core.windows.net/encodings/o200k_base.tiktoken",
        pat_str: O200K_PAT,
        specials: O200K_SPECIALS,
    },
];

pub(crate) fn spec_for_name(name: &str) -> Result<&'static EncodingSpec> {
    ENCODINGS
        .iter()
        .find(|spec| spec.name == name)
        .ok_or_else(|| TokenizerError::UnknownEncoding(name.to_string()))
}

/// The encoding names this crate knows how to construct.
pub fn encoding_names() -> Vec<&'static str> {
    ENCODINGS.iter().map(|spec| spec.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_declared_encoding_resolves() {
        for name in encoding_names() {
            assert!(spec_for_name(name).is_ok());
        }
    }

    #[test]
    fn unknown_encoding_name_is_an_error() {
        assert!(matches!(
            spec_for_name("not-a-real-encoding"),
            Err(TokenizerError::UnknownEncoding(_))
        ));
    }
}
