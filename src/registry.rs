//! Ties the pieces together: given an encoding or model name, build an
//! [`Encoding`] by loading its ranks and applying its static pat_str and
//! special-token table.

use crate::encoding::Encoding;
use crate::encodings::spec_for_name;
use crate::error::Result;
use crate::loader::load_tiktoken_bpe;
use crate::model::encoding_name_for_model;
use crate::special::SpecialTokenMatching;

/// Builds a fresh, independent `Encoding` for `name`, fetching its rank
/// table through the loader (network on first use, then the on-disk cache).
pub fn get_encoding(name: &str) -> Result<Encoding> {
    let spec = spec_for_name(name)?;
    let ranks = load_tiktoken_bpe(spec.url, None)?;
    let specials = spec.specials.iter().map(|&(k, v)| (k.to_string(), v)).collect();
    Encoding::new(spec.name, spec.pat_str, ranks, specials, SpecialTokenMatching::Parity)
}

/// Resolves `model` to an encoding name, then builds it exactly as
/// [`get_encoding`] would.
pub fn encoding_for_model(model: &str) -> Result<Encoding> {
    let name = encoding_name_for_model(model)?;
    get_encoding(name)
}
