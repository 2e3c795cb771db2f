//! Model-name to encoding-name resolution: a static lookup table.

use crate::error::{Result, TokenizerError};

/// Checked in order; more specific prefixes (`gpt-4o`) must precede the
/// prefixes they'd otherwise shadow (`gpt-4`).
const MODEL_PREFIX_TO_ENCODING: &[(&str, &str)] = &[
    ("gpt-4o", "o200k_base"),
    ("gpt-4", "cl100k_base"),
    ("gpt-3.5-turbo", "cl100k_base"),
    ("text-embedding-ada-002", "cl100k_base"),
    ("text-embedding-3-", "cl100k_base"),
    ("text-davinci-003", "p50k_base"),
    ("text-davinci-002", "p50k_base"),
    ("code-", "p50k_base"),
    ("text-davinci-001", "r50k_base"),
    ("davinci", "r50k_base"),
    ("curie", "r50k_base"),
    ("babbage", "r50k_base"),
    ("ada", "r50k_base"),
];

/// Resolves a model name (e.g. `gpt-4o-2024-05-13`) to the encoding name it
/// uses, by longest-match-first prefix lookup.
pub fn encoding_name_for_model(model: &str) -> Result<&'static str> {
    MODEL_PREFIX_TO_ENCODING
        .iter()
        .find(|(prefix, _)| model.starts_with(prefix))
        .map(|(_, encoding)| *encoding)
        .ok_or_else(|| TokenizerError::UnknownModel(model.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_model_names() {
        assert_eq!(encoding_name_for_model("gpt-4o-2024-05-13").unwrap(), "o200k_base");
        assert_eq!(encoding_name_for_model("gpt-4-0613").unwrap(), "cl100k_base");
        assert_eq!(encoding_name_for_model("gpt-3.5-turbo").unwrap(), "cl100k_base");
        assert_eq!(encoding_name_for_model("text-embedding-ada-002").unwrap(), "cl100k_base");
        assert_eq!(encoding_name_for_model("text-davinci-003").unwrap(), "p50k_base");
        assert_eq!(encoding_name_for_model("code-davinci-002").unwrap(), "p50k_base");
        assert_eq!(encoding_name_for_model("davinci").unwrap(), "r50k_base");
        assert_eq!(encoding_name_for_model("ada").unwrap(), "r50k_base");
    }

    #[test]
    fn unknown_model_name_is_an_error() {
        assert!(matches!(
            encoding_name_for_model("not-a-real-model"),
            Err(TokenizerError::UnknownModel(_))
        ));
    }
}
