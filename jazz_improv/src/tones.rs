// Predicted indices -> grammar tone string.
//
// The model emits vocabulary indices. Rendering decodes them through the
// inverse vocabulary, puts the configured lead tone in front, and rewrites
// tone classes per `RenderConfig::substitutions`. A grammar value is
// `CLASS,duration[,extra...]`; only the class before the first comma is
// rewritten, and the lead tone is left as configured.

use crate::config::RenderConfig;
use crate::error::Result;
use crate::vocab::Vocabulary;

/// Decode `indices` into their grammar values.
pub fn decode<'v>(indices: &[usize], vocabulary: &'v Vocabulary) -> Result<Vec<&'v str>> {
    indices
        .iter()
        .map(|&index| vocabulary.require_symbol(index))
        .collect()
}

/// Apply the class substitution table to one grammar value.
pub fn substitute_class(value: &str, config: &RenderConfig) -> String {
    let (class, rest) = match value.split_once(',') {
        Some((class, rest)) => (class, Some(rest)),
        None => (value, None),
    };
    let class = config
        .substitutions
        .get(class)
        .map(String::as_str)
        .unwrap_or(class);
    match rest {
        Some(rest) => format!("{class},{rest}"),
        None => class.to_owned(),
    }
}

/// Full rendering: lead tone, then each decoded and substituted value,
/// space separated.
pub fn render_tones(
    indices: &[usize],
    vocabulary: &Vocabulary,
    config: &RenderConfig,
) -> Result<String> {
    let values = decode(indices, vocabulary)?;
    let mut out = config.lead_tone.clone();
    for value in values {
        out.push(' ');
        out.push_str(&substitute_class(value, config));
    }
    Ok(out)
}
