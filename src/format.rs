use crate::error::PronError;
use crate::WordResult;

/// Render results as a JSON array, one object per input word.
///
/// Field names follow the wire format: `word`, `results`, `normalizedProb`,
/// `posterior` (generated variants only), `pronunciation`, `manual`.
pub fn to_json(results: &[WordResult]) -> Result<String, PronError> {
    Ok(serde_json::to_string(results)?)
}

/// Render results as tab-separated rows:
///
/// ```text
/// word <TAB> normalizedProb <TAB> pronunciation
/// ```
///
/// One row per `(word, variant)` pair, variants in result order, words
/// concatenated in input order, rows joined by newlines with no trailing
/// newline. The probability column uses the shortest decimal form that
/// round-trips, so the ranking can be re-derived exactly from the text.
pub fn to_tsv(results: &[WordResult]) -> String {
    let rows: Vec<String> = results
        .iter()
        .flat_map(|item| {
            item.results.iter().map(|variant| {
                format!(
                    "{}\t{}\t{}",
                    item.word, variant.normalized_prob, variant.pronunciation
                )
            })
        })
        .collect();
    rows.join("\n")
}
