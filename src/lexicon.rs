use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::error::PronError;
use crate::PronunciationVariant;

/// An immutable store of manually verified pronunciations, keyed by
/// lowercased word.
///
/// Built once per configured language from a line-oriented text resource and
/// never mutated afterwards, so it is safe to share across threads for
/// concurrent lookups.
///
/// # File Format
///
/// One entry per line, whitespace-delimited:
///
/// ```text
/// word [probability] phoneme...
/// ```
///
/// The probability column is detected once, from the first non-blank line,
/// by checking whether the second field starts with `[01].[0-9]`. If absent,
/// every entry gets probability `1.0`. Multiple lines for the same word
/// accumulate in file order; first-listed entries are treated as most
/// authoritative.
///
/// ```
/// use pron_rs::Lexicon;
///
/// let lex = Lexicon::from_reader("halló h a l ou\n".as_bytes())?;
/// assert!(lex.lookup("HALLÓ").is_some());
/// # Ok::<(), pron_rs::PronError>(())
/// ```
#[derive(Debug)]
pub struct Lexicon {
    entries: HashMap<String, Vec<PronunciationVariant>>,
}

impl Lexicon {
    /// Load a lexicon from a file.
    ///
    /// A malformed file is a startup error that makes the affected language
    /// unusable; it is never recovered per request.
    pub fn from_path(path: &Path) -> Result<Self, PronError> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file), &path.display().to_string())
    }

    /// Load a lexicon from any reader, e.g. an in-memory string.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PronError> {
        Self::parse(BufReader::new(reader), "<reader>")
    }

    fn parse<R: BufRead>(reader: R, source_name: &str) -> Result<Self, PronError> {
        let mut entries: HashMap<String, Vec<PronunciationVariant>> = HashMap::new();
        // Column layout is probed once, on the first non-blank line. A
        // malformed first line poisons detection for the entire file; that
        // is accepted policy, not something to silently work around.
        let mut has_probs: Option<bool> = None;
        let mut line_count = 0usize;

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            if fields.len() < 2 {
                return Err(PronError::LexiconParse {
                    source_name: source_name.to_string(),
                    line: idx + 1,
                    message: "expected a word followed by at least one field".to_string(),
                });
            }

            let has_probs = *has_probs.get_or_insert_with(|| looks_like_prob(fields[1]));
            let (prob, phonemes) = if has_probs {
                let prob: f64 = fields[1].parse().map_err(|_| PronError::LexiconParse {
                    source_name: source_name.to_string(),
                    line: idx + 1,
                    message: format!("unparseable probability {:?}", fields[1]),
                })?;
                if fields.len() < 3 {
                    return Err(PronError::LexiconParse {
                        source_name: source_name.to_string(),
                        line: idx + 1,
                        message: "probability column present but no phonemes".to_string(),
                    });
                }
                (prob, &fields[2..])
            } else {
                (1.0, &fields[1..])
            };

            entries
                .entry(fields[0].to_lowercase())
                .or_default()
                .push(PronunciationVariant {
                    pronunciation: phonemes.join(" "),
                    normalized_prob: prob,
                    posterior: None,
                    manual: true,
                });
            line_count += 1;
        }

        log::info!(
            "Loaded {line_count} lexicon entries for {} words from {source_name}",
            entries.len()
        );
        Ok(Self { entries })
    }

    /// Look up all curated entries for a word, case-insensitively.
    ///
    /// Entries are returned in file order, `manual = true`, unchanged.
    pub fn lookup(&self, word: &str) -> Option<&[PronunciationVariant]> {
        self.entries.get(&word.to_lowercase()).map(Vec::as_slice)
    }

    /// Number of distinct words in the lexicon.
    pub fn word_count(&self) -> usize {
        self.entries.len()
    }
}

/// Probability-column probe: the field must start with `[01].[0-9]`.
/// Trailing characters are not inspected, matching the prefix semantics the
/// lexicon format has always had.
fn looks_like_prob(field: &str) -> bool {
    let mut chars = field.chars();
    matches!(chars.next(), Some('0' | '1'))
        && chars.next() == Some('.')
        && chars.next().is_some_and(|c| c.is_ascii_digit())
}
