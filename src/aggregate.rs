use std::time::Instant;

use derive_builder::Builder;

use crate::decoder::{CandidateDecoder, NBestStep};
use crate::error::PronError;
use crate::lexicon::Lexicon;
use crate::{PronunciationVariant, WordResult};

/// Default maximum number of generated variants per word.
pub const DEFAULT_MAX_VARIANTS: usize = 4;

/// Default posterior-mass budget for variant generation.
pub const DEFAULT_MASS_THRESHOLD: f64 = 0.9;

/// Default language code.
pub const DEFAULT_LANGUAGE: &str = "is-IS";

/// Upper bound on `max_variants` accepted from callers.
pub const MAX_VARIANTS_LIMIT: usize = 20;

/// Tuning knobs for one aggregation request.
///
/// Supplied per batch and never mutated by the core.
///
/// ```
/// use pron_rs::AggregationPolicy;
///
/// let policy = AggregationPolicy::default();
/// assert_eq!(policy.max_variants, 4);
/// assert_eq!(policy.mass_threshold, 0.9);
/// assert_eq!(policy.language_code, "is-IS");
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct AggregationPolicy {
    /// Maximum number of G2P-generated variants per word. Lexicon entries
    /// are unbounded and always included in full.
    #[builder(default = "DEFAULT_MAX_VARIANTS")]
    pub max_variants: usize,
    /// Stop generating once the accumulated unnormalized posterior mass
    /// reaches this value. Checked before each pull, so the budget can be
    /// overshot by at most the crossing candidate's own posterior.
    #[builder(default = "DEFAULT_MASS_THRESHOLD")]
    pub mass_threshold: f64,
    /// Language to resolve the decoder and lexicon from.
    #[builder(default = "DEFAULT_LANGUAGE.to_string()")]
    pub language_code: String,
}

impl Default for AggregationPolicy {
    fn default() -> Self {
        Self {
            max_variants: DEFAULT_MAX_VARIANTS,
            mass_threshold: DEFAULT_MASS_THRESHOLD,
            language_code: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl AggregationPolicy {
    /// Check caller-supplied values before any aggregation starts.
    ///
    /// Out-of-range values are client-input errors and must surface before
    /// any partial processing. Negative variant counts are unrepresentable
    /// in `usize`, so only the upper bound needs checking here.
    pub fn validate(&self) -> Result<(), PronError> {
        if !(0.0..=1.0).contains(&self.mass_threshold) {
            return Err(PronError::InvalidPolicy(format!(
                "mass_threshold must be in [0, 1], got {}",
                self.mass_threshold
            )));
        }
        if self.max_variants > MAX_VARIANTS_LIMIT {
            return Err(PronError::InvalidPolicy(format!(
                "max_variants must be at most {MAX_VARIANTS_LIMIT}, got {}",
                self.max_variants
            )));
        }
        Ok(())
    }
}

/// Aggregate curated and generated pronunciation variants for one word.
///
/// Lexicon entries are seeded first, verbatim and in lexicon order; the
/// decoder's n-best search then appends generated variants until the
/// posterior-mass budget is spent, `max_variants` is reached, the search is
/// exhausted, or the decoder fails. Failures are local to the word: whatever
/// was collected up to that point is still returned, and the returned
/// `word` always keeps the caller's original casing.
///
/// Each generated variant's `normalized_prob` is its posterior divided by
/// the running-maximum posterior at the time of its own insertion. Later,
/// lower-scored variants normalize against an already-fixed running maximum;
/// earlier variants are never retroactively renormalized.
///
/// `deadline`, when given, bounds the wall-clock time spent pulling
/// candidates; exceeding it stops generation for this word only.
pub fn aggregate(
    word: &str,
    policy: &AggregationPolicy,
    lexicon: Option<&Lexicon>,
    decoder: &dyn CandidateDecoder,
    deadline: Option<Instant>,
) -> WordResult {
    let lowered = word.to_lowercase();
    let mut results: Vec<PronunciationVariant> = lexicon
        .and_then(|lex| lex.lookup(&lowered))
        .map(|entries| entries.to_vec())
        .unwrap_or_default();

    let graphemes: Vec<char> = lowered.chars().collect();
    let mut search = match decoder.n_best(&graphemes) {
        Ok(search) => search,
        Err(failure) => {
            log::warn!("G2P unavailable for {word:?}: {failure}");
            return WordResult {
                word: word.to_string(),
                results,
            };
        }
    };

    let total_log_likelihood = search.total_log_likelihood();
    let mut running_max = 0.0f64;
    let mut accumulated_mass = 0.0f64;
    let mut generated = 0usize;

    while accumulated_mass < policy.mass_threshold && generated < policy.max_variants {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            log::warn!("deadline exceeded decoding {word:?} after {generated} variants");
            break;
        }
        match search.next() {
            NBestStep::Candidate(candidate) => {
                let posterior = (candidate.log_likelihood - total_log_likelihood).exp();
                if posterior > running_max {
                    running_max = posterior;
                }
                results.push(PronunciationVariant {
                    pronunciation: candidate.phonemes.join(" "),
                    normalized_prob: posterior / running_max,
                    posterior: Some(posterior),
                    manual: false,
                });
                accumulated_mass += posterior;
                generated += 1;
            }
            NBestStep::Exhausted => break,
            NBestStep::Failed(failure) => {
                log::warn!("decoding failed for {word:?} after {generated} variants: {failure}");
                break;
            }
        }
    }

    log::debug!(
        "{word:?}: {} lexicon entries, {generated} generated, mass {accumulated_mass:.4}",
        results.len() - generated
    );
    WordResult {
        word: word.to_string(),
        results,
    }
}
