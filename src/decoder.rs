/// Error raised when a decoder cannot translate a word's symbols, e.g. for
/// graphemes outside the model's alphabet.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("translation failure: {0}")]
pub struct TranslationFailure(pub String);

/// A single candidate pronunciation produced by the decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Log-likelihood of this candidate under the model.
    pub log_likelihood: f64,
    /// Phoneme tokens in pronunciation order.
    pub phonemes: Vec<String>,
}

/// Outcome of one pull from an ongoing n-best search.
///
/// The three variants replace the exception-driven stop/failure signaling of
/// typical n-best decoders with an explicit tagged result consumed by the
/// aggregation loop via pattern matching.
#[derive(Debug, Clone)]
pub enum NBestStep {
    /// The next candidate, in decreasing-likelihood order.
    Candidate(Candidate),
    /// The search tree holds no further candidates. Not an error.
    Exhausted,
    /// The decoder cannot continue with this word.
    Failed(TranslationFailure),
}

/// An ongoing incremental n-best search over one word.
pub trait NBestSearch {
    /// Total log-likelihood mass of the search tree, fixed at initialization.
    ///
    /// Candidate posteriors are computed as
    /// `exp(log_likelihood - total_log_likelihood)`.
    fn total_log_likelihood(&self) -> f64;

    /// Pull the next candidate.
    ///
    /// Every call must resolve to one of the three [`NBestStep`] variants; a
    /// decoder must not block without producing a step. Callers additionally
    /// enforce an optional deadline between pulls, so a stalled decoder only
    /// ever costs its own word.
    fn next(&mut self) -> NBestStep;
}

/// A per-language statistical G2P model driven as an incremental search.
///
/// The model itself is an external collaborator; this crate only pulls
/// candidates from it. Implementations are shared read-only across words,
/// and across threads when batches run in parallel, hence `Send + Sync`.
pub trait CandidateDecoder: Send + Sync {
    /// Begin an n-best search over a word's grapheme sequence.
    ///
    /// Initialization itself may fail for untranslatable input; callers
    /// treat that the same as a failure on the first pull.
    fn n_best(&self, graphemes: &[char])
        -> Result<Box<dyn NBestSearch + '_>, TranslationFailure>;
}
