//! # pron-rs
//!
//! A Rust library for pronunciation lookup: given a word and a language, it
//! returns one or more phonetic transcriptions with confidence scores, drawn
//! first from a curated lexicon and then from a statistical
//! grapheme-to-phoneme (G2P) model driven as an incremental n-best search.
//!
//! ## Features
//!
//! - **Lexicon-first results**: manually verified pronunciations always come
//!   before statistically generated variants
//! - **Mass-bounded generation**: the n-best search stops once a configurable
//!   posterior-probability budget is spent
//! - **Pluggable decoders**: the statistical model is consumed through the
//!   [`CandidateDecoder`] trait, never reimplemented here
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! pron-rs = "0.1"
//! ```
//!
//! ```ignore
//! use std::sync::Arc;
//! use pron_rs::{aggregate_all, AggregationPolicy, Lexicon, LanguageEntry, LanguageRegistry};
//!
//! let mut registry = LanguageRegistry::new();
//! registry.register("is-IS", LanguageEntry {
//!     decoder: Arc::new(my_decoder),
//!     lexicon: Some(Lexicon::from_path("is-IS.lex".as_ref())?),
//! });
//!
//! let words = vec!["hús".to_string()];
//! let results = aggregate_all(&words, &AggregationPolicy::default(), &registry, None)?;
//! println!("{}", pron_rs::format::to_json(&results)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod aggregate;
pub mod batch;
pub mod decoder;
pub mod error;
pub mod format;
pub mod lexicon;
pub mod registry;

pub use aggregate::{aggregate, AggregationPolicy, AggregationPolicyBuilder};
pub use batch::{aggregate_all, aggregate_iter};
pub use decoder::{Candidate, CandidateDecoder, NBestSearch, NBestStep, TranslationFailure};
pub use error::PronError;
pub use lexicon::Lexicon;
pub use registry::{LanguageConfig, LanguageEntry, LanguageRegistry};

use serde::Serialize;

/// A single pronunciation variant for a word.
///
/// Curated lexicon entries carry `manual = true` and no posterior; variants
/// generated by the statistical decoder carry `manual = false` and the
/// unnormalized posterior they were scored with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PronunciationVariant {
    /// Space-separated phoneme tokens.
    pub pronunciation: String,
    /// Confidence in `(0, 1]`. For generated variants this is the posterior
    /// divided by the running-maximum posterior at the time of insertion.
    pub normalized_prob: f64,
    /// Unnormalized posterior; only present on generated variants.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posterior: Option<f64>,
    /// True for manually verified lexicon entries.
    pub manual: bool,
}

/// The aggregated pronunciation result for one input word.
///
/// `results` holds all lexicon entries first (in lexicon order), then
/// generated variants in decode order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordResult {
    /// The word in its original caller-supplied casing.
    pub word: String,
    pub results: Vec<PronunciationVariant>,
}

impl WordResult {
    /// Number of manually verified lexicon entries in this result.
    pub fn manual_count(&self) -> usize {
        self.results.iter().filter(|v| v.manual).count()
    }

    /// Number of decoder-generated variants in this result.
    pub fn generated_count(&self) -> usize {
        self.results.iter().filter(|v| !v.manual).count()
    }
}
