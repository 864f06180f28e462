use std::sync::Arc;
use std::time::Instant;

use pron_rs::{
    aggregate_all, format, AggregationPolicyBuilder, Candidate, CandidateDecoder, LanguageConfig,
    LanguageEntry, LanguageRegistry, Lexicon, NBestSearch, NBestStep, TranslationFailure,
};

/// Toy decoder standing in for a trained G2P model: it proposes the word's
/// own letters as phonemes, with geometrically decaying likelihoods and a
/// vowel swapped per rank so the variants differ.
struct EchoDecoder;

struct EchoSearch {
    graphemes: Vec<char>,
    rank: usize,
}

const VOWEL_SWAPS: [(char, char); 3] = [('a', 'a'), ('a', 'ɐ'), ('a', 'ə')];

impl NBestSearch for EchoSearch {
    fn total_log_likelihood(&self) -> f64 {
        0.0
    }

    fn next(&mut self) -> NBestStep {
        if self.rank >= VOWEL_SWAPS.len() {
            return NBestStep::Exhausted;
        }
        let (from, to) = VOWEL_SWAPS[self.rank];
        let posterior = 0.5f64.powi(self.rank as i32 + 1);
        let phonemes = self
            .graphemes
            .iter()
            .map(|&c| if c == from { to } else { c }.to_string())
            .collect();
        self.rank += 1;
        NBestStep::Candidate(Candidate {
            log_likelihood: posterior.ln(),
            phonemes,
        })
    }
}

impl CandidateDecoder for EchoDecoder {
    fn n_best(&self, graphemes: &[char]) -> Result<Box<dyn NBestSearch + '_>, TranslationFailure> {
        if graphemes.iter().any(|c| c.is_ascii_digit()) {
            return Err(TranslationFailure("digits are out of vocabulary".into()));
        }
        Ok(Box::new(EchoSearch {
            graphemes: graphemes.to_vec(),
            rank: 0,
        }))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = LanguageConfig {
        model_file: "is-IS.mdl".into(),
        lexicon_path: None,
    };
    println!("Demo decoder standing in for model {:?}", config.model_file);

    let lexicon = Lexicon::from_reader("hús 1.0 h u: s\ntala 0.9 tʰ aː l a\n".as_bytes())?;
    let mut registry = LanguageRegistry::new();
    registry.register(
        "is-IS",
        LanguageEntry {
            decoder: Arc::new(EchoDecoder),
            lexicon: Some(lexicon),
        },
    );
    println!("Registered languages: {:?}", registry.language_codes());

    let words = vec!["hús".to_string(), "Tala".to_string(), "karta42".to_string()];
    let policy = AggregationPolicyBuilder::default()
        .max_variants(3usize)
        .build()?;

    let start = Instant::now();
    let results = aggregate_all(&words, &policy, &registry, None)?;
    println!("Aggregated {} words in {:.2?}", results.len(), start.elapsed());

    for result in &results {
        println!(
            "  {}: {} curated, {} generated",
            result.word,
            result.manual_count(),
            result.generated_count()
        );
    }

    println!("\nJSON:\n{}", format::to_json(&results)?);
    println!("\nTSV:\n{}", format::to_tsv(&results));
    Ok(())
}
