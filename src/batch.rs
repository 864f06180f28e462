use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::aggregate::{aggregate, AggregationPolicy};
use crate::error::PronError;
use crate::registry::LanguageRegistry;
use crate::WordResult;

/// Aggregate every word in `words`, producing one result per input word in
/// input order.
///
/// The policy is validated and the language resolved once, up front, so
/// client-input errors surface before any aggregation starts. After that no
/// error can abort the batch: a word whose decoding fails simply carries
/// whatever entries were collected for it, possibly none.
///
/// With the `parallel` feature enabled the per-word aggregations run on the
/// rayon pool. The lexicon and decoder are only read, never mutated, so they
/// are shared across workers without locking; output order is restored by
/// indexed collection, never taken from completion order.
pub fn aggregate_all<S: AsRef<str> + Sync>(
    words: &[S],
    policy: &AggregationPolicy,
    registry: &LanguageRegistry,
    deadline: Option<Instant>,
) -> Result<Vec<WordResult>, PronError> {
    policy.validate()?;
    let language = registry.resolve(&policy.language_code)?;
    log::debug!(
        "aggregating {} words for language {}",
        words.len(),
        policy.language_code
    );

    #[cfg(feature = "parallel")]
    let iter = words.par_iter();
    #[cfg(not(feature = "parallel"))]
    let iter = words.iter();

    Ok(iter
        .map(|word| {
            aggregate(
                word.as_ref(),
                policy,
                language.lexicon.as_ref(),
                language.decoder.as_ref(),
                deadline,
            )
        })
        .collect())
}

/// Lazily aggregate `words` one at a time, in input order.
///
/// Each result is computed when the iterator is pulled, like the batch
/// operation's original generator form. Validation and language resolution
/// still happen eagerly, before the iterator is handed out.
pub fn aggregate_iter<'a, S: AsRef<str>>(
    words: &'a [S],
    policy: &'a AggregationPolicy,
    registry: &'a LanguageRegistry,
    deadline: Option<Instant>,
) -> Result<impl Iterator<Item = WordResult> + 'a, PronError> {
    policy.validate()?;
    let language = registry.resolve(&policy.language_code)?;
    Ok(words.iter().map(move |word| {
        aggregate(
            word.as_ref(),
            policy,
            language.lexicon.as_ref(),
            language.decoder.as_ref(),
            deadline,
        )
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{aggregate_all, aggregate_iter};
    use crate::aggregate::AggregationPolicyBuilder;
    use crate::decoder::testing::{candidate, ScriptedDecoder};
    use crate::error::PronError;
    use crate::lexicon::Lexicon;
    use crate::registry::{LanguageEntry, LanguageRegistry};

    fn registry_with(decoder: ScriptedDecoder, lexicon: Option<Lexicon>) -> LanguageRegistry {
        let mut registry = LanguageRegistry::new();
        registry.register(
            "is-IS",
            LanguageEntry {
                decoder: Arc::new(decoder),
                lexicon,
            },
        );
        registry
    }

    #[test]
    fn results_follow_input_order() {
        let registry = registry_with(
            ScriptedDecoder::new(vec![candidate(0.6, "a")]),
            None,
        );
        let words = ["b", "a", "c"];
        let results =
            aggregate_all(&words, &Default::default(), &registry, None).unwrap();

        let order: Vec<&str> = results.iter().map(|r| r.word.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
    }

    #[test]
    fn one_failing_word_never_affects_siblings() {
        let decoder =
            ScriptedDecoder::new(vec![candidate(0.6, "a"), candidate(0.3, "b")]).fail_word("bad");
        let registry = registry_with(decoder, None);
        let words = ["good", "bad", "fine"];
        let results =
            aggregate_all(&words, &Default::default(), &registry, None).unwrap();

        // One record per input word, even for the failed one.
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].generated_count(), 2);
        assert_eq!(results[1].generated_count(), 0);
        assert_eq!(results[2].generated_count(), 2);
    }

    #[test]
    fn unknown_language_is_rejected_before_aggregation() {
        let registry = registry_with(ScriptedDecoder::new(vec![]), None);
        let policy = AggregationPolicyBuilder::default()
            .language_code("sv-SE")
            .build()
            .unwrap();
        let err = aggregate_all(&["hus"], &policy, &registry, None).unwrap_err();
        assert!(matches!(err, PronError::UnknownLanguage(code) if code == "sv-SE"));
    }

    #[test]
    fn invalid_policy_is_rejected_before_aggregation() {
        let registry = registry_with(ScriptedDecoder::new(vec![]), None);
        let policy = AggregationPolicyBuilder::default()
            .mass_threshold(1.5)
            .build()
            .unwrap();
        let err = aggregate_all(&["hus"], &policy, &registry, None).unwrap_err();
        assert!(matches!(err, PronError::InvalidPolicy(_)));
    }

    #[test]
    fn mixed_lexicon_and_generated_batch() {
        let lexicon = Lexicon::from_reader("hús 1.0 h u: s\n".as_bytes()).unwrap();
        let registry = registry_with(
            ScriptedDecoder::new(vec![candidate(0.6, "h u s")]),
            Some(lexicon),
        );
        let results =
            aggregate_all(&["hús", "bíll"], &Default::default(), &registry, None).unwrap();

        assert_eq!(results[0].manual_count(), 1);
        assert_eq!(results[0].generated_count(), 1);
        assert_eq!(results[1].manual_count(), 0);
        assert_eq!(results[1].generated_count(), 1);
    }

    #[test]
    fn iterator_form_is_lazy_and_ordered() {
        let registry = registry_with(ScriptedDecoder::new(vec![candidate(0.6, "a")]), None);
        let policy = Default::default();
        let words = ["einn", "tveir"];
        let mut iter = aggregate_iter(&words, &policy, &registry, None).unwrap();

        assert_eq!(iter.next().unwrap().word, "einn");
        assert_eq!(iter.next().unwrap().word, "tveir");
        assert!(iter.next().is_none());
    }

    #[test]
    fn iterator_form_validates_eagerly() {
        let registry = registry_with(ScriptedDecoder::new(vec![]), None);
        let policy = AggregationPolicyBuilder::default()
            .language_code("xx-XX")
            .build()
            .unwrap();
        let words = ["hus"];
        assert!(matches!(
            aggregate_iter(&words, &policy, &registry, None),
            Err(PronError::UnknownLanguage(_))
        ));
    }
}
