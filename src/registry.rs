use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::decoder::CandidateDecoder;
use crate::error::PronError;
use crate::lexicon::Lexicon;

/// File locations for one language's trained model and curated lexicon.
///
/// The model file is opaque to this crate: it is handed to whatever decoder
/// implementation the caller constructs. The lexicon, when configured, is
/// loaded here.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// Trained G2P model file, consumed by the caller's decoder.
    pub model_file: PathBuf,
    /// Curated lexicon file; `None` runs the language G2P-only.
    pub lexicon_path: Option<PathBuf>,
}

/// One language's immutable resources: a shared decoder and an optional
/// lexicon. Resolved once per batch, then only read.
pub struct LanguageEntry {
    pub decoder: Arc<dyn CandidateDecoder>,
    pub lexicon: Option<Lexicon>,
}

impl std::fmt::Debug for LanguageEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageEntry")
            .field("decoder", &"<dyn CandidateDecoder>")
            .field("lexicon", &self.lexicon)
            .finish()
    }
}

impl LanguageEntry {
    /// Bundle a decoder with the lexicon named by `config`, loading the
    /// lexicon eagerly.
    ///
    /// A malformed lexicon makes the whole language unusable; the error
    /// surfaces here, at startup, never at request time.
    pub fn from_config(
        decoder: Arc<dyn CandidateDecoder>,
        config: &LanguageConfig,
    ) -> Result<Self, PronError> {
        let lexicon = match &config.lexicon_path {
            Some(path) => Some(Lexicon::from_path(path)?),
            None => None,
        };
        Ok(Self { decoder, lexicon })
    }
}

/// Registry mapping language codes to their decoder/lexicon pair.
///
/// Built once at startup, passed by reference into the batch orchestrator,
/// and never mutated afterwards; all lookups are concurrent-read safe.
#[derive(Default)]
pub struct LanguageRegistry {
    languages: HashMap<String, LanguageEntry>,
}

impl LanguageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a language, replacing any previous entry for the same code.
    pub fn register(&mut self, code: impl Into<String>, entry: LanguageEntry) {
        let code = code.into();
        log::info!(
            "Registered language {code} (lexicon: {})",
            entry.lexicon.is_some()
        );
        self.languages.insert(code, entry);
    }

    /// Resolve a language code to its resources.
    ///
    /// An unrecognized code is a caller-input error, distinct from a
    /// per-word decoder failure.
    pub fn resolve(&self, code: &str) -> Result<&LanguageEntry, PronError> {
        self.languages
            .get(code)
            .ok_or_else(|| PronError::UnknownLanguage(code.to_string()))
    }

    /// All registered language codes in sorted order.
    pub fn language_codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.languages.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use super::{LanguageConfig, LanguageEntry, LanguageRegistry};
    use crate::decoder::testing::ScriptedDecoder;
    use crate::error::PronError;

    #[test]
    fn resolve_unknown_language_is_a_client_error() {
        let registry = LanguageRegistry::new();
        let err = registry.resolve("is-IS").unwrap_err();
        assert!(matches!(err, PronError::UnknownLanguage(code) if code == "is-IS"));
    }

    #[test]
    fn language_codes_are_sorted() {
        let mut registry = LanguageRegistry::new();
        for code in ["is-IS", "en-IS", "fo-FO"] {
            registry.register(
                code,
                LanguageEntry {
                    decoder: Arc::new(ScriptedDecoder::new(vec![])),
                    lexicon: None,
                },
            );
        }
        assert_eq!(registry.language_codes(), vec!["en-IS", "fo-FO", "is-IS"]);
    }

    #[test]
    fn from_config_loads_the_configured_lexicon() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "hús 1.0 h u: s").unwrap();
        file.flush().unwrap();

        let config = LanguageConfig {
            model_file: "is-IS.mdl".into(),
            lexicon_path: Some(file.path().to_path_buf()),
        };
        let entry =
            LanguageEntry::from_config(Arc::new(ScriptedDecoder::new(vec![])), &config).unwrap();
        let lexicon = entry.lexicon.unwrap();
        assert!(lexicon.lookup("hús").is_some());
    }

    #[test]
    fn from_config_without_lexicon_runs_g2p_only() {
        let config = LanguageConfig {
            model_file: "en-IS.mdl".into(),
            lexicon_path: None,
        };
        let entry =
            LanguageEntry::from_config(Arc::new(ScriptedDecoder::new(vec![])), &config).unwrap();
        assert!(entry.lexicon.is_none());
    }

    #[test]
    fn from_config_surfaces_lexicon_errors_at_startup() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "0.9 only-one-pron-field").unwrap();
        writeln!(file, "broken").unwrap();
        file.flush().unwrap();

        let config = LanguageConfig {
            model_file: "is-IS.mdl".into(),
            lexicon_path: Some(file.path().to_path_buf()),
        };
        let err = LanguageEntry::from_config(Arc::new(ScriptedDecoder::new(vec![])), &config)
            .unwrap_err();
        assert!(matches!(err, PronError::LexiconParse { line: 2, .. }));
    }
}
