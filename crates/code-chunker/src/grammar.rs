use crate::error::{ChunkerError, Result};
use crate::language::Language;
use regex::Regex;
use std::collections::HashMap;
use tree_sitter::Parser;

/// Everything the syntax chunker needs for one language
pub struct GrammarProfile {
    language: Language,
    grammar: tree_sitter::Language,
    symbol_patterns: Vec<(&'static [&'static str], Regex)>,
}

impl GrammarProfile {
    fn load(language: Language) -> Result<Self> {
        let grammar = language
            .tree_sitter_language()
            .ok_or_else(|| ChunkerError::grammar(language.as_str(), "no grammar linked"))?;

        // Loading into a parser performs the ABI compatibility check.
        let mut parser = Parser::new();
        parser
            .set_language(&grammar)
            .map_err(|e| ChunkerError::grammar(language.as_str(), e.to_string()))?;

        let symbol_patterns = language
            .symbol_patterns()
            .iter()
            .map(|pattern| {
                Regex::new(pattern.regex)
                    .map(|regex| (pattern.kinds, regex))
                    .map_err(|e| {
                        ChunkerError::invalid_config(format!(
                            "symbol pattern for {language}: {e}"
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            language,
            grammar,
            symbol_patterns,
        })
    }

    pub const fn language(&self) -> Language {
        self.language
    }

    /// Create a parser bound to this grammar
    pub fn parser(&self) -> Result<Parser> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.grammar)
            .map_err(|e| ChunkerError::grammar(self.language.as_str(), e.to_string()))?;
        Ok(parser)
    }

    pub fn is_definition(&self, kind: &str) -> bool {
        self.language.definition_kinds().contains(&kind)
    }

    /// Best-effort name of a definition node, using only the patterns
    /// registered for its kind
    pub fn symbol_name(&self, kind: &str, text: &str) -> Option<String> {
        self.symbol_patterns
            .iter()
            .filter(|(kinds, _)| kinds.contains(&kind))
            .find_map(|(_, re)| {
                re.captures(text)
                    .and_then(|caps| caps.get(1))
                    .map(|m| m.as_str().to_string())
            })
    }
}

/// Grammars for every supported code language, loaded once at startup
pub struct GrammarRegistry {
    profiles: HashMap<Language, GrammarProfile>,
}

impl GrammarRegistry {
    /// Load all grammars; fails if any supported language cannot be loaded
    pub fn load() -> Result<Self> {
        let mut profiles = HashMap::with_capacity(Language::CODE.len());
        for language in Language::CODE {
            let profile = GrammarProfile::load(language)?;
            log::debug!("Loaded {language} grammar");
            profiles.insert(language, profile);
        }
        Ok(Self { profiles })
    }

    /// Look up the profile for a language
    pub fn get(&self, language: Language) -> Result<&GrammarProfile> {
        self.profiles
            .get(&language)
            .ok_or_else(|| ChunkerError::unsupported_language(language.as_str()))
    }

    /// Languages with a loaded grammar, in tag order
    pub fn languages(&self) -> Vec<Language> {
        let mut languages: Vec<Language> = self.profiles.keys().copied().collect();
        languages.sort();
        languages
    }
}

impl std::fmt::Debug for GrammarRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrammarRegistry")
            .field("languages", &self.languages())
            .finish()
    }
}
