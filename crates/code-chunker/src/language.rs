use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Logical language tag assigned to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Tsx,
    Java,
    C,
    Cpp,
    Go,
    Rust,
    Markdown,
    Text,
}

/// Symbol-name regex and the definition kinds it applies to
#[derive(Debug, Clone, Copy)]
pub struct SymbolPattern {
    pub kinds: &'static [&'static str],
    pub regex: &'static str,
}

impl Language {
    /// Languages chunked through a syntax grammar
    pub const CODE: [Language; 9] = [
        Language::Python,
        Language::JavaScript,
        Language::TypeScript,
        Language::Tsx,
        Language::Java,
        Language::C,
        Language::Cpp,
        Language::Go,
        Language::Rust,
    ];

    /// Detect language from file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "py" | "pyi" | "pyw" => Language::Python,
            "js" | "jsx" | "mjs" | "cjs" => Language::JavaScript,
            "ts" | "mts" | "cts" => Language::TypeScript,
            "tsx" => Language::Tsx,
            "java" => Language::Java,
            "c" => Language::C,
            // Headers go through the C++ grammar, which also accepts C.
            "cc" | "cpp" | "cxx" | "hpp" | "hh" | "hxx" | "h" => Language::Cpp,
            "go" => Language::Go,
            "rs" => Language::Rust,
            "md" | "markdown" => Language::Markdown,
            _ => Language::Text,
        }
    }

    /// Detect language from file path; unknown or missing extensions are `Text`
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Text)
    }

    /// Get the language tag as string
    pub const fn as_str(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Tsx => "tsx",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Markdown => "markdown",
            Language::Text => "text",
        }
    }

    /// Check if this language is chunked from a syntax tree
    pub const fn supports_ast(self) -> bool {
        !matches!(self, Language::Markdown | Language::Text)
    }

    /// Node kinds that become chunks
    pub const fn definition_kinds(self) -> &'static [&'static str] {
        match self {
            Language::Python => &["function_definition", "class_definition"],
            Language::JavaScript => &[
                "function_declaration",
                "method_definition",
                "class_declaration",
            ],
            Language::TypeScript | Language::Tsx => &[
                "function_declaration",
                "method_definition",
                "class_declaration",
                "abstract_class_declaration",
            ],
            Language::Java => &["method_declaration", "class_declaration"],
            Language::C => &["function_definition"],
            Language::Cpp => &["function_definition", "class_specifier"],
            Language::Go => &[
                "function_declaration",
                "method_declaration",
                "type_declaration",
            ],
            Language::Rust => &[
                "function_item",
                "impl_item",
                "struct_item",
                "enum_item",
                "trait_item",
            ],
            Language::Markdown | Language::Text => &[],
        }
    }

    /// Symbol name patterns, tried in order; capture group 1 is the name.
    /// A pattern only applies to the node kinds it lists.
    pub const fn symbol_patterns(self) -> &'static [SymbolPattern] {
        match self {
            Language::Python => &[SymbolPattern {
                kinds: &["function_definition", "class_definition"],
                regex: r"^\s*(?:async\s+)?(?:def|class)\s+([A-Za-z_]\w*)",
            }],
            Language::JavaScript | Language::TypeScript | Language::Tsx => &[
                SymbolPattern {
                    kinds: &["function_declaration"],
                    regex: r"^\s*(?:export\s+)?(?:default\s+)?(?:async\s+)?function\b\s*\*?\s*([A-Za-z_$][\w$]*)",
                },
                SymbolPattern {
                    kinds: &["class_declaration", "abstract_class_declaration"],
                    regex: r"^(?:\s*@[\w.]+(?:\([^)]*\))?)*\s*(?:export\s+)?(?:default\s+)?(?:abstract\s+)?class\s+([A-Za-z_$][\w$]*)",
                },
                SymbolPattern {
                    kinds: &["method_definition"],
                    regex: r"^(?:\s*@[\w.]+(?:\([^)]*\))?)*\s*(?:(?:public|private|protected|static|readonly|override|abstract|declare|accessor|async)\s+)*(?:get\s+|set\s+)?\*?\s*#?([A-Za-z_$][\w$]*)\s*[<(]",
                },
            ],
            Language::Java => &[
                SymbolPattern {
                    kinds: &["class_declaration"],
                    regex: r"^[^{]*?\b(?:class|interface)\s+([A-Za-z_]\w*)",
                },
                // Annotations are skipped; the name is the first call-like
                // identifier of the header.
                SymbolPattern {
                    kinds: &["method_declaration"],
                    regex: r"^(?:\s*@[\w.]+(?:\([^)]*\))?)*[^{(@]*?\b([A-Za-z_]\w*)\s*\(",
                },
            ],
            Language::C => &[SymbolPattern {
                kinds: &["function_definition"],
                regex: r"^[^{]*?\b([A-Za-z_]\w*)\s*\(",
            }],
            Language::Cpp => &[
                SymbolPattern {
                    kinds: &["class_specifier"],
                    regex: r"^\s*(?:class|struct)\s+([A-Za-z_]\w*)",
                },
                SymbolPattern {
                    kinds: &["function_definition"],
                    regex: r"^[^{]*?\b([A-Za-z_]\w*)\s*\(",
                },
            ],
            Language::Go => &[
                SymbolPattern {
                    kinds: &["function_declaration", "method_declaration"],
                    regex: r"^\s*func\s+(?:\([^)]+\)\s+)?([A-Za-z_]\w*)\s*[\[(]",
                },
                SymbolPattern {
                    kinds: &["type_declaration"],
                    regex: r"^\s*type\s+([A-Za-z_]\w*)",
                },
            ],
            Language::Rust => &[
                SymbolPattern {
                    kinds: &["function_item", "struct_item", "enum_item", "trait_item"],
                    regex: r#"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:(?:const|async|unsafe|default|extern(?:\s+"[^"]*")?)\s+)*(?:fn|struct|enum|trait)\s+([A-Za-z_]\w*)"#,
                },
                SymbolPattern {
                    kinds: &["impl_item"],
                    regex: r"^\s*(?:unsafe\s+)?impl(?:\s*<[^{]*?>)?\s+(?:[\w:<>, ]+?\s+for\s+)?(?:[\w]+::)*([A-Za-z_]\w*)",
                },
            ],
            Language::Markdown | Language::Text => &[],
        }
    }

    /// Get Tree-sitter language instance
    pub fn tree_sitter_language(self) -> Option<tree_sitter::Language> {
        let language = match self {
            Language::Python => tree_sitter_python::LANGUAGE.into(),
            Language::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Language::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Language::Java => tree_sitter_java::LANGUAGE.into(),
            Language::C => tree_sitter_c::LANGUAGE.into(),
            Language::Cpp => tree_sitter_cpp::LANGUAGE.into(),
            Language::Go => tree_sitter_go::LANGUAGE.into(),
            Language::Rust => tree_sitter_rust::LANGUAGE.into(),
            Language::Markdown | Language::Text => return None,
        };
        Some(language)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        Self::CODE
            .iter()
            .chain([Language::Markdown, Language::Text].iter())
            .copied()
            .find(|lang| lang.as_str().eq_ignore_ascii_case(tag))
            .ok_or_else(|| format!("unknown language tag: {tag}"))
    }
}

/// Map a file path to its language tag
pub fn detect_language(file_path: impl AsRef<Path>) -> Language {
    Language::from_path(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension("rs"), Language::Rust);
        assert_eq!(Language::from_extension("RS"), Language::Rust);
        assert_eq!(Language::from_extension("py"), Language::Python);
        assert_eq!(Language::from_extension("jsx"), Language::JavaScript);
        assert_eq!(Language::from_extension("ts"), Language::TypeScript);
        assert_eq!(Language::from_extension("tsx"), Language::Tsx);
        assert_eq!(Language::from_extension("h"), Language::Cpp);
        assert_eq!(Language::from_extension("c"), Language::C);
        assert_eq!(Language::from_extension("Markdown"), Language::Markdown);
        assert_eq!(Language::from_extension("unknown"), Language::Text);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Language::from_path("test.rs"), Language::Rust);
        assert_eq!(Language::from_path("src/main.py"), Language::Python);
        assert_eq!(Language::from_path("docs/README.MD"), Language::Markdown);
        assert_eq!(Language::from_path("cmd/server/main.go"), Language::Go);
        assert_eq!(Language::from_path("no_extension"), Language::Text);
        assert_eq!(Language::from_path("notes.txt"), Language::Text);
        assert_eq!(detect_language("Makefile"), Language::Text);
    }

    #[test]
    fn test_supports_ast() {
        for lang in Language::CODE {
            assert!(lang.supports_ast(), "{lang} should have a grammar");
            assert!(!lang.definition_kinds().is_empty());
            assert!(!lang.symbol_patterns().is_empty());
        }
        assert!(!Language::Markdown.supports_ast());
        assert!(!Language::Text.supports_ast());
    }

    #[test]
    fn test_every_definition_kind_has_a_symbol_pattern() {
        for lang in Language::CODE {
            for kind in lang.definition_kinds() {
                assert!(
                    lang.symbol_patterns()
                        .iter()
                        .any(|pattern| pattern.kinds.contains(kind)),
                    "{lang}: {kind}"
                );
            }
        }
    }

    #[test]
    fn test_abstract_classes_are_typescript_only() {
        assert!(Language::TypeScript
            .definition_kinds()
            .contains(&"abstract_class_declaration"));
        assert!(Language::Tsx
            .definition_kinds()
            .contains(&"abstract_class_declaration"));
        assert!(!Language::JavaScript
            .definition_kinds()
            .contains(&"abstract_class_declaration"));
    }

    #[test]
    fn test_tree_sitter_language() {
        for lang in Language::CODE {
            assert!(lang.tree_sitter_language().is_some(), "{lang}");
        }
        assert!(Language::Markdown.tree_sitter_language().is_none());
        assert!(Language::Text.tree_sitter_language().is_none());
    }

    #[test]
    fn test_tag_round_trip() {
        for lang in Language::CODE {
            assert_eq!(lang.as_str().parse::<Language>(), Ok(lang));
        }
        assert_eq!("markdown".parse::<Language>(), Ok(Language::Markdown));
        assert!("cobol".parse::<Language>().is_err());
    }
}
