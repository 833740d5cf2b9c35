use crate::error::{ChunkerError, Result};
use crate::language::Language;
use regex::Regex;
use std::collections::BTreeSet;

/// Pattern-based import/include extraction, one rule set per language
pub struct DependencyExtractor {
    python_import: Regex,
    python_from: Regex,
    js_import: Regex,
    js_require: Regex,
    java_import: Regex,
    c_include: Regex,
    go_import: Regex,
    go_quoted: Regex,
    rust_use: Regex,
    markdown_link: Regex,
    markdown_fence: Regex,
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| ChunkerError::invalid_config(format!("dependency pattern {pattern}: {e}")))
}

impl DependencyExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            python_import: compile(r"(?m)^[ \t]*import[ \t]+([A-Za-z_][\w.]*)")?,
            python_from: compile(r"(?m)^[ \t]*from[ \t]+(\.*[A-Za-z_][\w.]*|\.+)[ \t]+import\b")?,
            js_import: compile(r#"(?m)^[ \t]*import\s+(?:[^;'"]*?\s+from\s+)?['"]([^'"]+)['"]"#)?,
            js_require: compile(r#"\brequire\(\s*['"]([^'"]+)['"]\s*\)"#)?,
            java_import: compile(
                r"(?m)^[ \t]*import[ \t]+(?:static[ \t]+)?([A-Za-z_][\w.]*\*?)[ \t]*;",
            )?,
            c_include: compile(r#"(?m)^[ \t]*#[ \t]*include[ \t]*[<"]([^>"]+)[>"]"#)?,
            go_import: compile(r#"(?ms)^[ \t]*import\s*(?:\((.*?)\)|(?:[\w.]+[ \t]+)?"([^"]+)")"#)?,
            go_quoted: compile(r#""([^"]+)""#)?,
            rust_use: compile(
                r"(?m)^[ \t]*(?:pub(?:\([^)]*\))?[ \t]+)?use[ \t]+((?:::)?[A-Za-z_][\w:]*)",
            )?,
            markdown_link: compile(r"\[[^\]\n]+\]\(([^)\n]+)\)")?,
            markdown_fence: compile(r"(?m)^[ \t]*(?:```|~~~)[ \t]*([\w+#.-]+)")?,
        })
    }

    /// Sorted, deduplicated dependencies declared in `content`
    pub fn extract(&self, language: Language, content: &str) -> BTreeSet<String> {
        let mut deps = BTreeSet::new();

        match language {
            Language::Python => {
                collect(&self.python_import, content, &mut deps);
                collect(&self.python_from, content, &mut deps);
            }
            Language::JavaScript | Language::TypeScript | Language::Tsx => {
                collect(&self.js_import, content, &mut deps);
                collect(&self.js_require, content, &mut deps);
            }
            Language::Java => collect(&self.java_import, content, &mut deps),
            Language::C | Language::Cpp => collect(&self.c_include, content, &mut deps),
            Language::Go => {
                for caps in self.go_import.captures_iter(content) {
                    if let Some(block) = caps.get(1) {
                        collect(&self.go_quoted, block.as_str(), &mut deps);
                    } else if let Some(single) = caps.get(2) {
                        deps.insert(single.as_str().to_string());
                    }
                }
            }
            Language::Rust => {
                for caps in self.rust_use.captures_iter(content) {
                    let path = caps[1].trim_end_matches(':');
                    if !path.is_empty() {
                        deps.insert(path.to_string());
                    }
                }
            }
            Language::Markdown => {
                for caps in self.markdown_link.captures_iter(content) {
                    // Drop an optional link title: [x](target "title")
                    if let Some(target) = caps[1].split_whitespace().next() {
                        deps.insert(target.to_string());
                    }
                }
                for caps in self.markdown_fence.captures_iter(content) {
                    deps.insert(format!("codeblock:{}", &caps[1]));
                }
            }
            Language::Text => {}
        }

        deps.remove("");
        deps
    }
}

fn collect(re: &Regex, content: &str, deps: &mut BTreeSet<String>) {
    for caps in re.captures_iter(content) {
        if let Some(m) = caps.get(1) {
            deps.insert(m.as_str().to_string());
        }
    }
}
