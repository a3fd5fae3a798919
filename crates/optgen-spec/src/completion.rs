/// Shell completion hints
///
/// A hint is a space-separated list of `key:value` words, quoted the way a
/// shell would quote them:
///
/// ```text
/// type:file ext:conf,ini group:"Config files" relative:conf
/// ```
///
/// Keys: `type` (`file`, `directory`, `keyword`, `special`, `none`), `kwds`,
/// `ext` and `mime` (comma-separated lists), `group`, and `relative`.

use crate::error::{ParseError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionKind {
    #[default]
    None,
    File,
    Directory,
    Keyword,
    /// `group` names a completer function defined by hand
    Special,
}

/// Directory file completions are relative to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelativeTo {
    #[default]
    Cwd,
    ConfigDir,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompletionSpec {
    pub kind: CompletionKind,
    pub keywords: Vec<String>,
    /// File extensions, without the dot
    pub extensions: Vec<String>,
    pub mime_patterns: Vec<String>,
    pub group: String,
    pub relative_to: RelativeTo,
}

impl CompletionSpec {
    /// Parse a completion hint
    pub fn parse(raw: &str) -> Result<CompletionSpec> {
        let invalid = |reason: String| ParseError::InvalidCompletion {
            spec: raw.to_string(),
            reason,
        };

        let mut spec = CompletionSpec::default();
        for word in split_words(raw).map_err(|r| invalid(r.to_string()))? {
            let Some((key, value)) = word.split_once(':') else {
                return Err(invalid(format!("expected key:value, got {:?}", word)));
            };
            match key {
                "type" => {
                    spec.kind = match value {
                        "file" => CompletionKind::File,
                        "directory" => CompletionKind::Directory,
                        "keyword" => CompletionKind::Keyword,
                        "special" => CompletionKind::Special,
                        "none" => CompletionKind::None,
                        other => return Err(invalid(format!("unknown completion type {:?}", other))),
                    }
                }
                "kwds" => spec.keywords.extend(value.split(',').map(str::to_string)),
                "ext" => spec.extensions.extend(value.split(',').map(str::to_string)),
                "mime" => spec.mime_patterns.extend(value.split(',').map(str::to_string)),
                "group" => spec.group = value.to_string(),
                "relative" => {
                    if value != "conf" {
                        return Err(invalid(format!("unknown relative location {:?}", value)));
                    }
                    spec.relative_to = RelativeTo::ConfigDir;
                }
                other => return Err(invalid(format!("unknown completion property {:?}", other))),
            }
        }
        Ok(spec)
    }

    /// True when the hint completes nothing
    pub fn is_empty(&self) -> bool {
        self.kind == CompletionKind::None && self.keywords.is_empty()
    }
}

/// Split on unquoted whitespace, removing single and double quotes
fn split_words(raw: &str) -> std::result::Result<Vec<String>, &'static str> {
    let mut words = Vec::new();
    let mut current: Option<String> = None;
    let mut quote: Option<char> = None;

    for c in raw.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.get_or_insert_with(String::new).push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                current.get_or_insert_with(String::new);
            }
            (None, c) if c.is_whitespace() => words.extend(current.take()),
            (None, c) => current.get_or_insert_with(String::new).push(c),
        }
    }
    if quote.is_some() {
        return Err("unterminated quote");
    }
    words.extend(current);
    Ok(words)
}
