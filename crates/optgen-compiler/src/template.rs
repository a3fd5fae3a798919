/// Placeholder substitution for Go source templates
///
/// Templates are ordinary Go files containing bare marker words such as
/// `CMD_NAME` or `JSON_INIT_CODE`. Rendering replaces each marker with a
/// pre-rendered fragment, in the order the substitutions were added. There
/// is no recursion and no conditional logic: fragments are inserted verbatim.

/// Build tag that keeps a template out of normal Go builds
const EXCLUDE_BUILD_TAG: &str = "//go:build exclude";

/// A loaded template
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    text: String,
}

impl Template {
    /// Wrap template text, dropping a leading `//go:build exclude` tag
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let text = match text.strip_prefix(EXCLUDE_BUILD_TAG) {
            Some(rest) => format!("\n{}", rest),
            None => text,
        };
        Self { text }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Render the template with the given substitutions
    pub fn render(&self, substitutions: &Substitutions) -> String {
        let mut out = self.text.clone();
        for (marker, value) in &substitutions.pairs {
            out = out.replace(marker.as_str(), value);
        }
        out
    }
}

/// Ordered marker -> value pairs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Substitutions {
    pairs: Vec<(String, String)>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a substitution; a repeated marker replaces the earlier value in place
    pub fn set(mut self, marker: impl Into<String>, value: impl Into<String>) -> Self {
        let marker = marker.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(m, _)| *m == marker) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((marker, value)),
        }
        self
    }

    /// Add a Go boolean literal
    pub fn set_bool(self, marker: impl Into<String>, value: bool) -> Self {
        self.set(marker, if value { "true" } else { "false" })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_in_insertion_order() {
        let template = Template::new("func CMD_NAME() { return CLI_NAME }");
        let subs = Substitutions::new().set("CMD_NAME", "set_colors").set("CLI_NAME", "\"set-colors\"");
        assert_eq!(template.render(&subs), "func set_colors() { return \"set-colors\" }");
    }

    #[test]
    fn test_fragments_are_not_rescanned_for_earlier_markers() {
        // ARGSPEC is inserted after CMD_NAME ran, so its CMD_NAME text stays
        let template = Template::new("CMD_NAME ARGSPEC");
        let subs = Substitutions::new().set("CMD_NAME", "ls").set("ARGSPEC", "CMD_NAME");
        assert_eq!(template.render(&subs), "ls CMD_NAME");
    }

    #[test]
    fn test_strips_exclude_build_tag() {
        let template = Template::new("//go:build exclude\npackage at\n");
        assert_eq!(template.text(), "\n\npackage at\n");
        let plain = Template::new("package at\n");
        assert_eq!(plain.text(), "package at\n");
    }

    #[test]
    fn test_set_replaces_existing_marker() {
        let subs = Substitutions::new().set_bool("IS_ASYNC", false).set_bool("IS_ASYNC", true);
        assert_eq!(subs.len(), 1);
        assert_eq!(Template::new("IS_ASYNC").render(&subs), "true");
    }
}
