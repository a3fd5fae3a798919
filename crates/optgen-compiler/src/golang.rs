/// Go source helpers: string literals and option wiring
///
/// Options become a struct field plus an `AddToGroup`/`Add` call on a
/// `cli.Command`. These helpers are shared by every generated file that
/// registers options.

use optgen_spec::{CompletionKind, CompletionSpec, OptionKind, OptionSpec, RelativeTo};

/// Escape text for use inside a double-quoted Go string literal
pub fn escape_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
    }
    out
}

/// Render text as a double-quoted Go string literal
pub fn quote(text: &str) -> String {
    format!("\"{}\"", escape_string(text))
}

/// Go type of the options-struct field holding this option
pub fn option_go_type(kind: &OptionKind) -> &'static str {
    match kind {
        OptionKind::Flag { .. } => "bool",
        OptionKind::Str | OptionKind::Choices(_) => "string",
        OptionKind::Int => "int",
        OptionKind::Float => "float64",
        OptionKind::List => "[]string",
        OptionKind::Dict => "map[string]string",
    }
}

/// Options-struct field declaration: `ScaleUp bool`
pub fn struct_declaration(opt: &OptionSpec) -> String {
    format!("{} {}", opt.ident(), option_go_type(&opt.kind))
}

/// Go expression building the `cli` completer for a hint, if it completes anything
pub fn completer(spec: &CompletionSpec) -> Option<String> {
    let mut completers = Vec::new();
    if !spec.keywords.is_empty() {
        let group = match (spec.kind, spec.group.as_str()) {
            (CompletionKind::Keyword, g) if !g.is_empty() => g,
            _ => "Keywords",
        };
        let words: Vec<String> = spec.keywords.iter().map(|k| quote(k)).collect();
        completers.push(format!("cli.NamesCompleter({}, {})", quote(group), words.join(", ")));
    }
    let relative_to = match spec.relative_to {
        RelativeTo::Cwd => "cli.CWD",
        RelativeTo::ConfigDir => "cli.CONFIG",
    };
    let group_or = |fallback: &str| quote(if spec.group.is_empty() { fallback } else { spec.group.as_str() });
    match spec.kind {
        CompletionKind::File => {
            let group = group_or("Files");
            if !spec.extensions.is_empty() {
                let patterns: Vec<String> = spec.extensions.iter().map(|e| quote(&format!("*.{}", e))).collect();
                completers.push(format!("cli.FnmatchCompleter({}, {}, {})", group, relative_to, patterns.join(", ")));
            }
            if !spec.mime_patterns.is_empty() {
                let patterns: Vec<String> = spec.mime_patterns.iter().map(|m| quote(m)).collect();
                completers.push(format!("cli.MimepatCompleter({}, {})", group, patterns.join(", ")));
            }
            if spec.extensions.is_empty() && spec.mime_patterns.is_empty() {
                completers.push(format!("cli.FnmatchCompleter({}, {}, \"*\")", group, relative_to));
            }
        }
        CompletionKind::Directory => {
            completers.push(format!("cli.DirectoryCompleter({}, {})", group_or("Directories"), relative_to));
        }
        // The group names a hand-written completer
        CompletionKind::Special if !spec.group.is_empty() => completers.push(spec.group.clone()),
        _ => {}
    }

    match completers.len() {
        0 => None,
        1 => completers.pop(),
        _ => Some(format!("cli.ChainCompleters({})", completers.join(", "))),
    }
}

/// Where and how an option is registered on a command
#[derive(Debug, Clone, Copy, Default)]
pub struct Registration<'a> {
    /// Go variable holding the `*cli.Command`
    pub command_var: &'a str,
    /// Sub-command depth the option also applies to
    pub depth: usize,
    /// Option group title; the ungrouped `Add` is used when empty
    pub group: &'a str,
}

impl<'a> Registration<'a> {
    pub fn on(command_var: &'a str) -> Self {
        Self {
            command_var,
            ..Self::default()
        }
    }

    pub fn depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn group(mut self, group: &'a str) -> Self {
        self.group = group;
        self
    }

    /// Go statement registering `opt`
    pub fn render(&self, opt: &OptionSpec) -> String {
        let mut out = String::new();
        if self.group.is_empty() {
            out.push_str(&format!("{}.Add(cli.OptionSpec{{\n", self.command_var));
        } else {
            out.push_str(&format!("{}.AddToGroup({}, cli.OptionSpec{{\n", self.command_var, quote(self.group)));
        }
        out.push_str(&format!("Name: {},\n", quote(&opt.aliases.join(" "))));
        out.push_str(&format!("Type: {},\n", quote(opt.kind.type_name())));
        out.push_str(&format!("Dest: {},\n", quote(&opt.ident())));
        out.push_str(&format!("Help: {},\n", quote(&opt.help)));
        if let OptionKind::Choices(choices) = &opt.kind {
            out.push_str(&format!("Choices: {},\n", quote(&choices.join(", "))));
        }
        if let Some(completer) = opt.completion.as_ref().and_then(completer) {
            out.push_str(&format!("Completer: {},\n", completer));
        }
        if self.depth > 0 {
            out.push_str(&format!("Depth: {},\n", self.depth));
        }
        if let Some(default) = opt.default.as_deref().filter(|d| !d.is_empty()) {
            out.push_str(&format!("Default: {},\n", quote(default)));
        }
        out.push_str("})");
        out
    }
}
