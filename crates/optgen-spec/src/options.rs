/// Option-spec parser
///
/// Turns the line-oriented option grammar into `OptionSpecs`:
///
/// ```text
/// # Group title
///
/// --place -p
/// type=str
/// default=none
/// Help text, possibly over
/// several lines.
/// ```
///
/// An option ends at two consecutive blank lines or at end of input. A
/// single blank line inside help text is a paragraph break.

use crate::ast::{OptionKind, OptionSpec, OptionSpecs, SpecItem};
use crate::completion::CompletionSpec;
use crate::error::{ParseError, Result};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Between options
    Normal,
    /// Reading `key=value` lines after the alias line
    Metadata,
    /// Reading help text
    Help,
}

/// Option block under construction
struct Pending {
    line: usize,
    dest: String,
    aliases: Vec<String>,
    type_name: Option<String>,
    choices: Vec<String>,
    default: Option<String>,
    help: String,
    completion: Option<CompletionSpec>,
    condition: Option<String>,
}

impl Pending {
    fn start(line: usize, text: &str) -> Result<Self> {
        let aliases: Vec<String> = text.split(' ').filter(|a| !a.is_empty()).map(str::to_string).collect();
        for alias in &aliases {
            if !alias.starts_with('-') || alias.trim_start_matches('-').is_empty() {
                return Err(ParseError::InvalidAlias { line, alias: alias.clone() });
            }
        }
        // The caller only starts a block on a `--` line, so the first alias is long
        let dest = aliases[0][2..].replace('-', "_");
        Ok(Self {
            line,
            dest,
            aliases,
            type_name: None,
            choices: Vec::new(),
            default: None,
            help: String::new(),
            completion: None,
            condition: None,
        })
    }

    fn set(&mut self, line: usize, key: &str, value: &str) -> Result<()> {
        match key {
            "type" => self.type_name = Some(value.to_string()),
            "default" => self.default = Some(value.to_string()),
            "choices" => {
                self.choices = value.split(',').map(|c| c.trim().to_string()).collect();
            }
            "dest" => self.dest = value.to_string(),
            "completion" => self.completion = Some(CompletionSpec::parse(value)?),
            "condition" => self.condition = Some(value.to_string()),
            _ => {
                return Err(ParseError::UnknownKey { line, key: key.to_string() });
            }
        }
        Ok(())
    }

    fn push_help(&mut self, text: &str) {
        if !self.help.is_empty() && !self.help.ends_with('\n') {
            self.help.push(' ');
        }
        self.help.push_str(text);
    }

    fn finish(self) -> Result<OptionSpec> {
        let type_name = match (&self.type_name, self.choices.is_empty()) {
            (Some(name), _) => name.as_str(),
            (None, false) => "choices",
            (None, true) => "",
        };
        let mut kind = OptionKind::from_type_name(type_name).ok_or_else(|| ParseError::UnknownOptionType {
            line: self.line,
            name: type_name.to_string(),
        })?;

        let mut default = self.default;
        match &mut kind {
            OptionKind::Choices(choices) => {
                if self.choices.is_empty() {
                    return Err(ParseError::MissingChoices { dest: self.dest });
                }
                *choices = self.choices;
                match &default {
                    Some(value) if !choices.contains(value) => {
                        return Err(ParseError::InvalidDefault {
                            dest: self.dest,
                            value: value.clone(),
                            reason: format!("not one of {}", choices.join(", ")),
                        });
                    }
                    Some(_) => {}
                    None => default = Some(choices[0].clone()),
                }
            }
            OptionKind::Int => check_default(&self.dest, &default, |v| v.parse::<i64>().is_ok(), "not an integer")?,
            OptionKind::Float => check_default(&self.dest, &default, |v| v.parse::<f64>().is_ok(), "not a number")?,
            _ => {}
        }

        Ok(OptionSpec {
            dest: self.dest,
            aliases: self.aliases,
            kind,
            default,
            help: self.help.trim_end().to_string(),
            completion: self.completion,
            condition: self.condition,
        })
    }
}

fn check_default(dest: &str, default: &Option<String>, valid: impl Fn(&str) -> bool, reason: &str) -> Result<()> {
    match default {
        Some(value) if !valid(value) => Err(ParseError::InvalidDefault {
            dest: dest.to_string(),
            value: value.clone(),
            reason: reason.to_string(),
        }),
        _ => Ok(()),
    }
}

/// Split a `key=value` metadata line; keys are lower-case ASCII words
fn metadata(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    if key.is_empty() || value.is_empty() || !key.bytes().all(|b| b.is_ascii_lowercase()) {
        return None;
    }
    Some((key, value))
}

/// Parse an option-spec document
pub fn parse_options(input: &str) -> Result<OptionSpecs> {
    let mut items = Vec::new();
    let mut seen = HashSet::new();
    let mut state = State::Normal;
    let mut current: Option<Pending> = None;
    let mut prev_blank = true;

    let mut finish = |pending: Pending, items: &mut Vec<SpecItem>| -> Result<()> {
        let opt = pending.finish()?;
        if !seen.insert(opt.dest.clone()) {
            return Err(ParseError::DuplicateOption { dest: opt.dest });
        }
        items.push(SpecItem::Option(opt));
        Ok(())
    };

    for (idx, raw) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_end();

        match state {
            State::Normal => {
                if line.is_empty() {
                    continue;
                }
                if let Some(title) = line.strip_prefix("# ") {
                    items.push(SpecItem::Group(title.trim().to_string()));
                } else if line.starts_with("--") {
                    current = Some(Pending::start(line_no, line)?);
                    state = State::Metadata;
                } else {
                    return Err(ParseError::UnexpectedLine { line: line_no, text: line.to_string() });
                }
            }
            State::Metadata => {
                let Some(pending) = current.as_mut() else {
                    state = State::Normal;
                    continue;
                };
                match metadata(line) {
                    Some((key, value)) => pending.set(line_no, key, value)?,
                    None => {
                        state = State::Help;
                        pending.push_help(line);
                    }
                }
            }
            State::Help => {
                if !line.is_empty() {
                    if let Some(pending) = current.as_mut() {
                        pending.push_help(line);
                    }
                } else if !prev_blank {
                    if let Some(pending) = current.as_mut() {
                        pending.help.push_str("\n\n");
                    }
                } else {
                    if let Some(pending) = current.take() {
                        finish(pending, &mut items)?;
                    }
                    state = State::Normal;
                }
            }
        }
        prev_blank = line.is_empty();
    }

    if let Some(pending) = current.take() {
        finish(pending, &mut items)?;
    }

    Ok(OptionSpecs { items })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ICAT: &str = "\
--align
type=choices
choices=center,left,right
default=center
Horizontal alignment for the displayed image.


--scale-up
type=bool-set
When used in combination with --place it will cause images that are
smaller than the specified area to be scaled up.


--detection-timeout
type=float
default=10
The amount of time (in seconds) to wait for a response.
";

    #[test]
    fn test_parse_simple_block() {
        let specs = parse_options(ICAT).unwrap();
        let opts: Vec<_> = specs.options().collect();
        assert_eq!(opts.len(), 3);

        assert_eq!(opts[0].dest, "align");
        assert_eq!(opts[0].kind, OptionKind::Choices(vec!["center".into(), "left".into(), "right".into()]));
        assert_eq!(opts[0].default.as_deref(), Some("center"));

        assert_eq!(opts[1].ident(), "ScaleUp");
        assert_eq!(opts[1].kind, OptionKind::Flag { default: false });
        assert_eq!(
            opts[1].help,
            "When used in combination with --place it will cause images that are smaller than the specified area to be scaled up."
        );

        assert_eq!(opts[2].kind, OptionKind::Float);
        assert_eq!(opts[2].default.as_deref(), Some("10"));
    }

    #[test]
    fn test_aliases_and_dest() {
        let specs = parse_options("--match -m\ndest=match_spec\nThe window to match.\n").unwrap();
        let opt = specs.options().next().unwrap();
        assert_eq!(opt.aliases, vec!["--match", "-m"]);
        assert_eq!(opt.dest, "match_spec");
        assert_eq!(opt.ident(), "MatchSpec");
        assert_eq!(opt.kind, OptionKind::Str);
    }

    #[test]
    fn test_help_paragraphs() {
        let specs = parse_options("--title\nFirst paragraph.\n\nSecond\nparagraph.\n\n\n--other\nx\n").unwrap();
        let opts: Vec<_> = specs.options().collect();
        assert_eq!(opts.len(), 2);
        assert_eq!(opts[0].help, "First paragraph.\n\nSecond paragraph.");
    }

    #[test]
    fn test_group_headings() {
        let specs = parse_options("# Global options\n\n--to\nAddress to connect to.\n").unwrap();
        assert_eq!(specs.items[0], SpecItem::Group("Global options".into()));
        assert_eq!(specs.options().count(), 1);
    }

    #[test]
    fn test_choices_imply_type_and_default() {
        let specs = parse_options("--mode\nchoices=a, b\nPick one.\n").unwrap();
        let opt = specs.options().next().unwrap();
        assert_eq!(opt.kind, OptionKind::Choices(vec!["a".into(), "b".into()]));
        assert_eq!(opt.default.as_deref(), Some("a"));
    }

    #[test]
    fn test_bool_reset_and_list() {
        let specs = parse_options("--keep\ntype=bool-reset\n\n\n--env\ntype=list\n").unwrap();
        let opts: Vec<_> = specs.options().collect();
        assert_eq!(opts[0].kind, OptionKind::Flag { default: true });
        assert_eq!(opts[1].kind, OptionKind::List);
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert!(matches!(
            parse_options("stray text\n"),
            Err(ParseError::UnexpectedLine { line: 1, .. })
        ));
        assert!(matches!(
            parse_options("--x\ntype=wat\n"),
            Err(ParseError::UnknownOptionType { .. })
        ));
        assert!(matches!(
            parse_options("--x\ntype=choices\n"),
            Err(ParseError::MissingChoices { .. })
        ));
        assert!(matches!(
            parse_options("--x\nchoices=a,b\ndefault=c\n"),
            Err(ParseError::InvalidDefault { .. })
        ));
        assert!(matches!(
            parse_options("--x\ntype=int\ndefault=ten\n"),
            Err(ParseError::InvalidDefault { .. })
        ));
        assert!(matches!(
            parse_options("--x\nbogus=1\n"),
            Err(ParseError::UnknownKey { line: 2, .. })
        ));
        assert!(matches!(
            parse_options("--x\n\n\n--x\n"),
            Err(ParseError::DuplicateOption { .. })
        ));
        assert!(matches!(
            parse_options("--x y\n"),
            Err(ParseError::InvalidAlias { .. })
        ));
    }

    #[test]
    fn test_completion_metadata() {
        let specs = parse_options("--config -c\ncompletion=type:file ext:conf\nConfig file.\n").unwrap();
        let opt = specs.options().next().unwrap();
        let completion = opt.completion.as_ref().unwrap();
        assert_eq!(completion.kind, crate::CompletionKind::File);
        assert_eq!(completion.extensions, vec!["conf"]);
        assert_eq!(opt.help, "Config file.");

        assert!(matches!(
            parse_options("--config\ncompletion=type:socket\n"),
            Err(ParseError::InvalidCompletion { .. })
        ));
    }

    #[test]
    fn test_empty_input() {
        let specs = parse_options("").unwrap();
        assert!(specs.items.is_empty());
    }
}
