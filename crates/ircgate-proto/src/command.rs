//! Command line parsing.
//!
//! A protocol line has the shape
//!
//! ```text
//! VERB [ middle-params ]* [ ":" trailing-param ]
//! ```
//!
//! The verb and every middle parameter are single-space delimited tokens.
//! Everything after the first `:` in the line is the trailing parameter,
//! taken verbatim including spaces. Parsing is total: every input has an
//! output, and a line without a verb yields a [`Command`] with an empty verb.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Where the text in front of the first `:` ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum DelimiterBoundary {
    /// Cut at the `:` and remove one separating space, if there is one.
    ///
    /// `FOO bar:baz` keeps `bar` intact.
    #[default]
    Separator,
    /// Cut at the `:` and remove the character in front of it, whatever it is.
    ///
    /// `FOO bar:baz` yields the middle parameter `ba`. Matches older
    /// servers that assumed a space always precedes the delimiter, except
    /// when the line starts with `:`: those servers kept the whole line
    /// minus its last character as the prefix, this rule keeps nothing.
    DropPreceding,
}

/// What to do with the empty tokens produced by consecutive spaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum EmptyParams {
    /// Keep them as empty-string parameters (`"A  b"` has params `["", "b"]`).
    #[default]
    Preserve,
    /// Skip them. The verb becomes the first non-empty token.
    Drop,
}

/// Parser policy knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParserConfig {
    /// Boundary rule for the text preceding the trailing parameter.
    pub delimiter_boundary: DelimiterBoundary,
    /// Empty-token policy for the verb and middle parameters.
    pub empty_params: EmptyParams,
}

/// A parsed protocol command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Command {
    /// Command name, always upper case. Empty for a line without a verb.
    pub verb: String,
    /// Parameters in line order. Only the last one may contain spaces.
    pub params: Vec<String>,
}

impl Command {
    /// Build a command, upper-casing the verb.
    pub fn new(verb: &str, params: Vec<String>) -> Self {
        Self {
            verb: verb.to_uppercase(),
            params,
        }
    }

    /// `true` for the degenerate command produced by a line without a verb.
    pub fn is_empty(&self) -> bool {
        self.verb.is_empty()
    }

    /// Parameter at `index`, if present.
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }
}

impl FromStr for Command {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(parse(s))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.verb)?;
        let Some((last, middle)) = self.params.split_last() else {
            return Ok(());
        };
        for param in middle {
            write!(f, " {param}")?;
        }
        if last.is_empty() || last.contains(' ') || last.starts_with(':') {
            write!(f, " :{last}")
        } else {
            write!(f, " {last}")
        }
    }
}

/// Parse a line with the default [`ParserConfig`].
pub fn parse(line: &str) -> Command {
    parse_with(line, &ParserConfig::default())
}

/// Parse a line with an explicit policy.
pub fn parse_with(line: &str, config: &ParserConfig) -> Command {
    let (head, trailing) = match line.find(':') {
        Some(idx) => (
            leading_part(&line[..idx], config.delimiter_boundary),
            Some(&line[idx + 1..]),
        ),
        None => (line, None),
    };

    let keep_empty = config.empty_params == EmptyParams::Preserve;
    let mut tokens = head.split(' ').filter(|t| keep_empty || !t.is_empty());

    let verb = tokens.next().unwrap_or("");
    let mut params: Vec<String> = tokens.map(str::to_owned).collect();
    if let Some(trailing) = trailing {
        params.push(trailing.to_owned());
    }

    Command::new(verb, params)
}

fn leading_part(head: &str, boundary: DelimiterBoundary) -> &str {
    match boundary {
        DelimiterBoundary::Separator => head.strip_suffix(' ').unwrap_or(head),
        DelimiterBoundary::DropPreceding => {
            let mut chars = head.chars();
            chars.next_back();
            chars.as_str()
        }
    }
}
