//! Line-oriented go.mod parser

use super::{ManifestSnapshot, ModuleVersion, Replace, Require};
use std::fmt;

/// A malformed go.mod, with the 1-based line the problem was found on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based line number
    pub line: usize,
    /// What was wrong
    pub message: String,
}

impl ParseError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "go.mod:{}: {}", self.line, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Directives that can appear in a go.mod file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Module,
    Go,
    Toolchain,
    Require,
    Replace,
    Exclude,
    Retract,
    Godebug,
    Tool,
    Ignore,
}

impl Verb {
    fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "module" => Self::Module,
            "go" => Self::Go,
            "toolchain" => Self::Toolchain,
            "require" => Self::Require,
            "replace" => Self::Replace,
            "exclude" => Self::Exclude,
            "retract" => Self::Retract,
            "godebug" => Self::Godebug,
            "tool" => Self::Tool,
            "ignore" => Self::Ignore,
            _ => return None,
        })
    }

    fn allows_block(self) -> bool {
        !matches!(self, Self::Go | Self::Toolchain)
    }
}

/// One tokenized source line
struct Line<'a> {
    tokens: Vec<String>,
    comment: Option<&'a str>,
}

impl Line<'_> {
    fn is_indirect(&self) -> bool {
        self.comment
            .map(str::trim)
            .is_some_and(|c| c == "indirect" || c.starts_with("indirect;"))
    }
}

#[derive(Default)]
struct Builder {
    module: Option<String>,
    go: Option<String>,
    toolchain: Option<String>,
    requires: Vec<Require>,
    replaces: Vec<Replace>,
}

pub(crate) fn parse(content: &str) -> Result<ManifestSnapshot, ParseError> {
    let mut builder = Builder::default();
    let mut block: Option<(Verb, usize)> = None;

    for (idx, raw) in content.lines().enumerate() {
        let lineno = idx + 1;
        let line = tokenize(raw, lineno)?;
        if line.tokens.is_empty() {
            continue;
        }

        if let Some((verb, _)) = block {
            if line.tokens.len() == 1 && line.tokens[0] == ")" {
                block = None;
                continue;
            }
            builder.directive(verb, &line.tokens, &line, lineno)?;
            continue;
        }

        let verb = Verb::from_token(&line.tokens[0])
            .ok_or_else(|| ParseError::new(lineno, format!("unknown directive: {}", line.tokens[0])))?;
        let args = &line.tokens[1..];

        if args.len() == 1 && args[0] == "(" {
            if !verb.allows_block() {
                return Err(ParseError::new(
                    lineno,
                    format!("{} directive cannot be a block", line.tokens[0]),
                ));
            }
            block = Some((verb, lineno));
            continue;
        }

        builder.directive(verb, args, &line, lineno)?;
    }

    if let Some((_, opened)) = block {
        return Err(ParseError::new(opened, "unterminated block"));
    }

    let module = builder
        .module
        .ok_or_else(|| ParseError::new(1, "missing module directive"))?;

    Ok(ManifestSnapshot {
        module,
        go: builder.go,
        toolchain: builder.toolchain,
        requires: builder.requires,
        replaces: builder.replaces,
        content: content.to_string(),
    })
}

impl Builder {
    fn directive(
        &mut self,
        verb: Verb,
        args: &[String],
        line: &Line<'_>,
        lineno: usize,
    ) -> Result<(), ParseError> {
        let usage = |expected: &str| ParseError::new(lineno, format!("usage: {}", expected));

        match verb {
            Verb::Module => {
                let [path] = args else {
                    return Err(usage("module module/path"));
                };
                if self.module.is_some() {
                    return Err(ParseError::new(lineno, "repeated module statement"));
                }
                self.module = Some(path.clone());
            }
            Verb::Go => {
                let [version] = args else {
                    return Err(usage("go 1.23"));
                };
                if self.go.is_some() {
                    return Err(ParseError::new(lineno, "repeated go statement"));
                }
                self.go = Some(version.clone());
            }
            Verb::Toolchain => {
                let [name] = args else {
                    return Err(usage("toolchain go1.23.0"));
                };
                self.toolchain = Some(name.clone());
            }
            Verb::Require => {
                let [path, version] = args else {
                    return Err(usage("require module/path v1.2.3"));
                };
                self.requires.push(Require {
                    path: path.clone(),
                    version: version.clone(),
                    indirect: line.is_indirect(),
                });
            }
            Verb::Replace => {
                self.replaces.push(parse_replace(args, lineno)?);
            }
            Verb::Exclude => {
                if args.len() != 2 {
                    return Err(usage("exclude module/path v1.2.3"));
                }
            }
            Verb::Retract | Verb::Godebug | Verb::Tool | Verb::Ignore => {
                if args.is_empty() {
                    return Err(ParseError::new(lineno, "directive requires an argument"));
                }
            }
        }
        Ok(())
    }
}

fn parse_replace(args: &[String], lineno: usize) -> Result<Replace, ParseError> {
    let usage = || {
        ParseError::new(
            lineno,
            "usage: replace module/path [v1.2.3] => other/module v1.4\n\t or replace module/path [v1.2.3] => ../local/directory",
        )
    };

    let arrow = args.iter().position(|t| t == "=>").ok_or_else(usage)?;
    let (left, right) = (&args[..arrow], &args[arrow + 1..]);

    let side = |tokens: &[String]| match tokens {
        [path] => Some(ModuleVersion {
            path: path.clone(),
            version: None,
        }),
        [path, version] => Some(ModuleVersion {
            path: path.clone(),
            version: Some(version.clone()),
        }),
        _ => None,
    };

    Ok(Replace {
        old: side(left).ok_or_else(usage)?,
        new: side(right).ok_or_else(usage)?,
    })
}

/// Split a line into tokens and its trailing `//` comment.
///
/// Double-quoted tokens are unescaped and back-quoted tokens are taken raw.
fn tokenize(raw: &str, lineno: usize) -> Result<Line<'_>, ParseError> {
    let bytes = raw.as_bytes();
    let mut tokens = Vec::new();
    let mut comment = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        if bytes[i..].starts_with(b"//") {
            comment = Some(&raw[i + 2..]);
            break;
        }

        match b {
            b'"' => {
                let mut value = String::new();
                let mut chars = raw[i + 1..].char_indices();
                let mut closed = None;
                while let Some((off, c)) = chars.next() {
                    match c {
                        '"' => {
                            closed = Some(i + 1 + off + 1);
                            break;
                        }
                        '\\' => match chars.next() {
                            Some((_, 'n')) => value.push('\n'),
                            Some((_, 't')) => value.push('\t'),
                            Some((_, escaped)) => value.push(escaped),
                            None => break,
                        },
                        other => value.push(other),
                    }
                }
                i = closed.ok_or_else(|| ParseError::new(lineno, "unterminated quoted string"))?;
                tokens.push(value);
            }
            b'`' => {
                let end = raw[i + 1..]
                    .find('`')
                    .ok_or_else(|| ParseError::new(lineno, "unterminated raw string"))?;
                tokens.push(raw[i + 1..i + 1 + end].to_string());
                i += end + 2;
            }
            _ => {
                let start = i;
                while i < bytes.len()
                    && !bytes[i].is_ascii_whitespace()
                    && !bytes[i..].starts_with(b"//")
                {
                    i += 1;
                }
                tokens.push(raw[start..i].to_string());
            }
        }
    }

    Ok(Line { tokens, comment })
}
