//! Route pattern compilation and matching.
//!
//! A pattern is compiled once, at registration, into an anchored regular
//! expression plus the ordered list of its parameter [`Key`]s.
//!
//! # Syntax
//!
//! | Token          | Meaning                                             |
//! |----------------|-----------------------------------------------------|
//! | `/about`       | literal text (`\` escapes the next character)       |
//! | `:id`          | one segment, captured as `id`                       |
//! | `:id(\d+)`     | custom expression for the segment                   |
//! | `(\d+)`        | unnamed capture, keyed `"0"`, `"1"`, ... in order   |
//! | `:id?`         | optional (the leading `/` or `.` is optional too)   |
//! | `:path+`       | one or more segments                                |
//! | `:path*`       | zero or more segments                               |
//! | `*`            | anything, including `/`, keyed like unnamed groups  |
//!
//! The pattern `"*"` on its own is the universal wildcard.
//!
//! Without [`strict`](PatternOptions::strict) a single trailing `/` on the
//! path is ignored. Without [`sensitive`](PatternOptions::sensitive) literals
//! match case-insensitively.
//!
//! # Example
//!
//! ```
//! use spa_navigator::{PathPattern, PatternOptions};
//!
//! let pattern = PathPattern::compile("/post/:slug", PatternOptions::default()).unwrap();
//! let params = pattern.matches("/post/hello-world?ref=home", true).unwrap();
//! assert_eq!(params.get("slug"), Some(&"hello-world".to_string()));
//! assert!(pattern.matches("/posts", true).is_none());
//! ```

use crate::error::RouterError;
use crate::params::{decode_uri_component, decode_url_component, RouteParams};
use regex::{Regex, RegexBuilder};
use std::borrow::Cow;

/// The pattern that matches every path.
pub const WILDCARD: &str = "*";

/// Upper bound for the compiled expression, in bytes.
const MAX_REGEX_SIZE: usize = 1 << 20;

/// Flags that change how a pattern matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PatternOptions {
    /// Match literals case-sensitively.
    pub sensitive: bool,
    /// Treat a trailing `/` as significant.
    pub strict: bool,
}

impl PatternOptions {
    /// Set case sensitivity.
    pub fn sensitive(mut self, sensitive: bool) -> Self {
        self.sensitive = sensitive;
        self
    }

    /// Set strict trailing-slash matching.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// A parameter declared by a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    /// Parameter name; unnamed groups use their ordinal (`"0"`, `"1"`, ...).
    pub name: String,
    /// Separator that introduces the parameter (`/` or `.`), if any.
    pub prefix: Option<char>,
    /// The parameter may be absent.
    pub optional: bool,
    /// The parameter may span several delimited segments.
    pub repeat: bool,
    /// Regular expression for a single occurrence.
    pub pattern: String,
}

#[derive(Debug)]
enum Token {
    Literal(String),
    Param(Key),
}

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    regex: Regex,
    keys: Vec<Key>,
    options: PatternOptions,
}

impl PathPattern {
    /// Compile `pattern` with the given options.
    pub fn compile(pattern: &str, options: PatternOptions) -> Result<Self, RouterError> {
        let source = if pattern == WILDCARD { "(.*)" } else { pattern };
        let tokens =
            tokenize(source).map_err(|message| RouterError::invalid_pattern(pattern, message))?;
        let expression = regex_source(&tokens, options.strict);

        let regex = RegexBuilder::new(&expression)
            .case_insensitive(!options.sensitive)
            .size_limit(MAX_REGEX_SIZE)
            .build()
            .map_err(|err| RouterError::invalid_pattern(pattern, err.to_string()))?;

        let keys = tokens
            .into_iter()
            .filter_map(|token| match token {
                Token::Param(key) => Some(key),
                Token::Literal(_) => None,
            })
            .collect();

        Ok(Self {
            source: pattern.to_string(),
            regex,
            keys,
            options,
        })
    }

    /// The pattern as it was registered.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Declared parameters, in pattern order.
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Declared parameter names, in pattern order.
    pub fn param_names(&self) -> Vec<&str> {
        self.keys.iter().map(|key| key.name.as_str()).collect()
    }

    /// Options the pattern was compiled with.
    pub fn options(&self) -> PatternOptions {
        self.options
    }

    /// Match `path` and return the captured parameters.
    ///
    /// Anything from the first `?` on is ignored. With `decode` set the
    /// pathname is percent-decoded before matching and every captured value
    /// is decoded again with [`decode_url_component`]. Parameters that did
    /// not participate in the match are absent from the result.
    pub fn matches(&self, path: &str, decode: bool) -> Option<RouteParams> {
        let pathname = path.split_once('?').map_or(path, |(pathname, _)| pathname);
        let subject = if decode {
            Cow::Owned(decode_uri_component(pathname))
        } else {
            Cow::Borrowed(pathname)
        };

        let captures = self.regex.captures(&subject)?;
        let mut params = RouteParams::new();
        for (index, key) in self.keys.iter().enumerate() {
            if let Some(value) = captures.name(&group_name(index)) {
                let value = if decode {
                    decode_url_component(value.as_str())
                } else {
                    value.as_str().to_string()
                };
                params.insert(key.name.clone(), value);
            }
        }
        Some(params)
    }

    /// Return `true` if `path` matches.
    pub fn is_match(&self, path: &str, decode: bool) -> bool {
        self.matches(path, decode).is_some()
    }
}

fn group_name(index: usize) -> String {
    format!("k{index}")
}

fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn starts_param(chars: &[char], at: usize) -> bool {
    match chars.get(at) {
        Some(':') => chars.get(at + 1).is_some_and(|c| is_word(*c)),
        Some('(' | '*') => true,
        _ => false,
    }
}

fn tokenize(pattern: &str) -> Result<Vec<Token>, String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut unnamed = 0;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '\\' {
            match chars.get(i + 1) {
                Some(&escaped) => {
                    literal.push(escaped);
                    i += 2;
                }
                None => {
                    literal.push(c);
                    i += 1;
                }
            }
            continue;
        }

        let (prefix, start) = if (c == '/' || c == '.') && starts_param(&chars, i + 1) {
            (Some(c), i + 1)
        } else if starts_param(&chars, i) {
            (None, i)
        } else {
            literal.push(c);
            i += 1;
            continue;
        };

        if !literal.is_empty() {
            tokens.push(Token::Literal(std::mem::take(&mut literal)));
        }
        let (key, end) = parse_param(&chars, start, prefix, &mut unnamed)?;
        tokens.push(Token::Param(key));
        i = end;
    }

    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    Ok(tokens)
}

fn parse_param(
    chars: &[char],
    start: usize,
    prefix: Option<char>,
    unnamed: &mut usize,
) -> Result<(Key, usize), String> {
    let mut i = start;
    let mut name = None;
    let mut custom = None;
    let asterisk = chars[i] == '*';

    if asterisk {
        i += 1;
    } else {
        if chars[i] == ':' {
            i += 1;
            let begin = i;
            while chars.get(i).is_some_and(|c| is_word(*c)) {
                i += 1;
            }
            name = Some(chars[begin..i].iter().collect::<String>());
        }
        if chars.get(i) == Some(&'(') {
            let (group, end) = read_group(chars, i)?;
            custom = Some(group);
            i = end;
        }
    }

    let modifier = if asterisk {
        None
    } else {
        match chars.get(i) {
            Some(&m @ ('?' | '*' | '+')) => {
                i += 1;
                Some(m)
            }
            _ => None,
        }
    };

    let name = name.unwrap_or_else(|| {
        let ordinal = unnamed.to_string();
        *unnamed += 1;
        ordinal
    });
    let delimiter = prefix.unwrap_or('/');
    let pattern = if asterisk {
        ".*".to_string()
    } else {
        custom.unwrap_or_else(|| format!("[^{}]+?", regex::escape(&delimiter.to_string())))
    };

    let key = Key {
        name,
        prefix,
        optional: matches!(modifier, Some('?' | '*')),
        repeat: matches!(modifier, Some('+' | '*')),
        pattern,
    };
    Ok((key, i))
}

/// Read a parenthesised group starting at `open`; returns its inner text and
/// the index just past the closing parenthesis.
fn read_group(chars: &[char], open: usize) -> Result<(String, usize), String> {
    let mut depth = 0usize;
    let mut inner = String::new();
    let mut i = open;

    loop {
        let Some(&c) = chars.get(i) else {
            return Err(format!("unclosed group at position {open}"));
        };
        match c {
            '\\' => {
                inner.push(c);
                if let Some(&escaped) = chars.get(i + 1) {
                    inner.push(escaped);
                    i += 1;
                }
            }
            '(' => {
                depth += 1;
                if depth > 1 {
                    inner.push(c);
                }
            }
            ')' => {
                depth -= 1;
                if depth == 0 {
                    if inner.is_empty() {
                        return Err(format!("empty group at position {open}"));
                    }
                    return Ok((inner, i + 1));
                }
                inner.push(c);
            }
            _ => inner.push(c),
        }
        i += 1;
    }
}

fn regex_source(tokens: &[Token], strict: bool) -> String {
    let mut route = String::new();
    let mut index = 0;

    for token in tokens {
        match token {
            Token::Literal(text) => route.push_str(&regex::escape(text)),
            Token::Param(key) => {
                let prefix = key
                    .prefix
                    .map(|p| regex::escape(&p.to_string()))
                    .unwrap_or_default();
                let mut capture = format!("(?:{})", key.pattern);
                if key.repeat {
                    capture = format!("{capture}(?:{prefix}{capture})*");
                }
                let group = format!("(?P<{}>{})", group_name(index), capture);
                if key.optional {
                    route.push_str(&format!("(?:{prefix}{group})?"));
                } else {
                    route.push_str(&prefix);
                    route.push_str(&group);
                }
                index += 1;
            }
        }
    }

    if !strict {
        if route.ends_with('/') {
            route.pop();
        }
        route.push_str("/?");
    }
    format!("^{route}$")
}
