//! Prompt template parsing and rendering.
//!
//! Syntax inside `{{ }}`:
//! - `$name` renders a variable,
//! - `'text'` or `"text"` renders a literal,
//! - `fn`, `plugin.fn`, `fn $var`, `fn 'text'` call a function, optionally
//!   followed by named arguments `key=$var` or `key='text'`.
//!
//! Everything outside blocks is copied verbatim.

use std::sync::LazyLock;

use regex::Regex;

use crate::arguments::{INPUT_ARG, KernelArguments};
use crate::error::KernelError;
use crate::kernel::Kernel;

#[allow(clippy::unwrap_used, reason = "static regex pattern is compile-time validated")]
static IDENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").unwrap());

#[allow(clippy::unwrap_used, reason = "static regex pattern is compile-time validated")]
static FUNCTION_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+(\.[A-Za-z0-9_]+)?$").unwrap());

/// A function argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueRef {
    Variable(String),
    Literal(String),
}

impl ValueRef {
    fn resolve(&self, args: &KernelArguments) -> String {
        match self {
            Self::Variable(name) => lookup(args, name),
            Self::Literal(text) => text.clone(),
        }
    }
}

/// One parsed piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Text(String),
    Variable(String),
    Literal(String),
    FunctionCall { name: String, positional: Option<ValueRef>, named: Vec<(String, ValueRef)> },
}

/// A parsed prompt template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    source: String,
    blocks: Vec<Block>,
}

impl PromptTemplate {
    /// Parse `source` into blocks.
    ///
    /// # Errors
    /// Returns [`KernelError::Template`] for unterminated or malformed blocks.
    pub fn parse(source: &str) -> Result<Self, KernelError> {
        let mut blocks = Vec::new();
        let mut rest = source;

        while let Some(open) = rest.find("{{") {
            if open > 0 {
                blocks.push(Block::Text(rest[..open].to_owned()));
            }
            let after_open = &rest[open + 2..];
            let close = find_block_end(after_open).ok_or_else(|| {
                KernelError::Template(format!("unterminated block at byte {}", source.len() - rest.len() + open))
            })?;
            blocks.push(parse_block(after_open[..close].trim())?);
            rest = &after_open[close + 2..];
        }
        if !rest.is_empty() {
            blocks.push(Block::Text(rest.to_owned()));
        }

        Ok(Self { source: source.to_owned(), blocks })
    }

    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Render blocks in order, calling functions as they are reached.
    ///
    /// Missing variables render as empty text.
    pub async fn render(&self, kernel: &Kernel, args: &KernelArguments) -> Result<String, KernelError> {
        let mut out = String::with_capacity(self.source.len());
        for block in &self.blocks {
            match block {
                Block::Text(text) | Block::Literal(text) => out.push_str(text),
                Block::Variable(name) => out.push_str(&lookup(args, name)),
                Block::FunctionCall { name, positional, named } => {
                    let mut call_args = args.clone();
                    if let Some(value) = positional {
                        call_args.insert(INPUT_ARG, value.resolve(args));
                    }
                    for (key, value) in named {
                        call_args.insert(key.clone(), value.resolve(args));
                    }
                    let function = kernel.function(name)?;
                    let result = function.invoke(kernel, &call_args).await?;
                    tracing::debug!(function = %name, len = result.value.len(), "template function rendered");
                    out.push_str(&result.value);
                },
            }
        }
        Ok(out)
    }
}

fn lookup(args: &KernelArguments, name: &str) -> String {
    match args.get(name) {
        Some(value) => value.to_owned(),
        None => {
            tracing::warn!(variable = name, "template variable not provided, rendering empty");
            String::new()
        },
    }
}

fn parse_block(content: &str) -> Result<Block, KernelError> {
    let tokens = tokenize(content)?;
    let Some((first, rest)) = tokens.split_first() else {
        return Err(KernelError::Template("empty block".to_owned()));
    };

    if first.starts_with('$') || is_quoted(first) {
        if !rest.is_empty() {
            return Err(KernelError::Template(format!("unexpected tokens after '{first}'")));
        }
        return match parse_value(first)? {
            ValueRef::Variable(name) => Ok(Block::Variable(name)),
            ValueRef::Literal(text) => Ok(Block::Literal(text)),
        };
    }

    if !FUNCTION_NAME.is_match(first) {
        return Err(KernelError::Template(format!("invalid function name '{first}'")));
    }

    let mut positional = None;
    let mut named = Vec::new();
    for (idx, token) in rest.iter().enumerate() {
        if let Some((key, value)) = split_named(token) {
            if !IDENT.is_match(key) {
                return Err(KernelError::Template(format!("invalid argument name '{key}'")));
            }
            named.push((key.to_owned(), parse_value(value)?));
        } else if idx == 0 {
            positional = Some(parse_value(token)?);
        } else {
            return Err(KernelError::Template(format!(
                "function '{first}' takes at most one positional argument, found '{token}'"
            )));
        }
    }

    Ok(Block::FunctionCall { name: first.clone(), positional, named })
}

/// Byte offset of the first `}}` that is not inside a quoted literal.
fn find_block_end(content: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (idx, c) in content.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {},
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == '}' && content[idx + 1..].starts_with('}') => return Some(idx),
            None => {},
        }
    }
    None
}

/// `key=value` unless the `=` sits inside a quoted literal.
fn split_named(token: &str) -> Option<(&str, &str)> {
    if token.starts_with('$') || is_quoted(token) {
        return None;
    }
    token.split_once('=')
}

fn parse_value(token: &str) -> Result<ValueRef, KernelError> {
    if let Some(name) = token.strip_prefix('$') {
        if !IDENT.is_match(name) {
            return Err(KernelError::Template(format!("invalid variable name '{token}'")));
        }
        return Ok(ValueRef::Variable(name.to_owned()));
    }
    if is_quoted(token) {
        return Ok(ValueRef::Literal(token[1..token.len() - 1].to_owned()));
    }
    Err(KernelError::Template(format!("expected $variable or quoted text, found '{token}'")))
}

fn is_quoted(token: &str) -> bool {
    token.len() >= 2
        && ((token.starts_with('\'') && token.ends_with('\''))
            || (token.starts_with('"') && token.ends_with('"')))
}

/// Split on whitespace, keeping quoted runs (which may contain spaces) intact.
fn tokenize(content: &str) -> Result<Vec<String>, KernelError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in content.chars() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == q {
                    quote = None;
                }
            },
            None if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            },
            None => {
                if c == '\'' || c == '"' {
                    quote = Some(c);
                }
                current.push(c);
            },
        }
    }
    if quote.is_some() {
        return Err(KernelError::Template(format!("unterminated quote in '{content}'")));
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}
