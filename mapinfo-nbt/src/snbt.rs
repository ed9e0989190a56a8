//! Stringified NBT: the human-readable text form of a tag tree

use std::fmt::Write;

use crate::binary::DEFAULT_MAX_DEPTH;
use crate::compound::CompoundTag;
use crate::error::{Error, Result};
use crate::tag::{Tag, TagKind};

/// Output layout for [`to_snbt`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SnbtStyle {
    /// One entry per line
    pub pretty: bool,
    /// Spaces per nesting level when `pretty` is set
    pub indent: usize,
}

impl SnbtStyle {
    pub const COMPACT: Self = Self { pretty: false, indent: 0 };

    pub fn pretty(indent: usize) -> Self {
        Self { pretty: true, indent }
    }
}

impl Default for SnbtStyle {
    fn default() -> Self {
        Self::pretty(4)
    }
}

/// Render a compound. Keys are sorted so equal records always print alike.
pub fn to_snbt(compound: &CompoundTag, style: SnbtStyle) -> String {
    let mut out = String::new();
    write_compound(&mut out, compound, style, 0);
    out
}

fn is_bare_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+'))
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn newline(out: &mut String, style: SnbtStyle, depth: usize) {
    if style.pretty {
        out.push('\n');
        out.extend(std::iter::repeat(' ').take(style.indent * depth));
    }
}

fn separator(style: SnbtStyle) -> &'static str {
    if style.pretty { ": " } else { ":" }
}

fn write_compound(out: &mut String, compound: &CompoundTag, style: SnbtStyle, depth: usize) {
    if compound.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push('{');
    for (i, (key, tag)) in compound.sorted().into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        newline(out, style, depth + 1);
        if is_bare_key(key) {
            out.push_str(key);
        } else {
            write_quoted(out, key);
        }
        out.push_str(separator(style));
        write_tag(out, tag, style, depth + 1);
    }
    newline(out, style, depth);
    out.push('}');
}

fn write_seq<T>(out: &mut String, prefix: &str, items: &[T], mut each: impl FnMut(&mut String, &T)) {
    out.push('[');
    out.push_str(prefix);
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        each(out, item);
    }
    out.push(']');
}

fn write_tag(out: &mut String, tag: &Tag, style: SnbtStyle, depth: usize) {
    // `write!` into a String cannot fail
    match tag {
        Tag::Byte(v) => { let _ = write!(out, "{v}b"); }
        Tag::Short(v) => { let _ = write!(out, "{v}s"); }
        Tag::Int(v) => { let _ = write!(out, "{v}"); }
        Tag::Long(v) => { let _ = write!(out, "{v}L"); }
        Tag::Float(v) => { let _ = write!(out, "{v:?}f"); }
        Tag::Double(v) => { let _ = write!(out, "{v:?}d"); }
        Tag::String(s) => write_quoted(out, s),
        Tag::ByteArray(values) => write_seq(out, "B;", values, |o, v| { let _ = write!(o, "{v}b"); }),
        Tag::IntArray(values) => write_seq(out, "I;", values, |o, v| { let _ = write!(o, "{v}"); }),
        Tag::LongArray(values) => write_seq(out, "L;", values, |o, v| { let _ = write!(o, "{v}L"); }),
        Tag::Compound(c) => write_compound(out, c, style, depth),
        Tag::List(items) => {
            let nested = items
                .first()
                .is_some_and(|t| matches!(t.kind(), TagKind::Compound | TagKind::List));
            if !style.pretty || !nested {
                write_seq(out, "", items, |o, t| write_tag(o, t, SnbtStyle { pretty: false, ..style }, depth));
                return;
            }
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                newline(out, style, depth + 1);
                write_tag(out, item, style, depth + 1);
            }
            newline(out, style, depth);
            out.push(']');
        }
    }
}

/// Parse SNBT text whose top level is a compound
pub fn from_snbt(input: &str) -> Result<CompoundTag> {
    from_snbt_with_depth(input, DEFAULT_MAX_DEPTH)
}

/// Like [`from_snbt`], rejecting compounds and lists nested deeper than `max_depth`
pub fn from_snbt_with_depth(input: &str, max_depth: usize) -> Result<CompoundTag> {
    let mut parser = Parser::new(input, max_depth);
    parser.skip_ws();
    let compound = parser.parse_compound()?;
    parser.skip_ws();
    if parser.pos < parser.src.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(compound)
}

/// Parse a single SNBT value of any kind
pub fn parse_tag(input: &str) -> Result<Tag> {
    let mut parser = Parser::new(input, DEFAULT_MAX_DEPTH);
    parser.skip_ws();
    let tag = parser.parse_value()?;
    parser.skip_ws();
    if parser.pos < parser.src.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(tag)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str, max_depth: usize) -> Self {
        Self { src, pos: 0, depth: 0, max_depth }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::Snbt { offset: self.pos, message: message.into() }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn expect(&mut self, want: char) -> Result<()> {
        self.skip_ws();
        match self.bump() {
            Some(c) if c == want => Ok(()),
            Some(c) => Err(self.error(format!("expected '{want}', found '{c}'"))),
            None => Err(self.error(format!("expected '{want}', found end of input"))),
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(Error::DepthLimit { max: self.max_depth });
        }
        Ok(())
    }

    fn parse_compound(&mut self) -> Result<CompoundTag> {
        self.expect('{')?;
        self.enter()?;
        let mut compound = CompoundTag::new();
        self.skip_ws();
        if self.peek() == Some('}') {
            self.bump();
            self.depth -= 1;
            return Ok(compound);
        }
        loop {
            self.skip_ws();
            let key = match self.peek() {
                Some('"') | Some('\'') => self.parse_quoted()?,
                _ => {
                    let key = self.parse_bare();
                    if key.is_empty() {
                        return Err(self.error("expected key"));
                    }
                    key
                }
            };
            self.expect(':')?;
            self.skip_ws();
            let value = self.parse_value()?;
            compound.insert(key, value);
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some('}') => break,
                _ => return Err(self.error("expected ',' or '}'")),
            }
        }
        self.depth -= 1;
        Ok(compound)
    }

    fn parse_value(&mut self) -> Result<Tag> {
        match self.peek() {
            Some('{') => Ok(Tag::Compound(self.parse_compound()?)),
            Some('[') => self.parse_list_or_array(),
            Some('"') | Some('\'') => Ok(Tag::String(self.parse_quoted()?)),
            Some(_) => {
                let start = self.pos;
                let word = self.parse_bare();
                if word.is_empty() {
                    self.pos = start;
                    return Err(self.error("expected value"));
                }
                Ok(interpret_bare(&word))
            }
            None => Err(self.error("expected value, found end of input")),
        }
    }

    fn parse_bare(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+'))
        {
            self.bump();
        }
        self.src[start..self.pos].to_owned()
    }

    fn parse_quoted(&mut self) -> Result<String> {
        let quote = self.bump().ok_or_else(|| self.error("expected string"))?;
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error("unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(c @ ('"' | '\'' | '\\')) => out.push(c),
                    _ => return Err(self.error("invalid escape")),
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_list_or_array(&mut self) -> Result<Tag> {
        self.expect('[')?;
        let rest = &self.src[self.pos..];
        let array_kind = ["B;", "I;", "L;"]
            .iter()
            .find(|p| rest.starts_with(*p))
            .map(|p| p.as_bytes()[0]);
        if let Some(kind) = array_kind {
            self.pos += 2;
            return self.parse_array(kind);
        }

        self.enter()?;
        let mut items: Vec<Tag> = Vec::new();
        self.skip_ws();
        if self.peek() == Some(']') {
            self.bump();
            self.depth -= 1;
            return Ok(Tag::List(items));
        }
        loop {
            self.skip_ws();
            let item = self.parse_value()?;
            if let Some(first) = items.first() {
                if first.kind() != item.kind() {
                    return Err(self.error(format!(
                        "list mixes {} and {}",
                        first.kind(),
                        item.kind()
                    )));
                }
            }
            items.push(item);
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some(']') => break,
                _ => return Err(self.error("expected ',' or ']'")),
            }
        }
        self.depth -= 1;
        Ok(Tag::List(items))
    }

    fn parse_array(&mut self, kind: u8) -> Result<Tag> {
        let mut values = Vec::new();
        self.skip_ws();
        if self.peek() == Some(']') {
            self.bump();
        } else {
            loop {
                self.skip_ws();
                let word = self.parse_bare();
                values.push(interpret_bare(&word));
                self.skip_ws();
                match self.bump() {
                    Some(',') => continue,
                    Some(']') => break,
                    _ => return Err(self.error("expected ',' or ']'")),
                }
            }
        }

        let mismatch = |s: &Self, t: &Tag| s.error(format!("{} in {} array", t.kind(), kind as char));
        match kind {
            b'B' => values
                .iter()
                .map(|t| match t {
                    Tag::Byte(v) => Ok(*v),
                    t => Err(mismatch(self, t)),
                })
                .collect::<Result<Vec<_>>>()
                .map(Tag::ByteArray),
            b'I' => values
                .iter()
                .map(|t| match t {
                    Tag::Int(v) => Ok(*v),
                    t => Err(mismatch(self, t)),
                })
                .collect::<Result<Vec<_>>>()
                .map(Tag::IntArray),
            _ => values
                .iter()
                .map(|t| match t {
                    Tag::Long(v) => Ok(*v),
                    Tag::Int(v) => Ok(*v as i64),
                    t => Err(mismatch(self, t)),
                })
                .collect::<Result<Vec<_>>>()
                .map(Tag::LongArray),
        }
    }
}

/// Type an unquoted token by its suffix, falling back to a string
fn interpret_bare(word: &str) -> Tag {
    match word {
        "true" => return Tag::Byte(1),
        "false" => return Tag::Byte(0),
        _ => {}
    }

    if let Some((body, suffix)) = word.char_indices().last().map(|(i, c)| (&word[..i], c)) {
        let parsed = match suffix.to_ascii_lowercase() {
            'b' => body.parse().ok().map(Tag::Byte),
            's' => body.parse().ok().map(Tag::Short),
            'l' => body.parse().ok().map(Tag::Long),
            'f' => body.parse().ok().filter(|v: &f32| v.is_finite()).map(Tag::Float),
            'd' => body.parse().ok().filter(|v: &f64| v.is_finite()).map(Tag::Double),
            _ => None,
        };
        if let Some(tag) = parsed {
            return tag;
        }
    }

    if let Ok(v) = word.parse::<i32>() {
        return Tag::Int(v);
    }
    let looks_numeric = word.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '-' | '+' | '.'));
    if looks_numeric && word.contains(['.', 'e', 'E']) {
        if let Ok(v) = word.parse::<f64>() {
            if v.is_finite() {
                return Tag::Double(v);
            }
        }
    }
    Tag::String(word.to_owned())
}
