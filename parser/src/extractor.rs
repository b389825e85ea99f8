//! @ai:module:intent Scan document text for comments that carry the annotation marker
//! @ai:module:layer application
//! @ai:module:public_api CommentSpan, CommentKind, extract_comments, extract_all_comments
//! @ai:module:depends_on language, catalog
//! @ai:module:stateless true

use crate::catalog::MARKER;
use crate::language::{CommentStyle, Language};
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    Line,
    Block,
}

/// @ai:intent Byte range of a comment's content, delimiters excluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentSpan {
    pub start: usize,
    pub end: usize,
    pub kind: CommentKind,
}

impl CommentSpan {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

/// @ai:intent Return comment spans whose text contains the annotation marker
/// @ai:post every span satisfies span.text(text).contains(MARKER)
/// @ai:effects pure
pub fn extract_comments(text: &str, language: Language) -> Vec<CommentSpan> {
    if !text.contains(MARKER) {
        return Vec::new();
    }

    extract_all_comments(text, language)
        .into_iter()
        .filter(|span| span.text(text).contains(MARKER))
        .collect()
}

/// @ai:intent Return every comment span in source order
/// @ai:edge_cases an unterminated block comment runs to the end of the text
/// @ai:edge_cases quoted strings are skipped; an unterminated quote stops at end of line
/// @ai:effects pure
pub fn extract_all_comments(text: &str, language: Language) -> Vec<CommentSpan> {
    let style = language.comment_style();
    let Some(opener) = opener_pattern(&style) else {
        return Vec::new();
    };

    let mut spans = Vec::new();
    let mut pos = 0;

    while let Some(found) = opener.find_at(text, pos) {
        let token = found.as_str();
        let start = found.end();

        if style.strings.contains(&token) {
            pos = string_end(text, start, token);
        } else if style.line.contains(&token) {
            let end = text[start..]
                .find('\n')
                .map(|i| start + i)
                .unwrap_or(text.len());
            let content_end = if text[..end].ends_with('\r') {
                end - 1
            } else {
                end
            };
            spans.push(CommentSpan {
                start,
                end: content_end.max(start),
                kind: CommentKind::Line,
            });
            pos = end;
        } else {
            let close = closing_delimiter(&style, token);
            let (end, next) = match text[start..].find(close) {
                Some(i) => (start + i, start + i + close.len()),
                None => (text.len(), text.len()),
            };
            spans.push(CommentSpan {
                start,
                end,
                kind: CommentKind::Block,
            });
            pos = next;
        }

        if pos >= text.len() {
            break;
        }
    }

    spans
}

/// @ai:intent Build one alternation over all opening delimiters and string quotes, longest first
/// @ai:effects pure
fn opener_pattern(style: &CommentStyle) -> Option<Regex> {
    if style.line.is_empty() && style.block.is_empty() {
        return None;
    }

    let mut tokens: Vec<&str> = style
        .line
        .iter()
        .copied()
        .chain(style.block.iter().map(|(open, _)| *open))
        .chain(style.strings.iter().copied())
        .collect();

    // leftmost-first matching: "--[[" must win over "--", and "\"\"\"" over "\""
    tokens.sort_by(|a, b| b.len().cmp(&a.len()));
    let pattern = tokens
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");

    Regex::new(&pattern).ok()
}

/// @ai:intent Byte offset just past the closing quote
/// @ai:edge_cases backslash escapes the next character; only backticks may span lines
fn string_end(text: &str, start: usize, quote: &str) -> usize {
    let multiline = quote == "`";
    let mut chars = text[start..].char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '\n' if !multiline => return start + i,
            _ if text[start + i..].starts_with(quote) => return start + i + quote.len(),
            _ => {}
        }
    }

    text.len()
}

fn closing_delimiter(style: &CommentStyle, open: &str) -> &'static str {
    style
        .block
        .iter()
        .find(|(o, _)| *o == open)
        .map(|(_, close)| *close)
        .unwrap_or("\n")
}
