//! Lexer with explicit trivia capture
//!
//! Tokens carry the exact whitespace and comments that preceded them as a
//! [`Space`], so the token stream (plus the trailing end-of-file space) is a
//! partition of the source text. Anything the parser builds from these tokens
//! is lossless by construction.

use crate::error::NoriError;
use crate::result::Result;

use super::space::{Comment, CommentStyle, Space};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Int,
    Float,
    Str,
    Char,
    Punct,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub space: Space,
    pub kind: TokenKind,
    /// Verbatim source text of the token.
    pub text: String,
    pub line: u32,
    pub col: u32,
}

impl Token {
    pub fn is(&self, text: &str) -> bool {
        self.text == text
    }

    pub fn is_word(&self, text: &str) -> bool {
        self.kind == TokenKind::Word && self.text == text
    }
}

/// The full lex result: every token with its leading space, plus whatever
/// trivia trailed the last token.
#[derive(Debug, Clone)]
pub struct LexOutput {
    pub tokens: Vec<Token>,
    pub eof_space: Space,
}

struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
    line: u32,
    col: u32,
}

/// Lex `source` into trivia-attributed tokens.
pub fn lex(source: &str) -> Result<LexOutput> {
    let mut lexer = Lexer {
        src: source.as_bytes(),
        pos: 0,
        line: 1,
        col: 1,
    };
    lexer.run(source)
}

impl<'a> Lexer<'a> {
    fn run(&mut self, source: &str) -> Result<LexOutput> {
        let mut tokens = Vec::new();
        loop {
            let space = self.lex_space(source)?;
            if self.pos >= self.src.len() {
                return Ok(LexOutput {
                    tokens,
                    eof_space: space,
                });
            }
            let (line, col) = (self.line, self.col);
            let (kind, text) = self.lex_token(source)?;
            tokens.push(Token {
                space,
                kind,
                text,
                line,
                col,
            });
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(b)
    }

    fn lex_space(&mut self, source: &str) -> Result<Space> {
        let mut whitespace = String::new();
        let mut comments: Vec<Comment> = Vec::new();
        loop {
            match self.peek() {
                Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') => {
                    let b = self.bump().unwrap();
                    let target = match comments.last_mut() {
                        Some(comment) => &mut comment.suffix,
                        None => &mut whitespace,
                    };
                    target.push(b as char);
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    self.bump();
                    self.bump();
                    let start = self.pos;
                    while let Some(b) = self.peek() {
                        if b == b'\n' {
                            break;
                        }
                        self.bump();
                    }
                    comments.push(Comment::new(
                        CommentStyle::Line,
                        &source[start..self.pos],
                        "",
                    ));
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    let (line, col) = (self.line, self.col);
                    self.bump();
                    self.bump();
                    // `/**` opens a doc comment unless it is the degenerate
                    // `/**/`.
                    let style = if self.peek() == Some(b'*') && self.peek_at(1) != Some(b'/') {
                        self.bump();
                        CommentStyle::Doc
                    } else {
                        CommentStyle::Block
                    };
                    let start = self.pos;
                    loop {
                        match self.peek() {
                            Some(b'*') if self.peek_at(1) == Some(b'/') => break,
                            Some(_) => {
                                self.bump();
                            }
                            None => {
                                return Err(NoriError::parse("unterminated comment", line, col));
                            }
                        }
                    }
                    let text = &source[start..self.pos];
                    self.bump();
                    self.bump();
                    comments.push(Comment::new(style, text, ""));
                }
                _ => break,
            }
        }
        Ok(Space {
            whitespace,
            comments,
        })
    }

    fn lex_token(&mut self, source: &str) -> Result<(TokenKind, String)> {
        let start = self.pos;
        let (line, col) = (self.line, self.col);
        let b = self.peek().expect("lex_token called at end of input");

        if b.is_ascii_alphabetic() || b == b'_' || b == b'$' {
            while let Some(c) = self.peek() {
                if c.is_ascii_alphanumeric() || c == b'_' || c == b'$' {
                    self.bump();
                } else {
                    break;
                }
            }
            return Ok((TokenKind::Word, source[start..self.pos].to_string()));
        }

        if b.is_ascii_digit() {
            let mut is_float = false;
            let mut prev = 0u8;
            while let Some(c) = self.peek() {
                let take = match c {
                    b'0'..=b'9' | b'_' => true,
                    b'x' | b'X' | b'a'..=b'd' | b'A'..=b'D' | b'f' | b'F' | b'l' | b'L' => true,
                    b'e' | b'E' => true,
                    b'.' => {
                        // Only part of the number when a digit follows;
                        // otherwise it is a member access on a literal.
                        if self.peek_at(1).is_some_and(|n| n.is_ascii_digit()) {
                            is_float = true;
                            true
                        } else {
                            false
                        }
                    }
                    b'+' | b'-' => prev == b'e' || prev == b'E',
                    _ => false,
                };
                if !take {
                    break;
                }
                if matches!(c, b'e' | b'E') {
                    is_float = true;
                }
                prev = c;
                self.bump();
            }
            let text = &source[start..self.pos];
            let kind = if is_float || text.contains('.') || text.ends_with(['f', 'F', 'd', 'D']) {
                // Hex literals can end in d/f digits without being floats.
                if text.starts_with("0x") || text.starts_with("0X") {
                    TokenKind::Int
                } else {
                    TokenKind::Float
                }
            } else {
                TokenKind::Int
            };
            return Ok((kind, text.to_string()));
        }

        if b == b'"' || b == b'\'' {
            let quote = b;
            self.bump();
            loop {
                match self.peek() {
                    Some(b'\\') => {
                        self.bump();
                        self.bump();
                    }
                    Some(c) if c == quote => {
                        self.bump();
                        break;
                    }
                    Some(b'\n') | None => {
                        return Err(NoriError::parse("unterminated literal", line, col));
                    }
                    Some(_) => {
                        self.bump();
                    }
                }
            }
            let kind = if quote == b'"' {
                TokenKind::Str
            } else {
                TokenKind::Char
            };
            return Ok((kind, source[start..self.pos].to_string()));
        }

        // Punctuation, longest match first. `>` is deliberately never
        // combined into `>>`/`>>>`/`>>=` here — the parser merges adjacent
        // `>` tokens in expression position so generic closers keep working.
        const PUNCTS: &[&str] = &[
            "<<=", "...", "==", "!=", "<=", ">=", "&&", "||", "++", "--", "+=", "-=", "*=", "/=",
            "%=", "&=", "|=", "^=", "<<", "::", "->", "@", "{", "}", "(", ")", "[", "]", ";", ",",
            ".", "=", "<", ">", "!", "~", "?", ":", "+", "-", "*", "/", "%", "&", "|", "^",
        ];
        for punct in PUNCTS {
            if source[self.pos..].starts_with(punct) {
                for _ in 0..punct.len() {
                    self.bump();
                }
                return Ok((TokenKind::Punct, (*punct).to_string()));
            }
        }

        Err(NoriError::parse(
            format!("unexpected character {:?}", b as char),
            line,
            col,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(out: &LexOutput) -> Vec<&str> {
        out.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn tokens_partition_the_source() {
        let src = "class  Foo {\n  int x = 1; // done\n}\n";
        let out = lex(src).unwrap();
        let mut rebuilt = String::new();
        for token in &out.tokens {
            rebuilt.push_str(&token.space.render());
            rebuilt.push_str(&token.text);
        }
        rebuilt.push_str(&out.eof_space.render());
        assert_eq!(rebuilt, src);
    }

    #[test]
    fn comments_attach_to_following_token() {
        let src = "// header\nclass Foo {}";
        let out = lex(src).unwrap();
        let class_tok = &out.tokens[0];
        assert_eq!(class_tok.text, "class");
        assert_eq!(class_tok.space.comments.len(), 1);
        assert_eq!(class_tok.space.comments[0].text, " header");
        assert_eq!(class_tok.space.comments[0].suffix, "\n");
    }

    #[test]
    fn doc_comment_detected() {
        let src = "/** api */ int x;";
        let out = lex(src).unwrap();
        assert_eq!(out.tokens[0].space.comments[0].style, CommentStyle::Doc);
        assert_eq!(out.tokens[0].space.comments[0].text, " api ");
    }

    #[test]
    fn degenerate_empty_block_comment() {
        let src = "/**/int x;";
        let out = lex(src).unwrap();
        assert_eq!(out.tokens[0].space.comments[0].style, CommentStyle::Block);
        assert_eq!(out.tokens[0].space.comments[0].text, "");
    }

    #[test]
    fn greater_than_stays_single() {
        let out = lex("a >> b").unwrap();
        assert_eq!(texts(&out), vec!["a", ">", ">", "b"]);
    }

    #[test]
    fn compound_operators_max_munch() {
        let out = lex("x <<= 2; y != z").unwrap();
        assert_eq!(texts(&out), vec!["x", "<<=", "2", ";", "y", "!=", "z"]);
    }

    #[test]
    fn float_vs_member_access() {
        let out = lex("1.5f + x.y").unwrap();
        assert_eq!(out.tokens[0].kind, TokenKind::Float);
        assert_eq!(texts(&out), vec!["1.5f", "+", "x", ".", "y"]);
    }

    #[test]
    fn string_with_escapes() {
        let out = lex(r#"s = "a\"b";"#).unwrap();
        assert_eq!(out.tokens[2].kind, TokenKind::Str);
        assert_eq!(out.tokens[2].text, r#""a\"b""#);
    }

    #[test]
    fn unterminated_comment_is_an_error() {
        assert!(lex("/* oops").is_err());
    }
}
