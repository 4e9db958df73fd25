// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Tokenizer for 2-way SQL templates.
//!
//! Splits raw SQL into [`Token`]s that cover the input with no gaps, so the
//! concatenated token texts always reproduce the original file.
//!
//! # Directive Comments
//!
//! | Text | Kind |
//! |------|------|
//! | `/*name*/` | [`TokenKind::BindVariable`] |
//! | `/*$name*/` | [`TokenKind::LiteralVariable`] |
//! | `/*#name*/` | [`TokenKind::EmbeddedVariable`] |
//! | `/*%if cond*/` | [`TokenKind::If`] |
//! | `/*%elseif cond*/` | [`TokenKind::Elseif`] |
//! | `/*%else*/` | [`TokenKind::Else`] |
//! | `/*%end*/` | [`TokenKind::End`] |
//! | `/*%for x : xs*/` | [`TokenKind::For`] |
//! | `/*%expand*/` | [`TokenKind::Expand`] |
//! | `/*%populate*/` | [`TokenKind::Populate`] |
//!
//! A block comment whose first character cannot start an identifier
//! (`/* note */`, `/*+ hint */`) stays a plain [`TokenKind::BlockComment`].
//!
//! # Words
//!
//! A word runs while the character is not whitespace and not one of
//! `= < > - , / * + ( ) ;`. Clause keywords are matched case-insensitively
//! against whole words; `GROUP BY`, `ORDER BY` and `FOR UPDATE` accept any
//! whitespace run between their two words.


use crate::error::{Error, MessageCode, Result};

/// Classified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Whitespace,
    Eol,
    Word,
    Quote,
    OpenedParens,
    ClosedParens,
    Delimiter,
    Other,
    LineComment,
    BlockComment,
    BindVariable,
    LiteralVariable,
    EmbeddedVariable,
    If,
    Elseif,
    Else,
    End,
    For,
    Expand,
    Populate,
    Select,
    From,
    Where,
    GroupBy,
    Having,
    OrderBy,
    ForUpdate,
    Option,
    Update,
    Set,
    Union,
    Except,
    Intersect,
    Minus,
    And,
    Or
}

impl TokenKind {
    /// Whether the token is a `/*...*/` directive.
    #[must_use]
    pub const fn is_directive(&self) -> bool {
        matches!(
            self,
            Self::BindVariable
                | Self::LiteralVariable
                | Self::EmbeddedVariable
                | Self::If
                | Self::Elseif
                | Self::Else
                | Self::End
                | Self::For
                | Self::Expand
                | Self::Populate
        )
    }

    /// Whether the token is a clause keyword that groups following tokens.
    #[must_use]
    pub const fn is_clause_keyword(&self) -> bool {
        matches!(
            self,
            Self::Select
                | Self::From
                | Self::Where
                | Self::GroupBy
                | Self::Having
                | Self::OrderBy
                | Self::ForUpdate
                | Self::Option
                | Self::Update
                | Self::Set
        )
    }
}

/// Token with its 1-based source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind:   TokenKind,
    pub text:   String,
    pub line:   usize,
    pub column: usize
}

/// Whether `c` may continue a word.
#[must_use]
pub fn is_word_part(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '=' | '<' | '>' | '-' | ',' | '/' | '*' | '+' | '(' | ')' | ';')
}

/// SQL template tokenizer.
///
/// Tokenizing is restartable: every call to [`Tokenizer::tokenize`] scans
/// the input from the beginning.
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer<'a> {
    sql: &'a str
}

impl<'a> Tokenizer<'a> {
    /// Tokenizer over `sql`.
    #[must_use]
    pub const fn new(sql: &'a str) -> Self {
        Self {
            sql
        }
    }

    /// Scan the whole input.
    ///
    /// # Errors
    ///
    /// - `ESP2101` for an unterminated quoted literal
    /// - `ESP2102` for an unterminated block comment
    /// - `ESP2119` for an unknown `/*%` keyword
    pub fn tokenize(&self) -> Result<Vec<Token>> {
        let mut state = TokenizerState::new(self.sql);
        let mut tokens = Vec::new();
        while let Some(token) = state.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }
}

struct TokenizerState<'a> {
    sql:     &'a str,
    chars:   Vec<char>,
    current: usize,
    line:    usize,
    column:  usize
}

impl<'a> TokenizerState<'a> {
    fn new(sql: &'a str) -> Self {
        Self {
            sql,
            chars: sql.chars().collect(),
            current: 0,
            line: 1,
            column: 1
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.current + offset).copied()
    }

    fn text(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }

    fn error(&self, code: MessageCode, message: &str, line: usize, column: usize) -> Error {
        Error::parse(code, message, self.sql, line, column)
    }

    /// Consume characters up to `end`, tracking line and column.
    fn advance_to(&mut self, end: usize) {
        while self.current < end {
            let c = self.chars[self.current];
            self.current += 1;
            if c == '\n' || (c == '\r' && self.chars.get(self.current) != Some(&'\n')) {
                self.line += 1;
                self.column = 1;
            } else if c != '\r' {
                self.column += 1;
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        let Some(c) = self.peek(0) else {
            return Ok(None);
        };
        let (line, column) = (self.line, self.column);
        let start = self.current;

        let (kind, end) = match c {
            '\r' if self.peek(1) == Some('\n') => (TokenKind::Eol, start + 2),
            '\r' | '\n' => (TokenKind::Eol, start + 1),
            c if c.is_whitespace() => {
                let end = self.scan_while(start, |c| c.is_whitespace() && c != '\r' && c != '\n');
                (TokenKind::Whitespace, end)
            }
            '\'' => (TokenKind::Quote, self.scan_quote(start, line, column)?),
            '/' if self.peek(1) == Some('*') => self.scan_block_comment(start, line, column)?,
            '-' if self.peek(1) == Some('-') => {
                let end = self.scan_while(start, |c| c != '\r' && c != '\n');
                (TokenKind::LineComment, end)
            }
            '(' => (TokenKind::OpenedParens, start + 1),
            ')' => (TokenKind::ClosedParens, start + 1),
            ';' => (TokenKind::Delimiter, start + 1),
            c if !is_word_part(c) => (TokenKind::Other, start + 1),
            _ => self.scan_word(start)
        };

        let text = self.text(start, end);
        self.advance_to(end);
        Ok(Some(Token {
            kind,
            text,
            line,
            column
        }))
    }

    fn scan_while(&self, start: usize, pred: impl Fn(char) -> bool) -> usize {
        let mut end = start;
        while end < self.chars.len() && pred(self.chars[end]) {
            end += 1;
        }
        end
    }

    fn scan_quote(&self, start: usize, line: usize, column: usize) -> Result<usize> {
        let mut i = start + 1;
        while i < self.chars.len() {
            if self.chars[i] == '\'' {
                if self.chars.get(i + 1) == Some(&'\'') {
                    i += 2;
                    continue;
                }
                return Ok(i + 1);
            }
            i += 1;
        }
        Err(self.error(
            MessageCode::Esp2101,
            "quoted literal is not terminated",
            line,
            column
        ))
    }

    fn scan_block_comment(
        &self,
        start: usize,
        line: usize,
        column: usize
    ) -> Result<(TokenKind, usize)> {
        let mut i = start + 2;
        while i + 1 < self.chars.len() {
            if self.chars[i] == '*' && self.chars[i + 1] == '/' {
                let body = self.text(start + 2, i);
                let kind = classify_comment(&body)
                    .ok_or_else(|| {
                        self.error(
                            MessageCode::Esp2119,
                            "unknown directive keyword after /*%",
                            line,
                            column
                        )
                    })?;
                return Ok((kind, i + 2));
            }
            i += 1;
        }
        Err(self.error(
            MessageCode::Esp2102,
            "block comment is not terminated",
            line,
            column
        ))
    }

    fn scan_word(&self, start: usize) -> (TokenKind, usize) {
        let end = self.scan_while(start, is_word_part);
        let word = self.text(start, end).to_ascii_lowercase();
        let single = match word.as_str() {
            "select" => Some(TokenKind::Select),
            "from" => Some(TokenKind::From),
            "where" => Some(TokenKind::Where),
            "having" => Some(TokenKind::Having),
            "option" => Some(TokenKind::Option),
            "update" => Some(TokenKind::Update),
            "set" => Some(TokenKind::Set),
            "union" => Some(TokenKind::Union),
            "except" => Some(TokenKind::Except),
            "intersect" => Some(TokenKind::Intersect),
            "minus" => Some(TokenKind::Minus),
            "and" => Some(TokenKind::And),
            "or" => Some(TokenKind::Or),
            _ => None
        };
        if let Some(kind) = single {
            return (kind, end);
        }
        let pair = match word.as_str() {
            "group" => Some(("by", TokenKind::GroupBy)),
            "order" => Some(("by", TokenKind::OrderBy)),
            "for" => Some(("update", TokenKind::ForUpdate)),
            _ => None
        };
        if let Some((second, kind)) = pair
            && let Some(pair_end) = self.match_second_word(end, second)
        {
            return (kind, pair_end);
        }
        (TokenKind::Word, end)
    }

    fn match_second_word(&self, first_end: usize, second: &str) -> Option<usize> {
        let word_start = self.scan_while(first_end, char::is_whitespace);
        if word_start == first_end {
            return None;
        }
        let word_end = self.scan_while(word_start, is_word_part);
        let candidate = self.text(word_start, word_end);
        candidate.eq_ignore_ascii_case(second).then_some(word_end)
    }
}

/// Classify the body of a `/*...*/` comment.
///
/// Returns `None` for an unknown `%` keyword.
fn classify_comment(body: &str) -> Option<TokenKind> {
    let Some(first) = body.chars().next() else {
        return Some(TokenKind::BlockComment);
    };
    let kind = match first {
        '%' => {
            let keyword: String = body[1..]
                .chars()
                .take_while(|c| c.is_ascii_alphabetic())
                .collect::<String>()
                .to_ascii_lowercase();
            match keyword.as_str() {
                "if" => TokenKind::If,
                "elseif" => TokenKind::Elseif,
                "else" => TokenKind::Else,
                "end" => TokenKind::End,
                "for" => TokenKind::For,
                "expand" => TokenKind::Expand,
                "populate" => TokenKind::Populate,
                _ => return None
            }
        }
        '$' => TokenKind::LiteralVariable,
        '#' => TokenKind::EmbeddedVariable,
        c if c.is_alphabetic() || c == '_' || c == '@' => TokenKind::BindVariable,
        _ => TokenKind::BlockComment
    };
    Some(kind)
}
