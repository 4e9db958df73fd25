// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Node tree builder.
//!
//! Consumes the token stream and produces a root [`SqlNode::Anonymous`].
//! The parser keeps an explicit stack of frames:
//!
//! | Frame | Closed by |
//! |-------|-----------|
//! | Select, Clause, Logical, Populate | implicitly, at the next boundary |
//! | Parens | `)` |
//! | If | `/*%end*/` |
//! | For | `/*%end*/` |
//!
//! Implicit frames never survive a directive or parenthesis boundary, which
//! keeps every parenthesis inside the directive block that opened it.
//!
//! # Clause Grouping
//!
//! A clause keyword looks for the nearest frame that is not itself a clause,
//! logical operator or populate frame:
//!
//! - a SELECT: the keyword opens that statement's clause slot;
//! - the root: the keyword opens a standalone clause (UPDATE, DELETE);
//! - a parenthesis or directive block: the keyword stays a plain word.

#[cfg(test)]
mod tests;

use crate::{
    error::{Error, MessageCode, Result},
    node::{
        ClauseKind, ClauseNode, ConditionNode, ElseNode, EmbeddedVariableNode, EndNode,
        ExpandNode, ForBlockNode, ForNode, IfBlockNode, Location, LogicalOperatorNode,
        ParensNode, PopulateNode, SelectStatementNode, SqlNode, VariableNode
    },
    tokenizer::{Token, TokenKind, Tokenizer}
};

/// Parse `sql` into a node tree.
///
/// # Errors
///
/// Returns [`Error::SqlParse`] for any template syntax error.
///
/// # Example
///
/// ```rust
/// use twoway_core::{SqlNode, parse};
///
/// let node = parse("select * from emp where id = /*id*/1").unwrap();
/// assert!(matches!(node, SqlNode::Anonymous(_)));
/// ```
pub fn parse(sql: &str) -> Result<SqlNode> {
    let tokens = Tokenizer::new(sql).tokenize()?;
    ParserState::new(sql, tokens).run()
}

struct PendingVariable {
    literal: bool,
    node:    VariableNode
}

struct IfFrame {
    if_node:   ConditionNode,
    elseifs:   Vec<ConditionNode>,
    else_node: Option<ElseNode>
}

impl IfFrame {
    fn current_children(&mut self) -> &mut Vec<SqlNode> {
        if let Some(else_node) = self.else_node.as_mut() {
            return &mut else_node.children;
        }
        match self.elseifs.last_mut() {
            Some(elseif) => &mut elseif.children,
            None => &mut self.if_node.children
        }
    }
}

enum Frame {
    Root(Vec<SqlNode>),
    Select(SelectStatementNode),
    Clause(ClauseNode),
    Logical(LogicalOperatorNode),
    Populate(PopulateNode),
    Parens {
        children: Vec<SqlNode>,
        location: Location,
        owner:    Option<PendingVariable>
    },
    If(IfFrame),
    For(ForNode)
}

impl Frame {
    const fn is_implicit(&self) -> bool {
        matches!(
            self,
            Self::Select(_) | Self::Clause(_) | Self::Logical(_) | Self::Populate(_)
        )
    }
}

/// Nearest frame that decides how a clause keyword is treated.
enum Anchor {
    Select(usize),
    Root,
    Blocked
}

struct ParserState<'a> {
    sql:    &'a str,
    tokens: Vec<Token>,
    pos:    usize,
    stack:  Vec<Frame>
}

impl<'a> ParserState<'a> {
    fn new(sql: &'a str, tokens: Vec<Token>) -> Self {
        Self {
            sql,
            tokens,
            pos: 0,
            stack: vec![Frame::Root(Vec::new())]
        }
    }

    fn error(&self, code: MessageCode, message: impl Into<String>, token: &Token) -> Error {
        Error::parse(code, message, self.sql, token.line, token.column)
    }

    fn run(mut self) -> Result<SqlNode> {
        while self.pos < self.tokens.len() {
            let token = self.tokens[self.pos].clone();
            self.pos += 1;
            self.handle(token)?;
        }
        self.finish()
    }

    fn handle(&mut self, token: Token) -> Result<()> {
        match token.kind {
            TokenKind::Whitespace | TokenKind::Eol => self.append(SqlNode::Whitespace(token.text)),
            TokenKind::Word => self.append(SqlNode::Word(token.text)),
            TokenKind::Quote | TokenKind::Other => self.append(SqlNode::Fragment(token.text)),
            TokenKind::LineComment | TokenKind::BlockComment => {
                self.append(SqlNode::Comment(token.text));
            }
            TokenKind::Delimiter => {
                self.close_implicit_frames();
                self.append(SqlNode::Fragment(token.text));
            }
            TokenKind::OpenedParens => self.stack.push(Frame::Parens {
                children: Vec::new(),
                location: Location::new(token.line, token.column),
                owner:    None
            }),
            TokenKind::ClosedParens => self.close_parens(&token)?,
            TokenKind::Select => {
                self.stack
                    .push(Frame::Select(SelectStatementNode::default()));
                self.stack
                    .push(Frame::Clause(ClauseNode::new(ClauseKind::Select, token.text)));
            }
            TokenKind::From => self.open_clause(ClauseKind::From, token),
            TokenKind::Where => self.open_clause(ClauseKind::Where, token),
            TokenKind::GroupBy => self.open_clause(ClauseKind::GroupBy, token),
            TokenKind::Having => self.open_clause(ClauseKind::Having, token),
            TokenKind::OrderBy => self.open_clause(ClauseKind::OrderBy, token),
            TokenKind::ForUpdate => self.open_clause(ClauseKind::ForUpdate, token),
            TokenKind::Option => self.open_clause(ClauseKind::Option, token),
            TokenKind::Update => self.open_clause(ClauseKind::Update, token),
            TokenKind::Set => self.open_clause(ClauseKind::Set, token),
            TokenKind::Union | TokenKind::Except | TokenKind::Intersect | TokenKind::Minus => {
                self.close_statement();
                self.append(SqlNode::Word(token.text));
            }
            TokenKind::And | TokenKind::Or => self.open_logical(token),
            TokenKind::BindVariable => self.variable(token, false)?,
            TokenKind::LiteralVariable => self.variable(token, true)?,
            TokenKind::EmbeddedVariable => self.embedded(token)?,
            TokenKind::If => self.open_if(token)?,
            TokenKind::Elseif => self.elseif(token)?,
            TokenKind::Else => self.else_(token)?,
            TokenKind::End => self.end(&token)?,
            TokenKind::For => self.open_for(token)?,
            TokenKind::Expand => self.expand(token)?,
            TokenKind::Populate => {
                let location = Location::new(token.line, token.column);
                self.stack.push(Frame::Populate(PopulateNode {
                    text: token.text,
                    location,
                    children: Vec::new()
                }));
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<SqlNode> {
        self.close_implicit_frames();
        match self.stack.pop() {
            Some(Frame::Parens {
                location, ..
            }) => Err(Error::parse(
                MessageCode::Esp2109,
                "parenthesis is not closed",
                self.sql,
                location.line,
                location.column
            )),
            Some(Frame::If(frame)) => Err(Error::parse(
                MessageCode::Esp2104,
                "/*%if*/ has no matching /*%end*/",
                self.sql,
                frame.if_node.location.line,
                frame.if_node.location.column
            )),
            Some(Frame::For(node)) => Err(Error::parse(
                MessageCode::Esp2133,
                "/*%for*/ has no matching /*%end*/",
                self.sql,
                node.location.line,
                node.location.column
            )),
            Some(Frame::Root(children)) => Ok(SqlNode::Anonymous(children)),
            Some(_) | None => Ok(SqlNode::root())
        }
    }

    fn append(&mut self, node: SqlNode) {
        let Some(top) = self.stack.last_mut() else {
            return;
        };
        match top {
            Frame::Root(children)
            | Frame::Parens {
                children, ..
            } => children.push(node),
            Frame::Clause(clause) => clause.children.push(node),
            Frame::Logical(op) => op.children.push(node),
            Frame::Populate(populate) => populate.children.push(node),
            Frame::For(for_node) => for_node.children.push(node),
            Frame::If(frame) => frame.current_children().push(node),
            Frame::Select(_) => {
                self.pop_implicit();
                self.append(node);
            }
        }
    }

    /// Pop the top implicit frame and attach it to its parent.
    fn pop_implicit(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        match frame {
            Frame::Select(select) => self.append(SqlNode::SelectStatement(Box::new(select))),
            Frame::Clause(clause) => {
                if let Some(Frame::Select(select)) = self.stack.last_mut()
                    && let Some(slot) = select.slot_mut(clause.kind)
                {
                    *slot = Some(clause);
                } else {
                    self.append(SqlNode::Clause(clause));
                }
            }
            Frame::Logical(op) => self.append(SqlNode::LogicalOperator(op)),
            Frame::Populate(populate) => self.append(SqlNode::Populate(populate)),
            other => self.stack.push(other)
        }
    }

    fn close_implicit_frames(&mut self) {
        while self.stack.last().is_some_and(Frame::is_implicit) {
            self.pop_implicit();
        }
    }

    fn anchor(&self) -> Anchor {
        for (index, frame) in self.stack.iter().enumerate().rev() {
            match frame {
                Frame::Clause(_) | Frame::Logical(_) | Frame::Populate(_) => {}
                Frame::Select(_) => return Anchor::Select(index),
                Frame::Root(_) => return Anchor::Root,
                Frame::Parens {
                    ..
                }
                | Frame::If(_)
                | Frame::For(_) => return Anchor::Blocked
            }
        }
        Anchor::Root
    }

    fn select_accepts(&self, index: usize, kind: ClauseKind) -> bool {
        let Some(Frame::Select(select)) = self.stack.get(index) else {
            return false;
        };
        let free = select.slot(kind).is_some_and(Option::is_none);
        let open_same = self.stack[index + 1..]
            .iter()
            .any(|f| matches!(f, Frame::Clause(c) if c.kind == kind));
        free && !open_same
    }

    fn open_clause(&mut self, kind: ClauseKind, token: Token) {
        match self.anchor() {
            Anchor::Select(index) if self.select_accepts(index, kind) => {
                while self.stack.len() > index + 1 {
                    self.pop_implicit();
                }
                self.stack.push(Frame::Clause(ClauseNode::new(kind, token.text)));
            }
            Anchor::Root => {
                self.close_implicit_frames();
                self.stack.push(Frame::Clause(ClauseNode::new(kind, token.text)));
            }
            Anchor::Select(_) | Anchor::Blocked => self.append(SqlNode::Word(token.text))
        }
    }

    fn close_statement(&mut self) {
        if let Anchor::Select(index) = self.anchor() {
            while self.stack.len() > index {
                self.pop_implicit();
            }
        }
    }

    fn open_logical(&mut self, token: Token) {
        if matches!(self.stack.last(), Some(Frame::Logical(_))) {
            self.pop_implicit();
        }
        match self.stack.last() {
            Some(
                Frame::Clause(_)
                | Frame::Parens {
                    ..
                }
                | Frame::If(_)
                | Frame::For(_)
            ) => self.stack.push(Frame::Logical(LogicalOperatorNode {
                word:     token.text,
                children: Vec::new()
            })),
            _ => self.append(SqlNode::Word(token.text))
        }
    }

    fn close_parens(&mut self, token: &Token) -> Result<()> {
        self.close_implicit_frames();
        match self.stack.last() {
            Some(Frame::Parens {
                ..
            }) => {}
            Some(Frame::If(_) | Frame::For(_)) => {
                return Err(self.error(
                    MessageCode::Esp2135,
                    "parenthesis crosses a directive block",
                    token
                ));
            }
            _ => {
                self.append(SqlNode::Fragment(token.text.clone()));
                return Ok(());
            }
        }
        if let Some(Frame::Parens {
            children,
            owner,
            ..
        }) = self.stack.pop()
        {
            let parens = ParensNode {
                children
            };
            match owner {
                Some(PendingVariable {
                    literal,
                    mut node
                }) => {
                    node.parens = Some(parens);
                    if literal {
                        self.append(SqlNode::LiteralVariable(node));
                    } else {
                        self.append(SqlNode::BindVariable(node));
                    }
                }
                None => self.append(SqlNode::Parens(parens))
            }
        }
        Ok(())
    }

    fn variable(&mut self, token: Token, literal: bool) -> Result<()> {
        let expression = directive_body(&token.text)
            .get(usize::from(literal)..)
            .unwrap_or("")
            .trim()
            .to_string();
        if expression.is_empty() {
            let (code, message) = if literal {
                (MessageCode::Esp2228, "literal variable has no expression")
            } else {
                (MessageCode::Esp2120, "bind variable has no expression")
            };
            return Err(self.error(code, message, &token));
        }
        let location = Location::new(token.line, token.column);
        let next = self.tokens.get(self.pos).map(|t| (t.kind, t.text.clone()));
        let mut node = VariableNode {
            expression,
            text: token.text.clone(),
            location,
            test_value: None,
            parens: None
        };
        match next {
            Some((TokenKind::Word | TokenKind::Quote, text)) => {
                self.pos += 1;
                node.test_value = Some(text);
                if literal {
                    self.append(SqlNode::LiteralVariable(node));
                } else {
                    self.append(SqlNode::BindVariable(node));
                }
                Ok(())
            }
            Some((TokenKind::OpenedParens, _)) => {
                let opener = &self.tokens[self.pos];
                let parens_location = Location::new(opener.line, opener.column);
                self.pos += 1;
                self.stack.push(Frame::Parens {
                    children: Vec::new(),
                    location: parens_location,
                    owner:    Some(PendingVariable {
                        literal,
                        node
                    })
                });
                Ok(())
            }
            _ => Err(self.error(
                MessageCode::Esp2110,
                format!(
                    "{} must be followed by a test literal or an open parenthesis",
                    token.text
                ),
                &token
            ))
        }
    }

    fn embedded(&mut self, token: Token) -> Result<()> {
        let expression = directive_body(&token.text)
            .get(1..)
            .unwrap_or("")
            .trim()
            .to_string();
        if expression.is_empty() {
            return Err(self.error(
                MessageCode::Esp2121,
                "embedded variable has no expression",
                &token
            ));
        }
        let location = Location::new(token.line, token.column);
        self.append(SqlNode::EmbeddedVariable(EmbeddedVariableNode {
            expression,
            text: token.text,
            location
        }));
        Ok(())
    }

    fn expand(&mut self, token: Token) -> Result<()> {
        let followed_by_star = self
            .tokens
            .get(self.pos)
            .is_some_and(|t| t.kind == TokenKind::Other && t.text == "*");
        if !followed_by_star {
            return Err(self.error(
                MessageCode::Esp2143,
                "/*%expand*/ must be followed by *",
                &token
            ));
        }
        self.pos += 1;
        let alias = keyword_argument(&token.text, "expand");
        let location = Location::new(token.line, token.column);
        self.append(SqlNode::Expand(ExpandNode {
            alias,
            text: token.text,
            location
        }));
        Ok(())
    }

    fn condition(&self, token: &Token, keyword: &str) -> Result<ConditionNode> {
        let expression = keyword_argument(&token.text, keyword);
        if expression.is_empty() {
            return Err(self.error(
                MessageCode::Esp2105,
                format!("/*%{keyword}*/ has no condition"),
                token
            ));
        }
        Ok(ConditionNode {
            expression,
            text: token.text.clone(),
            location: Location::new(token.line, token.column),
            children: Vec::new()
        })
    }

    fn open_if(&mut self, token: Token) -> Result<()> {
        let if_node = self.condition(&token, "if")?;
        self.stack.push(Frame::If(IfFrame {
            if_node,
            elseifs: Vec::new(),
            else_node: None
        }));
        Ok(())
    }

    fn elseif(&mut self, token: Token) -> Result<()> {
        self.close_implicit_frames();
        let node = self.condition(&token, "elseif")?;
        self.check_branch(&token, MessageCode::Esp2138, MessageCode::Esp2139)?;
        if let Some(Frame::If(frame)) = self.stack.last_mut() {
            frame.elseifs.push(node);
        }
        Ok(())
    }

    fn else_(&mut self, token: Token) -> Result<()> {
        self.close_implicit_frames();
        self.check_branch(&token, MessageCode::Esp2140, MessageCode::Esp2141)?;
        if let Some(Frame::If(frame)) = self.stack.last_mut() {
            frame.else_node = Some(ElseNode {
                text:     token.text,
                children: Vec::new()
            });
        }
        Ok(())
    }

    /// Validate that a branch directive may open on the current frame.
    fn check_branch(
        &self,
        token: &Token,
        unmatched: MessageCode,
        after_else: MessageCode
    ) -> Result<()> {
        match self.stack.last() {
            Some(Frame::If(frame)) if frame.else_node.is_some() => Err(self.error(
                after_else,
                format!("{} follows /*%else*/", token.text),
                token
            )),
            Some(Frame::If(_)) => Ok(()),
            Some(Frame::Parens {
                ..
            }) => Err(self.error(
                MessageCode::Esp2135,
                "parenthesis crosses a directive block",
                token
            )),
            _ => Err(self.error(
                unmatched,
                format!("{} has no matching /*%if*/", token.text),
                token
            ))
        }
    }

    fn end(&mut self, token: &Token) -> Result<()> {
        self.close_implicit_frames();
        let end = EndNode {
            text: token.text.clone()
        };
        match self.stack.last() {
            Some(Frame::If(_) | Frame::For(_)) => {}
            Some(Frame::Parens {
                ..
            }) => {
                return Err(self.error(
                    MessageCode::Esp2135,
                    "parenthesis crosses a directive block",
                    token
                ));
            }
            _ => {
                return Err(self.error(
                    MessageCode::Esp2134,
                    "/*%end*/ has no open block",
                    token
                ));
            }
        }
        match self.stack.pop() {
            Some(Frame::If(frame)) => self.append(SqlNode::IfBlock(Box::new(IfBlockNode {
                if_node: frame.if_node,
                elseifs: frame.elseifs,
                else_node: frame.else_node,
                end
            }))),
            Some(Frame::For(for_node)) => self.append(SqlNode::ForBlock(Box::new(ForBlockNode {
                for_node,
                end
            }))),
            Some(other) => self.stack.push(other),
            None => {}
        }
        Ok(())
    }

    fn open_for(&mut self, token: Token) -> Result<()> {
        let body = keyword_argument(&token.text, "for");
        let parsed = body.split_once(':').and_then(|(ident, expr)| {
            let ident = ident.trim();
            let expr = expr.trim();
            let valid_ident = ident
                .chars()
                .next()
                .is_some_and(|c| c.is_alphabetic() || c == '_')
                && ident.chars().all(|c| c.is_alphanumeric() || c == '_');
            (valid_ident && !expr.is_empty()).then(|| (ident.to_string(), expr.to_string()))
        });
        let Some((identifier, expression)) = parsed else {
            return Err(self.error(
                MessageCode::Esp2124,
                "/*%for*/ must read /*%for item : expression*/",
                &token
            ));
        };
        let location = Location::new(token.line, token.column);
        self.stack.push(Frame::For(ForNode {
            identifier,
            expression,
            text: token.text,
            location,
            children: Vec::new()
        }));
        Ok(())
    }
}

/// Text between `/*` and `*/`.
fn directive_body(text: &str) -> &str {
    text.get(2..text.len().saturating_sub(2)).unwrap_or("")
}

/// Argument text after a `%keyword` directive.
fn keyword_argument(text: &str, keyword: &str) -> String {
    directive_body(text)
        .get(1 + keyword.len()..)
        .unwrap_or("")
        .trim()
        .to_string()
}
