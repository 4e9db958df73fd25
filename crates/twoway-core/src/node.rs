// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! SQL node tree.
//!
//! The parser produces a closed [`SqlNode`] enum; the builder and the paging
//! transformers walk it with exhaustive `match`. Conditional and loop blocks
//! are single variants that own their terminating [`EndNode`], so an
//! unpaired `/*%if*/` or `/*%for*/` cannot be represented.
//!
//! # Shape
//!
//! ```text
//! Anonymous
//! ├── SelectStatement
//! │   ├── select:   Clause(Select)
//! │   ├── from:     Clause(From)
//! │   ├── where:    Clause(Where)
//! │   │             └── LogicalOperator(and) ...
//! │   ├── group_by / having / order_by
//! │   └── for_update / option
//! ├── IfBlock { if, elseif*, else?, end }
//! ├── ForBlock { for, end }
//! └── Word | Fragment | Whitespace | Comment | Parens | variables
//! ```

use std::fmt;

/// 1-based position of a directive in the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    pub line:   usize,
    pub column: usize
}

impl Location {
    /// Position at `line`/`column`.
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self {
            line,
            column
        }
    }
}

/// Kind of a clause node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    Select,
    From,
    Where,
    GroupBy,
    Having,
    OrderBy,
    ForUpdate,
    Option,
    Update,
    Set
}

impl ClauseKind {
    /// Whether the clause keyword is dropped when its content renders empty.
    #[must_use]
    pub const fn is_removable(&self) -> bool {
        matches!(
            self,
            Self::Where | Self::GroupBy | Self::Having | Self::OrderBy
        )
    }
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Select => "select",
            Self::From => "from",
            Self::Where => "where",
            Self::GroupBy => "group by",
            Self::Having => "having",
            Self::OrderBy => "order by",
            Self::ForUpdate => "for update",
            Self::Option => "option",
            Self::Update => "update",
            Self::Set => "set"
        })
    }
}

/// Node of a parsed template.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlNode {
    /// Sequence container; the parser's root.
    Anonymous(Vec<SqlNode>),
    /// SELECT statement with addressable clauses.
    SelectStatement(Box<SelectStatementNode>),
    /// Clause keyword and its content.
    Clause(ClauseNode),
    /// `/*%if*/ ... /*%end*/`.
    IfBlock(Box<IfBlockNode>),
    /// `/*%for*/ ... /*%end*/`.
    ForBlock(Box<ForBlockNode>),
    /// `/*name*/test`.
    BindVariable(VariableNode),
    /// `/*$name*/test`.
    LiteralVariable(VariableNode),
    /// `/*#name*/`.
    EmbeddedVariable(EmbeddedVariableNode),
    /// `/*%expand*/*`.
    Expand(ExpandNode),
    /// `/*%populate*/`.
    Populate(PopulateNode),
    /// Identifier or keyword fragment.
    Word(String),
    /// Raw text: quoted literals, punctuation, generated fragments.
    Fragment(String),
    /// Spaces, tabs and line breaks.
    Whitespace(String),
    /// Plain line or block comment.
    Comment(String),
    /// Parenthesized group.
    Parens(ParensNode),
    /// AND / OR and the operand that follows it.
    LogicalOperator(LogicalOperatorNode)
}

impl SqlNode {
    /// Empty root container.
    #[must_use]
    pub const fn root() -> Self {
        Self::Anonymous(Vec::new())
    }

    /// Children of container variants.
    #[must_use]
    pub fn children(&self) -> &[SqlNode] {
        match self {
            Self::Anonymous(children) => children,
            Self::Clause(clause) => &clause.children,
            Self::Parens(parens) => &parens.children,
            Self::LogicalOperator(op) => &op.children,
            Self::Populate(populate) => &populate.children,
            _ => &[]
        }
    }
}

/// SELECT statement with one slot per clause.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectStatementNode {
    pub select:      Option<ClauseNode>,
    pub from:        Option<ClauseNode>,
    pub where_:      Option<ClauseNode>,
    pub group_by:    Option<ClauseNode>,
    pub having:      Option<ClauseNode>,
    pub order_by:    Option<ClauseNode>,
    pub for_update:  Option<ClauseNode>,
    pub option:      Option<ClauseNode>,
    /// Set on statements produced by a paging or count transformer.
    pub transformed: bool
}

impl SelectStatementNode {
    /// Mutable slot for a clause kind.
    ///
    /// Returns `None` for kinds that never belong to a SELECT.
    pub fn slot_mut(&mut self, kind: ClauseKind) -> Option<&mut Option<ClauseNode>> {
        match kind {
            ClauseKind::Select => Some(&mut self.select),
            ClauseKind::From => Some(&mut self.from),
            ClauseKind::Where => Some(&mut self.where_),
            ClauseKind::GroupBy => Some(&mut self.group_by),
            ClauseKind::Having => Some(&mut self.having),
            ClauseKind::OrderBy => Some(&mut self.order_by),
            ClauseKind::ForUpdate => Some(&mut self.for_update),
            ClauseKind::Option => Some(&mut self.option),
            ClauseKind::Update | ClauseKind::Set => None
        }
    }

    /// Slot for a clause kind.
    #[must_use]
    pub const fn slot(&self, kind: ClauseKind) -> Option<&Option<ClauseNode>> {
        match kind {
            ClauseKind::Select => Some(&self.select),
            ClauseKind::From => Some(&self.from),
            ClauseKind::Where => Some(&self.where_),
            ClauseKind::GroupBy => Some(&self.group_by),
            ClauseKind::Having => Some(&self.having),
            ClauseKind::OrderBy => Some(&self.order_by),
            ClauseKind::ForUpdate => Some(&self.for_update),
            ClauseKind::Option => Some(&self.option),
            ClauseKind::Update | ClauseKind::Set => None
        }
    }

    /// Clauses in rendering order.
    pub fn clauses(&self) -> impl Iterator<Item = &ClauseNode> {
        [
            &self.select,
            &self.from,
            &self.where_,
            &self.group_by,
            &self.having,
            &self.order_by,
            &self.for_update,
            &self.option
        ]
        .into_iter()
        .flatten()
    }
}

/// Clause keyword with the nodes that follow it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClauseNode {
    pub kind:     ClauseKind,
    /// Keyword text as written, e.g. `"ORDER  BY"`. Empty for synthesized
    /// clauses that carry only generated fragments.
    pub word:     String,
    pub children: Vec<SqlNode>
}

impl ClauseNode {
    /// Clause with no children.
    #[must_use]
    pub fn new(kind: ClauseKind, word: impl Into<String>) -> Self {
        Self {
            kind,
            word: word.into(),
            children: Vec::new()
        }
    }

    /// Append a child node.
    pub fn push(&mut self, node: SqlNode) {
        self.children.push(node);
    }
}

/// Conditional block.
#[derive(Debug, Clone, PartialEq)]
pub struct IfBlockNode {
    pub if_node:   ConditionNode,
    pub elseifs:   Vec<ConditionNode>,
    pub else_node: Option<ElseNode>,
    pub end:       EndNode
}

/// `/*%if*/` or `/*%elseif*/` branch.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionNode {
    pub expression: String,
    pub text:       String,
    pub location:   Location,
    pub children:   Vec<SqlNode>
}

/// `/*%else*/` branch.
#[derive(Debug, Clone, PartialEq)]
pub struct ElseNode {
    pub text:     String,
    pub children: Vec<SqlNode>
}

/// `/*%end*/` terminator.
#[derive(Debug, Clone, PartialEq)]
pub struct EndNode {
    pub text: String
}

/// Loop block.
#[derive(Debug, Clone, PartialEq)]
pub struct ForBlockNode {
    pub for_node: ForNode,
    pub end:      EndNode
}

/// `/*%for item : expression*/` header and body.
#[derive(Debug, Clone, PartialEq)]
pub struct ForNode {
    pub identifier: String,
    pub expression: String,
    pub text:       String,
    pub location:   Location,
    pub children:   Vec<SqlNode>
}

/// Bind or literal variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableNode {
    pub expression: String,
    pub text:       String,
    pub location:   Location,
    /// Test literal that followed the directive, dropped when rendering.
    pub test_value: Option<String>,
    /// Parenthesized test list, rendered as an IN-list expansion.
    pub parens:     Option<ParensNode>
}

/// Embedded variable.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedVariableNode {
    pub expression: String,
    pub text:       String,
    pub location:   Location
}

/// Column expansion replacing a `*`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandNode {
    /// Optional alias expression qualifying the columns.
    pub alias:    String,
    pub text:     String,
    pub location: Location
}

/// `col = value` assignment list; `children` hold the replaced test text.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulateNode {
    pub text:     String,
    pub location: Location,
    pub children: Vec<SqlNode>
}

/// Parenthesized group.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParensNode {
    pub children: Vec<SqlNode>
}

impl ParensNode {
    /// Whether the group held only whitespace or comments as written.
    #[must_use]
    pub fn is_empty_as_written(&self) -> bool {
        self.children
            .iter()
            .all(|c| matches!(c, SqlNode::Whitespace(_) | SqlNode::Comment(_)))
    }
}

/// AND / OR keyword and the nodes up to the next boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalOperatorNode {
    pub word:     String,
    pub children: Vec<SqlNode>
}
