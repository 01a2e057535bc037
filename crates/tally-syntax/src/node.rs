use std::fmt;

use crate::{
    error::InvalidTree,
    token::{Token, TokenKind},
};

/// Grammar rule an interior node was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    Program,
    Statement,
    Expression,
    Term,
    Factor,
    Power,
    Negation,
    Number,
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Either a leaf wrapping a token or an interior node.
#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxElement {
    Token(Token),
    Node(SyntaxNode),
}

impl SyntaxElement {
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            SyntaxElement::Token(tok) => Some(tok),
            SyntaxElement::Node(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<&SyntaxNode> {
        match self {
            SyntaxElement::Node(node) => Some(node),
            SyntaxElement::Token(_) => None,
        }
    }

    /// Line of the first token under this element, if there is one.
    pub fn line(&self) -> Option<u32> {
        match self {
            SyntaxElement::Token(tok) => Some(tok.line()),
            SyntaxElement::Node(node) => node.line(),
        }
    }
}

impl From<Token> for SyntaxElement {
    fn from(tok: Token) -> Self {
        SyntaxElement::Token(tok)
    }
}

impl From<SyntaxNode> for SyntaxElement {
    fn from(node: SyntaxNode) -> Self {
        SyntaxElement::Node(node)
    }
}

/// An interior node: a grammar kind owning its ordered children.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    kind: SyntaxKind,
    children: Vec<SyntaxElement>,
    height: u32,
}

impl SyntaxNode {
    pub fn new(kind: SyntaxKind, children: Vec<SyntaxElement>) -> Self {
        let height = children
            .iter()
            .filter_map(SyntaxElement::as_node)
            .map(|node| node.height)
            .max()
            .unwrap_or(0)
            .saturating_add(1);
        SyntaxNode {
            kind,
            children,
            height,
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    pub fn children(&self) -> &[SyntaxElement] {
        &self.children
    }

    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.children.iter().filter_map(SyntaxElement::as_token)
    }

    pub fn child_nodes(&self) -> impl Iterator<Item = &SyntaxNode> {
        self.children.iter().filter_map(SyntaxElement::as_node)
    }

    pub fn line(&self) -> Option<u32> {
        self.children.iter().find_map(SyntaxElement::line)
    }

    /// Nodes on the longest path from here down to a leaf, this one included.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Checks this node and everything below it against the shapes the
    /// parser produces.
    pub fn validate(&self) -> Result<(), InvalidTree> {
        self.check_shape()?;
        self.child_nodes().try_for_each(SyntaxNode::validate)
    }

    fn check_shape(&self) -> Result<(), InvalidTree> {
        use SyntaxElement::{Node, Token as Leaf};

        let ok = match (self.kind, self.children.as_slice()) {
            (SyntaxKind::Program, children) => children
                .iter()
                .all(|child| matches!(child, Node(n) if n.kind == SyntaxKind::Statement)),
            (SyntaxKind::Statement, [expr, Leaf(eol)]) => {
                is_operand(expr) && eol.kind() == TokenKind::EndOfLine
            }
            (SyntaxKind::Expression, [lhs, Leaf(op), rhs]) => {
                matches!(op.kind(), TokenKind::Plus | TokenKind::Minus)
                    && is_operand(lhs)
                    && is_operand(rhs)
            }
            (SyntaxKind::Term, [lhs, Leaf(op), rhs]) => {
                matches!(op.kind(), TokenKind::Times | TokenKind::Divide)
                    && is_operand(lhs)
                    && is_operand(rhs)
            }
            (SyntaxKind::Factor, [lhs, Leaf(op), rhs]) => {
                op.kind() == TokenKind::Caret && is_operand(lhs) && is_operand(rhs)
            }
            (SyntaxKind::Power, [Leaf(open), inner, Leaf(close)]) => {
                open.kind() == TokenKind::LParen
                    && close.kind() == TokenKind::RParen
                    && is_operand(inner)
            }
            (SyntaxKind::Negation, [inner]) => is_operand(inner),
            (SyntaxKind::Number, [Leaf(lit)]) => lit.kind().is_literal(),
            _ => false,
        };

        if ok {
            Ok(())
        } else {
            Err(InvalidTree {
                kind: self.kind,
                reason: format!("unexpected children {}", self.shape()),
            })
        }
    }

    fn shape(&self) -> String {
        let parts: Vec<String> = self
            .children
            .iter()
            .map(|child| match child {
                SyntaxElement::Token(tok) => format!("{:?}", tok.kind()),
                SyntaxElement::Node(node) => node.kind.to_string(),
            })
            .collect();
        format!("[{}]", parts.join(", "))
    }

    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(f, "{:indent$}{}", "", self.kind, indent = depth * 2)?;
        for child in &self.children {
            match child {
                SyntaxElement::Node(node) => node.write_tree(f, depth + 1)?,
                SyntaxElement::Token(tok) => {
                    writeln!(f, "{:indent$}{tok}", "", indent = (depth + 1) * 2)?
                }
            }
        }
        Ok(())
    }
}

fn is_operand(element: &SyntaxElement) -> bool {
    matches!(
        element,
        SyntaxElement::Node(node) if !matches!(node.kind, SyntaxKind::Program | SyntaxKind::Statement)
    )
}

/// Indented outline, one node or token per line.
impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}
