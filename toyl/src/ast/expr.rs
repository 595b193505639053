//! Expression AST nodes

use bigdecimal::BigDecimal;
use std::cell::Cell;
use std::fmt;

/// Expression or statement node. Every node owns its children; variable
/// nodes refer to the store by slot index only.
#[derive(Debug, Clone)]
pub enum Node {
    /// Integer literal that fits the fast representation
    LiteralFast(i64),
    /// Decimal literal, kept at full source precision
    LiteralPrecise(BigDecimal),

    /// Variable reference
    VariableRead { slot: usize },

    /// Assignment: evaluates to the assigned value
    Assignment { slot: usize, expr: Box<Node> },

    /// Unary minus, carried as `0 - expr`
    Negate(BinaryNode),

    /// Binary arithmetic
    Binary(BinaryNode),
}

impl Node {
    pub fn read(slot: usize) -> Self {
        Node::VariableRead { slot }
    }

    pub fn assign(slot: usize, expr: Node) -> Self {
        Node::Assignment {
            slot,
            expr: Box::new(expr),
        }
    }

    pub fn binary(op: BinOp, left: Node, right: Node) -> Self {
        Node::Binary(BinaryNode::new(op, left, right))
    }

    pub fn negate(expr: Node) -> Self {
        Node::Negate(BinaryNode::new(BinOp::Sub, Node::LiteralFast(0), expr))
    }
}

/// Binary arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A binary operation site.
///
/// Besides its operands it carries one bit of private state: whether this
/// site has given up on fast arithmetic. The bit starts clear, is set the
/// first time a fast computation here fails, and is never cleared again.
/// It is a plain `Cell`, so a tree is `!Sync` and can only be evaluated by
/// one thread at a time.
#[derive(Debug, Clone)]
pub struct BinaryNode {
    pub op: BinOp,
    pub left: Box<Node>,
    pub right: Box<Node>,
    settled_on_precise: Cell<bool>,
}

impl BinaryNode {
    pub fn new(op: BinOp, left: Node, right: Node) -> Self {
        BinaryNode {
            op,
            left: Box::new(left),
            right: Box::new(right),
            settled_on_precise: Cell::new(false),
        }
    }

    pub(crate) fn is_settled(&self) -> bool {
        self.settled_on_precise.get()
    }

    pub(crate) fn settle(&self) {
        self.settled_on_precise.set(true);
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::LiteralFast(n) => write!(f, "{n}"),
            Node::LiteralPrecise(d) => write!(f, "{}", d.to_plain_string()),
            Node::VariableRead { slot } => write!(f, "${slot}"),
            Node::Assignment { slot, expr } => write!(f, "${slot} = {expr}"),
            Node::Negate(node) => write!(f, "-{}", node.right),
            Node::Binary(node) => write!(f, "({} {} {})", node.left, node.op, node.right),
        }
    }
}
