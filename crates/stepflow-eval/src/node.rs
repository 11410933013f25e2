//! Node types for Stepflow workflows.
//!
//! Workflows are built directly as trees of these nodes; there is no textual
//! syntax. The free functions at the bottom of this module are the intended
//! way to construct well-formed nodes.

use std::fmt;

use crate::value::Value;

/// A node in a workflow tree: either an expression or a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Expr(Expr),
    Stmt(Stmt),
}

/// An ordered sequence of nodes forming one lexical block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Body {
    pub nodes: Vec<Node>,
}

impl Body {
    /// Wrap `nodes` as one block.
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// True if the block has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl FromIterator<Node> for Body {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// An expression: evaluating it produces a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A constant. `None` only arises when a literal is built without a value;
    /// evaluating it fails with `UndefinedLiteral`.
    Literal(Option<Value>),
    /// Look up a name in the environment.
    Identifier(String),
    BinaryOperation {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Conditional with a lexical block per branch. An absent branch is an
    /// empty body.
    If {
        condition: Box<Expr>,
        then_body: Body,
        else_body: Body,
    },
    /// Invoke the API client with an opaque configuration.
    ApiCall(serde_json::Value),
}

/// A statement: executing it produces an effect.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Bind a name in the innermost frame.
    DeclareVar { name: String, value: Expr },
    /// Stop the workflow, optionally producing a value.
    Return(Option<Expr>),
    /// Emit a value to the output sink.
    Print(Expr),
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Mul,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl BinaryOp {
    /// The operator as written, e.g. `"<="`.
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Mul => "*",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl From<Expr> for Node {
    fn from(expr: Expr) -> Self {
        Node::Expr(expr)
    }
}

impl From<Stmt> for Node {
    fn from(stmt: Stmt) -> Self {
        Node::Stmt(stmt)
    }
}

/// Build a body from a list of nodes.
pub fn body(nodes: Vec<Node>) -> Body {
    Body::new(nodes)
}

/// A literal that evaluates to `value`.
pub fn literal(value: impl Into<Value>) -> Expr {
    Expr::Literal(Some(value.into()))
}

/// Look up `name` in the environment.
pub fn identifier(name: impl Into<String>) -> Expr {
    Expr::Identifier(name.into())
}

/// Apply `op` to the values of `left` and `right`, evaluated left first.
pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::BinaryOperation {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

/// Evaluate `then_body` if `condition` is truthy, otherwise `else_body`.
pub fn if_expr(condition: Expr, then_body: Body, else_body: Body) -> Expr {
    Expr::If {
        condition: Box::new(condition),
        then_body,
        else_body,
    }
}

/// Call the API client with `config` and produce its response.
pub fn api_call(config: serde_json::Value) -> Expr {
    Expr::ApiCall(config)
}

/// Bind `name` to the value of `value` in the current frame.
pub fn declare_var(name: impl Into<String>, value: Expr) -> Node {
    Node::Stmt(Stmt::DeclareVar {
        name: name.into(),
        value,
    })
}

/// Stop the workflow with the value of `value`.
pub fn ret(value: Expr) -> Node {
    Node::Stmt(Stmt::Return(Some(value)))
}

/// Stop the workflow without a value.
pub fn ret_none() -> Node {
    Node::Stmt(Stmt::Return(None))
}

/// Emit the value of `value` to the output sink.
pub fn print(value: Expr) -> Node {
    Node::Stmt(Stmt::Print(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_keeps_falsy_values() {
        assert_eq!(literal(false), Expr::Literal(Some(Value::Boolean(false))));
        assert_eq!(literal(0), Expr::Literal(Some(Value::Number(0.0))));
        assert_eq!(literal(""), Expr::Literal(Some(Value::String(String::new()))));
    }

    #[test]
    fn test_constructors_are_structural() {
        let a = binary(BinaryOp::Lt, literal(1), identifier("x"));
        let b = binary(BinaryOp::Lt, literal(1), identifier("x"));
        assert_eq!(a, b);
        assert_ne!(a, binary(BinaryOp::Le, literal(1), identifier("x")));
    }

    #[test]
    fn test_operator_display() {
        assert_eq!(BinaryOp::Le.to_string(), "<=");
        assert_eq!(
            binary(BinaryOp::Ne, literal(1), literal(2)),
            Expr::BinaryOperation {
                op: BinaryOp::Ne,
                left: Box::new(literal(1)),
                right: Box::new(literal(2)),
            }
        );
    }

    #[test]
    fn test_body_from_nodes() {
        let b: Body = vec![Node::from(literal(1)), ret_none()].into_iter().collect();
        assert_eq!(b.nodes.len(), 2);
        assert!(body(vec![]).is_empty());
    }
}
