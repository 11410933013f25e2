//! Stepflow workflow evaluator.
//!
//! Workflows are trees of [`Node`]s built in code (see the constructor
//! functions in [`node`]) and executed by an [`Interpreter`] against a set of
//! input arguments. API-call expressions and `Print` statements reach the
//! outside world only through the [`ApiClient`] and [`OutputSink`]
//! capabilities the interpreter is built with.

mod value;
mod interpreter;
mod env;
mod operators;
mod effects;
mod error;
pub mod node;

pub use value::{Bindings, Value};
pub use interpreter::{Completion, Evaluation, Interpreter, EMPTY_BLOCK_VALUE};
pub use env::CallStack;
pub use operators::evaluate_binary;
pub use effects::{
    ApiClient, BufferSink, OutputSink, SilentSink, StdoutSink, TracingSink, UnconfiguredApiClient,
};
pub use error::{ApiCallError, ErrorKind, WorkflowError};
pub use node::{BinaryOp, Body, Expr, Node, Stmt};

/// Re-exported for implementing [`ApiClient`].
pub use async_trait::async_trait;

/// Result type for evaluator operations.
pub type Result<T> = std::result::Result<T, WorkflowError>;
