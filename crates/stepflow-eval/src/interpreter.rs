//! The Stepflow interpreter.
//!
//! Evaluation is a depth-first walk over a [`Body`]. Early return is not an
//! error: it travels up the walk as [`Completion::EarlyReturn`] and is
//! absorbed at the top of [`Interpreter::run`]. Failures travel on the
//! `Result` channel. Each run owns its own [`CallStack`], so one interpreter
//! can serve concurrent runs.

use std::fmt;
use std::future::Future;
use std::ops::ControlFlow;
use std::pin::Pin;
use std::sync::Arc;

use crate::effects::{ApiClient, OutputSink, StdoutSink, UnconfiguredApiClient};
use crate::env::CallStack;
use crate::error::WorkflowError;
use crate::node::{Body, Expr, Node, Stmt};
use crate::operators::evaluate_binary;
use crate::value::{Bindings, Value};

/// Value of a block that contains no expressions.
pub const EMPTY_BLOCK_VALUE: Value = Value::Boolean(true);

/// How a node finished when it did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Evaluation produced a value; keep going.
    Value(Value),
    /// A `Return` ran; unwind to the top of the run.
    EarlyReturn(Option<Value>),
}

type EvalFuture<'a> = Pin<Box<dyn Future<Output = crate::Result<Completion>> + Send + 'a>>;

/// Unwraps a `Completion::Value`, or returns an early return to the caller.
macro_rules! value_or_return {
    ($completion:expr) => {
        match $completion {
            Completion::Value(value) => value,
            early @ Completion::EarlyReturn(_) => return Ok(early),
        }
    };
}

/// The Stepflow interpreter.
///
/// Holds the collaborators shared by every run. Runs never share state.
pub struct Interpreter {
    api_client: Arc<dyn ApiClient>,
    output: Arc<dyn OutputSink>,
}

impl Interpreter {
    /// Create an interpreter that prints to stdout and has no API client.
    pub fn new() -> Self {
        Self {
            api_client: Arc::new(UnconfiguredApiClient),
            output: Arc::new(StdoutSink),
        }
    }

    /// Serve API-call expressions with `client`.
    pub fn with_api_client(mut self, client: impl ApiClient + 'static) -> Self {
        self.api_client = Arc::new(client);
        self
    }

    /// Send `Print` output to `sink`.
    pub fn with_output(mut self, sink: impl OutputSink + 'static) -> Self {
        self.output = Arc::new(sink);
        self
    }

    /// Run a workflow with `arguments` bound in its root frame.
    ///
    /// Returns the value of an explicit `Return` (`None` for a bare one), or
    /// else the value of the last expression in `body`.
    pub async fn run(&self, body: &Body, arguments: Bindings) -> crate::Result<Option<Value>> {
        Evaluation::new(self).run(body, arguments).await
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpreter")
            .field("api_client", &self.api_client.name())
            .finish_non_exhaustive()
    }
}

/// State for a single run: the interpreter's collaborators plus a call stack
/// that lives only as long as the run.
pub struct Evaluation<'i> {
    interpreter: &'i Interpreter,
    stack: CallStack,
}

impl<'i> Evaluation<'i> {
    /// Create an evaluation that calls out through `interpreter`'s collaborators.
    pub fn new(interpreter: &'i Interpreter) -> Self {
        Self {
            interpreter,
            stack: CallStack::new(),
        }
    }

    /// The call stack, for inspecting frame balance after a run.
    pub fn stack(&self) -> &CallStack {
        &self.stack
    }

    /// Evaluate `body` from a fresh call stack.
    pub async fn run(&mut self, body: &Body, arguments: Bindings) -> crate::Result<Option<Value>> {
        self.stack = CallStack::new();
        tracing::debug!(nodes = body.nodes.len(), arguments = arguments.len(), "run workflow");

        let result = match self.eval_body(body, arguments).await? {
            Completion::Value(value) => Some(value),
            Completion::EarlyReturn(value) => {
                tracing::debug!(returned = value.is_some(), "workflow returned early");
                value
            }
        };
        tracing::debug!(frames = self.stack.pushes(), "workflow finished");
        Ok(result)
    }

    /// Evaluate `body` in a new frame seeded with `bindings`.
    ///
    /// The frame is popped however the block exits.
    fn eval_body<'a>(&'a mut self, body: &'a Body, bindings: Bindings) -> EvalFuture<'a> {
        Box::pin(async move {
            self.stack.push_frame(bindings);
            let result = self.eval_nodes(body).await;
            self.stack.pop_frame();
            result
        })
    }

    async fn eval_nodes(&mut self, body: &Body) -> crate::Result<Completion> {
        let mut last = EMPTY_BLOCK_VALUE;
        for node in &body.nodes {
            match node {
                Node::Expr(expr) => last = value_or_return!(self.eval_expr(expr).await?),
                Node::Stmt(stmt) => {
                    if let ControlFlow::Break(value) = self.exec_stmt(stmt).await? {
                        return Ok(Completion::EarlyReturn(value));
                    }
                }
            }
        }
        Ok(Completion::Value(last))
    }

    fn eval_expr<'a>(&'a mut self, expr: &'a Expr) -> EvalFuture<'a> {
        Box::pin(async move {
            let value = match expr {
                Expr::Literal(value) => value.clone().ok_or_else(WorkflowError::undefined_literal)?,
                Expr::Identifier(name) => self.stack.lookup(name)?.clone(),
                Expr::BinaryOperation { op, left, right } => {
                    let left = value_or_return!(self.eval_expr(left).await?);
                    let right = value_or_return!(self.eval_expr(right).await?);
                    evaluate_binary(*op, left, right)?
                }
                Expr::If {
                    condition,
                    then_body,
                    else_body,
                } => {
                    let condition = value_or_return!(self.eval_expr(condition).await?);
                    let branch = if condition.to_bool() { then_body } else { else_body };
                    return self.eval_body(branch, Bindings::new()).await;
                }
                Expr::ApiCall(config) => self.call_api(config).await?,
            };
            Ok(Completion::Value(value))
        })
    }

    async fn call_api(&self, config: &serde_json::Value) -> crate::Result<Value> {
        let client = &self.interpreter.api_client;
        tracing::debug!(client = client.name(), "API call");
        client.call(config).await.map_err(|cause| {
            tracing::warn!(client = client.name(), error = %cause, "API call failed");
            WorkflowError::api_call_failed(cause)
        })
    }

    /// Execute a statement. `Break` carries the value of a `Return`.
    async fn exec_stmt(&mut self, stmt: &Stmt) -> crate::Result<ControlFlow<Option<Value>>> {
        match stmt {
            Stmt::DeclareVar { name, value } => {
                let value = match self.eval_expr(value).await? {
                    Completion::Value(value) => value,
                    Completion::EarlyReturn(value) => return Ok(ControlFlow::Break(value)),
                };
                self.stack.declare(name, value)?;
            }
            Stmt::Return(value) => {
                let value = match value {
                    Some(expr) => match self.eval_expr(expr).await? {
                        Completion::Value(value) => Some(value),
                        Completion::EarlyReturn(value) => value,
                    },
                    None => None,
                };
                return Ok(ControlFlow::Break(value));
            }
            Stmt::Print(expr) => match self.eval_expr(expr).await? {
                Completion::Value(value) => self.interpreter.output.emit(&value),
                Completion::EarlyReturn(value) => return Ok(ControlFlow::Break(value)),
            },
        }
        Ok(ControlFlow::Continue(()))
    }
}
