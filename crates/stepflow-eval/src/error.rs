//! Error types for the Stepflow evaluator.

use std::fmt;

use thiserror::Error;

/// A failure raised by an [`ApiClient`](crate::ApiClient), preserved as the
/// source of an [`ErrorKind::ApiCallFailed`] error.
pub type ApiCallError = Box<dyn std::error::Error + Send + Sync>;

/// The kinds of failure an evaluation can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An identifier was not bound in any active frame.
    UnboundIdentifier,
    /// A literal node carried no value.
    UndefinedLiteral,
    /// A declaration collided with a binding in the same frame.
    NameAlreadyBound,
    /// The API client failed while serving an API-call expression.
    ApiCallFailed,
    /// A binary operator was applied to operands it does not accept.
    InvalidOperands,
    /// A declaration was made with no frame open.
    NoActiveFrame,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::UnboundIdentifier => "unbound identifier",
            ErrorKind::UndefinedLiteral => "undefined literal",
            ErrorKind::NameAlreadyBound => "name already bound",
            ErrorKind::ApiCallFailed => "API call failed",
            ErrorKind::InvalidOperands => "invalid operands",
            ErrorKind::NoActiveFrame => "no active frame",
        };
        f.write_str(name)
    }
}

/// An error that aborts a workflow run.
///
/// Every error propagates unchanged out of [`Interpreter::run`](crate::Interpreter::run);
/// there is no local recovery.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct WorkflowError {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<ApiCallError>,
}

impl WorkflowError {
    /// Create an error of `kind` with no underlying cause.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// No active frame binds `name`.
    pub fn unbound_identifier(name: &str) -> Self {
        Self::new(
            ErrorKind::UnboundIdentifier,
            format!("Attempted to evaluate unbound identifier: {}!", name),
        )
    }

    /// A literal node was evaluated without a value.
    pub fn undefined_literal() -> Self {
        Self::new(
            ErrorKind::UndefinedLiteral,
            "Attempted to evaluate undefined literal!",
        )
    }

    /// The innermost frame already binds `name`.
    pub fn name_already_bound(name: &str) -> Self {
        Self::new(
            ErrorKind::NameAlreadyBound,
            format!("{} is already bound in environment!", name),
        )
    }

    /// Wrap a failure reported by the API client.
    pub fn api_call_failed(cause: ApiCallError) -> Self {
        Self {
            kind: ErrorKind::ApiCallFailed,
            message: "Error while executing API call.".to_string(),
            source: Some(cause),
        }
    }

    /// `op` does not accept operands of kinds `left` and `right`.
    pub fn invalid_operands(op: impl fmt::Display, left: &str, right: &str) -> Self {
        Self::new(
            ErrorKind::InvalidOperands,
            format!("Cannot apply `{}` to {} and {}!", op, left, right),
        )
    }

    /// `name` was declared while no frame was open.
    pub fn no_active_frame(name: &str) -> Self {
        Self::new(
            ErrorKind::NoActiveFrame,
            format!("Cannot declare {} outside of any scope!", name),
        )
    }

    /// The failure category.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The human-readable description.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The failure reported by the API client, for `ApiCallFailed` errors.
    pub fn raw_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.source.as_deref()
    }
}
