//! Binary operator semantics.
//!
//! Both operands are fully evaluated before any operator runs, so everything
//! here is pure and synchronous.

use std::cmp::Ordering;

use crate::error::WorkflowError;
use crate::node::BinaryOp;
use crate::value::Value;

/// Apply `op` to two evaluated operands.
pub fn evaluate_binary(op: BinaryOp, left: Value, right: Value) -> crate::Result<Value> {
    match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Mul => match (&left, &right) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a * b)),
            _ => Err(mismatch(op, &left, &right)),
        },
        BinaryOp::Lt => Ok(Value::Boolean(left.total_cmp(&right) == Ordering::Less)),
        BinaryOp::Le => Ok(Value::Boolean(left.total_cmp(&right) != Ordering::Greater)),
        BinaryOp::Gt => Ok(Value::Boolean(left.total_cmp(&right) == Ordering::Greater)),
        BinaryOp::Ge => Ok(Value::Boolean(left.total_cmp(&right) != Ordering::Less)),
        BinaryOp::Eq => Ok(Value::Boolean(left.loose_eq(&right))),
        BinaryOp::Ne => Ok(Value::Boolean(!left.loose_eq(&right))),
    }
}

// Numbers add; a string on either side concatenates string forms.
fn add(left: Value, right: Value) -> crate::Result<Value> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
        (Value::String(mut a), right) => {
            a.push_str(&right.to_string_value());
            Ok(Value::String(a))
        }
        (left, Value::String(b)) => Ok(Value::String(left.to_string_value() + &b)),
        (left, right) => Err(mismatch(BinaryOp::Add, &left, &right)),
    }
}

fn mismatch(op: BinaryOp, left: &Value, right: &Value) -> WorkflowError {
    WorkflowError::invalid_operands(op, left.kind_name(), right.kind_name())
}
