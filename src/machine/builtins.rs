//! The built-in operators and primitives of frame 0.
//!
//! Arithmetic is checked: overflow and division by zero surface as runtime
//! errors, never as wraparound. Comparisons are defined over integers and
//! strings, equality additionally over truth values. `or` and `&` are
//! strict; by the time an operator tag is processed both operands are
//! already on the stack, so only the conditional arrow short-circuits.

use phf::phf_map;

use crate::ast::{BinOp, UnOp};

use super::env::EnvRef;
use super::value::{Builtin, Value};
use super::{RuntimeError, RuntimeErrorKind};

/// Named primitives bound in the primitive environment.
pub(super) static BUILTINS: phf::Map<&'static str, Builtin> = phf_map! {
    "Print" => Builtin::Print,
    "Conc" => Builtin::Conc,
    "Stem" => Builtin::Stem,
    "Stern" => Builtin::Stern,
    "Order" => Builtin::Order,
    "Null" => Builtin::Null,
    "Isinteger" => Builtin::Isinteger,
    "Isstring" => Builtin::Isstring,
    "Istruthvalue" => Builtin::Istruthvalue,
    "Isfunction" => Builtin::Isfunction,
    "Istuple" => Builtin::Istuple,
    "Isdummy" => Builtin::Isdummy,
    "ItoS" => Builtin::ItoS,
};

fn fail(env: EnvRef, kind: RuntimeErrorKind, message: String) -> RuntimeError {
    RuntimeError {
        kind,
        message,
        environment: env.0,
        stack_top: None,
    }
}

fn type_error(env: EnvRef, message: String) -> RuntimeError {
    fail(env, RuntimeErrorKind::TypeMismatch, message)
}

/// Apply a named primitive to its argument.
pub(super) fn apply(
    builtin: Builtin,
    rand: Value,
    env: EnvRef,
    output: &mut String,
) -> Result<Value, RuntimeError> {
    match builtin {
        Builtin::Print => {
            output.push_str(&rand.render());
            Ok(Value::Dummy)
        }
        // Conc is curried: the first application captures the left string,
        // the second produces the concatenation.
        Builtin::Conc => match rand {
            Value::Str(first) => Ok(Value::Builtin(Builtin::ConcWith(first))),
            other => Err(expects(env, "Conc", "a string", &other)),
        },
        Builtin::ConcWith(first) => match rand {
            Value::Str(second) => Ok(Value::Str(first + &second)),
            other => Err(expects(env, "Conc", "a string", &other)),
        },
        Builtin::Stem => match rand {
            Value::Str(s) => Ok(Value::Str(
                s.chars().next().map(String::from).unwrap_or_default(),
            )),
            other => Err(expects(env, "Stem", "a string", &other)),
        },
        Builtin::Stern => match rand {
            Value::Str(s) => Ok(Value::Str(s.chars().skip(1).collect())),
            other => Err(expects(env, "Stern", "a string", &other)),
        },
        Builtin::Order => match rand {
            Value::Tuple(elements) => Ok(Value::Integer(elements.len() as i64)),
            other => Err(expects(env, "Order", "a tuple", &other)),
        },
        Builtin::Null => match rand {
            Value::Tuple(elements) => Ok(Value::Truth(elements.is_empty())),
            other => Err(expects(env, "Null", "a tuple", &other)),
        },
        Builtin::Isinteger => Ok(Value::Truth(matches!(rand, Value::Integer(_)))),
        Builtin::Isstring => Ok(Value::Truth(matches!(rand, Value::Str(_)))),
        Builtin::Istruthvalue => Ok(Value::Truth(matches!(rand, Value::Truth(_)))),
        Builtin::Isfunction => Ok(Value::Truth(rand.is_function())),
        Builtin::Istuple => Ok(Value::Truth(matches!(rand, Value::Tuple(_)))),
        Builtin::Isdummy => Ok(Value::Truth(matches!(rand, Value::Dummy))),
        Builtin::ItoS => match rand {
            Value::Integer(value) => Ok(Value::Str(value.to_string())),
            other => Err(expects(env, "ItoS", "an integer", &other)),
        },
    }
}

fn expects(env: EnvRef, name: &str, wanted: &str, got: &Value) -> RuntimeError {
    type_error(env, format!("{} expects {}, got {}", name, wanted, got.kind()))
}

/// Apply a binary operator tag.
pub(super) fn binary(
    op: BinOp,
    left: Value,
    right: Value,
    env: EnvRef,
) -> Result<Value, RuntimeError> {
    match op {
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Pow => {
            arithmetic(op, left, right, env)
        }
        BinOp::Gr | BinOp::Ge | BinOp::Ls | BinOp::Le => ordering(op, left, right, env),
        BinOp::Eq | BinOp::Ne => equality(op, left, right, env),
        BinOp::Or | BinOp::Amp => match (left, right) {
            (Value::Truth(a), Value::Truth(b)) => Ok(Value::Truth(match op {
                BinOp::Or => a || b,
                _ => a && b,
            })),
            (left, right) => Err(operand_error(env, op, &left, &right)),
        },
    }
}

fn arithmetic(op: BinOp, left: Value, right: Value, env: EnvRef) -> Result<Value, RuntimeError> {
    let (a, b) = match (&left, &right) {
        (Value::Integer(a), Value::Integer(b)) => (*a, *b),
        _ => return Err(operand_error(env, op, &left, &right)),
    };

    let result = match op {
        BinOp::Add => a.checked_add(b),
        BinOp::Sub => a.checked_sub(b),
        BinOp::Mul => a.checked_mul(b),
        BinOp::Div => {
            if b == 0 {
                return Err(fail(
                    env,
                    RuntimeErrorKind::DivisionByZero,
                    "division by zero".to_string(),
                ));
            }
            a.checked_div(b)
        }
        BinOp::Pow => {
            if b < 0 {
                return Err(type_error(
                    env,
                    format!("'**' needs a non-negative exponent, got {}", b),
                ));
            }
            u32::try_from(b).ok().and_then(|exp| a.checked_pow(exp))
        }
        _ => unreachable!(),
    };

    result.map(Value::Integer).ok_or_else(|| {
        fail(
            env,
            RuntimeErrorKind::ArithmeticOverflow,
            format!("'{}' overflows on {} and {}", op.label(), a, b),
        )
    })
}

fn ordering(op: BinOp, left: Value, right: Value, env: EnvRef) -> Result<Value, RuntimeError> {
    let holds = match (&left, &right) {
        (Value::Integer(a), Value::Integer(b)) => compare(op, a.cmp(b)),
        (Value::Str(a), Value::Str(b)) => compare(op, a.cmp(b)),
        _ => return Err(operand_error(env, op, &left, &right)),
    };
    Ok(Value::Truth(holds))
}

fn compare(op: BinOp, ordering: std::cmp::Ordering) -> bool {
    match op {
        BinOp::Gr => ordering.is_gt(),
        BinOp::Ge => ordering.is_ge(),
        BinOp::Ls => ordering.is_lt(),
        BinOp::Le => ordering.is_le(),
        _ => unreachable!(),
    }
}

fn equality(op: BinOp, left: Value, right: Value, env: EnvRef) -> Result<Value, RuntimeError> {
    let equal = match (&left, &right) {
        (Value::Integer(a), Value::Integer(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Truth(a), Value::Truth(b)) => a == b,
        _ => return Err(operand_error(env, op, &left, &right)),
    };
    Ok(Value::Truth(if op == BinOp::Eq { equal } else { !equal }))
}

/// Apply a unary operator tag.
pub(super) fn unary(op: UnOp, operand: Value, env: EnvRef) -> Result<Value, RuntimeError> {
    match (op, operand) {
        (UnOp::Not, Value::Truth(b)) => Ok(Value::Truth(!b)),
        (UnOp::Neg, Value::Integer(a)) => a.checked_neg().map(Value::Integer).ok_or_else(|| {
            fail(
                env,
                RuntimeErrorKind::ArithmeticOverflow,
                format!("'neg' overflows on {}", a),
            )
        }),
        (op, operand) => Err(type_error(
            env,
            format!("cannot apply '{}' to {}", op.label(), operand.kind()),
        )),
    }
}

/// `aug`: append one element to the right of a tuple.
pub(super) fn aug(left: Value, right: Value, env: EnvRef) -> Result<Value, RuntimeError> {
    match left {
        Value::Tuple(mut elements) => {
            elements.push(right);
            Ok(Value::Tuple(elements))
        }
        other => Err(expects(env, "aug", "a tuple", &other)),
    }
}

fn operand_error(env: EnvRef, op: BinOp, left: &Value, right: &Value) -> RuntimeError {
    type_error(
        env,
        format!(
            "cannot apply '{}' to {} and {}",
            op.label(),
            left.kind(),
            right.kind()
        ),
    )
}
