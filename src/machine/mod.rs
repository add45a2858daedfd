//! The CSE machine: a Control-Stack-Environment evaluator over the
//! flattened control structures.
//!
//! Control is consumed from the right end, the stack keeps its top on the
//! right, and the current environment is the innermost frame whose marker is
//! still live. The loop runs until control is exhausted; the single value
//! left on the stack is the program result.

mod builtins;
mod env;
mod value;

pub use env::{EnvArena, EnvRef};
pub use value::{Builtin, Closure, Value};

use std::fmt;

use tracing::{debug, trace};

use crate::flatten::{ControlItem, Delta};
use crate::standardize::BoundVars;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    UnboundIdentifier,
    TypeMismatch,
    ArityMismatch,
    IndexOutOfRange,
    DivisionByZero,
    ArithmeticOverflow,
    InvalidConditional,
}

#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub message: String,
    /// Id of the environment that was current when the machine failed.
    pub environment: usize,
    /// Rendering of the topmost stack value at failure, when one existed.
    pub stack_top: Option<String>,
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "RuntimeError: {} in environment {}",
            self.message, self.environment
        )?;
        if let Some(top) = &self.stack_top {
            write!(f, " (top of stack: {})", top)?;
        }
        Ok(())
    }
}

impl std::error::Error for RuntimeError {}

/// A stack cell: either a value or the marker of an entered environment.
enum StackSlot {
    Value(Value),
    Mark(EnvRef),
}

pub struct Machine {
    deltas: Vec<Delta>,
    control: Vec<ControlItem>,
    stack: Vec<StackSlot>,
    envs: EnvArena,
    /// Innermost-last chain of entered environments.
    env_stack: Vec<EnvRef>,
    /// Accumulated `Print` output.
    output: String,
}

impl Machine {
    /// Set up the machine over the flattened program: the primitive
    /// environment becomes frame 0 and δ₀ is loaded onto the control.
    pub fn new(deltas: Vec<Delta>) -> Self {
        let mut envs = EnvArena::new();
        let primitive = envs.root();
        for (name, builtin) in builtins::BUILTINS.entries() {
            envs.bind(
                primitive,
                (*name).to_string(),
                Value::Builtin(builtin.clone()),
            );
        }

        let mut control = vec![ControlItem::Env(primitive.0)];
        control.extend(deltas[0].iter().cloned());

        Self {
            deltas,
            control,
            stack: vec![StackSlot::Mark(primitive)],
            envs,
            env_stack: vec![primitive],
            output: String::new(),
        }
    }

    /// Run to completion and return the final value.
    pub fn run(&mut self) -> Result<Value, RuntimeError> {
        debug!(deltas = self.deltas.len(), "machine started");
        while let Some(item) = self.control.pop() {
            trace!(item = ?item, stack = self.stack.len(), "step");
            self.step(item)?;
        }

        let result = self.pop_value();
        debug_assert!(self.stack.is_empty(), "control exhausted mid-frame");
        debug!(result = %result, "machine halted");
        Ok(result)
    }

    /// Everything `Print` produced so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_output(self) -> String {
        self.output
    }

    fn step(&mut self, item: ControlItem) -> Result<(), RuntimeError> {
        match item {
            ControlItem::Integer(value) => self.push(Value::Integer(value)),
            ControlItem::Str(value) => self.push(Value::Str(value)),
            ControlItem::Truth(value) => self.push(Value::Truth(value)),
            ControlItem::Nil => self.push(Value::nil()),
            ControlItem::Dummy => self.push(Value::Dummy),
            ControlItem::Ystar => self.push(Value::Ystar),
            ControlItem::Name(name) => {
                let value = self
                    .envs
                    .lookup(self.current_env(), &name)
                    .cloned()
                    .ok_or_else(|| {
                        self.fail(
                            RuntimeErrorKind::UnboundIdentifier,
                            format!("undefined identifier '{}'", name),
                        )
                    })?;
                self.push(value);
            }
            ControlItem::Lambda { delta, vars } => {
                self.push(Value::Closure(Closure {
                    delta,
                    vars,
                    env: self.current_env(),
                }));
            }
            ControlItem::Gamma => self.apply()?,
            ControlItem::Beta => self.branch()?,
            ControlItem::Tau(n) => {
                let mut elements = Vec::with_capacity(n);
                for _ in 0..n {
                    elements.push(self.pop_value());
                }
                self.push(Value::Tuple(elements));
            }
            ControlItem::Binary(op) => {
                let left = self.pop_value();
                let right = self.pop_value();
                let result = builtins::binary(op, left, right, self.current_env())?;
                self.push(result);
            }
            ControlItem::Unary(op) => {
                let operand = self.pop_value();
                let result = builtins::unary(op, operand, self.current_env())?;
                self.push(result);
            }
            ControlItem::Aug => {
                let left = self.pop_value();
                let right = self.pop_value();
                let result = builtins::aug(left, right, self.current_env())?;
                self.push(result);
            }
            ControlItem::Env(id) => self.exit_env(id),
            ControlItem::DeltaThen(_) | ControlItem::DeltaElse(_) => {
                unreachable!("branch markers are consumed by beta")
            }
        }
        Ok(())
    }

    /// Rule 3: application.
    fn apply(&mut self) -> Result<(), RuntimeError> {
        let rator = self.pop_value();
        match rator {
            Value::Closure(closure) => {
                let rand = self.pop_value();
                let frame = self.envs.child(closure.env);
                self.bind_vars(frame, &closure.vars, rand)?;
                self.stack.push(StackSlot::Mark(frame));
                self.env_stack.push(frame);
                self.control.push(ControlItem::Env(frame.0));
                self.control.extend(self.deltas[closure.delta].iter().cloned());
            }
            Value::Builtin(builtin) => {
                let rand = self.pop_value();
                let env = self.current_env();
                let result = builtins::apply(builtin, rand, env, &mut self.output)?;
                self.push(result);
            }
            // Applying a tuple selects the 1-based element.
            Value::Tuple(elements) => {
                let rand = self.pop_value();
                let index = match rand {
                    Value::Integer(i) => i,
                    other => {
                        return Err(self.fail(
                            RuntimeErrorKind::TypeMismatch,
                            format!("tuple index must be an integer, got {}", other.kind()),
                        ))
                    }
                };
                if index < 1 || index as usize > elements.len() {
                    return Err(self.fail(
                        RuntimeErrorKind::IndexOutOfRange,
                        format!(
                            "tuple index {} out of range for order {}",
                            index,
                            elements.len()
                        ),
                    ));
                }
                self.push(elements[index as usize - 1].clone());
            }
            Value::Ystar => {
                let rand = self.pop_value();
                match rand {
                    Value::Closure(closure) => self.push(Value::Eta(closure)),
                    other => {
                        return Err(self.fail(
                            RuntimeErrorKind::TypeMismatch,
                            format!("Y* expects a function, got {}", other.kind()),
                        ))
                    }
                }
            }
            // Unroll the fixed point: re-apply the underlying closure with
            // the eta itself standing in for the recursive variable; the
            // operand stays put for the second application.
            Value::Eta(closure) => {
                self.push(Value::Eta(closure.clone()));
                self.push(Value::Closure(closure));
                self.control.push(ControlItem::Gamma);
                self.control.push(ControlItem::Gamma);
            }
            other => {
                return Err(self.fail(
                    RuntimeErrorKind::TypeMismatch,
                    format!("cannot apply {}, it is not a function", other.kind()),
                ))
            }
        }
        Ok(())
    }

    fn bind_vars(
        &mut self,
        frame: EnvRef,
        vars: &BoundVars,
        rand: Value,
    ) -> Result<(), RuntimeError> {
        match vars {
            BoundVars::Single(name) => self.envs.bind(frame, name.clone(), rand),
            BoundVars::Tuple(names) => match rand {
                Value::Tuple(values) if values.len() == names.len() => {
                    for (name, value) in names.iter().zip(values) {
                        self.envs.bind(frame, name.clone(), value);
                    }
                }
                Value::Tuple(values) => {
                    return Err(self.fail(
                        RuntimeErrorKind::ArityMismatch,
                        format!(
                            "pattern binds {} names but the tuple has order {}",
                            names.len(),
                            values.len()
                        ),
                    ))
                }
                other => {
                    return Err(self.fail(
                        RuntimeErrorKind::TypeMismatch,
                        format!("tuple pattern needs a tuple argument, got {}", other.kind()),
                    ))
                }
            },
            // `()` accepts and discards its argument.
            BoundVars::Empty => {}
        }
        Ok(())
    }

    /// Rule 4: conditional.
    fn branch(&mut self) -> Result<(), RuntimeError> {
        let condition = self.pop_value();
        let truth = match condition {
            Value::Truth(b) => b,
            other => {
                return Err(self.fail(
                    RuntimeErrorKind::InvalidConditional,
                    format!("conditional needs a truthvalue, got {}", other.kind()),
                ))
            }
        };

        let else_marker = self.control.pop();
        let then_marker = self.control.pop();
        match (then_marker, else_marker) {
            (Some(ControlItem::DeltaThen(t)), Some(ControlItem::DeltaElse(e))) => {
                let target = if truth { t } else { e };
                self.control.extend(self.deltas[target].iter().cloned());
                Ok(())
            }
            _ => unreachable!("beta always carries its two branch markers"),
        }
    }

    /// Rule 8: leaving a frame. The value on top of the marker is the
    /// frame's result; the marker itself disappears.
    fn exit_env(&mut self, id: usize) {
        let result = self.pop_value();
        match self.stack.pop() {
            Some(StackSlot::Mark(mark)) if mark.0 == id => {}
            _ => unreachable!("environment markers nest strictly"),
        }
        self.stack.push(StackSlot::Value(result));

        let left = self.env_stack.pop();
        debug_assert_eq!(left, Some(EnvRef(id)));
    }

    fn current_env(&self) -> EnvRef {
        *self
            .env_stack
            .last()
            .expect("the primitive environment is always active")
    }

    fn push(&mut self, value: Value) {
        self.stack.push(StackSlot::Value(value));
    }

    /// Pop a value off the stack. Well-formed control structures never leave
    /// a marker (or nothing) where a value is consumed.
    fn pop_value(&mut self) -> Value {
        match self.stack.pop() {
            Some(StackSlot::Value(value)) => value,
            _ => unreachable!("operand missing on the stack"),
        }
    }

    fn fail(&self, kind: RuntimeErrorKind, message: impl Into<String>) -> RuntimeError {
        let stack_top = self.stack.iter().rev().find_map(|slot| match slot {
            StackSlot::Value(value) => Some(value.render()),
            StackSlot::Mark(_) => None,
        });
        RuntimeError {
            kind,
            message: message.into(),
            environment: self.current_env().0,
            stack_top,
        }
    }
}
