//! Standardization - rewrite the parse tree into the standard tree.
//!
//! Every surface binding form (`let`, `where`, `within`, `and`, `rec`,
//! `function_form`, `fn`, `@`) is reduced to `gamma` and `lambda`. Tuple
//! construction (`tau`), the conditional arrow, `aug`, and the operator
//! nodes survive unchanged; the machine executes those directly.
//!
//! The rewrite is total: the typed parse tree cannot represent the malformed
//! shapes a label-and-children tree would have to reject, and the parser has
//! already confined `rec` and `and` to single-name bindings.

use std::fmt;

use crate::ast::{BinOp, Def, Expr, UnOp, Vb};

/// Bound-variable descriptor attached to a `lambda`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundVars {
    Single(String),
    /// Comma pattern `x, y, ..`; the argument is destructured element-wise.
    Tuple(Vec<String>),
    /// `( )` - the argument is accepted and discarded.
    Empty,
}

impl BoundVars {
    fn from_names(mut names: Vec<String>) -> Self {
        if names.len() == 1 {
            BoundVars::Single(names.remove(0))
        } else {
            BoundVars::Tuple(names)
        }
    }

    fn from_vb(vb: Vb) -> Self {
        match vb {
            Vb::Ident(name) => BoundVars::Single(name),
            Vb::Empty => BoundVars::Empty,
            Vb::Tuple(names) => BoundVars::Tuple(names),
        }
    }
}

impl fmt::Display for BoundVars {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BoundVars::Single(name) => write!(f, "{}", name),
            BoundVars::Tuple(names) => write!(f, "{}", names.join(",")),
            BoundVars::Empty => write!(f, "()"),
        }
    }
}

/// A node of the standard tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StNode {
    Gamma(Box<StNode>, Box<StNode>),
    Lambda {
        vars: BoundVars,
        body: Box<StNode>,
    },
    Cond(Box<StNode>, Box<StNode>, Box<StNode>),
    Tau(Vec<StNode>),
    Aug(Box<StNode>, Box<StNode>),
    Binary(BinOp, Box<StNode>, Box<StNode>),
    Unary(UnOp, Box<StNode>),
    /// The fixed-point combinator introduced by `rec`.
    Ystar,
    Ident(String),
    Integer(i64),
    Str(String),
    Truth(bool),
    Nil,
    Dummy,
}

impl StNode {
    fn gamma(rator: StNode, rand: StNode) -> StNode {
        StNode::Gamma(Box::new(rator), Box::new(rand))
    }

    fn lambda(vars: BoundVars, body: StNode) -> StNode {
        StNode::Lambda {
            vars,
            body: Box::new(body),
        }
    }
}

/// Standardize a parse tree.
pub fn standardize(expr: Expr) -> StNode {
    match expr {
        // let X = E1 in E2  =>  gamma(lambda(X, E2), E1)
        Expr::Let(def, body) => {
            let Binding { vars, value } = standardize_def(*def);
            StNode::gamma(StNode::lambda(vars, standardize(*body)), value)
        }
        // E where X = E1  =>  same rewrite as let
        Expr::Where(body, def) => {
            let Binding { vars, value } = standardize_def(*def);
            StNode::gamma(StNode::lambda(vars, standardize(*body)), value)
        }
        // fn V1 .. Vn . E  =>  lambda(V1, .. lambda(Vn, E))
        Expr::Fn(vars, body) => nested_lambda(vars, standardize(*body)),
        // E1 @ F E2  =>  gamma(gamma(F, E1), E2)
        Expr::At(left, name, right) => StNode::gamma(
            StNode::gamma(StNode::Ident(name), standardize(*left)),
            standardize(*right),
        ),
        Expr::Gamma(rator, rand) => StNode::gamma(standardize(*rator), standardize(*rand)),
        Expr::Tau(elements) => StNode::Tau(elements.into_iter().map(standardize).collect()),
        Expr::Aug(left, right) => {
            StNode::Aug(Box::new(standardize(*left)), Box::new(standardize(*right)))
        }
        Expr::Cond(condition, then_arm, else_arm) => StNode::Cond(
            Box::new(standardize(*condition)),
            Box::new(standardize(*then_arm)),
            Box::new(standardize(*else_arm)),
        ),
        Expr::Binary(op, left, right) => StNode::Binary(
            op,
            Box::new(standardize(*left)),
            Box::new(standardize(*right)),
        ),
        Expr::Unary(op, operand) => StNode::Unary(op, Box::new(standardize(*operand))),
        Expr::Ident(name) => StNode::Ident(name),
        Expr::Integer(value) => StNode::Integer(value),
        Expr::Str(value) => StNode::Str(value),
        Expr::Truth(value) => StNode::Truth(value),
        Expr::Nil => StNode::Nil,
        Expr::Dummy => StNode::Dummy,
    }
}

/// A standardized definition: the pattern it binds and the value expression.
struct Binding {
    vars: BoundVars,
    value: StNode,
}

fn standardize_def(def: Def) -> Binding {
    match def {
        Def::Bind(names, value) => Binding {
            vars: BoundVars::from_names(names),
            value: standardize(*value),
        },
        // F V1 .. Vn = E  =>  F = lambda(V1, .. lambda(Vn, E))
        Def::FunctionForm(name, vars, body) => Binding {
            vars: BoundVars::Single(name),
            value: nested_lambda(vars, standardize(*body)),
        },
        // D1 within X2 = E2  =>  X2 = gamma(lambda(X1, E2), E1)
        Def::Within(outer, inner) => {
            let outer = standardize_def(*outer);
            let inner = standardize_def(*inner);
            Binding {
                vars: inner.vars,
                value: StNode::gamma(StNode::lambda(outer.vars, inner.value), outer.value),
            }
        }
        // X1 = E1 and .. and Xk = Ek  =>  (X1, .., Xk) = tau(E1, .., Ek)
        Def::Simultaneous(members) => {
            let mut names = Vec::with_capacity(members.len());
            let mut values = Vec::with_capacity(members.len());
            for member in members {
                let Binding { vars, value } = standardize_def(member);
                match vars {
                    BoundVars::Single(name) => names.push(name),
                    // The parser admits only single-name bindings here.
                    BoundVars::Tuple(_) | BoundVars::Empty => {
                        unreachable!("'and' members bind single names")
                    }
                }
                values.push(value);
            }
            Binding {
                vars: BoundVars::Tuple(names),
                value: StNode::Tau(values),
            }
        }
        // rec X = E  =>  X = gamma(Y*, lambda(X, E))
        Def::Rec(inner) => {
            let Binding { vars, value } = standardize_def(*inner);
            let name = match &vars {
                BoundVars::Single(name) => name.clone(),
                BoundVars::Tuple(_) | BoundVars::Empty => {
                    unreachable!("'rec' binds a single name")
                }
            };
            Binding {
                vars,
                value: StNode::gamma(
                    StNode::Ystar,
                    StNode::lambda(BoundVars::Single(name), value),
                ),
            }
        }
    }
}

fn nested_lambda(vars: Vec<Vb>, body: StNode) -> StNode {
    vars.into_iter()
        .rev()
        .fold(body, |acc, vb| StNode::lambda(BoundVars::from_vb(vb), acc))
}
