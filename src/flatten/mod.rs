//! Flattening - linearize the standard tree into control structures.
//!
//! δ₀ holds the top-level expression; every `lambda` body and every
//! conditional branch gets its own δ, referenced by index. Elements are
//! emitted in prefix order and the machine consumes each δ from the right,
//! so operands are evaluated before the operator that pops them.

use crate::ast::{BinOp, UnOp};
use crate::standardize::{BoundVars, StNode};

/// One element of a control structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlItem {
    Integer(i64),
    Str(String),
    Truth(bool),
    Nil,
    Dummy,
    /// Identifier reference, resolved in the environment chain.
    Name(String),
    /// Apply the value on top of the stack to the one beneath it.
    Gamma,
    /// Push a closure over δ `delta` in the current environment.
    Lambda { delta: usize, vars: BoundVars },
    /// Build an n-tuple from the top `n` stack values.
    Tau(usize),
    /// Conditional: consumes a truth value and one of the two branch
    /// markers that always accompany it.
    Beta,
    DeltaThen(usize),
    DeltaElse(usize),
    Binary(BinOp),
    Unary(UnOp),
    /// `aug` keeps its own tag; its left operand must be a tuple.
    Aug,
    Ystar,
    /// Environment marker; never emitted by the flattener, pushed by the
    /// machine when it enters a frame.
    Env(usize),
}

pub type Delta = Vec<ControlItem>;

/// Flatten a standard tree into its list of control structures.
pub fn flatten(root: &StNode) -> Vec<Delta> {
    let mut flattener = Flattener { deltas: Vec::new() };
    let top = flattener.alloc();
    flattener.fill(top, root);
    flattener.deltas
}

struct Flattener {
    deltas: Vec<Delta>,
}

impl Flattener {
    fn alloc(&mut self) -> usize {
        self.deltas.push(Vec::new());
        self.deltas.len() - 1
    }

    fn fill(&mut self, index: usize, node: &StNode) {
        let mut acc = Vec::new();
        self.emit(node, &mut acc);
        self.deltas[index] = acc;
    }

    fn emit(&mut self, node: &StNode, acc: &mut Delta) {
        match node {
            StNode::Lambda { vars, body } => {
                let delta = self.alloc();
                acc.push(ControlItem::Lambda {
                    delta,
                    vars: vars.clone(),
                });
                self.fill(delta, body);
            }
            StNode::Cond(condition, then_arm, else_arm) => {
                let then_delta = self.alloc();
                let else_delta = self.alloc();
                self.fill(then_delta, then_arm);
                self.fill(else_delta, else_arm);
                acc.push(ControlItem::DeltaThen(then_delta));
                acc.push(ControlItem::DeltaElse(else_delta));
                acc.push(ControlItem::Beta);
                self.emit(condition, acc);
            }
            StNode::Gamma(rator, rand) => {
                acc.push(ControlItem::Gamma);
                self.emit(rator, acc);
                self.emit(rand, acc);
            }
            StNode::Tau(elements) => {
                acc.push(ControlItem::Tau(elements.len()));
                for element in elements {
                    self.emit(element, acc);
                }
            }
            StNode::Aug(left, right) => {
                acc.push(ControlItem::Aug);
                self.emit(left, acc);
                self.emit(right, acc);
            }
            StNode::Binary(op, left, right) => {
                acc.push(ControlItem::Binary(*op));
                self.emit(left, acc);
                self.emit(right, acc);
            }
            StNode::Unary(op, operand) => {
                acc.push(ControlItem::Unary(*op));
                self.emit(operand, acc);
            }
            StNode::Ystar => acc.push(ControlItem::Ystar),
            StNode::Ident(name) => acc.push(ControlItem::Name(name.clone())),
            StNode::Integer(value) => acc.push(ControlItem::Integer(*value)),
            StNode::Str(value) => acc.push(ControlItem::Str(value.clone())),
            StNode::Truth(value) => acc.push(ControlItem::Truth(*value)),
            StNode::Nil => acc.push(ControlItem::Nil),
            StNode::Dummy => acc.push(ControlItem::Dummy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standardize::BoundVars;

    fn ident(name: &str) -> StNode {
        StNode::Ident(name.to_string())
    }

    #[test]
    fn lambda_body_gets_its_own_delta() {
        // gamma(lambda(x, x), 1)
        let tree = StNode::Gamma(
            Box::new(StNode::Lambda {
                vars: BoundVars::Single("x".to_string()),
                body: Box::new(ident("x")),
            }),
            Box::new(StNode::Integer(1)),
        );
        let deltas = flatten(&tree);

        assert_eq!(deltas.len(), 2);
        assert_eq!(
            deltas[0],
            vec![
                ControlItem::Gamma,
                ControlItem::Lambda {
                    delta: 1,
                    vars: BoundVars::Single("x".to_string()),
                },
                ControlItem::Integer(1),
            ]
        );
        assert_eq!(deltas[1], vec![ControlItem::Name("x".to_string())]);
    }

    #[test]
    fn conditional_branches_become_separate_deltas() {
        let tree = StNode::Cond(
            Box::new(StNode::Truth(true)),
            Box::new(StNode::Integer(1)),
            Box::new(StNode::Integer(2)),
        );
        let deltas = flatten(&tree);

        assert_eq!(deltas.len(), 3);
        assert_eq!(
            deltas[0],
            vec![
                ControlItem::DeltaThen(1),
                ControlItem::DeltaElse(2),
                ControlItem::Beta,
                ControlItem::Truth(true),
            ]
        );
        assert_eq!(deltas[1], vec![ControlItem::Integer(1)]);
        assert_eq!(deltas[2], vec![ControlItem::Integer(2)]);
    }

    #[test]
    fn operands_follow_their_operator_in_prefix_order() {
        // 1 + 2: the machine pops from the right, so it sees 2, then 1,
        // then the operator.
        let tree = StNode::Binary(
            crate::ast::BinOp::Add,
            Box::new(StNode::Integer(1)),
            Box::new(StNode::Integer(2)),
        );
        let deltas = flatten(&tree);
        assert_eq!(
            deltas[0],
            vec![
                ControlItem::Binary(crate::ast::BinOp::Add),
                ControlItem::Integer(1),
                ControlItem::Integer(2),
            ]
        );
    }
}
