//! Printer for the standard tree (`-st` output).

use std::fmt::{self, Display};

use crate::standardize::{BoundVars, StNode};

use super::TreePrinter;

impl Display for StNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut printer = TreePrinter::new();
        write_node(self, &mut printer, 0);
        write!(f, "{}", printer.finish())
    }
}

fn write_node(node: &StNode, out: &mut TreePrinter, depth: usize) {
    match node {
        StNode::Gamma(rator, rand) => {
            out.line(depth, "gamma");
            write_node(rator, out, depth + 1);
            write_node(rand, out, depth + 1);
        }
        StNode::Lambda { vars, body } => {
            out.line(depth, "lambda");
            write_vars(vars, out, depth + 1);
            write_node(body, out, depth + 1);
        }
        StNode::Cond(condition, then_arm, else_arm) => {
            out.line(depth, "->");
            write_node(condition, out, depth + 1);
            write_node(then_arm, out, depth + 1);
            write_node(else_arm, out, depth + 1);
        }
        StNode::Tau(elements) => {
            out.line(depth, "tau");
            for element in elements {
                write_node(element, out, depth + 1);
            }
        }
        StNode::Aug(left, right) => {
            out.line(depth, "aug");
            write_node(left, out, depth + 1);
            write_node(right, out, depth + 1);
        }
        StNode::Binary(op, left, right) => {
            out.line(depth, op.label());
            write_node(left, out, depth + 1);
            write_node(right, out, depth + 1);
        }
        StNode::Unary(op, operand) => {
            out.line(depth, op.label());
            write_node(operand, out, depth + 1);
        }
        StNode::Ystar => out.line(depth, "<Y*>"),
        StNode::Ident(name) => out.line(depth, &format!("<ID:{}>", name)),
        StNode::Integer(value) => out.line(depth, &format!("<INT:{}>", value)),
        StNode::Str(value) => out.line(depth, &format!("<STR:'{}'>", value)),
        StNode::Truth(true) => out.line(depth, "true"),
        StNode::Truth(false) => out.line(depth, "false"),
        StNode::Nil => out.line(depth, "<nil>"),
        StNode::Dummy => out.line(depth, "dummy"),
    }
}

fn write_vars(vars: &BoundVars, out: &mut TreePrinter, depth: usize) {
    match vars {
        BoundVars::Single(name) => out.line(depth, &format!("<ID:{}>", name)),
        BoundVars::Tuple(names) => {
            out.line(depth, ",");
            for name in names {
                out.line(depth + 1, &format!("<ID:{}>", name));
            }
        }
        BoundVars::Empty => out.line(depth, "()"),
    }
}
