//! Printer for the n-ary parse tree (`-ast` output).

use std::fmt::{self, Display};

use crate::ast::{Def, Expr, Vb};

use super::TreePrinter;

impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut printer = TreePrinter::new();
        write_expr(self, &mut printer, 0);
        write!(f, "{}", printer.finish())
    }
}

fn write_expr(expr: &Expr, out: &mut TreePrinter, depth: usize) {
    match expr {
        Expr::Let(def, body) => {
            out.line(depth, "let");
            write_def(def, out, depth + 1);
            write_expr(body, out, depth + 1);
        }
        Expr::Fn(vars, body) => {
            out.line(depth, "lambda");
            for vb in vars {
                write_vb(vb, out, depth + 1);
            }
            write_expr(body, out, depth + 1);
        }
        Expr::Where(body, def) => {
            out.line(depth, "where");
            write_expr(body, out, depth + 1);
            write_def(def, out, depth + 1);
        }
        Expr::Tau(elements) => {
            out.line(depth, "tau");
            for element in elements {
                write_expr(element, out, depth + 1);
            }
        }
        Expr::Aug(left, right) => {
            out.line(depth, "aug");
            write_expr(left, out, depth + 1);
            write_expr(right, out, depth + 1);
        }
        Expr::Cond(condition, then_arm, else_arm) => {
            out.line(depth, "->");
            write_expr(condition, out, depth + 1);
            write_expr(then_arm, out, depth + 1);
            write_expr(else_arm, out, depth + 1);
        }
        Expr::Binary(op, left, right) => {
            out.line(depth, op.label());
            write_expr(left, out, depth + 1);
            write_expr(right, out, depth + 1);
        }
        Expr::Unary(op, operand) => {
            out.line(depth, op.label());
            write_expr(operand, out, depth + 1);
        }
        Expr::At(left, name, right) => {
            out.line(depth, "@");
            write_expr(left, out, depth + 1);
            out.line(depth + 1, &format!("<ID:{}>", name));
            write_expr(right, out, depth + 1);
        }
        Expr::Gamma(rator, rand) => {
            out.line(depth, "gamma");
            write_expr(rator, out, depth + 1);
            write_expr(rand, out, depth + 1);
        }
        Expr::Ident(name) => out.line(depth, &format!("<ID:{}>", name)),
        Expr::Integer(value) => out.line(depth, &format!("<INT:{}>", value)),
        Expr::Str(value) => out.line(depth, &format!("<STR:'{}'>", value)),
        Expr::Truth(true) => out.line(depth, "true"),
        Expr::Truth(false) => out.line(depth, "false"),
        Expr::Nil => out.line(depth, "<nil>"),
        Expr::Dummy => out.line(depth, "dummy"),
    }
}

fn write_def(def: &Def, out: &mut TreePrinter, depth: usize) {
    match def {
        Def::Within(outer, inner) => {
            out.line(depth, "within");
            write_def(outer, out, depth + 1);
            write_def(inner, out, depth + 1);
        }
        Def::Simultaneous(members) => {
            out.line(depth, "and");
            for member in members {
                write_def(member, out, depth + 1);
            }
        }
        Def::Rec(inner) => {
            out.line(depth, "rec");
            write_def(inner, out, depth + 1);
        }
        Def::Bind(names, value) => {
            out.line(depth, "=");
            write_names(names, out, depth + 1);
            write_expr(value, out, depth + 1);
        }
        Def::FunctionForm(name, vars, body) => {
            out.line(depth, "function_form");
            out.line(depth + 1, &format!("<ID:{}>", name));
            for vb in vars {
                write_vb(vb, out, depth + 1);
            }
            write_expr(body, out, depth + 1);
        }
    }
}

fn write_vb(vb: &Vb, out: &mut TreePrinter, depth: usize) {
    match vb {
        Vb::Ident(name) => out.line(depth, &format!("<ID:{}>", name)),
        Vb::Empty => out.line(depth, "()"),
        Vb::Tuple(names) => write_names(names, out, depth),
    }
}

fn write_names(names: &[String], out: &mut TreePrinter, depth: usize) {
    if names.len() == 1 {
        out.line(depth, &format!("<ID:{}>", names[0]));
    } else {
        out.line(depth, ",");
        for name in names {
            out.line(depth + 1, &format!("<ID:{}>", name));
        }
    }
}
