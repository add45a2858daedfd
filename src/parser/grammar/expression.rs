//! Expression productions `E` through `Rn`.
//!
//! Left-associative chains (application, `@`, `aug`, additive and
//! multiplicative operators) are parsed with iterative loops that build the
//! tree bottom-up, so long chains cost no host stack. `**` and the
//! conditional arm recurse to the right, matching their associativity.

use crate::ast::{BinOp, Expr, UnOp};
use crate::lexer::{Keyword, Token};
use crate::parser::{ParseResult, ParseState};

use super::{at_vb_start, definition, rec_definition, variable_binding};

/// E -> 'let' D 'in' E | 'fn' Vb+ '.' E | Ew
pub fn expression(state: &mut ParseState) -> ParseResult<Expr> {
    if state.at_keyword(Keyword::Let) {
        state.next();
        let def = definition(state)?;
        state.expect_keyword(Keyword::In)?;
        let body = expression(state)?;
        Ok(Expr::Let(Box::new(def), Box::new(body)))
    } else if state.at_keyword(Keyword::Fn) {
        state.next();
        let mut vars = vec![variable_binding(state)?];
        while at_vb_start(state) {
            vars.push(variable_binding(state)?);
        }
        state.expect_operator(".")?;
        let body = expression(state)?;
        Ok(Expr::Fn(vars, Box::new(body)))
    } else {
        where_expression(state)
    }
}

/// Ew -> T 'where' Dr | T
fn where_expression(state: &mut ParseState) -> ParseResult<Expr> {
    let body = tuple_expression(state)?;
    if state.at_keyword(Keyword::Where) {
        state.next();
        let def = rec_definition(state)?;
        Ok(Expr::Where(Box::new(body), Box::new(def)))
    } else {
        Ok(body)
    }
}

/// T -> Ta (',' Ta)*   (tau node only for two or more elements)
fn tuple_expression(state: &mut ParseState) -> ParseResult<Expr> {
    let first = aug_expression(state)?;
    if !state.at_punct(',') {
        return Ok(first);
    }

    let mut elements = vec![first];
    while state.at_punct(',') {
        state.next();
        elements.push(aug_expression(state)?);
    }
    Ok(Expr::Tau(elements))
}

/// Ta -> Ta 'aug' Tc | Tc
fn aug_expression(state: &mut ParseState) -> ParseResult<Expr> {
    let mut left = conditional(state)?;
    while state.at_keyword(Keyword::Aug) {
        state.next();
        let right = conditional(state)?;
        left = Expr::Aug(Box::new(left), Box::new(right));
    }
    Ok(left)
}

/// Tc -> B '->' Tc '|' Tc | B
fn conditional(state: &mut ParseState) -> ParseResult<Expr> {
    let condition = boolean_or(state)?;
    if !state.at_operator("->") {
        return Ok(condition);
    }

    state.next();
    let then_arm = conditional(state)?;
    state.expect_operator("|")?;
    let else_arm = conditional(state)?;
    Ok(Expr::Cond(
        Box::new(condition),
        Box::new(then_arm),
        Box::new(else_arm),
    ))
}

/// B -> B 'or' Bt | Bt
fn boolean_or(state: &mut ParseState) -> ParseResult<Expr> {
    let mut left = boolean_term(state)?;
    while state.at_keyword(Keyword::Or) {
        state.next();
        let right = boolean_term(state)?;
        left = Expr::Binary(BinOp::Or, Box::new(left), Box::new(right));
    }
    Ok(left)
}

/// Bt -> Bt '&' Bs | Bs
fn boolean_term(state: &mut ParseState) -> ParseResult<Expr> {
    let mut left = boolean_secondary(state)?;
    while state.at_operator("&") {
        state.next();
        let right = boolean_secondary(state)?;
        left = Expr::Binary(BinOp::Amp, Box::new(left), Box::new(right));
    }
    Ok(left)
}

/// Bs -> 'not' Bp | Bp
fn boolean_secondary(state: &mut ParseState) -> ParseResult<Expr> {
    if state.at_keyword(Keyword::Not) {
        state.next();
        let operand = boolean_primary(state)?;
        Ok(Expr::Unary(UnOp::Not, Box::new(operand)))
    } else {
        boolean_primary(state)
    }
}

/// Bp -> A (relop A)?   (non-associative)
fn boolean_primary(state: &mut ParseState) -> ParseResult<Expr> {
    let left = arithmetic(state)?;
    let op = match comparison_op(state) {
        Some(op) => op,
        None => return Ok(left),
    };

    state.next();
    let right = arithmetic(state)?;
    Ok(Expr::Binary(op, Box::new(left), Box::new(right)))
}

/// The comparison at the cursor, covering both keyword and symbolic forms.
fn comparison_op(state: &ParseState) -> Option<BinOp> {
    match state.peek() {
        Token::Keyword(k) => match k.word {
            Keyword::Gr => Some(BinOp::Gr),
            Keyword::Ge => Some(BinOp::Ge),
            Keyword::Ls => Some(BinOp::Ls),
            Keyword::Le => Some(BinOp::Le),
            Keyword::Eq => Some(BinOp::Eq),
            Keyword::Ne => Some(BinOp::Ne),
            _ => None,
        },
        Token::Operator(o) => match o.lexeme.as_str() {
            ">" => Some(BinOp::Gr),
            ">=" => Some(BinOp::Ge),
            "<" => Some(BinOp::Ls),
            "<=" => Some(BinOp::Le),
            "=" => Some(BinOp::Eq),
            "><" => Some(BinOp::Ne),
            _ => None,
        },
        _ => None,
    }
}

/// A -> A ('+'|'-') At | ('+'|'-') At | At
fn arithmetic(state: &mut ParseState) -> ParseResult<Expr> {
    let mut left = if state.at_operator("+") {
        state.next();
        term(state)?
    } else if state.at_operator("-") {
        state.next();
        Expr::Unary(UnOp::Neg, Box::new(term(state)?))
    } else {
        term(state)?
    };

    loop {
        let op = if state.at_operator("+") {
            BinOp::Add
        } else if state.at_operator("-") {
            BinOp::Sub
        } else {
            return Ok(left);
        };
        state.next();
        let right = term(state)?;
        left = Expr::Binary(op, Box::new(left), Box::new(right));
    }
}

/// At -> At ('*'|'/') Af | Af
fn term(state: &mut ParseState) -> ParseResult<Expr> {
    let mut left = factor(state)?;
    loop {
        let op = if state.at_operator("*") {
            BinOp::Mul
        } else if state.at_operator("/") {
            BinOp::Div
        } else {
            return Ok(left);
        };
        state.next();
        let right = factor(state)?;
        left = Expr::Binary(op, Box::new(left), Box::new(right));
    }
}

/// Af -> Ap '**' Af | Ap   (right-associative)
fn factor(state: &mut ParseState) -> ParseResult<Expr> {
    let base = at_application(state)?;
    if state.at_operator("**") {
        state.next();
        let exponent = factor(state)?;
        Ok(Expr::Binary(BinOp::Pow, Box::new(base), Box::new(exponent)))
    } else {
        Ok(base)
    }
}

/// Ap -> Ap '@' <ID> R | R
fn at_application(state: &mut ParseState) -> ParseResult<Expr> {
    let mut left = application(state)?;
    while state.at_operator("@") {
        state.next();
        let name = state.expect_identifier()?;
        let right = application(state)?;
        left = Expr::At(Box::new(left), name, Box::new(right));
    }
    Ok(left)
}

/// R -> R Rn | Rn   (application, left-associative)
fn application(state: &mut ParseState) -> ParseResult<Expr> {
    let mut rator = rand(state)?;
    while at_rand_start(state) {
        let argument = rand(state)?;
        rator = Expr::Gamma(Box::new(rator), Box::new(argument));
    }
    Ok(rator)
}

fn at_rand_start(state: &ParseState) -> bool {
    match state.peek() {
        Token::Identifier(_) | Token::Integer(_) | Token::Str(_) => true,
        Token::Keyword(k) => matches!(
            k.word,
            Keyword::True | Keyword::False | Keyword::Nil | Keyword::Dummy
        ),
        Token::Punct(p) => p.mark == '(',
        _ => false,
    }
}

/// Rn -> <ID> | <INT> | <STR> | 'true' | 'false' | 'nil' | 'dummy' | '(' E ')'
fn rand(state: &mut ParseState) -> ParseResult<Expr> {
    match state.peek() {
        Token::Identifier(_) => Ok(Expr::Ident(state.expect_identifier()?)),
        Token::Integer(i) => {
            let value = i.value;
            state.next();
            Ok(Expr::Integer(value))
        }
        Token::Str(s) => {
            let value = s.value.clone();
            state.next();
            Ok(Expr::Str(value))
        }
        Token::Keyword(k) => {
            let expr = match k.word {
                Keyword::True => Expr::Truth(true),
                Keyword::False => Expr::Truth(false),
                Keyword::Nil => Expr::Nil,
                Keyword::Dummy => Expr::Dummy,
                _ => return Err(state.error_expected("an expression")),
            };
            state.next();
            Ok(expr)
        }
        Token::Punct(p) if p.mark == '(' => {
            state.next();
            let inner = expression(state)?;
            state.expect_punct(')')?;
            Ok(inner)
        }
        _ => Err(state.error_expected("an expression")),
    }
}
