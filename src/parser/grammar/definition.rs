//! Definition productions `D` through `Db`.

use crate::ast::Def;
use crate::lexer::{Keyword, Token};
use crate::parser::{ParseResult, ParseState};

use super::{at_vb_start, expression, variable_binding, variable_list};

/// D -> Da 'within' D | Da
pub(crate) fn definition(state: &mut ParseState) -> ParseResult<Def> {
    let first = and_definition(state)?;
    if state.at_keyword(Keyword::Within) {
        state.next();
        let rest = definition(state)?;
        Ok(Def::Within(Box::new(first), Box::new(rest)))
    } else {
        Ok(first)
    }
}

/// Da -> Dr ('and' Dr)+ | Dr
fn and_definition(state: &mut ParseState) -> ParseResult<Def> {
    let first = rec_definition(state)?;
    if !state.at_keyword(Keyword::And) {
        return Ok(first);
    }

    let mut members = vec![first];
    while state.at_keyword(Keyword::And) {
        state.next();
        members.push(rec_definition(state)?);
    }
    for member in &members {
        if !binds_single_name(member) {
            return Err(state.error_expected("single-name bindings on both sides of 'and'"));
        }
    }
    Ok(Def::Simultaneous(members))
}

/// Dr -> 'rec' Db | Db
pub(crate) fn rec_definition(state: &mut ParseState) -> ParseResult<Def> {
    if !state.at_keyword(Keyword::Rec) {
        return basic_definition(state);
    }

    state.next();
    let inner = basic_definition(state)?;
    if !binds_single_name(&inner) {
        return Err(state.error_expected("a single-name binding after 'rec'"));
    }
    Ok(Def::Rec(Box::new(inner)))
}

/// Db -> Vl '=' E | <ID> Vb+ '=' E | '(' D ')'
fn basic_definition(state: &mut ParseState) -> ParseResult<Def> {
    if state.at_punct('(') {
        state.next();
        let inner = definition(state)?;
        state.expect_punct(')')?;
        return Ok(inner);
    }

    if !matches!(state.peek(), Token::Identifier(_)) {
        return Err(state.error_expected("a definition"));
    }

    // One token of lookahead separates `f x .. = E` from `x = E` / `x, y = E`.
    let function_form = matches!(state.peek_second(), Token::Identifier(_))
        || matches!(state.peek_second(), Token::Punct(p) if p.mark == '(');

    if function_form {
        let name = state.expect_identifier()?;
        let mut vars = vec![variable_binding(state)?];
        while at_vb_start(state) {
            vars.push(variable_binding(state)?);
        }
        state.expect_operator("=")?;
        let body = expression(state)?;
        Ok(Def::FunctionForm(name, vars, Box::new(body)))
    } else {
        let names = variable_list(state)?;
        state.expect_operator("=")?;
        let value = expression(state)?;
        Ok(Def::Bind(names, Box::new(value)))
    }
}

/// Whether a definition binds exactly one name, as `rec` and the members of
/// an `and` group require.
fn binds_single_name(def: &Def) -> bool {
    match def {
        Def::Bind(names, _) => names.len() == 1,
        Def::FunctionForm(_, _, _) => true,
        Def::Rec(inner) => binds_single_name(inner),
        Def::Within(_, body) => binds_single_name(body),
        Def::Simultaneous(_) => false,
    }
}
