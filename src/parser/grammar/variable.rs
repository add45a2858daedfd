//! Variable binding productions `Vb` and `Vl`.

use crate::ast::Vb;
use crate::lexer::Token;
use crate::parser::{ParseResult, ParseState};

pub(crate) fn at_vb_start(state: &ParseState) -> bool {
    matches!(state.peek(), Token::Identifier(_)) || state.at_punct('(')
}

/// Vb -> <ID> | '(' ')' | '(' Vl ')'
pub(crate) fn variable_binding(state: &mut ParseState) -> ParseResult<Vb> {
    if !state.at_punct('(') {
        return Ok(Vb::Ident(state.expect_identifier()?));
    }

    state.next();
    if state.at_punct(')') {
        state.next();
        return Ok(Vb::Empty);
    }

    let mut names = variable_list(state)?;
    state.expect_punct(')')?;
    // `(x)` is just a parenthesized variable, not a one-tuple pattern.
    if names.len() == 1 {
        Ok(Vb::Ident(names.remove(0)))
    } else {
        Ok(Vb::Tuple(names))
    }
}

/// Vl -> <ID> (',' <ID>)*
pub(crate) fn variable_list(state: &mut ParseState) -> ParseResult<Vec<String>> {
    let mut names = vec![state.expect_identifier()?];
    while state.at_punct(',') {
        state.next();
        names.push(state.expect_identifier()?);
    }
    Ok(names)
}
