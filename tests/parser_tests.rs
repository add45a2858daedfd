use rpal::ast::{BinOp, Def, Expr, UnOp, Vb};
use rpal::lexer::lex;
use rpal::parser::parse;

fn parse_source(source: &str) -> Expr {
    parse(lex(source).expect("lexing failed")).expect("parsing failed")
}

fn ident(name: &str) -> Expr {
    Expr::Ident(name.to_string())
}

#[test]
fn parse_is_deterministic() {
    let source = "let f x = x + 1 in f 2, f 3";
    assert_eq!(parse_source(source), parse_source(source));
}

#[test]
fn parse_let_binding() {
    let tree = parse_source("let x = 5 in x");
    let expected = Expr::Let(
        Box::new(Def::Bind(
            vec!["x".to_string()],
            Box::new(Expr::Integer(5)),
        )),
        Box::new(ident("x")),
    );
    assert_eq!(tree, expected);
}

#[test]
fn application_is_left_associative() {
    let tree = parse_source("f x y");
    let expected = Expr::Gamma(
        Box::new(Expr::Gamma(Box::new(ident("f")), Box::new(ident("x")))),
        Box::new(ident("y")),
    );
    assert_eq!(tree, expected);
}

#[test]
fn power_is_right_associative() {
    let tree = parse_source("2 ** 3 ** 2");
    let expected = Expr::Binary(
        BinOp::Pow,
        Box::new(Expr::Integer(2)),
        Box::new(Expr::Binary(
            BinOp::Pow,
            Box::new(Expr::Integer(3)),
            Box::new(Expr::Integer(2)),
        )),
    );
    assert_eq!(tree, expected);
}

#[test]
fn symbolic_comparisons_match_keyword_forms() {
    assert_eq!(parse_source("x > y"), parse_source("x gr y"));
    assert_eq!(parse_source("x >= y"), parse_source("x ge y"));
    assert_eq!(parse_source("x < y"), parse_source("x ls y"));
    assert_eq!(parse_source("x <= y"), parse_source("x le y"));
}

#[test]
fn tau_needs_at_least_two_elements() {
    assert!(matches!(parse_source("1, 2"), Expr::Tau(elements) if elements.len() == 2));
    assert_eq!(parse_source("(1)"), Expr::Integer(1));
}

#[test]
fn aug_is_left_associative() {
    let tree = parse_source("nil aug 1 aug 2");
    let expected = Expr::Aug(
        Box::new(Expr::Aug(Box::new(Expr::Nil), Box::new(Expr::Integer(1)))),
        Box::new(Expr::Integer(2)),
    );
    assert_eq!(tree, expected);
}

#[test]
fn conditional_shape() {
    let tree = parse_source("x eq 0 -> 1 | 2");
    let expected = Expr::Cond(
        Box::new(Expr::Binary(
            BinOp::Eq,
            Box::new(ident("x")),
            Box::new(Expr::Integer(0)),
        )),
        Box::new(Expr::Integer(1)),
        Box::new(Expr::Integer(2)),
    );
    assert_eq!(tree, expected);
}

#[test]
fn unary_operators() {
    assert_eq!(
        parse_source("-1"),
        Expr::Unary(UnOp::Neg, Box::new(Expr::Integer(1)))
    );
    assert_eq!(
        parse_source("not true"),
        Expr::Unary(UnOp::Not, Box::new(Expr::Truth(true)))
    );
}

#[test]
fn function_form_collects_parameters() {
    let tree = parse_source("let f x y = x in f");
    match tree {
        Expr::Let(def, _) => match *def {
            Def::FunctionForm(name, vars, _) => {
                assert_eq!(name, "f");
                assert_eq!(
                    vars,
                    vec![Vb::Ident("x".to_string()), Vb::Ident("y".to_string())]
                );
            }
            other => panic!("expected function form, got {:?}", other),
        },
        other => panic!("expected let, got {:?}", other),
    }
}

#[test]
fn function_form_tuple_parameter() {
    let tree = parse_source("let f (x, y) = x in f");
    match tree {
        Expr::Let(def, _) => match *def {
            Def::FunctionForm(_, vars, _) => {
                assert_eq!(vars, vec![Vb::Tuple(vec!["x".to_string(), "y".to_string()])]);
            }
            other => panic!("expected function form, got {:?}", other),
        },
        other => panic!("expected let, got {:?}", other),
    }
}

#[test]
fn parenthesized_single_parameter_is_plain() {
    let tree = parse_source("let f (x) = x in f");
    match tree {
        Expr::Let(def, _) => match *def {
            Def::FunctionForm(_, vars, _) => {
                assert_eq!(vars, vec![Vb::Ident("x".to_string())]);
            }
            other => panic!("expected function form, got {:?}", other),
        },
        other => panic!("expected let, got {:?}", other),
    }
}

#[test]
fn and_groups_definitions() {
    let tree = parse_source("let x = 1 and y = 2 in x");
    match tree {
        Expr::Let(def, _) => match *def {
            Def::Simultaneous(members) => assert_eq!(members.len(), 2),
            other => panic!("expected simultaneous definition, got {:?}", other),
        },
        other => panic!("expected let, got {:?}", other),
    }
}

#[test]
fn within_nests_definitions() {
    let tree = parse_source("let x = 1 within y = x in y");
    match tree {
        Expr::Let(def, _) => assert!(matches!(*def, Def::Within(_, _))),
        other => panic!("expected let, got {:?}", other),
    }
}

#[test]
fn at_infix_application() {
    let tree = parse_source("1 @f 2");
    let expected = Expr::At(
        Box::new(Expr::Integer(1)),
        "f".to_string(),
        Box::new(Expr::Integer(2)),
    );
    assert_eq!(tree, expected);
}

#[test]
fn fn_lambda_with_unit_parameter() {
    let tree = parse_source("fn () . 1");
    assert_eq!(
        tree,
        Expr::Fn(vec![Vb::Empty], Box::new(Expr::Integer(1)))
    );
}

#[test]
fn rec_rejects_tuple_binding() {
    let error = parse(lex("let rec x, y = 1 in x").unwrap()).unwrap_err();
    assert!(error.expected.contains("single-name"));
}

#[test]
fn and_rejects_tuple_bindings() {
    let error = parse(lex("let x, y = p and z = 1 in z").unwrap()).unwrap_err();
    assert!(error.expected.contains("single-name"));
}

#[test]
fn missing_in_is_reported() {
    let error = parse(lex("let x = 5").unwrap()).unwrap_err();
    assert!(error.expected.contains("'in'"));
}

#[test]
fn trailing_tokens_are_rejected() {
    let error = parse(lex("x = 1").unwrap()).unwrap_err();
    assert!(error.expected.contains("end of input"));
}

#[test]
fn ast_prints_in_dotted_preorder() {
    let tree = parse_source("let x = 5 in Print(x+3)");
    let expected = "\
let
.=
..<ID:x>
..<INT:5>
.gamma
..<ID:Print>
..+
...<ID:x>
...<INT:3>
";
    assert_eq!(tree.to_string(), expected);
}

#[test]
fn ast_prints_nil_in_brackets() {
    let tree = parse_source("nil");
    assert_eq!(tree.to_string(), "<nil>\n");
}
