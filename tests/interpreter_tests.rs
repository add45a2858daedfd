//! End-to-end execution tests: full pipeline from source text to machine
//! result and `Print` output.

use quickcheck_macros::quickcheck;

use rpal::flatten::flatten;
use rpal::lexer::lex;
use rpal::machine::{Machine, RuntimeError, RuntimeErrorKind, Value};
use rpal::parser::parse;
use rpal::standardize::standardize;

/// Run a program, returning its final value and accumulated `Print` output.
fn run_program(source: &str) -> (Value, String) {
    let tree = parse(lex(source).expect("lexing failed")).expect("parsing failed");
    let deltas = flatten(&standardize(tree));
    let mut machine = Machine::new(deltas);
    let value = machine.run().expect("execution failed");
    (value, machine.into_output())
}

fn run_output(source: &str) -> String {
    run_program(source).1
}

fn run_error(source: &str) -> RuntimeError {
    let tree = parse(lex(source).expect("lexing failed")).expect("parsing failed");
    let deltas = flatten(&standardize(tree));
    let mut machine = Machine::new(deltas);
    machine.run().expect_err("execution should fail")
}

#[test]
fn e2e_let_binding_with_addition() {
    assert_eq!(run_output("let x = 5 in Print(x+3)"), "8");
}

#[test]
fn e2e_recursive_factorial() {
    let source = "let rec fact n = n eq 0 -> 1 | n * fact(n-1) in Print(fact 5)";
    assert_eq!(run_output(source), "120");
}

#[test]
fn e2e_tuple_sum_with_where() {
    let source = "let Sum A = Psum (A, Order A) \
                  where rec Psum (T,N) = N eq 0 -> 0 | Psum(T, N-1) + T N \
                  in Print(Sum(1,2,3,4,5))";
    assert_eq!(run_output(source), "15");
}

#[test]
fn e2e_tuple_parameter() {
    assert_eq!(run_output("let f (x,y) = x + y in Print(f(3,4))"), "7");
}

#[test]
fn e2e_string_reverse() {
    let source =
        "let rec rev S = S eq '' -> '' | (rev (Stern S)) @Conc (Stem S) in Print(rev 'Hello')";
    assert_eq!(run_output(source), "olleH");
}

#[test]
fn e2e_aug_renders_extended_tuple() {
    assert_eq!(run_output("Print( (1,2,3) aug 4 )"), "(1, 2, 3, 4)");
}

#[test]
fn closure_captures_its_creation_environment() {
    // The x visible inside f is the one bound when the lambda was built,
    // not the one in scope at the call.
    let source = "let x = 1 in let f = fn y . x + y in let x = 10 in Print(f 5)";
    assert_eq!(run_output(source), "6");
}

#[test]
fn fixed_point_matches_direct_computation() {
    let source = "let rec fib n = n ls 2 -> n | fib(n-1) + fib(n-2) in Print(fib 10)";
    assert_eq!(run_output(source), "55");
}

#[test]
fn tuple_indexing_is_one_based() {
    assert_eq!(run_output("let t = 10, 20, 30 in Print(t 1, t 3)"), "(10, 30)");
}

#[test]
fn order_and_null() {
    assert_eq!(run_output("Print(Order (1,2,3), Null nil, Null (1,2))"), "(3, true, false)");
}

#[test]
fn string_builtins() {
    assert_eq!(
        run_output("Print(Stem 'abc', Stern 'abc', 'ab' @Conc 'cd')"),
        "(a, bc, abcd)"
    );
}

#[test]
fn conc_is_curried() {
    // One argument at a time: a partial application is a value.
    assert_eq!(run_output("let p = Conc 'ab' in Print(p 'cd', p 'ef')"), "(abcd, abef)");
}

#[test]
fn itos_renders_decimal() {
    assert_eq!(run_output("Print('n=' @Conc (ItoS 7))"), "n=7");
}

#[test]
fn type_predicates() {
    let source = "Print(Isinteger 1, Isstring 1, Istuple nil, Isdummy dummy, \
                  Istruthvalue false, Isfunction Print)";
    assert_eq!(run_output(source), "(true, false, true, true, true, true)");
}

#[test]
fn printed_values_render_by_kind() {
    assert_eq!(run_output("Print(nil, dummy, true, 'x')"), "(nil, dummy, true, x)");
}

#[test]
fn lambda_values_render_their_bound_variable() {
    assert_eq!(run_output("Print(fn x . x)"), "[lambda closure: x]");
    assert_eq!(run_output("let f (x,y) = x in Print f"), "[lambda closure: x,y]");
}

#[test]
fn conditional_only_evaluates_the_taken_branch() {
    let (value, _) = run_program("true -> 1 | 1/0");
    assert_eq!(value, Value::Integer(1));
}

#[test]
fn and_definitions_bind_simultaneously() {
    assert_eq!(run_output("let x = 1 and y = 2 in Print(x + y)"), "3");
}

#[test]
fn within_exposes_only_the_inner_name() {
    let source = "let b = 2 within square = b * b in Print square";
    assert_eq!(run_output(source), "4");
    let error = run_error("let b = 2 within square = b * b in Print b");
    assert_eq!(error.kind, RuntimeErrorKind::UnboundIdentifier);
}

#[test]
fn empty_parameter_discards_its_argument() {
    assert_eq!(run_output("let f () = 7 in Print(f 1)"), "7");
}

#[test]
fn output_accumulates_across_prints() {
    let source = "let d = Print 1 in let e = Print 2 in Print 3";
    assert_eq!(run_output(source), "123");
}

#[test]
fn unbound_identifier_is_reported() {
    let error = run_error("x");
    assert_eq!(error.kind, RuntimeErrorKind::UnboundIdentifier);
}

#[test]
fn division_by_zero_is_reported() {
    let error = run_error("1 / 0");
    assert_eq!(error.kind, RuntimeErrorKind::DivisionByZero);
}

#[test]
fn overflow_is_an_error_not_wraparound() {
    let error = run_error("9223372036854775807 + 1");
    assert_eq!(error.kind, RuntimeErrorKind::ArithmeticOverflow);
}

#[test]
fn tuple_index_out_of_range_is_reported() {
    let error = run_error("let t = 1, 2 in t 5");
    assert_eq!(error.kind, RuntimeErrorKind::IndexOutOfRange);
}

#[test]
fn tuple_pattern_arity_is_checked() {
    let error = run_error("let f (x,y) = x in f (1,2,3)");
    assert_eq!(error.kind, RuntimeErrorKind::ArityMismatch);
}

#[test]
fn non_truth_conditional_is_reported() {
    let error = run_error("1 -> 2 | 3");
    assert_eq!(error.kind, RuntimeErrorKind::InvalidConditional);
}

#[test]
fn applying_a_non_function_is_reported() {
    let error = run_error("1 2");
    assert_eq!(error.kind, RuntimeErrorKind::TypeMismatch);
}

#[test]
fn errors_carry_the_environment_id() {
    let error = run_error("let f x = y in f 1");
    assert_eq!(error.kind, RuntimeErrorKind::UnboundIdentifier);
    // The failure happens inside f's frame, not the primitive one.
    assert!(error.environment > 0);
}

#[test]
fn execution_is_deterministic() {
    let source = "let rec fact n = n eq 0 -> 1 | n * fact(n-1) in Print(fact 7)";
    assert_eq!(run_program(source), run_program(source));
}

#[quickcheck]
fn recursive_factorial_matches_iterative(n: u8) -> bool {
    let n = i64::from(n % 10);
    let source = format!(
        "let rec fact k = k eq 0 -> 1 | k * fact(k-1) in Print(fact {})",
        n
    );
    let expected: i64 = (1..=n.max(1)).product();
    run_output(&source) == expected.to_string()
}
