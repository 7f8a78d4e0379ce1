//! Integration tests for the exprlib library
//! These tests exercise the public API end to end: registry, parse, evaluate.

use std::cell::Cell;

use exprlib::{
    Arity, Context, ErrorKind, Expr, ExprError, Real, Registry, assert_approx_eq, constants,
    evaluate, interp, parse, release, status,
};

use test_helpers::create_test_registry;

/// Level 1: Basic expression evaluation
#[test]
fn test_basic_expression_evaluation() {
    let registry = Registry::new();

    assert_eq!(interp("2 + 3", &registry, None).unwrap(), 5.0);
    assert_eq!(interp("2 * 3 + 4", &registry, None).unwrap(), 10.0);
    assert_eq!(interp("2 * (3 + 4)", &registry, None).unwrap(), 14.0);
    assert_eq!(interp("2 + 3 * 4", &registry, None).unwrap(), 14.0);
    assert_eq!(interp("2 ^ 3 ^ 2", &registry, None).unwrap(), 512.0);
    assert_eq!(interp("(2 ^ 3) ^ 2", &registry, None).unwrap(), 64.0);
    assert_eq!(interp("7 - 2 - 1", &registry, None).unwrap(), 4.0);
    assert_eq!(interp("12 / 3 / 2", &registry, None).unwrap(), 2.0);
    assert_eq!(interp("2.5 * 4.", &registry, None).unwrap(), 10.0);

    assert_approx_eq!(
        interp("pi", &registry, None).unwrap(),
        constants::PI,
        constants::TEST_PRECISION
    );
    assert_approx_eq!(interp("e", &registry, None).unwrap(), constants::E);
}

/// Level 2: Built-in functions
#[test]
fn test_builtin_functions() {
    let registry = Registry::new();

    assert_approx_eq!(interp("sin(pi / 2)", &registry, None).unwrap(), 1.0);
    assert_approx_eq!(interp("cos(0)", &registry, None).unwrap(), 1.0);
    assert_eq!(interp("sqrt(16)", &registry, None).unwrap(), 4.0);
    assert_approx_eq!(interp("cbrt(27)", &registry, None).unwrap(), 3.0);
    assert_eq!(interp("pow(2, 10)", &registry, None).unwrap(), 1024.0);
    assert_approx_eq!(interp("log10(1000)", &registry, None).unwrap(), 3.0);
    assert_approx_eq!(interp("exp(ln(5))", &registry, None).unwrap(), 5.0);
    assert_eq!(interp("round(2.5) + floor(-0.5)", &registry, None).unwrap(), 2.0);
    assert_eq!(interp("nCr(5,2) + nPr(4,2)", &registry, None).unwrap(), 22.0);
    assert_eq!(interp("factorial(5)", &registry, None).unwrap(), 120.0);
    assert_eq!(interp("max(1, 7, 3)", &registry, None).unwrap(), 7.0);
    assert_eq!(interp("min(4)", &registry, None).unwrap(), 4.0);
    assert_approx_eq!(interp("tau / 2", &registry, None).unwrap(), constants::PI);

    // Nested calls
    assert_approx_eq!(
        interp("sqrt(pow(3, 2) + pow(4, 2))", &registry, None).unwrap(),
        5.0
    );
}

/// Level 3: Variables bound to live slots
#[test]
fn test_variables_are_read_at_evaluation() {
    let registry = Registry::new();
    let x = Cell::new(2.0);
    let y = Cell::new(3.0);
    let ctx = Context::new().with("x", &x).unwrap().with("y", &y).unwrap();

    let ast = parse("x ^ 2", &registry, Some(&ctx)).unwrap();
    assert_eq!(evaluate(&ast, &registry, Some(&ctx)).unwrap(), 4.0);
    x.set(10.0);
    assert_eq!(evaluate(&ast, &registry, Some(&ctx)).unwrap(), 100.0);

    assert_eq!(interp("x * y - 1", &registry, Some(&ctx)).unwrap(), 29.0);
}

#[test]
fn test_undefined_variable_fails_at_parse() {
    let registry = Registry::new();
    let ctx = Context::new();
    let err = parse("a + 2", &registry, Some(&ctx)).unwrap_err();
    assert_eq!(
        err,
        ExprError::UndefinedVariable {
            name: "a".to_string()
        }
    );
    assert_eq!(err.kind(), ErrorKind::UndefinedVariable);
}

#[test]
fn test_division_by_zero() {
    let registry = Registry::new();

    // Literal division is folded and fails while parsing
    let result = parse("1 / 0", &registry, None);
    assert_eq!(status(&result), ErrorKind::DivisionByZero);

    // Through a variable it fails when evaluated
    let z = Cell::new(0.0);
    let ctx = Context::new().with("z", &z).unwrap();
    let ast = parse("1 / z", &registry, Some(&ctx)).unwrap();
    let result = evaluate(&ast, &registry, Some(&ctx));
    assert_eq!(status(&result), ErrorKind::DivisionByZero);

    z.set(4.0);
    let result = evaluate(&ast, &registry, Some(&ctx));
    assert_eq!(status(&result), ErrorKind::Success);
    assert_eq!(result.unwrap(), 0.25);
}

#[test]
fn test_arity_mismatch_is_syntax_kind() {
    let registry = Registry::new();
    for input in ["sin(1, 2)", "pow(2)", "nCr(1, 2, 3)", "min()", "max()"] {
        let err = interp(input, &registry, None).unwrap_err();
        assert!(
            matches!(err, ExprError::InvalidFunctionCall { .. }),
            "{} gave {:?}",
            input,
            err
        );
        assert_eq!(err.kind(), ErrorKind::Syntax);
    }

    let err = interp("pow(2)", &registry, None).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid function call to 'pow': expected 2 arguments, found 1"
    );
}

#[test]
fn test_domain_errors() {
    let registry = Registry::new();
    assert_eq!(
        interp("factorial(-1)", &registry, None).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    assert_eq!(
        interp("nCr(2, 3)", &registry, None).unwrap_err().kind(),
        ErrorKind::InvalidArgument
    );
    // IEEE semantics outside the error model
    assert!(interp("sqrt(-1)", &registry, None).unwrap().is_nan());
}

#[test]
fn test_unknown_function_fails_at_evaluation() {
    let registry = Registry::new();
    let ast = parse("frobnicate(1)", &registry, None).unwrap();
    let err = evaluate(&ast, &registry, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FunctionNotFound);
}

/// Level 4: Host registration
#[test]
fn test_custom_functions_and_constants() {
    let registry = create_test_registry();
    assert_eq!(interp("add3(1, 2, 3)", &registry, None).unwrap(), 6.0);
    assert_eq!(interp("sum()", &registry, None).unwrap(), 0.0);
    assert_eq!(interp("sum(1, 2, 3, 4)", &registry, None).unwrap(), 10.0);
    assert_eq!(interp("answer() / 2", &registry, None).unwrap(), 21.0);

    let mut registry = registry;
    registry.register_constant("k", 1.5).unwrap();
    assert_eq!(interp("k * 2", &registry, None).unwrap(), 3.0);
}

#[test]
fn test_duplicate_registration_keeps_first() {
    let mut registry = Registry::new();
    registry
        .register_function("f", Arity::Fixed(1), |args| Ok(args[0] + 1.0))
        .unwrap();
    let err = registry
        .register_function("f", Arity::Fixed(1), |args| Ok(args[0] * 100.0))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateFunction);
    assert_eq!(interp("f(1)", &registry, None).unwrap(), 2.0);

    // Built-ins are protected the same way
    let err = registry
        .register_function("sin", Arity::Fixed(1), |_| Ok(0.0))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateFunction);
    assert_approx_eq!(interp("sin(pi / 2)", &registry, None).unwrap(), 1.0);
}

#[test]
fn test_clear_and_reinitialize() {
    let mut registry = Registry::new();
    registry.clear_functions();
    assert_eq!(
        interp("sin(0)", &registry, None).unwrap_err().kind(),
        ErrorKind::FunctionNotFound
    );
    // Constants survive clearing functions
    assert_approx_eq!(interp("pi", &registry, None).unwrap(), constants::PI);

    registry.initialize();
    assert_eq!(interp("sin(0)", &registry, None).unwrap(), 0.0);

    let empty = Registry::empty();
    assert_eq!(
        parse("pi", &empty, None).unwrap_err().kind(),
        ErrorKind::UndefinedVariable
    );
}

/// Tree shape coming out of the parser
#[test]
fn test_constant_folding_shape() {
    let registry = Registry::new();
    let x = Cell::new(0.0);
    let ctx = Context::new().with("x", &x).unwrap();

    let ast = parse("2 * 3 + x", &registry, Some(&ctx)).unwrap();
    match &ast {
        Expr::Operator { left, right, .. } => {
            assert_eq!(**left, Expr::Number(6.0));
            assert_eq!(**right, Expr::Variable("x".to_string()));
        }
        other => panic!("expected an operator node, got {:?}", other),
    }
    assert_eq!(ast.node_count(), 3);
    release(ast);

    assert_eq!(
        parse("sqrt(2 * 8)", &registry, None).unwrap(),
        Expr::FunctionCall {
            name: "sqrt".to_string(),
            args: vec![Expr::Number(16.0)],
        }
    );
}

#[test]
fn test_status_codes() {
    let registry = Registry::new();
    let cases: [(&str, u8); 5] = [
        ("1 + 1", 0),
        ("1 +", 1),
        ("q", 2),
        ("1 / 0", 3),
        ("nothing(1)", 6),
    ];
    for (input, code) in cases {
        let result = interp(input, &registry, None);
        assert_eq!(status(&result).code(), code, "input {:?}", input);
    }
    assert_eq!(ErrorKind::from_code(4), Some(ErrorKind::AllocationFailed));
    assert_eq!(ErrorKind::from_code(10), None);
    assert_eq!(ErrorKind::Unknown.message(), "Unknown Error");
}

#[test]
fn test_whitespace_is_ignored() {
    let registry = Registry::new();
    let compact: Real = interp("max(1,2)*3", &registry, None).unwrap();
    let spaced: Real = interp(" \tmax ( 1 ,\n 2 ) *  3  ", &registry, None).unwrap();
    assert_eq!(compact, spaced);
}
