use exprlib::{BinaryOp, Expr, Real, Registry, assert_approx_eq, interp, parse};

#[test]
fn test_unary_expression_evaluation() {
    let registry = Registry::new();

    let test_cases: [(&str, Real); 12] = [
        // Simple unary
        ("-1", -1.0),
        ("--1", 1.0),
        ("---1", -1.0),
        ("- 1", -1.0),
        // Functions with unary
        ("-sin(1)", -0.8414709848078965),
        ("sin(-1)", -0.8414709848078965),
        ("-sin(-cos(1))", 0.5143952585235492),
        // Negation binds tighter than every binary operator
        ("-2^2", 4.0),
        ("(-2)^2", 4.0),
        ("-(2^2)", -4.0),
        ("2^-1", 0.5),
        ("3 - -3", 6.0),
    ];

    for &(expr, expected) in &test_cases {
        let result = interp(expr, &registry, None).unwrap();
        assert_approx_eq!(result, expected, 1e-12, "{} gave {}", expr, result);
    }
}

#[test]
fn test_unary_minus_builds_subtraction_from_zero() {
    let registry = Registry::new();
    let ast = parse("-5", &registry, None).unwrap();
    assert_eq!(
        ast,
        Expr::Operator {
            op: BinaryOp::Sub,
            left: Box::new(Expr::Number(0.0)),
            right: Box::new(Expr::Number(5.0)),
        }
    );
    assert!(!ast.is_number());
}

#[test]
fn test_unary_plus_is_rejected() {
    let registry = Registry::new();
    assert!(interp("+1", &registry, None).is_err());
}
