//! Parser tests: ported grammar cases and AST-shape checks.

use serpc_lex::Lexer;
use serpc_util::Handler;

use crate::ast::*;
use crate::Parser;

fn parse(source: &str) -> (Option<Ast>, usize) {
    let handler = Handler::new();
    let tokens = Lexer::new(source, &handler).tokenize();
    let ast = Parser::new(tokens, &handler, source).parse();
    (ast, handler.count())
}

fn parse_ok(source: &str) -> Ast {
    let (ast, errors) = parse(source);
    assert_eq!(errors, 0, "unexpected errors for {source:?}");
    ast.expect("expected an AST")
}

fn parse_one(source: &str) -> Stmt {
    let mut ast = parse_ok(source);
    assert_eq!(ast.len(), 1, "expected a single statement for {source:?}");
    ast.pop().unwrap()
}

fn ident(name: &str) -> Expr {
    Expr::Identifier(name.to_string())
}

fn int(value: i64) -> Expr {
    Expr::Number(Number::Int(value))
}

// ----------------------------------------------------------------------
// Assignments
// ----------------------------------------------------------------------

#[test]
fn test_chained_assignment_with_tuple() {
    // hola, adios = greetings = ("Hello", "Goodbye")
    let stmt = parse_one("hola, adios = greetings = (\"Hello\", \"Goodbye\")");
    match stmt {
        Stmt::Assign { targets, value } => {
            assert_eq!(
                targets,
                vec![
                    vec![ident("hola"), ident("adios")],
                    vec![ident("greetings")],
                ]
            );
            assert_eq!(
                value,
                Expr::Tuple(vec![
                    Expr::Str("Hello".into()),
                    Expr::Str("Goodbye".into())
                ])
            );
        },
        other => panic!("expected assign_chain, got {other:?}"),
    }
}

#[test]
fn test_simple_assignment() {
    let stmt = parse_one("x = 1");
    assert_eq!(
        stmt,
        Stmt::Assign {
            targets: vec![vec![ident("x")]],
            value: int(1),
        }
    );
}

#[test]
fn test_parenthesized_target() {
    let stmt = parse_one("(x) = 1");
    match stmt {
        Stmt::Assign { targets, .. } => {
            assert_eq!(targets, vec![vec![Expr::Group(Box::new(ident("x")))]]);
        },
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn test_trailing_comma_makes_tuple_value() {
    let stmt = parse_one("x = 1,");
    match stmt {
        Stmt::Assign { value, .. } => assert_eq!(value, Expr::Tuple(vec![int(1)])),
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn test_aug_assignments() {
    let cases = [
        ("x += 1", AugOp::Add),
        ("x -= 1", AugOp::Sub),
        ("x *= 1", AugOp::Mul),
        ("x /= 1", AugOp::Div),
        ("x //= 1", AugOp::FloorDiv),
        ("x %= 1", AugOp::Mod),
        ("x **= 1", AugOp::Pow),
    ];
    for (source, expected) in cases {
        match parse_one(source) {
            Stmt::AugAssign { op, .. } => assert_eq!(op, expected, "for {source:?}"),
            other => panic!("expected aug_assign for {source:?}, got {other:?}"),
        }
    }
}

#[test]
fn test_assignment_to_literal_is_error() {
    let (_, errors) = parse("1 = x\n");
    assert!(errors > 0);
}

#[test]
fn test_subscript_and_attribute_targets() {
    parse_ok("a[0] = 1\nb.attr = 2\n");
}

// ----------------------------------------------------------------------
// Expressions
// ----------------------------------------------------------------------

#[test]
fn test_precedence_sum_vs_term() {
    let stmt = parse_one("x = 1 + 2 * 3");
    match stmt {
        Stmt::Assign { value, .. } => match value {
            Expr::Binary { op, right, .. } => {
                assert_eq!(op, BinOp::Add);
                assert!(matches!(
                    *right,
                    Expr::Binary {
                        op: BinOp::Mul,
                        ..
                    }
                ));
            },
            other => panic!("expected binary_operation, got {other:?}"),
        },
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn test_power_right_associative() {
    let stmt = parse_one("x = 2 ** 3 ** 2");
    match stmt {
        Stmt::Assign { value, .. } => match value {
            Expr::Binary { op, left, right } => {
                assert_eq!(op, BinOp::Pow);
                assert_eq!(*left, int(2));
                assert!(matches!(
                    *right,
                    Expr::Binary {
                        op: BinOp::Pow,
                        ..
                    }
                ));
            },
            other => panic!("expected power, got {other:?}"),
        },
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn test_unary_in_power_exponent() {
    parse_ok("x = 2 ** -3\n");
}

#[test]
fn test_comparison_chain_shape() {
    let stmt = parse_one("y = a < b <= c");
    match stmt {
        Stmt::Assign { value, .. } => match value {
            Expr::Comparison { left, rest } => {
                assert_eq!(*left, ident("a"));
                assert_eq!(rest.len(), 2);
                assert_eq!(rest[0].0, CmpOp::Lt);
                assert_eq!(rest[1].0, CmpOp::Le);
            },
            other => panic!("expected comparison, got {other:?}"),
        },
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn test_two_word_comparison_operators() {
    let stmt = parse_one("y = a not in b");
    match stmt {
        Stmt::Assign { value, .. } => match value {
            Expr::Comparison { rest, .. } => assert_eq!(rest[0].0, CmpOp::NotIn),
            other => panic!("expected comparison, got {other:?}"),
        },
        other => panic!("expected assignment, got {other:?}"),
    }

    let stmt = parse_one("y = a is not b");
    match stmt {
        Stmt::Assign { value, .. } => match value {
            Expr::Comparison { rest, .. } => assert_eq!(rest[0].0, CmpOp::IsNot),
            other => panic!("expected comparison, got {other:?}"),
        },
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn test_not_binds_looser_than_comparison() {
    let stmt = parse_one("y = not a == b");
    match stmt {
        Stmt::Assign { value, .. } => {
            assert!(matches!(
                value,
                Expr::Unary {
                    op: UnaryOp::Not,
                    ..
                }
            ));
        },
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn test_ternary() {
    let stmt = parse_one("y = a if c else b");
    match stmt {
        Stmt::Assign { value, .. } => match value {
            Expr::Ternary { body, cond, orelse } => {
                assert_eq!(*body, ident("a"));
                assert_eq!(*cond, ident("c"));
                assert_eq!(*orelse, ident("b"));
            },
            other => panic!("expected ternary, got {other:?}"),
        },
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn test_group_vs_tuple() {
    match parse_one("x = (1)") {
        Stmt::Assign { value, .. } => assert_eq!(value, Expr::Group(Box::new(int(1)))),
        other => panic!("expected assignment, got {other:?}"),
    }
    match parse_one("x = (1,)") {
        Stmt::Assign { value, .. } => assert_eq!(value, Expr::Tuple(vec![int(1)])),
        other => panic!("expected assignment, got {other:?}"),
    }
    match parse_one("x = ()") {
        Stmt::Assign { value, .. } => assert_eq!(value, Expr::Tuple(vec![])),
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn test_brace_forms() {
    match parse_one("x = {}") {
        Stmt::Assign { value, .. } => assert_eq!(value, Expr::Dict(vec![])),
        other => panic!("expected assignment, got {other:?}"),
    }
    match parse_one("x = {1: 2, 3: 4}") {
        Stmt::Assign { value, .. } => {
            assert_eq!(value, Expr::Dict(vec![(int(1), int(2)), (int(3), int(4))]))
        },
        other => panic!("expected assignment, got {other:?}"),
    }
    match parse_one("x = {1, 2}") {
        Stmt::Assign { value, .. } => assert_eq!(value, Expr::Set(vec![int(1), int(2)])),
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn test_slices() {
    let stmt = parse_one("y = a[1:2:3]");
    match stmt {
        Stmt::Assign { value, .. } => match value {
            Expr::Subscript { slices, .. } => {
                assert_eq!(
                    slices,
                    vec![Slice::Span {
                        lower: Some(int(1)),
                        upper: Some(int(2)),
                        step: Some(int(3)),
                        step_colon: true,
                    }]
                );
            },
            other => panic!("expected subscript, got {other:?}"),
        },
        other => panic!("expected assignment, got {other:?}"),
    }

    // Every loose colon mixture the slice rule admits.
    for source in [
        "y = a[1]", "y = a[:]", "y = a[::]", "y = a[1:]", "y = a[:1]", "y = a[1:2]",
        "y = a[1::]", "y = a[::2]", "y = a[1:2:]", "y = a[:1:2]", "y = a[1::2]",
    ] {
        parse_ok(&format!("{source}\n"));
    }
}

#[test]
fn test_multi_slice_subscript() {
    let stmt = parse_one("y = m[1, 2]");
    match stmt {
        Stmt::Assign { value, .. } => match value {
            Expr::Subscript { slices, .. } => {
                assert_eq!(slices, vec![Slice::Index(int(1)), Slice::Index(int(2))]);
            },
            other => panic!("expected subscript, got {other:?}"),
        },
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn test_call_attribute_chain() {
    parse_ok("y = obj.method(1, 2).field[0]\n");
}

#[test]
fn test_multiline_call() {
    parse_ok("y = f(\n    1,\n    2,\n)\n");
}

// ----------------------------------------------------------------------
// Compound statements
// ----------------------------------------------------------------------

#[test]
fn test_function_def_with_defaults() {
    let stmt = parse_one("def f(a, b=2):\n    return a + b\n");
    match stmt {
        Stmt::FunctionDef { name, params, body } => {
            assert_eq!(name, "f");
            assert_eq!(params.len(), 2);
            assert_eq!(params[0].name, "a");
            assert!(params[0].default.is_none());
            assert_eq!(params[1].name, "b");
            assert_eq!(params[1].default, Some(int(2)));
            assert_eq!(body.0.len(), 1);
        },
        other => panic!("expected function_def, got {other:?}"),
    }
}

#[test]
fn test_class_def_with_base() {
    let stmt = parse_one("class Dog(Animal):\n    pass\n");
    match stmt {
        Stmt::ClassDef { name, base, .. } => {
            assert_eq!(name, "Dog");
            assert_eq!(base.as_deref(), Some("Animal"));
        },
        other => panic!("expected class_def, got {other:?}"),
    }
}

#[test]
fn test_if_elif_else_chain() {
    let stmt = parse_one("if a:\n    x = 1\nelif b:\n    x = 2\nelse:\n    x = 3\n");
    match stmt {
        Stmt::If(if_stmt) => {
            assert_eq!(if_stmt.cond, ident("a"));
            match if_stmt.orelse {
                Some(ElseArm::Elif(elif)) => {
                    assert_eq!(elif.cond, ident("b"));
                    assert!(matches!(elif.orelse, Some(ElseArm::Else(_))));
                },
                other => panic!("expected elif arm, got {other:?}"),
            }
        },
        other => panic!("expected if_stmt, got {other:?}"),
    }
}

#[test]
fn test_inline_block() {
    let stmt = parse_one("if x: y = 1; z = 2\n");
    match stmt {
        Stmt::If(if_stmt) => assert_eq!(if_stmt.then_block.0.len(), 2),
        other => panic!("expected if_stmt, got {other:?}"),
    }
}

#[test]
fn test_while_loop() {
    let stmt = parse_one("while x < 10:\n    x += 1\n");
    assert!(matches!(stmt, Stmt::While { .. }));
}

#[test]
fn test_for_with_target_list() {
    let stmt = parse_one("for hola, adios in range(10):\n\tprint(\"Salut!\")\n");
    match stmt {
        Stmt::For { targets, iter, .. } => {
            assert_eq!(targets, vec![ident("hola"), ident("adios")]);
            assert!(matches!(iter, Expr::Call { .. }));
        },
        other => panic!("expected for_stmt, got {other:?}"),
    }
}

#[test]
fn test_nested_functions() {
    parse_ok("def outer():\n    def inner():\n        return 1\n    return inner()\n");
}

#[test]
fn test_global_and_del() {
    let ast = parse_ok("global a, b\ndel c\n");
    assert_eq!(ast[0], Stmt::Global(vec!["a".into(), "b".into()]));
    assert_eq!(ast[1], Stmt::Del(vec![ident("c")]));
}

#[test]
fn test_return_forms() {
    let ast = parse_ok("def f():\n    return\n");
    match &ast[0] {
        Stmt::FunctionDef { body, .. } => assert_eq!(body.0[0], Stmt::Return(None)),
        other => panic!("expected function_def, got {other:?}"),
    }
    let ast = parse_ok("def f():\n    return 1, 2\n");
    match &ast[0] {
        Stmt::FunctionDef { body, .. } => {
            assert_eq!(body.0[0], Stmt::Return(Some(Expr::Tuple(vec![int(1), int(2)]))));
        },
        other => panic!("expected function_def, got {other:?}"),
    }
}

// ----------------------------------------------------------------------
// Errors and recovery
// ----------------------------------------------------------------------

#[test]
fn test_missing_indent_is_single_error() {
    let (_, errors) = parse("def f():\npass");
    assert_eq!(errors, 1);
}

#[test]
fn test_missing_colon() {
    let (_, errors) = parse("if x\n    pass\n");
    assert!(errors > 0);
}

#[test]
fn test_errors_in_separate_functions_all_reported() {
    let source = "def f():\n    x = = 1\ndef g():\n    y = = 2\n";
    let (_, errors) = parse(source);
    assert!(errors >= 2);
}

#[test]
fn test_error_recovery_keeps_later_definitions() {
    let source = "x = = 1\ndef f():\n    return 2\n";
    let (ast, errors) = parse(source);
    assert!(errors >= 1);
    assert!(ast
        .unwrap()
        .iter()
        .any(|s| matches!(s, Stmt::FunctionDef { name, .. } if name == "f")));
}

#[test]
fn test_dump_names_the_chain() {
    let ast = parse_ok("hola, adios = greetings = (\"Hello\", \"Goodbye\")\n");
    let text = crate::ast::dump(&ast);
    assert!(text.contains("<assign_chain>"));
    assert!(text.contains("<target_chain>"));
    assert!(text.contains("<tuple>"));
}
