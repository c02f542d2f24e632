//! Edge-case and property tests for the lexing pipeline.

use proptest::prelude::*;
use serpc_util::Handler;

use crate::token::{Token, TokenKind};
use crate::Lexer;

fn lex(source: &str) -> (Vec<Token>, usize) {
    let handler = Handler::new();
    let tokens = Lexer::new(source, &handler).tokenize();
    (tokens, handler.count())
}

#[test]
fn test_comment_only_file() {
    let (tokens, errors) = lex("# nothing here\n");
    assert_eq!(errors, 0);
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(kinds, vec![TokenKind::EndMarker]);
}

#[test]
fn test_crlf_line_endings() {
    let (tokens, errors) = lex("x = 1\r\ny = 2\r\n");
    assert_eq!(errors, 0);
    let newlines = tokens.iter().filter(|t| t.kind == TokenKind::Newline).count();
    assert_eq!(newlines, 2);
}

#[test]
fn test_form_feed_is_whitespace() {
    let (tokens, errors) = lex("x\x0c= 1\n");
    assert_eq!(errors, 0);
    assert_eq!(tokens[1].kind, TokenKind::Assignment);
}

#[test]
fn test_line_continuation_joins_statement() {
    let (tokens, errors) = lex("x = 1 + \\\n    2\n");
    assert_eq!(errors, 0);
    // One logical line: exactly one NEWLINE, no INDENT.
    let newlines = tokens.iter().filter(|t| t.kind == TokenKind::Newline).count();
    assert_eq!(newlines, 1);
    assert!(!tokens.iter().any(|t| t.kind == TokenKind::Indent));
}

#[test]
fn test_deep_nesting_closes_all_scopes() {
    let mut source = String::new();
    for depth in 0..12 {
        source.push_str(&"    ".repeat(depth));
        source.push_str("if x:\n");
    }
    source.push_str(&"    ".repeat(12));
    source.push_str("pass\n");

    let (tokens, errors) = lex(&source);
    assert_eq!(errors, 0);
    let indents = tokens.iter().filter(|t| t.kind == TokenKind::Indent).count();
    let dedents = tokens.iter().filter(|t| t.kind == TokenKind::Dedent).count();
    assert_eq!(indents, 12);
    assert_eq!(dedents, 12);
}

/// Randomly nested block structure rendered as well-indented source.
#[derive(Clone, Debug)]
enum BlockTree {
    Statement,
    Block(Vec<BlockTree>),
}

fn block_tree() -> impl Strategy<Value = BlockTree> {
    let leaf = Just(BlockTree::Statement);
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop::collection::vec(inner, 1..4).prop_map(BlockTree::Block)
    })
}

fn render(tree: &BlockTree, depth: usize, out: &mut String) {
    let pad = "    ".repeat(depth);
    match tree {
        BlockTree::Statement => {
            out.push_str(&pad);
            out.push_str("x = 1\n");
        },
        BlockTree::Block(children) => {
            out.push_str(&pad);
            out.push_str("while x:\n");
            for child in children {
                render(child, depth + 1, out);
            }
        },
    }
}

proptest! {
    /// Every INDENT is matched by a DEDENT, for any well-indented
    /// nesting shape.
    #[test]
    fn prop_indents_balance_dedents(trees in prop::collection::vec(block_tree(), 1..4)) {
        let mut source = String::new();
        for tree in &trees {
            render(tree, 0, &mut source);
        }
        let (tokens, errors) = lex(&source);
        prop_assert_eq!(errors, 0);
        let indents = tokens.iter().filter(|t| t.kind == TokenKind::Indent).count();
        let dedents = tokens.iter().filter(|t| t.kind == TokenKind::Dedent).count();
        prop_assert_eq!(indents, dedents);
    }

    /// Blank lines never change the token stream of a well-indented
    /// program (beyond their own absence).
    #[test]
    fn prop_blank_lines_are_invisible(trees in prop::collection::vec(block_tree(), 1..3)) {
        let mut source = String::new();
        for tree in &trees {
            render(tree, 0, &mut source);
        }
        let with_blanks = source.replace('\n', "\n\n");
        let (plain, e1) = lex(&source);
        let (padded, e2) = lex(&with_blanks);
        prop_assert_eq!(e1, 0);
        prop_assert_eq!(e2, 0);
        let plain_kinds: Vec<TokenKind> = plain.iter().map(|t| t.kind).collect();
        let padded_kinds: Vec<TokenKind> = padded.iter().map(|t| t.kind).collect();
        prop_assert_eq!(plain_kinds, padded_kinds);
    }

    /// Newlines are never forwarded while a bracket is open.
    #[test]
    fn prop_no_newline_inside_brackets(args in prop::collection::vec(0i64..100, 1..6)) {
        let rendered: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let source = format!("y = f(\n    {}\n)\n", rendered.join(",\n    "));
        let (tokens, errors) = lex(&source);
        prop_assert_eq!(errors, 0);
        let mut depth = 0i32;
        for token in &tokens {
            if token.kind.is_open_bracket() {
                depth += 1;
            } else if token.kind.is_close_bracket() {
                depth -= 1;
            } else if token.kind == TokenKind::Newline {
                prop_assert_eq!(depth, 0);
            }
        }
    }

    /// Non-keyword identifiers survive the pipeline intact.
    #[test]
    fn prop_identifier_round_trip(word in "[a-zA-Z_][a-zA-Z0-9_]{0,20}") {
        let handler = Handler::new();
        let source = format!("{word}\n");
        let tokens = Lexer::new(&source, &handler).tokenize();
        prop_assert_eq!(handler.count(), 0);
        if tokens[0].kind == TokenKind::Identifier {
            prop_assert_eq!(tokens[0].value.word(), word.as_str());
        }
    }

    /// Decimal integers decode to their own value.
    #[test]
    fn prop_integer_round_trip(n in 0i64..=i64::MAX) {
        let handler = Handler::new();
        let source = format!("{n}\n");
        let tokens = Lexer::new(&source, &handler).tokenize();
        prop_assert_eq!(handler.count(), 0);
        prop_assert_eq!(tokens[0].kind, TokenKind::Number);
        prop_assert_eq!(tokens[0].value.clone(), crate::token::TokenValue::Int(n));
    }
}
