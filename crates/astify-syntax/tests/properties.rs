use astify_syntax::{Error, Grammar, Node, Token, TokenStream, Tokeniser, parse};
use pretty_assertions::assert_eq;
use rstest::rstest;

/// Single-letter ids and parens; everything else is skipped.
fn letters() -> Tokeniser {
    Tokeniser::builder()
        .token("id", "[a-z]")
        .unwrap()
        .token("oparen", r"\(")
        .unwrap()
        .token("cparen", r"\)")
        .unwrap()
        .build()
}

fn identity_parens() -> Grammar {
    Grammar::builder().block("oparen", "cparen").build()
}

fn open_depth(input: &str) -> usize {
    let mut depth = 0usize;
    let mut max = 0;
    for c in input.chars() {
        match c {
            '(' => {
                depth += 1;
                max = max.max(depth);
            }
            ')' => depth -= 1,
            _ => {}
        }
    }
    max
}

#[rstest]
#[case("a")]
#[case("(a)")]
#[case("a(b(c)d)e")]
#[case("((()))")]
#[case("(a)(b)((c))")]
#[case("x(y(z(w)))v")]
fn tree_depth_matches_open_block_depth(#[case] input: &str) {
    let out = parse(&letters(), &identity_parens(), input).unwrap();
    // The wrapping list adds one level.
    assert_eq!(Node::list(out).depth() - 1, open_depth(input));
}

#[rstest]
#[case("a")]
#[case("a(b(c)d)e")]
#[case("(a)(b)((c))")]
#[case("x(y(z(w)))v")]
fn flattening_recovers_token_order(#[case] input: &str) {
    let tokens = letters().tokenise(input).unwrap().into_items();
    let expected: Vec<&Token> = tokens
        .iter()
        .filter(|t| !t.is("oparen") && !t.is("cparen"))
        .collect();

    let out = Node::list(parse(&letters(), &identity_parens(), input).unwrap());
    assert_eq!(out.leaves(), expected);
}

#[test]
fn open_body_close_yields_the_body() {
    let stream: TokenStream = vec![
        Token::bare("open"),
        Token::new("id", "x"),
        Token::new("int", 1),
        Token::bare("close"),
    ]
    .into();
    let grammar = Grammar::builder().block("open", "close").build();
    let out = grammar.astify(stream).unwrap();
    assert_eq!(
        out,
        vec![Node::list(vec![
            Token::new("id", "x").into(),
            Token::new("int", 1).into(),
        ])]
    );
}

#[rstest]
#[case(")", 0)]
#[case("a)", 1)]
#[case("(a))", 3)]
fn close_without_open_is_unbalanced(#[case] input: &str, #[case] at: usize) {
    let err = parse(&letters(), &identity_parens(), input).unwrap_err();
    assert_eq!(
        err,
        Error::UnbalancedDelimiter {
            found: "cparen".into(),
            expected: None,
            position: at,
        }
    );
}

#[test]
fn reversing_reaction() {
    let tokeniser = Tokeniser::builder()
        .rule("word", "[a-z]+", |m| m.text().chars().rev().collect::<String>())
        .unwrap()
        .build();
    let tokens = tokeniser.tokenise("cab").unwrap().into_items();
    assert_eq!(tokens, vec![Token::new("word", "bac")]);
}

#[test]
fn overlapping_rules_both_contribute() {
    let tokeniser = Tokeniser::builder()
        .token("letter", "[a-z]")
        .unwrap()
        .token("vowel", "[aeiou]")
        .unwrap()
        .build();
    let kinds: Vec<String> = tokeniser
        .tokenise("a")
        .unwrap()
        .items()
        .iter()
        .map(|t| t.kind.to_string())
        .collect();
    assert_eq!(kinds, vec!["letter", "vowel"]);
}

#[test]
fn end_to_end_group_wraps_its_body() {
    let grammar = Grammar::builder()
        .block_with("oparen", "cparen", |body, _| {
            Ok(Node::tagged("group", vec![Node::list(body.into_items())]))
        })
        .build();
    let out = parse(&letters(), &grammar, "a(b)").unwrap();
    assert_eq!(Node::list(out).to_string(), r#"[id("a"), group([id("b")])]"#);
}

#[test]
fn scan_until_partitions_the_stream() {
    let mut stream: TokenStream = ["a", "semi", "b", "c", "semi", "d"]
        .into_iter()
        .map(Token::bare)
        .collect();

    let mut segments = Vec::new();
    while !stream.is_eot() {
        let kinds: Vec<String> = stream
            .scan_until("semi")
            .iter()
            .map(|t| t.kind.to_string())
            .collect();
        segments.push(kinds.join(" "));
    }
    assert_eq!(segments, vec!["a semi", "b c semi", "d"]);
}

#[test]
fn scan_moves_one_and_check_stays() {
    let mut stream: TokenStream = ["a", "b", "c"].into_iter().map(Token::bare).collect();
    for expected in 1..=3 {
        stream.check(None).unwrap();
        stream.scan(None).unwrap();
        assert_eq!(stream.pos(), expected);
    }
    assert!(stream.is_eot());
}

#[test]
fn unscan_restores_once() {
    let mut stream: TokenStream = ["a", "b", "c"].into_iter().map(Token::bare).collect();
    stream.scan(None).unwrap();
    stream.skip(None).unwrap();
    stream.unscan();
    assert_eq!(stream.pos(), 1);
    stream.unscan();
    assert_eq!(stream.pos(), 1);
}
