//! A toy Ruby grammar exercising blocks, groups and lookahead together.

use astify_syntax::{Grammar, Node, Token, TokenKind, TokenStream, Tokeniser, Value, parse};
use insta::assert_snapshot;

fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

fn ruby_tokeniser() -> Tokeniser {
    Tokeniser::builder()
        .anonymous_rule("[A-Za-z_][A-Za-z0-9_]*", |m| match m.text() {
            keyword @ ("class" | "def" | "return" | "end") => Token::bare(keyword),
            word => Token::new("id", word),
        })
        .unwrap()
        .rule("int", "[0-9]+", |m| m.text().parse::<i64>().ok())
        .unwrap()
        .rule("op", "[-+*/]", |m| Token::new("id", TokenKind::from(m.text())))
        .unwrap()
        .rule("oparen", r"\(", |_| Token::bare("oparen"))
        .unwrap()
        .rule("cparen", r"\)", |_| Token::bare("cparen"))
        .unwrap()
        .discard("ws", r"[\s,]+")
        .unwrap()
        .build()
}

fn name_of(node: &Node) -> Node {
    let text = node.as_token().and_then(Token::text).unwrap_or_default();
    Token::new("name", text).into()
}

fn lvar(token: Token) -> Node {
    Token::new("lvar", token.text().unwrap_or_default()).into()
}

fn local(node: Node) -> Node {
    match node {
        Node::Leaf(token) if token.is("id") => lvar(token),
        other => other,
    }
}

fn ruby_grammar() -> Grammar {
    Grammar::builder()
        .named_block("args", "oparen", "cparen")
        .named_block_with("class", "class", "end", |mut body, _| {
            let name = name_of(body.scan(Some("id"))?);
            let mut children = vec![name, Token::new("const", TokenKind::from("Object")).into()];
            children.extend(body.rest().iter().cloned());
            Ok(Node::tagged("class", children))
        })
        .named_block_with("defn", "def", "end", |mut body, _| {
            let name = name_of(body.scan(Some("id"))?);
            let args = if body.check(Some("args")).is_ok() {
                body.scan(None)?.clone()
            } else {
                Node::tagged("args", vec![])
            };
            let mut statements = vec![args];
            statements.extend(body.rest().iter().cloned());
            Ok(Node::tagged(
                "defn",
                vec![
                    name,
                    Node::tagged("scope", vec![Node::tagged("block", statements)]),
                ],
            ))
        })
        .group("var", ["int", "id"])
        // `n1 + n2` becomes call(lvar, op, array(operand))
        .token("id", |token, tree, grammar| {
            if token.value.as_ref().and_then(Value::as_symbol).is_some() {
                return Ok(token.into());
            }
            let operator = tree
                .check(Some("id"))
                .ok()
                .and_then(Node::as_token)
                .and_then(|next| next.value.as_ref())
                .and_then(Value::as_symbol)
                .cloned();
            let receiver = lvar(token);
            let Some(op) = operator else {
                return Ok(receiver);
            };
            tree.skip(None)?;
            let operand = local(tree.scan_group(grammar.require_group("var")?)?.clone());
            Ok(Node::tagged(
                "call",
                vec![
                    receiver,
                    Token::new("op", op).into(),
                    Node::tagged("array", vec![operand]),
                ],
            ))
        })
        .build()
}

#[test]
fn class_with_method() {
    init_logging();
    let source = "class Simple\n  def add(n1, n2)\n    return n1 + n2\n  end\nend\n";
    let out = parse(&ruby_tokeniser(), &ruby_grammar(), source).unwrap();
    assert_snapshot!(
        Node::list(out).to_string(),
        @r#"[class(name("Simple"), const(:Object), defn(name("add"), scope(block(args(lvar("n1"), lvar("n2")), return, call(lvar("n1"), op(:+), array(lvar("n2")))))))]"#
    );
}

#[test]
fn method_without_args() {
    init_logging();
    let source = "def answer\n  return 42\nend";
    let out = parse(&ruby_tokeniser(), &ruby_grammar(), source).unwrap();
    assert_snapshot!(
        Node::list(out).to_string(),
        @r#"[defn(name("answer"), scope(block(args(), return, int(42))))]"#
    );
}

#[test]
fn missing_end_is_reported() {
    let err = parse(&ruby_tokeniser(), &ruby_grammar(), "class Simple def add end").unwrap_err();
    assert_snapshot!(
        err.to_string(),
        @"block opened by `class` at position 0 is never closed by `end`"
    );
}

#[test]
fn readme_method() {
    init_logging();
    // def my_method(arg) return arg + 3 end
    let tokens: TokenStream = vec![
        Token::bare("def"),
        Token::new("id", "my_method"),
        Token::bare("oparen"),
        Token::new("id", "arg"),
        Token::bare("cparen"),
        Token::bare("return"),
        Token::new("id", "arg"),
        Token::new("id", TokenKind::from("+")),
        Token::new("int", 3),
        Token::bare("end"),
    ]
    .into();

    let grammar = Grammar::builder()
        .block("def", "end")
        .block("oparen", "cparen")
        .group("var", ["int", "id"])
        .token("id", |token, tree, grammar| {
            match token.value.as_ref().and_then(Value::as_symbol).cloned() {
                Some(op) => {
                    let operand = tree.scan_group(grammar.require_group("var")?)?.clone();
                    Ok(Node::list(vec![Token::new("call", op).into(), operand]))
                }
                None => Ok(token.into()),
            }
        })
        .build();

    let out = grammar.astify(tokens).unwrap();
    assert_snapshot!(
        Node::list(out).to_string(),
        @r#"[[id("my_method"), [id("arg")], return, id("arg"), [call(:+), int(3)]]]"#
    );
}
