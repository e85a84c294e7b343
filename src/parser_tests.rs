use crate::{Array, DecodeOptions, Error, ErrorKind, Key, Span, Table, Value, decode, parse};

#[track_caller]
fn ok(input: &str) -> Table {
    ok_with(input, DecodeOptions::default())
}

#[track_caller]
fn ok_with(input: &str, options: DecodeOptions) -> Table {
    match decode(input, None, &options) {
        Ok(root) => root,
        Err(err) => panic!("failed to decode {input:?}: {err}"),
    }
}

#[track_caller]
fn err(input: &str) -> Error {
    err_with(input, DecodeOptions::default())
}

#[track_caller]
fn err_with(input: &str, options: DecodeOptions) -> Error {
    match decode(input, None, &options) {
        Ok(root) => panic!("{input:?} should fail, got {root:?}"),
        Err(err) => err,
    }
}

fn strict() -> DecodeOptions {
    DecodeOptions {
        strict: true,
        ..DecodeOptions::default()
    }
}

#[track_caller]
fn table<'a>(parent: &'a Table, key: &str) -> &'a Table {
    match parent.get(key) {
        Some(Value::Table(t)) => t,
        other => panic!("`{key}` is not a table: {other:?}"),
    }
}

#[track_caller]
fn array<'a>(parent: &'a Table, key: &str) -> &'a Array {
    match parent.get(key) {
        Some(Value::Array(a)) => a,
        other => panic!("`{key}` is not an array: {other:?}"),
    }
}

#[track_caller]
fn int(parent: &Table, key: &str) -> i64 {
    match parent.get(key) {
        Some(Value::Integer(i)) => *i,
        other => panic!("`{key}` is not an integer: {other:?}"),
    }
}

#[track_caller]
fn duplicate_key(err: &Error) -> (&str, Option<Span>) {
    match &err.kind {
        ErrorKind::DuplicateKey { key, first } => (key, *first),
        other => panic!("expected a duplicate key, got {other:?}: {err}"),
    }
}

#[test]
fn empty_and_blank_documents() {
    for input in ["", "\n", "   \n\t\n", "# comment", "# c\r\n\r\n  # c2\n"] {
        assert!(ok(input).is_empty(), "input: {input:?}");
    }
}

#[test]
fn scalars() {
    let root = ok(r#"
str = "hello"
int = 42
neg = -17
float = 3.5
yes = true
no = false
inf = -inf
nan = nan
"#);
    assert_eq!(root.get("str").and_then(Value::as_str), Some("hello"));
    assert_eq!(int(&root, "int"), 42);
    assert_eq!(int(&root, "neg"), -17);
    assert_eq!(root.get("float").and_then(Value::as_float), Some(3.5));
    assert_eq!(root.get("yes").and_then(Value::as_bool), Some(true));
    assert_eq!(root.get("no").and_then(Value::as_bool), Some(false));
    assert_eq!(
        root.get("inf").and_then(Value::as_float),
        Some(f64::NEG_INFINITY)
    );
    assert!(root.get("nan").and_then(Value::as_float).unwrap().is_nan());
}

#[test]
fn keys_keep_document_order() {
    let root = ok("z = 1\na = 2\nm = 3\n[b]\n[c]\n");
    let keys: Vec<String> = root.keys().map(ToString::to_string).collect();
    assert_eq!(keys, ["z", "a", "m", "b", "c"]);
}

#[test]
fn dotted_keys_and_whitespace() {
    let root = ok("a . b = 1\n\"x y\".'z' = 2\n[ t . u ]\nv = 3\n[[ arr ]]\n");
    assert_eq!(int(table(&root, "a"), "b"), 1);
    assert_eq!(int(table(&root, "x y"), "z"), 2);
    assert_eq!(int(table(table(&root, "t"), "u"), "v"), 3);
    assert_eq!(array(&root, "arr").len(), 1);
}

#[test]
fn crlf_documents() {
    let root = ok("a = 1\r\n[b]\r\nc = [\r\n  2,\r\n]\r\n");
    assert_eq!(int(&root, "a"), 1);
    assert_eq!(array(table(&root, "b"), "c").len(), 1);
}

#[test]
fn duplicate_keys() {
    let e = err("a.b = 1\na.b = 2");
    assert_eq!(duplicate_key(&e), ("b", Some(Span::new(2, 3))));
    assert_eq!(e.span, Span::new(10, 11));

    let e = err("a = 1\na = 2");
    assert_eq!(duplicate_key(&e), ("a", Some(Span::new(0, 1))));
    assert_eq!(e.line_info, Some((1, 0)));

    // headers and dotted keys claim their segments
    let e = err("[a.b]\n[a]\nb = 1");
    assert_eq!(duplicate_key(&e).0, "b");
    let e = err("[a]\nb = 1\n[a.b]");
    assert_eq!(duplicate_key(&e), ("b", Some(Span::new(4, 5))));
    let e = err("a = 1\n[a]");
    assert_eq!(duplicate_key(&e), ("a", Some(Span::new(0, 1))));
    assert_eq!(e.span, Span::new(7, 8));

    // a key is checked before its value is read
    let e = err("a = 1\na = \"unterminated");
    duplicate_key(&e);
}

#[test]
fn duplicate_tables() {
    let e = err("[a]\n[a]");
    match &e.kind {
        ErrorKind::DuplicateTable { name, first } => {
            assert_eq!(name, "a");
            assert_eq!(*first, Span::new(0, 3));
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(e.span, Span::new(4, 7));

    let e = err("[a.b]\nx = 1\n[a . b]");
    assert!(
        matches!(&e.kind, ErrorKind::DuplicateTable { name, .. } if name == "a.b"),
        "{e}"
    );

    // tables created by dotted keys cannot get a header afterwards
    let e = err("a.b = 1\n[a]");
    duplicate_key(&e);
    let e = err("[x]\na.b = 1\n[x.a]");
    duplicate_key(&e);
}

#[test]
fn implicit_tables_can_be_declared_later() {
    let root = ok("[a]\nb = 1\n[a.c]");
    let expected: Table = [
        ("b", Value::from(1)),
        ("c", Value::Table(Table::new())),
    ]
    .into_iter()
    .collect();
    assert_eq!(table(&root, "a"), &expected);

    let root = ok("[a.b.c]\nx = 1\n[a]\ny = 2\n[a.b]\nz = 3");
    let a = table(&root, "a");
    assert_eq!(int(a, "y"), 2);
    assert_eq!(int(table(a, "b"), "z"), 3);
    assert_eq!(int(table(table(a, "b"), "c"), "x"), 1);
}

#[test]
fn dotted_key_rules() {
    // extend a table made by an earlier dotted key, then add a sub-table
    let root = ok("[fruit]\napple.color = \"red\"\napple.taste.sweet = true\n[fruit.apple.texture]\nsmooth = true");
    let apple = table(table(&root, "fruit"), "apple");
    assert_eq!(apple.get("color").and_then(Value::as_str), Some("red"));
    assert_eq!(
        table(apple, "taste").get("sweet").and_then(Value::as_bool),
        Some(true)
    );
    assert!(table(apple, "texture").contains_key("smooth"));

    // a scalar is in the way
    let e = err("a = 1\na.b = 2");
    assert!(
        matches!(e.kind, ErrorKind::DottedKeyInvalidType { first: Some(f) } if f == Span::new(0, 1)),
        "{e}"
    );
}

#[test]
fn dotted_keys_through_header_tables() {
    // a dotted key may extend a table opened by an earlier header
    let input = "[a.b]\nc = 1\n[a]\nb.d = 2";
    let root = ok(input);
    let b = table(table(&root, "a"), "b");
    assert_eq!((int(b, "c"), int(b, "d")), (1, 2));

    let root = ok("[a.b.c]\nz = 9\n[a]\nb.c.t = 1");
    let c = table(table(table(&root, "a"), "b"), "c");
    assert_eq!((int(c, "z"), int(c, "t")), (9, 1));

    // keys the header table already holds still conflict
    let e = err("[a.b]\nc = 1\n[a]\nb.c = 2");
    assert_eq!(duplicate_key(&e), ("c", Some(Span::new(6, 7))));

    // strict mode keeps header tables closed to dotted keys
    let e = err_with(input, strict());
    assert!(
        matches!(e.kind, ErrorKind::DottedKeyInvalidType { first: Some(f) } if f == Span::new(3, 4)),
        "{e}"
    );
    assert_eq!(e.span, Span::new(16, 17));
}

#[test]
fn arrays_of_tables() {
    let root = ok("[[a]]\nx=1\n[[a]]\nx=2");
    let a = array(&root, "a");
    assert_eq!(a.len(), 2);
    let expected: Vec<i64> = a
        .iter()
        .map(|v| v.as_table().and_then(|t| t.get("x")).and_then(Value::as_integer).unwrap())
        .collect();
    assert_eq!(expected, [1, 2]);
    assert!(a.iter().all(|v| v.as_table().unwrap().len() == 1));

    let root = ok(r#"
[[fruit]]
name = "apple"

[fruit.physical]
color = "red"

[[fruit.variety]]
name = "red delicious"

[[fruit.variety]]
name = "granny smith"

[[fruit]]
name = "banana"

[[fruit.variety]]
name = "plantain"
"#);
    let fruit = array(&root, "fruit");
    assert_eq!(fruit.len(), 2);
    let apple = fruit[0].as_table().unwrap();
    assert_eq!(
        table(apple, "physical").get("color").and_then(Value::as_str),
        Some("red")
    );
    assert_eq!(array(apple, "variety").len(), 2);
    let banana = fruit[1].as_table().unwrap();
    assert_eq!(array(banana, "variety").len(), 1);
}

#[test]
fn array_of_tables_conflicts() {
    let e = err("[a]\n[[a]]");
    assert!(matches!(e.kind, ErrorKind::RedefineAsArray), "{e}");
    assert_eq!(e.span, Span::new(4, 9));

    let e = err("[[a]]\n[a]");
    duplicate_key(&e);

    let e = err("a = 1\n[[a]]");
    duplicate_key(&e);

    let e = err("[[a]]\n[[a]]\nb = 1\nb = 2");
    duplicate_key(&e);
}

#[test]
fn dotted_key_into_array_of_tables() {
    let input = "[[x.a]]\ny = 0\n[x]\na.z = 1";
    let root = ok(input);
    let a = array(table(&root, "x"), "a");
    let last = a.last().and_then(Value::as_table).unwrap();
    assert_eq!(int(last, "y"), 0);
    assert_eq!(int(last, "z"), 1);

    let e = err_with(input, strict());
    assert!(
        matches!(&e.kind, ErrorKind::ArrayOfTablesIndexed { name } if name == "a"),
        "{e}"
    );
    assert_eq!(e.span, Span::new(18, 19));
}

#[test]
fn inline_values_are_closed() {
    let e = err("a = {x=1}\na.y=2");
    assert!(
        matches!(e.kind, ErrorKind::DottedKeyInvalidType { first: Some(f) } if f == Span::new(0, 1)),
        "{e}"
    );
    assert_eq!(e.span, Span::new(10, 11));

    for input in [
        "a = {x=1}\n[a]",
        "a = {x=1}\n[a.b]",
        "a = {b = {c = 1}}\n[a.b]",
        "a = [{x = 1}]\n[[a]]",
        "a = []\n[[a]]",
    ] {
        let e = err(input);
        assert!(
            matches!(e.kind, ErrorKind::DuplicateKey { .. }),
            "{input:?}: {e}"
        );
    }
}

#[test]
fn strict_reports_inline_reopening() {
    for input in [
        "a = {x=1}\na.y=2",
        "a = {x=1}\n[a]",
        "a = {x=1}\n[a.b]",
        "a = [{x = 1}]\n[[a]]",
    ] {
        let e = err_with(input, strict());
        match &e.kind {
            ErrorKind::InlineClosed { name, first } => {
                assert_eq!(name, "a", "input: {input:?}");
                assert_eq!(*first, Some(Span::new(0, 1)), "input: {input:?}");
            }
            other => panic!("{input:?}: unexpected {other:?}"),
        }
    }

    // everything else behaves as in the normal decoder
    let root = ok_with("[[a]]\nx = 1\n[[a]]\n[a.b]\n[c]\nd.e = 1", strict());
    assert_eq!(array(&root, "a").len(), 2);
    let e = err_with("a.b = 1\na.b = 2", strict());
    duplicate_key(&e);
}

#[test]
fn inline_tables() {
    let root = ok("a = {b.c = 1, b.d = 2, e = {}}\nf = {}\ng = { x = [1, {y = 2}] }");
    let b = table(table(&root, "a"), "b");
    assert_eq!((int(b, "c"), int(b, "d")), (1, 2));
    assert!(table(table(&root, "a"), "e").is_empty());
    assert!(table(&root, "f").is_empty());

    // each inline table is its own scope
    ok("a = {x = 1}\nb = {x = 1}");

    let e = err("a = {x = 1, x = 2}");
    assert_eq!(duplicate_key(&e), ("x", Some(Span::new(5, 6))));
    let e = err("a = {b = {}, b.c = 1}");
    assert!(
        matches!(e.kind, ErrorKind::DottedKeyInvalidType { .. }),
        "{e}"
    );
}

#[test]
fn inline_table_syntax() {
    let wanted = |input: &str| match err(input).kind {
        ErrorKind::Wanted { expected, found } => (expected, found),
        other => panic!("{input:?}: unexpected {other:?}"),
    };
    assert_eq!(wanted("a = {x = 1,}"), ("a table key", "a right brace"));
    assert_eq!(wanted("a = {\nx = 1}"), ("a table key", "a newline"));
    assert_eq!(wanted("a = {x = 1\n}"), ("a comma", "a newline"));
    assert_eq!(wanted("a = {x = 1 y = 2}"), ("a comma", "an identifier"));
    assert_eq!(wanted("a = {x = }"), ("a value", "a right brace"));
}

#[test]
fn enhanced_inline_tables() {
    let options = DecodeOptions {
        enhanced_tables: true,
        ..DecodeOptions::default()
    };
    assert!(options.fancy_tables());
    let root = ok_with("a = {\n  x = 1, # first\n  y = 2,\n}\nb = {x = 1,}", options);
    let a = table(&root, "a");
    assert_eq!((int(a, "x"), int(a, "y")), (1, 2));
    assert_eq!(int(table(&root, "b"), "x"), 1);

    let e = err_with("a = {,}", options);
    assert!(matches!(e.kind, ErrorKind::Wanted { .. }), "{e}");
}

#[test]
fn arrays() {
    let root = ok("a = [\n  1, # one\n  2,\n\n  3\n]\nb = []\nc = [[1, 2], [\"x\"], {k = true}]\nd = [1,]");
    let a: Vec<i64> = array(&root, "a").iter().filter_map(Value::as_integer).collect();
    assert_eq!(a, [1, 2, 3]);
    assert!(array(&root, "b").is_empty());
    let c = array(&root, "c");
    assert_eq!(c.len(), 3);
    assert_eq!(c[0].as_array().map(Array::len), Some(2));
    assert_eq!(array(&root, "d").len(), 1);

    let wanted = |input: &str| match err(input).kind {
        ErrorKind::Wanted { expected, found } => (expected, found),
        other => panic!("{input:?}: unexpected {other:?}"),
    };
    // whitespace alone separates elements
    let root = ok("a = [1 2\n3 # three\n'x']");
    assert_eq!(array(&root, "a").len(), 4);
    assert_eq!(array(&root, "a")[3].as_str(), Some("x"));

    assert_eq!(wanted("a = [\"x\"\"y\"]"), ("a comma", "a string"));
    assert_eq!(wanted("a = [{}{}]"), ("a comma", "a left brace"));
    assert_eq!(wanted("a = [1"), ("a comma", "eof"));
    assert_eq!(wanted("a = [1,,2]"), ("a value", "a comma"));
    assert_eq!(wanted("a = [,]"), ("a value", "a comma"));
    assert!(matches!(err("a = [1,").kind, ErrorKind::UnexpectedEof));
}

#[test]
fn numbers_in_documents() {
    let root = ok("a = 1_000\nb = 0xFF\nc = 0b101\nd = 0o17\ne = +1e3\nf = -0.0");
    assert_eq!(int(&root, "a"), 1000);
    assert_eq!(int(&root, "b"), 255);
    assert_eq!(int(&root, "c"), 5);
    assert_eq!(int(&root, "d"), 15);
    assert_eq!(root.get("e").and_then(Value::as_float), Some(1000.0));
    assert!(root.get("f").and_then(Value::as_float).unwrap().is_sign_negative());

    for bad in ["1__000", "_1000", "1000_", "0x_", "01", "1.", "+0xFF"] {
        let input = format!("a = {bad}");
        let e = err(&input);
        if bad == "_1000" {
            // a leading underscore reads as a bare word
            assert!(matches!(e.kind, ErrorKind::UnquotedString), "{input:?}: {e}");
        } else {
            assert!(matches!(e.kind, ErrorKind::InvalidNumber), "{input:?}: {e}");
        }
        // the whole literal is reported
        assert_eq!(e.span, Span::new(4, 4 + bad.len() as u32), "{input:?}");
    }
}

#[test]
fn unquoted_words() {
    let e = err("a = abc");
    assert!(matches!(e.kind, ErrorKind::UnquotedString));
    assert_eq!(e.span, Span::new(4, 7));
    assert!(matches!(err("a = truex").kind, ErrorKind::UnquotedString));
    assert!(matches!(err("a = infinity").kind, ErrorKind::UnquotedString));
}

#[test]
fn dates_follow_the_option() {
    let input = "a = 1979-05-27\nb = 1979-05-27 07:32:00\nc = 07:32:00.5\nd = 1979-05-27T07:32:00-08:00";
    let root = ok(input);
    assert_eq!(root.get("a"), Some(&Value::from("1979-05-27")));
    assert_eq!(root.get("b"), Some(&Value::from("1979-05-27 07:32:00")));
    assert_eq!(root.get("c"), Some(&Value::from("07:32:00.5")));
    assert_eq!(
        root.get("d"),
        Some(&Value::from("1979-05-27T07:32:00-08:00"))
    );

    let options = DecodeOptions {
        fancy_dates: true,
        ..DecodeOptions::default()
    };
    let root = ok_with(input, options);
    let d = root.get("d").and_then(Value::as_datetime).unwrap();
    assert_eq!(d.offset_hour, -8);
    assert_eq!(d.to_string(), "1979-05-27T07:32:00-08:00");
    let b = root.get("b").and_then(Value::as_datetime).unwrap();
    assert_eq!(b.to_string(), "1979-05-27T07:32:00");

    // invalid dates fail either way
    for options in [DecodeOptions::default(), options] {
        let e = err_with("a = 1979-02-30", options);
        assert!(matches!(e.kind, ErrorKind::InvalidDateTime), "{e}");
        assert_eq!(e.span, Span::new(4, 14));
    }
}

#[test]
fn integer_keys() {
    let input = "1 = \"a\"\n-3 = \"b\"\n01 = \"c\"\n\"2\" = \"d\"\n[404]\nx = 1";
    let options = DecodeOptions {
        int_keys: true,
        ..DecodeOptions::default()
    };
    let root = ok_with(input, options);
    let keys: Vec<&Key> = root.keys().collect();
    assert_eq!(
        keys,
        [
            &Key::Int(1),
            &Key::Int(-3),
            &Key::from("01"),
            &Key::from("2"),
            &Key::Int(404)
        ]
    );
    assert_eq!(root.get_int(-3).and_then(Value::as_str), Some("b"));
    assert!(root.get_int(404).is_some_and(|v| v.as_table().is_some()));

    // integer and quoted keys are distinct entries
    ok_with("1 = 1\n\"1\" = 2", options);
    duplicate_key(&err("1 = 1\n\"1\" = 2"));

    let root = ok(input);
    assert!(root.keys().all(|k| k.as_int().is_none()));
}

#[test]
fn inline_marking() {
    let input = "a = {x = 1}\nb = [1, {y = 2}]\n[c]\n[[d]]\n[e.f]";
    let root = ok(input);
    assert!(!table(&root, "a").is_inline());
    assert!(!array(&root, "b").is_inline());

    let options = DecodeOptions {
        mark_inline: true,
        ..DecodeOptions::default()
    };
    let root = ok_with(input, options);
    assert!(!root.is_inline());
    assert!(table(&root, "a").is_inline());
    let b = array(&root, "b");
    assert!(b.is_inline());
    assert!(b[1].as_table().unwrap().is_inline());
    assert!(!table(&root, "c").is_inline());
    let d = array(&root, "d");
    assert!(!d.is_inline());
    assert!(!d[0].as_table().unwrap().is_inline());
    assert!(!table(&root, "e").is_inline());
}

#[test]
fn range_policies() {
    let root = ok("a = 9223372036854775808\nb = -9223372036854775809\nc = 1e400\nd = 1e-400");
    assert_eq!(root.get("a"), Some(&Value::Float(f64::INFINITY)));
    assert_eq!(root.get("b"), Some(&Value::Float(f64::NEG_INFINITY)));
    assert_eq!(root.get("c").and_then(Value::as_float), Some(f64::INFINITY));
    assert_eq!(root.get("d").and_then(Value::as_float), Some(0.0));

    let overflow = DecodeOptions {
        overflow_errors: true,
        ..DecodeOptions::default()
    };
    for input in ["a = 9223372036854775808", "a = 0xFFFFFFFFFFFFFFFF", "a = -1e400"] {
        let e = err_with(input, overflow);
        assert!(matches!(e.kind, ErrorKind::OutOfRange(_)), "{input:?}: {e}");
    }
    ok_with("a = 1e-400", overflow);

    let underflow = DecodeOptions {
        underflow_errors: true,
        ..DecodeOptions::default()
    };
    let e = err_with("a = 1e-400", underflow);
    assert!(matches!(e.kind, ErrorKind::OutOfRange("f64")), "{e}");
    ok_with("a = 0.0\nb = 1e400", underflow);
}

#[test]
fn defaults_are_extended() {
    let defaults = || {
        let mut server = Table::new();
        server.insert("port", 80);
        let mut element = Table::new();
        element.insert("n", 1);
        let mut list = Array::new();
        list.push(element);
        let mut root = Table::new();
        root.insert("title", "x");
        root.insert("server", server);
        root.insert("list", list);
        root
    };
    let decode_into = |input: &str| decode(input, Some(defaults()), &DecodeOptions::default());

    let root = decode_into("[server]\nhost = \"h\"\n[[list]]\nn = 2\n[extra]").unwrap();
    let server = table(&root, "server");
    assert_eq!(int(server, "port"), 80);
    assert_eq!(server.get("host").and_then(Value::as_str), Some("h"));
    let list = array(&root, "list");
    assert_eq!(list.len(), 2);
    assert_eq!(int(list[1].as_table().unwrap(), "n"), 2);
    assert_eq!(root.get("title").and_then(Value::as_str), Some("x"));
    assert!(root.contains_key("extra"));

    let root = decode_into("server.timeout = 5").unwrap();
    assert_eq!(int(table(&root, "server"), "timeout"), 5);

    for input in ["title = \"y\"", "[server]\nport = 1", "server.port = 1"] {
        let e = decode_into(input).unwrap_err();
        assert_eq!(duplicate_key(&e).1, None, "input: {input:?}");
    }
    let e = decode_into("[title]").unwrap_err();
    duplicate_key(&e);
}

#[test]
fn syntax_errors() {
    let wanted = |input: &str| match err(input).kind {
        ErrorKind::Wanted { expected, found } => (expected, found),
        other => panic!("{input:?}: unexpected {other:?}"),
    };
    assert_eq!(wanted("a = 1 b = 2"), ("newline", "an identifier"));
    assert_eq!(wanted("[a] x"), ("newline", "an identifier"));
    assert_eq!(wanted("[a"), ("a right bracket", "eof"));
    assert_eq!(wanted("[[a]\n"), ("a right bracket", "a newline"));
    assert_eq!(wanted("= 1"), ("a table key", "an equals"));
    assert_eq!(wanted("a 1"), ("an equals", "an identifier"));
    assert_eq!(wanted("a."), ("a table key", "eof"));
    assert_eq!(wanted("a = 1\r"), ("newline", "a newline"));

    let e = err("\rb = 1");
    assert!(matches!(e.kind, ErrorKind::Unexpected('\r')), "{e}");
    let e = err("# a\u{1}b");
    assert!(matches!(e.kind, ErrorKind::Unexpected('\u{1}')), "{e}");
    assert_eq!(e.span, Span::new(3, 4));
}

#[test]
fn missing_value_is_reported_after_equals() {
    let e = err("a = \n");
    assert!(
        matches!(
            e.kind,
            ErrorKind::Wanted {
                expected: "a value",
                found: "a newline"
            }
        ),
        "{e}"
    );
    assert_eq!(e.span.start, 3);
    assert_eq!(e.line_info, Some((0, 3)));
    let context = e.context.as_deref().unwrap();
    let lines: Vec<&str> = context.lines().collect();
    assert_eq!(lines, ["1 | a = ", "  |    ^"]);
    assert_eq!(
        e.to_string(),
        "expected a value, found a newline at line 1 column 4\n1 | a = \n  |    ^"
    );

    let e = err("x = 1\na =");
    assert_eq!(e.span.start, 9);
    assert!(matches!(e.kind, ErrorKind::Wanted { found: "eof", .. }));
    let e = err("a = # no value");
    assert!(matches!(e.kind, ErrorKind::Wanted { found: "a comment", .. }));
}

#[test]
fn error_location_and_context() {
    let input = "[server]\nport = 80x # listen port\nhost = \"localhost\"";
    let e = err(input);
    assert!(matches!(e.kind, ErrorKind::InvalidNumber));
    assert_eq!(e.line_info, Some((1, 7)));
    let message = e.to_string();
    assert!(
        message.starts_with("invalid number at line 2 column 8\n"),
        "{message}"
    );
    assert!(message.contains("2 | port = 80x # listen port\n  |        ^ ***"), "{message}");
    assert!(message.contains("3 | host = \"localhost\""), "{message}");
}

#[test]
fn many_keys_in_one_table() {
    let mut input = String::new();
    for i in 0..40 {
        input.push_str(&format!("k{i} = {i}\n"));
    }
    let root = ok(&input);
    assert_eq!(root.len(), 40);
    assert_eq!(int(&root, "k33"), 33);

    input.push_str("k17 = 0\n");
    let e = err(&input);
    assert_eq!(duplicate_key(&e).0, "k17");
}

#[test]
fn parse_uses_default_options() {
    let input = "when = 1979-05-27\n1 = 1";
    assert_eq!(parse(input).unwrap(), ok(input));
}
