use pyml::line::{self, LineKind, classify, read_lines, split_lines};

#[test]
fn each_construct_has_its_kind() {
    let cases = [
        ("", LineKind::Comment),
        ("# a note", LineKind::Comment),
        ("packages:", LineKind::SectionHeader),
        ("function greet define name:", LineKind::FunctionDef),
        ("for i in range.3:", LineKind::Loop),
        ("for k, v in config:", LineKind::Loop),
        ("print: x", LineKind::Print),
        ("print:", LineKind::Print),
        ("x: 5", LineKind::Assignment),
        ("self.count: 0", LineKind::Assignment),
        ("items:", LineKind::Assignment),
        ("if x > 3:", LineKind::Control),
        ("elif x < 0:", LineKind::Control),
        ("else:", LineKind::Control),
        ("while running:", LineKind::Control),
        ("try:", LineKind::Control),
        ("except ValueError:", LineKind::Control),
        ("finally:", LineKind::Control),
        ("with open(path) as fh:", LineKind::Control),
        ("greet;", LineKind::BareCall),
        ("return x", LineKind::Unknown),
        ("print(x)", LineKind::Unknown),
        ("- item", LineKind::Unknown),
    ];
    for (text, kind) in cases {
        assert_eq!(classify(text), kind, "classifying {:?}", text);
    }
}

#[test]
fn first_matching_rule_wins() {
    // A print line that also has a colon later on is still a print.
    assert_eq!(classify("print: a: b"), LineKind::Print);
    // Prefix keywords need the trailing space.
    assert_eq!(classify("formatted: 1"), LineKind::Assignment);
    assert_eq!(classify("function_name: 1"), LineKind::Assignment);
    // A control line ending in `;` is still control.
    assert_eq!(classify("else: pass;"), LineKind::Control);
}

#[test]
fn colons_inside_brackets_and_strings_are_not_assignments() {
    assert_eq!(classify("d = {\"a\": 1}"), LineKind::Unknown);
    assert_eq!(classify("call(\"x: y\")"), LineKind::Unknown);
    assert_eq!(classify("s = x[1:2]"), LineKind::Unknown);
}

#[test]
fn malformed_constructs_keep_their_kind() {
    // Classification only looks at the shape; the emitter rejects the details.
    assert_eq!(classify("for x in 3:"), LineKind::Loop);
    assert_eq!(classify("function f:"), LineKind::FunctionDef);
}

#[test]
fn width_and_level() {
    let lines = read_lines("a: 1\n  b: 2\n   c: 3\n\td: 4\n", false);
    let widths: Vec<usize> = lines.iter().map(|l| l.width).collect();
    assert_eq!(widths, vec![0, 2, 3, 1]);
    let levels: Vec<usize> = lines.iter().map(|l| l.level()).collect();
    assert_eq!(levels, vec![0, 1, 1, 0]);
    assert!(lines[2].is_misaligned());
    assert!(!lines[1].is_misaligned());
    assert_eq!(line::indent_width("    x"), 4);
}

#[test]
fn lines_carry_trimmed_text_and_spans() {
    let source = "\u{feff}x: 1\r\n  print: x  \r\n";
    let lines = read_lines(source, false);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].text, "x: 1");
    assert_eq!(lines[0].number, 1);
    assert_eq!(&source[lines[0].span.clone()], "x: 1");
    assert_eq!(lines[1].raw, "  print: x");
    assert_eq!(lines[1].text, "print: x");
    assert_eq!(lines[1].kind, LineKind::Print);
    assert_eq!(&source[lines[1].span.clone()], "  print: x  ");
}

#[test]
fn split_without_trailing_newline() {
    let pieces = split_lines("a\nb");
    let texts: Vec<&str> = pieces.iter().map(|(_, _, t)| *t).collect();
    assert_eq!(texts, vec!["a", "b"]);
    assert!(split_lines("").is_empty());
}

#[test]
fn parallel_classification_preserves_order() {
    let mut source = String::new();
    for i in 0..(line::PARALLEL_THRESHOLD + 100) {
        match i % 4 {
            0 => source.push_str(&format!("x{}: {}\n", i, i)),
            1 => source.push_str("  print: x\n"),
            2 => source.push_str("# comment\n"),
            _ => source.push_str("call;\n"),
        }
    }
    let sequential = read_lines(&source, false);
    let parallel = read_lines(&source, true);
    assert_eq!(sequential, parallel);
    assert_eq!(parallel[4].text, "x4: 4");
    assert_eq!(parallel[7].kind, LineKind::BareCall);
}
