use lifecycle_logger::compiler::RestrictedSandbox;
use lifecycle_logger::{
    compile, message, ChangeHints, Environment, Message, Piece, Record, RichValue, StyleArg, Target,
    Value,
};

const BOLD: &str = "\u{1b}[1m";
const UNBOLD: &str = "\u{1b}[22m";
const ITALIC: &str = "\u{1b}[3m";
const UNITALIC: &str = "\u{1b}[23m";
const CODE: &str = "\u{1b}[96m\u{1b}[1m";
const UNCODE: &str = "\u{1b}[39m\u{1b}[22m";

fn terminal(message: &Message) -> Record {
    compile(message, &ChangeHints::new(), None, &Environment::terminal())
}

fn console(message: &Message) -> Record {
    compile(message, &ChangeHints::new(), None, &Environment::console())
}

fn sandbox() -> Environment {
    Environment::with_policy(Target::Console, RestrictedSandbox)
}

#[test]
fn test_bounded_pairs_open_and_close_once() {
    let cases = [
        ("a *x* b", format!("a {ITALIC}x{UNITALIC} b")),
        ("a **x** b", format!("a {BOLD}x{UNBOLD} b")),
        ("a `x` b", format!("a {CODE}x{UNCODE} b")),
        ("(*x*)", format!("({ITALIC}x{UNITALIC})")),
        ("\"**x**\"", format!("\"{BOLD}x{UNBOLD}\"")),
    ];
    for (input, expected) in cases {
        let record = terminal(&Message::text(input));
        assert_eq!(record.format(), Some(expected.as_str()), "input: {}", input);
    }
}

#[test]
fn test_unbounded_markers_are_literal() {
    for input in ["a*b*c", "2*3*4", "x**y**z", "file_name_here", "it`s"] {
        let record = terminal(&Message::text(input));
        assert_eq!(record.format(), Some(input), "input: {}", input);
    }
}

#[test]
fn test_stray_closing_marker_after_word_is_literal() {
    // Opens after the space, but the second `*` is followed by a letter.
    let record = terminal(&Message::text("a *b*c"));
    assert_eq!(record.format(), Some(format!("a {ITALIC}b*c").as_str()));
}

#[test]
fn test_markers_do_not_leak_between_calls() {
    let first = terminal(&Message::text("*open"));
    assert_eq!(first.format(), Some(format!("{ITALIC}open").as_str()));

    let second = terminal(&Message::text("close*"));
    assert_eq!(second.format(), Some("close*"));
}

#[test]
fn test_values_are_inserted_without_separator() {
    let record = terminal(&message!("n={}s={}b={}", 42, "42", false));
    assert_eq!(record.format(), Some("n=42s=\"42\"b=false"));
    assert!(record.args().is_empty());
}

#[test]
fn test_rich_values_are_passed_out_of_band() {
    let answer = RichValue::new(vec![("answer", 42)]);
    let record = terminal(&message!("The answer is {}", answer.clone()));

    assert_eq!(record.format(), Some("The answer is %o"));
    assert_eq!(record.args().len(), 1);
    match &record.args()[0] {
        StyleArg::Value(v) => assert!(v.ptr_eq(&answer)),
        StyleArg::Style(s) => panic!("unexpected style {}", s),
    }
    assert_eq!(record.to_string(), "The answer is [(\"answer\", 42)]");
}

#[test]
fn test_props_line_styles_placeholder_as_code() {
    let message = Message::new(
        vec!["`<App/>` rendered with props: `".to_string(), "`.".to_string()],
        vec![Value::rich(())],
    );
    let record = terminal(&message);
    assert_eq!(
        record.format(),
        Some(format!("{CODE}<App/>{UNCODE} rendered with props: {CODE}%o{UNCODE}.").as_str())
    );
}

#[test]
fn test_console_directive_count_matches_payloads() {
    let hints: ChangeHints = [0, 2].into_iter().collect();
    let messages = vec![
        Message::text("plain"),
        Message::text("**a** *b* `c` ***d***"),
        message!("`{}` and **{}** and {}", Value::rich(1), "two", Value::rich(3)),
        message!("{}{}{}", 1, 2, 3),
        Message::text("unclosed **bold and *italic"),
    ];
    for message in &messages {
        for trace in [None, Some("app.rs:1")] {
            let record = compile(message, &hints, trace, &Environment::console());
            assert_eq!(record.directive_count(), record.args().len(), "message: {:?}", message);
        }
    }
}

#[test]
fn test_console_code_span() {
    let record = console(&Message::text("run `ls`"));
    assert_eq!(record.format(), Some("run %cls%c"));
    let styles: Vec<String> = record
        .args()
        .iter()
        .filter_map(|a| match a {
            StyleArg::Style(s) => Some(s.clone()),
            StyleArg::Value(_) => None,
        })
        .collect();
    assert_eq!(
        styles,
        vec![
            "background: hsla(0,0%,70%,.3); border-radius:3px; padding: 0 2px;",
            "background: unset;"
        ]
    );
}

#[test]
fn test_console_changed_highlight_merges_with_open_code() {
    let hints: ChangeHints = [0].into_iter().collect();
    let record = compile(&message!("x: `{}`", 5), &hints, None, &Environment::console());
    assert_eq!(record.format(), Some("x: %c5%c"));
    match &record.args()[0] {
        StyleArg::Style(s) => {
            assert!(s.starts_with("background: hsla"));
            assert!(s.contains("text-decoration-style: wavy"));
        }
        StyleArg::Value(_) => panic!("expected style"),
    }
}

#[test]
fn test_console_trace_suffix() {
    let env = Environment::console();
    let record = compile(&Message::text("hi"), &ChangeHints::new(), Some("app.rs:9"), &env);
    assert_eq!(record.format(), Some("hi%c(@ app.rs:9)"));
    assert_eq!(record.args().len(), 1);
}

#[test]
fn test_sandbox_without_rich_values_keeps_styling() {
    let record = compile(&message!("**n** = {}", 1), &ChangeHints::new(), None, &sandbox());
    assert_eq!(record.format(), Some("%cn%c = 1"));
}

#[test]
fn test_sandbox_with_rich_value_degrades_to_plain() {
    let user = RichValue::new("user");
    let record = compile(
        &message!("**user** {} has name {} ok", user.clone(), "ada"),
        &ChangeHints::new(),
        Some("app.rs:3"),
        &sandbox(),
    );

    let Record::Plain(pieces) = &record else { panic!("expected plain record") };
    assert_eq!(pieces.len(), 6);
    assert!(matches!(&pieces[0], Piece::Text(t) if t == "user"));
    assert!(matches!(&pieces[1], Piece::Value(Value::Rich(v)) if v.ptr_eq(&user)));
    assert!(matches!(&pieces[2], Piece::Text(t) if t == "has name"));
    assert!(matches!(&pieces[3], Piece::Text(t) if t == "\"ada\""));
    assert!(matches!(&pieces[4], Piece::Text(t) if t == "ok"));
    assert!(matches!(&pieces[5], Piece::Text(t) if t == " (@ app.rs:3)"));
    assert_eq!(record.rich_values().len(), 1);
}

#[test]
fn test_sandbox_trims_exactly_one_space() {
    let message = message!("a  {}  b", Value::rich(0));
    let record = compile(&message, &ChangeHints::new(), None, &sandbox());
    let Record::Plain(pieces) = &record else { panic!("expected plain record") };
    assert!(matches!(&pieces[0], Piece::Text(t) if t == "a "));
    assert!(matches!(&pieces[2], Piece::Text(t) if t == " b"));
    assert_eq!(record.to_string(), "a  0  b");
}

#[test]
fn test_empty_message_produces_empty_record() {
    let record = terminal(&Message::default());
    assert_eq!(record.format(), Some(""));
}

#[test]
fn test_literal_percent_never_becomes_a_directive() {
    let record = console(&Message::text("50%off today"));
    assert_eq!(record.format(), Some("50%%off today"));
    assert_eq!(record.directive_count(), 0);
    assert_eq!(record.to_string(), "50%off today");

    let user = RichValue::new("USER");
    let record = terminal(&message!("50%off for {}", user.clone()));
    assert_eq!(record.format(), Some("50%%off for %o"));
    assert_eq!(record.directive_count(), record.args().len());
    assert_eq!(record.to_string(), "50%off for \"USER\"");

    let record = console(&message!("**100%** of {}, rate {}", user, "9%"));
    assert_eq!(record.format(), Some("%c100%%%c of %o, rate \"9%%\""));
    assert_eq!(record.directive_count(), record.args().len());
    assert_eq!(record.to_string(), "100% of \"USER\", rate \"9%\"");
}

#[test]
fn test_plain_records_keep_percent_verbatim() {
    let message = message!("5% of {}", Value::rich(0));
    let record = compile(&message, &ChangeHints::new(), None, &sandbox());
    assert_eq!(record.directive_count(), 0);
    assert_eq!(record.to_string(), "5% of 0");
}
