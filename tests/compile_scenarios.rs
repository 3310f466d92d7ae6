//! End-to-end compilation scenarios across the three targets

use comtext::{CompileOptions, Compiler, ErrorCause, ParserError, Source, Target};
use rstest::rstest;

fn compile(text: &str, target: Target) -> String {
    Compiler::new(CompileOptions::default())
        .compile(&Source::from_string(text), target)
        .unwrap_or_else(|err| panic!("compile failed: {}", err))
        .document
}

fn compile_err(text: &str, target: Target) -> ParserError {
    Compiler::new(CompileOptions::default())
        .compile(&Source::from_string(text), target)
        .expect_err("compilation to fail")
}

const GREET: &str = "\\newcommand{greet: raw() ctx->ctx}{Hello}\n\\greet{}";
const QUOTE: &str =
    "\\newenvironment{quote: raw(*body); ctx->ctx}{<<#body>>}\n\\begin{quote}\ntext\n\\end{quote}";

#[rstest]
#[case::greet_ctx(GREET, Target::Normalize, "Hello\n\n")]
#[case::greet_doc(GREET, Target::Doc, "\n\\paragraph{}\nHello\n")]
#[case::greet_web(GREET, Target::Web, "\n<p>Hello</p>\n")]
#[case::quote_ctx(QUOTE, Target::Normalize, "<<text>>\n\n")]
#[case::quote_doc(QUOTE, Target::Doc, "\n\\paragraph{}\n<<text>>\n")]
#[case::quote_web(QUOTE, Target::Web, "\n<p>&lt;&lt;text&gt;&gt;</p>\n")]
fn macro_scenarios(#[case] text: &str, #[case] target: Target, #[case] expected: &str) {
    assert_eq!(compile(text, target), expected);
}

#[rstest]
#[case::paragraphs(
    "First line\nsecond line.\n\n\nNext paragraph.",
    Target::Web,
    "\n<p>First line second line.</p>\n\n<p>Next paragraph.</p>\n"
)]
#[case::html_specials(
    "Fish & chips: 100\\% <fresh>",
    Target::Web,
    "\n<p>Fish &amp; chips: 100% &lt;fresh&gt;</p>\n"
)]
#[case::doc_specials("a_b ~ c", Target::Doc, "\n\\paragraph{}\na\\_b \\~ c\n")]
#[case::math_web(
    "Euler: $e^{i\\pi}$",
    Target::Web,
    "\n<p>Euler: \\(e^{i\\pi}\\)</p>\n"
)]
#[case::comment("keep % drop\nthis", Target::Normalize, "keep this\n\n")]
#[case::escapes_survive_normalize(
    "\\{ \\} \\\\ \\$",
    Target::Normalize,
    "\\{ \\} \\\\ \\$\n\n"
)]
fn builtin_scenarios(#[case] text: &str, #[case] target: Target, #[case] expected: &str) {
    assert_eq!(compile(text, target), expected);
}

#[test]
fn web_macro_fires_only_in_web_pass() {
    let text = "\\newcommand{em: raw(x) ctx->web}{<em>#x</em>}\nSome \\em{bold} text.";
    assert_eq!(compile(text, Target::Normalize), "Some \\em{bold} text.\n\n");
    assert_eq!(compile(text, Target::Web), "\n<p>Some <em>bold</em> text.</p>\n");
}

#[test]
fn normalize_macro_may_produce_render_macros() {
    let text = [
        "\\newcommand{em: raw(x) ctx->web}{<em>#x</em>}",
        "\\newcommand{strong: raw(x)}{",
        "    \\em{#x}!",
        "}",
        "A \\strong{b}",
    ]
    .join("\n");
    assert_eq!(compile(&text, Target::Normalize), "A \\em{b}!\n\n");
    assert_eq!(compile(&text, Target::Web), "\n<p>A <em>b</em>!</p>\n");
}

#[test]
fn verbatim_argument_ends_at_first_brace() {
    let define = "\\newcommand{show: raw(*x) ctx->web}{[#x]}\n";
    let text = format!("{}\\show{{a{{b}}c", define);
    assert_eq!(compile(&text, Target::Web), "\n<p>[a{b]c</p>\n");

    let text = format!("{}\\show{{a}}b}}", define);
    let err = compile_err(&text, Target::Web);
    assert_eq!(err.cause, ErrorCause::UnexpectedEndMarker("}".into()));
}

#[test]
fn second_language_binding_is_accepted() {
    let text = "\\newcommand{m: raw(a) ctx->ctx}{<#a>}\n\\newcommand{m: script(a) ctx->ctx}{a}\n\\m{x}";
    assert_eq!(compile(text, Target::Normalize), "<x>\n\n");
}

#[rstest]
#[case::unknown_function("\\unknown", ErrorCause::UnknownFunction, (0, 1))]
#[case::stray_brace("text }", ErrorCause::UnexpectedEndMarker("}".into()), (0, 6))]
#[case::missing_marker("\\newcommand{m raw()}{x}", ErrorCause::MissingDefMarker, (0, 20))]
#[case::param_mismatch(
    "\\newcommand{m: raw()}{x}\n\\newcommand{m: raw(a)}{y}",
    ErrorCause::ParamMismatch,
    (1, 25)
)]
#[case::mode_mismatch(
    "\\newcommand{m: raw()}{x}\n\\newcommand{m: script() ctx->web}{y}",
    ErrorCause::ParamMismatch,
    (1, 36)
)]
#[case::conflict_code(
    "\\newcommand{m: raw()}{x}\n\\newcommand{m: raw()}{y}",
    ErrorCause::ConflictCode,
    (1, 24)
)]
#[case::unknown_environment(
    "\\begin{nothing}",
    ErrorCause::UnknownEnvironment("nothing".into()),
    (0, 15)
)]
fn error_scenarios(
    #[case] text: &str,
    #[case] cause: ErrorCause,
    #[case] position: (usize, usize),
) {
    let err = compile_err(text, Target::Web);
    assert_eq!(err.cause, cause);
    assert_eq!((err.row, err.col), position);
    assert_eq!(err.file, "<string>");
}

#[test]
fn kitchen_sink_web() {
    let text = [
        "---",
        "title: Demo",
        "---",
        "\\newcommand{em: raw(x) ctx->web}{<em>#x</em>}",
        "\\newenvironment{note: raw(*body); leaveblk ctx->web}{",
        "    <aside>#body</aside>",
        "}",
        "",
        "Intro with \\em{style}.",
        "",
        "\\begin{note}",
        "Be careful.",
        "\\end{note}",
        "Done.",
        "",
    ]
    .join("\n");
    let output = Compiler::new(CompileOptions::default())
        .compile(&Source::from_string(text.as_str()), Target::Web)
        .unwrap();
    assert_eq!(output.headers["title"].as_str(), Some("Demo"));
    insta::assert_debug_snapshot!(output.document, @r###""\n<p>Intro with <em>style</em>.</p>\n<aside>Be careful.</aside>\n<p>Done.</p>\n""###);
}
