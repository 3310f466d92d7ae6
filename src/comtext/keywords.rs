//! Reserved spellings of the comtext language
//!
//! Every builtin invocation, marker and signature token lives here so the
//! engine, the definition parser and the tests agree on a single spelling.

/// File extensions tried, in order, when resolving a library
pub const FILE_EXTENSIONS: &[&str] = &["ctx", "tex", "sty"];

/// Default library search path
pub const INCLUDE_PATH: &[&str] = &["."];

// front matter
pub const HEADER_MARKER: &str = r"^-{3,}$";

// scope markers
pub const SCOPE_BEGIN: &str = "{";
pub const SCOPE_END: &str = "}";

// special characters
pub const CH_ESCAPE: &str = "\\";
pub const CH_COMMENT: &str = "%";
pub const CH_MATH: &str = "$";

// builtin directives
pub const KW_LOAD_LIBRARY: &str = "\\usepackage";
pub const KW_DEF_MACRO: &str = "\\newcommand";
pub const KW_DEF_ENVIRONMENT: &str = "\\newenvironment";
pub const KW_ENVIRONMENT_BEGIN: &str = "\\begin";
pub const KW_ENVIRONMENT_END: &str = "\\end";
pub const KW_PARAGRAPH: &str = "\\paragraph";

/// Invocation spelling of a user macro
pub fn macro_invocation(name: &str) -> String {
    format!("{}{}", CH_ESCAPE, name)
}

/// Invocation spelling opening a user environment
pub fn environment_begin(name: &str) -> String {
    format!("{}{}{}{}", KW_ENVIRONMENT_BEGIN, SCOPE_BEGIN, name, SCOPE_END)
}

/// Spelling closing a user environment
pub fn environment_end(name: &str) -> String {
    format!("{}{}{}{}", KW_ENVIRONMENT_END, SCOPE_BEGIN, name, SCOPE_END)
}

// definition signatures
pub const DEF_MARKER: char = ':';
pub const DEF_SPLIT: char = ';';
pub const PARAM_LEFT: char = '(';
pub const PARAM_RIGHT: char = ')';
pub const PARAM_SPLIT: char = ',';
pub const PARAM_VERBATIM: char = '*';
pub const PARAM_FORBID_CHARS: &str = "\n !\"#$%&'()*+,-./:;<=>?[\\]^_`{|}~";

pub const LANG_RAW: &str = "raw";
pub const LANG_SCRIPT: &str = "script";

pub const MODE_NORMALIZE: &str = "ctx->ctx";
pub const MODE_DOC: &str = "ctx->doc";
pub const MODE_WEB: &str = "ctx->web";

/// Stay inside (or open) the surrounding paragraph
pub const BREAK_WRAP: &str = "wrapinblk";
/// Close the surrounding paragraph
pub const BREAK_LEAVE: &str = "leaveblk";

/// Prefix marking a parameter reference inside a raw body
pub const RAW_VARIABLE: char = '#';

// paragraph markers, per target
pub const PARA_BEGIN_CTX: &str = "";
pub const PARA_END_CTX: &str = "\n\n";
pub const PARA_BEGIN_DOC: &str = "\n\\paragraph{}\n";
pub const PARA_END_DOC: &str = "\n";
pub const PARA_BEGIN_WEB: &str = "\n<p>";
pub const PARA_END_WEB: &str = "</p>\n";

// math delimiters in web output
pub const MATH_BEGIN_WEB: &str = "\\(";
pub const MATH_END_WEB: &str = "\\)";

/// A fixed-substitution builtin: its spelling in the normalized form, and what
/// it renders to in doc and web output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscapedChar {
    pub name: &'static str,
    pub ctx: &'static str,
    pub doc: &'static str,
    pub web: &'static str,
}

const fn esc(
    name: &'static str,
    ctx: &'static str,
    doc: &'static str,
    web: &'static str,
) -> EscapedChar {
    EscapedChar { name, ctx, doc, web }
}

pub const ESCAPED_CHARS: &[EscapedChar] = &[
    esc("unescape", "\\\\", "\\backslash", "\\"),
    esc("space", "\\ ", "\\ ", "&nbsp;"),
    esc("uncomment", "\\%", "\\%", "%"),
    esc("scope_begin", "\\{", "\\{", "{"),
    esc("scope_end", "\\}", "\\}", "}"),
    esc("dollar", "\\$", "\\$", "$"),
    // web
    esc("dquote", "\"", "\"", "&quot;"),
    esc("ampersand", "&", "\\&", "&amp;"),
    esc("lt", "<", "<", "&lt;"),
    esc("gt", ">", ">", "&gt;"),
    // doc
    esc("lquote", "`", "`", "\u{2018}"),
    esc("rquote", "'", "'", "\u{2019}"),
    esc("ldquote", "``", "``", "\u{201c}"),
    esc("rdquote", "''", "''", "\u{201d}"),
    esc("sharp", "#", "\\#", "#"),
    esc("caret", "^", "\\^", "^"),
    esc("underline", "_", "\\_", "_"),
    esc("tilde", "~", "\\~", "~"),
];
