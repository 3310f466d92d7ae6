//! Library inclusion through `\usepackage` and preloading

use comtext::comtext::loader::{DocumentLoader, LoaderError};
use comtext::{CompileOptions, Compiler, ErrorCause, Target};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const STYLE: &str = "---\nname: style\n---\n\\newcommand{em: raw(x) ctx->web}{<em>#x</em>}\n";

fn write(dir: &Path, name: &str, text: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, text).unwrap();
}

fn compile_file(path: &Path, options: CompileOptions, target: Target) -> Result<String, LoaderError> {
    let compiler = Compiler::new(options);
    DocumentLoader::from_path(path)?
        .compile(&compiler, target)
        .map(|output| output.document)
}

#[test]
fn library_next_to_the_document() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "style.sty", STYLE);
    write(dir.path(), "main.ctx", "\\usepackage{style}\nAn \\em{example}.");

    let out = compile_file(&dir.path().join("main.ctx"), CompileOptions::default(), Target::Web)
        .unwrap();
    assert_eq!(out, "\n<p>An <em>example</em>.</p>\n");
}

#[test]
fn library_from_an_include_directory() {
    let dir = TempDir::new().unwrap();
    let shared = TempDir::new().unwrap();
    write(shared.path(), "style.ctx", STYLE);
    write(dir.path(), "main.ctx", "\\usepackage{style.ctx}\n\\em{x}");

    let options = CompileOptions {
        include_path: vec![shared.path().to_path_buf()],
        ..CompileOptions::default()
    };
    let out = compile_file(&dir.path().join("main.ctx"), options, Target::Web).unwrap();
    assert_eq!(out, "\n<p><em>x</em></p>\n");
}

#[test]
fn relative_include_directory_resolves_against_the_document() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "doc/lib/style.tex", STYLE);
    write(dir.path(), "doc/main.ctx", "\\usepackage{style}\n\\em{y}");

    let options = CompileOptions {
        include_path: vec!["lib".into()],
        ..CompileOptions::default()
    };
    let out = compile_file(&dir.path().join("doc/main.ctx"), options, Target::Web).unwrap();
    assert_eq!(out, "\n<p><em>y</em></p>\n");
}

#[test]
fn preloaded_libraries_apply_to_the_document() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "style.ctx", STYLE);
    write(dir.path(), "main.ctx", "\\em{z}");

    let options = CompileOptions {
        preload: vec!["style".into()],
        ..CompileOptions::default()
    };
    let out = compile_file(&dir.path().join("main.ctx"), options, Target::Web).unwrap();
    assert_eq!(out, "\n<p><em>z</em></p>\n");
}

#[test]
fn include_cycles_are_loaded_once() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "a.ctx", "\\usepackage{b}\n\\newcommand{fa: raw()}{A}\n");
    write(dir.path(), "b.ctx", "\\usepackage{a}\n\\newcommand{fb: raw()}{B}\n");
    write(dir.path(), "main.ctx", "\\usepackage{a}\n\\usepackage{b}\n\\fa \\fb");

    let out = compile_file(&dir.path().join("main.ctx"), CompileOptions::default(), Target::Normalize)
        .unwrap();
    assert_eq!(out, "A B\n\n");
}

#[test]
fn missing_library_points_at_the_include() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "main.ctx", "text\n\\usepackage{absent}");

    let err = compile_file(&dir.path().join("main.ctx"), CompileOptions::default(), Target::Web)
        .unwrap_err();
    let err = match err {
        LoaderError::ParseError(err) => err,
        other => panic!("expected a parse error, got {:?}", other),
    };
    assert_eq!(err.cause, ErrorCause::FileNotFound("absent".into()));
    assert_eq!(err.file, "main.ctx");
    assert_eq!((err.row, err.col), (1, 19));
}

#[test]
fn errors_inside_a_library_name_the_library() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "broken.ctx", "\n\\newcommand{oops}{x}\n");
    write(dir.path(), "main.ctx", "\\usepackage{broken}");

    let err = compile_file(&dir.path().join("main.ctx"), CompileOptions::default(), Target::Web)
        .unwrap_err();
    let err = match err {
        LoaderError::ParseError(err) => err,
        other => panic!("expected a parse error, got {:?}", other),
    };
    assert_eq!(err.cause, ErrorCause::MissingDefMarker);
    assert_eq!(err.file, "broken.ctx");
    assert_eq!(err.row, 1);
}
