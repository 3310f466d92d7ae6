//! Main module for comtext library functionality

pub mod autobreak;
pub mod config;
pub mod cursor;
pub mod error;
pub mod evaluator;
pub mod frontmatter;
pub mod keywords;
pub mod library;
pub mod loader;
pub mod macros;
pub mod parsing;
pub mod pipeline;
pub mod source;
pub mod target;
pub mod text;
pub mod trie;
