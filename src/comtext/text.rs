//! Indentation helpers shared by definition bodies and environments

/// Number of leading spaces
pub fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

/// Minimum indentation over the non-blank lines of `text`
pub fn block_indent(text: &str) -> Option<usize> {
    text.split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(indent_of)
        .min()
}

/// Remove up to `count` leading spaces from every line
pub fn strip_indent(text: &str, count: usize) -> String {
    text.split('\n')
        .map(|line| {
            let strip = indent_of(line).min(count);
            &line[strip..]
        })
        .collect::<Vec<_>>()
        .join("\n")
}
