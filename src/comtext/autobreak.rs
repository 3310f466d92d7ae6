//! Paragraph synthesis for literal text
//!
//! Runs of source text separated by blank lines become explicit paragraphs in
//! the active target. Inside a paragraph any run of spaces and single line
//! breaks collapses to one space; two or more line breaks end the paragraph.
//! Leading whitespace before the first visible character is dropped.
//!
//! The engine can be suspended (`enabled = false`) while macro arguments are
//! read: arguments never get paragraph markers, and blank lines inside them
//! degrade to a single space.

use crate::comtext::target::Target;

#[derive(Debug, Clone)]
pub struct AutoBreak {
    opened: bool,
    pending_space: bool,
    pending_breaks: usize,
    enabled: bool,
    /// The begin marker of the open paragraph was emitted
    begun: bool,
    begin_marker: &'static str,
    end_marker: &'static str,
}

impl AutoBreak {
    pub fn new(begin_marker: &'static str, end_marker: &'static str) -> Self {
        Self {
            opened: false,
            pending_space: false,
            pending_breaks: 0,
            enabled: true,
            begun: false,
            begin_marker,
            end_marker,
        }
    }

    pub fn for_target(target: Target) -> Self {
        let (begin, end) = target.paragraph_markers();
        Self::new(begin, end)
    }

    /// An engine that never emits paragraph markers
    pub fn disabled(target: Target) -> Self {
        let mut autobreak = Self::for_target(target);
        autobreak.enabled = false;
        autobreak
    }

    pub fn is_open(&self) -> bool {
        self.opened
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disable marker emission, returning the previous setting for [`restore`](Self::restore)
    pub fn suspend(&mut self) -> bool {
        std::mem::replace(&mut self.enabled, false)
    }

    pub fn restore(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn clear_pending(&mut self) {
        self.pending_space = false;
        self.pending_breaks = 0;
    }

    /// Transform one literal character into the text to emit
    pub fn process(&mut self, ch: char) -> String {
        match ch {
            ' ' => {
                if self.opened && self.pending_breaks == 0 {
                    self.pending_space = true;
                }
                String::new()
            }
            '\n' => {
                if self.opened {
                    self.pending_space = true;
                    self.pending_breaks += 1;
                }
                String::new()
            }
            _ => self.process_visible(ch),
        }
    }

    fn process_visible(&mut self, ch: char) -> String {
        let mut out = String::new();
        if !self.opened {
            self.opened = true;
            if self.enabled {
                self.begun = true;
                out.push_str(self.begin_marker);
            }
            out.push(ch);
            return out;
        }
        if self.pending_space {
            self.pending_space = false;
            if self.pending_breaks < 2 || !self.enabled {
                self.pending_breaks = 0;
                out.push(' ');
                out.push(ch);
                return out;
            }
        }
        if self.pending_breaks > 0 {
            self.pending_breaks = 0;
            if self.enabled {
                if self.begun {
                    out.push_str(self.end_marker);
                }
                out.push_str(self.begin_marker);
                self.begun = true;
            }
        }
        out.push(ch);
        out
    }

    /// Open a paragraph, or with `reopen` start a fresh one
    pub fn open(&mut self, reopen: bool) -> String {
        let mut out = String::new();
        if self.opened {
            if !reopen {
                return out;
            }
            out.push_str(&self.close());
        }
        self.opened = true;
        self.clear_pending();
        if self.enabled {
            self.begun = true;
            out.push_str(self.begin_marker);
        }
        out
    }

    pub fn close(&mut self) -> String {
        if !self.opened {
            return String::new();
        }
        self.opened = false;
        self.clear_pending();
        if std::mem::take(&mut self.begun) {
            self.end_marker.to_string()
        } else {
            String::new()
        }
    }

    /// Settle pending whitespace before a macro boundary.
    ///
    /// A full blank line ends the paragraph; anything less becomes one space.
    pub fn flush(&mut self) -> String {
        if !self.opened {
            return String::new();
        }
        if self.pending_breaks >= 2 && self.enabled {
            return self.close();
        }
        let out = if self.pending_space || self.pending_breaks > 0 {
            " ".to_string()
        } else {
            String::new()
        };
        self.clear_pending();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(autobreak: &mut AutoBreak, text: &str) -> String {
        let mut out: String = text.chars().map(|ch| autobreak.process(ch)).collect();
        out.push_str(&autobreak.close());
        out
    }

    #[test]
    fn blank_line_starts_one_new_paragraph() {
        let mut ab = AutoBreak::for_target(Target::Web);
        assert_eq!(run(&mut ab, "a\n\nb"), "\n<p>a</p>\n\n<p>b</p>\n");
    }

    #[test]
    fn many_blank_lines_collapse_to_one_boundary() {
        let mut ab = AutoBreak::for_target(Target::Web);
        assert_eq!(run(&mut ab, "a\n\n\n\n  b"), "\n<p>a</p>\n\n<p>b</p>\n");
    }

    #[test]
    fn single_line_break_is_a_space() {
        let mut ab = AutoBreak::new("", "");
        assert_eq!(run(&mut ab, "a\nb"), "a b");
    }

    #[test]
    fn spaces_collapse_and_leading_whitespace_drops() {
        let mut ab = AutoBreak::new("", "");
        assert_eq!(run(&mut ab, "\n\n   a    b  \n c"), "a b c");
    }

    #[test]
    fn trailing_blank_lines_leave_no_dangling_marker() {
        let mut ab = AutoBreak::for_target(Target::Web);
        assert_eq!(run(&mut ab, "a\n\n\n"), "\n<p>a</p>\n");
    }

    #[test]
    fn empty_input_emits_nothing() {
        let mut ab = AutoBreak::for_target(Target::Doc);
        assert_eq!(run(&mut ab, "  \n\n "), "");
    }

    #[test]
    fn disabled_engine_degrades_breaks_to_spaces() {
        let mut ab = AutoBreak::disabled(Target::Web);
        assert_eq!(run(&mut ab, "a\n\nb c"), "a b c");
    }

    #[test]
    fn reopen_closes_the_current_paragraph() {
        let mut ab = AutoBreak::for_target(Target::Web);
        let mut out = run_without_close(&mut ab, "a");
        out.push_str(&ab.open(false));
        out.push_str(&ab.open(true));
        out.push_str(&ab.close());
        assert_eq!(out, "\n<p>a</p>\n\n<p></p>\n");
    }

    #[test]
    fn flush_before_macro() {
        let mut ab = AutoBreak::for_target(Target::Web);
        let mut out = run_without_close(&mut ab, "a ");
        out.push_str(&ab.flush());
        assert_eq!(out, "\n<p>a ");

        let mut ab = AutoBreak::for_target(Target::Web);
        let mut out = run_without_close(&mut ab, "a\n\n");
        out.push_str(&ab.flush());
        assert_eq!(out, "\n<p>a</p>\n");
        assert!(!ab.is_open());
    }

    #[test]
    fn suspend_and_restore() {
        let mut ab = AutoBreak::for_target(Target::Web);
        let previous = ab.suspend();
        assert!(previous);
        assert!(!ab.is_enabled());
        ab.restore(previous);
        assert!(ab.is_enabled());
    }

    fn run_without_close(autobreak: &mut AutoBreak, text: &str) -> String {
        text.chars().map(|ch| autobreak.process(ch)).collect()
    }
}
