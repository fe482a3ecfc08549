//! Per-line classification of Markdown documents
//!
//! A [`LineClassifier`] walks a document one line at a time and tags each
//! line with a [`LineClass`]. Front matter and fenced code blocks are
//! tracked with an explicit [`ScanState`] so that heading-looking lines
//! inside them are never reported as headings.

use regex::Regex;
use std::sync::LazyLock;

/// Up to three whitespace characters, a single `#`, then a space or tab.
static HEADING1: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s{0,3})#[ \t]").expect("valid heading regex"));

/// Three or more backticks or tildes after any leading whitespace.
static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:```|~~~)").expect("valid fence regex"));

const FRONT_MATTER_DELIMITER: &str = "---";

/// Classification of a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// Opening or closing `---` of the front matter block
    FrontMatterDelimiter,
    /// Any line between the front matter delimiters
    FrontMatterBody,
    /// A ```` ``` ```` or `~~~` line opening or closing a fence
    FenceDelimiter,
    /// Any line inside a fenced code block
    FenceBody,
    /// A level-1 ATX heading eligible for conversion
    Heading1,
    /// Everything else
    OtherText,
}

impl LineClass {
    /// Whether the line sits in a region that must be copied verbatim
    pub fn is_protected(&self) -> bool {
        !matches!(self, Self::Heading1 | Self::OtherText)
    }
}

/// Region the classifier is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// No line seen yet; only here can front matter open
    Start,
    /// Ordinary Markdown body
    Body,
    /// Inside the leading front matter block
    FrontMatter,
    /// Inside a fenced code block
    Fence,
}

/// Single-pass line classifier
///
/// Lines must be fed in document order and without their terminator.
/// Classification only depends on the current line and the state left by
/// the previous ones.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    state: ScanState,
}

impl LineClassifier {
    pub fn new() -> Self {
        Self {
            state: ScanState::Start,
        }
    }

    /// Current scanning state
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Classify the next line and advance the state
    pub fn classify(&mut self, line: &str) -> LineClass {
        match self.state {
            ScanState::Start => {
                if is_front_matter_delimiter(line) {
                    self.state = ScanState::FrontMatter;
                    LineClass::FrontMatterDelimiter
                } else {
                    self.state = ScanState::Body;
                    self.classify_body(line)
                }
            }
            ScanState::FrontMatter => {
                if is_front_matter_delimiter(line) {
                    self.state = ScanState::Body;
                    LineClass::FrontMatterDelimiter
                } else {
                    LineClass::FrontMatterBody
                }
            }
            ScanState::Fence => {
                // Any fence line closes, whatever its marker or length
                if is_fence_delimiter(line) {
                    self.state = ScanState::Body;
                    LineClass::FenceDelimiter
                } else {
                    LineClass::FenceBody
                }
            }
            ScanState::Body => self.classify_body(line),
        }
    }

    fn classify_body(&mut self, line: &str) -> LineClass {
        if is_fence_delimiter(line) {
            self.state = ScanState::Fence;
            LineClass::FenceDelimiter
        } else if heading_marker(line).is_some() {
            LineClass::Heading1
        } else {
            LineClass::OtherText
        }
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// A line that is `---` once surrounding whitespace is removed
pub fn is_front_matter_delimiter(line: &str) -> bool {
    line.trim() == FRONT_MATTER_DELIMITER
}

/// A line opening or closing a fenced code block
pub fn is_fence_delimiter(line: &str) -> bool {
    FENCE.is_match(line)
}

/// Byte offset of the `#` of a level-1 heading, if `line` is one
///
/// Leading whitespace is any Unicode whitespace, so a non-breaking space
/// counts. Four or more leading whitespace characters make an indented code
/// block, two or more `#` a deeper heading, and `#word` a tag; none of those
/// match.
pub fn heading_marker(line: &str) -> Option<usize> {
    HEADING1
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|indent| indent.end())
}

/// Classify every line of `text`, splitting on `\n` and ignoring `\r\n`
pub fn classify_lines(text: &str) -> Vec<LineClass> {
    let mut classifier = LineClassifier::new();
    text.split_inclusive('\n')
        .map(|line| classifier.classify(strip_terminator(line).0))
        .collect()
}

/// Split a line into its content and its terminator (`\n`, `\r\n` or empty)
pub(crate) fn strip_terminator(line: &str) -> (&str, &str) {
    if let Some(content) = line.strip_suffix("\r\n") {
        (content, "\r\n")
    } else if let Some(content) = line.strip_suffix('\n') {
        (content, "\n")
    } else {
        (line, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::LineClass::*;

    #[test]
    fn test_heading_marker_positions() {
        assert_eq!(heading_marker("# Title"), Some(0));
        assert_eq!(heading_marker("   # Title"), Some(3));
        assert_eq!(heading_marker("\t# Title"), Some(1));
        assert_eq!(heading_marker("#\tTitle"), Some(0));
        assert_eq!(heading_marker("# "), Some(0));
    }

    #[test]
    fn test_heading_marker_unicode_indent() {
        // byte offset, not char offset: U+00A0 is two bytes
        assert_eq!(heading_marker("\u{a0}# X"), Some(2));
        assert_eq!(heading_marker("\x0b# X"), Some(1));
        assert_eq!(heading_marker("\x0c\u{a0} # X"), Some(4));
        assert_eq!(heading_marker("\u{a0}\u{a0}\u{a0}\u{a0}# X"), None);
        assert_eq!(heading_marker(" \t\x0c\u{a0}# X"), None);
    }

    #[test]
    fn test_heading_false_positives() {
        assert_eq!(heading_marker("#tag"), None);
        assert_eq!(heading_marker("#Title"), None);
        assert_eq!(heading_marker("#"), None);
        assert_eq!(heading_marker("## Sub"), None);
        assert_eq!(heading_marker("### Deeper"), None);
        assert_eq!(heading_marker("    # indented code"), None);
        assert_eq!(heading_marker("\t\t\t\t# indented code"), None);
        assert_eq!(heading_marker("text # not a heading"), None);
    }

    #[test]
    fn test_fence_delimiters() {
        assert!(is_fence_delimiter("```"));
        assert!(is_fence_delimiter("```rust"));
        assert!(is_fence_delimiter("    ~~~~"));
        assert!(!is_fence_delimiter("``"));
        assert!(!is_fence_delimiter("~~ strike ~~"));
        assert!(!is_fence_delimiter("text ```"));
    }

    #[test]
    fn test_front_matter_block() {
        let classes = classify_lines("---\ntitle: X\n# not heading\n---\n# Heading\n");
        assert_eq!(
            classes,
            vec![
                FrontMatterDelimiter,
                FrontMatterBody,
                FrontMatterBody,
                FrontMatterDelimiter,
                Heading1
            ]
        );
    }

    #[test]
    fn test_front_matter_only_on_first_line() {
        let classes = classify_lines("intro\n---\n# Heading\n---\n");
        assert_eq!(classes, vec![OtherText, OtherText, Heading1, OtherText]);
    }

    #[test]
    fn test_front_matter_delimiter_with_whitespace() {
        let classes = classify_lines("---  \r\nkey: v\r\n  ---\r\n# H\r\n");
        assert_eq!(
            classes,
            vec![FrontMatterDelimiter, FrontMatterBody, FrontMatterDelimiter, Heading1]
        );
    }

    #[test]
    fn test_unclosed_front_matter_swallows_document() {
        let classes = classify_lines("---\n# a\n```\n# b");
        assert_eq!(
            classes,
            vec![FrontMatterDelimiter, FrontMatterBody, FrontMatterBody, FrontMatterBody]
        );
    }

    #[test]
    fn test_fence_toggles_are_permissive() {
        // a tilde line closes a backtick fence
        let classes = classify_lines("```\n# a\n~~~\n# b\n");
        assert_eq!(classes, vec![FenceDelimiter, FenceBody, FenceDelimiter, Heading1]);
    }

    #[test]
    fn test_fence_after_front_matter() {
        let mut classifier = LineClassifier::new();
        assert_eq!(classifier.classify("---"), FrontMatterDelimiter);
        assert_eq!(classifier.state(), ScanState::FrontMatter);
        assert_eq!(classifier.classify("```"), FrontMatterBody);
        assert_eq!(classifier.classify("---"), FrontMatterDelimiter);
        assert_eq!(classifier.classify("```"), FenceDelimiter);
        assert_eq!(classifier.state(), ScanState::Fence);
        assert_eq!(classifier.classify("---"), FenceBody);
        assert_eq!(classifier.classify("```"), FenceDelimiter);
        assert_eq!(classifier.state(), ScanState::Body);
    }

    #[test]
    fn test_protected_classes() {
        assert!(FenceBody.is_protected());
        assert!(FrontMatterDelimiter.is_protected());
        assert!(!Heading1.is_protected());
        assert!(!OtherText.is_protected());
    }

    #[test]
    fn test_strip_terminator() {
        assert_eq!(strip_terminator("a\r\n"), ("a", "\r\n"));
        assert_eq!(strip_terminator("a\n"), ("a", "\n"));
        assert_eq!(strip_terminator("a"), ("a", ""));
        assert_eq!(strip_terminator("a\r"), ("a\r", ""));
    }
}
