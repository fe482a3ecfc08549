//! H1 to H2 rewriting
//!
//! [`transform`] is pure: it never touches the filesystem and accepts any
//! string. Lines that are not level-1 headings come out byte-identical,
//! including their terminators and the presence of a final newline.

use super::classify::{heading_marker, strip_terminator, LineClass, LineClassifier};
use serde::Serialize;

/// A heading that was demoted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversion {
    /// 1-based line number in the original text
    pub line_number: usize,
    /// Original line content without its terminator
    pub original: String,
}

/// Output of a single [`transform`] pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformation {
    /// Rewritten document text
    pub text: String,
    /// Converted headings in encounter order
    pub conversions: Vec<Conversion>,
}

impl Transformation {
    /// Number of headings converted
    pub fn count(&self) -> usize {
        self.conversions.len()
    }

    /// Whether the text differs from the input
    pub fn is_changed(&self) -> bool {
        !self.conversions.is_empty()
    }
}

/// Demote every level-1 heading in `text` to level 2
///
/// ```
/// use headshift::core::transform;
///
/// let result = transform("# Title\n\nSome text\n## Sub\n");
/// assert_eq!(result.text, "## Title\n\nSome text\n## Sub\n");
/// assert_eq!(result.count(), 1);
/// ```
pub fn transform(text: &str) -> Transformation {
    let mut classifier = LineClassifier::new();
    let mut output = String::with_capacity(text.len() + 16);
    let mut conversions = Vec::new();

    for (index, line) in text.split_inclusive('\n').enumerate() {
        let (content, terminator) = strip_terminator(line);

        match (classifier.classify(content), heading_marker(content)) {
            (LineClass::Heading1, Some(hash)) => {
                output.push_str(&content[..=hash]);
                output.push('#');
                output.push_str(&content[hash + 1..]);
                output.push_str(terminator);
                conversions.push(Conversion {
                    line_number: index + 1,
                    original: content.to_string(),
                });
            }
            _ => output.push_str(line),
        }
    }

    Transformation {
        text: output,
        conversions,
    }
}
