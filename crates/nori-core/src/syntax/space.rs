//! Whitespace and comment carrier for the lossless syntax tree
//!
//! Every node in the tree owns a [`Space`]: the exact bytes (whitespace plus
//! comments) that preceded its first token in the original source. Printing a
//! node emits its `Space` verbatim before the token text, which is what makes
//! the tree lossless:
//!
//! ```rust,ignore
//! let unit = parse_unit("class  Foo { }")?;
//! assert_eq!(print_unit(&unit), "class  Foo { }");
//! ```
//!
//! Formatting passes never mutate a `Space` in place; they build replacements
//! with [`Space::with_whitespace`] / [`Space::with_comments`] so the previous
//! tree stays valid for before/after comparison.

use serde::{Deserialize, Serialize};

/// The kind of a source comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentStyle {
    /// `// ...` to end of line
    Line,
    /// `/* ... */`
    Block,
    /// `/** ... */`
    Doc,
}

/// A single comment plus the whitespace between it and the next token (or the
/// next comment).
///
/// `text` holds the comment body *without* its delimiters; the printer puts
/// `//` or `/* */` back based on `style`. Block and doc comments may contain
/// internal newlines; those lines are re-indented in lockstep when the
/// comment's own column shifts (see `format::indent::shift_comment`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub style: CommentStyle,
    pub text: String,
    /// Whitespace after the comment, up to the next comment or token.
    pub suffix: String,
}

impl Comment {
    pub fn new(style: CommentStyle, text: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
            suffix: suffix.into(),
        }
    }

    /// The comment as it appears in source, delimiters included.
    pub fn render(&self) -> String {
        match self.style {
            CommentStyle::Line => format!("//{}", self.text),
            CommentStyle::Block => format!("/*{}*/", self.text),
            CommentStyle::Doc => format!("/**{}*/", self.text),
        }
    }

    pub fn with_suffix(&self, suffix: impl Into<String>) -> Self {
        Self {
            style: self.style,
            text: self.text.clone(),
            suffix: suffix.into(),
        }
    }
}

/// Whitespace and comments preceding a token.
///
/// Invariant: concatenating `whitespace`, then each comment's rendered text
/// and suffix in order, yields exactly the bytes that sat before the owning
/// token in source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Space {
    /// Raw whitespace before the first comment (or before the token when
    /// there are no comments). May contain newlines.
    pub whitespace: String,
    pub comments: Vec<Comment>,
}

impl Space {
    /// A `Space` with no whitespace and no comments.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A `Space` holding exactly one ASCII space.
    pub fn single_space() -> Self {
        Self::of(" ")
    }

    pub fn of(whitespace: impl Into<String>) -> Self {
        Self {
            whitespace: whitespace.into(),
            comments: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.whitespace.is_empty() && self.comments.is_empty()
    }

    /// True when the whitespace or any comment suffix contains a line break,
    /// i.e. the owning token does not sit on the same line as its
    /// predecessor.
    pub fn has_newline(&self) -> bool {
        self.whitespace.contains('\n')
            || self.comments.iter().any(|c| c.suffix.contains('\n'))
    }

    /// The substring of `whitespace` after its last newline, or the whole
    /// string when it has none. With no comments attached this is the literal
    /// indentation prefix a printer will emit.
    pub fn leading_indent(&self) -> &str {
        match self.whitespace.rfind('\n') {
            Some(idx) => &self.whitespace[idx + 1..],
            None => &self.whitespace,
        }
    }

    /// Indentation the printer emits immediately before the token, taking
    /// comments into account: the run after the last newline of the last
    /// segment (the final comment's suffix, or `whitespace` when there are no
    /// comments). Empty when the token shares a line with the last comment.
    pub fn token_indent(&self) -> &str {
        if let Some(last) = self.comments.last() {
            match last.suffix.rfind('\n') {
                Some(idx) => &last.suffix[idx + 1..],
                None => "",
            }
        } else {
            self.leading_indent()
        }
    }

    /// True when the owning token begins a fresh physical line.
    pub fn starts_line(&self) -> bool {
        match self.comments.last() {
            Some(c) => c.suffix.contains('\n'),
            None => self.whitespace.contains('\n'),
        }
    }

    /// Number of blank lines this space contributes before the first comment
    /// (or the token). One newline separates lines; each additional newline
    /// is a blank line.
    pub fn blank_lines(&self) -> usize {
        let newlines = self.whitespace.matches('\n').count();
        newlines.saturating_sub(1)
    }

    pub fn with_whitespace(&self, whitespace: impl Into<String>) -> Self {
        Self {
            whitespace: whitespace.into(),
            comments: self.comments.clone(),
        }
    }

    pub fn with_comments(&self, comments: Vec<Comment>) -> Self {
        Self {
            whitespace: self.whitespace.clone(),
            comments,
        }
    }

    /// Guarantee at least a single same-line space, leaving any existing
    /// non-empty spacing (including newlines and comments) untouched.
    pub fn ensure_single_space(&self) -> Self {
        if self.is_empty() {
            Self::single_space()
        } else {
            self.clone()
        }
    }

    /// Join two spaces so the result renders as `first` then `second`.
    /// `second.whitespace` lands after `first`'s final comment when there is
    /// one, preserving concatenation semantics.
    pub fn concat(first: &Space, second: &Space) -> Space {
        if first.is_empty() {
            return second.clone();
        }
        if second.is_empty() {
            return first.clone();
        }
        let mut comments = first.comments.clone();
        match comments.last_mut() {
            Some(last) => {
                last.suffix.push_str(&second.whitespace);
                comments.extend(second.comments.iter().cloned());
                Space {
                    whitespace: first.whitespace.clone(),
                    comments,
                }
            }
            None => Space {
                whitespace: format!("{}{}", first.whitespace, second.whitespace),
                comments: second.comments.clone(),
            },
        }
    }

    /// Render this space exactly as it appeared in source.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.whitespace.len());
        out.push_str(&self.whitespace);
        for comment in &self.comments {
            out.push_str(&comment.render());
            out.push_str(&comment.suffix);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_space_is_same_line() {
        let space = Space::empty();
        assert!(!space.has_newline());
        assert_eq!(space.leading_indent(), "");
        assert_eq!(space.render(), "");
    }

    #[test]
    fn leading_indent_after_last_newline() {
        let space = Space::of("\n\n    ");
        assert!(space.has_newline());
        assert_eq!(space.leading_indent(), "    ");
        assert_eq!(space.blank_lines(), 1);
    }

    #[test]
    fn no_newline_whole_string_is_indent() {
        let space = Space::of("   ");
        assert_eq!(space.leading_indent(), "   ");
        assert_eq!(space.blank_lines(), 0);
    }

    #[test]
    fn comment_suffix_owns_the_indent() {
        let space = Space {
            whitespace: "\n".to_string(),
            comments: vec![Comment::new(CommentStyle::Line, " note", "\n  ")],
        };
        assert!(space.has_newline());
        assert!(space.starts_line());
        assert_eq!(space.token_indent(), "  ");
        // leading_indent only looks at the raw whitespace segment.
        assert_eq!(space.leading_indent(), "");
    }

    #[test]
    fn token_on_comment_line_has_no_indent() {
        let space = Space {
            whitespace: "\n  ".to_string(),
            comments: vec![Comment::new(CommentStyle::Block, " x ", " ")],
        };
        assert!(!space.starts_line());
        assert_eq!(space.token_indent(), "");
    }

    #[test]
    fn render_concatenates_whitespace_and_comments() {
        let space = Space {
            whitespace: "  ".to_string(),
            comments: vec![
                Comment::new(CommentStyle::Line, " first", "\n"),
                Comment::new(CommentStyle::Block, " second ", " "),
            ],
        };
        assert_eq!(space.render(), "  // first\n/* second */ ");
    }

    #[test]
    fn withers_are_pure() {
        let space = Space::of(" ");
        let other = space.with_whitespace("\n");
        assert_eq!(space.whitespace, " ");
        assert_eq!(other.whitespace, "\n");
        assert_eq!(other.comments, space.comments);
    }

    #[test]
    fn ensure_single_space_only_fills_empty() {
        assert_eq!(Space::empty().ensure_single_space(), Space::single_space());
        let tabbed = Space::of("\t");
        assert_eq!(tabbed.ensure_single_space(), tabbed);
    }
}
