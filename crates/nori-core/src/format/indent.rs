//! Indent accounting: pure functions over the tab/space policy
//!
//! Everything here is column arithmetic. `column_width` must agree exactly
//! with how an editor renders the indent, because alignment decisions are
//! column-based; `render_indent` is its inverse under a fixed style.

use crate::style::TabsAndIndentsStyle;
use crate::syntax::space::{Comment, CommentStyle, Space};

/// Visual column width of an indent string: `\t` advances by the tab size,
/// any other character by one; a line break resets the count.
pub fn column_width(indent: &str, style: &TabsAndIndentsStyle) -> usize {
    let mut width = 0;
    for ch in indent.chars() {
        match ch {
            '\t' => width += style.tab_size,
            '\n' | '\r' => width = 0,
            _ => width += 1,
        }
    }
    width
}

/// Produce an indent string rendering at `column` under the style's tab
/// policy.
pub fn render_indent(column: usize, style: &TabsAndIndentsStyle) -> String {
    if style.use_tab_character {
        let tabs = column / style.tab_size;
        let spaces = column % style.tab_size;
        let mut out = "\t".repeat(tabs);
        out.push_str(&" ".repeat(spaces));
        out
    } else {
        " ".repeat(column)
    }
}

/// Re-render only the indentation portion (after the last newline) at a new
/// column of `width(old) + delta`, clamped at zero. Whitespace without a
/// newline is never modified — same-line spacing belongs to a different
/// pass.
pub fn shift_indent(whitespace: &str, delta: i64, style: &TabsAndIndentsStyle) -> String {
    let Some(idx) = whitespace.rfind('\n') else {
        return whitespace.to_string();
    };
    let (head, indent) = whitespace.split_at(idx + 1);
    let width = (column_width(indent, style) as i64 + delta).max(0) as usize;
    format!("{head}{}", render_indent(width, style))
}

/// Replace the indentation portion (after the last newline) with an indent
/// rendering at exactly `column`. No-newline strings are left alone.
pub fn set_indent(whitespace: &str, column: usize, style: &TabsAndIndentsStyle) -> String {
    let Some(idx) = whitespace.rfind('\n') else {
        return whitespace.to_string();
    };
    let head = &whitespace[..idx + 1];
    format!("{head}{}", render_indent(column, style))
}

/// Shift every internal line of a block/doc comment by `delta`, preserving
/// the comment's semantic text. Line comments have no internal lines.
pub fn shift_comment(comment: &Comment, delta: i64, style: &TabsAndIndentsStyle) -> Comment {
    let text = match comment.style {
        CommentStyle::Line => comment.text.clone(),
        CommentStyle::Block | CommentStyle::Doc => shift_comment_lines(&comment.text, delta, style),
    };
    Comment {
        style: comment.style,
        text,
        suffix: shift_indent(&comment.suffix, delta, style),
    }
}

fn shift_comment_lines(text: &str, delta: i64, style: &TabsAndIndentsStyle) -> String {
    let mut out = String::with_capacity(text.len());
    let mut first = true;
    for line in text.split('\n') {
        if !first {
            out.push('\n');
            let margin_len = line.len() - line.trim_start_matches([' ', '\t']).len();
            let (margin, rest) = line.split_at(margin_len);
            let width = (column_width(margin, style) as i64 + delta).max(0) as usize;
            out.push_str(&render_indent(width, style));
            out.push_str(rest);
        } else {
            out.push_str(line);
        }
        first = false;
    }
    out
}

/// Rewrite a line-starting space so its token renders at `target` columns,
/// shifting attached comments (and their internal lines) by the same delta
/// so relative indentation inside the space is preserved.
pub fn reindent_space(space: &Space, target: usize, style: &TabsAndIndentsStyle) -> Space {
    let current = column_width(space.token_indent(), style);
    let delta = target as i64 - current as i64;
    if delta == 0 {
        // Already at the target column. The character set of the indent is
        // the tabs-or-spaces pass's concern, not this function's.
        return space.clone();
    }
    if space.comments.is_empty() {
        return space.with_whitespace(set_indent(&space.whitespace, target, style));
    }
    let whitespace = shift_indent(&space.whitespace, delta, style);
    let comments = space
        .comments
        .iter()
        .map(|c| shift_comment(c, delta, style))
        .collect();
    Space {
        whitespace,
        comments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spaces_style() -> TabsAndIndentsStyle {
        TabsAndIndentsStyle::default()
    }

    fn tabs_style() -> TabsAndIndentsStyle {
        TabsAndIndentsStyle {
            use_tab_character: true,
            ..TabsAndIndentsStyle::default()
        }
    }

    #[test]
    fn width_counts_tabs_by_tab_size() {
        let style = spaces_style();
        assert_eq!(column_width("", &style), 0);
        assert_eq!(column_width("    ", &style), 4);
        assert_eq!(column_width("\t", &style), 4);
        assert_eq!(column_width("\t  ", &style), 6);
    }

    #[test]
    fn width_resets_at_line_breaks() {
        let style = spaces_style();
        assert_eq!(column_width("  \n    ", &style), 4);
        assert_eq!(column_width("  \r\n\t", &style), 4);
    }

    #[test]
    fn render_measure_round_trip() {
        for style in [spaces_style(), tabs_style()] {
            for column in 0..24 {
                let rendered = render_indent(column, &style);
                assert_eq!(column_width(&rendered, &style), column);
            }
        }
    }

    #[test]
    fn render_with_tabs_uses_remainder_spaces() {
        let style = tabs_style();
        assert_eq!(render_indent(10, &style), "\t\t  ");
    }

    #[test]
    fn shift_preserves_newlines() {
        let style = spaces_style();
        assert_eq!(shift_indent("\n\n    ", 4, &style), "\n\n        ");
        assert_eq!(shift_indent("\n        ", -4, &style), "\n    ");
    }

    #[test]
    fn negative_shift_clamps_at_zero() {
        let style = spaces_style();
        assert_eq!(shift_indent("\n  ", -8, &style), "\n");
    }

    #[test]
    fn same_line_whitespace_is_untouched() {
        let style = spaces_style();
        assert_eq!(shift_indent("   ", 4, &style), "   ");
        assert_eq!(set_indent("   ", 8, &style), "   ");
    }

    #[test]
    fn block_comment_lines_shift_in_lockstep() {
        let style = spaces_style();
        let comment = Comment::new(CommentStyle::Block, " one\n     two\n     ", "\n    ");
        let shifted = shift_comment(&comment, 4, &style);
        assert_eq!(shifted.text, " one\n         two\n         ");
        assert_eq!(shifted.suffix, "\n        ");
    }

    #[test]
    fn reindent_space_moves_token_and_comments_together() {
        let style = spaces_style();
        let space = Space {
            whitespace: "\n    ".to_string(),
            comments: vec![Comment::new(CommentStyle::Line, " note", "\n    ")],
        };
        let moved = reindent_space(&space, 8, &style);
        assert_eq!(moved.whitespace, "\n        ");
        assert_eq!(moved.comments[0].suffix, "\n        ");
        assert_eq!(column_width(moved.token_indent(), &style), 8);
    }

    #[test]
    fn reindent_space_without_comments_sets_exact_column() {
        let style = spaces_style();
        let space = Space::of("\n   ");
        assert_eq!(reindent_space(&space, 4, &style).whitespace, "\n    ");
    }
}
