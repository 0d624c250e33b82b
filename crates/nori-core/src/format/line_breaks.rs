//! Character-set normalization passes
//!
//! Two small rewrites that change which characters spell the layout without
//! changing the layout itself:
//!
//! - [`NormalizeTabsOrSpaces`] re-renders indentation (the runs following
//!   each newline) in the configured character set at an identical visual
//!   column. The run before a space's first newline is inter-token spacing
//!   and belongs to the spaces pass, so it is left alone.
//! - [`NormalizeLineBreaks`] rewrites LF/CRLF per the general style.

use crate::result::Result;
use crate::style::{FormatStyle, LineEnding, TabsAndIndentsStyle};
use crate::syntax::cursor::Cursor;
use crate::syntax::space::Space;
use crate::syntax::tree::CompilationUnit;
use crate::syntax::walk::{SpaceLoc, Visitor, walk_unit};

use super::FormatPass;
use super::indent::{column_width, render_indent};

pub struct NormalizeTabsOrSpaces;

impl FormatPass for NormalizeTabsOrSpaces {
    fn name(&self) -> &'static str {
        "normalize-tabs-or-spaces"
    }

    fn run(&self, unit: CompilationUnit, style: &FormatStyle) -> Result<CompilationUnit> {
        let mut visitor = CharsetVisitor {
            style: style.tabs_and_indents.clone(),
        };
        Ok(walk_unit(&mut visitor, unit))
    }
}

fn normalize_indent_charset(text: &str, style: &TabsAndIndentsStyle) -> String {
    let Some(first_newline) = text.find('\n') else {
        return text.to_string();
    };
    let (head, rest) = text.split_at(first_newline);
    let mut out = String::with_capacity(text.len());
    out.push_str(head);
    for segment in rest.split_inclusive('\n') {
        if let Some(body) = segment.strip_suffix('\n') {
            out.push_str(body);
            out.push('\n');
        } else {
            // Final segment: indentation before the next token.
            let run_len = segment.len() - segment.trim_start_matches([' ', '\t']).len();
            let (run, tail) = segment.split_at(run_len);
            let mismatched = if style.use_tab_character {
                run.contains(' ')
            } else {
                run.contains('\t')
            };
            if mismatched {
                out.push_str(&render_indent(column_width(run, style), style));
            } else {
                out.push_str(run);
            }
            out.push_str(tail);
        }
    }
    out
}

struct CharsetVisitor {
    style: TabsAndIndentsStyle,
}

impl Visitor for CharsetVisitor {
    fn visit_space(&mut self, space: Space, _loc: SpaceLoc, _cursor: &mut Cursor) -> Space {
        let whitespace = normalize_indent_charset(&space.whitespace, &self.style);
        let comments = space
            .comments
            .into_iter()
            .map(|mut c| {
                c.suffix = normalize_indent_charset(&c.suffix, &self.style);
                c
            })
            .collect();
        Space {
            whitespace,
            comments,
        }
    }
}

pub struct NormalizeLineBreaks;

impl FormatPass for NormalizeLineBreaks {
    fn name(&self) -> &'static str {
        "normalize-line-breaks"
    }

    fn run(&self, unit: CompilationUnit, style: &FormatStyle) -> Result<CompilationUnit> {
        let mut visitor = LineBreakVisitor {
            ending: style.general.line_ending,
        };
        Ok(walk_unit(&mut visitor, unit))
    }
}

fn normalize_breaks(text: &str, ending: LineEnding) -> String {
    let unix = text.replace("\r\n", "\n");
    match ending {
        LineEnding::Lf => unix,
        LineEnding::Crlf => unix.replace('\n', "\r\n"),
    }
}

struct LineBreakVisitor {
    ending: LineEnding,
}

impl Visitor for LineBreakVisitor {
    fn visit_space(&mut self, space: Space, _loc: SpaceLoc, _cursor: &mut Cursor) -> Space {
        let whitespace = normalize_breaks(&space.whitespace, self.ending);
        let comments = space
            .comments
            .into_iter()
            .map(|mut c| {
                c.suffix = normalize_breaks(&c.suffix, self.ending);
                c
            })
            .collect();
        Space {
            whitespace,
            comments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parser::parse_unit;
    use crate::syntax::printer::print_unit;

    #[test]
    fn indentation_converts_at_equal_column() {
        let style = TabsAndIndentsStyle::default();
        assert_eq!(normalize_indent_charset("\n\t\t", &style), "\n        ");
        let tabs = TabsAndIndentsStyle {
            use_tab_character: true,
            ..TabsAndIndentsStyle::default()
        };
        assert_eq!(normalize_indent_charset("\n        ", &tabs), "\n\t\t");
        assert_eq!(normalize_indent_charset("\n      ", &tabs), "\n\t  ");
    }

    #[test]
    fn inter_token_run_before_first_newline_is_untouched() {
        let style = TabsAndIndentsStyle::default();
        assert_eq!(normalize_indent_charset("\t", &style), "\t");
        assert_eq!(normalize_indent_charset("\t\n\t", &style), "\t\n    ");
    }

    #[test]
    fn pass_rewrites_tabs_in_a_unit() {
        let unit = parse_unit("class A {\n\tint x;\n}\n").unwrap();
        let spaces = NormalizeTabsOrSpaces
            .run(unit, &FormatStyle::default())
            .unwrap();
        assert_eq!(print_unit(&spaces), "class A {\n    int x;\n}\n");
    }

    #[test]
    fn crlf_round_trip() {
        let unit = parse_unit("class A {\r\n  int x;\r\n}\r\n").unwrap();
        let mut style = FormatStyle::default();
        let lf = NormalizeLineBreaks.run(unit.clone(), &style).unwrap();
        assert_eq!(print_unit(&lf), "class A {\n  int x;\n}\n");

        style.general.line_ending = LineEnding::Crlf;
        let crlf = NormalizeLineBreaks.run(unit, &style).unwrap();
        assert_eq!(print_unit(&crlf), "class A {\r\n  int x;\r\n}\r\n");
    }
}
