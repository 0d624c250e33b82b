//! TabsAndIndents pass
//!
//! The final, authoritative indentation pass. Every space that starts a line
//! gets its column recomputed: the classifier picks Align / Indent /
//! Continuation relative to the nearest enclosing line-owning node, whose
//! column travels down the cursor as the `indent` message. Whatever columns
//! earlier passes left behind are overwritten; running the pass twice is a
//! no-op.
//!
//! Two situations need more than the classifier table:
//!
//! - for-loop headers: when the init clause shares the `(` line, wrapped
//!   condition/update clauses align to the column immediately after `(`,
//!   which only a trial print of the header can produce;
//! - structural inconsistencies (a for-loop stripped of its control
//!   elements mid-edit) are fatal for the unit rather than silently guessed
//!   around.

use std::collections::HashMap;

use crate::error::NoriError;
use crate::result::Result;
use crate::style::{FormatStyle, TabsAndIndentsStyle};
use crate::syntax::cursor::{Cursor, Message};
use crate::syntax::space::Space;
use crate::syntax::tree::{CompilationUnit, NodeKind, Statement};
use crate::syntax::walk::{SpaceLoc, Visitor, walk_unit};

use super::FormatPass;
use super::classify::{IndentPolicy, classify};
use super::indent::reindent_space;
use super::measure;

pub struct TabsAndIndents;

impl FormatPass for TabsAndIndents {
    fn name(&self) -> &'static str {
        "tabs-and-indents"
    }

    fn run(&self, unit: CompilationUnit, style: &FormatStyle) -> Result<CompilationUnit> {
        let mut visitor = IndentVisitor {
            style: style.tabs_and_indents.clone(),
            for_aligns: HashMap::new(),
            err: None,
        };
        let unit = walk_unit(&mut visitor, unit);
        match visitor.err {
            Some(err) => Err(err),
            None => Ok(unit),
        }
    }
}

const MSG_INDENT: &str = "indent";

struct IndentVisitor {
    style: TabsAndIndentsStyle,
    /// Nodes pinned to an exact column by the for-header override.
    for_aligns: HashMap<u64, usize>,
    err: Option<NoriError>,
}

impl IndentVisitor {
    fn fail(&mut self, err: NoriError) {
        if self.err.is_none() {
            self.err = Some(err);
        }
    }
}

impl Visitor for IndentVisitor {
    fn visit_statement(&mut self, stmt: Statement, cursor: &mut Cursor) -> Statement {
        if let Statement::For(for_loop) = &stmt {
            if for_loop.control.init.is_empty() || for_loop.control.update.is_empty() {
                self.fail(NoriError::MissingChild {
                    construct: "for-loop",
                    detail: "control section has no elements".into(),
                });
                return stmt;
            }
            let init_inline = !for_loop.control.init[0].elem.prefix().starts_line();
            let wrapped_clause = for_loop.control.condition.elem.prefix().starts_line()
                || for_loop
                    .control
                    .update
                    .iter()
                    .any(|u| u.elem.prefix().starts_line());
            if init_inline && wrapped_clause {
                // The trial print sees the statement's current indentation,
                // which this very pass is about to rewrite; shift the
                // measured column onto the statement's final line start.
                let old_col = measure::line_start_column(stmt.prefix(), &self.style);
                let new_col = if stmt.prefix().starts_line() {
                    let base = cursor.nearest_int(MSG_INDENT).unwrap_or(0) as usize;
                    match classify(SpaceLoc::Prefix, NodeKind::For, cursor.parent_kind()) {
                        IndentPolicy::Align => base,
                        IndentPolicy::Indent => base + self.style.indent_size,
                        IndentPolicy::Continuation => base + self.style.continuation_indent,
                    }
                } else {
                    old_col
                };
                match measure::column_before(&stmt, for_loop.control.init[0].elem.id()) {
                    Ok(column) => {
                        let column = (column + new_col).saturating_sub(old_col);
                        if for_loop.control.condition.elem.prefix().starts_line() {
                            self.for_aligns
                                .insert(for_loop.control.condition.elem.id().as_u64(), column);
                        }
                        for update in &for_loop.control.update {
                            if update.elem.prefix().starts_line() {
                                self.for_aligns.insert(update.elem.id().as_u64(), column);
                            }
                        }
                    }
                    Err(err) => self.fail(err),
                }
            }
        }
        stmt
    }

    fn visit_space(&mut self, space: Space, loc: SpaceLoc, cursor: &mut Cursor) -> Space {
        if self.err.is_some() || !space.starts_line() {
            return space;
        }
        let Some(kind) = cursor.current_kind() else {
            return space;
        };

        let target = if loc == SpaceLoc::Prefix {
            cursor
                .current_id()
                .and_then(|id| self.for_aligns.get(&id.as_u64()).copied())
        } else {
            None
        };
        let target = target.unwrap_or_else(|| {
            let base = cursor.nearest_int(MSG_INDENT).unwrap_or(0) as usize;
            match classify(loc, kind, cursor.parent_kind()) {
                IndentPolicy::Align => base,
                IndentPolicy::Indent => base + self.style.indent_size,
                IndentPolicy::Continuation => base + self.style.continuation_indent,
            }
        });

        let space = reindent_space(&space, target, &self.style);
        if loc == SpaceLoc::Prefix {
            cursor.put_message(MSG_INDENT, Message::Int(target as i64));
        }
        space
    }
}

/// Convenience used by tests and callers formatting in isolation.
pub fn reindent_unit(unit: CompilationUnit, style: &FormatStyle) -> Result<CompilationUnit> {
    TabsAndIndents.run(unit, style)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::indent::column_width;
    use crate::syntax::parser::parse_unit;
    use crate::syntax::printer::print_unit;

    fn run(source: &str) -> String {
        run_with(source, &FormatStyle::default())
    }

    fn run_with(source: &str, style: &FormatStyle) -> String {
        let unit = parse_unit(source).unwrap();
        print_unit(&TabsAndIndents.run(unit, style).unwrap())
    }

    #[test]
    fn misindented_statement_snaps_to_indent_size() {
        let got = run("class A {\n   void f() {\n      int x = 1;\n         }\n}\n");
        assert_eq!(got, "class A {\n    void f() {\n        int x = 1;\n    }\n}\n");
    }

    #[test]
    fn three_space_indent_becomes_four() {
        let got = run("class A {\n   int x;\n}\n");
        assert_eq!(got, "class A {\n    int x;\n}\n");
    }

    #[test]
    fn tabs_render_when_configured() {
        let mut style = FormatStyle::default();
        style.tabs_and_indents.use_tab_character = true;
        let got = run_with("class A {\n   int x;\n}\n", &style);
        assert_eq!(got, "class A {\n\tint x;\n}\n");
    }

    #[test]
    fn block_end_aligns_with_owner() {
        let got = run("class A {\n  void f() {\n    a();\n      }\n  }\n");
        assert_eq!(got, "class A {\n    void f() {\n        a();\n    }\n}\n");
    }

    #[test]
    fn wrapped_operand_gets_continuation_indent() {
        let got = run("class A {\n  void f() {\n    x = a +\n      b;\n  }\n}\n");
        assert_eq!(
            got,
            "class A {\n    void f() {\n        x = a +\n                b;\n    }\n}\n"
        );
    }

    #[test]
    fn wrapped_chain_links_share_a_continuation_column() {
        let got = run("class A {\n  void f() {\n    a.b()\n  .c()\n        .d();\n  }\n}\n");
        assert_eq!(
            got,
            "class A {\n    void f() {\n        a.b()\n                .c()\n                .d();\n    }\n}\n"
        );
    }

    #[test]
    fn annotation_run_aligns_the_declaration() {
        let got = run("class A {\n  @Override\n      public void f() {\n  }\n}\n");
        assert_eq!(
            got,
            "class A {\n    @Override\n    public void f() {\n    }\n}\n"
        );
    }

    #[test]
    fn case_bodies_nest_inside_switch() {
        let got = run(
            "class A {\n void f() {\n switch (k) {\n case 1:\n a();\n break;\n default:\n b();\n }\n }\n}\n",
        );
        assert_eq!(
            got,
            "class A {\n    void f() {\n        switch (k) {\n            case 1:\n                a();\n                break;\n            default:\n                b();\n        }\n    }\n}\n"
        );
    }

    #[test]
    fn labels_align_with_the_enclosing_construct() {
        let got = run("class A {\n  void f() {\n      outer:\n      while (x) {\n      break outer;\n      }\n  }\n}\n");
        assert_eq!(
            got,
            "class A {\n    void f() {\n    outer:\n        while (x) {\n            break outer;\n        }\n    }\n}\n"
        );
    }

    #[test]
    fn comments_reindent_with_their_statement() {
        let got = run("class A {\n  void f() {\n      // note\n      a();\n  }\n}\n");
        assert_eq!(
            got,
            "class A {\n    void f() {\n        // note\n        a();\n    }\n}\n"
        );
    }

    #[test]
    fn for_header_clauses_align_after_the_paren() {
        let source = "class A {\n  void f() {\n    for (int i = 0;\n      i < 10;\n      i++) {\n      a();\n    }\n  }\n}\n";
        let got = run(source);
        // The for starts at column 8; "for (" puts the init at column 13,
        // so the wrapped clauses pin there.
        let expected = "class A {\n    void f() {\n        for (int i = 0;\n             i < 10;\n             i++) {\n            a();\n        }\n    }\n}\n";
        assert_eq!(got, expected);
    }

    #[test]
    fn pass_is_idempotent() {
        let source = "class A {\n   void f() {\n     if (a) {\n b();\n }\n x = y +\n z;\n   }\n}\n";
        let style = FormatStyle::default();
        let once = run_with(source, &style);
        let twice = run_with(&once, &style);
        assert_eq!(once, twice);
    }

    #[test]
    fn align_invariant_holds_for_block_end() {
        let style = FormatStyle::default();
        let unit = parse_unit("class A {\n  void f() {\n    a();\n        }\n}\n").unwrap();
        let formatted = TabsAndIndents.run(unit, &style).unwrap();
        let method = &formatted.types[0].body.statements[0];
        let Statement::Method(method) = &method.elem else {
            panic!();
        };
        let body = method.body.as_ref().unwrap();
        assert_eq!(
            column_width(body.end.leading_indent(), &style.tabs_and_indents),
            column_width(
                method.prefix.leading_indent(),
                &style.tabs_and_indents
            )
        );
    }
}
