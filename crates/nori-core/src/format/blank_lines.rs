//! BlankLines pass
//!
//! Enforces minimum and keep-maximum blank-line counts at declaration seams
//! (package, imports, types, members) and inside code blocks. The pass works
//! purely on the newline count in each seam's `whitespace`, before any
//! attached comment, so comment positions never move.
//!
//! The "blank lines before the first statement of a method body" seam is the
//! explicit `minimum.before_method_body` policy rather than an inlined
//! special case; single-line bodies (no newline at the seam) are outside its
//! jurisdiction until the wrapping pass splits them.

use crate::result::Result;
use crate::style::{BlankLinesStyle, FormatStyle};
use crate::syntax::cursor::Cursor;
use crate::syntax::space::Space;
use crate::syntax::tree::{Block, ClassDecl, CompilationUnit, MethodDecl, NodeKind, Statement};
use crate::syntax::walk::{Visitor, walk_unit};

use super::FormatPass;

pub struct BlankLines;

impl FormatPass for BlankLines {
    fn name(&self) -> &'static str {
        "blank-lines"
    }

    fn run(&self, unit: CompilationUnit, style: &FormatStyle) -> Result<CompilationUnit> {
        let mut visitor = BlankLinesVisitor {
            style: style.blank_lines.clone(),
        };
        Ok(walk_unit(&mut visitor, unit))
    }
}

/// Clamp the blank-line count in `space` to `[minimum, maximum]`.
///
/// A seam with no newline at all is only forced onto a new line when a
/// positive minimum demands it; single-line layouts otherwise pass through
/// untouched.
fn apply(space: &Space, minimum: usize, maximum: usize) -> Space {
    let maximum = maximum.max(minimum);
    let newlines = space.whitespace.matches('\n').count();
    if newlines == 0 {
        if minimum == 0 {
            return space.clone();
        }
        let indent = space.leading_indent().to_string();
        return space.with_whitespace(format!("{}{}", "\n".repeat(minimum + 1), indent));
    }
    let blanks = newlines - 1;
    let target = blanks.clamp(minimum, maximum);
    if target == blanks {
        return space.clone();
    }
    let indent = match space.whitespace.rfind('\n') {
        Some(idx) => &space.whitespace[idx + 1..],
        None => "",
    };
    space.with_whitespace(format!("{}{}", "\n".repeat(target + 1), indent))
}

struct BlankLinesVisitor {
    style: BlankLinesStyle,
}

impl BlankLinesVisitor {
    fn member_minimum(&self, stmt: &Statement) -> usize {
        match stmt {
            Statement::Method(_) | Statement::Class(_) => self.style.minimum.around_method,
            Statement::Variable(_) => self.style.minimum.around_field,
            _ => 0,
        }
    }
}

impl Visitor for BlankLinesVisitor {
    fn visit_unit(&mut self, mut unit: CompilationUnit, _cursor: &mut Cursor) -> CompilationUnit {
        let max_decl = self.style.keep_maximum.in_declarations;
        let minimum = &self.style.minimum;

        if let Some(package) = unit.package.as_mut() {
            package.elem.prefix = apply(&package.elem.prefix, minimum.before_package, max_decl);
        }

        let after_package = unit.package.is_some();
        for (i, import) in unit.imports.iter_mut().enumerate() {
            let min = if i == 0 {
                if after_package {
                    minimum.after_package.max(minimum.before_imports)
                } else {
                    0
                }
            } else {
                0
            };
            import.elem.prefix = apply(&import.elem.prefix, min, max_decl);
        }

        let had_header = unit.package.is_some() || !unit.imports.is_empty();
        for (i, class) in unit.types.iter_mut().enumerate() {
            let min = if i == 0 {
                if !unit.imports.is_empty() {
                    minimum.after_imports
                } else if after_package {
                    minimum.after_package
                } else {
                    0
                }
            } else {
                minimum.around_class
            };
            // A first type at the very top of the file stays there.
            if i == 0 && !had_header {
                class.prefix = apply(&class.prefix, 0, max_decl);
            } else {
                class.prefix = apply(&class.prefix, min, max_decl);
            }
        }
        unit
    }

    fn visit_class(&mut self, mut class: ClassDecl, _cursor: &mut Cursor) -> ClassDecl {
        let max_decl = self.style.keep_maximum.in_declarations;
        let minimum = &self.style.minimum;
        let mut previous_min = 0usize;
        for (i, member) in class.body.statements.iter_mut().enumerate() {
            // Only seams already split across lines participate; same-line
            // members wait for the wrapping pass.
            if !member.elem.prefix().has_newline() {
                previous_min = self.member_minimum(&member.elem);
                continue;
            }
            let own = self.member_minimum(&member.elem);
            let min = if i == 0 {
                minimum.after_class_header
            } else {
                own.max(previous_min)
            };
            let prefix = apply(member.elem.prefix(), min, max_decl);
            let elem = std::mem::replace(&mut member.elem, Statement::Empty(
                crate::syntax::tree::EmptyNode::new(Space::empty()),
            ));
            member.elem = elem.with_prefix(prefix);
            previous_min = own;
        }
        class.body.end = apply(
            &class.body.end,
            0,
            self.style.keep_maximum.before_end_of_block,
        );
        class
    }

    fn visit_method(&mut self, mut method: MethodDecl, _cursor: &mut Cursor) -> MethodDecl {
        if let Some(body) = method.body.as_mut() {
            if let Some(first) = body.statements.first_mut() {
                if first.elem.prefix().has_newline() {
                    let prefix = apply(
                        first.elem.prefix(),
                        self.style.minimum.before_method_body,
                        self.style.keep_maximum.in_code,
                    );
                    let elem = std::mem::replace(&mut first.elem, Statement::Empty(
                        crate::syntax::tree::EmptyNode::new(Space::empty()),
                    ));
                    first.elem = elem.with_prefix(prefix);
                }
            }
        }
        method
    }

    fn visit_block(&mut self, mut block: Block, cursor: &mut Cursor) -> Block {
        // Class bodies are handled by visit_class with declaration seams;
        // this hook owns code blocks.
        if cursor.parent_kind() == Some(NodeKind::Class) {
            return block;
        }
        let max_code = self.style.keep_maximum.in_code;
        for stmt in block.statements.iter_mut() {
            if !stmt.elem.prefix().has_newline() {
                continue;
            }
            let prefix = apply(stmt.elem.prefix(), 0, max_code);
            let elem = std::mem::replace(&mut stmt.elem, Statement::Empty(
                crate::syntax::tree::EmptyNode::new(Space::empty()),
            ));
            stmt.elem = elem.with_prefix(prefix);
        }
        if block.end.has_newline() {
            block.end = apply(&block.end, 0, self.style.keep_maximum.before_end_of_block);
        }
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parser::parse_unit;
    use crate::syntax::printer::print_unit;

    fn run_with(source: &str, style: &FormatStyle) -> String {
        let unit = parse_unit(source).unwrap();
        print_unit(&BlankLines.run(unit, style).unwrap())
    }

    fn run(source: &str) -> String {
        run_with(source, &FormatStyle::default())
    }

    #[test]
    fn collapses_excess_blank_lines_in_code() {
        let got = run("class A {\n  void f() {\n    a();\n\n\n\n\n    b();\n  }\n}\n");
        assert_eq!(got, "class A {\n  void f() {\n    a();\n\n\n    b();\n  }\n}\n");
    }

    #[test]
    fn empty_block_blank_lines_collapse_to_keep_maximum() {
        let mut style = FormatStyle::default();
        style.blank_lines.keep_maximum.before_end_of_block = 1;
        let got = run_with("class A {\n  void m() {\n\n\n}\n}\n", &style);
        assert_eq!(got, "class A {\n  void m() {\n\n}\n}\n");
    }

    #[test]
    fn methods_get_a_blank_line_between_them() {
        let got = run("class A {\n  void f() {}\n  void g() {}\n}\n");
        assert_eq!(got, "class A {\n  void f() {}\n\n  void g() {}\n}\n");
    }

    #[test]
    fn adjacent_fields_stay_tight() {
        let got = run("class A {\n  int x;\n  int y;\n}\n");
        assert_eq!(got, "class A {\n  int x;\n  int y;\n}\n");
    }

    #[test]
    fn field_then_method_uses_the_stronger_seam() {
        let got = run("class A {\n  int x;\n  void f() {}\n}\n");
        assert_eq!(got, "class A {\n  int x;\n\n  void f() {}\n}\n");
    }

    #[test]
    fn imports_and_types_are_separated() {
        let got = run("package p;\nimport a.B;\nclass A {}\n");
        assert_eq!(got, "package p;\n\nimport a.B;\n\nclass A {}\n");
    }

    #[test]
    fn same_line_members_pass_through() {
        let source = "class A { int x; void f() {} }\n";
        assert_eq!(run(source), source);
    }

    #[test]
    fn comments_keep_their_blank_line_distance() {
        // The blank line between `a();` and the comment is governed at the
        // whitespace-before-comment seam; the comment itself never moves.
        let got = run("class A {\n  void f() {\n    a();\n\n\n\n    // note\n    b();\n  }\n}\n");
        assert_eq!(
            got,
            "class A {\n  void f() {\n    a();\n\n\n    // note\n    b();\n  }\n}\n"
        );
    }
}
