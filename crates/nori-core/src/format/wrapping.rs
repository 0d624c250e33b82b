//! WrappingAndBraces pass
//!
//! Decides line placement: statements onto their own lines, annotations onto
//! their own lines per style, and the wrappable constructs (method chains,
//! invocation arguments, declaration parameters, record components) per
//! their [`LineWrapSetting`]. Chop-if-too-long policies measure through the
//! line-wrap decision service; the break itself is just a newline written
//! into the relevant space, with the final column left to the
//! tabs-and-indents pass.
//!
//! An enum whose body is a single-line constant list is a recognized layout
//! (`EnumLayout::SingleLine` in spirit) and is exempt from
//! statement-per-line splitting.

use crate::error::NoriError;
use crate::result::Result;
use crate::style::{FormatStyle, LineWrapSetting, TabsAndIndentsStyle, WrappingStyle};
use crate::syntax::cursor::{Cursor, Message};
use crate::syntax::space::Space;
use crate::syntax::tree::*;
use crate::syntax::walk::{Visitor, walk_unit};

use super::FormatPass;
use super::measure;

pub struct WrappingAndBraces;

impl FormatPass for WrappingAndBraces {
    fn name(&self) -> &'static str {
        "wrapping-and-braces"
    }

    fn is_applicable(&self, unit: &CompilationUnit) -> bool {
        !unit.types.is_empty()
    }

    fn run(&self, unit: CompilationUnit, style: &FormatStyle) -> Result<CompilationUnit> {
        let mut visitor = WrapVisitor {
            style: style.wrapping.clone(),
            tabs: style.tabs_and_indents.clone(),
            err: None,
        };
        let unit = walk_unit(&mut visitor, unit);
        match visitor.err {
            Some(err) => Err(err),
            None => Ok(unit),
        }
    }
}

const MSG_WRAP_CHAINS: &str = "wrap:chains";
const MSG_WRAP_ARGS: &str = "wrap:args";

/// Put the owning token at the start of a fresh line, preserving comments.
/// The new line gets no indentation here; the tabs-and-indents pass owns
/// that column.
fn break_before(space: &Space) -> Space {
    if space.starts_line() {
        return space.clone();
    }
    if space.comments.is_empty() {
        return space.with_whitespace("\n");
    }
    let mut comments = space.comments.clone();
    if let Some(last) = comments.last_mut() {
        last.suffix.push('\n');
    }
    space.with_comments(comments)
}

fn break_before_stmt(stmt: &mut Statement) {
    if stmt.prefix().starts_line() {
        return;
    }
    let prefix = break_before(stmt.prefix());
    let owned = std::mem::replace(stmt, Statement::Empty(EmptyNode::new(Space::empty())));
    *stmt = owned.with_prefix(prefix);
}

fn break_before_expr(expr: &mut Expression) {
    if expr.prefix().starts_line() {
        return;
    }
    let prefix = break_before(expr.prefix());
    let owned = std::mem::replace(expr, Expression::Empty(EmptyNode::new(Space::empty())));
    *expr = owned.with_prefix(prefix);
}

struct WrapVisitor {
    style: WrappingStyle,
    tabs: TabsAndIndentsStyle,
    err: Option<NoriError>,
}

impl WrapVisitor {
    fn fail(&mut self, err: NoriError) {
        if self.err.is_none() {
            self.err = Some(err);
        }
    }

    /// Single-line enum bodies keep their layout.
    fn is_single_line_enum(block: &Block) -> bool {
        let starts_with_values = matches!(
            block.statements.first(),
            Some(first) if matches!(first.elem, Statement::EnumValues(_))
        );
        starts_with_values
            && !block.end.has_newline()
            && block.statements.iter().all(|s| !s.elem.prefix().has_newline())
    }

    fn wrap_annotations(annotations: &mut [Annotation], trailing: Option<&mut Space>) {
        for ann in annotations.iter_mut().skip(1) {
            ann.prefix = break_before(&ann.prefix);
        }
        if let Some(space) = trailing {
            *space = break_before(space);
        }
    }

    /// Whether a chop setting fires for a construct of `width` columns
    /// starting at `start`.
    fn chopped(&self, start: usize, width: usize) -> bool {
        measure::exceeds(start, width, self.style.column_limit)
    }
}

impl Visitor for WrapVisitor {
    fn visit_block(&mut self, mut block: Block, _cursor: &mut Cursor) -> Block {
        if block.statements.is_empty() || Self::is_single_line_enum(&block) {
            return block;
        }
        for stmt in block.statements.iter_mut() {
            break_before_stmt(&mut stmt.elem);
        }
        block.end = break_before(&block.end);
        block
    }

    fn visit_class(&mut self, mut class: ClassDecl, _cursor: &mut Cursor) -> ClassDecl {
        if self.style.class_annotations_on_own_line && !class.annotations.is_empty() {
            let trailing = if let Some(first) = class.modifiers.first_mut() {
                &mut first.prefix
            } else {
                &mut class.kind_prefix
            };
            Self::wrap_annotations(&mut class.annotations, Some(trailing));
        }

        let Some(components) = class.components.as_ref() else {
            return class;
        };
        if components.elems.is_empty() {
            self.fail(NoriError::MissingChild {
                construct: "record declaration",
                detail: "component list has no elements".into(),
            });
            return class;
        }
        let placeholder = components.elems.len() == 1
            && matches!(components.elems[0].elem, Statement::Empty(_));
        let wrap = match self.style.record_components {
            LineWrapSetting::DoNotWrap => false,
            LineWrapSetting::WrapAlways => true,
            LineWrapSetting::ChopIfTooLong => {
                let mut header = class.clone();
                header.body = Block {
                    id: header.body.id,
                    prefix: Space::empty(),
                    statements: Vec::new(),
                    end: Space::empty(),
                };
                // The stand-in body prints as `{}`; discount it.
                let width = measure::statement_flat_width(&Statement::Class(Box::new(header)))
                    .saturating_sub(2);
                let start = measure::line_start_column(&class.prefix, &self.tabs);
                self.chopped(start, width)
            }
        };
        if wrap && !placeholder {
            if let Some(components) = class.components.as_mut() {
                for component in components.elems.iter_mut() {
                    break_before_stmt(&mut component.elem);
                }
            }
        }
        class
    }

    fn visit_method(&mut self, mut method: MethodDecl, _cursor: &mut Cursor) -> MethodDecl {
        if self.style.method_annotations_on_own_line && !method.annotations.is_empty() {
            let trailing = if let Some(first) = method.modifiers.first_mut() {
                &mut first.prefix
            } else if let Some(ty) = method.return_type.as_mut() {
                &mut ty.prefix
            } else {
                &mut method.name.prefix
            };
            Self::wrap_annotations(&mut method.annotations, Some(trailing));
        }

        if method.params.elems.is_empty() {
            self.fail(NoriError::MissingChild {
                construct: "method declaration",
                detail: format!("parameter list of `{}` has no elements", method.name.text),
            });
            return method;
        }
        let placeholder = method.params.elems.len() == 1
            && matches!(method.params.elems[0].elem, Statement::Empty(_));
        let wrap = match self.style.method_declaration_parameters {
            LineWrapSetting::DoNotWrap => false,
            LineWrapSetting::WrapAlways => true,
            LineWrapSetting::ChopIfTooLong => {
                let mut header = method.clone();
                header.body = None;
                let width = measure::statement_flat_width(&Statement::Method(Box::new(header)));
                let start = measure::line_start_column(&method.prefix, &self.tabs);
                self.chopped(start, width)
            }
        };
        if wrap && !placeholder {
            for param in method.params.elems.iter_mut() {
                break_before_stmt(&mut param.elem);
            }
        }
        method
    }

    fn visit_statement(&mut self, mut stmt: Statement, cursor: &mut Cursor) -> Statement {
        match &mut stmt {
            Statement::Case(case) => {
                for inner in case.statements.iter_mut() {
                    break_before_stmt(&mut inner.elem);
                }
            }
            Statement::If(if_stmt) => {
                if self.style.else_on_new_line {
                    if let Some(else_clause) = if_stmt.else_part.as_mut() {
                        else_clause.prefix = break_before(&else_clause.prefix);
                    }
                }
            }
            Statement::DoWhile(do_while) => {
                if self.style.while_on_new_line {
                    do_while.while_prefix = break_before(&do_while.while_prefix);
                }
            }
            Statement::For(for_loop) => {
                if for_loop.control.init.is_empty() || for_loop.control.update.is_empty() {
                    self.fail(NoriError::MissingChild {
                        construct: "for-loop",
                        detail: "control section has no elements".into(),
                    });
                }
            }
            _ => {}
        }

        // Chop decisions are made per line-owning statement and handed down
        // as cursor messages to the expressions inside.
        let in_statement_position = matches!(
            cursor.parent_kind(),
            Some(NodeKind::Block) | Some(NodeKind::Case)
        );
        if in_statement_position {
            let needs_measure = self.style.chained_method_calls == LineWrapSetting::ChopIfTooLong
                || self.style.method_invocation_arguments == LineWrapSetting::ChopIfTooLong;
            if needs_measure {
                let start = measure::line_start_column(stmt.prefix(), &self.tabs);
                let width = measure::statement_flat_width(&stmt);
                if self.chopped(start, width) {
                    if self.style.chained_method_calls == LineWrapSetting::ChopIfTooLong {
                        cursor.put_message(MSG_WRAP_CHAINS, Message::Bool(true));
                    }
                    if self.style.method_invocation_arguments == LineWrapSetting::ChopIfTooLong {
                        cursor.put_message(MSG_WRAP_ARGS, Message::Bool(true));
                    }
                }
            }
        }
        stmt
    }

    fn visit_expression(&mut self, mut expr: Expression, cursor: &mut Cursor) -> Expression {
        if let Expression::Invocation(invocation) = &mut expr {
            let wrap_chain = match self.style.chained_method_calls {
                LineWrapSetting::DoNotWrap => false,
                LineWrapSetting::WrapAlways => true,
                LineWrapSetting::ChopIfTooLong => {
                    cursor.nearest_bool(MSG_WRAP_CHAINS).unwrap_or(false)
                }
            };
            if wrap_chain {
                if let Some(select) = invocation.select.as_mut() {
                    // Only links whose receiver is itself a call break; the
                    // chain starter stays on its line.
                    if matches!(*select.elem, Expression::Invocation(_)) {
                        select.after = break_before(&select.after);
                    }
                }
            }

            let wrap_args = match self.style.method_invocation_arguments {
                LineWrapSetting::DoNotWrap => false,
                LineWrapSetting::WrapAlways => true,
                LineWrapSetting::ChopIfTooLong => {
                    cursor.nearest_bool(MSG_WRAP_ARGS).unwrap_or(false)
                }
            };
            let placeholder = invocation.args.elems.len() == 1
                && matches!(invocation.args.elems[0].elem, Expression::Empty(_));
            if wrap_args && !placeholder {
                for arg in invocation.args.elems.iter_mut() {
                    break_before_expr(&mut arg.elem);
                }
            }
        }
        expr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parser::parse_unit;
    use crate::syntax::printer::print_unit;

    fn run_with(source: &str, style: &FormatStyle) -> String {
        let unit = parse_unit(source).unwrap();
        print_unit(&WrappingAndBraces.run(unit, style).unwrap())
    }

    #[test]
    fn statements_move_to_their_own_lines() {
        let got = run_with(
            "class A { void f() { a(); b(); } }",
            &FormatStyle::default(),
        );
        assert_eq!(got, "class A {\nvoid f() {\na();\nb();\n}\n}");
    }

    #[test]
    fn chain_wraps_after_the_starter() {
        let mut style = FormatStyle::default();
        style.wrapping.chained_method_calls = LineWrapSetting::WrapAlways;
        let got = run_with("class A { void f() { a.b().c().d(); } }", &style);
        assert!(got.contains("a.b()\n.c()\n.d()"), "got: {got}");
    }

    #[test]
    fn chop_leaves_short_chains_alone() {
        let mut style = FormatStyle::default();
        style.wrapping.chained_method_calls = LineWrapSetting::ChopIfTooLong;
        let got = run_with("class A { void f() { a.b().c(); } }", &style);
        assert!(got.contains("a.b().c();"), "got: {got}");
    }

    #[test]
    fn chop_wraps_long_chains() {
        let mut style = FormatStyle::default();
        style.wrapping.chained_method_calls = LineWrapSetting::ChopIfTooLong;
        style.wrapping.column_limit = 24;
        let got = run_with(
            "class A { void f() { builder.alpha().bravo().charlie(); } }",
            &style,
        );
        assert!(got.contains("builder.alpha()\n.bravo()\n.charlie()"), "got: {got}");
    }

    #[test]
    fn arguments_wrap_when_asked() {
        let mut style = FormatStyle::default();
        style.wrapping.method_invocation_arguments = LineWrapSetting::WrapAlways;
        let got = run_with("class A { void f() { g(1, 2); } }", &style);
        assert!(got.contains("g(\n1,\n2)"), "got: {got}");
    }

    #[test]
    fn method_parameters_wrap_when_asked() {
        let mut style = FormatStyle::default();
        style.wrapping.method_declaration_parameters = LineWrapSetting::WrapAlways;
        let got = run_with("class A { void f(int a, int b) {} }", &style);
        assert!(got.contains("void f(\nint a,\nint b) {"), "got: {got}");
    }

    #[test]
    fn annotations_move_to_their_own_line() {
        let got = run_with(
            "class A { @Override public void f() {} }",
            &FormatStyle::default(),
        );
        assert!(got.contains("@Override\npublic void f()"), "got: {got}");
    }

    #[test]
    fn single_line_enum_is_exempt() {
        let source = "enum Color { RED, GREEN, BLUE }";
        assert_eq!(run_with(source, &FormatStyle::default()), source);
    }

    #[test]
    fn empty_parameter_list_placeholder_is_not_wrapped() {
        let mut style = FormatStyle::default();
        style.wrapping.method_declaration_parameters = LineWrapSetting::WrapAlways;
        let got = run_with("class A { void f() {} }", &style);
        assert!(got.contains("void f() {"), "got: {got}");
    }

    #[test]
    fn missing_for_control_is_a_hard_error() {
        let mut unit = parse_unit("class A { void f() { for (;;) {} } }").unwrap();
        // Manufacture the structural inconsistency mid-edit.
        {
            let Statement::Method(method) = &mut unit.types[0].body.statements[0].elem else {
                panic!();
            };
            let Statement::For(for_loop) =
                &mut method.body.as_mut().unwrap().statements[0].elem
            else {
                panic!();
            };
            for_loop.control.init.clear();
        }
        let err = WrappingAndBraces
            .run(unit, &FormatStyle::default())
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Structure);
    }
}
