//! Spaces pass
//!
//! Same-line spacing only: for every construct with a toggle in
//! [`SpacesStyle`], force the corresponding space slot to exactly one space
//! or none. Slots containing a newline or a comment are out of scope here —
//! line placement belongs to the wrapping and indent passes, and comments
//! are never disturbed.

use crate::result::Result;
use crate::style::{FormatStyle, SpacesStyle};
use crate::syntax::cursor::Cursor;
use crate::syntax::space::Space;
use crate::syntax::tree::*;
use crate::syntax::walk::{Visitor, walk_unit};

use super::FormatPass;

pub struct Spaces;

impl FormatPass for Spaces {
    fn name(&self) -> &'static str {
        "spaces"
    }

    fn is_applicable(&self, unit: &CompilationUnit) -> bool {
        // Nothing to space in a unit with no type declarations.
        !unit.types.is_empty()
    }

    fn run(&self, unit: CompilationUnit, style: &FormatStyle) -> Result<CompilationUnit> {
        let mut visitor = SpacesVisitor {
            style: style.spaces.clone(),
        };
        Ok(walk_unit(&mut visitor, unit))
    }
}

/// Force a same-line slot to one space or none; newline-bearing or commented
/// slots pass through untouched.
fn toggle(space: &mut Space, want: bool) {
    if space.has_newline() || !space.comments.is_empty() {
        return;
    }
    let desired = if want { " " } else { "" };
    if space.whitespace != desired {
        *space = Space::of(desired);
    }
}

fn toggle_expr_prefix(expr: &mut Expression, want: bool) {
    if expr.prefix().has_newline() || !expr.prefix().comments.is_empty() {
        return;
    }
    let desired = if want { " " } else { "" };
    if expr.prefix().whitespace != desired {
        let owned = std::mem::replace(expr, Expression::Empty(EmptyNode::new(Space::empty())));
        *expr = owned.with_prefix(Space::of(desired));
    }
}

fn toggle_stmt_prefix(stmt: &mut Statement, want: bool) {
    if stmt.prefix().has_newline() || !stmt.prefix().comments.is_empty() {
        return;
    }
    let desired = if want { " " } else { "" };
    if stmt.prefix().whitespace != desired {
        let owned = std::mem::replace(stmt, Statement::Empty(EmptyNode::new(Space::empty())));
        *stmt = owned.with_prefix(Space::of(desired));
    }
}

struct SpacesVisitor {
    style: SpacesStyle,
}

impl SpacesVisitor {
    /// Interior and comma spacing of an expression container (call or
    /// annotation arguments): `within` controls the padding just inside the
    /// delimiters, `within_empty` the degenerate `()` case.
    fn space_expr_container(
        &self,
        container: &mut Container<Expression>,
        within: bool,
        within_empty: bool,
    ) {
        let is_empty =
            container.elems.len() == 1 && matches!(container.elems[0].elem, Expression::Empty(_));
        if is_empty {
            let placeholder = &mut container.elems[0].elem;
            toggle_expr_prefix(placeholder, within_empty);
            return;
        }
        let last = container.elems.len().saturating_sub(1);
        for (i, arg) in container.elems.iter_mut().enumerate() {
            if i == 0 {
                toggle_expr_prefix(&mut arg.elem, within);
            } else {
                toggle_expr_prefix(&mut arg.elem, self.style.other.after_comma);
            }
            if i == last {
                toggle(&mut arg.after, within);
            } else {
                toggle(&mut arg.after, self.style.other.before_comma);
            }
        }
    }

    fn space_param_container(&self, container: &mut Container<Statement>, within: bool, within_empty: bool) {
        let is_empty =
            container.elems.len() == 1 && matches!(container.elems[0].elem, Statement::Empty(_));
        if is_empty {
            toggle_stmt_prefix(&mut container.elems[0].elem, within_empty);
            return;
        }
        let last = container.elems.len().saturating_sub(1);
        for (i, param) in container.elems.iter_mut().enumerate() {
            if i == 0 {
                toggle_stmt_prefix(&mut param.elem, within);
            } else {
                toggle_stmt_prefix(&mut param.elem, self.style.other.after_comma);
            }
            if i == last {
                toggle(&mut param.after, within);
            } else {
                toggle(&mut param.after, self.style.other.before_comma);
            }
        }
    }

    fn space_annotations(&self, annotations: &mut [Annotation]) {
        for ann in annotations.iter_mut() {
            if let Some(args) = ann.args.as_mut() {
                toggle(
                    &mut args.before,
                    self.style.before_parentheses.annotation_parameters,
                );
                self.space_expr_container(args, false, false);
            }
        }
    }

    fn space_control_parens(&self, control: &mut ControlParens<Expression>, before: bool, within: bool) {
        toggle(&mut control.prefix, before);
        toggle_expr_prefix(&mut control.tree.elem, within);
        toggle(&mut control.tree.after, within);
    }

    /// Brace placement for a statement used as a loop/branch body: only
    /// block bodies have a brace to space.
    fn space_body_brace(&self, body: &mut Padded<Box<Statement>>, want: bool) {
        if let Statement::Block(block) = body.elem.as_mut() {
            toggle(&mut block.prefix, want);
        }
    }
}

impl Visitor for SpacesVisitor {
    fn visit_class(&mut self, mut class: ClassDecl, _cursor: &mut Cursor) -> ClassDecl {
        self.space_annotations(&mut class.annotations);
        if let Some(components) = class.components.as_mut() {
            toggle(
                &mut components.before,
                self.style.before_parentheses.method_declaration,
            );
            self.space_param_container(
                components,
                self.style.within.method_declaration_parentheses,
                self.style.within.empty_method_declaration_parentheses,
            );
        }
        toggle(
            &mut class.body.prefix,
            self.style.before_left_brace.class_left_brace,
        );
        class
    }

    fn visit_method(&mut self, mut method: MethodDecl, _cursor: &mut Cursor) -> MethodDecl {
        self.space_annotations(&mut method.annotations);
        toggle(
            &mut method.params.before,
            self.style.before_parentheses.method_declaration,
        );
        self.space_param_container(
            &mut method.params,
            self.style.within.method_declaration_parentheses,
            self.style.within.empty_method_declaration_parentheses,
        );
        if let Some(body) = method.body.as_mut() {
            toggle(
                &mut body.prefix,
                self.style.before_left_brace.method_left_brace,
            );
        }
        method
    }

    fn visit_variables(&mut self, mut decls: VariableDecls, _cursor: &mut Cursor) -> VariableDecls {
        self.space_annotations(&mut decls.annotations);
        let last = decls.vars.len().saturating_sub(1);
        for (i, var) in decls.vars.iter_mut().enumerate() {
            if i > 0 {
                toggle(&mut var.elem.name.prefix, self.style.other.after_comma);
            }
            if let Some(init) = var.elem.initializer.as_mut() {
                toggle(&mut init.before, self.style.around_operators.assignment);
                toggle_expr_prefix(&mut init.elem, self.style.around_operators.assignment);
            }
            if i < last {
                toggle(&mut var.after, self.style.other.before_comma);
            }
        }
        decls
    }

    fn visit_type(&mut self, mut ty: TypeName, _cursor: &mut Cursor) -> TypeName {
        if let Some(args) = ty.type_args.as_mut() {
            let diamond = args.elems.len() == 1 && args.elems[0].elem.name.parts.is_empty();
            if diamond {
                toggle(&mut args.elems[0].elem.prefix, false);
            } else {
                let last = args.elems.len().saturating_sub(1);
                for (i, arg) in args.elems.iter_mut().enumerate() {
                    if i == 0 {
                        toggle(&mut arg.elem.prefix, self.style.within.angle_brackets);
                    } else {
                        toggle(&mut arg.elem.prefix, self.style.other.after_comma);
                    }
                    if i == last {
                        toggle(&mut arg.after, self.style.within.angle_brackets);
                    } else {
                        toggle(&mut arg.after, self.style.other.before_comma);
                    }
                }
            }
        }
        ty
    }

    fn visit_statement(&mut self, mut stmt: Statement, _cursor: &mut Cursor) -> Statement {
        match &mut stmt {
            Statement::If(if_stmt) => {
                self.space_control_parens(
                    &mut if_stmt.condition,
                    self.style.before_parentheses.if_parentheses,
                    self.style.within.if_parentheses,
                );
                self.space_body_brace(
                    &mut if_stmt.then_part,
                    self.style.before_left_brace.if_left_brace,
                );
                if let Some(else_clause) = if_stmt.else_part.as_mut() {
                    toggle(&mut else_clause.prefix, self.style.before_keywords.else_keyword);
                    self.space_body_brace(
                        &mut else_clause.body,
                        self.style.before_left_brace.else_left_brace,
                    );
                }
            }
            Statement::While(while_loop) => {
                self.space_control_parens(
                    &mut while_loop.condition,
                    self.style.before_parentheses.while_parentheses,
                    self.style.within.while_parentheses,
                );
                self.space_body_brace(
                    &mut while_loop.body,
                    self.style.before_left_brace.while_left_brace,
                );
            }
            Statement::DoWhile(do_while) => {
                self.space_body_brace(
                    &mut do_while.body,
                    self.style.before_left_brace.do_left_brace,
                );
                toggle(&mut do_while.while_prefix, self.style.before_keywords.while_keyword);
                self.space_control_parens(
                    &mut do_while.condition,
                    self.style.before_parentheses.while_parentheses,
                    self.style.within.while_parentheses,
                );
            }
            Statement::Switch(switch) => {
                self.space_control_parens(
                    &mut switch.selector,
                    self.style.before_parentheses.switch_parentheses,
                    self.style.within.switch_parentheses,
                );
                toggle(
                    &mut switch.cases.prefix,
                    self.style.before_left_brace.switch_left_brace,
                );
            }
            Statement::For(for_loop) => {
                toggle(
                    &mut for_loop.control.prefix,
                    self.style.before_parentheses.for_parentheses,
                );
                let init_len = for_loop.control.init.len();
                for (i, init) in for_loop.control.init.iter_mut().enumerate() {
                    if i == 0 {
                        toggle_stmt_prefix(&mut init.elem, self.style.within.for_parentheses);
                    } else {
                        toggle_stmt_prefix(&mut init.elem, self.style.other.after_comma);
                    }
                    if i == init_len - 1 {
                        toggle(&mut init.after, self.style.other.before_for_semicolon);
                    } else {
                        toggle(&mut init.after, self.style.other.before_comma);
                    }
                }
                toggle_expr_prefix(
                    &mut for_loop.control.condition.elem,
                    self.style.other.after_for_semicolon,
                );
                toggle(
                    &mut for_loop.control.condition.after,
                    self.style.other.before_for_semicolon,
                );
                let update_len = for_loop.control.update.len();
                for (i, update) in for_loop.control.update.iter_mut().enumerate() {
                    if i == 0 {
                        toggle_stmt_prefix(&mut update.elem, self.style.other.after_for_semicolon);
                    } else {
                        toggle_stmt_prefix(&mut update.elem, self.style.other.after_comma);
                    }
                    if i == update_len - 1 {
                        toggle(&mut update.after, self.style.within.for_parentheses);
                    } else {
                        toggle(&mut update.after, self.style.other.before_comma);
                    }
                }
                self.space_body_brace(
                    &mut for_loop.body,
                    self.style.before_left_brace.for_left_brace,
                );
            }
            Statement::ForEach(foreach) => {
                toggle(
                    &mut foreach.control.prefix,
                    self.style.before_parentheses.for_parentheses,
                );
                toggle(
                    &mut foreach.control.variable.elem.prefix,
                    self.style.within.for_parentheses,
                );
                toggle(
                    &mut foreach.control.variable.after,
                    self.style.other.before_colon_in_for_each,
                );
                toggle_expr_prefix(
                    &mut foreach.control.iterable.elem,
                    self.style.other.after_colon_in_for_each,
                );
                toggle(
                    &mut foreach.control.iterable.after,
                    self.style.within.for_parentheses,
                );
                self.space_body_brace(
                    &mut foreach.body,
                    self.style.before_left_brace.for_left_brace,
                );
            }
            _ => {}
        }
        stmt
    }

    fn visit_expression(&mut self, mut expr: Expression, _cursor: &mut Cursor) -> Expression {
        match &mut expr {
            Expression::Binary(binary) => {
                let want = match binary.op.elem {
                    BinaryOp::And | BinaryOp::Or => self.style.around_operators.logical,
                    BinaryOp::Eq | BinaryOp::Ne => self.style.around_operators.equality,
                    BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                        self.style.around_operators.relational
                    }
                    BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor => {
                        self.style.around_operators.bitwise
                    }
                    BinaryOp::Add | BinaryOp::Sub => self.style.around_operators.additive,
                    BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
                        self.style.around_operators.multiplicative
                    }
                    BinaryOp::Shl | BinaryOp::Shr | BinaryOp::Ushr => {
                        self.style.around_operators.shift
                    }
                };
                toggle(&mut binary.op.before, want);
                toggle_expr_prefix(&mut binary.right, want);
            }
            Expression::Assignment(assign) => {
                toggle(&mut assign.op_prefix, self.style.around_operators.assignment);
                toggle_expr_prefix(&mut assign.value, self.style.around_operators.assignment);
            }
            Expression::Unary(unary) => {
                if unary.op.is_postfix() {
                    toggle(&mut unary.op_space, self.style.around_operators.unary);
                } else {
                    toggle_expr_prefix(&mut unary.expr, self.style.around_operators.unary);
                }
            }
            Expression::Ternary(ternary) => {
                toggle(
                    &mut ternary.true_part.before,
                    self.style.ternary_operator.before_question_mark,
                );
                toggle_expr_prefix(
                    &mut ternary.true_part.elem,
                    self.style.ternary_operator.after_question_mark,
                );
                toggle(
                    &mut ternary.false_part.before,
                    self.style.ternary_operator.before_colon,
                );
                toggle_expr_prefix(
                    &mut ternary.false_part.elem,
                    self.style.ternary_operator.after_colon,
                );
            }
            Expression::Invocation(invocation) => {
                toggle(
                    &mut invocation.args.before,
                    self.style.before_parentheses.method_call,
                );
                self.space_expr_container(
                    &mut invocation.args,
                    self.style.within.method_call_parentheses,
                    self.style.within.empty_method_call_parentheses,
                );
            }
            Expression::NewClass(new_class) => {
                toggle(
                    &mut new_class.args.before,
                    self.style.before_parentheses.method_call,
                );
                self.space_expr_container(
                    &mut new_class.args,
                    self.style.within.method_call_parentheses,
                    self.style.within.empty_method_call_parentheses,
                );
            }
            Expression::Parens(parens) => {
                toggle_expr_prefix(&mut parens.tree.elem, self.style.within.grouping_parentheses);
                toggle(&mut parens.tree.after, self.style.within.grouping_parentheses);
            }
            Expression::ArrayAccess(access) => {
                toggle(&mut access.dim_prefix, false);
                toggle_expr_prefix(&mut access.index.elem, self.style.within.brackets);
                toggle(&mut access.index.after, self.style.within.brackets);
            }
            _ => {}
        }
        expr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parser::parse_unit;
    use crate::syntax::printer::print_unit;

    fn run(source: &str) -> String {
        let unit = parse_unit(source).unwrap();
        print_unit(&Spaces.run(unit, &FormatStyle::default()).unwrap())
    }

    #[test]
    fn fixes_braces_and_empty_parens() {
        assert_eq!(run("class Foo{void bar( ){}}"), "class Foo {void bar() {}}");
    }

    #[test]
    fn operator_spacing_is_normalized() {
        assert_eq!(
            run("class A { void f() { x=a+b*c; } }"),
            "class A { void f() { x = a + b * c; } }"
        );
    }

    #[test]
    fn call_arguments_get_comma_spacing() {
        assert_eq!(
            run("class A { void f() { g(1 ,2,3); } }"),
            "class A { void f() { g(1, 2, 3); } }"
        );
    }

    #[test]
    fn control_statements_get_keyword_spacing() {
        assert_eq!(
            run("class A { void f() { if(x){a();}else{b();} } }"),
            "class A { void f() { if (x) {a();} else {b();} } }"
        );
    }

    #[test]
    fn for_header_spacing() {
        assert_eq!(
            run("class A { void f() { for(int i = 0;i < 3;i++){} } }"),
            "class A { void f() { for (int i = 0; i < 3; i++) {} } }"
        );
    }

    #[test]
    fn foreach_colon_spacing() {
        assert_eq!(
            run("class A { void f() { for(String s:names){} } }"),
            "class A { void f() { for (String s : names) {} } }"
        );
    }

    #[test]
    fn ternary_spacing() {
        assert_eq!(
            run("class A { void f() { x = c?a:b; } }"),
            "class A { void f() { x = c ? a : b; } }"
        );
    }

    #[test]
    fn newline_spacing_is_out_of_scope() {
        let source = "class A {\n  void f() {\n    x = a +\n        b;\n  }\n}";
        assert_eq!(run(source), source);
    }

    #[test]
    fn generics_keep_tight_angles_with_comma_spacing() {
        assert_eq!(
            run("class A { Map<String ,Integer> m; }"),
            "class A { Map<String, Integer> m; }"
        );
    }

    #[test]
    fn unary_stays_tight() {
        assert_eq!(
            run("class A { void f() { x = ! flag; y = i ++; } }"),
            "class A { void f() { x = !flag; y = i++; } }"
        );
    }
}
