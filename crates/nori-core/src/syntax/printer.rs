//! Tree-to-text printer and trial printing
//!
//! The printer is a plain walk: for every node it emits the node's [`Space`]
//! (whitespace, then each comment with its suffix), then the token text. It
//! carries no layout logic of its own — whatever the formatting passes left
//! in the spaces is what comes out. Printing a freshly parsed tree therefore
//! reproduces the source byte-for-byte.
//!
//! The same walk doubles as the *trial printer* used by wrap decisions: give
//! it a target [`NodeId`] and it stops immediately before that node, and the
//! caller gets [`Stopped::AtColumn`] with the distance from the last line
//! break to the stop point. A target that is not part of the printed subtree
//! yields [`Stopped::NotFound`] — an explicit result, not an exception.

use unicode_width::UnicodeWidthStr;

use super::space::Space;
use super::tree::*;

/// Outcome of a trial print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stopped {
    /// The early-exit signal never fired: the target is not in this subtree.
    NotFound,
    /// Printed column position (from the current line start) immediately
    /// before the target node.
    AtColumn(usize),
}

/// How `Statement::Empty` prints in a given position. In statement position
/// the node *is* a bare `;`; as a placeholder in parameter lists and
/// for-control sections it prints nothing but its space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EmptyMode {
    Semicolon,
    Bare,
}

/// Print a compilation unit back to text.
pub fn print_unit(unit: &CompilationUnit) -> String {
    let mut printer = Printer::new(None);
    printer.unit(unit);
    printer.out
}

/// Print a single statement subtree (no trailing statement terminator).
pub fn print_statement(stmt: &Statement) -> String {
    let mut printer = Printer::new(None);
    printer.statement(stmt, EmptyMode::Semicolon);
    printer.out
}

/// Print a single expression subtree.
pub fn print_expression(expr: &Expression) -> String {
    let mut printer = Printer::new(None);
    printer.expression(expr);
    printer.out
}

/// Trial-print `unit`, stopping immediately before `target`.
pub fn trial_print_unit(unit: &CompilationUnit, target: NodeId) -> Stopped {
    let mut printer = Printer::new(Some(target));
    printer.unit(unit);
    printer.outcome()
}

/// Trial-print a statement subtree, stopping immediately before `target`.
pub fn trial_print_statement(stmt: &Statement, target: NodeId) -> Stopped {
    let mut printer = Printer::new(Some(target));
    printer.statement(stmt, EmptyMode::Semicolon);
    printer.outcome()
}

struct Printer {
    out: String,
    target: Option<NodeId>,
    stopped: bool,
}

impl Printer {
    fn new(target: Option<NodeId>) -> Self {
        Self {
            out: String::new(),
            target,
            stopped: false,
        }
    }

    fn outcome(&self) -> Stopped {
        if self.stopped {
            let line_start = self.out.rfind('\n').map(|i| i + 1).unwrap_or(0);
            Stopped::AtColumn(self.out[line_start..].width())
        } else {
            Stopped::NotFound
        }
    }

    /// True when printing must not proceed into the node with this id.
    fn halt(&mut self, id: NodeId) -> bool {
        if self.stopped {
            return true;
        }
        if self.target == Some(id) {
            self.stopped = true;
            return true;
        }
        false
    }

    fn space(&mut self, space: &Space) {
        if self.stopped {
            return;
        }
        self.out.push_str(&space.whitespace);
        for comment in &space.comments {
            self.out.push_str(&comment.render());
            self.out.push_str(&comment.suffix);
        }
    }

    fn token(&mut self, text: &str) {
        if self.stopped {
            return;
        }
        self.out.push_str(text);
    }

    // -- structure ---------------------------------------------------------

    fn unit(&mut self, unit: &CompilationUnit) {
        if self.halt(unit.id) {
            return;
        }
        if let Some(package) = &unit.package {
            if !self.halt(package.elem.id) {
                self.space(&package.elem.prefix);
                self.token("package");
                self.qualified_name(&package.elem.name);
                self.space(&package.after);
                self.token(";");
            }
        }
        for import in &unit.imports {
            if self.halt(import.elem.id) {
                return;
            }
            self.space(&import.elem.prefix);
            self.token("import");
            if let Some(static_prefix) = &import.elem.static_prefix {
                self.space(static_prefix);
                self.token("static");
            }
            self.qualified_name(&import.elem.name);
            self.space(&import.after);
            self.token(";");
        }
        for class in &unit.types {
            self.class_decl(class);
        }
        self.space(&unit.eof);
    }

    fn qualified_name(&mut self, name: &QualifiedName) {
        let last = name.parts.len().saturating_sub(1);
        for (i, part) in name.parts.iter().enumerate() {
            self.space(&part.elem.prefix);
            self.token(&part.elem.text);
            if i < last {
                self.space(&part.after);
                self.token(".");
            }
        }
    }

    fn ident(&mut self, ident: &Ident) {
        if self.halt(ident.id) {
            return;
        }
        self.space(&ident.prefix);
        self.token(&ident.text);
    }

    fn annotation(&mut self, ann: &Annotation) {
        if self.halt(ann.id) {
            return;
        }
        self.space(&ann.prefix);
        self.token("@");
        self.ident(&ann.name);
        if let Some(args) = &ann.args {
            self.expr_container(args);
        }
    }

    fn modifier(&mut self, modifier: &Modifier) {
        if self.halt(modifier.id) {
            return;
        }
        self.space(&modifier.prefix);
        self.token(modifier.kind.keyword());
    }

    fn type_name(&mut self, ty: &TypeName) {
        if self.halt(ty.id) {
            return;
        }
        self.space(&ty.prefix);
        self.qualified_name(&ty.name);
        if let Some(args) = &ty.type_args {
            self.space(&args.before);
            self.token("<");
            let last = args.elems.len().saturating_sub(1);
            for (i, arg) in args.elems.iter().enumerate() {
                self.type_name(&arg.elem);
                self.space(&arg.after);
                self.token(if i == last { ">" } else { "," });
            }
        }
        for dim in &ty.dims {
            self.space(&dim.prefix);
            self.token("[");
            self.space(&dim.inner);
            self.token("]");
        }
    }

    fn class_decl(&mut self, class: &ClassDecl) {
        if self.halt(class.id) {
            return;
        }
        self.space(&class.prefix);
        for ann in &class.annotations {
            self.annotation(ann);
        }
        for modifier in &class.modifiers {
            self.modifier(modifier);
        }
        self.space(&class.kind_prefix);
        self.token(class.kind.keyword());
        self.ident(&class.name);
        if let Some(components) = &class.components {
            self.stmt_container(components);
        }
        if let Some(extends) = &class.extends {
            self.space(&extends.before);
            self.token("extends");
            self.type_name(&extends.elem);
        }
        if let Some(implements) = &class.implements {
            self.space(&implements.before);
            self.token(if class.kind == ClassKind::Interface {
                "extends"
            } else {
                "implements"
            });
            self.type_list(implements);
        }
        self.block(&class.body);
    }

    /// Undelimited comma list (`implements`, `throws`).
    fn type_list(&mut self, list: &Container<TypeName>) {
        let last = list.elems.len().saturating_sub(1);
        for (i, ty) in list.elems.iter().enumerate() {
            self.type_name(&ty.elem);
            if i < last {
                self.space(&ty.after);
                self.token(",");
            }
        }
    }

    /// Paren-delimited statement list (method parameters, record
    /// components); placeholders print bare.
    fn stmt_container(&mut self, container: &Container<Statement>) {
        self.space(&container.before);
        self.token("(");
        let last = container.elems.len().saturating_sub(1);
        for (i, param) in container.elems.iter().enumerate() {
            self.statement(&param.elem, EmptyMode::Bare);
            self.space(&param.after);
            self.token(if i == last { ")" } else { "," });
        }
    }

    fn expr_container(&mut self, container: &Container<Expression>) {
        self.space(&container.before);
        self.token("(");
        let last = container.elems.len().saturating_sub(1);
        for (i, arg) in container.elems.iter().enumerate() {
            self.expression(&arg.elem);
            self.space(&arg.after);
            self.token(if i == last { ")" } else { "," });
        }
    }

    fn block(&mut self, block: &Block) {
        if self.halt(block.id) {
            return;
        }
        self.space(&block.prefix);
        self.token("{");
        for stmt in &block.statements {
            self.padded_statement(stmt);
        }
        self.space(&block.end);
        self.token("}");
    }

    fn padded_statement(&mut self, padded: &Padded<Statement>) {
        self.statement(&padded.elem, EmptyMode::Semicolon);
        self.space(&padded.after);
        if padded.elem.needs_semicolon() {
            self.token(";");
        }
    }

    fn padded_boxed(&mut self, padded: &Padded<Box<Statement>>) {
        self.statement(&padded.elem, EmptyMode::Semicolon);
        self.space(&padded.after);
        if padded.elem.needs_semicolon() {
            self.token(";");
        }
    }

    fn variable_decls(&mut self, decls: &VariableDecls) {
        if self.halt(decls.id) {
            return;
        }
        self.space(&decls.prefix);
        for ann in &decls.annotations {
            self.annotation(ann);
        }
        for modifier in &decls.modifiers {
            self.modifier(modifier);
        }
        self.type_name(&decls.type_expr);
        let last = decls.vars.len().saturating_sub(1);
        for (i, var) in decls.vars.iter().enumerate() {
            if self.halt(var.elem.id) {
                return;
            }
            self.ident(&var.elem.name);
            for dim in &var.elem.dims {
                self.space(&dim.prefix);
                self.token("[");
                self.space(&dim.inner);
                self.token("]");
            }
            if let Some(init) = &var.elem.initializer {
                self.space(&init.before);
                self.token("=");
                self.expression(&init.elem);
            }
            if i < last {
                self.space(&var.after);
                self.token(",");
            }
        }
    }

    fn method_decl(&mut self, method: &MethodDecl) {
        if self.halt(method.id) {
            return;
        }
        self.space(&method.prefix);
        for ann in &method.annotations {
            self.annotation(ann);
        }
        for modifier in &method.modifiers {
            self.modifier(modifier);
        }
        if let Some(ty) = &method.return_type {
            self.type_name(ty);
        }
        self.ident(&method.name);
        self.stmt_container(&method.params);
        if let Some(throws) = &method.throws {
            self.space(&throws.before);
            self.token("throws");
            self.type_list(throws);
        }
        if let Some(body) = &method.body {
            self.block(body);
        }
    }

    fn enum_values(&mut self, values: &EnumValueSet) {
        if self.halt(values.id) {
            return;
        }
        self.space(&values.prefix);
        let last = values.values.len().saturating_sub(1);
        for (i, value) in values.values.iter().enumerate() {
            if self.halt(value.elem.id) {
                return;
            }
            self.space(&value.elem.prefix);
            for ann in &value.elem.annotations {
                self.annotation(ann);
            }
            self.ident(&value.elem.name);
            if let Some(args) = &value.elem.args {
                self.expr_container(args);
            }
            if i < last {
                self.space(&value.after);
                self.token(",");
            } else if values.terminated {
                self.space(&value.after);
                self.token(";");
            }
        }
        if values.values.is_empty() && values.terminated {
            self.token(";");
        }
    }

    fn control_parens(&mut self, control: &ControlParens<Expression>) {
        self.space(&control.prefix);
        self.token("(");
        self.expression(&control.tree.elem);
        self.space(&control.tree.after);
        self.token(")");
    }

    fn statement(&mut self, stmt: &Statement, mode: EmptyMode) {
        match stmt {
            Statement::Block(block) => self.block(block),
            Statement::Class(class) => self.class_decl(class),
            Statement::Method(method) => self.method_decl(method),
            Statement::Variable(decls) => self.variable_decls(decls),
            Statement::EnumValues(values) => self.enum_values(values),
            Statement::Expr(expr) => self.expression(expr),
            Statement::If(if_stmt) => {
                if self.halt(if_stmt.id) {
                    return;
                }
                self.space(&if_stmt.prefix);
                self.token("if");
                self.control_parens(&if_stmt.condition);
                self.padded_boxed(&if_stmt.then_part);
                if let Some(else_clause) = &if_stmt.else_part {
                    if self.halt(else_clause.id) {
                        return;
                    }
                    self.space(&else_clause.prefix);
                    self.token("else");
                    self.padded_boxed(&else_clause.body);
                }
            }
            Statement::For(for_loop) => {
                if self.halt(for_loop.id) {
                    return;
                }
                self.space(&for_loop.prefix);
                self.token("for");
                self.space(&for_loop.control.prefix);
                self.token("(");
                let last = for_loop.control.init.len().saturating_sub(1);
                for (i, init) in for_loop.control.init.iter().enumerate() {
                    self.statement(&init.elem, EmptyMode::Bare);
                    self.space(&init.after);
                    self.token(if i == last { ";" } else { "," });
                }
                self.expression(&for_loop.control.condition.elem);
                self.space(&for_loop.control.condition.after);
                self.token(";");
                let last = for_loop.control.update.len().saturating_sub(1);
                for (i, update) in for_loop.control.update.iter().enumerate() {
                    self.statement(&update.elem, EmptyMode::Bare);
                    self.space(&update.after);
                    self.token(if i == last { ")" } else { "," });
                }
                self.padded_boxed(&for_loop.body);
            }
            Statement::ForEach(foreach) => {
                if self.halt(foreach.id) {
                    return;
                }
                self.space(&foreach.prefix);
                self.token("for");
                self.space(&foreach.control.prefix);
                self.token("(");
                self.variable_decls(&foreach.control.variable.elem);
                self.space(&foreach.control.variable.after);
                self.token(":");
                self.expression(&foreach.control.iterable.elem);
                self.space(&foreach.control.iterable.after);
                self.token(")");
                self.padded_boxed(&foreach.body);
            }
            Statement::While(while_loop) => {
                if self.halt(while_loop.id) {
                    return;
                }
                self.space(&while_loop.prefix);
                self.token("while");
                self.control_parens(&while_loop.condition);
                self.padded_boxed(&while_loop.body);
            }
            Statement::DoWhile(do_while) => {
                if self.halt(do_while.id) {
                    return;
                }
                self.space(&do_while.prefix);
                self.token("do");
                self.padded_boxed(&do_while.body);
                self.space(&do_while.while_prefix);
                self.token("while");
                self.control_parens(&do_while.condition);
            }
            Statement::Switch(switch) => {
                if self.halt(switch.id) {
                    return;
                }
                self.space(&switch.prefix);
                self.token("switch");
                self.control_parens(&switch.selector);
                self.block(&switch.cases);
            }
            Statement::Case(case) => {
                if self.halt(case.id) {
                    return;
                }
                self.space(&case.prefix);
                match &case.label {
                    CaseLabel::Expr(expr) => {
                        self.token("case");
                        self.expression(&expr.elem);
                        self.space(&expr.after);
                        self.token(":");
                    }
                    CaseLabel::Default(colon_prefix) => {
                        self.token("default");
                        self.space(colon_prefix);
                        self.token(":");
                    }
                }
                for stmt in &case.statements {
                    self.padded_statement(stmt);
                }
            }
            Statement::Label(label) => {
                if self.halt(label.id) {
                    return;
                }
                self.space(&label.prefix);
                self.ident(&label.name.elem);
                self.space(&label.name.after);
                self.token(":");
                self.statement(&label.statement, EmptyMode::Semicolon);
            }
            Statement::Return(ret) => {
                if self.halt(ret.id) {
                    return;
                }
                self.space(&ret.prefix);
                self.token("return");
                if let Some(expr) = &ret.expr {
                    self.expression(expr);
                }
            }
            Statement::Throw(throw) => {
                if self.halt(throw.id) {
                    return;
                }
                self.space(&throw.prefix);
                self.token("throw");
                self.expression(&throw.expr);
            }
            Statement::Break(brk) => {
                if self.halt(brk.id) {
                    return;
                }
                self.space(&brk.prefix);
                self.token("break");
                if let Some(label) = &brk.label {
                    self.ident(label);
                }
            }
            Statement::Continue(cont) => {
                if self.halt(cont.id) {
                    return;
                }
                self.space(&cont.prefix);
                self.token("continue");
                if let Some(label) = &cont.label {
                    self.ident(label);
                }
            }
            Statement::Empty(empty) => {
                if self.halt(empty.id) {
                    return;
                }
                self.space(&empty.prefix);
                if mode == EmptyMode::Semicolon {
                    self.token(";");
                }
            }
        }
    }

    fn expression(&mut self, expr: &Expression) {
        match expr {
            Expression::Identifier(ident) => self.ident(ident),
            Expression::FieldAccess(access) => {
                if self.halt(access.id) {
                    return;
                }
                self.space(&access.prefix);
                self.expression(&access.target.elem);
                self.space(&access.target.after);
                self.token(".");
                self.ident(&access.name);
            }
            Expression::Literal(literal) => {
                if self.halt(literal.id) {
                    return;
                }
                self.space(&literal.prefix);
                self.token(&literal.text);
            }
            Expression::Binary(binary) => {
                if self.halt(binary.id) {
                    return;
                }
                self.space(&binary.prefix);
                self.expression(&binary.left);
                self.space(&binary.op.before);
                self.token(binary.op.elem.token());
                self.expression(&binary.right);
            }
            Expression::Unary(unary) => {
                if self.halt(unary.id) {
                    return;
                }
                self.space(&unary.prefix);
                if unary.op.is_postfix() {
                    self.expression(&unary.expr);
                    self.space(&unary.op_space);
                    self.token(unary.op.token());
                } else {
                    self.token(unary.op.token());
                    self.expression(&unary.expr);
                }
            }
            Expression::Assignment(assign) => {
                if self.halt(assign.id) {
                    return;
                }
                self.space(&assign.prefix);
                self.expression(&assign.target);
                self.space(&assign.op_prefix);
                self.token(assign.op.token());
                self.expression(&assign.value);
            }
            Expression::Ternary(ternary) => {
                if self.halt(ternary.id) {
                    return;
                }
                self.space(&ternary.prefix);
                self.expression(&ternary.condition);
                self.space(&ternary.true_part.before);
                self.token("?");
                self.expression(&ternary.true_part.elem);
                self.space(&ternary.false_part.before);
                self.token(":");
                self.expression(&ternary.false_part.elem);
            }
            Expression::Invocation(invocation) => {
                if self.halt(invocation.id) {
                    return;
                }
                self.space(&invocation.prefix);
                if let Some(select) = &invocation.select {
                    self.expression(&select.elem);
                    self.space(&select.after);
                    self.token(".");
                }
                self.ident(&invocation.name);
                self.expr_container(&invocation.args);
            }
            Expression::NewClass(new_class) => {
                if self.halt(new_class.id) {
                    return;
                }
                self.space(&new_class.prefix);
                self.token("new");
                self.type_name(&new_class.type_name);
                self.expr_container(&new_class.args);
            }
            Expression::ArrayAccess(access) => {
                if self.halt(access.id) {
                    return;
                }
                self.space(&access.prefix);
                self.expression(&access.target);
                self.space(&access.dim_prefix);
                self.token("[");
                self.expression(&access.index.elem);
                self.space(&access.index.after);
                self.token("]");
            }
            Expression::Parens(parens) => {
                if self.halt(parens.id) {
                    return;
                }
                self.space(&parens.prefix);
                self.token("(");
                self.expression(&parens.tree.elem);
                self.space(&parens.tree.after);
                self.token(")");
            }
            Expression::Empty(empty) => {
                if self.halt(empty.id) {
                    return;
                }
                self.space(&empty.prefix);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parser::parse_unit;

    #[track_caller]
    fn round_trip(source: &str) {
        let unit = parse_unit(source).unwrap();
        assert_eq!(print_unit(&unit), source, "round-trip failed");
    }

    #[test]
    fn round_trip_minimal() {
        round_trip("class Foo {}");
        round_trip("class  Foo  {  }");
        round_trip("class Foo{void bar( ){}}");
    }

    #[test]
    fn round_trip_package_imports() {
        round_trip("package com.example ;\n\nimport java.util.List;\nimport static a.b.*;\n\nclass A {}\n");
    }

    #[test]
    fn round_trip_members() {
        round_trip(
            "class A {\n    private final int x = 1, y[] = null;\n\n    @Override\n    public String toString() {\n        return \"a\";\n    }\n\n    A() {}\n}\n",
        );
    }

    #[test]
    fn round_trip_statements() {
        round_trip(
            "class A {\n  void f() {\n    if (a > b) {\n      a = b;\n    } else if (c) {\n      d();\n    }\n    for (int i = 0; i < 10; i++) {\n      sum += i;\n    }\n    for ( ; ; ) {}\n    for (String s : names) out.println(s);\n    do {\n      i--;\n    } while (i > 0);\n    outer: while (true) {\n      break outer;\n    }\n    switch (k) {\n      case 1:\n        a();\n        break;\n      default:\n        b();\n    }\n    ;\n  }\n}\n",
        );
    }

    #[test]
    fn round_trip_expressions() {
        round_trip(
            "class A {\n  void f() {\n    x = a + b * (c - d) % e;\n    y = cond ? left : right;\n    z = a.b().c( 1, \"two\", new java.util.ArrayList<>() );\n    m[i] = !flag && ~bits == 0;\n    n = list[0].size();\n    shifted = v << 2 >> 1 >>> 3;\n    v >>= 1;\n    w <<= 2;\n  }\n}\n",
        );
    }

    #[test]
    fn round_trip_comments() {
        round_trip(
            "// header\nclass A { // trailing\n  /* block */ int x; /** doc */\n  int y;\n}\n// footer\n",
        );
    }

    #[test]
    fn round_trip_enum_record_interface() {
        round_trip(
            "enum Color {\n  RED, GREEN(2),\n  BLUE;\n\n  int code() { return 0; }\n}\ninterface Shape extends A, B {\n  int area();\n}\nrecord Point(int x, int y) {}\n",
        );
    }

    #[test]
    fn round_trip_generics_and_dims() {
        round_trip(
            "class A {\n  Map<String, List<Integer>> index;\n  int[] grid [];\n  List< String > padded;\n}\n",
        );
    }

    #[test]
    fn trial_print_stops_before_target() {
        let unit = parse_unit("class A { void f() { total = base + extra; } }").unwrap();
        // Find the `extra` identifier.
        let Statement::Method(method) = &unit.types[0].body.statements[0].elem else {
            panic!();
        };
        let Statement::Expr(expr) = &method.body.as_ref().unwrap().statements[0].elem else {
            panic!();
        };
        let Expression::Assignment(assign) = expr.as_ref() else {
            panic!();
        };
        let Expression::Binary(binary) = &assign.value else {
            panic!();
        };
        let target = binary.right.id();
        let Stopped::AtColumn(col) = trial_print_unit(&unit, target) else {
            panic!("target should be found");
        };
        // "class A { void f() { total = base +" is 35 columns.
        assert_eq!(col, 35);
    }

    #[test]
    fn trial_print_unknown_target_is_not_found() {
        let unit = parse_unit("class A {}").unwrap();
        let foreign = NodeId::fresh();
        assert_eq!(trial_print_unit(&unit, foreign), Stopped::NotFound);
    }

    #[test]
    fn trial_print_measures_from_last_newline() {
        let unit = parse_unit("class A {\n  void f() {\n    go(arg);\n  }\n}").unwrap();
        let Statement::Method(method) = &unit.types[0].body.statements[0].elem else {
            panic!();
        };
        let Statement::Expr(expr) = &method.body.as_ref().unwrap().statements[0].elem else {
            panic!();
        };
        let Expression::Invocation(call) = expr.as_ref() else {
            panic!();
        };
        let target = call.args.elems[0].elem.id();
        // "    go(" → column 7.
        assert_eq!(trial_print_unit(&unit, target), Stopped::AtColumn(7));
    }
}
