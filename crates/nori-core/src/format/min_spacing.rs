//! MinimumViableSpacing pass
//!
//! Inserts the single-space separators required for the token stream to stay
//! lexically valid after structural edits (`classFoo` would lex as one
//! word). This is a correctness pass, not a style pass: it only ever fills a
//! completely empty space between two tokens that would otherwise fuse, and
//! never touches spacing that is merely unfashionable.

use crate::result::Result;
use crate::style::FormatStyle;
use crate::syntax::cursor::Cursor;
use crate::syntax::space::Space;
use crate::syntax::tree::{
    ClassDecl, CompilationUnit, Expression, MethodDecl, Statement, TypeName, VariableDecls,
};
use crate::syntax::walk::{Visitor, walk_unit};

use super::FormatPass;

pub struct MinimumViableSpacing;

impl FormatPass for MinimumViableSpacing {
    fn name(&self) -> &'static str {
        "minimum-viable-spacing"
    }

    fn run(&self, unit: CompilationUnit, _style: &FormatStyle) -> Result<CompilationUnit> {
        Ok(walk_unit(&mut SpacingVisitor, unit))
    }
}

fn separate(space: &mut Space) {
    if space.is_empty() {
        *space = Space::single_space();
    }
}

/// Give an expression a single-space prefix when it directly follows a
/// keyword with nothing in between.
fn separate_expr(expr: &mut Expression) {
    if expr.prefix().is_empty() {
        let owned = std::mem::replace(
            expr,
            Expression::Empty(crate::syntax::tree::EmptyNode::new(Space::empty())),
        );
        *expr = owned.with_prefix(Space::single_space());
    }
}

/// Whether the printed form of `ty` ends in an identifier character (so a
/// following identifier needs a separator). `int[]` and `List<T>` end in
/// punctuation and need none.
fn type_ends_with_word(ty: &TypeName) -> bool {
    ty.dims.is_empty() && ty.type_args.is_none()
}

struct SpacingVisitor;

impl Visitor for SpacingVisitor {
    fn visit_unit(&mut self, mut unit: CompilationUnit, _cursor: &mut Cursor) -> CompilationUnit {
        if let Some(package) = unit.package.as_mut() {
            if let Some(first) = package.elem.name.parts.first_mut() {
                separate(&mut first.elem.prefix);
            }
        }
        for import in unit.imports.iter_mut() {
            match import.elem.static_prefix.as_mut() {
                Some(static_prefix) => separate(static_prefix),
                None => {}
            }
            if let Some(first) = import.elem.name.parts.first_mut() {
                separate(&mut first.elem.prefix);
            }
        }
        unit
    }

    fn visit_class(&mut self, mut class: ClassDecl, _cursor: &mut Cursor) -> ClassDecl {
        for modifier in class.modifiers.iter_mut().skip(1) {
            separate(&mut modifier.prefix);
        }
        if !class.annotations.is_empty() {
            if let Some(first) = class.modifiers.first_mut() {
                separate(&mut first.prefix);
            }
        }
        if !class.annotations.is_empty() || !class.modifiers.is_empty() {
            separate(&mut class.kind_prefix);
        }
        // The kind keyword and the name are both words.
        separate(&mut class.name.prefix);
        if let Some(extends) = class.extends.as_mut() {
            separate(&mut extends.before);
            separate(&mut extends.elem.prefix);
        }
        if let Some(implements) = class.implements.as_mut() {
            separate(&mut implements.before);
            if let Some(first) = implements.elems.first_mut() {
                separate(&mut first.elem.prefix);
            }
        }
        class
    }

    fn visit_method(&mut self, mut method: MethodDecl, _cursor: &mut Cursor) -> MethodDecl {
        for modifier in method.modifiers.iter_mut().skip(1) {
            separate(&mut modifier.prefix);
        }
        if !method.annotations.is_empty() {
            if let Some(first) = method.modifiers.first_mut() {
                separate(&mut first.prefix);
            }
        }
        if let Some(ty) = method.return_type.as_mut() {
            if !method.annotations.is_empty() || !method.modifiers.is_empty() {
                separate(&mut ty.prefix);
            }
            if type_ends_with_word(ty) {
                separate(&mut method.name.prefix);
            }
        }
        if let Some(throws) = method.throws.as_mut() {
            separate(&mut throws.before);
            if let Some(first) = throws.elems.first_mut() {
                separate(&mut first.elem.prefix);
            }
        }
        method
    }

    fn visit_variables(&mut self, mut decls: VariableDecls, _cursor: &mut Cursor) -> VariableDecls {
        for modifier in decls.modifiers.iter_mut().skip(1) {
            separate(&mut modifier.prefix);
        }
        if !decls.annotations.is_empty() {
            if let Some(first) = decls.modifiers.first_mut() {
                separate(&mut first.prefix);
            }
        }
        if !decls.modifiers.is_empty() {
            separate(&mut decls.type_expr.prefix);
        }
        if type_ends_with_word(&decls.type_expr) {
            if let Some(first) = decls.vars.first_mut() {
                separate(&mut first.elem.name.prefix);
            }
        }
        decls
    }

    fn visit_statement(&mut self, mut stmt: Statement, _cursor: &mut Cursor) -> Statement {
        match &mut stmt {
            Statement::Return(ret) => {
                if let Some(expr) = ret.expr.as_mut() {
                    separate_expr(expr);
                }
            }
            Statement::Throw(throw) => separate_expr(&mut throw.expr),
            Statement::Break(brk) => {
                if let Some(label) = brk.label.as_mut() {
                    separate(&mut label.prefix);
                }
            }
            Statement::Continue(cont) => {
                if let Some(label) = cont.label.as_mut() {
                    separate(&mut label.prefix);
                }
            }
            Statement::Case(case) => {
                if let crate::syntax::tree::CaseLabel::Expr(expr) = &mut case.label {
                    separate_expr(&mut expr.elem);
                }
            }
            _ => {}
        }
        stmt
    }

    fn visit_expression(&mut self, mut expr: Expression, _cursor: &mut Cursor) -> Expression {
        if let Expression::NewClass(new_class) = &mut expr {
            separate(&mut new_class.type_name.prefix);
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
        let spaced = MinimumViableSpacing
            .run(unit, &FormatStyle::default())
            .unwrap();
        print_unit(&spaced)
    }

    #[test]
    fn fused_keyword_and_name_get_a_separator() {
        // Simulate the post-edit state by erasing spaces that the pass must
        // restore.
        let mut unit = parse_unit("class Foo {}").unwrap();
        unit.types[0].name.prefix = Space::empty();
        let spaced = MinimumViableSpacing
            .run(unit, &FormatStyle::default())
            .unwrap();
        assert_eq!(print_unit(&spaced), "class Foo {}");
    }

    #[test]
    fn existing_spacing_is_left_alone() {
        let source = "class  Foo  extends  Bar {\n  public  static  int x;\n  void f() { return  x; }\n}";
        assert_eq!(run(source), source);
    }

    #[test]
    fn return_value_is_separated() {
        let mut unit = parse_unit("class A { int f() { return x; } }").unwrap();
        // Strip the space to simulate an edit.
        let Statement::Method(method) = &mut unit.types[0].body.statements[0].elem else {
            panic!();
        };
        let Statement::Return(ret) = &mut method.body.as_mut().unwrap().statements[0].elem else {
            panic!();
        };
        let expr = ret.expr.take().unwrap();
        ret.expr = Some(expr.with_prefix(Space::empty()));

        let spaced = MinimumViableSpacing
            .run(unit, &FormatStyle::default())
            .unwrap();
        assert_eq!(print_unit(&spaced), "class A { int f() { return x; } }");
    }

    #[test]
    fn array_types_need_no_separator_after_brackets() {
        let source = "class A { int[]x; }";
        // `]` and `x` do not fuse; minimum spacing adds nothing.
        assert_eq!(run(source), source);
    }
}
