//! NormalizeFormat pass
//!
//! Structural edits (adding an annotation, removing a modifier) can leave a
//! declaration's leading whitespace attached to its first *inner* token
//! rather than to the declaration itself. This pass hoists that space out to
//! the declaration's own prefix so every later pass can reason about "the
//! node's leading space" without hunting through nested parts.

use crate::result::Result;
use crate::style::FormatStyle;
use crate::syntax::cursor::Cursor;
use crate::syntax::space::Space;
use crate::syntax::tree::{ClassDecl, CompilationUnit, MethodDecl, VariableDecls};
use crate::syntax::walk::{Visitor, walk_unit};

use super::FormatPass;

pub struct NormalizeFormat;

impl FormatPass for NormalizeFormat {
    fn name(&self) -> &'static str {
        "normalize-format"
    }

    fn run(&self, unit: CompilationUnit, _style: &FormatStyle) -> Result<CompilationUnit> {
        Ok(walk_unit(&mut NormalizeVisitor, unit))
    }
}

struct NormalizeVisitor;

/// Move `inner`'s space onto `prefix` (concatenated), leaving `inner` empty.
fn hoist(prefix: &mut Space, inner: &mut Space) {
    if inner.is_empty() {
        return;
    }
    *prefix = Space::concat(prefix, inner);
    *inner = Space::empty();
}

impl Visitor for NormalizeVisitor {
    fn visit_class(&mut self, mut class: ClassDecl, _cursor: &mut Cursor) -> ClassDecl {
        if let Some(first) = class.annotations.first_mut() {
            hoist(&mut class.prefix, &mut first.prefix);
        } else if let Some(first) = class.modifiers.first_mut() {
            hoist(&mut class.prefix, &mut first.prefix);
        } else {
            hoist(&mut class.prefix, &mut class.kind_prefix);
        }
        class
    }

    fn visit_method(&mut self, mut method: MethodDecl, _cursor: &mut Cursor) -> MethodDecl {
        if let Some(first) = method.annotations.first_mut() {
            hoist(&mut method.prefix, &mut first.prefix);
        } else if let Some(first) = method.modifiers.first_mut() {
            hoist(&mut method.prefix, &mut first.prefix);
        } else if let Some(ty) = method.return_type.as_mut() {
            hoist(&mut method.prefix, &mut ty.prefix);
        } else {
            hoist(&mut method.prefix, &mut method.name.prefix);
        }
        method
    }

    fn visit_variables(&mut self, mut decls: VariableDecls, _cursor: &mut Cursor) -> VariableDecls {
        if let Some(first) = decls.annotations.first_mut() {
            hoist(&mut decls.prefix, &mut first.prefix);
        } else if let Some(first) = decls.modifiers.first_mut() {
            hoist(&mut decls.prefix, &mut first.prefix);
        } else {
            hoist(&mut decls.prefix, &mut decls.type_expr.prefix);
        }
        decls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parser::parse_unit;
    use crate::syntax::printer::print_unit;
    use crate::syntax::tree::Statement;

    #[test]
    fn hoists_space_stranded_on_the_first_modifier() {
        let mut unit = parse_unit("class A { public int x; }").unwrap();
        // Simulate a structural edit leaving the member's space on the
        // modifier instead of the declaration.
        {
            let member = &mut unit.types[0].body.statements[0].elem;
            let Statement::Variable(decls) = member else {
                panic!();
            };
            let space = std::mem::take(&mut decls.prefix);
            decls.modifiers[0].prefix = Space::concat(&space, &decls.modifiers[0].prefix);
        }
        let source_before = print_unit(&unit);

        let normalized = NormalizeFormat
            .run(unit, &FormatStyle::default())
            .unwrap();
        let Statement::Variable(decls) = &normalized.types[0].body.statements[0].elem else {
            panic!();
        };
        assert_eq!(decls.prefix.whitespace, " ");
        assert!(decls.modifiers[0].prefix.is_empty());
        // Printing is unchanged; only ownership of the space moved.
        assert_eq!(print_unit(&normalized), source_before);
    }

    #[test]
    fn already_normalized_trees_are_untouched() {
        let unit = parse_unit("class A {\n  @Deprecated int x;\n  void f() {}\n}").unwrap();
        let normalized = NormalizeFormat
            .run(unit.clone(), &FormatStyle::default())
            .unwrap();
        assert_eq!(normalized, unit);
    }
}
