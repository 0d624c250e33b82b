//! Generic rewriting walker
//!
//! One fold drives every formatting pass: it rebuilds the tree bottom-up,
//! maintains the [`Cursor`] (frame per node, source order), and fires two
//! kinds of hooks on the [`Visitor`]:
//!
//! - node hooks (`visit_class`, `visit_statement`, ...) — pre-order, with the
//!   node's own frame already pushed, so messages put there scope to the
//!   subtree;
//! - `visit_space`, fired for **every** [`Space`] slot in the tree with a
//!   [`SpaceLoc`] describing the slot's role inside the current frame's node.
//!
//! Passes override only what they need; the defaults are identity, so an
//! untouched subtree comes back value-equal to its input.

use super::cursor::Cursor;
use super::space::Space;
use super::tree::*;

/// Role of a space slot within its owning node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceLoc {
    /// A node's own prefix.
    Prefix,
    /// Before a `class`/`interface`/`enum`/`record` keyword.
    KindPrefix,
    /// Before a block's closing `}`.
    BlockEnd,
    /// Before an `else` keyword.
    ElsePrefix,
    /// Before a do-while's trailing `while` keyword.
    WhilePrefix,
    /// Before the `(` opening a control section (if/while/switch/for).
    ControlPrefix,
    /// Before the opening delimiter of an argument/parameter/type-argument
    /// container, or a `throws`/`implements` keyword.
    ContainerBefore,
    /// Before a separator or closer (`,` `;` `)` `.` `:` `>`).
    PaddedAfter,
    /// Before an infix operator token (`=`, binary operators, `?`, ternary
    /// `:`, `extends`).
    OperatorBefore,
    /// Before `[` of an array dimension or index.
    DimPrefix,
    /// Between `[` and `]` of an array dimension.
    DimInner,
    /// Before the `static` keyword of a static import.
    StaticPrefix,
    /// Trailing space at end of file.
    Eof,
}

/// Rewriting visitor. Every hook takes the node by value and returns its
/// replacement; defaults are identity.
pub trait Visitor {
    fn visit_unit(&mut self, unit: CompilationUnit, _cursor: &mut Cursor) -> CompilationUnit {
        unit
    }

    fn visit_class(&mut self, class: ClassDecl, _cursor: &mut Cursor) -> ClassDecl {
        class
    }

    fn visit_method(&mut self, method: MethodDecl, _cursor: &mut Cursor) -> MethodDecl {
        method
    }

    fn visit_variables(&mut self, decls: VariableDecls, _cursor: &mut Cursor) -> VariableDecls {
        decls
    }

    fn visit_block(&mut self, block: Block, _cursor: &mut Cursor) -> Block {
        block
    }

    fn visit_statement(&mut self, stmt: Statement, _cursor: &mut Cursor) -> Statement {
        stmt
    }

    fn visit_expression(&mut self, expr: Expression, _cursor: &mut Cursor) -> Expression {
        expr
    }

    fn visit_type(&mut self, ty: TypeName, _cursor: &mut Cursor) -> TypeName {
        ty
    }

    fn visit_space(&mut self, space: Space, _loc: SpaceLoc, _cursor: &mut Cursor) -> Space {
        space
    }
}

/// Run `visitor` over a whole unit, producing the rewritten unit.
pub fn walk_unit<V: Visitor>(visitor: &mut V, unit: CompilationUnit) -> CompilationUnit {
    let mut cursor = Cursor::new();
    cursor.push(NodeKind::CompilationUnit, unit.id);
    let unit = visitor.visit_unit(unit, &mut cursor);
    let CompilationUnit {
        id,
        package,
        imports,
        types,
        eof,
    } = unit;

    let package = package.map(|p| {
        let Padded { elem, after } = p;
        cursor.push(NodeKind::Package, elem.id);
        let prefix = visitor.visit_space(elem.prefix, SpaceLoc::Prefix, &mut cursor);
        let name = walk_qualified_name(visitor, elem.name, &mut cursor);
        let after = visitor.visit_space(after, SpaceLoc::PaddedAfter, &mut cursor);
        cursor.pop();
        Padded::new(
            PackageDecl {
                id: elem.id,
                prefix,
                name,
            },
            after,
        )
    });

    let imports = imports
        .into_iter()
        .map(|p| {
            let Padded { elem, after } = p;
            cursor.push(NodeKind::Import, elem.id);
            let prefix = visitor.visit_space(elem.prefix, SpaceLoc::Prefix, &mut cursor);
            let static_prefix = elem
                .static_prefix
                .map(|s| visitor.visit_space(s, SpaceLoc::StaticPrefix, &mut cursor));
            let name = walk_qualified_name(visitor, elem.name, &mut cursor);
            let after = visitor.visit_space(after, SpaceLoc::PaddedAfter, &mut cursor);
            cursor.pop();
            Padded::new(
                ImportDecl {
                    id: elem.id,
                    prefix,
                    static_prefix,
                    name,
                },
                after,
            )
        })
        .collect();

    let types = types
        .into_iter()
        .map(|c| walk_class(visitor, c, &mut cursor))
        .collect();

    let eof = visitor.visit_space(eof, SpaceLoc::Eof, &mut cursor);
    cursor.pop();

    CompilationUnit {
        id,
        package,
        imports,
        types,
        eof,
    }
}

fn walk_qualified_name<V: Visitor>(
    visitor: &mut V,
    name: QualifiedName,
    cursor: &mut Cursor,
) -> QualifiedName {
    let last = name.parts.len().saturating_sub(1);
    let parts = name
        .parts
        .into_iter()
        .enumerate()
        .map(|(i, part)| {
            let Padded { elem, after } = part;
            let elem = walk_ident(visitor, elem, cursor);
            let after = if i < last {
                visitor.visit_space(after, SpaceLoc::PaddedAfter, cursor)
            } else {
                after
            };
            Padded::new(elem, after)
        })
        .collect();
    QualifiedName { parts }
}

fn walk_ident<V: Visitor>(visitor: &mut V, ident: Ident, cursor: &mut Cursor) -> Ident {
    let Ident { id, prefix, text } = ident;
    cursor.push(NodeKind::Identifier, id);
    let prefix = visitor.visit_space(prefix, SpaceLoc::Prefix, cursor);
    cursor.pop();
    Ident { id, prefix, text }
}

fn walk_annotation<V: Visitor>(
    visitor: &mut V,
    ann: Annotation,
    cursor: &mut Cursor,
) -> Annotation {
    cursor.push(NodeKind::Annotation, ann.id);
    let prefix = visitor.visit_space(ann.prefix, SpaceLoc::Prefix, cursor);
    let name = walk_ident(visitor, ann.name, cursor);
    let args = ann.args.map(|a| walk_expr_container(visitor, a, cursor));
    cursor.pop();
    Annotation {
        id: ann.id,
        prefix,
        name,
        args,
    }
}

fn walk_modifier<V: Visitor>(visitor: &mut V, modifier: Modifier, cursor: &mut Cursor) -> Modifier {
    let Modifier { id, prefix, kind } = modifier;
    cursor.push(NodeKind::Modifier, id);
    let prefix = visitor.visit_space(prefix, SpaceLoc::Prefix, cursor);
    cursor.pop();
    Modifier { id, prefix, kind }
}

fn walk_type_name<V: Visitor>(visitor: &mut V, ty: TypeName, cursor: &mut Cursor) -> TypeName {
    cursor.push(NodeKind::TypeName, ty.id);
    let ty = visitor.visit_type(ty, cursor);
    let prefix = visitor.visit_space(ty.prefix, SpaceLoc::Prefix, cursor);
    let name = walk_qualified_name(visitor, ty.name, cursor);
    let type_args = ty.type_args.map(|args| {
        let before = visitor.visit_space(args.before, SpaceLoc::ContainerBefore, cursor);
        let elems = args
            .elems
            .into_iter()
            .map(|p| {
                let elem = walk_type_name(visitor, p.elem, cursor);
                let after = visitor.visit_space(p.after, SpaceLoc::PaddedAfter, cursor);
                Padded::new(elem, after)
            })
            .collect();
        Container::new(before, elems)
    });
    let dims = walk_dims(visitor, ty.dims, cursor);
    cursor.pop();
    TypeName {
        id: ty.id,
        prefix,
        name,
        type_args,
        dims,
    }
}

fn walk_dims<V: Visitor>(
    visitor: &mut V,
    dims: Vec<ArrayDim>,
    cursor: &mut Cursor,
) -> Vec<ArrayDim> {
    dims.into_iter()
        .map(|d| ArrayDim {
            prefix: visitor.visit_space(d.prefix, SpaceLoc::DimPrefix, cursor),
            inner: visitor.visit_space(d.inner, SpaceLoc::DimInner, cursor),
        })
        .collect()
}

fn walk_type_list<V: Visitor>(
    visitor: &mut V,
    list: Container<TypeName>,
    cursor: &mut Cursor,
) -> Container<TypeName> {
    let before = visitor.visit_space(list.before, SpaceLoc::ContainerBefore, cursor);
    let last = list.elems.len().saturating_sub(1);
    let elems = list
        .elems
        .into_iter()
        .enumerate()
        .map(|(i, p)| {
            let elem = walk_type_name(visitor, p.elem, cursor);
            let after = if i < last {
                visitor.visit_space(p.after, SpaceLoc::PaddedAfter, cursor)
            } else {
                p.after
            };
            Padded::new(elem, after)
        })
        .collect();
    Container::new(before, elems)
}

pub(crate) fn walk_class<V: Visitor>(
    visitor: &mut V,
    class: ClassDecl,
    cursor: &mut Cursor,
) -> ClassDecl {
    cursor.push(NodeKind::Class, class.id);
    let class = visitor.visit_class(class, cursor);
    let class = walk_class_fields(visitor, class, cursor);
    cursor.pop();
    class
}

fn walk_stmt_container<V: Visitor>(
    visitor: &mut V,
    container: Container<Statement>,
    cursor: &mut Cursor,
) -> Container<Statement> {
    let before = visitor.visit_space(container.before, SpaceLoc::ContainerBefore, cursor);
    let elems = container
        .elems
        .into_iter()
        .map(|p| {
            let elem = walk_statement(visitor, p.elem, cursor);
            let after = visitor.visit_space(p.after, SpaceLoc::PaddedAfter, cursor);
            Padded::new(elem, after)
        })
        .collect();
    Container::new(before, elems)
}

fn walk_expr_container<V: Visitor>(
    visitor: &mut V,
    container: Container<Expression>,
    cursor: &mut Cursor,
) -> Container<Expression> {
    let before = visitor.visit_space(container.before, SpaceLoc::ContainerBefore, cursor);
    let elems = container
        .elems
        .into_iter()
        .map(|p| {
            let elem = walk_expression(visitor, p.elem, cursor);
            let after = visitor.visit_space(p.after, SpaceLoc::PaddedAfter, cursor);
            Padded::new(elem, after)
        })
        .collect();
    Container::new(before, elems)
}

pub(crate) fn walk_block<V: Visitor>(visitor: &mut V, block: Block, cursor: &mut Cursor) -> Block {
    cursor.push(NodeKind::Block, block.id);
    let block = walk_block_inner(visitor, block, cursor);
    cursor.pop();
    block
}

fn walk_block_inner<V: Visitor>(visitor: &mut V, block: Block, cursor: &mut Cursor) -> Block {
    let block = visitor.visit_block(block, cursor);
    let Block {
        id,
        prefix,
        statements,
        end,
    } = block;
    let prefix = visitor.visit_space(prefix, SpaceLoc::Prefix, cursor);
    let statements = statements
        .into_iter()
        .map(|p| {
            let elem = walk_statement(visitor, p.elem, cursor);
            let after = visitor.visit_space(p.after, SpaceLoc::PaddedAfter, cursor);
            Padded::new(elem, after)
        })
        .collect();
    let end = visitor.visit_space(end, SpaceLoc::BlockEnd, cursor);
    Block {
        id,
        prefix,
        statements,
        end,
    }
}

fn walk_variables<V: Visitor>(
    visitor: &mut V,
    decls: VariableDecls,
    cursor: &mut Cursor,
) -> VariableDecls {
    cursor.push(NodeKind::Variables, decls.id);
    let decls = walk_variables_inner(visitor, decls, cursor);
    cursor.pop();
    decls
}

fn walk_variables_inner<V: Visitor>(
    visitor: &mut V,
    decls: VariableDecls,
    cursor: &mut Cursor,
) -> VariableDecls {
    let decls = visitor.visit_variables(decls, cursor);
    let VariableDecls {
        id,
        prefix,
        annotations,
        modifiers,
        type_expr,
        vars,
    } = decls;
    let prefix = visitor.visit_space(prefix, SpaceLoc::Prefix, cursor);
    let annotations = annotations
        .into_iter()
        .map(|a| walk_annotation(visitor, a, cursor))
        .collect();
    let modifiers = modifiers
        .into_iter()
        .map(|m| walk_modifier(visitor, m, cursor))
        .collect();
    let type_expr = walk_type_name(visitor, type_expr, cursor);
    let last = vars.len().saturating_sub(1);
    let vars = vars
        .into_iter()
        .enumerate()
        .map(|(i, p)| {
            let Padded { elem, after } = p;
            cursor.push(NodeKind::NamedVariable, elem.id);
            let name = walk_ident(visitor, elem.name, cursor);
            let dims = walk_dims(visitor, elem.dims, cursor);
            let initializer = elem.initializer.map(|init| {
                let before = visitor.visit_space(init.before, SpaceLoc::OperatorBefore, cursor);
                LeftPadded::new(before, walk_expression(visitor, init.elem, cursor))
            });
            cursor.pop();
            let after = if i < last {
                visitor.visit_space(after, SpaceLoc::PaddedAfter, cursor)
            } else {
                after
            };
            Padded::new(
                NamedVariable {
                    id: elem.id,
                    name,
                    dims,
                    initializer,
                },
                after,
            )
        })
        .collect();
    VariableDecls {
        id,
        prefix,
        annotations,
        modifiers,
        type_expr,
        vars,
    }
}

fn walk_method_inner<V: Visitor>(
    visitor: &mut V,
    method: MethodDecl,
    cursor: &mut Cursor,
) -> MethodDecl {
    let method = visitor.visit_method(method, cursor);
    let MethodDecl {
        id,
        prefix,
        annotations,
        modifiers,
        return_type,
        name,
        params,
        throws,
        body,
    } = method;
    let prefix = visitor.visit_space(prefix, SpaceLoc::Prefix, cursor);
    let annotations = annotations
        .into_iter()
        .map(|a| walk_annotation(visitor, a, cursor))
        .collect();
    let modifiers = modifiers
        .into_iter()
        .map(|m| walk_modifier(visitor, m, cursor))
        .collect();
    let return_type = return_type.map(|t| walk_type_name(visitor, t, cursor));
    let name = walk_ident(visitor, name, cursor);
    let params = walk_stmt_container(visitor, params, cursor);
    let throws = throws.map(|t| walk_type_list(visitor, t, cursor));
    let body = body.map(|b| walk_block(visitor, b, cursor));
    MethodDecl {
        id,
        prefix,
        annotations,
        modifiers,
        return_type,
        name,
        params,
        throws,
        body,
    }
}

fn walk_control_parens<V: Visitor>(
    visitor: &mut V,
    control: ControlParens<Expression>,
    cursor: &mut Cursor,
) -> ControlParens<Expression> {
    let prefix = visitor.visit_space(control.prefix, SpaceLoc::ControlPrefix, cursor);
    let elem = walk_expression(visitor, control.tree.elem, cursor);
    let after = visitor.visit_space(control.tree.after, SpaceLoc::PaddedAfter, cursor);
    ControlParens {
        prefix,
        tree: Padded::new(elem, after),
    }
}

fn walk_padded_boxed<V: Visitor>(
    visitor: &mut V,
    padded: Padded<Box<Statement>>,
    cursor: &mut Cursor,
) -> Padded<Box<Statement>> {
    let elem = walk_statement(visitor, *padded.elem, cursor);
    let after = visitor.visit_space(padded.after, SpaceLoc::PaddedAfter, cursor);
    Padded::new(Box::new(elem), after)
}

pub(crate) fn walk_statement<V: Visitor>(
    visitor: &mut V,
    stmt: Statement,
    cursor: &mut Cursor,
) -> Statement {
    cursor.push(stmt.kind(), stmt.id());
    let stmt = visitor.visit_statement(stmt, cursor);
    let stmt = match stmt {
        Statement::Block(block) => Statement::Block(walk_block_inner(visitor, block, cursor)),
        Statement::Class(class) => {
            // The class frame was pushed with the statement; reuse it.
            let class = visitor.visit_class(*class, cursor);
            let rebuilt = walk_class_fields(visitor, class, cursor);
            Statement::Class(Box::new(rebuilt))
        }
        Statement::Method(method) => {
            Statement::Method(Box::new(walk_method_inner(visitor, *method, cursor)))
        }
        Statement::Variable(decls) => {
            Statement::Variable(Box::new(walk_variables_inner(visitor, *decls, cursor)))
        }
        Statement::EnumValues(values) => {
            let EnumValueSet {
                id,
                prefix,
                values,
                terminated,
            } = *values;
            let prefix = visitor.visit_space(prefix, SpaceLoc::Prefix, cursor);
            let values = values
                .into_iter()
                .map(|p| {
                    let Padded { elem, after } = p;
                    cursor.push(NodeKind::EnumValue, elem.id);
                    let value_prefix =
                        visitor.visit_space(elem.prefix, SpaceLoc::Prefix, cursor);
                    let annotations = elem
                        .annotations
                        .into_iter()
                        .map(|a| walk_annotation(visitor, a, cursor))
                        .collect();
                    let name = walk_ident(visitor, elem.name, cursor);
                    let args = elem.args.map(|a| walk_expr_container(visitor, a, cursor));
                    cursor.pop();
                    let after = visitor.visit_space(after, SpaceLoc::PaddedAfter, cursor);
                    Padded::new(
                        EnumValue {
                            id: elem.id,
                            prefix: value_prefix,
                            annotations,
                            name,
                            args,
                        },
                        after,
                    )
                })
                .collect();
            Statement::EnumValues(Box::new(EnumValueSet {
                id,
                prefix,
                values,
                terminated,
            }))
        }
        Statement::Expr(expr) => {
            Statement::Expr(Box::new(walk_expression_inner(visitor, *expr, cursor)))
        }
        Statement::If(if_stmt) => {
            let IfStmt {
                id,
                prefix,
                condition,
                then_part,
                else_part,
            } = *if_stmt;
            let prefix = visitor.visit_space(prefix, SpaceLoc::Prefix, cursor);
            let condition = walk_control_parens(visitor, condition, cursor);
            let then_part = walk_padded_boxed(visitor, then_part, cursor);
            let else_part = else_part.map(|e| {
                let else_prefix = visitor.visit_space(e.prefix, SpaceLoc::ElsePrefix, cursor);
                ElseClause {
                    id: e.id,
                    prefix: else_prefix,
                    body: walk_padded_boxed(visitor, e.body, cursor),
                }
            });
            Statement::If(Box::new(IfStmt {
                id,
                prefix,
                condition,
                then_part,
                else_part,
            }))
        }
        Statement::For(for_loop) => {
            let ForLoop {
                id,
                prefix,
                control,
                body,
            } = *for_loop;
            let prefix = visitor.visit_space(prefix, SpaceLoc::Prefix, cursor);
            let control_prefix =
                visitor.visit_space(control.prefix, SpaceLoc::ControlPrefix, cursor);
            let init = control
                .init
                .into_iter()
                .map(|p| {
                    let elem = walk_statement(visitor, p.elem, cursor);
                    let after = visitor.visit_space(p.after, SpaceLoc::PaddedAfter, cursor);
                    Padded::new(elem, after)
                })
                .collect();
            let condition = {
                let elem = walk_expression(visitor, control.condition.elem, cursor);
                let after =
                    visitor.visit_space(control.condition.after, SpaceLoc::PaddedAfter, cursor);
                Padded::new(elem, after)
            };
            let update = control
                .update
                .into_iter()
                .map(|p| {
                    let elem = walk_statement(visitor, p.elem, cursor);
                    let after = visitor.visit_space(p.after, SpaceLoc::PaddedAfter, cursor);
                    Padded::new(elem, after)
                })
                .collect();
            let body = walk_padded_boxed(visitor, body, cursor);
            Statement::For(Box::new(ForLoop {
                id,
                prefix,
                control: ForControl {
                    prefix: control_prefix,
                    init,
                    condition,
                    update,
                },
                body,
            }))
        }
        Statement::ForEach(foreach) => {
            let ForEachLoop {
                id,
                prefix,
                control,
                body,
            } = *foreach;
            let prefix = visitor.visit_space(prefix, SpaceLoc::Prefix, cursor);
            let control_prefix =
                visitor.visit_space(control.prefix, SpaceLoc::ControlPrefix, cursor);
            let variable = {
                let elem = walk_variables(visitor, control.variable.elem, cursor);
                let after =
                    visitor.visit_space(control.variable.after, SpaceLoc::PaddedAfter, cursor);
                Padded::new(elem, after)
            };
            let iterable = {
                let elem = walk_expression(visitor, control.iterable.elem, cursor);
                let after =
                    visitor.visit_space(control.iterable.after, SpaceLoc::PaddedAfter, cursor);
                Padded::new(elem, after)
            };
            let body = walk_padded_boxed(visitor, body, cursor);
            Statement::ForEach(Box::new(ForEachLoop {
                id,
                prefix,
                control: ForEachControl {
                    prefix: control_prefix,
                    variable,
                    iterable,
                },
                body,
            }))
        }
        Statement::While(while_loop) => {
            let WhileLoop {
                id,
                prefix,
                condition,
                body,
            } = *while_loop;
            let prefix = visitor.visit_space(prefix, SpaceLoc::Prefix, cursor);
            let condition = walk_control_parens(visitor, condition, cursor);
            let body = walk_padded_boxed(visitor, body, cursor);
            Statement::While(Box::new(WhileLoop {
                id,
                prefix,
                condition,
                body,
            }))
        }
        Statement::DoWhile(do_while) => {
            let DoWhileLoop {
                id,
                prefix,
                body,
                while_prefix,
                condition,
            } = *do_while;
            let prefix = visitor.visit_space(prefix, SpaceLoc::Prefix, cursor);
            let body = walk_padded_boxed(visitor, body, cursor);
            let while_prefix = visitor.visit_space(while_prefix, SpaceLoc::WhilePrefix, cursor);
            let condition = walk_control_parens(visitor, condition, cursor);
            Statement::DoWhile(Box::new(DoWhileLoop {
                id,
                prefix,
                body,
                while_prefix,
                condition,
            }))
        }
        Statement::Switch(switch) => {
            let SwitchStmt {
                id,
                prefix,
                selector,
                cases,
            } = *switch;
            let prefix = visitor.visit_space(prefix, SpaceLoc::Prefix, cursor);
            let selector = walk_control_parens(visitor, selector, cursor);
            let cases = walk_block(visitor, cases, cursor);
            Statement::Switch(Box::new(SwitchStmt {
                id,
                prefix,
                selector,
                cases,
            }))
        }
        Statement::Case(case) => {
            let CaseStmt {
                id,
                prefix,
                label,
                statements,
            } = *case;
            let prefix = visitor.visit_space(prefix, SpaceLoc::Prefix, cursor);
            let label = match label {
                CaseLabel::Expr(p) => {
                    let elem = walk_expression(visitor, p.elem, cursor);
                    let after = visitor.visit_space(p.after, SpaceLoc::PaddedAfter, cursor);
                    CaseLabel::Expr(Padded::new(elem, after))
                }
                CaseLabel::Default(colon) => CaseLabel::Default(visitor.visit_space(
                    colon,
                    SpaceLoc::PaddedAfter,
                    cursor,
                )),
            };
            let statements = statements
                .into_iter()
                .map(|p| {
                    let elem = walk_statement(visitor, p.elem, cursor);
                    let after = visitor.visit_space(p.after, SpaceLoc::PaddedAfter, cursor);
                    Padded::new(elem, after)
                })
                .collect();
            Statement::Case(Box::new(CaseStmt {
                id,
                prefix,
                label,
                statements,
            }))
        }
        Statement::Label(label) => {
            let LabelStmt {
                id,
                prefix,
                name,
                statement,
            } = *label;
            let prefix = visitor.visit_space(prefix, SpaceLoc::Prefix, cursor);
            let name = {
                let elem = walk_ident(visitor, name.elem, cursor);
                let after = visitor.visit_space(name.after, SpaceLoc::PaddedAfter, cursor);
                Padded::new(elem, after)
            };
            let statement = Box::new(walk_statement(visitor, *statement, cursor));
            Statement::Label(Box::new(LabelStmt {
                id,
                prefix,
                name,
                statement,
            }))
        }
        Statement::Return(ret) => {
            let ReturnStmt { id, prefix, expr } = *ret;
            let prefix = visitor.visit_space(prefix, SpaceLoc::Prefix, cursor);
            let expr = expr.map(|e| walk_expression(visitor, e, cursor));
            Statement::Return(Box::new(ReturnStmt { id, prefix, expr }))
        }
        Statement::Throw(throw) => {
            let ThrowStmt { id, prefix, expr } = *throw;
            let prefix = visitor.visit_space(prefix, SpaceLoc::Prefix, cursor);
            let expr = walk_expression(visitor, expr, cursor);
            Statement::Throw(Box::new(ThrowStmt { id, prefix, expr }))
        }
        Statement::Break(brk) => {
            let BreakStmt { id, prefix, label } = *brk;
            let prefix = visitor.visit_space(prefix, SpaceLoc::Prefix, cursor);
            let label = label.map(|l| walk_ident(visitor, l, cursor));
            Statement::Break(Box::new(BreakStmt { id, prefix, label }))
        }
        Statement::Continue(cont) => {
            let ContinueStmt { id, prefix, label } = *cont;
            let prefix = visitor.visit_space(prefix, SpaceLoc::Prefix, cursor);
            let label = label.map(|l| walk_ident(visitor, l, cursor));
            Statement::Continue(Box::new(ContinueStmt { id, prefix, label }))
        }
        Statement::Empty(empty) => Statement::Empty(EmptyNode {
            id: empty.id,
            prefix: visitor.visit_space(empty.prefix, SpaceLoc::Prefix, cursor),
        }),
    };
    cursor.pop();
    stmt
}

/// Class fields minus the frame management — used when the frame was already
/// pushed by `walk_statement`.
fn walk_class_fields<V: Visitor>(
    visitor: &mut V,
    class: ClassDecl,
    cursor: &mut Cursor,
) -> ClassDecl {
    let ClassDecl {
        id,
        prefix,
        annotations,
        modifiers,
        kind,
        kind_prefix,
        name,
        components,
        extends,
        implements,
        body,
    } = class;
    let prefix = visitor.visit_space(prefix, SpaceLoc::Prefix, cursor);
    let annotations = annotations
        .into_iter()
        .map(|a| walk_annotation(visitor, a, cursor))
        .collect();
    let modifiers = modifiers
        .into_iter()
        .map(|m| walk_modifier(visitor, m, cursor))
        .collect();
    let kind_prefix = visitor.visit_space(kind_prefix, SpaceLoc::KindPrefix, cursor);
    let name = walk_ident(visitor, name, cursor);
    let components = components.map(|c| walk_stmt_container(visitor, c, cursor));
    let extends = extends.map(|e| {
        let before = visitor.visit_space(e.before, SpaceLoc::OperatorBefore, cursor);
        LeftPadded::new(before, walk_type_name(visitor, e.elem, cursor))
    });
    let implements = implements.map(|i| walk_type_list(visitor, i, cursor));
    let body = walk_block(visitor, body, cursor);
    ClassDecl {
        id,
        prefix,
        annotations,
        modifiers,
        kind,
        kind_prefix,
        name,
        components,
        extends,
        implements,
        body,
    }
}

pub(crate) fn walk_expression<V: Visitor>(
    visitor: &mut V,
    expr: Expression,
    cursor: &mut Cursor,
) -> Expression {
    cursor.push(expr.kind(), expr.id());
    let expr = walk_expression_inner(visitor, expr, cursor);
    cursor.pop();
    expr
}

fn walk_expression_inner<V: Visitor>(
    visitor: &mut V,
    expr: Expression,
    cursor: &mut Cursor,
) -> Expression {
    let expr = visitor.visit_expression(expr, cursor);
    match expr {
        Expression::Identifier(ident) => {
            let Ident { id, prefix, text } = ident;
            let prefix = visitor.visit_space(prefix, SpaceLoc::Prefix, cursor);
            Expression::Identifier(Ident { id, prefix, text })
        }
        Expression::FieldAccess(access) => {
            let FieldAccess {
                id,
                prefix,
                target,
                name,
            } = *access;
            let prefix = visitor.visit_space(prefix, SpaceLoc::Prefix, cursor);
            let target = {
                let elem = walk_expression(visitor, *target.elem, cursor);
                let after = visitor.visit_space(target.after, SpaceLoc::PaddedAfter, cursor);
                Padded::new(Box::new(elem), after)
            };
            let name = walk_ident(visitor, name, cursor);
            Expression::FieldAccess(Box::new(FieldAccess {
                id,
                prefix,
                target,
                name,
            }))
        }
        Expression::Literal(literal) => {
            let Literal {
                id,
                prefix,
                kind,
                text,
            } = literal;
            let prefix = visitor.visit_space(prefix, SpaceLoc::Prefix, cursor);
            Expression::Literal(Literal {
                id,
                prefix,
                kind,
                text,
            })
        }
        Expression::Binary(binary) => {
            let Binary {
                id,
                prefix,
                left,
                op,
                right,
            } = *binary;
            let prefix = visitor.visit_space(prefix, SpaceLoc::Prefix, cursor);
            let left = walk_expression(visitor, left, cursor);
            let op_before = visitor.visit_space(op.before, SpaceLoc::OperatorBefore, cursor);
            let right = walk_expression(visitor, right, cursor);
            Expression::Binary(Box::new(Binary {
                id,
                prefix,
                left,
                op: LeftPadded::new(op_before, op.elem),
                right,
            }))
        }
        Expression::Unary(unary) => {
            let Unary {
                id,
                prefix,
                op,
                op_space,
                expr,
            } = *unary;
            let prefix = visitor.visit_space(prefix, SpaceLoc::Prefix, cursor);
            let expr = walk_expression(visitor, expr, cursor);
            let op_space = visitor.visit_space(op_space, SpaceLoc::OperatorBefore, cursor);
            Expression::Unary(Box::new(Unary {
                id,
                prefix,
                op,
                op_space,
                expr,
            }))
        }
        Expression::Assignment(assign) => {
            let Assignment {
                id,
                prefix,
                target,
                op,
                op_prefix,
                value,
            } = *assign;
            let prefix = visitor.visit_space(prefix, SpaceLoc::Prefix, cursor);
            let target = walk_expression(visitor, target, cursor);
            let op_prefix = visitor.visit_space(op_prefix, SpaceLoc::OperatorBefore, cursor);
            let value = walk_expression(visitor, value, cursor);
            Expression::Assignment(Box::new(Assignment {
                id,
                prefix,
                target,
                op,
                op_prefix,
                value,
            }))
        }
        Expression::Ternary(ternary) => {
            let Ternary {
                id,
                prefix,
                condition,
                true_part,
                false_part,
            } = *ternary;
            let prefix = visitor.visit_space(prefix, SpaceLoc::Prefix, cursor);
            let condition = walk_expression(visitor, condition, cursor);
            let true_before =
                visitor.visit_space(true_part.before, SpaceLoc::OperatorBefore, cursor);
            let true_elem = walk_expression(visitor, true_part.elem, cursor);
            let false_before =
                visitor.visit_space(false_part.before, SpaceLoc::OperatorBefore, cursor);
            let false_elem = walk_expression(visitor, false_part.elem, cursor);
            Expression::Ternary(Box::new(Ternary {
                id,
                prefix,
                condition,
                true_part: LeftPadded::new(true_before, true_elem),
                false_part: LeftPadded::new(false_before, false_elem),
            }))
        }
        Expression::Invocation(invocation) => {
            let MethodInvocation {
                id,
                prefix,
                select,
                name,
                args,
            } = *invocation;
            let prefix = visitor.visit_space(prefix, SpaceLoc::Prefix, cursor);
            let select = select.map(|s| {
                let elem = walk_expression(visitor, *s.elem, cursor);
                let after = visitor.visit_space(s.after, SpaceLoc::PaddedAfter, cursor);
                Padded::new(Box::new(elem), after)
            });
            let name = walk_ident(visitor, name, cursor);
            let args = walk_expr_container(visitor, args, cursor);
            Expression::Invocation(Box::new(MethodInvocation {
                id,
                prefix,
                select,
                name,
                args,
            }))
        }
        Expression::NewClass(new_class) => {
            let NewClass {
                id,
                prefix,
                type_name,
                args,
            } = *new_class;
            let prefix = visitor.visit_space(prefix, SpaceLoc::Prefix, cursor);
            let type_name = walk_type_name(visitor, type_name, cursor);
            let args = walk_expr_container(visitor, args, cursor);
            Expression::NewClass(Box::new(NewClass {
                id,
                prefix,
                type_name,
                args,
            }))
        }
        Expression::ArrayAccess(access) => {
            let ArrayAccess {
                id,
                prefix,
                target,
                dim_prefix,
                index,
            } = *access;
            let prefix = visitor.visit_space(prefix, SpaceLoc::Prefix, cursor);
            let target = walk_expression(visitor, target, cursor);
            let dim_prefix = visitor.visit_space(dim_prefix, SpaceLoc::DimPrefix, cursor);
            let index = {
                let elem = walk_expression(visitor, *index.elem, cursor);
                let after = visitor.visit_space(index.after, SpaceLoc::PaddedAfter, cursor);
                Padded::new(Box::new(elem), after)
            };
            Expression::ArrayAccess(Box::new(ArrayAccess {
                id,
                prefix,
                target,
                dim_prefix,
                index,
            }))
        }
        Expression::Parens(parens) => {
            let Parentheses { id, prefix, tree } = *parens;
            let prefix = visitor.visit_space(prefix, SpaceLoc::Prefix, cursor);
            let tree = {
                let elem = walk_expression(visitor, *tree.elem, cursor);
                let after = visitor.visit_space(tree.after, SpaceLoc::PaddedAfter, cursor);
                Padded::new(Box::new(elem), after)
            };
            Expression::Parens(Box::new(Parentheses { id, prefix, tree }))
        }
        Expression::Empty(empty) => Expression::Empty(EmptyNode {
            id: empty.id,
            prefix: visitor.visit_space(empty.prefix, SpaceLoc::Prefix, cursor),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parser::parse_unit;
    use crate::syntax::printer::print_unit;

    struct IdentityVisitor;
    impl Visitor for IdentityVisitor {}

    #[test]
    fn identity_walk_preserves_the_tree() {
        let source = "class A {\n  int x = 1;\n  void f() { for (int i = 0; i < 3; i++) x += i; }\n}\n";
        let unit = parse_unit(source).unwrap();
        let walked = walk_unit(&mut IdentityVisitor, unit.clone());
        assert_eq!(walked, unit);
        assert_eq!(print_unit(&walked), source);
    }

    struct SpaceCounter {
        count: usize,
    }
    impl Visitor for SpaceCounter {
        fn visit_space(&mut self, space: Space, _loc: SpaceLoc, _cursor: &mut Cursor) -> Space {
            self.count += 1;
            space
        }
    }

    #[test]
    fn walker_reaches_every_space() {
        // Spot check: a tree with N tokens has at least N space slots
        // visited (every token's leading space plus padding slots).
        let source = "class A { void f(int a) { a = a + 1; } }";
        let unit = parse_unit(source).unwrap();
        let mut counter = SpaceCounter { count: 0 };
        walk_unit(&mut counter, unit);
        assert!(counter.count >= 20, "visited only {}", counter.count);
    }

    struct NewlineEraser;
    impl Visitor for NewlineEraser {
        fn visit_space(&mut self, space: Space, _loc: SpaceLoc, _cursor: &mut Cursor) -> Space {
            if space.comments.is_empty() && space.has_newline() {
                space.with_whitespace(" ")
            } else {
                space
            }
        }
    }

    #[test]
    fn space_rewrites_flow_into_the_printed_output() {
        let unit = parse_unit("class A {\n  int x;\n}\n").unwrap();
        let flattened = walk_unit(&mut NewlineEraser, unit);
        assert_eq!(print_unit(&flattened), "class A { int x; } ");
    }
}
