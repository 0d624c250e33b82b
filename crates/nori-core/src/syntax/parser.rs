//! Recursive-descent parser producing the lossless tree
//!
//! Builds a [`CompilationUnit`] from the trivia-attributed token stream. The
//! parser's single obligation beyond shape is space accounting: every token's
//! leading [`Space`] ends up in exactly one slot of the tree, so printing
//! reproduces the source byte-for-byte.
//!
//! Two conventions keep that accounting uniform:
//!
//! - The outermost node starting at a token owns that token's space as its
//!   `prefix`; inner nodes starting at the same token carry an empty prefix
//!   (`take_prefix` when a wider expression takes over, explicit hoisting for
//!   declaration preludes).
//! - The space before a separator or closer lives in the preceding element's
//!   `after`; empty delimited lists get one placeholder element whose prefix
//!   carries the interior space.

use std::mem;

use crate::error::NoriError;
use crate::result::Result;

use super::lexer::{LexOutput, Token, TokenKind, lex};
use super::space::Space;
use super::tree::*;

/// Parse a compilation unit from source text.
pub fn parse_unit(source: &str) -> Result<CompilationUnit> {
    let LexOutput { tokens, eof_space } = lex(source)?;
    let mut parser = Parser { tokens, pos: 0 };

    let package = if parser.at_word("package") {
        let kw = parser.bump();
        let name = parser.parse_qualified_name(false)?;
        let semi = parser.expect(";")?;
        Some(Padded::new(
            PackageDecl {
                id: NodeId::fresh(),
                prefix: kw.space,
                name,
            },
            semi.space,
        ))
    } else {
        None
    };

    let mut imports = Vec::new();
    while parser.at_word("import") {
        let kw = parser.bump();
        let static_prefix = if parser.at_word("static") {
            Some(parser.bump().space)
        } else {
            None
        };
        let name = parser.parse_qualified_name(true)?;
        let semi = parser.expect(";")?;
        imports.push(Padded::new(
            ImportDecl {
                id: NodeId::fresh(),
                prefix: kw.space,
                static_prefix,
                name,
            },
            semi.space,
        ));
    }

    let mut types = Vec::new();
    while parser.peek().is_some() {
        match parser.parse_member()? {
            Statement::Class(class) => types.push(*class),
            other => {
                return Err(parser.err_here(format!(
                    "expected a type declaration at top level, found {:?}",
                    other.kind()
                )));
            }
        }
    }

    Ok(CompilationUnit {
        id: NodeId::fresh(),
        package,
        imports,
        types,
        eof: eof_space,
    })
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    // -- token plumbing ----------------------------------------------------

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn at(&self, text: &str) -> bool {
        self.peek().is_some_and(|t| t.is(text))
    }

    fn at_offset(&self, offset: usize, text: &str) -> bool {
        self.peek_at(offset).is_some_and(|t| t.is(text))
    }

    fn at_word(&self, word: &str) -> bool {
        self.peek().is_some_and(|t| t.is_word(word))
    }

    fn at_any_word(&self) -> bool {
        self.peek().is_some_and(|t| t.kind == TokenKind::Word)
    }

    fn at_modifier(&self) -> bool {
        self.peek().is_some_and(|t| {
            t.kind == TokenKind::Word && ModifierKind::from_keyword(&t.text).is_some()
        })
    }

    fn at_class_kind(&self) -> bool {
        self.at_word("class") || self.at_word("interface") || self.at_word("enum")
            || self.at_word("record")
    }

    fn bump(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        self.pos += 1;
        token
    }

    fn expect(&mut self, text: &str) -> Result<Token> {
        match self.peek() {
            Some(t) if t.is(text) => Ok(self.bump()),
            Some(t) => Err(NoriError::parse(
                format!("expected `{}`, found `{}`", text, t.text),
                t.line,
                t.col,
            )),
            None => Err(NoriError::parse(
                format!("expected `{text}`, found end of input"),
                0,
                0,
            )),
        }
    }

    fn expect_word(&mut self) -> Result<Token> {
        match self.peek() {
            Some(t) if t.kind == TokenKind::Word => Ok(self.bump()),
            Some(t) => Err(NoriError::parse(
                format!("expected an identifier, found `{}`", t.text),
                t.line,
                t.col,
            )),
            None => Err(NoriError::parse(
                "expected an identifier, found end of input",
                0,
                0,
            )),
        }
    }

    fn err_here(&self, message: impl Into<String>) -> NoriError {
        match self.peek() {
            Some(t) => NoriError::parse(message, t.line, t.col),
            None => NoriError::parse(message, 0, 0),
        }
    }

    // -- names and types ---------------------------------------------------

    fn parse_qualified_name(&mut self, allow_star: bool) -> Result<QualifiedName> {
        let first = self.expect_word()?;
        let mut parts = vec![Padded::bare(Ident::new(first.space, first.text))];
        while self.at(".") {
            let dot = self.bump();
            parts.last_mut().expect("at least one part").after = dot.space;
            let next = if allow_star && self.at("*") {
                self.bump()
            } else {
                self.expect_word()?
            };
            parts.push(Padded::bare(Ident::new(next.space, next.text)));
        }
        Ok(QualifiedName { parts })
    }

    fn parse_type_name(&mut self) -> Result<TypeName> {
        let mut name = self.parse_qualified_name(false)?;
        let prefix = mem::take(&mut name.parts[0].elem.prefix);
        let type_args = if self.at("<") {
            Some(self.parse_type_args()?)
        } else {
            None
        };
        let dims = self.parse_dims();
        Ok(TypeName {
            id: NodeId::fresh(),
            prefix,
            name,
            type_args,
            dims,
        })
    }

    fn parse_type_args(&mut self) -> Result<Container<TypeName>> {
        let open = self.expect("<")?;
        let mut elems = Vec::new();
        if self.at(">") {
            // Diamond: a nameless placeholder carries the interior space.
            let close = self.bump();
            elems.push(Padded::bare(TypeName {
                id: NodeId::fresh(),
                prefix: close.space,
                name: QualifiedName { parts: Vec::new() },
                type_args: None,
                dims: Vec::new(),
            }));
            return Ok(Container::new(open.space, elems));
        }
        loop {
            let ty = self.parse_type_name()?;
            if self.at(",") {
                let comma = self.bump();
                elems.push(Padded::new(ty, comma.space));
            } else {
                let close = self.expect(">")?;
                elems.push(Padded::new(ty, close.space));
                break;
            }
        }
        Ok(Container::new(open.space, elems))
    }

    fn parse_dims(&mut self) -> Vec<ArrayDim> {
        let mut dims = Vec::new();
        while self.at("[") && self.at_offset(1, "]") {
            let open = self.bump();
            let close = self.bump();
            dims.push(ArrayDim {
                prefix: open.space,
                inner: close.space,
            });
        }
        dims
    }

    /// `implements A, B` / `throws E1, E2` — no closing delimiter, so the
    /// last element's `after` stays empty.
    fn parse_type_list(&mut self, before: Space) -> Result<Container<TypeName>> {
        let mut elems = Vec::new();
        loop {
            let ty = self.parse_type_name()?;
            if self.at(",") {
                let comma = self.bump();
                elems.push(Padded::new(ty, comma.space));
            } else {
                elems.push(Padded::bare(ty));
                break;
            }
        }
        Ok(Container::new(before, elems))
    }

    // -- declarations ------------------------------------------------------

    fn parse_prelude(&mut self) -> Result<(Vec<Annotation>, Vec<Modifier>)> {
        let mut annotations = Vec::new();
        let mut modifiers = Vec::new();
        loop {
            if self.at("@") {
                if !modifiers.is_empty() {
                    return Err(self.err_here("annotations must precede modifiers"));
                }
                annotations.push(self.parse_annotation()?);
            } else if self.at_modifier() {
                let word = self.bump();
                let kind = ModifierKind::from_keyword(&word.text).expect("checked by at_modifier");
                modifiers.push(Modifier {
                    id: NodeId::fresh(),
                    prefix: word.space,
                    kind,
                });
            } else {
                break;
            }
        }
        Ok((annotations, modifiers))
    }

    fn parse_annotation(&mut self) -> Result<Annotation> {
        let at = self.expect("@")?;
        let name = self.expect_word()?;
        let args = if self.at("(") {
            Some(self.parse_args_container()?)
        } else {
            None
        };
        Ok(Annotation {
            id: NodeId::fresh(),
            prefix: at.space,
            name: Ident::new(name.space, name.text),
            args,
        })
    }

    /// The declaration's prefix is the space of its first token, hoisted out
    /// of whichever element carried it.
    fn hoist_prefix(
        annotations: &mut [Annotation],
        modifiers: &mut [Modifier],
        fallback: &mut Space,
    ) -> Space {
        if let Some(first) = annotations.first_mut() {
            mem::take(&mut first.prefix)
        } else if let Some(first) = modifiers.first_mut() {
            mem::take(&mut first.prefix)
        } else {
            mem::take(fallback)
        }
    }

    /// Class member: nested type, constructor, method, field, initializer
    /// block, or stray `;`.
    fn parse_member(&mut self) -> Result<Statement> {
        if self.at(";") {
            let semi = self.bump();
            return Ok(Statement::Empty(EmptyNode {
                id: NodeId::fresh(),
                prefix: semi.space,
            }));
        }
        if self.at("{") {
            return Ok(Statement::Block(self.parse_block()?));
        }
        let (mut annotations, mut modifiers) = self.parse_prelude()?;
        if self.at_class_kind() {
            return Ok(Statement::Class(Box::new(
                self.parse_class_rest(annotations, modifiers)?,
            )));
        }
        // Constructor: a bare name directly followed by `(`.
        if self.at_any_word() && self.at_offset(1, "(") {
            return Ok(Statement::Method(Box::new(self.parse_method_rest(
                annotations,
                modifiers,
                None,
            )?)));
        }
        let ty = self.parse_type_name()?;
        if self.at_any_word() && self.at_offset(1, "(") {
            return Ok(Statement::Method(Box::new(self.parse_method_rest(
                annotations,
                modifiers,
                Some(ty),
            )?)));
        }
        let decls = self.parse_variable_rest(&mut annotations, &mut modifiers, ty, true)?;
        Ok(Statement::Variable(Box::new(decls)))
    }

    fn parse_class_rest(
        &mut self,
        mut annotations: Vec<Annotation>,
        mut modifiers: Vec<Modifier>,
    ) -> Result<ClassDecl> {
        let kind_tok = self.bump();
        let kind = match kind_tok.text.as_str() {
            "class" => ClassKind::Class,
            "interface" => ClassKind::Interface,
            "enum" => ClassKind::Enum,
            "record" => ClassKind::Record,
            other => return Err(self.err_here(format!("unexpected declaration kind `{other}`"))),
        };
        let mut kind_prefix = kind_tok.space;
        let prefix = Self::hoist_prefix(&mut annotations, &mut modifiers, &mut kind_prefix);

        let name_tok = self.expect_word()?;
        let name = Ident::new(name_tok.space, name_tok.text);

        let components = if kind == ClassKind::Record && self.at("(") {
            Some(self.parse_param_container()?)
        } else {
            None
        };

        let mut extends = None;
        let mut implements = None;
        if self.at_word("extends") {
            let kw = self.bump();
            if kind == ClassKind::Interface {
                // Interface supertype lists ride in the implements slot.
                implements = Some(self.parse_type_list(kw.space)?);
            } else {
                extends = Some(LeftPadded::new(kw.space, self.parse_type_name()?));
            }
        }
        if self.at_word("implements") {
            let kw = self.bump();
            implements = Some(self.parse_type_list(kw.space)?);
        }

        let body = if kind == ClassKind::Enum {
            self.parse_enum_body()?
        } else {
            self.parse_class_body()?
        };

        Ok(ClassDecl {
            id: NodeId::fresh(),
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
        })
    }

    fn parse_class_body(&mut self) -> Result<Block> {
        let open = self.expect("{")?;
        let mut statements = Vec::new();
        while !self.at("}") {
            if self.peek().is_none() {
                return Err(self.err_here("unterminated class body"));
            }
            let member = self.parse_member()?;
            let after = if member.needs_semicolon() {
                self.expect(";")?.space
            } else {
                Space::empty()
            };
            statements.push(Padded::new(member, after));
        }
        let close = self.bump();
        Ok(Block {
            id: NodeId::fresh(),
            prefix: open.space,
            statements,
            end: close.space,
        })
    }

    fn parse_enum_body(&mut self) -> Result<Block> {
        let open = self.expect("{")?;
        let mut statements = Vec::new();

        if !self.at("}") {
            let value_set = if self.at(";") {
                let semi = self.bump();
                EnumValueSet {
                    id: NodeId::fresh(),
                    prefix: semi.space,
                    values: Vec::new(),
                    terminated: true,
                }
            } else {
                let mut values = Vec::new();
                let mut terminated = false;
                loop {
                    let value = self.parse_enum_value()?;
                    if self.at(",") {
                        let comma = self.bump();
                        values.push(Padded::new(value, comma.space));
                    } else if self.at(";") {
                        let semi = self.bump();
                        values.push(Padded::new(value, semi.space));
                        terminated = true;
                        break;
                    } else {
                        values.push(Padded::bare(value));
                        break;
                    }
                }
                let prefix = mem::take(&mut values[0].elem.prefix);
                EnumValueSet {
                    id: NodeId::fresh(),
                    prefix,
                    values,
                    terminated,
                }
            };
            statements.push(Padded::bare(Statement::EnumValues(Box::new(value_set))));

            while !self.at("}") {
                if self.peek().is_none() {
                    return Err(self.err_here("unterminated enum body"));
                }
                let member = self.parse_member()?;
                let after = if member.needs_semicolon() {
                    self.expect(";")?.space
                } else {
                    Space::empty()
                };
                statements.push(Padded::new(member, after));
            }
        }

        let close = self.expect("}")?;
        Ok(Block {
            id: NodeId::fresh(),
            prefix: open.space,
            statements,
            end: close.space,
        })
    }

    fn parse_enum_value(&mut self) -> Result<EnumValue> {
        let mut annotations = Vec::new();
        while self.at("@") {
            annotations.push(self.parse_annotation()?);
        }
        let name_tok = self.expect_word()?;
        let mut name = Ident::new(name_tok.space, name_tok.text);
        let prefix = if let Some(first) = annotations.first_mut() {
            mem::take(&mut first.prefix)
        } else {
            mem::take(&mut name.prefix)
        };
        let args = if self.at("(") {
            Some(self.parse_args_container()?)
        } else {
            None
        };
        Ok(EnumValue {
            id: NodeId::fresh(),
            prefix,
            annotations,
            name,
            args,
        })
    }

    fn parse_method_rest(
        &mut self,
        mut annotations: Vec<Annotation>,
        mut modifiers: Vec<Modifier>,
        mut return_type: Option<TypeName>,
    ) -> Result<MethodDecl> {
        let name_tok = self.expect_word()?;
        let mut name = Ident::new(name_tok.space, name_tok.text);
        let prefix = match return_type.as_mut() {
            Some(ty) => Self::hoist_prefix(&mut annotations, &mut modifiers, &mut ty.prefix),
            None => Self::hoist_prefix(&mut annotations, &mut modifiers, &mut name.prefix),
        };
        let params = self.parse_param_container()?;
        let throws = if self.at_word("throws") {
            let kw = self.bump();
            Some(self.parse_type_list(kw.space)?)
        } else {
            None
        };
        let body = if self.at("{") {
            Some(self.parse_block()?)
        } else {
            None
        };
        Ok(MethodDecl {
            id: NodeId::fresh(),
            prefix,
            annotations,
            modifiers,
            return_type,
            name,
            params,
            throws,
            body,
        })
    }

    fn parse_param_container(&mut self) -> Result<Container<Statement>> {
        let open = self.expect("(")?;
        let mut elems = Vec::new();
        if self.at(")") {
            let close = self.bump();
            elems.push(Padded::bare(Statement::Empty(EmptyNode {
                id: NodeId::fresh(),
                prefix: close.space,
            })));
            return Ok(Container::new(open.space, elems));
        }
        loop {
            let param = Statement::Variable(Box::new(self.parse_variable_decls(false)?));
            if self.at(",") {
                let comma = self.bump();
                elems.push(Padded::new(param, comma.space));
            } else {
                let close = self.expect(")")?;
                elems.push(Padded::new(param, close.space));
                break;
            }
        }
        Ok(Container::new(open.space, elems))
    }

    fn parse_variable_decls(&mut self, multi: bool) -> Result<VariableDecls> {
        let (mut annotations, mut modifiers) = self.parse_prelude()?;
        let ty = self.parse_type_name()?;
        self.parse_variable_rest(&mut annotations, &mut modifiers, ty, multi)
    }

    fn parse_variable_rest(
        &mut self,
        annotations: &mut Vec<Annotation>,
        modifiers: &mut Vec<Modifier>,
        mut ty: TypeName,
        multi: bool,
    ) -> Result<VariableDecls> {
        let prefix = Self::hoist_prefix(annotations, modifiers, &mut ty.prefix);
        let mut vars = Vec::new();
        loop {
            let name_tok = self.expect_word()?;
            let name = Ident::new(name_tok.space, name_tok.text);
            let dims = self.parse_dims();
            let initializer = if self.at("=") {
                let eq = self.bump();
                Some(LeftPadded::new(eq.space, self.parse_expression()?))
            } else {
                None
            };
            let var = NamedVariable {
                id: NodeId::fresh(),
                name,
                dims,
                initializer,
            };
            if multi && self.at(",") {
                let comma = self.bump();
                vars.push(Padded::new(var, comma.space));
            } else {
                vars.push(Padded::bare(var));
                break;
            }
        }
        Ok(VariableDecls {
            id: NodeId::fresh(),
            prefix,
            annotations: mem::take(annotations),
            modifiers: mem::take(modifiers),
            type_expr: ty,
            vars,
        })
    }

    // -- statements --------------------------------------------------------

    fn parse_block(&mut self) -> Result<Block> {
        let open = self.expect("{")?;
        let mut statements = Vec::new();
        while !self.at("}") {
            if self.peek().is_none() {
                return Err(self.err_here("unterminated block"));
            }
            statements.push(self.parse_padded_statement()?);
        }
        let close = self.bump();
        Ok(Block {
            id: NodeId::fresh(),
            prefix: open.space,
            statements,
            end: close.space,
        })
    }

    fn parse_padded_statement(&mut self) -> Result<Padded<Statement>> {
        let stmt = self.parse_statement()?;
        let after = if stmt.needs_semicolon() {
            self.expect(";")?.space
        } else {
            Space::empty()
        };
        Ok(Padded::new(stmt, after))
    }

    fn parse_padded_boxed(&mut self) -> Result<Padded<Box<Statement>>> {
        let padded = self.parse_padded_statement()?;
        Ok(Padded::new(Box::new(padded.elem), padded.after))
    }

    fn parse_statement(&mut self) -> Result<Statement> {
        if self.at(";") {
            let semi = self.bump();
            return Ok(Statement::Empty(EmptyNode {
                id: NodeId::fresh(),
                prefix: semi.space,
            }));
        }
        if self.at("{") {
            return Ok(Statement::Block(self.parse_block()?));
        }
        if let Some(tok) = self.peek() {
            if tok.kind == TokenKind::Word {
                match tok.text.as_str() {
                    "if" => return self.parse_if(),
                    "for" => return self.parse_for(),
                    "while" => return self.parse_while(),
                    "do" => return self.parse_do_while(),
                    "switch" => return self.parse_switch(),
                    "return" => {
                        let kw = self.bump();
                        let expr = if self.at(";") {
                            None
                        } else {
                            Some(self.parse_expression()?)
                        };
                        return Ok(Statement::Return(Box::new(ReturnStmt {
                            id: NodeId::fresh(),
                            prefix: kw.space,
                            expr,
                        })));
                    }
                    "throw" => {
                        let kw = self.bump();
                        let expr = self.parse_expression()?;
                        return Ok(Statement::Throw(Box::new(ThrowStmt {
                            id: NodeId::fresh(),
                            prefix: kw.space,
                            expr,
                        })));
                    }
                    "break" | "continue" => {
                        let kw = self.bump();
                        let label = if self.at_any_word() {
                            let word = self.bump();
                            Some(Ident::new(word.space, word.text))
                        } else {
                            None
                        };
                        return Ok(if kw.text == "break" {
                            Statement::Break(Box::new(BreakStmt {
                                id: NodeId::fresh(),
                                prefix: kw.space,
                                label,
                            }))
                        } else {
                            Statement::Continue(Box::new(ContinueStmt {
                                id: NodeId::fresh(),
                                prefix: kw.space,
                                label,
                            }))
                        });
                    }
                    _ => {}
                }
            }
        }
        // `name:` introduces a labeled statement.
        if self.at_any_word() && self.at_offset(1, ":") {
            let name_tok = self.bump();
            let colon = self.bump();
            let statement = Box::new(self.parse_statement()?);
            return Ok(Statement::Label(Box::new(LabelStmt {
                id: NodeId::fresh(),
                prefix: name_tok.space,
                name: Padded::new(Ident::new(Space::empty(), name_tok.text), colon.space),
                statement,
            })));
        }
        if self.at("@") || self.at_modifier() || self.at_class_kind() || self.looks_like_var_decl()
        {
            let (mut annotations, mut modifiers) = self.parse_prelude()?;
            if self.at_class_kind() {
                return Ok(Statement::Class(Box::new(
                    self.parse_class_rest(annotations, modifiers)?,
                )));
            }
            let ty = self.parse_type_name()?;
            let decls = self.parse_variable_rest(&mut annotations, &mut modifiers, ty, true)?;
            return Ok(Statement::Variable(Box::new(decls)));
        }
        Ok(Statement::Expr(Box::new(self.parse_expression()?)))
    }

    /// Lookahead: `Type name` shapes (qualified names, generics, array dims)
    /// that open a local variable declaration.
    fn looks_like_var_decl(&self) -> bool {
        let word = |i: usize| {
            self.tokens
                .get(i)
                .is_some_and(|t| t.kind == TokenKind::Word)
        };
        let is = |i: usize, s: &str| self.tokens.get(i).is_some_and(|t| t.is(s));

        let mut i = self.pos;
        if !word(i) {
            return false;
        }
        // Expression-starter keywords can precede a type-like name
        // (`new Foo()`), but never open a declaration.
        if self
            .tokens
            .get(i)
            .is_some_and(|t| matches!(t.text.as_str(), "new" | "true" | "false" | "null"))
        {
            return false;
        }
        i += 1;
        while is(i, ".") && word(i + 1) {
            i += 2;
        }
        if is(i, "<") {
            let mut depth = 1usize;
            i += 1;
            while depth > 0 {
                if is(i, "<") {
                    depth += 1;
                } else if is(i, ">") {
                    depth -= 1;
                } else if word(i) || is(i, ",") || is(i, ".") || is(i, "[") || is(i, "]") {
                    // plausible type-argument content
                } else {
                    return false;
                }
                i += 1;
            }
        }
        while is(i, "[") && is(i + 1, "]") {
            i += 2;
        }
        word(i)
    }

    fn parse_control_parens(&mut self) -> Result<ControlParens<Expression>> {
        let open = self.expect("(")?;
        let expr = self.parse_expression()?;
        let close = self.expect(")")?;
        Ok(ControlParens {
            prefix: open.space,
            tree: Padded::new(expr, close.space),
        })
    }

    fn parse_if(&mut self) -> Result<Statement> {
        let kw = self.bump();
        let condition = self.parse_control_parens()?;
        let then_part = self.parse_padded_boxed()?;
        let else_part = if self.at_word("else") {
            let else_kw = self.bump();
            Some(ElseClause {
                id: NodeId::fresh(),
                prefix: else_kw.space,
                body: self.parse_padded_boxed()?,
            })
        } else {
            None
        };
        Ok(Statement::If(Box::new(IfStmt {
            id: NodeId::fresh(),
            prefix: kw.space,
            condition,
            then_part,
            else_part,
        })))
    }

    fn parse_while(&mut self) -> Result<Statement> {
        let kw = self.bump();
        let condition = self.parse_control_parens()?;
        let body = self.parse_padded_boxed()?;
        Ok(Statement::While(Box::new(WhileLoop {
            id: NodeId::fresh(),
            prefix: kw.space,
            condition,
            body,
        })))
    }

    fn parse_do_while(&mut self) -> Result<Statement> {
        let kw = self.bump();
        let body = self.parse_padded_boxed()?;
        let while_tok = self.expect("while")?;
        let condition = self.parse_control_parens()?;
        Ok(Statement::DoWhile(Box::new(DoWhileLoop {
            id: NodeId::fresh(),
            prefix: kw.space,
            body,
            while_prefix: while_tok.space,
            condition,
        })))
    }

    fn parse_switch(&mut self) -> Result<Statement> {
        let kw = self.bump();
        let selector = self.parse_control_parens()?;
        let open = self.expect("{")?;
        let mut cases = Vec::new();
        while !self.at("}") {
            if self.peek().is_none() {
                return Err(self.err_here("unterminated switch block"));
            }
            cases.push(Padded::bare(self.parse_case()?));
        }
        let close = self.bump();
        Ok(Statement::Switch(Box::new(SwitchStmt {
            id: NodeId::fresh(),
            prefix: kw.space,
            selector,
            cases: Block {
                id: NodeId::fresh(),
                prefix: open.space,
                statements: cases,
                end: close.space,
            },
        })))
    }

    fn parse_case(&mut self) -> Result<Statement> {
        let (prefix, label) = if self.at_word("case") {
            let kw = self.bump();
            let expr = self.parse_expression()?;
            let colon = self.expect(":")?;
            (kw.space, CaseLabel::Expr(Padded::new(expr, colon.space)))
        } else if self.at_word("default") {
            let kw = self.bump();
            let colon = self.expect(":")?;
            (kw.space, CaseLabel::Default(colon.space))
        } else {
            return Err(self.err_here("expected `case` or `default` in switch block"));
        };
        let mut statements = Vec::new();
        while !self.at("}") && !self.at_word("case") && !self.at_word("default") {
            if self.peek().is_none() {
                return Err(self.err_here("unterminated switch case"));
            }
            statements.push(self.parse_padded_statement()?);
        }
        Ok(Statement::Case(Box::new(CaseStmt {
            id: NodeId::fresh(),
            prefix,
            label,
            statements,
        })))
    }

    fn foreach_ahead(&self) -> bool {
        // Called right after `(` was consumed: a classic for has a `;` at
        // paren depth 1 before the matching `)`.
        let mut depth = 1usize;
        let mut i = self.pos;
        while let Some(tok) = self.tokens.get(i) {
            match tok.text.as_str() {
                "(" => depth += 1,
                ")" => {
                    depth -= 1;
                    if depth == 0 {
                        return true;
                    }
                }
                ";" if depth == 1 => return false,
                _ => {}
            }
            i += 1;
        }
        true
    }

    fn parse_for(&mut self) -> Result<Statement> {
        let kw = self.bump();
        let open = self.expect("(")?;

        if self.foreach_ahead() {
            let variable = self.parse_variable_decls(false)?;
            let colon = self.expect(":")?;
            let iterable = self.parse_expression()?;
            let close = self.expect(")")?;
            let body = self.parse_padded_boxed()?;
            return Ok(Statement::ForEach(Box::new(ForEachLoop {
                id: NodeId::fresh(),
                prefix: kw.space,
                control: ForEachControl {
                    prefix: open.space,
                    variable: Padded::new(variable, colon.space),
                    iterable: Padded::new(iterable, close.space),
                },
                body,
            })));
        }

        let mut init = Vec::new();
        if self.at(";") {
            let semi = self.bump();
            init.push(Padded::new(
                Statement::Empty(EmptyNode {
                    id: NodeId::fresh(),
                    prefix: Space::empty(),
                }),
                semi.space,
            ));
        } else if self.at("@") || self.at_modifier() || self.looks_like_var_decl() {
            let decls = self.parse_variable_decls(true)?;
            let semi = self.expect(";")?;
            init.push(Padded::new(Statement::Variable(Box::new(decls)), semi.space));
        } else {
            loop {
                let expr = self.parse_expression()?;
                if self.at(",") {
                    let comma = self.bump();
                    init.push(Padded::new(Statement::Expr(Box::new(expr)), comma.space));
                } else {
                    let semi = self.expect(";")?;
                    init.push(Padded::new(Statement::Expr(Box::new(expr)), semi.space));
                    break;
                }
            }
        }

        let condition = if self.at(";") {
            let semi = self.bump();
            Padded::new(
                Expression::Empty(EmptyNode {
                    id: NodeId::fresh(),
                    prefix: Space::empty(),
                }),
                semi.space,
            )
        } else {
            let expr = self.parse_expression()?;
            let semi = self.expect(";")?;
            Padded::new(expr, semi.space)
        };

        let mut update = Vec::new();
        if self.at(")") {
            let close = self.bump();
            update.push(Padded::new(
                Statement::Empty(EmptyNode {
                    id: NodeId::fresh(),
                    prefix: Space::empty(),
                }),
                close.space,
            ));
        } else {
            loop {
                let expr = self.parse_expression()?;
                if self.at(",") {
                    let comma = self.bump();
                    update.push(Padded::new(Statement::Expr(Box::new(expr)), comma.space));
                } else {
                    let close = self.expect(")")?;
                    update.push(Padded::new(Statement::Expr(Box::new(expr)), close.space));
                    break;
                }
            }
        }

        let body = self.parse_padded_boxed()?;
        Ok(Statement::For(Box::new(ForLoop {
            id: NodeId::fresh(),
            prefix: kw.space,
            control: ForControl {
                prefix: open.space,
                init,
                condition,
                update,
            },
            body,
        })))
    }

    // -- expressions -------------------------------------------------------

    fn parse_expression(&mut self) -> Result<Expression> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Expression> {
        let mut target = self.parse_ternary()?;
        if let Some((op, ntok)) = self.peek_assign_op() {
            let op_prefix = self.peek().expect("peeked by peek_assign_op").space.clone();
            for _ in 0..ntok {
                self.bump();
            }
            let value = self.parse_assignment()?;
            let prefix = target.take_prefix();
            return Ok(Expression::Assignment(Box::new(Assignment {
                id: NodeId::fresh(),
                prefix,
                target,
                op,
                op_prefix,
                value,
            })));
        }
        Ok(target)
    }

    fn peek_assign_op(&self) -> Option<(AssignOp, usize)> {
        let t0 = self.peek()?;
        let op = match t0.text.as_str() {
            "=" => AssignOp::Assign,
            "+=" => AssignOp::AddAssign,
            "-=" => AssignOp::SubAssign,
            "*=" => AssignOp::MulAssign,
            "/=" => AssignOp::DivAssign,
            "%=" => AssignOp::ModAssign,
            "&=" => AssignOp::AndAssign,
            "|=" => AssignOp::OrAssign,
            "^=" => AssignOp::XorAssign,
            "<<=" => AssignOp::ShlAssign,
            ">" => {
                // `>>=` lexes as `>` `>=`, `>>>=` as `>` `>` `>=`.
                let adj =
                    |i: usize, s: &str| self.peek_at(i).is_some_and(|t| t.is(s) && t.space.is_empty());
                if adj(1, ">=") {
                    return Some((AssignOp::ShrAssign, 2));
                }
                if adj(1, ">") && adj(2, ">=") {
                    return Some((AssignOp::UshrAssign, 3));
                }
                return None;
            }
            _ => return None,
        };
        Some((op, 1))
    }

    fn parse_ternary(&mut self) -> Result<Expression> {
        let mut condition = self.parse_binary(1)?;
        if self.at("?") {
            let question = self.bump();
            let true_part = self.parse_expression()?;
            let colon = self.expect(":")?;
            let false_part = self.parse_assignment()?;
            let prefix = condition.take_prefix();
            return Ok(Expression::Ternary(Box::new(Ternary {
                id: NodeId::fresh(),
                prefix,
                condition,
                true_part: LeftPadded::new(question.space, true_part),
                false_part: LeftPadded::new(colon.space, false_part),
            })));
        }
        Ok(condition)
    }

    fn parse_binary(&mut self, min_prec: u8) -> Result<Expression> {
        let mut left = self.parse_unary()?;
        loop {
            let Some((op, prec, ntok)) = self.peek_binary_op() else {
                break;
            };
            if prec < min_prec {
                break;
            }
            let op_space = self.peek().expect("peeked by peek_binary_op").space.clone();
            for _ in 0..ntok {
                self.bump();
            }
            let right = self.parse_binary(prec + 1)?;
            let prefix = left.take_prefix();
            left = Expression::Binary(Box::new(Binary {
                id: NodeId::fresh(),
                prefix,
                left,
                op: LeftPadded::new(op_space, op),
                right,
            }));
        }
        Ok(left)
    }

    fn peek_binary_op(&self) -> Option<(BinaryOp, u8, usize)> {
        let t0 = self.peek()?;
        Some(match t0.text.as_str() {
            "||" => (BinaryOp::Or, 1, 1),
            "&&" => (BinaryOp::And, 2, 1),
            "|" => (BinaryOp::BitOr, 3, 1),
            "^" => (BinaryOp::BitXor, 4, 1),
            "&" => (BinaryOp::BitAnd, 5, 1),
            "==" => (BinaryOp::Eq, 6, 1),
            "!=" => (BinaryOp::Ne, 6, 1),
            "<" => (BinaryOp::Lt, 7, 1),
            "<=" => (BinaryOp::Le, 7, 1),
            ">=" => (BinaryOp::Ge, 7, 1),
            ">" => {
                let adj =
                    |i: usize, s: &str| self.peek_at(i).is_some_and(|t| t.is(s) && t.space.is_empty());
                if adj(1, ">=") || (adj(1, ">") && adj(2, ">=")) {
                    // Compound shift assignment; handled a level up.
                    return None;
                }
                if adj(1, ">") && adj(2, ">") {
                    (BinaryOp::Ushr, 8, 3)
                } else if adj(1, ">") {
                    (BinaryOp::Shr, 8, 2)
                } else {
                    (BinaryOp::Gt, 7, 1)
                }
            }
            "<<" => (BinaryOp::Shl, 8, 1),
            "+" => (BinaryOp::Add, 9, 1),
            "-" => (BinaryOp::Sub, 9, 1),
            "*" => (BinaryOp::Mul, 10, 1),
            "/" => (BinaryOp::Div, 10, 1),
            "%" => (BinaryOp::Mod, 10, 1),
            _ => return None,
        })
    }

    fn parse_unary(&mut self) -> Result<Expression> {
        let op = self.peek().and_then(|t| match t.text.as_str() {
            "!" => Some(UnaryOp::Not),
            "~" => Some(UnaryOp::BitNot),
            "-" => Some(UnaryOp::Neg),
            "+" => Some(UnaryOp::Pos),
            "++" => Some(UnaryOp::PreInc),
            "--" => Some(UnaryOp::PreDec),
            _ => None,
        });
        if let Some(op) = op {
            let tok = self.bump();
            let expr = self.parse_unary()?;
            return Ok(Expression::Unary(Box::new(Unary {
                id: NodeId::fresh(),
                prefix: tok.space,
                op,
                op_space: Space::empty(),
                expr,
            })));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Expression> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.at(".") {
                let dot = self.bump();
                let name_tok = self.expect_word()?;
                let name = Ident::new(name_tok.space, name_tok.text);
                if self.at("(") {
                    let args = self.parse_args_container()?;
                    let prefix = expr.take_prefix();
                    expr = Expression::Invocation(Box::new(MethodInvocation {
                        id: NodeId::fresh(),
                        prefix,
                        select: Some(Padded::new(Box::new(expr), dot.space)),
                        name,
                        args,
                    }));
                } else {
                    let prefix = expr.take_prefix();
                    expr = Expression::FieldAccess(Box::new(FieldAccess {
                        id: NodeId::fresh(),
                        prefix,
                        target: Padded::new(Box::new(expr), dot.space),
                        name,
                    }));
                }
            } else if self.at("(") {
                let Expression::Identifier(mut ident) = expr else {
                    return Err(self.err_here("call target must be a name"));
                };
                let prefix = mem::take(&mut ident.prefix);
                let args = self.parse_args_container()?;
                expr = Expression::Invocation(Box::new(MethodInvocation {
                    id: NodeId::fresh(),
                    prefix,
                    select: None,
                    name: ident,
                    args,
                }));
            } else if self.at("[") {
                let open = self.bump();
                let index = self.parse_expression()?;
                let close = self.expect("]")?;
                let prefix = expr.take_prefix();
                expr = Expression::ArrayAccess(Box::new(ArrayAccess {
                    id: NodeId::fresh(),
                    prefix,
                    target: expr,
                    dim_prefix: open.space,
                    index: Padded::new(Box::new(index), close.space),
                }));
            } else if self.at("++") || self.at("--") {
                let tok = self.bump();
                let op = if tok.text == "++" {
                    UnaryOp::PostInc
                } else {
                    UnaryOp::PostDec
                };
                let prefix = expr.take_prefix();
                expr = Expression::Unary(Box::new(Unary {
                    id: NodeId::fresh(),
                    prefix,
                    op,
                    op_space: tok.space,
                    expr,
                }));
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expression> {
        let Some(tok) = self.peek() else {
            return Err(self.err_here("expected an expression, found end of input"));
        };
        match tok.kind {
            TokenKind::Punct if tok.is("(") => {
                let open = self.bump();
                let inner = self.parse_expression()?;
                let close = self.expect(")")?;
                Ok(Expression::Parens(Box::new(Parentheses {
                    id: NodeId::fresh(),
                    prefix: open.space,
                    tree: Padded::new(Box::new(inner), close.space),
                })))
            }
            TokenKind::Int | TokenKind::Float => {
                let tok = self.bump();
                let kind = if tok.kind == TokenKind::Int {
                    LiteralKind::Int
                } else {
                    LiteralKind::Float
                };
                Ok(Expression::Literal(Literal {
                    id: NodeId::fresh(),
                    prefix: tok.space,
                    kind,
                    text: tok.text,
                }))
            }
            TokenKind::Str | TokenKind::Char => {
                let tok = self.bump();
                let kind = if tok.kind == TokenKind::Str {
                    LiteralKind::Str
                } else {
                    LiteralKind::Char
                };
                Ok(Expression::Literal(Literal {
                    id: NodeId::fresh(),
                    prefix: tok.space,
                    kind,
                    text: tok.text,
                }))
            }
            TokenKind::Word => match tok.text.as_str() {
                "true" | "false" => {
                    let tok = self.bump();
                    Ok(Expression::Literal(Literal {
                        id: NodeId::fresh(),
                        prefix: tok.space,
                        kind: LiteralKind::Bool,
                        text: tok.text,
                    }))
                }
                "null" => {
                    let tok = self.bump();
                    Ok(Expression::Literal(Literal {
                        id: NodeId::fresh(),
                        prefix: tok.space,
                        kind: LiteralKind::Null,
                        text: tok.text,
                    }))
                }
                "new" => {
                    let kw = self.bump();
                    let type_name = self.parse_type_name()?;
                    let args = self.parse_args_container()?;
                    Ok(Expression::NewClass(Box::new(NewClass {
                        id: NodeId::fresh(),
                        prefix: kw.space,
                        type_name,
                        args,
                    })))
                }
                _ => {
                    let tok = self.bump();
                    Ok(Expression::Identifier(Ident::new(tok.space, tok.text)))
                }
            },
            _ => Err(self.err_here(format!("expected an expression, found `{}`", tok.text))),
        }
    }

    fn parse_args_container(&mut self) -> Result<Container<Expression>> {
        let open = self.expect("(")?;
        let mut elems = Vec::new();
        if self.at(")") {
            let close = self.bump();
            elems.push(Padded::bare(Expression::Empty(EmptyNode {
                id: NodeId::fresh(),
                prefix: close.space,
            })));
            return Ok(Container::new(open.space, elems));
        }
        loop {
            let arg = self.parse_expression()?;
            if self.at(",") {
                let comma = self.bump();
                elems.push(Padded::new(arg, comma.space));
            } else {
                let close = self.expect(")")?;
                elems.push(Padded::new(arg, close.space));
                break;
            }
        }
        Ok(Container::new(open.space, elems))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_class() {
        let unit = parse_unit("class Foo {}").unwrap();
        assert_eq!(unit.types.len(), 1);
        let class = &unit.types[0];
        assert_eq!(class.kind, ClassKind::Class);
        assert_eq!(class.name.text, "Foo");
        assert!(class.body.statements.is_empty());
        // The class owns the (empty) leading space; the kind keyword space
        // was hoisted.
        assert!(class.kind_prefix.is_empty());
    }

    #[test]
    fn parses_package_and_imports() {
        let unit = parse_unit(
            "package com.example.app;\n\nimport java.util.List;\nimport static java.util.Objects.*;\n\nclass A {}",
        )
        .unwrap();
        assert_eq!(unit.package.as_ref().unwrap().elem.name.text(), "com.example.app");
        assert_eq!(unit.imports.len(), 2);
        assert!(unit.imports[1].elem.static_prefix.is_some());
        assert_eq!(unit.imports[1].elem.name.text(), "java.util.Objects.*");
    }

    #[test]
    fn field_vs_method_disambiguation() {
        let unit = parse_unit("class A { int x = 1; int f() { return x; } A() {} }").unwrap();
        let kinds: Vec<NodeKind> = unit.types[0]
            .body
            .statements
            .iter()
            .map(|s| s.elem.kind())
            .collect();
        assert_eq!(
            kinds,
            vec![NodeKind::Variables, NodeKind::Method, NodeKind::Method]
        );
    }

    #[test]
    fn constructor_has_no_return_type() {
        let unit = parse_unit("class A { A(int x) {} }").unwrap();
        let Statement::Method(method) = &unit.types[0].body.statements[0].elem else {
            panic!("expected a method");
        };
        assert!(method.return_type.is_none());
        assert_eq!(method.name.text, "A");
    }

    #[test]
    fn local_decl_vs_expression_statement() {
        let unit =
            parse_unit("class A { void f() { int x = 1; x = 2; foo(); List<String> l = null; } }")
                .unwrap();
        let Statement::Method(method) = &unit.types[0].body.statements[0].elem else {
            panic!("expected a method");
        };
        let body = method.body.as_ref().unwrap();
        let kinds: Vec<NodeKind> = body.statements.iter().map(|s| s.elem.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Variables,
                NodeKind::Assignment,
                NodeKind::Invocation,
                NodeKind::Variables
            ]
        );
    }

    #[test]
    fn binary_precedence() {
        let unit = parse_unit("class A { void f() { x = a + b * c; } }").unwrap();
        let Statement::Method(method) = &unit.types[0].body.statements[0].elem else {
            panic!();
        };
        let Statement::Expr(expr) = &method.body.as_ref().unwrap().statements[0].elem else {
            panic!();
        };
        let Expression::Assignment(assign) = expr.as_ref() else {
            panic!("expected assignment");
        };
        let Expression::Binary(add) = &assign.value else {
            panic!("expected binary value");
        };
        assert_eq!(add.op.elem, BinaryOp::Add);
        let Expression::Binary(mul) = &add.right else {
            panic!("expected nested multiply");
        };
        assert_eq!(mul.op.elem, BinaryOp::Mul);
    }

    #[test]
    fn shift_operators_merge_adjacent_closers() {
        let unit = parse_unit("class A { void f() { x = a >> 2; y >>= 1; } }").unwrap();
        let Statement::Method(method) = &unit.types[0].body.statements[0].elem else {
            panic!();
        };
        let body = method.body.as_ref().unwrap();
        let Statement::Expr(first) = &body.statements[0].elem else {
            panic!();
        };
        let Expression::Assignment(assign) = first.as_ref() else {
            panic!();
        };
        let Expression::Binary(shr) = &assign.value else {
            panic!();
        };
        assert_eq!(shr.op.elem, BinaryOp::Shr);
        let Statement::Expr(second) = &body.statements[1].elem else {
            panic!();
        };
        let Expression::Assignment(compound) = second.as_ref() else {
            panic!();
        };
        assert_eq!(compound.op, AssignOp::ShrAssign);
    }

    #[test]
    fn nested_generics_close_without_shift() {
        let unit = parse_unit("class A { Map<String, List<String>> m; }").unwrap();
        let Statement::Variable(field) = &unit.types[0].body.statements[0].elem else {
            panic!();
        };
        let args = field.type_expr.type_args.as_ref().unwrap();
        assert_eq!(args.elems.len(), 2);
        assert!(args.elems[1].elem.type_args.is_some());
    }

    #[test]
    fn method_chain_builds_nested_selects() {
        let unit = parse_unit("class A { void f() { a.b().c().d(); } }").unwrap();
        let Statement::Method(method) = &unit.types[0].body.statements[0].elem else {
            panic!();
        };
        let Statement::Expr(expr) = &method.body.as_ref().unwrap().statements[0].elem else {
            panic!();
        };
        let Expression::Invocation(d) = expr.as_ref() else {
            panic!();
        };
        assert_eq!(d.name.text, "d");
        let Expression::Invocation(c) = d.select.as_ref().unwrap().elem.as_ref() else {
            panic!();
        };
        assert_eq!(c.name.text, "c");
    }

    #[test]
    fn for_foreach_and_do_while() {
        let unit = parse_unit(
            "class A { void f() { for (int i = 0; i < 10; i++) {} for (String s : names) {} do { i--; } while (i > 0); } }",
        )
        .unwrap();
        let Statement::Method(method) = &unit.types[0].body.statements[0].elem else {
            panic!();
        };
        let kinds: Vec<NodeKind> = method
            .body
            .as_ref()
            .unwrap()
            .statements
            .iter()
            .map(|s| s.elem.kind())
            .collect();
        assert_eq!(kinds, vec![NodeKind::For, NodeKind::ForEach, NodeKind::DoWhile]);
    }

    #[test]
    fn empty_for_sections_survive() {
        let unit = parse_unit("class A { void f() { for ( ; ; ) {} } }").unwrap();
        let Statement::Method(method) = &unit.types[0].body.statements[0].elem else {
            panic!();
        };
        let Statement::For(for_loop) = &method.body.as_ref().unwrap().statements[0].elem else {
            panic!();
        };
        assert_eq!(for_loop.control.init.len(), 1);
        assert!(matches!(
            for_loop.control.init[0].elem,
            Statement::Empty(_)
        ));
        assert_eq!(for_loop.control.init[0].after.whitespace, " ");
    }

    #[test]
    fn enum_constants_and_members() {
        let unit =
            parse_unit("enum Color { RED, GREEN(2), BLUE;\n  int code() { return 0; }\n}").unwrap();
        let class = &unit.types[0];
        assert_eq!(class.kind, ClassKind::Enum);
        let Statement::EnumValues(values) = &class.body.statements[0].elem else {
            panic!("expected enum constants first");
        };
        assert_eq!(values.values.len(), 3);
        assert!(values.terminated);
        assert!(values.values[1].elem.args.is_some());
        assert_eq!(class.body.statements.len(), 2);
    }

    #[test]
    fn switch_cases_collect_statements() {
        let unit = parse_unit(
            "class A { void f() { switch (x) { case 1: a(); break; default: b(); } } }",
        )
        .unwrap();
        let Statement::Method(method) = &unit.types[0].body.statements[0].elem else {
            panic!();
        };
        let Statement::Switch(switch) = &method.body.as_ref().unwrap().statements[0].elem else {
            panic!();
        };
        assert_eq!(switch.cases.statements.len(), 2);
        let Statement::Case(first) = &switch.cases.statements[0].elem else {
            panic!();
        };
        assert_eq!(first.statements.len(), 2);
        let Statement::Case(second) = &switch.cases.statements[1].elem else {
            panic!();
        };
        assert!(matches!(second.label, CaseLabel::Default(_)));
    }

    #[test]
    fn annotations_and_modifiers_hoist_decl_prefix() {
        let unit = parse_unit("class A {\n  @Override\n  public int f() { return 1; }\n}").unwrap();
        let Statement::Method(method) = &unit.types[0].body.statements[0].elem else {
            panic!();
        };
        assert_eq!(method.prefix.whitespace, "\n  ");
        assert!(method.annotations[0].prefix.is_empty());
        assert_eq!(method.modifiers[0].prefix.whitespace, "\n  ");
    }

    #[test]
    fn record_components() {
        let unit = parse_unit("record Point(int x, int y) {}").unwrap();
        let class = &unit.types[0];
        assert_eq!(class.kind, ClassKind::Record);
        assert_eq!(class.components.as_ref().unwrap().elems.len(), 2);
    }

    #[test]
    fn labeled_statement() {
        let unit = parse_unit("class A { void f() { outer: while (x) { break outer; } } }").unwrap();
        let Statement::Method(method) = &unit.types[0].body.statements[0].elem else {
            panic!();
        };
        let Statement::Label(label) = &method.body.as_ref().unwrap().statements[0].elem else {
            panic!("expected label");
        };
        assert_eq!(label.name.elem.text, "outer");
        assert!(matches!(*label.statement, Statement::While(_)));
    }

    #[test]
    fn new_expression_statement_is_not_a_declaration() {
        let unit = parse_unit("class A { void f() { new Foo().bar(); } }").unwrap();
        let Statement::Method(method) = &unit.types[0].body.statements[0].elem else {
            panic!();
        };
        let Statement::Expr(expr) = &method.body.as_ref().unwrap().statements[0].elem else {
            panic!("expected an expression statement");
        };
        assert!(matches!(expr.as_ref(), Expression::Invocation(_)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_unit("class A { void f() { ??? } }").is_err());
        assert!(parse_unit("class A {").is_err());
    }
}
