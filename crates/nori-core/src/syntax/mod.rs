//! Lossless syntax tree for a Java subset
//!
//! This module owns everything between source text and the formatting
//! pipeline:
//!
//! - **Space model** ([`space`]): every byte of whitespace and every comment
//!   is an explicit value attached before the token it precedes.
//! - **Tree** ([`tree`]): closed sum types per construct, stable [`tree::NodeId`]s,
//!   functional updates only.
//! - **Front end** ([`lexer`], [`parser`]): hand-written lexer and recursive
//!   descent producing the tree. `print(parse(src)) == src` holds for every
//!   accepted input.
//! - **Printer** ([`printer`]): the plain tree-to-text walk, which also
//!   serves trial printing for wrap decisions.
//! - **Cursor** ([`cursor`]) and **walker** ([`walk`]): the traversal
//!   machinery the formatting passes are built on.

pub mod cursor;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod space;
pub mod tree;
pub mod walk;

pub use cursor::{Cursor, Message};
pub use parser::parse_unit;
pub use printer::{Stopped, print_expression, print_statement, print_unit, trial_print_statement, trial_print_unit};
pub use space::{Comment, CommentStyle, Space};
pub use tree::*;
pub use walk::{SpaceLoc, Visitor, walk_unit};
