//! Line-wrap decision service
//!
//! Wrap policies are about *printed* column width, which depends on every
//! preceding sibling's spacing — so this module renders. Two measurements
//! feed every decision:
//!
//! - [`column_before`]: a trial print of the subtree that stops immediately
//!   before a target node and reports the column (the printed statement
//!   carries its own indentation, so the column is absolute).
//! - [`flat_width`]: the width of a rendering with line breaks collapsed to
//!   single spaces — the minimally-spaced single-line form. The same
//!   function serves both the chop measurement and, when the construct fits,
//!   describes exactly what the unwrapped output will be; there is no second
//!   minimization code path to drift out of sync.

use unicode_width::UnicodeWidthStr;

use crate::error::NoriError;
use crate::result::Result;
use crate::style::TabsAndIndentsStyle;
use crate::syntax::printer::{Stopped, print_statement, trial_print_statement};
use crate::syntax::space::Space;
use crate::syntax::tree::{NodeId, Statement};

use super::indent::column_width;

/// Absolute printed column immediately before `target` within `stmt`.
/// The early-exit signal not firing is a cursor/tree mismatch and surfaces
/// as a hard error rather than a guess.
pub fn column_before(stmt: &Statement, target: NodeId) -> Result<usize> {
    match trial_print_statement(stmt, target) {
        Stopped::AtColumn(column) => Ok(column),
        Stopped::NotFound => Err(NoriError::PrintTargetNotFound {
            node_id: target.as_u64(),
        }),
    }
}

/// Width of `text` as if rendered on one line: each line break (with its
/// following indentation) collapses to a single space.
pub fn flat_width(text: &str) -> usize {
    let mut lines = text.split('\n');
    let mut width = match lines.next() {
        Some(first) => first.trim_end_matches(['\r', ' ', '\t']).width(),
        None => 0,
    };
    for line in lines {
        let body = line
            .trim_start_matches([' ', '\t'])
            .trim_end_matches(['\r', ' ', '\t']);
        if !body.is_empty() {
            width += 1 + body.width();
        }
    }
    width
}

/// Minimal single-line width of a statement, leading space excluded.
pub fn statement_flat_width(stmt: &Statement) -> usize {
    let printed = print_statement(stmt);
    let body = printed.trim_start_matches(['\n', '\r', ' ', '\t']);
    let mut width = flat_width(body);
    if stmt.needs_semicolon() {
        width += 1;
    }
    width
}

/// Column at which the construct owning `prefix` starts its line.
pub fn line_start_column(prefix: &Space, style: &TabsAndIndentsStyle) -> usize {
    column_width(prefix.token_indent(), style)
}

/// Would a construct of `width` starting at `start_column` overflow the
/// budget?
pub fn exceeds(start_column: usize, width: usize, column_limit: usize) -> bool {
    start_column + width > column_limit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parser::parse_unit;
    use crate::syntax::tree::{EmptyNode, NodeId};

    fn first_statement(source: &str) -> Statement {
        let unit = parse_unit(source).unwrap();
        let Statement::Method(method) = unit.types[0].body.statements[0].elem.clone() else {
            panic!("expected method");
        };
        method.body.unwrap().statements[0].elem.clone()
    }

    #[test]
    fn flat_width_collapses_breaks_to_spaces() {
        assert_eq!(flat_width("abc"), 3);
        assert_eq!(flat_width("ab\n    cd"), 5);
        assert_eq!(flat_width("ab  \n\n  cd\r"), 5);
    }

    #[test]
    fn statement_width_counts_the_terminator() {
        let stmt = first_statement("class A { void f() { x = a + b; } }");
        // "x = a + b" plus the semicolon.
        assert_eq!(statement_flat_width(&stmt), 10);
    }

    #[test]
    fn wrapped_statement_measures_its_flat_form() {
        let stmt = first_statement("class A { void f() { x = a\n        + b; } }");
        assert_eq!(statement_flat_width(&stmt), 10);
    }

    #[test]
    fn column_before_reports_absolute_position() {
        let stmt = first_statement("class A { void f() {\n    total = base + extra;\n  } }");
        let Statement::Expr(expr) = &stmt else {
            panic!()
        };
        let crate::syntax::tree::Expression::Assignment(assign) = expr.as_ref() else {
            panic!()
        };
        let target = assign.value.id();
        // "    total =" → the value begins at column 11.
        assert_eq!(column_before(&stmt, target).unwrap(), 11);
    }

    #[test]
    fn missing_target_is_a_hard_error() {
        let stmt = Statement::Empty(EmptyNode::new(Space::empty()));
        let err = column_before(&stmt, NodeId::fresh()).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::TrialPrint);
    }

    #[test]
    fn exceeds_is_inclusive_of_the_limit() {
        assert!(!exceeds(0, 120, 120));
        assert!(exceeds(1, 120, 120));
    }
}
