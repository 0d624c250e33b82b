//! The layout computation pipeline
//!
//! Formatting is a fixed sequence of tree-rewriting passes, each a total
//! function from tree to tree. Later passes observe the output of earlier
//! ones: minimum spacing makes the token stream lexically sound, the spaces
//! pass settles same-line spacing, wrapping decides line placement, and
//! tabs-and-indents computes every line's column last. A pass that cannot
//! apply declines via [`FormatPass::is_applicable`] and the tree flows
//! through untouched.
//!
//! A pass failure (structural inconsistency, trial-print miss) aborts only
//! the current unit: [`auto_format`] hands the error up, and batch callers
//! keep the original text for that file while the rest of the run proceeds.

pub mod blank_lines;
pub mod classify;
pub mod indent;
pub mod line_breaks;
pub mod measure;
pub mod min_spacing;
pub mod normalize_format;
pub mod spaces;
pub mod tabs_and_indents;
pub mod trailing_whitespace;
pub mod wrapping;

#[cfg(test)]
mod tests;

use tracing::{debug, trace};

use crate::result::Result;
use crate::style::FormatStyle;
use crate::syntax::parser::parse_unit;
use crate::syntax::printer::print_unit;
use crate::syntax::tree::CompilationUnit;

pub use blank_lines::BlankLines;
pub use classify::{IndentPolicy, classify};
pub use line_breaks::{NormalizeLineBreaks, NormalizeTabsOrSpaces};
pub use min_spacing::MinimumViableSpacing;
pub use normalize_format::NormalizeFormat;
pub use spaces::Spaces;
pub use tabs_and_indents::TabsAndIndents;
pub use trailing_whitespace::RemoveTrailingWhitespace;
pub use wrapping::WrappingAndBraces;

/// One layout pass: a total `Tree -> Tree` function plus an applicability
/// gate.
pub trait FormatPass {
    fn name(&self) -> &'static str;

    /// Whether this pass understands the given unit at all. Declining is a
    /// pass-through, never an error.
    fn is_applicable(&self, _unit: &CompilationUnit) -> bool {
        true
    }

    fn run(&self, unit: CompilationUnit, style: &FormatStyle) -> Result<CompilationUnit>;
}

fn pipeline() -> Vec<Box<dyn FormatPass>> {
    vec![
        Box::new(NormalizeFormat),
        Box::new(MinimumViableSpacing),
        Box::new(RemoveTrailingWhitespace),
        Box::new(BlankLines),
        Box::new(Spaces),
        Box::new(WrappingAndBraces),
        Box::new(NormalizeTabsOrSpaces),
        Box::new(NormalizeLineBreaks),
        Box::new(TabsAndIndents),
    ]
}

/// Apply the full pass pipeline to one unit.
///
/// Errors abort this unit only; the input tree remains valid (passes never
/// mutate), so callers can fall back to the original text.
pub fn auto_format(unit: &CompilationUnit, style: &FormatStyle) -> Result<CompilationUnit> {
    let mut current = unit.clone();
    for pass in pipeline() {
        if !pass.is_applicable(&current) {
            debug!(pass = pass.name(), "pass not applicable, skipping");
            continue;
        }
        let next = pass.run(current.clone(), style)?;
        if next == current {
            trace!(pass = pass.name(), "pass was a no-op");
        } else {
            debug!(pass = pass.name(), "pass rewrote the tree");
        }
        current = next;
    }
    Ok(current)
}

/// Parse, format, and print a source text in one call.
pub fn format_source(source: &str, style: &FormatStyle) -> Result<String> {
    let unit = parse_unit(source)?;
    let formatted = auto_format(&unit, style)?;
    Ok(print_unit(&formatted))
}
