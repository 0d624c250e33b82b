//! Indent-type classification
//!
//! One exhaustive table decides, for every space slot that starts a line,
//! how its indentation relates to the enclosing context: equal to it
//! (`Align`), one indent unit deeper (`Indent`), or one continuation unit
//! deeper (`Continuation`). The table is keyed on the slot's role and the
//! owning/parent node kinds — there is no per-kind visitor override chain to
//! keep in sync.
//!
//! Two situational overrides live in the tabs-and-indents pass itself rather
//! than here, because they need more than kinds: the for-loop header
//! alignment (requires a trial print) and the missing-child structural
//! check.

use crate::syntax::tree::NodeKind;
use crate::syntax::walk::SpaceLoc;

/// How a line-starting node indents relative to its context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentPolicy {
    /// Same column as the context (closing braces, labels, top-level and
    /// post-annotation declaration parts).
    Align,
    /// Context plus one indent unit (block bodies, case bodies, members).
    Indent,
    /// Context plus one continuation unit (wrapped operands, arguments,
    /// chain links).
    Continuation,
}

/// True for statement-shaped kinds that indent one unit inside a block.
fn is_statement_kind(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Class
            | NodeKind::Method
            | NodeKind::Variables
            | NodeKind::EnumValueSet
            | NodeKind::If
            | NodeKind::For
            | NodeKind::ForEach
            | NodeKind::While
            | NodeKind::DoWhile
            | NodeKind::Switch
            | NodeKind::Return
            | NodeKind::Throw
            | NodeKind::Break
            | NodeKind::Continue
            | NodeKind::Empty
    )
}

/// True when `parent` puts a child statement in statement position (directly
/// inside a body or as a control-statement branch).
fn is_statement_context(parent: NodeKind) -> bool {
    matches!(
        parent,
        NodeKind::Block
            | NodeKind::Case
            | NodeKind::If
            | NodeKind::Else
            | NodeKind::For
            | NodeKind::ForEach
            | NodeKind::While
            | NodeKind::DoWhile
            | NodeKind::Label
            | NodeKind::Switch
    )
}

/// Classify the indent relationship for a line-starting space.
///
/// `kind` is the node owning the space (the cursor's current frame);
/// `parent` is its enclosing node, if any.
pub fn classify(loc: SpaceLoc, kind: NodeKind, parent: Option<NodeKind>) -> IndentPolicy {
    match loc {
        // Closing delimiters and re-attached keywords sit at their owner's
        // column.
        SpaceLoc::BlockEnd
        | SpaceLoc::ElsePrefix
        | SpaceLoc::WhilePrefix
        | SpaceLoc::DimPrefix
        | SpaceLoc::DimInner
        | SpaceLoc::Eof => IndentPolicy::Align,

        // A declaration split after its annotations keeps everything that
        // follows at the annotation's column.
        SpaceLoc::KindPrefix => IndentPolicy::Align,

        // Mid-construct wrap points.
        SpaceLoc::ControlPrefix
        | SpaceLoc::ContainerBefore
        | SpaceLoc::OperatorBefore
        | SpaceLoc::PaddedAfter
        | SpaceLoc::StaticPrefix => IndentPolicy::Continuation,

        SpaceLoc::Prefix => match kind {
            NodeKind::Package | NodeKind::Import => IndentPolicy::Align,
            // Labels out-dent to the surrounding construct.
            NodeKind::Label => IndentPolicy::Align,
            // Enum constants line up under the first constant's line.
            NodeKind::EnumValue => IndentPolicy::Align,
            NodeKind::Case => IndentPolicy::Indent,
            // Annotation and modifier runs align with the declaration they
            // prefix (the after-annotation rule).
            NodeKind::Annotation | NodeKind::Modifier => IndentPolicy::Align,
            NodeKind::Block => match parent {
                // A block in statement position indents like a statement; a
                // body block's brace aligns to the construct that owns it.
                Some(NodeKind::Block) | Some(NodeKind::Case) => IndentPolicy::Indent,
                _ => IndentPolicy::Align,
            },
            NodeKind::TypeName => match parent {
                // Return/field type wrapped after annotations: align.
                Some(NodeKind::Method) | Some(NodeKind::Variables) | Some(NodeKind::Class) => {
                    IndentPolicy::Align
                }
                _ => IndentPolicy::Continuation,
            },
            k if is_statement_kind(k) => match parent {
                Some(NodeKind::CompilationUnit) => IndentPolicy::Align,
                Some(p) if is_statement_context(p) => IndentPolicy::Indent,
                // Parameters, for-control sections, other embedded
                // positions: continuation.
                _ => IndentPolicy::Continuation,
            },
            // Expressions: statement position indents, nested positions
            // continuation-indent.
            _ => match parent {
                Some(p) if is_statement_context(p) => IndentPolicy::Indent,
                _ => IndentPolicy::Continuation,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_end_always_aligns() {
        assert_eq!(
            classify(SpaceLoc::BlockEnd, NodeKind::Block, Some(NodeKind::Method)),
            IndentPolicy::Align
        );
    }

    #[test]
    fn statements_indent_inside_blocks() {
        assert_eq!(
            classify(SpaceLoc::Prefix, NodeKind::If, Some(NodeKind::Block)),
            IndentPolicy::Indent
        );
        assert_eq!(
            classify(SpaceLoc::Prefix, NodeKind::Variables, Some(NodeKind::Block)),
            IndentPolicy::Indent
        );
    }

    #[test]
    fn top_level_declarations_align() {
        assert_eq!(
            classify(
                SpaceLoc::Prefix,
                NodeKind::Class,
                Some(NodeKind::CompilationUnit)
            ),
            IndentPolicy::Align
        );
        assert_eq!(
            classify(SpaceLoc::Prefix, NodeKind::Import, Some(NodeKind::CompilationUnit)),
            IndentPolicy::Align
        );
    }

    #[test]
    fn wrapped_operands_continuation_indent() {
        assert_eq!(
            classify(SpaceLoc::Prefix, NodeKind::Identifier, Some(NodeKind::Binary)),
            IndentPolicy::Continuation
        );
        assert_eq!(
            classify(SpaceLoc::OperatorBefore, NodeKind::Binary, Some(NodeKind::Block)),
            IndentPolicy::Continuation
        );
        assert_eq!(
            classify(SpaceLoc::PaddedAfter, NodeKind::Invocation, Some(NodeKind::Block)),
            IndentPolicy::Continuation
        );
    }

    #[test]
    fn expression_statements_indent() {
        assert_eq!(
            classify(SpaceLoc::Prefix, NodeKind::Assignment, Some(NodeKind::Block)),
            IndentPolicy::Indent
        );
    }

    #[test]
    fn wrapped_parameters_continuation_indent() {
        assert_eq!(
            classify(SpaceLoc::Prefix, NodeKind::Variables, Some(NodeKind::Method)),
            IndentPolicy::Continuation
        );
    }

    #[test]
    fn labels_and_else_align() {
        assert_eq!(
            classify(SpaceLoc::Prefix, NodeKind::Label, Some(NodeKind::Block)),
            IndentPolicy::Align
        );
        assert_eq!(
            classify(SpaceLoc::ElsePrefix, NodeKind::If, Some(NodeKind::Block)),
            IndentPolicy::Align
        );
        assert_eq!(
            classify(SpaceLoc::WhilePrefix, NodeKind::DoWhile, Some(NodeKind::Block)),
            IndentPolicy::Align
        );
    }

    #[test]
    fn body_braces_align_statement_blocks_indent() {
        assert_eq!(
            classify(SpaceLoc::Prefix, NodeKind::Block, Some(NodeKind::Method)),
            IndentPolicy::Align
        );
        assert_eq!(
            classify(SpaceLoc::Prefix, NodeKind::Block, Some(NodeKind::Block)),
            IndentPolicy::Indent
        );
    }

    #[test]
    fn after_annotation_parts_align() {
        assert_eq!(
            classify(SpaceLoc::Prefix, NodeKind::Modifier, Some(NodeKind::Method)),
            IndentPolicy::Align
        );
        assert_eq!(
            classify(SpaceLoc::KindPrefix, NodeKind::Class, Some(NodeKind::Block)),
            IndentPolicy::Align
        );
        assert_eq!(
            classify(SpaceLoc::Prefix, NodeKind::TypeName, Some(NodeKind::Method)),
            IndentPolicy::Align
        );
    }
}
