//! Traversal cursor and scoped message propagation
//!
//! A [`Cursor`] is the path from the tree root to the node currently being
//! visited. It is owned by a single traversal, created fresh per pass and
//! discarded afterwards — formatting context never lives in globals.
//!
//! Each frame carries a message bag. A message put on a frame is visible to
//! that node and all of its descendants until a deeper frame shadows the key;
//! it is never visible to siblings or ancestors. This gives passes lexical
//! scoping over the tree path, which is how the indent pass hands "the column
//! I settled on" down to its children.

use std::collections::HashMap;

use super::tree::{NodeId, NodeKind};

/// A value stored in a cursor frame's message bag.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Int(i64),
    Bool(bool),
    Text(String),
}

impl Message {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Message::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Message::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Message::Text(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Frame {
    kind: NodeKind,
    id: NodeId,
    messages: HashMap<&'static str, Message>,
}

/// Parent-linked traversal path with per-node message bags.
#[derive(Debug, Clone, Default)]
pub struct Cursor {
    frames: Vec<Frame>,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: NodeKind, id: NodeId) {
        self.frames.push(Frame {
            kind,
            id,
            messages: HashMap::new(),
        });
    }

    pub fn pop(&mut self) {
        self.frames.pop();
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Kind of the node currently being visited.
    pub fn current_kind(&self) -> Option<NodeKind> {
        self.frames.last().map(|f| f.kind)
    }

    pub fn current_id(&self) -> Option<NodeId> {
        self.frames.last().map(|f| f.id)
    }

    /// Kind of the immediate parent node.
    pub fn parent_kind(&self) -> Option<NodeKind> {
        let len = self.frames.len();
        if len >= 2 {
            Some(self.frames[len - 2].kind)
        } else {
            None
        }
    }

    /// Nearest ancestor (excluding the current node) satisfying `pred`,
    /// skipping over whatever the predicate rejects — used to see through
    /// wrapper nodes like parentheses when classifying indent.
    pub fn parent_of(&self, pred: impl Fn(NodeKind) -> bool) -> Option<NodeKind> {
        self.frames
            .iter()
            .rev()
            .skip(1)
            .map(|f| f.kind)
            .find(|k| pred(*k))
    }

    /// True when any enclosing frame (excluding the current node) has the
    /// given kind.
    pub fn inside(&self, kind: NodeKind) -> bool {
        self.frames.iter().rev().skip(1).any(|f| f.kind == kind)
    }

    /// Put a message on the current node's frame, visible to it and its
    /// descendants.
    pub fn put_message(&mut self, key: &'static str, value: Message) {
        if let Some(frame) = self.frames.last_mut() {
            frame.messages.insert(key, value);
        }
    }

    /// Message set on the current node's own frame.
    pub fn get_message(&self, key: &str) -> Option<&Message> {
        self.frames.last().and_then(|f| f.messages.get(key))
    }

    /// Nearest message for `key` along the path, current node included.
    pub fn nearest_message(&self, key: &str) -> Option<&Message> {
        self.frames.iter().rev().find_map(|f| f.messages.get(key))
    }

    pub fn nearest_int(&self, key: &str) -> Option<i64> {
        self.nearest_message(key).and_then(Message::as_int)
    }

    pub fn nearest_bool(&self, key: &str) -> Option<bool> {
        self.nearest_message(key).and_then(Message::as_bool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_scope_to_descendants() {
        let mut cursor = Cursor::new();
        cursor.push(NodeKind::CompilationUnit, NodeId::fresh());
        cursor.push(NodeKind::Class, NodeId::fresh());
        cursor.put_message("indent", Message::Int(4));

        cursor.push(NodeKind::Block, NodeId::fresh());
        assert_eq!(cursor.nearest_int("indent"), Some(4));
        // Shadowing on a deeper frame wins for that subtree.
        cursor.put_message("indent", Message::Int(8));
        assert_eq!(cursor.nearest_int("indent"), Some(8));
        cursor.pop();

        // Back at the class frame the original value is intact.
        assert_eq!(cursor.nearest_int("indent"), Some(4));

        // Siblings do not observe a popped frame's messages.
        cursor.push(NodeKind::Block, NodeId::fresh());
        assert_eq!(cursor.get_message("indent"), None);
        assert_eq!(cursor.nearest_int("indent"), Some(4));
    }

    #[test]
    fn parent_of_skips_wrappers() {
        let mut cursor = Cursor::new();
        cursor.push(NodeKind::Block, NodeId::fresh());
        cursor.push(NodeKind::Parentheses, NodeId::fresh());
        cursor.push(NodeKind::Binary, NodeId::fresh());
        let found = cursor.parent_of(|k| !matches!(k, NodeKind::Parentheses));
        assert_eq!(found, Some(NodeKind::Block));
        assert_eq!(cursor.parent_kind(), Some(NodeKind::Parentheses));
    }
}
