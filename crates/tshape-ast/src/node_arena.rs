//! Arena storage and bottom-up node construction.
//!
//! Children are always created before their parent, so `add_node` can set
//! parent links for every child as soon as the parent exists.

use crate::flags::{ModifierFlags, NodeFlags};
use crate::node::*;
use crate::syntax_kind::SyntaxKind;
use tshape_common::{Interner, LineMap, Position};

/// Owns every node of one source file.
#[derive(Debug)]
pub struct NodeArena {
    pub(crate) nodes: Vec<Node>,
    pub(crate) parents: Vec<NodeIndex>,
    pub interner: Interner,
    file_name: String,
    /// Source text the node spans point into. For trees built through the
    /// `add_*` helpers this is the concatenated leaf text.
    source_text: String,
    line_map: Option<LineMap>,
}

impl NodeArena {
    pub fn new(file_name: impl Into<String>) -> Self {
        NodeArena {
            nodes: Vec::new(),
            parents: Vec::new(),
            interner: Interner::new(),
            file_name: file_name.into(),
            source_text: String::new(),
            line_map: None,
        }
    }

    /// Create an arena whose nodes will be positioned explicitly with
    /// `add_node_at` against the given source text.
    pub fn with_source(file_name: impl Into<String>, source_text: impl Into<String>) -> Self {
        let source_text = source_text.into();
        let line_map = Some(LineMap::build(&source_text));
        NodeArena {
            file_name: file_name.into(),
            source_text,
            line_map,
            ..NodeArena::new("")
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ============================================================================
    // Node Creation Methods
    // ============================================================================

    /// Append leaf text to the synthesized source and return its span.
    fn append_text(&mut self, text: &str) -> (u32, u32) {
        if !self.source_text.is_empty() {
            self.source_text.push(' ');
        }
        let pos = self.source_text.len() as u32;
        self.source_text.push_str(text);
        self.line_map = None;
        (pos, self.source_text.len() as u32)
    }

    fn push(&mut self, kind: SyntaxKind, pos: u32, end: u32, data: NodeData) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        let children = data.children();
        self.nodes.push(Node {
            kind,
            flags: NodeFlags::empty(),
            modifiers: ModifierFlags::empty(),
            pos,
            end,
            data,
        });
        self.parents.push(NodeIndex::NONE);
        for child in children {
            self.set_parent(child, index);
        }
        index
    }

    /// Set the parent for a single child node.
    #[inline]
    fn set_parent(&mut self, child: NodeIndex, parent: NodeIndex) {
        if let Some(slot) = self.parents.get_mut(child.0 as usize) {
            *slot = parent;
        }
    }

    /// Add a keyword or token node (no payload).
    pub fn add_token(&mut self, kind: SyntaxKind) -> NodeIndex {
        let (pos, end) = self.append_text(kind.keyword_text().unwrap_or(kind.name()));
        self.push(kind, pos, end, NodeData::empty_for(kind))
    }

    /// Add an identifier node.
    pub fn add_identifier(&mut self, name: &str) -> NodeIndex {
        let (pos, end) = self.append_text(name);
        let atom = self.interner.intern(name);
        let kind = if name.starts_with('#') {
            SyntaxKind::PrivateIdentifier
        } else {
            SyntaxKind::Identifier
        };
        self.push(
            kind,
            pos,
            end,
            NodeData::Identifier(IdentifierData {
                atom,
                escaped_text: name.to_string(),
            }),
        )
    }

    /// Add a literal node. Numeric literals get their parsed value.
    pub fn add_literal(&mut self, kind: SyntaxKind, text: &str) -> NodeIndex {
        let source = match kind {
            SyntaxKind::StringLiteral => format!("\"{text}\""),
            SyntaxKind::NoSubstitutionTemplateLiteral => format!("`{text}`"),
            SyntaxKind::BigIntLiteral => format!("{text}n"),
            _ => text.to_string(),
        };
        let (pos, end) = self.append_text(&source);
        let value = match kind {
            SyntaxKind::NumericLiteral => parse_numeric_literal(text),
            _ => None,
        };
        self.push(
            kind,
            pos,
            end,
            NodeData::Literal(LiteralData {
                text: text.to_string(),
                value,
            }),
        )
    }

    pub fn add_string_literal(&mut self, text: &str) -> NodeIndex {
        self.add_literal(SyntaxKind::StringLiteral, text)
    }

    pub fn add_numeric_literal(&mut self, value: f64) -> NodeIndex {
        let text = if value.fract() == 0.0 && value.abs() < 1e21 {
            format!("{value:.0}")
        } else {
            value.to_string()
        };
        self.add_literal(SyntaxKind::NumericLiteral, &text)
    }

    /// Add a composite node. Its span covers its children.
    pub fn add_node(&mut self, kind: SyntaxKind, data: NodeData) -> NodeIndex {
        let children = data.children();
        let mut pos = u32::MAX;
        let mut end = 0;
        for child in &children {
            if let Some(node) = self.get(*child) {
                pos = pos.min(node.pos);
                end = end.max(node.end);
            }
        }
        if pos == u32::MAX {
            pos = self.source_text.len() as u32;
            end = pos;
        }
        self.push(kind, pos, end, data)
    }

    /// Add a node with an explicit span into the arena's source text.
    pub fn add_node_at(
        &mut self,
        kind: SyntaxKind,
        pos: u32,
        end: u32,
        data: NodeData,
    ) -> NodeIndex {
        self.push(kind, pos, end, data)
    }

    /// Add a node of any kind with the minimal payload for that kind.
    pub fn add_synthetic(&mut self, kind: SyntaxKind) -> NodeIndex {
        let pos = self.source_text.len() as u32;
        let index = self.push(kind, pos, pos, NodeData::empty_for(kind));
        self.add_flags(index, NodeFlags::SYNTHESIZED);
        index
    }

    pub fn add_flags(&mut self, index: NodeIndex, flags: NodeFlags) {
        if let Some(node) = self.nodes.get_mut(index.0 as usize) {
            node.flags |= flags;
        }
    }

    pub fn add_modifiers(&mut self, index: NodeIndex, modifiers: ModifierFlags) {
        if let Some(node) = self.nodes.get_mut(index.0 as usize) {
            node.modifiers |= modifiers;
        }
    }

    // ============================================================================
    // Locations
    // ============================================================================

    /// Line/column of a node's start.
    pub fn position_of(&self, index: NodeIndex) -> Position {
        let Some(node) = self.get(index) else {
            return Position::default();
        };
        match &self.line_map {
            Some(map) => map.offset_to_position(node.pos, &self.source_text),
            None => {
                LineMap::build(&self.source_text).offset_to_position(node.pos, &self.source_text)
            }
        }
    }

    /// Source text covered by a node.
    pub fn node_text(&self, index: NodeIndex) -> &str {
        self.get(index)
            .and_then(|node| self.source_text.get(node.pos as usize..node.end as usize))
            .unwrap_or("")
    }
}

/// Parse the text of a numeric literal, including hex/octal/binary prefixes and
/// numeric separators.
pub fn parse_numeric_literal(text: &str) -> Option<f64> {
    let cleaned: String = text.chars().filter(|&c| c != '_').collect();
    let lower = cleaned.to_ascii_lowercase();
    let radix = |digits: &str, radix: u32| {
        u64::from_str_radix(digits, radix).ok().map(|v| v as f64)
    };
    if let Some(hex) = lower.strip_prefix("0x") {
        return radix(hex, 16);
    }
    if let Some(oct) = lower.strip_prefix("0o") {
        return radix(oct, 8);
    }
    if let Some(bin) = lower.strip_prefix("0b") {
        return radix(bin, 2);
    }
    cleaned.parse::<f64>().ok()
}

#[cfg(test)]
#[path = "../tests/node_arena_tests.rs"]
mod tests;
