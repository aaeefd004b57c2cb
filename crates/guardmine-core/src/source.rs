//! JavaScript source units backed by tree-sitter.
//!
//! A [`SourceUnit`] owns the source text and its syntax tree so that any node
//! can be mapped back to its verbatim text through its byte range.

use tree_sitter::{Node, Parser, Tree};

use crate::errors::MinerError;

const SNIPPET_MAX_CHARS: usize = 40;

/// Parsed JavaScript source.
pub struct SourceUnit {
    source: String,
    tree: Tree,
}

impl SourceUnit {
    /// Parse `source`. Any ERROR or MISSING node in the tree is reported as a
    /// [`MinerError::SyntaxError`]; no partial unit is returned.
    pub fn parse(source: &str) -> Result<Self, MinerError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_javascript::LANGUAGE.into())
            .map_err(|e| MinerError::LanguageUnavailable {
                message: e.to_string(),
            })?;

        let tree = parser
            .parse(source, None)
            .ok_or(MinerError::ParseFailed)?;

        let unit = Self {
            source: source.to_string(),
            tree,
        };
        if let Some(err) = unit.first_syntax_error() {
            return Err(err);
        }
        Ok(unit)
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Verbatim source text covered by `node`.
    pub fn node_text(&self, node: Node<'_>) -> &str {
        self.source.get(node.byte_range()).unwrap_or("")
    }

    fn first_syntax_error(&self) -> Option<MinerError> {
        let root = self.root();
        if !root.has_error() {
            return None;
        }

        let mut offending = None;
        walk_preorder(root, |node| {
            if offending.is_none() && (node.is_error() || node.is_missing()) {
                offending = Some(node);
            }
        });
        // has_error() without an ERROR/MISSING descendant should not happen;
        // fall back to the root so the unit is still rejected.
        let node = offending.unwrap_or(root);
        let position = node.start_position();
        let snippet: String = self
            .node_text(node)
            .lines()
            .next()
            .unwrap_or("")
            .chars()
            .take(SNIPPET_MAX_CHARS)
            .collect();

        Some(MinerError::SyntaxError {
            line: position.row + 1,
            column: position.column + 1,
            snippet,
        })
    }
}

/// Visit `node` and every descendant, depth-first in source order.
pub fn walk_preorder<'t>(node: Node<'t>, mut visit: impl FnMut(Node<'t>)) {
    let mut cursor = node.walk();
    'walk: loop {
        visit(cursor.node());
        if cursor.goto_first_child() {
            continue;
        }
        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                break 'walk;
            }
        }
    }
}

/// Named children of `node`, skipping comments.
pub fn significant_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// Strip any number of wrapping parentheses.
pub fn unparenthesize(mut node: Node<'_>) -> Node<'_> {
    while node.kind() == "parenthesized_expression" {
        match significant_children(node).first() {
            Some(inner) => node = *inner,
            None => break,
        }
    }
    node
}
