//! Indented tree rendering shared by the syntax tree and the bound tree

use std::io::{self, Write};

/// A node that can be rendered by [`write_tree`]
pub trait TreeNode {
    /// One-line description of this node
    fn label(&self) -> String;

    /// Direct children in source order
    fn children(&self) -> Vec<&dyn TreeNode>;
}

/// Render `node` and its descendants with `├──` / `└──` markers
pub fn write_tree(node: &dyn TreeNode, out: &mut dyn Write) -> io::Result<()> {
    write_node(node, "", true, out)
}

/// Render into a `String`
pub fn tree_to_string(node: &dyn TreeNode) -> String {
    let mut buf = Vec::new();
    // writing into a Vec cannot fail
    let _ = write_tree(node, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

fn write_node(node: &dyn TreeNode, indent: &str, is_last: bool, out: &mut dyn Write) -> io::Result<()> {
    let marker = if is_last { "└── " } else { "├── " };
    writeln!(out, "{indent}{marker}{}", node.label())?;

    let indent = format!("{indent}{}", if is_last { "    " } else { "│   " });
    let children = node.children();
    let count = children.len();
    for (i, child) in children.into_iter().enumerate() {
        stacker::maybe_grow(32 * 1024, 1024 * 1024, || {
            write_node(child, &indent, i + 1 == count, out)
        })?;
    }
    Ok(())
}
