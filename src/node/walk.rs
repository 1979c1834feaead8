// tree-serializer/src/node/walk.rs

use super::definition::Node;

/// Pre-order, depth-first traversal. Yields each node with its depth below
/// the starting node (which is depth 0).
#[derive(Debug)]
pub struct Walk<'a> {
    stack: Vec<(usize, &'a Node)>,
}

impl<'a> Walk<'a> {
    pub(crate) fn new(root: &'a Node) -> Self {
        Self { stack: vec![(0, root)] }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        // Reversed so the first child is popped next.
        for child in node.children().iter().rev() {
            self.stack.push((depth + 1, child));
        }
        Some((depth, node))
    }
}

impl Node {
    pub fn walk(&self) -> Walk<'_> {
        Walk::new(self)
    }
}
