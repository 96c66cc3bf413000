use reprint_parser::Node;

/// Render target: a node together with the chain of its ancestors
///
/// The last entry of the stack is the node being printed. An empty path
/// points at nothing; the dispatcher rejects it.
#[derive(Debug, Clone, Default)]
pub struct FastPath<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> FastPath<'a> {
    pub fn from_root(root: &'a Node) -> Self {
        Self { stack: vec![root] }
    }

    /// Path to `child`, which must be a child of the current node
    pub fn child(&self, child: &'a Node) -> FastPath<'a> {
        let mut stack = Vec::with_capacity(self.stack.len() + 1);
        stack.extend_from_slice(&self.stack);
        stack.push(child);
        FastPath { stack }
    }

    pub fn node(&self) -> Option<&'a Node> {
        self.stack.last().copied()
    }

    pub fn parent(&self) -> Option<&'a Node> {
        let len = self.stack.len();
        if len < 2 {
            return None;
        }
        Some(self.stack[len - 2])
    }

    pub fn is_root(&self) -> bool {
        self.stack.len() == 1
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
