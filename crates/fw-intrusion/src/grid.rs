//! The network grid.
//!
//! A square grid of nodes. The start node sits at (0, 0) and is captured
//! from the outset; the end node sits in the opposite corner. Firewalls are
//! scattered over the remaining nodes. The captured nodes form the path, in
//! capture order.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// What a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Entry point.
    Start,
    /// Target; capturing it breaches the network.
    End,
    /// Capturing it speeds up the trace.
    Firewall,
    /// Plain relay.
    Normal,
}

/// One node of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
    /// What the node is.
    pub kind: NodeKind,
    /// Whether the node is on the path.
    pub captured: bool,
}

/// A square network grid with the captured path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    size: usize,
    nodes: Vec<Node>,
    path: Vec<(usize, usize)>,
}

impl Grid {
    /// An empty `size` x `size` grid with start and end placed and the start
    /// captured. `size` is at least 2.
    pub fn new(size: usize) -> Self {
        let size = size.max(2);
        let mut nodes = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                nodes.push(Node {
                    x,
                    y,
                    kind: NodeKind::Normal,
                    captured: false,
                });
            }
        }

        let mut grid = Self {
            size,
            nodes,
            path: vec![(0, 0)],
        };
        if let Some(start) = grid.node_mut(0, 0) {
            start.kind = NodeKind::Start;
            start.captured = true;
        }
        if let Some(end) = grid.node_mut(size - 1, size - 1) {
            end.kind = NodeKind::End;
        }
        grid
    }

    /// A grid with `firewalls` firewalls on distinct normal nodes.
    pub fn generate(size: usize, firewalls: usize, rng: &mut StdRng) -> Self {
        let mut grid = Self::new(size);
        let mut candidates: Vec<usize> = grid
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.kind == NodeKind::Normal)
            .map(|(i, _)| i)
            .collect();
        candidates.shuffle(rng);
        for i in candidates.into_iter().take(firewalls) {
            grid.nodes[i].kind = NodeKind::Firewall;
        }
        grid
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The node at (`x`, `y`), if in bounds.
    pub fn node(&self, x: usize, y: usize) -> Option<&Node> {
        if x < self.size && y < self.size {
            self.nodes.get(y * self.size + x)
        } else {
            None
        }
    }

    fn node_mut(&mut self, x: usize, y: usize) -> Option<&mut Node> {
        if x < self.size && y < self.size {
            self.nodes.get_mut(y * self.size + x)
        } else {
            None
        }
    }

    /// All nodes, row by row.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Captured nodes in capture order. Always starts with the start node.
    pub fn path(&self) -> &[(usize, usize)] {
        &self.path
    }

    /// Number of firewalls on the grid.
    pub fn firewall_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Firewall)
            .count()
    }

    /// Whether (`x`, `y`) shares an edge with a captured node.
    pub fn touches_path(&self, x: usize, y: usize) -> bool {
        self.path
            .iter()
            .any(|&(px, py)| px.abs_diff(x) + py.abs_diff(y) == 1)
    }

    /// Capture (`x`, `y`). Returns the node if it was in bounds, uncaptured,
    /// and adjacent to the path.
    pub fn capture(&mut self, x: usize, y: usize) -> Option<Node> {
        let touches = self.touches_path(x, y);
        let node = self.node_mut(x, y)?;
        if node.captured || !touches {
            return None;
        }
        node.captured = true;
        let node = *node;
        self.path.push((x, y));
        Some(node)
    }

    /// Cut the path at `index` (never the start node): that node and every
    /// node captured after it become uncaptured. Returns the severed nodes.
    pub fn sever(&mut self, index: usize) -> Vec<(usize, usize)> {
        if index == 0 || index >= self.path.len() {
            return Vec::new();
        }
        let severed = self.path.split_off(index);
        for &(x, y) in &severed {
            if let Some(node) = self.node_mut(x, y) {
                node.captured = false;
            }
        }
        severed
    }

    /// Whether the end node is captured.
    pub fn is_breached(&self) -> bool {
        self.node(self.size - 1, self.size - 1)
            .is_some_and(|n| n.captured)
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.nodes.chunks(self.size) {
            let line: Vec<&str> = row
                .iter()
                .map(|n| match (n.kind, n.captured) {
                    (NodeKind::Start, _) => "S",
                    (NodeKind::End, true) => "X",
                    (NodeKind::End, false) => "E",
                    (_, true) => "@",
                    (NodeKind::Firewall, false) => "#",
                    (NodeKind::Normal, false) => ".",
                })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn new_grid_layout() {
        let g = Grid::new(5);
        assert_eq!(g.nodes().len(), 25);
        assert_eq!(g.node(0, 0).unwrap().kind, NodeKind::Start);
        assert!(g.node(0, 0).unwrap().captured);
        assert_eq!(g.node(4, 4).unwrap().kind, NodeKind::End);
        assert_eq!(g.path(), &[(0, 0)]);
        assert!(g.node(5, 0).is_none());
    }

    #[test]
    fn firewalls_on_distinct_normal_nodes() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let g = Grid::generate(8, 12, &mut rng);
            assert_eq!(g.firewall_count(), 12);
            assert_eq!(g.node(0, 0).unwrap().kind, NodeKind::Start);
            assert_eq!(g.node(7, 7).unwrap().kind, NodeKind::End);
        }
    }

    #[test]
    fn capture_requires_orthogonal_adjacency() {
        let mut g = Grid::new(5);
        assert!(g.capture(1, 1).is_none());
        assert!(g.capture(2, 0).is_none());
        assert!(g.capture(1, 0).is_some());
        assert!(g.capture(2, 0).is_some());
        assert!(g.capture(2, 0).is_none());
        assert_eq!(g.path(), &[(0, 0), (1, 0), (2, 0)]);
    }

    #[test]
    fn capture_out_of_bounds_is_refused() {
        let mut g = Grid::new(5);
        assert!(g.capture(0, 5).is_none());
        assert!(g.capture(99, 99).is_none());
    }

    #[test]
    fn sever_drops_suffix() {
        let mut g = Grid::new(5);
        g.capture(1, 0);
        g.capture(1, 1);
        g.capture(1, 2);
        let severed = g.sever(2);
        assert_eq!(severed, vec![(1, 1), (1, 2)]);
        assert_eq!(g.path(), &[(0, 0), (1, 0)]);
        assert!(!g.node(1, 1).unwrap().captured);
        assert!(g.node(1, 0).unwrap().captured);
    }

    #[test]
    fn sever_never_touches_start() {
        let mut g = Grid::new(5);
        g.capture(0, 1);
        assert!(g.sever(0).is_empty());
        assert!(g.sever(9).is_empty());
        assert_eq!(g.path().len(), 2);
    }

    #[test]
    fn breach_by_walking_the_edge() {
        let mut g = Grid::new(3);
        for (x, y) in [(1, 0), (2, 0), (2, 1)] {
            g.capture(x, y);
        }
        assert!(!g.is_breached());
        let end = g.capture(2, 2).unwrap();
        assert_eq!(end.kind, NodeKind::End);
        assert!(g.is_breached());
    }

    #[test]
    fn render() {
        let mut g = Grid::new(3);
        g.capture(1, 0);
        assert_eq!(g.to_string(), "S @ .\n. . .\n. . E\n");
    }
}
