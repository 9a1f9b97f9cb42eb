//! Incremental connectivity with giant-component tracking.
//!
//! Union-by-size with path halving. Besides the usual `find`/`union`, the
//! structure remembers the root of the largest component seen so far, so the
//! giant component size can be read after every union in O(1). This is what
//! lets the similarity network grow edge by edge and stop as soon as its
//! giant component is large enough.
//!
//! The tracked root only moves when a union produces a component strictly
//! larger than the current giant; on equal sizes the earlier component keeps
//! the title.

use tracing::warn;

/// Disjoint-set forest over `0..len` tracking the largest component.
#[derive(Debug, Clone)]
pub struct IncrementalConnectivity {
    parent: Vec<usize>,
    /// Component size, meaningful at roots only.
    size: Vec<usize>,
    /// Root of the giant component; `None` iff the structure is empty.
    giant_root: Option<usize>,
}

impl IncrementalConnectivity {
    /// Create `len` singleton components.
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            size: vec![1; len],
            giant_root: if len == 0 { None } else { Some(0) },
        }
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    /// True iff there are no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Root of `node`'s component.
    ///
    /// Returns `len()` for an invalid node.
    pub fn find(&mut self, mut node: usize) -> usize {
        if node >= self.len() {
            warn!(node, len = self.len(), "invalid node id");
            return self.len();
        }
        while self.parent[node] != node {
            let grandparent = self.parent[self.parent[node]];
            self.parent[node] = grandparent;
            node = grandparent;
        }
        node
    }

    /// Merge the components of `a` and `b`. Invalid ids are a no-op.
    pub fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra >= self.len() || rb >= self.len() || ra == rb {
            return;
        }
        let (big, small) = if self.size[ra] < self.size[rb] {
            (rb, ra)
        } else {
            (ra, rb)
        };
        self.parent[small] = big;
        self.size[big] += self.size[small];

        // A stale `small` giant root always loses here, since `big` absorbed it.
        let giant_size = self.giant_root.map_or(0, |r| self.size[r]);
        if self.size[big] > giant_size {
            self.giant_root = Some(big);
        }
    }

    /// Whether `a` and `b` share a component. False for invalid ids.
    pub fn is_connected(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        ra < self.len() && ra == self.find(b)
    }

    /// Size of `node`'s component, `0` for an invalid node.
    pub fn component_size(&mut self, node: usize) -> usize {
        let root = self.find(node);
        self.size.get(root).copied().unwrap_or(0)
    }

    /// Size of the largest component, `0` for an empty structure.
    #[inline]
    pub fn giant_component_size(&self) -> usize {
        self.giant_root.map_or(0, |r| self.size[r])
    }
}
