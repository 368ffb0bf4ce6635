//! Union-Find over region indices

/// Disjoint-set forest with path compression and union by size
#[derive(Debug, Clone)]
pub struct DisjointSets {
    /// Parent pointers (parent[i] = parent of region i)
    parent: Vec<usize>,

    /// Number of regions in the set rooted at i (only meaningful for roots)
    size: Vec<usize>,
}

impl DisjointSets {
    /// Create `count` singleton sets
    pub fn new(count: usize) -> Self {
        Self {
            parent: (0..count).collect(),
            size: vec![1; count],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Find the root of the set containing x, compressing the path on the way
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }

        root
    }

    /// Merge the sets containing x and y, returning the surviving root
    pub fn union(&mut self, x: usize, y: usize) -> usize {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return root_x;
        }

        // Attach the smaller tree under the larger one
        let (large, small) = if self.size[root_x] >= self.size[root_y] {
            (root_x, root_y)
        } else {
            (root_y, root_x)
        };
        self.parent[small] = large;
        self.size[large] += self.size[small];

        large
    }

    pub fn connected(&mut self, x: usize, y: usize) -> bool {
        self.find(x) == self.find(y)
    }

    /// Number of regions in the set containing x
    pub fn set_size(&mut self, x: usize) -> usize {
        let root = self.find(x);
        self.size[root]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singletons() {
        let mut sets = DisjointSets::new(4);
        assert_eq!(sets.len(), 4);
        for i in 0..4 {
            assert_eq!(sets.find(i), i);
            assert_eq!(sets.set_size(i), 1);
        }
    }

    #[test]
    fn test_union_is_transitive() {
        let mut sets = DisjointSets::new(6);
        sets.union(0, 1);
        sets.union(2, 3);
        assert!(!sets.connected(1, 2));

        sets.union(1, 3);
        assert!(sets.connected(0, 2));
        assert_eq!(sets.set_size(3), 4);
        assert!(!sets.connected(0, 5));
    }

    #[test]
    fn test_union_same_set_is_noop() {
        let mut sets = DisjointSets::new(3);
        let root = sets.union(0, 1);
        assert_eq!(sets.union(1, 0), root);
        assert_eq!(sets.set_size(0), 2);
    }
}
