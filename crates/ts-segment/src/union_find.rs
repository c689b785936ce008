/// Arena union-find over `0..len` with union by size and path halving.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    parent: Vec<u32>,
    size: Vec<u32>,
}

impl DisjointSet {
    pub fn new(len: usize) -> Self {
        assert!(len <= u32::MAX as usize, "disjoint set too large");
        Self {
            parent: (0..len as u32).collect(),
            size: vec![1; len],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    pub fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] as usize != i {
            let grandparent = self.parent[self.parent[i] as usize];
            self.parent[i] = grandparent;
            i = grandparent as usize;
        }
        i
    }

    /// Size of the set whose root is `root`.
    pub fn root_size(&self, root: usize) -> usize {
        self.size[root] as usize
    }

    /// Joins the sets of `a` and `b`; returns `(root, absorbed)` or `None`
    /// when they already share a set.
    pub fn union(&mut self, a: usize, b: usize) -> Option<(usize, usize)> {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return None;
        }

        // Larger set wins; equal sizes keep the lower index as root.
        let (root, absorbed) = match self.size[ra].cmp(&self.size[rb]) {
            std::cmp::Ordering::Greater => (ra, rb),
            std::cmp::Ordering::Less => (rb, ra),
            std::cmp::Ordering::Equal => (ra.min(rb), ra.max(rb)),
        };

        self.parent[absorbed] = root as u32;
        self.size[root] += self.size[absorbed];
        Some((root, absorbed))
    }
}
