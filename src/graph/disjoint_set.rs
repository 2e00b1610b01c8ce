/// A disjoint-set forest over the integers `0..len`.
#[derive(Clone, Debug)]
pub(crate) struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    /// Creates a forest where every element is its own set.
    pub fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            size: vec![1; len],
        }
    }

    /// Finds the representative of the set containing `idx`.
    pub fn find(&mut self, mut idx: usize) -> usize {
        while self.parent[idx] != idx {
            // Path halving
            self.parent[idx] = self.parent[self.parent[idx]];
            idx = self.parent[idx];
        }
        idx
    }

    /// Merges the sets containing `a` and `b`.
    /// Returns false if they were already in the same set.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (a, b) = (self.find(a), self.find(b));
        if a == b {
            return false;
        }
        let (big, small) = if self.size[a] >= self.size[b] {
            (a, b)
        } else {
            (b, a)
        };
        self.parent[small] = big;
        self.size[big] += self.size[small];
        true
    }

    /// Merges every element yielded by `iter` into one set.
    pub fn union_all(&mut self, iter: impl IntoIterator<Item = usize>) {
        let mut iter = iter.into_iter();
        if let Some(first) = iter.next() {
            for idx in iter {
                self.union(first, idx);
            }
        }
    }
}
