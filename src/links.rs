//! Same-colour constraints within one scanline. A small union-find over
//! `[0, width)` where every edge points left, so the root of any chain is the
//! leftmost pixel in it and is always written first.

/// Per-scanline link table. Build one per row and drop it afterwards.
#[derive(Debug, Clone)]
pub struct LinkMap {
    parent: Vec<usize>,
    // Separation of the direct link at each index, 0 when unlinked.
    separation: Vec<u32>,
}

impl LinkMap {
    pub fn new(width: usize) -> Self {
        LinkMap {
            parent: (0..width).collect(),
            separation: vec![0; width],
        }
    }

    #[cfg(test)]
    fn is_linked(&self, x: usize) -> bool {
        self.separation[x] != 0
    }

    /// Separation of the link committed at `x`, if any.
    #[inline]
    pub fn separation(&self, x: usize) -> Option<u32> {
        match self.separation[x] {
            0 => None,
            s => Some(s),
        }
    }

    /// Canonical (leftmost) index of the chain containing `x`.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression keeps later lookups flat.
        let mut cur = x;
        while self.parent[cur] != root {
            let next = self.parent[cur];
            self.parent[cur] = root;
            cur = next;
        }
        root
    }

    /// Commit `x` to share the colour of `target`.
    ///
    /// # Panics
    /// Panics unless `target < x` and `separation > 0`.
    pub fn link(&mut self, x: usize, target: usize, separation: u32) {
        assert!(target < x, "links must point left ({target} -> {x})");
        assert!(separation > 0, "zero separation would be a self link");
        self.parent[x] = target;
        self.separation[x] = separation;
    }

    #[cfg(test)]
    fn parent(&self, x: usize) -> usize {
        self.parent[x]
    }
}
