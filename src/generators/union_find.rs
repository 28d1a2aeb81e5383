use std::collections::HashMap;
use std::hash::Hash;

/// Disjoint sets over a fixed key space, with path compression and union by rank.
pub struct UnionFind<K> {
    parent: HashMap<K, K>,
    rank: HashMap<K, u32>,
}

impl<K: Copy + Eq + Hash> UnionFind<K> {
    /// Every key starts in its own singleton set.
    pub fn new(keys: impl IntoIterator<Item = K>) -> Self {
        let parent: HashMap<K, K> = keys.into_iter().map(|k| (k, k)).collect();
        let rank = parent.keys().map(|&k| (k, 0)).collect();
        UnionFind { parent, rank }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    pub fn contains(&self, key: K) -> bool {
        self.parent.contains_key(&key)
    }

    /// Representative of the set containing `key`, or `None` for a key outside the key space.
    /// Every node on the walk is re-parented directly to the root.
    pub fn find(&mut self, key: K) -> Option<K> {
        let mut root = key;
        loop {
            let parent = *self.parent.get(&root)?;
            if parent == root {
                break;
            }
            root = parent;
        }

        let mut node = key;
        while node != root {
            // Every node on the walk was just read, so the entry exists
            let next = self.parent.insert(node, root).unwrap_or(root);
            node = next;
        }
        Some(root)
    }

    /// Merge the sets containing `a` and `b`.
    ///
    /// The lower-rank root goes under the higher-rank root. On equal ranks the root of `b`
    /// becomes the parent and its rank grows by one. Returns `false` when both keys are
    /// already in the same set or either key is unknown.
    pub fn union(&mut self, a: K, b: K) -> bool {
        let (Some(root_a), Some(root_b)) = (self.find(a), self.find(b)) else {
            return false;
        };
        if root_a == root_b {
            return false; // Already in same set
        }

        let rank_a = self.rank.get(&root_a).copied().unwrap_or(0);
        let rank_b = self.rank.get(&root_b).copied().unwrap_or(0);
        match rank_a.cmp(&rank_b) {
            std::cmp::Ordering::Greater => {
                self.parent.insert(root_b, root_a);
            }
            std::cmp::Ordering::Less => {
                self.parent.insert(root_a, root_b);
            }
            std::cmp::Ordering::Equal => {
                self.parent.insert(root_a, root_b);
                self.rank.insert(root_b, rank_b + 1);
            }
        }
        true
    }

    /// Whether `a` and `b` are known and in the same set.
    pub fn connected(&mut self, a: K, b: K) -> bool {
        match (self.find(a), self.find(b)) {
            (Some(root_a), Some(root_b)) => root_a == root_b,
            _ => false,
        }
    }
}
