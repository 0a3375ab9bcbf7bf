use std::fmt;

use hashbrown::HashMap;
use log::trace;

use crate::error::UnionFindError;

/// Converts a signed site count, rejecting negative values.
pub fn checked_size(num_sites: i64) -> Result<usize, UnionFindError> {
    usize::try_from(num_sites).map_err(|_| UnionFindError::InvalidSize(num_sites))
}

/// Height-weighted quick union over a fixed number of sites
/// - fixed size
/// - cannot divide the union
/// - no path compression, trees are kept shallow by the depth weights only
#[derive(Debug, Clone)]
pub struct DisjointSet {
    // parent[i] = parent of i, roots point to themselves
    parent: Vec<usize>,
    // depth[i] = merge weight of the subtree rooted at i
    depth: Vec<usize>,
    // number of components
    count: usize,
}

impl DisjointSet {
    pub fn new(num_sites: usize) -> Self {
        DisjointSet {
            parent: (0..num_sites).collect(),
            depth: vec![1; num_sites],
            count: num_sites,
        }
    }

    /// Builds a set from a signed site count, rejecting negative sizes.
    pub fn try_new(num_sites: i64) -> Result<Self, UnionFindError> {
        Ok(Self::new(checked_size(num_sites)?))
    }

    /// Number of components. Starts at `size()` and never increases.
    pub fn components(&self) -> usize {
        self.count
    }

    pub fn size(&self) -> usize {
        self.parent.len()
    }

    /// Returns the root of the component containing site `p`.
    pub fn find(&self, p: usize) -> Result<usize, UnionFindError> {
        self.validate(p)?;
        Ok(self.root(p))
    }

    pub fn connected(&self, p: usize, q: usize) -> Result<bool, UnionFindError> {
        Ok(self.find(p)? == self.find(q)?)
    }

    /// Merges the components containing `p` and `q`.
    ///
    /// The component count is decremented on every call, even when `p` and `q`
    /// already share a root. Use [`DisjointSet::connect`] to keep the count exact.
    pub fn union(&mut self, p: usize, q: usize) -> Result<(), UnionFindError> {
        let root_p = self.find(p)?;
        let root_q = self.find(q)?;
        self.merge_components(root_p, root_q);
        self.count = self.count.saturating_sub(1);
        Ok(())
    }

    /// Ensures `p` and `q` are connected. Returns whether a merge happened.
    pub fn connect(&mut self, p: usize, q: usize) -> Result<bool, UnionFindError> {
        if self.connected(p, q)? {
            return Ok(false);
        }
        self.union(p, q)?;
        Ok(true)
    }

    /// root -> member sites in ascending order
    pub fn groups(&self) -> HashMap<usize, Vec<usize>> {
        let mut groups: HashMap<usize, Vec<usize>> = HashMap::new();
        for site in 0..self.size() {
            groups.entry(self.root(site)).or_insert_with(Vec::new).push(site);
        }
        groups
    }

    /// One `index: parent, depth` line per site. Debugging output only.
    pub fn dump(&self) -> String {
        self.parent
            .iter()
            .zip(self.depth.iter())
            .enumerate()
            .map(|(site, (parent, depth))| format!("{}: {}, {}\n", site, parent, depth))
            .collect()
    }

    fn validate(&self, p: usize) -> Result<(), UnionFindError> {
        if p < self.size() {
            Ok(())
        } else {
            Err(UnionFindError::IndexOutOfRange {
                index: p,
                size: self.size(),
            })
        }
    }

    fn root(&self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        root
    }

    // Direction is decided by depth[i] and depth[j] themselves, not by the
    // depths of their roots. `union` always passes roots here.
    fn merge_components(&mut self, i: usize, j: usize) {
        if self.root(i) == self.root(j) {
            return;
        }

        if self.depth[i] < self.depth[j] {
            self.parent[i] = j;
        } else if self.depth[i] > self.depth[j] {
            self.parent[j] = i;
        } else {
            self.parent[j] = i;
            self.depth[i] += 1;
        }
        trace!(
            "merged {} and {} (depths {}, {})",
            i,
            j,
            self.depth[i],
            self.depth[j]
        );
    }
}

impl fmt::Display for DisjointSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DisjointSet:\n  count: {}\n  parents: {:?}\n  depths: {:?}",
            self.count, self.parent, self.depth
        )
    }
}
