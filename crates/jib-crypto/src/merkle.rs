//! # Audit Merkle Tree
//!
//! A binary hash tree over an ordered list of hex leaf hashes, providing
//! the tamper-evident audit log for bindings and proofs.
//!
//! ## Algorithm
//!
//! On every append the levels are rebuilt bottom-up: adjacent nodes pair
//! left-to-right; a level with odd count duplicates its last node. A
//! parent is `sha256_hex(left_hex ‖ right_hex)` — the hash runs over the
//! concatenated hex *strings*, so the tree is reproducible from the hex
//! transcript alone. The root of an empty tree is `""`.
//!
//! Inclusion proofs collect the sibling at `index ^ 1` on each level,
//! advancing `index / 2`; a duplicated last node contributes no sibling
//! entry, and verification reconstructs that case from the leaf count.

use jib_core::sha256_hex;

/// Append-only binary hash tree over hex leaf hashes.
#[derive(Debug, Clone, Default)]
pub struct AuditMerkleTree {
    leaves: Vec<String>,
    levels: Vec<Vec<String>>,
}

impl AuditMerkleTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of leaves appended so far.
    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// The leaf hash at `index`, if present.
    pub fn leaf(&self, index: usize) -> Option<&str> {
        self.leaves.get(index).map(String::as_str)
    }

    /// Append a leaf hash and rebuild the tree.
    pub fn add_leaf(&mut self, leaf_hash: impl Into<String>) {
        self.leaves.push(leaf_hash.into());
        self.rebuild();
    }

    /// The current root, or `""` for an empty tree.
    pub fn root(&self) -> String {
        self.levels
            .last()
            .and_then(|top| top.first())
            .cloned()
            .unwrap_or_default()
    }

    /// Sibling hashes from the leaf level upward for the leaf at
    /// `leaf_index`. Empty when the index is out of range.
    ///
    /// Levels where the node was duplicated (odd count, last position)
    /// contribute no entry; [`AuditMerkleTree::verify_proof`] reconstructs
    /// those steps from the leaf count.
    pub fn proof(&self, leaf_index: usize) -> Vec<String> {
        if self.levels.is_empty() || leaf_index >= self.leaves.len() {
            return Vec::new();
        }

        let mut proof = Vec::new();
        let mut index = leaf_index;
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = index ^ 1;
            if sibling < level.len() {
                proof.push(level[sibling].clone());
            }
            index /= 2;
        }
        proof
    }

    /// Verify an inclusion proof produced by [`AuditMerkleTree::proof`].
    ///
    /// `leaf_count` must be the tree size at proof time; it determines
    /// where last-node duplication occurred. Returns `false` for any
    /// malformed input.
    pub fn verify_proof(
        leaf_hash: &str,
        leaf_index: usize,
        leaf_count: usize,
        proof: &[String],
        root: &str,
    ) -> bool {
        if leaf_count == 0 || leaf_index >= leaf_count {
            return false;
        }

        let mut current = leaf_hash.to_string();
        let mut index = leaf_index;
        let mut level_len = leaf_count;
        let mut steps = proof.iter();

        while level_len > 1 {
            let sibling = index ^ 1;
            if sibling < level_len {
                let Some(sibling_hash) = steps.next() else {
                    return false;
                };
                current = if index % 2 == 0 {
                    sha256_hex(format!("{current}{sibling_hash}").as_bytes())
                } else {
                    sha256_hex(format!("{sibling_hash}{current}").as_bytes())
                };
            } else {
                // Last node of an odd level pairs with itself.
                current = sha256_hex(format!("{current}{current}").as_bytes());
            }
            index /= 2;
            level_len = level_len.div_ceil(2);
        }

        steps.next().is_none() && current == root
    }

    fn rebuild(&mut self) {
        self.levels.clear();
        if self.leaves.is_empty() {
            return;
        }

        let mut current = self.leaves.clone();
        self.levels.push(current.clone());

        while current.len() > 1 {
            let mut next = Vec::with_capacity(current.len().div_ceil(2));
            for pair in current.chunks(2) {
                let left = &pair[0];
                let right = pair.get(1).unwrap_or(left);
                next.push(sha256_hex(format!("{left}{right}").as_bytes()));
            }
            self.levels.push(next.clone());
            current = next;
        }
    }
}
