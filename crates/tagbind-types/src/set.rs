//! Hash-addressed unordered collections.
//!
//! A [`ValueSet`] holds members keyed by a hash that the owning store
//! computes. Members have no meaningful position; a path addresses one by
//! the decimal form of its hash. Two members with the same hash are the
//! same member, so inserting the second replaces the first.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// The hash that addresses a set member.
pub type MemberHash = u64;

/// Hash function a store supplies for the members of its sets.
pub type SetHashFn = Arc<dyn Fn(&Value) -> MemberHash + Send + Sync>;

/// Default member hash: CRC-32 of the member's canonical JSON encoding.
///
/// Map keys are encoded in sorted order, so structurally equal members always
/// hash equally.
pub fn crc32_hash(member: &Value) -> MemberHash {
    let bytes = serde_json::to_vec(member).unwrap_or_default();
    MemberHash::from(crc32fast::hash(&bytes))
}

/// An unordered collection whose members are addressed by hash.
///
/// Iteration yields members in ascending hash order.
#[derive(Clone)]
pub struct ValueSet {
    members: BTreeMap<MemberHash, Value>,
    hasher: SetHashFn,
}

impl ValueSet {
    /// Create an empty set using [`crc32_hash`].
    pub fn new() -> Self {
        Self::with_hasher(Arc::new(crc32_hash))
    }

    /// Create an empty set with a store-supplied hash function.
    pub fn with_hasher(hasher: SetHashFn) -> Self {
        Self {
            members: BTreeMap::new(),
            hasher,
        }
    }

    /// Create an empty set hashed by a closure.
    pub fn hashed_by<F>(hasher: F) -> Self
    where
        F: Fn(&Value) -> MemberHash + Send + Sync + 'static,
    {
        Self::with_hasher(Arc::new(hasher))
    }

    /// Build a set from members using [`crc32_hash`].
    pub fn from_members<I: IntoIterator<Item = Value>>(members: I) -> Self {
        let mut set = Self::new();
        set.extend(members);
        set
    }

    /// Build a set from members with a store-supplied hash function.
    pub fn from_members_with<I: IntoIterator<Item = Value>>(
        hasher: SetHashFn,
        members: I,
    ) -> Self {
        let mut set = Self::with_hasher(hasher);
        set.extend(members);
        set
    }

    /// Insert a member and return its hash. A member with the same hash is
    /// replaced.
    pub fn insert(&mut self, member: Value) -> MemberHash {
        let hash = self.hash_of(&member);
        self.members.insert(hash, member);
        hash
    }

    /// Remove the member equal to `member`. Returns `true` if it was present.
    pub fn remove(&mut self, member: &Value) -> bool {
        let hash = self.hash_of(member);
        self.members.remove(&hash).is_some()
    }

    /// Compute the hash this set assigns to `member`.
    pub fn hash_of(&self, member: &Value) -> MemberHash {
        (self.hasher)(member)
    }

    /// Look up a member by its hash.
    pub fn get(&self, hash: MemberHash) -> Option<&Value> {
        self.members.get(&hash)
    }

    /// The member with the lowest hash.
    pub fn first(&self) -> Option<(MemberHash, &Value)> {
        self.members.iter().next().map(|(h, v)| (*h, v))
    }

    /// Members in ascending hash order.
    pub fn members(&self) -> impl Iterator<Item = &Value> + '_ {
        self.members.values()
    }

    /// `(hash, member)` pairs in ascending hash order.
    pub fn entries(&self) -> impl Iterator<Item = (MemberHash, &Value)> + '_ {
        self.members.iter().map(|(h, v)| (*h, v))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The hash function used by this set.
    pub fn hasher(&self) -> &SetHashFn {
        &self.hasher
    }
}

impl Default for ValueSet {
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<Value> for ValueSet {
    fn extend<I: IntoIterator<Item = Value>>(&mut self, members: I) {
        for member in members {
            self.insert(member);
        }
    }
}

impl FromIterator<Value> for ValueSet {
    fn from_iter<I: IntoIterator<Item = Value>>(members: I) -> Self {
        Self::from_members(members)
    }
}

/// Sets compare by membership; the hash functions are not compared.
impl PartialEq for ValueSet {
    fn eq(&self, other: &Self) -> bool {
        self.members == other.members
    }
}

impl fmt::Debug for ValueSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.members.iter()).finish()
    }
}
