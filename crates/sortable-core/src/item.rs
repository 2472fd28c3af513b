#![forbid(unsafe_code)]

//! Item identity and ordering.
//!
//! The engine's only requirement on an item is a stable, unique [`ItemId`].
//! Host data rides along in [`Item::payload`] and is never inspected.
//!
//! [`Order`] is the single source of truth for "what position is item X in":
//! a duplicate-free sequence of ids, one per item.

use std::fmt;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::error::OrderError;

// ---------------------------------------------------------------------------
// ItemId
// ---------------------------------------------------------------------------

/// Stable identity of a list item.
///
/// Identity, not array position, is the unit of ownership: an id keeps
/// naming the same item across renders and reorders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create an id from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

/// A list item: identity plus opaque host payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item<T> {
    pub id: ItemId,
    pub payload: T,
}

impl<T> Item<T> {
    /// Create an item.
    #[must_use]
    pub fn new(id: impl Into<ItemId>, payload: T) -> Self {
        Self {
            id: id.into(),
            payload,
        }
    }
}

impl Item<()> {
    /// Create an item that carries no payload.
    #[must_use]
    pub fn bare(id: impl Into<ItemId>) -> Self {
        Self::new(id, ())
    }
}

// ---------------------------------------------------------------------------
// Order
// ---------------------------------------------------------------------------

/// An ordered, duplicate-free sequence of item ids.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Order {
    ids: Vec<ItemId>,
}

impl Order {
    /// Build an order, rejecting duplicate ids.
    pub fn try_from_ids(ids: Vec<ItemId>) -> Result<Self, OrderError> {
        let mut seen = AHashSet::with_capacity(ids.len());
        for id in &ids {
            if !seen.insert(id) {
                return Err(OrderError::DuplicateId(id.clone()));
            }
        }
        Ok(Self { ids })
    }

    /// Build an order from the ids of `items`, rejecting duplicates.
    pub fn from_items<T>(items: &[Item<T>]) -> Result<Self, OrderError> {
        Self::try_from_ids(items.iter().map(|item| item.id.clone()).collect())
    }

    /// Wrap ids already known to be unique (e.g. a permutation of an order).
    pub(crate) fn from_unique(ids: Vec<ItemId>) -> Self {
        debug_assert!(
            Self::try_from_ids(ids.clone()).is_ok(),
            "from_unique called with duplicate ids"
        );
        Self { ids }
    }

    /// Number of items.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the order holds no items.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Position of `id`, if present.
    #[must_use]
    pub fn index_of(&self, id: &ItemId) -> Option<usize> {
        self.ids.iter().position(|candidate| candidate == id)
    }

    /// Whether `id` is part of this order.
    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.index_of(id).is_some()
    }

    /// Id at `index`, if in range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ItemId> {
        self.ids.get(index)
    }

    /// Iterate ids front to back.
    pub fn iter(&self) -> std::slice::Iter<'_, ItemId> {
        self.ids.iter()
    }

    /// Borrow the ids as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[ItemId] {
        &self.ids
    }

    /// Consume the order, returning its ids.
    #[must_use]
    pub fn into_ids(self) -> Vec<ItemId> {
        self.ids
    }
}

impl<'a> IntoIterator for &'a Order {
    type Item = &'a ItemId;
    type IntoIter = std::slice::Iter<'a, ItemId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

impl<'de> Deserialize<'de> for Order {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let ids = Vec::<ItemId>::deserialize(deserializer)?;
        Self::try_from_ids(ids).map_err(serde::de::Error::custom)
    }
}

/// `Order::try_from(["A", "B", "C"])`.
impl<const N: usize> TryFrom<[&str; N]> for Order {
    type Error = OrderError;

    fn try_from(ids: [&str; N]) -> Result<Self, Self::Error> {
        Self::try_from_ids(ids.into_iter().map(ItemId::from).collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
