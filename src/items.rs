//! Turning inventories and vendor catalogs into fetch requests.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::fetcher::FetchRequest;

/// Anything that can be flattened into an ordered list of fetch requests.
pub trait ItemListBuilder {
    fn build_requests(&self) -> Vec<FetchRequest>;
}

impl ItemListBuilder for [FetchRequest] {
    fn build_requests(&self) -> Vec<FetchRequest> {
        self.to_vec()
    }
}

impl ItemListBuilder for Vec<FetchRequest> {
    fn build_requests(&self) -> Vec<FetchRequest> {
        self.clone()
    }
}

/// An item held by a character or in the vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub item_hash: u32,
    /// Perks selectable on this instance; empty for fixed rolls
    #[serde(default)]
    pub perks: Vec<u32>,
    /// Only reviewable items (weapons, armor) get ratings
    #[serde(default = "default_true")]
    pub reviewable: bool,
}

fn default_true() -> bool {
    true
}

/// Items from every store, deduplicated by roll so each is fetched once.
#[derive(Debug, Clone, Default)]
pub struct InventoryItemList {
    pub items: Vec<InventoryItem>,
}

impl InventoryItemList {
    pub fn new(items: Vec<InventoryItem>) -> Self {
        Self { items }
    }
}

impl ItemListBuilder for InventoryItemList {
    fn build_requests(&self) -> Vec<FetchRequest> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .filter(|item| item.reviewable)
            .filter(|item| seen.insert((item.item_hash, item.perks.clone())))
            .map(|item| {
                if item.perks.is_empty() {
                    FetchRequest::new(item.item_hash)
                } else {
                    FetchRequest::with_perks(item.item_hash, item.perks.clone())
                }
            })
            .collect()
    }
}

/// An item offered for sale by a vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorItem {
    pub item_hash: u32,
}

/// Vendor catalog; vendors sell fixed rolls, so one request per item hash.
#[derive(Debug, Clone, Default)]
pub struct VendorItemList {
    pub items: Vec<VendorItem>,
}

impl VendorItemList {
    pub fn new(items: Vec<VendorItem>) -> Self {
        Self { items }
    }
}

impl ItemListBuilder for VendorItemList {
    fn build_requests(&self) -> Vec<FetchRequest> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .filter(|item| seen.insert(item.item_hash))
            .map(|item| FetchRequest::new(item.item_hash))
            .collect()
    }
}
