//! Named flags for Destiny bit fields

use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use crate::bitwise::BitwiseSplit;

/// Why a vendor item can or cannot be bought
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum VendorItemStatus {
    Success,
    NoInventorySpace,
    NoFunds,
    NoProgression,
    /// For mods this means the mod is already owned
    NoUnlock,
    NoQuantity,
    OutsidePurchaseWindow,
    NotAvailable,
    UniquenessViolation,
    UnknownError,
    AlreadySelling,
    Unsellable,
    SellingInhibited,
    AlreadyOwned,
    DisplayOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CollectibleState {
    NotAcquired,
    Obscured,
    Invisible,
    CannotAffordMaterialRequirements,
    InventorySpaceUnavailable,
    UniquenessViolation,
    PurchaseDisabled,
}

#[allow(clippy::expect_used)]
static VENDOR_ITEM_STATUS: LazyLock<BitwiseSplit<VendorItemStatus>> = LazyLock::new(|| {
    BitwiseSplit::new([
        (0, VendorItemStatus::Success),
        (1, VendorItemStatus::NoInventorySpace),
        (2, VendorItemStatus::NoFunds),
        (4, VendorItemStatus::NoProgression),
        (8, VendorItemStatus::NoUnlock),
        (16, VendorItemStatus::NoQuantity),
        (32, VendorItemStatus::OutsidePurchaseWindow),
        (64, VendorItemStatus::NotAvailable),
        (128, VendorItemStatus::UniquenessViolation),
        (256, VendorItemStatus::UnknownError),
        (512, VendorItemStatus::AlreadySelling),
        (1024, VendorItemStatus::Unsellable),
        (2048, VendorItemStatus::SellingInhibited),
        (4096, VendorItemStatus::AlreadyOwned),
        (8192, VendorItemStatus::DisplayOnly),
    ])
    .expect("vendor status keys are powers of two")
});

#[allow(clippy::expect_used)]
static COLLECTIBLE_STATE: LazyLock<BitwiseSplit<CollectibleState>> = LazyLock::new(|| {
    BitwiseSplit::new([
        (1, CollectibleState::NotAcquired),
        (2, CollectibleState::Obscured),
        (4, CollectibleState::Invisible),
        (8, CollectibleState::CannotAffordMaterialRequirements),
        (16, CollectibleState::InventorySpaceUnavailable),
        (32, CollectibleState::UniquenessViolation),
        (64, CollectibleState::PurchaseDisabled),
    ])
    .expect("collectible state keys are powers of two")
});

/// Decode a vendor sale status; a purchasable item decodes to no flags
pub fn vendor_item_status(sale_status: u32) -> BTreeSet<VendorItemStatus> {
    VENDOR_ITEM_STATUS.split(sale_status)
}

pub fn collectible_state(state: u32) -> BTreeSet<CollectibleState> {
    COLLECTIBLE_STATE.split(state)
}
