//! Bungie.net platform types
//!
//! Field names follow the platform's camelCase JSON. Large responses keep
//! unmodelled fields in a flattened `extra` map.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

macro_rules! int_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident = $value:expr),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl $name {
            $($(#[$vmeta])* pub const $variant: Self = Self($value);)*
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

int_enum!(
    /// Platform a Destiny or Bungie.net membership lives on
    BungieMembershipType {
        NONE = 0,
        XBOX = 1,
        PSN = 2,
        STEAM = 3,
        BLIZZARD = 4,
        STADIA = 5,
        EGS = 6,
        DEMON = 10,
        BUNGIE_NEXT = 254,
        /// Search every platform
        ALL = -1,
    }
);

int_enum!(
    /// `ErrorCode` values of the response envelope
    PlatformErrorCode {
        NONE = 0,
        SUCCESS = 1,
        TRANSPORT_EXCEPTION = 2,
        UNHANDLED_EXCEPTION = 3,
        NOT_IMPLEMENTED = 4,
        SYSTEM_DISABLED = 5,
        THROTTLE_LIMIT_EXCEEDED = 31,
        DESTINY_ACCOUNT_NOT_FOUND = 1601,
        DESTINY_PRIVACY_RESTRICTION = 1665,
    }
);

int_enum!(
    /// Profile components to request
    DestinyComponentType {
        PROFILES = 100,
        VENDOR_RECEIPTS = 101,
        PROFILE_INVENTORIES = 102,
        CHARACTERS = 200,
        CHARACTER_INVENTORIES = 201,
        CHARACTER_PROGRESSIONS = 202,
        CHARACTER_ACTIVITIES = 204,
        CHARACTER_EQUIPMENT = 205,
        ITEM_INSTANCES = 300,
        ITEM_OBJECTIVES = 301,
        ITEM_PERKS = 302,
        ITEM_STATS = 304,
        ITEM_SOCKETS = 305,
        ITEM_PLUG_STATES = 308,
        VENDORS = 400,
        VENDOR_CATEGORIES = 401,
        VENDOR_SALES = 402,
        PRESENTATION_NODES = 700,
        COLLECTIBLES = 800,
        RECORDS = 900,
    }
);

int_enum!(
    DestinyActivityModeType {
        NONE = 0,
        STORY = 2,
        STRIKE = 3,
        RAID = 4,
        ALL_PVP = 5,
        PATROL = 6,
        ALL_PVE = 7,
        DUNGEON = 82,
    }
);

/// Vendors with an inventory worth watching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VendorHash {
    Ada1,
    Gunsmith,
}

impl VendorHash {
    pub fn hash(self) -> u32 {
        match self {
            Self::Ada1 => 350_061_650,
            Self::Gunsmith => 672_118_013,
        }
    }
}

/// Collection presentation nodes the client knows how to list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectiblePresentationNodeHash {
    ArmorMods,
    WeaponMods,
    CombatStyleArmorMods,
}

impl CollectiblePresentationNodeHash {
    pub fn hash(self) -> u32 {
        match self {
            Self::ArmorMods => 615_947_643,
            Self::WeaponMods => 1_627_803_277,
            Self::CombatStyleArmorMods => 123_185_593,
        }
    }
}

/// Standard response envelope wrapping every platform payload
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServerResponse<T> {
    pub response: T,
    pub error_code: PlatformErrorCode,
    #[serde(default)]
    pub throttle_seconds: i32,
    pub error_status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub message_data: HashMap<String, String>,
    #[serde(default)]
    pub detailed_error_trace: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoCard {
    pub membership_id: String,
    pub membership_type: BungieMembershipType,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub bungie_global_display_name: Option<String>,
    #[serde(default)]
    pub bungie_global_display_name_code: Option<u16>,
    #[serde(default)]
    pub cross_save_override: Option<BungieMembershipType>,
    #[serde(default)]
    pub icon_path: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralUser {
    pub membership_id: String,
    #[serde(default)]
    pub unique_name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub cached_bungie_global_display_name: Option<String>,
    #[serde(default)]
    pub cached_bungie_global_display_name_code: Option<u16>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMembershipData {
    #[serde(default)]
    pub destiny_memberships: Vec<UserInfoCard>,
    #[serde(default)]
    pub primary_membership_id: Option<String>,
    pub bungie_net_user: GeneralUser,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinyErrorProfile {
    pub error_code: PlatformErrorCode,
    pub info_card: UserInfoCard,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinyLinkedProfilesResponse {
    #[serde(default)]
    pub profiles: Vec<UserInfoCard>,
    /// Missing for accounts without a Bungie.net membership
    #[serde(default)]
    pub bnet_membership: Option<UserInfoCard>,
    #[serde(default)]
    pub profiles_with_errors: Vec<DestinyErrorProfile>,
}

/// A component as returned in profile-style responses
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct ComponentResponse<T> {
    /// Absent when the component is private or disabled
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub privacy: Option<i32>,
    #[serde(default)]
    pub disabled: Option<bool>,
}

impl<T> Default for ComponentResponse<T> {
    fn default() -> Self {
        Self {
            data: None,
            privacy: None,
            disabled: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinyCharacterComponent {
    pub membership_id: String,
    pub membership_type: BungieMembershipType,
    pub character_id: String,
    #[serde(default)]
    pub date_last_played: Option<String>,
    #[serde(default)]
    pub light: i32,
    #[serde(default)]
    pub class_type: i32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct DestinyCollectibleComponent {
    pub state: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinyCollectiblesComponent {
    /// Keyed by collectible hash
    #[serde(default)]
    pub collectibles: BTreeMap<String, DestinyCollectibleComponent>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinyProfileResponse {
    #[serde(default)]
    pub profile: ComponentResponse<Value>,
    #[serde(default)]
    pub characters: ComponentResponse<BTreeMap<String, DestinyCharacterComponent>>,
    #[serde(default)]
    pub profile_collectibles: ComponentResponse<DestinyCollectiblesComponent>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinyCharacterResponse {
    #[serde(default)]
    pub character: ComponentResponse<DestinyCharacterComponent>,
    #[serde(default)]
    pub equipment: ComponentResponse<Value>,
    #[serde(default)]
    pub inventory: ComponentResponse<Value>,
    #[serde(default)]
    pub item_components: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Components are requested by the caller, so the shape is left open
pub type DestinyItemResponse = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinyCollectibleNodeDetailResponse {
    #[serde(default)]
    pub collectibles: ComponentResponse<DestinyCollectiblesComponent>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinyVendorCategory {
    pub display_category_index: i32,
    #[serde(default)]
    pub item_indexes: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DestinyVendorCategoriesComponent {
    #[serde(default)]
    pub categories: Vec<DestinyVendorCategory>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinyVendorSaleItemComponent {
    pub vendor_item_index: i32,
    pub item_hash: u32,
    #[serde(default)]
    pub sale_status: u32,
    #[serde(default)]
    pub failure_indexes: Vec<i32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinyVendorResponse {
    #[serde(default)]
    pub categories: ComponentResponse<DestinyVendorCategoriesComponent>,
    /// Keyed by vendor item index
    #[serde(default)]
    pub sales: ComponentResponse<BTreeMap<String, DestinyVendorSaleItemComponent>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactSearchRequest {
    pub display_name: String,
    pub display_name_code: u16,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSearchPrefixRequest {
    pub display_name_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSearchResponseDetail {
    #[serde(default)]
    pub bungie_global_display_name: String,
    #[serde(default)]
    pub bungie_global_display_name_code: Option<u16>,
    #[serde(default)]
    pub bungie_net_membership_id: Option<String>,
    #[serde(default)]
    pub destiny_memberships: Vec<UserInfoCard>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSearchResponse {
    #[serde(default)]
    pub search_results: Vec<UserSearchResponseDetail>,
    #[serde(default)]
    pub page: i32,
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupV2 {
    pub group_id: String,
    pub name: String,
    #[serde(default)]
    pub group_type: i32,
    #[serde(default)]
    pub member_count: i32,
    #[serde(default)]
    pub motto: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMembership {
    pub member: Value,
    pub group: GroupV2,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetGroupsForMemberResponse {
    #[serde(default)]
    pub results: Vec<GroupMembership>,
    #[serde(default)]
    pub total_results: i32,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub are_all_memberships_inactive: HashMap<String, bool>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinyHistoricalStatsActivity {
    pub reference_id: u32,
    #[serde(default)]
    pub director_activity_hash: u32,
    #[serde(default)]
    pub instance_id: String,
    #[serde(default)]
    pub mode: DestinyActivityModeType,
    #[serde(default)]
    pub modes: Vec<DestinyActivityModeType>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for DestinyActivityModeType {
    fn default() -> Self {
        Self::NONE
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinyHistoricalStatsPeriodGroup {
    pub period: String,
    pub activity_details: DestinyHistoricalStatsActivity,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DestinyActivityHistoryResults {
    /// Missing entirely when the character has no history
    #[serde(default)]
    pub activities: Vec<DestinyHistoricalStatsPeriodGroup>,
}

/// Query for `/Stats/Activities/`
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityHistoryQuery {
    pub membership_type: BungieMembershipType,
    pub destiny_membership_id: String,
    pub character_id: String,
    pub count: Option<u32>,
    pub mode: Option<DestinyActivityModeType>,
    pub page: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CoreSystem {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub parameters: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CoreSettingsConfiguration {
    #[serde(default)]
    pub systems: HashMap<String, CoreSystem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinyManifest {
    pub version: String,
    /// Language, then table name, to a path under `https://www.bungie.net`
    #[serde(default)]
    pub json_world_component_content_paths: HashMap<String, HashMap<String, String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct DestinyColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinyDisplayPropertiesDefinition {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
}
