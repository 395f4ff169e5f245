use serde::{Deserialize, Serialize};

pub const STORAGE_KEY: &str = "travelPlannerTrips";
pub const SHARE_PARAM: &str = "share";
pub const BANNER_TTL_MS: u64 = 5_000;
pub const MAX_VISIBLE_BANNERS: usize = 3;
pub const PLATFORM_NOTIFICATION_CLOSE_MS: u64 = 5_000;
pub const NOTIFICATION_PREVIEW_CHARS: usize = 30;
pub const DEFAULT_SENDER_NAME: &str = "You";
pub const DIRECTIONS_ORIGIN_LABEL: &str = "Current location";
pub const NOTIFICATION_ICON: &str = "/favicon.ico";
/// Longest trip the planner lays out day by day.
pub const MAX_TRIP_DAYS: usize = 366;

/// Tunables the shell may override when it starts the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlannerConfig {
    pub storage_key: String,
    pub share_param: String,
    pub banner_ttl_ms: u64,
    pub max_visible_banners: usize,
    pub platform_notification_close_ms: u64,
    pub notification_preview_chars: usize,
    pub default_sender_name: String,
    pub directions_origin_label: String,
    pub notification_icon: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.into(),
            share_param: SHARE_PARAM.into(),
            banner_ttl_ms: BANNER_TTL_MS,
            max_visible_banners: MAX_VISIBLE_BANNERS,
            platform_notification_close_ms: PLATFORM_NOTIFICATION_CLOSE_MS,
            notification_preview_chars: NOTIFICATION_PREVIEW_CHARS,
            default_sender_name: DEFAULT_SENDER_NAME.into(),
            directions_origin_label: DIRECTIONS_ORIGIN_LABEL.into(),
            notification_icon: NOTIFICATION_ICON.into(),
        }
    }
}
