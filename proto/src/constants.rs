//! Because consistency is great!
//!
pub mod uri;

/// The default location for the `lsl` CLI tool's token cache.
pub const CLIENT_TOKEN_CACHE: &str = "~/.cache/lsl_tokens";

/// The "system" path for the client config
pub const DEFAULT_CLIENT_CONFIG_PATH: &str = "/etc/lsl/config";
/// The user-owned path for the client config
pub const DEFAULT_CLIENT_CONFIG_PATH_HOME: &str = "~/.config/lsl";

/// Where the backend listens when nothing else has been configured.
pub const DEFAULT_SERVER_ADDRESS: &str = "http://localhost:5000";

pub const APPLICATION_JSON: &str = "application/json";

/// Content type string for jpeg
pub const CONTENT_TYPE_JPG: &str = "image/jpeg";
/// Content type string for png
pub const CONTENT_TYPE_PNG: &str = "image/png";
/// Content type string for gif
pub const CONTENT_TYPE_GIF: &str = "image/gif";

/// File extensions the backend accepts for a headshot, with their content type.
pub const VALID_HEADSHOT_EXTENSIONS: [(&str, &str); 4] = [
    ("png", CONTENT_TYPE_PNG),
    ("jpg", CONTENT_TYPE_JPG),
    ("jpeg", CONTENT_TYPE_JPG),
    ("gif", CONTENT_TYPE_GIF),
];

/// Headshots larger than this are refused before upload.
pub const HEADSHOT_MAX_BYTES: u64 = 5 * 1024 * 1024;

/// A grant applicant's story may not be longer than this many words.
pub const STORY_MAX_WORDS: usize = 500;

/// Minimum length of a realtor password at registration.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Page size used when listing grant applications.
pub const GRANT_APPLICATIONS_PER_PAGE: u32 = 10;
/// Page size used when listing realtors.
pub const REALTORS_PER_PAGE: u32 = 20;
/// Number of notifications returned when no limit is given.
pub const DEFAULT_NOTIFICATION_LIMIT: u32 = 50;

/// Used when paying a transaction without naming a method.
pub const DEFAULT_PAYMENT_METHOD: &str = "credit_card";

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Human readable name of a 1-based month, or `None` if it is out of range.
pub fn month_name(month: u8) -> Option<&'static str> {
    match month {
        1..=12 => MONTH_NAMES.get(usize::from(month - 1)).copied(),
        _ => None,
    }
}
