use lazy_static::lazy_static;
use regex::Regex;

pub const ORDER_ID_PREFIX: &str = "LNK";
pub const ORDER_ID_SUFFIX_LENGTH: usize = 10;

/// Maximum age of a webhook timestamp before it is rejected, in seconds.
pub const WEBHOOK_TIMESTAMP_TOLERANCE_SECS: i64 = 300;
/// Allowed clock skew for webhook timestamps arriving from the future, in seconds.
pub const WEBHOOK_CLOCK_SKEW_SECS: i64 = 60;

lazy_static! {
    pub static ref ORDER_ID_PATTERN: Regex =
        Regex::new(r"^LNK-[A-Z0-9]{10}$").expect("Failed to compile regex pattern");
}
