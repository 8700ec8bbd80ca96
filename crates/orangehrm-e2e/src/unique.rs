//! Per-run unique test values.
//!
//! Records created by the suite are identified by the value typed into them,
//! so every name, amount and comment must be fresh. Timestamps come from a
//! process-wide monotonic millisecond clock: two calls never return the same
//! stamp, even from parallel workers in the same millisecond.

use chrono::Utc;
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};

static LAST_STAMP: AtomicU64 = AtomicU64::new(0);

/// Smallest generated membership amount
pub const MIN_MEMBERSHIP_AMOUNT: u32 = 100_000;
/// Largest generated membership amount
pub const MAX_MEMBERSHIP_AMOUNT: u32 = 999_999;

/// Milliseconds since the epoch, strictly increasing across calls
#[must_use]
pub fn stamp() -> u64 {
    let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
    let mut last = LAST_STAMP.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_STAMP.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(seen) => last = seen,
        }
    }
}

/// `<prefix><epoch-millis>`, e.g. `Child_1718000000000`
#[must_use]
pub fn timestamped(prefix: &str) -> String {
    format!("{prefix}{}", stamp())
}

/// Six-digit membership amount
#[must_use]
pub fn membership_amount() -> String {
    rand::thread_rng()
        .gen_range(MIN_MEMBERSHIP_AMOUNT..=MAX_MEMBERSHIP_AMOUNT)
        .to_string()
}

/// Attachment comment, `upload<epoch-millis><0..10000>`
#[must_use]
pub fn unique_comment() -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..10_000);
    format!("upload{}{suffix}", stamp())
}

/// Generic name, `name<epoch-millis><0..100>`
#[must_use]
pub fn unique_name() -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..100);
    format!("name{}{suffix}", stamp())
}

/// First name for the profile edit, `TestUser_<0..1000>`
#[must_use]
pub fn test_user_name() -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000);
    format!("TestUser_{suffix}")
}

/// How OrangeHRM lists an amount: two decimals appended.
///
/// An amount that already has a decimal part is returned unchanged.
#[must_use]
pub fn listed_amount(amount: &str) -> String {
    let amount = amount.trim();
    if amount.contains('.') {
        amount.to_string()
    } else {
        format!("{amount}.00")
    }
}
