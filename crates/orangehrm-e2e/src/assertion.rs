//! Assertions over observable results.
//!
//! Page objects return what the UI shows; scenarios check it with these
//! helpers. A failed check is [`E2eError::AssertionFailed`] carrying both the
//! expectation and what was observed.

use crate::result::{E2eError, E2eResult};
use std::collections::HashSet;
use std::fmt::Debug;

/// Assert `item` is one of the listed entries
pub fn assert_contains(list: &[String], item: &str) -> E2eResult<()> {
    if list.iter().any(|entry| entry == item) {
        Ok(())
    } else {
        Err(E2eError::assertion(format!(
            "expected list to contain '{item}', got {list:?}"
        )))
    }
}

/// Assert `item` is none of the listed entries
pub fn assert_not_contains(list: &[String], item: &str) -> E2eResult<()> {
    if list.iter().any(|entry| entry == item) {
        Err(E2eError::assertion(format!(
            "expected list not to contain '{item}', got {list:?}"
        )))
    } else {
        Ok(())
    }
}

/// Assert the list still holds at least `min` entries
pub fn assert_min_len(list: &[String], min: usize, what: &str) -> E2eResult<()> {
    if list.len() >= min {
        Ok(())
    } else {
        Err(E2eError::assertion(format!(
            "expected at least {min} {what}, got {}: {list:?}",
            list.len()
        )))
    }
}

/// Assert two values are equal
pub fn assert_equals<T: PartialEq + Debug + ?Sized>(expected: &T, actual: &T) -> E2eResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(E2eError::assertion(format!(
            "expected {expected:?}, got {actual:?}"
        )))
    }
}

/// Assert a string is not empty
pub fn assert_not_empty(value: &str, what: &str) -> E2eResult<()> {
    if value.is_empty() {
        Err(E2eError::assertion(format!("expected {what} to be non-empty")))
    } else {
        Ok(())
    }
}

/// Assert the list is non-empty and has no duplicate entries
pub fn assert_all_unique(list: &[String]) -> E2eResult<()> {
    if list.is_empty() {
        return Err(E2eError::assertion("expected a non-empty list"));
    }
    let mut seen = HashSet::with_capacity(list.len());
    let duplicates: Vec<&str> = list
        .iter()
        .filter(|entry| !seen.insert(entry.as_str()))
        .map(String::as_str)
        .collect();
    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(E2eError::assertion(format!(
            "expected unique entries, duplicated: {duplicates:?}"
        )))
    }
}

/// Assert `haystack` contains `needle`
pub fn assert_contains_substring(haystack: &str, needle: &str) -> E2eResult<()> {
    if haystack.contains(needle) {
        Ok(())
    } else {
        Err(E2eError::assertion(format!(
            "expected '{haystack}' to contain '{needle}'"
        )))
    }
}

/// Assert each keyword occurs in at least one URL, ignoring case
pub fn assert_urls_contain_keywords(urls: &[String], keywords: &[&str]) -> E2eResult<()> {
    let lowered: Vec<String> = urls.iter().map(|u| u.to_lowercase()).collect();
    let missing: Vec<&str> = keywords
        .iter()
        .copied()
        .filter(|k| {
            let k = k.to_lowercase();
            !lowered.iter().any(|url| url.contains(&k))
        })
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(E2eError::assertion(format!(
            "no URL mentions {missing:?} among {urls:?}"
        )))
    }
}

/// Assert a comment is listed, ignoring surrounding whitespace
pub fn assert_comment_exists(comments: &[String], comment: &str) -> E2eResult<()> {
    let wanted = comment.trim();
    if comments.iter().any(|c| c.trim() == wanted) {
        Ok(())
    } else {
        Err(E2eError::assertion(format!(
            "expected comment '{wanted}' among {comments:?}"
        )))
    }
}
