use std::borrow::Cow;

use itertools::Itertools;

use crate::settings::Settings;

/// Canonical comparison form of a key. Borrows when no change is needed.
///
/// With `ignore_whitespace` leading and trailing whitespace is removed and
/// internal runs collapse to one space. Without `case_sensitive` the text is
/// lowercased. Display values are never passed through here.
pub fn normalize<'a>(value: &'a str, settings: &Settings) -> Cow<'a, str> {
    let mut current = Cow::Borrowed(value);
    if settings.ignore_whitespace && needs_collapse(value) {
        current = Cow::Owned(value.split_whitespace().join(" "));
    }
    if !settings.case_sensitive && current.chars().any(|c| c.to_lowercase().ne(Some(c))) {
        current = Cow::Owned(current.to_lowercase());
    }
    current
}

/// A key is blank when nothing but whitespace remains, whatever the settings.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn needs_collapse(value: &str) -> bool {
    let mut previous_space = true;
    for ch in value.chars() {
        if ch.is_whitespace() {
            if previous_space || ch != ' ' {
                return true;
            }
            previous_space = true;
        } else {
            previous_space = false;
        }
    }
    previous_space && !value.is_empty()
}
