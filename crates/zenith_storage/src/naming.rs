//! File naming rules for the record directory.

use chrono::{DateTime, Local};

/// Prefix of collection files.
pub(crate) const COLLECTION_PREFIX: &str = "collection_";

/// Prefix of in-flight temp files.
pub(crate) const TEMP_PREFIX: &str = ".tmp-";

/// Length of `YYYYMMDD_HHMMSS`.
const STAMP_LEN: usize = 15;

/// Longest sanitized name component kept in a file name.
const MAX_COMPONENT_CHARS: usize = 64;

/// What a directory entry is, judged by its name alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIs)]
#[strum(serialize_all = "snake_case")]
pub enum FileClass {
    /// An individual record file
    Record,
    /// A collection file
    Collection,
    /// A write in progress
    Temp,
    /// Anything else
    Other,
}

impl FileClass {
    /// Classify a file name.
    ///
    /// # Examples
    ///
    /// ```
    /// use zenith_storage::FileClass;
    ///
    /// assert_eq!(FileClass::of("20250101_120000_Ilsa.json"), FileClass::Record);
    /// assert_eq!(FileClass::of("collection_20250101_120000_batch.json"), FileClass::Collection);
    /// assert_eq!(FileClass::of(".tmp-5f0c.json"), FileClass::Temp);
    /// assert_eq!(FileClass::of("notes.txt"), FileClass::Other);
    /// assert_eq!(FileClass::of("notes.json"), FileClass::Other);
    /// ```
    pub fn of(file_name: &str) -> Self {
        if file_name.starts_with(TEMP_PREFIX) {
            return FileClass::Temp;
        }
        let Some(stem) = file_name.strip_suffix(".json") else {
            return FileClass::Other;
        };

        match stem.strip_prefix(COLLECTION_PREFIX) {
            Some(rest) if is_stamped(rest) => FileClass::Collection,
            Some(_) => FileClass::Other,
            None if is_stamped(stem) => FileClass::Record,
            None => FileClass::Other,
        }
    }
}

/// True if `stem` is `YYYYMMDD_HHMMSS_` followed by at least one character.
fn is_stamped(stem: &str) -> bool {
    let bytes = stem.as_bytes();
    bytes.len() > STAMP_LEN + 1
        && bytes[STAMP_LEN] == b'_'
        && bytes[..STAMP_LEN]
            .iter()
            .enumerate()
            .all(|(i, b)| if i == 8 { *b == b'_' } else { b.is_ascii_digit() })
}

/// Reduce free text to a file-name-safe component.
///
/// Keeps alphanumeric characters, `-` and `_`; whitespace runs become a single
/// `_`; everything else is dropped. Returns `fallback` if nothing survives.
///
/// # Examples
///
/// ```
/// use zenith_storage::safe_component;
///
/// assert_eq!(safe_component("Ilsa  Varn", "unnamed"), "Ilsa_Varn");
/// assert_eq!(safe_component("O'Brien-Smith!", "unnamed"), "OBrien-Smith");
/// assert_eq!(safe_component("../../etc", "unnamed"), "etc");
/// assert_eq!(safe_component("???", "unnamed"), "unnamed");
/// ```
pub fn safe_component(raw: &str, fallback: &str) -> String {
    let mut safe = String::new();
    let mut pending_gap = false;

    for ch in raw.trim().chars() {
        if ch.is_whitespace() {
            pending_gap = true;
        } else if ch.is_alphanumeric() || ch == '-' || ch == '_' {
            if pending_gap && !safe.is_empty() {
                safe.push('_');
            }
            pending_gap = false;
            safe.push(ch);
        }
    }

    let safe: String = safe.chars().take(MAX_COMPONENT_CHARS).collect();
    if safe.is_empty() {
        fallback.to_string()
    } else {
        safe
    }
}

/// Second-resolution timestamp used as the file name prefix.
pub(crate) fn timestamp(now: DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

/// `{timestamp}_{name}.json`, with `_{n}` before the extension for `n > 0`.
pub(crate) fn individual_file_name(stamp: &str, name: &str, suffix: u32) -> String {
    match suffix {
        0 => format!("{stamp}_{name}.json"),
        n => format!("{stamp}_{name}_{n}.json"),
    }
}

/// `collection_{timestamp}_{label}.json`, with `_{n}` before the extension for `n > 0`.
pub(crate) fn collection_file_name(stamp: &str, label: &str, suffix: u32) -> String {
    match suffix {
        0 => format!("{COLLECTION_PREFIX}{stamp}_{label}.json"),
        n => format!("{COLLECTION_PREFIX}{stamp}_{label}_{n}.json"),
    }
}
