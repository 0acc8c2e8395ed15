//! Key sequences — splitting input into individual keys.
//!
//! Key sequences are plain strings. Ordinary keys are single Unicode
//! scalars (`j`, `d`, `é`); named keys are written in angle brackets
//! (`<Escape>`, `<C-w>`, `<vis-mode-insert>`). A lone `<` that does not open
//! a well-formed name is the literal less-than key.
//!
//! | Input          | Keys                         |
//! |----------------|------------------------------|
//! | `dd`           | `d`, `d`                     |
//! | `i<Escape>`    | `i`, `<Escape>`              |
//! | `<<`           | `<`, `<`                     |
//! | `<C-w>j`       | `<C-w>`, `j`                 |

/// Marker that opens a named key.
pub const SPECIAL_START: char = '<';

/// Marker that closes a named key.
pub const SPECIAL_END: char = '>';

/// The first key of `keys`, or `None` if `keys` is empty.
#[must_use]
pub fn next(keys: &str) -> Option<&str> {
    let first = keys.chars().next()?;
    if first == SPECIAL_START {
        if let Some(len) = special_len(keys) {
            return Some(&keys[..len]);
        }
    }
    Some(&keys[..first.len_utf8()])
}

/// Byte length of the named key at the start of `keys`, if there is one.
fn special_len(keys: &str) -> Option<usize> {
    let rest = &keys[SPECIAL_START.len_utf8()..];
    for (i, ch) in rest.char_indices() {
        match ch {
            SPECIAL_END if i > 0 => return Some(SPECIAL_START.len_utf8() + i + 1),
            SPECIAL_END | SPECIAL_START => return None,
            ch if ch.is_whitespace() => return None,
            _ => {}
        }
    }
    None
}

/// True if `key` is a single named key such as `<Escape>`.
#[must_use]
pub fn is_special(key: &str) -> bool {
    key.starts_with(SPECIAL_START) && special_len(key) == Some(key.len())
}

/// The name inside a named key (`<Escape>` → `Escape`).
#[must_use]
pub fn special_name(key: &str) -> Option<&str> {
    if is_special(key) {
        Some(&key[1..key.len() - 1])
    } else {
        None
    }
}

/// Iterate over the keys of a sequence.
pub fn iter(keys: &str) -> impl Iterator<Item = &str> {
    let mut rest = keys;
    std::iter::from_fn(move || {
        let key = next(rest)?;
        rest = &rest[key.len()..];
        Some(key)
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
