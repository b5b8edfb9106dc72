// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! File and folder name sanitization.
//!
//! Board lists, cards, and attachments are named by users and can contain
//! anything: path separators, shell metacharacters, diacritics, non-Latin
//! scripts. Everything written to disk goes through [`sanitize`] first so
//! the output tree is portable across common filesystems.
//!
//! Non-ASCII input is decomposed (NFKD) and then dropped rather than
//! transliterated: "café" becomes "cafe", "日本語" becomes "".

use unicode_normalization::UnicodeNormalization;

/// Characters replaced with `_` before anything else happens.
const FORBIDDEN: [char; 17] = [
    '/', '\\', ':', '$', '&', '!', '*', '~', '`', '"', '+', '>', '<', '?', '|', '¿', '¡',
];

/// Maps arbitrary text to a filesystem-safe token.
///
/// Forbidden characters become underscores, then (optionally) spaces become
/// underscores, then the result is NFKD-decomposed, stripped to 7-bit ASCII,
/// and trimmed. The space replacement happens before the trim, so padded
/// input keeps its underscore padding when `replace_spaces` is set.
///
/// Never fails; the result may be empty if nothing survives the ASCII strip.
///
/// # Example
///
/// ```
/// use board2md::sanitize::sanitize;
///
/// assert_eq!(sanitize("Q&A: drafts", true), "Q_A__drafts");
/// assert_eq!(sanitize("résumé.pdf", false), "resume.pdf");
/// ```
#[must_use]
pub fn sanitize(value: &str, replace_spaces: bool) -> String {
    let mut cleaned: String = value
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) { '_' } else { c })
        .collect();

    if replace_spaces {
        cleaned = cleaned.replace(' ', "_");
    }

    cleaned
        .nfkd()
        .filter(char::is_ascii)
        .collect::<String>()
        .trim()
        .to_owned()
}
