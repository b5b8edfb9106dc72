// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Cross-referencing of the board's history log.
//!
//! Comments and card creation dates don't live on the cards themselves; they
//! are buried in the `actions` log. A single scan over that log produces two
//! maps keyed by card id: the ordered comments for each card, and each
//! card's creation timestamp.
//!
//! Comment order is the order the source actions appear in the log — there
//! is no independent sort by timestamp. If a card somehow has multiple
//! `createCard` actions, the last one scanned wins.

use crate::parser::Action;
use std::collections::HashMap;

/// A comment on a card, derived from one `commentCard` action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Timestamp at minute precision (see [`minute_precision`]).
    pub date: String,

    /// The comment text, rendered verbatim.
    pub text: String,
}

/// Per-card information recovered from the action log.
#[derive(Debug, Default)]
pub struct CrossReference {
    comments: HashMap<String, Vec<Comment>>,
    created: HashMap<String, String>,
}

impl CrossReference {
    /// Scans the action log once, accumulating comments and creation dates.
    #[must_use]
    pub fn from_actions(actions: &[Action]) -> Self {
        let mut xref = Self::default();

        for action in actions {
            match action {
                Action::CardCommented {
                    date,
                    card_id,
                    text,
                } => {
                    xref.comments
                        .entry(card_id.clone())
                        .or_default()
                        .push(Comment {
                            date: minute_precision(date),
                            text: text.clone(),
                        });
                }
                Action::CardCreated { date, card_id } => {
                    // Last write wins on duplicate createCard actions.
                    xref.created.insert(card_id.clone(), minute_precision(date));
                }
                Action::Other => {}
            }
        }

        xref
    }

    /// The card's comments in action-log order; empty for unknown ids.
    #[must_use]
    pub fn comments_for(&self, card_id: &str) -> &[Comment] {
        self.comments.get(card_id).map_or(&[], Vec::as_slice)
    }

    /// The card's creation timestamp at minute precision, if the log has one.
    #[must_use]
    pub fn creation_date(&self, card_id: &str) -> Option<&str> {
        self.created.get(card_id).map(String::as_str)
    }
}

/// Truncates an export timestamp to `YYYY-MM-DD HH:MM`.
///
/// The export format writes timestamps like `2021-01-01T10:00:00.000Z`.
/// The `T` becomes a space and the trailing 8 characters (seconds and zone
/// suffix) are dropped. Input shorter than 8 characters truncates to empty.
///
/// # Example
///
/// ```
/// use board2md::xref::minute_precision;
///
/// assert_eq!(minute_precision("2021-01-01T10:00:00.000Z"), "2021-01-01 10:00");
/// ```
#[must_use]
pub fn minute_precision(raw: &str) -> String {
    let spaced = raw.replace('T', " ");
    let cut = spaced.char_indices().rev().nth(7).map_or(0, |(i, _)| i);
    spaced[..cut].to_owned()
}
