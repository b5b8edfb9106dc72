// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! JSON parsing for board exports.
//!
//! This module handles deserialization of the JSON document produced by a
//! board's export feature. The document describes one project/workspace:
//! its lists, the cards on them, and the history log of actions (which is
//! where comments and card creation dates live).
//!
//! # Format Overview
//!
//! A board export contains three top-level collections:
//! - `lists`: named columns, each with an opaque id
//! - `cards`: items with a name, description, owning list id, and attachments
//! - `actions`: timestamped event records with a `type` tag and a payload
//!
//! Only the `commentCard` and `createCard` action types carry information
//! this tool uses; every other type is preserved as [`Action::Other`] and
//! ignored downstream. Missing payload fields on a recognized action type
//! are a parse error — the document is validated here, at the boundary,
//! and nowhere else.
//!
//! # Example
//!
//! ```
//! use board2md::parser::parse_board;
//!
//! let json = r#"{
//!     "lists": [{ "id": "l1", "name": "To Do" }],
//!     "cards": [{
//!         "id": "c1",
//!         "name": "Buy milk",
//!         "idList": "l1",
//!         "desc": "2% please",
//!         "attachments": []
//!     }],
//!     "actions": []
//! }"#;
//!
//! let board = parse_board(json).unwrap();
//! assert_eq!(board.cards.len(), 1);
//! ```

use serde::Deserialize;
use snafu::prelude::*;

/// Error type for JSON parsing failures.
#[derive(Debug, Snafu)]
pub enum ParseError {
    /// Failed to parse JSON content.
    #[snafu(display("failed to parse JSON: {source}"))]
    Json {
        /// The underlying JSON parsing error.
        source: serde_json::Error,
    },
}

/// The root structure of a board export.
///
/// All three collections keep the order they have in the document; the
/// export walks them in that order and never re-sorts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Board {
    /// The board's lists (columns), in display order.
    pub lists: Vec<List>,

    /// Every card on the board, with its owning list referenced by id.
    pub cards: Vec<Card>,

    /// The board's history log.
    pub actions: Vec<Action>,
}

/// A named column grouping cards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct List {
    /// Opaque identifier, referenced by [`Card::id_list`].
    pub id: String,

    /// Display name. Sanitized before use as a directory name.
    pub name: String,
}

/// A single task/item on a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Opaque identifier, referenced by actions in the history log.
    pub id: String,

    /// Display name. Sanitized before use as a directory name.
    pub name: String,

    /// Id of the owning list. Must resolve to a [`List`] on the board;
    /// an unresolved reference aborts the export.
    pub id_list: String,

    /// Free-text description, rendered verbatim into the card document.
    pub desc: String,

    /// File references attached to the card.
    pub attachments: Vec<Attachment>,
}

/// A file reference attached to a card.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Attachment {
    /// Display name, typically a filename.
    pub name: String,

    /// Source URL the attachment is fetched from, used exactly as given.
    pub url: String,

    /// ISO-8601-like timestamp of when the attachment was added.
    pub date: String,
}

/// An event record from the board's history log.
///
/// The export format tags each action with a `type` string and nests the
/// affected card under `data.card`. Only two types matter here; the rest
/// collapse to [`Action::Other`] for forward compatibility with the many
/// other tags boards emit (`updateCard`, `addMemberToCard`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A `commentCard` action: someone commented on a card.
    CardCommented {
        /// Raw timestamp of the comment.
        date: String,
        /// Id of the card the comment belongs to.
        card_id: String,
        /// The comment text.
        text: String,
    },

    /// A `createCard` action: a card was created.
    CardCreated {
        /// Raw timestamp of the creation.
        date: String,
        /// Id of the created card.
        card_id: String,
    },

    /// Any unrecognized action type. Carried through the parse and ignored.
    Other,
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let value = serde_json::Value::deserialize(deserializer)?;

        let date = |what: &str| -> Result<String, D::Error> {
            get_string(&value, &["date"])
                .ok_or_else(|| D::Error::custom(format!("{what} action missing date")))
        };
        let card_id = |what: &str| -> Result<String, D::Error> {
            get_string(&value, &["data", "card", "id"])
                .ok_or_else(|| D::Error::custom(format!("{what} action missing data.card.id")))
        };

        Ok(match get_str(&value, &["type"]) {
            Some("commentCard") => Self::CardCommented {
                date: date("commentCard")?,
                card_id: card_id("commentCard")?,
                text: get_string(&value, &["data", "text"])
                    .ok_or_else(|| D::Error::custom("commentCard action missing data.text"))?,
            },
            Some("createCard") => Self::CardCreated {
                date: date("createCard")?,
                card_id: card_id("createCard")?,
            },
            _ => Self::Other,
        })
    }
}

/// Navigates a JSON path and returns the string value at the end.
///
/// # Arguments
///
/// * `value` - The root JSON value to navigate from
/// * `path` - A sequence of keys to follow through the JSON structure
fn get_str<'a>(value: &'a serde_json::Value, path: &[&str]) -> Option<&'a str> {
    let mut current = value;
    for key in path {
        current = current.get(*key)?;
    }
    current.as_str()
}

/// Like [`get_str`] but returns an owned `String`.
fn get_string(value: &serde_json::Value, path: &[&str]) -> Option<String> {
    get_str(value, path).map(str::to_owned)
}

/// Parses a JSON string into a [`Board`] structure.
///
/// This is the main entry point for parsing board exports.
///
/// # Arguments
///
/// * `json_str` - The raw JSON content of a board export file
///
/// # Errors
///
/// Returns an error if the JSON is malformed, a top-level collection is
/// missing, or a recognized action lacks its expected payload fields.
///
/// # Example
///
/// ```
/// use board2md::parser::parse_board;
///
/// let json = r#"{ "lists": [], "cards": [], "actions": [] }"#;
///
/// let board = parse_board(json).unwrap();
/// assert!(board.lists.is_empty());
/// ```
pub fn parse_board(json_str: &str) -> Result<Board, ParseError> {
    serde_json::from_str(json_str).context(JsonSnafu)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_json(lists: &str, cards: &str, actions: &str) -> String {
        format!(r#"{{ "lists": [{lists}], "cards": [{cards}], "actions": [{actions}] }}"#)
    }

    fn card_json(id: &str, name: &str, id_list: &str) -> String {
        format!(
            r#"{{
                "id": "{id}",
                "name": "{name}",
                "idList": "{id_list}",
                "desc": "",
                "attachments": []
            }}"#
        )
    }

    fn comment_action_json(card_id: &str, date: &str, text: &str) -> String {
        format!(
            r#"{{
                "type": "commentCard",
                "date": "{date}",
                "data": {{ "card": {{ "id": "{card_id}", "name": "x" }}, "text": "{text}" }}
            }}"#
        )
    }

    #[test]
    fn parses_minimal_board() {
        let json = board_json(
            r#"{ "id": "l1", "name": "To Do" }"#,
            &card_json("c1", "Buy milk", "l1"),
            "",
        );
        let board = parse_board(&json).unwrap();

        assert_eq!(board.lists.len(), 1);
        assert_eq!(board.lists[0].name, "To Do");
        assert_eq!(board.cards[0].name, "Buy milk");
        assert_eq!(board.cards[0].id_list, "l1");
        assert!(board.actions.is_empty());
    }

    #[test]
    fn parses_card_attachments() {
        let card = r#"{
            "id": "c1",
            "name": "Logo",
            "idList": "l1",
            "desc": "artwork",
            "attachments": [{
                "name": "final logo.png",
                "url": "https://example.com/final%20logo.png",
                "date": "2021-03-04T12:30:00.000Z"
            }]
        }"#;
        let board = parse_board(&board_json("", card, "")).unwrap();

        let att = &board.cards[0].attachments[0];
        assert_eq!(att.name, "final logo.png");
        assert_eq!(att.url, "https://example.com/final%20logo.png");
        assert_eq!(att.date, "2021-03-04T12:30:00.000Z");
    }

    #[test]
    fn parses_comment_action() {
        let json = board_json(
            "",
            "",
            &comment_action_json("c1", "2021-01-01T10:00:00.000Z", "looks good"),
        );
        let board = parse_board(&json).unwrap();

        match &board.actions[0] {
            Action::CardCommented {
                date,
                card_id,
                text,
            } => {
                assert_eq!(date, "2021-01-01T10:00:00.000Z");
                assert_eq!(card_id, "c1");
                assert_eq!(text, "looks good");
            }
            other => panic!("Expected CardCommented, got {other:?}"),
        }
    }

    #[test]
    fn parses_create_action() {
        let action = r#"{
            "type": "createCard",
            "date": "2020-12-25T08:00:00.000Z",
            "data": { "card": { "id": "c9", "name": "x" } }
        }"#;
        let board = parse_board(&board_json("", "", action)).unwrap();

        match &board.actions[0] {
            Action::CardCreated { date, card_id } => {
                assert_eq!(date, "2020-12-25T08:00:00.000Z");
                assert_eq!(card_id, "c9");
            }
            other => panic!("Expected CardCreated, got {other:?}"),
        }
    }

    #[test]
    fn parses_unrecognized_action_as_other() {
        let action = r#"{
            "type": "updateCard",
            "date": "2021-02-02T00:00:00.000Z",
            "data": { "card": { "id": "c1" }, "old": { "pos": 1 } }
        }"#;
        let board = parse_board(&board_json("", "", action)).unwrap();

        assert!(matches!(board.actions[0], Action::Other));
    }

    #[test]
    fn parses_action_without_type_as_other() {
        let board = parse_board(&board_json("", "", r#"{ "date": "2021-01-01" }"#)).unwrap();

        assert!(matches!(board.actions[0], Action::Other));
    }

    #[test]
    fn rejects_comment_action_without_card() {
        let action = r#"{
            "type": "commentCard",
            "date": "2021-01-01T10:00:00.000Z",
            "data": { "text": "orphaned" }
        }"#;

        assert!(parse_board(&board_json("", "", action)).is_err());
    }

    #[test]
    fn rejects_comment_action_without_text() {
        let action = r#"{
            "type": "commentCard",
            "date": "2021-01-01T10:00:00.000Z",
            "data": { "card": { "id": "c1", "name": "x" } }
        }"#;

        assert!(parse_board(&board_json("", "", action)).is_err());
    }

    #[test]
    fn rejects_card_without_list_reference() {
        let card = r#"{ "id": "c1", "name": "stray", "desc": "", "attachments": [] }"#;

        assert!(parse_board(&board_json("", card, "")).is_err());
    }

    #[test]
    fn rejects_missing_top_level_collections() {
        assert!(parse_board(r#"{ "lists": [], "cards": [] }"#).is_err());
    }

    #[test]
    fn returns_error_for_invalid_json() {
        assert!(parse_board("not valid json").is_err());
    }

    #[test]
    fn ignores_unknown_fields() {
        let json = r#"{
            "id": "board-id",
            "name": "My Board",
            "closed": false,
            "lists": [],
            "cards": [],
            "actions": []
        }"#;

        assert!(parse_board(json).is_ok());
    }
}
