// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Export orchestration: builds the output tree for one board.
//!
//! Control flow, in source-document order throughout:
//!
//! 1. Create one directory per list under the base directory.
//! 2. Cross-reference the action log (comments, creation dates).
//! 3. For each card: create its directory, download its attachments,
//!    render and write its `index.md`.
//!
//! Directory creation is idempotent and lists or cards whose sanitized
//! names collide share a directory, last write winning. A failed
//! attachment download is logged and skipped; the link line is still
//! written, pointing at the missing file. Everything else is fatal and
//! surfaces as an [`ExportError`].
//!
//! A crash mid-run leaves a partially populated tree; re-running the
//! export overwrites it and produces identical content.

use crate::fetch::Fetcher;
use crate::parser::Board;
use crate::renderer::{AttachmentLink, render_card};
use crate::sanitize::sanitize;
use crate::xref::CrossReference;
use snafu::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Error type for export failures.
#[derive(Debug, Snafu)]
pub enum ExportError {
    /// A card references a list id that is not on the board.
    #[snafu(display("card {card:?} references unknown list {list_id}"))]
    UnknownList {
        /// Name of the offending card.
        card: String,
        /// The unresolved list id.
        list_id: String,
    },

    /// A directory could not be created.
    #[snafu(display("failed to create directory {}: {source}", path.display()))]
    CreateDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A card document could not be written.
    #[snafu(display("failed to write {}: {source}", path.display()))]
    WriteCard {
        /// The `index.md` path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Knobs for a single export run.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Whether attachments are downloaded. Link lines are written either
    /// way.
    pub fetch_attachments: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            fetch_attachments: true,
        }
    }
}

/// What an export run produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Number of list directories created.
    pub lists: usize,

    /// Number of card documents written.
    pub cards: usize,

    /// Total attachments encountered.
    pub attachments: usize,

    /// Attachments whose download failed. Their link lines still exist.
    pub failed_downloads: usize,
}

/// Exports one parsed board into `base_dir`.
///
/// Walks lists, cards, and attachments strictly in document order and
/// writes the whole tree under `base_dir` (created on demand).
///
/// # Errors
///
/// Returns [`ExportError::UnknownList`] if a card's list reference does
/// not resolve, or an I/O variant if a directory or card document cannot
/// be written. Attachment download failures are not errors; they are
/// logged and counted in the summary.
pub fn export_board(
    board: &Board,
    base_dir: &Path,
    fetcher: &Fetcher,
    opts: &ExportOptions,
) -> Result<ExportSummary, ExportError> {
    let mut summary = ExportSummary::default();

    let mut list_dirs: HashMap<&str, PathBuf> = HashMap::new();
    for list in &board.lists {
        let path = base_dir.join(sanitize(&list.name, true));
        std::fs::create_dir_all(&path).context(CreateDirSnafu { path: &path })?;
        list_dirs.insert(list.id.as_str(), path);
    }
    summary.lists = board.lists.len();

    let xref = CrossReference::from_actions(&board.actions);
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();

    for card in &board.cards {
        let list_dir = list_dirs
            .get(card.id_list.as_str())
            .context(UnknownListSnafu {
                card: &card.name,
                list_id: &card.id_list,
            })?;

        let card_dir = list_dir.join(sanitize(&card.name, true));
        std::fs::create_dir_all(&card_dir).context(CreateDirSnafu { path: &card_dir })?;

        let date = xref
            .creation_date(&card.id)
            .map_or_else(|| today.clone(), str::to_owned);

        let mut links = Vec::with_capacity(card.attachments.len());
        for attachment in &card.attachments {
            let link = AttachmentLink::new(attachment);
            if opts.fetch_attachments {
                let dest = card_dir.join(&link.file_name);
                info!("downloading {} -> {}", attachment.url, dest.display());
                if let Err(err) = fetcher.fetch(&attachment.url, &dest) {
                    warn!("failed to download {}: {err}", attachment.url);
                    summary.failed_downloads += 1;
                }
            }
            links.push(link);
        }
        summary.attachments += card.attachments.len();

        let doc = render_card(card, &date, xref.comments_for(&card.id), &links);
        let index_path = card_dir.join("index.md");
        std::fs::write(&index_path, doc).context(WriteCardSnafu { path: &index_path })?;
        summary.cards += 1;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_board;

    const NO_FETCH: ExportOptions = ExportOptions {
        fetch_attachments: false,
    };

    fn one_card_board() -> Board {
        parse_board(
            r#"{
                "lists": [{ "id": "l1", "name": "To Do" }],
                "cards": [{
                    "id": "c1",
                    "name": "Buy milk",
                    "idList": "l1",
                    "desc": "2% please",
                    "attachments": []
                }],
                "actions": []
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn builds_list_and_card_directories() {
        let board = one_card_board();
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("board");
        let fetcher = Fetcher::new().unwrap();

        let summary = export_board(&board, &base, &fetcher, &NO_FETCH).unwrap();

        assert_eq!(summary.lists, 1);
        assert_eq!(summary.cards, 1);
        assert!(base.join("To_Do").join("Buy_milk").join("index.md").exists());
    }

    #[test]
    fn card_with_unknown_list_is_fatal() {
        let board = parse_board(
            r#"{
                "lists": [],
                "cards": [{
                    "id": "c1",
                    "name": "stray",
                    "idList": "ghost",
                    "desc": "",
                    "attachments": []
                }],
                "actions": []
            }"#,
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let fetcher = Fetcher::new().unwrap();

        let err = export_board(&board, dir.path(), &fetcher, &NO_FETCH).unwrap_err();

        assert!(matches!(err, ExportError::UnknownList { .. }));
    }

    #[test]
    fn falls_back_to_current_date_without_create_action() {
        let board = one_card_board();
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("board");
        let fetcher = Fetcher::new().unwrap();

        export_board(&board, &base, &fetcher, &NO_FETCH).unwrap();

        let doc =
            std::fs::read_to_string(base.join("To_Do").join("Buy_milk").join("index.md")).unwrap();
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        assert!(doc.contains(&format!("_{today}_")), "got: {doc}");
    }

    #[test]
    fn rerunning_overwrites_in_place() {
        let board = one_card_board();
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("board");
        let fetcher = Fetcher::new().unwrap();

        export_board(&board, &base, &fetcher, &NO_FETCH).unwrap();
        let index = base.join("To_Do").join("Buy_milk").join("index.md");
        let first = std::fs::read_to_string(&index).unwrap();

        export_board(&board, &base, &fetcher, &NO_FETCH).unwrap();
        let second = std::fs::read_to_string(&index).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn colliding_card_names_share_a_directory() {
        let board = parse_board(
            r#"{
                "lists": [{ "id": "l1", "name": "Inbox" }],
                "cards": [
                    {
                        "id": "c1",
                        "name": "dup?name",
                        "idList": "l1",
                        "desc": "first",
                        "attachments": []
                    },
                    {
                        "id": "c2",
                        "name": "dup*name",
                        "idList": "l1",
                        "desc": "second",
                        "attachments": []
                    }
                ],
                "actions": []
            }"#,
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("board");
        let fetcher = Fetcher::new().unwrap();

        let summary = export_board(&board, &base, &fetcher, &NO_FETCH).unwrap();

        // Both sanitize to dup_name; the later card's document wins.
        assert_eq!(summary.cards, 2);
        let doc =
            std::fs::read_to_string(base.join("Inbox").join("dup_name").join("index.md")).unwrap();
        assert!(doc.contains("second"));
    }
}
