// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Convert board JSON exports to a Markdown directory tree.
//!
//! This crate transforms a board's JSON export (lists, cards, comments,
//! attachments) into a browsable file tree: one folder per list, one
//! subfolder per card, an `index.md` per card with its description and
//! comments, and local copies of its attachments with images embedded.
//!
//! # Overview
//!
//! The export is a single linear pipeline:
//!
//! 1. Parse the JSON document into typed records
//! 2. Cross-reference the action log for comments and creation dates
//! 3. Build the list/card directory tree, downloading attachments and
//!    rendering one Markdown document per card
//!
//! # Example
//!
//! ```no_run
//! use board2md::{export, fetch, parser};
//! use std::path::Path;
//!
//! let json = std::fs::read_to_string("board.json").unwrap();
//! let board = parser::parse_board(&json).unwrap();
//!
//! let fetcher = fetch::Fetcher::new().unwrap();
//! let summary = export::export_board(
//!     &board,
//!     Path::new("board"),
//!     &fetcher,
//!     &export::ExportOptions::default(),
//! )
//! .unwrap();
//!
//! println!("{} cards exported", summary.cards);
//! ```
//!
//! # Modules
//!
//! - [`parser`]: JSON parsing and type definitions for board exports
//! - [`sanitize`]: filesystem-safe name sanitization
//! - [`xref`]: comment and creation-date cross-referencing from the action log
//! - [`fetch`]: blocking attachment downloads with bounded retries
//! - [`renderer`]: Markdown generation for card documents
//! - [`export`]: tree building and end-to-end orchestration

#![deny(missing_docs)]

pub mod export;
pub mod fetch;
pub mod parser;
pub mod renderer;
pub mod sanitize;
pub mod xref;
