// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Markdown rendering for exported cards.
//!
//! This module produces the `index.md` document for one card: a header
//! block, one block per comment, and one link line per attachment.
//!
//! # Output Format
//!
//! ```markdown
//! # Card name
//! _2021-01-01 10:00_
//! Card description
//! ## 2021-01-02 09:30
//! Comment text
//!
//! + ![scan.png](scan.png) (2021-01-03 14:00)
//! + [notes.pdf](notes.pdf) (2021-01-03 14:05)
//! ```
//!
//! The templates are fixed at compile time; this module is the single place
//! to edit if different output is wanted. Attachments whose display name
//! ends in one of [`IMAGE_EXTENSIONS`] are embedded as images (`!`-prefixed
//! links); everything else is a plain link.

use crate::parser::{Attachment, Card};
use crate::sanitize::sanitize;
use crate::xref::{Comment, minute_precision};
use std::ffi::OsStr;
use std::fmt::Write;
use std::path::Path;

/// Extensions rendered as embedded images. The comparison is case-sensitive:
/// `scan.PNG` is a plain link.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// An attachment prepared for rendering and download.
///
/// Derived once from the parsed [`Attachment`]: the display name shows
/// underscores as spaces, while the on-disk filename (and therefore the
/// link target) keeps the sanitized underscore form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentLink {
    /// Display name with underscores shown as spaces.
    pub name: String,

    /// Sanitized filename the attachment is saved under, relative to the
    /// card directory. Also the link target.
    pub file_name: String,

    /// Timestamp at minute precision.
    pub date: String,

    /// Whether the link is rendered as an embedded image.
    pub is_image: bool,
}

impl AttachmentLink {
    /// Derives the rendering view of an attachment.
    #[must_use]
    pub fn new(attachment: &Attachment) -> Self {
        let name = attachment.name.replace('_', " ");
        let is_image = Path::new(&name)
            .extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext));
        let file_name = sanitize(&name, true);

        Self {
            name,
            file_name,
            date: minute_precision(&attachment.date),
            is_image,
        }
    }
}

/// Renders the complete `index.md` document for one card.
///
/// Concatenates the header block (name, resolved creation date,
/// description), the comment blocks in the order given, and one link line
/// per attachment. Pure and stateless; the caller resolves the creation
/// date and gathers comments beforehand.
#[must_use]
pub fn render_card(
    card: &Card,
    date: &str,
    comments: &[Comment],
    attachments: &[AttachmentLink],
) -> String {
    let mut out = String::new();

    writeln!(out, "# {}", card.name).unwrap();
    writeln!(out, "_{date}_").unwrap();
    writeln!(out, "{}", card.desc).unwrap();

    for comment in comments {
        writeln!(out, "## {}", comment.date).unwrap();
        writeln!(out, "{}\n", comment.text).unwrap();
    }

    for link in attachments {
        let img_mark = if link.is_image { "!" } else { "" };
        writeln!(
            out,
            "+ {img_mark}[{}]({}) ({})",
            link.name, link.file_name, link.date
        )
        .unwrap();
    }

    out
}
