// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Attachment downloads.
//!
//! Attachments are fetched over HTTP(S) from the URL recorded in the export,
//! exactly as given — no authentication, no custom headers. The export runs
//! strictly sequentially, so the client is blocking; one download at a time,
//! each blocking the pipeline until it finishes or fails.
//!
//! Transient failures (connect errors, timeouts, 5xx responses) are retried
//! a bounded number of times with a short pause. A 4xx response is terminal:
//! a missing attachment will not appear on retry.

use snafu::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Total attempts per download, including the first.
const MAX_ATTEMPTS: u32 = 3;

/// Pause between attempts.
const RETRY_PAUSE: Duration = Duration::from_millis(500);

/// Error type for download failures.
#[derive(Debug, Snafu)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[snafu(display("failed to build HTTP client: {source}"))]
    Client {
        /// The underlying client construction error.
        source: reqwest::Error,
    },

    /// The request itself failed (connect error, timeout, bad URL).
    #[snafu(display("request for {url} failed: {source}"))]
    Request {
        /// The URL that was requested.
        url: String,
        /// The underlying transport error.
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[snafu(display("{url} returned {status}"))]
    Status {
        /// The URL that was requested.
        url: String,
        /// The response status code.
        status: reqwest::StatusCode,
    },

    /// The response body could not be written to disk.
    #[snafu(display("failed to write {}: {source}", path.display()))]
    Write {
        /// The destination path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

impl FetchError {
    /// Whether another attempt could plausibly succeed.
    fn is_transient(&self) -> bool {
        match self {
            Self::Request { source, .. } => source.is_timeout() || source.is_connect(),
            Self::Status { status, .. } => status.is_server_error(),
            Self::Client { .. } | Self::Write { .. } => false,
        }
    }
}

/// Retrieves attachment bytes and persists them to disk.
#[derive(Debug)]
pub struct Fetcher {
    client: reqwest::blocking::Client,
}

impl Fetcher {
    /// Builds a fetcher with the standard timeout applied.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the TLS backend cannot be
    /// initialized.
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context(ClientSnafu)?;

        Ok(Self { client })
    }

    /// Downloads `url` and writes the body to `dest`.
    ///
    /// Retries transient failures up to [`MAX_ATTEMPTS`] times total,
    /// pausing [`RETRY_PAUSE`] between attempts.
    ///
    /// # Errors
    ///
    /// Returns the last error once attempts are exhausted, or immediately
    /// for terminal failures (4xx responses, write failures).
    pub fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        let mut attempt = 1;
        loop {
            match self.fetch_once(url, dest) {
                Ok(()) => return Ok(()),
                Err(err) if attempt < MAX_ATTEMPTS && err.is_transient() => {
                    debug!("attempt {attempt} for {url} failed ({err}), retrying");
                    std::thread::sleep(RETRY_PAUSE);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn fetch_once(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        let response = self.client.get(url).send().context(RequestSnafu { url })?;

        let status = response.status();
        ensure!(status.is_success(), StatusSnafu { url, status });

        let bytes = response.bytes().context(RequestSnafu { url })?;
        std::fs::write(dest, &bytes).context(WriteSnafu { path: dest })?;

        Ok(())
    }
}
