// Copyright (c) The barline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced while reporting run progress.

use thiserror::Error;

/// An error that occurred while parsing a progress template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// The template contains a placeholder the renderer doesn't recognize.
    #[error("unknown placeholder `{{{name}}}` in progress template")]
    UnknownPlaceholder {
        /// The unrecognized placeholder name.
        name: String,
    },

    /// A `{` was opened but never closed.
    #[error("unclosed `{{` in progress template")]
    UnclosedPlaceholder,
}

/// An error that occurred while reporting a run event.
#[derive(Debug, Error)]
pub enum ReportEventError {
    /// An error occurred while writing to the output stream.
    ///
    /// This is not retried or buffered: it propagates to the run's caller.
    #[error("error writing to output")]
    Io(#[source] std::io::Error),

    /// The configured progress template was invalid.
    #[error("invalid progress template")]
    Format(#[from] FormatError),
}
