// SPDX-License-Identifier: MIT OR Apache-2.0

//! Output and color utilities for consistent terminal formatting
//!
//! Renders match results and chunk listings, respecting the NO_COLOR
//! environment variable.

use colored::Colorize;

use crate::api::MatchResponse;
use crate::chunker::ChunkWindow;

/// Check if colors should be used (respects NO_COLOR env var)
pub fn use_colors() -> bool {
    std::env::var("NO_COLOR").is_err()
}

/// Colorize document id (cyan)
fn colorize_doc(text: &str, use_color: bool) -> String {
    if use_color {
        text.cyan().to_string()
    } else {
        text.to_string()
    }
}

/// Colorize similarity score (yellow)
fn colorize_score(score: f32, use_color: bool) -> String {
    let formatted = format!("{:.4}", score);
    if use_color {
        formatted.yellow().to_string()
    } else {
        formatted
    }
}

/// Colorize neighbor context (dimmed)
fn colorize_context(text: &str, use_color: bool) -> String {
    if use_color {
        text.dimmed().to_string()
    } else {
        text.to_string()
    }
}

/// Renders ranked match results for the terminal.
pub fn render_matches(response: &MatchResponse, use_color: bool) -> String {
    let mut out = String::new();
    for (rank, result) in response.results.iter().enumerate() {
        out.push_str(&format!(
            "{}. {}#{}  score {}\n",
            rank + 1,
            colorize_doc(&result.doc_id, use_color),
            result.chunk_index,
            colorize_score(result.score, use_color),
        ));
        if let Some(context) = &result.context {
            if let Some(before) = &context.before {
                out.push_str(&format!("   … {}\n", colorize_context(before, use_color)));
            }
        }
        out.push_str(&format!("   {}\n", result.text));
        if let Some(context) = &result.context {
            if let Some(after) = &context.after {
                out.push_str(&format!("   {} …\n", colorize_context(after, use_color)));
            }
        }
    }
    out
}

/// Renders chunk windows produced by the chunker.
pub fn render_chunks(windows: &[ChunkWindow], use_color: bool) -> String {
    let mut out = String::new();
    for window in windows {
        let words = window.text.split_whitespace().count();
        out.push_str(&format!(
            "{} ({} words)\n{}\n\n",
            colorize_doc(&format!("chunk {}", window.index), use_color),
            words,
            window.text,
        ));
    }
    out
}
