//! Word list loading
//!
//! Every line is a seed, blank ones included: a blank line still yields
//! one task per extension. Lines are read as bytes and decoded lossily,
//! so a stray non-UTF-8 entry does not abort the whole list.

use crate::error::WordlistError;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use tracing::{debug, info};

/// Read seeds from `reader`, expanding each with every extension
///
/// A seed `s` yields `s` followed by `s + ext` for each extension, in order.
pub fn seed_paths<R: BufRead>(mut reader: R, extensions: &[String]) -> io::Result<Vec<String>> {
    let mut paths = Vec::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        let line = String::from_utf8_lossy(&buf);
        let word = line.trim_end_matches(['\r', '\n']);

        paths.push(word.to_string());
        paths.extend(extensions.iter().map(|ext| format!("{}{}", word, ext)));
    }

    Ok(paths)
}

/// Load all word lists, in the order given
pub fn load_word_lists(lists: &[PathBuf], extensions: &[String]) -> Result<Vec<String>, WordlistError> {
    let mut paths = Vec::new();

    for list in lists {
        let file = File::open(list).map_err(|source| WordlistError::Read {
            path: list.clone(),
            source,
        })?;
        let seeds = seed_paths(BufReader::new(file), extensions).map_err(|source| WordlistError::Read {
            path: list.clone(),
            source,
        })?;

        debug!(path = %list.display(), tasks = seeds.len(), "Word list loaded");
        paths.extend(seeds);
    }

    info!(lists = lists.len(), tasks = paths.len(), "Word lists loaded");
    Ok(paths)
}
