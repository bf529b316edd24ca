// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::range::Range;

use core::fmt::{self, Debug, Formatter};
use std::rc::Rc;

use anyhow::{anyhow, Result};

/// Text of a configuration file, indexed by line so findings can be shown in place.
#[derive(Clone)]
pub struct Source {
    file: Rc<str>,
    contents: Rc<str>,
    // Byte offset of the first character of every line.
    line_starts: Rc<[u32]>,
}

impl PartialEq for Source {
    fn eq(&self, other: &Source) -> bool {
        Rc::ptr_eq(&self.contents, &other.contents)
    }
}

impl Eq for Source {}

impl Debug for Source {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.file.fmt(f)
    }
}

impl Source {
    pub fn from_contents(file: Rc<str>, contents: String) -> Result<Source> {
        // Positions are stored as u32.
        u32::try_from(contents.len())
            .map_err(|_| anyhow!("{file}: configuration file is too large"))?;

        let line_starts = std::iter::once(0)
            .chain(contents.match_indices('\n').map(|(i, _)| i as u32 + 1))
            .filter(|start| (*start as usize) < contents.len() || *start == 0)
            .collect();

        Ok(Self {
            file,
            contents: contents.into(),
            line_starts,
        })
    }

    pub fn file(&self) -> &Rc<str> {
        &self.file
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Text of the 1-based `line` without its terminator.
    pub fn line(&self, line: u32) -> Option<&str> {
        let idx = (line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(idx)? as usize;
        let end = self
            .line_starts
            .get(idx + 1)
            .map_or(self.contents.len(), |s| *s as usize);
        Some(self.contents[start..end].trim_end_matches(&['\n', '\r'][..]))
    }

    /// The text a range covers.
    pub fn snippet(&self, range: &Range) -> Option<&str> {
        self.contents
            .get(range.start.byte as usize..range.end.byte as usize)
    }

    /// Render `msg` under the first line of `range`, with the covered columns underlined.
    ///
    /// Ranges spanning several lines are underlined up to the end of their first line.
    pub fn range_message(&self, range: &Range, kind: &str, msg: &str) -> String {
        let Some(text) = self.line(range.start.line) else {
            return format!("{range}: {kind}: {msg}");
        };

        let start = range.start.column.max(1);
        let end = if range.end.line == range.start.line {
            range.end.column
        } else {
            text.chars().count() as u32 + 1
        };
        let width = end.saturating_sub(start).max(1) as usize;

        let number = range.start.line.to_string();
        let gutter = " ".repeat(number.len());
        let indent = " ".repeat(start as usize - 1);
        let underline = "^".repeat(width);

        [
            String::new(),
            format!("--> {}:{}:{}", self.file, range.start.line, range.start.column),
            format!("{gutter} |"),
            format!("{number} | {text}"),
            format!("{gutter} | {indent}{underline}"),
            format!("{kind}: {msg}"),
        ]
        .join("\n")
    }
}
