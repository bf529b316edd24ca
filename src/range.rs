// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use core::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// A position in a configuration file. Lines and columns start at 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub line: u32,
    pub column: u32,
    pub byte: u32,
}

/// A span of a configuration file that issues are anchored to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Range {
    pub filename: Rc<str>,
    pub start: Pos,
    pub end: Pos,
}

impl Range {
    pub fn new(filename: Rc<str>, start: Pos, end: Pos) -> Self {
        Self {
            filename,
            start,
            end,
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(
                f,
                "{}:{},{}-{}",
                self.filename, self.start.line, self.start.column, self.end.column
            )
        } else {
            write!(
                f,
                "{}:{},{}-{},{}",
                self.filename, self.start.line, self.start.column, self.end.line, self.end.column
            )
        }
    }
}
