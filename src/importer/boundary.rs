//! Declaration boundary detection and cursor-based span selection.

use serde::{Deserialize, Serialize};

use crate::importer::lines::{Line, LineKind, OpenLine};

/// Zero-based, inclusive line range of one declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSpan {
    pub start_line: usize,
    pub end_line: usize,
}

impl LineSpan {
    pub fn contains(&self, line: usize) -> bool {
        self.start_line <= line && line <= self.end_line
    }
}

/// A balanced open/close pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Boundary<'a> {
    pub span: LineSpan,
    /// Nesting depth of the open line; 0 for top-level declarations.
    pub level: usize,
    pub open: OpenLine<'a>,
}

#[derive(Debug, Default)]
pub(crate) struct Boundaries<'a> {
    /// Completed spans, in close order.
    pub spans: Vec<Boundary<'a>>,
    /// Opens never closed before the end of the text: `(line, open)`.
    pub unmatched: Vec<(usize, OpenLine<'a>)>,
}

impl<'a> Boundaries<'a> {
    pub fn top_level(&self) -> Vec<Boundary<'a>> {
        let mut top: Vec<_> = self.spans.iter().filter(|b| b.level == 0).copied().collect();
        top.sort_by_key(|b| b.span.start_line);
        top
    }

    /// Picks the declaration a cursor on `line` refers to.
    ///
    /// A cursor on an open or close line selects the outermost span starting
    /// (or ending) there; a cursor inside a body selects the innermost span.
    pub fn select(&self, line: usize) -> Option<Boundary<'a>> {
        self.outermost(|b| b.span.start_line == line)
            .or_else(|| self.outermost(|b| b.span.end_line == line))
            .or_else(|| {
                self.spans
                    .iter()
                    .filter(|b| b.span.contains(line))
                    .max_by_key(|b| b.level)
                    .copied()
            })
    }

    fn outermost(&self, pick: impl Fn(&Boundary<'a>) -> bool) -> Option<Boundary<'a>> {
        self.spans
            .iter()
            .filter(|b| pick(b))
            .min_by_key(|b| b.level)
            .copied()
    }

    /// The closest unclosed open at or above `line`.
    pub fn unmatched_before(&self, line: usize) -> Option<(usize, OpenLine<'a>)> {
        self.unmatched
            .iter()
            .filter(|(start, _)| *start <= line)
            .max_by_key(|(start, _)| *start)
            .copied()
    }
}

/// One linear pass over the lines with an explicit stack of open lines.
pub(crate) fn detect<'a>(lines: &[Line<'a>]) -> Boundaries<'a> {
    let mut stack: Vec<(usize, OpenLine<'a>, usize)> = Vec::new();
    let mut spans = Vec::new();

    for (number, line) in lines.iter().enumerate() {
        match line.kind {
            LineKind::Open(open) => {
                let depth = stack.len();
                stack.push((number, open, depth));
            }
            LineKind::Close => {
                if let Some((start_line, open, level)) = stack.pop() {
                    spans.push(Boundary {
                        span: LineSpan {
                            start_line,
                            end_line: number,
                        },
                        level,
                        open,
                    });
                } else {
                    log::trace!("stray close at line {}", number);
                }
            }
            _ => {}
        }
    }

    let unmatched = stack
        .into_iter()
        .map(|(start, open, _)| (start, open))
        .collect();
    Boundaries { spans, unmatched }
}
