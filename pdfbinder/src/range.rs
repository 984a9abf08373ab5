//! Page range expressions.
//!
//! A range expression is a comma-separated list of tokens, each either a
//! single page (`5`) or an inclusive range (`2-7`). Pages are 1-based.
//! Tokens expand in the order they are written, so an expression can reorder
//! and repeat pages:
//!
//! ```
//! use pdfbinder::range::{self, RangeOutcome};
//!
//! let outcome = range::parse("5, 1-3", 10).unwrap();
//! assert_eq!(outcome, RangeOutcome::Pages(vec![5, 1, 2, 3].into()));
//! ```
//!
//! An empty expression means "the whole document" and is reported as
//! [`RangeOutcome::WholeDocument`] so the caller can decide whether that is
//! acceptable.

use serde::{Deserialize, Serialize};

use crate::error::RangeError;

/// Separator between tokens.
const TOKEN_SEPARATOR: char = ',';

/// Separator between the two ends of a range token.
const RANGE_SEPARATOR: char = '-';

/// Ordered, validated list of 1-based page numbers taken from one document.
///
/// Duplicates and arbitrary order are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageSelection(Vec<usize>);

impl PageSelection {
    /// Every page of a document, ascending.
    pub fn all(page_count: usize) -> Self {
        Self((1..=page_count).collect())
    }

    /// The selected page numbers in output order.
    pub fn pages(&self) -> &[usize] {
        &self.0
    }

    /// Number of pages selected (repeats counted).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no page is selected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the selected page numbers.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    /// Consume the selection, returning the page numbers.
    pub fn into_vec(self) -> Vec<usize> {
        self.0
    }
}

impl From<Vec<usize>> for PageSelection {
    fn from(pages: Vec<usize>) -> Self {
        Self(pages)
    }
}

/// Result of parsing a range expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeOutcome {
    /// The expression was blank: use every page of the document.
    WholeDocument,
    /// The expression selected these pages.
    Pages(PageSelection),
}

impl RangeOutcome {
    /// Resolve to a concrete selection, expanding the whole-document signal.
    pub fn into_selection(self, page_count: usize) -> PageSelection {
        match self {
            Self::WholeDocument => PageSelection::all(page_count),
            Self::Pages(selection) => selection,
        }
    }
}

/// One syntactically valid token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Page(usize),
    Span { start: usize, end: usize },
}

impl Token {
    /// Append the pages of this token to `pages`, checking bounds.
    fn expand_into(
        self,
        raw: &str,
        page_count: usize,
        pages: &mut Vec<usize>,
    ) -> Result<(), RangeError> {
        let (start, end) = match self {
            Self::Page(page) => (page, page),
            Self::Span { start, end } => (start, end),
        };

        if start == 0 || end > page_count {
            return Err(RangeError::OutOfBounds {
                token: raw.to_string(),
                page_count,
            });
        }

        pages.extend(start..=end);
        Ok(())
    }
}

/// Parse a range expression against a document with `page_count` pages.
///
/// # Errors
///
/// Returns the error for the first invalid token:
/// - [`RangeError::MalformedToken`] if a token is not `n` or `a-b`
/// - [`RangeError::DescendingRange`] if a range has its start after its end
/// - [`RangeError::OutOfBounds`] if a page falls outside `1..=page_count`
///
/// # Examples
///
/// ```
/// use pdfbinder::range::{self, RangeOutcome};
/// use pdfbinder::error::RangeError;
///
/// assert_eq!(range::parse("  ", 4).unwrap(), RangeOutcome::WholeDocument);
/// assert!(matches!(
///     range::parse("11", 10),
///     Err(RangeError::OutOfBounds { page_count: 10, .. })
/// ));
/// ```
pub fn parse(expression: &str, page_count: usize) -> Result<RangeOutcome, RangeError> {
    let mut pages = Vec::new();
    let mut saw_token = false;

    for raw in tokens(expression) {
        saw_token = true;
        parse_token(raw)?.expand_into(raw, page_count, &mut pages)?;
    }

    if !saw_token {
        return Ok(RangeOutcome::WholeDocument);
    }

    Ok(RangeOutcome::Pages(PageSelection(pages)))
}

/// Check an expression's syntax without knowing the page count.
///
/// Returns every malformed or descending token, in order. Bounds are not
/// checked. An empty result means [`parse`] can only fail with
/// [`RangeError::OutOfBounds`].
pub fn validate(expression: &str) -> Vec<RangeError> {
    tokens(expression)
        .filter_map(|raw| parse_token(raw).err())
        .collect()
}

/// Split an expression into trimmed, non-empty tokens.
fn tokens(expression: &str) -> impl Iterator<Item = &str> {
    expression
        .split(TOKEN_SEPARATOR)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Parse one trimmed token.
fn parse_token(raw: &str) -> Result<Token, RangeError> {
    let malformed = || RangeError::MalformedToken {
        token: raw.to_string(),
    };

    let Some((start, end)) = raw.split_once(RANGE_SEPARATOR) else {
        let page = parse_number(raw).ok_or_else(malformed)?;
        return Ok(Token::Page(page));
    };

    let start = parse_number(start.trim()).ok_or_else(malformed)?;
    let end = parse_number(end.trim()).ok_or_else(malformed)?;

    if start > end {
        return Err(RangeError::DescendingRange {
            token: raw.to_string(),
            start,
            end,
        });
    }

    Ok(Token::Span { start, end })
}

/// Parse an unsigned decimal literal made of ASCII digits only.
///
/// Literals too large for `usize` saturate so they are reported as out of
/// bounds rather than malformed.
fn parse_number(literal: &str) -> Option<usize> {
    if literal.is_empty() || !literal.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some(literal.parse().unwrap_or(usize::MAX))
}
