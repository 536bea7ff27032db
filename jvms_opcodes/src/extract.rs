// Copyright 2026 the JVMS Opcodes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Section extraction from the parsed JVMS chapter 6 page.
//!
//! Every instruction is documented in a `.section-execution` element whose
//! sub-sections are titled (`Operation`, `Format`, `Forms`, `Operand Stack`,
//! ...). The selectors below are tied to the markup of the JVMS chapter 6
//! page; a different page revision may need different selectors.

use core::fmt;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::record::Section;

/// Section container.
pub const SECTION: &str = ".section-execution";
/// Operation summary paragraph, required exactly once per section.
pub const OPERATION: &str = ".section[title='Operation'] p.norm";
/// Byte layout blocks.
pub const FORMATS: &str = ".section .literallayout";
/// Stack diagram paragraphs.
pub const OPERAND_STACK: &str = ".section[title='Operand Stack'] p.norm";
/// Description paragraphs.
pub const DESCRIPTION: &str = ".norm-dynamic";
/// Form paragraphs (`name = decimal (0xhex)`).
pub const FORMS: &str = ".section[title='Forms'] p.norm";
/// Title anchor carrying the section's link name.
pub const ANCHOR: &str = ".titlepage h3.title a";

/// An extraction error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExtractError {
    /// A fixed selector failed to parse.
    BadSelector {
        /// The selector text.
        selector: &'static str,
        /// Parser message.
        message: String,
    },
    /// A field required a fixed number of matches but found a different count.
    UnexpectedCount {
        /// The selector text.
        selector: &'static str,
        /// Index of the section in document order.
        index: usize,
        /// Required number of matches.
        expected: usize,
        /// Actual number of matches.
        found: usize,
    },
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadSelector { selector, message } => {
                write!(f, "invalid selector {selector}: {message}")
            }
            Self::UnexpectedCount {
                selector,
                index,
                expected,
                found,
            } => write!(
                f,
                "expected {expected} but found {found} elements: {selector} (at {index})"
            ),
        }
    }
}

impl core::error::Error for ExtractError {}

#[derive(Debug)]
struct Query {
    text: &'static str,
    selector: Selector,
}

impl Query {
    fn parse(text: &'static str) -> Result<Self, ExtractError> {
        let selector = Selector::parse(text).map_err(|e| ExtractError::BadSelector {
            selector: text,
            message: e.to_string(),
        })?;
        Ok(Self { text, selector })
    }
}

/// The fixed selector set, parsed once per run.
#[derive(Debug)]
pub struct Selectors {
    section: Query,
    operation: Query,
    formats: Query,
    operand_stack: Query,
    description: Query,
    forms: Query,
    anchor: Query,
}

impl Selectors {
    /// Parses the fixed selectors.
    pub fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            section: Query::parse(SECTION)?,
            operation: Query::parse(OPERATION)?,
            formats: Query::parse(FORMATS)?,
            operand_stack: Query::parse(OPERAND_STACK)?,
            description: Query::parse(DESCRIPTION)?,
            forms: Query::parse(FORMS)?,
            anchor: Query::parse(ANCHOR)?,
        })
    }
}

/// Trimmed `textContent` of every descendant of `root` matching `query`.
///
/// With `expected = Some(n)` anything other than exactly `n` matches is an
/// error.
fn texts(
    root: ElementRef<'_>,
    index: usize,
    query: &Query,
    expected: Option<usize>,
) -> Result<Vec<String>, ExtractError> {
    let res: Vec<String> = root
        .select(&query.selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .collect();
    match expected {
        Some(expected) if res.len() != expected => Err(ExtractError::UnexpectedCount {
            selector: query.text,
            index,
            expected,
            found: res.len(),
        }),
        _ => Ok(res),
    }
}

/// Collapses every whitespace run to a single space and trims the ends.
#[must_use]
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns `true` for a line written in stack-diagram notation rather than prose.
///
/// The operand stack paragraphs mix sentences with the literal diagrams; only
/// the diagrams are kept.
#[must_use]
pub fn is_stack_notation(line: &str) -> bool {
    !line.is_empty()
        && (line.starts_with("...")
            || line.starts_with('[')
            || line.starts_with("Form ")
            // wide
            || line.starts_with("Same as ")
            // goto, goto_w, iinc, nop, ret, breakpoint
            || line == "No change"
            // athrow
            || !line.contains(' '))
}

/// Splits operand stack paragraphs into diagram lines.
///
/// Paragraphs are joined by newlines, then split on newlines and on the `→`
/// arrow separating the before and after states.
#[must_use]
pub fn split_operand_stack(paragraphs: &[String]) -> Vec<String> {
    paragraphs
        .join("\n")
        .split(['→', '\n'])
        .map(str::trim)
        .filter(|s| is_stack_notation(s))
        .map(str::to_string)
        .collect()
}

/// Extracts one section.
pub fn extract_section(
    root: ElementRef<'_>,
    index: usize,
    selectors: &Selectors,
) -> Result<Section, ExtractError> {
    let operation = texts(root, index, &selectors.operation, Some(1))?;
    let operation = collapse_whitespace(&operation[0]);

    let formats: Vec<Vec<String>> = texts(root, index, &selectors.formats, None)?
        .iter()
        .map(|layout| layout.split('\n').map(|t| t.trim().to_string()).collect())
        .collect();

    let operand_stack =
        split_operand_stack(&texts(root, index, &selectors.operand_stack, None)?);

    let description =
        collapse_whitespace(&texts(root, index, &selectors.description, None)?.join(" "));

    let forms: Vec<String> = texts(root, index, &selectors.forms, None)?
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();

    let hash_link = root
        .select(&selectors.anchor.selector)
        .next()
        .and_then(|a| a.value().attr("name"))
        .map(str::to_string);
    if hash_link.is_none() {
        warn!(index, operation = %operation, "section has no title anchor");
    }

    debug!(index, forms = forms.len(), operation = %operation, "extracted section");

    Ok(Section {
        index,
        operation,
        formats,
        forms,
        operand_stack,
        description,
        hash_link,
    })
}

/// Extracts every `.section-execution` element of `document`, in document order.
///
/// Fails on the first section whose operation paragraph is missing or repeated.
pub fn extract_sections(document: &Html) -> Result<Vec<Section>, ExtractError> {
    let selectors = Selectors::new()?;
    document
        .select(&selectors.section.selector)
        .enumerate()
        .map(|(index, el)| extract_section(el, index, &selectors))
        .collect()
}
