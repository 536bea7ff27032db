// Copyright 2026 the JVMS Opcodes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `jvms_opcodes`: extracts JVM instruction records from the HTML rendering of
//! chapter 6 of the Java Virtual Machine Specification and renders them as
//! opcode table entries.
//!
//! The pipeline is a single pass:
//! - [`extract`] walks every `.section-execution` element and pulls the raw
//!   per-section fields.
//! - [`normalize`] explodes sections into one record per form, mixes in the
//!   opcodes that have no section of their own, and sorts by opcode.
//! - [`classify`] derives operand counts, stack effects, tags, and operand
//!   patchers from each record.
//! - [`render`] turns the classified records into table lines.
//!
//! ## Example
//!
//! ```
//! use jvms_opcodes::extract::extract_sections;
//! use jvms_opcodes::normalize::normalize;
//! use jvms_opcodes::render::{RenderOptions, render_table};
//!
//! let html = scraper::Html::parse_document(
//!     r#"<div class="section-execution">
//!          <div class="titlepage"><h3 class="title"><a name="jvms-6.5.nop"></a>nop</h3></div>
//!          <div class="section" title="Operation"><p class="norm">Do nothing</p></div>
//!          <div class="section" title="Format"><pre class="literallayout">nop</pre></div>
//!          <div class="section" title="Forms"><p class="norm">nop = 0 (0x0)</p></div>
//!          <div class="section" title="Operand Stack"><p class="norm">No change</p></div>
//!        </div>"#,
//! );
//! let sections = extract_sections(&html)?;
//! let records = normalize(&sections);
//! let table = render_table(&records, &RenderOptions::default());
//! assert!(table.starts_with("\t/*  0  0x0 */NOP             (0, 0, none(Type.class), null),"));
//! # Ok::<(), jvms_opcodes::extract::ExtractError>(())
//! ```

pub mod classify;
pub mod drift;
pub mod extract;
pub mod normalize;
pub mod record;
pub mod render;
