// Copyright 2026 the JVMS Opcodes Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conformance tests for `jvms_opcodes`.
//!
//! The tests live under `tests/` and drive the full extract, normalize, and
//! render pipeline over a saved excerpt of the JVMS chapter 6 page.
