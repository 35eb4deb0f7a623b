// SPDX-FileCopyrightText: 2026 Sudsbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message catalog for the Sudsbot reservation service.
//!
//! Maps template keys to human-readable reply text per store, falling back
//! to built-in defaults, with `{placeholder}` substitution.

pub mod catalog;
pub mod defaults;

pub use catalog::{MessageCatalog, render};
pub use defaults::default_text;
