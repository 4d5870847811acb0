//! Core library for folio
//!
//! This crate implements the **Functional Core** of the folio applications,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The folio project uses a two-crate architecture to enforce separation of concerns:
//!
//! - **`folio_core`** (this crate): Pure transformation functions with zero I/O
//! - **`folio`**: HTTP servers, the catalog client and the CLI (the Imperative Shell)
//!
//! ## Functional Core Principles
//!
//! - **Pure functions**: Same input always produces the same output
//! - **No side effects**: No I/O operations, no clocks, no locks
//! - **Testable**: Can be tested with simple fixture data, no mocking required
//!
//! # Module Organization
//!
//! - [`pagination`]: Page counts, clamping, slicing and the navigation token strip
//! - [`books`]: Transformations for OpenLibrary search responses and search URLs
//! - [`blog`]: The in-memory post store behind the blog
//!
//! # Example Usage
//!
//! ```rust
//! use folio_core::pagination::{PageOutcome, PageView, ResultSet};
//!
//! let result = ResultSet { total_count: 100, items: vec!["a", "b"] };
//!
//! // Page 7 of 5 is corrected, not rejected
//! assert_eq!(PageView::build(result, 7, 24), PageOutcome::Redirect { page: 5 });
//! ```

pub mod blog;
pub mod books;
pub mod pagination;
