//! Integration test suite for jrender
//!
//! End-to-end tests of the render pipeline through the public API, plus the
//! command-line interface driven with `assert_cmd`.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: `jrender render` and `jrender layouts` against sites on disk
//! - **converters**: converter selection, ordering and failure
//! - **hooks**: lifecycle hooks mutating payload and content
//! - **layouts**: layout chains, cycles, missing layouts and layout data
//! - **render_pipeline**: payload construction, templating and full renders

mod cli;
mod converters;
mod hooks;
mod layouts;
mod render_pipeline;
