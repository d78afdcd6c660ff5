//! Rendering of analysis results.
//!
//! [`view`] turns controller state into a view model; [`generator`]
//! formats view models as text, Markdown, or JSON.

pub mod generator;
pub mod view;

pub use generator::{
    generate_json_report, generate_markdown_report, generate_text_entry, generate_text_report,
    ReportMetadata, ScanEntry, ScanReport,
};
