//! Bulk question upload: turns spreadsheet rows into question records,
//! validates them against the question catalog, and submits them in one
//! batch.

pub mod api;
pub mod catalog;
pub mod convert;
pub mod data;
pub mod error;
pub mod helpers;
pub mod raw_row;
pub mod resolver;
pub mod sheet;
pub mod template;
pub mod test_config;

pub use api::{ensure_catalog, QuestionApi, UploadSummary};
pub use catalog::{Catalog, CategoryDescriptor, QuestionTypeDescriptor};
pub use convert::{convert_row, convert_rows, ConversionIssue, ConversionReport, Severity};
pub use data::{QuestionOption, QuestionRecord};
pub use error::{CatalogError, SheetError, TemplateError, UploadError};
pub use raw_row::{Cell, RawRow};
pub use sheet::read_rows;
pub use test_config::TestConfig;
