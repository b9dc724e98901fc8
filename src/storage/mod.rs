//! On-disk state under the content root: uploaded images, the CSV log and
//! its spreadsheet mirror.

pub mod attachments;
pub mod export;
pub mod log;

pub use attachments::{AttachmentStore, LocalAttachmentStore};
pub use export::{SpreadsheetExporter, XlsxExporter};
pub use log::{LogSnapshot, TabularLog};
