use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::config::AppConfig;
use crate::registrations::schema::FormSchema;
use crate::storage::{
    AttachmentStore, LocalAttachmentStore, SpreadsheetExporter, TabularLog, XlsxExporter,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub schema: &'static FormSchema,
    pub log: Arc<TabularLog>,
    pub attachments: Arc<dyn AttachmentStore>,
    pub exporter: Arc<dyn SpreadsheetExporter>,
}

impl AppState {
    /// Creates the content root and uploads directory, initialises the log
    /// header and generates the spreadsheet when it is missing.
    pub fn init(config: AppConfig) -> anyhow::Result<Self> {
        let storage = &config.storage;
        std::fs::create_dir_all(storage.uploads_dir()).with_context(|| {
            format!("create uploads directory {}", storage.uploads_dir().display())
        })?;

        let schema = FormSchema::for_variant(config.variant);
        let log = Arc::new(TabularLog::open_or_init(storage.log_path(), &schema.log_header())?);
        let exporter = Arc::new(XlsxExporter::new(storage.export_path())) as Arc<dyn SpreadsheetExporter>;

        if !storage.export_path().exists() {
            let snapshot = log
                .read_all()?
                .context("tabular log vanished during startup")?;
            exporter.export(&snapshot)?;
        }

        let attachments =
            Arc::new(LocalAttachmentStore::new(storage.uploads_dir())) as Arc<dyn AttachmentStore>;

        info!(
            content_root = %storage.content_root.display(),
            variant = ?config.variant,
            "storage ready"
        );

        Ok(Self {
            config: Arc::new(config),
            schema,
            log,
            attachments,
            exporter,
        })
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        log: Arc<TabularLog>,
        attachments: Arc<dyn AttachmentStore>,
        exporter: Arc<dyn SpreadsheetExporter>,
    ) -> Self {
        Self {
            schema: FormSchema::for_variant(config.variant),
            config,
            log,
            attachments,
            exporter,
        }
    }
}
