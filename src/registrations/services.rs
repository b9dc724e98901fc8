use anyhow::Context;
use serde_json::{Map, Value};
use tracing::debug;

use super::dto::{RegistrationForm, RegistrationReceipt};
use crate::clock;
use crate::error::AppError;
use crate::state::AppState;
use crate::storage::attachments::attachment_file_name;
use crate::storage::LogSnapshot;

/// Saves the images, appends the log row and rebuilds the spreadsheet from
/// the whole log. Nothing is rolled back if a later step fails.
pub async fn persist_registration(
    st: &AppState,
    form: RegistrationForm,
) -> Result<RegistrationReceipt, AppError> {
    let token = clock::file_token(clock::now())?;

    let mut row = form.identity_values();
    let mut stored_paths = Vec::with_capacity(form.attachments.len());
    for att in form.attachments {
        let file_name = attachment_file_name(&form.name, att.slot.role, &token);
        let path = st
            .attachments
            .put_object(&file_name, att.body)
            .await
            .with_context(|| format!("save {}", att.slot.field))?;
        stored_paths.push(path);
    }
    row.extend(stored_paths.iter().cloned());

    let timestamp = clock::display(clock::now())?;
    row.push(timestamp.clone());

    let log = st.log.clone();
    let exporter = st.exporter.clone();
    let total_rows = tokio::task::spawn_blocking(move || -> anyhow::Result<usize> {
        log.append_row(&row)?;
        let snapshot = log
            .read_all()?
            .context("tabular log missing after append")?;
        exporter.export(&snapshot)?;
        Ok(snapshot.rows.len())
    })
    .await
    .context("persistence task aborted")??;

    debug!(total_rows, "registration persisted");
    Ok(RegistrationReceipt {
        stored_paths,
        timestamp,
        total_rows,
    })
}

/// Every row of the log as a header-keyed object, in registration order.
pub async fn list_registrations(st: &AppState) -> Result<Vec<Map<String, Value>>, AppError> {
    let log = st.log.clone();
    let snapshot = tokio::task::spawn_blocking(move || log.read_all())
        .await
        .context("read task aborted")??
        .ok_or(AppError::NotFound)?;
    Ok(to_records(snapshot))
}

/// Empty cells become `null`.
pub fn to_records(snapshot: LogSnapshot) -> Vec<Map<String, Value>> {
    let LogSnapshot { header, rows } = snapshot;
    rows.into_iter()
        .map(|row| {
            header
                .iter()
                .cloned()
                .zip(row.into_iter().map(|cell| {
                    if cell.is_empty() {
                        Value::Null
                    } else {
                        Value::String(cell)
                    }
                }))
                .collect()
        })
        .collect()
}
