use std::collections::HashMap;

use axum::extract::multipart::{Multipart, MultipartError};
use bytes::Bytes;
use tracing::debug;

use super::dto::{Attachment, RegistrationForm};
use super::schema::FormSchema;
use crate::error::AppError;

/// Raw multipart parts keyed by name. Parts carrying a filename are files,
/// everything else is text. A repeated name keeps the last part.
#[derive(Debug, Default)]
pub struct FormCollector {
    text: HashMap<String, String>,
    files: HashMap<String, Bytes>,
}

impl FormCollector {
    pub fn insert_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.text.insert(name.into(), value.into());
    }

    pub fn insert_file(&mut self, name: impl Into<String>, body: Bytes) {
        self.files.insert(name.into(), body);
    }

    /// Checks presence only: no trimming, no format checks on any value.
    pub fn validate(mut self, schema: &'static FormSchema) -> Result<RegistrationForm, AppError> {
        let missing = || AppError::MissingFieldOrFile(schema.missing_message);

        let mut identity = Vec::with_capacity(schema.identity_fields.len());
        for field in schema.identity_fields {
            let value = self
                .text
                .remove(field)
                .filter(|v| !v.is_empty())
                .ok_or_else(missing)?;
            identity.push(value);
        }

        let mut attachments = Vec::with_capacity(schema.files.len());
        for slot in schema.files {
            let body = self
                .files
                .remove(slot.field)
                .filter(|b| !b.is_empty())
                .ok_or_else(missing)?;
            attachments.push(Attachment { slot, body });
        }

        let [name, university, email, cnic, contact]: [String; 5] = identity
            .try_into()
            .map_err(|_| missing())?;
        Ok(RegistrationForm {
            name,
            university,
            email,
            cnic,
            contact,
            attachments,
        })
    }
}

/// Keeps the parser's status and the whole cause chain, e.g.
/// "Error parsing `multipart/form-data` request: failed to read stream: ...".
fn malformed(e: MultipartError) -> AppError {
    let status = e.status();
    AppError::MalformedForm {
        status,
        message: format!("{:#}", anyhow::Error::new(e)),
    }
}

/// Drains the multipart stream.
pub async fn collect(mp: &mut Multipart) -> Result<FormCollector, AppError> {
    let mut form = FormCollector::default();
    while let Some(field) = mp.next_field().await.map_err(malformed)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if field.file_name().is_some() {
            let body = field.bytes().await.map_err(malformed)?;
            debug!(field = %name, bytes = body.len(), "file part");
            form.insert_file(name, body);
        } else {
            let value = field.text().await.map_err(malformed)?;
            form.insert_text(name, value);
        }
    }
    Ok(form)
}
