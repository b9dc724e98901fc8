use bytes::Bytes;
use serde::Serialize;

use super::schema::FileSlot;

/// A submission that passed intake: every identity field non-empty and every
/// image the variant requires attached.
#[derive(Debug)]
pub struct RegistrationForm {
    pub name: String,
    pub university: String,
    pub email: String,
    pub cnic: String,
    pub contact: String,
    /// In the variant's column order.
    pub attachments: Vec<Attachment>,
}

#[derive(Debug)]
pub struct Attachment {
    pub slot: &'static FileSlot,
    pub body: Bytes,
}

impl RegistrationForm {
    pub fn identity_values(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.university.clone(),
            self.email.clone(),
            self.cnic.clone(),
            self.contact.clone(),
        ]
    }
}

/// What the persister wrote for one submission.
#[derive(Debug, Clone)]
pub struct RegistrationReceipt {
    pub stored_paths: Vec<String>,
    pub timestamp: String,
    pub total_rows: usize,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
