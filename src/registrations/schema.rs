use crate::config::FormVariant;

/// Log columns for the five identity fields, same for every variant.
pub const IDENTITY_COLUMNS: [&str; 5] = ["Name", "University", "Email", "CNIC", "ContactNumber"];
pub const TIMESTAMP_COLUMN: &str = "Timestamp";

#[derive(Debug)]
pub struct FileSlot {
    /// Multipart part name.
    pub field: &'static str,
    /// Log column holding the stored path.
    pub column: &'static str,
    /// Infix in the saved file name; `None` for single-image forms.
    pub role: Option<&'static str>,
}

/// Field names a form variant submits, in log column order.
#[derive(Debug)]
pub struct FormSchema {
    pub identity_fields: [&'static str; 5],
    pub files: &'static [FileSlot],
    pub missing_message: &'static str,
}

static DUAL: FormSchema = FormSchema {
    identity_fields: ["Name", "University", "Email", "CNIC", "ContactNumber"],
    files: &[
        FileSlot {
            field: "CNIC_Front_Image",
            column: "CNIC_Front_Image",
            role: Some("front"),
        },
        FileSlot {
            field: "CNIC_Back_Image",
            column: "CNIC_Back_Image",
            role: Some("back"),
        },
    ],
    missing_message: "All fields and both images are required",
};

static SINGLE: FormSchema = FormSchema {
    identity_fields: ["name", "university", "email", "cnic", "contact"],
    files: &[FileSlot {
        field: "cnic_image",
        column: "CNIC_Image",
        role: None,
    }],
    missing_message: "All fields and the image are required",
};

impl FormSchema {
    pub fn for_variant(variant: FormVariant) -> &'static FormSchema {
        match variant {
            FormVariant::Dual => &DUAL,
            FormVariant::Single => &SINGLE,
        }
    }

    pub fn log_header(&self) -> Vec<&'static str> {
        IDENTITY_COLUMNS
            .iter()
            .copied()
            .chain(self.files.iter().map(|f| f.column))
            .chain(std::iter::once(TIMESTAMP_COLUMN))
            .collect()
    }
}
