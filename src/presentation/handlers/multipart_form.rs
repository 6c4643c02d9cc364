use std::collections::HashMap;

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;

/// A part that carried a filename in its content disposition. The filename
/// may be empty when the browser submitted the form without a selection.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// The whole multipart body, split into files and plain text fields.
/// Later parts with the same name replace earlier ones.
#[derive(Debug, Default)]
pub struct MultipartForm {
    files: HashMap<String, UploadedFile>,
    fields: HashMap<String, String>,
}

impl MultipartForm {
    pub async fn collect(mut multipart: Multipart) -> Result<Self, MultipartError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            match field.file_name().map(str::to_owned) {
                Some(filename) => {
                    let content_type = field.content_type().map(str::to_owned);
                    let bytes = field.bytes().await?.to_vec();
                    tracing::debug!(
                        field = %name,
                        filename = %filename,
                        bytes = bytes.len(),
                        "Received file part"
                    );
                    form.files.insert(
                        name,
                        UploadedFile {
                            filename,
                            content_type,
                            bytes,
                        },
                    );
                }
                None => {
                    let value = field.text().await?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }

    pub fn take_field(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }
}
