use crate::errors::DataError;

const MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_UPLOADS_PER_HOUR: usize = 10;
const ALLOWED_MIME_TYPES: &[&str] = &[
    "text/csv",
    "application/csv",
    "application/vnd.ms-excel",
    "text/plain",
];

/// Constraints applied to an upload before the import pipeline runs.
/// The host passes whatever metadata it has; absent metadata skips that
/// check (the pipeline still validates the content itself).
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_file_bytes: u64,
    pub max_uploads_per_hour: usize,
    pub allowed_mime_types: &'static [&'static str],
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_file_bytes: MAX_FILE_BYTES,
            max_uploads_per_hour: MAX_UPLOADS_PER_HOUR,
            allowed_mime_types: ALLOWED_MIME_TYPES,
        }
    }
}

impl UploadPolicy {
    pub fn check_upload(
        &self,
        file_name: Option<&str>,
        file_size: Option<u64>,
        mime_type: Option<&str>,
    ) -> Result<(), DataError> {
        if let Some(name) = file_name {
            let ext = name.rsplit('.').next().unwrap_or("");
            if !name.contains('.') || !ext.eq_ignore_ascii_case("csv") {
                return Err(DataError::InvalidFileType(
                    "Please upload a CSV file (.csv extension)".to_string(),
                ));
            }
        }
        if let Some(mime) = mime_type {
            if !self
                .allowed_mime_types
                .iter()
                .any(|allowed| mime.eq_ignore_ascii_case(allowed))
            {
                return Err(DataError::InvalidFileType(format!(
                    "Unsupported file type \"{mime}\""
                )));
            }
        }
        if let Some(size) = file_size {
            if size > self.max_file_bytes {
                return Err(DataError::FileTooLarge {
                    max_mb: self.max_file_bytes / (1024 * 1024),
                });
            }
        }
        Ok(())
    }
}
