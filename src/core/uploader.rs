use crate::core::conversion::converted_file_name;
use crate::core::entitlement::{max_file_bytes, size_limit_label};
use crate::core::{ConversionCategory, Storage};
use crate::utils::error::{ConvertError, Result};
use async_trait::async_trait;

pub const MISSING_SELECTION_MESSAGE: &str = "Please select a file and output format";
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred during conversion";

/// A local file picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl SelectedFile {
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Transport used by the form to reach the conversion endpoint.
#[async_trait]
pub trait ConvertClient: Send + Sync {
    async fn convert(
        &self,
        file: &SelectedFile,
        output_format: &str,
        conversion_type: ConversionCategory,
    ) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    Submitting,
    Succeeded { saved_as: String },
    Failed { message: String },
}

/// Client-side upload form: one file, one output format, one request in flight.
pub struct UploadForm<C: ConvertClient, S: Storage> {
    client: C,
    storage: S,
    conversion_type: ConversionCategory,
    is_premium: bool,
    file: Option<SelectedFile>,
    output_format: Option<String>,
    error: Option<String>,
    state: UploadState,
}

impl<C: ConvertClient, S: Storage> UploadForm<C, S> {
    pub fn new(client: C, storage: S, conversion_type: ConversionCategory, is_premium: bool) -> Self {
        Self {
            client,
            storage,
            conversion_type,
            is_premium,
            file: None,
            output_format: None,
            error: None,
            state: UploadState::Idle,
        }
    }

    pub fn max_file_bytes(&self) -> u64 {
        max_file_bytes(self.is_premium)
    }

    /// Stores the file unless it is over the tier's size limit.
    pub fn select_file(&mut self, file: SelectedFile) -> bool {
        self.error = None;

        if file.size() > self.max_file_bytes() {
            let upsell = if self.is_premium {
                ""
            } else {
                "Upgrade to Premium for larger files."
            };
            self.error = Some(
                format!(
                    "File size exceeds {} limit. {}",
                    size_limit_label(self.is_premium),
                    upsell
                )
                .trim_end()
                .to_string(),
            );
            tracing::warn!("Rejected {} ({} bytes)", file.name, file.size());
            return false;
        }

        self.file = Some(file);
        true
    }

    pub fn clear_file(&mut self) {
        self.file = None;
    }

    pub fn select_output_format(&mut self, format: impl Into<String>) {
        let format = format.into();
        self.output_format = (!format.is_empty()).then_some(format);
    }

    pub fn can_submit(&self) -> bool {
        self.file.is_some() && self.output_format.is_some() && !self.is_submitting()
    }

    pub fn is_submitting(&self) -> bool {
        self.state == UploadState::Submitting
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn output_format(&self) -> Option<&str> {
        self.output_format.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    /// Sends the selection and saves the result as `converted.<format>`.
    /// Taking `&mut self` rules out a second overlapping submission.
    pub async fn submit(&mut self) -> &UploadState {
        if self.is_submitting() {
            return &self.state;
        }

        let (file, format) = match (&self.file, &self.output_format) {
            (Some(file), Some(format)) => (file, format.clone()),
            _ => {
                self.error = Some(MISSING_SELECTION_MESSAGE.to_string());
                return &self.state;
            }
        };

        self.state = UploadState::Submitting;
        self.error = None;
        tracing::info!("Converting {} to {}", file.name, format);

        let outcome = match self.client.convert(file, &format, self.conversion_type).await {
            Ok(bytes) => {
                self.storage
                    .write_file(&converted_file_name(&format), &bytes)
                    .await
            }
            Err(e) => Err(e),
        };

        self.state = match outcome {
            Ok(saved_as) => {
                tracing::info!("Saved converted file to {}", saved_as);
                self.file = None;
                self.output_format = None;
                UploadState::Succeeded { saved_as }
            }
            Err(e) => {
                tracing::warn!("Conversion failed: {}", e);
                let message = failure_message(&e);
                self.error = Some(message.clone());
                UploadState::Failed { message }
            }
        };

        &self.state
    }
}

/// Server text when it sent one, the generic message otherwise.
pub fn failure_message(error: &ConvertError) -> String {
    match error {
        ConvertError::RemoteError {
            message: Some(message),
            ..
        } if !message.is_empty() => message.clone(),
        _ => GENERIC_FAILURE_MESSAGE.to_string(),
    }
}
