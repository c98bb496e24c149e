use crate::core::conversion::converted_file_name;
use crate::core::{ConvertedFile, Converter, UploadedFile};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Placeholder engine: waits, then hands the input bytes back under the new name.
#[derive(Debug, Clone)]
pub struct PassthroughConverter {
    delay: Duration,
}

impl PassthroughConverter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Converter for PassthroughConverter {
    async fn convert(&self, file: UploadedFile, output_format: &str) -> Result<ConvertedFile> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        Ok(ConvertedFile {
            file_name: converted_file_name(output_format),
            content_type: file
                .content_type
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string()),
            data: file.data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_passthrough_keeps_bytes_and_type() {
        let converter = PassthroughConverter::new(Duration::ZERO);
        let out = converter
            .convert(
                UploadedFile {
                    file_name: "a.png".to_string(),
                    content_type: Some("image/png".to_string()),
                    data: vec![1, 2, 3],
                },
                "WEBP",
            )
            .await
            .unwrap();
        assert_eq!(out.data, vec![1, 2, 3]);
        assert_eq!(out.content_type, "image/png");
        assert_eq!(out.file_name, "converted.webp");
    }

    #[tokio::test]
    async fn test_passthrough_waits_for_delay() {
        let converter = PassthroughConverter::new(Duration::from_millis(50));
        let started = std::time::Instant::now();
        let out = converter
            .convert(
                UploadedFile {
                    file_name: "a".to_string(),
                    content_type: None,
                    data: vec![],
                },
                "txt",
            )
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert_eq!(out.content_type, DEFAULT_CONTENT_TYPE);
    }
}
