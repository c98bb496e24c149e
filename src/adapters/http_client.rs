use crate::core::entitlement::Entitlement;
use crate::core::history::HistoryView;
use crate::core::uploader::{ConvertClient, SelectedFile};
use crate::core::ConversionCategory;
use crate::utils::error::{ConvertError, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Talks to a running ConvertPro server on behalf of one token holder.
#[derive(Debug, Clone)]
pub struct HttpConvertClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpConvertClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ConvertError::InvalidConfigValueError {
            field: "server".to_string(),
            value: base_url.to_string(),
            reason: format!("Invalid URL format: {}", e),
        })?;

        Ok(Self {
            client: Client::new(),
            base_url,
            token,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ConvertError::ConfigError {
                message: format!("Cannot build URL for {}: {}", path, e),
            })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub async fn entitlement(&self) -> Result<Entitlement> {
        let request = self.client.get(self.endpoint("/api/entitlement")?);
        let response = check(self.authorize(request).send().await?).await?;
        Ok(response.json().await?)
    }

    pub async fn history(&self) -> Result<HistoryView> {
        let request = self.client.get(self.endpoint("/api/history")?);
        let response = check(self.authorize(request).send().await?).await?;
        Ok(response.json().await?)
    }

    pub async fn plans(&self) -> Result<serde_json::Value> {
        let response = check(self.client.get(self.endpoint("/api/plans")?).send().await?).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl ConvertClient for HttpConvertClient {
    async fn convert(
        &self,
        file: &SelectedFile,
        output_format: &str,
        conversion_type: ConversionCategory,
    ) -> Result<Vec<u8>> {
        let mut part = Part::bytes(file.data.clone()).file_name(file.name.clone());
        if let Some(content_type) = &file.content_type {
            part = part.mime_str(content_type)?;
        }

        let form = Form::new()
            .part("file", part)
            .text("outputFormat", output_format.to_string())
            .text("conversionType", conversion_type.as_str().to_string());

        let request = self.client.post(self.endpoint("/api/convert")?).multipart(form);
        tracing::debug!("POST /api/convert ({} bytes)", file.size());

        let response = check(self.authorize(request).send().await?).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// Turns a non-2xx response into `RemoteError`, keeping the server's `error` text if any.
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error);

    Err(ConvertError::RemoteError {
        status: status.as_u16(),
        message,
    })
}
