use crate::domain::ports::QrService;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::error;

/// Talks to the external QR renderer. The renderer is deterministic per
/// booking id, so re-rendering after a retry is harmless.
pub struct HttpQrService {
    client: Client,
    api_url: String,
    api_key: String,
}

impl HttpQrService {
    pub fn new(api_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_url,
            api_key,
        }
    }
}

#[derive(Serialize)]
struct RenderRequest {
    reference: String,
}

#[derive(Deserialize)]
struct RenderResponse {
    image_url: String,
}

#[async_trait]
impl QrService for HttpQrService {
    async fn generate(&self, booking_id: &str) -> Result<String, AppError> {
        let payload = RenderRequest {
            reference: booking_id.to_string(),
        };

        let res = self.client.post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                let msg = format!("QR service connection error: {}", e);
                error!("{}", msg);
                AppError::InternalWithMsg(msg)
            })?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            let msg = format!("QR service failed. Status: {}, Body: {}", status, text);
            error!("{}", msg);
            return Err(AppError::InternalWithMsg(msg));
        }

        let body: RenderResponse = res.json().await.map_err(|e| {
            let msg = format!("QR service returned malformed body: {}", e);
            error!("{}", msg);
            AppError::InternalWithMsg(msg)
        })?;

        Ok(body.image_url)
    }
}
