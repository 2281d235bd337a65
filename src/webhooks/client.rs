use std::time::Duration;

const MAX_RESPONSE_BODY: usize = 1024;

/// Outcome of one POST. Transport failures carry `error` and no status code.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub success: bool,
    pub status_code: Option<u16>,
    pub body: Option<String>,
    pub error: Option<String>,
}

pub struct WebhookClient {
    client: reqwest::Client,
}

impl WebhookClient {
    pub fn new(timeout: Duration) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("bizflow-webhooks/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| format!("Failed to build webhook client: {e}"))?;
        Ok(Self { client })
    }

    pub async fn deliver(&self, url: &str, event: &str, payload: &serde_json::Value) -> Delivery {
        let resp = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .header("X-Webhook-Event", event)
            .json(payload)
            .send()
            .await;

        let resp = match resp {
            Ok(resp) => resp,
            Err(e) => {
                return Delivery {
                    success: false,
                    status_code: None,
                    body: None,
                    error: Some(format!("Webhook request failed: {e}")),
                };
            }
        };

        let status = resp.status();
        let body = resp
            .text()
            .await
            .unwrap_or_default()
            .chars()
            .take(MAX_RESPONSE_BODY)
            .collect::<String>();

        Delivery {
            success: status.is_success(),
            status_code: Some(status.as_u16()),
            body: Some(body),
            error: (!status.is_success()).then(|| format!("Webhook responded with {status}")),
        }
    }
}
