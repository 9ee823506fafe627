use async_trait::async_trait;
use serde::Deserialize;

use crate::message::RawMessage;

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: Option<String>,
}

// Transmission behind a trait so the delivery loop can be exercised without
// the network.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailSender: Send + Sync {
    /// Send one envelope on behalf of `user_id` ("me" for the authenticated
    /// mailbox) and return the id Gmail assigned to the sent message.
    async fn send(
        &self,
        user_id: &str,
        envelope: &RawMessage,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

pub struct GmailSender {
    client: reqwest::Client,
    token: String,
}

impl GmailSender {
    pub fn new(client: reqwest::Client, token: String) -> Self {
        Self { client, token }
    }
}

#[async_trait]
impl MailSender for GmailSender {
    async fn send(
        &self,
        user_id: &str,
        envelope: &RawMessage,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let send_url = format!(
            "https://gmail.googleapis.com/gmail/v1/users/{}/messages/send",
            user_id
        );

        let response = self
            .client
            .post(&send_url)
            .bearer_auth(&self.token)
            .json(envelope)
            .send()
            .await?;

        if response.status().is_success() {
            let sent: SendResponse = response.json().await?;
            match sent.id {
                Some(id) => Ok(id),
                None => Err("Send response carried no message id.".into()),
            }
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(format!("Failed to send email: {}", error_text).into())
        }
    }
}
