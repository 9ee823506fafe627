pub mod attachment;
pub mod cli;
pub mod gmail_api;
pub mod message;

use crate::cli::Cli;
use crate::gmail_api::{GmailSender, InstalledFlowTokenProvider, MailSender, TokenProvider};
use crate::message::RawMessage;

/// Outcome of one send attempt: the Gmail message id on success.
pub struct Delivery {
    pub recipient: String,
    pub outcome: Result<String, Box<dyn std::error::Error + Send + Sync>>,
}

// Build one envelope per recipient, in the order they were supplied.
fn render_envelopes(args: &Cli) -> Result<Vec<RawMessage>, Box<dyn std::error::Error>> {
    args.recipient
        .iter()
        .map(|recipient| message::build(args, recipient))
        .collect()
}

/// Send to every recipient sequentially, rebuilding the message each time.
/// A failed send is recorded and does not stop the remaining recipients from
/// being attempted.
pub async fn deliver_all<S: MailSender>(
    args: &Cli,
    sender: &S,
) -> Result<Vec<Delivery>, Box<dyn std::error::Error>> {
    let mut deliveries = Vec::with_capacity(args.recipient.len());
    for recipient in &args.recipient {
        let envelope = message::build(args, recipient)?;
        let outcome = sender.send("me", &envelope).await;
        deliveries.push(Delivery {
            recipient: recipient.clone(),
            outcome,
        });
    }
    Ok(deliveries)
}

pub async fn run(args: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let provider = InstalledFlowTokenProvider::default();
    run_with(&args, &provider, |token| {
        GmailSender::new(reqwest::Client::new(), token)
    })
    .await
}

/// Driver generic over the credential provider and sender construction so
/// callers can substitute doubles for both.
pub async fn run_with<P, S, F>(
    args: &Cli,
    provider: &P,
    make_sender: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    P: TokenProvider,
    S: MailSender,
    F: FnOnce(String) -> S,
{
    if args.dry_run {
        // Preview path: no authorization, no network, no credential writes.
        for envelope in render_envelopes(args)? {
            println!("{}", serde_json::to_string(&envelope)?);
        }
        return Ok(());
    }

    let token = provider
        .access_token()
        .await
        .map_err(|e| e as Box<dyn std::error::Error>)?;
    let sender = make_sender(token);

    let deliveries = deliver_all(args, &sender).await?;
    let mut failures = 0;
    for delivery in &deliveries {
        match &delivery.outcome {
            Ok(id) => println!("Message Id: {}", id),
            Err(e) => {
                eprintln!("Failed to send to {}: {}", delivery.recipient, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(format!(
            "{} of {} messages failed to send",
            failures,
            deliveries.len()
        )
        .into());
    }
    Ok(())
}
