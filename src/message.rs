use std::fs;
use std::io;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::engine::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::attachment;
use crate::cli::Cli;

/// The wire shape the Gmail send endpoint expects: a base64url-encoded
/// RFC 2822 message under the `raw` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    pub raw: String,
}

fn message_body(args: &Cli) -> io::Result<String> {
    if let Some(text) = &args.message {
        Ok(text.clone())
    } else if let Some(path) = &args.message_file {
        fs::read_to_string(path)
    } else {
        Ok(String::new())
    }
}

fn text_content_type(html: bool) -> &'static str {
    if html {
        "text/html; charset=\"utf-8\""
    } else {
        "text/us-ascii"
    }
}

/// Build the transport envelope for one recipient. The message is assembled
/// fresh on every call; only the `To` header varies across recipients.
pub fn build(args: &Cli, recipient: &str) -> Result<RawMessage, Box<dyn std::error::Error>> {
    let body = message_body(args)?;

    let mut content = String::new();
    content.push_str(&format!("To: {}\r\n", recipient));
    content.push_str(&format!("From: {}\r\n", args.sender));
    content.push_str(&format!("Subject: {}\r\n", args.subject));
    content.push_str("MIME-Version: 1.0\r\n");

    if let Some(path) = &args.attach {
        let part = attachment::prepare(path, args.inline, &args.content_id)?;
        let boundary = Uuid::new_v4().to_string();
        content.push_str(&format!(
            "Content-Type: multipart/mixed; boundary=\"{}\"\r\n\r\n",
            boundary
        ));
        content.push_str(&format!("--{}\r\n", boundary));
        content.push_str(&format!("Content-Type: {}\r\n\r\n", text_content_type(args.html)));
        content.push_str(&body);
        content.push_str(&format!("\r\n--{}\r\n", boundary));
        content.push_str(&part.render());
        content.push_str(&format!("\r\n--{}--\r\n", boundary));
    } else {
        content.push_str(&format!("Content-Type: {}\r\n\r\n", text_content_type(args.html)));
        content.push_str(&body);
    }

    Ok(RawMessage {
        raw: URL_SAFE_NO_PAD.encode(content.as_bytes()),
    })
}
