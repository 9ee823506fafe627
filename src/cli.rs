use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// Message subject.
    pub subject: String,

    /// Email address to send the message from.
    pub sender: String,

    /// Addressee(s) of the message.
    #[clap(required = true)]
    pub recipient: Vec<String>,

    /// Message body to send.
    #[clap(short, long, conflicts_with = "message_file")]
    pub message: Option<String>,

    /// Read the message body from a file.
    #[clap(short = 'M', long)]
    pub message_file: Option<PathBuf>,

    /// Path to a file to attach.
    #[clap(short, long)]
    pub attach: Option<PathBuf>,

    /// Content id to use for an inline attachment.
    #[clap(short, long, default_value = "<image>")]
    pub content_id: String,

    /// Mark the attachment as inline rather than attached.
    #[clap(short, long)]
    pub inline: bool,

    /// Print the envelope instead of sending the email.
    #[clap(short, long)]
    pub dry_run: bool,

    /// Treat the message body as HTML.
    #[clap(long)]
    pub html: bool,
}
