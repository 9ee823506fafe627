use std::fs;
use std::io;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::engine::Engine;

/// Closed set of MIME part shapes an attachment can take, keyed by the
/// main content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Text,
    Image,
    Audio,
    Other,
}

impl AttachmentKind {
    fn from_content_type(content_type: &str) -> Self {
        match content_type.split('/').next() {
            Some("text") => AttachmentKind::Text,
            Some("image") => AttachmentKind::Image,
            Some("audio") => AttachmentKind::Audio,
            _ => AttachmentKind::Other,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AttachmentPart {
    pub kind: AttachmentKind,
    pub content_type: String,
    pub filename: String,
    pub inline: bool,
    pub content_id: Option<String>,
    pub data: Vec<u8>,
}

// Guess a content type from the file extension. A compression extension
// means the guess would be a transfer encoding rather than a content type,
// so those fall back to octet-stream along with anything unrecognized.
fn guess_content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("gz") | Some("bz2") | Some("xz") | Some("z") => "application/octet-stream",
        Some("txt") | Some("log") | Some("md") => "text/plain",
        Some("csv") => "text/csv",
        Some("html") | Some("htm") => "text/html",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("bmp") => "image/bmp",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/x-wav",
        Some("ogg") => "audio/ogg",
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        _ => "application/octet-stream",
    }
}

/// Read the file at `path` and build the MIME part for it. The content id
/// is only carried when the part is inlined.
pub fn prepare(path: &Path, inline: bool, content_id: &str) -> io::Result<AttachmentPart> {
    let content_type = guess_content_type(path);
    let data = fs::read(path)?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("attachment")
        .to_string();

    Ok(AttachmentPart {
        kind: AttachmentKind::from_content_type(content_type),
        content_type: content_type.to_string(),
        filename,
        inline,
        content_id: if inline {
            Some(content_id.to_string())
        } else {
            None
        },
        data,
    })
}

impl AttachmentPart {
    pub fn disposition(&self) -> &'static str {
        if self.inline {
            "inline"
        } else {
            "attachment"
        }
    }

    // Render the part as headers plus encoded body, without any multipart
    // boundary markers; the message builder owns those.
    pub fn render(&self) -> String {
        let mut part = String::new();
        part.push_str(&format!("Content-Type: {}\r\n", self.content_type));
        part.push_str(&format!(
            "Content-Disposition: {}; filename=\"{}\"\r\n",
            self.disposition(),
            self.filename
        ));
        if let Some(content_id) = &self.content_id {
            part.push_str(&format!("Content-ID: {}\r\n", content_id));
        }

        // Text parts with clean UTF-8 content go in verbatim; everything
        // else is base64-encoded.
        let text = if self.kind == AttachmentKind::Text {
            std::str::from_utf8(&self.data).ok()
        } else {
            None
        };
        match text {
            Some(text) => {
                part.push_str("\r\n");
                part.push_str(text);
            }
            None => {
                part.push_str("Content-Transfer-Encoding: base64\r\n\r\n");
                part.push_str(&base64_wrapped(&self.data));
            }
        }
        part
    }
}

// RFC 2045 asks for encoded lines no longer than 76 characters.
fn base64_wrapped(data: &[u8]) -> String {
    let encoded = STANDARD.encode(data);
    let mut wrapped = String::with_capacity(encoded.len() + 2 * (encoded.len() / 76 + 1));
    for chunk in encoded.as_bytes().chunks(76) {
        if !wrapped.is_empty() {
            wrapped.push_str("\r\n");
        }
        wrapped.push_str(std::str::from_utf8(chunk).unwrap_or(""));
    }
    wrapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn create_part(kind: AttachmentKind, content_type: &str, data: &[u8]) -> AttachmentPart {
        AttachmentPart {
            kind,
            content_type: content_type.to_string(),
            filename: "file.bin".to_string(),
            inline: false,
            content_id: None,
            data: data.to_vec(),
        }
    }

    #[test]
    fn test_guess_content_type_known_extensions() {
        assert_eq!(guess_content_type(Path::new("notes.txt")), "text/plain");
        assert_eq!(guess_content_type(Path::new("photo.JPG")), "image/jpeg");
        assert_eq!(guess_content_type(Path::new("song.mp3")), "audio/mpeg");
        assert_eq!(guess_content_type(Path::new("doc.pdf")), "application/pdf");
    }

    #[test]
    fn test_guess_content_type_unknown_extension() {
        assert_eq!(
            guess_content_type(Path::new("data.xyz")),
            "application/octet-stream"
        );
        assert_eq!(
            guess_content_type(Path::new("no_extension")),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_guess_content_type_compressed_file() {
        // A compressed text file has an encoding, so octet-stream wins.
        assert_eq!(
            guess_content_type(Path::new("notes.txt.gz")),
            "application/octet-stream"
        );
        assert_eq!(
            guess_content_type(Path::new("dump.xz")),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_kind_from_content_type() {
        assert_eq!(
            AttachmentKind::from_content_type("text/plain"),
            AttachmentKind::Text
        );
        assert_eq!(
            AttachmentKind::from_content_type("image/png"),
            AttachmentKind::Image
        );
        assert_eq!(
            AttachmentKind::from_content_type("audio/ogg"),
            AttachmentKind::Audio
        );
        assert_eq!(
            AttachmentKind::from_content_type("application/octet-stream"),
            AttachmentKind::Other
        );
    }

    #[test]
    fn test_render_text_part_verbatim() {
        let mut part = create_part(AttachmentKind::Text, "text/plain", b"hello world");
        part.filename = "notes.txt".to_string();
        let rendered = part.render();
        assert!(rendered.starts_with("Content-Type: text/plain\r\n"));
        assert!(rendered.contains("Content-Disposition: attachment; filename=\"notes.txt\"\r\n"));
        assert!(rendered.ends_with("\r\nhello world"));
        assert!(!rendered.contains("Content-Transfer-Encoding"));
    }

    #[test]
    fn test_render_binary_part_base64() {
        let part = create_part(AttachmentKind::Other, "application/octet-stream", &[0u8, 159, 146, 150]);
        let rendered = part.render();
        assert!(rendered.contains("Content-Transfer-Encoding: base64\r\n\r\n"));
        let body = rendered
            .split("\r\n\r\n")
            .nth(1)
            .expect("part has a body");
        assert_eq!(STANDARD.decode(body).unwrap(), vec![0u8, 159, 146, 150]);
    }

    #[test]
    fn test_render_non_utf8_text_falls_back_to_base64() {
        let part = create_part(AttachmentKind::Text, "text/plain", &[0xff, 0xfe, 0x00]);
        let rendered = part.render();
        assert!(rendered.contains("Content-Transfer-Encoding: base64"));
    }

    #[test]
    fn test_render_inline_part_carries_content_id() {
        let mut part = create_part(AttachmentKind::Image, "image/png", b"fakepng");
        part.inline = true;
        part.content_id = Some("<image>".to_string());
        let rendered = part.render();
        assert!(rendered.contains("Content-Disposition: inline; filename=\"file.bin\"\r\n"));
        assert!(rendered.contains("Content-ID: <image>\r\n"));
    }

    #[test]
    fn test_base64_body_wraps_at_76_columns() {
        let part = create_part(AttachmentKind::Other, "application/octet-stream", &[0xabu8; 600]);
        let rendered = part.render();
        let body = rendered.split("\r\n\r\n").nth(1).unwrap();
        assert!(body.lines().all(|line| line.len() <= 76));
        let joined: String = body.lines().collect();
        assert_eq!(STANDARD.decode(joined).unwrap(), vec![0xabu8; 600]);
    }

    #[test]
    fn test_prepare_missing_file_is_an_error() {
        let path = PathBuf::from("/definitely/not/here.png");
        assert!(prepare(&path, false, "<image>").is_err());
    }
}
