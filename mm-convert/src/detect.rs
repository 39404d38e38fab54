//! Format detection from file names and contents
//!
//! The extension is what routing runs on; the content sniff exists to warn
//! the user when a file's leading bytes clearly belong to something else.
//! The extension always wins on disagreement.

use std::fs::File;
use std::io::Read;
use std::path::Path;

/// How much of the file the sniffer reads.
const SNIFF_LEN: usize = 2048;

/// Extensions that name the same underlying format; disagreement between
/// members of one group is not worth a warning.
const ALIAS_GROUPS: &[&[&str]] = &[&["jpg", "jpeg"], &["tif", "tiff"], &["htm", "html"]];

/// What could be learned about one file's format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// Lowercased final extension of the file name, if any.
    pub extension: Option<String>,
    /// Format suggested by the leading bytes, if recognized.
    pub sniffed: Option<String>,
}

impl Detection {
    /// The format to act on: the extension when present, otherwise the
    /// sniffed kind.
    pub fn resolved(&self) -> Option<&str> {
        self.extension.as_deref().or(self.sniffed.as_deref())
    }

    /// True when extension and sniff both exist and point at genuinely
    /// different formats.
    pub fn disagrees(&self) -> bool {
        match (&self.extension, &self.sniffed) {
            (Some(extension), Some(sniffed)) => !same_family(extension, sniffed),
            _ => false,
        }
    }
}

/// Inspect a path. `check_contents` is off for output paths, which usually
/// do not exist yet.
pub fn detect(path: &Path, check_contents: bool) -> Detection {
    Detection {
        extension: extension_of(path),
        sniffed: if check_contents { sniff(path) } else { None },
    }
}

/// Lowercased final extension of the path's file name.
pub fn extension_of(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let (_, extension) = name.rsplit_once('.')?;
    if extension.is_empty() {
        return None;
    }
    Some(extension.to_ascii_lowercase())
}

/// Identify a file by its leading bytes. Unreadable files sniff as nothing.
pub fn sniff(path: &Path) -> Option<String> {
    let mut file = File::open(path).ok()?;
    let mut header = [0u8; SNIFF_LEN];
    let mut filled = 0;
    while filled < header.len() {
        match file.read(&mut header[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(_) => return None,
        }
    }
    sniff_bytes(&header[..filled])
}

/// Identify a format from leading bytes. The image crate covers the raster
/// formats; the rest is a short magic-number table.
pub fn sniff_bytes(header: &[u8]) -> Option<String> {
    if let Ok(format) = image::guess_format(header) {
        return format.extensions_str().first().map(|ext| ext.to_string());
    }

    if header.starts_with(b"%PDF") {
        return Some("pdf".to_string());
    }
    if header.starts_with(b"PK\x03\x04") {
        if contains_seq(header, b"mimetypeapplication/epub+zip") {
            return Some("epub".to_string());
        }
        return Some("zip".to_string());
    }
    if header.starts_with(b"OggS") {
        return Some("ogg".to_string());
    }
    if header.starts_with(b"RIFF") && header.len() >= 12 {
        if &header[8..12] == b"WAVE" {
            return Some("wav".to_string());
        }
        if &header[8..11] == b"AVI" {
            return Some("avi".to_string());
        }
    }
    if header.len() >= 12 && &header[4..8] == b"ftyp" {
        return Some(match &header[8..12] {
            b"M4A " => "m4a".to_string(),
            b"qt  " => "mov".to_string(),
            _ => "mp4".to_string(),
        });
    }
    if header.starts_with(b"\x1a\x45\xdf\xa3") {
        return Some("mkv".to_string());
    }
    if header.starts_with(b"ID3")
        || (header.len() >= 2 && header[0] == 0xff && matches!(header[1], 0xfb | 0xf3 | 0xf2))
    {
        return Some("mp3".to_string());
    }
    if header.starts_with(b"%!") {
        return Some("ps".to_string());
    }
    if header.starts_with(b"{\\rtf") {
        return Some("rtf".to_string());
    }
    if header.starts_with(b"\x1f\x8b") {
        return Some("gz".to_string());
    }

    None
}

fn same_family(a: &str, b: &str) -> bool {
    a == b
        || ALIAS_GROUPS
            .iter()
            .any(|group| group.contains(&a) && group.contains(&b))
}

fn contains_seq(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}
