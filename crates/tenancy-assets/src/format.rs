//! Accepted logo formats.

use serde::{Deserialize, Serialize};

/// Image formats accepted as an organization logo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoFormat {
    /// PNG
    Png,
    /// JPEG
    Jpeg,
    /// GIF
    Gif,
    /// WebP
    Webp,
    /// ICO
    Icon,
}

impl LogoFormat {
    /// Resolve a declared content type against the allow-list.
    ///
    /// Parameters (`; charset=...`) and case are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use tenancy_assets::LogoFormat;
    ///
    /// assert_eq!(LogoFormat::from_content_type("IMAGE/PNG"), Some(LogoFormat::Png));
    /// assert_eq!(LogoFormat::from_content_type("image/jpg; q=1"), Some(LogoFormat::Jpeg));
    /// assert_eq!(LogoFormat::from_content_type("image/svg+xml"), None);
    /// ```
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(Self::Jpeg),
            "image/gif" => Some(Self::Gif),
            "image/webp" => Some(Self::Webp),
            "image/x-icon" | "image/vnd.microsoft.icon" => Some(Self::Icon),
            _ => None,
        }
    }

    /// Canonical content type stored alongside the object.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
            Self::Icon => "image/x-icon",
        }
    }

    /// File extension used in generated object keys.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
            Self::Icon => "ico",
        }
    }

    /// Check the payload's leading magic bytes.
    pub fn matches_signature(&self, bytes: &[u8]) -> bool {
        match self {
            Self::Png => bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
            Self::Jpeg => bytes.starts_with(&[0xFF, 0xD8, 0xFF]),
            Self::Gif => bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a"),
            Self::Webp => bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP",
            Self::Icon => bytes.starts_with(&[0x00, 0x00, 0x01, 0x00]),
        }
    }

    /// All accepted formats.
    pub fn all() -> [Self; 5] {
        [Self::Png, Self::Jpeg, Self::Gif, Self::Webp, Self::Icon]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_types_round_trip() {
        for format in LogoFormat::all() {
            assert_eq!(LogoFormat::from_content_type(format.content_type()), Some(format));
        }
    }

    #[test]
    fn test_rejects_non_images() {
        assert_eq!(LogoFormat::from_content_type("application/pdf"), None);
        assert_eq!(LogoFormat::from_content_type("text/html"), None);
        assert_eq!(LogoFormat::from_content_type(""), None);
        assert_eq!(LogoFormat::from_content_type("image/svg+xml"), None);
    }

    #[test]
    fn test_signatures() {
        assert!(LogoFormat::Png.matches_signature(b"\x89PNG\r\n\x1a\nrest"));
        assert!(!LogoFormat::Png.matches_signature(b"GIF89a"));
        assert!(LogoFormat::Jpeg.matches_signature(&[0xFF, 0xD8, 0xFF, 0xE0]));
        assert!(LogoFormat::Gif.matches_signature(b"GIF87a..."));
        assert!(LogoFormat::Webp.matches_signature(b"RIFF\x10\x00\x00\x00WEBPVP8 "));
        assert!(!LogoFormat::Webp.matches_signature(b"RIFF"));
        assert!(LogoFormat::Icon.matches_signature(&[0, 0, 1, 0, 1]));
    }
}
