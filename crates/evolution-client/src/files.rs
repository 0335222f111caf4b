//! Local file helpers for media uploads
//!
//! Media, status and document sends embed the whole file as base64 in the
//! JSON body, so files are read fully into memory.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use mime::Mime;

use crate::error::{EvolutionError, Result};

/// Kind of media the API expects in `mediatype`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Image,
    Video,
    Audio,
    Document,
}

impl MediaType {
    /// Derive the media kind from a MIME type
    pub fn from_mime(mime_type: &Mime) -> Self {
        let top = mime_type.type_();
        if top == mime::IMAGE {
            Self::Image
        } else if top == mime::VIDEO {
            Self::Video
        } else if top == mime::AUDIO {
            Self::Audio
        } else {
            Self::Document
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Document => "document",
        }
    }
}

/// Ensure the path exists and points at a regular file
pub fn ensure_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(EvolutionError::FileNotFound(path.to_path_buf()));
    }
    if !path.is_file() {
        return Err(EvolutionError::NotAFile(path.to_path_buf()));
    }
    Ok(())
}

/// Read a file and encode it as standard base64 without a data-URI prefix
pub fn convert_to_base64(path: &Path) -> Result<String> {
    ensure_file(path)?;
    let bytes = std::fs::read(path)?;
    Ok(STANDARD.encode(bytes))
}

/// File size in MiB
pub fn file_size_mb(path: &Path) -> Result<f64> {
    let metadata = std::fs::metadata(path)?;
    Ok(metadata.len() as f64 / (1024.0 * 1024.0))
}

/// Guess the MIME type from the file extension
pub fn guess_mime(path: &Path) -> Option<Mime> {
    mime_guess::from_path(path).first()
}

/// File name component of a path, for payloads that need one
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_media_type_from_mime() {
        assert_eq!(MediaType::from_mime(&mime::IMAGE_PNG), MediaType::Image);
        assert_eq!(
            MediaType::from_mime(&"video/mp4".parse().unwrap()),
            MediaType::Video
        );
        assert_eq!(
            MediaType::from_mime(&"audio/ogg".parse().unwrap()),
            MediaType::Audio
        );
        assert_eq!(MediaType::from_mime(&mime::APPLICATION_PDF), MediaType::Document);
        assert_eq!(MediaType::from_mime(&mime::TEXT_PLAIN), MediaType::Document);
    }

    #[test]
    fn test_guess_mime() {
        assert_eq!(guess_mime(Path::new("photo.JPG")), Some(mime::IMAGE_JPEG));
        assert_eq!(guess_mime(Path::new("/tmp/laudo.pdf")), Some(mime::APPLICATION_PDF));
        assert_eq!(
            guess_mime(Path::new("clip.mp4")).map(|m| m.essence_str().to_string()),
            Some("video/mp4".to_string())
        );
        assert_eq!(guess_mime(Path::new("no_extension")), None);
        assert_eq!(guess_mime(Path::new("archive.unknownext")), None);
    }

    #[test]
    fn test_guess_mime_office_and_archives() {
        for name in ["contrato.rtf", "planilha.odt", "backup.7z", "a.tar"] {
            let mime_type = guess_mime(Path::new(name));
            assert!(mime_type.is_some(), "{} has no MIME type", name);
            assert_eq!(MediaType::from_mime(&mime_type.unwrap()), MediaType::Document);
        }
        assert_eq!(
            guess_mime(Path::new("a.tar")).map(|m| m.essence_str().to_string()),
            Some("application/x-tar".to_string())
        );
    }

    #[test]
    fn test_convert_to_base64() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello").unwrap();
        assert_eq!(convert_to_base64(file.path()).unwrap(), "aGVsbG8=");
    }

    #[test]
    fn test_convert_missing_file() {
        let result = convert_to_base64(Path::new("/definitely/not/here.png"));
        assert!(matches!(result, Err(EvolutionError::FileNotFound(_))));
    }

    #[test]
    fn test_convert_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = convert_to_base64(dir.path());
        assert!(matches!(result, Err(EvolutionError::NotAFile(_))));
    }

    #[test]
    fn test_ensure_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ensure_file(dir.path()),
            Err(EvolutionError::NotAFile(_))
        ));
        assert!(matches!(
            ensure_file(&dir.path().join("missing.png")),
            Err(EvolutionError::FileNotFound(_))
        ));

        let path = dir.path().join("present.png");
        std::fs::write(&path, b"png").unwrap();
        assert!(ensure_file(&path).is_ok());
    }

    #[test]
    fn test_file_size_mb() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&vec![0u8; 1024 * 1024]).unwrap();
        let size = file_size_mb(file.path()).unwrap();
        assert!((size - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(Path::new("/tmp/curriculo.pdf")), "curriculo.pdf");
    }
}
