use std::path::{Path, PathBuf};

use classnotify_core::MAX_ATTACHMENT_BYTES;
use notification::AttachmentPayload;
use snafu::ResultExt;

use super::error::{self, Error, Result};

/// Outcome of admitting a caller-supplied attachment reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdmittedAttachment {
    None,

    /// A link embedded into the notice body; never fetched by this service.
    Remote { url: String },

    /// A local object whose content is read right before dispatch.
    Inline { path: PathBuf, size_bytes: u64 },
}

/// Classifies an attachment reference before any per-recipient work begins,
/// so a doomed attachment aborts the request early.
///
/// # Errors
///
/// Returns an error if a local reference does not exist or exceeds the
/// inline size ceiling.
pub async fn admit(reference: Option<&str>) -> Result<AdmittedAttachment> {
    let Some(reference) = reference.map(str::trim).filter(|reference| !reference.is_empty())
    else {
        return Ok(AdmittedAttachment::None);
    };

    if reference.starts_with("http://") || reference.starts_with("https://") {
        return Ok(AdmittedAttachment::Remote { url: reference.to_string() });
    }

    let path = PathBuf::from(reference);

    let Ok(metadata) = tokio::fs::metadata(&path).await else {
        return Err(Error::AttachmentNotFound { path });
    };
    if !metadata.is_file() {
        return Err(Error::AttachmentNotFound { path });
    }

    let size_bytes = metadata.len();
    if size_bytes > MAX_ATTACHMENT_BYTES {
        return Err(Error::AttachmentTooLarge {
            path,
            size_bytes,
            limit_bytes: MAX_ATTACHMENT_BYTES,
        });
    }

    Ok(AdmittedAttachment::Inline { path, size_bytes })
}

/// Reads an admitted local object into a transport payload.
///
/// Admission is a point-in-time check; a file that vanished in between
/// surfaces here as a read error.
///
/// # Errors
///
/// Returns an error if the object can no longer be read.
pub async fn load_payload(path: &Path) -> Result<AttachmentPayload> {
    let content = tokio::fs::read(path)
        .await
        .with_context(|_| error::ReadAttachmentSnafu { path: path.to_path_buf() })?;

    let filename = path
        .file_name()
        .map_or_else(|| "attachment".to_string(), |name| name.to_string_lossy().into_owned());

    Ok(AttachmentPayload { filename, content })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str, len: usize) -> PathBuf {
        let path = std::env::temp_dir().join(format!("classnotify-{}-{name}", std::process::id()));
        std::fs::write(&path, vec![0_u8; len]).unwrap();
        path
    }

    #[tokio::test]
    async fn test_admit_absent_reference() {
        assert_eq!(admit(None).await.unwrap(), AdmittedAttachment::None);
        assert_eq!(admit(Some("")).await.unwrap(), AdmittedAttachment::None);
        assert_eq!(admit(Some("   ")).await.unwrap(), AdmittedAttachment::None);
    }

    #[tokio::test]
    async fn test_admit_remote_reference_unconditionally() {
        let url = "https://files.example.edu/huge-lecture-recording.mp4";

        let admitted = admit(Some(url)).await.unwrap();
        assert_eq!(admitted, AdmittedAttachment::Remote { url: url.to_string() });

        let admitted = admit(Some("http://files.example.edu/notes.pdf")).await.unwrap();
        assert!(matches!(admitted, AdmittedAttachment::Remote { .. }));
    }

    #[tokio::test]
    async fn test_admit_missing_local_object() {
        let err = admit(Some("/nonexistent/lecture-notes.pdf")).await.unwrap_err();
        assert!(matches!(err, Error::AttachmentNotFound { .. }));
    }

    #[tokio::test]
    async fn test_admit_local_object_at_ceiling() {
        let path = scratch_file("at-ceiling", MAX_ATTACHMENT_BYTES as usize);

        let admitted = admit(Some(path.to_str().unwrap())).await.unwrap();
        assert_eq!(
            admitted,
            AdmittedAttachment::Inline { path: path.clone(), size_bytes: MAX_ATTACHMENT_BYTES }
        );

        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_admit_local_object_above_ceiling() {
        let path = scratch_file("above-ceiling", MAX_ATTACHMENT_BYTES as usize + 1);

        let err = admit(Some(path.to_str().unwrap())).await.unwrap_err();
        assert!(matches!(
            err,
            Error::AttachmentTooLarge { size_bytes, .. } if size_bytes == MAX_ATTACHMENT_BYTES + 1
        ));

        std::fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_load_payload_keeps_file_name() {
        let path = scratch_file("payload.pdf", 16);

        let payload = load_payload(&path).await.unwrap();
        assert!(payload.filename.ends_with("payload.pdf"));
        assert_eq!(payload.content.len(), 16);

        std::fs::remove_file(path).unwrap();
    }
}
