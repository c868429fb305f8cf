use std::sync::Arc;

use chrono::Utc;
use pulse_core::{AppError, AppResult, SubjectIdentity};
use pulse_domain::{
    AttachmentKind, Capability, FileDescriptor, FileRejection, FileValidation,
    storage_object_name, validate_file,
};
use tracing::info;

use crate::{AuthorizationService, BlobStore, ProgressSender};

/// Stored attachment returned after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAttachment {
    /// Download URL.
    pub url: String,
    /// Object path inside the blob store.
    pub path: String,
    /// Image or video.
    pub kind: AttachmentKind,
    /// Declared MIME type.
    pub mime_type: String,
}

/// Application service for attachment validation and upload.
#[derive(Clone)]
pub struct AttachmentService {
    authorization: AuthorizationService,
    blob_store: Arc<dyn BlobStore>,
}

impl AttachmentService {
    /// Creates an attachment service.
    #[must_use]
    pub fn new(authorization: AuthorizationService, blob_store: Arc<dyn BlobStore>) -> Self {
        Self {
            authorization,
            blob_store,
        }
    }

    /// Validates a picked file for the actor.
    ///
    /// The ceiling is the smaller of the type limit and the role's upload limit.
    pub async fn validate_for(
        &self,
        actor: &SubjectIdentity,
        file: Option<&FileDescriptor>,
    ) -> FileValidation {
        let permissions = self.authorization.effective_role(actor).await.permissions();
        if !permissions.grants(Capability::UploadFiles) {
            return FileValidation::Rejected(FileRejection::UploadNotPermitted);
        }

        let kind_limit = file
            .and_then(|file| AttachmentKind::from_mime_type(&file.mime_type))
            .map(|kind| kind.default_max_size())
            .unwrap_or(u64::MAX);

        validate_file(file, kind_limit.min(permissions.max_file_size))
    }

    /// Validates and uploads a file under `base_path`.
    ///
    /// Progress is reported on `progress` when given; dropping its receiver
    /// stops reporting without affecting the upload.
    pub async fn upload(
        &self,
        actor: &SubjectIdentity,
        file: &FileDescriptor,
        bytes: Vec<u8>,
        base_path: &str,
        progress: Option<ProgressSender>,
    ) -> AppResult<UploadedAttachment> {
        let kind = match self.validate_for(actor, Some(file)).await {
            FileValidation::Accepted(kind) => kind,
            FileValidation::Rejected(FileRejection::UploadNotPermitted) => {
                return Err(AppError::Forbidden(
                    FileRejection::UploadNotPermitted.to_string(),
                ));
            }
            FileValidation::Rejected(rejection) => {
                return Err(AppError::Validation(rejection.to_string()));
            }
        };

        if bytes.len() as u64 != file.size {
            return Err(AppError::Validation(format!(
                "file '{}' declared {} bytes but {} were provided",
                file.name,
                file.size,
                bytes.len()
            )));
        }

        let path = format!(
            "{}/{}",
            base_path.trim_end_matches('/'),
            storage_object_name(Utc::now().timestamp_millis(), &file.name)
        );
        let url = self.blob_store.upload(&path, bytes, progress).await?;

        info!(
            subject = %actor.id(),
            path = %path,
            size = file.size,
            "attachment uploaded"
        );

        Ok(UploadedAttachment {
            url,
            path,
            kind,
            mime_type: file.mime_type.clone(),
        })
    }

    /// Deletes a stored attachment by download URL.
    pub async fn delete(&self, url: &str) -> AppResult<()> {
        self.blob_store.delete(url).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use pulse_core::{AppError, AppResult, SubjectId, SubjectIdentity};
    use pulse_domain::{
        AttachmentKind, FileDescriptor, FileRejection, FileValidation, Role, UploadProgress,
    };
    use tokio::sync::{Mutex, mpsc};

    use crate::{
        AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository,
        AuthorizationPolicy, AuthorizationService, BlobStore, ProgressSender, RoleAssignment,
        RoleAssignmentRepository,
    };

    use super::AttachmentService;

    const MIB: u64 = 1024 * 1024;

    struct FixedRoleRepository {
        role: Option<Role>,
    }

    #[async_trait]
    impl RoleAssignmentRepository for FixedRoleRepository {
        async fn find_role(&self, _subject: &SubjectId) -> AppResult<Option<Role>> {
            Ok(self.role)
        }

        async fn save_assignment(&self, _assignment: RoleAssignment) -> AppResult<()> {
            Ok(())
        }

        async fn delete_assignment(&self, _subject: &SubjectId) -> AppResult<()> {
            Ok(())
        }
    }

    struct NoopAudit;

    #[async_trait]
    impl AuditRepository for NoopAudit {
        async fn append_event(&self, _event: AuditEvent) -> AppResult<()> {
            Ok(())
        }
    }

    #[async_trait]
    impl AuditLogRepository for NoopAudit {
        async fn list_recent_entries(&self, _query: AuditLogQuery) -> AppResult<Vec<AuditLogEntry>> {
            Ok(Vec::new())
        }
    }

    #[derive(Default)]
    struct FakeBlobStore {
        uploads: Mutex<Vec<String>>,
        deleted: Mutex<Vec<String>>,
        fail_delete: bool,
    }

    #[async_trait]
    impl BlobStore for FakeBlobStore {
        async fn upload(
            &self,
            path: &str,
            bytes: Vec<u8>,
            progress: Option<ProgressSender>,
        ) -> AppResult<String> {
            if let Some(progress) = progress {
                let total_bytes = bytes.len() as u64;
                let _ = progress.send(UploadProgress {
                    bytes_transferred: total_bytes,
                    total_bytes,
                });
            }
            self.uploads.lock().await.push(path.to_owned());
            Ok(format!("memory://{path}"))
        }

        async fn delete(&self, url: &str) -> AppResult<()> {
            if self.fail_delete {
                return Err(AppError::NotFound(format!("object '{url}' does not exist")));
            }
            self.deleted.lock().await.push(url.to_owned());
            Ok(())
        }
    }

    fn actor() -> SubjectIdentity {
        SubjectIdentity::new(
            SubjectId::new("uploader").unwrap_or_else(|_| unreachable!()),
            Some("Uploader".to_owned()),
        )
    }

    fn service_with(role: Option<Role>, blob_store: Arc<FakeBlobStore>) -> AttachmentService {
        let authorization = AuthorizationService::new(
            AuthorizationPolicy::new(Vec::new(), None),
            Arc::new(FixedRoleRepository { role }),
            Arc::new(NoopAudit),
            Arc::new(NoopAudit),
        );
        AttachmentService::new(authorization, blob_store)
    }

    #[tokio::test]
    async fn oversized_video_is_rejected_even_for_admins() {
        let service = service_with(Some(Role::Admin), Arc::new(FakeBlobStore::default()));
        let video = FileDescriptor::new("clip.mp4", "video/mp4", 51 * MIB);

        let validation = service.validate_for(&actor(), Some(&video)).await;

        assert_eq!(
            validation,
            FileValidation::Rejected(FileRejection::SizeExceeded { limit: 50 * MIB })
        );
        assert_eq!(
            validation.reason().as_deref(),
            Some("File size exceeds 50MB limit")
        );
    }

    #[tokio::test]
    async fn image_under_default_limit_is_accepted_for_users() {
        let service = service_with(None, Arc::new(FakeBlobStore::default()));
        let image = FileDescriptor::new("cat.png", "image/png", 9 * MIB);

        let validation = service.validate_for(&actor(), Some(&image)).await;

        assert_eq!(validation, FileValidation::Accepted(AttachmentKind::Image));
    }

    #[tokio::test]
    async fn role_limit_caps_video_size() {
        let video = FileDescriptor::new("clip.webm", "video/webm", 15 * MIB);

        let vip = service_with(Some(Role::Vip), Arc::new(FakeBlobStore::default()));
        assert!(vip.validate_for(&actor(), Some(&video)).await.is_valid());

        let user = service_with(None, Arc::new(FakeBlobStore::default()));
        assert_eq!(
            user.validate_for(&actor(), Some(&video)).await.reason().as_deref(),
            Some("File size exceeds 10MB limit")
        );
    }

    #[tokio::test]
    async fn missing_file_is_rejected() {
        let service = service_with(None, Arc::new(FakeBlobStore::default()));

        assert_eq!(
            service.validate_for(&actor(), None).await,
            FileValidation::Rejected(FileRejection::NoFile)
        );
    }

    #[tokio::test]
    async fn upload_stores_under_base_path_and_reports_progress() {
        let blob_store = Arc::new(FakeBlobStore::default());
        let service = service_with(None, blob_store.clone());
        let file = FileDescriptor::new("a/b.png", "image/png", 4);
        let (sender, mut receiver) = mpsc::unbounded_channel();

        let uploaded = service
            .upload(&actor(), &file, vec![1, 2, 3, 4], "channels/general/", Some(sender))
            .await
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(uploaded.kind, AttachmentKind::Image);
        assert!(uploaded.path.starts_with("channels/general/"));
        assert!(uploaded.path.ends_with("_a_b.png"));
        assert_eq!(uploaded.url, format!("memory://{}", uploaded.path));
        assert_eq!(*blob_store.uploads.lock().await, vec![uploaded.path.clone()]);

        let progress = receiver.recv().await.unwrap_or_else(|| unreachable!());
        assert_eq!(progress.percent(), 100.0);
    }

    #[tokio::test]
    async fn upload_rejects_invalid_files_without_writing() {
        let blob_store = Arc::new(FakeBlobStore::default());
        let service = service_with(None, blob_store.clone());
        let file = FileDescriptor::new("notes.txt", "text/plain", 3);

        let result = service
            .upload(&actor(), &file, vec![1, 2, 3], "uploads", None)
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(blob_store.uploads.lock().await.is_empty());
    }

    #[tokio::test]
    async fn delete_propagates_store_failures() {
        let service = service_with(
            None,
            Arc::new(FakeBlobStore {
                fail_delete: true,
                ..FakeBlobStore::default()
            }),
        );

        let result = service.delete("memory://missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
