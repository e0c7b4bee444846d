// src/common/storage.rs

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;

use crate::common::error::AppError;

pub const ALLOWED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/jpg"];
pub const MAX_FILE_SIZE_BYTES: usize = 1_572_864; // 1.5 MiB

// Um arquivo recebido via multipart, ainda em memória.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

// Validação de MIME e tamanho, aplicada antes de qualquer upload.
pub fn validate_upload(file: &UploadedFile) -> Result<(), AppError> {
    if !ALLOWED_MIME_TYPES.contains(&file.content_type.as_str()) {
        return Err(AppError::bad_request("Tipo do arquivo não permitido."));
    }

    if file.bytes.len() > MAX_FILE_SIZE_BYTES {
        return Err(AppError::bad_request("Tamanho do arquivo excedido."));
    }

    Ok(())
}

// Chave única por upload, no formato `prefixo/timestamp_nome`.
pub fn object_key(prefix: &str, file_name: &str) -> String {
    let safe_name = file_name.replace(['/', '\\'], "_");
    format!("{}/{}_{}", prefix, Utc::now().timestamp_millis(), safe_name)
}

// Capacidade de armazenamento de objetos, injetada pela raiz de composição
// em vez de um cliente global mutável.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    // Grava o objeto e devolve a URL pública.
    async fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<String, AppError>;

    // Remoção best-effort, usada na limpeza de uploads parciais.
    async fn delete(&self, key: &str) -> Result<(), AppError>;
}

// Implementação sobre o sistema de arquivos local, servida por um CDN/nginx
// apontando para `root` sob `public_base_url`.
pub struct FsObjectStorage {
    root: PathBuf,
    public_base_url: String,
}

impl FsObjectStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), key)
    }
}

#[async_trait]
impl ObjectStorage for FsObjectStorage {
    async fn put(&self, key: &str, bytes: &[u8], _content_type: &str) -> Result<String, AppError> {
        let path = self.root.join(key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| anyhow::anyhow!("Falha ao criar diretório de upload: {}", e))?;
        }

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| anyhow::anyhow!("Falha ao gravar arquivo {}: {}", path.display(), e))?;

        Ok(self.url_for(key))
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        let path = self.root.join(key);

        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::anyhow!("Falha ao remover arquivo {}: {}", path.display(), e).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn file(content_type: &str, len: usize) -> UploadedFile {
        UploadedFile {
            file_name: "foto.png".to_string(),
            content_type: content_type.to_string(),
            bytes: vec![0u8; len],
        }
    }

    #[test]
    fn accepts_allowed_mime_within_size() {
        assert!(validate_upload(&file("image/jpeg", 1024)).is_ok());
        assert!(validate_upload(&file("image/png", MAX_FILE_SIZE_BYTES)).is_ok());
    }

    #[test]
    fn rejects_disallowed_mime() {
        let err = validate_upload(&file("application/pdf", 10)).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn rejects_oversized_file() {
        let err = validate_upload(&file("image/jpeg", MAX_FILE_SIZE_BYTES + 1)).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn object_key_keeps_prefix_and_name() {
        let key = object_key("images/profile", "minha foto.png");
        assert!(key.starts_with("images/profile/"));
        assert!(key.ends_with("_minha foto.png"));
    }

    #[test]
    fn object_key_strips_path_separators() {
        let key = object_key("images/orders", "../../etc/passwd");
        assert!(!key["images/orders/".len()..].contains('/'));
    }

    #[test]
    fn fs_storage_builds_public_url() {
        let storage = FsObjectStorage::new("/tmp/uploads", "https://cdn.example.com/");
        assert_eq!(
            storage.url_for("images/profile/1_a.png"),
            "https://cdn.example.com/images/profile/1_a.png"
        );
    }
}
