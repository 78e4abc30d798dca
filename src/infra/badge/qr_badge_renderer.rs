use crate::domain::{ports::BadgeRenderer, services::identifier::is_tourist_id};
use crate::error::AppError;
use async_trait::async_trait;
use image::Luma;
use qrcode::QrCode;
use std::path::PathBuf;
use tracing::{debug, error, warn};

pub const QR_SUBDIR: &str = "qrcodes";

/// Writes PNG QR codes to `<static_dir>/qrcodes/<tourist_id>.png`.
pub struct QrBadgeRenderer {
    static_dir: PathBuf,
}

impl QrBadgeRenderer {
    pub fn new(static_dir: impl Into<PathBuf>) -> Self {
        Self { static_dir: static_dir.into() }
    }
}

#[async_trait]
impl BadgeRenderer for QrBadgeRenderer {
    async fn render(&self, tourist_id: &str) -> Result<String, AppError> {
        // The id becomes a file name.
        if !is_tourist_id(tourist_id) {
            return Err(AppError::InternalWithMsg(format!("Refusing to render badge for {:?}", tourist_id)));
        }

        let relative = format!("{}/{}.png", QR_SUBDIR, tourist_id);
        let folder = self.static_dir.join(QR_SUBDIR);
        let target = self.static_dir.join(&relative);
        let payload = tourist_id.to_string();

        tokio::task::spawn_blocking(move || -> Result<(), String> {
            std::fs::create_dir_all(&folder).map_err(|e| format!("create {:?}: {}", folder, e))?;
            let code = QrCode::new(payload.as_bytes()).map_err(|e| format!("encode: {}", e))?;
            let img = code.render::<Luma<u8>>().build();
            img.save(&target).map_err(|e| format!("write {:?}: {}", target, e))
        })
        .await
        .map_err(|e| AppError::InternalWithMsg(format!("QR render task failed: {}", e)))?
        .map_err(|msg| {
            error!("QR code generation failed: {}", msg);
            AppError::InternalWithMsg(msg)
        })?;

        debug!(path = %relative, "Wrote QR code");
        Ok(relative)
    }

    async fn discard(&self, relative_path: &str) -> Result<(), AppError> {
        let file_name = relative_path.strip_prefix(&format!("{}/", QR_SUBDIR));
        let Some(tourist_id) = file_name.and_then(|name| name.strip_suffix(".png")) else {
            return Err(AppError::InternalWithMsg(format!("Not a badge path: {:?}", relative_path)));
        };
        if !is_tourist_id(tourist_id) {
            return Err(AppError::InternalWithMsg(format!("Not a badge path: {:?}", relative_path)));
        }

        let target = self.static_dir.join(relative_path);
        match tokio::fs::remove_file(&target).await {
            Ok(()) => {
                debug!(path = %relative_path, "Removed QR code");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                warn!("Failed to remove {:?}: {}", target, e);
                Err(AppError::InternalWithMsg(format!("remove {:?}: {}", target, e)))
            }
        }
    }
}
