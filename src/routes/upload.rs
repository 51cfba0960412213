use actix_multipart::Multipart;
use actix_web::{post, web, HttpResponse, Responder};
use futures_util::TryStreamExt;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

use crate::models::Media;
use crate::types::UploadResponse;
use crate::{AppConfig, AppState};

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

#[post("/upload")]
pub async fn upload_files(
    app_state: web::Data<Arc<AppState>>,
    app_config: web::Data<Arc<AppConfig>>,
    mut payload: Multipart,
) -> Result<impl Responder, actix_web::Error> {
    let mut ids = Vec::new();

    while let Some(mut field) = payload.try_next().await? {
        let field_name = field
            .content_disposition()
            .get_name()
            .map(str::to_owned)
            .unwrap_or_default();
        if field_name != "files" {
            continue;
        }

        let original_name = field
            .content_disposition()
            .get_filename()
            .map(str::to_owned)
            .unwrap_or_else(|| "upload".to_string());
        let mime_type = field
            .content_type()
            .map(|mime| mime.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let mut data = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            data.extend_from_slice(&chunk);
        }

        let mut media = Media::new(
            &original_name,
            &mime_type,
            data.len() as i64,
            "",
            &original_name,
        );
        let stored_name = format!("{}-{}", media.id, sanitize_filename(&original_name));
        media.url = format!("/media/{}", stored_name);

        let path = Path::new(&app_config.media_dir).join(&stored_name);
        tokio::fs::write(&path, &data).await.map_err(|e| {
            error!("Failed to write upload to disk: {:?}", e);
            actix_web::error::ErrorInternalServerError("Failed to upload files")
        })?;

        let media = Media::create(&app_state.pool, media).await.map_err(|e| {
            error!("Failed to save media record: {:?}", e);
            actix_web::error::ErrorInternalServerError("Failed to upload files")
        })?;
        ids.push(media.id);
    }

    if ids.is_empty() {
        return Err(actix_web::error::ErrorBadRequest("No files provided"));
    }

    info!("Stored {} uploaded file(s)", ids.len());
    Ok(HttpResponse::Created().json(UploadResponse { success: true, ids }))
}

#[cfg(test)]
mod sanitize_tests {
    use super::sanitize_filename;

    #[test]
    fn filenames_are_reduced_to_a_safe_charset() {
        assert_eq!(sanitize_filename("logo final.png"), "logo-final.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), "..-..-etc-passwd");
        assert_eq!(sanitize_filename("brief_v2.pdf"), "brief_v2.pdf");
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{test, App};

    use crate::paypal::PayPal;
    use crate::routes;
    use crate::routes::test_utils::app_data;

    #[actix_web::test]
    async fn an_upload_without_any_files_field_returns_400() {
        let (state, config) = app_data(PayPal::new("http://localhost:9", None, None));
        let app = test::init_service(
            App::new()
                .app_data(state)
                .app_data(config)
                .configure(routes::configure),
        )
        .await;

        let payload = "--test-boundary\r\n\
             Content-Disposition: form-data; name=\"other\"\r\n\r\n\
             x\r\n\
             --test-boundary--\r\n";
        let req = test::TestRequest::post()
            .uri("/api/upload")
            .insert_header((
                "content-type",
                "multipart/form-data; boundary=test-boundary",
            ))
            .set_payload(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
        let body = test::read_body(resp).await;
        assert_eq!(body, "No files provided");
    }
}
