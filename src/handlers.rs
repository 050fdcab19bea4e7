// src/handlers.rs
//
// HTTP surface over the session state machine. Each handler folds one or
// more actions through the store; the returned body is always the full
// snapshot the presentation layer renders.

use actix_multipart::Multipart;
use actix_web::{Error, HttpResponse, web};
use futures_util::TryStreamExt;
use log::error;
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    AppContext, catalog,
    errors::InmueblarError,
    models::{AppState, EncodedImage, TransformationStyle},
    state::Action,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/sessions", web::post().to(create_session))
            .route("/sessions/{session_id}", web::get().to(get_session))
            .route(
                "/sessions/{session_id}/upload",
                web::post().to(upload_image),
            )
            .route("/sessions/{session_id}/style", web::post().to(select_style))
            .route("/sessions/{session_id}/demo", web::post().to(load_demo))
            .route(
                "/sessions/{session_id}/reset",
                web::post().to(reset_session),
            )
            .route("/providers", web::get().to(list_providers)),
    )
    .route("/health", web::get().to(health_check));
}

pub async fn create_session(data: web::Data<AppContext>) -> HttpResponse {
    let (session_id, state) = data.store.create();
    HttpResponse::Ok().json(serde_json::json!({
        "sessionId": session_id,
        "state": state,
    }))
}

pub async fn get_session(
    path: web::Path<Uuid>,
    data: web::Data<AppContext>,
) -> Result<HttpResponse, Error> {
    let state = data.store.get(path.into_inner())?;
    Ok(HttpResponse::Ok().json(&state))
}

/// Accepts a multipart photo upload, replaces the session image and
/// immediately runs the analysis cycle, exactly once per upload.
pub async fn upload_image(
    path: web::Path<Uuid>,
    mut payload: Multipart,
    data: web::Data<AppContext>,
) -> Result<HttpResponse, Error> {
    let session_id = path.into_inner();
    data.store.get(session_id)?;

    let mut upload: Option<(String, Vec<u8>)> = None;
    while let Some(mut field) = payload.try_next().await? {
        if field.content_disposition().get_filename().is_none() {
            continue;
        }

        let content_type = field
            .content_type()
            .map(|ct| ct.to_string())
            .unwrap_or_else(|| "image/jpeg".to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await? {
            bytes.extend_from_slice(&chunk);
        }

        upload = Some((content_type, bytes));
        break;
    }

    let Some((content_type, bytes)) = upload else {
        return Err(InmueblarError::Validation("no image file in upload".to_string()).into());
    };

    let image = data.images.prepare_upload(&bytes, &content_type)?;
    data.store
        .apply(session_id, Action::ImageUploaded(image.clone()))?;

    let state = run_analysis(&data, session_id, &image).await?;
    Ok(HttpResponse::Ok().json(&state))
}

async fn run_analysis(
    ctx: &AppContext,
    session_id: Uuid,
    image: &EncodedImage,
) -> Result<AppState, InmueblarError> {
    ctx.store.apply(session_id, Action::AnalysisStarted)?;

    match ctx.ai.analyze(image).await {
        Ok(analysis) => ctx.store.apply(session_id, Action::AnalysisFinished(analysis)),
        Err(e) => {
            error!("analysis failed for session {session_id}: {e}");
            ctx.store.apply(session_id, Action::AnalysisFailed)?;
            Err(e)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StyleRequest {
    pub style: TransformationStyle,
}

/// Restyles the uploaded photo. Transformations always start from the
/// original upload, never from a previously generated image.
pub async fn select_style(
    path: web::Path<Uuid>,
    body: web::Json<StyleRequest>,
    data: web::Data<AppContext>,
) -> Result<HttpResponse, Error> {
    let session_id = path.into_inner();
    let style = body.style;
    let current = data.store.get(session_id)?;

    // No uploaded photo (or only the remote demo placeholder): nothing to
    // restyle, state stays as it is.
    let Some(original) = current
        .original_image
        .as_ref()
        .and_then(|source| source.as_inline())
        .cloned()
    else {
        return Ok(HttpResponse::Ok().json(&current));
    };

    let state = data.store.apply(session_id, Action::StyleSelected(style))?;
    if style == TransformationStyle::Original {
        // The reducer already dropped the generated image; no call is made.
        return Ok(HttpResponse::Ok().json(&state));
    }

    data.store.apply(session_id, Action::GenerationStarted)?;
    match data.ai.transform(&original, style).await {
        Ok(image) => {
            let state = data
                .store
                .apply(session_id, Action::GenerationFinished(image))?;
            Ok(HttpResponse::Ok().json(&state))
        }
        Err(e) => {
            error!("transformation failed for session {session_id}: {e}");
            data.store.apply(session_id, Action::GenerationFailed)?;
            Err(e.into())
        }
    }
}

/// Substitutes the fixed sample budget without touching the network.
pub async fn load_demo(
    path: web::Path<Uuid>,
    data: web::Data<AppContext>,
) -> Result<HttpResponse, Error> {
    let state = data.store.apply(path.into_inner(), Action::DemoLoaded)?;
    Ok(HttpResponse::Ok().json(&state))
}

pub async fn reset_session(
    path: web::Path<Uuid>,
    data: web::Data<AppContext>,
) -> Result<HttpResponse, Error> {
    let state = data.store.apply(path.into_inner(), Action::Reset)?;
    Ok(HttpResponse::Ok().json(&state))
}

#[derive(Debug, Deserialize)]
pub struct ProviderQuery {
    pub search: Option<String>,
    pub profession: Option<String>,
}

pub async fn list_providers(query: web::Query<ProviderQuery>) -> HttpResponse {
    let all = catalog::providers();
    let providers =
        catalog::filter_providers(&all, query.search.as_deref(), query.profession.as_deref());

    HttpResponse::Ok().json(serde_json::json!({
        "count": providers.len(),
        "providers": providers,
    }))
}

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "inmueblar",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
