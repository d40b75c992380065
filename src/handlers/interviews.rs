use axum::{
    extract::{rejection::FormRejection, Extension, Path, State},
    http::StatusCode,
    response::Json,
    Form,
};
use serde_json::json;
use std::collections::HashMap;

use crate::{
    models::{
        interview::{InterviewForm, InterviewResponse, InterviewUpdateForm},
        user::{SessionContext, SessionUser},
    },
    services::interview::InterviewService,
    utils::errors::{AppError, FormError},
    AppState,
};

fn session_owner(session: &Option<Extension<SessionUser>>) -> Result<i32, AppError> {
    session
        .current_user()
        .map(|user| user.id)
        .ok_or_else(|| AppError::Unauthorized("No session user".to_string()))
}

/// Defaults the interviewer from the session, then validates. Defaulting
/// runs first so a session phone satisfies the required interviewer phone.
fn prepare(
    state: &AppState,
    session: &Option<Extension<SessionUser>>,
    form: &mut InterviewForm,
) -> Result<(), AppError> {
    form.fill_default(session, &state.logger);

    if let Err(err) = form.check() {
        match &err {
            FormError::PhoneCollision => {
                tracing::debug!("Interview form rejected: phone collision")
            }
            FormError::Invalid { field, .. } => {
                tracing::debug!("Interview form rejected on {}: {}", field, err)
            }
        }
        return Err(err.into());
    }

    Ok(())
}

pub async fn create_interview(
    State(state): State<AppState>,
    session: Option<Extension<SessionUser>>,
    form: Result<Form<InterviewForm>, FormRejection>,
) -> Result<(StatusCode, Json<InterviewResponse>), AppError> {
    let Form(mut form) = form?;
    prepare(&state, &session, &mut form)?;
    let owner = session_owner(&session)?;

    let interview = InterviewService::new(state.db.clone())
        .create(&form, owner)
        .await?;

    state.logger.log_business_event(
        "interview_created",
        Some(owner),
        HashMap::from([("interview_id".to_string(), json!(interview.id))]),
    );

    Ok((StatusCode::CREATED, Json(InterviewResponse::from(interview))))
}

pub async fn update_interview(
    State(state): State<AppState>,
    session: Option<Extension<SessionUser>>,
    Path(id): Path<i32>,
    form: Result<Form<InterviewUpdateForm>, FormRejection>,
) -> Result<Json<InterviewResponse>, AppError> {
    let Form(mut form) = form?;
    prepare(&state, &session, &mut form)?;
    let owner = session_owner(&session)?;

    let interview = InterviewService::new(state.db.clone())
        .update_fields(id, owner, &form.to_map())
        .await?;

    state.logger.log_business_event(
        "interview_updated",
        Some(owner),
        HashMap::from([("interview_id".to_string(), json!(interview.id))]),
    );

    Ok(Json(InterviewResponse::from(interview)))
}

pub async fn get_interview(
    State(state): State<AppState>,
    session: Option<Extension<SessionUser>>,
    Path(id): Path<i32>,
) -> Result<Json<InterviewResponse>, AppError> {
    let owner = session_owner(&session)?;

    let interview = InterviewService::new(state.db.clone())
        .find(id, owner)
        .await?;

    Ok(Json(InterviewResponse::from(interview)))
}
