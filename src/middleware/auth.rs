use crate::{
    models::user::SessionUser,
    utils::{errors::AppError, jwt::verify_jwt},
    AppState,
};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let session_user = bearer_token(&request)
        .and_then(|token| verify_jwt(token, &state.jwt_secret).ok())
        .map(SessionUser::from);

    let Some(session_user) = session_user else {
        state.logger.log_request(
            request.method().as_str(),
            request.uri().path(),
            None,
            401,
        );
        return AppError::Unauthorized("Missing or invalid bearer token".to_string())
            .into_response();
    };

    request.extensions_mut().insert(session_user);
    next.run(request).await
}
