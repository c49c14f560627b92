//! User JWT authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::extractors::UserAuth;

/// Middleware that requires a valid Bearer access token.
///
/// The authenticated caller is stored in request extensions, where the
/// [`UserAuth`] extractor picks it up without re-validating the token.
pub async fn require_user_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match UserAuth::from_headers(req.headers(), &state.jwt) {
        Ok(auth) => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(rejection) => rejection.into_response(),
    }
}
