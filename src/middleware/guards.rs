use std::{marker::PhantomData, sync::Arc};

use axum::{extract::FromRequestParts, http::header};
use uuid::Uuid;

use crate::{
    auth::{RequiredRole, Role},
    error::AppError,
    state::AppState,
};

/// The authenticated caller. Built per request: bearer token verified, then
/// the subject re-read from the store so role changes and deletions take
/// effect immediately rather than at token expiry.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>().cloned() {
            return Ok(user);
        }

        let auth = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        let token = auth
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthenticated("Missing/invalid Authorization header"))?;

        let subject = state.tokens.verify_access_token(token)?;

        // account deleted after issuance is indistinguishable from a bad token
        let user = crate::db::dao::UserDao::new(&state.db)
            .find_by_id(&subject)
            .await?
            .ok_or_else(|| AppError::unauthenticated("Token is invalid or expired"))?;

        let role = Role::try_from(user.role.as_str())
            .map_err(|_| AppError::internal("Stored role is not recognized"))?;

        let user = AuthUser {
            id: user.id,
            email: user.email,
            role,
        };
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

/// Role gate on top of [`AuthUser`]. A wrong role is 403, never 401, and the
/// guarded handler never runs.
pub struct RoleGuard<R: RequiredRole> {
    pub user: AuthUser,
    _marker: PhantomData<R>,
}

impl<R> FromRequestParts<Arc<AppState>> for RoleGuard<R>
where
    R: RequiredRole,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        if user.role != R::required() {
            return Err(AppError::forbidden("Missing required role"));
        }

        Ok(Self {
            user,
            _marker: PhantomData,
        })
    }
}
