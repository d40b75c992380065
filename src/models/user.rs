use axum::{http::Extensions, Extension};
use serde::{Deserialize, Serialize};

/// The authenticated account behind a request, as carried by the bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i32,
    pub nickname: String,
    pub phone: String,
}

/// Typed lookup of the session user in a request-scoped context.
pub trait SessionContext {
    fn current_user(&self) -> Option<&SessionUser>;
}

impl SessionContext for Extensions {
    fn current_user(&self) -> Option<&SessionUser> {
        self.get::<SessionUser>()
    }
}

impl SessionContext for Option<Extension<SessionUser>> {
    fn current_user(&self) -> Option<&SessionUser> {
        self.as_ref().map(|Extension(user)| user)
    }
}

impl SessionContext for Option<SessionUser> {
    fn current_user(&self) -> Option<&SessionUser> {
        self.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> SessionUser {
        SessionUser {
            id: 7,
            nickname: "alice".to_string(),
            phone: "13700000000".to_string(),
        }
    }

    #[test]
    fn extensions_lookup() {
        let mut extensions = Extensions::new();
        assert!(extensions.current_user().is_none());

        extensions.insert(alice());
        assert_eq!(extensions.current_user(), Some(&alice()));
    }

    #[test]
    fn optional_extension_lookup() {
        let missing: Option<Extension<SessionUser>> = None;
        assert!(missing.current_user().is_none());

        let present = Some(Extension(alice()));
        assert_eq!(present.current_user().map(|u| u.id), Some(7));
    }
}
