//! Client sessions
//!
//! A session is an opaque UUID handed to the client in the `session_id`
//! cookie. It is not stored anywhere; it only partitions which parcels a
//! client may list. The cookie is read here and the resulting [`SessionId`]
//! is passed explicitly to the repository.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Cookie carrying the session id
pub const SESSION_COOKIE: &str = "session_id";

/// Opaque session token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Mint a fresh session id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Read the session from the request cookies
    ///
    /// A cookie that is not a UUID is treated as absent.
    pub fn from_jar(jar: &CookieJar) -> Option<Self> {
        jar.get(SESSION_COOKIE)
            .and_then(|cookie| cookie.value().parse().ok())
    }

    /// Reuse the session from the cookies or mint a new one
    ///
    /// When a new session is minted the returned jar carries the cookie that
    /// hands it to the client.
    pub fn resolve(jar: CookieJar, secure: bool) -> (Self, CookieJar) {
        match Self::from_jar(&jar) {
            Some(session) => (session, jar),
            None => {
                let session = Self::new();
                let jar = jar.add(session.cookie(secure));
                (session, jar)
            }
        }
    }

    fn cookie(&self, secure: bool) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, self.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(secure)
            .build()
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for SessionId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jar_with(value: &str) -> CookieJar {
        CookieJar::new().add(Cookie::new(SESSION_COOKIE, value.to_string()))
    }

    #[test]
    fn test_reads_session_from_cookie() {
        let id = Uuid::new_v4();
        let jar = jar_with(&id.to_string());

        assert_eq!(SessionId::from_jar(&jar), Some(SessionId::from(id)));
    }

    #[test]
    fn test_missing_or_malformed_cookie_is_absent() {
        assert_eq!(SessionId::from_jar(&CookieJar::new()), None);
        assert_eq!(SessionId::from_jar(&jar_with("not-a-uuid")), None);
    }

    #[test]
    fn test_resolve_reuses_existing_session() {
        let id = Uuid::new_v4();
        let (session, jar) = SessionId::resolve(jar_with(&id.to_string()), false);

        assert_eq!(session.as_uuid(), id);
        assert_eq!(jar.iter().count(), 1);
    }

    #[test]
    fn test_resolve_mints_and_sets_cookie() {
        let (session, jar) = SessionId::resolve(CookieJar::new(), true);

        let cookie = jar.get(SESSION_COOKIE).expect("session cookie set");
        assert_eq!(cookie.value(), session.to_string());
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn test_fresh_sessions_are_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }
}
