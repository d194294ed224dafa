use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::sync::Arc;

/// A user account as reported by the backend
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(alias = "fname", default)]
    pub firstname: String,
    #[serde(alias = "lname", default)]
    pub lastname: String,
    #[serde(default)]
    pub bio: Option<String>,
    /// Server-relative path such as `/images/avatars/cat.png`
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(rename = "dateOfBirth", default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(
        rename = "isAdmin",
        default,
        deserialize_with = "bool_or_int",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_admin: Option<bool>,
    #[serde(rename = "articleCount", default, skip_serializing_if = "Option::is_none")]
    pub article_count: Option<u64>,
}

impl User {
    pub fn full_name(&self) -> String {
        match (self.firstname.is_empty(), self.lastname.is_empty()) {
            (false, false) => format!("{} {}", self.firstname, self.lastname),
            (false, true) => self.firstname.clone(),
            (true, false) => self.lastname.clone(),
            (true, true) => String::new(),
        }
    }

    pub fn bio(&self) -> &str {
        self.bio.as_deref().unwrap_or("")
    }

    /// Avatar path, if the user has a non-blank one
    pub fn avatar_path(&self) -> Option<&str> {
        self.avatar.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }
}

/// SQLite hands booleans back as 0/1, so accept either form
fn bool_or_int<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Bool(b)) => Ok(Some(b)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.as_f64().unwrap_or(0.0) != 0.0)),
        Some(other) => Err(D::Error::custom(format!(
            "expected boolean or number, found {}",
            other
        ))),
    }
}

/// Opaque session cookie issued by the backend at login
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredential(String);

impl SessionCredential {
    pub fn new(cookie: impl Into<String>) -> Self {
        SessionCredential(cookie.into())
    }

    /// Build a credential from `Set-Cookie` header values.
    ///
    /// Only the `name=value` pair of each cookie is kept; attributes such as
    /// `Path` or `HttpOnly` are dropped. Cookies with an empty value (the
    /// backend's way of clearing one) are skipped. Returns `None` when no
    /// usable cookie remains.
    pub fn from_set_cookie<'a, I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let pairs: Vec<&str> = values
            .into_iter()
            .filter_map(|v| v.split(';').next())
            .map(str::trim)
            .filter(|pair| match pair.split_once('=') {
                Some((name, value)) => !name.trim().is_empty() && !value.trim().is_empty(),
                None => false,
            })
            .collect();

        if pairs.is_empty() {
            None
        } else {
            Some(SessionCredential(pairs.join("; ")))
        }
    }

    /// Value for the `Cookie` request header
    pub fn cookie_header(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionCredential(<redacted>)")
    }
}

/// Holds at most one live credential; absent means unauthenticated
#[derive(Debug, Default)]
pub struct Session {
    credential: Option<SessionCredential>,
}

impl Session {
    pub fn set(&mut self, credential: SessionCredential) {
        self.credential = Some(credential);
    }

    /// Drop the credential, handing it back for a best-effort logout call
    pub fn clear(&mut self) -> Option<SessionCredential> {
        self.credential.take()
    }

    pub fn credential(&self) -> Option<&SessionCredential> {
        self.credential.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }
}

/// Successful login result
#[derive(Clone, Debug)]
pub struct LoginOutcome {
    pub credential: SessionCredential,
    /// Username echoed back by the backend, when it sends one
    pub username: Option<String>,
}

/// Avatar decoded and scaled to the display box
#[derive(Clone, Debug, PartialEq)]
pub struct Avatar {
    pub width: u32,
    pub height: u32,
    /// Row-major RGB pixels, `width * height` long
    pub pixels: Vec<[u8; 3]>,
}

impl Avatar {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }
}

/// The profile currently on display. Fields and image always travel together.
#[derive(Clone, Debug)]
pub struct Profile {
    pub user: User,
    pub avatar: Option<Arc<Avatar>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_from_backend_row() {
        let json = r#"{"id":2,"username":"bob","fname":"Bob","lname":"Stone","dateOfBirth":"1990-01-01",
            "bio":null,"avatar":"/images/avatars/bob.png","isAdmin":0,"articleCount":3}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, 2);
        assert_eq!(user.firstname, "Bob");
        assert_eq!(user.full_name(), "Bob Stone");
        assert_eq!(user.bio(), "");
        assert_eq!(user.is_admin, Some(false));
        assert_eq!(user.article_count, Some(3));
        assert_eq!(user.avatar_path(), Some("/images/avatars/bob.png"));
    }

    #[test]
    fn test_user_with_long_field_names() {
        let json = r#"{"id":1,"username":"alice","firstname":"Alice","lastname":"Liddell","bio":"Down the hole","avatar":"  "}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.lastname, "Liddell");
        assert_eq!(user.bio(), "Down the hole");
        assert_eq!(user.is_admin, None);
        assert_eq!(user.avatar_path(), None);
    }

    #[test]
    fn test_credential_keeps_name_value_pairs() {
        let cred = SessionCredential::from_set_cookie([
            "authToken=abc.def; Max-Age=3600; Path=/; HttpOnly",
            "theme=dark; Path=/",
        ])
        .unwrap();
        assert_eq!(cred.cookie_header(), "authToken=abc.def; theme=dark");
    }

    #[test]
    fn test_credential_skips_cleared_cookies() {
        assert!(SessionCredential::from_set_cookie(["authToken=; Expires=Thu, 01 Jan 1970 00:00:00 GMT"]).is_none());
        assert!(SessionCredential::from_set_cookie(std::iter::empty()).is_none());
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let cred = SessionCredential::new("authToken=secret");
        assert!(!format!("{:?}", cred).contains("secret"));
    }

    #[test]
    fn test_session_lifecycle() {
        let mut session = Session::default();
        assert!(!session.is_authenticated());
        session.set(SessionCredential::new("a=1"));
        assert!(session.is_authenticated());
        assert_eq!(session.clear(), Some(SessionCredential::new("a=1")));
        assert!(session.credential().is_none());
    }
}
