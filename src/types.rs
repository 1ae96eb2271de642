use serde::{Deserialize, Serialize};

/// The signed-in player, as returned by the API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: u64,
    pub email: String,
    #[serde(default, alias = "display_name", alias = "username")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub two_factor_enabled: bool,
}

impl User {
    /// Name shown in the UI: display name, falling back to email.
    pub fn label(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }
}

/// Body of every endpoint that signs a user in.
///
/// Both fields are optional on the wire; a sign-in only counts when both
/// are present (see [`AuthResponse::into_parts`]).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

impl AuthResponse {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: Some(token.into()),
            user: Some(user),
        }
    }

    /// `(token, user)` when the response carries a usable session.
    pub fn into_parts(self) -> Option<(String, User)> {
        match (self.token, self.user) {
            (Some(token), Some(user)) if !token.is_empty() => Some((token, user)),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub email: String,
    pub display_name: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct TwoFactorLogin<'a> {
    pub email: &'a str,
    pub code: &'a str,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GoogleToken<'a> {
    pub id_token: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_response_requires_token_and_user() {
        let user = User {
            id: 7,
            email: "p@pong.dev".into(),
            ..User::default()
        };
        assert!(AuthResponse::new("t1", user.clone()).into_parts().is_some());
        assert!(AuthResponse {
            token: None,
            user: Some(user.clone())
        }
        .into_parts()
        .is_none());
        assert!(AuthResponse {
            token: Some(String::new()),
            user: Some(user)
        }
        .into_parts()
        .is_none());
        assert!(AuthResponse {
            token: Some("t".into()),
            user: None
        }
        .into_parts()
        .is_none());
    }

    #[test]
    fn user_parses_either_name_spelling() {
        let a: User =
            serde_json::from_str(r#"{"id":1,"email":"a@x","displayName":"Ace"}"#).unwrap();
        let b: User =
            serde_json::from_str(r#"{"id":1,"email":"a@x","display_name":"Ace"}"#).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.label(), "Ace");

        let c: User = serde_json::from_str(r#"{"email":"c@x"}"#).unwrap();
        assert_eq!(c.label(), "c@x");
    }
}
