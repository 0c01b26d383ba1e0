use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserName {
    pub first: String,
    pub last: String,
}

/// Identity record returned by the login endpoint.
///
/// Replaced wholesale on login/logout, never patched field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: UserName,
    pub email: String,
    pub id: String,
    pub mobile: String,
}

impl User {
    pub fn full_name(&self) -> String {
        let first = self.name.first.trim();
        let last = self.name.last.trim();
        match (first.is_empty(), last.is_empty()) {
            (false, false) => format!("{} {}", first, last),
            (false, true) => first.to_string(),
            (true, false) => last.to_string(),
            (true, true) => self.email.clone(),
        }
    }
}

/// Body of a successful `POST /login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: &str, last: &str) -> User {
        User {
            name: UserName {
                first: first.to_string(),
                last: last.to_string(),
            },
            email: "user@example.com".to_string(),
            id: "1".to_string(),
            mobile: "5551234567".to_string(),
        }
    }

    #[test]
    fn test_full_name() {
        assert_eq!(user("Ada", "Lovelace").full_name(), "Ada Lovelace");
        assert_eq!(user("Ada", "").full_name(), "Ada");
        assert_eq!(user("", "Lovelace").full_name(), "Lovelace");
        assert_eq!(user(" ", "").full_name(), "user@example.com");
    }

    #[test]
    fn test_parse_login_response() {
        let json = r#"{"user":{"name":{"first":"Ada","last":"Lovelace"},"email":"user@example.com","id":"42","mobile":"5551234567"},"accessToken":"a.b.c"}"#;

        let resp: LoginResponse =
            serde_json::from_str(json).expect("Failed to parse login test JSON");
        assert_eq!(resp.access_token, "a.b.c");
        assert_eq!(resp.user.id, "42");
        assert_eq!(resp.user.name.first, "Ada");
    }
}
