use tokio::sync::watch;

use crate::models::User;

/// Current-user container shared by every view of the application.
///
/// Built once at startup and handed out by `Arc`. `set_value` is the only way
/// to change the user; observers get updates through `subscribe`.
#[derive(Debug)]
pub struct AuthContext {
    tx: watch::Sender<Option<User>>,
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthContext {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// The authenticated user, if any
    pub fn value(&self) -> Option<User> {
        self.tx.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Replace the current user. `None` clears it.
    pub fn set_value(&self, user: Option<User>) {
        self.tx.send_replace(user);
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserName;

    fn user() -> User {
        User {
            name: UserName {
                first: "Ada".to_string(),
                last: "Lovelace".to_string(),
            },
            email: "ada@example.com".to_string(),
            id: "1".to_string(),
            mobile: "5550000000".to_string(),
        }
    }

    #[test]
    fn test_starts_empty() {
        let ctx = AuthContext::new();
        assert!(ctx.value().is_none());
        assert!(!ctx.is_authenticated());
    }

    #[test]
    fn test_set_and_clear() {
        let ctx = AuthContext::new();
        ctx.set_value(Some(user()));
        assert_eq!(ctx.value(), Some(user()));

        ctx.set_value(None);
        assert!(ctx.value().is_none());
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let ctx = AuthContext::new();
        let mut rx = ctx.subscribe();

        ctx.set_value(Some(user()));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().as_ref().map(|u| u.id.as_str()), Some("1"));
    }
}
