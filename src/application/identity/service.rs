//! Credential store: registration and password checks
//!
//! Passwords are hashed here, explicitly, before the repository is asked to
//! persist anything. Every read goes to storage; nothing is cached.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{
    CreateUserDto, DomainError, DomainResult, User, UserId, UserRepositoryInterface,
};
use crate::infrastructure::crypto::password::{hash_password, verify_password};

pub struct CredentialStore {
    repo: Arc<dyn UserRepositoryInterface>,
    bcrypt_cost: u32,
}

impl CredentialStore {
    pub fn new(repo: Arc<dyn UserRepositoryInterface>, bcrypt_cost: u32) -> Self {
        Self { repo, bcrypt_cost }
    }

    // ── Registration ────────────────────────────────────────────

    /// Register a new user. The username is trimmed and HTML-escaped; the
    /// password is hashed before the record reaches storage.
    pub async fn register(&self, username: &str, password: &str) -> DomainResult<User> {
        let username = normalize_username(username);
        if username.is_empty() {
            return Err(DomainError::Validation("username is required".into()));
        }
        if password.is_empty() {
            return Err(DomainError::Validation("password is required".into()));
        }

        let password_hash = self.hash(password).await?;

        let user = self
            .repo
            .create_user(CreateUserDto {
                username,
                password_hash,
            })
            .await?;

        info!(user_id = user.id, username = %user.username, "New user registered");
        Ok(user)
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Exact, case-sensitive lookup.
    pub async fn find_by_username(&self, username: &str) -> DomainResult<User> {
        self.repo
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", "username", username))
    }

    pub async fn find_by_id(&self, id: UserId, include_entries: bool) -> DomainResult<User> {
        self.repo
            .get_user_by_id(id, include_entries)
            .await?
            .ok_or_else(|| DomainError::not_found("user", "id", id))
    }

    // ── Authentication ──────────────────────────────────────────

    /// Compare `candidate` against the stored hash. A malformed stored hash
    /// counts as a mismatch.
    pub async fn verify_password(&self, user: &User, candidate: &str) -> DomainResult<()> {
        let candidate = candidate.to_owned();
        let hash = user.password_hash.clone();

        let matches = tokio::task::spawn_blocking(move || verify_password(&candidate, &hash))
            .await
            .map_err(|e| DomainError::Internal(format!("password check aborted: {}", e)))?;

        match matches {
            Ok(true) => Ok(()),
            Ok(false) => Err(DomainError::InvalidPassword),
            Err(e) => {
                debug!(user_id = user.id, error = %e, "Stored password hash is unreadable");
                Err(DomainError::InvalidPassword)
            }
        }
    }

    /// Login check: the username goes through the same normalization as at
    /// registration, then the password is verified.
    pub async fn authenticate(&self, username: &str, password: &str) -> DomainResult<User> {
        let user = self.find_by_username(&normalize_username(username)).await?;
        self.verify_password(&user, password).await?;
        Ok(user)
    }

    async fn hash(&self, password: &str) -> DomainResult<String> {
        let password = password.to_owned();
        let cost = self.bcrypt_cost;

        tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| DomainError::Internal(format!("password hashing aborted: {}", e)))?
            .map_err(|e| DomainError::Internal(format!("failed to hash password: {}", e)))
    }
}

// ── Helpers ─────────────────────────────────────────────────────

/// Trim surrounding whitespace and escape `<`, `>`, `&`, `'` and `"`.
pub fn normalize_username(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut out = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&#34;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::crypto::password::{MAX_COST, MIN_COST};
    use crate::infrastructure::database::repositories::UserRepository;
    use crate::infrastructure::database::test_database;

    async fn store() -> CredentialStore {
        let repo = Arc::new(UserRepository::new(test_database().await));
        CredentialStore::new(repo, MIN_COST)
    }

    #[test]
    fn test_normalize_username() {
        assert_eq!(normalize_username("  alice \n"), "alice");
        assert_eq!(
            normalize_username("<b>\"tom\" & 'jerry'</b>"),
            "&lt;b&gt;&#34;tom&#34; &amp; &#39;jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(normalize_username("   "), "");
    }

    #[tokio::test]
    async fn test_register_hashes_before_storing() {
        let store = store().await;
        let user = store.register("alice", "secret123").await.unwrap();

        let stored = store.find_by_username("alice").await.unwrap();
        assert_eq!(stored.id, user.id);
        assert_ne!(stored.password_hash, "secret123");
        assert!(stored.password_hash.starts_with("$2"));
        store.verify_password(&stored, "secret123").await.unwrap();
    }

    #[tokio::test]
    async fn test_register_normalizes_username() {
        let store = store().await;
        let user = store.register("  <alice>  ", "pw").await.unwrap();
        assert_eq!(user.username, "&lt;alice&gt;");
        assert!(store.find_by_username("&lt;alice&gt;").await.is_ok());
    }

    #[tokio::test]
    async fn test_register_requires_fields() {
        let store = store().await;
        assert!(matches!(
            store.register("   ", "pw").await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            store.register("alice", "").await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_registration_keeps_first() {
        let store = store().await;
        let first = store.register("alice", "first-pw").await.unwrap();

        let second = store.register(" alice ", "second-pw").await;
        assert!(matches!(second, Err(DomainError::DuplicateUsername(_))));

        let stored = store.find_by_username("alice").await.unwrap();
        assert_eq!(stored.id, first.id);
        store.verify_password(&stored, "first-pw").await.unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_registrations_have_one_winner() {
        let store = Arc::new(store().await);

        let a = tokio::spawn({
            let store = store.clone();
            async move { store.register("racer", "pw-a").await }
        });
        let b = tokio::spawn({
            let store = store.clone();
            async move { store.register("racer", "pw-b").await }
        });
        let results = [a.await.unwrap(), b.await.unwrap()];

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(
            results
                .iter()
                .filter(|r| matches!(r, Err(DomainError::DuplicateUsername(_))))
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_hashing_failure_is_internal() {
        let repo = Arc::new(UserRepository::new(test_database().await));
        let store = CredentialStore::new(repo, MAX_COST + 1);

        assert!(matches!(
            store.register("alice", "secret123").await,
            Err(DomainError::Internal(_))
        ));
        assert!(store.find_by_username("alice").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let store = store().await;
        let user = store.register("alice", "secret123").await.unwrap();
        assert!(matches!(
            store.verify_password(&user, "secret124").await,
            Err(DomainError::InvalidPassword)
        ));
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let store = store().await;
        assert!(store.find_by_username("ghost").await.unwrap_err().is_not_found());
        assert!(store.find_by_id(77, true).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_authenticate() {
        let store = store().await;
        let user = store.register("alice", "secret123").await.unwrap();

        assert_eq!(store.authenticate(" alice", "secret123").await.unwrap().id, user.id);
        assert!(matches!(
            store.authenticate("alice", "nope").await,
            Err(DomainError::InvalidPassword)
        ));
        assert!(store.authenticate("bob", "secret123").await.unwrap_err().is_not_found());
    }
}
