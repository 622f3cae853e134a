use crate::{
    auth::{PasswordHasher, Role, TokenPair, TokenService},
    db::dao::UserDao,
    error::AppError,
    services::user_service::{UserIdentity, UserService},
};

pub struct AuthService<'a> {
    identities: UserService,
    users: UserDao,
    tokens: &'a TokenService,
    hasher: &'a PasswordHasher,
}

impl<'a> AuthService<'a> {
    pub fn new(
        identities: UserService,
        users: UserDao,
        tokens: &'a TokenService,
        hasher: &'a PasswordHasher,
    ) -> Self {
        Self {
            identities,
            users,
            tokens,
            hasher,
        }
    }

    /// Creates the account and its placeholder role profile, then signs the
    /// caller in. Role and input validation happen before anything is
    /// written; the DB unique constraint is the duplicate-email backstop.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<(UserIdentity, TokenPair), AppError> {
        let role = Role::try_from(role).map_err(|_| AppError::invalid_role(role))?;

        // the email is stored as given; lookups are case-sensitive
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::validation("A valid email is required"));
        }

        let hash = self.hasher.hash(password)?;

        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::duplicate_email());
        }

        let user = self.users.create_with_profile(email, &hash, role).await?;
        let tokens = self.tokens.issue_pair(&user.id)?;
        let identity = self.identities.identity(user).await?;
        Ok((identity, tokens))
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(UserIdentity, TokenPair), AppError> {
        let user = self
            .users
            .find_by_email(email.trim())
            .await?
            .ok_or_else(AppError::invalid_credentials)?;

        if !self.hasher.verify(password, &user.password_hash) {
            return Err(AppError::invalid_credentials());
        }

        let tokens = self.tokens.issue_pair(&user.id)?;
        let identity = self.identities.identity(user).await?;
        Ok((identity, tokens))
    }

    /// Verifies the refresh token and re-checks that the subject still
    /// exists before issuing a fresh pair.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let subject = self.tokens.verify_refresh_token(refresh_token)?;
        self.users
            .find_by_id(&subject)
            .await?
            .ok_or_else(|| AppError::unauthenticated("Token is invalid or expired"))?;
        self.tokens.issue_pair(&subject)
    }

    /// Tokens are stateless; the client discards its pair. Kept for API
    /// symmetry with the other auth operations.
    pub fn logout(&self) {}
}
