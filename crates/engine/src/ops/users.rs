use chrono::{Duration, Utc};
use rand::Rng;
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};
use uuid::Uuid;

use super::{Engine, normalize_required_name, with_tx};
use crate::{
    CreateUserCmd, EngineError, RegisterUserCmd, ResultEngine, Role, SsoUserCmd, User, users,
};

const BCRYPT_COST: u32 = 10;
const OTP_TTL_MINUTES: i64 = 5;

impl Engine {
    /// Registers a local account and returns it together with the
    /// one-time code to send by mail. The account cannot log in until
    /// [`Engine::verify_otp`] confirms the address.
    pub async fn register_user(&self, cmd: RegisterUserCmd) -> ResultEngine<(User, String)> {
        let email = normalize_email(&cmd.email)?;
        let first_name = normalize_required_name(&cmd.first_name, "first name")?;
        let last_name = normalize_required_name(&cmd.last_name, "last name")?;
        let password = hash_password(&cmd.password)?;
        let otp = generate_otp();

        with_tx!(self, |db_tx| {
            if self.find_user_by_email(&db_tx, &email).await?.is_some() {
                return Err(EngineError::ExistingKey(email));
            }
            let mut user = User::new(email, first_name, last_name);
            user.password = Some(password);
            user.otp_code = Some(otp.clone());
            user.otp_expires_at = Some(user.created_at + Duration::minutes(OTP_TTL_MINUTES));
            users::ActiveModel::from(&user).insert(&db_tx).await?;
            Ok((user, otp))
        })
    }

    /// Confirms the one-time code sent at registration and marks the
    /// address verified.
    pub async fn verify_otp(&self, email: &str, otp: &str) -> ResultEngine<User> {
        let email = normalize_email(email)?;
        let otp = otp.trim();

        with_tx!(self, |db_tx| {
            let model = self
                .find_user_by_email(&db_tx, &email)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(email.clone()))?;
            let mut user = User::try_from(model)?;
            if user.email_verified_at.is_some() {
                return Err(EngineError::Validation(
                    "email already verified".to_string(),
                ));
            }
            let (Some(code), Some(expires_at)) = (user.otp_code.as_deref(), user.otp_expires_at)
            else {
                return Err(EngineError::Validation(
                    "no verification code pending".to_string(),
                ));
            };
            if code != otp {
                return Err(EngineError::Validation(
                    "invalid verification code".to_string(),
                ));
            }
            if expires_at < Utc::now() {
                return Err(EngineError::Validation(
                    "verification code expired".to_string(),
                ));
            }
            let now = Utc::now();
            user.email_verified_at = Some(now);
            user.otp_code = None;
            user.otp_expires_at = None;
            user.updated_at = now;
            let update = users::ActiveModel {
                id: ActiveValue::Set(user.id.to_string()),
                otp_code: ActiveValue::Set(None),
                otp_expires_at: ActiveValue::Set(None),
                email_verified_at: ActiveValue::Set(user.email_verified_at),
                updated_at: ActiveValue::Set(user.updated_at),
                ..Default::default()
            };
            update.update(&db_tx).await?;
            Ok(user)
        })
    }

    /// Checks credentials for a verified local account.
    ///
    /// Unknown address, missing password (SSO-only account) and a
    /// wrong password all map to the same `Unauthorized` answer.
    pub async fn login_user(&self, email: &str, password: &str) -> ResultEngine<User> {
        let email = normalize_email(email)?;

        with_tx!(self, |db_tx| {
            let Some(model) = self.find_user_by_email(&db_tx, &email).await? else {
                return Err(bad_credentials());
            };
            let user = User::try_from(model)?;
            let Some(hash) = user.password.as_deref() else {
                return Err(bad_credentials());
            };
            let verified = bcrypt::verify(password, hash)
                .map_err(|_| EngineError::Internal("password verification failed".to_string()))?;
            if !verified {
                return Err(bad_credentials());
            }
            if user.email_verified_at.is_none() {
                return Err(EngineError::Forbidden("email not verified".to_string()));
            }
            Ok(user)
        })
    }

    /// Creates or refreshes an account from identity-provider claims.
    /// SSO accounts count as verified from the start.
    pub async fn upsert_sso_user(&self, cmd: SsoUserCmd) -> ResultEngine<User> {
        let email = normalize_email(&cmd.email)?;

        with_tx!(self, |db_tx| {
            match self.find_user_by_email(&db_tx, &email).await? {
                Some(model) => {
                    let mut user = User::try_from(model)?;
                    if let Some(first_name) = cmd.first_name {
                        user.first_name = first_name;
                    }
                    if let Some(last_name) = cmd.last_name {
                        user.last_name = last_name;
                    }
                    if cmd.avatar.is_some() {
                        user.avatar = cmd.avatar;
                    }
                    if let Some(role) = cmd.role {
                        user.role = role;
                    }
                    if user.email_verified_at.is_none() {
                        user.email_verified_at = Some(Utc::now());
                    }
                    user.updated_at = Utc::now();
                    let update = users::ActiveModel {
                        id: ActiveValue::Set(user.id.to_string()),
                        first_name: ActiveValue::Set(user.first_name.clone()),
                        last_name: ActiveValue::Set(user.last_name.clone()),
                        avatar: ActiveValue::Set(user.avatar.clone()),
                        role: ActiveValue::Set(user.role.as_str().to_string()),
                        email_verified_at: ActiveValue::Set(user.email_verified_at),
                        updated_at: ActiveValue::Set(user.updated_at),
                        ..Default::default()
                    };
                    update.update(&db_tx).await?;
                    Ok(user)
                }
                None => {
                    let mut user = User::new(
                        email,
                        cmd.first_name.unwrap_or_default(),
                        cmd.last_name.unwrap_or_default(),
                    );
                    user.avatar = cmd.avatar;
                    user.role = cmd.role.unwrap_or_default();
                    user.email_verified_at = Some(user.created_at);
                    users::ActiveModel::from(&user).insert(&db_tx).await?;
                    Ok(user)
                }
            }
        })
    }

    pub async fn find_user(&self, user_id: Uuid) -> ResultEngine<User> {
        with_tx!(self, |db_tx| {
            let model = self.require_user_by_id(&db_tx, user_id).await?;
            User::try_from(model)
        })
    }

    /// Looks up an account by its email address.
    pub async fn user_by_email(&self, email: &str) -> ResultEngine<User> {
        let email = normalize_email(email)?;

        with_tx!(self, |db_tx| {
            let model = self
                .find_user_by_email(&db_tx, &email)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(email.clone()))?;
            User::try_from(model)
        })
    }

    /// Changes the role of an existing account, addressed by email.
    pub async fn set_user_role(&self, email: &str, role: Role) -> ResultEngine<User> {
        let email = normalize_email(email)?;

        with_tx!(self, |db_tx| {
            let model = self
                .find_user_by_email(&db_tx, &email)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound(email.clone()))?;
            let mut user = User::try_from(model)?;
            user.role = role;
            user.updated_at = Utc::now();
            let update = users::ActiveModel {
                id: ActiveValue::Set(user.id.to_string()),
                role: ActiveValue::Set(role.as_str().to_string()),
                updated_at: ActiveValue::Set(user.updated_at),
                ..Default::default()
            };
            update.update(&db_tx).await?;
            Ok(user)
        })
    }

    /// Creates a verified account directly, bypassing the OTP flow.
    /// Meant for bootstrap tooling, not for the public API.
    pub async fn create_user(&self, cmd: CreateUserCmd) -> ResultEngine<User> {
        let email = normalize_email(&cmd.email)?;
        let first_name = normalize_required_name(&cmd.first_name, "first name")?;
        let last_name = normalize_required_name(&cmd.last_name, "last name")?;
        let password = hash_password(&cmd.password)?;

        with_tx!(self, |db_tx| {
            if self.find_user_by_email(&db_tx, &email).await?.is_some() {
                return Err(EngineError::ExistingKey(email));
            }
            let mut user = User::new(email, first_name, last_name);
            user.password = Some(password);
            user.role = cmd.role;
            user.email_verified_at = Some(user.created_at);
            users::ActiveModel::from(&user).insert(&db_tx).await?;
            Ok(user)
        })
    }
}

fn normalize_email(value: &str) -> ResultEngine<String> {
    let email = value.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(EngineError::Validation("invalid email address".to_string()));
    }
    Ok(email)
}

fn hash_password(password: &str) -> ResultEngine<String> {
    if password.is_empty() {
        return Err(EngineError::Validation(
            "password must not be empty".to_string(),
        ));
    }
    bcrypt::hash(password, BCRYPT_COST)
        .map_err(|_| EngineError::Internal("password hashing failed".to_string()))
}

fn generate_otp() -> String {
    let code: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{code:06}")
}

fn bad_credentials() -> EngineError {
    EngineError::Unauthorized("invalid email or password".to_string())
}
