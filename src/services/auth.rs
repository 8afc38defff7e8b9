use actix_web::{
    Error as ActixError, FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized,
    web::Data,
};
use anyhow::{Result, anyhow};
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::future::{Ready, ready};
use uuid::Uuid;

use crate::config::Config;
use crate::database::models::{AuthResponse, LoginInput, RegisterInput, Role, User};
use crate::database::repositories::{
    DepartmentRepository, LeaveTypeRepository, OrganizationRepository, UserRepository,
};
use crate::error::AppError;

/// Outcome of a signup attempt; a taken email is a value, not an error.
#[derive(Debug)]
pub enum RegisterOutcome {
    Registered(Box<AuthResponse>),
    EmailTaken,
}

/// Outcome of a login attempt. Bad credentials are a value; database and
/// hashing failures stay errors so they are not reported as unauthorized.
#[derive(Debug)]
pub enum LoginOutcome {
    Authenticated(Box<AuthResponse>),
    InvalidCredentials,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub organization_id: Uuid,
    pub role: Role,
    pub exp: usize,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_hr(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Hr)
    }

    pub fn is_manager(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Hr | Role::Manager)
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin role required".to_string()))
        }
    }

    pub fn require_hr(&self) -> Result<(), AppError> {
        if self.is_hr() {
            Ok(())
        } else {
            Err(AppError::Forbidden("HR role required".to_string()))
        }
    }

    pub fn require_manager(&self) -> Result<(), AppError> {
        if self.is_manager() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Manager role required".to_string()))
        }
    }

    /// Employees may only act on their own records; managers and above may
    /// act on anyone in their organization.
    pub fn require_self_or_manager(&self, user_id: Uuid) -> Result<(), AppError> {
        if self.sub == user_id || self.is_manager() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Cannot act on other users' records".to_string(),
            ))
        }
    }
}

impl FromRequest for Claims {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "));

        if let (Some(token), Some(config)) = (token, req.app_data::<Data<Config>>()) {
            match decode::<Claims>(
                token,
                &DecodingKey::from_secret(config.jwt_secret.as_ref()),
                &Validation::new(Algorithm::HS256),
            ) {
                Ok(token_data) => return ready(Ok(token_data.claims)),
                Err(_) => return ready(Err(ErrorUnauthorized("Invalid token"))),
            }
        }

        ready(Err(ErrorUnauthorized(
            "Missing or invalid authorization header",
        )))
    }
}

#[derive(Clone)]
pub struct AuthService {
    user_repository: UserRepository,
    organization_repository: OrganizationRepository,
    leave_type_repository: LeaveTypeRepository,
    department_repository: DepartmentRepository,
    pool: sqlx::PgPool,
    config: Config,
}

impl AuthService {
    pub fn new(
        config: Config,
        pool: sqlx::PgPool,
        user_repository: UserRepository,
        organization_repository: OrganizationRepository,
        leave_type_repository: LeaveTypeRepository,
        department_repository: DepartmentRepository,
    ) -> Self {
        Self {
            user_repository,
            organization_repository,
            leave_type_repository,
            department_repository,
            pool,
            config,
        }
    }

    /// Admin signup: organization, its first admin user, and the seeded
    /// default catalogs are created in one transaction.
    pub async fn register(&self, input: RegisterInput) -> Result<RegisterOutcome> {
        if self.user_repository.email_exists(&input.email).await? {
            return Ok(RegisterOutcome::EmailTaken);
        }

        let password_hash = hash(&input.password, DEFAULT_COST)?;
        let slug = self
            .organization_repository
            .unique_slug(&input.organization_name)
            .await?;

        let mut tx = self.pool.begin().await?;

        let organization = self
            .organization_repository
            .create_in_tx(&mut tx, &input.organization_name, &slug)
            .await?;

        let user = User::new(
            organization.id,
            input.email,
            password_hash,
            input.name,
            Role::Admin,
        );
        self.user_repository
            .create_user_in_tx(&mut tx, &user)
            .await?;

        self.leave_type_repository
            .seed_defaults_in_tx(&mut tx, organization.id)
            .await?;
        self.department_repository
            .seed_defaults_in_tx(&mut tx, organization.id)
            .await?;

        tx.commit().await?;

        let token = self.generate_token(&user)?;

        Ok(RegisterOutcome::Registered(Box::new(AuthResponse {
            token,
            user: user.into(),
            organization,
        })))
    }

    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(&self, input: LoginInput) -> Result<LoginOutcome> {
        let Some(user) = self.user_repository.find_by_email(&input.email).await? else {
            return Ok(LoginOutcome::InvalidCredentials);
        };

        if !verify(&input.password, &user.password_hash)? {
            return Ok(LoginOutcome::InvalidCredentials);
        }

        let organization = self
            .organization_repository
            .find_by_id(user.organization_id)
            .await?
            .ok_or_else(|| anyhow!("Organization missing for user {}", user.id))?;

        let token = self.generate_token(&user)?;

        Ok(LoginOutcome::Authenticated(Box::new(AuthResponse {
            token,
            user: user.into(),
            organization,
        })))
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<User> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| anyhow!("User not found"))
    }

    fn generate_token(&self, user: &User) -> Result<String> {
        let expiration = Utc::now()
            .checked_add_signed(Duration::days(self.config.jwt_expiration_days))
            .ok_or_else(|| anyhow!("Invalid expiration timestamp"))?
            .timestamp() as usize;

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            organization_id: user.organization_id,
            role: user.role,
            exp: expiration,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_ref()),
        )?;

        Ok(token)
    }
}
