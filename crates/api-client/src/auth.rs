//! Login and registration. Both always send the researcher role.

use crate::client::ApiClient;
use crate::{ApiError, ApiResult, LOGIN_PATH, REGISTER_PATH};
use labora_core::constants::RESEARCHER_ROLE;
use labora_core::AuthUser;
use labora_types::{EmailAddress, NonEmptyText, Secret};
use serde::Serialize;

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a Secret,
    role: &'static str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a Secret,
    role: &'static str,
}

impl ApiClient {
    /// Signs in and returns the user record, token included.
    ///
    /// Pass the result to [`SessionContext::begin`](labora_core::SessionContext::begin).
    pub async fn login(&self, email: &EmailAddress, password: &Secret) -> ApiResult<AuthUser> {
        if password.is_empty() {
            return Err(labora_core::CoreError::MissingField("password").into());
        }
        let request = self.http().post(self.endpoint(LOGIN_PATH)).json(&LoginRequest {
            email: email.as_str(),
            password,
            role: RESEARCHER_ROLE,
        });
        let user: AuthUser = self
            .fetch("login", "Login gagal", request)
            .await?
            .ok_or(ApiError::MissingData("Login gagal"))?;
        tracing::info!(user_id = %user.id, "logged in");
        Ok(user)
    }

    /// Creates a researcher account. The caller still has to log in afterwards.
    pub async fn register(
        &self,
        name: &NonEmptyText,
        email: &EmailAddress,
        password: &Secret,
    ) -> ApiResult<()> {
        if password.is_empty() {
            return Err(labora_core::CoreError::MissingField("password").into());
        }
        let request = self
            .http()
            .post(self.endpoint(REGISTER_PATH))
            .json(&RegisterRequest {
                name: name.as_str(),
                email: email.as_str(),
                password,
                role: RESEARCHER_ROLE,
            });
        self.send("register", "Registrasi gagal", request).await?;
        tracing::info!(email = %email, "registered");
        Ok(())
    }
}
