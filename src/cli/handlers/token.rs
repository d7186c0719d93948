//! `issue-token` command handler

use crate::config::JwtConfig;
use crate::error::AppResult;
use crate::utils::jwt::{StaffRole, generate_token};

pub struct IssueTokenCommandHandler {
    config: JwtConfig,
}

impl IssueTokenCommandHandler {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    /// Signs a token; `hours` falls back to `jwt.token_expiration_hours`.
    pub fn execute(
        &self,
        subject: &str,
        name: &str,
        role: StaffRole,
        hours: Option<i64>,
    ) -> AppResult<String> {
        self.config.validate()?;

        let hours = hours.unwrap_or(self.config.token_expiration_hours);
        generate_token(
            subject.to_string(),
            name.to_string(),
            role,
            &self.config.secret,
            hours,
        )
    }
}
