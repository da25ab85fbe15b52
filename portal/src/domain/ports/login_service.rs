//! Driving port for authenticating portal users.
//!
//! The session context calls this port and never sees how accounts are
//! stored. Unknown users and wrong passwords share one generic error.

use async_trait::async_trait;

use crate::domain::{DomainError, LoginCredentials, Role, SessionUser};

/// User and opaque token returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authenticated {
    /// Identity to expose through the session.
    pub user: SessionUser,
    /// Opaque token persisted by the session.
    pub token: String,
}

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user.
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Authenticated, DomainError>;
}

struct FixtureAccount {
    email: &'static str,
    password: &'static str,
    id: &'static str,
    name: &'static str,
    role: Role,
    token: &'static str,
}

const FIXTURE_ACCOUNTS: [FixtureAccount; 2] = [
    FixtureAccount {
        email: "admin@university.com",
        password: "admin123",
        id: "1",
        name: "Administrateur",
        role: Role::Admin,
        token: "admin-token",
    },
    FixtureAccount {
        email: "student@example.com",
        password: "student123",
        id: "2",
        name: "Étudiant Test",
        role: Role::Student,
        token: "student-token",
    },
];

/// Mock authenticator holding one admin and one student account.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Authenticated, DomainError> {
        FIXTURE_ACCOUNTS
            .iter()
            .find(|account| {
                account.email == credentials.email() && account.password == credentials.password()
            })
            .map(|account| Authenticated {
                user: SessionUser {
                    id: account.id.to_owned(),
                    email: account.email.to_owned(),
                    name: account.name.to_owned(),
                    role: account.role,
                },
                token: account.token.to_owned(),
            })
            .ok_or_else(|| DomainError::unauthorized("invalid credentials"))
    }
}
