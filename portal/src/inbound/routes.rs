//! Named destinations and role-aware view resolution.

use crate::domain::{AuthSession, Role};

/// Destination named by a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// `/`.
    Landing,
    /// `/auth/login`.
    Login,
    /// `/inscription`.
    Registration,
    /// `/dashboard`.
    Dashboard,
    /// Any other path.
    NotFound,
}

impl Destination {
    /// Map a request path to a destination.
    ///
    /// Query strings and fragments are ignored and trailing slashes are
    /// normalised.
    ///
    /// # Examples
    /// ```
    /// use portal::inbound::Destination;
    ///
    /// assert_eq!(Destination::from_path("/inscription/?step=2"), Destination::Registration);
    /// assert_eq!(Destination::from_path("/admin"), Destination::NotFound);
    /// ```
    pub fn from_path(path: &str) -> Self {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');
        match path {
            "" => Self::Landing,
            "/auth/login" => Self::Login,
            "/inscription" => Self::Registration,
            "/dashboard" => Self::Dashboard,
            _ => Self::NotFound,
        }
    }

    /// Canonical path, if the destination has one.
    pub fn path(self) -> Option<&'static str> {
        match self {
            Self::Landing => Some("/"),
            Self::Login => Some("/auth/login"),
            Self::Registration => Some("/inscription"),
            Self::Dashboard => Some("/dashboard"),
            Self::NotFound => None,
        }
    }
}

/// View the shell should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Public landing page.
    Landing,
    /// Sign-in form.
    Login,
    /// Enrolment wizard.
    RegistrationWizard,
    /// Application board for administrators.
    AdminDashboard,
    /// Student home.
    StudentDashboard,
    /// Session is still being restored.
    Loading,
    /// Unknown path.
    NotFound,
}

/// Resolve `destination` against the current session.
///
/// The dashboard branches on role and falls back to the login view when
/// nobody is signed in.
pub fn resolve(destination: Destination, session: &AuthSession) -> View {
    match destination {
        Destination::Landing => View::Landing,
        Destination::Login => View::Login,
        Destination::Registration => View::RegistrationWizard,
        Destination::NotFound => View::NotFound,
        Destination::Dashboard if session.is_loading() => View::Loading,
        Destination::Dashboard => match session.current_user().map(|user| user.role) {
            Some(Role::Admin) => View::AdminDashboard,
            Some(Role::Student) => View::StudentDashboard,
            None => View::Login,
        },
    }
}

/// Shorthand for `resolve(Destination::from_path(path), session)`.
pub fn resolve_path(path: &str, session: &AuthSession) -> View {
    resolve(Destination::from_path(path), session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::domain::ports::{FixtureLoginService, InMemoryTokenStore};
    use crate::test_support::ImmediateSleeper;
    use rstest::rstest;

    fn session() -> AuthSession {
        AuthSession::new(
            Arc::new(FixtureLoginService),
            Arc::new(InMemoryTokenStore::default()),
            Arc::new(ImmediateSleeper),
            Duration::ZERO,
        )
    }

    #[rstest]
    #[case("/", Destination::Landing)]
    #[case("", Destination::Landing)]
    #[case("/auth/login", Destination::Login)]
    #[case("/auth/login/", Destination::Login)]
    #[case("/inscription#documents", Destination::Registration)]
    #[case("/dashboard?tab=stats", Destination::Dashboard)]
    #[case("/dashboard/extra", Destination::NotFound)]
    #[case("/Dashboard", Destination::NotFound)]
    fn paths_map_to_destinations(#[case] path: &str, #[case] expected: Destination) {
        assert_eq!(Destination::from_path(path), expected);
    }

    #[rstest]
    fn dashboard_waits_for_restore_then_requires_login() {
        let mut session = session();
        assert_eq!(resolve_path("/dashboard", &session), View::Loading);
        session.restore();
        assert_eq!(resolve_path("/dashboard", &session), View::Login);
    }

    #[rstest]
    #[case("admin@university.com", "admin123", View::AdminDashboard)]
    #[case("student@example.com", "student123", View::StudentDashboard)]
    #[tokio::test]
    async fn dashboard_branches_on_role(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: View,
    ) {
        let mut session = session();
        session.restore();
        assert!(session.login(email, password).await);
        assert_eq!(resolve(Destination::Dashboard, &session), expected);
    }

    #[rstest]
    fn canonical_paths_round_trip() {
        for destination in [
            Destination::Landing,
            Destination::Login,
            Destination::Registration,
            Destination::Dashboard,
        ] {
            let path = destination.path().expect("routable destination");
            assert_eq!(Destination::from_path(path), destination);
        }
    }
}
