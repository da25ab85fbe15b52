//! Integration tests for the authentication session and dashboard routing.

use std::sync::Arc;
use std::time::Duration;

use portal::domain::AuthSession;
use portal::domain::ports::{FixtureLoginService, SessionTokenStore};
use portal::inbound::{View, resolve_path};
use portal::outbound::FileTokenStore;
use portal::test_support::RecordingSleeper;
use rstest::{fixture, rstest};
use tempfile::TempDir;

struct Harness {
    _dir: TempDir,
    tokens: Arc<FileTokenStore>,
    sleeper: Arc<RecordingSleeper>,
}

impl Harness {
    fn session(&self) -> AuthSession {
        AuthSession::new(
            Arc::new(FixtureLoginService),
            self.tokens.clone(),
            self.sleeper.clone(),
            Duration::from_millis(1_000),
        )
    }
}

#[fixture]
fn harness() -> Harness {
    let dir = tempfile::tempdir().expect("temp dir");
    let tokens = Arc::new(FileTokenStore::open(dir.path()).expect("token store"));
    Harness {
        _dir: dir,
        tokens,
        sleeper: Arc::new(RecordingSleeper::default()),
    }
}

#[rstest]
#[tokio::test]
async fn admin_login_lands_on_admin_dashboard(harness: Harness) {
    let mut session = harness.session();
    assert_eq!(resolve_path("/dashboard", &session), View::Loading);
    assert!(session.restore().is_none());

    assert!(session.login("admin@university.com", "admin123").await);

    assert_eq!(resolve_path("/dashboard/", &session), View::AdminDashboard);
    assert_eq!(
        harness.tokens.load().expect("load").as_deref(),
        Some("admin-token")
    );
    assert_eq!(harness.sleeper.recorded(), vec![Duration::from_millis(1_000)]);
}

#[rstest]
#[case("admin@university.com", "wrong")]
#[case("x@x.com", "wrong")]
#[case("nobody@example.com", "admin123")]
#[case("", "admin123")]
#[tokio::test]
async fn rejected_login_stays_signed_out(
    harness: Harness,
    #[case] email: &str,
    #[case] password: &str,
) {
    let mut session = harness.session();
    session.restore();

    assert!(!session.login(email, password).await);

    assert!(session.current_user().is_none());
    assert_eq!(resolve_path("/dashboard", &session), View::Login);
    assert_eq!(harness.tokens.load().expect("load"), None);
}

#[rstest]
#[tokio::test]
async fn stored_token_rehydrates_as_student_until_logout(harness: Harness) {
    {
        let mut first = harness.session();
        first.restore();
        assert!(first.login("admin@university.com", "admin123").await);
    }

    let mut restarted = harness.session();
    let user = restarted.restore().expect("token rehydrates").clone();
    assert_eq!(user.email, "user@example.com");
    assert_eq!(resolve_path("/dashboard", &restarted), View::StudentDashboard);

    restarted.logout();
    assert_eq!(harness.tokens.load().expect("load"), None);
    assert_eq!(resolve_path("/dashboard", &restarted), View::Login);

    let mut after_logout = harness.session();
    assert!(after_logout.restore().is_none());
}

#[rstest]
#[case("/", View::Landing)]
#[case("/auth/login", View::Login)]
#[case("/inscription", View::RegistrationWizard)]
#[case("/unknown/page", View::NotFound)]
fn public_paths_ignore_the_session(harness: Harness, #[case] path: &str, #[case] expected: View) {
    let session = harness.session();
    assert_eq!(resolve_path(path, &session), expected);
}
