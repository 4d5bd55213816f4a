//! Session context and hooks for the UI.
//!
//! [`AuthProvider`] constructs the one [`Backend`] client the whole app
//! shares, restores any persisted session, and exposes the viewer through
//! [`AuthState`]. Everything below it reads the same context; nothing
//! re-creates a client or re-derives the session per view.

use api::{queries, AuthUser, Backend, Profile, Session};
use dioxus::prelude::*;
use store::{AppConfig, PlatformStore, SessionStore};

/// The signed-in viewer, as the views see it.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<AuthUser>,
    /// The viewer's own profile row, loaded right after the session.
    pub profile: Option<Profile>,
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            profile: None,
            loading: true,
        }
    }
}

impl AuthState {
    /// Id of the signed-in user, if any.
    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.id.as_str())
    }
}

/// Get the current session state.
/// Returns a signal that updates when the user signs in or out.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

/// Get the shared backend client constructed by [`AuthProvider`].
pub fn use_backend() -> Backend {
    use_context::<Backend>()
}

/// Provider component that owns the backend client and session state.
/// Wrap the router with this component.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let backend = use_context_provider(|| Backend::from_config(&AppConfig::load()));
    let auth_state = use_signal(AuthState::default);
    use_context_provider(|| auth_state);

    // Restore the persisted session and load the viewer's profile on mount.
    let _ = use_resource(move || {
        let backend = backend.clone();
        let mut auth_state = auth_state;
        async move {
            let restored = match PlatformStore::default().load().await {
                Some(record) => Some(backend.restore(record)),
                None => None,
            };
            let user = restored.map(|session| session.user);
            let profile = if user.is_some() {
                load_own_profile(&backend).await
            } else {
                None
            };
            auth_state.set(AuthState {
                user,
                profile,
                loading: false,
            });
        }
    });

    rsx! {
        {children}
    }
}

/// Persist a fresh session and publish the signed-in viewer.
/// Called after a successful sign-in or sign-up exchange.
pub async fn adopt_session(backend: &Backend, mut auth_state: Signal<AuthState>, session: Session) {
    PlatformStore::default().save(&session.to_record()).await;
    let profile = load_own_profile(backend).await;
    auth_state.set(AuthState {
        user: Some(session.user),
        profile,
        loading: false,
    });
}

/// Clear the session everywhere: client slot, local persistence, context.
pub async fn sign_out(backend: &Backend, mut auth_state: Signal<AuthState>) {
    backend.sign_out().await;
    PlatformStore::default().clear().await;
    auth_state.set(AuthState {
        user: None,
        profile: None,
        loading: false,
    });
}

async fn load_own_profile(backend: &Backend) -> Option<Profile> {
    match queries::fetch_own_profile(backend).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!("failed to load own profile: {e}");
            None
        }
    }
}
