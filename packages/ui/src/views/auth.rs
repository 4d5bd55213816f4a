//! Sign-in / sign-up page.
//!
//! One view toggles between the two modes. Validation runs client-side
//! before any request; the first violation surfaces as an error toast
//! and nothing is sent.

use dioxus::prelude::*;

use crate::components::{use_toast, Button, ButtonVariant, Input, Label, ToastOptions};
use crate::icons::{FaCamera, FaComment, FaHeart, FaUsers};
use crate::{adopt_session, use_auth, use_backend, Icon};

#[component]
pub fn AuthView(on_done: EventHandler<()>) -> Element {
    let auth = use_auth();
    let backend = use_backend();
    let toast = use_toast();

    let mut is_login = use_signal(|| true);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut username = use_signal(String::new);
    let mut full_name = use_signal(String::new);
    let mut loading = use_signal(|| false);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let backend = backend.clone();
        spawn(async move {
            if loading() {
                return;
            }
            let email_value = email().trim().to_string();
            let password_value = password();
            let username_value = username().trim().to_string();
            let full_name_value = full_name().trim().to_string();

            let violation = if is_login() {
                sign_in_violation(&email_value, &password_value)
            } else {
                sign_up_violation(
                    &email_value,
                    &password_value,
                    &username_value,
                    &full_name_value,
                )
            };
            if let Some(message) = violation {
                toast.error(message.to_string(), ToastOptions::new());
                return;
            }

            loading.set(true);
            if is_login() {
                match backend.sign_in(&email_value, &password_value).await {
                    Ok(session) => {
                        adopt_session(&backend, auth, session).await;
                        toast.success("Welcome back!".to_string(), ToastOptions::new());
                        on_done.call(());
                    }
                    Err(e) => {
                        let text = e.to_string();
                        let message = if text.contains("Invalid login credentials") {
                            "Invalid email or password".to_string()
                        } else {
                            text
                        };
                        toast.error(message, ToastOptions::new());
                    }
                }
            } else {
                match backend
                    .sign_up(
                        &email_value,
                        &password_value,
                        &username_value,
                        &full_name_value,
                    )
                    .await
                {
                    Ok(session) => {
                        adopt_session(&backend, auth, session).await;
                        toast.success(
                            "Account created successfully!".to_string(),
                            ToastOptions::new(),
                        );
                        on_done.call(());
                    }
                    Err(e) => {
                        let text = e.to_string();
                        let message = if text.contains("already registered") {
                            "This email is already registered".to_string()
                        } else {
                            text
                        };
                        toast.error(message, ToastOptions::new());
                    }
                }
            }
            loading.set(false);
        });
    };

    let state = auth();
    if !state.loading && state.user.is_some() {
        // The route wrapper redirects home.
        return rsx! {};
    }

    rsx! {
        div {
            class: "auth-page",
            div {
                class: "auth-page__brand",
                span {
                    class: "auth-page__brand-icon",
                    Icon { icon: FaCamera, width: 64, height: 64 }
                }
                h1 { "Lightbox" }
                p { "Share your moments, connect with friends" }
                div {
                    class: "auth-page__features",
                    div {
                        class: "auth-page__feature",
                        Icon { icon: FaHeart, width: 24, height: 24 }
                        span { "Like" }
                    }
                    div {
                        class: "auth-page__feature",
                        Icon { icon: FaComment, width: 24, height: 24 }
                        span { "Comment" }
                    }
                    div {
                        class: "auth-page__feature",
                        Icon { icon: FaUsers, width: 24, height: 24 }
                        span { "Follow" }
                    }
                }
            }

            div {
                class: "auth-page__panel",
                div {
                    class: "card auth-page__card",
                    h2 {
                        if is_login() { "Welcome back" } else { "Create account" }
                    }
                    p {
                        class: "auth-page__subtitle",
                        if is_login() {
                            "Sign in to your account to continue"
                        } else {
                            "Join our community today"
                        }
                    }

                    form {
                        onsubmit: handle_submit,
                        if !is_login() {
                            div {
                                class: "field-group",
                                Label { html_for: "username", "Username" }
                                Input {
                                    id: "username",
                                    placeholder: "johndoe",
                                    value: username(),
                                    oninput: move |evt: FormEvent| username.set(evt.value()),
                                }
                            }
                            div {
                                class: "field-group",
                                Label { html_for: "full-name", "Full Name" }
                                Input {
                                    id: "full-name",
                                    placeholder: "John Doe",
                                    value: full_name(),
                                    oninput: move |evt: FormEvent| full_name.set(evt.value()),
                                }
                            }
                        }

                        div {
                            class: "field-group",
                            Label { html_for: "email", "Email" }
                            Input {
                                id: "email",
                                r#type: "email",
                                placeholder: "john@example.com",
                                value: email(),
                                oninput: move |evt: FormEvent| email.set(evt.value()),
                            }
                        }
                        div {
                            class: "field-group",
                            Label { html_for: "password", "Password" }
                            Input {
                                id: "password",
                                r#type: "password",
                                placeholder: "••••••••",
                                value: password(),
                                oninput: move |evt: FormEvent| password.set(evt.value()),
                            }
                        }

                        Button {
                            variant: ButtonVariant::Primary,
                            class: "auth-page__submit",
                            r#type: "submit",
                            disabled: loading(),
                            if loading() {
                                "Please wait..."
                            } else if is_login() {
                                "Sign In"
                            } else {
                                "Create Account"
                            }
                        }
                    }

                    button {
                        class: "auth-page__mode-toggle",
                        onclick: move |_| {
                            let login = *is_login.peek();
                            is_login.set(!login);
                        },
                        if is_login() {
                            "Don't have an account? Sign up"
                        } else {
                            "Already have an account? Sign in"
                        }
                    }
                }
            }
        }
    }
}

/// First sign-in rule the input breaks, if any.
fn sign_in_violation(email: &str, password: &str) -> Option<&'static str> {
    if !valid_email(email) {
        return Some("Invalid email address");
    }
    if password.is_empty() {
        return Some("Password is required");
    }
    None
}

/// First sign-up rule the input breaks, if any.
fn sign_up_violation(
    email: &str,
    password: &str,
    username: &str,
    full_name: &str,
) -> Option<&'static str> {
    if !valid_email(email) {
        return Some("Invalid email address");
    }
    if password.chars().count() < 6 {
        return Some("Password must be at least 6 characters");
    }
    let username_len = username.chars().count();
    if username_len < 3 {
        return Some("Username must be at least 3 characters");
    }
    if username_len > 30 {
        return Some("Username too long");
    }
    if full_name.is_empty() {
        return Some("Full name is required");
    }
    None
}

fn valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(valid_email("john@example.com"));
        assert!(valid_email("a.b@mail.co.uk"));
        assert!(!valid_email("johnexample.com"));
        assert!(!valid_email("@example.com"));
        assert!(!valid_email("john@"));
        assert!(!valid_email("john@example"));
        assert!(!valid_email("john@@example.com"));
    }

    #[test]
    fn sign_in_rules_in_order() {
        assert_eq!(sign_in_violation("bad", "pw"), Some("Invalid email address"));
        assert_eq!(
            sign_in_violation("a@b.com", ""),
            Some("Password is required")
        );
        assert_eq!(sign_in_violation("a@b.com", "pw"), None);
    }

    #[test]
    fn sign_up_rules_in_order() {
        assert_eq!(
            sign_up_violation("bad", "", "", ""),
            Some("Invalid email address")
        );
        assert_eq!(
            sign_up_violation("a@b.com", "12345", "jo", ""),
            Some("Password must be at least 6 characters")
        );
        assert_eq!(
            sign_up_violation("a@b.com", "123456", "jo", ""),
            Some("Username must be at least 3 characters")
        );
        let long = "x".repeat(31);
        assert_eq!(
            sign_up_violation("a@b.com", "123456", &long, "John"),
            Some("Username too long")
        );
        assert_eq!(
            sign_up_violation("a@b.com", "123456", "john", ""),
            Some("Full name is required")
        );
        assert_eq!(sign_up_violation("a@b.com", "123456", "john", "John"), None);
    }
}
