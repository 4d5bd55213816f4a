//! New-post form: image URL with live preview, caption with a character
//! budget, submit.

use api::queries;
use dioxus::prelude::*;

use crate::components::{use_toast, Button, ButtonVariant, Input, Label, TextArea, ToastOptions};
use crate::icons::{FaCamera, FaImage, FaXmark};
use crate::{use_auth, use_backend, Icon};

const CAPTION_LIMIT: usize = 2200;

#[component]
pub fn CreatePostView(on_done: EventHandler<()>) -> Element {
    let auth = use_auth();
    let backend = use_backend();
    let toast = use_toast();

    let mut image_url = use_signal(String::new);
    let mut caption = use_signal(String::new);
    let mut loading = use_signal(|| false);
    let mut preview_error = use_signal(|| false);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let backend = backend.clone();
        spawn(async move {
            if loading() {
                return;
            }
            let url = image_url();
            let text = caption();
            if !valid_image_url(&url) {
                toast.error("Please enter a valid image URL".to_string(), ToastOptions::new());
                return;
            }
            if text.chars().count() > CAPTION_LIMIT {
                toast.error("Caption is too long".to_string(), ToastOptions::new());
                return;
            }

            loading.set(true);
            let caption_field = if text.is_empty() { None } else { Some(text.as_str()) };
            match queries::create_post(&backend, &url, caption_field).await {
                Ok(()) => {
                    toast.success("Post created successfully!".to_string(), ToastOptions::new());
                    on_done.call(());
                }
                Err(e) => {
                    tracing::warn!("post creation failed: {e}");
                    toast.error("Failed to create post".to_string(), ToastOptions::new());
                    loading.set(false);
                }
            }
        });
    };

    let state = auth();
    if state.loading {
        return rsx! {
            div {
                class: "splash",
                Icon { icon: FaCamera, width: 48, height: 48 }
            }
        };
    }
    if state.user.is_none() {
        // The route wrapper redirects to the auth page.
        return rsx! {};
    }

    let count = caption().chars().count();

    rsx! {
        div {
            class: "create-post",
            div {
                class: "card",
                h2 {
                    class: "create-post__title",
                    span {
                        class: "create-post__title-icon",
                        Icon { icon: FaImage, width: 18, height: 18 }
                    }
                    "Create New Post"
                }

                form {
                    onsubmit: handle_submit,
                    div {
                        class: "field-group",
                        Label { html_for: "image-url", "Image URL" }
                        Input {
                            id: "image-url",
                            r#type: "url",
                            placeholder: "https://example.com/image.jpg",
                            value: image_url(),
                            oninput: move |evt: FormEvent| {
                                image_url.set(evt.value());
                                preview_error.set(false);
                            },
                        }

                        if image_url().is_empty() {
                            div {
                                class: "create-post__placeholder",
                                span {
                                    class: "create-post__placeholder-icon",
                                    Icon { icon: FaImage, width: 32, height: 32 }
                                }
                                p { "Enter an image URL to preview" }
                            }
                        } else if preview_error() {
                            div {
                                class: "create-post__preview create-post__preview--failed",
                                p { "Unable to load image" }
                            }
                        } else {
                            div {
                                class: "create-post__preview",
                                img {
                                    src: "{image_url()}",
                                    alt: "Preview",
                                    onerror: move |_| preview_error.set(true),
                                }
                                button {
                                    class: "create-post__clear",
                                    r#type: "button",
                                    onclick: move |_| image_url.set(String::new()),
                                    Icon { icon: FaXmark, width: 14, height: 14 }
                                }
                            }
                        }
                    }

                    div {
                        class: "field-group",
                        Label { html_for: "caption", "Caption" }
                        TextArea {
                            id: "caption",
                            placeholder: "Write a caption...",
                            value: caption(),
                            rows: 5,
                            oninput: move |evt: FormEvent| caption.set(evt.value()),
                        }
                        p {
                            class: "create-post__count",
                            "{count}/{CAPTION_LIMIT}"
                        }
                    }

                    Button {
                        variant: ButtonVariant::Primary,
                        class: "create-post__submit",
                        r#type: "submit",
                        disabled: loading() || image_url().is_empty(),
                        if loading() { "Creating..." } else { "Share Post" }
                    }
                }
            }
        }
    }
}

/// Accept only absolute http(s) URLs with a host part.
fn valid_image_url(url: &str) -> bool {
    let Some(rest) = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
    else {
        return false;
    };
    !rest.is_empty() && !rest.starts_with('/') && !url.contains(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::valid_image_url;

    #[test]
    fn accepts_http_and_https() {
        assert!(valid_image_url("https://example.com/image.jpg"));
        assert!(valid_image_url("http://localhost:8000/a.png"));
    }

    #[test]
    fn rejects_other_shapes() {
        assert!(!valid_image_url(""));
        assert!(!valid_image_url("example.com/image.jpg"));
        assert!(!valid_image_url("ftp://example.com/image.jpg"));
        assert!(!valid_image_url("https://"));
        assert!(!valid_image_url("https:///image.jpg"));
        assert!(!valid_image_url("https://exa mple.com/a.jpg"));
    }
}
