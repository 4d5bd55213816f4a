use dioxus::prelude::*;

const DEFAULT_DURATION_MS: u64 = 4000;

/// Display options for a single toast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToastOptions {
    duration_ms: u64,
}

impl ToastOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override how long the toast stays on screen.
    pub fn duration_ms(mut self, ms: u64) -> Self {
        self.duration_ms = ms;
        self
    }
}

impl Default for ToastOptions {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
struct ToastItem {
    id: u64,
    kind: ToastKind,
    message: String,
}

/// Handle for raising toasts from event handlers and spawned futures.
#[derive(Clone, Copy)]
pub struct Toasts {
    items: Signal<Vec<ToastItem>>,
    next_id: Signal<u64>,
}

impl Toasts {
    pub fn success(&self, message: String, options: ToastOptions) {
        self.push(ToastKind::Success, message, options);
    }

    pub fn error(&self, message: String, options: ToastOptions) {
        self.push(ToastKind::Error, message, options);
    }

    fn push(&self, kind: ToastKind, message: String, options: ToastOptions) {
        let mut items = self.items;
        let mut next_id = self.next_id;
        let id = *next_id.peek();
        next_id.set(id + 1);
        items.write().push(ToastItem { id, kind, message });
        spawn(async move {
            sleep_ms(options.duration_ms).await;
            items.write().retain(|item| item.id != id);
        });
    }

    fn dismiss(&self, id: u64) {
        let mut items = self.items;
        items.write().retain(|item| item.id != id);
    }
}

/// Access the toast handle provided by [`ToastProvider`].
pub fn use_toast() -> Toasts {
    use_context::<Toasts>()
}

/// Provides the toast context and renders the stack above `children`.
#[component]
pub fn ToastProvider(children: Element) -> Element {
    let items = use_signal(Vec::<ToastItem>::new);
    let next_id = use_signal(|| 0u64);
    use_context_provider(|| Toasts { items, next_id });

    rsx! {
        {children}
        div {
            class: "toast-stack",
            for item in items() {
                ToastCard {
                    key: "{item.id}",
                    id: item.id,
                    success: item.kind == ToastKind::Success,
                    message: item.message.clone(),
                }
            }
        }
    }
}

#[component]
fn ToastCard(id: u64, success: bool, message: String) -> Element {
    let toasts = use_toast();
    let class = if success {
        "toast toast--success"
    } else {
        "toast toast--error"
    };

    rsx! {
        div {
            class: "{class}",
            onclick: move |_| toasts.dismiss(id),
            "{message}"
        }
    }
}

#[cfg(target_arch = "wasm32")]
async fn sleep_ms(ms: u64) {
    gloo_timers::future::sleep(std::time::Duration::from_millis(ms)).await;
}

#[cfg(not(target_arch = "wasm32"))]
async fn sleep_ms(ms: u64) {
    tokio::time::sleep(std::time::Duration::from_millis(ms)).await;
}
