use dioxus::prelude::*;

use ui::AuthProvider;
use views::{Auth, Create, Feed, PostDetail, Profile, Shell};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/auth")]
    Auth {},
    #[layout(Shell)]
        #[route("/")]
        Feed {},
        #[route("/create")]
        Create {},
        #[route("/post/:post_id")]
        PostDetail { post_id: String },
        #[route("/profile/:user_id")]
        Profile { user_id: String },
}

const FAVICON: Asset = asset!("/assets/favicon.ico");
const MAIN_CSS: Asset = asset!("/assets/main.css");

#[cfg(feature = "desktop")]
fn main() {
    use dioxus::desktop::{Config, LogicalSize, WindowBuilder};

    let window = WindowBuilder::new()
        .with_title("Lightbox")
        .with_inner_size(LogicalSize::new(1180.0, 860.0))
        .with_min_inner_size(LogicalSize::new(520.0, 680.0));
    dioxus::LaunchBuilder::desktop()
        .with_cfg(Config::new().with_window(window))
        .launch(App);
}

#[cfg(not(feature = "desktop"))]
fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Link { rel: "icon", href: FAVICON }
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        document::Link { rel: "stylesheet", href: ui::LIGHTBOX_CSS }

        AuthProvider {
            ui::components::ToastProvider {
                Router::<Route> {}
            }
        }
    }
}
