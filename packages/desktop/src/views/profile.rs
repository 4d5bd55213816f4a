use dioxus::prelude::*;

use crate::Route;

#[component]
pub fn Profile(user_id: String) -> Element {
    let auth = ui::use_auth();
    let nav = use_navigator();

    if !auth().loading && auth().user.is_none() {
        nav.replace(Route::Auth {});
    }

    let open_post = move |post_id: String| {
        nav.push(Route::PostDetail { post_id });
    };

    rsx! {
        ui::views::ProfileView {
            user_id: user_id,
            on_open_post: open_post,
        }
    }
}
