use dioxus::prelude::*;

use crate::Route;

#[component]
pub fn Feed() -> Element {
    let auth = ui::use_auth();
    let nav = use_navigator();

    // Redirect to the auth screen once the session check settles
    if !auth().loading && auth().user.is_none() {
        nav.replace(Route::Auth {});
    }

    let open_post = move |post_id: String| {
        nav.push(Route::PostDetail { post_id });
    };

    let open_profile = move |user_id: String| {
        nav.push(Route::Profile { user_id });
    };

    let open_create = move |_: ()| {
        nav.push(Route::Create {});
    };

    rsx! {
        ui::views::FeedView {
            on_open_post: open_post,
            on_open_profile: open_profile,
            on_create: open_create,
        }
    }
}
