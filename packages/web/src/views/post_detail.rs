use dioxus::prelude::*;

use crate::Route;

#[component]
pub fn PostDetail(post_id: String) -> Element {
    let auth = ui::use_auth();
    let nav = use_navigator();

    if !auth().loading && auth().user.is_none() {
        nav.replace(Route::Auth {});
    }

    // A deep link can land here with no in-app history; go to the feed
    // explicitly rather than walking the browser stack.
    let back = move |_: ()| {
        nav.push(Route::Feed {});
    };

    let open_profile = move |user_id: String| {
        nav.push(Route::Profile { user_id });
    };

    rsx! {
        ui::views::PostDetailView {
            post_id: post_id,
            on_back: back,
            on_open_profile: open_profile,
        }
    }
}
