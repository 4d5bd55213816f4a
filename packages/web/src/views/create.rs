use dioxus::prelude::*;

use crate::Route;

#[component]
pub fn Create() -> Element {
    let auth = ui::use_auth();
    let nav = use_navigator();

    if !auth().loading && auth().user.is_none() {
        nav.replace(Route::Auth {});
    }

    let done = move |_: ()| {
        nav.push(Route::Feed {});
    };

    rsx! {
        ui::views::CreatePostView { on_done: done }
    }
}
