use dioxus::prelude::*;

use crate::Route;

#[component]
pub fn Auth() -> Element {
    let auth = ui::use_auth();
    let nav = use_navigator();

    // Already signed in, go straight to the feed
    if !auth().loading && auth().user.is_some() {
        nav.replace(Route::Feed {});
    }

    let done = move |_: ()| {
        nav.push(Route::Feed {});
    };

    rsx! {
        ui::views::AuthView { on_done: done }
    }
}
