use dioxus::prelude::*;

use crate::Route;

#[component]
pub fn Shell() -> Element {
    let nav = use_navigator();
    let route = use_route::<Route>();
    let section = match &route {
        Route::Feed {} => ui::NavSection::Home,
        Route::Create {} => ui::NavSection::Create,
        _ => ui::NavSection::None,
    };

    // The document title is invisible in a native window; mirror it onto
    // the title bar.
    let title = page_title(&route);
    #[cfg(feature = "desktop")]
    dioxus::desktop::use_window().set_title(title);

    let navigate_home = move |_: ()| {
        nav.push(Route::Feed {});
    };

    let navigate_create = move |_: ()| {
        nav.push(Route::Create {});
    };

    let navigate_profile = move |user_id: String| {
        nav.push(Route::Profile { user_id });
    };

    let navigate_auth = move |_: ()| {
        nav.push(Route::Auth {});
    };

    rsx! {
        document::Title { "{title}" }
        ui::Navbar {
            section: section,
            on_home: navigate_home,
            on_create: navigate_create,
            on_profile: navigate_profile,
            on_auth: navigate_auth,
        }
        Outlet::<Route> {}
    }
}

fn page_title(route: &Route) -> &'static str {
    match route {
        Route::Auth {} => "Sign in - Lightbox",
        Route::Feed {} => "Lightbox",
        Route::Create {} => "New post - Lightbox",
        Route::PostDetail { .. } => "Post - Lightbox",
        Route::Profile { .. } => "Profile - Lightbox",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_title_follows_the_route() {
        assert_eq!(page_title(&Route::Feed {}), "Lightbox");
        assert_eq!(page_title(&Route::Create {}), "New post - Lightbox");
        assert_eq!(
            page_title(&Route::PostDetail {
                post_id: "p-1".to_string()
            }),
            "Post - Lightbox"
        );
        assert_eq!(
            page_title(&Route::Profile {
                user_id: "u-1".to_string()
            }),
            "Profile - Lightbox"
        );
    }
}
