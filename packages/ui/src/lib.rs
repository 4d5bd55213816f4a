//! This crate contains all shared UI for the workspace.

use dioxus::prelude::*;

pub mod components;

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

pub mod optimistic;
pub use optimistic::{AppendTicket, OptimisticToggle, PendingAppend, ToggleTicket};

pub mod time;

pub mod views;

pub const LIGHTBOX_CSS: Asset = asset!("/assets/lightbox.css");

mod navbar;
pub use navbar::{NavSection, Navbar};

mod post_card;
pub use post_card::PostCard;

mod auth;
pub use auth::{adopt_session, sign_out, use_auth, use_backend, AuthProvider, AuthState};
