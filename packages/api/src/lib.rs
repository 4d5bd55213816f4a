//! # API crate: the hosted-backend client for Lightbox
//!
//! Lightbox keeps no server of its own: profiles, posts, likes, comments,
//! and follows all live in a hosted table service, and authentication is
//! its token endpoint. This crate is the typed Rust client for that
//! service, shared by the web and desktop frontends.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`client`] | The shared [`Backend`] handle and the select/insert/delete request builders |
//! | [`auth`] | Sign-up, sign-in, sign-out, session restore; [`Session`] and [`AuthUser`] |
//! | [`models`] | Row types for the five tables, with embedded-join variants |
//! | [`queries`] | One typed function per remote exchange the views perform |
//! | [`error`] | [`Error`] and the crate [`Result`] |
//!
//! One [`Backend`] is constructed at app start from the `store` crate's
//! [`AppConfig`](store::AppConfig) and handed to every view through
//! context. Requests carry the publishable key plus the signed-in user's
//! bearer token; reads work signed out, mutations do not.

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod queries;

pub use auth::{AuthUser, Session};
pub use client::{Backend, Order};
pub use error::{Error, Result};
pub use models::{Comment, Follow, FollowStats, Like, Post, Profile};
