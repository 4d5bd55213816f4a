mod feed;
pub use feed::FeedView;

mod auth;
pub use auth::AuthView;

mod create_post;
pub use create_post::CreatePostView;

mod post_detail;
pub use post_detail::PostDetailView;

mod profile;
pub use profile::ProfileView;
