mod shell;
pub use shell::Shell;

mod auth;
pub use auth::Auth;

mod feed;
pub use feed::Feed;

mod create;
pub use create::Create;

mod post_detail;
pub use post_detail::PostDetail;

mod profile;
pub use profile::Profile;
