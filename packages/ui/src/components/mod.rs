//! Shared building-block components: buttons, form fields, avatars,
//! loading skeletons, and the toast layer.

mod avatar;
pub use avatar::Avatar;

mod button;
pub use button::{Button, ButtonVariant};

mod input;
pub use input::{Input, Label, TextArea};

mod skeleton;
pub use skeleton::Skeleton;

mod toast;
pub use toast::{use_toast, ToastOptions, ToastProvider, Toasts};
