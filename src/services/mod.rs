//! External collaborators: the comic archive and the chat transport.

pub mod archive;
pub mod notices;
pub mod telegram;

pub use archive::{ComicArchive, XkcdArchive};
pub use notices::Notices;
pub use telegram::{Notifier, TelegramNotifier};
