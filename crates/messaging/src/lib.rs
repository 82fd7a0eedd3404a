//! Cross-context messaging for the highlight engine.
//!
//! Contexts (a tab's content view, the side panel, the background
//! coordinator) exchange [`Message`]s tagged by their `action` verb. The
//! [`Messenger`] trait is the outbound seam; [`LocalBus`] implements it in
//! process for headless use and tests.

mod error;
mod local;
mod message;
mod messenger;

pub use error::{MessagingError, Result};
pub use local::LocalBus;
pub use message::{ActionResponse, Message, Reply, TabId};
pub use messenger::{MessageHandler, Messenger, NullMessenger};
