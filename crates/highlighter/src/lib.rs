//! Highlighter contexts of the highlight engine.
//!
//! - [`HighlightRegistry`]: id to range mapping of one page view and the
//!   sole writer of its decoration groups.
//! - [`Overlay`]: asynchronous restoration, scrolling and the attention
//!   flash on top of the registry.
//! - [`PageWatcher`]: mutation-driven, debounced restoration.
//! - [`ContentContext`]: one page view wired to the store and to messages.
//! - [`SidePanel`]: the highlight list, its filters and tab actions.
//! - [`Background`]: menu relay, liveness pings and pending-scroll sweeps.
//! - [`ThemeContext`]: default appearance shared by a process.
//!
//! Decorations are drawn through a [`DecorationSurface`];
//! [`MemorySurface`] records them for headless use and tests.

pub mod background;
pub mod content;
pub mod error;
pub mod overlay;
pub mod registry;
pub mod sidepanel;
pub mod surface;
pub mod theme;
pub mod watcher;

pub use background::Background;
pub use content::ContentContext;
pub use error::{HighlighterError, Result};
pub use overlay::{Overlay, OverlayTimings, Page};
pub use registry::{HighlightRegistry, RegistryEntry, RestoreReport};
pub use sidepanel::{ActiveTab, Counts, Scope, ScrollOutcome, SidePanel, TimeFilter};
pub use surface::{ATTENTION_GROUP, DecorationSurface, GroupId, MemorySurface, group_name};
pub use theme::ThemeContext;
pub use watcher::{BatchClass, PageWatcher, classify};
