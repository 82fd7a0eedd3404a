use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use horizon_primitives::{Appearance, HighlightStyle, Theme};
use horizon_store::HighlightStore;
use parking_lot::RwLock;

use crate::error::{HighlighterError, Result};

/// Default appearance shared by the components of one process.
///
/// Created once at startup with [`ThemeContext::start`] and handed to every
/// component that needs the current defaults. [`ThemeContext::shutdown`]
/// ends its use; later writes are refused.
pub struct ThemeContext {
	store: Arc<HighlightStore>,
	current: RwLock<Appearance>,
	active: AtomicBool,
}

impl ThemeContext {
	/// Loads the persisted defaults.
	pub async fn start(store: Arc<HighlightStore>) -> Arc<Self> {
		let current = store.default_appearance().await;
		tracing::debug!(appearance = %current, "theme.start");
		Arc::new(Self {
			store,
			current: RwLock::new(current),
			active: AtomicBool::new(true),
		})
	}

	/// Appearance applied to new highlights.
	pub fn appearance(&self) -> Appearance {
		*self.current.read()
	}

	pub fn is_active(&self) -> bool {
		self.active.load(Ordering::Acquire)
	}

	/// Persists `theme` as the default for new highlights.
	pub async fn set_default_theme(&self, theme: Theme) -> Result<bool> {
		self.ensure_active()?;
		let saved = self.store.set_default_theme(theme).await;
		if saved {
			self.current.write().theme = theme;
		}
		Ok(saved)
	}

	/// Persists `style` as the default for new highlights.
	pub async fn set_default_style(&self, style: HighlightStyle) -> Result<bool> {
		self.ensure_active()?;
		let saved = self.store.set_default_style(style).await;
		if saved {
			self.current.write().style = style;
		}
		Ok(saved)
	}

	/// Re-reads the persisted defaults, e.g. after another context changed them.
	pub async fn reload(&self) -> Result<Appearance> {
		self.ensure_active()?;
		let fresh = self.store.default_appearance().await;
		*self.current.write() = fresh;
		Ok(fresh)
	}

	pub fn shutdown(&self) {
		if self.active.swap(false, Ordering::AcqRel) {
			tracing::debug!("theme.shutdown");
		}
	}

	fn ensure_active(&self) -> Result<()> {
		if self.is_active() {
			Ok(())
		} else {
			Err(HighlighterError::ThemeContextClosed)
		}
	}
}
