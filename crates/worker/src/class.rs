/// Execution classes used when spawning engine tasks.
///
/// Every spawn logs its class so traces show which kind of work a task
/// belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskClass {
	/// Handling of a user action or an incoming message.
	Interactive,
	/// Deferred page work such as mutation-driven restoration.
	Background,
	/// Periodic housekeeping of persisted state.
	Maintenance,
}

impl TaskClass {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Interactive => "interactive",
			Self::Background => "background",
			Self::Maintenance => "maintenance",
		}
	}
}
