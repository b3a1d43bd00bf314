//! Progress reporting, cancellation, and the diagnostic message registry.

use std::sync::{
	Arc,
	OnceLock,
	RwLock,
	atomic::{AtomicBool, Ordering},
};
use std::time::{Duration, Instant};

/// Receives percentage updates (0..=100) with a short status message.
/// Updates arrive on the thread running the codec.
pub trait ProgressSink {
	fn update(&mut self, percent: u8, message: &str);
}

impl<F: FnMut(u8, &str)> ProgressSink for F {
	fn update(&mut self, percent: u8, message: &str) {
		self(percent, message)
	}
}

/// A pollable cancellation flag shared between the caller and the codec.
/// Once set, it stays set; the codec has no way to clear it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
	flag: Arc<AtomicBool>,
}

impl CancelToken {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn cancel(&self) {
		self.flag.store(true, Ordering::Relaxed);
	}

	pub fn is_cancelled(&self) -> bool {
		self.flag.load(Ordering::Relaxed)
	}
}

/// Rate-limits progress updates to roughly twice a second so that
/// tight parse loops don't spend their time formatting percentages.
/// The first update always passes.
pub struct ProgressThrottle {
	last: Option<Instant>,
	interval: Duration,
}

impl ProgressThrottle {
	pub fn new() -> Self {
		Self {
			last: None,
			interval: Duration::from_millis(500),
		}
	}

	pub fn ready(&mut self) -> bool {
		match self.last {
			Some(last) if last.elapsed() < self.interval => false,
			_ => {
				self.last = Some(Instant::now());
				true
			}
		}
	}
}

impl Default for ProgressThrottle {
	fn default() -> Self {
		Self::new()
	}
}

/// Bundles the optional progress sink and cancellation token that the
/// decoder, encoder, and decompressor all accept. The default monitor
/// observes nothing and never cancels.
#[derive(Default)]
pub struct Monitor<'a> {
	progress: Option<&'a mut dyn ProgressSink>,
	cancel: Option<&'a CancelToken>,
	throttle: ProgressThrottle,
}

impl<'a> Monitor<'a> {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_progress(mut self, sink: &'a mut dyn ProgressSink) -> Self {
		self.progress = Some(sink);
		self
	}

	pub fn with_cancel(mut self, token: &'a CancelToken) -> Self {
		self.cancel = Some(token);
		self
	}

	/// Fails with [NbtError::Cancelled](crate::NbtError::Cancelled) once
	/// the token has been set.
	pub fn ensure_not_cancelled(&self) -> crate::NbtResult<()> {
		match self.cancel {
			Some(token) if token.is_cancelled() => Err(crate::NbtError::Cancelled),
			_ => Ok(()),
		}
	}

	/// Reports progress, subject to the 500 ms throttle.
	pub fn report(&mut self, percent: u8, message: &str) {
		if let Some(sink) = self.progress.as_mut() {
			if self.throttle.ready() {
				sink.update(percent, message);
			}
		}
	}

	/// Reports progress immediately. Used for terminal updates that
	/// must not be swallowed by the throttle.
	pub fn report_now(&mut self, percent: u8, message: &str) {
		if let Some(sink) = self.progress.as_mut() {
			sink.update(percent, message);
		}
	}
}

/// The status strings handed to progress sinks. Callers that want
/// localised output can swap in their own table with [set_messages].
#[derive(Debug, Clone)]
pub struct Messages {
	pub decompressing: String,
	pub parsing: String,
	pub parse_finished: String,
	pub packing: String,
	pub pack_finished: String,
	pub reading_region: String,
}

impl Default for Messages {
	fn default() -> Self {
		Self {
			decompressing: "Decompressing.".into(),
			parsing: "Parsing NBT file to NBT node tree.".into(),
			parse_finished: "Parsing finished!".into(),
			packing: "Packing NBT node tree.".into(),
			pack_finished: "Packing finished!".into(),
			reading_region: "Reading region file.".into(),
		}
	}
}

fn registry() -> &'static RwLock<Arc<Messages>> {
	static MESSAGES: OnceLock<RwLock<Arc<Messages>>> = OnceLock::new();
	MESSAGES.get_or_init(|| RwLock::new(Arc::new(Messages::default())))
}

/// Replaces the process-wide message table. Swapping while a parse is
/// running is allowed but which table that parse reports from is
/// unspecified.
pub fn set_messages(messages: Messages) {
	if let Ok(mut lock) = registry().write() {
		*lock = Arc::new(messages);
	}
}

/// The current message table.
pub fn messages() -> Arc<Messages> {
	registry()
		.read()
		.map(|lock| Arc::clone(&lock))
		.unwrap_or_default()
}
