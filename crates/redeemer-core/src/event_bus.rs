//! Broadcast channel carrying the audit trail of a run.

use redeemer_types::RedemptionEvent;
use tokio::sync::broadcast;

/// Event bus for broadcasting redemption events to any number of observers.
///
/// Publishing never blocks the run; events sent while nobody is subscribed
/// are dropped.
#[derive(Clone)]
pub struct EventBus {
	sender: broadcast::Sender<RedemptionEvent>,
}

impl EventBus {
	/// Creates a bus buffering up to `capacity` events per subscriber.
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	/// Subscribes to events published from now on.
	pub fn subscribe(&self) -> broadcast::Receiver<RedemptionEvent> {
		self.sender.subscribe()
	}

	pub fn publish(
		&self,
		event: RedemptionEvent,
	) -> Result<(), broadcast::error::SendError<RedemptionEvent>> {
		self.sender.send(event)?;
		Ok(())
	}
}
