//! Pacing helpers for randomized delays.

use rand::Rng;
use std::time::Duration;

/// Sleeps for a whole number of seconds drawn uniformly from
/// `[range[0], range[1]]`, both ends inclusive.
pub async fn pause_range(range: [u64; 2]) {
	let secs = rand::thread_rng().gen_range(range[0]..=range[1]);
	tracing::debug!(secs, "Pausing");
	tokio::time::sleep(Duration::from_secs(secs)).await;
}

/// Draws an amount in ETH uniformly from `[range[0], range[1]]`.
///
/// Drawn exactly once per refuel, so the quoted amount and the deposited
/// amount always agree.
pub fn pick_amount(range: [f64; 2]) -> f64 {
	rand::thread_rng().gen_range(range[0]..=range[1])
}
