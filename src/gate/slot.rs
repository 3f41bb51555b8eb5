//! Per-key reservation slots.
//!
//! A slot counts the admissions of one key that are still waiting to be recorded. Its mutex is
//! held only while the gate reads, checks, and writes that key's record, never across caller code.

// self
use crate::{_prelude::*, auth::ApiKey};

type SharedSlot = Arc<Mutex<KeySlot>>;

/// Admissions of one key that were granted but not yet recorded or released.
#[derive(Debug, Default)]
pub(crate) struct KeySlot {
	pub(crate) in_flight: u64,
}

/// Map of live slots, keyed by the exact credential string.
///
/// Entries exist only while some caller holds the slot; idle keys are pruned on check-in.
#[derive(Clone, Debug, Default)]
pub(crate) struct KeySlots(Arc<Mutex<HashMap<ApiKey, SharedSlot>>>);
impl KeySlots {
	/// Returns (and creates on demand) the slot for `key`.
	pub(crate) fn checkout(&self, key: &str) -> SharedSlot {
		let mut slots = self.0.lock();

		if let Some(slot) = slots.get(key) {
			return slot.clone();
		}

		slots.entry(ApiKey::new(key)).or_default().clone()
	}

	/// Hands `slot` back, dropping the map entry once no other holder or reservation remains.
	///
	/// The caller must not hold the slot's lock.
	pub(crate) fn checkin(&self, key: &str, slot: &SharedSlot) {
		let mut slots = self.0.lock();

		// Map entry plus the caller's handle.
		if Arc::strong_count(slot) == 2
			&& slot.lock().in_flight == 0
			&& slots.get(key).is_some_and(|entry| Arc::ptr_eq(entry, slot))
		{
			slots.remove(key);
		}
	}

	/// Number of keys currently tracked.
	#[cfg(test)]
	pub(crate) fn len(&self) -> usize {
		self.0.lock().len()
	}
}

/// One reserved slot of a key's window.
///
/// [`commit`](Self::commit) turns it into recorded usage; dropping it releases the slot.
pub(crate) struct Reservation {
	slots: KeySlots,
	key: ApiKey,
	slot: SharedSlot,
	settled: bool,
}
impl Reservation {
	/// Wraps a slot whose `in_flight` count was already incremented under its lock.
	pub(crate) fn new(slots: KeySlots, key: ApiKey, slot: SharedSlot) -> Self {
		Self { slots, key, slot, settled: false }
	}

	/// Runs `persist` under the slot's lock and settles the reservation.
	pub(crate) fn commit<T>(mut self, persist: impl FnOnce() -> T) -> T {
		let out = self.settle(persist);

		self.settled = true;

		out
	}

	fn settle<T>(&self, persist: impl FnOnce() -> T) -> T {
		let out = {
			let mut slot = self.slot.lock();
			let out = persist();

			slot.in_flight = slot.in_flight.saturating_sub(1);

			out
		};

		self.slots.checkin(self.key.expose(), &self.slot);

		out
	}
}
impl Drop for Reservation {
	fn drop(&mut self) {
		if !self.settled {
			self.settle(|| ());
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const KEY: &str = "dcl_sk_demo_987654321";

	fn reserve(slots: &KeySlots) -> Reservation {
		let slot = slots.checkout(KEY);

		slot.lock().in_flight += 1;

		Reservation::new(slots.clone(), ApiKey::new(KEY), slot)
	}

	#[test]
	fn idle_slots_are_pruned_on_checkin() {
		let slots = KeySlots::default();
		let slot = slots.checkout(KEY);

		assert_eq!(slots.len(), 1);

		slots.checkin(KEY, &slot);

		assert_eq!(slots.len(), 0);
	}

	#[test]
	fn slots_stay_tracked_while_reserved() {
		let slots = KeySlots::default();
		let first = reserve(&slots);
		let second = reserve(&slots);

		assert_eq!(slots.checkout(KEY).lock().in_flight, 2);

		drop(first);

		assert_eq!(slots.len(), 1);
		assert_eq!(second.commit(|| 7), 7);
		assert_eq!(slots.len(), 0);
	}
}
