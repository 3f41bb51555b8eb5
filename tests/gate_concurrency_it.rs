// std
use std::sync::Arc;
// crates.io
use time::OffsetDateTime;
// self
use api_key_gate::{
	auth::{CredentialRecord, OwnerId},
	gate::{AuthGate, RejectionKind},
	store::{CredentialStore, MemoryStore},
};

fn gate_with_limit(key: &str, limit: u64, used: u64) -> (AuthGate, MemoryStore) {
	let record = CredentialRecord::builder(
		key,
		OwnerId::new("user_concurrent").expect("Owner fixture should be valid."),
	)
	.limit(limit)
	.used(used)
	.window_start(OffsetDateTime::now_utc())
	.build()
	.expect("Record fixture should build.");
	let store = MemoryStore::with_records([record]);

	(AuthGate::new(Arc::new(store.clone())), store)
}

async fn hammer(gate: &AuthGate, header: &'static str, calls: usize) -> (usize, usize) {
	let tasks = (0..calls)
		.map(|_| {
			let gate = gate.clone();

			tokio::task::spawn_blocking(move || {
				gate.admit(Some(header)).expect("Authorization should not fail.").is_admitted()
			})
		})
		.collect::<Vec<_>>();
	let mut admitted = 0;
	let mut rejected = 0;

	for task in tasks {
		if task.await.expect("Admission task should not panic.") {
			admitted += 1;
		} else {
			rejected += 1;
		}
	}

	(admitted, rejected)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn boundary_admits_exactly_one_of_two_racers() {
	for _ in 0..50 {
		let (gate, store) = gate_with_limit("dcl_sk_boundary", 5, 4);
		let (admitted, rejected) = hammer(&gate, "Bearer dcl_sk_boundary", 2).await;
		let stored = store
			.get("dcl_sk_boundary")
			.expect("Get should succeed.")
			.expect("Record should remain present.");

		assert_eq!(admitted, 1, "only one racer may take the last slot");
		assert_eq!(rejected, 1);
		assert_eq!(stored.used, 5);
	}
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn contention_never_exceeds_the_limit() {
	let (gate, store) = gate_with_limit("dcl_sk_hot", 25, 0);
	let (admitted, rejected) = hammer(&gate, "Bearer dcl_sk_hot", 200).await;
	let stored = store
		.get("dcl_sk_hot")
		.expect("Get should succeed.")
		.expect("Record should remain present.");

	assert_eq!(admitted, 25);
	assert_eq!(rejected, 175);
	assert_eq!(stored.used, 25);
	assert_eq!(gate.metrics.usage_recorded(), 25);
	assert_eq!(gate.metrics.rejected(RejectionKind::RateLimited), 175);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn keys_do_not_share_budgets() {
	let store = MemoryStore::default();

	for key in ["dcl_sk_alpha", "dcl_sk_beta"] {
		store
			.put(
				CredentialRecord::builder(
					key,
					OwnerId::new("user_shared").expect("Owner fixture should be valid."),
				)
				.limit(10)
				.build()
				.expect("Record fixture should build."),
			)
			.expect("Seeding the store should succeed.");
	}

	let gate = AuthGate::new(Arc::new(store));
	let (alpha, beta) = tokio::join!(
		hammer(&gate, "Bearer dcl_sk_alpha", 30),
		hammer(&gate, "Bearer dcl_sk_beta", 30)
	);

	assert_eq!(alpha, (10, 20));
	assert_eq!(beta, (10, 20));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn held_admission_does_not_stall_other_calls() {
	let (gate, store) = gate_with_limit("dcl_sk_held", 3, 0);
	let header = Some("Bearer dcl_sk_held");
	let held = gate
		.authorize(header)
		.expect("Authorization should not fail.")
		.into_result()
		.expect("First call should be admitted.");

	tokio::time::sleep(std::time::Duration::from_millis(10)).await;

	let (admitted, rejected) = tokio::time::timeout(
		std::time::Duration::from_secs(5),
		hammer(&gate, "Bearer dcl_sk_held", 4),
	)
	.await
	.expect("Calls for a key with a held admission should complete.");

	assert_eq!((admitted, rejected), (2, 2));

	let recorded = held.record_usage().expect("Recording should succeed.");

	assert_eq!(recorded.used, 3);
	assert_eq!(
		store.get("dcl_sk_held").expect("Get should succeed.").map(|record| record.used),
		Some(3)
	);
}
