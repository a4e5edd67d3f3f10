//! Manager tests against an in-memory service.

use std::{
  num::NonZeroUsize,
  sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
  },
};

use tokio::sync::Notify;

use crate::{
  Error, ErrorKind, Result,
  fact::{FactId, RemoteFact, Source, Suggestion},
  manager::{DeleteMode, FactManager, ManagerConfig},
  memory::MemoryService,
  notify::{NotificationLog, Severity},
  outcome::Outcome,
  overlay::FavoriteRetention,
  service::{CreateOutcome, FactService},
  view::Filter,
};

type Manager = FactManager<Arc<MemoryService>, Arc<NotificationLog>>;

struct Harness {
  service: Arc<MemoryService>,
  log:     Arc<NotificationLog>,
  manager: Manager,
}

fn harness_with(service: MemoryService, config: ManagerConfig) -> Harness {
  let service = Arc::new(service);
  let log = Arc::new(NotificationLog::new());
  let manager = FactManager::new(Arc::clone(&service), Arc::clone(&log), config);
  Harness {
    service,
    log,
    manager,
  }
}

fn harness(service: MemoryService) -> Harness { harness_with(service, ManagerConfig::default()) }

fn numbered(n: usize) -> MemoryService {
  MemoryService::with_facts((1..=n).map(|i| format!("Cat fact number {i}")))
}

fn ids(manager: &Manager) -> Vec<i64> { manager.facts().iter().map(|f| f.id).collect() }

fn severities(log: &NotificationLog) -> Vec<Severity> {
  log.drain().into_iter().map(|n| n.severity).collect()
}

// ─── Load all ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn load_replaces_collection_in_remote_order() {
  let h = harness(numbered(3));
  assert!(h.manager.facts().is_empty());

  let outcome = h.manager.load_all().await;
  assert_eq!(outcome, Outcome::Loaded { count: 3 });
  assert_eq!(ids(&h.manager), vec![1, 2, 3]);
  assert!(h.manager.facts().iter().all(|f| f.source == Source::Api && !f.favorite));
  assert!(h.log.snapshot().is_empty());
  assert!(!h.manager.is_loading());
}

#[tokio::test]
async fn reload_is_idempotent() {
  let h = harness(numbered(4));
  h.manager.load_all().await;
  let first = h.manager.facts();
  h.manager.load_all().await;
  assert_eq!(h.manager.facts(), first);
}

#[tokio::test]
async fn failed_load_keeps_last_known_collection() {
  let h = harness(numbered(2));
  h.manager.load_all().await;
  h.service.set_offline(true);

  let outcome = h.manager.load_all().await;
  assert_eq!(outcome, Outcome::Failed(ErrorKind::Connectivity));
  assert_eq!(ids(&h.manager), vec![1, 2]);
  assert_eq!(severities(&h.log), vec![Severity::Error]);
  assert!(!h.manager.is_loading());
}

#[tokio::test]
async fn scenario_a_sources_derived_from_user_added_ids() {
  let h = harness(MemoryService::new());
  h.manager.create("Cats have whiskers on their front legs.").await;
  assert_eq!(h.manager.user_added_ids().into_iter().collect::<Vec<_>>(), vec![1]);

  // Someone else adds id 2.
  h.service.insert("Cats walk like camels and giraffes.");
  h.manager.load_all().await;

  let sources: Vec<_> = h.manager.facts().iter().map(|f| (f.id, f.source)).collect();
  assert_eq!(sources, vec![(1, Source::User), (2, Source::Api)]);
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn scenario_b_create_registers_and_reloads() {
  let h = harness(numbered(6));
  h.manager.load_all().await;
  h.manager.set_page(2);
  let lists_before = h.service.calls().list;

  let outcome = h.manager.create("Cats sleep 70% of their lives").await;

  assert_eq!(outcome, Outcome::Created { id: Some(7) });
  assert!(h.manager.user_added_ids().contains(&7));
  assert_eq!(h.service.calls().list, lists_before + 1);
  let created = h.manager.get(7).unwrap();
  assert_eq!(created.source, Source::User);
  assert_eq!(created.text, "Cats sleep 70% of their lives");
  assert_eq!(h.manager.page(), 1);
  assert_eq!(severities(&h.log), vec![Severity::Success]);
}

#[tokio::test]
async fn scenario_c_duplicate_leaves_collection_untouched() {
  let h = harness(MemoryService::new());
  h.manager.create("Cats sleep 70% of their lives").await;
  h.log.drain();
  let before = h.manager.facts();
  let user_before = h.manager.user_added_ids();
  let lists_before = h.service.calls().list;

  let outcome = h.manager.create("Cats sleep 70% of their lives").await;

  assert_eq!(outcome, Outcome::Duplicate);
  assert_eq!(h.manager.facts(), before);
  assert_eq!(h.manager.user_added_ids(), user_before);
  assert_eq!(h.service.calls().list, lists_before, "duplicate must not reload");
  assert_eq!(severities(&h.log), vec![Severity::Warning]);
}

#[tokio::test]
async fn submitted_text_is_trimmed() {
  let h = harness(MemoryService::new());
  h.manager.create("   Cats can jump six times their length.\n").await;
  assert_eq!(h.manager.facts()[0].text, "Cats can jump six times their length.");

  let outcome = h.manager.create("Cats can jump six times their length.  ").await;
  assert_eq!(outcome, Outcome::Duplicate);
}

#[tokio::test]
async fn blank_text_is_rejected_without_a_request() {
  let h = harness(MemoryService::new());
  let outcome = h.manager.create(" \n\t ").await;

  assert_eq!(outcome, Outcome::Failed(ErrorKind::Validation));
  assert_eq!(h.service.calls().create, 0);
  assert_eq!(severities(&h.log), vec![Severity::Error]);
}

#[tokio::test]
async fn rejected_create_changes_nothing() {
  let h = harness(numbered(2));
  h.manager.load_all().await;
  h.service.set_failing_writes(true);
  let before = h.manager.facts();

  let outcome = h.manager.create("Cats have 230 bones.").await;

  assert_eq!(outcome, Outcome::Failed(ErrorKind::MutationFailed));
  assert_eq!(h.manager.facts(), before);
  assert!(h.manager.user_added_ids().is_empty());
  assert_eq!(severities(&h.log), vec![Severity::Error]);
}

#[tokio::test]
async fn unreachable_create_is_mutation_failure() {
  let h = harness(MemoryService::new());
  h.service.set_offline(true);

  let outcome = h.manager.create("Cats have 230 bones.").await;
  assert_eq!(outcome, Outcome::Failed(ErrorKind::MutationFailed));
  assert_eq!(h.service.calls().list, 0);
}

// ─── Random ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn random_suggestion_is_api_sourced() {
  let service = MemoryService::new().with_suggestions(["Cats have 32 muscles in each ear."]);
  let h = harness(service);

  let outcome = h.manager.add_random().await;

  assert_eq!(outcome, Outcome::Created { id: Some(1) });
  assert!(h.manager.user_added_ids().is_empty());
  assert_eq!(h.manager.facts()[0].source, Source::Api);
  assert_eq!(h.manager.stats().api_sourced, 1);
}

#[tokio::test]
async fn repeated_random_suggestion_is_duplicate() {
  let service = MemoryService::new().with_suggestions(["Cats have 32 muscles in each ear."]);
  let h = harness(service);
  h.manager.add_random().await;
  h.log.drain();

  let outcome = h.manager.add_random().await;
  assert_eq!(outcome, Outcome::Duplicate);
  assert_eq!(h.manager.facts().len(), 1);
  assert_eq!(severities(&h.log), vec![Severity::Warning]);
}

#[tokio::test]
async fn random_fetch_failure_is_connectivity() {
  let service = MemoryService::new().with_suggestions(Vec::<String>::new());
  let h = harness(service);

  let outcome = h.manager.add_random().await;
  assert_eq!(outcome, Outcome::Failed(ErrorKind::Connectivity));
  assert_eq!(h.service.calls().create, 0);
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn scenario_d_delete_reloads_and_forgets_provenance() {
  let h = harness(MemoryService::new());
  h.manager.create("Cats sleep 70% of their lives").await;
  let id = h.manager.facts()[0].id;
  h.manager.toggle_favorite(id);
  let lists_before = h.service.calls().list;

  let outcome = h.manager.delete(id).await;

  assert_eq!(outcome, Outcome::Deleted { id, remote: true });
  assert_eq!(h.service.calls().list, lists_before + 1);
  assert!(!h.manager.user_added_ids().contains(&id));
  assert!(!h.manager.favorite_ids().contains(&id));
  assert!(h.manager.get(id).is_none());
}

#[tokio::test]
async fn failed_delete_changes_nothing() {
  let h = harness(MemoryService::new());
  h.manager.create("Cats have 230 bones.").await;
  h.log.drain();
  h.service.set_failing_writes(true);

  let outcome = h.manager.delete(1).await;

  assert_eq!(outcome, Outcome::Failed(ErrorKind::MutationFailed));
  assert!(h.manager.get(1).is_some());
  assert!(h.manager.user_added_ids().contains(&1));
  assert_eq!(severities(&h.log), vec![Severity::Error]);
}

#[tokio::test]
async fn local_only_delete_hides_without_remote_call() {
  let config = ManagerConfig {
    delete_mode: DeleteMode::LocalOnly,
    ..ManagerConfig::default()
  };
  let h = harness_with(numbered(3), config);
  h.manager.load_all().await;

  let outcome = h.manager.delete(2).await;

  assert_eq!(outcome, Outcome::Deleted { id: 2, remote: false });
  assert_eq!(h.service.calls().delete, 0);
  assert_eq!(h.service.len(), 3);
  assert_eq!(ids(&h.manager), vec![1, 3]);

  // A refresh does not bring it back.
  h.manager.load_all().await;
  assert_eq!(ids(&h.manager), vec![1, 3]);
}

#[tokio::test]
async fn provenance_stays_within_collection() {
  let h = harness(MemoryService::new());
  h.manager.create("one").await;
  h.manager.create("two").await;
  h.manager.create("three").await;

  // Removed behind our back.
  h.service.remove(2);
  h.manager.load_all().await;

  let present: Vec<_> = ids(&h.manager);
  for id in h.manager.user_added_ids() {
    assert!(present.contains(&id), "user-added id {id} missing from collection");
  }
  assert_eq!(h.manager.user_added_ids().len(), 2);
}

// ─── Favorites ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn toggle_favorite_is_local() {
  let h = harness(numbered(2));
  h.manager.load_all().await;
  let calls = h.service.calls();

  assert_eq!(h.manager.toggle_favorite(2), Outcome::Favorited {
    id:       2,
    favorite: true,
  });
  assert!(h.manager.get(2).unwrap().favorite);
  assert_eq!(h.manager.stats().favorites, 1);
  assert_eq!(h.service.calls(), calls);
  assert!(h.log.snapshot().is_empty());

  h.manager.toggle_favorite(2);
  assert!(!h.manager.get(2).unwrap().favorite);
}

#[tokio::test]
async fn favorites_survive_reload_by_default() {
  let h = harness(numbered(2));
  h.manager.load_all().await;
  h.manager.toggle_favorite(1);
  h.manager.load_all().await;
  assert!(h.manager.get(1).unwrap().favorite);
}

#[tokio::test]
async fn favorites_reset_on_reload_when_configured() {
  let config = ManagerConfig {
    favorite_retention: FavoriteRetention::ResetOnReload,
    ..ManagerConfig::default()
  };
  let h = harness_with(numbered(2), config);
  h.manager.load_all().await;
  h.manager.toggle_favorite(1);
  h.manager.load_all().await;
  assert!(!h.manager.get(1).unwrap().favorite);
}

// ─── Derived view ────────────────────────────────────────────────────────────

#[tokio::test]
async fn stats_partition_by_source() {
  let h = harness(numbered(3));
  h.manager.load_all().await;
  h.manager.create("mine").await;
  h.manager.create("also mine").await;
  h.manager.toggle_favorite(1);

  let stats = h.manager.stats();
  assert_eq!(stats.total, 5);
  assert_eq!(stats.user_added, 2);
  assert_eq!(stats.api_sourced, 3);
  assert_eq!(stats.favorites, 1);
  assert_eq!(stats.total, stats.user_added + stats.api_sourced);

  h.manager.set_filter(Filter::User);
  let view = h.manager.view();
  assert_eq!(view.matching, 2);
  assert_eq!(view.stats, stats);
}

#[tokio::test]
async fn deleting_last_page_clamps_page() {
  let h = harness(numbered(6));
  h.manager.load_all().await;
  assert_eq!(h.manager.set_page(2), 2);
  assert_eq!(h.manager.view().facts.len(), 1);

  h.manager.delete(6).await;

  assert_eq!(h.manager.page(), 1);
  let view = h.manager.view();
  assert_eq!(view.page_count, 1);
  assert_eq!(view.facts.len(), 5);
}

#[tokio::test]
async fn scenario_e_page_not_clamped_while_still_valid() {
  let h = harness(numbered(12));
  h.manager.load_all().await;
  h.manager.set_page(3);
  assert_eq!(
    h.manager.view().facts.iter().map(|f| f.id).collect::<Vec<_>>(),
    vec![11, 12]
  );

  let first_page_id = h.manager.facts()[0].id;
  h.manager.delete(first_page_id).await;

  assert_eq!(h.manager.stats().total, 11);
  assert_eq!(h.manager.page(), 3);
  let view = h.manager.view();
  assert_eq!(view.page_count, 3);
  assert_eq!(view.facts.iter().map(|f| f.id).collect::<Vec<_>>(), vec![12]);
}

#[tokio::test]
async fn unfavoriting_under_favorites_filter_clamps() {
  let config = ManagerConfig {
    page_size: NonZeroUsize::new(2).unwrap(),
    ..ManagerConfig::default()
  };
  let h = harness_with(numbered(3), config);
  h.manager.load_all().await;
  for id in 1..=3 {
    h.manager.toggle_favorite(id);
  }
  h.manager.set_filter(Filter::Favorites);
  assert_eq!(h.manager.set_page(2), 2);

  h.manager.toggle_favorite(3);
  assert_eq!(h.manager.page(), 1);
}

#[tokio::test]
async fn page_navigation_is_clamped() {
  let h = harness(numbered(7));
  h.manager.load_all().await;
  assert_eq!(h.manager.prev_page(), 1);
  assert_eq!(h.manager.next_page(), 2);
  assert_eq!(h.manager.next_page(), 2);
  assert_eq!(h.manager.set_page(0), 1);
}

#[tokio::test]
async fn set_filter_returns_to_first_page() {
  let h = harness(numbered(12));
  h.manager.load_all().await;
  h.manager.set_page(3);
  h.manager.set_filter(Filter::Api);
  assert_eq!(h.manager.page(), 1);
  assert_eq!(h.manager.filter(), Filter::Api);
}

// ─── Concurrency ─────────────────────────────────────────────────────────────

/// Wraps a [`MemoryService`] and can park the next list call, after it has
/// read its snapshot, until released.
#[derive(Default)]
struct GatedService {
  inner:  MemoryService,
  hold:   AtomicBool,
  parked: Notify,
  gate:   Notify,
}

impl GatedService {
  fn new(inner: MemoryService) -> Self {
    Self {
      inner,
      ..Self::default()
    }
  }

  fn hold_next_list(&self) { self.hold.store(true, Ordering::SeqCst); }

  async fn wait_parked(&self) { self.parked.notified().await; }

  fn release(&self) { self.gate.notify_one(); }
}

impl FactService for GatedService {
  type Error = Error;

  async fn list_facts(&self) -> Result<Vec<RemoteFact>> {
    let snapshot = self.inner.list_facts().await;
    if self.hold.swap(false, Ordering::SeqCst) {
      self.parked.notify_one();
      self.gate.notified().await;
    }
    snapshot
  }

  async fn create_fact(&self, text: &str) -> Result<CreateOutcome> {
    self.inner.create_fact(text).await
  }

  async fn delete_fact(&self, id: FactId) -> Result<()> { self.inner.delete_fact(id).await }

  async fn random_fact(&self) -> Result<Suggestion> { self.inner.random_fact().await }
}

#[tokio::test]
async fn stale_reload_keeps_fresh_user_fact() {
  let service = Arc::new(GatedService::new(numbered(3)));
  let log = Arc::new(NotificationLog::new());
  let manager = FactManager::new(Arc::clone(&service), log, ManagerConfig::default());
  manager.load_all().await;

  // The reload reads [1, 2, 3] and parks. The create stores 4 and runs its
  // own reload to completion before the parked one is let go.
  service.hold_next_list();
  let (reload, created) = tokio::join!(manager.load_all(), async {
    service.wait_parked().await;
    let created = manager.create("fresh").await;
    assert!(manager.is_loading());
    assert_eq!(manager.get(4).map(|f| f.source), Some(Source::User));
    service.release();
    created
  });

  assert_eq!(created, Outcome::Created { id: Some(4) });
  assert_eq!(reload, Outcome::Loaded { count: 3 });
  assert!(!manager.is_loading());

  // Last writer wins the collection, but not the provenance.
  let ids: Vec<FactId> = manager.facts().iter().map(|f| f.id).collect();
  assert_eq!(ids, vec![1, 2, 3]);
  assert!(manager.user_added_ids().contains(&4));

  manager.load_all().await;
  assert_eq!(manager.get(4).map(|f| f.source), Some(Source::User));
  assert!(!manager.is_loading());
}
