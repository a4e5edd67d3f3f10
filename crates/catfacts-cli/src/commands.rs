//! Non-interactive subcommands.

use std::fmt;

use anyhow::{Result, bail};
use catfacts_core::{outcome::Outcome, service::FactService, view::Filter};

use crate::{app::SharedManager, timestamp};

// ─── list ────────────────────────────────────────────────────────────────────

/// Print one page of facts under `filter`, followed by the totals.
pub async fn list<S: FactService>(manager: &SharedManager<S>, filter: Filter, page: usize) -> Result<()> {
  if let Outcome::Failed(kind) = manager.load_all().await {
    bail!("could not load cat facts ({kind})");
  }
  manager.set_filter(filter);
  manager.set_page(page);

  let view = manager.view();
  println!("{} · page {} of {}", filter.label(), view.page, view.page_count);
  println!();
  if view.is_empty() {
    println!("{}", crate::ui::fact_list::empty_message(filter));
  }
  for fact in &view.facts {
    let heart = if fact.favorite { "♥" } else { " " };
    println!(
      "{heart} #{:<5} {:<13} {}",
      fact.id,
      fact.source.label(),
      timestamp::display(&fact.created_at)
    );
    println!("          {}", fact.text);
  }

  let stats = view.stats;
  println!();
  println!(
    "{} total · {} favorites · {} user added · {} from API",
    stats.total, stats.favorites, stats.user_added, stats.api_sourced
  );
  Ok(())
}

// ─── seed ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
  pub inserted:   usize,
  pub duplicates: usize,
  pub failed:     usize,
}

impl fmt::Display for SeedReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "inserted {}, skipped {} duplicates, {} failed",
      self.inserted, self.duplicates, self.failed
    )
  }
}

/// Ask for `count` random suggestions and store each one.
pub async fn seed<S: FactService>(manager: &SharedManager<S>, count: usize) -> SeedReport {
  let mut report = SeedReport::default();
  for n in 1..=count {
    match manager.add_random().await {
      Outcome::Created { .. } => report.inserted += 1,
      Outcome::Duplicate => report.duplicates += 1,
      _ => report.failed += 1,
    }
    tracing::debug!(n, count, "seeded");
  }
  report
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use catfacts_core::{
    FactManager, ManagerConfig,
    memory::MemoryService,
    notify::{NotificationLog, TracingNotifier},
  };

  use super::*;

  fn manager(service: MemoryService) -> SharedManager<MemoryService> {
    let sink = (TracingNotifier, Arc::new(NotificationLog::new()));
    Arc::new(FactManager::new(service, sink, ManagerConfig::default()))
  }

  #[tokio::test]
  async fn seed_tallies_duplicates() {
    let manager = manager(MemoryService::new().with_suggestions(["a", "b"]));
    let report = seed(&manager, 5).await;
    assert_eq!(report, SeedReport {
      inserted:   2,
      duplicates: 3,
      failed:     0,
    });
    assert_eq!(manager.stats().api_sourced, 2);
  }

  #[tokio::test]
  async fn seed_counts_failures() {
    let service = MemoryService::new();
    service.set_offline(true);
    let report = seed(&manager(service), 3).await;
    assert_eq!(report.failed, 3);
    assert_eq!(report.to_string(), "inserted 0, skipped 0 duplicates, 3 failed");
  }

  #[tokio::test]
  async fn list_fails_when_unreachable() {
    let service = MemoryService::new();
    service.set_offline(true);
    assert!(list(&manager(service), Filter::All, 1).await.is_err());
  }

  #[tokio::test]
  async fn list_prints_requested_page() {
    let manager = manager(MemoryService::with_facts((1..=7).map(|i| format!("fact {i}"))));
    list(&manager, Filter::Api, 2).await.unwrap();
    assert_eq!(manager.page(), 2);
    assert_eq!(manager.filter(), Filter::Api);
  }
}
