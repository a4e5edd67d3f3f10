//! Derived views: filtering, aggregate stats and the pagination window.
//!
//! Everything here is a pure function of the collection plus the current
//! filter and page. Nothing is cached.

use std::{num::NonZeroUsize, ops::Range};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::fact::{Fact, Source};

// ─── Filter ──────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Filter {
  #[default]
  All,
  Favorites,
  User,
  Api,
}

impl Filter {
  pub fn matches(&self, fact: &Fact) -> bool {
    match self {
      Self::All => true,
      Self::Favorites => fact.favorite,
      Self::User => fact.source == Source::User,
      Self::Api => fact.source == Source::Api,
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Self::All => "All Facts",
      Self::Favorites => "Favorites",
      Self::User => "User Added",
      Self::Api => "From API",
    }
  }
}

// ─── Stats ───────────────────────────────────────────────────────────────────

/// Counters over the whole collection, independent of filter and page.
///
/// `user_added + api_sourced == total` always holds: every fact has exactly
/// one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Stats {
  pub total:       usize,
  pub favorites:   usize,
  pub user_added:  usize,
  pub api_sourced: usize,
}

impl Stats {
  pub fn of(facts: &[Fact]) -> Self {
    facts.iter().fold(Self::default(), |mut stats, fact| {
      stats.total += 1;
      if fact.favorite {
        stats.favorites += 1;
      }
      match fact.source {
        Source::User => stats.user_added += 1,
        Source::Api => stats.api_sourced += 1,
      }
      stats
    })
  }

  /// The counter that matches `filter`.
  pub fn count(&self, filter: Filter) -> usize {
    match filter {
      Filter::All => self.total,
      Filter::Favorites => self.favorites,
      Filter::User => self.user_added,
      Filter::Api => self.api_sourced,
    }
  }
}

// ─── Pagination ──────────────────────────────────────────────────────────────

/// Number of pages needed for `len` items. Never less than one, so an empty
/// collection still has a valid first page.
pub fn page_count(len: usize, page_size: NonZeroUsize) -> usize {
  len.div_ceil(page_size.get()).max(1)
}

/// Clamp a 1-indexed page into `[1, page_count]`.
pub fn clamp_page(page: usize, len: usize, page_size: NonZeroUsize) -> usize {
  page.clamp(1, page_count(len, page_size))
}

/// Index range of `page` within a list of `len` items. `page` must already be
/// clamped.
pub fn page_bounds(page: usize, len: usize, page_size: NonZeroUsize) -> Range<usize> {
  let start = (page.saturating_sub(1) * page_size.get()).min(len);
  let end = (start + page_size.get()).min(len);
  start..end
}

// ─── View ────────────────────────────────────────────────────────────────────

/// Everything a front-end needs to render one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
  pub filter:     Filter,
  /// 1-indexed, clamped to `[1, page_count]`.
  pub page:       usize,
  pub page_count: usize,
  pub page_size:  usize,
  /// Number of facts that pass the filter, across all pages.
  pub matching:   usize,
  /// Position of `facts[0]` within the filtered list.
  pub offset:     usize,
  /// The facts on the current page.
  pub facts:      Vec<Fact>,
  pub stats:      Stats,
}

impl View {
  /// Filter, then window the filtered list at `page`.
  pub fn derive(facts: &[Fact], filter: Filter, page: usize, page_size: NonZeroUsize) -> Self {
    let filtered: Vec<&Fact> = facts.iter().filter(|f| filter.matches(f)).collect();
    let page = clamp_page(page, filtered.len(), page_size);
    let bounds = page_bounds(page, filtered.len(), page_size);

    Self {
      filter,
      page,
      page_count: page_count(filtered.len(), page_size),
      page_size: page_size.get(),
      matching: filtered.len(),
      offset: bounds.start,
      facts: filtered[bounds].iter().map(|f| (*f).clone()).collect(),
      stats: Stats::of(facts),
    }
  }

  pub fn is_empty(&self) -> bool { self.facts.is_empty() }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr as _;

  use super::*;

  fn size(n: usize) -> NonZeroUsize { NonZeroUsize::new(n).unwrap() }

  fn fact(id: i64, source: Source, favorite: bool) -> Fact {
    Fact {
      id,
      text: format!("fact {id}"),
      created_at: "2025-01-01".into(),
      source,
      favorite,
    }
  }

  fn collection(n: i64) -> Vec<Fact> {
    (1..=n).map(|id| fact(id, Source::Api, false)).collect()
  }

  #[test]
  fn page_count_never_below_one() {
    assert_eq!(page_count(0, size(5)), 1);
    assert_eq!(page_count(5, size(5)), 1);
    assert_eq!(page_count(6, size(5)), 2);
    assert_eq!(page_count(11, size(5)), 3);
  }

  #[test]
  fn bounds_cover_partial_last_page() {
    assert_eq!(page_bounds(1, 12, size(5)), 0..5);
    assert_eq!(page_bounds(3, 12, size(5)), 10..12);
    assert_eq!(page_bounds(1, 0, size(5)), 0..0);
  }

  #[test]
  fn out_of_range_page_is_clamped() {
    assert_eq!(clamp_page(0, 12, size(5)), 1);
    assert_eq!(clamp_page(4, 12, size(5)), 3);
    assert_eq!(clamp_page(3, 10, size(5)), 2);
    assert_eq!(clamp_page(7, 0, size(5)), 1);
  }

  #[test]
  fn stats_describe_the_whole_collection() {
    let facts = vec![
      fact(1, Source::User, true),
      fact(2, Source::Api, true),
      fact(3, Source::Api, false),
    ];
    let view = View::derive(&facts, Filter::Favorites, 1, size(1));

    assert_eq!(view.facts.len(), 1);
    assert_eq!(view.matching, 2);
    assert_eq!(view.stats, Stats {
      total:       3,
      favorites:   2,
      user_added:  1,
      api_sourced: 2,
    });
    assert_eq!(view.stats.user_added + view.stats.api_sourced, view.stats.total);
  }

  #[test]
  fn filter_and_pagination_compose() {
    let mut facts = collection(12);
    for f in facts.iter_mut().filter(|f| f.id % 2 == 0) {
      f.source = Source::User;
    }

    let view = View::derive(&facts, Filter::User, 2, size(5));
    assert_eq!(view.matching, 6);
    assert_eq!(view.page_count, 2);
    assert_eq!(view.offset, 5);
    assert_eq!(view.facts.iter().map(|f| f.id).collect::<Vec<_>>(), vec![12]);
  }

  #[test]
  fn derive_clamps_stale_page() {
    let view = View::derive(&collection(4), Filter::All, 9, size(5));
    assert_eq!(view.page, 1);
    assert_eq!(view.facts.len(), 4);
  }

  #[test]
  fn filter_parses_from_snake_case() {
    assert_eq!(Filter::from_str("favorites").unwrap(), Filter::Favorites);
    assert_eq!(Filter::Api.to_string(), "api");
    assert!(Filter::from_str("nope").is_err());
  }
}
