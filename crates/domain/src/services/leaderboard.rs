//! Leaderboard ranking and pagination.
//!
//! Ranking is a pure function over a roster snapshot: filter by name, sort
//! stably, assign contiguous 1-based ranks. Pagination is a plain slice of
//! that sequence. `Leaderboard` memoizes the ranked sequence keyed on the
//! filter/sort inputs so that paging through the result performs no work
//! beyond the slice.

use std::cmp::Ordering;

use crate::models::leaderboard::{
    CommunityStanding, LeaderboardPage, LeaderboardQuery, LeaderboardRow, SortField, SortOrder,
};

/// Rows per page unless the caller asks otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 15;

/// Filters, sorts, and ranks a roster snapshot.
///
/// The filter (case-insensitive substring on the display name) runs before
/// the sort. The sort is stable: rows comparing equal keep their original
/// relative order. Ranks are contiguous `1..=N` over the filtered count.
pub fn rank_standings(
    roster: &[CommunityStanding],
    query: &LeaderboardQuery,
) -> Vec<LeaderboardRow> {
    let needle = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let mut filtered: Vec<&CommunityStanding> = roster
        .iter()
        .filter(|standing| match &needle {
            Some(needle) => standing.name.to_lowercase().contains(needle),
            None => true,
        })
        .collect();

    let field = query.sort.unwrap_or_default();
    let order = query.order.unwrap_or_default();

    // Vec::sort_by is stable, which preserves original relative order on
    // ties for both directions.
    filtered.sort_by(|a, b| {
        let ordering = match field {
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortField::MemberCount => a.member_count.cmp(&b.member_count),
            SortField::EventsCreated => a.events_created.cmp(&b.events_created),
            SortField::TotalScore => a
                .total_score()
                .partial_cmp(&b.total_score())
                .unwrap_or(Ordering::Equal),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    filtered
        .into_iter()
        .enumerate()
        .map(|(index, standing)| LeaderboardRow {
            rank: index as u32 + 1,
            id: standing.id,
            name: standing.name.clone(),
            member_count: standing.member_count,
            events_created: standing.events_created,
            total_score: standing.total_score(),
        })
        .collect()
}

/// Serves page `page` of the ranked sequence: exactly the slice
/// `[(page-1)*page_size, page*page_size)`. Pages past the end are empty.
pub fn paginate(ranked: &[LeaderboardRow], page: u32, page_size: u32) -> LeaderboardPage {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total_items = ranked.len() as u32;
    let total_pages = total_items.div_ceil(page_size);

    // Index arithmetic in usize: page is caller-supplied and unbounded, so
    // u32 multiplication could overflow.
    let start = (page as usize - 1).saturating_mul(page_size as usize);
    let end = start.saturating_add(page_size as usize).min(ranked.len());
    let rows = if start < ranked.len() {
        ranked[start..end].to_vec()
    } else {
        Vec::new()
    };

    LeaderboardPage {
        rows,
        page,
        page_size,
        total_items,
        total_pages,
        degraded: false,
    }
}

/// A roster snapshot with a memoized ranking.
///
/// The ranked sequence is recomputed only when the filter or sort changes;
/// page requests against an unchanged query just re-slice the cached
/// sequence. Replacing the roster invalidates the cache.
#[derive(Debug, Default)]
pub struct Leaderboard {
    roster: Vec<CommunityStanding>,
    cached: Option<Cached>,
}

#[derive(Debug)]
struct Cached {
    key: (Option<String>, SortField, SortOrder),
    ranked: Vec<LeaderboardRow>,
}

impl Leaderboard {
    pub fn new(roster: Vec<CommunityStanding>) -> Self {
        Self {
            roster,
            cached: None,
        }
    }

    /// Swaps in a fresh roster snapshot and drops the memoized ranking.
    pub fn replace_roster(&mut self, roster: Vec<CommunityStanding>) {
        self.roster = roster;
        self.cached = None;
    }

    /// Serves one page, reranking only if the filter/sort inputs changed.
    pub fn page(&mut self, query: &LeaderboardQuery) -> LeaderboardPage {
        let key = query.ranking_key();
        let stale = match &self.cached {
            Some(cached) => cached.key != key,
            None => true,
        };
        if stale {
            let ranked = rank_standings(&self.roster, query);
            self.cached = Some(Cached { key, ranked });
        }

        let ranked = &self.cached.as_ref().expect("ranking just computed").ranked;
        paginate(
            ranked,
            query.page.unwrap_or(1),
            query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn standing(name: &str, members: i64, events: i64) -> CommunityStanding {
        CommunityStanding {
            id: Uuid::new_v4(),
            name: name.to_string(),
            member_count: members,
            events_created: events,
        }
    }

    fn roster() -> Vec<CommunityStanding> {
        vec![
            standing("Rustaceans", 100, 2),  // score 270
            standing("Gophers", 100, 0),     // score 70
            standing("Pythonistas", 500, 1), // score 450
            standing("Rust Belt", 200, 4),   // score 540
            standing("quiet corner", 10, 1), // score 107
        ]
    }

    #[test]
    fn test_total_score_weighting() {
        // member_count=100, events_created=2 -> 100*0.7 + 2*100 = 270
        let s = standing("any", 100, 2);
        assert_eq!(s.total_score(), 270.0);
    }

    #[test]
    fn test_rank_by_score_descending() {
        let scenario = vec![
            standing("x", 100, 2), // 270
            standing("y", 150, 0), // 105
            standing("z", 0, 4),   // 400
        ];
        let query = LeaderboardQuery {
            sort: Some(SortField::TotalScore),
            order: Some(SortOrder::Desc),
            ..Default::default()
        };
        let ranked = rank_standings(&scenario, &query);
        let scores: Vec<f64> = ranked.iter().map(|r| r.total_score).collect();
        assert_eq!(scores, vec![400.0, 270.0, 105.0]);
        let ranks: Vec<u32> = ranked.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn test_ranks_contiguous_for_all_sort_combinations() {
        let roster = roster();
        for field in [
            SortField::Name,
            SortField::MemberCount,
            SortField::EventsCreated,
            SortField::TotalScore,
        ] {
            for order in [SortOrder::Asc, SortOrder::Desc] {
                for search in [None, Some("rust".to_string()), Some("zzz".to_string())] {
                    let query = LeaderboardQuery {
                        search: search.clone(),
                        sort: Some(field),
                        order: Some(order),
                        ..Default::default()
                    };
                    let ranked = rank_standings(&roster, &query);
                    let ranks: Vec<u32> = ranked.iter().map(|r| r.rank).collect();
                    let expected: Vec<u32> = (1..=ranked.len() as u32).collect();
                    assert_eq!(ranks, expected, "{field:?} {order:?} {search:?}");
                }
            }
        }
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let roster = roster();
        let query = LeaderboardQuery {
            search: Some("RUST".to_string()),
            ..Default::default()
        };
        let ranked = rank_standings(&roster, &query);
        let names: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"Rustaceans"));
        assert!(names.contains(&"Rust Belt"));
    }

    #[test]
    fn test_blank_search_matches_everything() {
        let roster = roster();
        let query = LeaderboardQuery {
            search: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(rank_standings(&roster, &query).len(), roster.len());
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let roster = vec![
            standing("first", 50, 1),
            standing("second", 50, 1),
            standing("third", 50, 1),
        ];
        for order in [SortOrder::Asc, SortOrder::Desc] {
            let query = LeaderboardQuery {
                sort: Some(SortField::MemberCount),
                order: Some(order),
                ..Default::default()
            };
            let ranked = rank_standings(&roster, &query);
            let names: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
            assert_eq!(names, vec!["first", "second", "third"], "{order:?}");
        }
    }

    #[test]
    fn test_sort_by_name_ascending() {
        let roster = roster();
        let query = LeaderboardQuery {
            sort: Some(SortField::Name),
            order: Some(SortOrder::Asc),
            ..Default::default()
        };
        let ranked = rank_standings(&roster, &query);
        let names: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Gophers", "Pythonistas", "quiet corner", "Rust Belt", "Rustaceans"]
        );
    }

    #[test]
    fn test_pagination_slices_exactly() {
        let roster: Vec<CommunityStanding> =
            (0..37).map(|i| standing(&format!("c{i:02}"), i, 0)).collect();
        let query = LeaderboardQuery {
            sort: Some(SortField::MemberCount),
            order: Some(SortOrder::Asc),
            ..Default::default()
        };
        let ranked = rank_standings(&roster, &query);

        let page_size = 15u32;
        let total_pages = (ranked.len() as u32).div_ceil(page_size);
        assert_eq!(total_pages, 3);

        for page in 1..=total_pages {
            let served = paginate(&ranked, page, page_size);
            let start = ((page - 1) * page_size) as usize;
            let end = (start + page_size as usize).min(ranked.len());
            assert_eq!(served.rows, ranked[start..end].to_vec(), "page {page}");
            assert_eq!(served.total_items, 37);
            assert_eq!(served.total_pages, 3);
        }
    }

    #[test]
    fn test_pagination_past_the_end_is_empty() {
        let roster = roster();
        let ranked = rank_standings(&roster, &LeaderboardQuery::default());
        let served = paginate(&ranked, 99, 15);
        assert!(served.rows.is_empty());
        assert_eq!(served.total_items, roster.len() as u32);
    }

    #[test]
    fn test_pagination_huge_page_number_does_not_overflow() {
        let roster = roster();
        let ranked = rank_standings(&roster, &LeaderboardQuery::default());
        // page * page_size exceeds u32::MAX; must serve an empty page, not
        // wrap or panic.
        let served = paginate(&ranked, 300_000_000, 15);
        assert!(served.rows.is_empty());
        assert_eq!(served.page, 300_000_000);
        assert_eq!(served.total_items, roster.len() as u32);

        let served = paginate(&[], u32::MAX, 100);
        assert!(served.rows.is_empty());
    }

    #[test]
    fn test_pagination_of_empty_roster() {
        let served = paginate(&[], 1, 15);
        assert!(served.rows.is_empty());
        assert_eq!(served.total_items, 0);
        assert_eq!(served.total_pages, 0);
    }

    #[test]
    fn test_leaderboard_memoizes_until_inputs_change() {
        let mut board = Leaderboard::new(roster());

        let query = LeaderboardQuery {
            search: Some("rust".to_string()),
            page: Some(1),
            ..Default::default()
        };
        let first = board.page(&query);
        assert_eq!(first.total_items, 2);

        // Same filter/sort, different page: cache key unchanged.
        let key = board.cached.as_ref().unwrap().key.clone();
        let next_page = LeaderboardQuery {
            page: Some(2),
            ..query.clone()
        };
        board.page(&next_page);
        assert_eq!(board.cached.as_ref().unwrap().key, key);

        // Changing the search recomputes.
        let changed = LeaderboardQuery {
            search: None,
            ..query
        };
        let all = board.page(&changed);
        assert_eq!(all.total_items, 5);
        assert_ne!(board.cached.as_ref().unwrap().key, key);
    }

    #[test]
    fn test_replace_roster_invalidates_cache() {
        let mut board = Leaderboard::new(roster());
        board.page(&LeaderboardQuery::default());
        assert!(board.cached.is_some());

        board.replace_roster(vec![standing("only", 1, 0)]);
        assert!(board.cached.is_none());
        let page = board.page(&LeaderboardQuery::default());
        assert_eq!(page.total_items, 1);
    }
}
