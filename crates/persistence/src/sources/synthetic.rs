//! Synthetic `DataSource` serving a deterministic substitute dataset.
//!
//! Used when configuration selects it outright or when the live store is
//! unreachable at startup. The dataset is structurally identical to what
//! the live source reads, generated once from a seed so that repeated runs
//! (and tests) see the same numbers. Every response built on top of this
//! source is tagged as degraded by the transport layer.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use uuid::Uuid;

use domain::source::{
    CommunityRecord, DataSource, EventTally, JoinDay, MemberRecord, ReferralCounts, SourceError,
    StandingRecord,
};
use shared::window::DateRange;

const COMMUNITY_NAMES: &[&str] = &[
    "Rust Belt Makers",
    "Night Owl Runners",
    "Sourdough Circle",
    "Urban Sketchers",
    "Retro Game Society",
    "Trailhead Collective",
    "Open Data Guild",
    "Kitchen Chemistry",
    "Vinyl Preservation Club",
    "Backyard Astronomers",
    "Plant Swap Network",
    "Chess After Dark",
    "Film Photography Lab",
    "Community Repair Cafe",
    "Weekend Foragers",
    "Board Game Parliament",
    "Zine Writers Bloc",
    "Cold Water Swimmers",
];

#[derive(Debug, Clone)]
struct SynMember {
    profile_id: Uuid,
    display_name: String,
    accepted: bool,
    join_date: DateTime<Utc>,
    last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rsvp {
    Attending,
    NotAttending,
    Maybe,
}

#[derive(Debug, Clone)]
struct SynEvent {
    created_at: DateTime<Utc>,
    is_deleted: bool,
    participants: Vec<(Uuid, Rsvp)>,
}

#[derive(Debug, Clone)]
struct SynReferral {
    created_at: DateTime<Utc>,
    successful: bool,
}

#[derive(Debug, Clone)]
struct SynCommunity {
    record: CommunityRecord,
    members: Vec<SynMember>,
    events: Vec<SynEvent>,
    referrals: Vec<SynReferral>,
}

impl SynCommunity {
    fn accepted(&self) -> impl Iterator<Item = &SynMember> {
        self.members.iter().filter(|m| m.accepted)
    }

    fn live_events(&self) -> impl Iterator<Item = &SynEvent> {
        self.events.iter().filter(|e| !e.is_deleted)
    }
}

/// Deterministic in-memory data source.
pub struct SyntheticSource {
    communities: Vec<SynCommunity>,
}

impl SyntheticSource {
    /// Generates the dataset anchored at `now`; identical seeds and anchors
    /// produce identical datasets.
    pub fn with_anchor(seed: u64, now: DateTime<Utc>) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let communities = COMMUNITY_NAMES
            .iter()
            .map(|name| generate_community(&mut rng, name, now))
            .collect();
        Self { communities }
    }

    pub fn new(seed: u64) -> Self {
        Self::with_anchor(seed, Utc::now())
    }

    fn community(&self, id: Uuid) -> Option<&SynCommunity> {
        self.communities.iter().find(|c| c.record.id == id)
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new(42)
    }
}

fn generate_community(rng: &mut StdRng, name: &str, now: DateTime<Utc>) -> SynCommunity {
    let created_at = now - Duration::days(rng.gen_range(120..720));
    let member_total = rng.gen_range(15..400usize);

    let members: Vec<SynMember> = (0..member_total)
        .map(|i| {
            let joined_days_ago = rng.gen_range(0..(now - created_at).num_days().max(1));
            let join_date = now - Duration::days(joined_days_ago) - Duration::hours(rng.gen_range(0..24));
            // Activity skews recent for most members, stale for a tail.
            let idle_days = if rng.gen_bool(0.7) {
                rng.gen_range(0..14)
            } else {
                rng.gen_range(30..180)
            };
            let last_updated = (now - Duration::days(idle_days)).max(join_date);
            SynMember {
                profile_id: Uuid::from_u64_pair(rng.gen(), rng.gen()),
                display_name: format!("{} member {}", name.split(' ').next().unwrap_or(name), i),
                accepted: rng.gen_bool(0.9),
                join_date,
                last_updated,
            }
        })
        .collect();

    let accepted_count = members.iter().filter(|m| m.accepted).count() as i64;
    let accepted_ids: Vec<Uuid> = members
        .iter()
        .filter(|m| m.accepted)
        .map(|m| m.profile_id)
        .collect();

    let events: Vec<SynEvent> = (0..rng.gen_range(2..20usize))
        .map(|_| {
            let created_at = now - Duration::days(rng.gen_range(0..120));
            let participants = accepted_ids
                .iter()
                .filter_map(|profile_id| {
                    if !rng.gen_bool(0.2) {
                        return None;
                    }
                    let rsvp = match rng.gen_range(0..10) {
                        0..=5 => Rsvp::Attending,
                        6..=7 => Rsvp::Maybe,
                        _ => Rsvp::NotAttending,
                    };
                    Some((*profile_id, rsvp))
                })
                .collect();
            SynEvent {
                created_at,
                is_deleted: rng.gen_bool(0.05),
                participants,
            }
        })
        .collect();

    let referrals: Vec<SynReferral> = (0..rng.gen_range(0..30usize))
        .map(|_| SynReferral {
            created_at: now - Duration::days(rng.gen_range(0..120)),
            successful: rng.gen_bool(0.6),
        })
        .collect();

    SynCommunity {
        record: CommunityRecord {
            id: Uuid::from_u64_pair(rng.gen(), rng.gen()),
            name: name.to_string(),
            avatar_url: None,
            // Denormalized counter drifts a little from the true count,
            // like the live table does.
            member_count: accepted_count + rng.gen_range(-2..=3),
            created_at,
        },
        members,
        events,
        referrals,
    }
}

#[async_trait]
impl DataSource for SyntheticSource {
    async fn ping(&self) -> Result<(), SourceError> {
        Ok(())
    }

    async fn count_communities_created(&self, range: DateRange) -> Result<i64, SourceError> {
        Ok(self
            .communities
            .iter()
            .filter(|c| range.contains(c.record.created_at))
            .count() as i64)
    }

    async fn count_members_joined(&self, range: DateRange) -> Result<i64, SourceError> {
        Ok(self
            .communities
            .iter()
            .flat_map(|c| c.accepted())
            .filter(|m| range.contains(m.join_date))
            .count() as i64)
    }

    async fn count_events_created(&self, range: DateRange) -> Result<i64, SourceError> {
        Ok(self
            .communities
            .iter()
            .flat_map(|c| c.live_events())
            .filter(|e| range.contains(e.created_at))
            .count() as i64)
    }

    async fn count_active_communities(&self, range: DateRange) -> Result<i64, SourceError> {
        Ok(self
            .communities
            .iter()
            .filter(|c| c.members.iter().any(|m| range.contains(m.last_updated)))
            .count() as i64)
    }

    async fn top_communities_by_members(
        &self,
        limit: i64,
    ) -> Result<Vec<CommunityRecord>, SourceError> {
        let mut records: Vec<CommunityRecord> =
            self.communities.iter().map(|c| c.record.clone()).collect();
        records.sort_by(|a, b| b.member_count.cmp(&a.member_count));
        records.truncate(limit.max(0) as usize);
        Ok(records)
    }

    async fn count_community_members_joined(
        &self,
        community_id: Uuid,
        range: DateRange,
    ) -> Result<i64, SourceError> {
        Ok(self
            .community(community_id)
            .map(|c| c.accepted().filter(|m| range.contains(m.join_date)).count() as i64)
            .unwrap_or(0))
    }

    async fn count_community_events_created(
        &self,
        community_id: Uuid,
        range: DateRange,
    ) -> Result<i64, SourceError> {
        Ok(self
            .community(community_id)
            .map(|c| {
                c.live_events()
                    .filter(|e| range.contains(e.created_at))
                    .count() as i64
            })
            .unwrap_or(0))
    }

    async fn member_join_days(
        &self,
        community_id: Option<Uuid>,
        range: DateRange,
    ) -> Result<Vec<JoinDay>, SourceError> {
        let mut per_day: BTreeMap<chrono::NaiveDate, i64> = BTreeMap::new();
        let communities: Vec<&SynCommunity> = match community_id {
            Some(id) => self.community(id).into_iter().collect(),
            None => self.communities.iter().collect(),
        };
        for member in communities
            .iter()
            .flat_map(|c| c.accepted())
            .filter(|m| range.contains(m.join_date))
        {
            *per_day.entry(member.join_date.date_naive()).or_default() += 1;
        }
        Ok(per_day
            .into_iter()
            .map(|(day, joins)| JoinDay { day, joins })
            .collect())
    }

    async fn referral_outcomes(
        &self,
        community_id: Option<Uuid>,
        range: DateRange,
    ) -> Result<ReferralCounts, SourceError> {
        let communities: Vec<&SynCommunity> = match community_id {
            Some(id) => self.community(id).into_iter().collect(),
            None => self.communities.iter().collect(),
        };
        let mut counts = ReferralCounts::default();
        for referral in communities
            .iter()
            .flat_map(|c| c.referrals.iter())
            .filter(|r| range.contains(r.created_at))
        {
            counts.total += 1;
            if referral.successful {
                counts.successful += 1;
            }
        }
        Ok(counts)
    }

    async fn find_community(&self, id: Uuid) -> Result<Option<CommunityRecord>, SourceError> {
        Ok(self.community(id).map(|c| c.record.clone()))
    }

    async fn community_event_stats(
        &self,
        community_id: Uuid,
        range: DateRange,
    ) -> Result<EventTally, SourceError> {
        let mut tally = EventTally::default();
        if let Some(community) = self.community(community_id) {
            for event in community
                .live_events()
                .filter(|e| range.contains(e.created_at))
            {
                tally.total_events += 1;
                tally.total_rsvps += event.participants.len() as i64;
                tally.total_attending += event
                    .participants
                    .iter()
                    .filter(|(_, rsvp)| *rsvp == Rsvp::Attending)
                    .count() as i64;
            }
        }
        Ok(tally)
    }

    async fn count_members_total(&self, community_id: Uuid) -> Result<i64, SourceError> {
        Ok(self
            .community(community_id)
            .map(|c| c.accepted().count() as i64)
            .unwrap_or(0))
    }

    async fn count_members_active_since(
        &self,
        community_id: Uuid,
        instant: DateTime<Utc>,
    ) -> Result<i64, SourceError> {
        Ok(self
            .community(community_id)
            .map(|c| c.accepted().filter(|m| m.last_updated >= instant).count() as i64)
            .unwrap_or(0))
    }

    async fn count_members_inactive_before(
        &self,
        community_id: Uuid,
        instant: DateTime<Utc>,
    ) -> Result<i64, SourceError> {
        Ok(self
            .community(community_id)
            .map(|c| c.accepted().filter(|m| m.last_updated < instant).count() as i64)
            .unwrap_or(0))
    }

    async fn count_event_participants(&self, community_id: Uuid) -> Result<i64, SourceError> {
        Ok(self
            .community(community_id)
            .map(|c| {
                c.accepted()
                    .filter(|m| {
                        c.events.iter().any(|e| {
                            e.participants.iter().any(|(id, _)| *id == m.profile_id)
                        })
                    })
                    .count() as i64
            })
            .unwrap_or(0))
    }

    async fn count_cohort(
        &self,
        community_id: Uuid,
        joined: DateRange,
    ) -> Result<i64, SourceError> {
        Ok(self
            .community(community_id)
            .map(|c| c.accepted().filter(|m| joined.contains(m.join_date)).count() as i64)
            .unwrap_or(0))
    }

    async fn count_cohort_retained(
        &self,
        community_id: Uuid,
        joined: DateRange,
        active_since: DateTime<Utc>,
    ) -> Result<i64, SourceError> {
        Ok(self
            .community(community_id)
            .map(|c| {
                c.accepted()
                    .filter(|m| joined.contains(m.join_date) && m.last_updated >= active_since)
                    .count() as i64
            })
            .unwrap_or(0))
    }

    async fn recent_members(
        &self,
        community_id: Uuid,
        limit: i64,
    ) -> Result<Vec<MemberRecord>, SourceError> {
        let mut members: Vec<MemberRecord> = self
            .community(community_id)
            .map(|c| {
                c.accepted()
                    .map(|m| MemberRecord {
                        profile_id: m.profile_id,
                        display_name: Some(m.display_name.clone()),
                        join_date: m.join_date,
                    })
                    .collect()
            })
            .unwrap_or_default();
        members.sort_by(|a, b| b.join_date.cmp(&a.join_date));
        members.truncate(limit.max(0) as usize);
        Ok(members)
    }

    async fn leaderboard_roster(&self) -> Result<Vec<StandingRecord>, SourceError> {
        Ok(self
            .communities
            .iter()
            .map(|c| StandingRecord {
                id: c.record.id,
                name: c.record.name.clone(),
                member_count: c.record.member_count,
                events_created: c.live_events().count() as i64,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn source() -> SyntheticSource {
        SyntheticSource::with_anchor(42, anchor())
    }

    #[tokio::test]
    async fn test_same_seed_and_anchor_are_deterministic() {
        let a = source().leaderboard_roster().await.unwrap();
        let b = source().leaderboard_roster().await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), COMMUNITY_NAMES.len());
    }

    #[tokio::test]
    async fn test_different_seeds_differ() {
        let a = SyntheticSource::with_anchor(1, anchor())
            .leaderboard_roster()
            .await
            .unwrap();
        let b = SyntheticSource::with_anchor(2, anchor())
            .leaderboard_roster()
            .await
            .unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_top_communities_sorted_and_capped() {
        let top = source().top_communities_by_members(10).await.unwrap();
        assert_eq!(top.len(), 10);
        for pair in top.windows(2) {
            assert!(pair[0].member_count >= pair[1].member_count);
        }
    }

    #[tokio::test]
    async fn test_referral_outcomes_consistent() {
        let range = DateRange::new(anchor() - Duration::days(120), anchor());
        let counts = source().referral_outcomes(None, range).await.unwrap();
        assert!(counts.successful <= counts.total);
        assert!(counts.total > 0);
    }

    #[tokio::test]
    async fn test_join_days_sparse_and_sorted() {
        let range = DateRange::new(anchor() - Duration::days(30), anchor());
        let days = source().member_join_days(None, range).await.unwrap();
        assert!(!days.is_empty());
        // A 30-day range anchored midday touches partial calendar days at
        // both ends, so up to 31 distinct dates.
        assert!(days.len() <= 31);
        for pair in days.windows(2) {
            assert!(pair[0].day < pair[1].day);
            assert!(pair[0].joins > 0 && pair[1].joins > 0);
        }
    }

    #[tokio::test]
    async fn test_event_participants_are_drawn_from_accepted_members() {
        let src = source();
        for community in &src.communities {
            let tally = src
                .community_event_stats(
                    community.record.id,
                    DateRange::new(anchor() - Duration::days(120), anchor()),
                )
                .await
                .unwrap();
            assert!(tally.total_attending <= tally.total_rsvps);

            let participants = src
                .count_event_participants(community.record.id)
                .await
                .unwrap();
            let accepted = src.count_members_total(community.record.id).await.unwrap();
            assert!(participants <= accepted);
        }
    }

    #[tokio::test]
    async fn test_recent_members_newest_first() {
        let src = source();
        let id = src.communities[0].record.id;
        let recent = src.recent_members(id, 10).await.unwrap();
        assert_eq!(recent.len(), 10);
        for pair in recent.windows(2) {
            assert!(pair[0].join_date >= pair[1].join_date);
        }
    }

    #[tokio::test]
    async fn test_unknown_community_yields_nothing() {
        let src = source();
        let ghost = Uuid::from_u128(0xdead);
        assert!(src.find_community(ghost).await.unwrap().is_none());
        assert_eq!(src.count_members_total(ghost).await.unwrap(), 0);
    }
}
