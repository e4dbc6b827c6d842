//! Database entity types.
//!
//! Entities are row mappings for the read-only queries the live source
//! runs; they convert into domain records at the source boundary.

mod community;
mod event;
mod member;
mod referral;

pub use community::{CommunityEntity, StandingEntity};
pub use event::EventStatsEntity;
pub use member::{JoinDayEntity, RecentMemberEntity};
pub use referral::ReferralCountsEntity;
