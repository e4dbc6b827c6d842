//! Event analytics row mappings.

use sqlx::FromRow;

use domain::source::EventTally;

/// Aggregated participant counts over a set of events.
#[derive(Debug, Clone, FromRow)]
pub struct EventStatsEntity {
    pub total_events: i64,
    pub total_rsvps: i64,
    pub total_attending: i64,
}

impl From<EventStatsEntity> for EventTally {
    fn from(entity: EventStatsEntity) -> Self {
        EventTally {
            total_events: entity.total_events,
            total_rsvps: entity.total_rsvps,
            total_attending: entity.total_attending,
        }
    }
}
