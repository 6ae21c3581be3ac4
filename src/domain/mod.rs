pub mod catalog;
pub mod dashboard;
mod events;
mod helpers;
mod ids;
pub mod orders;
pub mod users;
pub mod wishlist;

pub use events::{DomainEvent, OrderStream, WishlistStream};
pub use helpers::{
    fake::*,
    live_read_models::{EventReadingError, read_from_events},
};
pub use ids::*;

use disintegrate::{WithSnapshot, serde::json::Json};
use disintegrate_postgres::{Error, PgEventStore, PgSnapshotter, decision_maker};
use sqlx::PgPool;

pub type DecisionMaker = disintegrate_postgres::PgDecisionMaker<
    events::DomainEvent,
    Json<events::DomainEvent>,
    disintegrate_postgres::WithPgSnapshot,
>;

pub type EventStore = PgEventStore<DomainEvent, Json<DomainEvent>>;

pub async fn create_eventstore(pool: &PgPool) -> Result<EventStore, Error> {
    PgEventStore::new(pool.clone(), Json::<DomainEvent>::default()).await
}

pub async fn create_eventstore_and_decider(
    pool: &PgPool,
) -> Result<(EventStore, DecisionMaker), Error> {
    let event_store = create_eventstore(pool).await?;
    let snapshotter = PgSnapshotter::new(pool.clone(), 100).await?;
    let decider = decision_maker(event_store.clone(), WithSnapshot::new(snapshotter));
    Ok((event_store, decider))
}
