use disintegrate::{Event, EventId, EventStore, StreamQuery};
use futures::stream::StreamExt;

use crate::infra::ClientError;

/// Builds a read model on request by folding every event matching `query`, oldest first,
/// instead of reading a projection table.
pub async fn read_from_events<RM, ID, E, ES, QE, AE>(
    event_store: &ES,
    query: &StreamQuery<ID, QE>,
    initial_read_model: RM,
    apply_event: AE,
) -> Result<RM, EventReadingError<ID, ES::Error>>
where
    ID: EventId,
    E: Event + Clone + Send + Sync + 'static,
    ES: EventStore<ID, E>,
    QE: TryFrom<E> + Event + 'static + Clone + Send + Sync,
    <QE as TryFrom<E>>::Error: std::error::Error + 'static + Send + Sync,
    AE: Fn(RM, QE) -> RM,
{
    let mut events = event_store.stream(query);
    let mut read_model = initial_read_model;
    let mut after_event_id = ID::default();

    while let Some(next) = events.next().await {
        match next {
            Ok(event) => {
                after_event_id = event.id();
                read_model = apply_event(read_model, event.into_inner());
            }
            Err(source) => {
                return Err(EventReadingError {
                    after_event_id,
                    source,
                });
            }
        }
    }

    Ok(read_model)
}

/// The stream failed part way. `after_event_id` is the last event folded successfully.
#[derive(Debug, thiserror::Error)]
#[error("Reading events for a live read model failed after event {after_event_id}.")]
pub struct EventReadingError<ID: EventId, ERR> {
    pub after_event_id: ID,
    pub source: ERR,
}

impl<
    ID: EventId + std::fmt::Debug + std::fmt::Display,
    Err: std::error::Error + Send + Sync + 'static,
> From<EventReadingError<ID, Err>> for ClientError
{
    fn from(value: EventReadingError<ID, Err>) -> Self {
        ClientError::Internal(anyhow::Error::new(value))
    }
}
