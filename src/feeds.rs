use crate::table::{self, Table};
use std::time::{Duration, Instant};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read the {feed} feed")]
    Feed {
        feed: &'static str,
        source: table::Error,
    },
}

/// The three raw feeds of the dashboard, column-normalized but otherwise untouched.
pub struct Feeds {
    pub petty_cash: Table,
    pub purchase_requests: Table,
    pub stock: Table,
}

/// Load all three feeds in one go so a dashboard render always sees a
/// consistent snapshot.
pub fn load_feeds(
    petty_cash: impl std::io::Read,
    purchase_requests: impl std::io::Read,
    stock: impl std::io::Read,
) -> Result<Feeds, Error> {
    Ok(Feeds {
        petty_cash: read_feed("petty cash", petty_cash)?,
        purchase_requests: read_feed("purchase request", purchase_requests)?,
        stock: read_feed("stock", stock)?,
    })
}

fn read_feed(feed: &'static str, read: impl std::io::Read) -> Result<Table, Error> {
    Table::from_reader(read).map_err(|source| Error::Feed { feed, source })
}

/// A time-bounded holder for loaded [`Feeds`].
///
/// This is the only state that outlives a render. It is passed explicitly to
/// whoever drives the pipeline, never held globally, and a `clear()` is all it
/// takes to force fresh data on the next access.
pub struct FeedCache {
    ttl: Duration,
    slot: Option<(Instant, Feeds)>,
}

impl FeedCache {
    pub fn new(ttl: Duration) -> Self {
        FeedCache { ttl, slot: None }
    }

    /// The cached feeds while they are fresh, otherwise whatever `load`
    /// produces, which is then retained for the next `ttl` window.
    pub fn get_or_load<E>(
        &mut self,
        load: impl FnOnce() -> Result<Feeds, E>,
    ) -> Result<&Feeds, E> {
        let fresh = self
            .slot
            .as_ref()
            .map_or(false, |(loaded_at, _)| loaded_at.elapsed() < self.ttl);
        if !fresh {
            self.slot = Some((Instant::now(), load()?));
        }
        Ok(&self.slot.as_ref().expect("just set").1)
    }

    /// Drop the cached feeds so the next access reloads.
    pub fn clear(&mut self) {
        self.slot = None;
    }
}
