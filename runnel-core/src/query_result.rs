use crate::{Result, RowLabeled};
use futures::stream::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Owner of the live resources backing one streaming query: the row stream
/// and, through it, the statement and pooled connection it was produced from.
///
/// Ownership is transferred into the terminal stream, which is the sole
/// closer. [`close`](Self::close) releases exactly once no matter how often
/// it is invoked or on which exit path (exhaustion, early termination,
/// error); dropping the result releases too.
pub struct AsyncQueryResult<R> {
    rows: Option<R>,
}

impl<R> AsyncQueryResult<R> {
    pub fn new(rows: R) -> Self {
        Self { rows: Some(rows) }
    }

    pub fn is_closed(&self) -> bool {
        self.rows.is_none()
    }

    /// Idempotent release of the underlying resources.
    pub fn close(&mut self) {
        self.rows = None;
    }
}

impl<R> Stream for AsyncQueryResult<R>
where
    R: Stream<Item = Result<RowLabeled>> + Unpin,
{
    type Item = Result<RowLabeled>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let Some(rows) = this.rows.as_mut() else {
            return Poll::Ready(None);
        };
        let poll = Pin::new(rows).poll_next(cx);
        if matches!(poll, Poll::Ready(None)) {
            // Exhausted: hand the connection back without waiting for close.
            this.rows = None;
        }
        poll
    }
}
