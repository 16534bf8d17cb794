//! Query Builder execution against a session

use tracing::debug;

use super::builder::QueryBuilder;
use crate::error::{OrmError, OrmResult};
use crate::model::Model;
use crate::session::Session;

impl<M: Model> QueryBuilder<M> {
    /// Execute the query and materialize every selected row
    pub async fn all<S>(&self, session: &mut S) -> OrmResult<Vec<M>>
    where
        S: Session + ?Sized,
    {
        let rows = session.fetch_all(&self.query).await?;
        debug!(
            table = %self.query.table,
            offset = ?self.query.offset,
            limit = ?self.query.limit,
            rows = rows.len(),
            "fetched rows"
        );

        rows.iter().map(|row| M::from_row(row.as_ref())).collect()
    }

    /// Count the rows the query would return
    pub async fn count<S>(&self, session: &mut S) -> OrmResult<u64>
    where
        S: Session + ?Sized,
    {
        session.count(&self.query).await
    }

    /// Existence test; stops at the first matching row
    pub async fn exists<S>(&self, session: &mut S) -> OrmResult<bool>
    where
        S: Session + ?Sized,
    {
        session.exists(&self.query).await
    }

    /// At most one row; two or more matches is [`OrmError::AmbiguousResult`]
    pub async fn one_or_none<S>(&self, session: &mut S) -> OrmResult<Option<M>>
    where
        S: Session + ?Sized,
    {
        let probe_limit = self.query.limit.map_or(2, |limit| limit.min(2));
        let probe = self.clone().limit(probe_limit);

        let mut rows = probe.all(session).await?;
        if rows.len() > 1 {
            return Err(OrmError::ambiguous(M::model_name(), self.criteria()));
        }
        Ok(rows.pop())
    }
}
