//! Existence checks and single-row lookups

use crate::error::{OrmError, OrmResult};
use crate::model::Model;
use crate::query::{Filter, QueryBuilder};
use crate::session::Session;

/// Whether any `M` row matches all `filters`
pub async fn exists<M, S>(session: &mut S, filters: Vec<Filter>) -> OrmResult<bool>
where
    M: Model,
    S: Session + ?Sized,
{
    QueryBuilder::<M>::build(filters).exists(session).await
}

/// The single `M` row matching all `filters`.
///
/// No match is [`OrmError::NotFound`] and several matches are
/// [`OrmError::AmbiguousResult`]; both carry the entity name and the
/// rendered criteria.
pub async fn get_or_fail<M, S>(session: &mut S, filters: Vec<Filter>) -> OrmResult<M>
where
    M: Model,
    S: Session + ?Sized,
{
    let query = QueryBuilder::<M>::build(filters);
    query
        .one_or_none(session)
        .await?
        .ok_or_else(|| OrmError::not_found(M::model_name(), query.criteria()))
}
