//! Diesel-backed [`AttractionRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::attraction::{Attraction, AttractionFilter, PlaceId};
use crate::domain::ports::{AttractionRepository, StoreError};
use crate::outbound::persistence::models::{AttractionRow, AttractionUpsert};
use crate::outbound::persistence::pool::{DbPool, checkout, map_query_error};
use crate::outbound::persistence::schema::attractions;

pub struct DieselAttractionRepository {
    pool: DbPool,
}

impl DieselAttractionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn rows_into_domain(rows: Vec<AttractionRow>) -> Result<Vec<Attraction>, StoreError> {
    rows.into_iter().map(AttractionRow::into_domain).collect()
}

type BoxedAttractions<'a> = attractions::BoxedQuery<'a, diesel::pg::Pg>;

/// Apply optional country and city scoping. `ILIKE` with no wildcard in the
/// pattern behaves as case-insensitive equality.
fn scope_query(
    mut query: BoxedAttractions<'static>,
    filter: &AttractionFilter,
) -> BoxedAttractions<'static> {
    if let Some(country) = filter.country.as_deref() {
        query = query.filter(attractions::country.ilike(country.to_owned()));
    }
    if let Some(city) = filter.city.as_deref() {
        query = query.filter(attractions::city.ilike(city.to_owned()));
    }
    query
}

#[async_trait]
impl AttractionRepository for DieselAttractionRepository {
    async fn upsert(&self, attraction: &Attraction) -> Result<Attraction, StoreError> {
        let mut conn = checkout(&self.pool).await?;
        let upsert = AttractionUpsert::from(attraction);
        let row = diesel::insert_into(attractions::table)
            .values(&upsert)
            .on_conflict(attractions::place_id)
            .do_update()
            .set((&upsert, attractions::updated_at.eq(diesel::dsl::now)))
            .returning(AttractionRow::as_returning())
            .get_result::<AttractionRow>(&mut conn)
            .await
            .map_err(map_query_error)?;
        row.into_domain()
    }

    async fn find_by_place_id(&self, place_id: &PlaceId) -> Result<Option<Attraction>, StoreError> {
        let mut conn = checkout(&self.pool).await?;
        let row = attractions::table
            .find(place_id.as_str())
            .select(AttractionRow::as_select())
            .first::<AttractionRow>(&mut conn)
            .await
            .optional()
            .map_err(map_query_error)?;
        row.map(AttractionRow::into_domain).transpose()
    }

    async fn search(
        &self,
        text: &str,
        filter: &AttractionFilter,
        limit: i64,
    ) -> Result<Vec<Attraction>, StoreError> {
        let mut conn = checkout(&self.pool).await?;
        let pattern = format!("%{text}%");
        let mut query = attractions::table
            .filter(
                attractions::name
                    .ilike(pattern.clone())
                    .or(attractions::formatted_address.ilike(pattern.clone()))
                    .or(attractions::city.ilike(pattern)),
            )
            .into_boxed();
        query = scope_query(query, filter);
        let rows = query
            .order((
                attractions::likes.desc(),
                attractions::rating.desc(),
                attractions::user_ratings_total.desc(),
            ))
            .limit(limit)
            .select(AttractionRow::as_select())
            .load::<AttractionRow>(&mut conn)
            .await
            .map_err(map_query_error)?;
        rows_into_domain(rows)
    }

    async fn list_popular(
        &self,
        filter: &AttractionFilter,
        limit: i64,
    ) -> Result<Vec<Attraction>, StoreError> {
        let mut conn = checkout(&self.pool).await?;
        let rows = scope_query(attractions::table.into_boxed(), filter)
            .order((
                attractions::likes.desc(),
                attractions::rating.desc(),
                attractions::user_ratings_total.desc(),
            ))
            .limit(limit)
            .select(AttractionRow::as_select())
            .load::<AttractionRow>(&mut conn)
            .await
            .map_err(map_query_error)?;
        rows_into_domain(rows)
    }

    async fn list_similar(
        &self,
        base: &Attraction,
        limit: i64,
    ) -> Result<Vec<Attraction>, StoreError> {
        let mut query = attractions::table.into_boxed();
        query = match (base.city.as_deref(), base.category.as_deref()) {
            (Some(city), Some(category)) => query.filter(
                attractions::city
                    .eq(city.to_owned())
                    .or(attractions::category.eq(category.to_owned())),
            ),
            (Some(city), None) => query.filter(attractions::city.eq(city.to_owned())),
            (None, Some(category)) => query.filter(attractions::category.eq(category.to_owned())),
            // Nothing to be similar by.
            (None, None) => return Ok(Vec::new()),
        };
        let mut conn = checkout(&self.pool).await?;
        let rows = query
            .filter(attractions::place_id.ne(base.place_id.as_str().to_owned()))
            .order((
                attractions::likes.desc(),
                attractions::rating.desc(),
                attractions::user_ratings_total.desc(),
            ))
            .limit(limit)
            .select(AttractionRow::as_select())
            .load::<AttractionRow>(&mut conn)
            .await
            .map_err(map_query_error)?;
        rows_into_domain(rows)
    }
}
