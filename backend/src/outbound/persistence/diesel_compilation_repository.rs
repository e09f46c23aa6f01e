//! Diesel-backed [`CompilationRepository`].

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::attraction::PlaceId;
use crate::domain::compilation::{Compilation, CompilationSummary};
use crate::domain::ports::{CompilationRepository, StoreError};
use crate::domain::user::UserId;
use crate::outbound::persistence::models::{
    CompilationItemRow, CompilationRow, NewCompilationItemRow, NewCompilationRow,
};
use crate::outbound::persistence::pool::{DbPool, checkout, map_query_error};
use crate::outbound::persistence::schema::{compilation_items, compilations};

pub struct DieselCompilationRepository {
    pool: DbPool,
}

impl DieselCompilationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

async fn hydrate(
    conn: &mut AsyncPgConnection,
    row: CompilationRow,
) -> Result<Compilation, StoreError> {
    let items = compilation_items::table
        .filter(compilation_items::compilation_id.eq(row.id))
        .order(compilation_items::position.asc())
        .select(CompilationItemRow::as_select())
        .load::<CompilationItemRow>(conn)
        .await
        .map_err(map_query_error)?;
    row.into_domain(items)
}

#[async_trait]
impl CompilationRepository for DieselCompilationRepository {
    async fn find_or_create(
        &self,
        owner: UserId,
        name: &str,
    ) -> Result<(Compilation, bool), StoreError> {
        let mut conn = checkout(&self.pool).await?;
        // DO NOTHING on the (owner_id, name) unique index keeps concurrent
        // find-or-creates from racing into duplicates.
        let inserted = diesel::insert_into(compilations::table)
            .values(&NewCompilationRow {
                id: Uuid::new_v4(),
                owner_id: owner.as_uuid(),
                name,
            })
            .on_conflict((compilations::owner_id, compilations::name))
            .do_nothing()
            .returning(CompilationRow::as_returning())
            .get_result::<CompilationRow>(&mut conn)
            .await
            .optional()
            .map_err(map_query_error)?;
        match inserted {
            Some(row) => Ok((hydrate(&mut conn, row).await?, true)),
            None => {
                let row = compilations::table
                    .filter(
                        compilations::owner_id
                            .eq(owner.as_uuid())
                            .and(compilations::name.eq(name)),
                    )
                    .select(CompilationRow::as_select())
                    .first::<CompilationRow>(&mut conn)
                    .await
                    .map_err(map_query_error)?;
                Ok((hydrate(&mut conn, row).await?, false))
            }
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Compilation>, StoreError> {
        let mut conn = checkout(&self.pool).await?;
        let row = compilations::table
            .find(id)
            .select(CompilationRow::as_select())
            .first::<CompilationRow>(&mut conn)
            .await
            .optional()
            .map_err(map_query_error)?;
        match row {
            Some(row) => Ok(Some(hydrate(&mut conn, row).await?)),
            None => Ok(None),
        }
    }

    async fn list_by_owner(&self, owner: UserId) -> Result<Vec<CompilationSummary>, StoreError> {
        let mut conn = checkout(&self.pool).await?;
        let rows = compilations::table
            .filter(compilations::owner_id.eq(owner.as_uuid()))
            .order(compilations::updated_at.desc())
            .select(CompilationRow::as_select())
            .load::<CompilationRow>(&mut conn)
            .await
            .map_err(map_query_error)?;
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let counts: HashMap<Uuid, i64> = compilation_items::table
            .filter(compilation_items::compilation_id.eq_any(&ids))
            .group_by(compilation_items::compilation_id)
            .select((
                compilation_items::compilation_id,
                diesel::dsl::count_star(),
            ))
            .load::<(Uuid, i64)>(&mut conn)
            .await
            .map_err(map_query_error)?
            .into_iter()
            .collect();
        Ok(rows
            .into_iter()
            .map(|row| CompilationSummary {
                item_count: counts.get(&row.id).copied().unwrap_or(0),
                id: row.id,
                name: row.name,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
            .collect())
    }

    async fn add_item(&self, compilation_id: Uuid, place_id: &PlaceId) -> Result<bool, StoreError> {
        let mut conn = checkout(&self.pool).await?;
        let place = place_id.as_str().to_owned();
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                // Lock the parent row so concurrent adds serialize their
                // position reads.
                compilations::table
                    .find(compilation_id)
                    .select(compilations::id)
                    .for_update()
                    .first::<Uuid>(conn)
                    .await?;
                let tail: Option<i32> = compilation_items::table
                    .filter(compilation_items::compilation_id.eq(compilation_id))
                    .select(diesel::dsl::max(compilation_items::position))
                    .first::<Option<i32>>(conn)
                    .await?;
                // The composite primary key absorbs duplicate adds.
                let affected = diesel::insert_into(compilation_items::table)
                    .values(&NewCompilationItemRow {
                        compilation_id,
                        place_id: &place,
                        position: tail.map_or(0, |position| position + 1),
                    })
                    .on_conflict_do_nothing()
                    .execute(conn)
                    .await?;
                if affected > 0 {
                    diesel::update(compilations::table.find(compilation_id))
                        .set(compilations::updated_at.eq(diesel::dsl::now))
                        .execute(conn)
                        .await?;
                }
                Ok(affected > 0)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_query_error)
    }

    async fn remove_item(
        &self,
        compilation_id: Uuid,
        place_id: &PlaceId,
    ) -> Result<bool, StoreError> {
        let mut conn = checkout(&self.pool).await?;
        let removed = diesel::delete(
            compilation_items::table.find((compilation_id, place_id.as_str().to_owned())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_query_error)?;
        if removed > 0 {
            diesel::update(compilations::table.find(compilation_id))
                .set(compilations::updated_at.eq(diesel::dsl::now))
                .execute(&mut conn)
                .await
                .map_err(map_query_error)?;
        }
        Ok(removed > 0)
    }
}
