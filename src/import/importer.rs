use async_trait::async_trait;
use metrics::counter;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, SqlErr,
    TransactionTrait,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::error::ImportError;
use super::normalize::{NormalizationProfile, RowView};
use super::resolver::IdentityResolver;
use super::table::Table;

/// How a batch treats rows it cannot store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportPolicy {
    /// Stage every row, then insert them in one transaction. The first
    /// unresolved reference rejects the upload and nothing is written.
    AllOrNothing,
    /// Insert and commit each row on its own. Rows that hit a uniqueness or
    /// reference failure are dropped and the batch carries on.
    SkipRejected,
}

impl ImportPolicy {
    fn skips(self, err: &ImportError) -> bool {
        self == ImportPolicy::SkipRejected && err.is_reference_failure()
    }
}

/// Outcome reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportReport {
    Inserted(usize),
    /// Best-effort batches do not say how many rows landed.
    Acknowledged,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RowTally {
    pub inserted: usize,
    pub skipped: usize,
}

/// Per-entity half of an import: how rows are read and what they become.
#[async_trait]
pub trait RowPipeline: Send + Sync {
    type Row: Send + Sync;
    type Model: ActiveModelTrait + Send + 'static;

    const POLICY: ImportPolicy;

    fn profile(&self) -> &'static NormalizationProfile;

    fn normalize(&self, row: &RowView<'_>) -> Result<Self::Row, ImportError>;

    async fn build<C>(
        &self,
        row: &Self::Row,
        resolver: &mut IdentityResolver,
        conn: &C,
    ) -> Result<Self::Model, ImportError>
    where
        C: ConnectionTrait;
}

#[derive(Debug, Clone)]
pub struct BatchImporter {
    db: Arc<DatabaseConnection>,
    chunk_size: usize,
}

impl BatchImporter {
    pub fn new(db: Arc<DatabaseConnection>, chunk_size: usize) -> Self {
        Self {
            db,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Parses, normalizes and stores an uploaded table.
    ///
    /// Schema and cell errors fail the request before the store is touched.
    #[instrument(skip_all, fields(entity = pipeline.profile().entity, bytes = body.len()))]
    pub async fn import<P>(&self, pipeline: &P, body: &[u8]) -> Result<ImportReport, ImportError>
    where
        P: RowPipeline,
    {
        let rows = {
            let table = Table::parse(body)?;
            let normalized = pipeline.profile().apply(&table)?;
            normalized
                .rows()
                .map(|row| pipeline.normalize(&row))
                .collect::<Result<Vec<_>, _>>()?
        };
        let entity = pipeline.profile().entity;
        info!(entity, policy = ?P::POLICY, rows = rows.len(), "import started");

        let report = match P::POLICY {
            ImportPolicy::AllOrNothing => {
                let txn = self.db.begin().await?;
                // An early return drops `txn`, which rolls it back
                let tally = self.process_rows(pipeline, P::POLICY, &rows, &txn).await?;
                txn.commit().await?;
                info!(entity, inserted = tally.inserted, "upload committed");
                counter!("coalyard_import.rows_inserted", tally.inserted as u64, "entity" => entity);
                ImportReport::Inserted(tally.inserted)
            }
            ImportPolicy::SkipRejected => {
                let tally = self
                    .process_rows(pipeline, P::POLICY, &rows, self.db.as_ref())
                    .await?;
                info!(
                    entity,
                    inserted = tally.inserted,
                    skipped = tally.skipped,
                    "upload applied"
                );
                counter!("coalyard_import.rows_inserted", tally.inserted as u64, "entity" => entity);
                counter!("coalyard_import.rows_skipped", tally.skipped as u64, "entity" => entity);
                ImportReport::Acknowledged
            }
        };
        Ok(report)
    }

    /// The row loop shared by both policies.
    async fn process_rows<P, C>(
        &self,
        pipeline: &P,
        policy: ImportPolicy,
        rows: &[P::Row],
        conn: &C,
    ) -> Result<RowTally, ImportError>
    where
        P: RowPipeline,
        C: ConnectionTrait,
    {
        let mut resolver = IdentityResolver::new();
        let mut staged = Vec::new();
        let mut tally = RowTally::default();

        for (index, row) in rows.iter().enumerate() {
            let model = match pipeline.build(row, &mut resolver, conn).await {
                Ok(model) => model,
                Err(err) if policy.skips(&err) => {
                    debug!(row = index + 1, error = %err, "row skipped");
                    tally.skipped += 1;
                    continue;
                }
                Err(err) => {
                    warn!(row = index + 1, error = %err, "upload rejected");
                    counter!("coalyard_import.rejected", 1, "entity" => pipeline.profile().entity);
                    return Err(err);
                }
            };

            match policy {
                ImportPolicy::AllOrNothing => staged.push(model),
                ImportPolicy::SkipRejected => match insert_one(model, conn).await {
                    Ok(()) => tally.inserted += 1,
                    Err(err) if is_integrity_violation(&err) => {
                        debug!(row = index + 1, error = %err, "row skipped");
                        tally.skipped += 1;
                    }
                    Err(err) => return Err(err.into()),
                },
            }
        }

        if !staged.is_empty() {
            tally.inserted = insert_chunked(staged, conn, self.chunk_size).await?;
        }
        Ok(tally)
    }
}

async fn insert_one<A, C>(model: A, conn: &C) -> Result<(), DbErr>
where
    A: ActiveModelTrait + Send,
    C: ConnectionTrait,
{
    A::Entity::insert(model).exec(conn).await.map(|_| ())
}

/// Multi-row inserts of at most `chunk_size` rows each.
async fn insert_chunked<A, C>(models: Vec<A>, conn: &C, chunk_size: usize) -> Result<usize, DbErr>
where
    A: ActiveModelTrait + Send,
    C: ConnectionTrait,
{
    let total = models.len();
    let mut remaining = models;
    while !remaining.is_empty() {
        let rest = remaining.split_off(chunk_size.min(remaining.len()));
        let batch = std::mem::replace(&mut remaining, rest);
        A::Entity::insert_many(batch).exec(conn).await?;
    }
    Ok(total)
}

fn is_integrity_violation(err: &DbErr) -> bool {
    matches!(
        err.sql_err(),
        Some(SqlErr::UniqueConstraintViolation(_)) | Some(SqlErr::ForeignKeyConstraintViolation(_))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_best_effort_skips_lookups() {
        let missing = ImportError::ReferenceNotFound(
            crate::import::UnresolvedReference::Warehouse("W9".into()),
        );
        assert!(ImportPolicy::SkipRejected.skips(&missing));
        assert!(!ImportPolicy::AllOrNothing.skips(&missing));

        let malformed = ImportError::MalformedTable("bad".into());
        assert!(!ImportPolicy::SkipRejected.skips(&malformed));
    }

    #[test]
    fn custom_errors_are_not_integrity_violations() {
        assert!(!is_integrity_violation(&DbErr::Custom("boom".into())));
    }
}
