use anyhow::Context;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::tables::{
    CategoricalLookupRow, CategoricalLookupTable, LookupTables, NumericLookupRow,
    NumericLookupTable, TrainingMeta,
};

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Persists one training run and its tables atomically.
pub async fn store_lookup_tables(
    pool: &PgPool,
    meta: &TrainingMeta,
    tables: &LookupTables,
) -> anyhow::Result<()> {
    let random_seed = meta
        .random_seed
        .map(i64::try_from)
        .transpose()
        .context("random seed does not fit a BIGINT column")?;

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO team_medals.training_runs
        (id, trained_at, sample_size, random_seed, numeric_rows, categorical_rows)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(meta.training_run_id)
    .bind(meta.trained_at)
    .bind(meta.sample_size as i64)
    .bind(random_seed)
    .bind(meta.numeric_rows as i64)
    .bind(meta.categorical_rows as i64)
    .execute(&mut *tx)
    .await
    .context("failed to record training run")?;

    for (position, row) in tables.numeric.rows().iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO team_medals.numeric_lookup
            (training_run_id, position, column_name, percentage,
             interpolated_value_above, interpolated_value_below)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(meta.training_run_id)
        .bind(position as i32)
        .bind(&row.column_name)
        .bind(row.percentage)
        .bind(row.interpolated_value_above)
        .bind(row.interpolated_value_below)
        .execute(&mut *tx)
        .await?;
    }

    for (position, row) in tables.categorical.rows().iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO team_medals.categorical_lookup
            (training_run_id, position, column_name, value, percentage_share,
             rank_ascending, rank_descending)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(meta.training_run_id)
        .bind(position as i32)
        .bind(&row.column_name)
        .bind(&row.value)
        .bind(row.percentage_share)
        .bind(row.rank_ascending as i32)
        .bind(row.rank_descending as i32)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    info!(
        training_run_id = %meta.training_run_id,
        numeric_rows = meta.numeric_rows,
        categorical_rows = meta.categorical_rows,
        "lookup tables stored"
    );
    Ok(())
}

pub async fn fetch_latest_lookup_tables(
    pool: &PgPool,
) -> anyhow::Result<Option<(TrainingMeta, LookupTables)>> {
    let run = sqlx::query(
        r#"
        SELECT id, trained_at, sample_size, random_seed, numeric_rows, categorical_rows
        FROM team_medals.training_runs
        ORDER BY trained_at DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    let Some(run) = run else {
        return Ok(None);
    };

    let training_run_id: Uuid = run.get("id");
    let random_seed: Option<i64> = run.get("random_seed");
    let meta = TrainingMeta {
        training_run_id,
        trained_at: run.get("trained_at"),
        sample_size: usize::try_from(run.get::<i64, _>("sample_size"))?,
        random_seed: random_seed.map(u64::try_from).transpose()?,
        numeric_rows: usize::try_from(run.get::<i64, _>("numeric_rows"))?,
        categorical_rows: usize::try_from(run.get::<i64, _>("categorical_rows"))?,
    };

    let numeric_rows = sqlx::query(
        r#"
        SELECT column_name, percentage, interpolated_value_above, interpolated_value_below
        FROM team_medals.numeric_lookup
        WHERE training_run_id = $1
        ORDER BY position
        "#,
    )
    .bind(training_run_id)
    .fetch_all(pool)
    .await?;

    let numeric = NumericLookupTable::from_rows(
        numeric_rows
            .into_iter()
            .map(|row| NumericLookupRow {
                column_name: row.get("column_name"),
                percentage: row.get("percentage"),
                interpolated_value_above: row.get("interpolated_value_above"),
                interpolated_value_below: row.get("interpolated_value_below"),
            })
            .collect(),
    );

    let categorical_rows = sqlx::query(
        r#"
        SELECT column_name, value, percentage_share, rank_ascending, rank_descending
        FROM team_medals.categorical_lookup
        WHERE training_run_id = $1
        ORDER BY position
        "#,
    )
    .bind(training_run_id)
    .fetch_all(pool)
    .await?;

    let mut categorical = Vec::with_capacity(categorical_rows.len());
    for row in categorical_rows {
        categorical.push(CategoricalLookupRow {
            column_name: row.get("column_name"),
            value: row.get("value"),
            percentage_share: row.get("percentage_share"),
            rank_ascending: u32::try_from(row.get::<i32, _>("rank_ascending"))?,
            rank_descending: u32::try_from(row.get::<i32, _>("rank_descending"))?,
        });
    }

    let tables = LookupTables {
        numeric,
        categorical: CategoricalLookupTable::from_rows(categorical),
    };
    Ok(Some((meta, tables)))
}
