use campus_core::classify;
use sqlx::PgPool;
use tracing::{info, instrument};

use super::{SyncCounts, Tx};
use crate::error::SyncError;
use crate::source::SourceElement;

const UPSERT: &str = r#"
INSERT INTO element_pedagogi (cod_elp, lib_elp, cod_nel, nbr_crd_elp,
                              semester_number, year_level, element_type, last_sync)
VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
ON CONFLICT (cod_elp) DO UPDATE SET
    lib_elp = EXCLUDED.lib_elp,
    cod_nel = EXCLUDED.cod_nel,
    nbr_crd_elp = EXCLUDED.nbr_crd_elp,
    semester_number = EXCLUDED.semester_number,
    year_level = EXCLUDED.year_level,
    element_type = EXCLUDED.element_type,
    last_sync = NOW(),
    updated_at = NOW()
WHERE (element_pedagogi.lib_elp, element_pedagogi.cod_nel, element_pedagogi.nbr_crd_elp,
       element_pedagogi.semester_number, element_pedagogi.year_level,
       element_pedagogi.element_type)
  IS DISTINCT FROM
      (EXCLUDED.lib_elp, EXCLUDED.cod_nel, EXCLUDED.nbr_crd_elp,
       EXCLUDED.semester_number, EXCLUDED.year_level, EXCLUDED.element_type)
RETURNING (xmax = 0) AS inserted
"#;

pub(super) async fn upsert(
    tx: &mut Tx<'_>,
    rows: &[SourceElement],
    counts: &mut SyncCounts,
) -> Result<(), SyncError> {
    for row in rows {
        let code = row.cod_elp.trim();
        let label = row.lib_elp.trim();
        let c = classify(code, Some(label));

        let outcome = sqlx::query_scalar::<_, bool>(UPSERT)
            .bind(code)
            .bind(label)
            .bind(row.cod_nel.as_deref())
            .bind(row.nbr_crd_elp)
            .bind(c.semester.map(i16::from))
            .bind(c.year_level.map(i16::from))
            .bind(c.element_type.as_str())
            .fetch_optional(&mut **tx)
            .await?;
        counts.record(outcome);
    }
    Ok(())
}

/// Recomputes the classification of every stored element.
///
/// Only rows whose classification changed are written. Returns
/// `(examined, changed)`.
#[instrument(skip(pool))]
pub async fn classify_elements(pool: &PgPool) -> Result<(usize, u64), SyncError> {
    let elements: Vec<(String, String)> =
        sqlx::query_as("SELECT cod_elp, lib_elp FROM element_pedagogi ORDER BY cod_elp")
            .fetch_all(pool)
            .await?;

    let mut tx = pool.begin().await?;
    let mut changed = 0;
    for (code, label) in &elements {
        let c = classify(code, Some(label));
        changed += sqlx::query(
            r#"UPDATE element_pedagogi
               SET semester_number = $2, year_level = $3, element_type = $4, updated_at = NOW()
               WHERE cod_elp = $1
                 AND (semester_number, year_level, element_type)
                     IS DISTINCT FROM ($2::SMALLINT, $3::SMALLINT, $4::VARCHAR)"#,
        )
        .bind(code)
        .bind(c.semester.map(i16::from))
        .bind(c.year_level.map(i16::from))
        .bind(c.element_type.as_str())
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }
    tx.commit().await?;

    info!(examined = elements.len(), changed, "Element classification refreshed");
    Ok((elements.len(), changed))
}
