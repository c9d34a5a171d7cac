use super::{SyncCounts, Tx};
use crate::error::SyncError;
use crate::source::SourceGrade;

const UPSERT: &str = r#"
INSERT INTO grades (cod_etu, cod_elp, cod_anu, cod_ses, note, cod_tre, last_sync)
VALUES ($1, $2, $3, $4, $5, $6, NOW())
ON CONFLICT (cod_etu, cod_elp, cod_anu, cod_ses) DO UPDATE SET
    note = EXCLUDED.note,
    cod_tre = EXCLUDED.cod_tre,
    last_sync = NOW(),
    updated_at = NOW()
WHERE (grades.note, grades.cod_tre) IS DISTINCT FROM (EXCLUDED.note, EXCLUDED.cod_tre)
RETURNING (xmax = 0) AS inserted
"#;

pub(super) async fn upsert(
    tx: &mut Tx<'_>,
    rows: &[SourceGrade],
    counts: &mut SyncCounts,
) -> Result<(), SyncError> {
    for row in rows {
        let outcome = sqlx::query_scalar::<_, bool>(UPSERT)
            .bind(row.cod_etu.trim())
            .bind(row.cod_elp.trim())
            .bind(row.cod_anu.trim())
            .bind(row.cod_ses.trim())
            .bind(row.note)
            .bind(row.cod_tre.as_deref().map(str::trim))
            .fetch_optional(&mut **tx)
            .await?;
        counts.record(outcome);
    }
    Ok(())
}
