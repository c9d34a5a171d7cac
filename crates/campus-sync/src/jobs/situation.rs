use super::{SyncCounts, Tx};
use crate::error::SyncError;
use crate::source::SourceSituation;

const UPSERT: &str = r#"
INSERT INTO pedagogical_situation (cod_etu, cod_elp, cod_anu, cod_etp, last_sync)
VALUES ($1, $2, $3, $4, NOW())
ON CONFLICT (cod_etu, cod_elp, cod_anu) DO UPDATE SET
    cod_etp = EXCLUDED.cod_etp,
    last_sync = NOW(),
    updated_at = NOW()
WHERE pedagogical_situation.cod_etp IS DISTINCT FROM EXCLUDED.cod_etp
RETURNING (xmax = 0) AS inserted
"#;

pub(super) async fn upsert(
    tx: &mut Tx<'_>,
    rows: &[SourceSituation],
    counts: &mut SyncCounts,
) -> Result<(), SyncError> {
    for row in rows {
        let outcome = sqlx::query_scalar::<_, bool>(UPSERT)
            .bind(row.cod_etu.trim())
            .bind(row.cod_elp.trim())
            .bind(row.cod_anu.trim())
            .bind(row.cod_etp.as_deref())
            .fetch_optional(&mut **tx)
            .await?;
        counts.record(outcome);
    }
    Ok(())
}
