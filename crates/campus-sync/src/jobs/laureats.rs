use super::{SyncCounts, Tx};
use crate::error::SyncError;
use crate::source::SourceLaureat;

const UPSERT: &str = r#"
INSERT INTO laureats (cod_etu, cod_dip, lib_dip, cod_anu, not_vdi, cod_men, last_sync)
VALUES ($1, $2, $3, $4, $5, $6, NOW())
ON CONFLICT (cod_etu, cod_dip, cod_anu) DO UPDATE SET
    lib_dip = EXCLUDED.lib_dip,
    not_vdi = EXCLUDED.not_vdi,
    cod_men = EXCLUDED.cod_men,
    last_sync = NOW(),
    updated_at = NOW()
WHERE (laureats.lib_dip, laureats.not_vdi, laureats.cod_men)
  IS DISTINCT FROM (EXCLUDED.lib_dip, EXCLUDED.not_vdi, EXCLUDED.cod_men)
RETURNING (xmax = 0) AS inserted
"#;

pub(super) async fn upsert(
    tx: &mut Tx<'_>,
    rows: &[SourceLaureat],
    counts: &mut SyncCounts,
) -> Result<(), SyncError> {
    for row in rows {
        let outcome = sqlx::query_scalar::<_, bool>(UPSERT)
            .bind(row.cod_etu.trim())
            .bind(row.cod_dip.trim())
            .bind(row.lib_dip.trim())
            .bind(row.cod_anu.trim())
            .bind(row.not_vdi)
            .bind(row.cod_men.as_deref())
            .fetch_optional(&mut **tx)
            .await?;
        counts.record(outcome);
    }
    Ok(())
}
