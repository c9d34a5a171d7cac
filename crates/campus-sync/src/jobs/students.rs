use super::{SyncCounts, Tx};
use crate::error::SyncError;
use crate::source::SourceStudent;

const UPSERT: &str = r#"
INSERT INTO students (cod_etu, lib_nom_pat_ind, lib_pr1_ind, date_nai_ind, cod_nne_ind,
                      cin_ind, cod_sex_etu, email, nb_inscriptions, last_sync)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW())
ON CONFLICT (cod_etu) DO UPDATE SET
    lib_nom_pat_ind = EXCLUDED.lib_nom_pat_ind,
    lib_pr1_ind = EXCLUDED.lib_pr1_ind,
    date_nai_ind = EXCLUDED.date_nai_ind,
    cod_nne_ind = EXCLUDED.cod_nne_ind,
    cin_ind = EXCLUDED.cin_ind,
    cod_sex_etu = EXCLUDED.cod_sex_etu,
    email = COALESCE(EXCLUDED.email, students.email),
    nb_inscriptions = EXCLUDED.nb_inscriptions,
    last_sync = NOW(),
    updated_at = NOW()
WHERE (students.lib_nom_pat_ind, students.lib_pr1_ind, students.date_nai_ind,
       students.cod_nne_ind, students.cin_ind, students.cod_sex_etu,
       students.email, students.nb_inscriptions)
  IS DISTINCT FROM
      (EXCLUDED.lib_nom_pat_ind, EXCLUDED.lib_pr1_ind, EXCLUDED.date_nai_ind,
       EXCLUDED.cod_nne_ind, EXCLUDED.cin_ind, EXCLUDED.cod_sex_etu,
       COALESCE(EXCLUDED.email, students.email), EXCLUDED.nb_inscriptions)
RETURNING (xmax = 0) AS inserted
"#;

pub(super) async fn upsert(
    tx: &mut Tx<'_>,
    rows: &[SourceStudent],
    counts: &mut SyncCounts,
) -> Result<(), SyncError> {
    for row in rows {
        let outcome = sqlx::query_scalar::<_, bool>(UPSERT)
            .bind(row.cod_etu.trim())
            .bind(row.lib_nom_pat_ind.trim())
            .bind(row.lib_pr1_ind.trim())
            .bind(row.date_nai_ind)
            .bind(row.cod_nne_ind.as_deref())
            .bind(row.cin_ind.as_deref())
            .bind(row.cod_sex_etu.as_deref())
            .bind(row.email.as_deref())
            .bind(row.nb_inscriptions)
            .fetch_optional(&mut **tx)
            .await?;
        counts.record(outcome);
    }
    Ok(())
}
