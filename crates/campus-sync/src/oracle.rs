//! [`SourceSystem`] over the Apogee Oracle schema.
//!
//! The `oracle` driver is blocking: every query opens its own session on a
//! blocking thread and returns the full batch.

use async_trait::async_trait;
use campus_config::OracleConfig;
use oracle::sql_type::ToSql;
use oracle::{Connection, Row};
use tracing::{debug, instrument};

use crate::error::SyncError;
use crate::source::{
    SourceElement, SourceGrade, SourceLaureat, SourceSituation, SourceStudent, SourceSystem,
};

const STUDENTS_SQL: &str = "\
SELECT TO_CHAR(i.COD_ETU), i.LIB_NOM_PAT_IND, i.LIB_PR1_IND, i.DATE_NAI_IND,
       i.COD_NNE_IND, i.CIN_IND, i.COD_SEX_ETU,
       (SELECT COUNT(DISTINCT iae.COD_ANU) FROM INS_ADM_ETP iae
         WHERE iae.COD_IND = i.COD_IND AND iae.ETA_IAE = 'E')
  FROM INDIVIDU i
 WHERE i.COD_ETU IS NOT NULL";

const ELEMENTS_SQL: &str = "\
SELECT COD_ELP, LIB_ELP, COD_NEL, NBR_CRD_ELP
  FROM ELEMENT_PEDAGOGI";

const GRADES_SQL: &str = "\
SELECT TO_CHAR(i.COD_ETU), r.COD_ELP, r.COD_ANU, r.COD_SES, r.NOT_ELP, r.COD_TRE
  FROM RESULTAT_ELP r
  JOIN INDIVIDU i ON i.COD_IND = r.COD_IND
 WHERE i.COD_ETU IS NOT NULL AND r.COD_ADM = 1";

const GRADES_FOR_YEAR_SQL: &str = "\
SELECT TO_CHAR(i.COD_ETU), r.COD_ELP, r.COD_ANU, r.COD_SES, r.NOT_ELP, r.COD_TRE
  FROM RESULTAT_ELP r
  JOIN INDIVIDU i ON i.COD_IND = r.COD_IND
 WHERE i.COD_ETU IS NOT NULL AND r.COD_ADM = 1 AND r.COD_ANU = :1";

const SITUATIONS_SQL: &str = "\
SELECT TO_CHAR(i.COD_ETU), ice.COD_ELP, ice.COD_ANU, MIN(ice.COD_ETP)
  FROM IND_CONTRAT_ELP ice
  JOIN INDIVIDU i ON i.COD_IND = ice.COD_IND
 WHERE i.COD_ETU IS NOT NULL
 GROUP BY i.COD_ETU, ice.COD_ELP, ice.COD_ANU";

const LAUREATS_SQL: &str = "\
SELECT cod_etu, cod_dip, lib_dip, cod_anu, not_vdi, cod_men FROM (
  SELECT TO_CHAR(i.COD_ETU) cod_etu, rv.COD_DIP cod_dip, d.LIB_DIP lib_dip, rv.COD_ANU cod_anu,
         rv.NOT_VDI not_vdi, rv.COD_MEN cod_men,
         ROW_NUMBER() OVER (
           PARTITION BY i.COD_ETU, rv.COD_DIP, rv.COD_ANU
           ORDER BY rv.NOT_VDI DESC NULLS LAST, rv.COD_MEN ASC NULLS LAST, d.LIB_DIP ASC
         ) rn
    FROM RESULTAT_VDI rv
    JOIN INDIVIDU i ON i.COD_IND = rv.COD_IND
    JOIN DIPLOME d ON d.COD_DIP = rv.COD_DIP
   WHERE i.COD_ETU IS NOT NULL AND rv.COD_ADM = 1 AND rv.COD_TRE = 'ADM'
) WHERE rn = 1";

#[derive(Debug, Clone)]
pub struct OracleSource {
    config: OracleConfig,
}

impl OracleSource {
    pub fn new(config: OracleConfig) -> Self {
        Self { config }
    }

    async fn fetch<T, F>(
        &self,
        sql: &'static str,
        params: Vec<String>,
        map: F,
    ) -> Result<Vec<T>, SyncError>
    where
        T: Send + 'static,
        F: Fn(&Row) -> oracle::Result<T> + Send + 'static,
    {
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || -> Result<Vec<T>, SyncError> {
            let conn = Connection::connect(&config.user, &config.password, &config.connect_string)?;
            let binds: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();

            let mut out = Vec::new();
            for row in conn.query(sql, &binds)? {
                out.push(map(&row?)?);
            }
            debug!(rows = out.len(), "Oracle batch fetched");
            Ok(out)
        })
        .await?
    }
}

#[async_trait]
impl SourceSystem for OracleSource {
    #[instrument(skip(self))]
    async fn students(&self) -> Result<Vec<SourceStudent>, SyncError> {
        self.fetch(STUDENTS_SQL, Vec::new(), |row| {
            let nb: Option<i64> = row.get(7)?;
            Ok(SourceStudent {
                cod_etu: row.get(0)?,
                lib_nom_pat_ind: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                lib_pr1_ind: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                date_nai_ind: row.get(3)?,
                cod_nne_ind: row.get(4)?,
                cin_ind: row.get(5)?,
                cod_sex_etu: row.get(6)?,
                email: None,
                nb_inscriptions: nb.and_then(|n| i32::try_from(n).ok()).unwrap_or(0),
            })
        })
        .await
    }

    #[instrument(skip(self))]
    async fn elements(&self) -> Result<Vec<SourceElement>, SyncError> {
        self.fetch(ELEMENTS_SQL, Vec::new(), |row| {
            Ok(SourceElement {
                cod_elp: row.get(0)?,
                lib_elp: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                cod_nel: row.get(2)?,
                nbr_crd_elp: row.get(3)?,
            })
        })
        .await
    }

    #[instrument(skip(self))]
    async fn grades(&self, year: Option<&str>) -> Result<Vec<SourceGrade>, SyncError> {
        let (sql, params) = match year {
            Some(year) => (GRADES_FOR_YEAR_SQL, vec![year.to_string()]),
            None => (GRADES_SQL, Vec::new()),
        };
        self.fetch(sql, params, |row| {
            Ok(SourceGrade {
                cod_etu: row.get(0)?,
                cod_elp: row.get(1)?,
                cod_anu: row.get(2)?,
                cod_ses: row.get(3)?,
                note: row.get(4)?,
                cod_tre: row.get(5)?,
            })
        })
        .await
    }

    #[instrument(skip(self))]
    async fn situations(&self) -> Result<Vec<SourceSituation>, SyncError> {
        self.fetch(SITUATIONS_SQL, Vec::new(), |row| {
            Ok(SourceSituation {
                cod_etu: row.get(0)?,
                cod_elp: row.get(1)?,
                cod_anu: row.get(2)?,
                cod_etp: row.get(3)?,
            })
        })
        .await
    }

    #[instrument(skip(self))]
    async fn laureats(&self) -> Result<Vec<SourceLaureat>, SyncError> {
        self.fetch(LAUREATS_SQL, Vec::new(), |row| {
            Ok(SourceLaureat {
                cod_etu: row.get(0)?,
                cod_dip: row.get(1)?,
                lib_dip: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                cod_anu: row.get(3)?,
                not_vdi: row.get(4)?,
                cod_men: row.get(5)?,
            })
        })
        .await
    }
}
