//! The source system seen by the jobs.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SyncError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceStudent {
    pub cod_etu: String,
    pub lib_nom_pat_ind: String,
    #[serde(default)]
    pub lib_pr1_ind: String,
    #[serde(default)]
    pub date_nai_ind: Option<NaiveDate>,
    #[serde(default)]
    pub cod_nne_ind: Option<String>,
    #[serde(default)]
    pub cin_ind: Option<String>,
    #[serde(default)]
    pub cod_sex_etu: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub nb_inscriptions: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceElement {
    pub cod_elp: String,
    #[serde(default)]
    pub lib_elp: String,
    #[serde(default)]
    pub cod_nel: Option<String>,
    #[serde(default)]
    pub nbr_crd_elp: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceGrade {
    pub cod_etu: String,
    pub cod_elp: String,
    pub cod_anu: String,
    pub cod_ses: String,
    #[serde(default)]
    pub note: Option<f64>,
    #[serde(default)]
    pub cod_tre: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSituation {
    pub cod_etu: String,
    pub cod_elp: String,
    pub cod_anu: String,
    #[serde(default)]
    pub cod_etp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceLaureat {
    pub cod_etu: String,
    pub cod_dip: String,
    #[serde(default)]
    pub lib_dip: String,
    pub cod_anu: String,
    #[serde(default)]
    pub not_vdi: Option<f64>,
    #[serde(default)]
    pub cod_men: Option<String>,
}

/// Read side of a synchronization run. Each method returns one full batch.
#[async_trait]
pub trait SourceSystem: Send + Sync {
    async fn students(&self) -> Result<Vec<SourceStudent>, SyncError>;

    async fn elements(&self) -> Result<Vec<SourceElement>, SyncError>;

    /// Grades, restricted to one academic year when `year` is set.
    async fn grades(&self, year: Option<&str>) -> Result<Vec<SourceGrade>, SyncError>;

    async fn situations(&self) -> Result<Vec<SourceSituation>, SyncError>;

    async fn laureats(&self) -> Result<Vec<SourceLaureat>, SyncError>;
}
