//! Pedagogical elements (`element_pedagogi`).

use campus_core::{Classification, classify};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Element {
    pub cod_elp: String,
    pub lib_elp: String,
    pub cod_nel: Option<String>,
    pub nbr_crd_elp: Option<f64>,
    pub semester_number: Option<i16>,
    pub year_level: Option<i16>,
    pub element_type: String,
}

impl Element {
    /// Recomputes the classification from the stored code and label.
    pub fn classification(&self) -> Classification {
        classify(&self.cod_elp, Some(&self.lib_elp))
    }
}
