//! Connection settings of the Oracle source system.
//!
//! - `ORACLE_USER`, `ORACLE_PASSWORD`: credentials (required)
//! - `ORACLE_CONNECT_STRING`: EZConnect string such as `//db-host:1521/APOGEE` (required)

use crate::MissingVar;

#[derive(Clone)]
pub struct OracleConfig {
    pub user: String,
    pub password: String,
    pub connect_string: String,
}

impl std::fmt::Debug for OracleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleConfig")
            .field("user", &self.user)
            .field("connect_string", &self.connect_string)
            .finish_non_exhaustive()
    }
}

impl OracleConfig {
    pub fn from_env() -> Result<Self, MissingVar> {
        Ok(Self {
            user: crate::required("ORACLE_USER")?,
            password: crate::required("ORACLE_PASSWORD")?,
            connect_string: crate::required("ORACLE_CONNECT_STRING")?,
        })
    }
}
