//! A [`SourceSystem`] backed by an in-memory batch, usually read from a JSON
//! export. Lets the jobs run without an Oracle client.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::source::{
    SourceElement, SourceGrade, SourceLaureat, SourceSituation, SourceStudent, SourceSystem,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub students: Vec<SourceStudent>,
    pub elements: Vec<SourceElement>,
    pub grades: Vec<SourceGrade>,
    pub situations: Vec<SourceSituation>,
    pub laureats: Vec<SourceLaureat>,
}

#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    snapshot: Snapshot,
}

impl SnapshotSource {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, SyncError> {
        let raw = tokio::fs::read(path).await?;
        Ok(Self::new(serde_json::from_slice(&raw)?))
    }
}

#[async_trait]
impl SourceSystem for SnapshotSource {
    async fn students(&self) -> Result<Vec<SourceStudent>, SyncError> {
        Ok(self.snapshot.students.clone())
    }

    async fn elements(&self) -> Result<Vec<SourceElement>, SyncError> {
        Ok(self.snapshot.elements.clone())
    }

    async fn grades(&self, year: Option<&str>) -> Result<Vec<SourceGrade>, SyncError> {
        Ok(self
            .snapshot
            .grades
            .iter()
            .filter(|g| year.is_none_or(|y| g.cod_anu == y))
            .cloned()
            .collect())
    }

    async fn situations(&self) -> Result<Vec<SourceSituation>, SyncError> {
        Ok(self.snapshot.situations.clone())
    }

    async fn laureats(&self) -> Result<Vec<SourceLaureat>, SyncError> {
        Ok(self.snapshot.laureats.clone())
    }
}
