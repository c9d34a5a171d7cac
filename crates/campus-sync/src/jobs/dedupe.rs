//! Collapses rows that share a natural key before they reach an upsert.
//!
//! The upsert keys are narrower than the source keys, so a batch may carry
//! several rows for one target row. Exactly one of them is kept, chosen by a
//! total order over the row's fields, which makes the choice independent of
//! the order the source returned them in.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::source::{SourceElement, SourceGrade, SourceLaureat, SourceSituation, SourceStudent};

pub(super) trait NaturalKey {
    type Key: Ord;

    /// The conflict target of the row's upsert, trimmed like the bound values.
    fn natural_key(&self) -> Self::Key;

    /// `Less` when `self` should be kept over `other`.
    fn precedence(&self, other: &Self) -> Ordering;
}

/// Keeps one row per natural key. Returns the kept rows in key order and the
/// number of rows dropped.
pub(super) fn collapse<T: NaturalKey>(rows: Vec<T>) -> (Vec<T>, usize) {
    let total = rows.len();
    let mut kept: BTreeMap<T::Key, T> = BTreeMap::new();
    for row in rows {
        match kept.entry(row.natural_key()) {
            Entry::Vacant(slot) => {
                slot.insert(row);
            }
            Entry::Occupied(mut slot) => {
                if row.precedence(slot.get()).is_lt() {
                    slot.insert(row);
                }
            }
        }
    }
    let dropped = total - kept.len();
    (kept.into_values().collect(), dropped)
}

/// Present values first, larger first.
fn higher_first(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Present values first, smaller first.
fn present_first(a: Option<&str>, b: Option<&str>) -> Ordering {
    (a.is_none(), a).cmp(&(b.is_none(), b))
}

fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim)
}

impl NaturalKey for SourceStudent {
    type Key = String;

    fn natural_key(&self) -> String {
        self.cod_etu.trim().to_string()
    }

    fn precedence(&self, other: &Self) -> Ordering {
        other
            .nb_inscriptions
            .cmp(&self.nb_inscriptions)
            .then_with(|| {
                (
                    &self.lib_nom_pat_ind,
                    &self.lib_pr1_ind,
                    self.date_nai_ind,
                    &self.cod_nne_ind,
                    &self.cin_ind,
                    &self.cod_sex_etu,
                    &self.email,
                    &self.cod_etu,
                )
                    .cmp(&(
                        &other.lib_nom_pat_ind,
                        &other.lib_pr1_ind,
                        other.date_nai_ind,
                        &other.cod_nne_ind,
                        &other.cin_ind,
                        &other.cod_sex_etu,
                        &other.email,
                        &other.cod_etu,
                    ))
            })
    }
}

impl NaturalKey for SourceElement {
    type Key = String;

    fn natural_key(&self) -> String {
        self.cod_elp.trim().to_string()
    }

    fn precedence(&self, other: &Self) -> Ordering {
        (&self.lib_elp, &self.cod_nel)
            .cmp(&(&other.lib_elp, &other.cod_nel))
            .then_with(|| higher_first(self.nbr_crd_elp, other.nbr_crd_elp))
            .then_with(|| self.cod_elp.cmp(&other.cod_elp))
    }
}

impl NaturalKey for SourceGrade {
    type Key = (String, String, String, String);

    fn natural_key(&self) -> Self::Key {
        (
            self.cod_etu.trim().to_string(),
            self.cod_elp.trim().to_string(),
            self.cod_anu.trim().to_string(),
            self.cod_ses.trim().to_string(),
        )
    }

    fn precedence(&self, other: &Self) -> Ordering {
        higher_first(self.note, other.note)
            .then_with(|| present_first(trimmed(&self.cod_tre), trimmed(&other.cod_tre)))
            .then_with(|| {
                (&self.cod_tre, &self.cod_etu, &self.cod_elp, &self.cod_anu, &self.cod_ses).cmp(&(
                    &other.cod_tre,
                    &other.cod_etu,
                    &other.cod_elp,
                    &other.cod_anu,
                    &other.cod_ses,
                ))
            })
    }
}

impl NaturalKey for SourceSituation {
    type Key = (String, String, String);

    fn natural_key(&self) -> Self::Key {
        (
            self.cod_etu.trim().to_string(),
            self.cod_elp.trim().to_string(),
            self.cod_anu.trim().to_string(),
        )
    }

    /// Smallest step code wins, as `MIN(COD_ETP)` does on the Oracle side.
    fn precedence(&self, other: &Self) -> Ordering {
        present_first(trimmed(&self.cod_etp), trimmed(&other.cod_etp)).then_with(|| {
            (&self.cod_etp, &self.cod_etu, &self.cod_elp, &self.cod_anu).cmp(&(
                &other.cod_etp,
                &other.cod_etu,
                &other.cod_elp,
                &other.cod_anu,
            ))
        })
    }
}

impl NaturalKey for SourceLaureat {
    type Key = (String, String, String);

    fn natural_key(&self) -> Self::Key {
        (
            self.cod_etu.trim().to_string(),
            self.cod_dip.trim().to_string(),
            self.cod_anu.trim().to_string(),
        )
    }

    /// Best mark first, then mention, then label.
    fn precedence(&self, other: &Self) -> Ordering {
        higher_first(self.not_vdi, other.not_vdi)
            .then_with(|| present_first(trimmed(&self.cod_men), trimmed(&other.cod_men)))
            .then_with(|| self.lib_dip.trim().cmp(other.lib_dip.trim()))
            .then_with(|| {
                (&self.cod_men, &self.lib_dip, &self.cod_etu, &self.cod_dip, &self.cod_anu).cmp(&(
                    &other.cod_men,
                    &other.lib_dip,
                    &other.cod_etu,
                    &other.cod_dip,
                    &other.cod_anu,
                ))
            })
    }
}
