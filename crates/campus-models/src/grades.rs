//! Grades and the views built from them.
//!
//! Rows come from `grades` joined with `element_pedagogi`. The API never
//! returns them flat: [`GradesResponse::from_rows`] nests them by year, session,
//! season and semester, [`GradeStats::from_rows`] summarizes final results and
//! [`Transcript::build`] keeps one final line per element.

use std::collections::BTreeMap;

use campus_core::Season;
use campus_core::serde::deserialize_optional_string;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// Normal exam session code.
pub const SESSION_NORMAL: &str = "1";
/// Resit ("rattrapage") session code.
pub const SESSION_RESIT: &str = "2";

const VALIDATED_CODES: &[&str] = &["V", "ADM", "VAR", "VAC"];
const FAILED_CODES: &[&str] = &["NV", "AJ", "AJAC", "DEF"];

/// Whether a result code means validated (`Some(true)`), failed
/// (`Some(false)`) or is unknown/absent (`None`).
pub fn is_validated(cod_tre: Option<&str>) -> Option<bool> {
    let code = cod_tre?.trim().to_uppercase();
    if VALIDATED_CODES.contains(&code.as_str()) {
        Some(true)
    } else if FAILED_CODES.contains(&code.as_str()) {
        Some(false)
    } else {
        None
    }
}

pub fn session_label(cod_ses: &str) -> &'static str {
    match cod_ses {
        SESSION_NORMAL => "Session normale",
        SESSION_RESIT => "Rattrapage",
        _ => "Autre session",
    }
}

/// A grade joined with its element.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct GradeRow {
    pub cod_elp: String,
    pub lib_elp: Option<String>,
    pub cod_anu: String,
    pub cod_ses: String,
    pub note: Option<f64>,
    pub cod_tre: Option<String>,
    pub nbr_crd_elp: Option<f64>,
    pub semester_number: Option<i16>,
    pub element_type: Option<String>,
}

impl GradeRow {
    fn semester(&self) -> Option<u8> {
        self.semester_number.and_then(|s| u8::try_from(s).ok())
    }

    /// A resit row only counts when it carries a mark or a result.
    fn is_resit_result(&self) -> bool {
        self.cod_ses == SESSION_RESIT && (self.note.is_some() || self.cod_tre.is_some())
    }
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct GradeFilter {
    /// Academic year, e.g. `2024`
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub year: Option<String>,
    /// Session code: `1` normal, `2` rattrapage
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub session: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct GradeEntry {
    pub cod_elp: String,
    pub lib_elp: Option<String>,
    pub note: Option<f64>,
    pub cod_tre: Option<String>,
    pub credits: Option<f64>,
    pub validated: Option<bool>,
}

impl From<&GradeRow> for GradeEntry {
    fn from(row: &GradeRow) -> Self {
        Self {
            cod_elp: row.cod_elp.clone(),
            lib_elp: row.lib_elp.clone(),
            note: row.note,
            cod_tre: row.cod_tre.clone(),
            credits: row.nbr_crd_elp,
            validated: is_validated(row.cod_tre.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SemesterGrades {
    /// `None` groups elements with no known semester (yearly or unclassified).
    pub semester: Option<u8>,
    pub grades: Vec<GradeEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SeasonGrades {
    pub season: Option<Season>,
    pub semesters: Vec<SemesterGrades>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SessionGrades {
    pub cod_ses: String,
    pub label: String,
    pub seasons: Vec<SeasonGrades>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct YearGrades {
    pub cod_anu: String,
    pub sessions: Vec<SessionGrades>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct GradesResponse {
    pub years: Vec<YearGrades>,
}

type Nested<'a> =
    BTreeMap<&'a str, BTreeMap<&'a str, BTreeMap<Option<Season>, BTreeMap<Option<u8>, Vec<&'a GradeRow>>>>>;

impl GradesResponse {
    /// Groups rows by year (most recent first), then session, season and
    /// semester. Elements without a semester come last within a session.
    pub fn from_rows(rows: &[GradeRow]) -> Self {
        let mut nested: Nested<'_> = BTreeMap::new();
        for row in rows {
            let semester = row.semester();
            nested
                .entry(row.cod_anu.as_str())
                .or_default()
                .entry(row.cod_ses.as_str())
                .or_default()
                .entry(semester.map(Season::of_semester))
                .or_default()
                .entry(semester)
                .or_default()
                .push(row);
        }

        let years = nested
            .into_iter()
            .rev()
            .map(|(year, sessions)| YearGrades {
                cod_anu: year.to_string(),
                sessions: sessions
                    .into_iter()
                    .map(|(ses, seasons)| SessionGrades {
                        cod_ses: ses.to_string(),
                        label: session_label(ses).to_string(),
                        seasons: sort_unknown_last(seasons)
                            .into_iter()
                            .map(|(season, semesters)| SeasonGrades {
                                season,
                                semesters: sort_unknown_last(semesters)
                                    .into_iter()
                                    .map(|(semester, mut rows)| {
                                        rows.sort_by(|a, b| a.cod_elp.cmp(&b.cod_elp));
                                        SemesterGrades {
                                            semester,
                                            grades: rows.into_iter().map(GradeEntry::from).collect(),
                                        }
                                    })
                                    .collect(),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        Self { years }
    }
}

/// `BTreeMap` orders `None` first; the API lists unclassified groups last.
fn sort_unknown_last<K: Ord, V>(map: BTreeMap<Option<K>, V>) -> Vec<(Option<K>, V)> {
    let (mut known, unknown): (Vec<_>, Vec<_>) = map.into_iter().partition(|(k, _)| k.is_some());
    known.extend(unknown);
    known
}

/// Final result per element and year: the resit row when it carries a
/// result, the normal session row otherwise.
pub fn final_results(rows: &[GradeRow]) -> Vec<&GradeRow> {
    let mut best: BTreeMap<(&str, &str), &GradeRow> = BTreeMap::new();
    for row in rows {
        let key = (row.cod_anu.as_str(), row.cod_elp.as_str());
        match best.get(&key) {
            Some(current) if current.is_resit_result() => {}
            Some(current) if current.cod_ses == SESSION_NORMAL && !row.is_resit_result() => {}
            _ => {
                best.insert(key, row);
            }
        }
    }
    best.into_values().collect()
}

fn average(notes: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = notes.fold((0.0, 0usize), |(s, c), n| (s + n, c + 1));
    (count > 0).then(|| round2(sum / count as f64))
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SemesterAverage {
    pub semester: u8,
    pub average: Option<f64>,
    pub validated: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct GradeStats {
    /// Distinct element/year results.
    pub total: usize,
    pub graded: usize,
    pub validated: usize,
    pub failed: usize,
    pub pending: usize,
    pub average: Option<f64>,
    pub best: Option<f64>,
    pub worst: Option<f64>,
    pub by_semester: Vec<SemesterAverage>,
}

impl GradeStats {
    pub fn from_rows(rows: &[GradeRow]) -> Self {
        let finals = final_results(rows);
        let notes: Vec<f64> = finals.iter().filter_map(|r| r.note).collect();

        let mut validated = 0;
        let mut failed = 0;
        for row in &finals {
            match is_validated(row.cod_tre.as_deref()) {
                Some(true) => validated += 1,
                Some(false) => failed += 1,
                None => {}
            }
        }

        let mut semesters: BTreeMap<u8, Vec<&GradeRow>> = BTreeMap::new();
        for row in &finals {
            if let Some(semester) = row.semester() {
                semesters.entry(semester).or_default().push(row);
            }
        }
        let by_semester = semesters
            .into_iter()
            .map(|(semester, rows)| SemesterAverage {
                semester,
                average: average(rows.iter().filter_map(|r| r.note)),
                validated: rows
                    .iter()
                    .filter(|r| is_validated(r.cod_tre.as_deref()) == Some(true))
                    .count(),
                total: rows.len(),
            })
            .collect();

        Self {
            total: finals.len(),
            graded: notes.len(),
            validated,
            failed,
            pending: finals.len() - validated - failed,
            average: average(notes.iter().copied()),
            best: notes.iter().copied().reduce(f64::max),
            worst: notes.iter().copied().reduce(f64::min),
            by_semester,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TranscriptLine {
    pub cod_elp: String,
    pub lib_elp: Option<String>,
    pub note: Option<f64>,
    pub cod_tre: Option<String>,
    pub credits: Option<f64>,
    /// Session the result was obtained in.
    pub cod_ses: String,
    pub validated: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TranscriptSemester {
    pub semester: Option<u8>,
    pub season: Option<Season>,
    pub average: Option<f64>,
    pub lines: Vec<TranscriptLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Transcript {
    pub cod_etu: String,
    pub name: String,
    pub cod_anu: String,
    pub semesters: Vec<TranscriptSemester>,
    pub average: Option<f64>,
    pub validated_credits: f64,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct TranscriptFilter {
    /// Academic year; defaults to the most recent year with grades
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub year: Option<String>,
}

impl Transcript {
    /// Builds the transcript of `cod_anu` from the rows of that year.
    pub fn build(cod_etu: &str, name: &str, cod_anu: &str, rows: &[GradeRow]) -> Self {
        let finals: Vec<&GradeRow> = final_results(rows)
            .into_iter()
            .filter(|r| r.cod_anu == cod_anu)
            .collect();

        let mut by_semester: BTreeMap<Option<u8>, Vec<&GradeRow>> = BTreeMap::new();
        for row in &finals {
            by_semester.entry(row.semester()).or_default().push(row);
        }

        let semesters = sort_unknown_last(by_semester)
            .into_iter()
            .map(|(semester, rows)| TranscriptSemester {
                semester,
                season: semester.map(Season::of_semester),
                average: average(rows.iter().filter_map(|r| r.note)),
                lines: rows
                    .into_iter()
                    .map(|r| TranscriptLine {
                        cod_elp: r.cod_elp.clone(),
                        lib_elp: r.lib_elp.clone(),
                        note: r.note,
                        cod_tre: r.cod_tre.clone(),
                        credits: r.nbr_crd_elp,
                        cod_ses: r.cod_ses.clone(),
                        validated: is_validated(r.cod_tre.as_deref()),
                    })
                    .collect(),
            })
            .collect();

        let validated_credits = finals
            .iter()
            .filter(|r| is_validated(r.cod_tre.as_deref()) == Some(true))
            .filter_map(|r| r.nbr_crd_elp)
            .sum();

        Self {
            cod_etu: cod_etu.to_string(),
            name: name.to_string(),
            cod_anu: cod_anu.to_string(),
            semesters,
            average: average(finals.iter().filter_map(|r| r.note)),
            validated_credits,
        }
    }
}
