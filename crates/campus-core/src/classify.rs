//! Classification of pedagogical elements from their code and label.
//!
//! Source systems do not carry the semester of an element explicitly, so it
//! is inferred from naming conventions of the element code (`JMDS1...`,
//! `JLDN3...`, `JL2S1...`) with a fallback on a bare `S<n>` token and then on
//! the French label. A second, independent rule decides whether an element is
//! yearly (`1A`..`5A`, `1ère année`) or semester based.
//!
//! [`classify`] is the only entry point; the sync jobs, the backfill command
//! and the API all go through it.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

macro_rules! pattern {
    ($name:ident, $regex_str:expr) => {
        static $name: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new($regex_str).ok());
    };
}

// `JL1S1`, `JLF2S2`: study year followed by a semester within that year.
pattern!(RE_YEAR_SEMESTER, r"^J[A-Z]{1,3}([1-5])S([1-8])");
// `JMDS1`, `JLDS4`: prefix ending in `S` then the semester.
pattern!(RE_PREFIX_S, r"^J[A-Z]{2,3}S([1-8])");
// `JLDN3`: four letter prefix directly followed by the semester.
pattern!(RE_PREFIX_DIGIT, r"^J[A-Z]{3}([1-8])");
// Any `S<n>` token not followed by another digit.
pattern!(RE_BARE_S, r"S([1-8])(?:[^0-9]|$)");
// Code level yearly marker: `1A`..`5A` at the end or before a separator.
pattern!(RE_CODE_YEAR, r"(?:^|[^0-9])([1-5])A(?:$|[^A-Z0-9])");

pattern!(RE_LABEL_SEMESTER, r"(?i)(?:semestre|sem\.?)\s*([1-8])(?:[^0-9]|$)");
pattern!(RE_LABEL_S, r"(?:^|[^A-Za-z0-9])S\s?([1-8])(?:[^0-9]|$)");
pattern!(
    RE_LABEL_YEAR,
    r"(?i)(?:^|[^0-9])([1-5])\s*(?:ère|ere|ème|eme|er|e|è)?\s*ann[ée]e"
);
pattern!(RE_LABEL_YEAR_SUFFIX, r"(?i)ann[ée]e\s*([1-5])(?:[^0-9]|$)");

/// Kind of a pedagogical element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// Taught over a whole academic year (`1A`..`5A`).
    Yearly,
    /// Attached to one semester.
    Semester,
    /// Neither marker could be found.
    Module,
}

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Yearly => "yearly",
            ElementType::Semester => "semester",
            ElementType::Module => "module",
        }
    }
}

impl std::str::FromStr for ElementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yearly" => Ok(ElementType::Yearly),
            "semester" => Ok(ElementType::Semester),
            "module" => Ok(ElementType::Module),
            other => Err(format!("unknown element type: {}", other)),
        }
    }
}

/// Semester grouping by parity: odd semesters run in autumn, even ones in spring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum Season {
    Automne,
    Printemps,
}

impl Season {
    pub fn of_semester(semester: u8) -> Self {
        if semester % 2 == 1 {
            Season::Automne
        } else {
            Season::Printemps
        }
    }
}

/// Result of [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Classification {
    /// Semester number 1..=8, when one could be inferred.
    pub semester: Option<u8>,
    /// Study year 1..=5: the yearly marker, or derived from the semester.
    pub year_level: Option<u8>,
    pub element_type: ElementType,
    pub season: Option<Season>,
}

fn capture_u8(re: &LazyLock<Option<Regex>>, haystack: &str, group: usize) -> Option<u8> {
    re.as_ref()?
        .captures(haystack)?
        .get(group)?
        .as_str()
        .parse()
        .ok()
}

fn semester_from_code(code: &str) -> Option<u8> {
    if let Some(caps) = RE_YEAR_SEMESTER.as_ref().and_then(|re| re.captures(code)) {
        let year: u8 = caps.get(1)?.as_str().parse().ok()?;
        let within: u8 = caps.get(2)?.as_str().parse().ok()?;
        let semester = if within <= 2 {
            (year - 1) * 2 + within
        } else {
            within
        };
        if (1..=8).contains(&semester) {
            return Some(semester);
        }
    }

    capture_u8(&RE_PREFIX_S, code, 1)
        .or_else(|| capture_u8(&RE_PREFIX_DIGIT, code, 1))
        .or_else(|| capture_u8(&RE_BARE_S, code, 1))
}

fn semester_from_label(label: &str) -> Option<u8> {
    capture_u8(&RE_LABEL_SEMESTER, label, 1).or_else(|| capture_u8(&RE_LABEL_S, label, 1))
}

fn year_marker(code: &str, label: Option<&str>) -> Option<u8> {
    capture_u8(&RE_CODE_YEAR, code, 1).or_else(|| {
        let label = label?;
        capture_u8(&RE_LABEL_YEAR, label, 1).or_else(|| capture_u8(&RE_LABEL_YEAR_SUFFIX, label, 1))
    })
}

/// Classifies an element from its code and optional free-text label.
///
/// The code cascade always wins over the label; the label is only consulted
/// when the code yields nothing.
pub fn classify(code: &str, label: Option<&str>) -> Classification {
    let code = code.trim().to_uppercase();
    let label = label.map(str::trim).filter(|l| !l.is_empty());

    // A yearly element spans both semesters of its year and carries neither
    // a semester nor a season.
    if let Some(year) = year_marker(&code, label) {
        return Classification {
            semester: None,
            year_level: Some(year),
            element_type: ElementType::Yearly,
            season: None,
        };
    }

    let semester =
        semester_from_code(&code).or_else(|| label.and_then(semester_from_label));

    Classification {
        semester,
        year_level: semester.map(|s| s.div_ceil(2)),
        element_type: if semester.is_some() {
            ElementType::Semester
        } else {
            ElementType::Module
        },
        season: semester.map(Season::of_semester),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_with_s() {
        assert_eq!(classify("JMDS1ALG", None).semester, Some(1));
        assert_eq!(classify("JLDS4", None).semester, Some(4));
    }

    #[test]
    fn test_prefix_with_digit() {
        assert_eq!(classify("JLDN3", None).semester, Some(3));
        assert_eq!(classify("jldn3ana", None).semester, Some(3));
    }

    #[test]
    fn test_year_and_semester_within_year() {
        assert_eq!(classify("JL1S1", None).semester, Some(1));
        assert_eq!(classify("JL1S2", None).semester, Some(2));
        assert_eq!(classify("JL2S1", None).semester, Some(3));
        assert_eq!(classify("JL3S2", None).semester, Some(6));
        assert_eq!(classify("JL2S4", None).semester, Some(4));
    }

    #[test]
    fn test_bare_s_suffix() {
        assert_eq!(classify("ALGOS5", None).semester, Some(5));
        assert_eq!(classify("INFO-S7", None).semester, Some(7));
    }

    #[test]
    fn test_no_semester_token() {
        let c = classify("ABC123", None);
        assert_eq!(c.semester, None);
        assert_eq!(c.season, None);
        assert_eq!(c.element_type, ElementType::Module);
        assert_eq!(c.year_level, None);
    }

    #[test]
    fn test_s_followed_by_two_digits_is_not_a_semester() {
        assert_eq!(classify("XS10", None).semester, None);
        assert_eq!(classify("XS9", None).semester, None);
    }

    #[test]
    fn test_label_fallback() {
        assert_eq!(classify("MOD001", Some("Analyse - Semestre 3")).semester, Some(3));
        assert_eq!(classify("MOD002", Some("Algèbre S2")).semester, Some(2));
        assert_eq!(classify("MOD003", Some("Algèbre")).semester, None);
    }

    #[test]
    fn test_code_wins_over_label() {
        assert_eq!(classify("JMDS1", Some("Semestre 6")).semester, Some(1));
    }

    #[test]
    fn test_yearly_from_code() {
        let c = classify("JLDN1A", None);
        assert_eq!(c.element_type, ElementType::Yearly);
        assert_eq!(c.year_level, Some(1));
        assert_eq!(c.semester, None);
        assert_eq!(c.season, None);

        let c = classify("JL3A", None);
        assert_eq!(c.element_type, ElementType::Yearly);
        assert_eq!(c.year_level, Some(3));
        assert_eq!(c.semester, None);
    }

    #[test]
    fn test_yearly_label_drops_semester_from_label() {
        let c = classify("DIPL04", Some("Semestre 3 - 2ème année"));
        assert_eq!(
            c,
            Classification {
                semester: None,
                year_level: Some(2),
                element_type: ElementType::Yearly,
                season: None,
            }
        );
    }

    #[test]
    fn test_semester_code_followed_by_letters_is_not_yearly() {
        let c = classify("JLDN3ALG", None);
        assert_eq!(c.element_type, ElementType::Semester);
        assert_eq!(c.semester, Some(3));
        assert_eq!(c.year_level, Some(2));
    }

    #[test]
    fn test_yearly_from_label() {
        let c = classify("DIPL01", Some("1ère année Licence"));
        assert_eq!(c.element_type, ElementType::Yearly);
        assert_eq!(c.year_level, Some(1));

        let c = classify("DIPL02", Some("Deuxième cycle - Année 4"));
        assert_eq!(c.element_type, ElementType::Yearly);
        assert_eq!(c.year_level, Some(4));

        let c = classify("DIPL03", Some("2eme annee"));
        assert_eq!(c.year_level, Some(2));
    }

    #[test]
    fn test_season_by_parity() {
        assert_eq!(classify("JMDS1", None).season, Some(Season::Automne));
        assert_eq!(classify("JMDS4", None).season, Some(Season::Printemps));
        assert_eq!(Season::of_semester(7), Season::Automne);
    }

    #[test]
    fn test_year_level_from_semester() {
        assert_eq!(classify("JMDS1", None).year_level, Some(1));
        assert_eq!(classify("JMDS2", None).year_level, Some(1));
        assert_eq!(classify("JMDS5", None).year_level, Some(3));
        assert_eq!(classify("JMDS8", None).year_level, Some(4));
    }

    #[test]
    fn test_element_type_round_trip_str() {
        for t in [ElementType::Yearly, ElementType::Semester, ElementType::Module] {
            assert_eq!(t.as_str().parse::<ElementType>().unwrap(), t);
        }
        assert!("annual".parse::<ElementType>().is_err());
    }
}
