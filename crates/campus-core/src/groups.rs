//! Exam group specifiers and surname-range membership rules.
//!
//! An exam planning entry names its audience with a free-text specifier such
//! as `G1 (Amphi A)+G2`: groups joined by `+`, each optionally annotated with
//! a parenthetical. A group is defined per module by one or more grouping
//! rules, each an inclusive surname range. `Tous` means every enrolled student.
//!
//! Surnames are compared upper-cased, in byte order (the `"C"` collation),
//! never with locale rules.

use serde::Serialize;
use utoipa::ToSchema;

/// Group token meaning "no filtering".
pub const ALL_GROUPS: &str = "Tous";

/// Parsed group specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupSpec {
    /// No specifier, or one containing `Tous`.
    All,
    /// Distinct group names in order of appearance.
    Groups(Vec<String>),
}

impl GroupSpec {
    /// Parses a composite specifier.
    ///
    /// Annotations (everything from the first `(` of a token) are dropped,
    /// tokens are trimmed, empty tokens are skipped and duplicates removed.
    pub fn parse(spec: Option<&str>) -> Self {
        let Some(spec) = spec else {
            return GroupSpec::All;
        };

        let mut groups: Vec<String> = Vec::new();
        for token in spec.split('+') {
            let name = match token.find('(') {
                Some(idx) => &token[..idx],
                None => token,
            }
            .trim();

            if name.is_empty() {
                continue;
            }
            if name.eq_ignore_ascii_case(ALL_GROUPS) {
                return GroupSpec::All;
            }
            if !groups.iter().any(|g| g == name) {
                groups.push(name.to_string());
            }
        }

        if groups.is_empty() {
            GroupSpec::All
        } else {
            GroupSpec::Groups(groups)
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, GroupSpec::All)
    }

    /// Group names to look up; empty for [`GroupSpec::All`].
    pub fn groups(&self) -> &[String] {
        match self {
            GroupSpec::All => &[],
            GroupSpec::Groups(groups) => groups,
        }
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_uppercase()
}

/// Inclusive surname range of a grouping rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SurnameRange {
    pub start: String,
    pub end: String,
}

impl SurnameRange {
    pub fn new(start: &str, end: &str) -> Self {
        Self {
            start: normalize(start),
            end: normalize(end),
        }
    }

    /// Whether the bounds are ordered (`start <= end` in byte order).
    pub fn is_ordered(&self) -> bool {
        self.start.as_bytes() <= self.end.as_bytes()
    }

    /// `start <= surname`, and `surname <= end` or `surname` starts with `end`.
    ///
    /// The prefix clause makes `end = "DUP"` admit `DUPONT`, which a plain
    /// `<=` would reject.
    pub fn contains(&self, surname: &str) -> bool {
        let surname = normalize(surname);
        let s = surname.as_bytes();
        s >= self.start.as_bytes() && (s <= self.end.as_bytes() || s.starts_with(self.end.as_bytes()))
    }
}

/// A grouping rule as seen by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRule {
    pub module_pattern: String,
    pub group_name: String,
    pub range: SurnameRange,
}

/// Membership filter built from a specifier and the rules of a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupFilter {
    /// Every enrolled student qualifies.
    All,
    /// A student qualifies if any range contains their surname.
    Ranges {
        ranges: Vec<SurnameRange>,
        unmatched_groups: Vec<String>,
    },
}

impl GroupFilter {
    /// Keeps the rules whose `module_pattern` matches `module_pattern`
    /// (case-insensitive `LIKE`) and whose group is named in `spec`.
    pub fn build(spec: &GroupSpec, module_pattern: &str, rules: &[GroupRule]) -> Self {
        let groups = match spec {
            GroupSpec::All => return GroupFilter::All,
            GroupSpec::Groups(groups) => groups,
        };

        let mut ranges = Vec::new();
        let mut unmatched_groups = Vec::new();
        for group in groups {
            let before = ranges.len();
            ranges.extend(
                rules
                    .iter()
                    .filter(|r| &r.group_name == group)
                    .filter(|r| like_matches(module_pattern, &r.module_pattern))
                    .map(|r| r.range.clone()),
            );
            if ranges.len() == before {
                unmatched_groups.push(group.clone());
            }
        }

        GroupFilter::Ranges {
            ranges,
            unmatched_groups,
        }
    }

    pub fn admits(&self, surname: &str) -> bool {
        match self {
            GroupFilter::All => true,
            GroupFilter::Ranges { ranges, .. } => ranges.iter().any(|r| r.contains(surname)),
        }
    }

    pub fn unmatched_groups(&self) -> &[String] {
        match self {
            GroupFilter::All => &[],
            GroupFilter::Ranges {
                unmatched_groups, ..
            } => unmatched_groups,
        }
    }
}

/// Case-insensitive SQL `LIKE`: `%` matches any run, `_` one character,
/// `\` escapes the next character.
pub fn like_matches(pattern: &str, value: &str) -> bool {
    let pattern: Vec<char> = pattern.to_uppercase().chars().collect();
    let value: Vec<char> = value.to_uppercase().chars().collect();

    let (mut p, mut v) = (0usize, 0usize);
    // Position of the last `%` in the pattern and the value index it resumed at.
    let mut backtrack: Option<(usize, usize)> = None;

    while v < value.len() {
        match pattern.get(p) {
            Some('%') => {
                backtrack = Some((p, v));
                p += 1;
                continue;
            }
            Some('_') => {
                p += 1;
                v += 1;
                continue;
            }
            Some('\\') if p + 1 < pattern.len() && pattern[p + 1] == value[v] => {
                p += 2;
                v += 1;
                continue;
            }
            Some(c) if *c != '\\' && *c == value[v] => {
                p += 1;
                v += 1;
                continue;
            }
            _ => {}
        }

        match backtrack {
            Some((star, resumed)) => {
                p = star + 1;
                v = resumed + 1;
                backtrack = Some((star, resumed + 1));
            }
            None => return false,
        }
    }

    pattern[p..].iter().all(|c| *c == '%')
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::Fake;
    use fake::faker::name::en::LastName;
    use std::collections::BTreeSet;

    fn rule(module: &str, group: &str, start: &str, end: &str) -> GroupRule {
        GroupRule {
            module_pattern: module.to_string(),
            group_name: group.to_string(),
            range: SurnameRange::new(start, end),
        }
    }

    #[test]
    fn test_parse_strips_annotations() {
        let spec = GroupSpec::parse(Some("G1 (Amphi A)+G2(salle 3) + G3"));
        assert_eq!(spec.groups(), &["G1", "G2", "G3"]);
    }

    #[test]
    fn test_parse_dedups_and_skips_empty() {
        let spec = GroupSpec::parse(Some("G1++G1 (bis)+ (note)"));
        assert_eq!(spec, GroupSpec::Groups(vec!["G1".to_string()]));
    }

    #[test]
    fn test_parse_tous_short_circuits() {
        assert!(GroupSpec::parse(Some("Tous")).is_all());
        assert!(GroupSpec::parse(Some("G1+tous (amphi)")).is_all());
        assert!(GroupSpec::parse(None).is_all());
        assert!(GroupSpec::parse(Some("  ")).is_all());
        assert!(GroupSpec::parse(Some("(annotation only)")).is_all());
    }

    #[test]
    fn test_range_inclusive_on_both_ends() {
        let range = SurnameRange::new("BENANI", "MOUSSAOUI");
        assert!(range.contains("BENANI"));
        assert!(range.contains("MOUSSAOUI"));
        assert!(range.contains("CHAKIR"));
        assert!(!range.contains("ALAMI"));
        assert!(!range.contains("ZAHIR"));
    }

    #[test]
    fn test_range_end_admits_prefix_matches() {
        let range = SurnameRange::new("A", "DUP");
        assert!(range.contains("DUPONT"));
        assert!(range.contains("dupuis"));
        assert!(!range.contains("DURAND"));
    }

    #[test]
    fn test_range_is_byte_ordered() {
        let range = SurnameRange::new("A", "Z");
        // É sorts after Z in byte order.
        assert!(!range.contains("ÉLOUAFI"));
        assert!(SurnameRange::new("A", "M").is_ordered());
        assert!(!SurnameRange::new("M", "A").is_ordered());
    }

    #[test]
    fn test_filter_all_admits_everyone() {
        let filter = GroupFilter::build(&GroupSpec::All, "JMDS1%", &[]);
        assert!(filter.admits("ANYONE"));
        assert!(filter.unmatched_groups().is_empty());
    }

    #[test]
    fn test_filter_matches_module_pattern_case_insensitively() {
        let rules = vec![
            rule("jmds1alg", "G1", "A", "K"),
            rule("JMDS2ALG", "G1", "L", "Z"),
        ];
        let filter = GroupFilter::build(&GroupSpec::parse(Some("G1")), "JMDS1%", &rules);
        assert!(filter.admits("BENANI"));
        assert!(!filter.admits("OUAHBI"));
    }

    #[test]
    fn test_filter_group_name_is_exact() {
        let rules = vec![rule("JMDS1ALG", "g1", "A", "Z")];
        let filter = GroupFilter::build(&GroupSpec::parse(Some("G1")), "JMDS1ALG", &rules);
        assert!(!filter.admits("BENANI"));
        assert_eq!(filter.unmatched_groups(), &["G1"]);
    }

    #[test]
    fn test_filter_is_union_of_groups() {
        let rules = vec![
            rule("JMDS1ALG", "G1", "A", "C"),
            rule("JMDS1ALG", "G2", "M", "O"),
        ];
        let filter = GroupFilter::build(&GroupSpec::parse(Some("G1+G2")), "JMDS1ALG", &rules);
        assert!(filter.admits("BENANI"));
        assert!(filter.admits("NACIRI"));
        assert!(!filter.admits("HAJJI"));
    }

    #[test]
    fn test_union_property_over_random_surnames() {
        let rules = vec![
            rule("JMDS1ALG", "G1", "A", "F"),
            rule("JMDS1ALG", "G2", "D", "M"),
            rule("JMDS1ALG", "G3", "T", "W"),
        ];
        let surnames: Vec<String> = (0..300).map(|_| LastName().fake()).collect();

        let members = |spec: &str| -> BTreeSet<String> {
            let filter = GroupFilter::build(&GroupSpec::parse(Some(spec)), "JMDS1ALG", &rules);
            surnames
                .iter()
                .filter(|s| filter.admits(s))
                .map(|s| s.to_uppercase())
                .collect()
        };

        let union: BTreeSet<String> = ["G1", "G2", "G3"]
            .iter()
            .flat_map(|g| members(*g))
            .collect();
        assert_eq!(members("G1+G2+G3"), union);
    }

    #[test]
    fn test_like_matches() {
        assert!(like_matches("JMDS1%", "JMDS1ALG"));
        assert!(like_matches("jmds1%", "JMDS1ALG"));
        assert!(like_matches("%ALG", "JMDS1ALG"));
        assert!(like_matches("JMDS_ALG", "JMDS1ALG"));
        assert!(like_matches("%", ""));
        assert!(like_matches("J%S%G", "JMDS1ALG"));
        assert!(!like_matches("JMDS2%", "JMDS1ALG"));
        assert!(!like_matches("JMDS1", "JMDS1ALG"));
        assert!(!like_matches("JMDS_", "JMDS"));
    }

    #[test]
    fn test_like_escape() {
        assert!(like_matches(r"A\%B", "A%B"));
        assert!(!like_matches(r"A\%B", "AXB"));
        assert!(like_matches(r"A\_%", "A_XYZ"));
    }
}
