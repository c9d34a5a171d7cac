//! Grouping rules and resolver output.

use campus_core::groups::{GroupRule, SurnameRange};
use campus_core::serde::deserialize_optional_string;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::students::StudentSummary;

/// Surname range defining (part of) an exam group for matching modules.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct GroupingRule {
    pub id: Uuid,
    /// `LIKE` pattern over element codes, e.g. `JMDS1%`.
    pub module_pattern: String,
    pub group_name: String,
    pub range_start: String,
    pub range_end: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&GroupingRule> for GroupRule {
    fn from(rule: &GroupingRule) -> Self {
        GroupRule {
            module_pattern: rule.module_pattern.clone(),
            group_name: rule.group_name.clone(),
            range: SurnameRange::new(&rule.range_start, &rule.range_end),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateGroupingRuleDto {
    #[validate(length(min = 1, max = 50, message = "module_pattern must be 1-50 characters"))]
    pub module_pattern: String,
    #[validate(length(min = 1, max = 50, message = "group_name must be 1-50 characters"))]
    pub group_name: String,
    #[validate(length(min = 1, max = 100, message = "range_start must be 1-100 characters"))]
    pub range_start: String,
    #[validate(length(min = 1, max = 100, message = "range_end must be 1-100 characters"))]
    pub range_end: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateGroupingRuleDto {
    #[validate(length(min = 1, max = 50, message = "module_pattern must be 1-50 characters"))]
    pub module_pattern: Option<String>,
    #[validate(length(min = 1, max = 50, message = "group_name must be 1-50 characters"))]
    pub group_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "range_start must be 1-100 characters"))]
    pub range_start: Option<String>,
    #[validate(length(min = 1, max = 100, message = "range_end must be 1-100 characters"))]
    pub range_end: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct GroupingRuleFilter {
    /// Case-insensitive `LIKE` filter on the module pattern
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub module: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ResolveQuery {
    /// Module code pattern, e.g. `JMDS1%`
    pub module: String,
    /// Group specifier, e.g. `G1 (Amphi A)+G2`; absent means `Tous`
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub groups: Option<String>,
    /// Only students enrolled in the module this academic year
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub year: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResolvedGroup {
    pub module_pattern: String,
    /// Parsed group names; empty when everyone is selected.
    pub groups: Vec<String>,
    pub all: bool,
    /// Requested groups with no rule for this module.
    pub unmatched_groups: Vec<String>,
    pub total: usize,
    pub students: Vec<StudentSummary>,
}
