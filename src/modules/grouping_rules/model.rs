pub use campus_models::grouping::{
    CreateGroupingRuleDto, GroupingRule, GroupingRuleFilter, UpdateGroupingRuleDto,
};
