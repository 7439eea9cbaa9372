//! Recommendation rule table.
//!
//! Each [`Rule`] inspects the answers independently. Rules are evaluated in
//! table order and every firing rule contributes its message, so the output
//! order is the table order.

use crate::answers::Answers;

use super::DEFAULT_RECOMMENDATIONS;

/// A single recommendation rule.
#[derive(Clone, Copy)]
pub struct Rule {
    /// Stable rule name, used in logs and tests.
    pub name: &'static str,
    /// Whether the rule fires for the given answers.
    pub applies: fn(&Answers) -> bool,
    /// Recommendation text appended when the rule fires.
    pub message: &'static str,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish_non_exhaustive()
    }
}

/// The recommendation rules, in output order.
pub const RULES: &[Rule] = &[
    Rule {
        name: "debt_management",
        applies: |a| a.is_yes("has_debt"),
        message: "Develop a structured debt management strategy to improve financial health",
    },
    Rule {
        name: "sales_tracking",
        applies: |a| a.scalar("sales_target_achievement") == Some("Rarely (<50%)"),
        message: "Review and adjust sales targets, implement comprehensive performance tracking systems",
    },
    Rule {
        name: "expense_control",
        applies: |a| {
            matches!(
                a.scalar("operational_expense_coverage"),
                Some("No") | Some("Mostly (with occasional difficulties)")
            )
        },
        message: "Implement stricter expense management and cash flow monitoring systems",
    },
    Rule {
        name: "analytics_adoption",
        applies: |a| a.is_missing_or_no("data_analytics_tools"),
        message: "Implement data analytics tools to better understand customer behavior and optimize operations",
    },
    Rule {
        name: "dynamic_pricing",
        applies: |a| a.is_missing_or_no("dynamic_pricing_strategy"),
        message: "Consider implementing dynamic pricing strategies to optimize revenue during peak hours",
    },
    Rule {
        name: "referral_program",
        applies: |a| a.is_missing_or_no("referral_program"),
        message: "Establish a referral program to leverage word-of-mouth marketing",
    },
    Rule {
        name: "peak_staffing",
        applies: |a| a.list("peak_hours").is_some_and(|hours| !hours.is_empty()),
        message: "Optimize staffing levels during identified peak hours to improve service efficiency",
    },
    Rule {
        name: "complaint_handling",
        applies: |a| a.is_yes("receive_complaints"),
        message: "Implement a systematic approach to address and prevent common customer complaints",
    },
    Rule {
        name: "waste_management",
        applies: |a| a.get("waste_management").is_some_and(|v| v.is_present()),
        message: "Enhance waste management practices to reduce operational costs and improve sustainability",
    },
    Rule {
        name: "channel_diversification",
        applies: |a| a.list("marketing_strategies").map_or(true, |s| s.len() < 2),
        message: "Diversify marketing channels to reach a broader customer base",
    },
    Rule {
        name: "seasonal_planning",
        applies: |a| a.is_yes("seasonal_revenue_variations"),
        message: "Develop targeted strategies to address seasonal revenue fluctuations",
    },
];

/// Names of the rules that fire for `answers`, in table order.
pub fn firing_rules(answers: &Answers) -> Vec<&'static str> {
    RULES
        .iter()
        .filter(|rule| (rule.applies)(answers))
        .map(|rule| rule.name)
        .collect()
}

/// Evaluate every rule; fall back to [`DEFAULT_RECOMMENDATIONS`] when none fire.
pub fn recommendations(answers: &Answers) -> Vec<String> {
    let fired: Vec<String> = RULES
        .iter()
        .filter(|rule| (rule.applies)(answers))
        .map(|rule| rule.message.to_owned())
        .collect();

    if fired.is_empty() {
        return DEFAULT_RECOMMENDATIONS
            .iter()
            .map(|s| (*s).to_owned())
            .collect();
    }
    fired
}
