//! Answers → [`BusinessReport`] mapping.
//!
//! Every field is derived independently. A field whose answer has the wrong
//! shape falls back to its default; nothing here can fail.

use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::answers::{AnswerValue, Answers};

use super::rules::recommendations;
use super::{
    Analytics, BusinessGoals, BusinessReport, Competition, Debt, Financial, Marketing,
    Operations, Overview, Pricing, ReferralProgram, Revenue, SeasonalVariations, Staffing,
    NOT_SPECIFIED,
};

/// Prefix marking free-text "other" entries in multi-select answers.
const OTHER_MARKER: &str = "Other:";

/// Build the report for a session's answers.
///
/// An empty answer set yields [`BusinessReport::default`].
pub fn build_report(answers: &Answers) -> BusinessReport {
    if answers.is_empty() {
        return BusinessReport::default();
    }

    BusinessReport {
        overview: overview(answers),
        financial: financial(answers),
        operations: operations(answers),
        marketing: marketing(answers),
        competition: competition(answers),
        recommendations: recommendations(answers),
    }
}

fn overview(answers: &Answers) -> Overview {
    Overview {
        business_type: required_scalar(answers, "restaurant_type"),
        target_audience: list_without_other(answers, "target_audience"),
        services: list_without_other(answers, "additional_services"),
        operational_hours: list(answers, "peak_hours"),
        target_age_range: optional_scalar(answers, "target_age_range"),
        cuisine_type: optional_list(answers, "cuisine_type"),
        cuisine_specialty: optional_scalar(answers, "cuisine_specialty"),
        menu_update_frequency: optional_scalar(answers, "menu_update_frequency"),
    }
}

fn financial(answers: &Answers) -> Financial {
    let has_debt = answers.is_yes("has_debt");
    Financial {
        revenue: Revenue {
            streams: revenue_streams(answers),
            target_achievement: required_scalar(answers, "sales_target_achievement"),
        },
        expenses: list(answers, "monthly_expenses"),
        debt: Debt {
            exists: has_debt,
            amount: gated(has_debt, answers, "total_debt_amount"),
        },
        tech_investment: optional_scalar(answers, "tech_investment_plan"),
        operational_expense_coverage: optional_scalar(answers, "operational_expense_coverage"),
        seasonal_variations: Some(SeasonalVariations {
            exists: answers.is_yes("seasonal_revenue_variations"),
            patterns: optional_scalar(answers, "seasonal_patterns"),
        }),
    }
}

fn operations(answers: &Answers) -> Operations {
    Operations {
        peak_hours: list(answers, "peak_hours"),
        peak_seasons: list(answers, "peak_season"),
        staffing: Staffing {
            avg_salary: required_scalar(answers, "average_monthly_salary"),
            management: required_scalar(answers, "operational_management"),
        },
        waste_management: optional_scalar(answers, "waste_management"),
    }
}

fn marketing(answers: &Answers) -> Marketing {
    let analytics = answers.is_yes("data_analytics_tools");
    let dynamic = answers.is_yes("dynamic_pricing_strategy");
    let referral = answers.is_yes("referral_program");
    Marketing {
        strategies: list(answers, "marketing_strategies"),
        analytics: Analytics {
            usage: analytics,
            tools: gated(analytics, answers, "analytics_tools_used"),
        },
        pricing: Pricing {
            dynamic,
            strategy: gated(dynamic, answers, "dynamic_pricing_description"),
        },
        discounts: optional_list(answers, "discounts_promotions"),
        referral_program: Some(ReferralProgram {
            exists: referral,
            details: gated(referral, answers, "referral_program_details"),
        }),
    }
}

fn competition(answers: &Answers) -> Competition {
    let aware = answers.is_yes("aware_biggest_competitor");
    Competition {
        main_competitor: gated(aware, answers, "biggest_competitor_name"),
        goals: business_goals(answers),
    }
}

// ---------------------------------------------------------------------------
// Field readers
// ---------------------------------------------------------------------------

fn required_scalar(answers: &Answers, question_id: &str) -> String {
    optional_scalar(answers, question_id).unwrap_or_else(|| NOT_SPECIFIED.to_owned())
}

fn optional_scalar(answers: &Answers, question_id: &str) -> Option<String> {
    match answers.get(question_id)? {
        AnswerValue::Scalar(s) if !s.is_empty() => Some(s.clone()),
        AnswerValue::Scalar(_) => None,
        other => {
            debug!(question_id, value = ?other, "expected a scalar answer, using default");
            None
        }
    }
}

fn optional_list(answers: &Answers, question_id: &str) -> Option<Vec<String>> {
    match answers.get(question_id)? {
        AnswerValue::List(items) => Some(items.clone()),
        other => {
            debug!(question_id, value = ?other, "expected a list answer, using default");
            None
        }
    }
}

fn list(answers: &Answers, question_id: &str) -> Vec<String> {
    optional_list(answers, question_id).unwrap_or_default()
}

fn list_without_other(answers: &Answers, question_id: &str) -> Vec<String> {
    answers
        .list(question_id)
        .unwrap_or_default()
        .iter()
        .filter(|item| !item.starts_with(OTHER_MARKER))
        .cloned()
        .collect()
}

/// Detail field populated only when its controlling flag holds.
fn gated(flag: bool, answers: &Answers, question_id: &str) -> Option<String> {
    if flag {
        optional_scalar(answers, question_id)
    } else {
        None
    }
}

/// Revenue streams accept either a single scalar or a list.
fn revenue_streams(answers: &Answers) -> Vec<String> {
    match answers.get("revenue_streams") {
        Some(AnswerValue::Scalar(s)) if !s.is_empty() => vec![s.clone()],
        Some(AnswerValue::List(items)) => items.iter().filter(|s| !s.is_empty()).cloned().collect(),
        _ => Vec::new(),
    }
}

fn business_goals(answers: &Answers) -> BusinessGoals {
    let raw = match answers.get("business_goals") {
        None => return BusinessGoals::default(),
        Some(AnswerValue::Scalar(s)) => s,
        Some(other) => {
            debug!(value = ?other, "business goals are not free text, leaving goals empty");
            return BusinessGoals::default();
        }
    };

    let lines: Vec<&str> = raw.split('\n').collect();
    BusinessGoals {
        short_term: goals_for(&lines, "short-term", short_term_label()),
        long_term: goals_for(&lines, "long-term", long_term_label()),
    }
}

fn goals_for(lines: &[&str], token: &str, label: Option<&Regex>) -> Vec<String> {
    lines
        .iter()
        .filter(|line| line.to_lowercase().contains(token))
        .map(|line| match label {
            Some(re) => re.replace(line, "").trim().to_owned(),
            None => line.trim().to_owned(),
        })
        .collect()
}

fn short_term_label() -> Option<&'static Regex> {
    static LABEL: OnceLock<Option<Regex>> = OnceLock::new();
    LABEL
        .get_or_init(|| Regex::new(r"(?i)Short-Term.*?:").ok())
        .as_ref()
}

fn long_term_label() -> Option<&'static Regex> {
    static LABEL: OnceLock<Option<Regex>> = OnceLock::new();
    LABEL
        .get_or_init(|| Regex::new(r"(?i)Long-Term.*?:").ok())
        .as_ref()
}
