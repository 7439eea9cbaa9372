//! Recommendation rules and report determinism.

use serde_json::json;

use bizprofile::answers::{AnswerValue, Answers};
use bizprofile::report::rules::firing_rules;
use bizprofile::report::{build_report, DEFAULT_RECOMMENDATIONS};

fn answers(pairs: &[(&str, serde_json::Value)]) -> Answers {
    let mut answers = Answers::new();
    for (question, value) in pairs {
        let value = AnswerValue::from_json(question, value.clone()).expect("valid answer");
        answers.insert(*question, value);
    }
    answers
}

/// Answers under which no rule fires.
fn quiet_answers() -> Answers {
    answers(&[
        ("restaurant_type", json!("Fine Dining")),
        ("data_analytics_tools", json!("Yes")),
        ("dynamic_pricing_strategy", json!(true)),
        ("referral_program", json!("Yes")),
        ("marketing_strategies", json!(["Instagram", "Google Ads"])),
    ])
}

#[test]
fn debt_answer_yields_debt_recommendation() {
    let report = build_report(&answers(&[("has_debt", json!("Yes"))]));
    assert_eq!(
        report.recommendations.first().map(String::as_str),
        Some("Develop a structured debt management strategy to improve financial health")
    );
    assert!(report.financial.debt.exists);
}

#[test]
fn no_firing_rule_yields_default_sequence() {
    let answers = quiet_answers();
    assert!(firing_rules(&answers).is_empty());

    let report = build_report(&answers);
    assert_eq!(report.recommendations, DEFAULT_RECOMMENDATIONS.to_vec());
}

#[test]
fn recommendations_follow_table_order() {
    let answers = answers(&[
        ("seasonal_revenue_variations", json!("Yes")),
        ("has_debt", json!(true)),
        ("receive_complaints", json!("Yes")),
        ("peak_hours", json!(["Lunch (12-3 PM)"])),
        ("sales_target_achievement", json!("Rarely (<50%)")),
        ("operational_expense_coverage", json!("No")),
        ("waste_management", json!("Composting")),
        ("data_analytics_tools", json!("Yes")),
        ("dynamic_pricing_strategy", json!("Yes")),
        ("referral_program", json!("Yes")),
        ("marketing_strategies", json!(["Instagram"])),
    ]);

    assert_eq!(
        firing_rules(&answers),
        vec![
            "debt_management",
            "sales_tracking",
            "expense_control",
            "peak_staffing",
            "complaint_handling",
            "waste_management",
            "channel_diversification",
            "seasonal_planning",
        ]
    );
}

#[test]
fn expense_rule_accepts_partial_coverage() {
    let mut answers = quiet_answers();
    answers.insert(
        "operational_expense_coverage",
        AnswerValue::Scalar("Mostly (with occasional difficulties)".to_owned()),
    );
    assert_eq!(firing_rules(&answers), vec!["expense_control"]);
}

#[test]
fn identical_answers_produce_identical_json() {
    let build = || {
        let report = build_report(&answers(&[
            ("restaurant_type", json!("Cafe")),
            ("target_audience", json!(["Students", "Other: tourists"])),
            ("has_debt", json!("Yes")),
            ("total_debt_amount", json!(250000)),
            ("business_goals", json!("Short-term: renovate\nLong-term: expand")),
        ]));
        serde_json::to_string(&report).expect("serialize")
    };
    assert_eq!(build(), build());
}

#[test]
fn report_json_uses_camel_case_keys() {
    let report = build_report(&answers(&[
        ("restaurant_type", json!("Cafe")),
        ("sales_target_achievement", json!("Always (>90%)")),
    ]));
    let value = serde_json::to_value(&report).expect("serialize");
    assert_eq!(value["overview"]["businessType"], json!("Cafe"));
    assert_eq!(
        value["financial"]["revenue"]["targetAchievement"],
        json!("Always (>90%)")
    );
}
