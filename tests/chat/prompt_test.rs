//! Persona prompt assembly over built reports.

use serde_json::json;

use bizprofile::answers::{AnswerValue, Answers};
use bizprofile::prompt::{format_list, profile_instructions};
use bizprofile::report::build_report;

fn report_for(pairs: &[(&str, serde_json::Value)]) -> bizprofile::report::BusinessReport {
    let mut answers = Answers::new();
    for (question, value) in pairs {
        answers.insert(
            *question,
            AnswerValue::from_json(question, value.clone()).expect("valid answer"),
        );
    }
    build_report(&answers)
}

#[test]
fn report_values_reach_the_prompt() {
    let report = report_for(&[
        ("restaurant_type", json!("Cafe")),
        ("peak_hours", json!(["Breakfast", "Lunch", "Dinner"])),
        ("has_debt", json!("Yes")),
        ("total_debt_amount", json!("₹2,00,000")),
        ("aware_biggest_competitor", json!("Yes")),
        ("biggest_competitor_name", json!("Blue Tokai")),
    ]);

    let prompt = profile_instructions("finance", &report);
    assert!(prompt.contains("• Type of Business: Cafe"));
    assert!(prompt.contains("• Peak Business Hours: Breakfast, Lunch and Dinner"));
    assert!(prompt.contains("• Current Debt Status: Yes - Amount: ₹2,00,000"));
    assert!(prompt.contains("• Primary Competitor: Blue Tokai"));
    assert!(prompt.contains("- Consider the debt situation: Yes"));
}

#[test]
fn every_known_persona_gets_additional_instructions() {
    let report = report_for(&[("restaurant_type", json!("Cafe"))]);
    for persona in ["sales", "finance", "hr", "business", "strategy"] {
        let prompt = profile_instructions(persona, &report);
        assert!(prompt.contains("Additional Instructions:"), "{persona}");
    }
}

#[test]
fn unknown_persona_has_no_persona_bullets() {
    let report = report_for(&[("restaurant_type", json!("Cafe"))]);
    let prompt = profile_instructions("marketing", &report);
    assert!(prompt.starts_with("You are an AI consultant specializing in marketing."));
    assert!(!prompt.contains("Additional Instructions:"));
}

#[test]
fn format_list_joins_with_and() {
    let items: Vec<String> = ["A", "B", "C"].iter().map(|s| (*s).to_owned()).collect();
    assert_eq!(format_list(&items), "A, B and C");
    assert_eq!(format_list(&[]), "None specified");
}
