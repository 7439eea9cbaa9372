//! Persona prompt assembly.
//!
//! [`profile_instructions`] renders a [`BusinessReport`] into the instruction
//! block sent ahead of every user question: role framing, the six-section
//! report, the grounding directives, and persona-specific bullets.

use crate::report::{BusinessReport, NOT_SPECIFIED};

/// Join a list for prose: `A`, `A and B`, `A, B and C`.
///
/// An empty list renders as `None specified`.
pub fn format_list(items: &[String]) -> String {
    match items {
        [] => "None specified".to_owned(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

/// Directives appended to every persona prompt.
const BASE_INSTRUCTIONS: &str = "IMPORTANT: You are analyzing a real business. The data provided is from an actual business analysis report.
- Always reference specific data points from the report in your responses
- Provide concrete advice based on the actual numbers and information shown
- When discussing any aspect of the business, refer to the exact data provided
- If asked about specific metrics, quote the actual values from the report
- Never say you don't have information that's clearly stated in the report
- If information is truly missing from the report, suggest ways to collect that data";

const INDUSTRY: &str = "specializing in the Indian hotel, restaurant, and dining industry";

/// Render the six-section report block.
pub fn report_context(report: &BusinessReport) -> String {
    let overview = &report.overview;
    let operations = &report.operations;
    let financial = &report.financial;
    let marketing = &report.marketing;
    let competition = &report.competition;

    let debt = if financial.debt.exists {
        format!(
            "Yes - Amount: {}",
            financial.debt.amount.as_deref().unwrap_or(NOT_SPECIFIED)
        )
    } else {
        "No outstanding debt".to_owned()
    };
    let analytics = if marketing.analytics.usage {
        format!(
            "Yes - Using: {}",
            marketing.analytics.tools.as_deref().unwrap_or(NOT_SPECIFIED)
        )
    } else {
        "No analytics tools in use".to_owned()
    };
    let pricing = if marketing.pricing.dynamic {
        format!(
            "Yes - Strategy: {}",
            marketing.pricing.strategy.as_deref().unwrap_or(NOT_SPECIFIED)
        )
    } else {
        "No dynamic pricing implemented".to_owned()
    };
    let recommendations = report
        .recommendations
        .iter()
        .zip(1_usize..)
        .map(|(rec, n)| format!("   {n}. {rec}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "BUSINESS ANALYSIS REPORT

1. BUSINESS OVERVIEW
   • Type of Business: {business_type}
   • Target Customer Base: {audience}
   • Available Services: {services}

2. OPERATIONAL DETAILS
   • Peak Business Hours: {peak_hours}
   • Seasonal Peak Periods: {peak_seasons}
   • Current Management Structure: {management}
   • Staff Average Monthly Salary: {salary}

3. FINANCIAL OVERVIEW
   • Active Revenue Streams: {streams}
   • Sales Target Achievement Rate: {achievement}
   • Current Debt Status: {debt}
   • Major Monthly Expenses: {expenses}

4. MARKETING AND PRICING
   • Active Marketing Channels: {strategies}
   • Analytics Implementation: {analytics}
   • Dynamic Pricing System: {pricing}

5. COMPETITIVE LANDSCAPE
   • Primary Competitor: {competitor}
   • Short-term Business Objectives: {short_term}
   • Long-term Business Objectives: {long_term}

6. KEY RECOMMENDATIONS
{recommendations}

This data represents the current state of your business based on the comprehensive analysis conducted.",
        business_type = overview.business_type,
        audience = format_list(&overview.target_audience),
        services = format_list(&overview.services),
        peak_hours = format_list(&operations.peak_hours),
        peak_seasons = format_list(&operations.peak_seasons),
        management = operations.staffing.management,
        salary = operations.staffing.avg_salary,
        streams = format_list(&financial.revenue.streams),
        achievement = financial.revenue.target_achievement,
        expenses = format_list(&financial.expenses),
        strategies = format_list(&marketing.strategies),
        competitor = competition
            .main_competitor
            .as_deref()
            .unwrap_or("Not identified"),
        short_term = format_list(&competition.goals.short_term),
        long_term = format_list(&competition.goals.long_term),
    )
}

/// Role line and persona-specific bullets, if the persona is known.
fn persona_framing(profile: &str, report: &BusinessReport) -> Option<(String, Vec<String>)> {
    let framing = match profile {
        "sales" => (
            "You are an experienced sales professional specializing in the hotel, restaurant, and dining sector.".to_owned(),
            vec![
                format!("Focus on revenue streams: {}", format_list(&report.financial.revenue.streams)),
                format!("Consider peak hours: {}", format_list(&report.operations.peak_hours)),
                format!("Target audience: {}", format_list(&report.overview.target_audience)),
                "Use this data to provide specific sales strategies".to_owned(),
            ],
        ),
        "finance" => (
            format!("You are an experienced financial consultant from India {INDUSTRY}."),
            vec![
                "Focus on financial metrics and performance".to_owned(),
                format!(
                    "Consider the debt situation: {}",
                    if report.financial.debt.exists { "Yes" } else { "No" }
                ),
                format!("Revenue achievement: {}", report.financial.revenue.target_achievement),
                format!("Monthly expenses: {}", format_list(&report.financial.expenses)),
            ],
        ),
        "hr" => (
            format!("You are an experienced Human Resources consultant from India {INDUSTRY}."),
            vec![
                "Focus on staffing and management structure".to_owned(),
                format!(
                    "Consider peak hours for scheduling: {}",
                    format_list(&report.operations.peak_hours)
                ),
                format!("Average salary: {}", report.operations.staffing.avg_salary),
                format!("Management type: {}", report.operations.staffing.management),
            ],
        ),
        "business" => (
            format!("You are an experienced business consultant from India {INDUSTRY}."),
            vec![
                "Provide comprehensive business analysis".to_owned(),
                "Consider all aspects of the business".to_owned(),
                "Focus on overall performance and growth".to_owned(),
                "Reference specific metrics from each section".to_owned(),
            ],
        ),
        "strategy" => (
            format!("You are an experienced strategy consultant from India {INDUSTRY}."),
            vec![
                "Focus on strategic positioning and growth".to_owned(),
                format!(
                    "Consider competition: {}",
                    report
                        .competition
                        .main_competitor
                        .as_deref()
                        .unwrap_or(NOT_SPECIFIED)
                ),
                format!("Marketing strategies: {}", format_list(&report.marketing.strategies)),
                "Business goals alignment".to_owned(),
            ],
        ),
        _ => return None,
    };
    Some(framing)
}

/// Assemble the full instruction block for `profile`.
///
/// Unknown profiles get a generic consultant framing with the report and
/// directives only.
pub fn profile_instructions(profile: &str, report: &BusinessReport) -> String {
    let context = report_context(report);
    match persona_framing(profile, report) {
        Some((role, bullets)) => {
            let bullets = bullets
                .iter()
                .map(|b| format!("- {b}"))
                .collect::<Vec<_>>()
                .join("\n");
            format!(
                "{role}\n\n{context}\n\n{BASE_INSTRUCTIONS}\n\nAdditional Instructions:\n{bullets}"
            )
        }
        None => format!(
            "You are an AI consultant specializing in {profile}.\n\n{context}\n\n{BASE_INSTRUCTIONS}"
        ),
    }
}

/// Full text sent to the model for one user question.
pub fn question_prompt(instructions: &str, user_text: &str) -> String {
    format!(
        "{instructions}\n\nUser Question: {user_text}\n\nProvide a detailed response using the specific data points from the business report above:"
    )
}
