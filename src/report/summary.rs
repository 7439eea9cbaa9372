//! Plain-text report summary delivered into each persona's chat.

use super::{BusinessReport, NOT_SPECIFIED};

/// Personas that receive the summary whenever a report is generated.
pub const SUMMARY_PERSONAS: [&str; 5] = ["sales", "finance", "hr", "strategy", "business"];

/// Render the report summary posted as an assistant message.
pub fn report_summary(report: &BusinessReport) -> String {
    let overview = &report.overview;
    let financial = &report.financial;
    let operations = &report.operations;
    let marketing = &report.marketing;
    let competition = &report.competition;

    let mut lines: Vec<String> = vec![
        "📊 Business Analysis Report Summary".to_owned(),
        "\nBusiness Overview:".to_owned(),
        format!("• Type: {}", overview.business_type),
        format!("• Target Audience: {}", overview.target_audience.join(", ")),
        format!("• Services: {}", overview.services.join(", ")),
        format!(
            "• Cuisine Type: {}",
            joined_or(overview.cuisine_type.as_deref(), NOT_SPECIFIED)
        ),
        format!(
            "• Menu Updates: {}",
            or_default(overview.menu_update_frequency.as_deref(), NOT_SPECIFIED)
        ),
        "\nFinancial Status:".to_owned(),
        format!("• Revenue Streams: {}", financial.revenue.streams.join(", ")),
        format!(
            "• Target Achievement: {}",
            financial.revenue.target_achievement
        ),
        format!("• Has Debt: {}", debt_line(report)),
        format!(
            "• Tech Investment Plan: {}",
            or_default(financial.tech_investment.as_deref(), NOT_SPECIFIED)
        ),
        format!(
            "• Expense Coverage: {}",
            or_default(
                financial.operational_expense_coverage.as_deref(),
                NOT_SPECIFIED
            )
        ),
        "\nOperational Details:".to_owned(),
        format!("• Peak Hours: {}", operations.peak_hours.join(", ")),
        format!("• Peak Seasons: {}", operations.peak_seasons.join(", ")),
        format!("• Average Staff Salary: {}", operations.staffing.avg_salary),
        format!("• Management: {}", operations.staffing.management),
        format!(
            "• Waste Management: {}",
            or_default(operations.waste_management.as_deref(), NOT_SPECIFIED)
        ),
        "\nMarketing & Strategy:".to_owned(),
        format!("• Marketing Strategies: {}", marketing.strategies.join(", ")),
        format!(
            "• Analytics Usage: {}",
            flag_with_detail(
                marketing.analytics.usage,
                "Tools",
                marketing.analytics.tools.as_deref()
            )
        ),
        format!(
            "• Dynamic Pricing: {}",
            flag_with_detail(
                marketing.pricing.dynamic,
                "Strategy",
                marketing.pricing.strategy.as_deref()
            )
        ),
        format!(
            "• Discounts & Promotions: {}",
            joined_or(marketing.discounts.as_deref(), NOT_SPECIFIED)
        ),
        format!("• Referral Program: {}", referral_line(report)),
        "\nCompetition & Goals:".to_owned(),
        format!(
            "• Main Competitor: {}",
            or_default(competition.main_competitor.as_deref(), "Not identified")
        ),
        "\nShort-term Goals:".to_owned(),
    ];
    lines.extend(competition.goals.short_term.iter().map(|g| format!("• {g}")));
    lines.push("\nLong-term Goals:".to_owned());
    lines.extend(competition.goals.long_term.iter().map(|g| format!("• {g}")));
    lines.push("\nRecommendations:".to_owned());
    lines.extend(report.recommendations.iter().map(|r| format!("• {r}")));

    lines.join("\n")
}

fn or_default<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    value.filter(|v| !v.is_empty()).unwrap_or(default)
}

fn joined_or(items: Option<&[String]>, default: &str) -> String {
    match items {
        Some(items) if !items.is_empty() => items.join(", "),
        _ => default.to_owned(),
    }
}

fn flag_with_detail(flag: bool, label: &str, detail: Option<&str>) -> String {
    match (flag, detail) {
        (true, Some(detail)) => format!("Yes ({label}: {detail})"),
        (true, None) => "Yes".to_owned(),
        (false, _) => "No".to_owned(),
    }
}

fn debt_line(report: &BusinessReport) -> String {
    let debt = &report.financial.debt;
    if debt.exists {
        format!(
            "Yes (Amount: {})",
            or_default(debt.amount.as_deref(), NOT_SPECIFIED)
        )
    } else {
        "No".to_owned()
    }
}

fn referral_line(report: &BusinessReport) -> String {
    match &report.marketing.referral_program {
        Some(program) if program.exists => format!(
            "Yes - {}",
            or_default(program.details.as_deref(), NOT_SPECIFIED)
        ),
        _ => "No".to_owned(),
    }
}
