//! Business report model and generation.
//!
//! A [`BusinessReport`] is always fully populated: lists default to empty,
//! required scalars to [`NOT_SPECIFIED`], flags to `false`. Only the optional
//! detail fields below the second level may be absent.
//!
//! - [`builder`] maps [`Answers`](crate::answers::Answers) to a report
//! - [`rules`] is the recommendation rule table
//! - [`summary`] renders the per-persona "report delivered" chat message
//! - [`service`] wires the builder to persistence

use serde::{Deserialize, Serialize};

pub mod builder;
pub mod rules;
pub mod service;
pub mod summary;

pub use builder::build_report;
pub use service::{generate_business_report, get_report};

/// Sentinel for scalar fields with no source answer.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Recommendations used when no rule fires.
pub const DEFAULT_RECOMMENDATIONS: [&str; 3] = [
    "Complete the questionnaire to receive personalized recommendations",
    "Explore different sections to get comprehensive insights",
    "Set goals to track your business progress",
];

/// The normalized business report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessReport {
    /// What the business is and who it serves.
    pub overview: Overview,
    /// Revenue, costs and debt.
    pub financial: Financial,
    /// Peak periods and staffing.
    pub operations: Operations,
    /// Channels, analytics and pricing.
    pub marketing: Marketing,
    /// Competitor and goals.
    pub competition: Competition,
    /// Ordered recommendation strings.
    pub recommendations: Vec<String>,
}

impl Default for BusinessReport {
    fn default() -> Self {
        Self {
            overview: Overview::default(),
            financial: Financial::default(),
            operations: Operations::default(),
            marketing: Marketing::default(),
            competition: Competition::default(),
            recommendations: DEFAULT_RECOMMENDATIONS
                .iter()
                .map(|s| (*s).to_owned())
                .collect(),
        }
    }
}

/// Report overview section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    /// Kind of business.
    pub business_type: String,
    /// Target customer groups.
    pub target_audience: Vec<String>,
    /// Services offered beyond the core business.
    pub services: Vec<String>,
    /// Operational (peak) hours.
    pub operational_hours: Vec<String>,
    /// Target customer age range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_age_range: Option<String>,
    /// Cuisine types served.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine_type: Option<Vec<String>>,
    /// Signature cuisine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine_specialty: Option<String>,
    /// How often the menu changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub menu_update_frequency: Option<String>,
}

impl Default for Overview {
    fn default() -> Self {
        Self {
            business_type: NOT_SPECIFIED.to_owned(),
            target_audience: Vec::new(),
            services: Vec::new(),
            operational_hours: Vec::new(),
            target_age_range: None,
            cuisine_type: None,
            cuisine_specialty: None,
            menu_update_frequency: None,
        }
    }
}

/// Report financial section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Financial {
    /// Revenue streams and target achievement.
    pub revenue: Revenue,
    /// Major monthly expenses.
    pub expenses: Vec<String>,
    /// Outstanding debt.
    pub debt: Debt,
    /// Planned technology investment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech_investment: Option<String>,
    /// Whether revenue covers operating expenses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operational_expense_coverage: Option<String>,
    /// Seasonal revenue swings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasonal_variations: Option<SeasonalVariations>,
}

/// Revenue details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revenue {
    /// Active revenue streams.
    pub streams: Vec<String>,
    /// How often sales targets are met.
    pub target_achievement: String,
}

impl Default for Revenue {
    fn default() -> Self {
        Self {
            streams: Vec::new(),
            target_achievement: NOT_SPECIFIED.to_owned(),
        }
    }
}

/// Debt status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Debt {
    /// Whether any debt exists.
    pub exists: bool,
    /// Debt amount; only set when `exists`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
}

/// Seasonal revenue variation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalVariations {
    /// Whether revenue varies by season.
    pub exists: bool,
    /// Description of the pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns: Option<String>,
}

/// Report operations section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operations {
    /// Busiest hours of the day.
    pub peak_hours: Vec<String>,
    /// Busiest seasons.
    pub peak_seasons: Vec<String>,
    /// Staff pay and management.
    pub staffing: Staffing,
    /// Waste management practice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waste_management: Option<String>,
}

/// Staffing details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staffing {
    /// Average monthly salary.
    pub avg_salary: String,
    /// Who runs day-to-day operations.
    pub management: String,
}

impl Default for Staffing {
    fn default() -> Self {
        Self {
            avg_salary: NOT_SPECIFIED.to_owned(),
            management: NOT_SPECIFIED.to_owned(),
        }
    }
}

/// Report marketing section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marketing {
    /// Active marketing channels.
    pub strategies: Vec<String>,
    /// Analytics tooling.
    pub analytics: Analytics,
    /// Pricing approach.
    pub pricing: Pricing,
    /// Discounts and promotions offered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discounts: Option<Vec<String>>,
    /// Referral program.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referral_program: Option<ReferralProgram>,
}

/// Analytics usage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    /// Whether analytics tools are used.
    pub usage: bool,
    /// Which tools; only set when `usage`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<String>,
}

/// Pricing approach.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    /// Whether dynamic pricing is used.
    pub dynamic: bool,
    /// Dynamic pricing description; only set when `dynamic`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
}

/// Referral program.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferralProgram {
    /// Whether a referral program exists.
    pub exists: bool,
    /// Program details; only set when `exists`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Report competition section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    /// Biggest competitor, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_competitor: Option<String>,
    /// Short- and long-term goals.
    pub goals: BusinessGoals,
}

/// Goals split by horizon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessGoals {
    /// Short-term goals.
    pub short_term: Vec<String>,
    /// Long-term goals.
    pub long_term: Vec<String>,
}
