//! Structured questionnaire answers.
//!
//! Single-select and multi-select fields are separate enums so a value of the
//! wrong kind can never be written into a field.

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SingleField {
    FundingStage,
    TeamSize,
    Industry,
    StartupStage,
    TechStack,
    DevResources,
    AiExperience,
    AiInvestmentReadiness,
    ImplementationTimeframe,
}

impl SingleField {
    pub const ALL: [SingleField; 9] = [
        SingleField::FundingStage,
        SingleField::TeamSize,
        SingleField::Industry,
        SingleField::StartupStage,
        SingleField::TechStack,
        SingleField::DevResources,
        SingleField::AiExperience,
        SingleField::AiInvestmentReadiness,
        SingleField::ImplementationTimeframe,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SingleField::FundingStage => "fundingStage",
            SingleField::TeamSize => "teamSize",
            SingleField::Industry => "industry",
            SingleField::StartupStage => "startupStage",
            SingleField::TechStack => "techStack",
            SingleField::DevResources => "devResources",
            SingleField::AiExperience => "aiExperience",
            SingleField::AiInvestmentReadiness => "aiInvestmentReadiness",
            SingleField::ImplementationTimeframe => "implementationTimeframe",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MultiField {
    CurrentChallenges,
    GrowthMetrics,
    TimeConsumingTasks,
    CurrentTools,
    DataAvailability,
    AiPriorities,
    AiCapabilities,
    SuccessMetrics,
    ConcernsBarriers,
}

impl MultiField {
    pub const ALL: [MultiField; 9] = [
        MultiField::CurrentChallenges,
        MultiField::GrowthMetrics,
        MultiField::TimeConsumingTasks,
        MultiField::CurrentTools,
        MultiField::DataAvailability,
        MultiField::AiPriorities,
        MultiField::AiCapabilities,
        MultiField::SuccessMetrics,
        MultiField::ConcernsBarriers,
    ];

    pub fn key(self) -> &'static str {
        match self {
            MultiField::CurrentChallenges => "currentChallenges",
            MultiField::GrowthMetrics => "growthMetrics",
            MultiField::TimeConsumingTasks => "timeConsumingTasks",
            MultiField::CurrentTools => "currentTools",
            MultiField::DataAvailability => "dataAvailability",
            MultiField::AiPriorities => "aiPriorities",
            MultiField::AiCapabilities => "aiCapabilities",
            MultiField::SuccessMetrics => "successMetrics",
            MultiField::ConcernsBarriers => "concernsBarriers",
        }
    }
}

/// Any profile field, as referenced by a catalog question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Single(SingleField),
    Multi(MultiField),
}

impl Field {
    pub fn key(self) -> &'static str {
        match self {
            Field::Single(f) => f.key(),
            Field::Multi(f) => f.key(),
        }
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

/// A value to write into a field. The variant must match the field kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Single(SingleField, String),
    Multi(MultiField, Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    // Startup basics
    pub funding_stage: String,
    pub team_size: String,
    pub industry: String,
    pub startup_stage: String,

    // Growth challenges & priorities
    pub current_challenges: Vec<String>,
    pub growth_metrics: Vec<String>,
    pub time_consuming_tasks: Vec<String>,

    // Technical stack & data
    pub tech_stack: String,
    pub dev_resources: String,
    pub current_tools: Vec<String>,
    pub data_availability: Vec<String>,

    // AI readiness & resources
    pub ai_experience: String,
    pub ai_investment_readiness: String,
    pub implementation_timeframe: String,

    // AI implementation goals
    pub ai_priorities: Vec<String>,
    pub ai_capabilities: Vec<String>,
    pub success_metrics: Vec<String>,
    pub concerns_barriers: Vec<String>,
}

impl Profile {
    pub fn single(&self, field: SingleField) -> &str {
        match field {
            SingleField::FundingStage => &self.funding_stage,
            SingleField::TeamSize => &self.team_size,
            SingleField::Industry => &self.industry,
            SingleField::StartupStage => &self.startup_stage,
            SingleField::TechStack => &self.tech_stack,
            SingleField::DevResources => &self.dev_resources,
            SingleField::AiExperience => &self.ai_experience,
            SingleField::AiInvestmentReadiness => &self.ai_investment_readiness,
            SingleField::ImplementationTimeframe => &self.implementation_timeframe,
        }
    }

    pub fn multi(&self, field: MultiField) -> &[String] {
        match field {
            MultiField::CurrentChallenges => &self.current_challenges,
            MultiField::GrowthMetrics => &self.growth_metrics,
            MultiField::TimeConsumingTasks => &self.time_consuming_tasks,
            MultiField::CurrentTools => &self.current_tools,
            MultiField::DataAvailability => &self.data_availability,
            MultiField::AiPriorities => &self.ai_priorities,
            MultiField::AiCapabilities => &self.ai_capabilities,
            MultiField::SuccessMetrics => &self.success_metrics,
            MultiField::ConcernsBarriers => &self.concerns_barriers,
        }
    }

    fn single_mut(&mut self, field: SingleField) -> &mut String {
        match field {
            SingleField::FundingStage => &mut self.funding_stage,
            SingleField::TeamSize => &mut self.team_size,
            SingleField::Industry => &mut self.industry,
            SingleField::StartupStage => &mut self.startup_stage,
            SingleField::TechStack => &mut self.tech_stack,
            SingleField::DevResources => &mut self.dev_resources,
            SingleField::AiExperience => &mut self.ai_experience,
            SingleField::AiInvestmentReadiness => &mut self.ai_investment_readiness,
            SingleField::ImplementationTimeframe => &mut self.implementation_timeframe,
        }
    }

    fn multi_mut(&mut self, field: MultiField) -> &mut Vec<String> {
        match field {
            MultiField::CurrentChallenges => &mut self.current_challenges,
            MultiField::GrowthMetrics => &mut self.growth_metrics,
            MultiField::TimeConsumingTasks => &mut self.time_consuming_tasks,
            MultiField::CurrentTools => &mut self.current_tools,
            MultiField::DataAvailability => &mut self.data_availability,
            MultiField::AiPriorities => &mut self.ai_priorities,
            MultiField::AiCapabilities => &mut self.ai_capabilities,
            MultiField::SuccessMetrics => &mut self.success_metrics,
            MultiField::ConcernsBarriers => &mut self.concerns_barriers,
        }
    }

    /// Replaces the field's value wholesale. No catalog validation happens here.
    pub fn set(&mut self, value: FieldValue) {
        match value {
            FieldValue::Single(field, v) => *self.single_mut(field) = v,
            FieldValue::Multi(field, v) => *self.multi_mut(field) = v,
        }
    }

    /// Single value for prompts: empty renders as `Unknown`.
    pub fn display_single(&self, field: SingleField) -> &str {
        match self.single(field) {
            "" => "Unknown",
            v => v,
        }
    }

    /// Multi value for prompts: joined with ", ", empty renders as `Not specified`.
    pub fn display_multi(&self, field: MultiField) -> String {
        let values = self.multi(field);
        if values.is_empty() {
            "Not specified".to_string()
        } else {
            values.join(", ")
        }
    }

    /// Business size bucket derived from the team size answer.
    pub fn business_size(&self) -> Option<&'static str> {
        match self.team_size.as_str() {
            "solo" | "micro" | "small" => Some("small"),
            "medium" => Some("medium"),
            "large" => Some("large"),
            _ => None,
        }
    }
}
