use minijinja::Environment;
use serde::Serialize;

use crate::profile::{MultiField, Profile, SingleField};

const ADVICE_TEMPLATE_NAME: &str = "advice_prompt.txt";

const ADVICE_TEMPLATE: &str = "<s>[INST] You are an AI assistant for OnWave AI, a platform that helps startups find and implement the right AI tools to accelerate their growth and efficiency.

DETAILED STARTUP PROFILE:
- Funding stage: {{ funding_stage }}
- Team size: {{ team_size }}
- Industry vertical: {{ industry }}
- Product stage: {{ startup_stage }}
- Current challenges: {{ current_challenges }}
- Key growth metrics: {{ growth_metrics }}
- Time-consuming tasks: {{ time_consuming_tasks }}
- Tech stack maturity: {{ tech_stack }}
- Development resources: {{ dev_resources }}
- Current tools: {{ current_tools }}
- Available data: {{ data_availability }}
- AI experience: {{ ai_experience }}
- AI budget: {{ ai_investment_readiness }}
- Implementation timeframe: {{ implementation_timeframe }}
- AI priority areas: {{ ai_priorities }}
- Desired AI capabilities: {{ ai_capabilities }}
- Success metrics: {{ success_metrics }}
- Concerns/barriers: {{ concerns_barriers }}

Based on this startup profile, provide specific, actionable advice on:
1. WHERE in their startup they should implement AI (specific functions, processes, or product features)
2. WHAT specific AI tools or solutions would be most beneficial given their stage, resources, and goals
3. HOW they should approach implementation considering their technical capabilities and funding stage

User message: {{ message }}

Be specific, practical, and tailored to their unique situation as a startup. Focus on high-impact, cost-effective solutions that align with their growth stage and priorities. Recommend actual AI tools by name when possible. [/INST]</s>";

// Every profile field is rendered through Profile::display_*, so empty answers
// show up as "Unknown" / "Not specified".
#[derive(Serialize)]
struct PromptContext<'a> {
    funding_stage: &'a str,
    team_size: &'a str,
    industry: &'a str,
    startup_stage: &'a str,
    current_challenges: String,
    growth_metrics: String,
    time_consuming_tasks: String,
    tech_stack: &'a str,
    dev_resources: &'a str,
    current_tools: String,
    data_availability: String,
    ai_experience: &'a str,
    ai_investment_readiness: &'a str,
    implementation_timeframe: &'a str,
    ai_priorities: String,
    ai_capabilities: String,
    success_metrics: String,
    concerns_barriers: String,
    message: &'a str,
}

impl<'a> PromptContext<'a> {
    fn new(message: &'a str, p: &'a Profile) -> Self {
        Self {
            funding_stage: p.display_single(SingleField::FundingStage),
            team_size: p.display_single(SingleField::TeamSize),
            industry: p.display_single(SingleField::Industry),
            startup_stage: p.display_single(SingleField::StartupStage),
            current_challenges: p.display_multi(MultiField::CurrentChallenges),
            growth_metrics: p.display_multi(MultiField::GrowthMetrics),
            time_consuming_tasks: p.display_multi(MultiField::TimeConsumingTasks),
            tech_stack: p.display_single(SingleField::TechStack),
            dev_resources: p.display_single(SingleField::DevResources),
            current_tools: p.display_multi(MultiField::CurrentTools),
            data_availability: p.display_multi(MultiField::DataAvailability),
            ai_experience: p.display_single(SingleField::AiExperience),
            ai_investment_readiness: p.display_single(SingleField::AiInvestmentReadiness),
            implementation_timeframe: p.display_single(SingleField::ImplementationTimeframe),
            ai_priorities: p.display_multi(MultiField::AiPriorities),
            ai_capabilities: p.display_multi(MultiField::AiCapabilities),
            success_metrics: p.display_multi(MultiField::SuccessMetrics),
            concerns_barriers: p.display_multi(MultiField::ConcernsBarriers),
            message,
        }
    }
}

/// Renders the advice prompt sent to the model for `message`.
pub fn build_prompt(message: &str, profile: &Profile) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.add_template(ADVICE_TEMPLATE_NAME, ADVICE_TEMPLATE)?;
    env.get_template(ADVICE_TEMPLATE_NAME)?
        .render(PromptContext::new(message, profile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{INSTRUCTION_END, SEQUENCE_END};

    #[test]
    fn test_empty_profile_renders_placeholders() {
        let prompt = build_prompt("Hi", &Profile::default()).unwrap();
        assert!(prompt.contains("- Funding stage: Unknown\n"));
        assert!(prompt.contains("- Current challenges: Not specified\n"));
        assert!(prompt.contains("- Concerns/barriers: Not specified\n"));
        assert!(prompt.contains("User message: Hi\n"));
    }

    #[test]
    fn test_profile_values_and_instructions() {
        let profile = Profile {
            industry: "fintech".to_string(),
            ai_priorities: vec!["sales".to_string(), "security".to_string()],
            ..Profile::default()
        };
        let prompt = build_prompt("Where do I start?", &profile).unwrap();

        assert!(prompt.starts_with("<s>[INST] "));
        assert!(prompt.ends_with(&format!("{}{}", INSTRUCTION_END, SEQUENCE_END)));
        assert!(prompt.contains("- Industry vertical: fintech\n"));
        assert!(prompt.contains("- AI priority areas: sales, security\n"));
        assert!(prompt.contains("1. WHERE"));
        assert!(prompt.contains("2. WHAT"));
        assert!(prompt.contains("3. HOW"));
        assert!(prompt.contains("Recommend actual AI tools by name"));
    }

    #[test]
    fn test_message_is_not_escaped() {
        let prompt = build_prompt("<b>& \"quotes\"</b>", &Profile::default()).unwrap();
        assert!(prompt.contains("User message: <b>& \"quotes\"</b>"));
    }
}
