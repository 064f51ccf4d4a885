//! Offline reply templates. Used whenever the inference endpoint cannot answer.
//!
//! Everything here is total: any message and any profile (including an empty
//! one) produce a non-empty sentence.

use crate::catalog;
use crate::profile::{Field, MultiField, Profile};

// Tool buckets, checked in this order when scanning a message for tool names.
static INDUSTRY_TOOLS: [(&str, [&str; 3]); 7] = [
    ("retail", ["Inventory AI", "Customer Behavior Analytics", "Pricing Optimization AI"]),
    ("healthcare", ["Medical Image Analysis", "Patient Data Management", "Healthcare Chatbots"]),
    ("finance", ["Fraud Detection AI", "Algorithmic Trading", "Risk Assessment Tools"]),
    ("technology", ["Code Completion Tools", "DevOps AI", "Testing Automation"]),
    ("education", ["Learning Management AI", "Student Performance Analytics", "Content Generation"]),
    ("manufacturing", ["Predictive Maintenance", "Supply Chain Optimization", "Quality Control AI"]),
    ("other", ["Project Management AI", "Document Processing", "Meeting Assistants"]),
];

const DEFAULT_BUCKET: &str = "other";

/// Maps an industry answer onto a tool bucket. Questionnaire tokens alias onto
/// the nearest bucket; anything unmapped lands in `other`.
pub fn industry_bucket(industry: &str) -> &'static str {
    match industry {
        "retail" | "ecommerce" | "marketplace" => "retail",
        "healthcare" | "healthtech" => "healthcare",
        "finance" | "fintech" => "finance",
        "technology" | "saas" | "ai" | "consumer" => "technology",
        "education" | "edtech" => "education",
        "manufacturing" | "hardware" => "manufacturing",
        _ => DEFAULT_BUCKET,
    }
}

fn bucket_tools(bucket: &str) -> &'static [&'static str; 3] {
    INDUSTRY_TOOLS
        .iter()
        .find(|(name, _)| *name == bucket)
        .map(|(_, tools)| tools)
        .unwrap_or(&INDUSTRY_TOOLS[INDUSTRY_TOOLS.len() - 1].1)
}

fn complexity_level(ai_experience: &str) -> &'static str {
    match ai_experience {
        "none" => "beginner-friendly",
        "beginner" | "basic" => "easy-to-use",
        "intermediate" => "powerful",
        "advanced" | "core" => "sophisticated",
        _ => "practical",
    }
}

fn scale_description(business_size: Option<&str>) -> &'static str {
    match business_size {
        Some("small") => "cost-effective",
        Some("medium") => "scalable",
        Some("large") => "enterprise-grade",
        _ => "flexible",
    }
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() {
        default
    } else {
        value
    }
}

/// Templated reply for a chat message.
pub fn fallback_reply(message: &str, profile: &Profile) -> String {
    let lowered = message.to_lowercase();
    let complexity = complexity_level(&profile.ai_experience);
    let scale = scale_description(profile.business_size());
    let industry = or_default(&profile.industry, "startup");
    let bucket = industry_bucket(&profile.industry);

    if lowered.contains("recommend") || lowered.contains("suggest") {
        let tools = bucket_tools(bucket);
        return format!(
            "Based on your {} {} business and {} experience level, I recommend these {} AI tools: {}. Would you like more details about any of these?",
            scale,
            industry,
            or_default(&profile.ai_experience, "unspecified"),
            complexity,
            tools.join(", ")
        );
    }

    for (name, tools) in INDUSTRY_TOOLS.iter() {
        for tool in tools.iter() {
            if lowered.contains(&tool.to_lowercase()) {
                let audience = if *name == bucket { "your industry" } else { *name };
                return format!(
                    "{} is a {} solution designed for {} businesses. It's particularly {} for your business size. Would you like to know more about implementation or pricing?",
                    tool, complexity, audience, scale
                );
            }
        }
    }

    format!(
        "As a {} AI assistant for {} {} businesses, I can help you find the right AI tools. What specific task or challenge are you looking to address with AI?",
        complexity, scale, industry
    )
}

fn first_label(profile: &Profile, field: MultiField, index: usize, default: &'static str) -> String {
    profile
        .multi(field)
        .get(index)
        .map(|v| catalog::label_for(Field::Multi(field), v).unwrap_or(v.as_str()).to_string())
        .unwrap_or_else(|| default.to_string())
}

/// Starter recommendations written straight after the questionnaire when the
/// resolution path itself breaks down.
pub fn initial_recommendations(profile: &Profile) -> String {
    format!(
        "Based on your {} startup in the {} industry at the {} stage, here are my initial recommendations:\n\n\
        1. **{}**: Consider tools like Zapier, Make (formerly Integromat), or n8n to automate repetitive tasks and workflows.\n\n\
        2. **{}**: Look into AI chatbots like Intercom or Drift to improve customer support while saving time.\n\n\
        3. **{}**: Tools like Obviously AI or Akkio can help you leverage your data without requiring a data science team.\n\n\
        What specific area would you like to explore first?",
        or_default(&profile.funding_stage, "early-stage"),
        or_default(&profile.industry, "unspecified"),
        or_default(&profile.startup_stage, "current"),
        first_label(profile, MultiField::AiPriorities, 0, "Process Automation"),
        first_label(profile, MultiField::AiPriorities, 1, "Customer Engagement"),
        first_label(profile, MultiField::CurrentChallenges, 0, "Data Analysis"),
    )
}
