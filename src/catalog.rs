//! The startup questionnaire: five sections, eighteen questions.
//!
//! Pure data. The flow controller walks it in order and the fallback uses the
//! option labels to phrase its starter recommendations.

use serde::Serialize;

use crate::profile::{Field, MultiField, SingleField};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuizOption {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: Field,
    pub prompt: &'static str,
    pub options: &'static [QuizOption],
    pub max_selections: Option<usize>,
}

impl Question {
    pub fn is_multi_select(&self) -> bool {
        matches!(self.id, Field::Multi(_))
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Section {
    pub title: &'static str,
    pub questions: &'static [Question],
}

macro_rules! opt {
    ($value:expr, $label:expr) => {
        QuizOption { value: $value, label: $label }
    };
}

macro_rules! single {
    ($id:expr, $prompt:expr, $options:expr $(,)?) => {
        Question { id: Field::Single($id), prompt: $prompt, options: $options, max_selections: None }
    };
}

macro_rules! multi {
    ($id:expr, $prompt:expr, $max:expr, $options:expr $(,)?) => {
        Question { id: Field::Multi($id), prompt: $prompt, options: $options, max_selections: $max }
    };
}

pub static SECTIONS: &[Section] = &[
    Section {
        title: "Startup Basics",
        questions: &[
            single!(
                SingleField::FundingStage,
                "What is your startup's current funding stage?",
                &[
                    opt!("bootstrapped", "Bootstrapped / Self-funded"),
                    opt!("pre-seed", "Pre-seed"),
                    opt!("seed", "Seed"),
                    opt!("seriesA", "Series A"),
                    opt!("seriesB", "Series B or C"),
                    opt!("seriesD", "Series D+"),
                    opt!("profitable", "Profitable / No external funding"),
                ],
            ),
            single!(
                SingleField::TeamSize,
                "How large is your team?",
                &[
                    opt!("solo", "Solo founder"),
                    opt!("micro", "Micro team (2-5 people)"),
                    opt!("small", "Small team (6-15 people)"),
                    opt!("medium", "Medium team (16-50 people)"),
                    opt!("large", "Large team (50+ people)"),
                ],
            ),
            single!(
                SingleField::Industry,
                "What industry vertical is your startup in?",
                &[
                    opt!("fintech", "Fintech"),
                    opt!("healthtech", "Healthtech / Medtech"),
                    opt!("ecommerce", "E-commerce / D2C"),
                    opt!("saas", "SaaS / Enterprise Software"),
                    opt!("marketplace", "Marketplace / Platform"),
                    opt!("ai", "AI / ML"),
                    opt!("hardware", "Hardware / IoT"),
                    opt!("consumer", "Consumer Apps"),
                    opt!("edtech", "Edtech"),
                    opt!("cleantech", "Cleantech / Sustainability"),
                    opt!("other", "Other"),
                ],
            ),
            single!(
                SingleField::StartupStage,
                "What stage is your product in?",
                &[
                    opt!("ideation", "Ideation / Concept"),
                    opt!("mvp", "MVP / Prototype"),
                    opt!("earlyTraction", "Early Traction (some users/revenue)"),
                    opt!("productMarketFit", "Product-Market Fit"),
                    opt!("scaling", "Scaling / Growth"),
                ],
            ),
        ],
    },
    Section {
        title: "Growth Challenges & Priorities",
        questions: &[
            multi!(
                MultiField::CurrentChallenges,
                "What are your biggest challenges right now? (Select up to 3)",
                Some(3),
                &[
                    opt!("userAcquisition", "User acquisition / Growth"),
                    opt!("productDevelopment", "Product development / Iteration"),
                    opt!("fundraising", "Fundraising / Investor relations"),
                    opt!("hiring", "Hiring / Team building"),
                    opt!("operations", "Operations / Scaling processes"),
                    opt!("customerRetention", "Customer retention / Engagement"),
                    opt!("unitEconomics", "Unit economics / Profitability"),
                    opt!("goToMarket", "Go-to-market strategy"),
                    opt!("competition", "Competition / Market positioning"),
                    opt!("regulation", "Regulatory / Compliance issues"),
                ],
            ),
            multi!(
                MultiField::GrowthMetrics,
                "Which metrics are most important for your startup right now? (Select up to 3)",
                Some(3),
                &[
                    opt!("userGrowth", "User/customer growth"),
                    opt!("revenue", "Revenue growth"),
                    opt!("engagement", "User engagement / Retention"),
                    opt!("conversion", "Conversion rates"),
                    opt!("cac", "Customer acquisition cost (CAC)"),
                    opt!("ltv", "Lifetime value (LTV)"),
                    opt!("runway", "Runway / Burn rate"),
                    opt!("gmv", "GMV / Transaction volume"),
                    opt!("nps", "NPS / Customer satisfaction"),
                    opt!("productMetrics", "Product usage metrics"),
                ],
            ),
            multi!(
                MultiField::TimeConsumingTasks,
                "Which tasks consume most of your team's time? (Select up to 3)",
                Some(3),
                &[
                    opt!("development", "Product development / Engineering"),
                    opt!("customerSupport", "Customer support / Success"),
                    opt!("sales", "Sales / Business development"),
                    opt!("marketing", "Marketing / Growth"),
                    opt!("dataAnalysis", "Data analysis / Reporting"),
                    opt!("contentCreation", "Content creation"),
                    opt!("meetings", "Meetings / Communication"),
                    opt!("fundraising", "Fundraising / Investor relations"),
                    opt!("recruitment", "Recruitment / Onboarding"),
                    opt!("administration", "Administrative tasks"),
                ],
            ),
        ],
    },
    Section {
        title: "Technical Stack & Data",
        questions: &[
            single!(
                SingleField::TechStack,
                "What does your current tech stack look like?",
                &[
                    opt!("minimal", "Minimal (mostly no-code tools, spreadsheets)"),
                    opt!("standard", "Standard (common frameworks, some custom code)"),
                    opt!("advanced", "Advanced (custom development, multiple technologies)"),
                    opt!("cutting-edge", "Cutting-edge (latest technologies, microservices)"),
                ],
            ),
            single!(
                SingleField::DevResources,
                "What development resources do you have?",
                &[
                    opt!("noTech", "No technical co-founder or developers"),
                    opt!("techCofounder", "Technical co-founder only"),
                    opt!("smallDev", "Small development team (1-3 developers)"),
                    opt!("mediumDev", "Medium development team (4-10 developers)"),
                    opt!("largeDev", "Large development team (10+ developers)"),
                    opt!("outsourced", "Outsourced development / Agency"),
                ],
            ),
            multi!(
                MultiField::CurrentTools,
                "What tools are you currently using? (Select all that apply)",
                None,
                &[
                    opt!("analytics", "Analytics (Google Analytics, Mixpanel, etc.)"),
                    opt!("crm", "CRM (Hubspot, Salesforce, etc.)"),
                    opt!("marketing", "Marketing automation (Mailchimp, etc.)"),
                    opt!("productManagement", "Product management (Jira, Asana, etc.)"),
                    opt!("communication", "Team communication (Slack, Discord, etc.)"),
                    opt!("design", "Design tools (Figma, Sketch, etc.)"),
                    opt!("customerSupport", "Customer support (Intercom, Zendesk, etc.)"),
                    opt!("devOps", "DevOps tools (GitHub, GitLab, etc.)"),
                    opt!("noCode", "No-code tools (Webflow, Bubble, etc.)"),
                    opt!("aiTools", "AI tools (already using some)"),
                    opt!("minimal", "Minimal tooling"),
                ],
            ),
            multi!(
                MultiField::DataAvailability,
                "What type of data do you currently collect?",
                None,
                &[
                    opt!("userBehavior", "User behavior / Product usage data"),
                    opt!("customerData", "Customer profiles / Demographics"),
                    opt!("transactionData", "Transaction / Payment data"),
                    opt!("marketingData", "Marketing / Acquisition data"),
                    opt!("feedbackData", "Customer feedback / Support data"),
                    opt!("operationalData", "Operational / Process data"),
                    opt!("contentData", "Content / Media data"),
                    opt!("minimalData", "We collect minimal data currently"),
                ],
            ),
        ],
    },
    Section {
        title: "AI Readiness & Resources",
        questions: &[
            single!(
                SingleField::AiExperience,
                "What is your team's experience with AI tools?",
                &[
                    opt!("none", "No experience (never used AI tools)"),
                    opt!("basic", "Basic (used consumer AI like ChatGPT)"),
                    opt!("intermediate", "Intermediate (implemented basic AI in product/operations)"),
                    opt!("advanced", "Advanced (AI expertise on team, multiple implementations)"),
                    opt!("core", "Core competency (AI is central to our product)"),
                ],
            ),
            single!(
                SingleField::AiInvestmentReadiness,
                "What is your monthly budget for AI tools/implementation?",
                &[
                    opt!("minimal", "Minimal (<$100/month)"),
                    opt!("small", "Small ($100-$500/month)"),
                    opt!("medium", "Medium ($500-$2,000/month)"),
                    opt!("large", "Large ($2,000-$10,000/month)"),
                    opt!("enterprise", "Enterprise ($10,000+/month)"),
                ],
            ),
            single!(
                SingleField::ImplementationTimeframe,
                "What is your timeframe for implementing AI solutions?",
                &[
                    opt!("immediate", "Immediate (within 2 weeks)"),
                    opt!("shortTerm", "Short-term (2-4 weeks)"),
                    opt!("mediumTerm", "Medium-term (1-3 months)"),
                    opt!("longTerm", "Long-term (3+ months)"),
                    opt!("exploring", "Just exploring options for now"),
                ],
            ),
        ],
    },
    Section {
        title: "AI Implementation Goals",
        questions: &[
            multi!(
                MultiField::AiPriorities,
                "Which areas do you want to enhance with AI? (Select up to 3)",
                Some(3),
                &[
                    opt!("productFeatures", "Product features / Capabilities"),
                    opt!("customerExperience", "Customer experience / Support"),
                    opt!("marketing", "Marketing / User acquisition"),
                    opt!("sales", "Sales / Conversion optimization"),
                    opt!("operations", "Operations / Internal efficiency"),
                    opt!("dataAnalysis", "Data analysis / Business intelligence"),
                    opt!("contentCreation", "Content creation / Management"),
                    opt!("productDevelopment", "Product development / R&D"),
                    opt!("decisionMaking", "Decision making / Strategy"),
                    opt!("security", "Security / Fraud prevention"),
                ],
            ),
            multi!(
                MultiField::AiCapabilities,
                "Which AI capabilities are you most interested in? (Select up to 3)",
                Some(3),
                &[
                    opt!("nlp", "Natural language processing / Generation"),
                    opt!("imageGeneration", "Image generation / Processing"),
                    opt!("dataAnalytics", "Data analytics / Insights"),
                    opt!("automation", "Process automation / Workflows"),
                    opt!("personalization", "Personalization / Recommendations"),
                    opt!("chatbots", "Chatbots / Conversational AI"),
                    opt!("prediction", "Predictive analytics / Forecasting"),
                    opt!("voiceAi", "Voice / Speech recognition"),
                    opt!("computerVision", "Computer vision / Object detection"),
                    opt!("agentAi", "Autonomous agents / Decision systems"),
                ],
            ),
            multi!(
                MultiField::SuccessMetrics,
                "How would you measure the success of AI implementation?",
                Some(3),
                &[
                    opt!("growthAcceleration", "Growth acceleration"),
                    opt!("costReduction", "Cost reduction / Efficiency"),
                    opt!("userRetention", "User retention / Engagement"),
                    opt!("productQuality", "Product quality / Capabilities"),
                    opt!("teamProductivity", "Team productivity"),
                    opt!("decisionSpeed", "Decision-making speed / Quality"),
                    opt!("competitiveAdvantage", "Competitive advantage"),
                    opt!("customerSatisfaction", "Customer satisfaction"),
                    opt!("investorAttraction", "Investor attractiveness"),
                ],
            ),
            multi!(
                MultiField::ConcernsBarriers,
                "What concerns do you have about implementing AI? (Select all that apply)",
                None,
                &[
                    opt!("cost", "Cost and ROI uncertainty"),
                    opt!("technicalDebt", "Technical debt / Integration challenges"),
                    opt!("expertise", "Lack of expertise / Knowledge"),
                    opt!("dataQuality", "Data quality / Availability"),
                    opt!("privacy", "Privacy / Security concerns"),
                    opt!("reliability", "Reliability / Performance issues"),
                    opt!("resources", "Resource constraints (time/people)"),
                    opt!("rapidChanges", "Rapidly changing AI landscape"),
                    opt!("none", "No significant concerns"),
                ],
            ),
        ],
    },
];

pub fn total_questions(sections: &[Section]) -> usize {
    sections.iter().map(|s| s.questions.len()).sum()
}

/// Finds the display label for a stored token, if the field's question offers it.
pub fn label_for(field: Field, value: &str) -> Option<&'static str> {
    SECTIONS
        .iter()
        .flat_map(|s| s.questions.iter())
        .find(|q| q.id == field)
        .and_then(|q| q.options.iter().find(|o| o.value == value))
        .map(|o| o.label)
}
