use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum UserCategory {
    EmergencyProfessional,
    FloodProfessional,
    LocalAuthority,
    GeneralResident,
    AtRiskResident,
}

impl UserCategory {
    pub const ALL: [UserCategory; 5] = [
        UserCategory::EmergencyProfessional,
        UserCategory::FloodProfessional,
        UserCategory::LocalAuthority,
        UserCategory::GeneralResident,
        UserCategory::AtRiskResident,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserCategory::EmergencyProfessional => "emergency-professional",
            UserCategory::FloodProfessional => "flood-professional",
            UserCategory::LocalAuthority => "local-authority",
            UserCategory::GeneralResident => "general-resident",
            UserCategory::AtRiskResident => "at-risk-resident",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UserCategory::EmergencyProfessional => "Emergency Management Professional",
            UserCategory::FloodProfessional => "Flood Risk Professional",
            UserCategory::LocalAuthority => "Local Authority Staff",
            UserCategory::GeneralResident => "General Resident",
            UserCategory::AtRiskResident => "At-Risk Resident",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            UserCategory::EmergencyProfessional => "Civil defence, fire, police or ambulance services",
            UserCategory::FloodProfessional => "Hydrologist, engineer or flood risk analyst",
            UserCategory::LocalAuthority => "Council or regional government staff",
            UserCategory::GeneralResident => "Community member not in high-risk flood area",
            UserCategory::AtRiskResident => "Living in flood-prone area or previously affected",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FloodExperience {
    None,
    Minimal,
    Moderate,
    Extensive,
}

impl FloodExperience {
    pub const ALL: [FloodExperience; 4] = [
        FloodExperience::None,
        FloodExperience::Minimal,
        FloodExperience::Moderate,
        FloodExperience::Extensive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FloodExperience::None => "none",
            FloodExperience::Minimal => "minimal",
            FloodExperience::Moderate => "moderate",
            FloodExperience::Extensive => "extensive",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FloodExperience::None => "No direct experience",
            FloodExperience::Minimal => "Minimal experience",
            FloodExperience::Moderate => "Moderate experience",
            FloodExperience::Extensive => "Extensive experience",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FloodExperience::None => "Never experienced flooding",
            FloodExperience::Minimal => "Heard about floods or minor exposure",
            FloodExperience::Moderate => "Experienced flooding once or twice",
            FloodExperience::Extensive => "Multiple flood experiences or professional involvement",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TechProficiency {
    Beginner,
    Intermediate,
    Advanced,
}

impl TechProficiency {
    pub const ALL: [TechProficiency; 3] = [
        TechProficiency::Beginner,
        TechProficiency::Intermediate,
        TechProficiency::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TechProficiency::Beginner => "beginner",
            TechProficiency::Intermediate => "intermediate",
            TechProficiency::Advanced => "advanced",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TechProficiency::Beginner => "Beginner",
            TechProficiency::Intermediate => "Intermediate",
            TechProficiency::Advanced => "Advanced",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TechProficiency::Beginner => "Basic smartphone/computer use",
            TechProficiency::Intermediate => "Comfortable with most apps and websites",
            TechProficiency::Advanced => "Very comfortable with technology",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TimeOfYear {
    Wet,
    Dry,
    Transition,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Intensity {
    Low,
    Moderate,
    High,
    Extreme,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }

    /// One-line guidance shown next to the assessed level.
    pub fn description(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Minor flooding possible in low-lying areas. Standard precautions recommended.",
            RiskLevel::Moderate => "Moderate flooding likely. Residents should prepare for potential evacuations.",
            RiskLevel::High => "Significant flooding expected. Emergency preparations should begin immediately.",
            RiskLevel::Critical => "Severe flooding imminent. Immediate evacuation may be necessary.",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub user_category: UserCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub location: String,
    pub flood_experience: FloodExperience,
    pub tech_proficiency: TechProficiency,
    #[serde(default)]
    pub education_level: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeoLocation {
    pub lat: f64,
    pub lng: f64,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioParameters {
    /// mm/hour
    pub rainfall: f64,
    /// metres above normal
    pub river_level: f64,
    pub soil_saturation: f64,
    pub urbanization: f64,
    pub drainage_capacity: f64,
    pub time_of_year: TimeOfYear,
    /// hours
    pub duration: u32,
    pub intensity: Intensity,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FloodScenario {
    pub id: Option<Uuid>,
    pub name: String,
    pub location: GeoLocation,
    pub catchment: String,
    pub parameters: ScenarioParameters,
    pub risk_level: RiskLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameAction {
    pub id: Uuid,
    pub action_id: String,
    pub action_label: String,
    pub timestamp: DateTime<Utc>,
    pub scenario_id: Option<Uuid>,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub id: Uuid,
    pub user_profile: UserProfile,
    pub scenario: FloodScenario,
    pub actions: Vec<GameAction>,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl GameSession {
    pub fn is_finished(&self) -> bool {
        self.end_time.is_some()
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.end_time
            .map(|end| (end - self.start_time).num_seconds())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AppExperience {
    Excellent,
    Good,
    Fair,
    Poor,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Recommendation {
    Definitely,
    Probably,
    Maybe,
    ProbablyNot,
    DefinitelyNot,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Questionnaire {
    pub overall_rating: u8,
    pub app_usability: u8,
    pub information_clarity: u8,
    pub decision_support: u8,
    pub experience: AppExperience,
    pub would_recommend: Recommendation,
    #[serde(default)]
    pub improvements: String,
    #[serde(default)]
    pub additional_comments: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub game_session: GameSession,
    pub feedback: Questionnaire,
    pub submitted_at: DateTime<Utc>,
}
