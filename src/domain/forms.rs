use crate::domain::models::{
    AppExperience, FeedbackRecord, FloodExperience, GameSession, Questionnaire, Recommendation,
    TechProficiency, UserCategory, UserProfile,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

pub const MAX_TEXT_LEN: usize = 5000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    Missing(&'static str),
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
    },
    #[error("{0} is too long")]
    TooLong(&'static str),
    #[error("game session has not ended")]
    SessionNotFinished,
}

impl ValidationError {
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::Missing(f) | ValidationError::TooLong(f) => Some(*f),
            ValidationError::OutOfRange { field, .. } => Some(*field),
            ValidationError::SessionNotFinished => None,
        }
    }
}

fn required<T: Copy>(value: Option<T>, field: &'static str) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::Missing(field))
}

const AGE_MAX: u32 = 120;

/// Profile form as posted by the client. The three categorical answers are
/// required; demographics may be left blank.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    pub user_category: Option<UserCategory>,
    pub age: Option<u32>,
    pub occupation: Option<String>,
    pub location: Option<String>,
    pub flood_experience: Option<FloodExperience>,
    pub tech_proficiency: Option<TechProficiency>,
    pub education_level: Option<String>,
}

impl ProfileForm {
    pub fn into_profile(self, now: DateTime<Utc>) -> Result<UserProfile, ValidationError> {
        Ok(UserProfile {
            id: Uuid::new_v4(),
            user_category: required(self.user_category, "userCategory")?,
            age: age(self.age)?,
            occupation: optional_text(self.occupation, "occupation")?,
            location: optional_text(self.location, "location")?,
            flood_experience: required(self.flood_experience, "floodExperience")?,
            tech_proficiency: required(self.tech_proficiency, "techProficiency")?,
            education_level: optional_text(self.education_level, "educationLevel")?,
            created_at: now,
        })
    }
}

fn age(value: Option<u32>) -> Result<Option<u32>, ValidationError> {
    match value {
        Some(v) if v > AGE_MAX => Err(ValidationError::OutOfRange {
            field: "age",
            min: 0,
            max: AGE_MAX,
        }),
        other => Ok(other),
    }
}

const RATING_MIN: u8 = 1;
const RATING_MAX: u8 = 5;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackForm {
    pub overall_rating: Option<u8>,
    pub app_usability: Option<u8>,
    pub information_clarity: Option<u8>,
    pub decision_support: Option<u8>,
    pub experience: Option<AppExperience>,
    pub would_recommend: Option<Recommendation>,
    pub improvements: Option<String>,
    pub additional_comments: Option<String>,
}

fn rating(value: Option<u8>, field: &'static str) -> Result<u8, ValidationError> {
    let v = required(value, field)?;
    if !(RATING_MIN..=RATING_MAX).contains(&v) {
        return Err(ValidationError::OutOfRange {
            field,
            min: RATING_MIN as u32,
            max: RATING_MAX as u32,
        });
    }
    Ok(v)
}

fn optional_text(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    let text = value.unwrap_or_default();
    if text.len() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong(field));
    }
    Ok(text.trim().to_string())
}

impl FeedbackForm {
    /// Ties the questionnaire to a finished session.
    pub fn into_record(
        self,
        session: GameSession,
        now: DateTime<Utc>,
    ) -> Result<FeedbackRecord, ValidationError> {
        if !session.is_finished() {
            return Err(ValidationError::SessionNotFinished);
        }
        let feedback = Questionnaire {
            overall_rating: rating(self.overall_rating, "overallRating")?,
            app_usability: rating(self.app_usability, "appUsability")?,
            information_clarity: rating(self.information_clarity, "informationClarity")?,
            decision_support: rating(self.decision_support, "decisionSupport")?,
            experience: required(self.experience, "experience")?,
            would_recommend: required(self.would_recommend, "wouldRecommend")?,
            improvements: optional_text(self.improvements, "improvements")?,
            additional_comments: optional_text(self.additional_comments, "additionalComments")?,
        };
        Ok(FeedbackRecord {
            game_session: session,
            feedback,
            submitted_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scenario::ScenarioBuilder;

    fn full_profile_form() -> ProfileForm {
        ProfileForm {
            user_category: Some(UserCategory::LocalAuthority),
            age: Some(41),
            occupation: Some("planner".to_string()),
            location: Some("Westport".to_string()),
            flood_experience: Some(FloodExperience::Moderate),
            tech_proficiency: Some(TechProficiency::Advanced),
            education_level: Some("master".to_string()),
        }
    }

    fn full_feedback_form() -> FeedbackForm {
        FeedbackForm {
            overall_rating: Some(4),
            app_usability: Some(5),
            information_clarity: Some(3),
            decision_support: Some(4),
            experience: Some(AppExperience::Good),
            would_recommend: Some(Recommendation::Probably),
            improvements: Some("  bigger map ".to_string()),
            additional_comments: None,
        }
    }

    fn session(end: bool) -> GameSession {
        let now = Utc::now();
        GameSession {
            id: Uuid::new_v4(),
            user_profile: full_profile_form().into_profile(now).unwrap(),
            scenario: ScenarioBuilder::new().finalize(now),
            actions: Vec::new(),
            start_time: now,
            end_time: end.then_some(now),
        }
    }

    #[test]
    fn test_profile_form_complete() {
        let now = Utc::now();
        let profile = full_profile_form().into_profile(now).unwrap();
        assert_eq!(profile.user_category, UserCategory::LocalAuthority);
        assert_eq!(profile.occupation, "planner");
        assert_eq!(profile.created_at, now);
    }

    #[test]
    fn test_profile_form_missing_fields() {
        let mut form = full_profile_form();
        form.user_category = None;
        assert_eq!(
            form.into_profile(Utc::now()).unwrap_err(),
            ValidationError::Missing("userCategory")
        );

        let mut form = full_profile_form();
        form.tech_proficiency = None;
        let err = form.into_profile(Utc::now()).unwrap_err();
        assert_eq!(err.field(), Some("techProficiency"));
    }

    #[test]
    fn test_profile_demographics_optional() {
        let form = ProfileForm {
            user_category: Some(UserCategory::AtRiskResident),
            flood_experience: Some(FloodExperience::None),
            tech_proficiency: Some(TechProficiency::Beginner),
            location: Some("  Carters Beach ".to_string()),
            ..Default::default()
        };
        let profile = form.into_profile(Utc::now()).unwrap();
        assert_eq!(profile.age, None);
        assert_eq!(profile.occupation, "");
        assert_eq!(profile.location, "Carters Beach");

        let mut form = full_profile_form();
        form.age = Some(400);
        assert_eq!(
            form.into_profile(Utc::now()).unwrap_err().field(),
            Some("age")
        );
    }

    #[test]
    fn test_profile_rejects_unknown_category() {
        let parsed: Result<ProfileForm, _> =
            serde_json::from_str(r#"{"userCategory": "alien", "age": 3}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_feedback_requires_finished_session() {
        let err = full_feedback_form()
            .into_record(session(false), Utc::now())
            .unwrap_err();
        assert_eq!(err, ValidationError::SessionNotFinished);
    }

    #[test]
    fn test_feedback_record() {
        let record = full_feedback_form()
            .into_record(session(true), Utc::now())
            .unwrap();
        assert_eq!(record.feedback.improvements, "bigger map");
        assert_eq!(record.feedback.additional_comments, "");
        assert!(record.game_session.end_time.is_some());
    }

    #[test]
    fn test_feedback_rating_range() {
        let mut form = full_feedback_form();
        form.app_usability = Some(0);
        let err = form.into_record(session(true), Utc::now()).unwrap_err();
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                field: "appUsability",
                min: 1,
                max: 5
            }
        );

        let mut form = full_feedback_form();
        form.overall_rating = None;
        let err = form.into_record(session(true), Utc::now()).unwrap_err();
        assert_eq!(err, ValidationError::Missing("overallRating"));
    }

    #[test]
    fn test_feedback_text_limit() {
        let mut form = full_feedback_form();
        form.additional_comments = Some("x".repeat(MAX_TEXT_LEN + 1));
        let err = form.into_record(session(true), Utc::now()).unwrap_err();
        assert_eq!(err, ValidationError::TooLong("additionalComments"));
    }
}
