///! Simulation session state machine
///! NotStarted -> Briefing -> Active -> Ended, with an append-only action log.
use crate::domain::models::{FloodScenario, GameAction, GameSession, UserProfile};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct ActionDefinition {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
}

pub static EMERGENCY_ACTIONS: [ActionDefinition; 8] = [
    ActionDefinition {
        id: "call-emergency",
        label: "Call Emergency Services",
        icon: "🚨",
        description: "Contact 111 for immediate emergency assistance",
    },
    ActionDefinition {
        id: "contact-family",
        label: "Check on Family/Neighbors",
        icon: "👪",
        description: "Ensure loved ones are safe and informed",
    },
    ActionDefinition {
        id: "evacuate",
        label: "Evacuate Area",
        icon: "🚗",
        description: "Leave flood-prone area immediately",
    },
    ActionDefinition {
        id: "shelter",
        label: "Seek Higher Ground",
        icon: "🏔️",
        description: "Move to designated safe area or higher ground",
    },
    ActionDefinition {
        id: "prepare-home",
        label: "Secure Property",
        icon: "🏠",
        description: "Protect home with sandbags or barriers",
    },
    ActionDefinition {
        id: "gather-supplies",
        label: "Gather Emergency Supplies",
        icon: "🎒",
        description: "Collect food, water, medications, etc.",
    },
    ActionDefinition {
        id: "monitor-updates",
        label: "Monitor Official Updates",
        icon: "📱",
        description: "Stay informed via emergency broadcasts",
    },
    ActionDefinition {
        id: "help-others",
        label: "Assist Vulnerable People",
        icon: "🤝",
        description: "Help elderly, disabled, or those with children",
    },
];

pub fn find_action(id: &str) -> Option<&'static ActionDefinition> {
    EMERGENCY_ACTIONS.iter().find(|a| a.id == id)
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    NotStarted,
    Briefing,
    Active,
    Ended,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::NotStarted => "not_started",
            SessionPhase::Briefing => "briefing",
            SessionPhase::Active => "active",
            SessionPhase::Ended => "ended",
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot {action} while session is {from}")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },
}

impl SessionError {
    fn invalid(from: SessionPhase, action: &'static str) -> Self {
        SessionError::InvalidTransition {
            from: from.as_str(),
            action,
        }
    }
}

/// One visitor's run through a scenario.
///
/// Profile and scenario are frozen copies taken at briefing time; later edits
/// in the builder do not reach a session that is already briefed.
#[derive(Debug, Clone)]
pub struct SessionRunner {
    id: Uuid,
    phase: SessionPhase,
    profile: Option<UserProfile>,
    scenario: Option<FloodScenario>,
    actions: Vec<GameAction>,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
}

impl Default for SessionRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRunner {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            phase: SessionPhase::NotStarted,
            profile: None,
            scenario: None,
            actions: Vec::new(),
            start_time: None,
            end_time: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn actions(&self) -> &[GameAction] {
        &self.actions
    }

    pub fn scenario(&self) -> Option<&FloodScenario> {
        self.scenario.as_ref()
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => (end - start).num_seconds(),
            (Some(start), None) => (now - start).num_seconds().max(0),
            _ => 0,
        }
    }

    pub fn brief(&mut self, profile: UserProfile, scenario: FloodScenario) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::NotStarted => {
                self.profile = Some(profile);
                self.scenario = Some(scenario);
                self.phase = SessionPhase::Briefing;
                Ok(())
            }
            // Re-briefing before the run starts just refreshes the frozen copies
            SessionPhase::Briefing => {
                self.profile = Some(profile);
                self.scenario = Some(scenario);
                Ok(())
            }
            other => Err(SessionError::invalid(other, "brief")),
        }
    }

    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Briefing {
            return Err(SessionError::invalid(self.phase, "start"));
        }
        self.start_time = Some(now);
        self.phase = SessionPhase::Active;
        Ok(())
    }

    /// Appends an action to the log. Unknown action ids are ignored and return `Ok(None)`.
    pub fn record_action(
        &mut self,
        action_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<&GameAction>, SessionError> {
        if self.phase != SessionPhase::Active {
            return Err(SessionError::invalid(self.phase, "record action"));
        }
        let Some(definition) = find_action(action_id) else {
            tracing::debug!("Ignoring unknown action id: {}", action_id);
            return Ok(None);
        };

        // Clock reads can step backwards; keep the log non-decreasing
        let floor = self
            .actions
            .last()
            .map(|a| a.timestamp)
            .or(self.start_time)
            .unwrap_or(now);
        let timestamp = now.max(floor);

        let user_id = self.profile.as_ref().map(|p| p.id).unwrap_or_default();
        let scenario_id = self.scenario.as_ref().and_then(|s| s.id);

        self.actions.push(GameAction {
            id: Uuid::new_v4(),
            action_id: definition.id.to_string(),
            action_label: definition.label.to_string(),
            timestamp,
            scenario_id,
            user_id,
        });
        Ok(self.actions.last())
    }

    /// Closes the session and returns the finished record.
    pub fn end(&mut self, now: DateTime<Utc>) -> Result<GameSession, SessionError> {
        if self.phase != SessionPhase::Active {
            return Err(SessionError::invalid(self.phase, "end"));
        }
        let (Some(profile), Some(scenario), Some(start_time)) =
            (self.profile.clone(), self.scenario.clone(), self.start_time)
        else {
            return Err(SessionError::invalid(self.phase, "end"));
        };

        let last = self.actions.last().map(|a| a.timestamp).unwrap_or(start_time);
        let end_time = now.max(last);
        self.end_time = Some(end_time);
        self.phase = SessionPhase::Ended;

        Ok(GameSession {
            id: self.id,
            user_profile: profile,
            scenario,
            actions: self.actions.clone(),
            start_time,
            end_time: Some(end_time),
        })
    }
}
