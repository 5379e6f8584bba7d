use serde::{Deserialize, Serialize};

/// What a pending prompt commits to when accepted. The dispatcher rolls
/// the outcome only at resolution time, never when the prompt is raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecisionKind {
    Descend,
    OpenChest,
    DrinkFountain,
    RestAtCampfire,
    MineOre,
    PullLever,
    StudyTablet,
}

/// A modal choice offered to the player. At most one exists at a time;
/// all other actions are rejected until it is resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingDecision {
    pub title: String,
    pub body: String,
    pub accept_label: String,
    pub decline_label: String,
    pub kind: DecisionKind,
}

impl PendingDecision {
    pub fn new(
        kind: DecisionKind,
        title: impl Into<String>,
        body: impl Into<String>,
        accept_label: impl Into<String>,
        decline_label: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            accept_label: accept_label.into(),
            decline_label: decline_label.into(),
            kind,
        }
    }
}
