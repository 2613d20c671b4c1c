use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub title: String,
    pub points: u32,
    pub level: u32,
    pub experience: u32,
    pub achievements: u32,
    pub level_progress: u32,
    pub level_goal: u32,
    pub onboarding_completed: bool,
}

impl UserProfile {
    pub fn xp_to_next_level(&self) -> u32 {
        self.level_goal.saturating_sub(self.level_progress)
    }
}
