use serde::{Deserialize, Serialize};

/// The five mutually exclusive top-level screens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Dashboard,
    Routes,
    Mobility,
    Alerts,
    Profile,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Dashboard,
        View::Routes,
        View::Mobility,
        View::Alerts,
        View::Profile,
    ];

    /// Resolves a navigation path. Anything unknown lands on the dashboard.
    pub fn from_path(path: &str) -> Self {
        match path.trim_matches('/') {
            "routes" => Self::Routes,
            "mobility" => Self::Mobility,
            "alerts" => Self::Alerts,
            "profile" => Self::Profile,
            _ => Self::Dashboard,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Self::Dashboard => "/",
            Self::Routes => "/routes",
            Self::Mobility => "/mobility",
            Self::Alerts => "/alerts",
            Self::Profile => "/profile",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Dashboard => "Home",
            Self::Routes => "Routes",
            Self::Mobility => "Mobility",
            Self::Alerts => "Alerts",
            Self::Profile => "Profile",
        }
    }
}

#[test]
fn unknown_paths_fall_back_to_dashboard() {
    assert_eq!(View::from_path("/routes"), View::Routes);
    assert_eq!(View::from_path("alerts/"), View::Alerts);
    assert_eq!(View::from_path("/settings"), View::Dashboard);
    assert_eq!(View::from_path(""), View::Dashboard);

    for view in View::ALL {
        assert_eq!(View::from_path(view.path()), view);
    }
}
