//! Static content behind the Mobility, Alerts and Profile screens and the
//! navigation shell.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{
    Alert, AlertKind, CommuteEntry, CommuteType, DailyCost, DistributionSlice, Severity,
    TransportMode, UserProfile, View,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NavigationItem {
    pub view: View,
    pub label: String,
    pub path: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShellView {
    pub title: String,
    pub subtitle: String,
    pub user_points: u32,
    pub active: View,
    pub navigation: Vec<NavigationItem>,
}

pub fn shell(active: View) -> ShellView {
    ShellView {
        title: "Urban Mobi".into(),
        subtitle: "Alert & Planner".into(),
        user_points: 1250,
        active,
        navigation: View::ALL
            .iter()
            .map(|view| NavigationItem {
                view: *view,
                label: view.label().into(),
                path: view.path().into(),
            })
            .collect(),
    }
}

pub fn alerts(now: DateTime<Utc>) -> Vec<Alert> {
    vec![
        Alert {
            id: "1".into(),
            kind: AlertKind::Traffic,
            title: "Congestion on Ave. Paulista".into(),
            description: "Heavy traffic detected due to a broken down vehicle near MASP.".into(),
            severity: Severity::High,
            created_at: now,
            read: false,
        },
        Alert {
            id: "2".into(),
            kind: AlertKind::Weather,
            title: "Rain Warning".into(),
            description: "Moderate rain expected between 5 PM and 7 PM.".into(),
            severity: Severity::Medium,
            created_at: now - Duration::hours(1),
            read: true,
        },
    ]
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AlertsView {
    pub unread: usize,
    pub alerts: Vec<Alert>,
}

pub fn alerts_view(now: DateTime<Utc>) -> AlertsView {
    let alerts = alerts(now);

    AlertsView {
        unread: alerts.iter().filter(|alert| !alert.read).count(),
        alerts,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MobilityTab {
    Calendar,
    #[default]
    Economy,
    History,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EconomySummary {
    pub total_cost: f64,
    pub hours: f64,
    pub distance_km: f64,
    pub projected_savings: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "tab", rename_all = "snake_case")]
pub enum MobilityView {
    Calendar {
        message: String,
    },
    Economy {
        summary: EconomySummary,
        weekly_costs: Vec<DailyCost>,
        distribution: Vec<DistributionSlice>,
    },
    History {
        entries: Vec<CommuteEntry>,
    },
}

pub fn weekly_costs() -> Vec<DailyCost> {
    [
        ("Mon", 12.5),
        ("Tue", 0.0),
        ("Wed", 15.2),
        ("Thu", 8.4),
        ("Fri", 0.0),
        ("Sat", 5.0),
        ("Sun", 2.1),
    ]
    .into_iter()
    .map(|(name, cost)| DailyCost {
        name: name.into(),
        cost,
    })
    .collect()
}

pub fn commute_distribution() -> Vec<DistributionSlice> {
    let counts = [
        (CommuteType::Office, 3),
        (CommuteType::Home, 2),
        (CommuteType::Hybrid, 1),
    ];
    let total: u32 = counts.iter().map(|(_, value)| value).sum();

    counts
        .into_iter()
        .map(|(kind, value)| DistributionSlice {
            kind,
            name: kind.label().into(),
            value,
            color: kind.color().into(),
            share: value as f64 / total as f64,
        })
        .collect()
}

pub fn commute_history() -> Vec<CommuteEntry> {
    (1..=3)
        .map(|i| CommuteEntry {
            id: i.to_string(),
            date: format!("Jan {}, 2024 • 08:32 AM", 10 + i),
            kind: CommuteType::Office,
            mode: TransportMode::Public,
            distance: 13.7,
            cost: 14.5,
            duration: 54,
        })
        .collect()
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn mobility(tab: MobilityTab) -> MobilityView {
    match tab {
        MobilityTab::Calendar => MobilityView::Calendar {
            message: "Calendar view is being synced with your corporate workspace.".into(),
        },
        MobilityTab::Economy => {
            let weekly_costs = weekly_costs();
            let total_cost = round_cents(weekly_costs.iter().map(|day| day.cost).sum());

            MobilityView::Economy {
                summary: EconomySummary {
                    total_cost,
                    hours: 5.4,
                    distance_km: 82.0,
                    projected_savings: 120.0,
                },
                weekly_costs,
                distribution: commute_distribution(),
            }
        }
        MobilityTab::History => MobilityView::History {
            entries: commute_history(),
        },
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileView {
    pub profile: UserProfile,
    pub rank: String,
    pub badge: String,
    pub next_badge_hint: String,
    pub menu: Vec<String>,
}

pub fn profile() -> ProfileView {
    let profile = UserProfile {
        name: "Alex Martinez".into(),
        title: "Urban Explorer".into(),
        points: 1250,
        level: 14,
        experience: 12_450,
        achievements: 12,
        level_progress: 850,
        level_goal: 1000,
        onboarding_completed: true,
    };

    ProfileView {
        next_badge_hint: format!(
            "Earn {} more XP to unlock 'Carbon Warrior' badge!",
            profile.xp_to_next_level()
        ),
        profile,
        rank: "Top 5%".into(),
        badge: "Explorer".into(),
        menu: [
            "General Preferences",
            "Notifications",
            "Payment Methods",
            "Privacy & Security",
            "Support & Feedback",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
    }
}

#[test]
fn economy_total_is_the_weekly_sum() {
    match mobility(MobilityTab::Economy) {
        MobilityView::Economy {
            summary,
            distribution,
            ..
        } => {
            assert_eq!(summary.total_cost, 43.2);
            assert_eq!(distribution[0].name, "Office");
            assert!((distribution.iter().map(|s| s.share).sum::<f64>() - 1.0).abs() < 1e-9);
        }
        other => panic!("unexpected tab: {:?}", other),
    }
}

#[test]
fn shell_lists_every_view_once() {
    let shell = shell(View::Routes);
    assert_eq!(shell.navigation.len(), 5);
    assert_eq!(shell.navigation[1].path, "/routes");
    assert_eq!(shell.active, View::Routes);
}

#[test]
fn one_alert_is_unread() {
    let view = alerts_view(Utc::now());
    assert_eq!(view.unread, 1);
    assert!(view.alerts[1].created_at < view.alerts[0].created_at);
}

#[test]
fn profile_hint_counts_remaining_xp() {
    assert_eq!(
        profile().next_badge_hint,
        "Earn 150 more XP to unlock 'Carbon Warrior' badge!"
    );
}
