use crate::ledger::current_streak;
use crate::models::{Category, Habit, MoodPoint, ScreenTimeItem};

/// Sample habits. The current streak is derived from each history; only the
/// longest streak is taken as given.
pub fn mock_habits() -> Vec<Habit> {
    vec![
        habit(1, "Sleep Quality", "🛌", Category::Health, 8.0, "hours", 5,
            [7.2, 6.8, 8.1, 7.5, 6.9, 8.3, 7.8], "#6366f1"),
        habit(2, "Water Intake", "💧", Category::Health, 8.0, "glasses", 7,
            [6.0, 8.0, 7.0, 9.0, 8.0, 8.0, 7.0], "#0ea5e9"),
        habit(3, "Exercise", "🏃", Category::Fitness, 30.0, "minutes", 14,
            [45.0, 0.0, 30.0, 60.0, 20.0, 0.0, 45.0], "#10b981"),
        habit(4, "Meditation", "🧘", Category::Mindfulness, 10.0, "minutes", 21,
            [10.0, 15.0, 10.0, 12.0, 10.0, 15.0, 10.0], "#8b5cf6"),
    ]
}

pub fn screen_time() -> Vec<ScreenTimeItem> {
    vec![
        ScreenTimeItem { name: "Productive", value: 3.2, color: "#10b981" },
        ScreenTimeItem { name: "Neutral", value: 2.5, color: "#6366f1" },
        ScreenTimeItem { name: "Social", value: 1.8, color: "#8b5cf6" },
        ScreenTimeItem { name: "Entertainment", value: 1.5, color: "#0ea5e9" },
    ]
}

pub fn mood() -> Vec<MoodPoint> {
    [7.0, 5.0, 8.0, 8.0, 9.0, 8.0, 7.0]
        .into_iter()
        .zip(crate::models::WEEKDAYS)
        .map(|(value, day)| MoodPoint { day, value })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn habit(
    id: u64,
    name: &str,
    icon: &str,
    category: Category,
    target: f64,
    unit: &str,
    longest_streak: u32,
    history: [f64; 7],
    color: &str,
) -> Habit {
    let current_streak = current_streak(&history, target);
    Habit {
        id,
        name: name.to_string(),
        icon: icon.to_string(),
        category,
        target,
        unit: unit.to_string(),
        current_streak,
        longest_streak: longest_streak.max(current_streak),
        history,
        color: color.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_streaks_agree_with_history() {
        let habits = mock_habits();
        let streaks: Vec<(u32, u32)> = habits
            .iter()
            .map(|habit| (habit.current_streak, habit.longest_streak))
            .collect();
        assert_eq!(streaks, vec![(0, 5), (0, 7), (1, 14), (7, 21)]);
        for habit in &habits {
            assert_eq!(habit.current_streak, current_streak(&habit.history, habit.target));
        }
    }
}
