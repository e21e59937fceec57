use crate::ledger::{round_one_decimal, streak_badge, weekly_average};
use crate::models::{DashboardResponse, DayPoint, Habit, HabitSummary, WEEKDAYS};
use crate::seed;

pub fn build_dashboard(habits: &[Habit]) -> DashboardResponse {
    let summaries = habits.iter().map(summarize).collect();
    let habits_on_track = habits.iter().filter(|habit| habit.current_streak > 0).count();

    let screen_time = seed::screen_time();
    let total_screen_time = round_one_decimal(screen_time.iter().map(|item| item.value).sum());

    let mood = seed::mood();
    let average_mood = round_one_decimal(
        mood.iter().map(|point| point.value).sum::<f64>() / WEEKDAYS.len() as f64,
    );

    DashboardResponse {
        habits: summaries,
        habits_on_track,
        habit_count: habits.len(),
        screen_time,
        total_screen_time,
        mood,
        average_mood,
    }
}

fn summarize(habit: &Habit) -> HabitSummary {
    let badge = streak_badge(habit.current_streak);
    let week = WEEKDAYS
        .into_iter()
        .enumerate()
        .map(|(index, day)| DayPoint {
            day,
            value: habit.history[index],
            met_target: habit.meets_target(index),
        })
        .collect();

    HabitSummary {
        id: habit.id,
        name: habit.name.clone(),
        icon: habit.icon.clone(),
        weekly_average: weekly_average(habit),
        current_streak: habit.current_streak,
        longest_streak: habit.longest_streak,
        badge,
        badge_glyph: badge.glyph(),
        week,
    }
}
