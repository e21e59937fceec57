use crate::ids::IdGenerator;
use crate::models::{CreateHabitRequest, Habit, HabitSnapshot, StreakTier};
use std::fmt;

pub const DAYS_PER_WEEK: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    EmptyName,
    DayOutOfRange(usize),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::EmptyName => f.write_str("Please enter a habit name"),
            LedgerError::DayOutOfRange(day) => {
                write!(f, "day index {day} is outside 0..={}", DAYS_PER_WEEK - 1)
            }
        }
    }
}

impl std::error::Error for LedgerError {}

/// Owns the tracked habits and their week of completion values.
#[derive(Debug, Default)]
pub struct HabitLedger {
    habits: Vec<Habit>,
    ids: IdGenerator,
}

impl HabitLedger {
    pub fn new(habits: Vec<Habit>) -> Self {
        let mut ids = IdGenerator::new();
        for habit in &habits {
            ids.observe(habit.id);
        }
        Self { habits, ids }
    }

    pub fn list(&self) -> &[Habit] {
        &self.habits
    }

    pub fn get(&self, id: u64) -> Option<&Habit> {
        self.habits.iter().find(|habit| habit.id == id)
    }

    pub fn snapshot(&self, id: u64) -> Option<HabitSnapshot> {
        self.get(id).map(Habit::snapshot)
    }

    pub fn create_habit(&mut self, draft: CreateHabitRequest) -> Result<Habit, LedgerError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(LedgerError::EmptyName);
        }

        let habit = Habit {
            id: self.ids.next(),
            name: name.to_string(),
            icon: draft.icon,
            category: draft.category,
            target: draft.target,
            unit: draft.unit,
            current_streak: 0,
            longest_streak: 0,
            history: [0.0; DAYS_PER_WEEK],
            color: draft.color,
        };
        self.habits.push(habit.clone());
        Ok(habit)
    }

    /// Flips one day between "done" (exactly the target) and zero, then
    /// rescans the streaks. An unknown habit id changes nothing and yields
    /// `Ok(None)`.
    pub fn toggle_day(&mut self, habit_id: u64, day: usize) -> Result<Option<&Habit>, LedgerError> {
        if day >= DAYS_PER_WEEK {
            return Err(LedgerError::DayOutOfRange(day));
        }
        let Some(habit) = self.habits.iter_mut().find(|habit| habit.id == habit_id) else {
            return Ok(None);
        };

        habit.history[day] = if habit.history[day] >= habit.target {
            0.0
        } else {
            habit.target
        };
        habit.current_streak = current_streak(&habit.history, habit.target);
        habit.longest_streak = habit.longest_streak.max(habit.current_streak);

        Ok(Some(habit))
    }
}

/// Consecutive days meeting the target, counted back from Sunday.
pub fn current_streak(history: &[f64; DAYS_PER_WEEK], target: f64) -> u32 {
    history
        .iter()
        .rev()
        .take_while(|value| **value >= target)
        .count() as u32
}

/// Mean over all seven days, rounded to one decimal. Missed days count as zero.
pub fn weekly_average(habit: &Habit) -> f64 {
    round_one_decimal(habit.history.iter().sum::<f64>() / DAYS_PER_WEEK as f64)
}

pub fn streak_badge(streak: u32) -> StreakTier {
    if streak >= 7 {
        StreakTier::High
    } else if streak >= 3 {
        StreakTier::Medium
    } else {
        StreakTier::Low
    }
}

impl StreakTier {
    pub fn glyph(&self) -> &'static str {
        match self {
            StreakTier::High => "🔥",
            StreakTier::Medium => "✨",
            StreakTier::Low => "📊",
        }
    }
}

pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
