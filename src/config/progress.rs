//! Quiz history and difficulty suggestions

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Config;
use crate::quiz::{CompletionReason, Difficulty, ScoreSummary};

/// Number of recent attempts considered for difficulty suggestions
const RECENT_ATTEMPTS: usize = 5;

/// Average percentage below which a topic counts as weak
const WEAK_THRESHOLD: u32 = 70;

/// One finished quiz
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    /// Score as a rounded percentage
    pub percentage: u32,

    /// Number of correct answers
    pub correct: usize,

    /// Number of questions
    pub total: usize,

    /// Difficulty the quiz was generated at
    #[serde(default)]
    pub difficulty: Difficulty,

    /// Whether the countdown ended the quiz
    #[serde(default)]
    pub timed_out: bool,

    /// When the quiz was finished
    pub completed_at: DateTime<Utc>,
}

/// History for one topic
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopicProgress {
    /// Topic label
    pub topic: String,

    /// Attempts, oldest first
    pub attempts: Vec<Attempt>,
}

impl TopicProgress {
    /// Average of the last `n` attempts
    pub fn recent_average(&self, n: usize) -> Option<f32> {
        let recent: Vec<_> = self.attempts.iter().rev().take(n).collect();
        if recent.is_empty() {
            return None;
        }
        let sum: u32 = recent.iter().map(|a| a.percentage).sum();
        Some(sum as f32 / recent.len() as f32)
    }

    /// Best percentage so far
    pub fn best(&self) -> Option<u32> {
        self.attempts.iter().map(|a| a.percentage).max()
    }
}

/// All recorded quiz history
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Progress {
    /// History per topic (key is the lowercased topic)
    pub topics: HashMap<String, TopicProgress>,
}

impl Progress {
    /// Load progress from disk
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::progress_path()?)
    }

    /// Load progress from a specific file, empty if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read progress from {:?}", path))?;
            serde_json::from_str(&contents).with_context(|| "Failed to parse progress.json")
        } else {
            Ok(Self::default())
        }
    }

    /// Save progress to disk
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::progress_path()?)
    }

    /// Save progress to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {:?}", parent))?;
        }

        let contents =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize progress")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write progress to {:?}", path))?;

        Ok(())
    }

    /// Get progress path
    pub fn progress_path() -> Result<PathBuf> {
        Ok(Config::data_dir()?.join("progress.json"))
    }

    fn key(topic: &str) -> String {
        topic.trim().to_lowercase()
    }

    /// Get or create topic progress
    pub fn topic_mut(&mut self, topic: &str) -> &mut TopicProgress {
        self.topics
            .entry(Self::key(topic))
            .or_insert_with(|| TopicProgress { topic: topic.trim().to_string(), ..Default::default() })
    }

    /// Get topic progress (if any)
    pub fn topic(&self, topic: &str) -> Option<&TopicProgress> {
        self.topics.get(&Self::key(topic))
    }

    /// Record a finished quiz
    pub fn record(
        &mut self,
        summary: &ScoreSummary,
        difficulty: Difficulty,
        reason: CompletionReason,
        completed_at: DateTime<Utc>,
    ) {
        let attempt = Attempt {
            percentage: summary.percentage,
            correct: summary.correct_count,
            total: summary.total,
            difficulty,
            timed_out: reason == CompletionReason::TimeExpired,
            completed_at,
        };
        self.topic_mut(&summary.topic).attempts.push(attempt);
    }

    /// Difficulty to request next for a topic, based on recent scores
    pub fn suggested_difficulty(&self, topic: &str) -> Difficulty {
        match self.topic(topic).and_then(|t| t.recent_average(RECENT_ATTEMPTS)) {
            None => Difficulty::Medium,
            Some(avg) if avg >= 80.0 => Difficulty::Hard,
            Some(avg) if avg >= 60.0 => Difficulty::Medium,
            Some(_) => Difficulty::Easy,
        }
    }

    /// Topics whose recent average is below the weak threshold, weakest first
    pub fn weak_areas(&self) -> Vec<(String, u32)> {
        let mut weak: Vec<(String, u32)> = self
            .topics
            .values()
            .filter_map(|t| {
                let avg = t.recent_average(RECENT_ATTEMPTS)?.round() as u32;
                (avg < WEAK_THRESHOLD).then(|| (t.topic.clone(), avg))
            })
            .collect();

        weak.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        weak
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::scoring::percentage;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn summary(topic: &str, correct: usize, total: usize) -> ScoreSummary {
        ScoreSummary {
            topic: topic.to_string(),
            correct_count: correct,
            total,
            percentage: percentage(correct, total),
            per_question: vec![],
        }
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn default_progress_is_empty() {
        let progress = Progress::default();
        assert!(progress.topics.is_empty());
        assert_eq!(progress.suggested_difficulty("anything"), Difficulty::Medium);
    }

    #[test]
    fn record_groups_topics_case_insensitively() {
        let mut progress = Progress::default();
        progress.record(&summary("Rust", 3, 4), Difficulty::Easy, CompletionReason::Finished, at(1));
        progress.record(&summary("rust ", 1, 4), Difficulty::Easy, CompletionReason::TimeExpired, at(2));

        let topic = progress.topic("RUST").unwrap();
        assert_eq!(topic.topic, "Rust");
        assert_eq!(topic.attempts.len(), 2);
        assert!(topic.attempts[1].timed_out);
        assert_eq!(topic.best(), Some(75));
    }

    #[test]
    fn suggested_difficulty_follows_recent_average() {
        let mut progress = Progress::default();
        for day in 1..=3 {
            progress.record(&summary("Maths", 9, 10), Difficulty::Medium, CompletionReason::Finished, at(day));
        }
        assert_eq!(progress.suggested_difficulty("maths"), Difficulty::Hard);

        for day in 4..=8 {
            progress.record(&summary("Maths", 2, 10), Difficulty::Hard, CompletionReason::Finished, at(day));
        }
        assert_eq!(progress.suggested_difficulty("maths"), Difficulty::Easy);

        progress.record(&summary("History", 7, 10), Difficulty::Medium, CompletionReason::Finished, at(9));
        assert_eq!(progress.suggested_difficulty("history"), Difficulty::Medium);
    }

    #[test]
    fn weak_areas_identifies_low_scores() {
        let mut progress = Progress::default();
        progress.record(&summary("Biology", 1, 2), Difficulty::Medium, CompletionReason::Finished, at(1));
        progress.record(&summary("Physics", 9, 10), Difficulty::Medium, CompletionReason::Finished, at(1));

        let weak = progress.weak_areas();
        assert_eq!(weak, vec![("Biology".to_string(), 50)]);
    }

    #[test]
    fn progress_round_trips_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("progress.json");

        assert!(Progress::load_from(&path).unwrap().topics.is_empty());

        let mut progress = Progress::default();
        progress.record(&summary("Art", 2, 3), Difficulty::Hard, CompletionReason::Finished, at(5));
        progress.save_to(&path).unwrap();

        let loaded = Progress::load_from(&path).unwrap();
        let attempt = &loaded.topic("art").unwrap().attempts[0];
        assert_eq!(attempt.percentage, 67);
        assert_eq!(attempt.difficulty, Difficulty::Hard);
        assert_eq!(attempt.completed_at, at(5));
    }
}
