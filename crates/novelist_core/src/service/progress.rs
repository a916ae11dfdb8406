//! Writing-progress projections.
//!
//! Everything here reads the cached episode counts; no body text is
//! rescanned.

use crate::model::project::Project;
use crate::model::tree::ChapterSummary;
use std::fmt::{Display, Formatter};

/// Progress panel data for one project.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressReport {
    pub project_name: String,
    pub total_characters: usize,
    pub goal: u32,
    /// Completion in percent, clamped to 100.
    pub percent: f64,
    pub chapters: Vec<ChapterSummary>,
}

/// Completion of `count` against `goal`, clamped to `[0, 100]`.
pub fn goal_progress(count: usize, goal: u32) -> f64 {
    let goal = f64::from(goal.max(1));
    (count as f64 / goal * 100.0).min(100.0)
}

pub fn progress_report(project: &Project) -> ProgressReport {
    let total_characters = project.tree.project_word_total();
    let goal = project.tree.writing_goal();
    ProgressReport {
        project_name: project.name.clone(),
        total_characters,
        goal,
        percent: goal_progress(total_characters, goal),
        chapters: project.tree.chapter_summaries(),
    }
}

impl Display for ProgressReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Project: {}", self.project_name)?;
        writeln!(f, "Total: {} characters", self.total_characters)?;
        writeln!(f, "Daily goal: {} characters", self.goal)?;
        writeln!(f, "Progress: {:.1}%", self.percent)?;
        for chapter in &self.chapters {
            writeln!(f)?;
            writeln!(f, "{}", chapter.title)?;
            writeln!(f, "  characters: {}", chapter.word_total)?;
            writeln!(f, "  episodes: {}", chapter.episode_count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{goal_progress, progress_report};
    use crate::model::project::Project;

    #[test]
    fn goal_progress_is_clamped() {
        assert_eq!(goal_progress(500, 2000), 25.0);
        assert_eq!(goal_progress(5000, 2000), 100.0);
        assert_eq!(goal_progress(0, 2000), 0.0);
    }

    #[test]
    fn report_sums_cached_counts() {
        let mut project = Project::new("Saga");
        let chapter = project.tree.add_chapter();
        project.tree.select_chapter(chapter, None).unwrap();
        let episode = project.tree.add_episode().unwrap();
        project.tree.load_episode(episode, None).unwrap();
        project.tree.commit_episode_edit("Opening", "一二三四");

        let report = progress_report(&project);
        assert_eq!(report.total_characters, 4);
        assert_eq!(report.chapters[0].episode_count, 1);
        assert_eq!(report.chapters[0].word_total, 4);
        assert!(report.to_string().contains("Progress: 0.2%"));
    }
}
