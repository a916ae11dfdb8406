//! Per-project document tree.
//!
//! # Responsibility
//! - Own chapters, episodes, reference notes, version history and cursors.
//! - Provide create/delete/select/commit operations with cursor upkeep.
//! - Serve word-count aggregates from the per-episode cache.
//!
//! # Invariants
//! - `active_chapter` / `active_episode` are `None` or in range.
//! - `active_episode` is only set while `active_chapter` is set.
//! - Cursor moves commit the caller's pending buffer first.
//! - Failed operations leave the tree untouched (validate, then mutate).

use crate::model::document::{Chapter, Character, EditBuffer, Episode, Setting};
use crate::model::error::{ensure_index, DocumentError, DocumentResult, Target};
use crate::model::version::{Version, VersionKind, VersionStore};
use log::debug;

/// Daily goal assigned to new projects.
pub const DEFAULT_WRITING_GOAL: u32 = 2000;

/// One row of the chapter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterSummary {
    pub title: String,
    pub episode_count: usize,
    pub word_total: usize,
}

/// Chapter/episode hierarchy of one project plus its attached notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTree {
    chapters: Vec<Chapter>,
    characters: Vec<Character>,
    settings: Vec<Setting>,
    writing_goal: u32,
    versions: VersionStore,
    active_chapter: Option<usize>,
    active_episode: Option<usize>,
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentTree {
    /// Creates an empty tree with the default writing goal.
    pub fn new() -> Self {
        Self {
            chapters: Vec::new(),
            characters: Vec::new(),
            settings: Vec::new(),
            writing_goal: DEFAULT_WRITING_GOAL,
            versions: VersionStore::new(),
            active_chapter: None,
            active_episode: None,
        }
    }

    /// Rebuilds a tree from stored parts, rejecting dangling cursors.
    pub(crate) fn from_parts(
        chapters: Vec<Chapter>,
        characters: Vec<Character>,
        settings: Vec<Setting>,
        writing_goal: u32,
        versions: VersionStore,
        active_chapter: Option<usize>,
        active_episode: Option<usize>,
    ) -> Result<Self, String> {
        if writing_goal == 0 {
            return Err("writing_goal must be positive".to_string());
        }
        match (active_chapter, active_episode) {
            (None, Some(episode)) => {
                return Err(format!(
                    "current_episode {episode} is set without current_chapter"
                ));
            }
            (Some(chapter), episode) => {
                let Some(target) = chapters.get(chapter) else {
                    return Err(format!(
                        "current_chapter {chapter} out of range (len {})",
                        chapters.len()
                    ));
                };
                if let Some(episode) = episode {
                    if episode >= target.episodes.len() {
                        return Err(format!(
                            "current_episode {episode} out of range (len {})",
                            target.episodes.len()
                        ));
                    }
                }
            }
            (None, None) => {}
        }

        Ok(Self {
            chapters,
            characters,
            settings,
            writing_goal,
            versions,
            active_chapter,
            active_episode,
        })
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn chapter(&self, index: usize) -> Option<&Chapter> {
        self.chapters.get(index)
    }

    pub fn active_chapter(&self) -> Option<usize> {
        self.active_chapter
    }

    pub fn active_episode(&self) -> Option<usize> {
        self.active_episode
    }

    /// Episode under both cursors, if any.
    pub fn current_episode(&self) -> Option<&Episode> {
        let chapter = self.chapters.get(self.active_chapter?)?;
        chapter.episodes.get(self.active_episode?)
    }

    fn current_episode_mut(&mut self) -> Option<&mut Episode> {
        let chapter = self.chapters.get_mut(self.active_chapter?)?;
        chapter.episodes.get_mut(self.active_episode?)
    }

    // -- chapters ---------------------------------------------------------

    /// Appends `"Chapter N"` and returns its index.
    pub fn add_chapter(&mut self) -> usize {
        let index = self.chapters.len();
        self.chapters.push(Chapter::new(format!("Chapter {}", index + 1)));
        debug!("event=chapter_add module=tree status=ok index={index}");
        index
    }

    /// Removes a chapter with its episodes and their version history.
    ///
    /// A cursor on the removed chapter is cleared; a cursor past it shifts
    /// down so it keeps naming the same chapter.
    pub fn delete_chapter(&mut self, index: usize) -> DocumentResult<()> {
        ensure_index(Target::Chapter, index, self.chapters.len())?;

        self.chapters.remove(index);
        let pruned = self.versions.remove_chapter(index);
        match self.active_chapter {
            Some(active) if active == index => {
                self.active_chapter = None;
                self.active_episode = None;
            }
            Some(active) if active > index => self.active_chapter = Some(active - 1),
            _ => {}
        }

        debug!(
            "event=chapter_delete module=tree status=ok index={index} pruned_versions={pruned}"
        );
        Ok(())
    }

    /// Makes `index` the active chapter after flushing `pending`.
    ///
    /// Switching to a different chapter closes the open episode.
    pub fn select_chapter(
        &mut self,
        index: usize,
        pending: Option<&EditBuffer>,
    ) -> DocumentResult<()> {
        ensure_index(Target::Chapter, index, self.chapters.len())?;

        self.commit_pending(pending);
        if self.active_chapter != Some(index) {
            self.active_episode = None;
        }
        self.active_chapter = Some(index);
        Ok(())
    }

    // -- episodes ---------------------------------------------------------

    /// Appends `"<chapter title> - Episode N"` to the active chapter.
    pub fn add_episode(&mut self) -> DocumentResult<usize> {
        let chapter_index = self.active_chapter.ok_or(DocumentError::NoActiveChapter)?;
        let chapter = self
            .chapters
            .get_mut(chapter_index)
            .ok_or(DocumentError::NoActiveChapter)?;

        let index = chapter.episodes.len();
        let title = format!("{} - Episode {}", chapter.title(), index + 1);
        chapter.episodes.push(Episode::new(title));
        debug!("event=episode_add module=tree status=ok chapter={chapter_index} index={index}");
        Ok(index)
    }

    /// Removes an episode of the active chapter with its version history.
    ///
    /// The episode cursor is cleared if it pointed at or past `index`.
    pub fn delete_episode(&mut self, index: usize) -> DocumentResult<()> {
        let chapter_index = self.active_chapter.ok_or(DocumentError::NoActiveChapter)?;
        let chapter = self
            .chapters
            .get_mut(chapter_index)
            .ok_or(DocumentError::NoActiveChapter)?;
        ensure_index(Target::Episode, index, chapter.episodes.len())?;

        chapter.episodes.remove(index);
        let pruned = self.versions.remove_episode(chapter_index, index);
        if matches!(self.active_episode, Some(active) if active >= index) {
            self.active_episode = None;
        }

        debug!(
            "event=episode_delete module=tree status=ok chapter={chapter_index} index={index} pruned_versions={pruned}"
        );
        Ok(())
    }

    /// Opens episode `index` of the active chapter.
    ///
    /// `pending` is committed into the previously open episode before the
    /// cursor moves. Returns the newly opened episode's committed text.
    pub fn load_episode(
        &mut self,
        index: usize,
        pending: Option<&EditBuffer>,
    ) -> DocumentResult<EditBuffer> {
        let chapter_index = self.active_chapter.ok_or(DocumentError::NoActiveChapter)?;
        let len = self
            .chapters
            .get(chapter_index)
            .map(|chapter| chapter.episodes.len())
            .ok_or(DocumentError::NoActiveChapter)?;
        ensure_index(Target::Episode, index, len)?;

        self.commit_pending(pending);
        self.active_episode = Some(index);
        Ok(self.chapters[chapter_index].episodes[index].to_buffer())
    }

    /// Overwrites the open episode's title and body.
    ///
    /// Silently does nothing when no episode is open, so periodic saves never
    /// fail. Returns whether an episode received the edit.
    pub fn commit_episode_edit(
        &mut self,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> bool {
        match self.current_episode_mut() {
            Some(episode) => {
                episode.commit(title, body);
                true
            }
            None => false,
        }
    }

    /// Commits an optional editor buffer into the open episode.
    pub fn commit_pending(&mut self, pending: Option<&EditBuffer>) -> bool {
        match pending {
            Some(buffer) => self.commit_episode_edit(buffer.title.clone(), buffer.body.clone()),
            None => false,
        }
    }

    /// Replaces the memo of episode `index` in the active chapter.
    pub fn set_episode_memo(
        &mut self,
        index: usize,
        memo: impl Into<String>,
    ) -> DocumentResult<()> {
        let chapter_index = self.active_chapter.ok_or(DocumentError::NoActiveChapter)?;
        let chapter = self
            .chapters
            .get_mut(chapter_index)
            .ok_or(DocumentError::NoActiveChapter)?;
        let len = chapter.episodes.len();
        let episode = chapter
            .episodes
            .get_mut(index)
            .ok_or(DocumentError::OutOfRange {
                target: Target::Episode,
                index,
                len,
            })?;
        episode.set_memo(memo);
        Ok(())
    }

    // -- aggregates -------------------------------------------------------

    /// Sum of cached episode counts in one chapter.
    pub fn chapter_word_total(&self, index: usize) -> DocumentResult<usize> {
        self.chapters
            .get(index)
            .map(Chapter::word_total)
            .ok_or(DocumentError::OutOfRange {
                target: Target::Chapter,
                index,
                len: self.chapters.len(),
            })
    }

    /// Sum of all chapter totals.
    pub fn project_word_total(&self) -> usize {
        self.chapters.iter().map(Chapter::word_total).sum()
    }

    pub fn chapter_summaries(&self) -> Vec<ChapterSummary> {
        self.chapters
            .iter()
            .map(|chapter| ChapterSummary {
                title: chapter.title().to_string(),
                episode_count: chapter.episodes.len(),
                word_total: chapter.word_total(),
            })
            .collect()
    }

    pub fn writing_goal(&self) -> u32 {
        self.writing_goal
    }

    pub fn set_goal(&mut self, goal: u32) -> DocumentResult<()> {
        if goal == 0 {
            return Err(DocumentError::InvalidGoal(goal));
        }
        self.writing_goal = goal;
        Ok(())
    }

    // -- reference notes --------------------------------------------------

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn add_character(&mut self, character: Character) -> usize {
        self.characters.push(character);
        self.characters.len() - 1
    }

    pub fn edit_character(&mut self, index: usize, character: Character) -> DocumentResult<()> {
        ensure_index(Target::Character, index, self.characters.len())?;
        self.characters[index] = character;
        Ok(())
    }

    pub fn delete_character(&mut self, index: usize) -> DocumentResult<Character> {
        ensure_index(Target::Character, index, self.characters.len())?;
        Ok(self.characters.remove(index))
    }

    pub fn settings(&self) -> &[Setting] {
        &self.settings
    }

    pub fn add_setting(&mut self, setting: Setting) -> usize {
        self.settings.push(setting);
        self.settings.len() - 1
    }

    pub fn edit_setting(&mut self, index: usize, setting: Setting) -> DocumentResult<()> {
        ensure_index(Target::Setting, index, self.settings.len())?;
        self.settings[index] = setting;
        Ok(())
    }

    pub fn delete_setting(&mut self, index: usize) -> DocumentResult<Setting> {
        ensure_index(Target::Setting, index, self.settings.len())?;
        Ok(self.settings.remove(index))
    }

    // -- versions ---------------------------------------------------------

    pub fn versions(&self) -> &VersionStore {
        &self.versions
    }

    fn cursors(&self) -> DocumentResult<(usize, usize)> {
        let chapter = self.active_chapter.ok_or(DocumentError::NoActiveChapter)?;
        let episode = self.active_episode.ok_or(DocumentError::NoActiveEpisode)?;
        Ok((chapter, episode))
    }

    /// Commits `pending`, then snapshots the open episode's body.
    pub fn snapshot_active_episode(
        &mut self,
        kind: VersionKind,
        pending: Option<&EditBuffer>,
    ) -> DocumentResult<()> {
        let (chapter, episode) = self.cursors()?;
        self.commit_pending(pending);
        let content = self
            .current_episode()
            .map(|current| current.body().to_string())
            .ok_or(DocumentError::NoActiveEpisode)?;
        self.versions.snapshot(chapter, episode, kind, content);
        debug!(
            "event=version_snapshot module=tree status=ok chapter={chapter} episode={episode} kind={}",
            kind.as_str()
        );
        Ok(())
    }

    /// History of the open episode.
    pub fn active_history(&self) -> DocumentResult<&[Version]> {
        let (chapter, episode) = self.cursors()?;
        Ok(self.versions.history(chapter, episode))
    }

    /// Replaces the open episode's body with a stored version.
    ///
    /// The title is kept; the restored text goes through the normal commit
    /// path so the count cache is refreshed. Returns the new buffer.
    pub fn restore_version(&mut self, version_index: usize) -> DocumentResult<EditBuffer> {
        let history = self.active_history()?;
        let content = history
            .get(version_index)
            .map(|version| version.content().to_string())
            .ok_or(DocumentError::OutOfRange {
                target: Target::Version,
                index: version_index,
                len: history.len(),
            })?;
        let title = self
            .current_episode()
            .map(|episode| episode.title().to_string())
            .ok_or(DocumentError::NoActiveEpisode)?;

        self.commit_episode_edit(title.clone(), content.clone());
        Ok(EditBuffer::new(title, content))
    }
}

#[cfg(test)]
mod tests {
    use super::DocumentTree;
    use crate::model::document::Chapter;
    use crate::model::version::VersionStore;

    #[test]
    fn from_parts_rejects_episode_cursor_without_chapter() {
        let err = DocumentTree::from_parts(
            vec![Chapter::new("Chapter 1")],
            Vec::new(),
            Vec::new(),
            2000,
            VersionStore::new(),
            None,
            Some(0),
        )
        .unwrap_err();
        assert!(err.contains("without current_chapter"));
    }

    #[test]
    fn from_parts_rejects_zero_goal() {
        let err = DocumentTree::from_parts(
            Vec::new(),
            Vec::new(),
            Vec::new(),
            0,
            VersionStore::new(),
            None,
            None,
        )
        .unwrap_err();
        assert!(err.contains("writing_goal"));
    }

    #[test]
    fn chapter_titles_follow_position() {
        let mut tree = DocumentTree::new();
        tree.add_chapter();
        tree.add_chapter();
        tree.delete_chapter(0).unwrap();
        let index = tree.add_chapter();
        assert_eq!(tree.chapters()[index].title(), "Chapter 2");
    }
}
