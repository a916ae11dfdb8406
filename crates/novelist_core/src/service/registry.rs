//! Project registry use-case service.
//!
//! # Responsibility
//! - Own the ordered project list and the active-project index.
//! - Hand out the active project's tree for structural operations.
//!
//! # Invariants
//! - `active` is `None` or `< projects.len()`.
//! - Deleting a project before the active one shifts the index so it keeps
//!   naming the same project.

use crate::model::error::{ensure_index, DocumentError, DocumentResult, Target};
use crate::model::project::Project;
use crate::model::tree::DocumentTree;
use log::info;

/// All open projects plus the current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectRegistry {
    projects: Vec<Project>,
    active: Option<usize>,
}

impl ProjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a registry from stored parts, rejecting a dangling index.
    pub(crate) fn from_parts(
        projects: Vec<Project>,
        active: Option<usize>,
    ) -> Result<Self, String> {
        if let Some(index) = active {
            if index >= projects.len() {
                return Err(format!(
                    "current_project_idx {index} out of range (len {})",
                    projects.len()
                ));
            }
        }
        Ok(Self { projects, active })
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, index: usize) -> Option<&Project> {
        self.projects.get(index)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Appends a project, makes it active, and returns its index.
    pub fn create_project(&mut self, name: impl Into<String>) -> usize {
        self.projects.push(Project::new(name));
        let index = self.projects.len() - 1;
        self.active = Some(index);
        info!("event=project_create module=registry status=ok index={index}");
        index
    }

    /// Like `create_project`, with a custom daily goal.
    pub fn create_project_with_goal(
        &mut self,
        name: impl Into<String>,
        goal: u32,
    ) -> DocumentResult<usize> {
        let mut project = Project::new(name);
        project.tree.set_goal(goal)?;
        self.projects.push(project);
        let index = self.projects.len() - 1;
        self.active = Some(index);
        info!("event=project_create module=registry status=ok index={index} goal={goal}");
        Ok(index)
    }

    pub fn select_project(&mut self, index: usize) -> DocumentResult<()> {
        ensure_index(Target::Project, index, self.projects.len())?;
        self.active = Some(index);
        Ok(())
    }

    /// Removes a project and returns it.
    pub fn delete_project(&mut self, index: usize) -> DocumentResult<Project> {
        ensure_index(Target::Project, index, self.projects.len())?;

        let removed = self.projects.remove(index);
        match self.active {
            Some(active) if active == index => self.active = None,
            Some(active) if active > index => self.active = Some(active - 1),
            _ => {}
        }
        info!("event=project_delete module=registry status=ok index={index}");
        Ok(removed)
    }

    pub fn rename_project(&mut self, index: usize, name: impl Into<String>) -> DocumentResult<()> {
        let len = self.projects.len();
        let project = self.projects.get_mut(index).ok_or(DocumentError::OutOfRange {
            target: Target::Project,
            index,
            len,
        })?;
        project.name = name.into();
        Ok(())
    }

    /// Active project, resolved from the index on every call.
    pub fn active_project(&self) -> DocumentResult<&Project> {
        self.active
            .and_then(|index| self.projects.get(index))
            .ok_or(DocumentError::NoActiveProject)
    }

    pub fn active_project_mut(&mut self) -> DocumentResult<&mut Project> {
        self.active
            .and_then(|index| self.projects.get_mut(index))
            .ok_or(DocumentError::NoActiveProject)
    }

    /// Active project's tree for structural operations.
    pub fn active_tree(&self) -> DocumentResult<&DocumentTree> {
        self.active_project().map(|project| &project.tree)
    }

    pub fn active_tree_mut(&mut self) -> DocumentResult<&mut DocumentTree> {
        self.active_project_mut().map(|project| &mut project.tree)
    }
}

#[cfg(test)]
mod tests {
    use super::ProjectRegistry;

    #[test]
    fn from_parts_rejects_out_of_range_selection() {
        let err = ProjectRegistry::from_parts(Vec::new(), Some(0)).unwrap_err();
        assert!(err.contains("current_project_idx"));
    }
}
