use novelist_core::{DocumentError, ProjectRegistry, Target};

fn registry_with(names: &[&str]) -> ProjectRegistry {
    let mut registry = ProjectRegistry::new();
    for name in names {
        registry.create_project(*name);
    }
    registry
}

#[test]
fn create_project_activates_it() {
    let mut registry = ProjectRegistry::new();
    assert_eq!(registry.active_project(), Err(DocumentError::NoActiveProject));

    assert_eq!(registry.create_project("Harbor"), 0);
    assert_eq!(registry.create_project("Lighthouse"), 1);

    assert_eq!(registry.active_index(), Some(1));
    assert_eq!(registry.active_project().unwrap().name, "Lighthouse");
    assert_eq!(registry.active_tree().unwrap().writing_goal(), 2000);
}

#[test]
fn select_project_validates_index() {
    let mut registry = registry_with(&["a", "b"]);
    registry.select_project(0).unwrap();
    assert_eq!(registry.active_project().unwrap().name, "a");

    assert_eq!(
        registry.select_project(2),
        Err(DocumentError::OutOfRange {
            target: Target::Project,
            index: 2,
            len: 2
        })
    );
    assert_eq!(registry.active_index(), Some(0));
}

#[test]
fn delete_before_active_keeps_selection_on_same_project() {
    let mut registry = registry_with(&["a", "b", "c"]);
    registry.select_project(2).unwrap();

    let removed = registry.delete_project(0).unwrap();

    assert_eq!(removed.name, "a");
    assert_eq!(registry.active_index(), Some(1));
    assert_eq!(registry.active_project().unwrap().name, "c");
}

#[test]
fn delete_active_project_clears_selection() {
    let mut registry = registry_with(&["a", "b"]);
    registry.select_project(1).unwrap();

    registry.delete_project(1).unwrap();

    assert_eq!(registry.active_index(), None);
    assert!(matches!(
        registry.active_tree_mut(),
        Err(DocumentError::NoActiveProject)
    ));
    assert_eq!(registry.len(), 1);
}

#[test]
fn delete_after_active_leaves_selection() {
    let mut registry = registry_with(&["a", "b"]);
    registry.select_project(0).unwrap();
    registry.delete_project(1).unwrap();
    assert_eq!(registry.active_index(), Some(0));
    assert!(registry.delete_project(5).is_err());
}

#[test]
fn rename_changes_only_target() {
    let mut registry = registry_with(&["a", "b"]);
    registry.rename_project(0, "Prologue book").unwrap();
    assert_eq!(registry.project(0).unwrap().name, "Prologue book");
    assert_eq!(registry.project(1).unwrap().name, "b");
    assert!(registry.rename_project(9, "x").is_err());
}

#[test]
fn goal_is_validated_on_creation() {
    let mut registry = ProjectRegistry::new();
    assert_eq!(
        registry.create_project_with_goal("draft", 0),
        Err(DocumentError::InvalidGoal(0))
    );
    assert!(registry.is_empty());
    assert_eq!(registry.active_index(), None);

    let index = registry.create_project_with_goal("draft", 800).unwrap();
    assert_eq!(registry.active_tree().unwrap().writing_goal(), 800);
    assert_eq!(registry.active_index(), Some(index));
}

#[test]
fn structural_edits_go_through_active_tree() {
    let mut registry = registry_with(&["a", "b"]);
    registry.select_project(0).unwrap();
    let tree = registry.active_tree_mut().unwrap();
    let chapter = tree.add_chapter();
    tree.select_chapter(chapter, None).unwrap();
    tree.add_episode().unwrap();

    assert_eq!(registry.project(0).unwrap().tree.chapters().len(), 1);
    assert!(registry.project(1).unwrap().tree.chapters().is_empty());
}
