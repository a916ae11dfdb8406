//! Plain-text manuscript export.

use super::gateway::write_atomically;
use super::SnapshotError;
use crate::model::project::Project;
use log::info;
use std::path::Path;

const CHAPTER_RULE_WIDTH: usize = 80;
const EPISODE_RULE_WIDTH: usize = 60;

/// Flattens a project into banner-separated text in tree order.
pub fn render_project_text(project: &Project) -> String {
    let chapter_rule = "=".repeat(CHAPTER_RULE_WIDTH);
    let episode_rule = "-".repeat(EPISODE_RULE_WIDTH);

    let mut out = String::new();
    out.push_str(&project.name);
    out.push('\n');
    out.push_str(&chapter_rule);
    out.push_str("\n\n");

    for chapter in project.tree.chapters() {
        out.push_str(&format!(
            "\n{chapter_rule}\n{}\n{chapter_rule}\n\n",
            chapter.title()
        ));
        for episode in chapter.episodes() {
            out.push_str(&format!(
                "\n{episode_rule}\n{}\n{episode_rule}\n\n",
                episode.title()
            ));
            out.push_str(episode.body());
            out.push_str("\n\n");
        }
    }
    out
}

/// Writes `render_project_text` to `path`.
pub fn export_text(project: &Project, path: &Path) -> Result<(), SnapshotError> {
    let text = render_project_text(project);
    write_atomically(path, text.as_bytes())?;
    info!(
        "event=text_export module=persistence status=ok chapters={} bytes={}",
        project.tree.chapters().len(),
        text.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::render_project_text;
    use crate::model::project::Project;

    #[test]
    fn empty_project_renders_name_and_banner() {
        let text = render_project_text(&Project::new("Untitled"));
        assert_eq!(text, format!("Untitled\n{}\n\n", "=".repeat(80)));
    }
}
