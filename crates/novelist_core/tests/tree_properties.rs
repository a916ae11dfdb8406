use novelist_core::{DocumentResult, DocumentTree, EditBuffer};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    AddChapter,
    DeleteChapter(usize),
    SelectChapter(usize),
    AddEpisode,
    DeleteEpisode(usize),
    LoadEpisode(usize),
    LoadWithPending(usize, String),
    Commit(String),
}

fn body_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[ \n\ta-zあ-ん山川、。]{0,16}")
        .unwrap_or_else(|e| panic!("regex failed: {e}"))
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let index = 0usize..5;
    prop_oneof![
        2 => Just(Op::AddChapter),
        1 => index.clone().prop_map(Op::DeleteChapter),
        2 => index.clone().prop_map(Op::SelectChapter),
        3 => Just(Op::AddEpisode),
        1 => index.clone().prop_map(Op::DeleteEpisode),
        2 => index.clone().prop_map(Op::LoadEpisode),
        2 => (index, body_strategy()).prop_map(|(i, body)| Op::LoadWithPending(i, body)),
        3 => body_strategy().prop_map(Op::Commit),
    ]
}

fn apply(tree: &mut DocumentTree, op: &Op) -> DocumentResult<()> {
    match op {
        Op::AddChapter => {
            tree.add_chapter();
            Ok(())
        }
        Op::DeleteChapter(index) => tree.delete_chapter(*index),
        Op::SelectChapter(index) => tree.select_chapter(*index, None),
        Op::AddEpisode => tree.add_episode().map(|_| ()),
        Op::DeleteEpisode(index) => tree.delete_episode(*index),
        Op::LoadEpisode(index) => tree.load_episode(*index, None).map(|_| ()),
        Op::LoadWithPending(index, body) => {
            let pending = EditBuffer::new("pending", body.clone());
            tree.load_episode(*index, Some(&pending)).map(|_| ())
        }
        Op::Commit(body) => {
            tree.commit_episode_edit("edited", body.clone());
            Ok(())
        }
    }
}

fn trimmed_total(tree: &DocumentTree) -> usize {
    tree.chapters()
        .iter()
        .flat_map(|chapter| chapter.episodes())
        .map(|episode| episode.body().trim().chars().count())
        .sum()
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn edit_sequences_keep_cursors_and_totals_consistent(
        ops in prop::collection::vec(op_strategy(), 0..60)
    ) {
        let mut tree = DocumentTree::new();
        for op in &ops {
            let before = tree.clone();
            let outcome = apply(&mut tree, op);
            if outcome.is_err() {
                prop_assert_eq!(&tree, &before);
            }

            match tree.active_chapter() {
                Some(chapter) => {
                    prop_assert!(chapter < tree.chapters().len());
                    if let Some(episode) = tree.active_episode() {
                        prop_assert!(episode < tree.chapters()[chapter].episodes().len());
                    }
                }
                None => {
                    prop_assert_eq!(tree.active_episode(), None);
                }
            }

            prop_assert_eq!(tree.project_word_total(), trimmed_total(&tree));
            for (index, chapter) in tree.chapters().iter().enumerate() {
                let expected: usize = chapter
                    .episodes()
                    .iter()
                    .map(|episode| episode.body().trim().chars().count())
                    .sum();
                prop_assert_eq!(tree.chapter_word_total(index), Ok(expected));
            }
        }
    }
}
