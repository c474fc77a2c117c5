use bbs_content::{
    content_store::pluggables::ContentStore,
    forum::{Configuration, Forum},
    pipeline::{PipelineError, PostEntry, ThreadEntry},
    types::{
        crypto_primitives::Keypair,
        data_types::{PublicKeyBytes, Reference},
    },
};

use crate::common::recording_store::RecordingStore;

/// Configuration used by every test forum: default limits, events logged.
pub(crate) fn configuration() -> Configuration {
    Configuration::builder().log_events(true).build()
}

/// A forum over a fresh [`RecordingStore`], with one empty board already created.
pub(crate) struct TestBoard {
    pub(crate) forum: Forum<RecordingStore>,
    pub(crate) board_keypair: Keypair,
    pub(crate) board: PublicKeyBytes,
}

impl TestBoard {
    pub(crate) fn new() -> TestBoard {
        TestBoard::with_forum(Forum::new(RecordingStore::new(), configuration()))
    }

    /// Create a board in `forum`, which is assumed to be empty.
    pub(crate) fn with_forum(forum: Forum<RecordingStore>) -> TestBoard {
        let board_keypair = Keypair::generate();
        forum
            .create_board(
                &board_keypair,
                String::from("General"),
                String::from("Anything goes."),
                vec![String::from("tcp://127.0.0.1:9000")],
            )
            .unwrap();

        TestBoard {
            board: board_keypair.public_bytes(),
            forum,
            board_keypair,
        }
    }

    pub(crate) fn store(&self) -> &RecordingStore {
        self.forum.store()
    }

    pub(crate) fn root(&self) -> Reference {
        self.store().root(&self.board).unwrap().unwrap()
    }

    /// Create a thread authored (and correctly signed) by `author`.
    pub(crate) fn create_thread(
        &self,
        title: &str,
        author: &Keypair,
    ) -> Result<ThreadEntry, PipelineError> {
        self.forum.create_thread(
            &self.board,
            self.board_keypair.signing_key(),
            String::from(title),
            format!("Opening post of {}.", title),
            &author.public(),
            author.signing_key(),
        )
    }

    /// Create a post authored (and correctly signed) by `author`.
    pub(crate) fn create_post(
        &self,
        thread: &Reference,
        title: &str,
        author: &Keypair,
    ) -> Result<PostEntry, PipelineError> {
        self.forum.create_post(
            &self.board,
            self.board_keypair.signing_key(),
            thread,
            String::from(title),
            format!("Body of {}.", title),
            &author.public(),
            author.signing_key(),
        )
    }

    pub(crate) fn thread_titles(&self) -> Vec<String> {
        self.forum
            .list_threads(&self.board)
            .unwrap()
            .into_iter()
            .map(|thread| thread.post.title)
            .collect()
    }
}
