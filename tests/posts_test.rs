use bbs_content::{
    content_store::pluggables::ContentStore,
    pipeline::{ErrorKind, Missing, PipelineError},
    types::{
        crypto_primitives::Keypair,
        data_types::{Reference, Timestamp},
        objects::Post,
    },
    verifier::{self, SignatureError},
};
use log::LevelFilter;

mod common;

use crate::common::{fixtures::TestBoard, logging::setup_logger};

#[test]
fn create_and_list_posts_test() {
    setup_logger(LevelFilter::Trace);

    // 1. Create a thread with two replies from different authors.
    let test_board = TestBoard::new();
    let alice = Keypair::generate();
    let bob = Keypair::generate();
    let thread = test_board.create_thread("Topic", &alice).unwrap();
    let before = Timestamp::now();
    let first = test_board
        .create_post(&thread.thread_ref, "Reply 1", &bob)
        .unwrap();
    let second = test_board
        .create_post(&thread.thread_ref, "Reply 2", &alice)
        .unwrap();

    // 2. The posts are listed in order, each correctly signed by its author.
    let posts = test_board
        .forum
        .list_posts(&test_board.board, &thread.thread_ref)
        .unwrap();
    assert_eq!(posts, vec![first.clone(), second.clone()]);
    assert_eq!(posts[0].post.author, bob.public_bytes());
    assert_eq!(posts[1].post.author, alice.public_bytes());
    for entry in &posts {
        assert!(verifier::verify(&entry.post).is_ok());
        assert!(entry.post.created >= before);
    }

    // 3. Posting republished the thread's page but the thread itself keeps its reference.
    let view = test_board.forum.board_view(&test_board.board).unwrap();
    assert!(view.is_aligned());
    let entry = &view.threads()[0];
    assert_eq!(entry.thread_ref, thread.thread_ref);
    assert_ne!(entry.thread_page_ref, thread.thread_page_ref);
    assert_eq!(entry.thread_page.posts, vec![first.post_ref, second.post_ref]);
}

#[test]
fn posting_keeps_thread_order_test() {
    setup_logger(LevelFilter::Trace);

    let test_board = TestBoard::new();
    let author = Keypair::generate();
    test_board.create_thread("A", &author).unwrap();
    let b = test_board.create_thread("B", &author).unwrap();
    test_board.create_thread("C", &author).unwrap();

    test_board
        .create_post(&b.thread_ref, "Bump", &author)
        .unwrap();

    assert_eq!(test_board.thread_titles(), vec!["A", "B", "C"]);
}

#[test]
fn delete_post_test() {
    setup_logger(LevelFilter::Trace);

    let test_board = TestBoard::new();
    let author = Keypair::generate();
    let thread = test_board.create_thread("Topic", &author).unwrap();
    let posts: Vec<_> = ["1", "2", "3"]
        .iter()
        .map(|title| {
            test_board
                .create_post(&thread.thread_ref, title, &author)
                .unwrap()
        })
        .collect();

    test_board
        .forum
        .delete_post(
            &test_board.board,
            test_board.board_keypair.signing_key(),
            &thread.thread_ref,
            &posts[1].post_ref,
        )
        .unwrap();

    // 1. The remaining posts keep their order and the deleted post is the thread page's tombstone.
    let remaining = test_board
        .forum
        .list_posts(&test_board.board, &thread.thread_ref)
        .unwrap();
    assert_eq!(remaining, vec![posts[0].clone(), posts[2].clone()]);
    let view = test_board.forum.board_view(&test_board.board).unwrap();
    assert_eq!(view.threads()[0].thread_page.deleted, Some(posts[1].post_ref));

    // 2. The deleted post is still in the store.
    assert_eq!(
        test_board
            .store()
            .resolve::<Post>(&posts[1].post_ref)
            .unwrap(),
        Some(posts[1].post.clone())
    );

    // 3. Deleting it again fails and names the post, thread and board.
    let err = test_board
        .forum
        .delete_post(
            &test_board.board,
            test_board.board_keypair.signing_key(),
            &thread.thread_ref,
            &posts[1].post_ref,
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(matches!(
        err,
        PipelineError::NotFound(Missing::PostInThread { board, thread: missing_thread, post })
            if board == test_board.board && missing_thread == thread.thread_ref && post == posts[1].post_ref
    ));
}

#[test]
fn post_to_unknown_thread_test() {
    setup_logger(LevelFilter::Trace);

    let test_board = TestBoard::new();
    let author = Keypair::generate();
    test_board.create_thread("Topic", &author).unwrap();
    let puts = test_board.store().puts();

    let unknown = Reference::new([1u8; 32]);
    let err = test_board
        .create_post(&unknown, "Lost", &author)
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::NotFound(Missing::ThreadInBoard { thread, .. }) if thread == unknown
    ));

    let err = test_board
        .forum
        .list_posts(&test_board.board, &unknown)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(test_board.store().puts(), puts);
}

#[test]
fn post_with_mismatched_key_is_rejected_test() {
    setup_logger(LevelFilter::Trace);

    let test_board = TestBoard::new();
    let author = Keypair::generate();
    let thread = test_board.create_thread("Topic", &author).unwrap();
    let root = test_board.root();
    let puts = test_board.store().puts();

    let err = test_board
        .forum
        .create_post(
            &test_board.board,
            test_board.board_keypair.signing_key(),
            &thread.thread_ref,
            String::from("Reply"),
            String::from("Signed by somebody else."),
            &author.public(),
            Keypair::generate().signing_key(),
        )
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Signature(SignatureError::Invalid { author: claimed }) if claimed == author.public_bytes()
    ));
    assert_eq!(test_board.root(), root);
    assert_eq!(test_board.store().puts(), puts);
    assert!(test_board
        .forum
        .list_posts(&test_board.board, &thread.thread_ref)
        .unwrap()
        .is_empty());
}
