use bbs_content::{
    content_store::pluggables::ContentStore,
    pipeline::{ErrorKind, Missing, PipelineError},
    types::{
        crypto_primitives::Keypair,
        data_types::Reference,
        objects::{BoardPage, Thread, ThreadPage},
    },
};
use log::LevelFilter;

mod common;

use crate::common::{fixtures::TestBoard, logging::setup_logger};

#[test]
fn delete_thread_preserves_order_test() {
    setup_logger(LevelFilter::Trace);

    // 1. Create threads A, B and C in that order.
    let test_board = TestBoard::new();
    let author = Keypair::generate();
    let a = test_board.create_thread("A", &author).unwrap();
    let b = test_board.create_thread("B", &author).unwrap();
    let c = test_board.create_thread("C", &author).unwrap();

    // 2. Delete B.
    test_board
        .forum
        .delete_thread(
            &test_board.board,
            test_board.board_keypair.signing_key(),
            &b.thread_ref,
        )
        .unwrap();

    // 3. A and C remain, in their original order, and the board page lists exactly their pages.
    assert_eq!(test_board.thread_titles(), vec!["A", "C"]);
    let view = test_board.forum.board_view(&test_board.board).unwrap();
    assert!(view.is_aligned());
    assert_eq!(
        view.board_page.thread_pages,
        vec![a.thread_page_ref, c.thread_page_ref]
    );
    assert_eq!(view.position(&a.thread_ref), Some(0));
    assert_eq!(view.position(&b.thread_ref), None);
    assert_eq!(view.position(&c.thread_ref), Some(1));

    // 4. The removed thread page is recorded as the tombstone.
    assert_eq!(view.board_page.deleted, Some(b.thread_page_ref));

    // 5. Deleted content is unreachable from the root but still resolvable by reference.
    let store = test_board.store();
    assert_eq!(
        store.resolve::<Thread>(&b.thread_ref).unwrap(),
        Some(b.thread.clone())
    );
    assert_eq!(
        store.resolve::<ThreadPage>(&b.thread_page_ref).unwrap(),
        Some(b.thread_page.clone())
    );
}

#[test]
fn delete_unknown_thread_test() {
    setup_logger(LevelFilter::Trace);

    let test_board = TestBoard::new();
    let author = Keypair::generate();
    test_board.create_thread("A", &author).unwrap();
    let root = test_board.root();
    let puts = test_board.store().puts();
    let publishes = test_board.store().publishes();

    let unknown = Reference::new([42u8; 32]);
    let err = test_board
        .forum
        .delete_thread(
            &test_board.board,
            test_board.board_keypair.signing_key(),
            &unknown,
        )
        .unwrap_err();

    // 1. The error names the missing thread and the board it was looked for in.
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(matches!(
        &err,
        PipelineError::NotFound(Missing::ThreadInBoard { board, thread })
            if *board == test_board.board && *thread == unknown
    ));
    let message = err.to_string();
    assert!(message.contains(&unknown.to_string()));
    assert!(message.contains(&test_board.board.to_string()));

    // 2. Nothing was written.
    assert_eq!(test_board.root(), root);
    assert_eq!(test_board.store().puts(), puts);
    assert_eq!(test_board.store().publishes(), publishes);
}

#[test]
fn delete_by_thread_page_reference_is_not_found_test() {
    setup_logger(LevelFilter::Trace);

    let test_board = TestBoard::new();
    let entry = test_board.create_thread("A", &Keypair::generate()).unwrap();

    // Threads are identified by the reference of their content, not of their page.
    let err = test_board
        .forum
        .delete_thread(
            &test_board.board,
            test_board.board_keypair.signing_key(),
            &entry.thread_page_ref,
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(test_board.thread_titles(), vec!["A"]);
}

#[test]
fn only_latest_deletion_is_remembered_test() {
    setup_logger(LevelFilter::Trace);

    let test_board = TestBoard::new();
    let author = Keypair::generate();
    let a = test_board.create_thread("A", &author).unwrap();
    let b = test_board.create_thread("B", &author).unwrap();
    let c = test_board.create_thread("C", &author).unwrap();

    let delete = |thread: &Reference| {
        test_board
            .forum
            .delete_thread(
                &test_board.board,
                test_board.board_keypair.signing_key(),
                thread,
            )
            .unwrap()
    };

    delete(&a.thread_ref);
    let first_root = test_board.root();
    delete(&c.thread_ref);

    // 1. The current board page only remembers the second deletion.
    let view = test_board.forum.board_view(&test_board.board).unwrap();
    assert_eq!(view.board_page.deleted, Some(c.thread_page_ref));
    assert_eq!(view.board_page.thread_pages, vec![b.thread_page_ref]);

    // 2. The first deletion is still recorded by the board page it produced.
    let first_page = test_board
        .store()
        .resolve::<BoardPage>(&first_root)
        .unwrap()
        .unwrap();
    assert_eq!(first_page.deleted, Some(a.thread_page_ref));
}

#[test]
fn delete_every_thread_test() {
    setup_logger(LevelFilter::Trace);

    let test_board = TestBoard::new();
    let author = Keypair::generate();
    let entries: Vec<_> = ["A", "B"]
        .iter()
        .map(|title| test_board.create_thread(title, &author).unwrap())
        .collect();

    for entry in entries.iter().rev() {
        test_board
            .forum
            .delete_thread(
                &test_board.board,
                test_board.board_keypair.signing_key(),
                &entry.thread_ref,
            )
            .unwrap();
    }

    let view = test_board.forum.board_view(&test_board.board).unwrap();
    assert!(view.threads().is_empty());
    assert!(view.board_page.thread_pages.is_empty());
    assert_eq!(view.board_page.deleted, Some(entries[0].thread_page_ref));

    // A deleted thread cannot be deleted twice.
    let err = test_board
        .forum
        .delete_thread(
            &test_board.board,
            test_board.board_keypair.signing_key(),
            &entries[0].thread_ref,
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
