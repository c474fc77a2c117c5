/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The content transaction pipeline.
//!
//! Every operation on a board is a read-modify-write over the board's page hierarchy:
//!
//! 1. **Resolve** the current hierarchy from the content store, top-down: the board page published
//!    at the board's root, then the board, then every thread page, then every thread.
//! 2. **Mutate** the resolved [`BoardView`] in memory.
//! 3. **Save** every changed object bottom-up (posts and threads, then thread pages, then the board
//!    page), and finally publish the new board page as the board's root.
//!
//! Saving bottom-up guarantees that no page is ever persisted before the children it points to.
//!
//! # Stages and short-circuiting
//!
//! Each stage is a method on [`Transaction`](stages::Transaction) that takes the previous stage's
//! output and returns either the next state or a [`PipelineError`]. Operations compose stages with
//! `?`, so the first error ends the operation and is returned to the caller as-is. Nothing written
//! by stages that completed before the error is rolled back: those objects are content-addressed and
//! unreachable from the (unchanged) root, so they are harmless.
//!
//! # Concurrency
//!
//! A transaction is a single synchronous sequence of store calls. Two transactions racing on the same
//! board may both resolve the same starting board page; whichever publishes its root last wins, and
//! the other's changes are no longer reachable from the root.

use std::fmt::{self, Display, Formatter};

use crate::{
    content_store::pluggables::StoreError,
    types::{
        data_types::{PublicKeyBytes, Reference},
        objects::{Board, BoardPage, Post, Thread, ThreadPage},
    },
    verifier::SignatureError,
};

pub mod stages;

pub mod operations;

/// The in-memory reconstruction of a board's page hierarchy.
///
/// Each live thread is represented by a single [`ThreadEntry`], in the board's canonical
/// (insertion) order. The board page's own list of thread page references is rebuilt from the
/// entries whenever they change, so the two can never fall out of step.
#[derive(Clone, Debug)]
pub struct BoardView {
    /// The public key that owns the board's root pointer.
    pub board_key: PublicKeyBytes,
    /// The reference of `board_page`, i.e., the board's root when it was resolved or last published.
    pub board_page_ref: Reference,
    pub board_page: BoardPage,
    pub board: Board,
    threads: Vec<ThreadEntry>,
}

impl BoardView {
    pub(crate) fn new(
        board_key: PublicKeyBytes,
        board_page_ref: Reference,
        board_page: BoardPage,
        board: Board,
        threads: Vec<ThreadEntry>,
    ) -> BoardView {
        let mut view = BoardView {
            board_key,
            board_page_ref,
            board_page,
            board,
            threads,
        };
        view.sync_board_page();
        view
    }

    /// Get the live threads of the board, in order.
    pub fn threads(&self) -> &[ThreadEntry] {
        &self.threads
    }

    /// Find the position of the thread whose reference is `thread`, by linear scan.
    pub fn position(&self, thread: &Reference) -> Option<usize> {
        self.threads
            .iter()
            .position(|entry| entry.thread_page.thread == *thread)
    }

    /// Check that the board page lists exactly the thread pages of the entries, in the same order.
    pub fn is_aligned(&self) -> bool {
        self.board_page.thread_pages.len() == self.threads.len()
            && self
                .threads
                .iter()
                .zip(&self.board_page.thread_pages)
                .all(|(entry, thread_page_ref)| {
                    entry.thread_page_ref == *thread_page_ref
                        && entry.thread_page.thread == entry.thread_ref
                })
    }

    pub(crate) fn push_thread(&mut self, entry: ThreadEntry) {
        self.threads.push(entry);
        self.sync_board_page();
    }

    /// Excise the thread at `index` without reordering the others, and record its thread page as
    /// the board page's tombstone.
    pub(crate) fn remove_thread(&mut self, index: usize) -> ThreadEntry {
        let removed = self.threads.remove(index);
        self.board_page.deleted = Some(removed.thread_page_ref);
        self.sync_board_page();
        removed
    }

    pub(crate) fn replace_thread_page(
        &mut self,
        index: usize,
        thread_page_ref: Reference,
        thread_page: ThreadPage,
    ) {
        let entry = &mut self.threads[index];
        entry.thread_page_ref = thread_page_ref;
        entry.thread_page = thread_page;
        self.sync_board_page();
    }

    fn sync_board_page(&mut self) {
        self.board_page.thread_pages = self
            .threads
            .iter()
            .map(|entry| entry.thread_page_ref)
            .collect();
    }
}

/// One live thread of a board: the thread page and the thread it points to, with both references.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThreadEntry {
    pub thread_page_ref: Reference,
    pub thread_page: ThreadPage,
    pub thread_ref: Reference,
    pub thread: Thread,
}

/// A stored post together with its reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostEntry {
    pub post_ref: Reference,
    pub post: Post,
}

/// Enumerates the different ways a pipeline operation can fail.
///
/// The first error encountered by an operation is returned verbatim.
#[derive(Debug)]
pub enum PipelineError {
    /// A reference failed to resolve, or the target of a delete is not in the board.
    NotFound(Missing),

    /// A post or thread failed signature verification.
    Signature(SignatureError),

    /// The content store refused to publish a root because the secret key given does not belong to
    /// the board.
    Auth { board: PublicKeyBytes },

    /// The content store failed to read or write, or returned content that is corrupt.
    Io(StoreError),

    /// Caller-supplied content failed validation before anything was signed or saved.
    InvalidInput { field: &'static str, reason: String },
}

impl PipelineError {
    /// Classify the error for transport layers that map errors to response codes.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::NotFound(_) => ErrorKind::NotFound,
            PipelineError::Signature(_) | PipelineError::Auth { .. } => ErrorKind::Forbidden,
            PipelineError::Io(_) => ErrorKind::Unavailable,
            PipelineError::InvalidInput { .. } => ErrorKind::BadRequest,
        }
    }
}

impl From<StoreError> for PipelineError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Unauthorized { owner } => PipelineError::Auth { board: owner },
            other => PipelineError::Io(other),
        }
    }
}

impl From<SignatureError> for PipelineError {
    fn from(value: SignatureError) -> Self {
        PipelineError::Signature(value)
    }
}

impl Display for PipelineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::NotFound(missing) => Display::fmt(missing, f),
            PipelineError::Signature(err) => Display::fmt(err, f),
            PipelineError::Auth { board } => {
                write!(f, "not authorized to publish board {}", board)
            }
            PipelineError::Io(err) => Display::fmt(err, f),
            PipelineError::InvalidInput { field, reason } => {
                write!(f, "invalid {}: {}", field, reason)
            }
        }
    }
}

/// Coarse classification of a [`PipelineError`].
///
/// Transports are expected to map `NotFound` to "404", `Forbidden` to "403", `Unavailable` to "503"
/// and `BadRequest` to "400", or to their equivalents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Forbidden,
    Unavailable,
    BadRequest,
}

/// What a [`PipelineError::NotFound`] failed to find.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Missing {
    /// No root has been published for the board.
    BoardRoot { board: PublicKeyBytes },

    /// The board's root does not resolve to a board page.
    BoardPage {
        board: PublicKeyBytes,
        reference: Reference,
    },

    /// The board page's board reference does not resolve.
    Board {
        board: PublicKeyBytes,
        reference: Reference,
    },

    ThreadPage {
        board: PublicKeyBytes,
        reference: Reference,
    },

    Thread {
        board: PublicKeyBytes,
        reference: Reference,
    },

    Post {
        board: PublicKeyBytes,
        reference: Reference,
    },

    /// No live thread of the board has this reference.
    ThreadInBoard {
        board: PublicKeyBytes,
        thread: Reference,
    },

    /// No live post of the thread has this reference.
    PostInThread {
        board: PublicKeyBytes,
        thread: Reference,
        post: Reference,
    },
}

impl Display for Missing {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Missing::BoardRoot { board } => write!(f, "board {} has no published root", board),
            Missing::BoardPage { board, reference } => {
                write!(f, "board page {} of board {} not found", reference, board)
            }
            Missing::Board { board, reference } => {
                write!(f, "board metadata {} of board {} not found", reference, board)
            }
            Missing::ThreadPage { board, reference } => {
                write!(f, "thread page {} of board {} not found", reference, board)
            }
            Missing::Thread { board, reference } => {
                write!(f, "thread content {} of board {} not found", reference, board)
            }
            Missing::Post { board, reference } => {
                write!(f, "post {} of board {} not found", reference, board)
            }
            Missing::ThreadInBoard { board, thread } => write!(
                f,
                "thread of reference {} not found in board {}",
                thread, board
            ),
            Missing::PostInThread {
                board,
                thread,
                post,
            } => write!(
                f,
                "post of reference {} not found in thread {} of board {}",
                post, thread, board
            ),
        }
    }
}
