/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The individual read and write stages that pipeline operations are composed from.
//!
//! Read stages never write. Write stages persist exactly one object each, except
//! [`save_board_page`](Transaction::save_board_page), which also publishes the saved page as the
//! board's new root. Stages log what they did at `trace` level; completed operations are reported
//! through [events](crate::events).

use std::time::SystemTime;

use crate::{
    content_store::pluggables::ContentStore,
    event_handlers::EventHandlers,
    events::{Event, PublishRootEvent, RejectPostEvent, SaveObjectEvent},
    forum::Configuration,
    logging::first_seven_base64_chars,
    types::{
        crypto_primitives::SigningKey,
        data_types::{PublicKeyBytes, Reference},
        objects::{Board, BoardPage, Object, Post, Thread, ThreadPage},
        signed_messages::SignedMessage,
    },
    verifier,
};

use super::{BoardView, Missing, PipelineError, PostEntry, ThreadEntry};

/// A single invocation of the pipeline.
///
/// A `Transaction` owns a handle to the content store for the duration of one operation and holds no
/// other mutable state. It is created per call by [`Forum`](crate::forum::Forum) and dropped when the
/// operation returns.
pub(crate) struct Transaction<'a, S: ContentStore> {
    pub(super) store: S,
    pub(super) config: &'a Configuration,
    handlers: &'a EventHandlers,
}

impl<'a, S: ContentStore> Transaction<'a, S> {
    pub(crate) fn new(
        store: S,
        config: &'a Configuration,
        handlers: &'a EventHandlers,
    ) -> Transaction<'a, S> {
        Transaction {
            store,
            config,
            handlers,
        }
    }

    /* ↓↓↓ Read stages ↓↓↓ */

    /// Resolve every level of the board's page hierarchy.
    pub(crate) fn load(&self, board: &PublicKeyBytes) -> Result<BoardView, PipelineError> {
        let (board_page_ref, board_page) = self.resolve_board_page(board)?;
        let board_metadata = self.resolve_board(board, &board_page)?;
        let thread_pages = self.resolve_thread_pages(board, &board_page)?;
        let threads = self.resolve_threads(board, thread_pages)?;

        Ok(BoardView::new(
            *board,
            board_page_ref,
            board_page,
            board_metadata,
            threads,
        ))
    }

    /// Get the board page currently published at the board's root.
    pub(crate) fn resolve_board_page(
        &self,
        board: &PublicKeyBytes,
    ) -> Result<(Reference, BoardPage), PipelineError> {
        let root = self
            .store
            .root(board)?
            .ok_or(PipelineError::NotFound(Missing::BoardRoot { board: *board }))?;
        let board_page = self.store.resolve::<BoardPage>(&root)?.ok_or(
            PipelineError::NotFound(Missing::BoardPage {
                board: *board,
                reference: root,
            }),
        )?;

        log::trace!(
            "resolved board page {} of board {}",
            first_seven_base64_chars(&root.bytes()),
            first_seven_base64_chars(&board.bytes())
        );
        Ok((root, board_page))
    }

    pub(crate) fn resolve_board(
        &self,
        board: &PublicKeyBytes,
        board_page: &BoardPage,
    ) -> Result<Board, PipelineError> {
        self.store
            .resolve::<Board>(&board_page.board)?
            .ok_or(PipelineError::NotFound(Missing::Board {
                board: *board,
                reference: board_page.board,
            }))
    }

    /// Resolve the board page's thread pages, in list order. Fails on the first that does not resolve.
    pub(crate) fn resolve_thread_pages(
        &self,
        board: &PublicKeyBytes,
        board_page: &BoardPage,
    ) -> Result<Vec<(Reference, ThreadPage)>, PipelineError> {
        board_page
            .thread_pages
            .iter()
            .map(|reference| -> Result<(Reference, ThreadPage), PipelineError> {
                let thread_page = self.store.resolve::<ThreadPage>(reference)?.ok_or(
                    PipelineError::NotFound(Missing::ThreadPage {
                        board: *board,
                        reference: *reference,
                    }),
                )?;
                Ok((*reference, thread_page))
            })
            .collect()
    }

    /// Resolve the thread of each thread page, preserving order, and verify each thread's signature.
    pub(crate) fn resolve_threads(
        &self,
        board: &PublicKeyBytes,
        thread_pages: Vec<(Reference, ThreadPage)>,
    ) -> Result<Vec<ThreadEntry>, PipelineError> {
        thread_pages
            .into_iter()
            .map(|(thread_page_ref, thread_page)| -> Result<ThreadEntry, PipelineError> {
                let thread_ref = thread_page.thread;
                let thread = self.store.resolve::<Thread>(&thread_ref)?.ok_or(
                    PipelineError::NotFound(Missing::Thread {
                        board: *board,
                        reference: thread_ref,
                    }),
                )?;
                self.verify(board, &thread)?;

                Ok(ThreadEntry {
                    thread_page_ref,
                    thread_page,
                    thread_ref,
                    thread,
                })
            })
            .collect()
    }

    /// Resolve the posts of a thread page, preserving order, and verify each post's signature.
    pub(crate) fn resolve_posts(
        &self,
        board: &PublicKeyBytes,
        thread_page: &ThreadPage,
    ) -> Result<Vec<PostEntry>, PipelineError> {
        thread_page
            .posts
            .iter()
            .map(|post_ref| -> Result<PostEntry, PipelineError> {
                let post = self.store.resolve::<Post>(post_ref)?.ok_or(
                    PipelineError::NotFound(Missing::Post {
                        board: *board,
                        reference: *post_ref,
                    }),
                )?;
                self.verify(board, &post)?;

                Ok(PostEntry {
                    post_ref: *post_ref,
                    post,
                })
            })
            .collect()
    }

    /// Verify `message`'s signature, reporting a [`RejectPostEvent`] if it does not verify.
    pub(crate) fn verify<M: SignedMessage>(
        &self,
        board: &PublicKeyBytes,
        message: &M,
    ) -> Result<(), PipelineError> {
        verifier::verify(message).map_err(|error| {
            self.emit(|| {
                Event::RejectPost(RejectPostEvent {
                    timestamp: SystemTime::now(),
                    board: *board,
                    author: message.signer(),
                    error: error.clone(),
                })
            });
            PipelineError::Signature(error)
        })
    }

    /* ↓↓↓ Write stages ↓↓↓ */

    pub(crate) fn save_post(&mut self, post: &Post) -> Result<Reference, PipelineError> {
        self.save(post)
    }

    pub(crate) fn save_thread(&mut self, thread: &Thread) -> Result<Reference, PipelineError> {
        self.save(thread)
    }

    pub(crate) fn save_thread_page(
        &mut self,
        thread_page: &ThreadPage,
    ) -> Result<Reference, PipelineError> {
        self.save(thread_page)
    }

    /// Save the view's board page and publish it as the board's new root.
    ///
    /// `view.board_page_ref` is only updated once the publish has succeeded.
    pub(crate) fn save_board_page(
        &mut self,
        view: &mut BoardView,
        board_secret_key: &SigningKey,
    ) -> Result<Reference, PipelineError> {
        let board_page_ref = self.save(&view.board_page)?;
        self.store
            .publish_root(&view.board_key, board_secret_key, board_page_ref)?;
        view.board_page_ref = board_page_ref;

        self.emit(|| {
            Event::PublishRoot(PublishRootEvent {
                timestamp: SystemTime::now(),
                board: view.board_key,
                root: board_page_ref,
            })
        });
        Ok(board_page_ref)
    }

    pub(crate) fn save_board(&mut self, board: &Board) -> Result<Reference, PipelineError> {
        self.save(board)
    }

    fn save<O: Object>(&mut self, object: &O) -> Result<Reference, PipelineError> {
        let reference = self.store.save(object)?;
        log::trace!(
            "saved {} {}",
            O::KIND,
            first_seven_base64_chars(&reference.bytes())
        );

        self.emit(|| {
            Event::SaveObject(SaveObjectEvent {
                timestamp: SystemTime::now(),
                kind: O::KIND,
                reference,
            })
        });
        Ok(reference)
    }

    /// Fire the handlers of the event built by `event`. The event is not built if there are no handlers.
    pub(super) fn emit(&self, event: impl FnOnce() -> Event) {
        if !self.handlers.is_empty() {
            self.handlers.fire_handlers(event())
        }
    }
}
