/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Top-level operations, each composed from [stages](super::stages).
//!
//! |Operation|Stages|
//! |---|---|
//! |[`create_board`](Transaction::create_board)|save board → save board page|
//! |[`board`](Transaction::board)|resolve board page → resolve board|
//! |[`list_threads`](Transaction::list_threads)|resolve board page → resolve board → resolve thread pages → resolve threads|
//! |[`create_thread`](Transaction::create_thread)|resolve … threads → sign and verify → save thread → save thread page → save board page|
//! |[`delete_thread`](Transaction::delete_thread)|resolve … threads → excise → save board page|
//! |[`list_posts`](Transaction::list_posts)|resolve … threads → resolve posts|
//! |[`create_post`](Transaction::create_post)|resolve … threads → sign and verify → save post → save thread page → save board page|
//! |[`delete_post`](Transaction::delete_post)|resolve … threads → excise → save thread page → save board page|

use std::time::SystemTime;

use crate::{
    content_store::pluggables::{ContentStore, StoreError},
    events::{
        CreateBoardEvent, CreatePostEvent, CreateThreadEvent, DeletePostEvent, DeleteThreadEvent,
        Event,
    },
    types::{
        crypto_primitives::{Keypair, SigningKey, VerifyingKey},
        data_types::{PublicKeyBytes, Reference, Timestamp},
        objects::{Board, BoardPage, Object, Post, Thread, ThreadPage},
    },
};

use super::{stages::Transaction, BoardView, Missing, PipelineError, PostEntry, ThreadEntry};

impl<S: ContentStore> Transaction<'_, S> {
    /// Create a board owned by `board_keypair`, with no threads, and publish it.
    ///
    /// Publishing replaces any root previously published for the same key.
    pub(crate) fn create_board(
        &mut self,
        board_keypair: &Keypair,
        name: String,
        description: String,
        submission_addresses: Vec<String>,
    ) -> Result<BoardView, PipelineError> {
        self.validate_title("board name", &name)?;
        self.validate_body("board description", &description)?;

        let board_key = board_keypair.public_bytes();
        let board = Board {
            name,
            description,
            created: Timestamp::now(),
            submission_addresses,
            external_roots: Vec::new(),
            meta: Vec::new(),
        };
        let board_ref = self.save_board(&board)?;

        let board_page = BoardPage::new(board_ref);
        let board_page_ref = board_page.reference().map_err(StoreError::from)?;
        let mut view = BoardView::new(board_key, board_page_ref, board_page, board, Vec::new());
        self.save_board_page(&mut view, board_keypair.signing_key())?;

        self.emit(|| {
            Event::CreateBoard(CreateBoardEvent {
                timestamp: SystemTime::now(),
                board: board_key,
                name: view.board.name.clone(),
            })
        });
        Ok(view)
    }

    pub(crate) fn board(&self, board: &PublicKeyBytes) -> Result<Board, PipelineError> {
        let (_, board_page) = self.resolve_board_page(board)?;
        self.resolve_board(board, &board_page)
    }

    pub(crate) fn board_view(&self, board: &PublicKeyBytes) -> Result<BoardView, PipelineError> {
        self.load(board)
    }

    pub(crate) fn list_threads(&self, board: &PublicKeyBytes) -> Result<Vec<Thread>, PipelineError> {
        let view = self.load(board)?;
        Ok(view
            .threads()
            .iter()
            .map(|entry| entry.thread.clone())
            .collect())
    }

    /// Append a new thread, whose opening post is signed by the author, to the end of the board.
    ///
    /// The thread is verified against `author_public_key` before anything is saved, so a
    /// `author_secret_key` that does not belong to `author_public_key` fails with
    /// [`PipelineError::Signature`] and leaves the store untouched.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn create_thread(
        &mut self,
        board: &PublicKeyBytes,
        board_secret_key: &SigningKey,
        title: String,
        description: String,
        author_public_key: &VerifyingKey,
        author_secret_key: &SigningKey,
    ) -> Result<ThreadEntry, PipelineError> {
        let mut view = self.load(board)?;

        self.validate_title("thread title", &title)?;
        self.validate_body("thread description", &description)?;
        let post = self.signed_post(title, description, author_public_key, author_secret_key);
        let thread = Thread {
            post,
            master_board: view.board_page.board,
        };
        self.verify(board, &thread)?;

        let thread_ref = self.save_thread(&thread)?;
        let thread_page = ThreadPage::new(thread_ref);
        let thread_page_ref = self.save_thread_page(&thread_page)?;
        let entry = ThreadEntry {
            thread_page_ref,
            thread_page,
            thread_ref,
            thread,
        };
        view.push_thread(entry.clone());
        self.save_board_page(&mut view, board_secret_key)?;

        self.emit(|| {
            Event::CreateThread(CreateThreadEvent {
                timestamp: SystemTime::now(),
                board: *board,
                thread: thread_ref,
                title: entry.thread.post.title.clone(),
            })
        });
        Ok(entry)
    }

    /// Remove the thread whose reference is `thread` from the board.
    ///
    /// The removed thread page becomes the board page's tombstone. The thread and its posts stay in
    /// the store and remain resolvable by reference.
    pub(crate) fn delete_thread(
        &mut self,
        board: &PublicKeyBytes,
        board_secret_key: &SigningKey,
        thread: &Reference,
    ) -> Result<(), PipelineError> {
        let mut view = self.load(board)?;
        let index = view.position(thread).ok_or(PipelineError::NotFound(
            Missing::ThreadInBoard {
                board: *board,
                thread: *thread,
            },
        ))?;

        let removed = view.remove_thread(index);
        self.save_board_page(&mut view, board_secret_key)?;

        self.emit(|| {
            Event::DeleteThread(DeleteThreadEvent {
                timestamp: SystemTime::now(),
                board: *board,
                thread: removed.thread_ref,
                thread_page: removed.thread_page_ref,
            })
        });
        Ok(())
    }

    pub(crate) fn list_posts(
        &self,
        board: &PublicKeyBytes,
        thread: &Reference,
    ) -> Result<Vec<PostEntry>, PipelineError> {
        let view = self.load(board)?;
        let index = self.locate_thread(&view, thread)?;
        self.resolve_posts(board, &view.threads()[index].thread_page)
    }

    /// Append a new post, signed by the author, to the end of a thread.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn create_post(
        &mut self,
        board: &PublicKeyBytes,
        board_secret_key: &SigningKey,
        thread: &Reference,
        title: String,
        body: String,
        author_public_key: &VerifyingKey,
        author_secret_key: &SigningKey,
    ) -> Result<PostEntry, PipelineError> {
        let mut view = self.load(board)?;
        let index = self.locate_thread(&view, thread)?;

        self.validate_title("post title", &title)?;
        self.validate_body("post body", &body)?;
        let post = self.signed_post(title, body, author_public_key, author_secret_key);
        self.verify(board, &post)?;

        let post_ref = self.save_post(&post)?;
        let mut thread_page = view.threads()[index].thread_page.clone();
        thread_page.posts.push(post_ref);
        let thread_page_ref = self.save_thread_page(&thread_page)?;
        view.replace_thread_page(index, thread_page_ref, thread_page);
        self.save_board_page(&mut view, board_secret_key)?;

        self.emit(|| {
            Event::CreatePost(CreatePostEvent {
                timestamp: SystemTime::now(),
                board: *board,
                thread: *thread,
                post: post_ref,
            })
        });
        Ok(PostEntry { post_ref, post })
    }

    /// Remove the post whose reference is `post` from a thread. The post becomes the thread page's
    /// tombstone.
    pub(crate) fn delete_post(
        &mut self,
        board: &PublicKeyBytes,
        board_secret_key: &SigningKey,
        thread: &Reference,
        post: &Reference,
    ) -> Result<(), PipelineError> {
        let mut view = self.load(board)?;
        let index = self.locate_thread(&view, thread)?;

        let mut thread_page = view.threads()[index].thread_page.clone();
        let position = thread_page
            .posts
            .iter()
            .position(|post_ref| post_ref == post)
            .ok_or(PipelineError::NotFound(Missing::PostInThread {
                board: *board,
                thread: *thread,
                post: *post,
            }))?;
        thread_page.posts.remove(position);
        thread_page.deleted = Some(*post);

        let thread_page_ref = self.save_thread_page(&thread_page)?;
        view.replace_thread_page(index, thread_page_ref, thread_page);
        self.save_board_page(&mut view, board_secret_key)?;

        self.emit(|| {
            Event::DeletePost(DeletePostEvent {
                timestamp: SystemTime::now(),
                board: *board,
                thread: *thread,
                post: *post,
            })
        });
        Ok(())
    }

    /* ↓↓↓ Helpers ↓↓↓ */

    fn locate_thread(&self, view: &BoardView, thread: &Reference) -> Result<usize, PipelineError> {
        view.position(thread)
            .ok_or(PipelineError::NotFound(Missing::ThreadInBoard {
                board: view.board_key,
                thread: *thread,
            }))
    }

    /// Build a post stamped with the current time and signed with `author_secret_key`. The post
    /// declares `author_public_key` as its author whether or not the two keys match.
    fn signed_post(
        &self,
        title: String,
        body: String,
        author_public_key: &VerifyingKey,
        author_secret_key: &SigningKey,
    ) -> Post {
        let mut post = Post::new(
            title,
            body,
            Timestamp::now(),
            PublicKeyBytes::from(author_public_key),
        );
        post.sign(author_secret_key);
        post
    }

    fn validate_title(&self, field: &'static str, title: &str) -> Result<(), PipelineError> {
        if title.trim().is_empty() {
            return Err(PipelineError::InvalidInput {
                field,
                reason: String::from("cannot be empty"),
            });
        }
        let len = title.chars().count();
        if len > self.config.max_title_len {
            return Err(PipelineError::InvalidInput {
                field,
                reason: format!(
                    "{} characters exceeds the maximum of {}",
                    len, self.config.max_title_len
                ),
            });
        }
        Ok(())
    }

    fn validate_body(&self, field: &'static str, body: &str) -> Result<(), PipelineError> {
        if body.len() > self.config.max_body_len {
            return Err(PipelineError::InvalidInput {
                field,
                reason: format!(
                    "{} bytes exceeds the maximum of {}",
                    body.len(),
                    self.config.max_body_len
                ),
            });
        }
        Ok(())
    }
}
