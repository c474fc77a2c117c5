/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Methods to build a [`Forum`] and invoke pipeline operations on it.
//!
//! A `Forum` is the entry point that transport layers (HTTP handlers, admin RPC, ...) call into. It
//! holds a handle to the [content store](crate::content_store), its [configuration](Configuration),
//! and the registered event handlers, and nothing else: every operation runs as a fresh
//! transaction against the store, so a single `Forum` can serve any number of boards and can be
//! shared between threads.
//!
//! ## Building a forum
//!
//! ```ignore
//! let forum =
//!     ForumSpec::builder()
//!     .store(MemStore::new())
//!     .configuration(Configuration::builder().log_events(true).build())
//!     .on_create_thread(|event| println!("new thread: {}", event.title))
//!     .build()
//!     .create();
//! ```
//!
//! ### Required setters
//!
//! - `.store(...)`
//! - `.configuration(...)`
//!
//! ### Optional setters
//!
//! The optional setters are for registering user-defined event handlers for events from [crate::events]:
//! - `.on_save_object(...)`
//! - `.on_publish_root(...)`
//! - `.on_create_board(...)`
//! - `.on_create_thread(...)`
//! - `.on_delete_thread(...)`
//! - `.on_create_post(...)`
//! - `.on_delete_post(...)`
//! - `.on_reject_post(...)`
//!
//! ## Authorization
//!
//! Every mutating operation takes the board's secret key. Holding it is the only thing that
//! authorizes a write; the content store refuses to publish a root under a board's public key
//! otherwise, and the operation fails with [`PipelineError::Auth`].

use typed_builder::TypedBuilder;

use crate::{
    content_store::pluggables::ContentStore,
    event_handlers::{EventHandlers, HandlerPtr},
    events::*,
    pipeline::{stages::Transaction, BoardView, PipelineError, PostEntry, ThreadEntry},
    types::{
        crypto_primitives::{Keypair, SigningKey, VerifyingKey},
        data_types::{PublicKeyBytes, Reference},
        objects::{Board, Thread},
    },
};

/// Default maximum length of board names and thread and post titles, in characters.
pub const DEFAULT_MAX_TITLE_LEN: usize = 200;

/// Default maximum size of board descriptions and thread and post bodies, in bytes.
pub const DEFAULT_MAX_BODY_LEN: usize = 100 * 1024;

/// Stores the user-defined parameters of a [`Forum`], that is:
/// 1. The maximum length of titles (and board names), in characters.
/// 2. The maximum size of bodies (and board descriptions), in bytes.
/// 3. The "Log Events" flag, if set to "true" then events are logged.
///
/// ## Log Events
///
/// This crate logs using the [log](https://docs.rs/log/latest/log/) crate. To get these messages
/// printed onto a terminal or to a file, set up a [logging
/// implementation](https://docs.rs/log/latest/log/#available-logging-implementations).
#[derive(Clone, Debug, TypedBuilder)]
#[builder(builder_method(doc = "
    Create a builder for building a [Configuration]. On the builder call the following methods to construct a valid [Configuration].

    Required:
    - `.log_events(...)`

    Optional:
    - `.max_title_len(...)`
    - `.max_body_len(...)`
"))]
pub struct Configuration {
    #[builder(default = DEFAULT_MAX_TITLE_LEN, setter(doc = "Set the maximum length of titles, in characters. Optional, defaults to 200."))]
    pub max_title_len: usize,
    #[builder(default = DEFAULT_MAX_BODY_LEN, setter(doc = "Set the maximum size of bodies, in bytes. Optional, defaults to 100 KiB."))]
    pub max_body_len: usize,
    #[builder(setter(doc = "Enable logging? Required."))]
    pub log_events: bool,
}

/// Stores the content store, configuration and event handlers required to create a [`Forum`].
#[derive(TypedBuilder)]
#[builder(builder_method(doc = "
    Create a builder for building a [ForumSpec]. On the builder call the following methods to construct a valid [ForumSpec].

    Required:
    - `.store(...)`
    - `.configuration(...)`

    Optional:
    - `.on_save_object(...)`
    - `.on_publish_root(...)`
    - `.on_create_board(...)`
    - `.on_create_thread(...)`
    - `.on_delete_thread(...)`
    - `.on_create_post(...)`
    - `.on_delete_post(...)`
    - `.on_reject_post(...)`
"))]
pub struct ForumSpec<S: ContentStore> {
    // Required parameters
    #[builder(setter(doc = "Set the content store that boards are read from and written to. The argument must implement the [ContentStore](crate::content_store::pluggables::ContentStore) trait. Required."))]
    store: S,
    #[builder(setter(doc = "Set the [configuration](Configuration). Required."))]
    configuration: Configuration,
    // Optional parameters
    #[builder(default, setter(transform = |handler: impl Fn(&SaveObjectEvent) + Send + Sync + 'static| Some(Box::new(handler) as HandlerPtr<SaveObjectEvent>),
    doc = "Register a handler closure to be invoked after an object is saved to the content store. Optional."))]
    on_save_object: Option<HandlerPtr<SaveObjectEvent>>,
    #[builder(default, setter(transform = |handler: impl Fn(&PublishRootEvent) + Send + Sync + 'static| Some(Box::new(handler) as HandlerPtr<PublishRootEvent>),
    doc = "Register a handler closure to be invoked after a board's root is published. Optional."))]
    on_publish_root: Option<HandlerPtr<PublishRootEvent>>,
    #[builder(default, setter(transform = |handler: impl Fn(&CreateBoardEvent) + Send + Sync + 'static| Some(Box::new(handler) as HandlerPtr<CreateBoardEvent>),
    doc = "Register a handler closure to be invoked after a board is created. Optional."))]
    on_create_board: Option<HandlerPtr<CreateBoardEvent>>,
    #[builder(default, setter(transform = |handler: impl Fn(&CreateThreadEvent) + Send + Sync + 'static| Some(Box::new(handler) as HandlerPtr<CreateThreadEvent>),
    doc = "Register a handler closure to be invoked after a thread is created. Optional."))]
    on_create_thread: Option<HandlerPtr<CreateThreadEvent>>,
    #[builder(default, setter(transform = |handler: impl Fn(&DeleteThreadEvent) + Send + Sync + 'static| Some(Box::new(handler) as HandlerPtr<DeleteThreadEvent>),
    doc = "Register a handler closure to be invoked after a thread is deleted. Optional."))]
    on_delete_thread: Option<HandlerPtr<DeleteThreadEvent>>,
    #[builder(default, setter(transform = |handler: impl Fn(&CreatePostEvent) + Send + Sync + 'static| Some(Box::new(handler) as HandlerPtr<CreatePostEvent>),
    doc = "Register a handler closure to be invoked after a post is created. Optional."))]
    on_create_post: Option<HandlerPtr<CreatePostEvent>>,
    #[builder(default, setter(transform = |handler: impl Fn(&DeletePostEvent) + Send + Sync + 'static| Some(Box::new(handler) as HandlerPtr<DeletePostEvent>),
    doc = "Register a handler closure to be invoked after a post is deleted. Optional."))]
    on_delete_post: Option<HandlerPtr<DeletePostEvent>>,
    #[builder(default, setter(transform = |handler: impl Fn(&RejectPostEvent) + Send + Sync + 'static| Some(Box::new(handler) as HandlerPtr<RejectPostEvent>),
    doc = "Register a handler closure to be invoked after a post fails signature verification. Optional."))]
    on_reject_post: Option<HandlerPtr<RejectPostEvent>>,
}

impl<S: ContentStore> ForumSpec<S> {
    /// Create the [`Forum`] described by this specification.
    pub fn create(self) -> Forum<S> {
        let handlers = EventHandlers::new(
            self.configuration.log_events,
            self.on_save_object,
            self.on_publish_root,
            self.on_create_board,
            self.on_create_thread,
            self.on_delete_thread,
            self.on_create_post,
            self.on_delete_post,
            self.on_reject_post,
        );

        Forum {
            store: self.store,
            configuration: self.configuration,
            handlers,
        }
    }
}

/// The pipeline's entry point. See the [module-level docs](self).
pub struct Forum<S: ContentStore> {
    store: S,
    configuration: Configuration,
    handlers: EventHandlers,
}

impl<S: ContentStore> Forum<S> {
    /// Create a `Forum` with no user-defined event handlers.
    pub fn new(store: S, configuration: Configuration) -> Forum<S> {
        ForumSpec::builder()
            .store(store)
            .configuration(configuration)
            .build()
            .create()
    }

    /// Get the content store this forum reads from and writes to.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a new, empty board owned by `board_keypair`.
    pub fn create_board(
        &self,
        board_keypair: &Keypair,
        name: String,
        description: String,
        submission_addresses: Vec<String>,
    ) -> Result<BoardView, PipelineError> {
        self.transaction()
            .create_board(board_keypair, name, description, submission_addresses)
    }

    /// Get the current metadata of `board`.
    pub fn board(&self, board: &PublicKeyBytes) -> Result<Board, PipelineError> {
        self.transaction().board(board)
    }

    /// Get the fully-resolved current state of `board`.
    pub fn board_view(&self, board: &PublicKeyBytes) -> Result<BoardView, PipelineError> {
        self.transaction().board_view(board)
    }

    /// Get the threads of `board`, in order.
    pub fn list_threads(&self, board: &PublicKeyBytes) -> Result<Vec<Thread>, PipelineError> {
        self.transaction().list_threads(board)
    }

    /// Create a thread at the end of `board`, with an opening post signed by the author.
    #[allow(clippy::too_many_arguments)]
    pub fn create_thread(
        &self,
        board: &PublicKeyBytes,
        board_secret_key: &SigningKey,
        title: String,
        description: String,
        author_public_key: &VerifyingKey,
        author_secret_key: &SigningKey,
    ) -> Result<ThreadEntry, PipelineError> {
        self.transaction().create_thread(
            board,
            board_secret_key,
            title,
            description,
            author_public_key,
            author_secret_key,
        )
    }

    /// Delete the thread whose reference is `thread` from `board`.
    pub fn delete_thread(
        &self,
        board: &PublicKeyBytes,
        board_secret_key: &SigningKey,
        thread: &Reference,
    ) -> Result<(), PipelineError> {
        self.transaction()
            .delete_thread(board, board_secret_key, thread)
    }

    /// Get the posts of the thread whose reference is `thread`, in order.
    pub fn list_posts(
        &self,
        board: &PublicKeyBytes,
        thread: &Reference,
    ) -> Result<Vec<PostEntry>, PipelineError> {
        self.transaction().list_posts(board, thread)
    }

    /// Create a post at the end of the thread whose reference is `thread`.
    #[allow(clippy::too_many_arguments)]
    pub fn create_post(
        &self,
        board: &PublicKeyBytes,
        board_secret_key: &SigningKey,
        thread: &Reference,
        title: String,
        body: String,
        author_public_key: &VerifyingKey,
        author_secret_key: &SigningKey,
    ) -> Result<PostEntry, PipelineError> {
        self.transaction().create_post(
            board,
            board_secret_key,
            thread,
            title,
            body,
            author_public_key,
            author_secret_key,
        )
    }

    /// Delete the post whose reference is `post` from the thread whose reference is `thread`.
    pub fn delete_post(
        &self,
        board: &PublicKeyBytes,
        board_secret_key: &SigningKey,
        thread: &Reference,
        post: &Reference,
    ) -> Result<(), PipelineError> {
        self.transaction()
            .delete_post(board, board_secret_key, thread, post)
    }

    fn transaction(&self) -> Transaction<'_, S> {
        Transaction::new(self.store.clone(), &self.configuration, &self.handlers)
    }
}
