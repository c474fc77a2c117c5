/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The registry of handler closures that [`Event`]s are dispatched to.

use crate::events::*;
use crate::logging::Logger;

pub(crate) type HandlerPtr<T> = Box<dyn Fn(&T) + Send + Sync>;

/// Handlers for every event type. A handler list holds the default logger (if events are logged)
/// followed by the user's handler (if one was registered).
#[derive(Default)]
pub(crate) struct EventHandlers {
    pub(crate) save_object_handlers: Vec<HandlerPtr<SaveObjectEvent>>,
    pub(crate) publish_root_handlers: Vec<HandlerPtr<PublishRootEvent>>,
    pub(crate) create_board_handlers: Vec<HandlerPtr<CreateBoardEvent>>,
    pub(crate) create_thread_handlers: Vec<HandlerPtr<CreateThreadEvent>>,
    pub(crate) delete_thread_handlers: Vec<HandlerPtr<DeleteThreadEvent>>,
    pub(crate) create_post_handlers: Vec<HandlerPtr<CreatePostEvent>>,
    pub(crate) delete_post_handlers: Vec<HandlerPtr<DeletePostEvent>>,
    pub(crate) reject_post_handlers: Vec<HandlerPtr<RejectPostEvent>>,
}

impl EventHandlers {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        log_events: bool,
        on_save_object: Option<HandlerPtr<SaveObjectEvent>>,
        on_publish_root: Option<HandlerPtr<PublishRootEvent>>,
        on_create_board: Option<HandlerPtr<CreateBoardEvent>>,
        on_create_thread: Option<HandlerPtr<CreateThreadEvent>>,
        on_delete_thread: Option<HandlerPtr<DeleteThreadEvent>>,
        on_create_post: Option<HandlerPtr<CreatePostEvent>>,
        on_delete_post: Option<HandlerPtr<DeletePostEvent>>,
        on_reject_post: Option<HandlerPtr<RejectPostEvent>>,
    ) -> EventHandlers {
        EventHandlers {
            save_object_handlers: handlers(log_events, on_save_object),
            publish_root_handlers: handlers(log_events, on_publish_root),
            create_board_handlers: handlers(log_events, on_create_board),
            create_thread_handlers: handlers(log_events, on_create_thread),
            delete_thread_handlers: handlers(log_events, on_delete_thread),
            create_post_handlers: handlers(log_events, on_create_post),
            delete_post_handlers: handlers(log_events, on_delete_post),
            reject_post_handlers: handlers(log_events, on_reject_post),
        }
    }

    pub(crate) fn fire_handlers(&self, event: Event) {
        match event {
            Event::SaveObject(save_object_event) => self
                .save_object_handlers
                .iter()
                .for_each(|handler| handler(&save_object_event)),

            Event::PublishRoot(publish_root_event) => self
                .publish_root_handlers
                .iter()
                .for_each(|handler| handler(&publish_root_event)),

            Event::CreateBoard(create_board_event) => self
                .create_board_handlers
                .iter()
                .for_each(|handler| handler(&create_board_event)),

            Event::CreateThread(create_thread_event) => self
                .create_thread_handlers
                .iter()
                .for_each(|handler| handler(&create_thread_event)),

            Event::DeleteThread(delete_thread_event) => self
                .delete_thread_handlers
                .iter()
                .for_each(|handler| handler(&delete_thread_event)),

            Event::CreatePost(create_post_event) => self
                .create_post_handlers
                .iter()
                .for_each(|handler| handler(&create_post_event)),

            Event::DeletePost(delete_post_event) => self
                .delete_post_handlers
                .iter()
                .for_each(|handler| handler(&delete_post_event)),

            Event::RejectPost(reject_post_event) => self
                .reject_post_handlers
                .iter()
                .for_each(|handler| handler(&reject_post_event)),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.save_object_handlers.is_empty()
            && self.publish_root_handlers.is_empty()
            && self.create_board_handlers.is_empty()
            && self.create_thread_handlers.is_empty()
            && self.delete_thread_handlers.is_empty()
            && self.create_post_handlers.is_empty()
            && self.delete_post_handlers.is_empty()
            && self.reject_post_handlers.is_empty()
    }
}

fn handlers<T: Logger>(log_events: bool, user_handler: Option<HandlerPtr<T>>) -> Vec<HandlerPtr<T>> {
    let mut handlers: Vec<HandlerPtr<T>> = Vec::new();
    if log_events {
        handlers.push(T::get_logger());
    }
    handlers.extend(user_handler);
    handlers
}
