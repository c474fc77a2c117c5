/*
    Copyright © 2024, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Functions that log out events.
//!
//! The logs defined in this module are printed if the user enabled them via the forum's
//! [configuration](crate::forum::Configuration::log_events).
//!
//! This crate logs using the [log](https://docs.rs/log/latest/log/) crate. To get these messages
//! printed onto a terminal or to a file, set up a
//! [logging implementation](https://docs.rs/log/latest/log/#available-logging-implementations).
//!
//! ## Log message format
//!
//! Log messages are CSVs (Comma Separated Values) with at least two values. The first two values are
//! always:
//! 1. The name of the [event](crate::events) in PascalCase (defined in this module as constants).
//! 2. The time the event was emitted (as number of seconds since the Unix Epoch).
//!
//! The rest of the values differ depending on the kind of event. For example, the following snippet
//! is how a [CreateThread](crate::events::CreateThreadEvent) is printed:
//!
//! ```text
//! CreateThread, 1701329264, pQ3vX0a, Hk2bY9c, Welcome
//! ```
//!
//! In the snippet:
//! - The third value is the first seven characters of the Base64 encoding of the board's public key.
//! - The fourth value is the first seven characters of the Base64 encoding of the new thread's
//!   reference.
//! - The fifth value is the thread's title.

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use std::time::SystemTime;

use crate::events::*;

// Names of each event in PascalCase for printing:
pub const SAVE_OBJECT: &str = "SaveObject";
pub const PUBLISH_ROOT: &str = "PublishRoot";

pub const CREATE_BOARD: &str = "CreateBoard";
pub const CREATE_THREAD: &str = "CreateThread";
pub const DELETE_THREAD: &str = "DeleteThread";
pub const CREATE_POST: &str = "CreatePost";
pub const DELETE_POST: &str = "DeletePost";

pub const REJECT_POST: &str = "RejectPost";

/// Implemented by event types. Used to get a closure that logs the event.
pub(crate) trait Logger {
    /// Returns a pointer to the default logging handler for a given event type.
    fn get_logger() -> Box<dyn Fn(&Self) + Send + Sync>;
}

impl Logger for SaveObjectEvent {
    fn get_logger() -> Box<dyn Fn(&Self) + Send + Sync> {
        let logger = |save_object_event: &SaveObjectEvent| {
            log::debug!(
                "{}, {}, {}, {}",
                SAVE_OBJECT,
                secs_since_unix_epoch(save_object_event.timestamp),
                save_object_event.kind,
                first_seven_base64_chars(&save_object_event.reference.bytes())
            )
        };
        Box::new(logger)
    }
}

impl Logger for PublishRootEvent {
    fn get_logger() -> Box<dyn Fn(&Self) + Send + Sync> {
        let logger = |publish_root_event: &PublishRootEvent| {
            log::info!(
                "{}, {}, {}, {}",
                PUBLISH_ROOT,
                secs_since_unix_epoch(publish_root_event.timestamp),
                first_seven_base64_chars(&publish_root_event.board.bytes()),
                first_seven_base64_chars(&publish_root_event.root.bytes())
            )
        };
        Box::new(logger)
    }
}

impl Logger for CreateBoardEvent {
    fn get_logger() -> Box<dyn Fn(&Self) + Send + Sync> {
        let logger = |create_board_event: &CreateBoardEvent| {
            log::info!(
                "{}, {}, {}, {}",
                CREATE_BOARD,
                secs_since_unix_epoch(create_board_event.timestamp),
                first_seven_base64_chars(&create_board_event.board.bytes()),
                create_board_event.name
            )
        };
        Box::new(logger)
    }
}

impl Logger for CreateThreadEvent {
    fn get_logger() -> Box<dyn Fn(&Self) + Send + Sync> {
        let logger = |create_thread_event: &CreateThreadEvent| {
            log::info!(
                "{}, {}, {}, {}, {}",
                CREATE_THREAD,
                secs_since_unix_epoch(create_thread_event.timestamp),
                first_seven_base64_chars(&create_thread_event.board.bytes()),
                first_seven_base64_chars(&create_thread_event.thread.bytes()),
                create_thread_event.title
            )
        };
        Box::new(logger)
    }
}

impl Logger for DeleteThreadEvent {
    fn get_logger() -> Box<dyn Fn(&Self) + Send + Sync> {
        let logger = |delete_thread_event: &DeleteThreadEvent| {
            log::info!(
                "{}, {}, {}, {}, {}",
                DELETE_THREAD,
                secs_since_unix_epoch(delete_thread_event.timestamp),
                first_seven_base64_chars(&delete_thread_event.board.bytes()),
                first_seven_base64_chars(&delete_thread_event.thread.bytes()),
                first_seven_base64_chars(&delete_thread_event.thread_page.bytes())
            )
        };
        Box::new(logger)
    }
}

impl Logger for CreatePostEvent {
    fn get_logger() -> Box<dyn Fn(&Self) + Send + Sync> {
        let logger = |create_post_event: &CreatePostEvent| {
            log::info!(
                "{}, {}, {}, {}, {}",
                CREATE_POST,
                secs_since_unix_epoch(create_post_event.timestamp),
                first_seven_base64_chars(&create_post_event.board.bytes()),
                first_seven_base64_chars(&create_post_event.thread.bytes()),
                first_seven_base64_chars(&create_post_event.post.bytes())
            )
        };
        Box::new(logger)
    }
}

impl Logger for DeletePostEvent {
    fn get_logger() -> Box<dyn Fn(&Self) + Send + Sync> {
        let logger = |delete_post_event: &DeletePostEvent| {
            log::info!(
                "{}, {}, {}, {}, {}",
                DELETE_POST,
                secs_since_unix_epoch(delete_post_event.timestamp),
                first_seven_base64_chars(&delete_post_event.board.bytes()),
                first_seven_base64_chars(&delete_post_event.thread.bytes()),
                first_seven_base64_chars(&delete_post_event.post.bytes())
            )
        };
        Box::new(logger)
    }
}

impl Logger for RejectPostEvent {
    fn get_logger() -> Box<dyn Fn(&Self) + Send + Sync> {
        let logger = |reject_post_event: &RejectPostEvent| {
            log::warn!(
                "{}, {}, {}, {}, {}",
                REJECT_POST,
                secs_since_unix_epoch(reject_post_event.timestamp),
                first_seven_base64_chars(&reject_post_event.board.bytes()),
                first_seven_base64_chars(&reject_post_event.author.bytes()),
                reject_post_event.error
            )
        };
        Box::new(logger)
    }
}

// Get a more readable representation of a bytesequence by base64-encoding it and taking the first 7 characters.
pub(crate) fn first_seven_base64_chars(bytes: &[u8]) -> String {
    let encoded = STANDARD_NO_PAD.encode(bytes);
    if encoded.len() > 7 {
        encoded[0..7].to_string()
    } else {
        encoded
    }
}

// Clocks set before the Unix Epoch print as 0.
fn secs_since_unix_epoch(timestamp: SystemTime) -> u64 {
    timestamp
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or(0)
}
