//! Audition domain core.
//!
//! Domain types for the interview product (questions, intake form, site
//! configuration, submissions, admin users, notification log), the typed
//! partial updates and validation rules applied to them, media naming rules,
//! and the ffmpeg command layer used to merge recordings.
//!
//! This crate performs no storage I/O; see `audition-db` for persistence.

pub mod error;
pub mod ffmpeg;
pub mod form_schema;
pub mod media;
pub mod notification;
pub mod ordering;
pub mod question;
pub mod site_config;
pub mod submission;
pub mod types;
pub mod user;
pub mod validation;
