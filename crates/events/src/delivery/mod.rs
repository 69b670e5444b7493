//! External delivery channels for admin notifications.

pub mod webhook;
