//! Elizabeth: a terminal chat client for an anime recommendation service.

pub mod core;
pub mod recommend;
pub mod tui;

#[cfg(test)]
pub mod test_support;
