/// API route handlers
///
/// Handlers decode the request, call one service operation and map the
/// result into the response envelope.

pub mod health;
pub mod tasks;
pub mod users;
