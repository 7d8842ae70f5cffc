pub mod cancel;

pub use cancel::{CancellationToken, DropGuard};
