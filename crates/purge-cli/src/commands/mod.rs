//! Command implementations.

pub mod explain;
pub mod purge;

pub use self::explain::execute_explain;
pub use self::purge::execute_purge;
