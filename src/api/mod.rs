pub mod attendance;
pub mod export;
pub mod report;
pub mod roster;
