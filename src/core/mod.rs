pub mod backup;
pub mod timer;
