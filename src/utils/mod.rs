// Utility functions module

pub mod time;
