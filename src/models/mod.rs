// Data models module
// Core domain types shared by the grid and the services

pub mod city;
pub mod meeting;
pub mod slot;
pub mod timeboard;
