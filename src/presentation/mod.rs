//! View models and askama templates for the public pages.

pub mod views;
