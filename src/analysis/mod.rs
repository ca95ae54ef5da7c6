//! Analysis logic for profile data
//!
//! This module contains pure business logic for aggregating sample stacks,
//! separated from symbolication and presentation.

pub mod call_tree;

pub use call_tree::{build_tree, render, CallTreeNode};
