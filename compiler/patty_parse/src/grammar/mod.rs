//! Grammar productions, split by syntactic category.

mod binding;
mod expr;
mod stmt;
