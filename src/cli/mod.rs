//! CLI command handlers

pub mod commands;

pub use commands::{
    apply_theme, error_message, generate, hs_add, hs_list, hs_remove, labels, lang, mapping_add,
    mapping_list, mapping_remove, mapping_reset, theme, GenerateArgs,
};
