//! nori core
//!
//! Formatting engine for Java source built on a lossless syntax tree: the
//! parse tree preserves every byte of original whitespace and every comment
//! as explicit [`syntax::Space`] values, and formatting is a pipeline of
//! pure tree-rewriting passes that recompute those spaces — indentation,
//! blank lines, inter-token spacing, wrap points — without disturbing
//! semantic structure or comments.
//!
//! The crate provides:
//! - the tree, parser front end, and printer ([`syntax`]);
//! - style records with documented defaults and a config loader ([`style`]);
//! - the layout passes and the [`format::auto_format`] orchestrator
//!   ([`format`]).
//!
//! Formatting one unit is pure and single-threaded; batch callers run the
//! pipeline per file in parallel, sharing the immutable style records.

pub mod batch;
pub mod error;
pub mod format;
pub mod result;
pub mod style;
pub mod syntax;

// Re-export commonly used types
pub use batch::{BatchMode, FileOutcome, FileReport, discover_files, format_batch, format_file};
pub use error::{ErrorKind, NoriError};
pub use format::{FormatPass, auto_format, format_source};
pub use result::Result;
pub use style::{
    BlankLinesStyle, FormatStyle, GeneralStyle, LineEnding, LineWrapSetting, NoriConfig,
    SpacesStyle, TabsAndIndentsStyle, WrappingStyle, discover_config, load_config,
};
pub use syntax::{
    Comment, CommentStyle, CompilationUnit, NodeId, Space, Stopped, parse_unit, print_unit,
};

/// Crate version, surfaced by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nori=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}
