//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Household setup | `init` |
//! | Home | Home lifecycle | `home add`, `home use`, `home show` |
//! | Catalog | Ingredients and recipes | `ingredient add`, `recipe require` |
//! | Stock | Inventory | `inventory set`, `inventory adjust` |
//! | Favourites | Cook history | `favourite add`, `favourite cook` |
//! | Suggest | What to cook next | `suggest`, `suggest --explain` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Choosing a Home
//!
//! Home-scoped commands take `--home <ID>`. Without it the configured
//! default home is used, or the only home if there is just one.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments, execute the appropriate command and
//! get the process exit code.

mod app;
mod output;
mod home;
mod ingredient;
mod recipe;
mod inventory;
mod favourite;
mod suggest;

pub use app::{Cli, Commands, NO_SUGGESTION_EXIT, run};
pub use output::{Output, OutputFormat};
pub use suggest::NoSuggestion;
