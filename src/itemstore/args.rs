use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "itemstore")]
#[command(about = "Saved-items store over a key-value preference backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the preference file (defaults to the
    /// platform-private application data directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Save an item (appended to the collection as-is)
    Save {
        /// Item payload as a JSON object string
        item: String,
    },

    /// Print the stored collection as a JSON array string
    #[command(alias = "ls")]
    List,

    /// Look up one item by its id
    Get {
        /// Exact item id
        item_id: String,
    },

    /// Replace the stored item with a matching id
    Update {
        /// Full replacement payload as a JSON object string (must contain id)
        item: String,
    },

    /// Delete the item with the given id
    #[command(alias = "rm")]
    Delete {
        /// Exact item id
        item_id: String,
    },

    /// Remove the whole collection
    Clear,

    /// Check whether any stored item has the given productId
    Check {
        /// Product id to look for
        product_id: i64,
    },

    /// Read JSON calls from stdin, one per line, and answer on stdout
    Serve,
}
