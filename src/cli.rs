use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdfpages")]
#[command(about = "Select, merge, split and edit PDF pages, with MCP server support")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log output format (logs go to stderr)
    #[arg(
        long,
        value_enum,
        default_value = "text",
        env = "PDFPAGES_LOG_FORMAT",
        global = true
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as MCP server over stdio
    Mcp,

    /// Display PDF metadata and page count
    Info {
        /// PDF file to inspect
        path: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a page selection and show which pages it picks
    Select {
        /// Page selection (e.g., "1-3,5,7"; "*" or "" for all pages)
        pages: String,

        /// Take the page count from this PDF
        #[arg(short, long, conflicts_with = "total", required_unless_present = "total")]
        file: Option<PathBuf>,

        /// Page count to validate against
        #[arg(short, long)]
        total: Option<u32>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Copy selected pages to a new PDF
    #[command(alias = "cat")]
    Extract {
        /// PDF file to extract from
        path: PathBuf,

        /// Page selection (e.g., "1-5,10")
        pages: String,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Combine multiple PDFs into one
    Merge {
        /// PDF files to merge
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Page selection per input, in input order (missing means all pages)
        #[arg(short, long = "pages")]
        pages: Vec<String>,
    },

    /// Split a PDF into several files
    #[command(alias = "burst")]
    Split {
        /// PDF file to split
        path: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Groups separated by ';' (e.g., "1-3;4-6"), one output file each.
        /// Defaults to one file per page.
        #[arg(short, long)]
        groups: Option<String>,
    },

    /// Delete selected pages
    Remove {
        /// PDF file to edit
        path: PathBuf,

        /// Pages to delete
        pages: String,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Rotate selected pages clockwise
    Rotate {
        /// PDF file to edit
        path: PathBuf,

        /// Pages to rotate
        pages: String,

        /// Angle in degrees, a multiple of 90 (negative turns counter-clockwise)
        #[arg(short, long, default_value = "90", allow_negative_numbers = true)]
        angle: i64,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Put pages in a new order
    Reorder {
        /// PDF file to edit
        path: PathBuf,

        /// Every page number once, in the new order (e.g., "3,1,2")
        order: String,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Stamp a diagonal text watermark
    Watermark {
        /// PDF file to edit
        path: PathBuf,

        /// Watermark text
        text: String,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Pages to stamp (default: all)
        #[arg(short, long, default_value = "")]
        pages: String,

        /// Font size in points
        #[arg(long, default_value = "48")]
        font_size: f32,

        /// Opacity between 0 and 1
        #[arg(long, default_value = "0.3")]
        opacity: f32,
    },

    /// Encrypt with AES-256 behind a password
    Protect {
        /// PDF file to protect
        path: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Password needed to open the document
        #[arg(
            long,
            env = "PDFPAGES_USER_PASSWORD",
            hide_env_values = true,
            default_value = ""
        )]
        user_password: String,

        /// Password that lifts the restrictions (default: the user password)
        #[arg(
            long,
            env = "PDFPAGES_OWNER_PASSWORD",
            hide_env_values = true,
            default_value = ""
        )]
        owner_password: String,

        /// Disallow printing
        #[arg(long)]
        no_print: bool,

        /// Disallow copying text and graphics
        #[arg(long)]
        no_copy: bool,

        /// Disallow editing and page assembly
        #[arg(long)]
        no_modify: bool,

        /// Disallow annotations and form filling
        #[arg(long)]
        no_annotate: bool,
    },
}
