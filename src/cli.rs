use clap::{Args, Parser, Subcommand, ValueEnum};
use dupe_tree::deleter::DeleteMethod;
use dupe_tree::tree::{GroupSort, SortKey};
use dupe_tree::SmartSelectPolicy;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "dupe-tree")]
#[command(about = "Review, select and delete groups of duplicate files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Load a duplicates list and print its statistics
    Stats(InputArgs),
    /// Apply a smart selection policy and report what would be deleted
    Select(SelectArgs),
    /// Apply a smart selection policy and delete the selected files
    Delete(DeleteArgs),
    /// List the available smart selection policies
    Policies,
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// JSON file holding an array of duplicate groups
    pub input: PathBuf,
    /// Treat the files as images (enables resolution policies)
    #[arg(long)]
    pub images: bool,
    /// Group ordering
    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,
}

#[derive(Debug, Args)]
pub struct SelectArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Smart selection policy, e.g. keep-earliest-modified (defaults to the configured one)
    #[arg(long)]
    pub policy: Option<SmartSelectPolicy>,
    /// Write the resulting selection to a CSV file
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub select: SelectArgs,
    /// How to get rid of the files (defaults to the configured one)
    #[arg(long, value_enum)]
    pub method: Option<MethodArg>,
    /// Destination for --method backup
    #[arg(long)]
    pub backup_folder: Option<PathBuf>,
    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    TotalSizeAsc,
    TotalSizeDesc,
    FileSizeAsc,
    FileSizeDesc,
    CountAsc,
    CountDesc,
}

impl From<SortArg> for GroupSort {
    fn from(arg: SortArg) -> Self {
        let (key, ascending) = match arg {
            SortArg::TotalSizeAsc => (SortKey::TotalSize, true),
            SortArg::TotalSizeDesc => (SortKey::TotalSize, false),
            SortArg::FileSizeAsc => (SortKey::SingleFileSize, true),
            SortArg::FileSizeDesc => (SortKey::SingleFileSize, false),
            SortArg::CountAsc => (SortKey::NumberOfFiles, true),
            SortArg::CountDesc => (SortKey::NumberOfFiles, false),
        };
        GroupSort { key, ascending }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MethodArg {
    Permanent,
    Trash,
    Backup,
}

impl From<MethodArg> for DeleteMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Permanent => DeleteMethod::Permanent,
            MethodArg::Trash => DeleteMethod::Trash,
            MethodArg::Backup => DeleteMethod::Backup,
        }
    }
}
