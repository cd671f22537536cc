//! Command-line entry point.
//!
//! - `cat-file` - read object contents
//! - `commit` - create a new commit

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use vc::commands;

/// vc - a small, git-like version control system.
#[derive(Parser)]
#[command(name = "vc")]
#[command(version)]
#[command(about = "A small, git-like version control system", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new repository
    Init {
        /// Directory to initialize (defaults to the current directory)
        path: Option<String>,

        /// Name of the initial branch
        #[arg(long, default_value = vc::DEFAULT_BRANCH)]
        initial_branch: String,
    },

    /// Compute an object's key and optionally store it
    #[command(name = "hash-object")]
    HashObject {
        /// The file to hash
        file: Option<String>,

        /// Read content from stdin instead of a file
        #[arg(long)]
        stdin: bool,

        /// Store the object in the database
        #[arg(short, long)]
        write: bool,
    },

    /// Inspect a single object
    #[command(name = "cat-file")]
    CatFile {
        /// The object key to read
        hash: String,

        /// Exit 0 if the object exists, nonzero otherwise
        #[arg(short = 'e')]
        exists: bool,

        /// Show the object's size
        #[arg(short = 's')]
        size: bool,

        /// Pretty-print the object's contents
        #[arg(short = 'p')]
        pretty_print: bool,

        /// Show the object's type
        #[arg(short = 't')]
        object_type: bool,
    },

    /// Stage files for the next commit
    Add {
        /// Files or directories to stage
        paths: Vec<String>,
    },

    /// Record the staged tree as a new commit
    Commit {
        /// The commit message
        #[arg(short, long)]
        message: String,
    },

    /// Show the working tree status
    Status,

    /// Show commit history
    Log {
        /// Show one commit per line
        #[arg(long)]
        oneline: bool,
    },

    /// Switch branches or detach onto a commit
    Checkout {
        /// Branch name, commit key, or prefix
        target: String,

        /// Create the branch if it doesn't exist
        #[arg(short = 'b')]
        create_branch: bool,
    },

    /// List, create, delete, or rename branches
    Branch {
        /// Branch name(s): one to create, one to delete, or two to rename
        names: Vec<String>,

        /// Delete the named branch
        #[arg(short = 'd')]
        delete: bool,

        /// Rename a branch: `vc branch -m <old> <new>`
        #[arg(short = 'm')]
        rename: bool,
    },

    /// Show changes between the index and the working tree
    Diff {
        /// Restrict the diff to these files
        files: Vec<String>,
    },
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init {
            path,
            initial_branch,
        } => {
            commands::init::run(path.as_deref().map(std::path::Path::new), &initial_branch)?;
        }
        Commands::HashObject { file, stdin, write } => {
            commands::hash_object::run(file.as_deref(), stdin, write)?;
        }
        Commands::CatFile {
            hash,
            exists,
            size,
            pretty_print,
            object_type,
        } => {
            commands::cat_file::run(&hash, exists, size, object_type, pretty_print)?;
        }
        Commands::Add { paths } => {
            commands::add::run(paths)?;
        }
        Commands::Commit { message } => {
            commands::commit::run(&message)?;
        }
        Commands::Status => {
            commands::status::run()?;
        }
        Commands::Log { oneline } => {
            commands::log::run(oneline)?;
        }
        Commands::Checkout {
            target,
            create_branch,
        } => {
            commands::checkout::run(&target, create_branch)?;
        }
        Commands::Branch {
            names,
            delete,
            rename,
        } => {
            commands::branch::run(names, delete, rename)?;
        }
        Commands::Diff { files } => {
            commands::diff::run(files)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("VC_LOG", "warn")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
