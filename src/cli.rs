use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Manage to-do lists stored in a JSON file", long_about = None)]
pub struct Cli {
    /// Use this document instead of the configured storage.path
    #[arg(short, long, global = true, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show every list
    Lists,
    /// Show one list and its tasks
    Show {
        #[arg(value_name = "LIST")]
        list: usize,
    },
    /// Create a new list
    Create {
        #[arg(value_name = "NAME")]
        name: String,
        /// Home, Shopping, Work, Fitness, Other, or any other label
        #[arg(short, long)]
        category: String,
        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Delete a list
    Delete {
        #[arg(value_name = "LIST")]
        list: usize,
    },
    /// Work with the tasks of a list
    #[command(subcommand)]
    Task(TaskCommands),
    /// Show the conventional list categories
    Categories,
    /// Read or change settings
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Add a task to a list
    Add {
        #[arg(value_name = "LIST")]
        list: usize,
        #[arg(value_name = "TEXT")]
        text: String,
    },
    /// Mark a task as completed
    Done {
        #[arg(value_name = "LIST")]
        list: usize,
        #[arg(value_name = "TASK")]
        task: usize,
    },
    /// Mark a task as not completed
    Undo {
        #[arg(value_name = "LIST")]
        list: usize,
        #[arg(value_name = "TASK")]
        task: usize,
    },
    /// Flip a task between completed and not completed
    Toggle {
        #[arg(value_name = "LIST")]
        list: usize,
        #[arg(value_name = "TASK")]
        task: usize,
    },
    /// Replace the text of a task
    Edit {
        #[arg(value_name = "LIST")]
        list: usize,
        #[arg(value_name = "TASK")]
        task: usize,
        #[arg(value_name = "TEXT")]
        text: String,
    },
    /// Delete a task
    Delete {
        #[arg(value_name = "LIST")]
        list: usize,
        #[arg(value_name = "TASK")]
        task: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the value of a setting
    Get {
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Change a setting
    Set {
        #[arg(value_name = "KEY")]
        key: String,
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Reset a setting to its default
    Unset {
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Print every setting
    List,
}
