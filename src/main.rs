use clap::Parser;
use std::process::ExitCode;
use todo_lists::cli::{Cli, Commands, ConfigCommands, TaskCommands};
use todo_lists::config::{ConfigError, ConfigManager};
use todo_lists::models::DEFAULT_CATEGORIES;
use todo_lists::store::{StoreError, TodoStore};
use todo_lists::TodoList;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config_manager = match ConfigManager::from_env() {
        Ok(manager) => manager,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config_manager, cli.verbose);

    match run(cli, &mut config_manager) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(config_manager: &ConfigManager, verbose: bool) {
    let level = if verbose {
        "debug".to_string()
    } else {
        config_manager
            .get("log-level")
            .unwrap_or_else(|| "warn".to_string())
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli, config_manager: &mut ConfigManager) -> Result<(), AppError> {
    let file = cli.file.as_deref();
    match cli.command {
        Commands::Lists => {
            let lists = config_manager.create_store_at(file)?.load()?;
            if lists.is_empty() {
                println!("No lists available.");
            }
            for (index, list) in lists.iter().enumerate() {
                print_summary(index, list);
            }
        }
        Commands::Show { list } => {
            let store = config_manager.create_store_at(file)?;
            print_list(&store.get_list(list)?);
        }
        Commands::Create {
            name,
            category,
            description,
        } => {
            let store = config_manager.create_store_at(file)?;
            let index = store.create_list(&name, &category, &description)?;
            println!("New list created successfully! [{}]", index);
        }
        Commands::Delete { list } => {
            let store = config_manager.create_store_at(file)?;
            if store.delete_list(list)? {
                println!("List deleted.");
            } else {
                println!("No list at index {}, nothing deleted.", list);
            }
        }
        Commands::Task(command) => {
            let store = config_manager.create_store_at(file)?;
            run_task(command, &store)?;
        }
        Commands::Categories => {
            for category in DEFAULT_CATEGORIES {
                println!("{}", category);
            }
        }
        Commands::Config(command) => run_config(command, config_manager)?,
    }

    Ok(())
}

fn run_task(command: TaskCommands, store: &TodoStore) -> Result<(), StoreError> {
    match command {
        TaskCommands::Add { list, text } => {
            let index = store.add_task(list, &text)?;
            println!("Task added successfully! [{}]", index);
        }
        TaskCommands::Done { list, task } => {
            store.set_task_completed(list, task, true)?;
            println!("Task status updated!");
        }
        TaskCommands::Undo { list, task } => {
            store.set_task_completed(list, task, false)?;
            println!("Task status updated!");
        }
        TaskCommands::Toggle { list, task } => {
            let completed = store.toggle_task(list, task)?;
            println!(
                "Task marked as {}.",
                if completed { "done" } else { "not done" }
            );
        }
        TaskCommands::Edit { list, task, text } => {
            store.set_task_text(list, task, &text)?;
            println!("Task updated!");
        }
        TaskCommands::Delete { list, task } => {
            store.delete_task(list, task)?;
            println!("Task deleted successfully!");
        }
    }
    Ok(())
}

fn run_config(command: ConfigCommands, config_manager: &mut ConfigManager) -> Result<(), AppError> {
    match command {
        ConfigCommands::Get { key } => match config_manager.get(&key) {
            Some(value) => println!("{}", value),
            None => return Err(ConfigError::InvalidKey(key).into()),
        },
        ConfigCommands::Set { key, value } => {
            config_manager.set(&key, &value)?;
            println!("{} = {}", key, value);
        }
        ConfigCommands::Unset { key } => {
            config_manager.unset(&key)?;
            println!("{} reset to default", key);
        }
        ConfigCommands::List => {
            for (key, value, is_default) in config_manager.list() {
                let marker = if is_default { " (default)" } else { "" };
                println!("{} = {}{}", key, value, marker);
            }
        }
    }
    Ok(())
}

fn print_summary(index: usize, list: &TodoList) {
    println!(
        "[{}] {} ({}) - {}/{} done",
        index,
        list.name,
        list.category,
        list.completed_count(),
        list.tasks.len()
    );
    if !list.description.is_empty() {
        println!("    {}", list.description);
    }
}

fn print_list(list: &TodoList) {
    println!("{} [{}]", list.name, list.category);
    if !list.description.is_empty() {
        println!("{}", list.description);
    }
    if list.tasks.is_empty() {
        println!("  (no tasks)");
    }
    for (index, task) in list.tasks.iter().enumerate() {
        let mark = if task.completed { "x" } else { " " };
        println!("  {}. [{}] {}", index, mark, task.text);
    }
}
