extern crate clap;
extern crate tracing_subscriber;
extern crate vdir;
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use std::env;
use std::error::Error;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;
use vdir::namespace::NamespaceService;
use vdir::node_store::{Node, NodeType};

const DEFAULT_DATABASE: &str = "./data/app.db";
// Also honored, for setups that configure the database file by this name.
const LEGACY_DATABASE_ENV: &str = "DATABASE_FILENAME";
const MEMORY_DATABASE: &str = ":memory:";

type CommandResult = Result<(), Box<dyn Error>>;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let database_arg = Arg::with_name("db")
        .long("db")
        .short("d")
        .env("VDIR_DATABASE")
        .takes_value(true)
        .help(
            "Path of the SQLite database holding the namespace (':memory:' for a scratch one), \
             falls back to $DATABASE_FILENAME and then ./data/app.db",
        );
    let shell_cmd = SubCommand::with_name("shell")
        .about("reads commands from stdin until 'exit' (default without a command)");
    let cli = App::new("vdir")
        .version(env!("CARGO_PKG_VERSION"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about("Manages a virtual tree of files and folders stored in a SQLite database")
        .arg(database_arg)
        .subcommands(node_commands())
        .subcommand(shell_cmd)
        .get_matches();

    let database = database_location(&cli);
    let namespace = match open_namespace(&database) {
        Ok(namespace) => namespace,
        Err(err) => {
            eprintln!("Could not open the database at '{}': {}", database, err);
            process::exit(1);
        }
    };

    match cli.subcommand() {
        ("shell", _) | (_, None) => run_shell(&namespace),
        (name, Some(cmd_cli)) => {
            if !run_command(&namespace, name, cmd_cli) {
                process::exit(1);
            }
        }
    }
}

// The commands understood both on the command line and in the shell.
fn node_commands() -> Vec<App<'static, 'static>> {
    let create_cmd = SubCommand::with_name("create")
        .about("creates a file or folder, at root level unless a parent folder is given")
        .arg(Arg::with_name("NAME").required(true).index(1))
        .arg(
            Arg::with_name("TYPE")
                .required(true)
                .index(2)
                .possible_values(&["file", "folder"]),
        )
        .arg(
            Arg::with_name("PARENT_NAME")
                .index(3)
                .help("Name of the folder to create the node in"),
        );

    let list_cmd = SubCommand::with_name("list")
        .about("lists the children of a folder, ordered by name")
        .arg(Arg::with_name("PARENT_NAME").required(true).index(1));

    let rename_cmd = SubCommand::with_name("rename")
        .about("gives a node a new name")
        .arg(Arg::with_name("NAME").required(true).index(1))
        .arg(Arg::with_name("NEW_NAME").required(true).index(2));

    let move_cmd = SubCommand::with_name("move")
        .about("moves a node (and everything below it) into another folder")
        .arg(Arg::with_name("NAME").required(true).index(1))
        .arg(Arg::with_name("NEW_PARENT_NAME").required(true).index(2));

    let remove_cmd = SubCommand::with_name("remove")
        .about("removes a node and everything below it")
        .arg(Arg::with_name("NAME").required(true).index(1));

    let show_cmd = SubCommand::with_name("show")
        .about("prints all fields of a node")
        .arg(Arg::with_name("NAME").required(true).index(1));

    vec![
        create_cmd, list_cmd, rename_cmd, move_cmd, remove_cmd, show_cmd,
    ]
}

fn database_location(cli: &ArgMatches) -> String {
    cli.value_of("db")
        .map(str::to_string)
        .or_else(|| env::var(LEGACY_DATABASE_ENV).ok())
        .filter(|database| !database.is_empty())
        .unwrap_or_else(|| DEFAULT_DATABASE.to_string())
}

fn open_namespace(database: &str) -> Result<NamespaceService, Box<dyn Error>> {
    if database != MEMORY_DATABASE {
        if let Some(parent_dir) = Path::new(database).parent() {
            if !parent_dir.as_os_str().is_empty() {
                fs::create_dir_all(parent_dir)?;
            }
        }
    }

    Ok(NamespaceService::open(database)?)
}

/// Runs a single command, printing its outcome.
/// Returns false if the command failed.
fn run_command(namespace: &NamespaceService, name: &str, cmd_cli: &ArgMatches) -> bool {
    let result = match name {
        "create" => create_node(namespace, cmd_cli),
        "list" => list_nodes(namespace, cmd_cli),
        "rename" => rename_node(namespace, cmd_cli),
        "move" => move_node(namespace, cmd_cli),
        "remove" => remove_node(namespace, cmd_cli),
        "show" => show_node(namespace, cmd_cli),
        other => Err(format!("Unknown command '{}'", other).into()),
    };

    match result {
        Ok(()) => true,
        Err(err) => {
            eprintln!("Error: {}", err);
            false
        }
    }
}

fn run_shell(namespace: &NamespaceService) {
    println!("Commands: create <name> <file|folder> [parent_name], list <parent_name>,");
    println!("          rename <name> <new_name>, move <name> <new_parent_name>,");
    println!("          remove <name>, show <name>, exit");

    let stdin = io::stdin();
    prompt();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                eprintln!("Error: could not read from stdin ({})", err);
                return;
            }
        };

        let words: Vec<&str> = line.split_whitespace().collect();
        match words.first() {
            None => (),
            Some(&"exit") => {
                println!("Exiting...");
                return;
            }
            Some(_) => match shell_app().get_matches_from_safe(words) {
                Ok(shell_cli) => {
                    if let (name, Some(cmd_cli)) = shell_cli.subcommand() {
                        run_command(namespace, name, cmd_cli);
                    }
                }
                Err(err) => eprintln!("{}", err.message),
            },
        }
        prompt();
    }
}

fn shell_app() -> App<'static, 'static> {
    App::new("vdir")
        .setting(AppSettings::NoBinaryName)
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .setting(AppSettings::DisableVersion)
        .subcommands(node_commands())
}

fn prompt() {
    print!("vdir> ");
    // A failed flush only loses the prompt.
    io::stdout().flush().ok();
}

fn create_node(namespace: &NamespaceService, cmd_cli: &ArgMatches) -> CommandResult {
    let name = cmd_cli.value_of("NAME").unwrap_or_default();
    let node_type = cmd_cli
        .value_of("TYPE")
        .map(str::parse::<NodeType>)
        .transpose()?;
    let parent_name = cmd_cli.value_of("PARENT_NAME");

    let node = namespace.create_node(name, node_type, parent_name)?;
    println!("Created {} '{}' ({})", node.node_type, node.name, node.id);
    Ok(())
}

fn list_nodes(namespace: &NamespaceService, cmd_cli: &ArgMatches) -> CommandResult {
    let parent_name = cmd_cli.value_of("PARENT_NAME").unwrap_or_default();

    let children = namespace.list_nodes(parent_name)?;
    if children.is_empty() {
        println!("'{}' is empty", parent_name);
    }
    for child in &children {
        println!("{:<6} {}", child.node_type, child.name);
    }
    Ok(())
}

fn rename_node(namespace: &NamespaceService, cmd_cli: &ArgMatches) -> CommandResult {
    let name = cmd_cli.value_of("NAME").unwrap_or_default();
    let new_name = cmd_cli.value_of("NEW_NAME").unwrap_or_default();

    let node = namespace.rename_node(name, new_name)?;
    println!("Renamed '{}' to '{}'", name, node.name);
    Ok(())
}

fn move_node(namespace: &NamespaceService, cmd_cli: &ArgMatches) -> CommandResult {
    let name = cmd_cli.value_of("NAME").unwrap_or_default();
    let new_parent_name = cmd_cli.value_of("NEW_PARENT_NAME").unwrap_or_default();

    namespace.move_node(name, new_parent_name)?;
    println!("Moved '{}' into '{}'", name, new_parent_name);
    Ok(())
}

fn remove_node(namespace: &NamespaceService, cmd_cli: &ArgMatches) -> CommandResult {
    let name = cmd_cli.value_of("NAME").unwrap_or_default();

    let removed = namespace.remove_node(name)?;
    println!("Removed '{}' ({} nodes)", name, removed);
    Ok(())
}

fn show_node(namespace: &NamespaceService, cmd_cli: &ArgMatches) -> CommandResult {
    let name = cmd_cli.value_of("NAME").unwrap_or_default();

    match namespace.find_node(name)? {
        Some(node) => print_node(&node),
        None => return Err(format!("NODE_NOT_FOUND: no node named '{}'", name).into()),
    }
    Ok(())
}

fn print_node(node: &Node) {
    println!("id:         {}", node.id);
    println!("name:       {}", node.name);
    println!("type:       {}", node.node_type);
    println!(
        "parent_id:  {}",
        node.parent_id.as_deref().unwrap_or("(root level)")
    );
    println!("created_at: {}", node.created_at);
    println!("updated_at: {}", node.updated_at);
}
