//! Line-oriented board driver.
//!
//! # Responsibility
//! - Load a board from a SQLite snapshot file (or a fresh catalog).
//! - Apply `move/undo/toggle/save` commands read from stdin, one per line.

mod args;
mod command;

use args::Cli;
use assignboard_core::db::open_db;
use assignboard_core::{
    default_log_level, init_logging, AssignmentState, BoardService, LoadSource, MoveCommand,
    SnapshotRepository, SqliteSnapshotRepository, UndoOutcome,
};
use clap::Parser;
use command::{parse_line, Command};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        if let Err(err) = init_logging(default_log_level(), log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("assignboard: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let conn = open_db(&cli.db_path)?;
    let repo = SqliteSnapshotRepository::try_new(&conn)?;
    let mut service = BoardService::load(repo, cli.board_config())?;

    println!(
        "assignboard {} ({} board from `{}`); type `help` for commands",
        assignboard_core::core_version(),
        match service.source() {
            LoadSource::Snapshot => "restored",
            LoadSource::Catalog => "new",
        },
        cli.db_path.display()
    );
    print_board(service.current_state(), service.history().len());

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }

        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        if command == Command::Quit {
            return Ok(());
        }
        execute(&mut service, command);
    }
}

fn execute<R: SnapshotRepository>(service: &mut BoardService<R>, command: Command) {
    match command {
        Command::Show => {}
        Command::Move {
            item_id,
            pool_index,
            group_index,
        } => {
            let command = MoveCommand::from_pool(item_id, pool_index, group_index);
            match service.move_item(&command) {
                Ok(step) => println!("item {} assigned to group {}", step.item_id, step.group_uuid),
                Err(err) => println!("{err}"),
            }
        }
        Command::Undo => match service.undo() {
            UndoOutcome::Empty => println!("nothing to undo"),
            UndoOutcome::Reverted(step) => println!("item {} returned to pool", step.item_id),
            UndoOutcome::Stale(step) => println!("skipped stale undo for item {}", step.item_id),
        },
        Command::Toggle { group_index } => {
            let uuid = service
                .current_state()
                .groups
                .get(group_index)
                .map(|group| group.uuid);
            match uuid {
                Some(uuid) => {
                    service.toggle_expanded(uuid);
                }
                None => println!("no group at index {group_index}"),
            }
        }
        Command::Save => match service.save() {
            Ok(()) => println!("saved"),
            Err(err) => println!("{err}; board kept, retry with `save`"),
        },
        Command::Quit => return,
    }
    print_board(service.current_state(), service.history().len());
}

fn print_board(state: &AssignmentState, undo_depth: usize) {
    println!("groups:");
    for (index, group) in state.groups.iter().enumerate() {
        let marker = if group.children.is_empty() {
            ' '
        } else if group.is_expanded {
            'v'
        } else {
            '>'
        };
        println!(
            "  [{index}] {marker} #{} {} ({} assigned)",
            group.header.id,
            group.header.description,
            group.children.len()
        );
        if group.is_expanded {
            for child in &group.children {
                println!("        - #{} {}", child.id, child.description);
            }
        }
    }
    println!("pool:");
    for (index, item) in state.pool.iter().enumerate() {
        println!("  [{index}] #{} {}", item.id, item.description);
    }
    println!("undo steps: {undo_depth}");
}
