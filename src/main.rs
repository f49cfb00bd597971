mod args;
mod backend;
mod batch;
mod enumerate;
mod error;
mod filetypes;
mod logger;
mod request;
mod strategy;
mod update;
mod utils;

use backend::MediaBackend;
use batch::Orchestrator;
use filetypes::Group;
use kdam::{term, term::Colorizer};
use std::{
    io::{stderr, IsTerminal},
    process,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

fn run() -> anyhow::Result<()> {
    let args = args::parse();

    logger::init();
    term::init(stderr().is_terminal());

    if args.filetypes {
        println!("filetypes:");
        for group in Group::ALL {
            println!(" {}: {}", group, group.extensions().join(", "));
        }
        return Ok(());
    }

    if args.upgrade {
        match update::check_and_update()? {
            update::UpdateStatus::UpToDate => {
                println!("you already have the latest version of uniconvert.");
            }
            update::UpdateStatus::Updated { from, to } => {
                println!(
                    "    {} uniconvert {} -> {}",
                    "Updated".colorize("bold green"),
                    from,
                    to
                );
            }
        }
        return Ok(());
    }

    let request = request::parse(args.input.as_deref(), &args.rest, args.keep_original)?;

    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = cancelled.clone();
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))?;

    let media = MediaBackend::new();
    let summary = Orchestrator::new(&media, cancelled).run(&request)?;

    log::info!("{}", summary);
    log::info!("done.");
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".colorize("bold red"), e);
        process::exit(1);
    }
}
