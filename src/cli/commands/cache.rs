use crate::cache::{
    AppShell, CacheController, CacheStorage, CacheWorker, ControllerEvent, ControllerStatus,
    Destination, DirOrigin, HttpOrigin, Network, OfflineNetwork, Request, UpdateCheck,
};
use crate::cli::parser::{CacheAction, Commands};
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{header, info, success, toast_error, warning};
use crate::utils::colors::{color_for_generation_state, colorize};
use crate::utils::table::{Column, Table};
use std::time::Duration;

fn origin_network(origin: &str) -> Box<dyn Network> {
    if origin.starts_with("http://") || origin.starts_with("https://") {
        Box::new(HttpOrigin::new(origin))
    } else {
        Box::new(DirOrigin::new(origin))
    }
}

/// Origin string the controller sees for `cfg.origin`.
fn origin_name(cfg: &Config) -> String {
    origin_network(&cfg.origin).origin().to_string()
}

fn print_event(e: &ControllerEvent) {
    match e {
        ControllerEvent::InstallFailed { version, reason } => {
            toast_error(format!("install-failed ({})", version), reason)
        }
        other => info(format!("event: {} ({})", other.name(), other.version())),
    }
}

fn print_status(st: &ControllerStatus) {
    header("Offline cache");
    println!("{:<12}{}", "Origin:", st.origin);
    for (label, v) in [
        ("Active:", &st.active),
        ("Waiting:", &st.waiting),
        ("Installing:", &st.installing),
    ] {
        match v {
            Some(tag) => {
                let state = st.state_of(tag).as_str();
                println!(
                    "{:<12}{} {}",
                    label,
                    tag,
                    colorize(&format!("[{}]", state), color_for_generation_state(state))
                );
            }
            None => println!("{:<12}-", label),
        }
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Cache { action } = cmd else {
        return Ok(());
    };

    let storage = CacheStorage::open(&cfg.cache_database)?;
    // The controller and the page each get their own connection.
    let offline = matches!(action, CacheAction::Get { offline: true, .. });
    let network = || -> Box<dyn Network> {
        if offline {
            Box::new(OfflineNetwork::new(&origin_name(cfg)))
        } else {
            origin_network(&cfg.origin)
        }
    };

    let worker = CacheWorker::spawn(CacheController::new(storage, network(), &cfg.cache_prefix));
    let mut shell = AppShell::connect(worker.handle(), network())?;

    match action {
        CacheAction::Status => print_status(&shell.status()?),

        CacheAction::Update => {
            let check = shell.check_for_update()?;
            while let Some(e) = shell.wait_event(Duration::from_millis(10))? {
                print_event(&e);
            }
            match check {
                UpdateCheck::UpToDate => success("Already up to date."),
                UpdateCheck::Activated(v) => {
                    success(format!("Generation {} installed and active.", v))
                }
                UpdateCheck::Waiting(v) => info(format!(
                    "Generation {} is waiting. Run `cache skip-waiting` to activate it.",
                    v
                )),
                UpdateCheck::Failed(reason) => toast_error("Update failed", reason),
                UpdateCheck::Unreachable(reason) => {
                    warning(format!("Origin unreachable: {}", reason))
                }
            }
        }

        CacheAction::SkipWaiting => match shell.apply_update()? {
            Some(v) => {
                while let Some(e) = shell.wait_event(Duration::from_millis(10))? {
                    print_event(&e);
                }
                if shell.needs_reload() {
                    let page = shell.reload()?;
                    info(format!("Reloaded entry page ({} bytes)", page.body.len()));
                }
                success(format!("Generation {} is now active.", v));
            }
            None => info("No generation is waiting."),
        },

        CacheAction::Get {
            path,
            navigate,
            method,
            ..
        } => {
            let destination = if *navigate {
                Destination::Document
            } else {
                Destination::Other
            };
            let resp = shell.fetch(Request::new(method, path, destination));
            match resp {
                Ok(r) => {
                    println!(
                        "{} {} {}",
                        r.status,
                        r.kind.as_str(),
                        r.content_type.as_deref().unwrap_or("-")
                    );
                    println!("{}", r.text());
                }
                Err(e) => toast_error("Request failed", e),
            }
        }

        CacheAction::Buckets => {
            let st = shell.status()?;
            if st.buckets.is_empty() {
                info("No cache buckets.");
            } else {
                let sep = cfg.separator_char.chars().next().unwrap_or('-');
                let mut table =
                    Table::new(vec![Column::left("Bucket"), Column::right("Entries")]).with_separator(sep);
                for b in &st.buckets {
                    table.add_row(vec![b.name.clone(), b.entries.to_string()]);
                }
                println!("{}", table.render());
            }
        }
    }

    Ok(())
}
