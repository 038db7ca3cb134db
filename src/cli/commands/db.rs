use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::{SCHEMA_VERSION, current_version, run_pending_migrations};
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RED, RESET};

fn announce(task: &str) {
    println!("{}▶ {}…{}", CYAN, task, RESET);
}

fn done(msg: &str) {
    println!("{}✔ {}{}\n", GREEN, msg, RESET);
}

/// `PRAGMA integrity_check` answers one `ok` row, or one row per problem.
fn integrity_problems(pool: &DbPool) -> AppResult<Vec<String>> {
    let mut stmt = pool.conn.prepare("PRAGMA integrity_check")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    let mut problems = Vec::new();
    for r in rows {
        let line = r?;
        if line != "ok" {
            problems.push(line);
        }
    }
    Ok(problems)
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Db {
        migrate,
        check,
        vacuum,
        info,
    } = cmd
    else {
        return Ok(());
    };

    // Raw open: the schema is only upgraded when --migrate asks for it.
    let mut pool = DbPool::new(&cfg.database)?;

    if *migrate {
        announce("Upgrading schema");
        let before = current_version(&pool.conn)?;
        if before == SCHEMA_VERSION {
            done(&format!("Schema already at v{}.", SCHEMA_VERSION));
        } else {
            run_pending_migrations(&pool.conn)?;
            done(&format!("Schema upgraded v{} → v{}.", before, SCHEMA_VERSION));
        }
    }

    if *info {
        stats::print_db_info(&mut pool, &cfg.database)?;
    }

    if *check {
        announce("Checking integrity");
        let problems = integrity_problems(&pool)?;
        if problems.is_empty() {
            done("Integrity check passed.");
        } else {
            println!("{}✘ Integrity check found {} problem(s):{}", RED, problems.len(), RESET);
            for p in problems {
                println!("   {}", p);
            }
        }
    }

    if *vacuum {
        announce("Compacting database");
        pool.conn.execute_batch("VACUUM;")?;
        done("Vacuum completed.");
    }

    Ok(())
}
