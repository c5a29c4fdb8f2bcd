use colored::*;
use futures::FutureExt;
use sea_orm_migration::prelude::*;
use std::io::{self, Write};
use std::time::Instant;

const STATUS_COLUMN: usize = 72;

/// Applies every pending migration, printing one status line per step.
///
/// Migrations already recorded in `seaql_migrations` are reported as skipped.
pub async fn run_all_migrations<M: MigratorTrait>(url: &str) {
    let db = match sea_orm::Database::connect(url).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("{} {}", "DB connection failed:".red(), e);
            std::process::exit(1);
        }
    };

    println!("Running migrations against {}", url.dimmed());

    let pending: Vec<String> = match M::get_pending_migrations(&db).await {
        Ok(list) => list.iter().map(|m| m.name().to_string()).collect(),
        Err(e) => {
            eprintln!("{} {}", "Could not read migration history:".red(), e);
            std::process::exit(1);
        }
    };

    for migration in M::migrations() {
        let name = migration.name().to_string();
        print_label(&name);

        if !pending.contains(&name) {
            println!("{}", "skipped".yellow());
            continue;
        }

        let start = Instant::now();
        let result = std::panic::AssertUnwindSafe(M::up(&db, Some(1)))
            .catch_unwind()
            .await;

        match result {
            Ok(Ok(())) => {
                let time_str = format!("({:.2?})", start.elapsed()).dimmed();
                println!("{} {}", "done".green(), time_str);
            }
            Ok(Err(e)) => {
                println!("{}", "failed".red());
                eprintln!("  {}", e);
                std::process::exit(1);
            }
            Err(_) => {
                println!("{}", "panicked".red());
                std::process::exit(1);
            }
        }
    }
}

fn print_label(name: &str) {
    let label = format!("Applying {}", name.bold());
    let dots = ".".repeat(STATUS_COLUMN.saturating_sub(name.len() + 9));
    print!("{}{} ", label, dots);
    let _ = io::stdout().flush();
}
