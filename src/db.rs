use crate::{
    model::StoredQuote,
    repository::{DbConf, QuoteRepository},
};
use anyhow::Result;
use std::{fs::remove_file, process::exit};
use tracing::{error, info, warn};

pub fn cli(args: &[String], conf: &DbConf) {
    let first_arg = args.first().unwrap_or_else(|| {
        error!("No args provided");
        exit(1);
    });

    match first_arg.as_str() {
        "drop" => drop(conf).unwrap_or_else(|e| {
            error!(%e, "Unable to drop database");
            exit(1);
        }),
        "list" => match list(conf) {
            Ok(rows) => {
                for row in rows {
                    println!("{}", format_row(&row));
                }
            }
            Err(e) => {
                error!(%e, "Unable to list quotes");
                exit(1);
            }
        },
        "show" => {
            let id = args.get(1).and_then(|it| it.parse::<i64>().ok());
            let id = id.unwrap_or_else(|| {
                error!(?args, "Expected a numeric quote id");
                exit(1);
            });
            match show(id, conf) {
                Ok(Some(row)) => println!("{}", format_row(&row)),
                Ok(None) => {
                    error!(id, "Quote not found");
                    exit(1);
                }
                Err(e) => {
                    error!(%e, "Unable to load quote");
                    exit(1);
                }
            }
        }
        _ => {
            error!(?args, "Unknown argument");
            exit(1);
        }
    };
}

fn drop(conf: &DbConf) -> Result<()> {
    warn!("Dropping database...");
    info!(db_url = %conf.url);
    remove_file(&conf.url)?;
    warn!("Database has been dropped");
    Ok(())
}

fn list(conf: &DbConf) -> Result<Vec<StoredQuote>> {
    let rows = QuoteRepository::new(conf.clone()).select_all()?;
    info!(count = rows.len(), "Loaded quotes");
    Ok(rows)
}

fn show(id: i64, conf: &DbConf) -> Result<Option<StoredQuote>> {
    QuoteRepository::new(conf.clone()).select_by_id(id)
}

fn format_row(row: &StoredQuote) -> String {
    format!(
        "{}\t{}\tbid={}\task={}\t{}",
        row.id, row.quote.code, row.quote.bid, row.quote.ask, row.quote.create_date
    )
}
