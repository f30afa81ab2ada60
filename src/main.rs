use crate::{
    conf::Conf,
    provider::{AwesomeApi, QuoteProvider},
    repository::QuoteRepository,
};
use anyhow::Result;
use rocket::{catchers, routes, Build, Rocket};
use std::{env, process::exit};
use tracing::{error, info};

mod client;
mod conf;
mod controller;
mod db;
mod model;
mod provider;
mod repository;
mod service;

#[rocket::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let conf = Conf::new().unwrap_or_else(|e| {
        error!(%e, "Unable to load configuration");
        exit(1);
    });

    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|it| it.as_str()) {
        None | Some("server") => serve(conf).await,
        Some("client") => client::cli(&conf.client).await,
        Some("db") => db::cli(&args[2..], &conf.db),
        Some(_) => {
            error!(?args, "Unknown command");
            exit(1);
        }
    }
}

async fn serve(conf: Conf) {
    let figment = rocket::Config::figment()
        .merge(("address", &conf.server.address))
        .merge(("port", conf.server.port));

    let rocket = prepare(rocket::custom(figment), &conf).unwrap_or_else(|e| {
        error!(%e, "Unable to prepare server");
        exit(1);
    });

    info!(
        address = %conf.server.address,
        port = conf.server.port,
        upstream = %conf.upstream.url,
        db = %conf.db.url,
        "Starting quote server"
    );

    if let Err(e) = rocket.launch().await {
        error!(%e, "Server failed");
        exit(1);
    }
}

pub fn prepare(rocket: Rocket<Build>, conf: &Conf) -> Result<Rocket<Build>> {
    let provider = AwesomeApi::new(conf.upstream.clone())?;
    let repo = QuoteRepository::new(conf.db.clone());
    Ok(mount(rocket, Box::new(provider), repo))
}

pub fn mount(
    rocket: Rocket<Build>,
    provider: Box<dyn QuoteProvider>,
    repo: QuoteRepository,
) -> Rocket<Build> {
    rocket
        .mount("/", routes![controller::quote::get])
        .register("/", catchers![controller::catcher::error])
        .manage(provider)
        .manage(repo)
}
