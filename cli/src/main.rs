extern crate blockplan;
extern crate clap;
extern crate dirs;
extern crate failure;
#[macro_use]
extern crate failure_derive;
extern crate fern;
#[macro_use]
extern crate log;
extern crate serde;
extern crate serde_json;

mod config;
mod errors;
mod logging;

use blockplan::EntityStore;
use clap::{App, Arg};
use std::{path::PathBuf, process::exit};

fn main() {
    let matches = App::new("blockplan")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .help("path to the JSON document describing the desired storage topology")
                .takes_value(true)
                .required(true),
        )
        .get_matches();

    if let Err(why) = logging::init() {
        eprintln!("failed to initialize logging: {}", why);
    }

    let config_path = PathBuf::from(matches.value_of("config").unwrap());

    let (storage, environment) = match config::load(&config_path) {
        Ok(loaded) => loaded,
        Err(why) => {
            eprintln!("blockplan: {}", why);
            exit(1);
        }
    };

    let store = match EntityStore::new(storage) {
        Ok(store) => store,
        Err(why) => {
            eprintln!("blockplan: {}", why);
            exit(1);
        }
    };

    info!("realizing storage topology from {:?}", config_path);

    match blockplan::execute(&store, &environment) {
        Ok(()) => {
            println!("storage topology realized successfully");
        }
        Err(why) => {
            eprintln!("blockplan: {}", why);
            exit(1);
        }
    }
}
