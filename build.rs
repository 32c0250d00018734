// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: configuration file
fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .value_name("PATH")
        .global(true)
        .help("Configuration file (default: $BUCKAROO_HOME/config.toml)")
}

fn build_cli() -> Command {
    Command::new("buckaroo")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Recipe resolution for the Buckaroo package manager")
        .subcommand_required(false)
        .arg(config_arg())
        .subcommand(
            Command::new("resolve")
                .about("Fetch recipes, e.g. boost/asio or boost/asio@official")
                .arg(
                    Arg::new("identifiers")
                        .required(true)
                        .num_args(1..)
                        .help("Recipe identifiers"),
                ),
        )
        .subcommand(
            Command::new("search")
                .about("List recipes matching a name, e.g. asio or boost/asio")
                .arg(
                    Arg::new("partial")
                        .required(true)
                        .help("Recipe name, optionally with its organization"),
                ),
        )
        .subcommand(
            Command::new("similar")
                .about("List recipes with names close to an identifier")
                .arg(Arg::new("identifier").required(true).help("Recipe identifier")),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("buckaroo.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
