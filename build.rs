// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn build_cli() -> Command {
    Command::new("elm-vendor")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Vendor Elm native packages: fetch GitHub archives, wire up source-directories, rebrand native code")
        .arg(
            Arg::new("manifest")
                .required(true)
                .help("The elm-native-package.json file you want to use"),
        )
        .arg(
            Arg::new("elm_config")
                .short('e')
                .long("elm-config")
                .value_name("PATH")
                .num_args(1..)
                .help("Project config files whose source-directories gain the vendored paths"),
        )
        .arg(
            Arg::new("vendor_dir")
                .long("vendor-dir")
                .value_name("DIR")
                .default_value("vendor/assets/elm")
                .help("Root of the vendor tree"),
        )
        .arg(
            Arg::new("test")
                .short('t')
                .long("test")
                .action(ArgAction::SetTrue)
                .help("Run internal self-checks and exit"),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory
    let out_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).expect("Failed to create man directory");

    // Generate main man page
    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();
    man.render(&mut buffer).expect("Failed to render man page");

    let man_path = man_dir.join("elm-vendor.1");
    fs::write(&man_path, buffer).expect("Failed to write man page");
}
