mod args;
mod cmd;
mod config;
mod util;

fn main() {
    env_logger::init();
    let mut p = lexopt::Parser::from_env();
    if let Err(err) = cmd::run(&mut p) {
        // A full backtrace is only useful when it was asked for.
        if std::env::var_os("RUST_BACKTRACE").map_or(false, |v| v == "1") {
            eprintln!("{:?}", err);
        } else {
            eprintln!("{:#}", err);
        }
        std::process::exit(1);
    }
}
