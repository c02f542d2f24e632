use std::process;

use serpc_drv::Config;

fn main() {
    let config = match Config::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("error: {message}");
            eprintln!("usage: serpc <file> [drawGraph] [--verbose]");
            process::exit(1);
        },
    };

    match serpc_drv::run(&config) {
        Ok(code) => process::exit(code),
        Err(error) => {
            eprintln!("error: {error:#}");
            process::exit(1);
        },
    }
}
