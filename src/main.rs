fn main() {
    if let Err(err) = chart_advisor::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
