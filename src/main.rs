fn main() {
    if let Err(err) = csv2coco::run() {
        eprintln!("Error: {}", err);
        let code = if err.is_write_failure() { 2 } else { 1 };
        std::process::exit(code);
    }
}
