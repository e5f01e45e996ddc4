fn main() {
    if let Err(e) = sph_dam_break::start() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
