fn main() -> std::io::Result<()> {
    tally::interface::cli::run(std::env::args().skip(1))
}
