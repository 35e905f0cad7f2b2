fn main() -> Result<(), Box<dyn std::error::Error>> {
    palaver::cli::main()
}
