fn main() -> anyhow::Result<()> {
    ddsformat::cli::run_cli()
}
