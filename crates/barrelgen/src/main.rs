fn main() -> anyhow::Result<()> {
    barrelgen::init();

    barrelgen::cli::run()
}
