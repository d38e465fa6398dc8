use anyhow::Result;

fn main() -> Result<()> {
    let args = twine_engine::cli::parse()?;
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.log_filter()),
    )
    .init();
    twine_engine::runtime::execute(args)
}
