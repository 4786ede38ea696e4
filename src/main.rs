use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cfg = credscope::config::Config::parse();
    credscope::run(cfg)
}
