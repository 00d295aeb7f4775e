use anyhow::{bail, Result};
use std::path::PathBuf;
use tetl::TweetETL;

const DEFAULT_STORE: &str = "./tweets_store.jsonl";

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let input = args.next();
    let analyze_only = input.as_deref() == Some("--analyze");

    let hw = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(8);

    let etl = TweetETL::new()
        .store_path(PathBuf::from(DEFAULT_STORE))
        .parallelism(hw)
        .skip_header(true)
        .progress(true)
        .progress_label("Loading dump");

    if analyze_only {
        let report = etl.analyze()?;
        println!("{report}");
        return Ok(());
    }

    let Some(input) = input else {
        bail!("usage: tetl <dump.csv|dump.csv.zst>  |  tetl --analyze");
    };

    let summary = etl.run(&PathBuf::from(input))?;
    println!("{summary}");
    Ok(())
}
