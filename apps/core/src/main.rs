use clap::Parser;

#[tokio::main]
async fn main() {
    let options = match lexsearch_core::runtime::CliOptions::try_parse() {
        Ok(options) => options,
        Err(error) => {
            let code = if error.use_stderr() { 2 } else { 0 };
            let _ = error.print();
            std::process::exit(code);
        }
    };

    if let Err(error) = lexsearch_core::logging::init() {
        eprintln!("[lexsearch-core] file logging disabled: {error}");
    }

    let report = match lexsearch_core::runtime::run_with_options(options).await {
        Ok(report) => report,
        Err(error) => {
            tracing::error!(%error, "runtime failed");
            eprintln!("[lexsearch-core] runtime failed: {error}");
            let code = match error {
                lexsearch_core::runtime::RuntimeError::Config(_) => 2,
                _ => 1,
            };
            std::process::exit(code);
        }
    };

    if let Some(notice) = &report.error {
        eprintln!("[lexsearch-core] {notice}");
    }
    match serde_json::to_string_pretty(&report) {
        Ok(encoded) => println!("{encoded}"),
        Err(error) => {
            eprintln!("[lexsearch-core] failed to encode results: {error}");
            std::process::exit(1);
        }
    }
}
