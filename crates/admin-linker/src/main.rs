use {clap::Parser, std::process::ExitCode};

#[tokio::main]
async fn main() -> ExitCode {
    let args = admin_linker::arguments::Arguments::parse();
    observe::tracing::initialize(&observe::Config::new(
        &args.log_filter,
        args.log_stderr_threshold,
        args.use_json_logs,
    ));
    tracing::info!("running admin linker with validated arguments:\n{}", args);
    match admin_linker::run(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
