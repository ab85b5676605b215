use std::panic::PanicHookInfo;

/// Replaces the default panic hook with one that logs the panic through
/// `tracing`, so the message is printed once and in the log format.
pub fn install() {
    std::panic::set_hook(Box::new(tracing_panic_hook));
}

/// Prints roughly the same message as the default panic hook but uses
/// `tracing::error` instead of stderr so the message has the proper log
/// format.
fn tracing_panic_hook(panic: &PanicHookInfo) {
    let thread = std::thread::current();
    let name = thread.name().unwrap_or("<unnamed>");
    let backtrace = std::backtrace::Backtrace::capture();
    tracing::error!("thread '{name}' {panic}\nstack backtrace:\n{backtrace}");
}
